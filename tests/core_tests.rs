use chrono::NaiveDate;
use efatura::core::*;
use rust_decimal_macros::dec;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn supplier() -> Party {
    PartyBuilder::new(
        "ACME Bilişim A.Ş.",
        AddressBuilder::new("İstanbul", "Türkiye")
            .street("Büyükdere Cad.")
            .building_number("12")
            .subdivision("Şişli")
            .postal_code("34394")
            .build(),
    )
    .tax_id("1234567890", true)
    .tax_office("Zincirlikuyu")
    .website("https://acme.example")
    .contact(
        Some("+90 212 000 00 00".into()),
        Some("+90 532 000 00 00".into()),
        Some("fatura@acme.example".into()),
    )
    .build()
}

fn customer() -> Party {
    PartyBuilder::new(
        "Ayşe Yılmaz",
        AddressBuilder::new("Ankara", "Türkiye").build(),
    )
    .tax_id("12345678901", false)
    .build()
}

// --- Builder ---

#[test]
fn builder_computes_aggregates_from_lines() {
    let invoice = InvoiceBuilder::new("INV/001", date(2024, 6, 15))
        .profile(ProfileType::TicariFatura)
        .type_kind(InvoiceTypeKind::Satis)
        .supplier(supplier())
        .customer(customer())
        .add_line(
            LineBuilder::new(dec!(2), dec!(100))
                .description("Danışmanlık")
                .tax("KDV", "0015", dec!(20))
                .build(),
        )
        .build()
        .unwrap();

    assert_eq!(invoice.untaxed, dec!(200.00));
    assert_eq!(invoice.tax, dec!(40.00));
    assert_eq!(invoice.total, dec!(240.00));
}

#[test]
fn marker_lines_do_not_contribute_to_totals() {
    let invoice = InvoiceBuilder::new("INV/002", date(2024, 6, 15))
        .profile(ProfileType::TemelFatura)
        .type_kind(InvoiceTypeKind::Satis)
        .supplier(supplier())
        .customer(customer())
        .add_line(LineBuilder::marker(LineKind::Section, "Hizmetler"))
        .add_line(
            LineBuilder::new(dec!(1), dec!(500))
                .description("Bakım")
                .tax("KDV", "0015", dec!(20))
                .build(),
        )
        .build()
        .unwrap();

    assert_eq!(invoice.eligible_lines().count(), 1);
    assert_eq!(invoice.untaxed, dec!(500.00));
    assert_eq!(invoice.total, dec!(600.00));
}

#[test]
fn customer_invoice_requires_profile_and_type() {
    let result = InvoiceBuilder::new("INV/003", date(2024, 6, 15))
        .supplier(supplier())
        .customer(customer())
        .add_line(
            LineBuilder::new(dec!(1), dec!(100))
                .tax("KDV", "0015", dec!(20))
                .build(),
        )
        .build();

    let err = result.unwrap_err();
    let text = err.to_string();
    assert!(text.contains("profile type is required"));
    assert!(text.contains("invoice type code is required"));
}

#[test]
fn incoming_invoice_needs_no_profile() {
    let invoice = InvoiceBuilder::new("BILL/001", date(2024, 6, 15))
        .move_type(MoveType::InInvoice)
        .supplier(supplier())
        .customer(customer())
        .build()
        .unwrap();
    assert!(invoice.profile.is_none());
}

#[test]
fn totals_override_wins_over_derivation() {
    let invoice = InvoiceBuilder::new("INV/004", date(2024, 6, 15))
        .profile(ProfileType::TicariFatura)
        .type_kind(InvoiceTypeKind::Satis)
        .supplier(supplier())
        .customer(customer())
        .add_line(
            LineBuilder::new(dec!(1), dec!(100))
                .tax("KDV", "0015", dec!(20))
                .build(),
        )
        .totals(dec!(99.00), dec!(19.80), dec!(118.80))
        .build()
        .unwrap();
    assert_eq!(invoice.total, dec!(118.80));
}

// --- Line derivation ---

#[test]
fn line_builder_applies_percentage_discount() {
    let line = LineBuilder::new(dec!(2), dec!(100))
        .discount_percent(dec!(10))
        .tax("KDV", "0015", dec!(20))
        .build();
    assert_eq!(line.subtotal, dec!(180.00));
    assert_eq!(line.tax_amount, Some(dec!(36.00)));
    assert_eq!(line.total, dec!(216.00));
}

#[test]
fn line_builder_takes_larger_of_percent_and_fixed_discount() {
    let line = LineBuilder::new(dec!(4), dec!(50))
        .discount_percent(dec!(5)) // 10.00
        .discount_fixed(dec!(4)) // 16.00
        .build();
    assert_eq!(line.subtotal, dec!(184.00));
}

#[test]
fn display_name_falls_back_to_product() {
    let line = LineBuilder::new(dec!(1), dec!(10))
        .product_name("Vida 5mm")
        .build();
    assert_eq!(line.display_name(), Some("Vida 5mm"));

    let bare = LineBuilder::new(dec!(1), dec!(10)).build();
    assert_eq!(bare.display_name(), None);
}

// --- Tax category resolution ---

#[test]
fn tax_category_prefers_group_override() {
    let tax = TaxDetail {
        name: Some("KDV %20".into()),
        code: Some("0015".into()),
        percent: dec!(20),
        group: Some(TaxGroup {
            name: Some("Gerçek Usulde KDV".into()),
            code: Some("0015".into()),
        }),
    };
    assert_eq!(tax.category_name(), "Gerçek Usulde KDV");
    assert_eq!(tax.category_code(), "0015");
}

#[test]
fn tax_category_literal_fallbacks() {
    let tax = TaxDetail {
        name: None,
        code: None,
        percent: dec!(1),
        group: None,
    };
    assert_eq!(tax.category_name(), "KDV");
    assert_eq!(tax.category_code(), "0015");
}

// --- Validation ---

#[test]
fn validation_collects_all_errors() {
    let mut invoice = InvoiceBuilder::new("INV/005", date(2024, 6, 15))
        .profile(ProfileType::TicariFatura)
        .type_kind(InvoiceTypeKind::Satis)
        .supplier(supplier())
        .customer(customer())
        .add_line(
            LineBuilder::new(dec!(1), dec!(100))
                .tax("KDV", "0015", dec!(20))
                .build(),
        )
        .build()
        .unwrap();

    invoice.currency_code = "LIRA".into();
    invoice.supplier.tax_id = Some("123".into());
    invoice.lines[0].unit_code = Some("banana".into());

    let errors = validate_invoice(&invoice);
    let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
    assert!(fields.contains(&"currency_code"));
    assert!(fields.contains(&"supplier.tax_id"));
    assert!(fields.contains(&"lines[0].unit_code"));
}

#[test]
fn tckn_must_be_eleven_digits() {
    let mut party = customer();
    party.tax_id = Some("123".into());
    let mut invoice = InvoiceBuilder::new("INV/006", date(2024, 6, 15))
        .profile(ProfileType::TicariFatura)
        .type_kind(InvoiceTypeKind::Satis)
        .supplier(supplier())
        .customer(customer())
        .add_line(
            LineBuilder::new(dec!(1), dec!(1))
                .tax("KDV", "0015", dec!(20))
                .build(),
        )
        .build()
        .unwrap();
    invoice.customer = party;

    let errors = validate_invoice(&invoice);
    assert!(errors.iter().any(|e| e.message.contains("TCKN must be 11 digits")));
}

// --- Codes ---

#[test]
fn profile_codes_round_trip() {
    for profile in [
        ProfileType::TicariFatura,
        ProfileType::Ihracat,
        ProfileType::TemelFatura,
        ProfileType::YolcuBeraberFatura,
        ProfileType::BedelsizIhracat,
        ProfileType::Kamu,
        ProfileType::Enerji,
        ProfileType::IlacTibbiCihaz,
        ProfileType::MikroIhracat,
    ] {
        assert_eq!(ProfileType::from_code(profile.code()), Some(profile));
    }
    assert_eq!(ProfileType::from_code("FATURA"), None);
}

#[test]
fn invoice_type_codes_round_trip() {
    for kind in [
        InvoiceTypeKind::Satis,
        InvoiceTypeKind::Iade,
        InvoiceTypeKind::IhracKayitli,
        InvoiceTypeKind::KonaklamaVergisi,
        InvoiceTypeKind::Sgk,
        InvoiceTypeKind::TevkifatIade,
        InvoiceTypeKind::Sarj,
        InvoiceTypeKind::SarjAnlik,
        InvoiceTypeKind::TeknolojiDestek,
    ] {
        assert_eq!(InvoiceTypeKind::from_code(kind.code()), Some(kind));
    }
    assert_eq!(InvoiceTypeKind::from_code("ALIM"), None);
}

#[test]
fn phone_falls_back_to_mobile() {
    let party = PartyBuilder::new("X", AddressBuilder::new("İzmir", "Türkiye").build())
        .contact(None, Some("+90 532 111 11 11".into()), None)
        .build();
    assert_eq!(party.phone(), Some("+90 532 111 11 11"));
}

// --- Serde ---

#[test]
fn invoice_serde_round_trip() {
    let invoice = InvoiceBuilder::new("INV/030", date(2024, 6, 15))
        .profile(ProfileType::TicariFatura)
        .type_kind(InvoiceTypeKind::Satis)
        .origin_reference("SO/2024/0042")
        .supplier(supplier())
        .customer(customer())
        .add_line(
            LineBuilder::new(dec!(2), dec!(100))
                .description("Danışmanlık")
                .discount_percent(dec!(10))
                .tax("KDV", "0015", dec!(20))
                .build(),
        )
        .build()
        .unwrap();

    let json = serde_json::to_string(&invoice).unwrap();
    let back: Invoice = serde_json::from_str(&json).unwrap();
    assert_eq!(back.number, invoice.number);
    assert_eq!(back.total, invoice.total);
    assert_eq!(back.lines.len(), 1);
    assert_eq!(back.lines[0].discount_percent, Some(dec!(10)));
}

#[test]
fn integration_config_serde_round_trip() {
    let config = IntegrationConfig {
        kind: IntegrationKind::EArsiv,
        company_code: 7,
        api_user_name: "user".into(),
        api_password: "secret".into(),
        web_service_url: Some("https://example.invalid/service.asmx".into()),
        prefix: Some("EAR".into()),
        ubl_version: Some("2.1".into()),
        customization_id: Some("TR1.2".into()),
        corporate_code: Some("PBS".into()),
        xslt_base64: Some("PHhzbDpzdHlsZXNoZWV0Lz4=".into()),
        xslt_file_name: Some("arsiv.xslt".into()),
    };
    let json = serde_json::to_string(&config).unwrap();
    let back: IntegrationConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back.kind, IntegrationKind::EArsiv);
    assert_eq!(back.xslt_attachment().unwrap().file_name, "arsiv.xslt");
}
