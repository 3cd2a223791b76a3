use chrono::NaiveDate;
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use efatura::core::*;
use efatura::ubl::{self, RenderOptions};
use rust_decimal_macros::dec;

fn invoice(lines: usize) -> Invoice {
    let mut builder = InvoiceBuilder::new(
        "ABC2024000000001",
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
    )
    .profile(ProfileType::TicariFatura)
    .type_kind(InvoiceTypeKind::Satis)
    .supplier(
        PartyBuilder::new(
            "ACME Bilişim A.Ş.",
            AddressBuilder::new("İstanbul", "Türkiye")
                .street("Büyükdere Cad.")
                .build(),
        )
        .tax_id("1234567890", true)
        .build(),
    )
    .customer(
        PartyBuilder::new("Müşteri Ltd.", AddressBuilder::new("Ankara", "Türkiye").build())
            .tax_id("9876543210", true)
            .build(),
    );
    for i in 0..lines {
        builder = builder.add_line(
            LineBuilder::new(dec!(2), dec!(100))
                .description(format!("Kalem {i}"))
                .discount_percent(dec!(5))
                .tax("KDV", "0015", dec!(20))
                .build(),
        );
    }
    builder.build().unwrap()
}

fn bench_render(c: &mut Criterion) {
    let small = invoice(1);
    let large = invoice(100);
    let options = RenderOptions::default();

    c.bench_function("ubl_render_1_line", |b| {
        b.iter(|| ubl::to_ubl_xml(black_box(&small), &options).unwrap())
    });
    c.bench_function("ubl_render_100_lines", |b| {
        b.iter(|| ubl::to_ubl_xml(black_box(&large), &options).unwrap())
    });
}

fn bench_validate(c: &mut Criterion) {
    let inv = invoice(100);
    c.bench_function("validate_100_lines", |b| {
        b.iter(|| validate_invoice(black_box(&inv)))
    });
}

criterion_group!(benches, bench_render, bench_validate);
criterion_main!(benches);
