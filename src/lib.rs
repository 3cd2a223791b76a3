//! # efatura
//!
//! Turkish e-invoicing (e-Fatura) library: UBL-TR 1.2 XML generation by
//! template merge, plus a client for the GİB taxpayer-registry SOAP service.
//!
//! All monetary values use [`rust_decimal::Decimal`] — never floating point.
//! Generated documents follow the UBL 2.1 Invoice schema with the Turkish
//! customization (`TR1.2`): profile and invoice-type codes, VKN/TCKN party
//! identification, amount-in-words document references, and an optional
//! embedded XSLT stylesheet for human-readable rendering.
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use efatura::core::*;
//! use rust_decimal_macros::dec;
//!
//! let invoice = InvoiceBuilder::new("INV/001", NaiveDate::from_ymd_opt(2024, 6, 15).unwrap())
//!     .profile(ProfileType::TicariFatura)
//!     .type_kind(InvoiceTypeKind::Satis)
//!     .supplier(PartyBuilder::new("ACME A.Ş.", AddressBuilder::new("İstanbul", "Türkiye").build())
//!         .tax_id("1234567890", true)
//!         .build())
//!     .customer(PartyBuilder::new("Müşteri Ltd.", AddressBuilder::new("Ankara", "Türkiye").build())
//!         .tax_id("9876543210", true)
//!         .build())
//!     .add_line(LineBuilder::new(dec!(2), dec!(100))
//!         .description("Danışmanlık")
//!         .tax("KDV", "0015", dec!(20))
//!         .build())
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(invoice.total, dec!(240.00));
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` (default) | Invoice types, validation, amounts, numbering |
//! | `ubl` | UBL-TR 1.2 XML generation (template merge) |
//! | `gib` | GİB taxpayer registry SOAP client |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "ubl")]
pub mod ubl;

#[cfg(feature = "gib")]
pub mod gib;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
