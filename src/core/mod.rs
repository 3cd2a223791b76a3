//! Core invoice types, validation, and formatting.
//!
//! This module provides the foundational types for Turkish e-invoicing:
//! the invoice aggregate consumed by the UBL generator, the GİB profile and
//! invoice-type code sets, amount formatting, and document numbering.

pub mod amounts;
mod builder;
mod config;
mod currencies;
mod error;
mod numbering;
mod types;
pub mod units;
mod validation;

pub use builder::*;
pub use config::*;
pub use currencies::{decimal_scale, is_known_currency_code};
pub use error::*;
pub use numbering::*;
pub use types::*;
pub use units::UNIT_PIECE;
pub use validation::*;
