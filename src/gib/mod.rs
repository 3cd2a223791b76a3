//! GİB taxpayer-registry integration.
//!
//! Secondary protocol boundary of the crate: a SOAP 1.1 client that
//! authenticates with corporate code + login + password, imports the
//! taxpayer registry incrementally into a caller-provided
//! [`TaxpayerStore`], and checks single tax ids.
//!
//! # Example
//!
//! ```no_run
//! use efatura::core::IntegrationConfig;
//! use efatura::gib::{GibClient, TaxpayerRecord};
//!
//! # async fn run(config: IntegrationConfig) -> Result<(), efatura::EfaturaError> {
//! let client = GibClient::from_config(&config)?;
//! let ticket = client.authentication_ticket().await?;
//! let mut store: Vec<TaxpayerRecord> = Vec::new();
//! let start = chrono::NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
//! let imported = client.import_taxpayer_list(&ticket, start, &mut store).await?;
//! println!("{imported} taxpayer records imported");
//! # Ok(())
//! # }
//! ```

mod client;
mod taxpayer;

pub use client::GibClient;
pub use taxpayer::{TaxpayerCheck, TaxpayerRecord, TaxpayerStatus, TaxpayerStore};
