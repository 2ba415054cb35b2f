//! `ecotip-core` — shared types for the EcoTip reminder service.
//!
//! Holds everything the other crates agree on: the layered configuration
//! ([`config::EcotipConfig`]), the tip catalog with its day-of-year rotation
//! ([`tips::TipCatalog`]), and the [`delivery::TipSender`] trait that
//! decouples the scheduler from the messaging transport.

pub mod config;
pub mod delivery;
pub mod error;
pub mod tips;

pub use config::EcotipConfig;
pub use delivery::{DeliveryError, TipSender};
pub use error::{EcotipError, Result};
pub use tips::TipCatalog;
