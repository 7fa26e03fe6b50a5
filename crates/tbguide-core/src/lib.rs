//! # TbGuide Core
//!
//! Shared foundation for the TbGuide retrieval service: configuration,
//! the error taxonomy, and the domain types every other crate speaks in
//! (chunks, table rows, request/response shapes).

pub mod config;
pub mod error;
pub mod types;

pub use config::TbGuideConfig;
pub use error::{Result, TbGuideError};
