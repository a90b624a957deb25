//! Core domain model for touchline.
//!
//! This crate defines the canonical club and fixture records published to
//! the website, the fixtures provider's JSON:API payloads, the validators
//! that guard both, and the JSON artifact store shared by the crawl and
//! sync stages.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod error;
pub mod model;
pub mod provider;
pub mod store;
pub mod validate;

pub use error::{Error, Issue, Result, ValidationError};
pub use validate::Validate;
