//! Parcel API Library
//!
//! HTTP handlers, request parsing and application setup for the upload service.

mod api_doc;
mod handlers;
mod telemetry;
mod utils;

pub mod error;
pub mod services;
pub mod setup;
pub mod state;

pub use error::{ErrorResponse, HttpAppError};
