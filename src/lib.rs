//! # SerdiPay Payment Core
//!
//! Reusable amount-resolution, fee, and validation logic shared by the
//! wallet's payment forms (pack purchase, renewal, withdrawal, funds
//! transfer). The backend executes the actual financial operations; this
//! crate mirrors the math for display and pre-flight validation, guards
//! submission, and assembles the payloads the backend endpoints expect.
//!
//! Each form opens its own [`api::resolver::PaymentSession`] with an
//! injected [`services::PaymentBackend`]; nothing here is a singleton.

pub mod api;
pub mod config;
pub mod consts;
pub mod errors;
pub mod logger;
pub mod models;
pub mod services;
pub mod utils;
