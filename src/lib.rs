//! Library crate for customer-manager.
//!
//! This crate exposes the building blocks of the TUI:
//! - Application state and update loop (`app`)
//! - HTTP client and wire model for the customer API (`api`)
//! - Form state, enumerated options and validation (`form`)
//! - UI rendering and widgets (`ui`)
//!
//! It is used by the `customer-manager` binary and by tests.
#![doc = include_str!("../README.md")]
#![deny(rustdoc::broken_intra_doc_links)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod api;
pub mod app;
pub mod form;
pub mod ui;

// Re-export commonly used items at the crate root for convenience
/// The customer record and the client that manages it remotely.
pub use api::{ApiClient, Customer};
