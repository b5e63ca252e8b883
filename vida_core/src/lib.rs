#![forbid(unsafe_code)]

//! Core domain model and business logic for the Vida pharmacy inventory
//! system.
//!
//! This crate provides:
//! - Domain types (medications, stock entries, stock exits)
//! - The inventory ledger store and its mutation operations
//! - Stock/expiry classification against tunable thresholds
//! - Transient notifications with timed expiry
//! - Snapshot persistence and CSV reporting

pub mod types;
pub mod error;
pub mod settings;
pub mod classify;
pub mod config;
pub mod logging;
pub mod sample;
pub mod store;
pub mod snapshot;
pub mod notify;
pub mod report;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use settings::ThresholdSettings;
pub use classify::{days_until_expiry, expiry_status, is_expired, stock_status};
pub use config::Config;
pub use store::{
    EntryInput, ExitInput, Inventory, InventorySummary, MedicationInput, StatusRow,
};
pub use snapshot::SnapshotStore;
pub use notify::{Notification, NotificationCenter, NotificationKind, NOTIFICATION_TTL_MS};
pub use report::write_inventory_report;
