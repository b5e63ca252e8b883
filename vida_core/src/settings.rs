//! Tunable alert thresholds and notification preferences.
//!
//! Settings are persisted as one key of the JSON snapshot (see
//! [`crate::snapshot`]). Partial objects deserialize with the missing fields
//! filled from defaults.

use serde::{Deserialize, Serialize};

/// Alert thresholds plus notification-channel preferences.
///
/// `stock_critical < stock_low` and `expiry_critical_days <
/// expiry_warning_days` by convention; a crossed configuration is accepted
/// and simply makes the middle band unreachable.
///
/// The channel booleans and contact strings are carried for an external
/// dispatch collaborator; nothing in this crate reads them.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ThresholdSettings {
    /// Stock at or below this level is critical
    #[serde(default = "default_stock_critical")]
    pub stock_critical: u32,

    /// Stock at or below this level (but above critical) is low
    #[serde(default = "default_stock_low")]
    pub stock_low: u32,

    /// Days until expiry at or below this is critical
    #[serde(default = "default_expiry_critical_days")]
    pub expiry_critical_days: i64,

    /// Days until expiry at or below this (but above critical) is a warning
    #[serde(default = "default_expiry_warning_days")]
    pub expiry_warning_days: i64,

    #[serde(default = "default_true")]
    pub email_notifications: bool,

    #[serde(default)]
    pub whatsapp_notifications: bool,

    #[serde(default = "default_true")]
    pub daily_summary: bool,

    #[serde(default)]
    pub email_address: String,

    #[serde(default)]
    pub whatsapp_number: String,
}

impl Default for ThresholdSettings {
    fn default() -> Self {
        Self {
            stock_critical: default_stock_critical(),
            stock_low: default_stock_low(),
            expiry_critical_days: default_expiry_critical_days(),
            expiry_warning_days: default_expiry_warning_days(),
            email_notifications: true,
            whatsapp_notifications: false,
            daily_summary: true,
            email_address: String::new(),
            whatsapp_number: String::new(),
        }
    }
}

// Default value functions
fn default_stock_critical() -> u32 {
    10
}

fn default_stock_low() -> u32 {
    30
}

fn default_expiry_critical_days() -> i64 {
    30
}

fn default_expiry_warning_days() -> i64 {
    90
}

fn default_true() -> bool {
    true
}
