//! Core domain types for the Vida inventory system.
//!
//! This module defines the fundamental types used throughout the system:
//! - Medication records and their stock counts
//! - Stock entries (receipts) and exits (disbursements)
//! - Exit reasons
//! - Classification status labels

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ============================================================================
// Inventory Records
// ============================================================================

/// A medication held in inventory.
///
/// `stock` is an eagerly maintained running total: entries and exits adjust
/// it when they are recorded, and it is never recomputed from history.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Medication {
    pub id: u32,
    pub name: String,
    pub lot: String,
    pub expiry: NaiveDate,
    pub manufacturer: String,
    pub category: String,
    pub stock: u32,
}

/// A recorded stock receipt.
///
/// `medication` is a soft reference: it names a medication but carries no
/// integrity guarantee. Renaming or deleting the medication orphans the entry.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct StockEntry {
    pub id: u32,
    pub medication: String,
    pub lot: String,
    pub date: NaiveDate,
    pub supplier: String,
    pub quantity: u32,
}

/// A recorded stock disbursement.
///
/// `date` is stamped at creation time and never replaced by an edit.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct StockExit {
    pub id: u32,
    pub medication: String,
    pub date: NaiveDate,
    pub reason: ExitReason,
    pub responsible: String,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Why stock left the inventory. The set is closed.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExitReason {
    Prescription,
    HospitalTransfer,
    PatientRequest,
    Expired,
    Damaged,
}

impl ExitReason {
    /// Parse a reason from user input. Accepts kebab- and snake-case.
    /// Returns `None` for anything outside the closed set.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "prescription" => Some(ExitReason::Prescription),
            "hospital_transfer" => Some(ExitReason::HospitalTransfer),
            "patient_request" => Some(ExitReason::PatientRequest),
            "expired" => Some(ExitReason::Expired),
            "damaged" => Some(ExitReason::Damaged),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ExitReason::Prescription => "prescription",
            ExitReason::HospitalTransfer => "hospital-transfer",
            ExitReason::PatientRequest => "patient-request",
            ExitReason::Expired => "expired",
            ExitReason::Damaged => "damaged",
        }
    }
}

// ============================================================================
// Classification Labels
// ============================================================================

/// Stock-level classification against the configured thresholds
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    Critical,
    Low,
    Good,
}

impl StockStatus {
    pub fn label(&self) -> &'static str {
        match self {
            StockStatus::Critical => "critical",
            StockStatus::Low => "low",
            StockStatus::Good => "good",
        }
    }
}

/// Expiry-proximity classification against the configured thresholds
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExpiryStatus {
    Critical,
    Warning,
    Good,
}

impl ExpiryStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ExpiryStatus::Critical => "critical",
            ExpiryStatus::Warning => "warning",
            ExpiryStatus::Good => "good",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_reason_parses_kebab_and_snake() {
        assert_eq!(
            ExitReason::parse("hospital-transfer"),
            Some(ExitReason::HospitalTransfer)
        );
        assert_eq!(
            ExitReason::parse("patient_request"),
            Some(ExitReason::PatientRequest)
        );
        assert_eq!(
            ExitReason::parse("Prescription"),
            Some(ExitReason::Prescription)
        );
    }

    #[test]
    fn exit_reason_rejects_unknown() {
        assert_eq!(ExitReason::parse("donation"), None);
        assert_eq!(ExitReason::parse(""), None);
    }

    #[test]
    fn exit_serde_skips_absent_notes() {
        let exit = StockExit {
            id: 1,
            medication: "Paracetamol 500mg".into(),
            date: NaiveDate::from_ymd_opt(2024, 6, 4).unwrap(),
            reason: ExitReason::Prescription,
            responsible: "Dr. Silva".into(),
            quantity: 10,
            notes: None,
        };

        let json = serde_json::to_string(&exit).unwrap();
        assert!(!json.contains("notes"));

        let back: StockExit = serde_json::from_str(&json).unwrap();
        assert_eq!(back, exit);
    }
}
