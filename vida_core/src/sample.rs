//! Built-in sample inventory.
//!
//! Seed data served when a snapshot key is missing or unusable, so a fresh
//! install starts with a populated ledger.

use crate::types::*;
use chrono::NaiveDate;
use once_cell::sync::Lazy;

/// Cached seed collections - built once and cloned on demand
static SAMPLE_MEDICATIONS: Lazy<Vec<Medication>> = Lazy::new(build_sample_medications);
static SAMPLE_ENTRIES: Lazy<Vec<StockEntry>> = Lazy::new(build_sample_entries);
static SAMPLE_EXITS: Lazy<Vec<StockExit>> = Lazy::new(build_sample_exits);

pub fn sample_medications() -> Vec<Medication> {
    SAMPLE_MEDICATIONS.clone()
}

pub fn sample_entries() -> Vec<StockEntry> {
    SAMPLE_ENTRIES.clone()
}

pub fn sample_exits() -> Vec<StockExit> {
    SAMPLE_EXITS.clone()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid seed date")
}

fn build_sample_medications() -> Vec<Medication> {
    vec![
        Medication {
            id: 1,
            name: "Paracetamol 500mg".into(),
            lot: "LOT001".into(),
            expiry: date(2024, 12, 15),
            manufacturer: "PharmaCorp".into(),
            category: "Analgesic".into(),
            stock: 150,
        },
        Medication {
            id: 2,
            name: "Amoxicillin 250mg".into(),
            lot: "LOT002".into(),
            expiry: date(2024, 8, 20),
            manufacturer: "MediLab".into(),
            category: "Antibiotic".into(),
            stock: 25,
        },
        Medication {
            id: 3,
            name: "Ibuprofen 400mg".into(),
            lot: "LOT003".into(),
            expiry: date(2025, 3, 10),
            manufacturer: "HealthGen".into(),
            category: "Anti-inflammatory".into(),
            stock: 80,
        },
        Medication {
            id: 4,
            name: "Metformin 850mg".into(),
            lot: "LOT004".into(),
            expiry: date(2024, 9, 5),
            manufacturer: "DiabetCare".into(),
            category: "Antidiabetic".into(),
            stock: 5,
        },
        Medication {
            id: 5,
            name: "Lisinopril 10mg".into(),
            lot: "LOT005".into(),
            expiry: date(2025, 1, 30),
            manufacturer: "CardioMed".into(),
            category: "ACE Inhibitor".into(),
            stock: 120,
        },
    ]
}

fn build_sample_entries() -> Vec<StockEntry> {
    vec![
        StockEntry {
            id: 1,
            medication: "Paracetamol 500mg".into(),
            lot: "LOT001".into(),
            date: date(2024, 6, 1),
            supplier: "MedSupply Co.".into(),
            quantity: 100,
        },
        StockEntry {
            id: 2,
            medication: "Amoxicillin 250mg".into(),
            lot: "LOT002".into(),
            date: date(2024, 6, 2),
            supplier: "PharmaDist".into(),
            quantity: 50,
        },
        StockEntry {
            id: 3,
            medication: "Ibuprofen 400mg".into(),
            lot: "LOT003".into(),
            date: date(2024, 6, 3),
            supplier: "HealthSource".into(),
            quantity: 75,
        },
    ]
}

fn build_sample_exits() -> Vec<StockExit> {
    vec![
        StockExit {
            id: 1,
            medication: "Paracetamol 500mg".into(),
            date: date(2024, 6, 4),
            reason: ExitReason::Prescription,
            responsible: "Dr. Silva".into(),
            quantity: 10,
            notes: None,
        },
        StockExit {
            id: 2,
            medication: "Amoxicillin 250mg".into(),
            date: date(2024, 6, 5),
            reason: ExitReason::HospitalTransfer,
            responsible: "Nurse Santos".into(),
            quantity: 25,
            notes: None,
        },
        StockExit {
            id: 3,
            medication: "Ibuprofen 400mg".into(),
            date: date(2024, 6, 6),
            reason: ExitReason::PatientRequest,
            responsible: "Pharmacist Costa".into(),
            quantity: 5,
            notes: None,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn sample_ids_are_unique_per_collection() {
        let med_ids: HashSet<_> = sample_medications().iter().map(|m| m.id).collect();
        assert_eq!(med_ids.len(), sample_medications().len());

        let entry_ids: HashSet<_> = sample_entries().iter().map(|e| e.id).collect();
        assert_eq!(entry_ids.len(), sample_entries().len());

        let exit_ids: HashSet<_> = sample_exits().iter().map(|e| e.id).collect();
        assert_eq!(exit_ids.len(), sample_exits().len());
    }

    #[test]
    fn sample_movements_reference_sample_medications() {
        let names: HashSet<_> = sample_medications()
            .into_iter()
            .map(|m| m.name)
            .collect();

        for entry in sample_entries() {
            assert!(names.contains(&entry.medication));
        }
        for exit in sample_exits() {
            assert!(names.contains(&exit.medication));
        }
    }
}
