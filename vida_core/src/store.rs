//! The inventory ledger store.
//!
//! [`Inventory`] is the single state container for the three collections
//! (medications, entries, exits). Every mutation goes through its operation
//! set; the collections are never spliced directly, which keeps the stock
//! invariants enforced in one place.
//!
//! Stock is an eagerly maintained running total: recording an entry or exit
//! adjusts the referenced medication's stock at creation time, and nothing
//! else ever recomputes it. Editing or deleting a movement deliberately does
//! NOT reverse its original stock effect.

use crate::{classify, Error, ExitReason, ExpiryStatus, Result, StockStatus, ThresholdSettings};
use crate::{Medication, StockEntry, StockExit};
use chrono::{DateTime, NaiveDate, Utc};

// ============================================================================
// Operation Inputs
// ============================================================================

/// Raw medication form fields, prior to coercion. All required.
#[derive(Clone, Debug, Default)]
pub struct MedicationInput {
    pub name: String,
    pub lot: String,
    pub expiry: String,
    pub manufacturer: String,
    pub category: String,
    pub stock: String,
}

/// Raw entry form fields, prior to coercion. All required.
#[derive(Clone, Debug, Default)]
pub struct EntryInput {
    pub medication: String,
    pub lot: String,
    pub date: String,
    pub supplier: String,
    pub quantity: String,
}

/// Raw exit form fields, prior to coercion. `notes` is optional (empty =
/// absent); the exit date is stamped by the store, not supplied.
#[derive(Clone, Debug, Default)]
pub struct ExitInput {
    pub medication: String,
    pub quantity: String,
    pub reason: String,
    pub responsible: String,
    pub notes: String,
}

struct MedicationFields {
    name: String,
    lot: String,
    expiry: NaiveDate,
    manufacturer: String,
    category: String,
    stock: u32,
}

struct EntryFields {
    medication: String,
    lot: String,
    date: NaiveDate,
    supplier: String,
    quantity: u32,
}

struct ExitFields {
    medication: String,
    quantity: u32,
    reason: ExitReason,
    responsible: String,
    notes: Option<String>,
}

fn require<'a>(field: &str, value: &'a str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::Validation(format!("{field} is required")));
    }
    Ok(trimmed)
}

/// Non-negative integer (medication stock)
fn parse_count(field: &str, value: &str) -> Result<u32> {
    require(field, value)?
        .parse::<u32>()
        .map_err(|_| Error::Validation(format!("{field} must be a non-negative integer")))
}

/// Strictly positive integer (entry/exit quantities)
fn parse_quantity(field: &str, value: &str) -> Result<u32> {
    let n = parse_count(field, value)?;
    if n == 0 {
        return Err(Error::Validation(format!("{field} must be greater than zero")));
    }
    Ok(n)
}

fn parse_date(field: &str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(require(field, value)?, "%Y-%m-%d")
        .map_err(|_| Error::Validation(format!("{field} must be a date (YYYY-MM-DD)")))
}

impl MedicationInput {
    fn validate(&self) -> Result<MedicationFields> {
        Ok(MedicationFields {
            name: require("name", &self.name)?.to_string(),
            lot: require("lot", &self.lot)?.to_string(),
            expiry: parse_date("expiry", &self.expiry)?,
            manufacturer: require("manufacturer", &self.manufacturer)?.to_string(),
            category: require("category", &self.category)?.to_string(),
            stock: parse_count("stock", &self.stock)?,
        })
    }
}

impl EntryInput {
    fn validate(&self) -> Result<EntryFields> {
        Ok(EntryFields {
            medication: require("medication", &self.medication)?.to_string(),
            lot: require("lot", &self.lot)?.to_string(),
            date: parse_date("date", &self.date)?,
            supplier: require("supplier", &self.supplier)?.to_string(),
            quantity: parse_quantity("quantity", &self.quantity)?,
        })
    }
}

impl ExitInput {
    fn validate(&self) -> Result<ExitFields> {
        let reason_raw = require("reason", &self.reason)?;
        let reason = ExitReason::parse(reason_raw).ok_or_else(|| {
            Error::Validation(format!(
                "reason '{reason_raw}' is not one of: prescription, hospital-transfer, \
                 patient-request, expired, damaged"
            ))
        })?;

        let notes = self.notes.trim();
        Ok(ExitFields {
            medication: require("medication", &self.medication)?.to_string(),
            quantity: parse_quantity("quantity", &self.quantity)?,
            reason,
            responsible: require("responsible", &self.responsible)?.to_string(),
            notes: (!notes.is_empty()).then(|| notes.to_string()),
        })
    }
}

// ============================================================================
// Queries
// ============================================================================

/// One monitoring row: a medication with its current classifications
#[derive(Clone, Debug)]
pub struct StatusRow<'a> {
    pub medication: &'a Medication,
    pub stock_status: StockStatus,
    pub expiry_status: ExpiryStatus,
    pub expired: bool,
    pub days_until_expiry: i64,
}

/// Dashboard counts
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InventorySummary {
    pub total_medications: usize,
    pub expiring_soon: usize,
    pub critical_stock: usize,
}

// ============================================================================
// Ledger Store
// ============================================================================

/// The ledger state container: medications plus the entry/exit history.
#[derive(Clone, Debug, Default)]
pub struct Inventory {
    medications: Vec<Medication>,
    entries: Vec<StockEntry>,
    exits: Vec<StockExit>,
}

/// Next id under the max+1 scheme: deletion gaps are never reused
fn next_id(ids: impl Iterator<Item = u32>) -> u32 {
    ids.max().map_or(1, |m| m + 1)
}

impl Inventory {
    pub fn new(
        medications: Vec<Medication>,
        entries: Vec<StockEntry>,
        exits: Vec<StockExit>,
    ) -> Self {
        Self {
            medications,
            entries,
            exits,
        }
    }

    pub fn medications(&self) -> &[Medication] {
        &self.medications
    }

    pub fn entries(&self) -> &[StockEntry] {
        &self.entries
    }

    pub fn exits(&self) -> &[StockExit] {
        &self.exits
    }

    // ------------------------------------------------------------------
    // Medication operations
    // ------------------------------------------------------------------

    /// Validate, assign a new id, append, and return the record
    pub fn add_medication(&mut self, input: &MedicationInput) -> Result<Medication> {
        let fields = input.validate()?;
        let id = next_id(self.medications.iter().map(|m| m.id));

        let medication = Medication {
            id,
            name: fields.name,
            lot: fields.lot,
            expiry: fields.expiry,
            manufacturer: fields.manufacturer,
            category: fields.category,
            stock: fields.stock,
        };

        tracing::info!("Added medication #{id} '{}'", medication.name);
        self.medications.push(medication.clone());
        Ok(medication)
    }

    /// Replace every field of the medication with id `id`, preserving the id.
    ///
    /// The supplied stock overwrites the running total directly; this is the
    /// manual-correction path and is independent of the entry/exit history.
    pub fn update_medication(&mut self, id: u32, input: &MedicationInput) -> Result<Medication> {
        let fields = input.validate()?;
        let medication = self
            .medications
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| Error::NotFound(format!("medication #{id}")))?;

        medication.name = fields.name;
        medication.lot = fields.lot;
        medication.expiry = fields.expiry;
        medication.manufacturer = fields.manufacturer;
        medication.category = fields.category;
        medication.stock = fields.stock;

        tracing::info!("Updated medication #{id}");
        Ok(medication.clone())
    }

    /// Remove the medication. Entries and exits referencing it by name are
    /// left in place (orphaned soft references).
    pub fn delete_medication(&mut self, id: u32) -> Result<Medication> {
        let idx = self
            .medications
            .iter()
            .position(|m| m.id == id)
            .ok_or_else(|| Error::NotFound(format!("medication #{id}")))?;

        let removed = self.medications.remove(idx);
        tracing::info!("Deleted medication #{id} '{}'", removed.name);
        Ok(removed)
    }

    // ------------------------------------------------------------------
    // Entry operations
    // ------------------------------------------------------------------

    /// Record a stock receipt. If a medication matches the entry's name
    /// exactly, its stock increases by the entry quantity; otherwise the
    /// adjustment is skipped and the record is still created.
    pub fn record_entry(&mut self, input: &EntryInput) -> Result<StockEntry> {
        let fields = input.validate()?;
        let id = next_id(self.entries.iter().map(|e| e.id));

        let entry = StockEntry {
            id,
            medication: fields.medication,
            lot: fields.lot,
            date: fields.date,
            supplier: fields.supplier,
            quantity: fields.quantity,
        };

        self.entries.push(entry.clone());
        self.apply_entry_to_stock(&entry);

        tracing::info!(
            "Recorded entry #{id}: +{} '{}'",
            entry.quantity,
            entry.medication
        );
        Ok(entry)
    }

    /// Replace every field of the entry. Stock is NOT recomputed: the
    /// original quantity already moved stock at creation time.
    pub fn edit_entry(&mut self, id: u32, input: &EntryInput) -> Result<StockEntry> {
        let fields = input.validate()?;
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| Error::NotFound(format!("entry #{id}")))?;

        entry.medication = fields.medication;
        entry.lot = fields.lot;
        entry.date = fields.date;
        entry.supplier = fields.supplier;
        entry.quantity = fields.quantity;

        tracing::info!("Edited entry #{id} (stock untouched)");
        Ok(entry.clone())
    }

    /// Remove the entry record only; the stock increase it caused stands.
    pub fn delete_entry(&mut self, id: u32) -> Result<StockEntry> {
        let idx = self
            .entries
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| Error::NotFound(format!("entry #{id}")))?;

        let removed = self.entries.remove(idx);
        tracing::info!("Deleted entry #{id} (stock untouched)");
        Ok(removed)
    }

    // ------------------------------------------------------------------
    // Exit operations
    // ------------------------------------------------------------------

    /// Record a stock disbursement, dated to `now`'s UTC calendar date. If a
    /// medication matches by name its stock decreases by the exit quantity,
    /// clamped at 0; otherwise the adjustment is skipped.
    pub fn record_exit(&mut self, input: &ExitInput, now: DateTime<Utc>) -> Result<StockExit> {
        let fields = input.validate()?;
        let id = next_id(self.exits.iter().map(|e| e.id));

        let exit = StockExit {
            id,
            medication: fields.medication,
            date: now.date_naive(),
            reason: fields.reason,
            responsible: fields.responsible,
            quantity: fields.quantity,
            notes: fields.notes,
        };

        self.exits.push(exit.clone());
        self.apply_exit_to_stock(&exit);

        tracing::info!(
            "Recorded exit #{id}: -{} '{}' ({})",
            exit.quantity,
            exit.medication,
            exit.reason.label()
        );
        Ok(exit)
    }

    /// Replace the exit's medication, reason, responsible and quantity. The
    /// creation-time date and any stored notes are kept, and stock is NOT
    /// recomputed.
    pub fn edit_exit(&mut self, id: u32, input: &ExitInput) -> Result<StockExit> {
        let fields = input.validate()?;
        let exit = self
            .exits
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| Error::NotFound(format!("exit #{id}")))?;

        exit.medication = fields.medication;
        exit.reason = fields.reason;
        exit.responsible = fields.responsible;
        exit.quantity = fields.quantity;

        tracing::info!("Edited exit #{id} (date, notes and stock untouched)");
        Ok(exit.clone())
    }

    /// Remove the exit record only; the stock decrease it caused stands.
    pub fn delete_exit(&mut self, id: u32) -> Result<StockExit> {
        let idx = self
            .exits
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| Error::NotFound(format!("exit #{id}")))?;

        let removed = self.exits.remove(idx);
        tracing::info!("Deleted exit #{id} (stock untouched)");
        Ok(removed)
    }

    // ------------------------------------------------------------------
    // Stock application (soft reference by exact name)
    // ------------------------------------------------------------------

    fn apply_entry_to_stock(&mut self, entry: &StockEntry) {
        match self
            .medications
            .iter_mut()
            .find(|m| m.name == entry.medication)
        {
            Some(med) => {
                med.stock = med.stock.saturating_add(entry.quantity);
                tracing::debug!("Stock of '{}' now {}", med.name, med.stock);
            }
            None => {
                tracing::debug!(
                    "No medication named '{}'; entry recorded without stock adjustment",
                    entry.medication
                );
            }
        }
    }

    fn apply_exit_to_stock(&mut self, exit: &StockExit) {
        match self
            .medications
            .iter_mut()
            .find(|m| m.name == exit.medication)
        {
            Some(med) => {
                med.stock = med.stock.saturating_sub(exit.quantity);
                tracing::debug!("Stock of '{}' now {}", med.name, med.stock);
            }
            None => {
                tracing::debug!(
                    "No medication named '{}'; exit recorded without stock adjustment",
                    exit.medication
                );
            }
        }
    }

    // ------------------------------------------------------------------
    // Read-only queries
    // ------------------------------------------------------------------

    pub fn find_medication(&self, id: u32) -> Option<&Medication> {
        self.medications.iter().find(|m| m.id == id)
    }

    /// Case-insensitive substring search on medication names
    pub fn search(&self, term: &str) -> Vec<&Medication> {
        let needle = term.to_lowercase();
        self.medications
            .iter()
            .filter(|m| m.name.to_lowercase().contains(&needle))
            .collect()
    }

    pub fn in_category(&self, category: &str) -> Vec<&Medication> {
        self.medications
            .iter()
            .filter(|m| m.category == category)
            .collect()
    }

    /// Distinct categories, sorted
    pub fn categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = self
            .medications
            .iter()
            .map(|m| m.category.clone())
            .collect();
        categories.sort();
        categories.dedup();
        categories
    }

    /// Medications whose stock classification is critical
    pub fn low_stock(&self, settings: &ThresholdSettings) -> Vec<&Medication> {
        self.medications
            .iter()
            .filter(|m| classify::stock_status(m.stock, settings) == StockStatus::Critical)
            .collect()
    }

    /// Medications whose expiry classification is critical
    pub fn expiring_soon(
        &self,
        now: DateTime<Utc>,
        settings: &ThresholdSettings,
    ) -> Vec<&Medication> {
        self.medications
            .iter()
            .filter(|m| classify::expiry_status(m.expiry, now, settings) == ExpiryStatus::Critical)
            .collect()
    }

    /// Full monitoring table: every medication with both classifications and
    /// the layered expired badge
    pub fn status_report(
        &self,
        now: DateTime<Utc>,
        settings: &ThresholdSettings,
    ) -> Vec<StatusRow<'_>> {
        self.medications
            .iter()
            .map(|m| StatusRow {
                medication: m,
                stock_status: classify::stock_status(m.stock, settings),
                expiry_status: classify::expiry_status(m.expiry, now, settings),
                expired: classify::is_expired(m.expiry, now),
                days_until_expiry: classify::days_until_expiry(m.expiry, now),
            })
            .collect()
    }

    /// Dashboard counts
    pub fn summary(&self, now: DateTime<Utc>, settings: &ThresholdSettings) -> InventorySummary {
        InventorySummary {
            total_medications: self.medications.len(),
            expiring_soon: self.expiring_soon(now, settings).len(),
            critical_stock: self.low_stock(settings).len(),
        }
    }
}
