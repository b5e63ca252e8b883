//! JSON snapshot persistence with file locking.
//!
//! The durable store is four independently keyed JSON files in the data
//! directory: `medications.json`, `entries.json`, `exits.json`,
//! `settings.json`. Each key loads on its own; a missing, unreadable,
//! corrupt or empty-array value falls back to the built-in samples
//! (collections) or defaults (settings) and never fails startup. Saves
//! rewrite a key in full, atomically (temp file, fsync, rename) under an
//! exclusive lock.

use crate::{sample, Error, Inventory, Result, ThresholdSettings};
use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

const MEDICATIONS_KEY: &str = "medications.json";
const ENTRIES_KEY: &str = "entries.json";
const EXITS_KEY: &str = "exits.json";
const SETTINGS_KEY: &str = "settings.json";

/// Key-value snapshot store over a data directory
#[derive(Clone, Debug)]
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    // ------------------------------------------------------------------
    // Load (tolerant, never fails)
    // ------------------------------------------------------------------

    /// Load the three ledger collections, each key independently falling
    /// back to sample data when unusable
    pub fn load_inventory(&self) -> Inventory {
        let medications =
            self.load_collection(MEDICATIONS_KEY, sample::sample_medications);
        let entries = self.load_collection(ENTRIES_KEY, sample::sample_entries);
        let exits = self.load_collection(EXITS_KEY, sample::sample_exits);
        Inventory::new(medications, entries, exits)
    }

    /// Load threshold settings, falling back to defaults when unusable
    pub fn load_settings(&self) -> ThresholdSettings {
        let path = self.dir.join(SETTINGS_KEY);
        match read_locked(&path) {
            Ok(Some(contents)) => match serde_json::from_str(&contents) {
                Ok(settings) => {
                    tracing::debug!("Loaded settings from {:?}", path);
                    settings
                }
                Err(e) => {
                    tracing::warn!(
                        "Failed to parse {:?}: {}. Using default settings.",
                        path,
                        e
                    );
                    ThresholdSettings::default()
                }
            },
            Ok(None) => {
                tracing::info!("No settings snapshot at {:?}, using defaults", path);
                ThresholdSettings::default()
            }
            Err(e) => {
                tracing::warn!(
                    "Unable to read {:?}: {}. Using default settings.",
                    path,
                    e
                );
                ThresholdSettings::default()
            }
        }
    }

    fn load_collection<T: DeserializeOwned>(
        &self,
        key: &str,
        fallback: fn() -> Vec<T>,
    ) -> Vec<T> {
        let path = self.dir.join(key);
        match read_locked(&path) {
            Ok(Some(contents)) => match serde_json::from_str::<Vec<T>>(&contents) {
                Ok(items) if !items.is_empty() => {
                    tracing::debug!("Loaded {} items from {:?}", items.len(), path);
                    items
                }
                Ok(_) => {
                    // Only non-empty arrays are accepted as stored state
                    tracing::warn!("{:?} holds an empty array, using sample data", path);
                    fallback()
                }
                Err(e) => {
                    tracing::warn!("Failed to parse {:?}: {}. Using sample data.", path, e);
                    fallback()
                }
            },
            Ok(None) => {
                tracing::info!("No snapshot at {:?}, using sample data", path);
                fallback()
            }
            Err(e) => {
                tracing::warn!("Unable to read {:?}: {}. Using sample data.", path, e);
                fallback()
            }
        }
    }

    // ------------------------------------------------------------------
    // Save (full rewrite per key, atomic)
    // ------------------------------------------------------------------

    /// Serialize and write all three collections in full
    pub fn save_inventory(&self, inventory: &Inventory) -> Result<()> {
        self.write_key(MEDICATIONS_KEY, &inventory.medications())?;
        self.write_key(ENTRIES_KEY, &inventory.entries())?;
        self.write_key(EXITS_KEY, &inventory.exits())?;
        Ok(())
    }

    pub fn save_settings(&self, settings: &ThresholdSettings) -> Result<()> {
        self.write_key(SETTINGS_KEY, settings)
    }

    fn write_key<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        write_atomic(&self.dir, key, value)
            .map_err(|e| Error::Snapshot(format!("failed to write {key}: {e}")))
    }
}

/// Read a whole file under a shared lock. `Ok(None)` when it doesn't exist.
fn read_locked(path: &Path) -> std::io::Result<Option<String>> {
    if !path.exists() {
        return Ok(None);
    }

    let file = File::open(path)?;
    file.lock_shared()?;

    let mut contents = String::new();
    let mut reader = std::io::BufReader::new(&file);
    let read_result = reader.read_to_string(&mut contents);
    file.unlock()?;
    read_result?;

    Ok(Some(contents))
}

/// Atomically replace `dir/key`:
/// 1. Write to a locked temp file in the same directory
/// 2. Sync to disk
/// 3. Rename over the original
fn write_atomic<T: Serialize>(dir: &Path, key: &str, value: &T) -> Result<()> {
    std::fs::create_dir_all(dir)?;

    let temp = NamedTempFile::new_in(dir)?;
    temp.as_file().lock_exclusive()?;

    {
        let mut writer = std::io::BufWriter::new(temp.as_file());
        let contents = serde_json::to_string(value)?;
        writer.write_all(contents.as_bytes())?;
        writer.flush()?;
    }

    temp.as_file().sync_all()?;
    temp.as_file().unlock()?;

    temp.persist(dir.join(key)).map_err(|e| Error::Io(e.error))?;

    tracing::debug!("Saved snapshot key {key}");
    Ok(())
}
