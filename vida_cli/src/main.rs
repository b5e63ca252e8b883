use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use vida_core::*;

#[derive(Parser)]
#[command(name = "vida")]
#[command(about = "Pharmacy inventory ledger", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage medications
    Med {
        #[command(subcommand)]
        command: MedCommands,
    },

    /// Manage stock entries (receipts)
    Entry {
        #[command(subcommand)]
        command: EntryCommands,
    },

    /// Manage stock exits (disbursements)
    Exit {
        #[command(subcommand)]
        command: ExitCommands,
    },

    /// Show expiring and low-stock medications
    Alerts,

    /// Show the full monitoring table
    Status {
        /// Only show medications in this category
        #[arg(long)]
        category: Option<String>,
    },

    /// Show dashboard counts
    Summary,

    /// Export the monitoring table to a CSV file
    Export {
        /// Output path
        path: PathBuf,
    },

    /// Show or change alert thresholds
    Settings {
        #[command(subcommand)]
        command: SettingsCommands,
    },
}

/// Raw medication form fields. Left empty, a field fails validation in the
/// engine rather than here.
#[derive(Args, Clone)]
struct MedFields {
    #[arg(long, default_value = "")]
    name: String,
    #[arg(long, default_value = "")]
    lot: String,
    /// Expiry date (YYYY-MM-DD)
    #[arg(long, default_value = "")]
    expiry: String,
    #[arg(long, default_value = "")]
    manufacturer: String,
    #[arg(long, default_value = "")]
    category: String,
    #[arg(long, default_value = "")]
    stock: String,
}

impl From<MedFields> for MedicationInput {
    fn from(f: MedFields) -> Self {
        MedicationInput {
            name: f.name,
            lot: f.lot,
            expiry: f.expiry,
            manufacturer: f.manufacturer,
            category: f.category,
            stock: f.stock,
        }
    }
}

#[derive(Args, Clone)]
struct EntryFields {
    #[arg(long, default_value = "")]
    medication: String,
    #[arg(long, default_value = "")]
    lot: String,
    /// Receipt date (YYYY-MM-DD)
    #[arg(long, default_value = "")]
    date: String,
    #[arg(long, default_value = "")]
    supplier: String,
    #[arg(long, default_value = "")]
    quantity: String,
}

impl From<EntryFields> for EntryInput {
    fn from(f: EntryFields) -> Self {
        EntryInput {
            medication: f.medication,
            lot: f.lot,
            date: f.date,
            supplier: f.supplier,
            quantity: f.quantity,
        }
    }
}

#[derive(Args, Clone)]
struct ExitFields {
    #[arg(long, default_value = "")]
    medication: String,
    #[arg(long, default_value = "")]
    quantity: String,
    /// One of: prescription, hospital-transfer, patient-request, expired, damaged
    #[arg(long, default_value = "")]
    reason: String,
    #[arg(long, default_value = "")]
    responsible: String,
    #[arg(long, default_value = "")]
    notes: String,
}

impl From<ExitFields> for ExitInput {
    fn from(f: ExitFields) -> Self {
        ExitInput {
            medication: f.medication,
            quantity: f.quantity,
            reason: f.reason,
            responsible: f.responsible,
            notes: f.notes,
        }
    }
}

#[derive(Subcommand)]
enum MedCommands {
    /// Add a new medication
    Add(MedFields),
    /// Replace every field of an existing medication
    Edit {
        id: u32,
        #[command(flatten)]
        fields: MedFields,
    },
    /// Delete a medication (its entry/exit history stays)
    Rm { id: u32 },
    /// List medications with their classifications
    List {
        /// Case-insensitive name search
        #[arg(long)]
        search: Option<String>,
        /// Only show medications in this category
        #[arg(long)]
        category: Option<String>,
    },
}

#[derive(Subcommand)]
enum EntryCommands {
    /// Record a stock receipt (increases the medication's stock)
    Add(EntryFields),
    /// Replace every field of an entry (stock is not recomputed)
    Edit {
        id: u32,
        #[command(flatten)]
        fields: EntryFields,
    },
    /// Delete an entry record (stock is not reversed)
    Rm { id: u32 },
    /// List recorded entries
    List,
}

#[derive(Subcommand)]
enum ExitCommands {
    /// Record a stock disbursement (decreases stock, floor 0)
    Add(ExitFields),
    /// Edit an exit (date and notes are kept, stock is not recomputed)
    Edit {
        id: u32,
        #[command(flatten)]
        fields: ExitFields,
    },
    /// Delete an exit record (stock is not reversed)
    Rm { id: u32 },
    /// List recorded exits
    List,
}

#[derive(Subcommand)]
enum SettingsCommands {
    /// Show the current thresholds and notification preferences
    Show,
    /// Change one or more settings
    Set {
        #[arg(long)]
        stock_critical: Option<u32>,
        #[arg(long)]
        stock_low: Option<u32>,
        #[arg(long)]
        expiry_critical_days: Option<i64>,
        #[arg(long)]
        expiry_warning_days: Option<i64>,
        #[arg(long)]
        email_notifications: Option<bool>,
        #[arg(long)]
        whatsapp_notifications: Option<bool>,
        #[arg(long)]
        daily_summary: Option<bool>,
        #[arg(long)]
        email_address: Option<String>,
        #[arg(long)]
        whatsapp_number: Option<String>,
    },
}

fn main() -> ExitCode {
    vida_core::logging::init();

    let cli = Cli::parse();
    let mut notifications = NotificationCenter::new();

    let result = run(&cli, &mut notifications);

    let code = match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err @ (Error::Validation(_) | Error::NotFound(_))) => {
            notifications.push(
                Utc::now(),
                NotificationKind::Error,
                "Error",
                err.to_string(),
            );
            ExitCode::FAILURE
        }
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    };

    render_notifications(&mut notifications);
    code
}

fn run(cli: &Cli, notifications: &mut NotificationCenter) -> Result<()> {
    let config = Config::load()?;
    let data_dir = cli
        .data_dir
        .clone()
        .unwrap_or_else(|| config.data.data_dir.clone());
    let store = SnapshotStore::new(data_dir);

    match &cli.command {
        Commands::Med { command } => cmd_med(&store, command, notifications),
        Commands::Entry { command } => cmd_entry(&store, command, notifications),
        Commands::Exit { command } => cmd_exit(&store, command, notifications),
        Commands::Alerts => cmd_alerts(&store),
        Commands::Status { category } => cmd_status(&store, category.as_deref()),
        Commands::Summary => cmd_summary(&store),
        Commands::Export { path } => cmd_export(&store, path, notifications),
        Commands::Settings { command } => cmd_settings(&store, command, notifications),
    }
}

/// Persist after a successful mutation. A write failure is a warning, never
/// a rollback: the in-memory mutation already succeeded.
fn persist_inventory(store: &SnapshotStore, inventory: &Inventory) {
    if let Err(e) = store.save_inventory(inventory) {
        tracing::warn!("Snapshot write failed, in-memory state kept: {e}");
        eprintln!("warning: could not persist snapshot: {e}");
    }
}

fn notify_success(notifications: &mut NotificationCenter, body: impl Into<String>) {
    notifications.push(Utc::now(), NotificationKind::Success, "Success", body);
}

fn render_notifications(notifications: &mut NotificationCenter) {
    let now = Utc::now();
    notifications.purge_expired(now);
    for n in notifications.active(now) {
        println!("[{}] {}: {}", n.kind.label(), n.title, n.body);
    }
}

// ----------------------------------------------------------------------
// Medications
// ----------------------------------------------------------------------

fn cmd_med(
    store: &SnapshotStore,
    command: &MedCommands,
    notifications: &mut NotificationCenter,
) -> Result<()> {
    match command {
        MedCommands::Add(fields) => {
            let mut inventory = store.load_inventory();
            let med = inventory.add_medication(&fields.clone().into())?;
            persist_inventory(store, &inventory);
            notify_success(
                notifications,
                format!("Medication '{}' added (#{}).", med.name, med.id),
            );
        }
        MedCommands::Edit { id, fields } => {
            let mut inventory = store.load_inventory();
            let med = inventory.update_medication(*id, &fields.clone().into())?;
            persist_inventory(store, &inventory);
            notify_success(notifications, format!("Medication #{} updated.", med.id));
        }
        MedCommands::Rm { id } => {
            let mut inventory = store.load_inventory();
            let med = inventory.delete_medication(*id)?;
            persist_inventory(store, &inventory);
            notify_success(notifications, format!("Medication '{}' deleted.", med.name));
        }
        MedCommands::List { search, category } => {
            let inventory = store.load_inventory();
            let settings = store.load_settings();
            let now = Utc::now();

            let mut meds: Vec<&Medication> = match search {
                Some(term) => inventory.search(term),
                None => inventory.medications().iter().collect(),
            };
            if let Some(cat) = category {
                meds.retain(|m| &m.category == cat);
            }

            println!(
                "{:<4} {:<28} {:<8} {:<12} {:<18} {:>6}  status",
                "id", "name", "lot", "expiry", "category", "stock"
            );
            for m in meds {
                let stock = stock_status(m.stock, &settings);
                let expiry = expiry_status(m.expiry, now, &settings);
                let badge = if is_expired(m.expiry, now) {
                    " [EXPIRED]"
                } else {
                    ""
                };
                println!(
                    "{:<4} {:<28} {:<8} {:<12} {:<18} {:>6}  stock:{} expiry:{}{}",
                    m.id,
                    m.name,
                    m.lot,
                    m.expiry.to_string(),
                    m.category,
                    m.stock,
                    stock.label(),
                    expiry.label(),
                    badge
                );
            }
        }
    }
    Ok(())
}

// ----------------------------------------------------------------------
// Entries
// ----------------------------------------------------------------------

fn cmd_entry(
    store: &SnapshotStore,
    command: &EntryCommands,
    notifications: &mut NotificationCenter,
) -> Result<()> {
    match command {
        EntryCommands::Add(fields) => {
            let mut inventory = store.load_inventory();
            let entry = inventory.record_entry(&fields.clone().into())?;
            persist_inventory(store, &inventory);
            notify_success(
                notifications,
                format!(
                    "Entry #{} recorded: +{} '{}'.",
                    entry.id, entry.quantity, entry.medication
                ),
            );
        }
        EntryCommands::Edit { id, fields } => {
            let mut inventory = store.load_inventory();
            let entry = inventory.edit_entry(*id, &fields.clone().into())?;
            persist_inventory(store, &inventory);
            notify_success(notifications, format!("Entry #{} updated.", entry.id));
        }
        EntryCommands::Rm { id } => {
            let mut inventory = store.load_inventory();
            let entry = inventory.delete_entry(*id)?;
            persist_inventory(store, &inventory);
            notify_success(notifications, format!("Entry #{} deleted.", entry.id));
        }
        EntryCommands::List => {
            let inventory = store.load_inventory();
            println!(
                "{:<4} {:<28} {:<8} {:<12} {:<18} {:>8}",
                "id", "medication", "lot", "date", "supplier", "quantity"
            );
            for e in inventory.entries() {
                println!(
                    "{:<4} {:<28} {:<8} {:<12} {:<18} {:>8}",
                    e.id,
                    e.medication,
                    e.lot,
                    e.date.to_string(),
                    e.supplier,
                    e.quantity
                );
            }
        }
    }
    Ok(())
}

// ----------------------------------------------------------------------
// Exits
// ----------------------------------------------------------------------

fn cmd_exit(
    store: &SnapshotStore,
    command: &ExitCommands,
    notifications: &mut NotificationCenter,
) -> Result<()> {
    match command {
        ExitCommands::Add(fields) => {
            let mut inventory = store.load_inventory();
            let exit = inventory.record_exit(&fields.clone().into(), Utc::now())?;
            persist_inventory(store, &inventory);
            notify_success(
                notifications,
                format!(
                    "Exit #{} recorded: -{} '{}'.",
                    exit.id, exit.quantity, exit.medication
                ),
            );
        }
        ExitCommands::Edit { id, fields } => {
            let mut inventory = store.load_inventory();
            let exit = inventory.edit_exit(*id, &fields.clone().into())?;
            persist_inventory(store, &inventory);
            notify_success(notifications, format!("Exit #{} updated.", exit.id));
        }
        ExitCommands::Rm { id } => {
            let mut inventory = store.load_inventory();
            let exit = inventory.delete_exit(*id)?;
            persist_inventory(store, &inventory);
            notify_success(notifications, format!("Exit #{} deleted.", exit.id));
        }
        ExitCommands::List => {
            let inventory = store.load_inventory();
            println!(
                "{:<4} {:<28} {:<12} {:<18} {:<16} {:>8}  notes",
                "id", "medication", "date", "reason", "responsible", "quantity"
            );
            for e in inventory.exits() {
                println!(
                    "{:<4} {:<28} {:<12} {:<18} {:<16} {:>8}  {}",
                    e.id,
                    e.medication,
                    e.date.to_string(),
                    e.reason.label(),
                    e.responsible,
                    e.quantity,
                    e.notes.as_deref().unwrap_or("-")
                );
            }
        }
    }
    Ok(())
}

// ----------------------------------------------------------------------
// Read-only views
// ----------------------------------------------------------------------

fn cmd_alerts(store: &SnapshotStore) -> Result<()> {
    let inventory = store.load_inventory();
    let settings = store.load_settings();
    let now = Utc::now();

    println!(
        "Expiring soon (within {} days):",
        settings.expiry_critical_days
    );
    let expiring = inventory.expiring_soon(now, &settings);
    if expiring.is_empty() {
        println!("  (none)");
    }
    for m in expiring {
        let badge = if is_expired(m.expiry, now) {
            " [EXPIRED]"
        } else {
            ""
        };
        println!("  {} - expires {}{}", m.name, m.expiry, badge);
    }

    println!();
    println!("Low stock (at or below {} units):", settings.stock_critical);
    let low = inventory.low_stock(&settings);
    if low.is_empty() {
        println!("  (none)");
    }
    for m in low {
        println!("  {} - {} units", m.name, m.stock);
    }

    Ok(())
}

fn cmd_status(store: &SnapshotStore, category: Option<&str>) -> Result<()> {
    let inventory = store.load_inventory();
    let settings = store.load_settings();
    let now = Utc::now();

    println!(
        "{:<4} {:<28} {:>6} {:<12} {:>6}  status",
        "id", "name", "stock", "expiry", "days"
    );
    for row in inventory.status_report(now, &settings) {
        if let Some(cat) = category {
            if row.medication.category != cat {
                continue;
            }
        }
        let badge = if row.expired { " [EXPIRED]" } else { "" };
        println!(
            "{:<4} {:<28} {:>6} {:<12} {:>6}  stock:{} expiry:{}{}",
            row.medication.id,
            row.medication.name,
            row.medication.stock,
            row.medication.expiry.to_string(),
            row.days_until_expiry,
            row.stock_status.label(),
            row.expiry_status.label(),
            badge
        );
    }

    Ok(())
}

fn cmd_summary(store: &SnapshotStore) -> Result<()> {
    let inventory = store.load_inventory();
    let settings = store.load_settings();
    let summary = inventory.summary(Utc::now(), &settings);

    println!("Medications:   {}", summary.total_medications);
    println!("Expiring soon: {}", summary.expiring_soon);
    println!("Low stock:     {}", summary.critical_stock);

    Ok(())
}

fn cmd_export(
    store: &SnapshotStore,
    path: &Path,
    notifications: &mut NotificationCenter,
) -> Result<()> {
    let inventory = store.load_inventory();
    let settings = store.load_settings();

    let rows = write_inventory_report(&inventory, &settings, Utc::now(), path)?;
    notify_success(
        notifications,
        format!("Exported {} rows to {}.", rows, path.display()),
    );
    Ok(())
}

// ----------------------------------------------------------------------
// Settings
// ----------------------------------------------------------------------

fn cmd_settings(
    store: &SnapshotStore,
    command: &SettingsCommands,
    notifications: &mut NotificationCenter,
) -> Result<()> {
    match command {
        SettingsCommands::Show => {
            let s = store.load_settings();
            println!("stock_critical:         {}", s.stock_critical);
            println!("stock_low:              {}", s.stock_low);
            println!("expiry_critical_days:   {}", s.expiry_critical_days);
            println!("expiry_warning_days:    {}", s.expiry_warning_days);
            println!("email_notifications:    {}", s.email_notifications);
            println!("whatsapp_notifications: {}", s.whatsapp_notifications);
            println!("daily_summary:          {}", s.daily_summary);
            println!("email_address:          {}", s.email_address);
            println!("whatsapp_number:        {}", s.whatsapp_number);
        }
        SettingsCommands::Set {
            stock_critical,
            stock_low,
            expiry_critical_days,
            expiry_warning_days,
            email_notifications,
            whatsapp_notifications,
            daily_summary,
            email_address,
            whatsapp_number,
        } => {
            let mut settings = store.load_settings();

            if let Some(v) = stock_critical {
                settings.stock_critical = *v;
            }
            if let Some(v) = stock_low {
                settings.stock_low = *v;
            }
            if let Some(v) = expiry_critical_days {
                settings.expiry_critical_days = *v;
            }
            if let Some(v) = expiry_warning_days {
                settings.expiry_warning_days = *v;
            }
            if let Some(v) = email_notifications {
                settings.email_notifications = *v;
            }
            if let Some(v) = whatsapp_notifications {
                settings.whatsapp_notifications = *v;
            }
            if let Some(v) = daily_summary {
                settings.daily_summary = *v;
            }
            if let Some(v) = email_address {
                settings.email_address = v.clone();
            }
            if let Some(v) = whatsapp_number {
                settings.whatsapp_number = v.clone();
            }

            if let Err(e) = store.save_settings(&settings) {
                tracing::warn!("Settings write failed, in-memory state kept: {e}");
                eprintln!("warning: could not persist settings: {e}");
            }
            notify_success(notifications, "Settings saved.");
        }
    }
    Ok(())
}
