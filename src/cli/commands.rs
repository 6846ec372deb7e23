use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};

use crate::archive::{ArchiveExporter, try_import_archive};
use crate::models::{CaseIdentity, PageId, SnapshotModel};
use crate::session::{AutosaveStatus, NoteSection, SessionController};
use crate::store::SnapshotStore;
use crate::utils::{AppPaths, format_path_with_tilde};

#[derive(Parser)]
#[command(name = "casefile")]
#[command(version = "0.1.0")]
#[command(about = "Store, export and import forensic case files", long_about = None)]
pub struct Cli {
    /// Data directory holding `cases/` and `exports/` (defaults to $CASEFILE_HOME)
    #[arg(long, global = true, value_name = "DIR")]
    pub home: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List stored cases, oldest first
    List,
    /// Create an empty case
    Create { number: String, name: String },
    /// Delete a case and all of its files
    Delete { number: String, name: String },
    /// Summarise the saved snapshot of a case
    Show { number: String, name: String },
    /// Add a note to a case
    Note {
        number: String,
        name: String,
        text: String,
        /// File the note under on-site notes instead of preliminary notes
        #[arg(long)]
        on_site: bool,
    },
    /// Export a case to a zip archive
    Export { number: String, name: String },
    /// Read a case archive
    Import {
        archive: PathBuf,
        /// Store the imported case locally
        #[arg(long)]
        adopt: bool,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let paths = AppPaths::resolve(cli.home.as_deref())?;
    let store = SnapshotStore::new(&paths.storage_root);

    match cli.command {
        Some(Commands::List) => list_cases(&store),
        Some(Commands::Create { number, name }) => create_case(&store, &number, &name)?,
        Some(Commands::Delete { number, name }) => delete_case(&store, &number, &name)?,
        Some(Commands::Show { number, name }) => show_case(&store, &number, &name)?,
        Some(Commands::Note { number, name, text, on_site }) => {
            let section = if on_site { NoteSection::OnSite } else { NoteSection::Preliminary };
            add_note(store, &number, &name, &text, section)?;
        }
        Some(Commands::Export { number, name }) => {
            export_case(store, &paths.export_dir, &number, &name)?;
        }
        Some(Commands::Import { archive, adopt }) => import_case(&store, &archive, adopt)?,
        None => {
            println!("Use --help for usage information");
        }
    }

    Ok(())
}

/// Find a stored case by number and name
fn find_case(store: &SnapshotStore, number: &str, name: &str) -> Result<CaseIdentity> {
    let wanted = CaseIdentity::new(number, name)?;
    store
        .list_cases()
        .into_iter()
        .find(|identity| identity.same_case(&wanted))
        .with_context(|| format!("No case {} found", wanted.case_id()))
}

fn list_cases(store: &SnapshotStore) {
    let cases = store.list_cases();
    if cases.is_empty() {
        println!("No cases in {}", format_path_with_tilde(store.root()));
        return;
    }

    for identity in cases {
        println!(
            "{}  {}  {}",
            identity.created_at.format("%Y-%m-%d %H:%M"),
            identity.case_number,
            identity.case_name
        );
    }
}

fn create_case(store: &SnapshotStore, number: &str, name: &str) -> Result<()> {
    let identity = CaseIdentity::new(number, name)?;
    let dir = store
        .create_case(&identity)
        .with_context(|| format!("Failed to create case {}", identity.case_id()))?;
    println!("Created case {} at {}", identity, format_path_with_tilde(&dir));
    Ok(())
}

fn delete_case(store: &SnapshotStore, number: &str, name: &str) -> Result<()> {
    let identity = CaseIdentity::new(number, name)?;
    if store.delete_case(&identity)? {
        println!("Deleted case {}", identity);
    } else {
        println!("No case {} to delete", identity);
    }
    Ok(())
}

fn show_case(store: &SnapshotStore, number: &str, name: &str) -> Result<()> {
    let identity = find_case(store, number, name)?;
    let snapshot =
        store.load_snapshot(&identity).unwrap_or_else(|| SnapshotModel::empty(identity));
    let data = &snapshot.data;

    println!("Case {}", snapshot.identity);
    println!("================================");
    println!("Created: {}", snapshot.identity.created_at.format("%Y-%m-%d %H:%M:%S"));
    println!("Preliminary notes: {}", data.preliminary_notes.len());
    println!("On-site notes: {}", data.on_site_notes.len());
    println!("Observations: {}", data.observations.len());
    println!("Themes: {} ({} relevant)", data.themes.len(), data.relevant_theme_count());
    println!("Focus points: {}", data.focus_points.len());
    println!("Markers: {}", data.markers.len());

    let complete: Vec<&str> = PageId::ALL
        .iter()
        .filter(|page| data.is_page_complete(**page))
        .map(|page| page.as_str())
        .collect();
    if complete.is_empty() {
        println!("Pages complete: none");
    } else {
        println!("Pages complete: {}", complete.join(", "));
    }
    println!("Ready to finish: {}", if data.can_finish() { "yes" } else { "no" });

    Ok(())
}

fn add_note(
    store: SnapshotStore,
    number: &str,
    name: &str,
    text: &str,
    section: NoteSection,
) -> Result<()> {
    let identity = find_case(&store, number, name)?;
    let mut session = SessionController::new(store);
    session.open_case(identity.clone());

    if !session.add_note(section, text) {
        bail!("Note text cannot be empty");
    }
    if let AutosaveStatus::Failed { message, .. } = session.autosave_status() {
        bail!("Note was not saved: {}", message);
    }

    println!("Added note to {}", identity);
    Ok(())
}

fn export_case(store: SnapshotStore, export_dir: &Path, number: &str, name: &str) -> Result<()> {
    let identity = find_case(&store, number, name)?;
    let snapshot =
        store.load_snapshot(&identity).unwrap_or_else(|| SnapshotModel::empty(identity));

    let exporter = ArchiveExporter::new(store, export_dir);
    let archive = exporter
        .export(&snapshot)
        .with_context(|| format!("Failed to export case {}", snapshot.identity))?;
    println!("Exported {} to {}", snapshot.identity, format_path_with_tilde(&archive));
    Ok(())
}

fn import_case(store: &SnapshotStore, archive: &Path, adopt: bool) -> Result<()> {
    let file = File::open(archive)
        .with_context(|| format!("Failed to open archive: {}", archive.display()))?;
    let imported = try_import_archive(file)
        .with_context(|| format!("Failed to import {}", archive.display()))?;

    let identity = &imported.snapshot.identity;
    println!("Imported case {} with {} image(s)", identity, imported.images.len());

    if adopt {
        let dir = imported
            .adopt_into(store)
            .with_context(|| format!("Failed to store case {}", identity))?;
        println!("Stored at {}", format_path_with_tilde(&dir));
    }
    Ok(())
}
