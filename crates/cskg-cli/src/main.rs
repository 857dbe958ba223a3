//! CSKG CLI
//!
//! Command-line interface for:
//! - Ingesting a directory of relation triple tables into one snapshot + export
//! - Normalizing `PersonX`-style placeholders into concrete names
//! - Inspecting category views and per-head samples
//! - Extracting linguistic features from precomputed analyses

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use cskg_ingest::{
    collect_sample, event_attributes, exclude_category, exclude_relations, fill_placeholders,
    load_relation_table, physical_entity_attributes, social_attributes, LoadReport,
};
use cskg_storage::{FsStore, TableStore};
use cskg_table::{Category, CategoryView, Column, RelationTable};
use std::path::PathBuf;

mod config;
mod features;

use config::{CliConfig, Overrides};

#[derive(Parser)]
#[command(name = "cskg")]
#[command(author, version, about = "CSKG: commonsense triple ingestion and features")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct GlobalArgs {
    /// JSON config (`{"storage": {...}, "ingest": {...}}`)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Directory of triple tables (overrides `ingest.source_dir`)
    #[arg(long, global = true)]
    source_dir: Option<PathBuf>,
    /// Output directory for snapshots and dumps (overrides `storage.root`)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    /// Seed for placeholder name sampling
    #[arg(long, global = true)]
    seed: Option<u64>,
    /// Read the saved snapshot instead of re-ingesting the source directory
    #[arg(long, global = true)]
    from_snapshot: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Load every triple table and save the unified snapshot + TSV export
    Ingest {
        /// Only report, do not write the snapshot
        #[arg(long)]
        no_save: bool,
    },

    /// Replace placeholder phrases with distinct names and save the result
    Normalize {
        /// Columns to rewrite
        #[arg(long, value_delimiter = ',', default_value = "head,tail")]
        columns: Vec<Column>,
    },

    /// Row counts of the category exclusion views, or the rows of one view
    Partition {
        /// Print the rows outside this category (physical, entity, social, script, dynamic)
        #[arg(long, conflicts_with = "relations")]
        without: Option<String>,
        /// Print the rows outside an ad-hoc relation list
        #[arg(long, value_delimiter = ',')]
        relations: Vec<String>,
    },

    /// Every (relation, tail) pair attached to one head phrase, as JSON
    Sample {
        #[arg(long)]
        head: String,
    },

    /// Linguistic features from precomputed analyses
    Features(features::FeatureArgs),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    let config = CliConfig::load(cli.global.config.as_deref())?.apply(Overrides {
        source_dir: cli.global.source_dir.clone(),
        data_dir: cli.global.data_dir.clone(),
        seed: cli.global.seed,
    });
    let store = FsStore::new(config.storage.clone());

    match cli.command {
        Commands::Ingest { no_save } => cmd_ingest(&config, &store, no_save),
        Commands::Normalize { columns } => {
            cmd_normalize(&config, &store, &columns, cli.global.from_snapshot)
        }
        Commands::Partition { without, relations } => {
            let table = table_for(&config, &store, cli.global.from_snapshot)?;
            cmd_partition(&table, without.as_deref(), &relations)
        }
        Commands::Sample { head } => {
            let table = table_for(&config, &store, cli.global.from_snapshot)?;
            let sample = collect_sample(&head, &table);
            println!("{}", serde_json::to_string_pretty(&sample)?);
            Ok(())
        }
        Commands::Features(args) => {
            let mut table = table_for(&config, &store, cli.global.from_snapshot)?;
            features::run(args, &mut table, &store)
        }
    }
}

/// Input table: the saved snapshot, or a fresh load of the source directory
fn table_for(config: &CliConfig, store: &FsStore, from_snapshot: bool) -> Result<RelationTable> {
    if from_snapshot {
        let path = store.config().snapshot_path();
        let table = store
            .load_table()
            .with_context(|| format!("loading snapshot {}", path.display()))?;
        tracing::info!(path = %path.display(), rows = table.len(), "loaded snapshot");
        return Ok(table);
    }
    Ok(load(config)?.table)
}

fn load(config: &CliConfig) -> Result<LoadReport> {
    eprintln!(
        "{} triple tables from {}",
        "Loading".green().bold(),
        config.ingest.source_dir.display()
    );
    let report = load_relation_table(&config.ingest)
        .with_context(|| format!("ingesting {}", config.ingest.source_dir.display()))?;
    for file in &report.files {
        eprintln!("  {} {} ({} rows)", "→".cyan(), file.path.display(), file.rows);
    }
    Ok(report)
}

fn cmd_ingest(config: &CliConfig, store: &FsStore, no_save: bool) -> Result<()> {
    let report = load(config)?;
    if !report.unknown_relations.is_empty() {
        let labels: Vec<&str> = report.unknown_relations.iter().map(String::as_str).collect();
        println!(
            "  {} unknown relations: {}",
            "warn:".yellow().bold(),
            labels.join(", ")
        );
    }
    println!(
        "  {} {} rows from {} files",
        "→".yellow(),
        report.table.len(),
        report.files.len()
    );
    if no_save {
        return Ok(());
    }
    let saved = store.save_table(&report.table)?;
    eprintln!("{} {}", "wrote".green().bold(), saved.snapshot.display());
    eprintln!("{} {}", "wrote".green().bold(), saved.export.display());
    Ok(())
}

fn cmd_normalize(
    config: &CliConfig,
    store: &FsStore,
    columns: &[Column],
    from_snapshot: bool,
) -> Result<()> {
    let mut table = table_for(config, store, from_snapshot)?;
    let placeholders = config.ingest.placeholders()?;
    let mut rng = config.ingest.rng();

    let outcome = fill_placeholders(
        &mut table,
        columns,
        &placeholders,
        config.ingest.name_pool(),
        &mut rng,
    )
    .map_err(|e| {
        tracing::warn!(error = %e, "normalization aborted");
        anyhow!("normalization aborted, table not saved: {e}")
    })?;

    for a in &outcome.assignments {
        println!("  {} {} → {}", "→".cyan(), a.pattern, a.name.bold());
    }
    println!(
        "  {} {} cells rewritten, {} names left",
        "→".yellow(),
        outcome.cells_rewritten,
        outcome.pool.len()
    );

    let saved = store.save_table(&table)?;
    eprintln!("{} {}", "wrote".green().bold(), saved.snapshot.display());
    eprintln!("{} {}", "wrote".green().bold(), saved.export.display());
    Ok(())
}

fn cmd_partition(table: &RelationTable, without: Option<&str>, relations: &[String]) -> Result<()> {
    if let Some(name) = without {
        let category =
            Category::from_name(name).ok_or_else(|| anyhow!("unknown category `{name}`"))?;
        print_view(&exclude_category(table, category));
        return Ok(());
    }
    if !relations.is_empty() {
        let excluded: Vec<&str> = relations.iter().map(String::as_str).collect();
        print_view(&exclude_relations(table, &excluded));
        return Ok(());
    }

    let (without_physical, without_entity) = physical_entity_attributes(table);
    let without_social = social_attributes(table);
    let (without_script, without_dynamic) = event_attributes(table);

    println!("{} {} rows", "Table".green().bold(), table.len());
    let views: [(Category, &CategoryView<'_>); 5] = [
        (Category::Physical, &without_physical),
        (Category::Entity, &without_entity),
        (Category::Social, &without_social),
        (Category::Script, &without_script),
        (Category::Dynamic, &without_dynamic),
    ];
    for (category, view) in views {
        println!(
            "  {} without {:<9} {} rows",
            "→".cyan(),
            category.name(),
            view.len()
        );
    }
    Ok(())
}

fn print_view(view: &CategoryView<'_>) {
    for (row, t) in view.iter() {
        println!(
            "{row}\t{}\t{}\t{}",
            t.head,
            t.relation,
            t.tail.as_deref().unwrap_or("")
        );
    }
    eprintln!("{} {} of {} rows", "→".cyan(), view.len(), view.table().len());
}
