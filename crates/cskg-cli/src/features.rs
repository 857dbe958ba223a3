//! `cskg features`: feature extraction over precomputed analyses

use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;
use cskg_nlp::{
    render_dependency_parse, FeatureExtractor, PrecomputedAnalyzer, PrecomputedLabeler,
};
use cskg_storage::FsStore;
use cskg_table::{Column, RelationTable};
use std::path::PathBuf;

#[derive(Args)]
pub struct FeatureArgs {
    /// Parsed documents (JSON array or JSON lines)
    #[arg(long)]
    analyses: PathBuf,
    /// SRL predictions (JSON array or JSON lines)
    #[arg(long)]
    labels: Option<PathBuf>,
    #[command(subcommand)]
    command: FeatureCommands,
}

#[derive(Subcommand)]
enum FeatureCommands {
    /// Distinct documents grouped by dependency-label signature
    Histogram {
        #[arg(long, default_value = "head")]
        column: Column,
    },

    /// Noun chunks of every distinct document
    NounChunks {
        #[arg(long, default_value = "head")]
        column: Column,
    },

    /// Lemmas of verbs governing a dependency label
    Verbs {
        #[arg(long, default_value = "head")]
        column: Column,
        #[arg(long, default_value = "nsubj")]
        dep: String,
    },

    /// Per-cell dependency parses, dumped under a dated file name
    Parse {
        #[arg(long, value_delimiter = ',', default_value = "head,tail")]
        columns: Vec<Column>,
        /// Print each parse as a table
        #[arg(long)]
        show: bool,
    },

    /// Attach a per-row analysis (`srl`, `dp`, `dep`) and checkpoint the table
    Annotate {
        #[arg(long)]
        kind: String,
    },
}

pub fn run(args: FeatureArgs, table: &mut RelationTable, store: &FsStore) -> Result<()> {
    let analyzer = PrecomputedAnalyzer::load(&args.analyses)?;
    let labeler = args
        .labels
        .as_deref()
        .map(PrecomputedLabeler::load)
        .transpose()?;

    let mut extractor = FeatureExtractor::new(&analyzer);
    if let Some(labeler) = &labeler {
        extractor = extractor.with_labeler(labeler);
    }

    tracing::info!(rows = table.len(), "running feature extraction");
    match args.command {
        FeatureCommands::Histogram { column } => {
            let histogram = extractor.extract_dependency_parses(table, column)?;
            for (signature, count) in histogram.sorted_counts() {
                println!("{count:>6}  {signature}");
            }
        }
        FeatureCommands::NounChunks { column } => {
            let chunks = extractor.noun_chunking(table, column)?;
            println!("{}", serde_json::to_string_pretty(&chunks)?);
        }
        FeatureCommands::Verbs { column, dep } => {
            for verb in extractor.extract_verbs(table, column, &dep)? {
                println!("{verb}");
            }
        }
        FeatureCommands::Parse { columns, show } => {
            let (parses, path) = extractor.dependency_parse_saved(table, &columns, store)?;
            if show {
                for (column, by_row) in &parses {
                    for (row, parse) in by_row {
                        println!("{} {column} #{row}: {}", "»".cyan(), parse.document.text.bold());
                        print!("{}", render_dependency_parse(&parse.document));
                    }
                }
            }
            eprintln!("{} {}", "wrote".green().bold(), path.display());
        }
        FeatureCommands::Annotate { kind } => {
            let path = extractor.annotate_and_save(table, &kind, store)?;
            eprintln!("{} {}", "wrote".green().bold(), path.display());
        }
    }
    Ok(())
}
