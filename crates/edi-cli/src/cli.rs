use clap::{Parser, Subcommand};
use edi_spec::{NodeKind, Usage};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "edispec")]
#[command(about = "X12 implementation specification builder")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create an empty specification for a transaction set
    New {
        /// Transaction set id (e.g., 810, 850)
        transaction_set: String,

        /// Specification name; defaults to the transaction set name
        #[arg(short, long)]
        name: Option<String>,

        /// X12 release (e.g., 005010)
        #[arg(short, long)]
        edi_version: Option<String>,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Import an OpenEDI JSON definition
    Import {
        /// OpenEDI JSON file
        input: PathBuf,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Print node counts of a specification
    Stats {
        /// Specification file
        input: PathBuf,
    },

    /// Print a specification, or one node of it, as JSON
    Show {
        /// Specification file
        input: PathBuf,

        /// Node kind (loop, segment, element)
        #[arg(short, long, requires = "id")]
        kind: Option<NodeKind>,

        /// Node id
        #[arg(short, long, requires = "kind")]
        id: Option<String>,
    },

    /// Change the usage of one node in place
    SetUsage {
        /// Specification file
        input: PathBuf,

        /// Node kind (loop, segment, element)
        #[arg(short, long)]
        kind: NodeKind,

        /// Node id
        #[arg(short, long)]
        id: String,

        /// New usage (M, O or C)
        #[arg(short, long)]
        usage: Usage,
    },

    /// List the built-in transaction set templates
    Templates,
}
