use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Log engine activity at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print a model's tuple layout, primary key and index map
    Describe {
        /// Model definition file (JSON)
        #[arg(short, long)]
        model: PathBuf,
    },

    /// Run one query against an in-memory store seeded from JSON
    Query {
        /// Model definition file (JSON)
        #[arg(short, long)]
        model: PathBuf,

        /// Space definitions file (JSON array)
        #[arg(short, long)]
        spaces: PathBuf,

        /// Records to create before querying (JSON array of objects)
        #[arg(short, long)]
        records: Option<PathBuf>,

        /// Space the model's alias is bound to; defaults to the first space
        #[arg(long)]
        space: Option<u32>,

        /// Query kind
        #[arg(value_enum)]
        action: QueryAction,

        /// Equality constraints as field=value
        #[arg(required = true)]
        constraints: Vec<String>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum QueryAction {
    Get,
    Filter,
    Delete,
}
