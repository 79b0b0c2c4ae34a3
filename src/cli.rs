use crate::output_formats::OutputFormat;
use crate::search_algorithms::Algorithm;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Search security techniques and their remediation steps", long_about = None)]
pub struct Cli {
    /// Corpus JSON file (overrides the config file)
    #[clap(long, value_parser, global = true)]
    pub corpus: Option<PathBuf>,

    /// brute_force, kmp, boyer_moore or fuzzy
    #[clap(long, value_parser, env = "TECHFIND_ALGORITHM", global = true)]
    pub algorithm: Option<Algorithm>,

    #[clap(long, value_parser, global = true)]
    pub max_results: Option<usize>,

    #[clap(long, value_parser, global = true)]
    pub min_query_length: Option<usize>,

    #[clap(long, value_parser, global = true)]
    pub fuzzy_threshold: Option<u8>,

    /// Explicit config file instead of the usual lookup
    #[clap(long, value_parser, global = true)]
    pub config: Option<PathBuf>,

    #[clap(long, value_parser, default_value_t = false, global = true)]
    pub verbose: bool,

    #[clap(long, value_parser, global = true)]
    pub log: Option<PathBuf>,

    /// Print engine metrics after the command
    #[clap(long, value_parser, default_value_t = false, global = true)]
    pub metrics: bool,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Rank techniques matching a query
    Search {
        query: String,

        #[clap(long, value_parser, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Show the best match for each comma-separated technique name
    Describe {
        names: String,

        #[clap(long, value_parser, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Show a technique by id
    Show {
        id: String,

        #[clap(long, value_parser, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// List all categories
    Categories {
        #[clap(long, value_parser, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// List the techniques of one category
    Category {
        name: String,

        #[clap(long, value_parser, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Write a CSV solutions report for comma-separated technique names
    Export {
        names: String,

        /// Defaults to solutions_<timestamp>.csv in the current directory
        #[clap(short, long, value_parser)]
        output: Option<PathBuf>,
    },
    /// Generate shell completions
    Completions {
        #[clap(value_enum)]
        shell: Shell,
    },
}
