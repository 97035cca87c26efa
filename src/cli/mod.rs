//! Command-line interface for daybook.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::str::FromStr;

/// An encrypted journal: one passphrase-protected store of dated entries
#[derive(Parser, Debug)]
#[clap(name = "daybook", about = "An encrypted journal using SQLite and age")]
#[clap(author, version, long_about = None)]
pub struct CliArgs {
    /// Path of the encrypted journal store
    #[clap(short = 's', long, global = true, value_name = "PATH")]
    pub store: Option<String>,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new empty journal
    Init,

    /// Create or edit a journal entry (default date: today)
    New {
        /// Entry date, YYYY-MM-DD or YYYYMMDD
        #[clap(value_name = "DATE")]
        date: Option<String>,
    },

    /// Edit an existing journal entry (default: the latest entry)
    Edit {
        /// Entry date, YYYY-MM-DD or YYYYMMDD
        #[clap(value_name = "DATE")]
        date: Option<String>,
    },

    /// View a journal entry read-only (default: the latest entry)
    View {
        /// Entry date, YYYY-MM-DD or YYYYMMDD
        #[clap(value_name = "DATE")]
        date: Option<String>,
    },

    /// List all entries in chronological order
    List,
}

impl CliArgs {
    /// Parse command-line arguments
    pub fn parse() -> Self {
        CliArgs::parse_from(std::env::args())
    }
}

/// Parses an entry date in YYYY-MM-DD format, falling back to YYYYMMDD.
pub fn parse_entry_date(date_str: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::from_str(date_str).or_else(|_| NaiveDate::parse_from_str(date_str, "%Y%m%d"))
}
