/*!
# Daybook - An Encrypted Journal

Daybook keeps a journal of dated free-text entries inside a single
age-encrypted SQLite store. Each invocation runs one session: the store is
decrypted to a transient location, edited, re-sealed atomically, and the
plaintext is scrubbed.

## Usage

```text
daybook [OPTIONS] <COMMAND>

Commands:
  init  Create a new empty journal
  new   Create or edit a journal entry (default date: today)
  edit  Edit an existing journal entry (default: the latest entry)
  view  View a journal entry read-only (default: the latest entry)
  list  List all entries in chronological order

Options:
  -s, --store <PATH>  Path of the encrypted journal store
```

## Configuration

- `DAYBOOK_STORE`: store path (defaults to ~/Documents/daybook.age)
- `DAYBOOK_EDITOR` or `EDITOR`: editor command (defaults to "vim")
- `DAYBOOK_PASSPHRASE`: passphrase for non-interactive use; otherwise prompted
*/

use chrono::NaiveDate;
use clap::Parser;
use daybook::cli::{self, CliArgs, Commands};
use daybook::config::Config;
use daybook::editor::SystemEditor;
use daybook::errors::{AppError, AppResult};
use daybook::ops::{self, EditMode};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Parses an optional date argument, mapping parse failures to a user-facing
/// error naming the accepted formats.
fn parse_date_arg(date: Option<String>) -> AppResult<Option<NaiveDate>> {
    match date {
        None => Ok(None),
        Some(date_str) => cli::parse_entry_date(&date_str).map(Some).map_err(|_| {
            AppError::Journal(format!(
                "The date format is YYYY-MM-DD or YYYYMMDD, got `{}`.",
                date_str
            ))
        }),
    }
}

fn run() -> AppResult<()> {
    let args = CliArgs::parse();

    let config = Config::load(args.store.as_deref())?;
    debug!("Configuration loaded");

    let editor = SystemEditor {
        editor_cmd: config.editor.clone(),
    };

    match args.command {
        Commands::Init => ops::init::run(&config),
        Commands::New { date } => {
            ops::edit::run(&config, &editor, parse_date_arg(date)?, EditMode::Create)
        }
        Commands::Edit { date } => {
            ops::edit::run(&config, &editor, parse_date_arg(date)?, EditMode::Edit)
        }
        Commands::View { date } => {
            ops::edit::run(&config, &editor, parse_date_arg(date)?, EditMode::View)
        }
        Commands::List => ops::list::run(&config),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run() {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}
