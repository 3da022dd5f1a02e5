//! Command-line interface definition using clap.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::store::Column;

/// Aggregate per-conversation statistics from a Messenger chat-archive
/// export directory.
#[derive(Parser, Debug, Clone)]
#[command(name = "msgtally")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    msgtally ~/Downloads/messages/inbox --owner \"John Doe\"
    msgtally inbox --owner Alice --after 2023-01-01 --before 2023-12-31
    msgtally inbox --owner Alice --sort messages --desc
    msgtally inbox --owner Alice --search \"road trip\"
    msgtally inbox --owner Alice --detail 100_abc
    msgtally inbox --owner Alice --format json")]
pub struct Args {
    /// Archive inbox directory (one subdirectory per conversation)
    pub root: PathBuf,

    /// Name identifying your own messages (defaults to the saved config)
    #[arg(short = 'u', long, value_name = "NAME")]
    pub owner: Option<String>,

    /// Count only messages on or after this date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub after: Option<String>,

    /// Count only messages on or before this date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub before: Option<String>,

    /// Sort the table by this column
    #[arg(short, long, value_enum, value_name = "COLUMN")]
    pub sort: Option<SortColumn>,

    /// Sort in descending order
    #[arg(long, requires = "sort")]
    pub desc: bool,

    /// Keep only rows whose values contain this text (case-insensitive)
    #[arg(long, value_name = "TEXT")]
    pub search: Option<String>,

    /// Show the detail view for one conversation folder instead of the table
    #[arg(long, value_name = "FOLDER_ID")]
    pub detail: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Save owner, root, and dates as the new defaults
    #[arg(long)]
    pub save_config: bool,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// Machine-readable JSON
    Json,
}

/// Sortable table columns, as exposed on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortColumn {
    Name,
    Participants,
    Type,
    Messages,
    CallDuration,
    Photos,
    Gifs,
    Videos,
    Files,
    Characters,
}

impl From<SortColumn> for Column {
    fn from(column: SortColumn) -> Self {
        match column {
            SortColumn::Name => Column::Name,
            SortColumn::Participants => Column::Participants,
            SortColumn::Type => Column::Kind,
            SortColumn::Messages => Column::Messages,
            SortColumn::CallDuration => Column::CallDuration,
            SortColumn::Photos => Column::Photos,
            SortColumn::Gifs => Column::Gifs,
            SortColumn::Videos => Column::Videos,
            SortColumn::Files => Column::Files,
            SortColumn::Characters => Column::Characters,
        }
    }
}
