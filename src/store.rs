//! In-memory sortable/filterable row set.
//!
//! The presentation layer renders one row per conversation. [`RowStore`]
//! holds the full row set and implements everything a table widget needs
//! without knowing about any widget:
//!
//! - single-key sort by any [`Column`] with its declared comparison bias
//!   ([`Stringwise`](SortBias::Stringwise) lexicographic or
//!   [`Numberwise`](SortBias::Numberwise) integer) and a direction toggle;
//! - stable multi-key sort over an ordered list of `(column, reversed)`
//!   pairs, later keys breaking ties of earlier ones;
//! - case-insensitive substring search across all displayed column values;
//! - structured per-column filter predicates ([`RowFilter`]).

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::str::FromStr;

use serde::Serialize;

use crate::aggregate::{ConversationAggregate, ConversationKind};

/// A displayed table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Name,
    Participants,
    Kind,
    Messages,
    CallDuration,
    Photos,
    Gifs,
    Videos,
    Files,
    Characters,
    FolderId,
}

/// How values of a column compare: as strings or as integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortBias {
    Stringwise,
    Numberwise,
}

impl Column {
    /// Every column, in display order.
    pub const ALL: [Column; 11] = [
        Column::Name,
        Column::Participants,
        Column::Kind,
        Column::Messages,
        Column::CallDuration,
        Column::Photos,
        Column::Gifs,
        Column::Videos,
        Column::Files,
        Column::Characters,
        Column::FolderId,
    ];

    /// The declared comparison bias for this column.
    ///
    /// The participant set sorts numberwise by cardinality.
    pub fn bias(self) -> SortBias {
        match self {
            Column::Name | Column::Kind | Column::FolderId => SortBias::Stringwise,
            _ => SortBias::Numberwise,
        }
    }

    /// Stable string key, as used by filters and serialized output.
    pub fn key(self) -> &'static str {
        match self {
            Column::Name => "name",
            Column::Participants => "participants",
            Column::Kind => "type",
            Column::Messages => "messages",
            Column::CallDuration => "call_duration",
            Column::Photos => "photos",
            Column::Gifs => "gifs",
            Column::Videos => "videos",
            Column::Files => "files",
            Column::Characters => "characters",
            Column::FolderId => "folder_id",
        }
    }
}

impl FromStr for Column {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Column::ALL
            .into_iter()
            .find(|column| column.key() == s)
            .ok_or_else(|| {
                let known: Vec<&str> = Column::ALL.iter().map(|c| c.key()).collect();
                format!("Unknown column: '{}'. Expected one of: {}", s, known.join(", "))
            })
    }
}

/// One displayed row, mapped from a [`ConversationAggregate`].
///
/// The field-to-column mapping is part of the engine's output contract:
/// sort, search, and filter all operate on exactly these values.
#[derive(Debug, Clone, Serialize)]
pub struct Row {
    pub name: String,
    pub participants: BTreeSet<String>,
    pub kind: ConversationKind,
    pub message_count: u64,
    pub call_duration: u64,
    pub photo_count: u64,
    pub gif_count: u64,
    pub video_count: u64,
    pub file_count: u64,
    pub character_count: u64,
    pub folder_id: String,
}

impl From<&ConversationAggregate> for Row {
    fn from(aggregate: &ConversationAggregate) -> Self {
        Self {
            name: aggregate.title.clone(),
            participants: aggregate.participants.keys().cloned().collect(),
            kind: aggregate.kind,
            message_count: aggregate.total_messages,
            call_duration: aggregate.call_duration_seconds,
            photo_count: aggregate.photo_count,
            gif_count: aggregate.gif_count,
            video_count: aggregate.video_count,
            file_count: aggregate.file_count,
            character_count: aggregate.total_characters,
            folder_id: aggregate.folder_id.clone(),
        }
    }
}

impl Row {
    /// The value of `column` as the table displays it.
    pub fn display_value(&self, column: Column) -> String {
        match column {
            Column::Name => self.name.clone(),
            Column::Participants => {
                let names: Vec<&str> = self.participants.iter().map(String::as_str).collect();
                names.join(", ")
            }
            Column::Kind => self.kind.to_string(),
            Column::Messages => self.message_count.to_string(),
            Column::CallDuration => self.call_duration.to_string(),
            Column::Photos => self.photo_count.to_string(),
            Column::Gifs => self.gif_count.to_string(),
            Column::Videos => self.video_count.to_string(),
            Column::Files => self.file_count.to_string(),
            Column::Characters => self.character_count.to_string(),
            Column::FolderId => self.folder_id.clone(),
        }
    }

    fn numeric_value(&self, column: Column) -> u64 {
        match column {
            Column::Participants => self.participants.len() as u64,
            Column::Messages => self.message_count,
            Column::CallDuration => self.call_duration,
            Column::Photos => self.photo_count,
            Column::Gifs => self.gif_count,
            Column::Videos => self.video_count,
            Column::Files => self.file_count,
            Column::Characters => self.character_count,
            // Stringwise columns have no meaningful integer value
            Column::Name | Column::Kind | Column::FolderId => 0,
        }
    }

    fn compare(&self, other: &Row, column: Column) -> Ordering {
        match column.bias() {
            SortBias::Numberwise => self.numeric_value(column).cmp(&other.numeric_value(column)),
            SortBias::Stringwise => self.display_value(column).cmp(&other.display_value(column)),
        }
    }
}

/// The full row set, exposed for sorting, filtering, and searching.
#[derive(Debug, Clone, Default)]
pub struct RowStore {
    rows: Vec<Row>,
}

impl RowStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the row set from scan results, preserving their order.
    pub fn from_aggregates(aggregates: &[ConversationAggregate]) -> Self {
        Self {
            rows: aggregates.iter().map(Row::from).collect(),
        }
    }

    /// The rows in their current order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sorts by a single column with its declared bias.
    ///
    /// The sort is stable: rows comparing equal keep their prior relative
    /// order.
    pub fn sort_by(&mut self, column: Column, descending: bool) {
        self.rows.sort_by(|a, b| {
            let ordering = a.compare(b, column);
            if descending { ordering.reverse() } else { ordering }
        });
    }

    /// Sorts by several columns at once.
    ///
    /// Keys apply in list order: ties on an earlier `(column, reversed)`
    /// pair are broken by the next one, and rows tying on every key retain
    /// their prior relative order. Composite ordering replaces the
    /// recursive tie-break comparator a naive implementation would build.
    pub fn apply_multi_sort(&mut self, keys: &[(Column, bool)]) {
        self.rows.sort_by(|a, b| {
            for &(column, reversed) in keys {
                let ordering = a.compare(b, column);
                let ordering = if reversed { ordering.reverse() } else { ordering };
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            Ordering::Equal
        });
    }

    /// Finds rows whose displayed values contain `query`, case-insensitively.
    ///
    /// Every column's display value is searched; a row matches when any of
    /// them contains the query as a substring. Returns matching indices in
    /// row order.
    pub fn search(&self, query: &str) -> Vec<usize> {
        let needle = query.to_lowercase();
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, row)| {
                Column::ALL
                    .iter()
                    .any(|&column| row.display_value(column).to_lowercase().contains(&needle))
            })
            .map(|(index, _)| index)
            .collect()
    }

    /// Returns the indices of rows matching `filter`, in row order.
    pub fn filter(&self, filter: &RowFilter) -> Vec<usize> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, row)| filter.matches(row))
            .map(|(index, _)| index)
            .collect()
    }
}

/// An inclusive numeric interval, open-ended where a bound is unset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NumericRange {
    pub min: Option<u64>,
    pub max: Option<u64>,
}

impl NumericRange {
    /// A range with both bounds set.
    pub fn between(min: u64, max: u64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    /// A range bounded only from below.
    pub fn at_least(min: u64) -> Self {
        Self {
            min: Some(min),
            max: None,
        }
    }

    /// A range bounded only from above.
    pub fn at_most(max: u64) -> Self {
        Self {
            min: None,
            max: Some(max),
        }
    }

    /// Returns `true` when `value` satisfies both bounds.
    pub fn contains(&self, value: u64) -> bool {
        self.min.is_none_or(|min| value >= min) && self.max.is_none_or(|max| value <= max)
    }
}

/// Structured filter predicates, one slot per column.
///
/// All active predicates must match (AND logic). Defaults to matching
/// everything.
#[derive(Debug, Clone, Default)]
pub struct RowFilter {
    /// Exact conversation name.
    pub name: Option<String>,
    /// Exact conversation kind.
    pub kind: Option<ConversationKind>,
    /// Names that must all appear in the row's participant set.
    pub participants: Option<BTreeSet<String>>,
    pub messages: NumericRange,
    pub call_duration: NumericRange,
    pub photos: NumericRange,
    pub gifs: NumericRange,
    pub videos: NumericRange,
    pub files: NumericRange,
    pub characters: NumericRange,
}

impl RowFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requires an exact conversation name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Requires a conversation kind.
    #[must_use]
    pub fn with_kind(mut self, kind: ConversationKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Requires every given name to be a participant.
    #[must_use]
    pub fn with_participants<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.participants = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Constrains a numeric column to an inclusive range.
    #[must_use]
    pub fn with_range(mut self, column: Column, range: NumericRange) -> Self {
        match column {
            Column::Messages => self.messages = range,
            Column::CallDuration => self.call_duration = range,
            Column::Photos => self.photos = range,
            Column::Gifs => self.gifs = range,
            Column::Videos => self.videos = range,
            Column::Files => self.files = range,
            Column::Characters => self.characters = range,
            // Non-numeric columns have no range slot
            Column::Name | Column::Participants | Column::Kind | Column::FolderId => {}
        }
        self
    }

    /// Returns `true` when `row` satisfies every active predicate.
    pub fn matches(&self, row: &Row) -> bool {
        if let Some(ref name) = self.name {
            if row.name != *name {
                return false;
            }
        }
        if let Some(kind) = self.kind {
            if row.kind != kind {
                return false;
            }
        }
        if let Some(ref required) = self.participants {
            if !required.is_subset(&row.participants) {
                return false;
            }
        }
        self.messages.contains(row.message_count)
            && self.call_duration.contains(row.call_duration)
            && self.photos.contains(row.photo_count)
            && self.gifs.contains(row.gif_count)
            && self.videos.contains(row.video_count)
            && self.files.contains(row.file_count)
            && self.characters.contains(row.character_count)
    }
}
