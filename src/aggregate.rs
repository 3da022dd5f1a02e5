//! Folding a conversation folder's raw message stream into one aggregate.
//!
//! [`aggregate_files`] applies the date-range filter and the owner identity
//! to every message across a folder's export files and produces a single
//! [`ConversationAggregate`]: message/character/media counts, call duration,
//! per-participant tallies, and the earliest matching timestamp.
//!
//! Counts and durations are non-negative integers throughout; no floating
//! point enters aggregation. Rate computations (messages per day and
//! friends) live in the presentation layer.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::range::DateRange;
use crate::reader::ConversationFile;

/// Whether a conversation is a one-on-one thread or a group.
///
/// Derived from the `joinable_mode` marker: present in any of the folder's
/// files means [`Group`](ConversationKind::Group), absent everywhere means
/// [`Private`](ConversationKind::Private).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversationKind {
    Private,
    Group,
}

impl fmt::Display for ConversationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversationKind::Private => write!(f, "private"),
            ConversationKind::Group => write!(f, "group"),
        }
    }
}

/// Aggregated statistics for one conversation folder.
///
/// Created fresh on every scan; scanning is idempotent and stateless
/// between runs.
///
/// # Invariants
///
/// - `total_messages` equals the sum of all `participants` values: every
///   filtered-in message increments exactly one participant tally and the
///   total in lockstep.
/// - `sent_by_owner <= total_messages`.
/// - `earliest_timestamp_millis` is the minimum timestamp among filtered-in
///   messages, or `0` when none matched.
#[derive(Debug, Clone, Serialize)]
pub struct ConversationAggregate {
    /// Conversation title from the last-parsed file (empty when absent).
    pub title: String,
    /// Private or group conversation.
    pub kind: ConversationKind,
    /// Message count per participant name. Declared participants that never
    /// sent a filtered-in message stay at zero; senders missing from the
    /// declaration (departed group members) are added on first sight.
    pub participants: BTreeMap<String, u64>,
    pub total_messages: u64,
    pub total_characters: u64,
    pub sent_by_owner: u64,
    pub call_duration_seconds: u64,
    /// Minimum filtered-in timestamp, `0` when no message matched.
    pub earliest_timestamp_millis: i64,
    pub photo_count: u64,
    pub gif_count: u64,
    pub video_count: u64,
    pub file_count: u64,
    /// Opaque handle back to the source folder, used for on-demand detail
    /// re-fetch. Never shown to the user directly.
    pub folder_id: String,
}

impl ConversationAggregate {
    fn new(folder_id: impl Into<String>) -> Self {
        Self {
            title: String::new(),
            kind: ConversationKind::Private,
            participants: BTreeMap::new(),
            total_messages: 0,
            total_characters: 0,
            sent_by_owner: 0,
            call_duration_seconds: 0,
            earliest_timestamp_millis: 0,
            photo_count: 0,
            gif_count: 0,
            video_count: 0,
            file_count: 0,
            folder_id: folder_id.into(),
        }
    }

    /// Returns `true` when no participant was ever seen.
    ///
    /// An empty aggregate signals that the folder was not a valid
    /// conversation export; the scanner uses this as its stop condition.
    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    /// Number of distinct participants (declared or seen as sender).
    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }
}

/// Folds a folder's decoded export files into one aggregate.
///
/// Messages outside `range` contribute to no counter. A message inside the
/// range increments the total, its sender's tally, the owner tally when
/// `sender == owner` (exact, case-sensitive match on the re-decoded form),
/// the character count by the content length, the call-duration total, the
/// media counters, and the earliest-timestamp minimum.
pub fn aggregate_files(
    folder_id: &str,
    files: &[ConversationFile],
    range: DateRange,
    owner: &str,
) -> ConversationAggregate {
    let mut agg = ConversationAggregate::new(folder_id);

    for file in files {
        for participant in &file.participants {
            agg.participants.entry(participant.name.clone()).or_insert(0);
        }

        for message in &file.messages {
            if !range.contains_timestamp_millis(message.timestamp_ms) {
                continue;
            }

            agg.total_messages += 1;
            agg.total_characters += message.content_chars();
            if message.sender_name == owner {
                agg.sent_by_owner += 1;
            }
            *agg.participants.entry(message.sender_name.clone()).or_insert(0) += 1;
            agg.call_duration_seconds += message.call_duration.unwrap_or(0);

            if agg.earliest_timestamp_millis == 0
                || message.timestamp_ms < agg.earliest_timestamp_millis
            {
                agg.earliest_timestamp_millis = message.timestamp_ms;
            }

            agg.photo_count += message.photo_count();
            agg.gif_count += message.gif_count();
            agg.video_count += message.video_count();
            agg.file_count += message.file_count();
        }

        // Files of one conversation are expected to agree on the title;
        // when they disagree, last-seen wins.
        agg.title = file.title.clone().unwrap_or_default();
        if file.joinable {
            agg.kind = ConversationKind::Group;
        }
    }

    agg
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn wide_range() -> DateRange {
        DateRange::new(
            NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2100, 1, 1).unwrap(),
        )
    }

    fn empty_range() -> DateRange {
        DateRange::new(
            NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(1990, 1, 2).unwrap(),
        )
    }

    fn file(json: &str) -> ConversationFile {
        serde_json::from_str(json).unwrap()
    }

    fn two_person_file() -> ConversationFile {
        file(
            r#"{
                "participants": [{"name": "Alice"}, {"name": "Bob"}],
                "messages": [
                    {"sender_name": "Alice", "timestamp_ms": 1700000000000, "content": "hi"},
                    {"sender_name": "Bob", "timestamp_ms": 1700000100000, "content": "hello there"}
                ],
                "title": "Alice & Bob"
            }"#,
        )
    }

    #[test]
    fn test_basic_aggregate() {
        let agg = aggregate_files("100_abc", &[two_person_file()], wide_range(), "Alice");

        assert_eq!(agg.total_messages, 2);
        assert_eq!(agg.total_characters, 13);
        assert_eq!(agg.sent_by_owner, 1);
        assert_eq!(agg.kind, ConversationKind::Private);
        assert_eq!(agg.participants["Alice"], 1);
        assert_eq!(agg.participants["Bob"], 1);
        assert_eq!(agg.title, "Alice & Bob");
        assert_eq!(agg.earliest_timestamp_millis, 1_700_000_000_000);
        assert_eq!(agg.folder_id, "100_abc");
    }

    #[test]
    fn test_filtered_out_contributes_nothing() {
        let agg = aggregate_files("100_abc", &[two_person_file()], empty_range(), "Alice");

        assert_eq!(agg.total_messages, 0);
        assert_eq!(agg.total_characters, 0);
        assert_eq!(agg.sent_by_owner, 0);
        assert_eq!(agg.earliest_timestamp_millis, 0);
        // Declared participants are retained at zero
        assert_eq!(agg.participants["Alice"], 0);
        assert_eq!(agg.participants["Bob"], 0);
        assert!(!agg.is_empty());
    }

    #[test]
    fn test_total_equals_participant_sum() {
        let agg = aggregate_files("x", &[two_person_file()], wide_range(), "Alice");
        assert_eq!(agg.total_messages, agg.participants.values().sum::<u64>());
        assert!(agg.sent_by_owner <= agg.total_messages);
    }

    #[test]
    fn test_undeclared_sender_is_added() {
        let f = file(
            r#"{
                "participants": [{"name": "Alice"}],
                "messages": [{"sender_name": "Ghost", "timestamp_ms": 1700000000000, "content": "boo"}]
            }"#,
        );
        let agg = aggregate_files("x", &[f], wide_range(), "Alice");
        assert_eq!(agg.participants["Ghost"], 1);
        assert_eq!(agg.participants["Alice"], 0);
        assert_eq!(agg.total_messages, agg.participants.values().sum::<u64>());
    }

    #[test]
    fn test_owner_match_is_case_sensitive() {
        let agg = aggregate_files("x", &[two_person_file()], wide_range(), "alice");
        assert_eq!(agg.sent_by_owner, 0);
    }

    #[test]
    fn test_missing_content_counts_zero_chars() {
        let f = file(
            r#"{
                "participants": [{"name": "A"}],
                "messages": [{"sender_name": "A", "timestamp_ms": 1700000000000}]
            }"#,
        );
        let agg = aggregate_files("x", &[f], wide_range(), "A");
        assert_eq!(agg.total_messages, 1);
        assert_eq!(agg.total_characters, 0);
    }

    #[test]
    fn test_call_duration_and_media_accumulate() {
        let f = file(
            r#"{
                "participants": [{"name": "A"}, {"name": "B"}],
                "messages": [
                    {"sender_name": "A", "timestamp_ms": 1700000000000, "call_duration": 120},
                    {"sender_name": "B", "timestamp_ms": 1700000100000, "call_duration": 30,
                     "photos": [{"uri": "p.jpg"}], "gifs": [{}, {}], "videos": [{}], "files": [{}]}
                ]
            }"#,
        );
        let agg = aggregate_files("x", &[f], wide_range(), "A");
        assert_eq!(agg.call_duration_seconds, 150);
        assert_eq!(agg.photo_count, 1);
        assert_eq!(agg.gif_count, 2);
        assert_eq!(agg.video_count, 1);
        assert_eq!(agg.file_count, 1);
    }

    #[test]
    fn test_group_marker_in_any_file_wins() {
        let plain = || file(r#"{"participants": [{"name": "A"}]}"#);
        let marked = || file(r#"{"participants": [{"name": "A"}], "joinable_mode": {"mode": 1}}"#);

        let agg = aggregate_files("x", &[marked(), plain()], wide_range(), "A");
        assert_eq!(agg.kind, ConversationKind::Group);

        let agg = aggregate_files("x", &[plain(), marked()], wide_range(), "A");
        assert_eq!(agg.kind, ConversationKind::Group);

        let agg = aggregate_files("x", &[plain(), plain()], wide_range(), "A");
        assert_eq!(agg.kind, ConversationKind::Private);
    }

    #[test]
    fn test_title_last_file_wins() {
        let first = file(r#"{"participants": [{"name": "A"}], "title": "Old"}"#);
        let second = file(r#"{"participants": [{"name": "A"}], "title": "New"}"#);
        let agg = aggregate_files("x", &[first, second], wide_range(), "A");
        assert_eq!(agg.title, "New");

        // A last file without a title leaves the title empty
        let titled = file(r#"{"participants": [{"name": "A"}], "title": "Old"}"#);
        let untitled = file(r#"{"participants": [{"name": "A"}]}"#);
        let agg = aggregate_files("x", &[titled, untitled], wide_range(), "A");
        assert_eq!(agg.title, "");
    }

    #[test]
    fn test_earliest_across_files() {
        let newer = file(
            r#"{"participants": [{"name": "A"}],
                "messages": [{"sender_name": "A", "timestamp_ms": 1700000200000}]}"#,
        );
        let older = file(
            r#"{"participants": [{"name": "A"}],
                "messages": [{"sender_name": "A", "timestamp_ms": 1700000000000}]}"#,
        );
        let agg = aggregate_files("x", &[newer, older], wide_range(), "A");
        assert_eq!(agg.earliest_timestamp_millis, 1_700_000_000_000);
    }

    #[test]
    fn test_no_files_is_empty() {
        let agg = aggregate_files("x", &[], wide_range(), "A");
        assert!(agg.is_empty());
        assert_eq!(agg.participant_count(), 0);
    }

    #[test]
    fn test_kind_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&ConversationKind::Private).unwrap(),
            "\"private\""
        );
        assert_eq!(
            serde_json::to_string(&ConversationKind::Group).unwrap(),
            "\"group\""
        );
    }
}
