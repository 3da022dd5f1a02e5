//! On-disk export schema and the per-folder archive reader.
//!
//! One conversation lives in one folder containing one or more JSON files
//! (large conversations are split across numbered files). Each file is an
//! object with `participants`, `messages`, `title`, and optionally a
//! `joinable_mode` marker whose mere presence signals a group conversation.
//!
//! ```json
//! {
//!   "participants": [{"name": "Alice"}, {"name": "Bob"}],
//!   "messages": [
//!     {
//!       "sender_name": "Alice",
//!       "timestamp_ms": 1700000000000,
//!       "content": "hi",
//!       "call_duration": 120,
//!       "photos": [{"uri": "photos/1.jpg"}]
//!     }
//!   ],
//!   "title": "Alice & Bob"
//! }
//! ```
//!
//! The reader is tolerant by design: optional fields default to absent, a
//! file that fails to read or parse is logged and skipped without aborting
//! the folder, and every lifted string is passed through
//! [`redecode`](crate::encoding::redecode) to undo the exporter's encoding
//! bug.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer};
use tracing::warn;

use crate::encoding::redecode;
use crate::error::{ArchiveError, Result};

/// One decoded export file of a conversation folder.
///
/// All string fields are already re-decoded; consumers never see the raw
/// mojibake form.
#[derive(Debug, Clone, Deserialize)]
pub struct ConversationFile {
    /// Declared participants, including ones that never sent a message.
    #[serde(default)]
    pub participants: Vec<Participant>,

    /// Raw message records, newest first in real exports (order is not
    /// relied upon).
    #[serde(default)]
    pub messages: Vec<RawMessage>,

    /// Conversation title. Exports omit it for some thread types.
    #[serde(default)]
    pub title: Option<String>,

    /// `true` when the file carries the `joinable_mode` key. The key's
    /// value is ignored; presence alone marks a group conversation.
    #[serde(default, rename = "joinable_mode", deserialize_with = "key_present")]
    pub joinable: bool,
}

/// A declared conversation participant.
#[derive(Debug, Clone, Deserialize)]
pub struct Participant {
    pub name: String,
}

/// One raw message record as stored in the export.
///
/// `sender_name` and `timestamp_ms` are required by the schema; a record
/// missing either fails the whole file, which the reader then skips. All
/// other fields are optional and default to absent.
#[derive(Debug, Clone, Deserialize)]
pub struct RawMessage {
    pub sender_name: String,
    pub timestamp_ms: i64,
    #[serde(default)]
    pub content: Option<String>,
    /// Call length in seconds, present only for call-type events.
    #[serde(default)]
    pub call_duration: Option<u64>,
    #[serde(default)]
    pub photos: Option<Vec<MediaRef>>,
    #[serde(default)]
    pub gifs: Option<Vec<MediaRef>>,
    #[serde(default)]
    pub videos: Option<Vec<MediaRef>>,
    #[serde(default)]
    pub files: Option<Vec<MediaRef>>,
}

/// One attachment metadata entry. The archive lists references, not
/// payloads; only the count matters for aggregation.
#[derive(Debug, Clone, Deserialize)]
pub struct MediaRef {
    #[serde(default)]
    pub uri: Option<String>,
}

impl RawMessage {
    /// Number of Unicode scalar values in the content, zero when absent.
    pub fn content_chars(&self) -> u64 {
        self.content.as_ref().map_or(0, |c| c.chars().count() as u64)
    }

    /// Number of attached photos.
    pub fn photo_count(&self) -> u64 {
        list_len(&self.photos)
    }

    /// Number of attached GIFs.
    pub fn gif_count(&self) -> u64 {
        list_len(&self.gifs)
    }

    /// Number of attached videos.
    pub fn video_count(&self) -> u64 {
        list_len(&self.videos)
    }

    /// Number of attached files.
    pub fn file_count(&self) -> u64 {
        list_len(&self.files)
    }
}

fn list_len(list: &Option<Vec<MediaRef>>) -> u64 {
    list.as_ref().map_or(0, |l| l.len() as u64)
}

/// Deserializes any value (including `null`) as "the key was present".
fn key_present<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    serde::de::IgnoredAny::deserialize(deserializer)?;
    Ok(true)
}

impl ConversationFile {
    /// Applies the encoding fix to every lifted string.
    fn into_decoded(mut self) -> Self {
        for participant in &mut self.participants {
            participant.name = redecode(&participant.name);
        }
        for message in &mut self.messages {
            message.sender_name = redecode(&message.sender_name);
            if let Some(content) = message.content.take() {
                message.content = Some(redecode(&content));
            }
        }
        if let Some(title) = self.title.take() {
            self.title = Some(redecode(&title));
        }
        self
    }
}

/// Reads and decodes every `*.json` file directly inside `folder`.
///
/// Files are visited in lexicographic name order. A file that cannot be
/// read or parsed is logged and skipped; the remaining files still load. A
/// folder with no parseable files yields an empty vector, which downstream
/// aggregation reports as "not a conversation export".
///
/// # Errors
///
/// Returns an error only when the folder itself cannot be listed.
pub fn read_folder(folder: &Path) -> Result<Vec<ConversationFile>> {
    let mut paths: Vec<PathBuf> = fs::read_dir(folder)?
        .filter_map(std::result::Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file() && path.extension().is_some_and(|ext| ext == "json")
        })
        .collect();
    paths.sort();

    let mut files = Vec::with_capacity(paths.len());
    for path in &paths {
        match read_file(path) {
            Ok(file) => files.push(file),
            Err(err) => {
                warn!(file = %path.display(), error = %err, "skipping unreadable export file");
            }
        }
    }
    Ok(files)
}

/// Reads and decodes a single export file.
pub fn read_file(path: &Path) -> Result<ConversationFile> {
    let raw = fs::read_to_string(path)?;
    let file: ConversationFile =
        serde_json::from_str(&raw).map_err(|err| ArchiveError::file_parse(path, err))?;
    Ok(file.into_decoded())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> ConversationFile {
        serde_json::from_str::<ConversationFile>(json)
            .unwrap()
            .into_decoded()
    }

    #[test]
    fn test_full_file() {
        let file = parse(
            r#"{
                "participants": [{"name": "Alice"}, {"name": "Bob"}],
                "messages": [
                    {"sender_name": "Alice", "timestamp_ms": 1700000000000, "content": "hi"},
                    {"sender_name": "Bob", "timestamp_ms": 1700000100000, "call_duration": 60}
                ],
                "title": "Alice & Bob"
            }"#,
        );
        assert_eq!(file.participants.len(), 2);
        assert_eq!(file.messages.len(), 2);
        assert_eq!(file.title.as_deref(), Some("Alice & Bob"));
        assert!(!file.joinable);
    }

    #[test]
    fn test_missing_optional_fields() {
        let file = parse(r#"{"messages": [{"sender_name": "A", "timestamp_ms": 1}]}"#);
        assert!(file.participants.is_empty());
        assert!(file.title.is_none());

        let msg = &file.messages[0];
        assert_eq!(msg.content_chars(), 0);
        assert_eq!(msg.call_duration, None);
        assert_eq!(msg.photo_count(), 0);
        assert_eq!(msg.gif_count(), 0);
        assert_eq!(msg.video_count(), 0);
        assert_eq!(msg.file_count(), 0);
    }

    #[test]
    fn test_media_counts_are_list_lengths() {
        let file = parse(
            r#"{"messages": [{
                "sender_name": "A",
                "timestamp_ms": 1,
                "photos": [{"uri": "a.jpg"}, {"uri": "b.jpg"}],
                "videos": [{}],
                "files": []
            }]}"#,
        );
        let msg = &file.messages[0];
        assert_eq!(msg.photo_count(), 2);
        assert_eq!(msg.video_count(), 1);
        assert_eq!(msg.file_count(), 0);
        assert_eq!(msg.gif_count(), 0);
    }

    #[test]
    fn test_joinable_mode_presence() {
        let file = parse(r#"{"joinable_mode": {"mode": 1, "link": ""}}"#);
        assert!(file.joinable);

        // Presence counts even when the value is null
        let file = parse(r#"{"joinable_mode": null}"#);
        assert!(file.joinable);

        let file = parse("{}");
        assert!(!file.joinable);
    }

    #[test]
    fn test_strings_are_redecoded() {
        let file = parse(
            r#"{
                "participants": [{"name": "RenÃ©e"}],
                "messages": [{"sender_name": "RenÃ©e", "timestamp_ms": 1, "content": "Ã§a va"}],
                "title": "CafÃ©"
            }"#,
        );
        assert_eq!(file.participants[0].name, "Renée");
        assert_eq!(file.messages[0].sender_name, "Renée");
        assert_eq!(file.messages[0].content.as_deref(), Some("ça va"));
        assert_eq!(file.title.as_deref(), Some("Café"));
    }

    #[test]
    fn test_missing_required_field_fails() {
        let result = serde_json::from_str::<ConversationFile>(
            r#"{"messages": [{"timestamp_ms": 1, "content": "no sender"}]}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_read_folder_skips_malformed() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("message_1.json"),
            r#"{"participants": [{"name": "A"}], "messages": []}"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("message_2.json"), "{ not json").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let files = read_folder(dir.path()).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].participants[0].name, "A");
    }

    #[test]
    fn test_read_folder_orders_by_name() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("message_2.json"), r#"{"title": "second"}"#).unwrap();
        std::fs::write(dir.path().join("message_1.json"), r#"{"title": "first"}"#).unwrap();

        let files = read_folder(dir.path()).unwrap();
        assert_eq!(files[0].title.as_deref(), Some("first"));
        assert_eq!(files[1].title.as_deref(), Some("second"));
    }

    #[test]
    fn test_read_missing_folder_errors() {
        let dir = tempfile::tempdir().unwrap();
        let gone = dir.path().join("missing");
        assert!(read_folder(&gone).is_err());
    }
}
