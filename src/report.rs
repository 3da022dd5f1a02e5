//! Plain-text rendering of scan results for the CLI.
//!
//! Everything here is presentation: the engine hands over integer counts
//! and the renderer formats tables, durations, and the floating-point
//! message-rate figures. Rates divide the message total by elapsed
//! wall-clock time and are undefined when no message matched the filter.

use std::fmt::Write;

use chrono::{Local, TimeZone};

use crate::aggregate::ConversationAggregate;
use crate::scanner::GlobalTotals;
use crate::store::Row;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Average messages per calendar period since the first message.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MessageRates {
    pub per_day: f64,
    pub per_week: f64,
    pub per_month: f64,
    pub per_year: f64,
}

/// Computes message rates from the first-message timestamp.
///
/// Returns `None` when no message matched (`earliest_timestamp_millis` is
/// the zero sentinel) or when no wall-clock time has elapsed — the rate is
/// undefined rather than infinite.
pub fn message_rates(
    total_messages: u64,
    earliest_timestamp_millis: i64,
    now_millis: i64,
) -> Option<MessageRates> {
    if earliest_timestamp_millis == 0 {
        return None;
    }
    let elapsed_seconds = (now_millis - earliest_timestamp_millis) as f64 / 1000.0;
    if elapsed_seconds <= 0.0 {
        return None;
    }
    let per_day = total_messages as f64 / (elapsed_seconds / SECONDS_PER_DAY);
    Some(MessageRates {
        per_day,
        per_week: per_day * 7.0,
        per_month: per_day * 30.0,
        per_year: per_day * 365.0,
    })
}

/// Formats a duration in seconds as `h:mm:ss`.
pub fn format_duration(seconds: u64) -> String {
    format!(
        "{}:{:02}:{:02}",
        seconds / 3600,
        (seconds % 3600) / 60,
        seconds % 60
    )
}

fn format_timestamp(timestamp_ms: i64) -> String {
    Local
        .timestamp_millis_opt(timestamp_ms)
        .single()
        .map_or_else(|| "-".to_string(), |dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let cut: String = text.chars().take(width.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}

/// Renders the conversation table plus the archive totals.
pub fn render_table(rows: &[Row], totals: &GlobalTotals) -> String {
    let mut out = String::new();
    writeln!(
        out,
        "{:<32} {:>4} {:<7} {:>8} {:>10} {:>7} {:>5} {:>7} {:>6} {:>10}",
        "NAME", "PEP", "TYPE", "MSGS", "CALL", "PHOTOS", "GIFS", "VIDEOS", "FILES", "CHARS"
    )
    .unwrap();

    for row in rows {
        writeln!(
            out,
            "{:<32} {:>4} {:<7} {:>8} {:>10} {:>7} {:>5} {:>7} {:>6} {:>10}",
            truncate(&row.name, 32),
            row.participants.len(),
            row.kind.to_string(),
            row.message_count,
            format_duration(row.call_duration),
            row.photo_count,
            row.gif_count,
            row.video_count,
            row.file_count,
            row.character_count,
        )
        .unwrap();
    }

    writeln!(out).unwrap();
    writeln!(out, "Conversations: {}", rows.len()).unwrap();
    writeln!(out, "Total messages: {}", totals.total_messages).unwrap();
    writeln!(out, "Sent by you: {}", totals.sent_by_owner).unwrap();
    writeln!(out, "Total characters: {}", totals.total_characters).unwrap();
    out
}

/// Renders the drill-down view for one conversation.
pub fn render_detail(aggregate: &ConversationAggregate, now_millis: i64) -> String {
    let mut out = String::new();
    writeln!(out, "Name: {}", aggregate.title).unwrap();
    writeln!(out, "Type: {}", aggregate.kind).unwrap();

    writeln!(out, "Participants ({}):", aggregate.participant_count()).unwrap();
    for (name, count) in &aggregate.participants {
        writeln!(out, "  {name} - {count}").unwrap();
    }

    writeln!(out, "Messages: {}", aggregate.total_messages).unwrap();
    writeln!(out, "Characters: {}", aggregate.total_characters).unwrap();
    writeln!(out, "Photos: {}", aggregate.photo_count).unwrap();
    writeln!(out, "GIFs: {}", aggregate.gif_count).unwrap();
    writeln!(out, "Videos: {}", aggregate.video_count).unwrap();
    writeln!(out, "Files: {}", aggregate.file_count).unwrap();
    writeln!(
        out,
        "Call duration: {}",
        format_duration(aggregate.call_duration_seconds)
    )
    .unwrap();
    writeln!(
        out,
        "First message: {}",
        if aggregate.earliest_timestamp_millis == 0 {
            "-".to_string()
        } else {
            format_timestamp(aggregate.earliest_timestamp_millis)
        }
    )
    .unwrap();

    if let Some(rates) = message_rates(
        aggregate.total_messages,
        aggregate.earliest_timestamp_millis,
        now_millis,
    ) {
        writeln!(out, "Average messages:").unwrap();
        writeln!(out, "  per day - {:.2}", rates.per_day).unwrap();
        writeln!(out, "  per week - {:.2}", rates.per_week).unwrap();
        writeln!(out, "  per month - {:.2}", rates.per_month).unwrap();
        writeln!(out, "  per year - {:.2}", rates.per_year).unwrap();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::ConversationKind;
    use std::collections::BTreeMap;

    fn sample_aggregate() -> ConversationAggregate {
        let mut participants = BTreeMap::new();
        participants.insert("Alice".to_string(), 3);
        participants.insert("Bob".to_string(), 1);
        ConversationAggregate {
            title: "Alice & Bob".to_string(),
            kind: ConversationKind::Private,
            participants,
            total_messages: 4,
            total_characters: 40,
            sent_by_owner: 3,
            call_duration_seconds: 3725,
            earliest_timestamp_millis: 1_700_000_000_000,
            photo_count: 1,
            gif_count: 0,
            video_count: 0,
            file_count: 2,
            folder_id: "100_abc".to_string(),
        }
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "0:00:00");
        assert_eq!(format_duration(59), "0:00:59");
        assert_eq!(format_duration(3725), "1:02:05");
        assert_eq!(format_duration(90_061), "25:01:01");
    }

    #[test]
    fn test_rates_undefined_without_messages() {
        assert!(message_rates(0, 0, 1_700_000_000_000).is_none());
    }

    #[test]
    fn test_rates_undefined_for_zero_elapsed() {
        assert!(message_rates(10, 1_700_000_000_000, 1_700_000_000_000).is_none());
        assert!(message_rates(10, 1_700_000_000_000, 1_600_000_000_000).is_none());
    }

    #[test]
    fn test_rates_scale_consistently() {
        // 70 messages over exactly 7 days
        let start = 1_700_000_000_000;
        let now = start + 7 * 86_400_000;
        let rates = message_rates(70, start, now).unwrap();
        assert!((rates.per_day - 10.0).abs() < 1e-9);
        assert!((rates.per_week - 70.0).abs() < 1e-9);
        assert!((rates.per_month - 300.0).abs() < 1e-9);
        assert!((rates.per_year - 3650.0).abs() < 1e-9);
    }

    #[test]
    fn test_render_detail_contains_stats() {
        let out = render_detail(&sample_aggregate(), 1_700_000_000_000 + 86_400_000);
        assert!(out.contains("Alice & Bob"));
        assert!(out.contains("Alice - 3"));
        assert!(out.contains("Bob - 1"));
        assert!(out.contains("Messages: 4"));
        assert!(out.contains("Call duration: 1:02:05"));
        assert!(out.contains("per day - 4.00"));
    }

    #[test]
    fn test_render_table_totals() {
        let rows = vec![Row::from(&sample_aggregate())];
        let totals = GlobalTotals {
            total_messages: 4,
            sent_by_owner: 3,
            total_characters: 40,
        };
        let out = render_table(&rows, &totals);
        assert!(out.contains("Alice & Bob"));
        assert!(out.contains("Total messages: 4"));
        assert!(out.contains("Sent by you: 3"));
        assert!(out.contains("Total characters: 40"));
    }

    #[test]
    fn test_truncate_long_names() {
        let long = "x".repeat(64);
        let cell = truncate(&long, 32);
        assert!(cell.chars().count() <= 32);
        assert!(cell.ends_with('…'));
    }
}
