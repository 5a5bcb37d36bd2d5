//! Presentation of a document's version log.
//!
//! Turns the store's newest-first version list into calendar-day buckets
//! and formats the relative-time strings shown beside each entry. Grouping
//! keys are full calendar dates; weekday names appear only in labels, so
//! two groups falling on the same weekday in different weeks never merge.
//!
//! Every function takes `now` as a parameter; nothing here reads the wall
//! clock.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::revision::ChangeKind;
use crate::types::{DbId, Timestamp};

/// How often a client should recompute relative-time strings, in seconds.
///
/// Recomputation is display-only; the version list itself is not
/// re-fetched.
pub const RELATIVE_TIME_REFRESH_SECS: u64 = 60;

/// A version entry ready for presentation: the storage row joined with its
/// author's display email (or the fallback label).
#[derive(Debug, Clone)]
pub struct VersionSummary {
    pub id: DbId,
    pub title: String,
    pub change: ChangeKind,
    pub author: String,
    pub created_at: Timestamp,
}

/// One presented history entry.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    pub id: DbId,
    pub title: String,
    pub change_type: ChangeKind,
    /// Fixed human description of the change kind.
    pub description: &'static str,
    pub author: String,
    pub created_at: Timestamp,
    /// Relative display time, stale after [`RELATIVE_TIME_REFRESH_SECS`].
    pub relative_time: String,
}

impl HistoryEntry {
    /// Present one summary at the instant `now`.
    pub fn from_summary(summary: VersionSummary, now: Timestamp) -> Self {
        Self {
            id: summary.id,
            title: summary.title,
            change_type: summary.change,
            description: summary.change.description(),
            author: summary.author,
            created_at: summary.created_at,
            relative_time: relative_time(summary.created_at, now),
        }
    }
}

/// Versions sharing one calendar day, labelled relative to `now`.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryGroup {
    /// Display label: "Today", "Yesterday", a weekday name, or a date.
    pub label: String,
    /// The calendar day all entries share. This is the grouping key.
    pub day: NaiveDate,
    pub entries: Vec<HistoryEntry>,
}

/// Group a newest-first version list into day buckets.
///
/// Entries must arrive newest-first (the store's list order). Because the
/// input is sorted, entries of one calendar day are contiguous; each group
/// keeps that internal order and the groups come out date-descending, so
/// "Today" leads, then "Yesterday", then older days by recency.
pub fn group_history(entries: Vec<VersionSummary>, now: Timestamp) -> Vec<HistoryGroup> {
    let mut groups: Vec<HistoryGroup> = Vec::new();

    for entry in entries {
        let day = entry.created_at.date_naive();
        let at = entry.created_at;
        let presented = HistoryEntry::from_summary(entry, now);

        match groups.last_mut() {
            Some(group) if group.day == day => group.entries.push(presented),
            _ => groups.push(HistoryGroup {
                label: day_label(at, now),
                day,
                entries: vec![presented],
            }),
        }
    }

    groups
}

/// Calendar-day label for a timestamp relative to `now`.
///
/// "Today", "Yesterday", the weekday name for 2-6 calendar days back, and
/// the absolute date beyond that. Timestamps on or after today's date
/// (clock skew) label as "Today".
pub fn day_label(at: Timestamp, now: Timestamp) -> String {
    let days_back = (now.date_naive() - at.date_naive()).num_days();

    if days_back <= 0 {
        "Today".to_string()
    } else if days_back == 1 {
        "Yesterday".to_string()
    } else if days_back < 7 {
        at.format("%A").to_string()
    } else {
        absolute_date(at, now)
    }
}

/// Relative display time for a timestamp.
///
/// "just now" under a minute, then minutes, hours, and days with singular
/// forms ("a minute ago", "an hour ago", "a day ago"), falling back to the
/// absolute date at seven days.
pub fn relative_time(at: Timestamp, now: Timestamp) -> String {
    let elapsed = now.signed_duration_since(at);

    if elapsed.num_seconds() < 60 {
        return "just now".to_string();
    }

    let minutes = elapsed.num_minutes();
    if minutes < 60 {
        return if minutes == 1 {
            "a minute ago".to_string()
        } else {
            format!("{minutes} minutes ago")
        };
    }

    let hours = elapsed.num_hours();
    if hours < 24 {
        return if hours == 1 {
            "an hour ago".to_string()
        } else {
            format!("{hours} hours ago")
        };
    }

    let days = elapsed.num_days();
    if days < 7 {
        return if days == 1 {
            "a day ago".to_string()
        } else {
            format!("{days} days ago")
        };
    }

    absolute_date(at, now)
}

/// Absolute date display: "Jan 5", with the year appended only when it
/// differs from the current year ("Jan 5, 2024").
pub fn absolute_date(at: Timestamp, now: Timestamp) -> String {
    if at.year() == now.year() {
        at.format("%b %-d").to_string()
    } else {
        at.format("%b %-d, %Y").to_string()
    }
}
