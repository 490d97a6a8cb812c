//! Voter records and upload-task status as served by `/voters`. Both are
//! read-only on the client.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use std::cmp::Ordering;

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct Voter {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub gender: String,
    pub full_name: String,
    #[serde(default)]
    pub department: String,
    pub matriculation_number: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UploadStatus {
    Processing,
    Completed,
    Failed,
    /// Anything the backend reports that the client does not know is shown as
    /// pending.
    #[serde(other)]
    Pending,
}

impl UploadStatus {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            UploadStatus::Pending => "Pending",
            UploadStatus::Processing => "Processing",
            UploadStatus::Completed => "Completed",
            UploadStatus::Failed => "Failed",
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct UploadTask {
    pub id: String,
    pub file: String,
    pub status: UploadStatus,
    #[serde(default)]
    pub processed_records: u64,
    #[serde(default)]
    pub total_records: Option<u64>,
    #[serde(default)]
    pub reason: Option<String>,
    pub created_at: String,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl UploadTask {
    /// Processed share of the file, 0 until the total is known, capped at 100.
    #[must_use]
    pub fn progress_percent(&self) -> u8 {
        match self.total_records {
            Some(total) if total > 0 => {
                let percent = self.processed_records.saturating_mul(100) / total;
                u8::try_from(percent.min(100)).unwrap_or(100)
            }
            _ => 0,
        }
    }

    /// Failure reason, only for failed tasks that carry one.
    #[must_use]
    pub fn failure_reason(&self) -> Option<&str> {
        if self.status != UploadStatus::Failed {
            return None;
        }
        self.reason
            .as_deref()
            .map(str::trim)
            .filter(|reason| !reason.is_empty())
    }

    #[must_use]
    pub fn created(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.created_at)
    }
}

/// Accepts RFC 3339 and offset-less ISO timestamps (treated as UTC).
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|parsed| parsed.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|naive| naive.and_utc())
        })
}

/// Oldest first. Unparseable timestamps sort last; the sort is stable.
pub fn sort_uploads(tasks: &mut [UploadTask]) {
    tasks.sort_by(|left, right| match (left.created(), right.created()) {
        (Some(left), Some(right)) => left.cmp(&right),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}
