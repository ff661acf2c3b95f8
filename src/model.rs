//! Records handed in by the schedule parser.
//!
//! Optional fields are resolved to their named defaults once, when the record
//! is built or deserialized, so drawing code never has to guess.

use chrono::{DateTime, FixedOffset};
use serde::Deserialize;
use std::time::Duration;

/// Summary shown when a course has no title
pub const DEFAULT_SUMMARY: &str = "无课程信息";
/// Location shown when a course has no location
pub const DEFAULT_LOCATION: &str = "未知地点";

/// One user's current or next course.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawCourseEntry")]
pub struct CourseEntry {
    pub user_id: String,
    /// Display name, defaults to `user_id`
    pub nickname: String,
    /// Course title
    pub summary: String,
    pub location: String,
    pub start_time: Option<DateTime<FixedOffset>>,
    pub end_time: Option<DateTime<FixedOffset>>,
}

impl CourseEntry {
    /// A course record with every optional field at its default.
    pub fn new(user_id: impl Into<String>) -> Self {
        let user_id = user_id.into();
        Self {
            nickname: user_id.clone(),
            user_id,
            summary: DEFAULT_SUMMARY.to_string(),
            location: DEFAULT_LOCATION.to_string(),
            start_time: None,
            end_time: None,
        }
    }

    pub fn with_nickname(mut self, nickname: impl Into<String>) -> Self {
        self.nickname = nickname.into();
        self
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    pub fn with_times(
        mut self,
        start: Option<DateTime<FixedOffset>>,
        end: Option<DateTime<FixedOffset>>,
    ) -> Self {
        self.start_time = start;
        self.end_time = end;
        self
    }

    /// Start and end, only when both are known.
    pub fn time_range(&self) -> Option<(DateTime<FixedOffset>, DateTime<FixedOffset>)> {
        self.start_time.zip(self.end_time)
    }
}

#[derive(Deserialize)]
struct RawCourseEntry {
    user_id: String,
    #[serde(default)]
    nickname: Option<String>,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    start_time: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    end_time: Option<DateTime<FixedOffset>>,
}

impl From<RawCourseEntry> for CourseEntry {
    fn from(raw: RawCourseEntry) -> Self {
        let mut entry = CourseEntry::new(raw.user_id).with_times(raw.start_time, raw.end_time);
        if let Some(nickname) = raw.nickname {
            entry.nickname = nickname;
        }
        if let Some(summary) = raw.summary {
            entry.summary = summary;
        }
        if let Some(location) = raw.location {
            entry.location = location;
        }
        entry
    }
}

/// One row of the weekly ranking. Rank is the position in the caller's list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RankingEntry {
    pub user_id: String,
    pub nickname: String,
    /// Accumulated attendance time
    pub total_duration: Duration,
    pub course_count: u32,
}

impl RankingEntry {
    pub fn new(
        user_id: impl Into<String>,
        nickname: impl Into<String>,
        total_duration: Duration,
        course_count: u32,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            nickname: nickname.into(),
            total_duration,
            course_count,
        }
    }

    /// `"{h}h {m}m"`, seconds are dropped.
    pub fn duration_label(&self) -> String {
        let total = self.total_duration.as_secs();
        format!("{}h {}m", total / 3600, (total % 3600) / 60)
    }

    pub fn count_label(&self) -> String {
        format!("{} 节", self.course_count)
    }
}
