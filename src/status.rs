//! Course status relative to "now".
//!
//! Pure function of three instants; no clock is read here.

use chrono::{DateTime, TimeZone};

/// Detail shown once nothing is left for the day
pub const ENDED_DETAIL: &str = "今日所有课程已结束";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusLabel {
    InProgress,
    UpNext,
    Ended,
}

impl StatusLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            StatusLabel::InProgress => "进行中",
            StatusLabel::UpNext => "下一节",
            StatusLabel::Ended => "已结束",
        }
    }
}

impl std::fmt::Display for StatusLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseStatus {
    pub label: StatusLabel,
    pub detail: String,
}

/// Classify a course against `now`.
///
/// A course with only one bound known is reported as ended, same as one with
/// neither.
pub fn classify<Tz: TimeZone>(
    now: &DateTime<Tz>,
    start: Option<&DateTime<Tz>>,
    end: Option<&DateTime<Tz>>,
) -> CourseStatus {
    if let (Some(start), Some(end)) = (start, end) {
        if start <= now && now < end {
            let minutes = whole_minutes(now, end);
            return CourseStatus {
                label: StatusLabel::InProgress,
                detail: format!("剩余 {}", format_minutes(minutes)),
            };
        }
        if now < start {
            let minutes = whole_minutes(now, start);
            return CourseStatus {
                label: StatusLabel::UpNext,
                detail: format!("{}后", format_minutes(minutes)),
            };
        }
    }
    CourseStatus {
        label: StatusLabel::Ended,
        detail: ENDED_DETAIL.to_string(),
    }
}

/// `"M 分钟"` below an hour, `"H 小时 M 分钟"` from 60 minutes on.
pub fn format_minutes(minutes: i64) -> String {
    if minutes >= 60 {
        format!("{} 小时 {} 分钟", minutes / 60, minutes % 60)
    } else {
        format!("{} 分钟", minutes)
    }
}

// Truncates: 59m59s counts as 59 minutes.
fn whole_minutes<Tz: TimeZone>(from: &DateTime<Tz>, to: &DateTime<Tz>) -> i64 {
    to.clone().signed_duration_since(from.clone()).num_seconds() / 60
}
