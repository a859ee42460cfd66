//! Monitor list analysis
//!
//! Turns a raw provider payload into the dashboard's view: per-monitor rows
//! with readable labels, bucket counts and one overall classification.
//! Nothing in here looks at the clock or the cache; callers annotate the
//! result with cache metadata.

pub mod locale;
pub mod payload;
pub mod status;

use serde::Serialize;

pub use locale::Locale;
pub use payload::{MonitorRecord, Payload};
pub use status::{Bucket, MonitorStatus};

/// Overall dashboard state
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OverallStatus {
    Ok,
    Partial,
    Error,
    /// Nothing has been cached yet; only produced by the cache-only endpoint.
    Loading,
}

/// Bucket counts
///
/// `total == up + down + paused + unknown` holds for every summary built by
/// [`Summary::tally`].
#[derive(Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub total: u32,
    pub up: u32,
    pub down: u32,
    pub paused: u32,
    /// Not-yet-checked monitors and codes outside the documented set
    pub unknown: u32,
}

impl Summary {
    pub fn tally<I: IntoIterator<Item = MonitorStatus>>(statuses: I) -> Self {
        let mut summary = Summary::default();
        for status in statuses {
            summary.total += 1;
            match status.bucket() {
                Bucket::Up => summary.up += 1,
                Bucket::Down => summary.down += 1,
                Bucket::Paused => summary.paused += 1,
                Bucket::Unknown => summary.unknown += 1,
            }
        }
        summary
    }

    /// Monitors that are not paused. Unknown ones count as active.
    pub fn active(&self) -> u32 {
        self.total - self.paused
    }

    /// Overall status and message, decided from the counts alone
    pub fn classify(&self, locale: Locale) -> (OverallStatus, String) {
        let texts = locale.texts();
        let active = self.active();
        if active == 0 {
            (OverallStatus::Error, texts.no_active_monitors.to_string())
        } else if self.down == 0 {
            (OverallStatus::Ok, texts.all_normal.to_string())
        } else if self.down < active {
            (OverallStatus::Partial, texts.partial(self.down, active))
        } else {
            (OverallStatus::Error, texts.all_down.to_string())
        }
    }
}

/// One monitor row as sent to the dashboard
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct MonitorView {
    pub id: i64,
    pub name: String,
    pub url: String,
    pub status: i64,
    pub status_text: String,
    pub uptime_1d: String,
    pub uptime_7d: String,
    pub uptime_30d: String,
    pub avg_response: String,
}

impl MonitorView {
    fn from_record(record: &MonitorRecord, locale: Locale) -> Self {
        // A missing code is how the provider reports a paused monitor.
        let status = MonitorStatus::from_code(record.status.unwrap_or(0));
        let [uptime_1d, uptime_7d, uptime_30d] =
            uptime_ranges(record.custom_uptime_ranges.as_deref().unwrap_or("0-0-0"));

        Self {
            id: record.id.unwrap_or(0),
            name: record
                .friendly_name
                .clone()
                .unwrap_or_else(|| "Unknown".to_string()),
            url: record.url.clone().unwrap_or_default(),
            status: status.code(),
            status_text: status.label(locale).to_string(),
            uptime_1d,
            uptime_7d,
            uptime_30d,
            avg_response: record
                .average_response_time
                .map(format_number)
                .unwrap_or_else(|| "0".to_string()),
        }
    }
}

/// Analyzer output
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct StatusReport {
    pub status: OverallStatus,
    pub message: String,
    pub monitors: Vec<MonitorView>,
    pub summary: Summary,
}

impl StatusReport {
    /// Fixed-shape report carrying no monitors, used for every failure body.
    pub fn empty(status: OverallStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            monitors: Vec::new(),
            summary: Summary::default(),
        }
    }
}

pub fn analyze(payload: &Payload, locale: Locale) -> StatusReport {
    let records = payload.monitors.as_deref().unwrap_or_default();
    if records.is_empty() {
        return StatusReport::empty(OverallStatus::Error, locale.texts().no_monitor_data);
    }

    let monitors: Vec<MonitorView> = records
        .iter()
        .map(|record| MonitorView::from_record(record, locale))
        .collect();
    let summary = Summary::tally(monitors.iter().map(|m| MonitorStatus::from_code(m.status)));
    let (status, message) = summary.classify(locale);

    StatusReport {
        status,
        message,
        monitors,
        summary,
    }
}

fn uptime_ranges(ranges: &str) -> [String; 3] {
    let mut parts = ranges.split('-');
    std::array::from_fn(|_| {
        let pct = parts
            .next()
            .and_then(|p| p.trim().parse::<f64>().ok())
            .unwrap_or(0.0);
        format!("{}%", format_number(pct))
    })
}

/// Rounds to two decimals and drops trailing zeros: `99.950` -> `99.95`,
/// `100.000` -> `100`.
fn format_number(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded.fract() == 0.0 {
        format!("{}", rounded as i64)
    } else {
        format!("{}", rounded)
    }
}
