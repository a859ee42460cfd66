use crate::analyzer::locale::Locale;

/// Monitor state as reported by the provider's `status` field
///
/// The provider documents a closed set of codes. Anything outside that set is
/// kept as `Unknown` with the raw code so it can still be echoed back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorStatus {
    Paused,
    NotChecked,
    Up,
    SeemsDown,
    Down,
    Unknown(i64),
}

/// Summary bucket a monitor is tallied into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    Up,
    Down,
    Paused,
    Unknown,
}

impl MonitorStatus {
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => MonitorStatus::Paused,
            1 => MonitorStatus::NotChecked,
            2 => MonitorStatus::Up,
            8 => MonitorStatus::SeemsDown,
            9 => MonitorStatus::Down,
            other => MonitorStatus::Unknown(other),
        }
    }

    pub fn code(&self) -> i64 {
        match self {
            MonitorStatus::Paused => 0,
            MonitorStatus::NotChecked => 1,
            MonitorStatus::Up => 2,
            MonitorStatus::SeemsDown => 8,
            MonitorStatus::Down => 9,
            MonitorStatus::Unknown(code) => *code,
        }
    }

    /// "Seems down" counts as down: the provider already saw a failed check.
    pub fn bucket(&self) -> Bucket {
        match self {
            MonitorStatus::Up => Bucket::Up,
            MonitorStatus::Down | MonitorStatus::SeemsDown => Bucket::Down,
            MonitorStatus::Paused => Bucket::Paused,
            MonitorStatus::NotChecked | MonitorStatus::Unknown(_) => Bucket::Unknown,
        }
    }

    pub fn label(&self, locale: Locale) -> &'static str {
        locale.texts().status_label(*self)
    }
}
