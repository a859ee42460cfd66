//! User-visible text for dashboard responses
//!
//! Every string a client may render comes from here so the JSON shape stays
//! identical whichever language is configured.

use serde::{Deserialize, Serialize};
use crate::analyzer::status::MonitorStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Zh,
}

pub struct Texts {
    pub paused: &'static str,
    pub not_checked: &'static str,
    pub up: &'static str,
    pub seems_down: &'static str,
    pub down: &'static str,
    pub unknown: &'static str,

    pub no_monitor_data: &'static str,
    pub no_active_monitors: &'static str,
    pub all_normal: &'static str,
    pub all_down: &'static str,
    partial_down: &'static str,

    pub using_cached_suffix: &'static str,
    pub may_be_outdated_suffix: &'static str,
    pub upstream_failed: &'static str,
    pub loading: &'static str,
    pub cache_unreadable: &'static str,
    pub cache_malformed: &'static str,
    pub empty_request_body: &'static str,
    internal_error: &'static str,
    unsupported_method: &'static str,
    seconds_ago: &'static str,
    minutes_ago: &'static str,
}

static EN: Texts = Texts {
    paused: "paused",
    not_checked: "not checked",
    up: "up",
    seems_down: "seems down",
    down: "down",
    unknown: "unknown",

    no_monitor_data: "no monitor data",
    no_active_monitors: "no active monitors",
    all_normal: "all services normal",
    all_down: "all services down",
    partial_down: "some services down",

    using_cached_suffix: " (using cached data)",
    may_be_outdated_suffix: " (data may be outdated)",
    upstream_failed: "upstream request failed",
    loading: "loading status data...",
    cache_unreadable: "cache file unreadable",
    cache_malformed: "cache data malformed",
    empty_request_body: "empty request body",
    internal_error: "internal server error",
    unsupported_method: "only these methods are supported",
    seconds_ago: "s ago",
    minutes_ago: "min ago",
};

static ZH: Texts = Texts {
    paused: "已暂停",
    not_checked: "待检测",
    up: "正常",
    seems_down: "响应异常",
    down: "宕机",
    unknown: "未知",

    no_monitor_data: "没有监控数据",
    no_active_monitors: "没有活跃的监控",
    all_normal: "所有业务正常",
    all_down: "所有服务异常",
    partial_down: "部分服务异常",

    using_cached_suffix: " (使用缓存数据)",
    may_be_outdated_suffix: " (数据可能过期)",
    upstream_failed: "UptimeRobot 请求失败",
    loading: "正在获取状态数据...",
    cache_unreadable: "无法读取缓存文件",
    cache_malformed: "缓存数据格式错误",
    empty_request_body: "请求体为空",
    internal_error: "服务器内部错误",
    unsupported_method: "只支持以下请求方法",
    seconds_ago: "秒前",
    minutes_ago: "分钟前",
};

impl Locale {
    pub fn texts(&self) -> &'static Texts {
        match self {
            Locale::En => &EN,
            Locale::Zh => &ZH,
        }
    }
}

impl Texts {
    pub fn status_label(&self, status: MonitorStatus) -> &'static str {
        match status {
            MonitorStatus::Paused => self.paused,
            MonitorStatus::NotChecked => self.not_checked,
            MonitorStatus::Up => self.up,
            MonitorStatus::SeemsDown => self.seems_down,
            MonitorStatus::Down => self.down,
            MonitorStatus::Unknown(_) => self.unknown,
        }
    }

    pub fn partial(&self, down: u32, active: u32) -> String {
        format!("{} ({}/{})", self.partial_down, down, active)
    }

    pub fn internal(&self, detail: &str) -> String {
        format!("{}: {}", self.internal_error, detail)
    }

    pub fn method_not_allowed(&self, allowed: &str) -> String {
        format!("{}: {}", self.unsupported_method, allowed)
    }

    /// Short relative age, whole seconds below a minute, rounded minutes above.
    pub fn age(&self, age_secs: u64) -> String {
        if age_secs < 60 {
            format!("{}{}", age_secs, self.seconds_ago)
        } else {
            let minutes = (age_secs as f64 / 60.0).round() as u64;
            format!("{}{}", minutes, self.minutes_ago)
        }
    }
}
