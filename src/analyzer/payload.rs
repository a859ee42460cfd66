//! Raw `getMonitors` response as stored in the cache file
//!
//! Only the fields the analyzer reads are modelled. The provider is loose
//! about number encoding (`"123.456"` vs `123.456`), so numeric fields accept
//! both and fall back to `None` on anything else instead of failing the whole
//! payload.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Payload {
    #[serde(default)]
    pub stat: Option<String>,
    /// `None` when the key is absent, which is different from an empty list.
    #[serde(default)]
    pub monitors: Option<Vec<MonitorRecord>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MonitorRecord {
    #[serde(default, deserialize_with = "lenient_i64")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub friendly_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub status: Option<i64>,
    /// `"1d-7d-30d"` percentages, e.g. `"100.000-99.950-99.983"`
    #[serde(default, deserialize_with = "lenient_string")]
    pub custom_uptime_ranges: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub average_response_time: Option<f64>,
}

impl Payload {
    pub fn parse(raw: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(raw)
    }

    /// The provider answers bad keys and quota errors with HTTP 200 and
    /// `"stat": "fail"`.
    pub fn is_rejection(&self) -> bool {
        self.stat.as_deref() == Some("fail")
    }
}

fn lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    })
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    })
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}
