use crate::Result as CoreErrorResult;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// Latest resource usage reported by the remote process.
///
/// Every field is optional on the wire; missing or null counters decode as
/// zero and missing or null limits as `None`. Counters may arrive as whole
/// floats (`1048576.0`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsSnapshot {
    /// Raw CPU usage (may exceed 100 on multi-core hosts)
    pub cpu: Option<f64>,
    /// CPU usage divided by core count
    pub cpu_normalized: Option<f64>,
    #[serde(rename = "memory", deserialize_with = "count_or_zero")]
    pub memory_bytes: u64,
    #[serde(rename = "memory_limit", deserialize_with = "optional_count")]
    pub memory_limit_bytes: Option<u64>,
    #[serde(deserialize_with = "optional_count")]
    pub disk_bytes: Option<u64>,
    #[serde(deserialize_with = "count_or_zero")]
    pub players: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub players_list: Vec<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireCount {
    Whole(u64),
    Float(f64),
}

fn optional_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<WireCount>::deserialize(deserializer)? {
        Some(WireCount::Whole(value)) => Ok(Some(value)),
        Some(WireCount::Float(value))
            if value.is_finite() && value >= 0.0 && value.fract() == 0.0 =>
        {
            // Saturates above u64::MAX
            Ok(Some(value as u64))
        }
        Some(WireCount::Float(value)) => Err(D::Error::custom(format!(
            "expected a non-negative whole number, got {}",
            value
        ))),
        None => Ok(None),
    }
}

fn count_or_zero<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<u64> + Default,
{
    match optional_count(deserializer)? {
        Some(value) => T::try_from(value)
            .map_err(|_| D::Error::custom(format!("count {} out of range", value))),
        None => Ok(T::default()),
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl MetricsSnapshot {
    /// Decode the JSON payload that follows a `[METRICS]:` prefix
    #[track_caller]
    pub fn from_json(payload: &str) -> CoreErrorResult<Self> {
        Ok(serde_json::from_str(payload)?)
    }

    /// CPU figure for display, preferring the normalized value
    pub fn cpu_percent(&self) -> Option<f64> {
        self.cpu_normalized.or(self.cpu)
    }

    /// Memory usage as a fraction of the limit, when a limit is known
    pub fn memory_ratio(&self) -> Option<f64> {
        match self.memory_limit_bytes {
            Some(limit) if limit > 0 => Some(self.memory_bytes as f64 / limit as f64),
            _ => None,
        }
    }
}
