use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// The two metric namespaces known to the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MetricKind {
    /// Point in time value, last write wins
    Gauge,
    /// Accumulated total, each write adds its delta
    Counter,
}

/// Transfer record shared by the agent and the server json surface.
///
/// The kind is kept as the raw string received on the wire so that an
/// unknown kind can be told apart from a malformed document, the two
/// map to different response codes on the read path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub id: String,
    #[serde(rename = "type")]
    pub mtype: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delta: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
}

impl Metric {
    pub fn gauge(id: impl Into<String>, value: f64) -> Self {
        Metric {
            id: id.into(),
            mtype: MetricKind::Gauge.to_string(),
            delta: None,
            value: Some(value),
        }
    }

    pub fn counter(id: impl Into<String>, delta: i64) -> Self {
        Metric {
            id: id.into(),
            mtype: MetricKind::Counter.to_string(),
            delta: Some(delta),
            value: None,
        }
    }

    /// Parsed kind, `None` when the wire string names no known kind
    pub fn kind(&self) -> Option<MetricKind> {
        self.mtype.parse().ok()
    }
}
