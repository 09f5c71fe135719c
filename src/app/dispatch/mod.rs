mod handlers;
mod listing;
mod middleware;

pub use handlers::configure;
pub use middleware::log_requests;

use crate::core::models::{Metric, MetricKind};
use crate::core::storage::{MetricsSnapshot, Storage};
use actix_web::ResponseError;
use actix_web::http::StatusCode;
use std::fmt;
use std::sync::Arc;

/// Rejections raised at the request boundary, before the store is touched
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    NotFound(String),
    BadRequest(String),
    /// The blocking pool could not run the store call
    Internal(String),
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchError::NotFound(msg) => write!(f, "not found: {}", msg),
            DispatchError::BadRequest(msg) => write!(f, "bad request: {}", msg),
            DispatchError::Internal(msg) => write!(f, "internal error: {}", msg),
        }
    }
}

impl std::error::Error for DispatchError {}

impl ResponseError for DispatchError {
    fn status_code(&self) -> StatusCode {
        match self {
            DispatchError::NotFound(_) => StatusCode::NOT_FOUND,
            DispatchError::BadRequest(_) => StatusCode::BAD_REQUEST,
            DispatchError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Validates inbound metrics and applies them to the store. Shared by the
/// path encoded and the json surfaces so both follow the same rules
pub struct Dispatcher {
    store: Arc<dyn Storage>,
}

impl Dispatcher {
    pub fn new(store: Arc<dyn Storage>) -> Self {
        Dispatcher { store }
    }

    fn require_name(name: &str) -> Result<(), DispatchError> {
        if name.is_empty() {
            return Err(DispatchError::NotFound("metric name is empty".into()));
        }
        Ok(())
    }

    fn finite(value: f64) -> Result<f64, DispatchError> {
        if !value.is_finite() {
            return Err(DispatchError::BadRequest(format!(
                "gauge value {} is not finite",
                value
            )));
        }
        Ok(value)
    }

    fn write_kind(mtype: &str) -> Result<MetricKind, DispatchError> {
        mtype
            .parse()
            .map_err(|_| DispatchError::BadRequest(format!("unknown metric type '{}'", mtype)))
    }

    fn read_kind(mtype: &str) -> Result<MetricKind, DispatchError> {
        mtype
            .parse()
            .map_err(|_| DispatchError::NotFound(format!("unknown metric type '{}'", mtype)))
    }

    /// Applies a path encoded write, `raw` is parsed according to the kind
    pub fn update_from_path(&self, mtype: &str, name: &str, raw: &str) -> Result<(), DispatchError> {
        Self::require_name(name)?;

        match Self::write_kind(mtype)? {
            MetricKind::Counter => {
                let delta = raw.parse::<i64>().map_err(|_| {
                    DispatchError::BadRequest(format!("'{}' is not a valid counter delta", raw))
                })?;
                self.store.accumulate_counter(name, delta);
            }
            MetricKind::Gauge => {
                let value = raw.parse::<f64>().map_err(|_| {
                    DispatchError::BadRequest(format!("'{}' is not a valid gauge value", raw))
                })?;
                self.store.record_gauge(name, Self::finite(value)?);
            }
        }

        Ok(())
    }

    /// Current value rendered as plain text
    pub fn value_from_path(&self, mtype: &str, name: &str) -> Result<String, DispatchError> {
        Self::require_name(name)?;

        let value = match Self::read_kind(mtype)? {
            MetricKind::Counter => self.store.counter(name).map(|v| v.to_string()),
            MetricKind::Gauge => self.store.gauge(name).map(|v| v.to_string()),
        };

        value.ok_or_else(|| DispatchError::NotFound(format!("no {} named '{}'", mtype, name)))
    }

    /// Applies a json write and returns the record with its current value.
    /// Exactly the payload field matching the kind must be present
    pub fn update(&self, mut metric: Metric) -> Result<Metric, DispatchError> {
        Self::require_name(&metric.id)?;

        match (Self::write_kind(&metric.mtype)?, metric.delta, metric.value) {
            (MetricKind::Counter, Some(delta), None) => {
                metric.delta = Some(self.store.accumulate_counter(&metric.id, delta));
            }
            (MetricKind::Gauge, None, Some(value)) => {
                metric.value = Some(self.store.record_gauge(&metric.id, Self::finite(value)?));
            }
            (MetricKind::Counter, _, _) => {
                return Err(DispatchError::BadRequest(
                    "counter requires a delta and no value".into(),
                ));
            }
            (MetricKind::Gauge, _, _) => {
                return Err(DispatchError::BadRequest(
                    "gauge requires a value and no delta".into(),
                ));
            }
        }

        Ok(metric)
    }

    /// Fills the record with the current value of the named metric,
    /// any payload sent by the client is replaced
    pub fn value(&self, mut metric: Metric) -> Result<Metric, DispatchError> {
        Self::require_name(&metric.id)?;

        let not_found =
            || DispatchError::NotFound(format!("no {} named '{}'", metric.mtype, metric.id));

        match Self::read_kind(&metric.mtype)? {
            MetricKind::Counter => {
                let delta = self.store.counter(&metric.id).ok_or_else(not_found)?;
                metric.delta = Some(delta);
                metric.value = None;
            }
            MetricKind::Gauge => {
                let value = self.store.gauge(&metric.id).ok_or_else(not_found)?;
                metric.value = Some(value);
                metric.delta = None;
            }
        }

        Ok(metric)
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        self.store.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::storage::MemStorage;

    fn dispatcher() -> Dispatcher {
        Dispatcher::new(Arc::new(MemStorage::new()))
    }

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            DispatchError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            DispatchError::BadRequest("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            DispatchError::Internal("canceled".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_path_counter_accumulates() {
        let d = dispatcher();

        d.update_from_path("counter", "hits", "10").unwrap();
        assert_eq!(d.value_from_path("counter", "hits").unwrap(), "10");

        d.update_from_path("counter", "hits", "5").unwrap();
        assert_eq!(d.value_from_path("counter", "hits").unwrap(), "15");
    }

    #[test]
    fn test_path_gauge_formatting() {
        let d = dispatcher();

        d.update_from_path("gauge", "temp", "36.6").unwrap();
        assert_eq!(d.value_from_path("gauge", "temp").unwrap(), "36.6");

        d.update_from_path("gauge", "whole", "3").unwrap();
        assert_eq!(d.value_from_path("gauge", "whole").unwrap(), "3");
    }

    #[test]
    fn test_path_rejections() {
        let d = dispatcher();

        assert!(matches!(
            d.update_from_path("counter", "", "1"),
            Err(DispatchError::NotFound(_))
        ));
        assert!(matches!(
            d.update_from_path("histogram", "lat", "1"),
            Err(DispatchError::BadRequest(_))
        ));
        assert!(matches!(
            d.update_from_path("counter", "hits", "1.5"),
            Err(DispatchError::BadRequest(_))
        ));
        assert!(matches!(
            d.update_from_path("gauge", "temp", "warm"),
            Err(DispatchError::BadRequest(_))
        ));
        assert!(matches!(
            d.update_from_path("gauge", "temp", "NaN"),
            Err(DispatchError::BadRequest(_))
        ));
        assert!(d.snapshot().is_empty());
    }

    #[test]
    fn test_read_unknown_kind_and_absent_are_not_found() {
        let d = dispatcher();
        d.update_from_path("counter", "hits", "1").unwrap();

        assert!(matches!(
            d.value_from_path("histogram", "hits"),
            Err(DispatchError::NotFound(_))
        ));
        assert!(matches!(
            d.value_from_path("gauge", "hits"),
            Err(DispatchError::NotFound(_))
        ));
        assert!(matches!(
            d.value_from_path("counter", "misses"),
            Err(DispatchError::NotFound(_))
        ));
    }

    #[test]
    fn test_json_update_echoes_current_value() {
        let d = dispatcher();

        let first = d.update(Metric::counter("hits", 10)).unwrap();
        assert_eq!(first.delta, Some(10));

        let second = d.update(Metric::counter("hits", 5)).unwrap();
        assert_eq!(second, Metric::counter("hits", 15));

        let gauge = d.update(Metric::gauge("temp", 36.6)).unwrap();
        assert_eq!(gauge, Metric::gauge("temp", 36.6));
    }

    #[test]
    fn test_json_update_payload_mismatch() {
        let d = dispatcher();

        let mut both = Metric::counter("hits", 1);
        both.value = Some(1.0);
        assert!(matches!(d.update(both), Err(DispatchError::BadRequest(_))));

        let mut wrong = Metric::gauge("temp", 1.0);
        wrong.mtype = "counter".into();
        assert!(matches!(d.update(wrong), Err(DispatchError::BadRequest(_))));

        let mut none = Metric::gauge("temp", 1.0);
        none.value = None;
        assert!(matches!(d.update(none), Err(DispatchError::BadRequest(_))));

        assert!(d.snapshot().is_empty());
    }

    #[test]
    fn test_json_value_replaces_client_payload() {
        let d = dispatcher();
        d.update(Metric::gauge("temp", 36.6)).unwrap();

        let mut query = Metric::gauge("temp", 0.0);
        query.delta = Some(99);

        assert_eq!(d.value(query).unwrap(), Metric::gauge("temp", 36.6));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            DispatchError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            DispatchError::BadRequest("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }
}
