mod metric;

pub use metric::{Metric, MetricKind};
