mod client;
mod encoding;
mod transmitter;

pub use client::{MetricClient, PushResponse};
pub use encoding::{EncodedMetric, Header, MetricEncoder};
pub use transmitter::{ReportSummary, Transmitter};
