use crate::core::models::Metric;
use anyhow::anyhow;
use std::cell::RefCell;

thread_local! {
    static COMPRESSOR: RefCell<libdeflater::Compressor> =
        RefCell::new(libdeflater::Compressor::new(libdeflater::CompressionLvl::fastest()));
}

pub struct Header {
    pub key: &'static str,
    pub value: &'static str,
}

impl Header {
    pub fn new(key: &'static str, value: &'static str) -> Self {
        Self { key, value }
    }
}

/// A metric serialized for the json surface, with the headers
/// the server needs to decode it
pub struct EncodedMetric {
    pub headers: Vec<Header>,
    pub data: Vec<u8>,
}

pub struct MetricEncoder;

impl MetricEncoder {
    fn compress(data: Vec<u8>) -> Result<Vec<u8>, anyhow::Error> {
        COMPRESSOR.with(|c| {
            let mut compressor = c.borrow_mut();
            let max_size = compressor.gzip_compress_bound(data.len());
            let mut compressed = vec![0u8; max_size];

            let actual_size = compressor
                .gzip_compress(&data, &mut compressed)
                .map_err(|e| anyhow!("Compression failed: {:?}", e))?;

            compressed.truncate(actual_size);
            Ok(compressed)
        })
    }

    /// Encodes the metric as json, optionally gzip compressed
    pub fn encode(metric: &Metric, gzip: bool) -> Result<EncodedMetric, anyhow::Error> {
        let mut headers = vec![Header::new("content-type", "application/json")];

        let mut data = serde_json::to_vec(metric)?;

        if gzip {
            headers.push(Header::new("content-encoding", "gzip"));
            data = Self::compress(data)?;
        }

        Ok(EncodedMetric { headers, data })
    }
}
