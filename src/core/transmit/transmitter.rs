use crate::core::models::Metric;
use crate::core::storage::Storage;
use crate::core::transmit::MetricClient;
use std::sync::Arc;
use std::time::Duration;
use tokio::select;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Outcome of a single reporting pass
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReportSummary {
    pub sent: usize,
    pub failed: usize,
}

/// Periodically pushes every metric of a store to the server,
/// one request per metric.
///
/// Counters are sent as the delta accumulated since the last
/// acknowledged push: an acknowledged delta is subtracted from the
/// store, a failed one stays and goes out again with the next pass.
pub struct Transmitter {
    store: Arc<dyn Storage>,
    client: MetricClient,
}

impl Transmitter {
    pub fn new(store: Arc<dyn Storage>, client: MetricClient) -> Self {
        Transmitter { store, client }
    }

    async fn push(&self, metric: &Metric) -> bool {
        match self.client.push(metric).await {
            Ok(res) if res.status.is_success() => {
                if let Some(echoed) = res.echoed {
                    match (echoed.delta, echoed.value) {
                        (Some(total), _) => debug!("Server total for {} is {}", echoed.id, total),
                        (_, Some(value)) => debug!("Server value for {} is {}", echoed.id, value),
                        _ => {}
                    }
                }
                true
            }
            Ok(res) => {
                warn!("Server rejected {} {}: {}", metric.mtype, metric.id, res.status);
                false
            }
            Err(e) => {
                warn!("{}", e);
                false
            }
        }
    }

    /// Pushes the current snapshot. Failures are logged and skipped,
    /// the next pass is the retry
    pub async fn report_once(&self) -> ReportSummary {
        let snapshot = self.store.snapshot();
        let mut summary = ReportSummary::default();

        for (name, value) in &snapshot.gauges {
            if self.push(&Metric::gauge(name, *value)).await {
                summary.sent += 1;
            } else {
                summary.failed += 1;
            }
        }

        for (name, delta) in &snapshot.counters {
            if *delta == 0 {
                continue;
            }

            if self.push(&Metric::counter(name, *delta)).await {
                self.store.accumulate_counter(name, delta.saturating_neg());
                summary.sent += 1;
            } else {
                summary.failed += 1;
            }
        }

        summary
    }

    /// Reports every `period`, first pass one period after start, until
    /// `cancel` fires. Cancellation abandons a pass in flight
    pub fn spawn(self: Arc<Self>, period: Duration, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            ticker.tick().await;

            info!("Reporting metrics to {} every {:?}", self.client.update_url(), period);

            loop {
                select! {
                    _ = cancel.cancelled() => break,
                    _ = ticker.tick() => {}
                }

                select! {
                    _ = cancel.cancelled() => break,
                    summary = self.report_once() => {
                        debug!("Reported metrics, sent={} failed={}", summary.sent, summary.failed);
                    }
                }
            }

            debug!("Transmitter stopped");
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::dispatch::{Dispatcher, configure};
    use crate::core::storage::MemStorage;
    use actix_web::dev::ServerHandle;
    use actix_web::{App, HttpServer, web};
    use std::net::SocketAddr;

    fn start_server(store: Arc<dyn Storage>) -> (SocketAddr, ServerHandle) {
        let dispatcher = web::Data::new(Dispatcher::new(store));

        let server = HttpServer::new(move || {
            App::new()
                .app_data(dispatcher.clone())
                .configure(configure)
        })
        .workers(1)
        .disable_signals()
        .bind(("127.0.0.1", 0))
        .unwrap();

        let addr = server.addrs()[0];
        let server = server.run();
        let handle = server.handle();
        actix_web::rt::spawn(server);

        (addr, handle)
    }

    #[actix_web::test]
    async fn test_report_pushes_gauges_and_drains_counters() {
        let server_store: Arc<dyn Storage> = Arc::new(MemStorage::new());
        let (addr, handle) = start_server(server_store.clone());

        let agent_store: Arc<dyn Storage> = Arc::new(MemStorage::new());
        agent_store.record_gauge("RandomValue", 0.75);
        agent_store.accumulate_counter("PollCount", 3);

        let client = MetricClient::new(&addr.to_string(), true).unwrap();
        let transmitter = Transmitter::new(agent_store.clone(), client);

        let summary = transmitter.report_once().await;
        assert_eq!(summary, ReportSummary { sent: 2, failed: 0 });
        assert_eq!(server_store.gauge("RandomValue"), Some(0.75));
        assert_eq!(server_store.counter("PollCount"), Some(3));
        assert_eq!(agent_store.counter("PollCount"), Some(0));

        // nothing new accumulated, only the gauge goes out again
        agent_store.accumulate_counter("PollCount", 2);
        let summary = transmitter.report_once().await;
        assert_eq!(summary, ReportSummary { sent: 2, failed: 0 });
        assert_eq!(server_store.counter("PollCount"), Some(5));

        let summary = transmitter.report_once().await;
        assert_eq!(summary, ReportSummary { sent: 1, failed: 0 });
        assert_eq!(server_store.counter("PollCount"), Some(5));

        handle.stop(false).await;
    }

    #[actix_web::test]
    async fn test_push_reads_server_total() {
        let server_store: Arc<dyn Storage> = Arc::new(MemStorage::new());
        let (addr, handle) = start_server(server_store);

        let client = MetricClient::new(&addr.to_string(), true).unwrap();

        let first = client.push(&Metric::counter("hits", 3)).await.unwrap();
        assert!(first.status.is_success());
        assert_eq!(first.echoed, Some(Metric::counter("hits", 3)));

        let second = client.push(&Metric::counter("hits", 4)).await.unwrap();
        assert_eq!(second.echoed, Some(Metric::counter("hits", 7)));

        let rejected = client.push(&Metric::counter("", 1)).await.unwrap();
        assert_eq!(rejected.status.as_u16(), 404);
        assert_eq!(rejected.echoed, None);

        handle.stop(false).await;
    }

    #[actix_web::test]
    async fn test_failed_push_keeps_counter_delta() {
        // bind then drop to get a port with nothing listening
        let addr = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap();

        let agent_store: Arc<dyn Storage> = Arc::new(MemStorage::new());
        agent_store.record_gauge("RandomValue", 0.5);
        agent_store.accumulate_counter("PollCount", 4);

        let client = MetricClient::new(&addr.to_string(), true).unwrap();
        let transmitter = Transmitter::new(agent_store.clone(), client);

        let summary = transmitter.report_once().await;
        assert_eq!(summary, ReportSummary { sent: 0, failed: 2 });
        assert_eq!(agent_store.counter("PollCount"), Some(4));
    }
}
