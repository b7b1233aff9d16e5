/*
    Poller - self-renewing request/response cycle against one endpoint.

    One cycle: GET with a timeout equal to the period, decode the JSON body,
    hand it to the handler, sleep one period, repeat. The sleep starts when the
    request resolves, so at most one request per poller is ever in flight.

    Failures (transport, timeout, non-2xx, bad JSON) are logged and retried on
    the next cycle with no backoff and no limit. A 401 is different: it means
    the session expired, so the poller asks the navigator to go to the
    application root and stops.

    Pollers run until their cancellation token fires.
*/

use serde::de::DeserializeOwned;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

use crate::client::{ClientError, Fetch};
use crate::metrics;
use crate::navigation::{Navigator, APP_ROOT};
use crate::shutdown::CancellationToken;

/// Shortest period a poller accepts; shorter ones are raised to it
pub const MIN_PERIOD: Duration = Duration::from_millis(10);

/// What a single cycle produced
#[derive(Debug)]
pub enum CycleOutcome<T> {
    /// 2xx with a decodable body; `None` for a JSON `null`
    Payload(Option<T>),
    /// Transient failure, retried next cycle
    Failed(ClientError),
    /// HTTP 401
    Unauthorized,
}

impl<T> CycleOutcome<T> {
    fn label(&self) -> &'static str {
        match self {
            CycleOutcome::Payload(Some(_)) => "ok",
            CycleOutcome::Payload(None) => "empty",
            CycleOutcome::Failed(_) => "failed",
            CycleOutcome::Unauthorized => "unauthorized",
        }
    }
}

/// Why a poller stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollExit {
    Cancelled,
    /// Redirected to the application root after a 401
    Unauthorized,
}

pub struct Poller<F: ?Sized> {
    fetcher: Arc<F>,
    navigator: Arc<dyn Navigator>,
    url: String,
    period: Duration,
    endpoint: &'static str,
}

impl<F: Fetch + ?Sized + 'static> Poller<F> {
    pub fn new(
        fetcher: Arc<F>,
        navigator: Arc<dyn Navigator>,
        url: impl Into<String>,
        period: Duration,
    ) -> Self {
        let url = url.into();
        if period < MIN_PERIOD {
            warn!(url = %url, period_ms = period.as_millis() as u64, "Poll period too short, using minimum");
        }
        Self {
            fetcher,
            navigator,
            url,
            period: period.max(MIN_PERIOD),
            endpoint: "generic",
        }
    }

    /// Label used in logs and metrics
    pub fn endpoint(mut self, endpoint: &'static str) -> Self {
        self.endpoint = endpoint;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Run one request and decode its body
    pub async fn cycle<T: DeserializeOwned>(&self) -> CycleOutcome<T> {
        let request = self.fetcher.fetch(&self.url, self.period);
        let result = match tokio::time::timeout(self.period, request).await {
            Ok(result) => result,
            Err(_) => Err(ClientError::Timeout),
        };

        let decoded = result
            .and_then(|body| serde_json::from_str::<Option<T>>(&body).map_err(ClientError::from));
        match decoded {
            Ok(payload) => CycleOutcome::Payload(payload),
            Err(ClientError::Unauthorized) => CycleOutcome::Unauthorized,
            Err(e) => CycleOutcome::Failed(e),
        }
    }

    /// Poll until cancelled or unauthorized, calling `handler` after every
    /// successful cycle. The handler finishes before the next sleep starts.
    pub async fn run<T, H, Fut>(self, token: CancellationToken, mut handler: H) -> PollExit
    where
        T: DeserializeOwned,
        H: FnMut(Option<T>) -> Fut,
        Fut: Future<Output = ()>,
    {
        info!(
            endpoint = self.endpoint,
            url = %self.url,
            period_ms = self.period.as_millis() as u64,
            "Poller started"
        );

        loop {
            let started = Instant::now();
            let outcome = tokio::select! {
                biased;
                _ = token.cancelled() => break,
                outcome = self.cycle::<T>() => outcome,
            };
            metrics::record_poll_cycle(self.endpoint, outcome.label(), started.elapsed());

            match outcome {
                CycleOutcome::Payload(payload) => {
                    trace!(endpoint = self.endpoint, "Poll cycle succeeded");
                    handler(payload).await;
                }
                CycleOutcome::Failed(e) => {
                    debug!(
                        endpoint = self.endpoint,
                        error = %e,
                        "Poll cycle failed, retrying next period"
                    );
                }
                CycleOutcome::Unauthorized => {
                    warn!(endpoint = self.endpoint, "Session expired, redirecting to {}", APP_ROOT);
                    self.navigator.navigate(APP_ROOT);
                    return PollExit::Unauthorized;
                }
            }

            tokio::select! {
                biased;
                _ = token.cancelled() => break,
                _ = tokio::time::sleep(self.period) => {}
            }
        }

        info!(endpoint = self.endpoint, "Poller cancelled");
        PollExit::Cancelled
    }

    pub fn spawn<T, H, Fut>(self, token: CancellationToken, handler: H) -> JoinHandle<PollExit>
    where
        T: DeserializeOwned + Send + 'static,
        H: FnMut(Option<T>) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        tokio::spawn(self.run(token, handler))
    }
}
