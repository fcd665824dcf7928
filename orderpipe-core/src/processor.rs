//! Run orchestration: input file → reader → delivery engine → output file.
//!
//! Every matching order is delivered inline as soon as it is read. Orders
//! that exhaust their first-pass budget are queued and replayed once after
//! the input is fully consumed. Only resource failures abort the run;
//! everything else is logged and the run continues.

use crate::config::{ConfigError, ProcessorConfig};
use crate::delivery::{
    DeliveryEngine, DeliveryError, HttpGateway, OrderGateway, RetryQueue, Sleeper, ThreadSleeper,
};
use crate::feed::{FeedError, OrderReader};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{info, warn};

/// Errors that abort the whole run.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("failed to open input file {}: {source}", path.display())]
    OpenInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to create output file {}: {source}", path.display())]
    CreateOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    ReadInput(#[from] FeedError),

    /// Only fatal delivery errors (a broken output sink) end up here.
    #[error(transparent)]
    Delivery(#[from] DeliveryError),

    #[error("failed to flush output: {0}")]
    FlushOutput(#[source] std::io::Error),
}

/// What happened to the input during one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Orders that passed the filter.
    pub matched: usize,
    /// Delivered during the first pass.
    pub delivered: usize,
    /// Pushed onto the retry queue.
    pub requeued: usize,
    /// Delivered during queue replay.
    pub recovered: usize,
    /// Ids of orders that failed both passes.
    pub exhausted: Vec<String>,
    pub malformed: usize,
    pub filtered_out: usize,
}

impl RunSummary {
    pub fn all_delivered(&self) -> bool {
        self.exhausted.is_empty()
    }
}

/// Run against the configured HTTP endpoint.
pub fn run(config: &ProcessorConfig) -> Result<RunSummary, RunError> {
    config.validate()?;
    let gateway = HttpGateway::new(config.base_url.clone(), config.timeout, config.insecure)?;
    run_with(config, gateway, ThreadSleeper)
}

/// Run with an explicit gateway and sleeper.
pub fn run_with<G, S>(
    config: &ProcessorConfig,
    gateway: G,
    sleeper: S,
) -> Result<RunSummary, RunError>
where
    G: OrderGateway,
    S: Sleeper,
{
    let input = File::open(&config.input).map_err(|source| RunError::OpenInput {
        path: config.input.clone(),
        source,
    })?;
    let output = File::create(&config.output).map_err(|source| RunError::CreateOutput {
        path: config.output.clone(),
        source,
    })?;

    run_streams(
        BufReader::new(input),
        BufWriter::new(output),
        config,
        gateway,
        sleeper,
    )
}

/// Run over already opened streams.
///
/// On a fatal error the sink is dropped without an explicit flush, so a
/// buffered sink keeps whatever its `Drop` writes out.
pub fn run_streams<R, W, G, S>(
    input: R,
    output: W,
    config: &ProcessorConfig,
    gateway: G,
    sleeper: S,
) -> Result<RunSummary, RunError>
where
    R: BufRead,
    W: Write,
    G: OrderGateway,
    S: Sleeper,
{
    let mut reader = OrderReader::new(input, config.filter());
    let mut engine =
        DeliveryEngine::with_sleeper(gateway, output, config.retry_policy(), sleeper);
    let mut queue = RetryQueue::new();
    let mut summary = RunSummary::default();

    for order in reader.by_ref() {
        let order = order?;
        summary.matched += 1;
        info!("processing order {}: {}", order.id, order.describe());

        match engine.deliver(&order, 0) {
            Ok(()) => summary.delivered += 1,
            Err(e) if e.is_fatal() => return Err(e.into()),
            Err(e) => {
                warn!(
                    "failed to process order {}, adding to retry queue: {e}",
                    order.id
                );
                queue.push(order);
            }
        }
    }

    let stats = reader.stats();
    summary.malformed = stats.malformed;
    summary.filtered_out = stats.filtered_out;
    summary.requeued = queue.len();

    let report = engine.replay(queue)?;
    summary.recovered = report.recovered.len();
    summary.exhausted = report.exhausted;

    engine
        .into_sink()
        .flush()
        .map_err(RunError::FlushOutput)?;

    info!(
        "run complete: {} matched, {} delivered, {} requeued, {} recovered, {} exhausted, {} malformed, {} filtered out",
        summary.matched,
        summary.delivered,
        summary.requeued,
        summary.recovered,
        summary.exhausted.len(),
        summary.malformed,
        summary.filtered_out
    );

    Ok(summary)
}
