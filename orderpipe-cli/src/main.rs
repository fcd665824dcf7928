//! Orderpipe CLI — filter a transaction log and deliver matching orders.
//!
//! Reads one JSON order per line, keeps the orders matching `--symbol` and
//! `--side`, fetches `{url}/{order_id}` for each and appends every successful
//! response body to the output file. Failed orders are retried with linear
//! backoff, then replayed once more after the whole log has been read.

use anyhow::{Context, Result};
use clap::Parser;
use orderpipe_core::{processor, ProcessorConfig};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "orderpipe",
    about = "Process trading orders from a file",
    long_about = "Filters orders from a transaction log by symbol and side, \
                  then makes an API request for each matching order."
)]
struct Cli {
    /// TOML config file. Flags given on the command line override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Input file containing order data. Defaults to transaction-log.txt.
    #[arg(long)]
    file: Option<PathBuf>,

    /// Output file for API responses. Defaults to output.txt.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Symbol to filter orders by. Defaults to TSLA.
    #[arg(long)]
    symbol: Option<String>,

    /// Side to filter orders by (buy/sell). Defaults to sell.
    #[arg(long)]
    side: Option<String>,

    /// Base URL for the API. Orders are fetched from <URL>/<order_id>.
    #[arg(long)]
    url: Option<String>,

    /// Number of retry attempts for failed requests. Defaults to 3.
    #[arg(long)]
    retry: Option<u32>,

    /// Timeout for HTTP requests (e.g. 30s, 1m, 500ms). Defaults to 30s.
    #[arg(long, value_parser = humantime::parse_duration)]
    timeout: Option<Duration>,

    /// Backoff unit; the n-th retry waits n times this long. Defaults to 1s.
    #[arg(long, value_parser = humantime::parse_duration)]
    backoff: Option<Duration>,

    /// Skip TLS certificate verification.
    #[arg(long, default_value_t = false)]
    insecure: bool,

    /// Enable verbose logging.
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

impl Cli {
    /// Defaults, then the config file, then explicit flags.
    fn resolve(self) -> Result<ProcessorConfig> {
        let mut config = match &self.config {
            Some(path) => ProcessorConfig::from_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => ProcessorConfig::default(),
        };

        if let Some(file) = self.file {
            config.input = file;
        }
        if let Some(output) = self.output {
            config.output = output;
        }
        if let Some(symbol) = self.symbol {
            config.symbol = symbol;
        }
        if let Some(side) = self.side {
            config.side = side;
        }
        if let Some(url) = self.url {
            config.base_url = url;
        }
        if let Some(retry) = self.retry {
            config.retries = retry;
        }
        if let Some(timeout) = self.timeout {
            config.timeout = timeout;
        }
        if let Some(backoff) = self.backoff {
            config.backoff = backoff;
        }
        config.insecure |= self.insecure;
        config.verbose |= self.verbose;

        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    let config = Cli::parse().resolve()?;
    init_logging(config.verbose);

    info!("starting order processor");
    info!("input file: {}", config.input.display());
    info!("output file: {}", config.output.display());
    info!(
        "filtering for symbol: {}, side: {}",
        config.symbol, config.side
    );
    info!(
        "retries: {}, timeout: {}, backoff: {}, insecure: {}",
        config.retries,
        humantime::format_duration(config.timeout),
        humantime::format_duration(config.backoff),
        config.insecure
    );
    if config.insecure {
        warn!("TLS certificate verification is disabled");
    }

    let summary = processor::run(&config).context("processing failed")?;

    if summary.all_delivered() {
        info!("processing completed successfully");
    } else {
        warn!(
            "processing completed; {} order(s) could not be delivered: {}",
            summary.exhausted.len(),
            summary.exhausted.join(", ")
        );
    }
    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stdout)
        .with_target(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("orderpipe").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn no_flags_gives_defaults() {
        assert_eq!(parse(&[]).resolve().unwrap(), ProcessorConfig::default());
    }

    #[test]
    fn flags_override_defaults() {
        let config = parse(&[
            "--file", "in.log",
            "--output", "out.log",
            "--symbol", "AAPL",
            "--side", "buy",
            "--url", "http://localhost:8080/orders",
            "--retry", "0",
            "--timeout", "1m 30s",
            "--backoff", "250ms",
            "--insecure",
            "-v",
        ])
        .resolve()
        .unwrap();

        assert_eq!(config.input, PathBuf::from("in.log"));
        assert_eq!(config.output, PathBuf::from("out.log"));
        assert_eq!(config.symbol, "AAPL");
        assert_eq!(config.side, "buy");
        assert_eq!(config.base_url, "http://localhost:8080/orders");
        assert_eq!(config.retries, 0);
        assert_eq!(config.timeout, Duration::from_secs(90));
        assert_eq!(config.backoff, Duration::from_millis(250));
        assert!(config.insecure);
        assert!(config.verbose);
    }

    #[test]
    fn flags_override_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "symbol = \"MSFT\"\nside = \"buy\"\nretries = 9").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let config = parse(&["--config", &path, "--side", "sell"]).resolve().unwrap();

        assert_eq!(config.symbol, "MSFT");
        assert_eq!(config.side, "sell");
        assert_eq!(config.retries, 9);
    }

    #[test]
    fn negative_retry_is_rejected_by_parser() {
        let result = Cli::try_parse_from(["orderpipe", "--retry", "-1"]);
        assert!(result.is_err());
    }

    #[test]
    fn bad_timeout_is_rejected_by_parser() {
        assert!(Cli::try_parse_from(["orderpipe", "--timeout", "forever"]).is_err());
    }

    #[test]
    fn invalid_url_fails_resolution() {
        assert!(parse(&["--url", "example.com"]).resolve().is_err());
    }
}
