//! Smoke test CLI for the GeoLayers API.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use geolayers_client::{
    ApiVersion, GeoLayersClient, GeoLayersConfig, RequestExecutor, RetryPolicy, StreamMessage,
    Topic,
};
use geolayers_types::units::format_provider_name;
use geolayers_types::BoundingBox;
use smoke_test::{run_all, SmokeReport, Targets};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "smoke-test")]
#[command(about = "Smoke test for the GeoLayers API", long_about = None)]
struct Cli {
    /// API server URL
    #[arg(long, env = "GEOLAYERS_BASE_URL")]
    base_url: String,

    /// API key sent with every request
    #[arg(long, env = "GEOLAYERS_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Preferred API generation: v1 or v2
    #[arg(long, env = "GEOLAYERS_API_VERSION", default_value = "v1")]
    api_version: ApiVersion,

    /// Retries per request
    #[arg(long, env = "GEOLAYERS_RETRIES", default_value = "2")]
    retries: u32,

    /// Delay before the first retry in milliseconds; doubles after each retry
    #[arg(long, env = "GEOLAYERS_RETRY_DELAY_MS", default_value = "1000")]
    retry_delay_ms: u64,

    /// Request timeout in milliseconds
    #[arg(long, env = "GEOLAYERS_TIMEOUT_MS", default_value = "30000")]
    timeout_ms: u64,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Call every API operation once
    Run {
        /// WIS2 station for observation and chart checks
        #[arg(long, default_value = "0-20000-0-72503")]
        wis2_station: String,

        /// IEM station for observation checks
        #[arg(long, default_value = "KJFK")]
        iem_station: String,

        /// NDBC buoy id
        #[arg(long, default_value = "41001")]
        buoy: String,

        /// Callsign for the flight schedule check
        #[arg(long, default_value = "UAL1234")]
        callsign: String,

        /// Box for the bbox observation check: minLon,minLat,maxLon,maxLat
        #[arg(
            long,
            default_value = "-80,30,-65,45",
            allow_hyphen_values = true,
            value_parser = BoundingBox::from_query_string
        )]
        bbox: BoundingBox,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },

    /// Listen to the real-time event stream
    Stream {
        /// How long to listen, in seconds
        #[arg(short, long, default_value = "30")]
        seconds: u64,

        /// Only show events from this provider
        #[arg(short, long)]
        provider: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    fmt().with_env_filter(filter).with_target(true).init();

    let config = GeoLayersConfig::new(&cli.base_url, &cli.api_key)
        .with_api_version(cli.api_version)
        .with_retries(cli.retries)
        .with_timeout(Duration::from_millis(cli.timeout_ms));
    let retry = RetryPolicy::from_config(&config)
        .with_base_delay(Duration::from_millis(cli.retry_delay_ms));
    let executor = RequestExecutor::builder(config)
        .with_retry_policy(retry)
        .build()
        .context("Failed to build GeoLayers client")?;
    let client = GeoLayersClient::from_executor(Arc::new(executor));

    match cli.command {
        Commands::Run {
            wis2_station,
            iem_station,
            buoy,
            callsign,
            bbox,
            output,
        } => {
            let targets = Targets {
                wis2_station,
                iem_station,
                buoy,
                callsign,
                bbox,
            };
            info!(base_url = %cli.base_url, version = ?cli.api_version, "Running smoke test");

            let results = run_all(&client, &targets).await;

            match output.as_str() {
                "json" => println!("{}", SmokeReport::format_json(&cli.base_url, &results)?),
                _ => println!("{}", SmokeReport::format_table(&cli.base_url, &results)),
            }

            if SmokeReport::passed(&results) < results.len() {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Stream { seconds, provider } => {
            let topic = provider.map(Topic::Provider).unwrap_or(Topic::All);
            let mut stream = client.events().context("Failed to create event stream")?;
            let mut events = stream.subscribe(topic);
            let mut errors = stream.subscribe(Topic::Error);
            stream.connect().context("Failed to start event stream")?;

            println!("Listening for {}s...", seconds);
            let deadline = tokio::time::sleep(Duration::from_secs(seconds));
            tokio::pin!(deadline);

            let mut received = 0usize;
            loop {
                tokio::select! {
                    _ = &mut deadline => break,
                    Ok(message) = events.recv() => {
                        if let StreamMessage::Event(event) = message {
                            received += 1;
                            println!(
                                "{} {} {:?}",
                                event.timestamp,
                                format_provider_name(&event.provider),
                                event.action
                            );
                        }
                    }
                    Ok(message) = errors.recv() => {
                        if let StreamMessage::Error(e) = message {
                            eprintln!("stream error: {}", e);
                        }
                    }
                }
            }

            stream.disconnect();
            println!("{} events received", received);
            Ok(())
        }
    }
}
