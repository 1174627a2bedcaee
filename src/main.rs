use anyhow::Result;
use clap::{Args, Parser};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dioscope_scheduler::{
    backend::BackendClient,
    config::Config,
    errors::AppError,
    job::{BundleJobRequest, JobOptions},
    models::JobKind,
    scheduler::JobScheduler,
    sources::{ElasticsearchIndex, FeedKind, FeedRequest, ItunesClient},
};

#[derive(Parser)]
#[command(name = "dioscope-scheduler")]
#[command(version)]
#[command(about = "Schedule backend jobs from different sources")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "scheduler.toml")]
    config: String,

    /// The backend url (overrides config file)
    #[arg(short, long, value_name = "URL")]
    backend: Option<String>,

    /// The accountId to use
    #[arg(short, long)]
    account: Option<String>,

    /// The execution strategy and duration to use
    #[arg(short, long)]
    strategy: Option<String>,

    #[command(flatten)]
    source: DataSource,

    /// Use the given genre only (defaults to all)
    #[arg(long, value_name = "id")]
    itunes_genre: Option<u32>,

    /// The store country to use (defaults to the configured country, "de")
    #[arg(long, value_name = "countryCode")]
    itunes_country: Option<String>,

    /// The Elasticsearch host for --dioscope-new
    #[arg(long, value_name = "URL")]
    dioscope_host: Option<String>,

    /// The Elasticsearch index for --dioscope-new
    #[arg(long, value_name = "INDEX")]
    dioscope_index: Option<String>,

    /// Log level
    #[arg(short = 'v', long, default_value = "info")]
    log_level: String,
}

/// Where the apps to schedule come from
#[derive(Args)]
#[group(required = true, multiple = false)]
struct DataSource {
    /// Just schedule a given bundleId
    #[arg(long, value_name = "com.company.app")]
    bundle_id: Option<String>,

    /// The app's App Store id
    #[arg(long, value_name = "trackId")]
    app_id: Option<u64>,

    /// Use the top N free apps (defaults to 10)
    #[arg(long, value_name = "n", num_args = 0..=1, default_missing_value = "10")]
    itunes_top: Option<u32>,

    /// Use the top N new (and free) apps (defaults to 10)
    #[arg(long, value_name = "n", num_args = 0..=1, default_missing_value = "10")]
    itunes_new: Option<u32>,

    /// Schedule jobs for new versions of apps in the index (max 1000 apps)
    #[arg(long)]
    dioscope_new: bool,
}

/// The one source picked on the command line
#[derive(Debug, PartialEq, Eq)]
enum Selection {
    Bundle(String),
    AppId(u64),
    Feed(FeedKind, u32),
    IndexUpdates,
}

impl DataSource {
    fn selection(self) -> Option<Selection> {
        if let Some(bundle_id) = self.bundle_id {
            Some(Selection::Bundle(bundle_id))
        } else if let Some(app_id) = self.app_id {
            Some(Selection::AppId(app_id))
        } else if let Some(limit) = self.itunes_top {
            Some(Selection::Feed(FeedKind::TopFree, limit))
        } else if let Some(limit) = self.itunes_new {
            Some(Selection::Feed(FeedKind::NewFree, limit))
        } else if self.dioscope_new {
            Some(Selection::IndexUpdates)
        } else {
            None
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let log_filter = format!("dioscope_scheduler={}", cli.log_level);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = Config::load(&cli.config)?;
    info!("Configuration loaded from: {}", cli.config);

    if let Some(backend) = cli.backend {
        config.backend.url = Some(backend);
    }
    if let Some(host) = cli.dioscope_host {
        config.index.host = host;
    }
    if let Some(index) = cli.dioscope_index {
        config.index.index = index;
    }

    let selection = cli
        .source
        .selection()
        .ok_or_else(|| AppError::configuration("no data source selected"))?;

    let backend_url = config.backend.url.clone().ok_or_else(|| {
        AppError::configuration("no backend url given (use --backend or [backend] url)")
    })?;
    info!("Using backend: {}", backend_url);

    let backend = BackendClient::new(&backend_url, &config.backend, &config.http)?;
    let scheduler = JobScheduler::new(Arc::new(backend));
    let store = ItunesClient::new(&config.store, &config.http)?;

    let country = cli
        .itunes_country
        .unwrap_or_else(|| config.store.default_country.clone());
    let options = JobOptions {
        account_id: cli.account,
        country: Some(country.clone()),
        execution_strategy: cli.strategy,
    };

    let success = match selection {
        Selection::Bundle(bundle_id) => {
            let request = BundleJobRequest::new(bundle_id, JobKind::Run).with_options(&options);
            scheduler.schedule_bundle(&request).await.is_ok()
        }
        Selection::AppId(app_id) => scheduler
            .schedule_app_id(&store, app_id, &options)
            .await
            .is_ok(),
        Selection::Feed(kind, limit) => {
            let feed = FeedRequest::new(kind, limit, country.clone()).with_genre(cli.itunes_genre);
            let url = store.feed_url(&feed);
            scheduler
                .schedule_feed(&store, &url, &options)
                .await
                .map(|report| report.success)
                .unwrap_or(false)
        }
        Selection::IndexUpdates => {
            let index = ElasticsearchIndex::new(&config.index, &config.http)?;
            scheduler
                .schedule_index_updates(
                    &index,
                    config.index.batch_size(),
                    &store,
                    &country,
                    &options,
                )
                .await
                .map(|report| report.success)
                .unwrap_or(false)
        }
    };

    if success {
        info!("done!");
        Ok(ExitCode::SUCCESS)
    } else {
        error!("error occurred (could be partially done)");
        Ok(ExitCode::FAILURE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("dioscope-scheduler").chain(args.iter().copied()))
    }

    #[test]
    fn test_single_source_is_selected() {
        let cli = parse(&["--bundle-id", "com.x.y"]).unwrap();
        assert_eq!(
            cli.source.selection(),
            Some(Selection::Bundle("com.x.y".to_string()))
        );

        let cli = parse(&["--dioscope-new"]).unwrap();
        assert_eq!(cli.source.selection(), Some(Selection::IndexUpdates));
    }

    #[test]
    fn test_feed_count_defaults_to_ten() {
        let cli = parse(&["--itunes-top"]).unwrap();
        assert_eq!(
            cli.source.selection(),
            Some(Selection::Feed(FeedKind::TopFree, 10))
        );

        let cli = parse(&["--itunes-new", "25"]).unwrap();
        assert_eq!(
            cli.source.selection(),
            Some(Selection::Feed(FeedKind::NewFree, 25))
        );
    }

    #[test]
    fn test_sources_are_mutually_exclusive_and_required() {
        assert!(parse(&["--bundle-id", "com.x.y", "--dioscope-new"]).is_err());
        assert!(parse(&["--app-id", "1", "--itunes-top", "5"]).is_err());
        assert!(parse(&["--backend", "http://backend"]).is_err());
    }

    #[test]
    fn test_empty_source_selects_nothing() {
        let source = DataSource {
            bundle_id: None,
            app_id: None,
            itunes_top: None,
            itunes_new: None,
            dioscope_new: false,
        };
        assert_eq!(source.selection(), None);
    }
}
