//! pricecast CLI: interactive menu and one-shot commands.
//!
//! Commands:
//! - `menu` (default): numbered console menu
//! - `train`: fit one horizon and print the hold-out report
//! - `predict`: multi-horizon prediction, appended to the log
//! - `plot`: candlestick or evaluation chart to PNG
//! - `info`: descriptive ticker metadata

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use pricecast_cli::report;
use pricecast_cli::{App, EvalChart, Menu};
use pricecast_core::data::{
    synthetic_pair, CsvProvider, DataProvider, MemoryProvider, YahooProvider,
};
use pricecast_core::domain::TickerInfo;
use pricecast_runner::AppConfig;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Trading days of synthetic history served by `--synthetic`.
const SYNTHETIC_DAYS: usize = 2520;

#[derive(Parser)]
#[command(
    name = "pricecast",
    about = "pricecast: gradient-boosted rise/fall forecasts for a stock against a factor ETF"
)]
struct Cli {
    /// Path to a TOML config file. Defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Read prices from `<dir>/<SYMBOL>.csv` instead of the network.
    #[arg(long, global = true, conflicts_with = "synthetic")]
    data_dir: Option<PathBuf>,

    /// Use deterministic synthetic prices (no network).
    #[arg(long, global = true, default_value_t = false)]
    synthetic: bool,

    /// Chart output directory (overrides the config file).
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    /// Log filter when RUST_LOG is unset (e.g. info, pricecast_core=debug).
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive numbered menu.
    Menu,
    /// Train one horizon and print its hold-out classification report.
    Train {
        /// Prediction horizon in trading days. Defaults to the evaluation horizon.
        #[arg(long)]
        horizon: Option<usize>,
    },
    /// Train every configured horizon, score the latest row and log it.
    Predict,
    /// Draw a chart to PNG.
    Plot {
        #[command(subcommand)]
        chart: PlotCommand,
    },
    /// Show descriptive ticker metadata.
    Info {
        /// Ticker symbol. Defaults to the configured target.
        #[arg(long)]
        symbol: Option<String>,
    },
}

#[derive(Subcommand)]
enum PlotCommand {
    /// Candlestick chart with SMA 20/50 and volume.
    Candles {
        /// Ticker symbol. Defaults to the configured target.
        #[arg(long)]
        symbol: Option<String>,
    },
    /// Feature importance of a freshly trained model.
    Importance {
        #[arg(long)]
        horizon: Option<usize>,
    },
    /// Confusion matrix on the hold-out rows.
    Confusion {
        #[arg(long)]
        horizon: Option<usize>,
    },
    /// Target price with prediction outcome markers over the hold-out rows.
    Overlay {
        #[arg(long)]
        horizon: Option<usize>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(dir) = cli.output_dir {
        config.plots.output_dir = dir;
    }
    let provider = make_provider(&config, cli.data_dir, cli.synthetic)?;
    tracing::info!(provider = provider.name(), "data provider ready");
    let mut app = App::new(config, provider);

    match cli.command.unwrap_or(Commands::Menu) {
        Commands::Menu => {
            let stdin = io::stdin();
            Menu::new(&mut app, stdin.lock(), io::stdout()).run()
        }
        Commands::Train { horizon } => run_train(&app, horizon),
        Commands::Predict => run_predict(&mut app),
        Commands::Plot { chart } => run_plot(&app, chart),
        Commands::Info { symbol } => run_info(&app, symbol),
    }
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    // try_init: a subscriber may already be installed.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .try_init();
}

fn make_provider(
    config: &AppConfig,
    data_dir: Option<PathBuf>,
    synthetic: bool,
) -> Result<Arc<dyn DataProvider>> {
    if synthetic {
        let (target, factor) =
            synthetic_pair(&config.tickers.target, &config.tickers.factor, SYNTHETIC_DAYS);
        let provider = MemoryProvider::new()
            .with_info(synthetic_info(&target.symbol))
            .with_info(synthetic_info(&factor.symbol))
            .with_series(target)
            .with_series(factor);
        return Ok(Arc::new(provider));
    }
    if let Some(dir) = data_dir {
        if !dir.is_dir() {
            bail!("data directory {} does not exist", dir.display());
        }
        return Ok(Arc::new(CsvProvider::new(dir)));
    }
    let yahoo = YahooProvider::new().context("create HTTP client")?;
    Ok(Arc::new(yahoo))
}

fn synthetic_info(symbol: &str) -> TickerInfo {
    TickerInfo {
        symbol: symbol.to_string(),
        long_name: Some(format!("{symbol} (synthetic)")),
        quote_type: Some("SYNTHETIC".to_string()),
        currency: Some("USD".to_string()),
        ..Default::default()
    }
}

/// `--horizon` if given, else the configured evaluation horizon.
fn resolve_horizon(app: &App, horizon: Option<usize>) -> usize {
    horizon.unwrap_or(app.config().prediction.evaluation_horizon)
}

fn run_train(app: &App, horizon: Option<usize>) -> Result<()> {
    let horizon = resolve_horizon(app, horizon);
    let model = app
        .train(horizon)
        .with_context(|| format!("train {horizon}-day model"))?;
    report::write_training(&mut io::stdout(), &model)?;
    Ok(())
}

fn run_predict(app: &mut App) -> Result<()> {
    let report = app.predict().context("prediction run")?;
    report::write_prediction(&mut io::stdout(), &report)?;
    Ok(())
}

fn run_plot(app: &App, chart: PlotCommand) -> Result<()> {
    let path = match chart {
        PlotCommand::Candles { symbol } => {
            let symbol = symbol.unwrap_or_else(|| app.target_symbol().to_string());
            app.plot_candles(&symbol)?
        }
        PlotCommand::Importance { horizon } => {
            plot_trained(app, EvalChart::Importance, horizon)?
        }
        PlotCommand::Confusion { horizon } => plot_trained(app, EvalChart::Confusion, horizon)?,
        PlotCommand::Overlay { horizon } => plot_trained(app, EvalChart::Overlay, horizon)?,
    };
    println!("Chart written to {}", path.display());
    Ok(())
}

fn plot_trained(app: &App, chart: EvalChart, horizon: Option<usize>) -> Result<PathBuf> {
    let horizon = resolve_horizon(app, horizon);
    let model = app
        .train(horizon)
        .with_context(|| format!("train {horizon}-day model"))?;
    app.plot_model(chart, &model)
}

fn run_info(app: &App, symbol: Option<String>) -> Result<()> {
    let symbol = symbol.unwrap_or_else(|| app.target_symbol().to_string());
    let Some(info) = app.ticker_info(&symbol) else {
        bail!("no info available for {symbol}");
    };
    report::write_info(&mut io::stdout(), &info)?;
    Ok(())
}
