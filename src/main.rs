//! LOSight CLI
//!
//! Command-line front end for the length-of-stay dashboard:
//! - Check connectivity to the analytics API
//! - List filter options
//! - Load one tab or every tab under a set of filters
//! - Write the outlier scatter (SVG) and chart series (CSV)

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use losight::api::{ApiClient, DatasetInfo, ReqwestTransport, TokioTimer};
use losight::config::{generate_default_config, Config, LoggingConfig};
use losight::dashboard::{Dashboard, Tab, TabData};
use losight::error::DashboardError;
use losight::render::charts_for;
use losight::terminal::{
    export_csv, render_json, render_table, report_header, write_scatter_svg, OutputFormat,
    ReportSink, TerminalStatus,
};

#[derive(Parser)]
#[command(name = "losight")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Hospital length-of-stay dashboard for the terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API base URL (overrides the config file)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Config file (default: standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    pub format: OutputFormat,

    /// Directory for SVG and CSV outputs (overrides the config file)
    #[arg(short, long, global = true)]
    pub output_dir: Option<PathBuf>,

    /// Also write each chart's series as CSV
    #[arg(long, global = true)]
    pub export_csv: bool,

    #[command(flatten)]
    pub filters: FilterArgs,
}

/// Filter values; omitted selectors mean "all"
#[derive(Args, Debug, Default)]
pub struct FilterArgs {
    /// APR severity of illness code
    #[arg(long, global = true)]
    pub severity: Option<String>,

    /// Payment typology
    #[arg(long, global = true)]
    pub payment: Option<String>,

    /// Type of admission
    #[arg(long, global = true)]
    pub admission: Option<String>,

    /// APR DRG code
    #[arg(long, global = true)]
    pub drg: Option<String>,

    /// Minimum length of stay (default: server minimum)
    #[arg(long, global = true)]
    pub los_min: Option<f64>,

    /// Maximum length of stay (default: server maximum)
    #[arg(long, global = true)]
    pub los_max: Option<f64>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Probe the API and show dataset information
    Check,

    /// List the allowed filter values
    Options,

    /// Load and render one tab
    Tab {
        /// overview, severity, demographics, payment, trends or outliers
        name: Tab,
    },

    /// Apply filters and load every tab
    All,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

type CliDashboard = Dashboard<ReqwestTransport, TokioTimer, TerminalStatus>;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Commands::Config { output } = &cli.command {
        return write_default_config(output.as_deref());
    }

    // Load notes are logged once the subscriber is installed
    let (mut config, notes) = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
    }
    if let Some(dir) = &cli.output_dir {
        config.render.output_dir = dir.to_string_lossy().to_string();
    }

    init_logging(&config.logging)?;
    notes.log();
    tracing::debug!("LOSight v{} against {}", env!("CARGO_PKG_VERSION"), config.api.base_url);

    let transport = ReqwestTransport::new(config.api.transport_timeout())?;
    let client = ApiClient::new(transport, TokioTimer, config.api.base_url.as_str())
        .with_timeout(config.api.request_timeout());
    let status = match cli.format {
        OutputFormat::Json => TerminalStatus::quiet(),
        OutputFormat::Table => TerminalStatus::default(),
    };
    let dashboard = Dashboard::new(client, status);

    let info = match dashboard.connect().await {
        Ok(info) => info,
        Err(err) => exit_reported(err),
    };

    match cli.command {
        Commands::Check => print_dataset(&info, cli.format)?,

        Commands::Options => print_options(&dashboard, cli.format)?,

        Commands::Tab { name } => {
            apply_filter_args(&dashboard, &cli.filters);
            dashboard.filters_mut().apply_from_inputs();

            let sink = ReportSink::new();
            let result = dashboard.activate_tab(name, &sink).await;
            emit(&dashboard, &info, &sink.take(), &cli, &config)?;
            if let Err(err) = result {
                exit_reported(err);
            }
        }

        Commands::All => {
            apply_filter_args(&dashboard, &cli.filters);

            let sink = ReportSink::new();
            let result = dashboard.apply_filters(&sink).await;
            emit(&dashboard, &info, &sink.take(), &cli, &config)?;
            if let Err(err) = result {
                exit_reported(err);
            }
        }

        Commands::Config { .. } => unreachable!("handled before connecting"),
    }

    Ok(())
}

fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("losight={}", config.level)));

    let (writer, ansi) = match &config.file {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("Cannot open log file {}", path))?;
            (BoxMakeWriter::new(Mutex::new(file)), false)
        }
        None => (BoxMakeWriter::new(std::io::stderr), true),
    };

    let registry = tracing_subscriber::registry().with(filter);
    if config.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(writer))
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(ansi)
                    .with_writer(writer),
            )
            .init();
    }
    Ok(())
}

/// The status surface already printed the error
fn exit_reported(err: DashboardError) -> ! {
    tracing::debug!("Exiting after error: {}", err);
    std::process::exit(1);
}

fn write_default_config(output: Option<&Path>) -> anyhow::Result<()> {
    let config = generate_default_config();

    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, &config)?;
            println!("Config written to {:?}", path);
        }
        None => {
            print!("{}", config);
        }
    }
    Ok(())
}

fn apply_filter_args(dashboard: &CliDashboard, args: &FilterArgs) {
    let mut filters = dashboard.filters_mut();
    let inputs = filters.inputs_mut();

    if let Some(severity) = &args.severity {
        inputs.severity = severity.clone();
    }
    if let Some(payment) = &args.payment {
        inputs.payment = payment.clone();
    }
    if let Some(admission) = &args.admission {
        inputs.admission = admission.clone();
    }
    if let Some(drg) = &args.drg {
        inputs.drg = drg.clone();
    }
    if let Some(min) = args.los_min {
        inputs.los_min = min.to_string();
    }
    if let Some(max) = args.los_max {
        inputs.los_max = max.to_string();
    }
}

fn print_dataset(info: &DatasetInfo, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(info)?),
        OutputFormat::Table => {
            println!("API Status: ok");
            println!();
            println!("Dataset: {}", info.dataset_name);
            println!("  Rows: {}", losight::render::format_count(info.rows));
            println!("  Columns: {}", info.columns);
            if let Some(sample) = &info.sample_size {
                println!("  Sample: {}", sample);
            }
        }
    }
    Ok(())
}

fn print_options(dashboard: &CliDashboard, format: OutputFormat) -> anyhow::Result<()> {
    let filters = dashboard.filters();
    let Some(options) = filters.options() else {
        // Already reported as an options-load error
        std::process::exit(1);
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(options)?),
        OutputFormat::Table => {
            let choices = filters.choices();
            for (name, list) in [
                ("Severity", &choices.severity),
                ("Payment", &choices.payment),
                ("Admission", &choices.admission),
                ("DRG", &choices.drg),
            ] {
                let values: Vec<&str> = list.iter().skip(1).map(|o| o.value.as_str()).collect();
                println!("{:<10} {}", name, values.join(", "));
            }
            println!(
                "{:<10} {} to {} days",
                "LOS",
                losight::filters::format_bound(options.los.min),
                losight::filters::format_bound(options.los.max)
            );
        }
    }
    Ok(())
}

/// Print rendered tabs and write file outputs
fn emit(
    dashboard: &CliDashboard,
    info: &DatasetInfo,
    tabs: &[TabData],
    cli: &Cli,
    config: &Config,
) -> anyhow::Result<()> {
    match cli.format {
        OutputFormat::Json => println!("{}", render_json(tabs)?),
        OutputFormat::Table => {
            println!(
                "{}",
                report_header(&info.dataset_name, &dashboard.filters().query_string())
            );
            for data in tabs {
                println!();
                print!("{}", render_table(data));
            }
        }
    }

    let output_dir = PathBuf::from(&config.render.output_dir);

    for data in tabs {
        if let TabData::Outliers(summary) = data {
            let path = write_scatter_svg(
                summary,
                &output_dir,
                config.render.width as f64,
                config.render.height as f64,
            )?;
            if cli.format == OutputFormat::Table {
                println!();
                println!("Scatter plot written to {:?}", path);
            }
        }
    }

    if cli.export_csv {
        let charts: Vec<_> = tabs.iter().flat_map(charts_for).collect();
        let paths = export_csv(&charts, &output_dir)?;
        tracing::info!("Exported {} chart series to {:?}", paths.len(), output_dir);
    }

    Ok(())
}
