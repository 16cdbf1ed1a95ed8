use anyhow::{Context as _, Result};
use clap::{Parser, ValueEnum};
use gce_cloud::cloud::{Service, SingleProjectRouter};
use gce_cloud::config::Config;
use gce_cloud::{Cloud, Context, GceCloud, Key, MockCloud, Registry};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Exercise the Compute Engine harness against the API or the in-memory mock
#[derive(Parser, Debug)]
#[command(name = "gce-cloud", version, about, long_about = None)]
struct Args {
    /// GCP project to use
    #[arg(short, long)]
    project: Option<String>,

    /// Region whose addresses are listed
    #[arg(short, long, default_value = "us-central1")]
    region: String,

    /// Run against the in-memory mock instead of the API
    #[arg(long)]
    use_mock: bool,

    /// Calls per second (overrides the config file)
    #[arg(long)]
    qps: Option<u32>,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off")]
    log_level: LogLevel,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(level: LogLevel) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let Some(tracing_level) = level.to_tracing_level() else {
        return Ok(None);
    };

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {:?}", log_path))?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("gce-cloud started with log level: {:?}", level);
    tracing::info!("Log file: {:?}", log_path);

    Ok(Some(guard))
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("gce-cloud").join("gce-cloud.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".gce-cloud").join("gce-cloud.log");
    }
    PathBuf::from("gce-cloud.log")
}

fn build_mock(registry: &Registry) -> Result<Box<dyn Cloud>> {
    let cloud = MockCloud::new(registry)?;
    cloud
        .zones
        .store()
        .objects
        .insert(Key::global("us-central1-b"), json!({"name": "us-central1-b"}));
    Ok(Box::new(cloud))
}

async fn build_real(registry: &Registry, project: String, config: &Config) -> Result<Box<dyn Cloud>> {
    let service = Service::from_adc(Arc::new(SingleProjectRouter::new(project)), config.rate_limiter())
        .await
        .context("Failed to set up Compute Engine clients")?
        .with_poll_interval(config.poll_interval());
    Ok(Box::new(GceCloud::new(registry, Arc::new(service))?))
}

async fn run(cloud: &dyn Cloud, ctx: &Context, region: &str) -> Result<()> {
    let (addresses, firewalls) = futures::try_join!(
        cloud.addresses().list(ctx, region),
        cloud.firewalls().list(ctx),
    )?;

    println!("Addresses in {}:", region);
    for addr in &addresses {
        println!("  {}", addr["name"].as_str().unwrap_or("?"));
    }
    println!("Firewalls:");
    for fw in &firewalls {
        println!("  {}", fw["name"].as_str().unwrap_or("?"));
    }

    let key = Key::global("abc");
    let firewall = json!({
        "description": "gce-cloud example",
        "network": "global/networks/default",
        "sourceRanges": ["10.0.0.0/8"],
        "allowed": [{"IPProtocol": "tcp", "ports": ["80"]}]
    });

    cloud
        .firewalls()
        .insert(ctx, &key, firewall)
        .await
        .context("Insert firewall abc")?;
    let obj = cloud.firewalls().get(ctx, &key).await.context("Get firewall abc")?;
    println!("Created firewall: {}", obj);
    cloud
        .firewalls()
        .delete(ctx, &key)
        .await
        .context("Delete firewall abc")?;
    println!("Deleted firewall abc");

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level)?;

    let mut config = Config::load();
    // Remember an explicit project for later runs
    if let Some(project) = args.project.as_deref() {
        if config.project_id.as_deref() != Some(project) {
            if let Err(e) = config.set_project(project) {
                tracing::warn!("Failed to save project to config: {}", e);
            }
        }
    }

    if args.qps.is_some() {
        config.qps = args.qps;
    }

    let registry = Registry::builtin()?;

    let cloud = if args.use_mock {
        build_mock(&registry)?
    } else {
        let project = config
            .effective_project(args.project.as_deref())
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "No GCP project configured. Set GOOGLE_CLOUD_PROJECT or use --project flag"
                )
            })?;
        tracing::info!("Using project: {}", project);
        build_real(&registry, project, &config).await?
    };

    let root = Context::background();
    let ctx = match config.operation_timeout() {
        Some(timeout) => root.with_timeout(timeout),
        None => root.child(),
    };

    if let Err(err) = run(cloud.as_ref(), &ctx, &args.region).await {
        tracing::error!("Run failed: {:?}", err);
        return Err(err);
    }

    Ok(())
}
