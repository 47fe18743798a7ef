use std::{
    net::SocketAddr,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use reqwest::Url;

/// CLI / env configuration parsed at process startup.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "cinefind-backend",
    about = "Movie search gateway API",
    version,
    disable_help_subcommand = true
)]
struct CliConfig {
    /// Address to bind the HTTP server to (e.g., 0.0.0.0:8080)
    #[arg(long, env = "CINEFIND_BIND_ADDR", default_value = "0.0.0.0:8080")]
    listen_addr: SocketAddr,

    /// Base URL of the external movie API; enables proxy mode when set
    #[arg(long, env = "CINEFIND_UPSTREAM_BASE_URL")]
    upstream_base_url: Option<String>,

    /// JSON file with the movie catalog served in local mode
    #[arg(long, env = "CINEFIND_CATALOG_FILE")]
    catalog_file: Option<PathBuf>,

    /// Optional OTLP endpoint (grpc) for OpenTelemetry export
    #[arg(long, env = "OTEL_EXPORTER_OTLP_ENDPOINT")]
    otel_endpoint: Option<String>,

    /// Logical service name for telemetry (resource attribute)
    #[arg(long, env = "OTEL_SERVICE_NAME", default_value = "cinefind-backend")]
    otel_service_name: String,

    /// Disable OTLP trace export even if an endpoint is set
    #[arg(long, env = "CINEFIND_OTEL_DISABLE_TRACES", default_value_t = false)]
    otel_disable_traces: bool,

    /// Disable OTLP log export even if an endpoint is set
    #[arg(long, env = "CINEFIND_OTEL_DISABLE_LOGS", default_value_t = false)]
    otel_disable_logs: bool,

    /// Deployment environment tag for telemetry (e.g., development, staging, prod)
    #[arg(long, env = "CINEFIND_ENV", default_value = "development")]
    environment: String,

    /// Default log filter when RUST_LOG is not provided
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Comma-separated list of allowed CORS origins
    #[arg(long, env = "CINEFIND_CORS_ALLOWED_ORIGINS", value_delimiter = ',')]
    cors_allowed_origins: Vec<String>,
}

/// Fully validated configuration shared across the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub listen_addr: SocketAddr,
    pub source: SourceConfig,
    pub otel: OtelConfig,
    pub log: LogConfig,
    pub environment: String,
    pub cors_allowed_origins: Vec<String>,
}

/// Which data source the gateway talks to. Fixed for the process lifetime;
/// the two modes are alternative deployments, never a per-request choice.
#[derive(Debug, Clone)]
pub enum SourceConfig {
    /// Filter an in-memory catalog (built-in dataset unless a file is given).
    Local { catalog_file: Option<PathBuf> },
    /// Forward searches to the external movie API at this base URL.
    Upstream { base_url: Url },
}

/// OpenTelemetry exporter configuration.
#[derive(Debug, Clone)]
pub struct OtelConfig {
    pub endpoint: Option<String>,
    pub service_name: String,
    pub disable_traces: bool,
    pub disable_logs: bool,
}

/// Structured logging configuration.
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level: String,
}

impl AppConfig {
    /// Parse CLI/env arguments and return a validated configuration.
    pub fn load() -> Result<Self> {
        let cli = CliConfig::parse();
        Self::try_from(cli)
    }
}

impl TryFrom<CliConfig> for AppConfig {
    type Error = anyhow::Error;

    fn try_from(value: CliConfig) -> Result<Self> {
        let source = match (value.upstream_base_url, value.catalog_file) {
            (Some(_), Some(_)) => {
                bail!("--upstream-base-url and --catalog-file are mutually exclusive")
            }
            (Some(raw), None) => SourceConfig::Upstream {
                base_url: parse_upstream_url(&raw)?,
            },
            (None, catalog_file) => {
                if let Some(file) = &catalog_file {
                    ensure_file_exists(file).with_context(|| {
                        format!("catalog file '{}' missing", file.display())
                    })?;
                }
                SourceConfig::Local { catalog_file }
            }
        };

        Ok(Self {
            listen_addr: value.listen_addr,
            source,
            environment: value.environment,
            otel: OtelConfig {
                endpoint: value.otel_endpoint,
                service_name: value.otel_service_name,
                disable_traces: value.otel_disable_traces,
                disable_logs: value.otel_disable_logs,
            },
            log: LogConfig {
                level: value.log_level,
            },
            cors_allowed_origins: value
                .cors_allowed_origins
                .into_iter()
                .filter(|origin| !origin.is_empty())
                .collect(),
        })
    }
}

fn parse_upstream_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw).with_context(|| format!("invalid upstream base URL '{raw}'"))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(anyhow!(
            "upstream base URL '{raw}' must use http or https"
        ));
    }
    Ok(url)
}

fn ensure_file_exists(path: &Path) -> Result<()> {
    if path.is_file() {
        return Ok(());
    }
    Err(anyhow!(
        "path '{}' does not exist or is not a file",
        path.display()
    ))
}
