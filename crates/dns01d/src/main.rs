// # dns01d - DNS-01 challenge runner
//
// This is a THIN integration layer: all reconciliation logic lives in
// dns01-core. The binary is responsible for:
// 1. Reading configuration from environment variables
// 2. Initializing tracing and the runtime
// 3. Wiring the secret resolver and the provider factory into a solver
// 4. Handling exactly one challenge request and reporting the outcome
//
// ## Configuration
//
// All configuration is done via environment variables:
//
// - `GROUP_NAME`: API group the solver serves (required)
// - `DNS01_SECRETS_DIR`: Root of the mounted secrets tree
//   (`<root>/<namespace>/<name>/<key>`, default `/var/run/secrets/dns01`)
// - `DNS01_CREDENTIAL_TIMEOUT_SECS`: Credential lookup timeout, 1-60 (default 10)
// - `DNS01_LOG_LEVEL`: trace, debug, info, warn, error (default info)
// - `VULTR_API_BASE`: Override the Vultr API base URL
//
// The challenge request (ACME webhook JSON form) is read from the file named
// by the first argument, or from stdin when no argument or `-` is given.
//
// ## Example
//
// ```bash
// export GROUP_NAME=acme.example.com
// export DNS01_SECRETS_DIR=/var/run/secrets/dns01
//
// dns01d request.json
// ```

use anyhow::{Context, Result};
use dns01_core::{
    ChallengeOutcome, ChallengeRequest, Dns01Solver, DnsProviderFactory, FileSecretResolver,
    SolverConfig,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

const DEFAULT_SECRETS_DIR: &str = "/var/run/secrets/dns01";
const DEFAULT_CREDENTIAL_TIMEOUT_SECS: u64 = 10;

/// Exit codes for the possible results of one run
///
/// - 0: Challenge handled (record present / absent as requested)
/// - 1: Configuration, startup or request decoding error
/// - 2: The challenge itself failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dns01ExitCode {
    /// Challenge handled
    Success = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Present or CleanUp failed
    ChallengeFailed = 2,
}

impl From<Dns01ExitCode> for ExitCode {
    fn from(code: Dns01ExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Application configuration
#[derive(Debug)]
struct Config {
    group_name: String,
    secrets_dir: PathBuf,
    credential_timeout_secs: u64,
    log_level: String,
    vultr_api_base: Option<String>,
    request_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables and arguments
    fn from_env() -> Result<Self> {
        let request_path = std::env::args().nth(1);
        Self::from_lookup(|key| std::env::var(key).ok(), request_path)
    }

    /// Load configuration through `lookup`
    fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
        request_path: Option<String>,
    ) -> Result<Self> {
        let credential_timeout_secs = match lookup("DNS01_CREDENTIAL_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse().with_context(|| {
                format!(
                    "DNS01_CREDENTIAL_TIMEOUT_SECS must be a whole number of seconds. Got: '{}'",
                    raw
                )
            })?,
            None => DEFAULT_CREDENTIAL_TIMEOUT_SECS,
        };

        Ok(Self {
            group_name: lookup("GROUP_NAME").unwrap_or_default(),
            secrets_dir: lookup("DNS01_SECRETS_DIR")
                .unwrap_or_else(|| DEFAULT_SECRETS_DIR.to_string())
                .into(),
            credential_timeout_secs,
            log_level: lookup("DNS01_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            vultr_api_base: lookup("VULTR_API_BASE").filter(|s| !s.is_empty()),
            request_path: request_path.filter(|p| p != "-").map(PathBuf::from),
        })
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        if self.group_name.trim().is_empty() {
            anyhow::bail!(
                "GROUP_NAME must be specified. \
                Set it via: export GROUP_NAME=acme.example.com"
            );
        }

        if self.secrets_dir.as_os_str().is_empty() {
            anyhow::bail!("DNS01_SECRETS_DIR cannot be empty");
        }

        if !(1..=60).contains(&self.credential_timeout_secs) {
            anyhow::bail!(
                "DNS01_CREDENTIAL_TIMEOUT_SECS must be between 1 and 60 seconds. Got: {}",
                self.credential_timeout_secs
            );
        }

        if let Some(ref url) = self.vultr_api_base
            && !url.starts_with("https://")
            && !url.starts_with("http://")
        {
            anyhow::bail!("VULTR_API_BASE must use HTTP or HTTPS scheme. Got: {}", url);
        }

        self.log_level()?;
        Ok(())
    }

    fn log_level(&self) -> Result<Level> {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Ok(Level::TRACE),
            "debug" => Ok(Level::DEBUG),
            "info" => Ok(Level::INFO),
            "warn" => Ok(Level::WARN),
            "error" => Ok(Level::ERROR),
            _ => anyhow::bail!(
                "DNS01_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }
    }

    fn solver_config(&self) -> SolverConfig {
        SolverConfig::new(self.group_name.clone())
            .with_credential_timeout(Duration::from_secs(self.credential_timeout_secs))
    }
}

fn main() -> ExitCode {
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return Dns01ExitCode::ConfigError.into();
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {:#}", e);
        return Dns01ExitCode::ConfigError.into();
    }

    let log_level = config.log_level().unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return Dns01ExitCode::ConfigError.into();
    }

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return Dns01ExitCode::ConfigError.into();
        }
    };

    rt.block_on(run(config)).into()
}

/// Handle one challenge request
async fn run(config: Config) -> Dns01ExitCode {
    let solver = match build_solver(&config) {
        Ok(solver) => solver,
        Err(e) => {
            error!("Failed to build solver: {:#}", e);
            return Dns01ExitCode::ConfigError;
        }
    };

    let request = match read_request(config.request_path.as_ref()).await {
        Ok(request) => request,
        Err(e) => {
            error!("Failed to read challenge request: {:#}", e);
            return Dns01ExitCode::ConfigError;
        }
    };

    info!(
        solver = solver.name(),
        group = solver.group_name(),
        uid = %request.uid,
        action = %request.action,
        "Handling challenge request"
    );

    tokio::select! {
        result = solver.solve(&request) => match result {
            Ok(outcome) => {
                info!(outcome = describe(&outcome), "Challenge handled");
                Dns01ExitCode::Success
            }
            Err(e) => {
                error!(error = %e, transient = e.is_transient(), "Challenge failed");
                Dns01ExitCode::ChallengeFailed
            }
        },
        _ = tokio::signal::ctrl_c() => {
            error!("Interrupted before the challenge completed");
            Dns01ExitCode::ChallengeFailed
        }
    }
}

fn build_solver(config: &Config) -> Result<Dns01Solver> {
    let resolver = Arc::new(FileSecretResolver::new(&config.secrets_dir));
    let factory = provider_factory(config)?;
    info!(
        provider = factory.provider_name(),
        secrets_dir = %config.secrets_dir.display(),
        "Provider registered"
    );
    Ok(Dns01Solver::new(resolver, factory, config.solver_config())?)
}

#[cfg(feature = "vultr")]
fn provider_factory(config: &Config) -> Result<Arc<dyn DnsProviderFactory>> {
    let factory = match config.vultr_api_base {
        Some(ref base) => dns01_provider_vultr::VultrFactory::with_base_url(base.clone()),
        None => dns01_provider_vultr::VultrFactory::new(),
    };
    Ok(Arc::new(factory))
}

#[cfg(not(feature = "vultr"))]
fn provider_factory(_config: &Config) -> Result<Arc<dyn DnsProviderFactory>> {
    anyhow::bail!("no DNS provider compiled in; enable the `vultr` feature")
}

/// Read and decode the challenge request from `path`, or stdin
async fn read_request(path: Option<&PathBuf>) -> Result<ChallengeRequest> {
    let raw = match path {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading {}", path.display()))?,
        None => {
            let mut raw = String::new();
            tokio::io::stdin()
                .read_to_string(&mut raw)
                .await
                .context("reading stdin")?;
            raw
        }
    };
    parse_request(&raw)
}

fn parse_request(raw: &str) -> Result<ChallengeRequest> {
    serde_json::from_str(raw).context("decoding challenge request JSON")
}

fn describe(outcome: &ChallengeOutcome) -> &'static str {
    match outcome {
        ChallengeOutcome::Created { .. } => "created",
        ChallengeOutcome::AlreadyPresent { .. } => "already present",
        ChallengeOutcome::Deleted { .. } => "deleted",
        ChallengeOutcome::AlreadyAbsent => "already absent",
    }
}
