use std::env;
use std::fs;
use std::io::{self, IsTerminal, Write};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tracing::{debug, error, info};

use lma::api::{AppState, create_router};
use lma::auth::{AuthConfig, AuthState};
use lma::db::{Database, PoolSettings};
use lma::shopify::{AdminClient, HttpTransport, ShopifyConfig};

const APP_NAME: &str = "lma";
const ENV_PREFIX: &str = "LMA";

fn main() {
    if let Err(err) = try_main() {
        let _ = writeln!(io::stderr(), "{err:?}");
        std::process::exit(1);
    }
}

#[tokio::main]
async fn async_main(ctx: RuntimeContext, cmd: ServeCommand) -> Result<()> {
    handle_serve(&ctx, cmd).await
}

fn try_main() -> Result<()> {
    let cli = Cli::parse();

    let ctx = RuntimeContext::new(cli.common.clone())?;
    ctx.init_logging()?;
    debug!("resolved paths: {:#?}", ctx.paths);

    match cli.command {
        Command::Serve(cmd) => async_main(ctx, cmd),
        Command::Init(cmd) => handle_init(&ctx, cmd),
        Command::Config { command } => handle_config(&ctx, command),
        Command::Completions { shell } => handle_completions(shell),
    }
}

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "LMA - course and student progress backend for the Shopify app.",
    propagate_version = true
)]
struct Cli {
    #[command(flatten)]
    common: CommonOpts,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Args)]
struct CommonOpts {
    /// Override the config file path
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,
    /// Reduce output to only errors
    #[arg(short, long, action = clap::ArgAction::SetTrue, global = true)]
    quiet: bool,
    /// Increase logging verbosity (stackable)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// Enable debug logging (equivalent to -vv)
    #[arg(long, global = true)]
    debug: bool,
    /// Enable trace logging (overrides other levels)
    #[arg(long, global = true)]
    trace: bool,
    /// Output machine readable JSON
    #[arg(long, global = true)]
    json: bool,
    /// Disable ANSI colors in output
    #[arg(long = "no-color", global = true, conflicts_with = "color")]
    no_color: bool,
    /// Control color output (auto, always, never)
    #[arg(long, value_enum, default_value_t = ColorOption::Auto, global = true)]
    color: ColorOption,
    /// Do not change anything on disk
    #[arg(long = "dry-run", global = true)]
    dry_run: bool,
    /// Emit additional diagnostics for troubleshooting
    #[arg(long = "diagnostics", global = true)]
    diagnostics: bool,
}

impl CommonOpts {
    /// ANSI output: explicit flags, then NO_COLOR/FORCE_COLOR, then the terminal.
    fn use_color(&self) -> bool {
        if self.no_color {
            return false;
        }
        match self.color {
            ColorOption::Always => true,
            ColorOption::Never => false,
            ColorOption::Auto if env::var_os("NO_COLOR").is_some() => false,
            ColorOption::Auto => {
                env::var_os("FORCE_COLOR").is_some() || io::stderr().is_terminal()
            }
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ColorOption {
    Auto,
    Always,
    Never,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Start the HTTP API server
    Serve(ServeCommand),
    /// Create config directories and default files
    Init(InitCommand),
    /// Inspect and manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Debug, Clone, Args)]
struct ServeCommand {
    /// Host address to bind to (overrides server.host)
    #[arg(long)]
    host: Option<String>,
    /// Port to listen on (overrides server.port)
    #[arg(short, long)]
    port: Option<u16>,
}

#[derive(Debug, Clone, Args)]
struct InitCommand {
    /// Recreate configuration even if it already exists
    #[arg(long = "force")]
    force: bool,
}

#[derive(Debug, Subcommand)]
enum ConfigCommand {
    /// Output the effective configuration (secrets redacted)
    Show,
    /// Print the resolved config file path
    Path,
}

#[derive(Debug, Clone)]
struct RuntimeContext {
    common: CommonOpts,
    paths: AppPaths,
    config: AppConfig,
}

impl RuntimeContext {
    fn new(common: CommonOpts) -> Result<Self> {
        let mut paths = AppPaths::discover(common.config.clone())?;
        let config = load_or_init_config(&mut paths, &common)?;
        let paths = paths.apply_overrides(&config)?;
        let ctx = Self {
            common,
            paths,
            config,
        };
        ctx.ensure_directories()?;
        Ok(ctx)
    }

    fn init_logging(&self) -> Result<()> {
        use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

        if self.common.quiet {
            return Ok(());
        }

        let level = self.effective_log_level();
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("{APP_NAME}={level},tower_http={level}")));
        let registry = tracing_subscriber::registry().with(filter);

        let installed = if self.common.json {
            registry.with(fmt::layer().json()).try_init()
        } else {
            let verbose = self.common.diagnostics;
            registry
                .with(
                    fmt::layer()
                        .with_ansi(self.common.use_color())
                        .with_target(verbose)
                        .with_file(verbose)
                        .with_line_number(verbose),
                )
                .try_init()
        };
        // A subscriber may already be set (tests, embedding).
        installed.ok();
        Ok(())
    }

    /// CLI flags win over `logging.level`.
    fn effective_log_level(&self) -> &str {
        if self.common.trace {
            "trace"
        } else if self.common.debug {
            "debug"
        } else {
            match self.common.verbose {
                0 => self.config.logging.level.as_str(),
                1 => "debug",
                _ => "trace",
            }
        }
    }

    fn ensure_directories(&self) -> Result<()> {
        if self.common.dry_run {
            info!(
                "dry-run: would ensure data dir {}",
                self.paths.data_dir.display()
            );
            return Ok(());
        }

        fs::create_dir_all(&self.paths.data_dir).with_context(|| {
            format!("creating data directory {}", self.paths.data_dir.display())
        })?;
        Ok(())
    }

    fn database_path(&self) -> Result<PathBuf> {
        self.config
            .database
            .path
            .as_deref()
            .map(expand_str_path)
            .unwrap_or_else(|| Ok(self.paths.data_dir.join(format!("{APP_NAME}.db"))))
    }
}

#[derive(Debug, Clone)]
struct AppPaths {
    config_file: PathBuf,
    data_dir: PathBuf,
}

impl AppPaths {
    fn discover(override_path: Option<PathBuf>) -> Result<Self> {
        let config_file = match override_path {
            Some(path) => {
                let expanded = expand_path(path)?;
                if expanded.is_dir() {
                    expanded.join("config.toml")
                } else {
                    expanded
                }
            }
            None => default_config_dir()?.join("config.toml"),
        };

        if config_file.parent().is_none() {
            return Err(anyhow!("invalid config file path: {config_file:?}"));
        }

        Ok(Self {
            config_file,
            data_dir: default_data_dir()?,
        })
    }

    fn apply_overrides(mut self, cfg: &AppConfig) -> Result<Self> {
        if let Some(ref data_override) = cfg.paths.data_dir {
            self.data_dir = expand_str_path(data_override)?;
        }
        Ok(self)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct AppConfig {
    logging: LoggingConfig,
    paths: PathsConfig,
    server: ServerConfig,
    database: DatabaseConfig,
    auth: AuthConfig,
    shopify: ShopifyConfig,
}

impl AppConfig {
    /// Copy with literal secrets masked; `env:` references are kept.
    fn redacted(&self) -> Self {
        fn mask(value: &Option<String>) -> Option<String> {
            value.as_ref().map(|v| {
                if v.starts_with("env:") {
                    v.clone()
                } else {
                    "<redacted>".to_string()
                }
            })
        }

        let mut config = self.clone();
        config.shopify.api_secret = mask(&self.shopify.api_secret);
        config.shopify.access_token = mask(&self.shopify.access_token);
        config
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
struct LoggingConfig {
    level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
struct PathsConfig {
    data_dir: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
struct ServerConfig {
    host: String,
    port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
struct DatabaseConfig {
    /// SQLite file; defaults to `<data_dir>/lma.db`.
    path: Option<String>,
    /// Pool tuning under `[database.pool]`.
    pool: PoolSettings,
}

fn handle_init(ctx: &RuntimeContext, cmd: InitCommand) -> Result<()> {
    if ctx.paths.config_file.exists() && !cmd.force {
        return Err(anyhow!(
            "config already exists at {} (use --force to overwrite)",
            ctx.paths.config_file.display()
        ));
    }

    if ctx.common.dry_run {
        info!(
            "dry-run: would write default config to {}",
            ctx.paths.config_file.display()
        );
        return Ok(());
    }

    write_default_config(&ctx.paths.config_file)
}

fn handle_config(ctx: &RuntimeContext, command: ConfigCommand) -> Result<()> {
    match command {
        ConfigCommand::Show => {
            let config = ctx.config.redacted();
            if ctx.common.json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&config).context("serializing config to JSON")?
                );
            } else {
                println!(
                    "{}",
                    toml::to_string_pretty(&config).context("serializing config to TOML")?
                );
            }
            Ok(())
        }
        ConfigCommand::Path => {
            println!("{}", ctx.paths.config_file.display());
            Ok(())
        }
    }
}

fn handle_completions(shell: Shell) -> Result<()> {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, APP_NAME, &mut io::stdout());
    Ok(())
}

async fn handle_serve(ctx: &RuntimeContext, cmd: ServeCommand) -> Result<()> {
    info!("Starting LMA backend...");

    let db_path = ctx.database_path()?;
    info!("Database path: {}", db_path.display());
    let database = Database::open(&db_path, &ctx.config.database.pool).await?;

    let auth_config = ctx.config.auth.clone();
    let shopify = ctx
        .config
        .shopify
        .clone()
        .resolved()
        .context("Invalid shopify configuration")?;
    shopify
        .validate(auth_config.dev_mode)
        .context("Invalid shopify configuration")?;
    info!(
        "Auth mode: {}",
        if auth_config.dev_mode {
            "development"
        } else {
            "production"
        }
    );

    let transport = HttpTransport::new(&shopify).context("building Admin API client")?;
    let client = AdminClient::new(
        Arc::new(transport),
        shopify.namespace.clone(),
        shopify.pages.clone(),
    );
    let auth_state = AuthState::new(auth_config, &shopify);
    let state = AppState::new(client, &database, auth_state);

    let app = create_router(state);

    let host = cmd.host.unwrap_or_else(|| ctx.config.server.host.clone());
    let port = cmd.port.unwrap_or(ctx.config.server.port);
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .context("invalid address")?;

    info!("Listening on http://{}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .context("binding to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("running server")?;

    info!("Shutdown complete");
    Ok(())
}

/// Resolves on Ctrl-C or SIGTERM. A handler that fails to install never fires.
async fn shutdown_signal() {
    let interrupt = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => "SIGINT",
            Err(err) => {
                error!("failed to install Ctrl-C handler: {err}");
                std::future::pending().await
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                "SIGTERM"
            }
            Err(err) => {
                error!("failed to install SIGTERM handler: {err}");
                std::future::pending().await
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<&str>();

    let received = tokio::select! {
        name = interrupt => name,
        name = terminate => name,
    };
    info!("{received} received, draining connections");
}

fn load_or_init_config(paths: &mut AppPaths, common: &CommonOpts) -> Result<AppConfig> {
    if !paths.config_file.exists() {
        if common.dry_run {
            info!(
                "dry-run: would create default config at {}",
                paths.config_file.display()
            );
        } else {
            write_default_config(&paths.config_file)?;
        }
    }

    // Every section is `#[serde(default)]`, so missing keys fall back to
    // `AppConfig::default()`.
    let config = Config::builder()
        .add_source(
            File::from(paths.config_file.as_path())
                .format(FileFormat::Toml)
                .required(false),
        )
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__"),
        )
        .build()
        .context("loading configuration")?
        .try_deserialize::<AppConfig>()
        .with_context(|| format!("parsing {}", paths.config_file.display()))?;
    Ok(config)
}

fn write_default_config(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating config directory {}", parent.display()))?;
    }

    let body = toml::to_string_pretty(&AppConfig::default())
        .context("serializing default config to TOML")?;
    let header = format!(
        "# Configuration for {APP_NAME}\n\
         # File: {}\n\
         # Environment overrides: {ENV_PREFIX}__SECTION__KEY\n\
         # Secrets accept env:VAR_NAME, e.g. access_token = \"env:SHOPIFY_ACCESS_TOKEN\"\n\n",
        path.display()
    );
    fs::write(path, header + &body)
        .with_context(|| format!("writing config file to {}", path.display()))
}

fn expand_path(path: PathBuf) -> Result<PathBuf> {
    match path.to_str() {
        Some(text) => expand_str_path(text),
        None => Ok(path),
    }
}

fn expand_str_path(text: &str) -> Result<PathBuf> {
    let expanded = shellexpand::full(text).context("expanding path")?;
    Ok(PathBuf::from(expanded.as_ref()))
}

/// `$<xdg_var>/lma`, else the platform directory, else `~/<home_rel>/lma`.
fn app_dir(xdg_var: &str, platform: Option<PathBuf>, home_rel: &[&str]) -> Result<PathBuf> {
    let base = env::var_os(xdg_var)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or(platform)
        .or_else(|| {
            dirs::home_dir().map(|home| home_rel.iter().fold(home, |dir, part| dir.join(part)))
        })
        .ok_or_else(|| anyhow!("unable to determine {xdg_var} directory"))?;
    Ok(base.join(APP_NAME))
}

fn default_config_dir() -> Result<PathBuf> {
    app_dir("XDG_CONFIG_HOME", dirs::config_dir(), &[".config"])
}

fn default_data_dir() -> Result<PathBuf> {
    app_dir("XDG_DATA_HOME", dirs::data_dir(), &[".local", "share"])
}
