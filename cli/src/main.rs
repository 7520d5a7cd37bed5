//! dnsutils-bot — reference chat host for the DNS utilities plugin.
//!
//! Two subcommands:
//! - `dnsutils-bot chat`: line-oriented chat over STDIO; `!dig example.com` style lines are dispatched
//! - `dnsutils-bot check`: launch each DNS tool once and report which ones are missing

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use dnsutils_bot::{
    BotConfig, CommandRegistry, DnsUtilsPlugin, JsonFileStore, SystemRunner, TracingNotifier,
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::runtime::Runtime;
use tokio::task::{JoinError, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// dnsutils-bot — dig, nslookup and host as chat commands.
#[derive(Parser)]
#[command(
    name = "dnsutils-bot",
    version,
    about = "dnsutils-bot — dig, nslookup and host as chat commands"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read chat lines from stdin and write replies to stdout
    Chat {
        /// Path to dnsutils.toml [default: ./dnsutils.toml or ~/.config/dnsutils/dnsutils.toml]
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Check that dig, nslookup and host can be launched
    Check {
        /// Path to dnsutils.toml [default: ./dnsutils.toml or ~/.config/dnsutils/dnsutils.toml]
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<ExitCode> {
    // RUST_LOG controls verbosity; stdout is reserved for chat replies
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    run_to_completion(runtime, run(cli))
}

/// Drive `fut` to completion, then drop the runtime without waiting on
/// blocking threads: the stdin reader and hung tool invocations never finish
/// on their own.
fn run_to_completion<F: Future>(runtime: Runtime, fut: F) -> F::Output {
    let output = runtime.block_on(fut);
    runtime.shutdown_background();
    output
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let cancel = CancellationToken::new();

    let cancel_for_signal = cancel.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        tracing::info!("Shutting down dnsutils-bot...");
        cancel_for_signal.cancel();
    });

    match cli.command {
        Commands::Chat { config } => {
            let config = load_config(config)?;
            run_chat(config, cancel).await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Check { config } => {
            // Config is loaded only to surface errors early; the probe needs no settings.
            load_config(config)?;
            run_check().await
        }
    }
}

/// Activate the plugin, then dispatch stdin chat lines until EOF or Ctrl-C.
///
/// Each line runs on its own blocking task, so a slow or hung tool only
/// delays its own reply. Replies are written in completion order.
async fn run_chat(config: BotConfig, cancel: CancellationToken) -> Result<()> {
    let mut store = JsonFileStore::open(&config.store_path)
        .map_err(|e| anyhow::anyhow!("Failed to open plugin store: {}", e))?;
    let notifier = TracingNotifier::new(config.admins.clone());
    let plugin = DnsUtilsPlugin::new(Arc::new(SystemRunner));

    let (plugin, report) = tokio::task::spawn_blocking(move || {
        let report = plugin.activate(&mut store, &notifier);
        (plugin, report)
    })
    .await?;
    if !report.failed_tools().is_empty() {
        tracing::warn!(failed = ?report.failed_tools(), "some DNS tools are unavailable");
    }

    let registry = Arc::new(plugin.registry(&config.prefix));
    tracing::info!(prefix = %config.prefix, commands = ?registry.names(), "dnsutils-bot ready");

    let mut stdout = tokio::io::stdout();
    chat_loop(
        registry,
        BufReader::new(tokio::io::stdin()),
        &mut stdout,
        cancel,
    )
    .await
}

/// Dispatch chat lines from `input` until EOF or cancellation.
///
/// On EOF the replies still being computed are written out. On cancellation
/// the loop returns at once and in-flight tasks are abandoned.
async fn chat_loop<R, W>(
    registry: Arc<CommandRegistry>,
    input: R,
    output: &mut W,
    cancel: CancellationToken,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    let mut in_flight: JoinSet<Option<String>> = JoinSet::new();

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!(pending = in_flight.len(), "chat loop cancelled");
                in_flight.detach_all();
                return Ok(());
            }
            line = lines.next_line() => {
                match line? {
                    Some(line) => {
                        let registry = registry.clone();
                        in_flight.spawn_blocking(move || registry.dispatch(&line));
                    }
                    None => break,
                }
            }
            Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => {
                write_reply(output, joined).await?;
            }
        }
    }

    // input closed; deliver the replies still being computed
    while let Some(joined) = in_flight.join_next().await {
        write_reply(output, joined).await?;
    }
    Ok(())
}

async fn write_reply<W: AsyncWrite + Unpin>(
    output: &mut W,
    joined: std::result::Result<Option<String>, JoinError>,
) -> Result<()> {
    match joined {
        Ok(Some(reply)) => {
            output.write_all(reply.as_bytes()).await?;
            if !reply.ends_with('\n') {
                output.write_all(b"\n").await?;
            }
            output.flush().await?;
        }
        Ok(None) => {}
        Err(e) => {
            tracing::error!(error = %e, "chat command task failed");
        }
    }
    Ok(())
}

/// Run the activation sanity probe alone and print per-tool status.
async fn run_check() -> Result<ExitCode> {
    let plugin = DnsUtilsPlugin::new(Arc::new(SystemRunner));
    let probes = tokio::task::spawn_blocking(move || plugin.probe()).await?;

    let mut all_ok = true;
    for outcome in &probes {
        match &outcome.error {
            None => println!("{:<9} ok", outcome.tool.name()),
            Some(error) => {
                all_ok = false;
                println!("{:<9} FAILED: {}", outcome.tool.name(), error);
            }
        }
    }

    Ok(if all_ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Resolve and load config: explicit flag → ./dnsutils.toml →
/// ~/.config/dnsutils/dnsutils.toml → built-in defaults.
fn load_config(explicit: Option<PathBuf>) -> Result<BotConfig> {
    let Some(path) = explicit.or_else(find_config) else {
        tracing::debug!("no dnsutils.toml found, using defaults");
        return Ok(BotConfig::default());
    };
    tracing::debug!(path = %path.display(), "loading config");
    BotConfig::load(&path).map_err(|e| anyhow::anyhow!("{}", e))
}

fn find_config() -> Option<PathBuf> {
    let local = Path::new("dnsutils.toml");
    if local.exists() {
        return Some(local.to_path_buf());
    }

    let xdg = dirs::config_dir()?.join("dnsutils").join("dnsutils.toml");
    xdg.exists().then_some(xdg)
}
