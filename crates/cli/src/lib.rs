use anyhow::{Context as AnyhowContext, Result};
use causal_graph::{Direction, ExportDocument, GraphSnapshot, LayoutConfig, LayoutEngine};
use causal_protocol::{serialize_json, serialize_json_pretty, StreamEvent, StreamStatus};
use causal_stream::{
    CancellationToken, SessionConfig, SessionObserver, SessionOutcome, StreamSession,
};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::io::AsyncRead;

fn print_stdout(text: &str) -> Result<()> {
    use std::io::Write;

    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let output = if pretty {
        serialize_json_pretty(value)?
    } else {
        serialize_json(value)?
    };
    print_stdout(&output)
}

#[derive(Serialize)]
struct Failure<'a> {
    status: &'static str,
    message: &'a str,
}

/// Report a failed session on stdout and exit non-zero.
fn fail(message: &str) -> Result<()> {
    log::error!("{message}");
    print_json(
        &Failure {
            status: StreamStatus::Error.as_str(),
            message,
        },
        false,
    )?;
    std::process::exit(1);
}

#[derive(Parser)]
#[command(name = "causal-flow")]
#[command(about = "Decode causal analysis streams and lay out the resulting graph", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Consume an event stream and print the final graph snapshot
    Ingest(IngestArgs),

    /// Lay out a bare analysis payload
    Layout(LayoutArgs),

    /// Print the JSON schema of stream events
    Schema(SchemaArgs),
}

#[derive(Args)]
struct LayoutOptions {
    /// Flow direction (LR, TB, RL, BT); overrides the config file
    #[arg(long)]
    direction: Option<Direction>,

    /// TOML file with layout spacing
    #[arg(long)]
    config: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,
}

#[derive(Args)]
struct IngestArgs {
    /// Stream file (reads stdin when omitted)
    #[arg(long)]
    input: Option<PathBuf>,

    /// Tag that marks event frames
    #[arg(long, default_value = causal_protocol::FRAME_PREFIX)]
    frame_prefix: String,

    #[command(flatten)]
    layout: LayoutOptions,

    /// Wrap the snapshot in an export document
    #[arg(long)]
    export: bool,

    /// Query recorded in the export document
    #[arg(long, requires = "export")]
    query: Option<String>,
}

#[derive(Args)]
struct LayoutArgs {
    /// Analysis payload JSON file
    #[arg(long)]
    payload: PathBuf,

    #[command(flatten)]
    layout: LayoutOptions,
}

#[derive(Args)]
struct SchemaArgs {
    /// Print the analysis payload schema instead
    #[arg(long)]
    analysis: bool,
}

pub async fn main_entry() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    match cli.command {
        Commands::Ingest(args) => run_ingest(args).await?,
        Commands::Layout(args) => run_layout(args)?,
        Commands::Schema(args) => run_schema(args)?,
    }

    Ok(())
}

fn layout_engine(options: &LayoutOptions) -> Result<LayoutEngine> {
    let mut config = match &options.config {
        Some(path) => load_layout_config(path)?,
        None => LayoutConfig::horizontal(),
    };
    if let Some(direction) = options.direction {
        config = config.with_direction(direction);
    }
    LayoutEngine::new(config).context("Invalid layout configuration")
}

fn load_layout_config(path: &Path) -> Result<LayoutConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    LayoutConfig::from_toml_str(&raw)
        .with_context(|| format!("Invalid layout config {}", path.display()))
}

/// Logs one line per progress event.
#[derive(Default)]
struct ProgressLog {
    events: usize,
}

impl SessionObserver for ProgressLog {
    fn on_progress(&mut self, event: &StreamEvent) {
        self.events += 1;
        if event.message.is_empty() {
            log::info!("[{}]", event.status);
        } else {
            log::info!("[{}] {}", event.status, event.message);
        }
    }

    fn on_complete(&mut self, data: &serde_json::Value) {
        log::debug!(
            "Analysis payload received ({} top-level fields)",
            data.as_object().map_or(0, |fields| fields.len())
        );
    }
}

async fn open_input(path: Option<&Path>) -> Result<Box<dyn AsyncRead + Unpin + Send>> {
    match path {
        Some(path) => {
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("Failed to open stream {}", path.display()))?;
            Ok(Box::new(file))
        }
        None => Ok(Box::new(tokio::io::stdin())),
    }
}

async fn run_ingest(args: IngestArgs) -> Result<()> {
    let engine = layout_engine(&args.layout)?;
    let reader = open_input(args.input.as_deref()).await?;

    let token = CancellationToken::new();
    tokio::spawn({
        let token = token.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                log::info!("Interrupted, cancelling session");
                token.cancel();
            }
        }
    });

    let config = SessionConfig {
        frame_prefix: args.frame_prefix.clone(),
        ..SessionConfig::default()
    };
    let mut session = StreamSession::with_config(reader, token, config)
        .context("Invalid session configuration")?;
    let mut progress = ProgressLog::default();
    let outcome = match session.run(&mut progress).await {
        Ok(outcome) => outcome,
        Err(err) => return fail(&err.to_string()),
    };

    let data = match outcome {
        SessionOutcome::Completed(data) => data.unwrap_or(serde_json::Value::Null),
        SessionOutcome::Cancelled => {
            log::info!("Session cancelled after {} events", progress.events);
            if args.input.is_none() {
                // The blocking stdin read cannot be cancelled and would hold up runtime shutdown.
                std::process::exit(0);
            }
            return Ok(());
        }
        SessionOutcome::Ended => {
            return fail(&format!(
                "Stream ended after {} events without a result",
                progress.events
            ));
        }
    };

    let snapshot = GraphSnapshot::from_payload(&data, &engine)
        .context("Failed to build graph from analysis payload")?;

    if args.export {
        let document = ExportDocument::new(snapshot, args.query, unix_millis()?);
        print_json(&document, args.layout.pretty)
    } else {
        print_json(&snapshot, args.layout.pretty)
    }
}

fn run_layout(args: LayoutArgs) -> Result<()> {
    let engine = layout_engine(&args.layout)?;
    let raw = fs::read_to_string(&args.payload)
        .with_context(|| format!("Failed to read payload {}", args.payload.display()))?;
    let payload: serde_json::Value =
        serde_json::from_str(&raw).context("Invalid JSON passed to --payload")?;
    let snapshot = GraphSnapshot::from_payload(&payload, &engine)
        .context("Failed to build graph from analysis payload")?;
    print_json(&snapshot, args.layout.pretty)
}

fn run_schema(args: SchemaArgs) -> Result<()> {
    let schema = if args.analysis {
        causal_protocol::analysis_schema()?
    } else {
        causal_protocol::stream_event_schema()?
    };
    print_json(&schema, true)
}

fn unix_millis() -> Result<u64> {
    let elapsed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .context("System clock is before the unix epoch")?;
    Ok(u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
}
