mod store;

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use canvas::engine::{Action, EngineCore};
use canvas::gateway::{GatewayError, LayoutGateway, LayoutSnapshot};
use clap::{Args, Parser, Subcommand};
use serde_json::Value;

use crate::store::{FileCache, HttpRemote};

type Gateway = LayoutGateway<FileCache, HttpRemote>;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned HTTP {status}: {message}")]
    ServerError { status: u16, message: String },
    #[error("{0}")]
    Gateway(#[from] GatewayError),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("cannot read {path}: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("layout is full ({0})")]
    LayoutFull(String),
}

#[derive(Parser, Debug)]
#[command(name = "layout-cli", about = "Box layout store CLI")]
struct Cli {
    #[arg(long, env = "LAYOUT_BASE_URL", default_value = "http://127.0.0.1:3000")]
    base_url: String,

    /// Local cache file, the stand-in for browser local storage.
    #[arg(long, env = "LAYOUT_CACHE", default_value = "./dws_app.json")]
    cache: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check the server's health endpoint.
    Ping,
    /// Load the layout (remote, then cache, then empty) and print it.
    Load,
    /// Print the loaded layout as a numbered list.
    List,
    /// Save a layout file locally and to the server.
    Save {
        file: PathBuf,
    },
    AddBox(AddBoxArgs),
    /// Remove the local cache file.
    Clear,
}

/// Append a box to the loaded layout, exactly as the editor's Add button does.
#[derive(Args, Debug)]
struct AddBoxArgs {
    #[arg(long)]
    size: Option<String>,

    #[arg(long)]
    font_size: Option<String>,

    /// Also push the result to the server.
    #[arg(long, default_value_t = false)]
    save_remote: bool,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let gateway = LayoutGateway::new(FileCache::new(&cli.cache), HttpRemote::new(&cli.base_url));

    match cli.command {
        Command::Ping => run_ping(&cli.base_url).await,
        Command::Load => run_load(&gateway).await,
        Command::List => run_list(&gateway).await,
        Command::Save { file } => run_save(&gateway, &file).await,
        Command::AddBox(args) => run_add_box(&gateway, args).await,
        Command::Clear => {
            gateway.clear_local();
            println!("cleared {}", gateway.local().path().display());
            Ok(())
        }
    }
}

async fn run_ping(base_url: &str) -> Result<(), CliError> {
    let client = reqwest::Client::new();
    let url = format!("{}/healthz", base_url.trim_end_matches('/'));
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(CliError::ServerError { status: status.as_u16(), message: "health check failed".to_owned() });
    }
    println!("ok");
    Ok(())
}

async fn run_load(gateway: &Gateway) -> Result<(), CliError> {
    let loaded = gateway.load().await;
    let json = serde_json::json!({
        "source": loaded.source.as_str(),
        "layout": loaded.snapshot,
    });
    print_json(&json)
}

async fn run_list(gateway: &Gateway) -> Result<(), CliError> {
    let mut core = EngineCore::new();
    core.load(gateway.load().await.snapshot);
    for line in list_lines(&core) {
        println!("{line}");
    }
    Ok(())
}

/// The editor's list panel as text: a capacity header, then one numbered line per box.
fn list_lines(core: &EngineCore) -> Vec<String> {
    let mut lines = vec![format!("boxes {}", core.doc.capacity_label())];
    for b in core.doc.boxes() {
        let n = core.doc.position_of(b.id).unwrap_or_default();
        lines.push(format!("{n:>3}. {} ({}, {}) {}px #{}", b.text, b.x, b.y, b.size, b.id));
    }
    lines
}

async fn run_save(gateway: &Gateway, file: &Path) -> Result<(), CliError> {
    let raw = std::fs::read_to_string(file).map_err(|source| CliError::ReadFile { path: file.to_path_buf(), source })?;
    let snapshot: LayoutSnapshot = serde_json::from_str(&raw)?;
    gateway.save(&snapshot, now_ms(), true).await?;
    println!("saved {} boxes", snapshot.boxes.len());
    Ok(())
}

async fn run_add_box(gateway: &Gateway, args: AddBoxArgs) -> Result<(), CliError> {
    let mut core = EngineCore::new();
    core.load(gateway.load().await.snapshot);
    if let Some(size) = &args.size {
        core.set_new_box_size(size);
    }
    if let Some(font_size) = &args.font_size {
        core.set_new_font_size(font_size);
    }

    #[allow(clippy::cast_precision_loss)]
    let actions = core.add_box(now_ms() as f64);
    let Some(added) = added_box(&actions) else {
        return Err(CliError::LayoutFull(core.doc.capacity_label()));
    };
    print_json(&serde_json::to_value(added)?)?;

    gateway.save(&core.snapshot(), now_ms(), args.save_remote).await?;
    Ok(())
}

fn added_box(actions: &[Action]) -> Option<&canvas::doc::LayoutBox> {
    actions.iter().find_map(|a| match a {
        Action::BoxAdded(b) => Some(b),
        _ => None,
    })
}

fn now_ms() -> i64 {
    let Ok(duration) = SystemTime::now().duration_since(UNIX_EPOCH) else {
        return 0;
    };
    i64::try_from(duration.as_millis()).unwrap_or(0)
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
