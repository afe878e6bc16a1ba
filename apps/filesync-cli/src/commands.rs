//! Subcommand handlers.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, bail};
use filesync_batch::{BatchReport, TransferOrchestrator};
use filesync_http::{ProbeOutcome, ServerClient, list_downloaded};
use filesync_protocol::ServerAddress;
use filesync_transfer::{
    FileDescriptor, FileSelection, TransferDirection, TransferStore, format_file_size,
};
use tracing::{info, warn};

use crate::cli::{Commands, ConfigAction};
use crate::config::{ClientConfig, config_path};
use crate::progress::ProgressRenderer;

/// Resolved inputs shared by every command.
pub struct Session {
    pub config: ClientConfig,
    /// `--server` override, if given.
    pub server: Option<ServerAddress>,
}

impl Session {
    fn address(&self) -> anyhow::Result<ServerAddress> {
        match self.server.as_ref().or(self.config.server.as_ref()) {
            Some(address) => Ok(address.clone()),
            None => bail!(
                "no server configured; run `filesync config set <host[:port]>` or pass --server"
            ),
        }
    }

    fn client(&self, download_dir: Option<PathBuf>) -> anyhow::Result<ServerClient> {
        let mut options = self.config.client_options();
        if let Some(dir) = download_dir {
            options.download_dir = dir;
        }
        let client = ServerClient::new(options).context("failed to build HTTP client")?;
        Ok(match self.config.media_registrar() {
            Some(registrar) => client.with_media_registrar(Arc::new(registrar)),
            None => client,
        })
    }
}

pub async fn run(command: Commands, ctx: Session) -> anyhow::Result<()> {
    match command {
        Commands::Config { action } => config(action, ctx.config),
        Commands::Ping => ping(&ctx).await,
        Commands::List => list(&ctx).await,
        Commands::Upload { paths } => upload(&ctx, paths).await,
        Commands::Download { names, all, dir } => download(&ctx, names, all, dir).await,
        Commands::Delete { name } => delete(&ctx, &name).await,
        Commands::Downloads { dir } => downloads(&ctx, dir).await,
    }
}

fn config(action: ConfigAction, mut config: ClientConfig) -> anyhow::Result<()> {
    match action {
        ConfigAction::Set {
            address,
            download_dir,
            media_root,
        } => {
            config.server = Some(address);
            if download_dir.is_some() {
                config.download_dir = download_dir;
            }
            if media_root.is_some() {
                config.media_root = media_root;
            }
            config.save()?;
            info!(path = %config_path().display(), "configuration saved");
        }
        ConfigAction::Show => {
            println!("config file:   {}", config_path().display());
            match &config.server {
                Some(address) => println!("server:        {address}"),
                None => println!("server:        (not set)"),
            }
            println!("download dir:  {}", config.download_dir().display());
            if let Some(registrar) = config.media_registrar() {
                println!("album:         {}", registrar.album_dir().display());
            }
            println!(
                "timeouts:      connect {}s, response {}s",
                config.connect_timeout_secs, config.response_timeout_secs
            );
        }
    }
    Ok(())
}

async fn ping(ctx: &Session) -> anyhow::Result<()> {
    let address = ctx.address()?;
    match ctx.client(None)?.probe(&address).await? {
        ProbeOutcome::Reachable => println!("{address} is reachable"),
        ProbeOutcome::UnexpectedStatus(status) => {
            println!("{address} answered with HTTP {status}; transfers may fail")
        }
    }
    Ok(())
}

async fn list(ctx: &Session) -> anyhow::Result<()> {
    let address = ctx.address()?;
    let files = ctx.client(None)?.fetch_listing(&address).await?;
    if files.is_empty() {
        println!("no files on {address}");
    }
    print_files(&files);
    Ok(())
}

async fn upload(ctx: &Session, paths: Vec<PathBuf>) -> anyhow::Result<()> {
    let address = ctx.address()?;

    let mut selection = FileSelection::new();
    let files = paths
        .iter()
        .map(|p| {
            FileDescriptor::from_path(p).with_context(|| format!("cannot upload {}", p.display()))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    reject_duplicate_names(&files)?;
    selection.replace(files);

    let report = run_batch(
        ctx.client(None)?,
        selection.selected(),
        TransferDirection::Upload,
        &address,
    )
    .await?;
    summarize(&report)
}

async fn download(
    ctx: &Session,
    names: Vec<String>,
    all: bool,
    dir: Option<PathBuf>,
) -> anyhow::Result<()> {
    let address = ctx.address()?;
    let client = ctx.client(dir)?;

    let mut selection = FileSelection::new();
    selection.replace(client.fetch_listing(&address).await?);
    if all {
        selection.select_all(true);
    } else {
        let wanted: Vec<&str> = names.iter().map(String::as_str).collect();
        let missing = selection.select_only(&wanted);
        if !missing.is_empty() {
            bail!("not on the server: {}", missing.join(", "));
        }
    }

    let files = selection.selected();
    if files.is_empty() {
        println!("nothing to download");
        return Ok(());
    }

    let report = run_batch(
        client,
        files,
        TransferDirection::Download,
        &address,
    )
    .await?;
    summarize(&report)
}

async fn delete(ctx: &Session, name: &str) -> anyhow::Result<()> {
    let address = ctx.address()?;
    let resp = ctx.client(None)?.delete_file(name, &address).await?;
    if resp.message.is_empty() {
        println!("{name}: deleted");
    } else {
        println!("{name}: {}", resp.message);
    }
    Ok(())
}

async fn downloads(ctx: &Session, dir: Option<PathBuf>) -> anyhow::Result<()> {
    let dir = dir.unwrap_or_else(|| ctx.config.download_dir());
    let files = list_downloaded(&dir).await?;
    if files.is_empty() {
        println!("no downloads in {}", dir.display());
    }
    print_files(&files);
    Ok(())
}

/// Runs one batch with progress bars; Ctrl-C cancels what is left.
async fn run_batch(
    client: ServerClient,
    files: Vec<FileDescriptor>,
    direction: TransferDirection,
    address: &ServerAddress,
) -> anyhow::Result<BatchReport> {
    let store = Arc::new(TransferStore::new());
    let renderer = Arc::new(ProgressRenderer::new());
    let subscription = renderer.attach(&store);

    let orchestrator = TransferOrchestrator::new(Arc::clone(&store), Arc::new(client));
    let cancel = orchestrator.cancel_token();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupted, cancelling remaining transfers");
            cancel.cancel();
        }
    });

    let result = orchestrator.run_batch(&files, direction, address).await;
    interrupt.abort();
    store.unsubscribe(subscription);
    Ok(result?)
}

fn summarize(report: &BatchReport) -> anyhow::Result<()> {
    let failed: Vec<_> = report.failed().collect();
    if failed.is_empty() {
        println!("{} file(s) done", report.outcomes.len());
        return Ok(());
    }
    for outcome in &failed {
        eprintln!(
            "{}: {}",
            outcome.file_id,
            outcome.error.as_deref().unwrap_or("failed")
        );
    }
    bail!(
        "{} of {} {}s failed",
        failed.len(),
        report.outcomes.len(),
        report.direction
    )
}

/// Files are keyed by name on both ends, so two local paths with the same
/// file name would overwrite each other.
fn reject_duplicate_names(files: &[FileDescriptor]) -> anyhow::Result<()> {
    let mut seen: HashMap<&str, &FileDescriptor> = HashMap::new();
    for file in files {
        if let Some(first) = seen.insert(&file.name, file) {
            let shown = |f: &FileDescriptor| {
                f.source
                    .as_deref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| f.name.clone())
            };
            bail!(
                "{} and {} share the name {}; upload them separately",
                shown(first),
                shown(file),
                file.name
            );
        }
    }
    Ok(())
}

fn print_files(files: &[FileDescriptor]) {
    let width = files.iter().map(|f| f.name.len()).max().unwrap_or(0);
    for f in files {
        println!("{:<width$}  {:>10}", f.name, format_file_size(f.size));
    }
}
