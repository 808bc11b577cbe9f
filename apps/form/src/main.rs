mod binder;
mod collection;
mod config;
mod errors;
mod events;
mod models;
mod notify;
mod preview;
mod render;
mod state;
mod storage;
mod validation;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::events::{FormEvent, Session};
use crate::preview::CommandOpener;
use crate::state::AppState;
use crate::storage::{FileStore, StorageAdapter};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // stdout carries event responses, so logs go to stderr
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("resume_form={}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting resume form v{}", env!("CARGO_PKG_VERSION"));

    let store = FileStore::new(&config.data_dir, config.storage_quota_bytes);
    info!("Local store at {}", store.dir().display());
    let storage = StorageAdapter::new(Box::new(store), config.storage_key.clone());
    info!("Persisting under key '{}'", storage.key());
    let opener = CommandOpener::new(config.preview_opener.clone());

    let state = AppState::new(config, storage, Box::new(opener));
    let mut session = Session::new(state);

    let mut stdout = tokio::io::stdout();

    // initial population of the form
    let initial = session.dispatch(FormEvent::Render);
    write_dispatch(&mut stdout, &initial).await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let out = tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if line.trim().is_empty() {
                    continue;
                }
                session.dispatch_line(&line)
            }
            Some(read) = session.next_photo() => session.complete_photo(read),
        };
        write_dispatch(&mut stdout, &out).await?;
    }

    info!("Input closed, shutting down");
    Ok(())
}

async fn write_dispatch(stdout: &mut tokio::io::Stdout, out: &events::Dispatch) -> Result<()> {
    let mut line = serde_json::to_vec(out)?;
    line.push(b'\n');
    stdout.write_all(&line).await?;
    stdout.flush().await?;
    Ok(())
}
