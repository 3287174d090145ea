//! presence-relay binary.
//!
//! Watches the now-playing file and mirrors it into rich presence until
//! SIGINT/SIGTERM, then hides the presence and exits.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use presence_relay::shutdown::shutdown_signal;
use presence_relay::watch::FileWatcher;
use presence_relay::{logging, Config, PresenceSession, Relay};

#[derive(Debug, Parser)]
#[command(name = "presence-relay", version, about)]
struct Cli {
    /// Config file (default: <config dir>/presence-relay/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Now-playing file to watch
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Application id registered with the presence host
    #[arg(long)]
    client_id: Option<String>,

    /// Directory holding the host's IPC sockets
    #[arg(long)]
    socket_dir: Option<PathBuf>,

    /// trace, debug, info, warn or error (default: $PRESENCE_RELAY_LOG or info)
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    fn apply(self, mut config: Config) -> Config {
        if let Some(file) = self.file {
            config.now_playing_path = file;
        }
        if let Some(client_id) = self.client_id {
            config.client_id = client_id;
        }
        if let Some(dir) = self.socket_dir {
            config.socket_dir = Some(dir);
        }
        config
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_level.as_deref());

    let config = Config::load(cli.config.as_deref()).context("loading configuration")?;
    let config = cli.apply(config);
    config.validate()?;

    let session = PresenceSession::new(config.connector(), config.client_id.clone());
    let mut relay = Relay::new(session, config.display_profile(), &config.now_playing_path);

    let (_watcher, events) = FileWatcher::new(&config.now_playing_path)
        .with_context(|| format!("watching {}", config.now_playing_path.display()))?;

    let shutdown = shutdown_signal().context("installing signal handlers")?;

    relay.prime().await;
    tracing::info!(
        "presence-relay is running. Watching {}",
        config.now_playing_path.display()
    );

    relay.run(events, shutdown).await?;
    tracing::info!("presence-relay exiting");
    Ok(())
}
