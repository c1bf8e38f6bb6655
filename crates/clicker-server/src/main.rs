//! Clicker server - one shared team economy over WebSockets
//!
//! Every connection is one player. All players mutate the same team state
//! through a single engine actor; a timer drives auto-click income, power-up
//! expiry and boss deadlines even when nobody is connected.
//!
//! Configuration is read from the RON file given as the first argument
//! (default `config/server.ron`). `RUST_LOG` overrides the configured log
//! level.

mod actor;
mod config;
mod persistence;
mod session;

use actor::{EngineActor, Request};
use clicker_core::Engine;
use config::ServerConfig;
use persistence::{now_millis, Saver};
use session::PlayerIds;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config/server.ron".to_string());
    let config = ServerConfig::load(&config_path)?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
    info!(path = %config_path, "configuration loaded");

    let engine = match persistence::load(&config.snapshot_path).await {
        Ok(Some(snapshot)) => {
            info!(saved_at = %snapshot.saved_at, level = snapshot.team.level, "team restored");
            snapshot.into_engine(config.engine.clone())
        }
        Ok(None) => Engine::new(config.engine.clone()),
        Err(e) => {
            warn!("snapshot unreadable, starting a fresh team: {}", e);
            Engine::new(config.engine.clone())
        }
    };

    let (saver, saver_task) = Saver::spawn(config.snapshot_path.clone());
    let actor = EngineActor::new(engine, Some(saver.clone()));
    let (handle, actor_task) = actor.spawn();

    let ticker = handle.clone();
    let tick_every = Duration::from_millis(config.tick_interval_ms);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(tick_every);
        loop {
            interval.tick().await;
            if !ticker.send(Request::Tick { now: now_millis() }) {
                break;
            }
        }
    });

    let snapshotter = handle.clone();
    let save_every = Duration::from_secs(config.snapshot_interval_secs);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(save_every);
        interval.tick().await;
        loop {
            interval.tick().await;
            if !snapshotter.send(Request::Snapshot) {
                break;
            }
        }
    });

    let listener = TcpListener::bind(&config.listen).await?;
    info!("listening on ws://{}", config.listen);

    let ids = Arc::new(PlayerIds::new());
    loop {
        tokio::select! {
            accepted = listener.accept() => match accepted {
                Ok((stream, addr)) => {
                    let player = ids.next();
                    tokio::spawn(session::serve(stream, addr, player, handle.clone()));
                }
                Err(e) => error!("accept error: {}", e),
            },
            _ = tokio::signal::ctrl_c() => {
                info!("shutting down");
                break;
            }
        }
    }

    if let Some(snapshot) = handle.shutdown().await {
        saver.submit(snapshot);
    }
    if let Err(e) = actor_task.await {
        error!("engine actor failed: {}", e);
    }
    // the saver task drains its queue and exits once the last handle is gone
    drop(saver);
    if let Err(e) = saver_task.await {
        error!("snapshot writer failed: {}", e);
    }
    info!(path = %config.snapshot_path.display(), "final snapshot flushed");
    Ok(())
}
