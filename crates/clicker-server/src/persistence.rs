//! Best-effort RON snapshots of the team state
//!
//! All writes go through one [`Saver`] task, which the engine never awaits.
//! Snapshots queued while a write is in flight collapse to the newest one,
//! so an older state can never land on disk after a newer one. A write goes
//! to a sibling temp file first and is renamed into place, so a crash
//! mid-write leaves the previous snapshot intact.

use chrono::{DateTime, Utc};
use clicker_core::{Engine, EngineConfig, GameRng, Millis, TeamState};
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// What goes on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub saved_at: DateTime<Utc>,
    pub team: TeamState,
    /// Generator state at capture; absent in files from older builds
    #[serde(default)]
    pub rng: Option<GameRng>,
}

impl Snapshot {
    pub fn capture(engine: &Engine) -> Self {
        Self {
            saved_at: Utc::now(),
            team: engine.team().clone(),
            rng: Some(engine.dice().clone()),
        }
    }

    /// Rebuild an engine, continuing the saved random sequence when present
    pub fn into_engine(self, config: EngineConfig) -> Engine {
        match self.rng {
            Some(rng) => Engine::resume(config, self.team, rng),
            None => Engine::restore(config, self.team),
        }
    }
}

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Encode error: {0}")]
    Encode(String),
    #[error("Decode error: {0}")]
    Decode(String),
}

/// Wall-clock milliseconds, the engine's notion of `now`
pub fn now_millis() -> Millis {
    Utc::now().timestamp_millis().max(0) as Millis
}

pub fn encode(snapshot: &Snapshot) -> Result<String, PersistError> {
    ron::ser::to_string_pretty(snapshot, ron::ser::PrettyConfig::default())
        .map_err(|e| PersistError::Encode(e.to_string()))
}

pub fn decode(text: &str) -> Result<Snapshot, PersistError> {
    ron::from_str(text).map_err(|e| PersistError::Decode(e.to_string()))
}

/// Write `snapshot` to `path`; only the saver task calls this
async fn write(path: &Path, snapshot: &Snapshot) -> Result<(), PersistError> {
    let text = encode(snapshot)?;
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(dir).await?;
    }
    let tmp = path.with_extension("ron.tmp");
    tokio::fs::write(&tmp, text).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}

/// Read the snapshot at `path`, if there is one
pub async fn load(path: &Path) -> Result<Option<Snapshot>, PersistError> {
    match tokio::fs::read_to_string(path).await {
        Ok(text) => decode(&text).map(Some),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Handle to the single task that owns the snapshot file
///
/// The task exits after flushing once every clone has been dropped.
#[derive(Debug, Clone)]
pub struct Saver {
    tx: mpsc::UnboundedSender<Snapshot>,
}

impl Saver {
    pub fn spawn(path: PathBuf) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run_saver(path, rx));
        (Self { tx }, task)
    }

    /// Queue a snapshot; false once the task has stopped
    pub fn submit(&self, snapshot: Snapshot) -> bool {
        self.tx.send(snapshot).is_ok()
    }
}

async fn run_saver(path: PathBuf, mut rx: mpsc::UnboundedReceiver<Snapshot>) {
    while let Some(mut snapshot) = rx.recv().await {
        while let Ok(newer) = rx.try_recv() {
            snapshot = newer;
        }
        match write(&path, &snapshot).await {
            Ok(()) => debug!(path = %path.display(), saved_at = %snapshot.saved_at, "snapshot written"),
            Err(e) => warn!(path = %path.display(), "snapshot failed: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clicker_core::{Dice, PlayerId};

    fn team() -> TeamState {
        let mut team = TeamState::new(100.0);
        team.add_player(PlayerId(1), "ana", 10).unwrap();
        team.earn(250.0);
        team.level = 4;
        team.fragments = 3;
        team
    }

    fn snapshot(team: TeamState) -> Snapshot {
        Snapshot {
            saved_at: Utc::now(),
            team,
            rng: None,
        }
    }

    fn scratch(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("clicker-{}-{}", name, std::process::id()))
    }

    #[test]
    fn test_encode_decode() {
        let original = snapshot(team());
        let text = encode(&original).unwrap();
        let decoded = decode(&text).unwrap();
        assert_eq!(decoded.saved_at, original.saved_at);
        assert_eq!(decoded.team.coins, team().coins);
        assert_eq!(decoded.team.fragments, 3);
        // players are connection-scoped and never written
        assert!(decoded.team.players.is_empty());
    }

    #[test]
    fn test_garbage_is_a_decode_error() {
        assert!(matches!(decode("(team: 5)"), Err(PersistError::Decode(_))));
    }

    #[test]
    fn test_restart_continues_the_random_sequence() {
        let config = EngineConfig::default();
        let mut rng = GameRng::new(config.seed);
        rng.roll();
        rng.roll();
        let engine = Engine::resume(config.clone(), team(), rng.clone());

        let text = encode(&Snapshot::capture(&engine)).unwrap();
        let restored = decode(&text).unwrap().into_engine(config.clone());
        assert_eq!(restored.dice().state(), rng.state());

        let mut continued = restored.dice().clone();
        assert_eq!(continued.roll(), rng.roll());

        // snapshots without generator state fall back to the configured seed
        let restarted = snapshot(team()).into_engine(config.clone());
        assert_eq!(restarted.dice().state(), GameRng::new(config.seed).state());
    }

    #[tokio::test]
    async fn test_saver_writes_then_load() {
        let dir = scratch("snapshot");
        let path = dir.join("team.ron");

        assert!(load(&path).await.unwrap().is_none());
        let (saver, task) = Saver::spawn(path.clone());
        assert!(saver.submit(snapshot(team())));
        drop(saver);
        task.await.unwrap();

        let loaded = load(&path).await.unwrap().unwrap();
        assert_eq!(loaded.team.coins.whole(), 250);
        assert_eq!(loaded.team.level, 4);
        assert!(!path.with_extension("ron.tmp").exists());

        let _ = tokio::fs::remove_dir_all(&dir).await;
    }

    #[tokio::test]
    async fn test_newest_snapshot_wins() {
        let dir = scratch("ordering");
        let path = dir.join("team.ron");
        let (saver, task) = Saver::spawn(path.clone());
        let other = saver.clone();

        // a heavier early state followed by lighter later ones
        let mut heavy = team();
        for i in 0..500 {
            heavy.upgrades.insert(format!("filler_{}", i), i);
        }
        heavy.fragments = 0;
        assert!(saver.submit(snapshot(heavy)));
        for round in 1..=25u64 {
            let mut next = team();
            next.fragments = round;
            let sender = if round % 2 == 0 { &saver } else { &other };
            assert!(sender.submit(snapshot(next)));
            tokio::task::yield_now().await;
        }
        drop(saver);
        drop(other);
        task.await.unwrap();

        let loaded = load(&path).await.unwrap().unwrap();
        assert_eq!(loaded.team.fragments, 25);

        let _ = tokio::fs::remove_dir_all(&dir).await;
    }
}
