use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::errors::EngineError;
use crate::game::{GameId, GameState, GameType};
use crate::player::{Player, PlayerId};
use crate::reducer::{Reducer, ReducerExt};
use crate::rng::Seed;
use crate::rules::trick_counts;
use crate::spades::SpadesState;

/// Complete record of one game: everything needed to rebuild it plus the
/// outcome observed when it was recorded.
/// Serialized to JSONL format for game history storage and replay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    /// Unique identifier for this record (format: YYYYMMDD-NNNNNN)
    pub record_id: String,
    pub game_id: GameId,
    pub game_type: GameType,
    /// Seed of the deal (enables deterministic replay)
    pub seed: Seed,
    /// Players in table order
    pub players: Vec<Player>,
    /// Chronological list of all actions
    pub actions: Vec<Action>,
    /// Winner observed when the game finished
    #[serde(default)]
    pub winner: Option<PlayerId>,
    /// Tricks taken per player, in table order
    #[serde(default)]
    pub tricks_won: Vec<(PlayerId, usize)>,
    /// Timestamp when the game was recorded (RFC3339 format)
    #[serde(default)]
    pub ts: Option<String>,
    /// Additional metadata (extensible JSON object)
    #[serde(default)]
    pub meta: Option<serde_json::Value>,
}

impl GameRecord {
    /// Captures a finished (or abandoned) spades game.
    pub fn from_spades(record_id: String, state: &GameState<SpadesState>) -> Self {
        Self {
            record_id,
            game_id: state.game_id.clone(),
            game_type: state.game_type,
            seed: state.seed,
            players: state.players.clone(),
            actions: state.action_history.clone(),
            winner: state.winner.clone(),
            tricks_won: trick_counts(&state.players, &state.payload.tricks),
            ts: None,
            meta: None,
        }
    }

    /// Replays the recorded actions with `reducer`.
    pub fn rebuild<R: Reducer>(&self, reducer: &R) -> Result<GameState<R::Payload>, EngineError> {
        reducer.rebuild(self.seed, &self.players, &self.actions)
    }
}

pub fn format_record_id(yyyymmdd: &str, seq: u32) -> String {
    format!("{}-{:06}", yyyymmdd, seq)
}

use chrono::{SecondsFormat, Utc};
use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Appends [`GameRecord`]s to a JSONL file, one per line.
pub struct GameLogger {
    writer: Option<BufWriter<File>>,
    date: String,
    seq: u32,
}

impl GameLogger {
    pub fn create<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                create_dir_all(parent)?;
            }
        }
        let f = File::create(path)?;
        Ok(Self {
            writer: Some(BufWriter::new(f)),
            date: Utc::now().format("%Y%m%d").to_string(),
            seq: 0,
        })
    }

    /// A logger that numbers records for `date` but writes nowhere.
    pub fn detached(date: &str) -> Self {
        Self {
            writer: None,
            date: date.to_string(),
            seq: 0,
        }
    }

    pub fn next_id(&mut self) -> String {
        self.seq += 1;
        format_record_id(&self.date, self.seq)
    }

    pub fn write(&mut self, record: &GameRecord) -> std::io::Result<()> {
        // inject timestamp if missing
        let mut rec = record.clone();
        if rec.ts.is_none() {
            rec.ts = Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));
        }
        let line = serde_json::to_string(&rec).map_err(std::io::Error::other)?;
        if let Some(w) = &mut self.writer {
            w.write_all(line.as_bytes())?;
            w.write_all(b"\n")?;
            w.flush()?;
        }
        Ok(())
    }
}
