//! Battle snapshots.
//!
//! A snapshot holds only plain data: both players, their teams and
//! inventories, the game mode and the turn state including the seconds left
//! on the clock. Timers are rebuilt by `BattleRunner::restore`.
//!
//! Two encodings share the same header: a compact binary one (postcard) and a
//! JSON one for inspection. Binary snapshots start with `MAGIC` followed by
//! the format version as little-endian `u16`; JSON snapshots carry the same
//! values in `magic` and `version` fields.

use crate::battle::observer::BattleObserver;
use crate::battle::runner::{BattleHandle, BattleRunner};
use crate::battle::state::BattleState;
use crate::config::BattleConfig;
use crate::errors::{ArenaResult, PersistenceError, PersistenceResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tokio::task::JoinHandle;
use tracing::warn;

pub const MAGIC: [u8; 4] = *b"PKAR";
pub const SNAPSHOT_VERSION: u16 = 1;

const HEADER_LEN: usize = MAGIC.len() + 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotFormat {
    Binary,
    Json,
}

#[derive(Serialize)]
struct JsonEnvelope<'a> {
    magic: String,
    version: u16,
    state: &'a BattleState,
}

#[derive(Deserialize)]
struct JsonEnvelopeIn {
    magic: String,
    version: u16,
    state: serde_json::Value,
}

/// Encode a battle as a binary snapshot.
pub fn save(state: &BattleState) -> PersistenceResult<Vec<u8>> {
    let body = postcard::to_allocvec(state).map_err(|e| PersistenceError::Encode(e.to_string()))?;
    let mut bytes = Vec::with_capacity(HEADER_LEN + body.len());
    bytes.extend_from_slice(&MAGIC);
    bytes.extend_from_slice(&SNAPSHOT_VERSION.to_le_bytes());
    bytes.extend_from_slice(&body);
    Ok(bytes)
}

/// Decode a binary snapshot. Nothing outside the returned state is touched,
/// so a failed load leaves any running battle as it was.
pub fn load(bytes: &[u8]) -> PersistenceResult<BattleState> {
    if bytes.len() < HEADER_LEN || bytes[..MAGIC.len()] != MAGIC[..] {
        return Err(rejected(PersistenceError::BadMagic));
    }
    let version = u16::from_le_bytes([bytes[MAGIC.len()], bytes[MAGIC.len() + 1]]);
    check_version(version)?;

    let (state, rest): (BattleState, &[u8]) = postcard::take_from_bytes(&bytes[HEADER_LEN..])
        .map_err(|e| rejected(PersistenceError::Malformed(e.to_string())))?;
    if !rest.is_empty() {
        return Err(rejected(PersistenceError::Malformed(format!(
            "{} trailing bytes",
            rest.len()
        ))));
    }
    checked(state)
}

/// Encode a battle as a pretty-printed JSON snapshot.
pub fn save_json(state: &BattleState) -> PersistenceResult<String> {
    let envelope = JsonEnvelope {
        magic: String::from_utf8_lossy(&MAGIC).into_owned(),
        version: SNAPSHOT_VERSION,
        state,
    };
    serde_json::to_string_pretty(&envelope).map_err(|e| PersistenceError::Encode(e.to_string()))
}

pub fn load_json(content: &str) -> PersistenceResult<BattleState> {
    let envelope: JsonEnvelopeIn = serde_json::from_str(content)
        .map_err(|e| rejected(PersistenceError::Malformed(e.to_string())))?;
    if envelope.magic.as_bytes() != &MAGIC[..] {
        return Err(rejected(PersistenceError::BadMagic));
    }
    check_version(envelope.version)?;

    let state: BattleState = serde_json::from_value(envelope.state)
        .map_err(|e| rejected(PersistenceError::Malformed(e.to_string())))?;
    checked(state)
}

pub fn save_as(state: &BattleState, format: SnapshotFormat) -> PersistenceResult<Vec<u8>> {
    match format {
        SnapshotFormat::Binary => save(state),
        SnapshotFormat::Json => save_json(state).map(String::into_bytes),
    }
}

/// Decode either encoding, telling them apart by the header.
pub fn load_any(bytes: &[u8]) -> PersistenceResult<BattleState> {
    match detect_format(bytes) {
        SnapshotFormat::Binary => load(bytes),
        SnapshotFormat::Json => {
            let content = std::str::from_utf8(bytes)
                .map_err(|e| rejected(PersistenceError::Malformed(e.to_string())))?;
            load_json(content)
        }
    }
}

pub fn detect_format(bytes: &[u8]) -> SnapshotFormat {
    let first = bytes.iter().find(|b| !b.is_ascii_whitespace());
    if first == Some(&b'{') {
        SnapshotFormat::Json
    } else {
        SnapshotFormat::Binary
    }
}

pub fn save_to_file(path: &Path, state: &BattleState, format: SnapshotFormat) -> PersistenceResult<()> {
    let bytes = save_as(state, format)?;
    fs::write(path, bytes).map_err(|e| PersistenceError::Io(format!("{}: {}", path.display(), e)))
}

pub fn load_from_file(path: &Path) -> PersistenceResult<BattleState> {
    let bytes = fs::read(path).map_err(|e| PersistenceError::Io(format!("{}: {}", path.display(), e)))?;
    load_any(&bytes)
}

/// Decode a snapshot and start a runner for it with fresh timers.
/// Must be called from within a tokio runtime, after a type chart is installed.
pub fn resume(
    bytes: &[u8],
    config: BattleConfig,
    observer: Box<dyn BattleObserver>,
) -> ArenaResult<(BattleHandle, JoinHandle<BattleState>)> {
    let state = load_any(bytes)?;
    Ok(BattleRunner::restore(state, config, observer)?)
}

fn check_version(version: u16) -> PersistenceResult<()> {
    if version != SNAPSHOT_VERSION {
        return Err(rejected(PersistenceError::VersionMismatch {
            found: version,
            expected: SNAPSHOT_VERSION,
        }));
    }
    Ok(())
}

fn checked(state: BattleState) -> PersistenceResult<BattleState> {
    state
        .validate()
        .map_err(|reason| rejected(PersistenceError::Invalid(reason)))?;
    Ok(state)
}

fn rejected(err: PersistenceError) -> PersistenceError {
    warn!(error = %err, "snapshot rejected");
    err
}
