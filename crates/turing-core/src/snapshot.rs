//! Session snapshots for save/resume.
//!
//! A snapshot is the bitcode encoding of the live [`Session`] behind a
//! versioned header. The level itself is not stored: restoring requires
//! the same [`LevelDef`], and the header's level number must match it.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::engine::{EngineConfig, PuzzleEngine, Session};
use crate::level::{LevelDef, LevelError};
use crate::operator::OperatorKind;
use crate::theme::ThemeSignal;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Magic number identifying a Turing's Node session snapshot.
pub const SNAPSHOT_MAGIC: u32 = 0x7E57_0001;

/// Current format version. Increment when the encoded session changes shape.
pub const FORMAT_VERSION: u32 = 1;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("bitcode encoding failed: {0}")]
    Encode(String),
    #[error("bitcode decoding failed: {0}")]
    Decode(String),
    #[error("invalid magic number: expected 0x{:08X}, got 0x{:08X}", SNAPSHOT_MAGIC, .0)]
    InvalidMagic(u32),
    #[error("unsupported format version: expected {}, got {}", FORMAT_VERSION, .0)]
    UnsupportedVersion(u32),
    #[error("snapshot from future version {0} (this build supports up to {FORMAT_VERSION})")]
    FutureVersion(u32),
    #[error("snapshot is for level {found}, expected level {expected}")]
    LevelMismatch { expected: u32, found: u32 },
    #[error("snapshot has {found} buttons, level defines {expected}")]
    ButtonCountMismatch { expected: usize, found: usize },
    #[error("snapshot button {index} is {found}, level defines {expected}")]
    ButtonMismatch {
        index: usize,
        expected: OperatorKind,
        found: OperatorKind,
    },
    #[error("invalid level: {0}")]
    InvalidLevel(#[from] LevelError),
}

// ---------------------------------------------------------------------------
// Header
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotHeader {
    pub magic: u32,
    pub version: u32,
    pub level_number: u32,
}

impl SnapshotHeader {
    pub fn new(level_number: u32) -> Self {
        Self {
            magic: SNAPSHOT_MAGIC,
            version: FORMAT_VERSION,
            level_number,
        }
    }

    pub fn validate(&self) -> Result<(), SnapshotError> {
        if self.magic != SNAPSHOT_MAGIC {
            return Err(SnapshotError::InvalidMagic(self.magic));
        }
        if self.version > FORMAT_VERSION {
            return Err(SnapshotError::FutureVersion(self.version));
        }
        if self.version < FORMAT_VERSION {
            return Err(SnapshotError::UnsupportedVersion(self.version));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct SessionSnapshot {
    header: SnapshotHeader,
    session: Session,
}

/// Decode only the header, e.g. to find which level a save belongs to.
pub fn read_snapshot_header(data: &[u8]) -> Result<SnapshotHeader, SnapshotError> {
    let snapshot: SessionSnapshot =
        bitcode::deserialize(data).map_err(|e| SnapshotError::Decode(e.to_string()))?;
    Ok(snapshot.header)
}

impl PuzzleEngine {
    /// Encode the live session.
    pub fn snapshot(&self) -> Result<Vec<u8>, SnapshotError> {
        let snapshot = SessionSnapshot {
            header: SnapshotHeader::new(self.level.level_number),
            session: self.session.clone(),
        };
        bitcode::serialize(&snapshot).map_err(|e| SnapshotError::Encode(e.to_string()))
    }

    /// Rebuild an engine from a snapshot taken on `level`.
    ///
    /// Derived button state is restored as saved; the theme signal starts
    /// over from the restored session. No events are queued.
    pub fn restore(
        level: &LevelDef,
        config: EngineConfig,
        data: &[u8],
        now: NaiveDateTime,
    ) -> Result<Self, SnapshotError> {
        level.validate()?;
        let snapshot: SessionSnapshot =
            bitcode::deserialize(data).map_err(|e| SnapshotError::Decode(e.to_string()))?;
        snapshot.header.validate()?;

        let session = snapshot.session;
        if snapshot.header.level_number != level.level_number
            || session.level_number != level.level_number
        {
            return Err(SnapshotError::LevelMismatch {
                expected: level.level_number,
                found: snapshot.header.level_number,
            });
        }
        if session.buttons.len() != level.buttons.len()
            || session.tracker.len() != level.buttons.len()
        {
            return Err(SnapshotError::ButtonCountMismatch {
                expected: level.buttons.len(),
                found: session.buttons.len(),
            });
        }
        for (index, (button, seed)) in session.buttons.iter().zip(&level.buttons).enumerate() {
            if button.kind != seed.name {
                return Err(SnapshotError::ButtonMismatch {
                    index,
                    expected: seed.name,
                    found: button.kind,
                });
            }
        }

        let mut engine = PuzzleEngine {
            level: level.clone(),
            config,
            session,
            theme: ThemeSignal::new(config.theme_budget, now),
            events: Vec::new(),
        };
        // A save taken mid-transition resumes at its destination.
        engine.finish_animation(now);
        engine.update_theme(now);
        engine.events.clear();
        Ok(engine)
    }
}
