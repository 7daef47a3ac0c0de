//! Run log and statistics.
//!
//! Every event of a run lands in the `RunLog`, the sole diagnostic channel
//! of the engine. Entries are also mirrored to `tracing` so host
//! applications see them through their own subscriber.

use serde::{Deserialize, Serialize};

use super::stage::QuestStage;

/// Severity of a log entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    /// Per-draw detail.
    Debug,
    Info,
    /// Tolerated problem (missing Reward/Failure).
    Warn,
    /// Run-aborting problem.
    Error,
}

/// Result of one draw attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrawOutcome {
    Accepted,
    Rejected,
    Fallback,
}

impl std::fmt::Display for DrawOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            DrawOutcome::Accepted => "ACCEPTED",
            DrawOutcome::Rejected => "REJECTED",
            DrawOutcome::Fallback => "FALLBACK",
        })
    }
}

/// Structured detail attached to a log entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogData {
    /// Requirement chosen for a deck. `source` is the card whose pending
    /// instruction supplied it, `None` when the default was used.
    Requirement {
        deck: String,
        tags: Vec<String>,
        source: Option<String>,
    },
    /// One draw attempt.
    Draw {
        attempt: u32,
        card: String,
        outcome: DrawOutcome,
        required: Vec<String>,
        matched: Vec<String>,
    },
    /// Card placed in a quest slot.
    Drawn { card: String, tags: Vec<String> },
    /// Pending instruction recorded in the ledger.
    Pending {
        source: String,
        target: String,
        tags: Vec<String>,
    },
    /// Modify effect applied or deferred.
    Modify {
        source: String,
        target: String,
        tags: Vec<String>,
    },
    /// Deck with nothing to draw.
    EmptyDeck { deck: String },
}

/// One log entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Monotonic index within the run.
    pub timestamp: u64,
    pub level: LogLevel,
    pub stage: QuestStage,
    pub message: String,
    pub data: Option<LogData>,
}

/// Append-only log of one run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunLog {
    entries: Vec<LogEntry>,
}

impl RunLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry and mirror it to `tracing`.
    pub fn push(
        &mut self,
        level: LogLevel,
        stage: QuestStage,
        message: impl Into<String>,
        data: Option<LogData>,
    ) {
        let message = message.into();
        match level {
            LogLevel::Debug => tracing::debug!(%stage, "{message}"),
            LogLevel::Info => tracing::info!(%stage, "{message}"),
            LogLevel::Warn => tracing::warn!(%stage, "{message}"),
            LogLevel::Error => tracing::error!(%stage, "{message}"),
        }
        self.entries.push(LogEntry {
            timestamp: self.entries.len() as u64,
            level,
            stage,
            message,
            data,
        });
    }

    pub fn debug(&mut self, stage: QuestStage, message: impl Into<String>, data: LogData) {
        self.push(LogLevel::Debug, stage, message, Some(data));
    }

    pub fn info(&mut self, stage: QuestStage, message: impl Into<String>, data: Option<LogData>) {
        self.push(LogLevel::Info, stage, message, data);
    }

    pub fn warn(&mut self, stage: QuestStage, message: impl Into<String>, data: Option<LogData>) {
        self.push(LogLevel::Warn, stage, message, data);
    }

    pub fn error(&mut self, stage: QuestStage, message: impl Into<String>, data: Option<LogData>) {
        self.push(LogLevel::Error, stage, message, data);
    }

    #[must_use]
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Structured data of every entry, in order.
    pub fn data(&self) -> impl Iterator<Item = &LogData> {
        self.entries.iter().filter_map(|e| e.data.as_ref())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Counters produced by a run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunStats {
    /// Draws made by the resolver, accepted or not.
    pub draw_attempts: u32,

    /// Resolutions settled by the unconditional final draw.
    pub fallbacks_triggered: u32,

    /// Modify effects that changed a card.
    pub modify_effects_applied: u32,
}

impl RunStats {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset all counters to zero.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
