// Softbreak Send-Key Configuration
// The modifier -> "submits" mapping and its process-wide snapshot holder

use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::key::Modifier;

/// Which modifier+Enter combinations submit the message.
///
/// A modifier mapped to `false` inserts a line break instead. The
/// record mirrors what the external settings store persists: four
/// booleans, every one defaulting to `true` when absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SendKeyConfig {
    pub alt: bool,
    pub shift: bool,
    pub ctrl: bool,
    pub meta: bool,
}

impl Default for SendKeyConfig {
    fn default() -> Self {
        Self {
            alt: true,
            shift: true,
            ctrl: true,
            meta: true,
        }
    }
}

impl SendKeyConfig {
    /// All four modifiers set to the same value.
    pub fn all(submits: bool) -> Self {
        Self {
            alt: submits,
            shift: submits,
            ctrl: submits,
            meta: submits,
        }
    }

    pub fn submits(&self, modifier: Modifier) -> bool {
        match modifier {
            Modifier::Alt => self.alt,
            Modifier::Shift => self.shift,
            Modifier::Ctrl => self.ctrl,
            Modifier::Meta => self.meta,
        }
    }

    pub fn set(&mut self, modifier: Modifier, submits: bool) {
        match modifier {
            Modifier::Alt => self.alt = submits,
            Modifier::Shift => self.shift = submits,
            Modifier::Ctrl => self.ctrl = submits,
            Modifier::Meta => self.meta = submits,
        }
    }
}

/// Process-wide configuration snapshot.
///
/// The router reads whatever snapshot is resident via `current()`; the
/// external storage collaborator pushes updates through `replace()`,
/// always as a whole record. Until the first load lands, `current()`
/// serves the compiled-in defaults — a stale read is expected and must
/// never block or fail.
#[derive(Debug, Clone, Default)]
pub struct SendKeyProvider {
    inner: Arc<RwLock<SendKeyConfig>>,
}

impl SendKeyProvider {
    /// Provider pre-seeded with the defaults (all modifiers submit).
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(config: SendKeyConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(config)),
        }
    }

    /// Synchronous best-effort read of the resident snapshot.
    pub fn current(&self) -> SendKeyConfig {
        *self.inner.read()
    }

    /// Wholesale replacement of the snapshot. Field-level mutation is
    /// deliberately not offered: partial updates must never be visible
    /// to a concurrent read.
    pub fn replace(&self, config: SendKeyConfig) {
        *self.inner.write() = config;
    }
}
