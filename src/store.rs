use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::debug;

/// The four independent persistence slots. Each holds one serialized
/// snapshot; no slot references another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Profile,
    Ledger,
    History,
    Credential,
}

impl Slot {
    pub fn key(self) -> &'static str {
        match self {
            Slot::Profile => "profile",
            Slot::Ledger => "ledger",
            Slot::History => "history",
            Slot::Credential => "credential",
        }
    }
}

/// Slot-keyed snapshot storage. Absence on load is the valid initial
/// state (it triggers onboarding), not an error.
pub trait StateStore {
    fn load(&self, slot: Slot) -> Result<Option<String>>;
    fn save(&mut self, slot: Slot, data: &str) -> Result<()>;
}

/// One JSON file per slot under a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("creating state dir {}", dir.display()))?;
        Ok(Self { dir })
    }

    fn path(&self, slot: Slot) -> PathBuf {
        self.dir.join(format!("{}.json", slot.key()))
    }
}

impl StateStore for FileStore {
    fn load(&self, slot: Slot) -> Result<Option<String>> {
        match fs::read_to_string(self.path(slot)) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("reading slot {}", slot.key())),
        }
    }

    fn save(&mut self, slot: Slot, data: &str) -> Result<()> {
        // Write-then-rename so a crash mid-save never leaves a torn slot.
        let path = self.path(slot);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, data).with_context(|| format!("writing slot {}", slot.key()))?;
        fs::rename(&tmp, &path).with_context(|| format!("committing slot {}", slot.key()))?;
        debug!(slot = slot.key(), bytes = data.len(), "slot saved");
        Ok(())
    }
}

/// In-memory store for tests and embedders that manage durability
/// themselves.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slots: HashMap<Slot, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStore {
    fn load(&self, slot: Slot) -> Result<Option<String>> {
        Ok(self.slots.get(&slot).cloned())
    }

    fn save(&mut self, slot: Slot, data: &str) -> Result<()> {
        self.slots.insert(slot, data.to_string());
        Ok(())
    }
}
