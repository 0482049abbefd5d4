use anyhow::{bail, Result};
use std::collections::HashMap;

/// String key-value persistence, in the shape of a browser `localStorage`.
///
/// The board only ever touches one key, but backends are generic so the
/// controller can be driven against an in-memory map in tests.
pub trait KeyValueStore {
    /// Read a value; `Ok(None)` when the key has never been written
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Overwrite a value
    fn set_item(&mut self, key: &str, value: &str) -> Result<()>;

    /// Delete a value; missing keys are not an error
    fn remove_item(&mut self, key: &str) -> Result<()>;
}

/// In-memory key-value store (for testing)
#[derive(Debug, Default, Clone)]
pub struct MemoryKv {
    items: HashMap<String, String>,
    fail_reads: bool,
    fail_writes: bool,
    writes: usize,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-populated with one key
    pub fn with_item(key: &str, value: &str) -> Self {
        let mut kv = Self::new();
        kv.items.insert(key.to_string(), value.to_string());
        kv
    }

    /// Make every read fail, as an unreadable backend would
    pub fn failing_reads(mut self) -> Self {
        self.fail_reads = true;
        self
    }

    /// Make every write fail, as a full or read-only backend would
    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    /// Number of successful `set_item` calls
    pub fn write_count(&self) -> usize {
        self.writes
    }
}

impl KeyValueStore for MemoryKv {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        if self.fail_reads {
            bail!("storage read refused for key '{}'", key);
        }
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        if self.fail_writes {
            bail!("storage write refused for key '{}'", key);
        }
        self.items.insert(key.to_string(), value.to_string());
        self.writes += 1;
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        if self.fail_writes {
            bail!("storage write refused for key '{}'", key);
        }
        self.items.remove(key);
        Ok(())
    }
}
