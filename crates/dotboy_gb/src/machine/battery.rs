use std::collections::HashMap;
use std::io;

/// Durable storage for battery-backed cartridge RAM.
///
/// Saves are opaque byte arrays keyed by a save identifier, usually the ROM
/// file stem.
pub trait BatteryStore {
    /// Load a save, or `None` if there is none yet.
    fn load(&mut self, save_id: &str) -> io::Result<Option<Vec<u8>>>;
    fn save(&mut self, save_id: &str, data: &[u8]) -> io::Result<()>;
}

/// Keeps saves in memory. Useful for tests and headless runs.
#[derive(Clone, Debug, Default)]
pub struct MemoryBatteryStore {
    saves: HashMap<String, Vec<u8>>,
}

impl MemoryBatteryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, save_id: &str) -> Option<&[u8]> {
        self.saves.get(save_id).map(Vec::as_slice)
    }
}

impl BatteryStore for MemoryBatteryStore {
    fn load(&mut self, save_id: &str) -> io::Result<Option<Vec<u8>>> {
        Ok(self.saves.get(save_id).cloned())
    }

    fn save(&mut self, save_id: &str, data: &[u8]) -> io::Result<()> {
        self.saves.insert(save_id.to_string(), data.to_vec());
        Ok(())
    }
}
