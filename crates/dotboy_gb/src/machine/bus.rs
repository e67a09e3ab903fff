//! Address-space multiplexer.
//!
//! Every memory-mapped component implements [`AddressSpace`]. An
//! [`AddressMap`] keeps an ordered list of handles to those components and
//! routes each access to the first one whose `contains` matches, so mapping
//! order is priority: the boot ROM is mapped ahead of the cartridge and
//! shadows it until it is unmapped.
//!
//! The map never owns the components. It stores plain handles (`Id`) and
//! resolves them through a [`SpaceRegistry`] at access time, which keeps a
//! single owner for every piece of hardware.

use std::fmt;

use thiserror::Error;

/// A memory-mapped hardware block.
pub trait AddressSpace {
    fn contains(&self, addr: u16) -> bool;
    fn read(&self, addr: u16) -> u8;
    fn write(&mut self, addr: u16, value: u8);
}

/// Resolves map handles to the components that own the storage.
pub trait SpaceRegistry {
    type Id: Copy + Eq + fmt::Debug;

    fn space(&self, id: Self::Id) -> &dyn AddressSpace;
    fn space_mut(&mut self, id: Self::Id) -> &mut dyn AddressSpace;
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BusError {
    #[error("no address space mapped at {0:#06X}")]
    Unmapped(u16),
}

/// Ordered list of mapped spaces.
#[derive(Clone, Debug)]
pub struct AddressMap<Id> {
    entries: Vec<Id>,
}

impl<Id> Default for AddressMap<Id> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<Id: Copy + Eq + fmt::Debug> AddressMap<Id> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `id` at the lowest priority.
    pub fn map(&mut self, id: Id) {
        debug_assert!(!self.is_mapped(id), "{id:?} mapped twice");
        self.entries.push(id);
    }

    /// Remove `id` from the map. Returns `false` if it was not mapped.
    pub fn unmap(&mut self, id: Id) -> bool {
        match self.entries.iter().position(|&entry| entry == id) {
            Some(index) => {
                self.entries.remove(index);
                log::debug!("bus: unmapped {id:?}");
                true
            }
            None => false,
        }
    }

    pub fn is_mapped(&self, id: Id) -> bool {
        self.entries.contains(&id)
    }

    pub fn entries(&self) -> &[Id] {
        &self.entries
    }

    /// Find the highest-priority space claiming `addr`.
    pub fn route<R>(&self, registry: &R, addr: u16) -> Option<Id>
    where
        R: SpaceRegistry<Id = Id> + ?Sized,
    {
        self.entries
            .iter()
            .copied()
            .find(|&id| registry.space(id).contains(addr))
    }

    pub fn try_read<R>(&self, registry: &R, addr: u16) -> Result<u8, BusError>
    where
        R: SpaceRegistry<Id = Id> + ?Sized,
    {
        let id = self.route(registry, addr).ok_or(BusError::Unmapped(addr))?;
        Ok(registry.space(id).read(addr))
    }

    /// Write through the map, returning the handle that received the write.
    pub fn try_write<R>(&self, registry: &mut R, addr: u16, value: u8) -> Result<Id, BusError>
    where
        R: SpaceRegistry<Id = Id> + ?Sized,
    {
        let id = self.route(registry, addr).ok_or(BusError::Unmapped(addr))?;
        registry.space_mut(id).write(addr, value);
        Ok(id)
    }

    /// Infallible read. An unmapped address is a wiring bug: it panics in
    /// debug builds and reads as open bus (0xFF) otherwise.
    pub fn read<R>(&self, registry: &R, addr: u16) -> u8
    where
        R: SpaceRegistry<Id = Id> + ?Sized,
    {
        match self.try_read(registry, addr) {
            Ok(value) => value,
            Err(err) => wiring_bug(err),
        }
    }

    /// Infallible write. See [`AddressMap::read`].
    pub fn write<R>(&self, registry: &mut R, addr: u16, value: u8) -> Option<Id>
    where
        R: SpaceRegistry<Id = Id> + ?Sized,
    {
        match self.try_write(registry, addr, value) {
            Ok(id) => Some(id),
            Err(err) => {
                wiring_bug(err);
                None
            }
        }
    }
}

fn wiring_bug(err: BusError) -> u8 {
    log::error!("bus: {err}");
    if cfg!(debug_assertions) {
        panic!("bus: {err}");
    }
    0xFF
}

/// Report an access that reached a component outside its declared range.
///
/// Used in the fallback arm of each component's register decode. Panics in
/// debug builds; release builds log it and read as 0xFF.
pub(crate) fn out_of_range(component: &str, addr: u16) -> u8 {
    log::error!("{component}: access outside mapped range at {addr:#06X}");
    if cfg!(debug_assertions) {
        panic!("{component}: access outside mapped range at {addr:#06X}");
    }
    0xFF
}
