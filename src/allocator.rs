//! Generator pin and sync group bookkeeping.
//!
//! Generator pins are exclusive: a pin drives at most one dimmer. Time-base
//! groups are shared: every dimmer fed by the same zero-crossing line lands
//! in the same group, because the sync source is wired per group.

use core::cell::RefCell;

use critical_section::Mutex;

use crate::error::AllocError;
use crate::timebase::{GroupId, Pin};

/// Number of time-base groups on common MCPWM parts
pub const DEFAULT_GROUPS: usize = 2;

/// Pins tracked by the generator registry
pub const MAX_PINS: u8 = 64;

/// Registry of reserved generator pins and per-group sync pins
///
/// Not synchronized. Share it between tasks through [`SharedAllocator`].
#[derive(Debug, Clone)]
pub struct ResourceAllocator<const GROUPS: usize = DEFAULT_GROUPS> {
    generators: u64,
    groups: [Option<Pin>; GROUPS],
}

impl<const GROUPS: usize> ResourceAllocator<GROUPS> {
    /// Create an allocator with nothing reserved
    pub const fn new() -> Self {
        Self {
            generators: 0,
            groups: [None; GROUPS],
        }
    }

    /// Forget every reservation
    pub fn reset(&mut self) {
        self.generators = 0;
        self.groups = [None; GROUPS];
    }

    /// Reserve a generator pin
    pub fn reserve_generator(&mut self, pin: Pin) -> Result<(), AllocError> {
        let mask = Self::pin_mask(pin)?;
        if self.generators & mask != 0 {
            return Err(AllocError::PinInUse(pin));
        }
        self.generators |= mask;
        Ok(())
    }

    /// Release a generator pin
    ///
    /// Returns whether the pin was reserved.
    pub fn release_generator(&mut self, pin: Pin) -> bool {
        let Ok(mask) = Self::pin_mask(pin) else {
            return false;
        };
        let reserved = self.generators & mask != 0;
        self.generators &= !mask;
        reserved
    }

    pub fn is_generator_reserved(&self, pin: Pin) -> bool {
        Self::pin_mask(pin).is_ok_and(|mask| self.generators & mask != 0)
    }

    /// Get the group assigned to a sync pin, or claim a free one
    pub fn assign_group(&mut self, sync_pin: Pin) -> Result<GroupId, AllocError> {
        if let Some(group) = self.group_of(sync_pin) {
            return Ok(group);
        }
        let group = self.free_group().ok_or(AllocError::NoGroupAvailable)?;
        self.groups[usize::from(group)] = Some(sync_pin);
        Ok(group)
    }

    /// Group currently tied to a sync pin
    #[allow(clippy::cast_possible_truncation)]
    pub fn group_of(&self, sync_pin: Pin) -> Option<GroupId> {
        self.groups
            .iter()
            .position(|slot| *slot == Some(sync_pin))
            .map(|index| index as GroupId)
    }

    /// Number of groups without a sync pin
    pub fn free_groups(&self) -> usize {
        self.groups.iter().filter(|slot| slot.is_none()).count()
    }

    /// Reserve a generator pin and a group for its sync pin
    ///
    /// Both reservations are checked before either is made, so a failed
    /// claim leaves the registries untouched.
    pub fn claim(&mut self, generator_pin: Pin, sync_pin: Pin) -> Result<GroupId, AllocError> {
        let mask = Self::pin_mask(generator_pin)?;
        if self.generators & mask != 0 {
            return Err(AllocError::PinInUse(generator_pin));
        }
        if self.group_of(sync_pin).is_none() && self.free_group().is_none() {
            return Err(AllocError::NoGroupAvailable);
        }
        let group = self.assign_group(sync_pin)?;
        self.generators |= mask;
        Ok(group)
    }

    #[allow(clippy::cast_possible_truncation)]
    fn free_group(&self) -> Option<GroupId> {
        self.groups
            .iter()
            .position(Option::is_none)
            .map(|index| index as GroupId)
    }

    fn pin_mask(pin: Pin) -> Result<u64, AllocError> {
        if pin >= MAX_PINS {
            return Err(AllocError::InvalidPin(pin));
        }
        Ok(1u64 << pin)
    }
}

impl<const GROUPS: usize> Default for ResourceAllocator<GROUPS> {
    fn default() -> Self {
        Self::new()
    }
}

/// A [`ResourceAllocator`] behind a critical section
///
/// Suitable for a `static` shared by control tasks and interrupt handlers.
pub struct SharedAllocator<const GROUPS: usize = DEFAULT_GROUPS> {
    inner: Mutex<RefCell<ResourceAllocator<GROUPS>>>,
}

impl<const GROUPS: usize> SharedAllocator<GROUPS> {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(ResourceAllocator::new())),
        }
    }

    /// Run `f` with exclusive access to the allocator
    pub fn lock<R>(&self, f: impl FnOnce(&mut ResourceAllocator<GROUPS>) -> R) -> R {
        critical_section::with(|cs| f(&mut self.inner.borrow(cs).borrow_mut()))
    }
}

impl<const GROUPS: usize> Default for SharedAllocator<GROUPS> {
    fn default() -> Self {
        Self::new()
    }
}
