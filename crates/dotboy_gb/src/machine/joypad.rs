use bitflags::bitflags;

use super::bus::{out_of_range, AddressSpace};

pub const JOYP_ADDR: u16 = 0xFF00;

bitflags! {
    /// Logical buttons, set = pressed.
    ///
    /// The low nibble is the d-pad group and the high nibble the action
    /// group, each in JOYP bit order.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Buttons: u8 {
        const RIGHT = 1 << 0;
        const LEFT = 1 << 1;
        const UP = 1 << 2;
        const DOWN = 1 << 3;
        const A = 1 << 4;
        const B = 1 << 5;
        const SELECT = 1 << 6;
        const START = 1 << 7;
    }
}

/// JOYP register.
#[derive(Clone, Debug)]
pub struct Joypad {
    select: u8,
    buttons: Buttons,
    interrupt_pending: bool,
}

impl Default for Joypad {
    fn default() -> Self {
        Self {
            select: 0x30,
            buttons: Buttons::empty(),
            interrupt_pending: false,
        }
    }
}

impl Joypad {
    pub fn buttons(&self) -> Buttons {
        self.buttons
    }

    /// Replace the pressed set. Any newly pressed button raises the
    /// Joypad interrupt.
    pub fn set_buttons(&mut self, buttons: Buttons) {
        let newly_pressed = buttons & !self.buttons;
        if !newly_pressed.is_empty() {
            log::trace!("joypad: pressed {newly_pressed:?}");
            self.interrupt_pending = true;
        }
        self.buttons = buttons;
    }

    pub fn take_interrupt(&mut self) -> bool {
        std::mem::take(&mut self.interrupt_pending)
    }
}

impl AddressSpace for Joypad {
    fn contains(&self, addr: u16) -> bool {
        addr == JOYP_ADDR
    }

    fn read(&self, addr: u16) -> u8 {
        if addr != JOYP_ADDR {
            return out_of_range("joypad", addr);
        }
        // Pressed reads as 0; a group is selected by a 0 in its select bit.
        let mut low = 0x0F;
        if self.select & 0x10 == 0 {
            low &= !self.buttons.bits() & 0x0F;
        }
        if self.select & 0x20 == 0 {
            low &= !(self.buttons.bits() >> 4) & 0x0F;
        }
        0xC0 | self.select | low
    }

    fn write(&mut self, addr: u16, value: u8) {
        if addr != JOYP_ADDR {
            out_of_range("joypad", addr);
            return;
        }
        self.select = value & 0x30;
    }
}
