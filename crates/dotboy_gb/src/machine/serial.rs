use super::bus::{out_of_range, AddressSpace};

pub const SB_ADDR: u16 = 0xFF01;
pub const SC_ADDR: u16 = 0xFF02;
/// Sent bytes kept for the host. Reaching it drops the older half.
pub const OUTPUT_LIMIT: usize = 64 * 1024;

/// Serial port without a link partner.
///
/// Starting a transfer with the internal clock (SC = 0x81) completes it at
/// once: the outgoing byte is appended to `output`, SB reads back 0xFF as if
/// nothing were connected, and the Serial interrupt is raised.
#[derive(Clone, Debug, Default)]
pub struct Serial {
    sb: u8,
    sc: u8,
    output: Vec<u8>,
    interrupt_pending: bool,
}

impl Serial {
    /// Bytes sent since the last `take_output`, at most `OUTPUT_LIMIT`.
    pub fn output(&self) -> &[u8] {
        &self.output
    }

    /// Drain the captured bytes.
    pub fn take_output(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.output)
    }

    fn capture(&mut self, byte: u8) {
        if self.output.len() >= OUTPUT_LIMIT {
            self.output.drain(..OUTPUT_LIMIT / 2);
        }
        self.output.push(byte);
    }

    pub fn take_interrupt(&mut self) -> bool {
        std::mem::take(&mut self.interrupt_pending)
    }
}

impl AddressSpace for Serial {
    fn contains(&self, addr: u16) -> bool {
        addr == SB_ADDR || addr == SC_ADDR
    }

    fn read(&self, addr: u16) -> u8 {
        match addr {
            SB_ADDR => self.sb,
            SC_ADDR => self.sc | 0x7E,
            _ => out_of_range("serial", addr),
        }
    }

    fn write(&mut self, addr: u16, value: u8) {
        match addr {
            SB_ADDR => self.sb = value,
            SC_ADDR => {
                self.sc = value;
                if value & 0x81 == 0x81 {
                    log::debug!("serial: sent {:#04X}", self.sb);
                    self.capture(self.sb);
                    self.sb = 0xFF;
                    self.sc &= !0x80;
                    self.interrupt_pending = true;
                }
            }
            _ => {
                out_of_range("serial", addr);
            }
        }
    }
}
