use super::{Bus, Cpu, Flags};
use crate::bits;

impl Cpu {
    /// Read an 8-bit operand by its 3-bit opcode encoding:
    /// 0=B, 1=C, 2=D, 3=E, 4=H, 5=L, 6=(HL), 7=A.
    #[inline]
    pub(super) fn read_r8(&mut self, bus: &mut dyn Bus, index: u8) -> u8 {
        match index & 0x07 {
            0 => self.regs.b,
            1 => self.regs.c,
            2 => self.regs.d,
            3 => self.regs.e,
            4 => self.regs.h,
            5 => self.regs.l,
            6 => bus.read8(self.regs.hl()),
            _ => self.regs.a,
        }
    }

    /// Write an 8-bit operand; same encoding as [`Cpu::read_r8`].
    #[inline]
    pub(super) fn write_r8(&mut self, bus: &mut dyn Bus, index: u8, value: u8) {
        match index & 0x07 {
            0 => self.regs.b = value,
            1 => self.regs.c = value,
            2 => self.regs.d = value,
            3 => self.regs.e = value,
            4 => self.regs.h = value,
            5 => self.regs.l = value,
            6 => bus.write8(self.regs.hl(), value),
            _ => self.regs.a = value,
        }
    }

    /// 16-bit pair for the 0x01/0x03/0x09/0x0B columns: BC, DE, HL, SP.
    #[inline]
    pub(super) fn read_rr(&self, index: u8) -> u16 {
        match index & 0x03 {
            0 => self.regs.bc(),
            1 => self.regs.de(),
            2 => self.regs.hl(),
            _ => self.regs.sp,
        }
    }

    #[inline]
    pub(super) fn write_rr(&mut self, index: u8, value: u16) {
        match index & 0x03 {
            0 => self.regs.set_bc(value),
            1 => self.regs.set_de(value),
            2 => self.regs.set_hl(value),
            _ => self.regs.sp = value,
        }
    }

    /// Branch condition from opcode bits 3-4: NZ, Z, NC, C.
    #[inline]
    pub(super) fn condition(&self, opcode: u8) -> bool {
        match (opcode >> 3) & 0x03 {
            0 => !self.regs.flag(Flags::Z),
            1 => self.regs.flag(Flags::Z),
            2 => !self.regs.flag(Flags::C),
            _ => self.regs.flag(Flags::C),
        }
    }

    #[inline]
    pub(super) fn fetch8(&mut self, bus: &mut dyn Bus) -> u8 {
        let value = bus.read8(self.regs.pc);
        self.regs.pc = self.regs.pc.wrapping_add(1);
        value
    }

    /// Little-endian immediate: low byte first.
    #[inline]
    pub(super) fn fetch16(&mut self, bus: &mut dyn Bus) -> u16 {
        let lo = self.fetch8(bus);
        let hi = self.fetch8(bus);
        bits::join(hi, lo)
    }

    #[inline]
    pub(super) fn push16(&mut self, bus: &mut dyn Bus, value: u16) {
        self.regs.sp = self.regs.sp.wrapping_sub(1);
        bus.write8(self.regs.sp, bits::hi(value));
        self.regs.sp = self.regs.sp.wrapping_sub(1);
        bus.write8(self.regs.sp, bits::lo(value));
    }

    #[inline]
    pub(super) fn pop16(&mut self, bus: &mut dyn Bus) -> u16 {
        let lo = bus.read8(self.regs.sp);
        self.regs.sp = self.regs.sp.wrapping_add(1);
        let hi = bus.read8(self.regs.sp);
        self.regs.sp = self.regs.sp.wrapping_add(1);
        bits::join(hi, lo)
    }

    // The three control-flow primitives every JR/JP/CALL/RET/RST form uses.

    #[inline]
    pub(super) fn jump(&mut self, target: u16) {
        self.regs.pc = target;
    }

    #[inline]
    pub(super) fn call(&mut self, bus: &mut dyn Bus, target: u16) {
        let ret = self.regs.pc;
        self.push16(bus, ret);
        self.jump(target);
    }

    #[inline]
    pub(super) fn ret(&mut self, bus: &mut dyn Bus) {
        let target = self.pop16(bus);
        self.jump(target);
    }
}
