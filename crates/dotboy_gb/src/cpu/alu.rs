use super::{Cpu, Flags};
use crate::bits;

impl Cpu {
    /// ADD/ADC into A. `with_carry` selects ADC.
    pub(super) fn alu_add(&mut self, value: u8, with_carry: bool) {
        let a = self.regs.a;
        let carry = (with_carry && self.regs.flag(Flags::C)) as u8;

        let wide = a as u16 + value as u16 + carry as u16;
        let result = wide as u8;

        self.regs.a = result;
        self.regs.set_flags(
            result == 0,
            false,
            bits::half_carry_add(a, value, carry),
            wide > 0xFF,
        );
    }

    /// SUB/SBC from A. `with_carry` selects SBC.
    pub(super) fn alu_sub(&mut self, value: u8, with_carry: bool) {
        self.regs.a = self.subtract(value, with_carry);
    }

    /// CP: flags of `A - value`, A untouched.
    pub(super) fn alu_cp(&mut self, value: u8) {
        self.subtract(value, false);
    }

    fn subtract(&mut self, value: u8, with_carry: bool) -> u8 {
        let a = self.regs.a;
        let carry = (with_carry && self.regs.flag(Flags::C)) as u8;

        let wide = a as i16 - value as i16 - carry as i16;
        let result = wide as u8;

        self.regs.set_flags(
            result == 0,
            true,
            bits::half_borrow_sub(a, value, carry),
            wide < 0,
        );
        result
    }

    pub(super) fn alu_and(&mut self, value: u8) {
        self.regs.a &= value;
        self.regs.set_flags(self.regs.a == 0, false, true, false);
    }

    pub(super) fn alu_or(&mut self, value: u8) {
        self.regs.a |= value;
        self.regs.set_flags(self.regs.a == 0, false, false, false);
    }

    pub(super) fn alu_xor(&mut self, value: u8) {
        self.regs.a ^= value;
        self.regs.set_flags(self.regs.a == 0, false, false, false);
    }

    /// Dispatch on the 3-bit operation field shared by 0x80-0xBF and the
    /// immediate forms at 0xC6-0xFE.
    pub(super) fn alu_op(&mut self, op: u8, value: u8) {
        match op & 0x07 {
            0 => self.alu_add(value, false),
            1 => self.alu_add(value, true),
            2 => self.alu_sub(value, false),
            3 => self.alu_sub(value, true),
            4 => self.alu_and(value),
            5 => self.alu_xor(value),
            6 => self.alu_or(value),
            _ => self.alu_cp(value),
        }
    }

    /// Decimal-adjust A after a BCD add or subtract. N is preserved.
    pub(super) fn alu_daa(&mut self) {
        let mut a = self.regs.a;
        let subtract = self.regs.flag(Flags::N);
        let mut correction = 0u8;
        let mut carry = self.regs.flag(Flags::C);

        if self.regs.flag(Flags::H) || (!subtract && a & 0x0F > 0x09) {
            correction |= 0x06;
        }
        if carry || (!subtract && a > 0x99) {
            correction |= 0x60;
            carry = true;
        }

        a = if subtract {
            a.wrapping_sub(correction)
        } else {
            a.wrapping_add(correction)
        };

        self.regs.a = a;
        self.regs.set_flags(a == 0, subtract, false, carry);
    }

    /// INC r / INC (HL). C is preserved.
    pub(super) fn alu_inc8(&mut self, value: u8) -> u8 {
        let result = value.wrapping_add(1);
        self.regs.set_flag(Flags::Z, result == 0);
        self.regs.set_flag(Flags::N, false);
        self.regs.set_flag(Flags::H, value & 0x0F == 0x0F);
        result
    }

    /// DEC r / DEC (HL). C is preserved.
    pub(super) fn alu_dec8(&mut self, value: u8) -> u8 {
        let result = value.wrapping_sub(1);
        self.regs.set_flag(Flags::Z, result == 0);
        self.regs.set_flag(Flags::N, true);
        self.regs.set_flag(Flags::H, value & 0x0F == 0);
        result
    }

    /// ADD HL,rr. Z is preserved; H and C come from bits 11 and 15.
    pub(super) fn alu_add_hl(&mut self, value: u16) {
        let hl = self.regs.hl();
        self.regs.set_flag(Flags::N, false);
        self.regs
            .set_flag(Flags::H, bits::half_carry_add16(hl, value));
        self.regs
            .set_flag(Flags::C, hl as u32 + value as u32 > 0xFFFF);
        self.regs.set_hl(hl.wrapping_add(value));
    }

    /// `base + e8` for ADD SP,e8 and LD HL,SP+e8.
    ///
    /// Z and N are cleared. H and C are the carries out of bits 3 and 7 of
    /// the unsigned low-byte add, recovered by XOR.
    pub(super) fn alu_add_sp_offset(&mut self, base: u16, offset: u8) -> u16 {
        let offset = offset as i8 as i16 as u16;
        let result = base.wrapping_add(offset);
        let carries = base ^ offset ^ result;
        self.regs
            .set_flags(false, false, carries & 0x0010 != 0, carries & 0x0100 != 0);
        result
    }

    // Rotates and shifts shared by the unprefixed A forms and the CB table.

    pub(super) fn alu_rlc(&mut self, value: u8) -> u8 {
        let result = value.rotate_left(1);
        self.regs
            .set_flags(result == 0, false, false, value & 0x80 != 0);
        result
    }

    pub(super) fn alu_rrc(&mut self, value: u8) -> u8 {
        let result = value.rotate_right(1);
        self.regs
            .set_flags(result == 0, false, false, value & 0x01 != 0);
        result
    }

    pub(super) fn alu_rl(&mut self, value: u8) -> u8 {
        let result = (value << 1) | self.regs.flag(Flags::C) as u8;
        self.regs
            .set_flags(result == 0, false, false, value & 0x80 != 0);
        result
    }

    pub(super) fn alu_rr(&mut self, value: u8) -> u8 {
        let result = (value >> 1) | ((self.regs.flag(Flags::C) as u8) << 7);
        self.regs
            .set_flags(result == 0, false, false, value & 0x01 != 0);
        result
    }

    pub(super) fn alu_sla(&mut self, value: u8) -> u8 {
        let result = value << 1;
        self.regs
            .set_flags(result == 0, false, false, value & 0x80 != 0);
        result
    }

    pub(super) fn alu_sra(&mut self, value: u8) -> u8 {
        let result = (value >> 1) | (value & 0x80);
        self.regs
            .set_flags(result == 0, false, false, value & 0x01 != 0);
        result
    }

    pub(super) fn alu_srl(&mut self, value: u8) -> u8 {
        let result = value >> 1;
        self.regs
            .set_flags(result == 0, false, false, value & 0x01 != 0);
        result
    }

    pub(super) fn alu_swap(&mut self, value: u8) -> u8 {
        let result = value.rotate_left(4);
        self.regs.set_flags(result == 0, false, false, false);
        result
    }

    /// BIT b. Z is the complement of the tested bit; C is preserved.
    pub(super) fn alu_bit(&mut self, bit: u8, value: u8) {
        self.regs.set_flag(Flags::Z, !bits::test(value, bit));
        self.regs.set_flag(Flags::N, false);
        self.regs.set_flag(Flags::H, true);
    }
}
