use crate::cpu::{Bus, Cpu};

impl Cpu {
    /// LD rr,d16
    pub(in crate::cpu) fn exec_ld_rr_d16(&mut self, bus: &mut dyn Bus, opcode: u8) -> u32 {
        let value = self.fetch16(bus);
        self.write_rr(opcode >> 4, value);
        0
    }

    /// LD r,d8 and LD (HL),d8
    pub(in crate::cpu) fn exec_ld_r_d8(&mut self, bus: &mut dyn Bus, opcode: u8) -> u32 {
        let value = self.fetch8(bus);
        self.write_r8(bus, opcode >> 3, value);
        0
    }

    /// LD r,r' for 0x40-0x7F, except HALT.
    pub(in crate::cpu) fn exec_ld_r_r(&mut self, bus: &mut dyn Bus, opcode: u8) -> u32 {
        let value = self.read_r8(bus, opcode);
        self.write_r8(bus, opcode >> 3, value);
        0
    }

    /// Address for the (BC), (DE), (HL+), (HL-) column, applying the HL
    /// post-increment or post-decrement.
    fn indirect_addr(&mut self, opcode: u8) -> u16 {
        match (opcode >> 4) & 0x03 {
            0 => self.regs.bc(),
            1 => self.regs.de(),
            2 => {
                let hl = self.regs.hl();
                self.regs.set_hl(hl.wrapping_add(1));
                hl
            }
            _ => {
                let hl = self.regs.hl();
                self.regs.set_hl(hl.wrapping_sub(1));
                hl
            }
        }
    }

    /// LD (BC),A / LD (DE),A / LD (HL+),A / LD (HL-),A
    pub(in crate::cpu) fn exec_ld_ind_a(&mut self, bus: &mut dyn Bus, opcode: u8) -> u32 {
        let addr = self.indirect_addr(opcode);
        bus.write8(addr, self.regs.a);
        0
    }

    /// LD A,(BC) / LD A,(DE) / LD A,(HL+) / LD A,(HL-)
    pub(in crate::cpu) fn exec_ld_a_ind(&mut self, bus: &mut dyn Bus, opcode: u8) -> u32 {
        let addr = self.indirect_addr(opcode);
        self.regs.a = bus.read8(addr);
        0
    }

    /// LD (a16),SP
    pub(in crate::cpu) fn exec_ld_a16_sp(&mut self, bus: &mut dyn Bus, _opcode: u8) -> u32 {
        let addr = self.fetch16(bus);
        let [lo, hi] = self.regs.sp.to_le_bytes();
        bus.write8(addr, lo);
        bus.write8(addr.wrapping_add(1), hi);
        0
    }

    /// LDH (a8),A / LDH A,(a8)
    pub(in crate::cpu) fn exec_ldh_a8(&mut self, bus: &mut dyn Bus, opcode: u8) -> u32 {
        let addr = 0xFF00 | self.fetch8(bus) as u16;
        self.transfer_a(bus, addr, opcode & 0x10 != 0);
        0
    }

    /// LD (C),A / LD A,(C)
    pub(in crate::cpu) fn exec_ldh_c(&mut self, bus: &mut dyn Bus, opcode: u8) -> u32 {
        let addr = 0xFF00 | self.regs.c as u16;
        self.transfer_a(bus, addr, opcode & 0x10 != 0);
        0
    }

    /// LD (a16),A / LD A,(a16)
    pub(in crate::cpu) fn exec_ld_a16_a(&mut self, bus: &mut dyn Bus, opcode: u8) -> u32 {
        let addr = self.fetch16(bus);
        self.transfer_a(bus, addr, opcode & 0x10 != 0);
        0
    }

    fn transfer_a(&mut self, bus: &mut dyn Bus, addr: u16, load: bool) {
        if load {
            self.regs.a = bus.read8(addr);
        } else {
            bus.write8(addr, self.regs.a);
        }
    }

    /// LD HL,SP+e8
    pub(in crate::cpu) fn exec_ld_hl_sp_e8(&mut self, bus: &mut dyn Bus, _opcode: u8) -> u32 {
        let offset = self.fetch8(bus);
        let value = self.alu_add_sp_offset(self.regs.sp, offset);
        self.regs.set_hl(value);
        0
    }

    /// LD SP,HL
    pub(in crate::cpu) fn exec_ld_sp_hl(&mut self, _bus: &mut dyn Bus, _opcode: u8) -> u32 {
        self.regs.sp = self.regs.hl();
        0
    }
}
