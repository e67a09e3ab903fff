use super::*;

struct TestBus {
    mem: Vec<u8>,
}

impl TestBus {
    fn new() -> Self {
        Self {
            mem: vec![0; 0x10000],
        }
    }

    fn load(&mut self, addr: u16, bytes: &[u8]) {
        let start = addr as usize;
        self.mem[start..start + bytes.len()].copy_from_slice(bytes);
    }
}

impl Bus for TestBus {
    fn read8(&mut self, addr: u16) -> u8 {
        self.mem[addr as usize]
    }

    fn write8(&mut self, addr: u16, value: u8) {
        self.mem[addr as usize] = value;
    }
}

fn setup(program: &[u8]) -> (Cpu, TestBus) {
    let mut bus = TestBus::new();
    bus.load(0x0100, program);
    let mut cpu = Cpu::new();
    cpu.regs.pc = 0x0100;
    cpu.regs.sp = 0xFFFE;
    (cpu, bus)
}

/// Run one immediate-operand ALU opcode and return A and the flags.
fn alu(opcode: u8, a: u8, operand: u8, carry: bool) -> (u8, Flags) {
    let (mut cpu, mut bus) = setup(&[opcode, operand]);
    cpu.regs.a = a;
    cpu.regs.set_flag(Flags::C, carry);
    assert_eq!(cpu.step(&mut bus), 8);
    (cpu.regs.a, cpu.regs.f)
}

#[test]
fn load_increment_halt() {
    let (mut cpu, mut bus) = setup(&[0x3E, 0x05, 0x3C, 0x76]);
    assert_eq!(cpu.step(&mut bus), 8);
    assert_eq!(cpu.step(&mut bus), 4);
    assert_eq!(cpu.step(&mut bus), 4);

    assert!(cpu.halted);
    assert_eq!(cpu.regs.a, 6);
    assert!(!cpu.regs.flag(Flags::Z));

    let pc = cpu.regs.pc;
    assert_eq!(cpu.step(&mut bus), HALT_TICKS);
    assert_eq!(cpu.regs.pc, pc);
}

#[test]
fn add_and_adc_flags() {
    assert_eq!(alu(0xC6, 0xFF, 0x01, false), (0x00, Flags::Z | Flags::H | Flags::C));
    assert_eq!(alu(0xC6, 0x0F, 0x01, false), (0x10, Flags::H));
    assert_eq!(alu(0xC6, 0x00, 0x00, false), (0x00, Flags::Z));
    assert_eq!(alu(0xC6, 0x80, 0x80, false), (0x00, Flags::Z | Flags::C));
    assert_eq!(alu(0xCE, 0x0E, 0x01, true), (0x10, Flags::H));
    assert_eq!(alu(0xCE, 0xFE, 0x01, true), (0x00, Flags::Z | Flags::H | Flags::C));
    // ADD ignores an incoming carry.
    assert_eq!(alu(0xC6, 0x01, 0x01, true), (0x02, Flags::empty()));
}

#[test]
fn sub_sbc_and_cp_flags() {
    assert_eq!(alu(0xD6, 0x00, 0x01, false), (0xFF, Flags::N | Flags::H | Flags::C));
    assert_eq!(alu(0xD6, 0x10, 0x01, false), (0x0F, Flags::N | Flags::H));
    assert_eq!(alu(0xD6, 0x3E, 0x3E, false), (0x00, Flags::Z | Flags::N));
    assert_eq!(alu(0xDE, 0x00, 0x00, true), (0xFF, Flags::N | Flags::H | Flags::C));
    assert_eq!(alu(0xDE, 0x10, 0x0F, true), (0x00, Flags::Z | Flags::N | Flags::H));

    assert_eq!(alu(0xFE, 0x42, 0x42, false), (0x42, Flags::Z | Flags::N));
    assert_eq!(alu(0xFE, 0x00, 0xFF, false), (0x00, Flags::N | Flags::H | Flags::C));
}

#[test]
fn logic_op_flags() {
    assert_eq!(alu(0xE6, 0xF0, 0x0F, true), (0x00, Flags::Z | Flags::H));
    assert_eq!(alu(0xE6, 0xFF, 0x81, false), (0x81, Flags::H));
    assert_eq!(alu(0xEE, 0xFF, 0xFF, true), (0x00, Flags::Z));
    assert_eq!(alu(0xF6, 0x00, 0x00, true), (0x00, Flags::Z));
    assert_eq!(alu(0xF6, 0x10, 0x01, false), (0x11, Flags::empty()));
}

#[test]
fn alu_register_forms_match_immediate_forms() {
    // ADD A,B / SUB (HL) / CP A
    let (mut cpu, mut bus) = setup(&[0x80, 0x96, 0xBF]);
    cpu.regs.a = 0x3A;
    cpu.regs.b = 0xC6;
    cpu.regs.set_hl(0xC000);
    bus.mem[0xC000] = 0x01;

    assert_eq!(cpu.step(&mut bus), 4);
    assert_eq!(cpu.regs.a, 0x00);
    assert_eq!(cpu.regs.f, Flags::Z | Flags::H | Flags::C);

    assert_eq!(cpu.step(&mut bus), 8);
    assert_eq!(cpu.regs.a, 0xFF);
    assert_eq!(cpu.regs.f, Flags::N | Flags::H | Flags::C);

    assert_eq!(cpu.step(&mut bus), 4);
    assert_eq!(cpu.regs.f, Flags::Z | Flags::N);
}

#[test]
fn inc_dec_preserve_carry() {
    // INC B, DEC C, INC (HL), DEC (HL)
    let (mut cpu, mut bus) = setup(&[0x04, 0x0D, 0x34, 0x35]);
    cpu.regs.b = 0xFF;
    cpu.regs.c = 0x10;
    cpu.regs.set_hl(0xC000);
    bus.mem[0xC000] = 0x0F;
    cpu.regs.set_flag(Flags::C, true);

    assert_eq!(cpu.step(&mut bus), 4);
    assert_eq!(cpu.regs.b, 0x00);
    assert_eq!(cpu.regs.f, Flags::Z | Flags::H | Flags::C);

    assert_eq!(cpu.step(&mut bus), 4);
    assert_eq!(cpu.regs.c, 0x0F);
    assert_eq!(cpu.regs.f, Flags::N | Flags::H | Flags::C);

    assert_eq!(cpu.step(&mut bus), 12);
    assert_eq!(bus.mem[0xC000], 0x10);
    assert_eq!(cpu.regs.f, Flags::H | Flags::C);

    assert_eq!(cpu.step(&mut bus), 12);
    assert_eq!(bus.mem[0xC000], 0x0F);
    assert_eq!(cpu.regs.f, Flags::N | Flags::H | Flags::C);
}

#[test]
fn daa_after_add_and_sub() {
    let (mut cpu, mut bus) = setup(&[0xC6, 0x27, 0x27]);
    cpu.regs.a = 0x15;
    cpu.step(&mut bus);
    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 0x42);
    assert_eq!(cpu.regs.f, Flags::empty());

    let (mut cpu, mut bus) = setup(&[0xC6, 0x01, 0x27]);
    cpu.regs.a = 0x99;
    cpu.step(&mut bus);
    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 0x00);
    assert_eq!(cpu.regs.f, Flags::Z | Flags::C);

    let (mut cpu, mut bus) = setup(&[0xD6, 0x15, 0x27]);
    cpu.regs.a = 0x42;
    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 0x2D);
    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 0x27);
    assert_eq!(cpu.regs.f, Flags::N);
}

#[test]
fn sp_offset_flags_come_from_low_byte() {
    // ADD SP,+1
    let (mut cpu, mut bus) = setup(&[0xE8, 0x01]);
    cpu.regs.sp = 0x00FF;
    cpu.regs.f = Flags::Z | Flags::N;
    assert_eq!(cpu.step(&mut bus), 16);
    assert_eq!(cpu.regs.sp, 0x0100);
    assert_eq!(cpu.regs.f, Flags::H | Flags::C);

    // ADD SP,-1 from zero: no carries out of the low byte.
    let (mut cpu, mut bus) = setup(&[0xE8, 0xFF]);
    cpu.regs.sp = 0x0000;
    cpu.step(&mut bus);
    assert_eq!(cpu.regs.sp, 0xFFFF);
    assert_eq!(cpu.regs.f, Flags::empty());

    // ADD SP,-1 from 0x0001 carries out of both nibble and byte.
    let (mut cpu, mut bus) = setup(&[0xE8, 0xFF]);
    cpu.regs.sp = 0x0001;
    cpu.step(&mut bus);
    assert_eq!(cpu.regs.sp, 0x0000);
    assert_eq!(cpu.regs.f, Flags::H | Flags::C);

    // LD HL,SP+2
    let (mut cpu, mut bus) = setup(&[0xF8, 0x02]);
    cpu.regs.sp = 0xFFF8;
    assert_eq!(cpu.step(&mut bus), 12);
    assert_eq!(cpu.regs.hl(), 0xFFFA);
    assert_eq!(cpu.regs.sp, 0xFFF8);
    assert_eq!(cpu.regs.f, Flags::empty());
}

#[test]
fn add_hl_keeps_zero_flag() {
    // ADD HL,BC
    let (mut cpu, mut bus) = setup(&[0x09, 0x09]);
    cpu.regs.set_hl(0x0FFF);
    cpu.regs.set_bc(0x0001);
    cpu.regs.f = Flags::Z | Flags::N;
    assert_eq!(cpu.step(&mut bus), 8);
    assert_eq!(cpu.regs.hl(), 0x1000);
    assert_eq!(cpu.regs.f, Flags::Z | Flags::H);

    cpu.regs.set_hl(0xF000);
    cpu.regs.set_bc(0x1000);
    cpu.step(&mut bus);
    assert_eq!(cpu.regs.hl(), 0x0000);
    assert_eq!(cpu.regs.f, Flags::Z | Flags::C);
}

#[test]
fn push_pop_round_trips_every_pair() {
    for (push, pop) in [(0xC5, 0xC1), (0xD5, 0xD1), (0xE5, 0xE1), (0xF5, 0xF1)] {
        let (mut cpu, mut bus) = setup(&[push, pop]);
        let value = 0x12F0;
        match push {
            0xC5 => cpu.regs.set_bc(value),
            0xD5 => cpu.regs.set_de(value),
            0xE5 => cpu.regs.set_hl(value),
            _ => cpu.regs.set_af(value),
        }

        assert_eq!(cpu.step(&mut bus), 16);
        assert_eq!(cpu.regs.sp, 0xFFFC);
        assert_eq!(bus.mem[0xFFFD], 0x12);
        assert_eq!(bus.mem[0xFFFC], 0xF0);

        cpu.regs.set_bc(0);
        cpu.regs.set_de(0);
        cpu.regs.set_hl(0);
        cpu.regs.set_af(0);

        assert_eq!(cpu.step(&mut bus), 12);
        assert_eq!(cpu.regs.sp, 0xFFFE);
        let popped = match pop {
            0xC1 => cpu.regs.bc(),
            0xD1 => cpu.regs.de(),
            0xE1 => cpu.regs.hl(),
            _ => cpu.regs.af(),
        };
        assert_eq!(popped, value, "opcode {pop:#04X}");
    }
}

#[test]
fn pop_af_masks_low_nibble() {
    let (mut cpu, mut bus) = setup(&[0xF1]);
    cpu.regs.sp = 0xC000;
    bus.load(0xC000, &[0xFF, 0x34]);
    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 0x34);
    assert_eq!(cpu.regs.f.bits(), 0xF0);
    assert_eq!(cpu.regs.af(), 0x34F0);
}

#[test]
fn ei_takes_effect_after_next_instruction() {
    let (mut cpu, mut bus) = setup(&[0xFB, 0x00, 0x00]);
    cpu.step(&mut bus);
    assert!(!cpu.take_ime_delay());
    assert!(cpu.ime_scheduled());

    cpu.step(&mut bus);
    assert!(cpu.take_ime_delay());
    assert!(!cpu.ime_scheduled());
}

#[test]
fn ei_then_di_never_enables() {
    let (mut cpu, mut bus) = setup(&[0xFB, 0xF3, 0x00, 0x00]);
    for _ in 0..4 {
        cpu.step(&mut bus);
        if cpu.take_ime_delay() {
            cpu.ime = true;
        }
        assert!(!cpu.ime);
    }
    assert!(!cpu.ime_scheduled());
}

#[test]
fn reti_returns_and_arms_ime() {
    let (mut cpu, mut bus) = setup(&[0xD9, 0x00]);
    cpu.regs.sp = 0xC000;
    bus.load(0xC000, &[0x00, 0x02]);
    bus.load(0x0200, &[0x00]);

    assert_eq!(cpu.step(&mut bus), 16);
    assert_eq!(cpu.regs.pc, 0x0200);
    assert!(!cpu.take_ime_delay());
    cpu.step(&mut bus);
    assert!(cpu.take_ime_delay());
}

#[test]
fn jr_timing() {
    let (mut cpu, mut bus) = setup(&[0x20, 0x02]);
    assert_eq!(cpu.step(&mut bus), 12);
    assert_eq!(cpu.regs.pc, 0x0104);

    let (mut cpu, mut bus) = setup(&[0x20, 0x02]);
    cpu.regs.set_flag(Flags::Z, true);
    assert_eq!(cpu.step(&mut bus), 8);
    assert_eq!(cpu.regs.pc, 0x0102);

    // JR -2 loops onto itself.
    let (mut cpu, mut bus) = setup(&[0x18, 0xFE]);
    assert_eq!(cpu.step(&mut bus), 12);
    assert_eq!(cpu.regs.pc, 0x0100);
}

#[test]
fn jp_and_call_timing() {
    let (mut cpu, mut bus) = setup(&[0xDA, 0x00, 0x20]);
    cpu.regs.set_flag(Flags::C, true);
    assert_eq!(cpu.step(&mut bus), 16);
    assert_eq!(cpu.regs.pc, 0x2000);

    let (mut cpu, mut bus) = setup(&[0xDA, 0x00, 0x20]);
    assert_eq!(cpu.step(&mut bus), 12);
    assert_eq!(cpu.regs.pc, 0x0103);

    let (mut cpu, mut bus) = setup(&[0xC4, 0x00, 0x20]);
    assert_eq!(cpu.step(&mut bus), 24);
    assert_eq!(cpu.regs.pc, 0x2000);
    assert_eq!(cpu.regs.sp, 0xFFFC);
    assert_eq!(&bus.mem[0xFFFC..0xFFFE], &[0x03, 0x01]);

    let (mut cpu, mut bus) = setup(&[0xC4, 0x00, 0x20]);
    cpu.regs.set_flag(Flags::Z, true);
    assert_eq!(cpu.step(&mut bus), 12);
    assert_eq!(cpu.regs.sp, 0xFFFE);

    let (mut cpu, mut bus) = setup(&[0xCD, 0x00, 0x20]);
    assert_eq!(cpu.step(&mut bus), 24);
    bus.load(0x2000, &[0xC9]);
    assert_eq!(cpu.step(&mut bus), 16);
    assert_eq!(cpu.regs.pc, 0x0103);

    let (mut cpu, mut bus) = setup(&[0xE9]);
    cpu.regs.set_hl(0x4321);
    assert_eq!(cpu.step(&mut bus), 4);
    assert_eq!(cpu.regs.pc, 0x4321);
}

#[test]
fn ret_cc_timing() {
    let (mut cpu, mut bus) = setup(&[0xC0]);
    cpu.regs.sp = 0xC000;
    bus.load(0xC000, &[0x00, 0x30]);
    assert_eq!(cpu.step(&mut bus), 20);
    assert_eq!(cpu.regs.pc, 0x3000);
    assert_eq!(cpu.regs.sp, 0xC002);

    let (mut cpu, mut bus) = setup(&[0xC0]);
    cpu.regs.set_flag(Flags::Z, true);
    assert_eq!(cpu.step(&mut bus), 8);
    assert_eq!(cpu.regs.pc, 0x0101);
}

#[test]
fn rst_pushes_and_jumps() {
    let (mut cpu, mut bus) = setup(&[0xEF]);
    assert_eq!(cpu.step(&mut bus), 16);
    assert_eq!(cpu.regs.pc, 0x0028);
    assert_eq!(&bus.mem[0xFFFC..0xFFFE], &[0x01, 0x01]);
    assert_eq!(cpu.take_fault(), None);
}

#[test]
fn rst_onto_itself_is_reported() {
    let (mut cpu, mut bus) = setup(&[]);
    bus.mem[0x0038] = 0xFF;
    cpu.regs.pc = 0x0038;
    cpu.step(&mut bus);
    assert_eq!(cpu.regs.pc, 0x0038);
    assert_eq!(cpu.take_fault(), Some(CpuFault::RstLoop { vector: 0x0038 }));
    assert_eq!(cpu.take_fault(), None);
}

#[test]
fn cb_timing() {
    // RLC B, RLC (HL), BIT 0,(HL), SET 0,(HL), RES 0,B
    let (mut cpu, mut bus) = setup(&[0xCB, 0x00, 0xCB, 0x06, 0xCB, 0x46, 0xCB, 0xC6, 0xCB, 0x80]);
    cpu.regs.set_hl(0xC000);
    cpu.regs.b = 0x81;
    bus.mem[0xC000] = 0x80;

    assert_eq!(cpu.step(&mut bus), 8);
    assert_eq!(cpu.regs.b, 0x03);
    assert!(cpu.regs.flag(Flags::C));

    assert_eq!(cpu.step(&mut bus), 16);
    assert_eq!(bus.mem[0xC000], 0x01);

    assert_eq!(cpu.step(&mut bus), 12);
    assert!(!cpu.regs.flag(Flags::Z));

    assert_eq!(cpu.step(&mut bus), 16);
    assert_eq!(bus.mem[0xC000], 0x01);

    assert_eq!(cpu.step(&mut bus), 8);
    assert_eq!(cpu.regs.b, 0x02);
}

#[test]
fn bit_sets_zero_from_complement_and_keeps_carry() {
    // BIT 7,A ; BIT 0,A
    let (mut cpu, mut bus) = setup(&[0xCB, 0x7F, 0xCB, 0x47]);
    cpu.regs.a = 0x80;
    cpu.regs.f = Flags::N | Flags::C;

    cpu.step(&mut bus);
    assert_eq!(cpu.regs.f, Flags::H | Flags::C);
    cpu.step(&mut bus);
    assert_eq!(cpu.regs.f, Flags::Z | Flags::H | Flags::C);
    assert_eq!(cpu.regs.a, 0x80);
}

#[test]
fn cb_shifts_and_swap() {
    // SRA A, SRL A, SWAP A, RR A, SLA A
    let (mut cpu, mut bus) = setup(&[0xCB, 0x2F, 0xCB, 0x3F, 0xCB, 0x37, 0xCB, 0x1F, 0xCB, 0x27]);
    cpu.regs.a = 0x81;

    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 0xC0);
    assert_eq!(cpu.regs.f, Flags::C);

    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 0x60);
    assert_eq!(cpu.regs.f, Flags::empty());

    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 0x06);

    cpu.regs.set_flag(Flags::C, true);
    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 0x83);
    assert_eq!(cpu.regs.f, Flags::empty());

    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 0x06);
    assert_eq!(cpu.regs.f, Flags::C);
}

#[test]
fn cb_table_is_a_cross_product() {
    assert_eq!(CB_TABLE[0x37].kind, CbKind::Swap);
    assert_eq!(CB_TABLE[0x37].operand, Operand::A);
    assert_eq!(CB_TABLE[0x7E].kind, CbKind::Bit(7));
    assert_eq!(CB_TABLE[0x7E].operand, Operand::HlIndirect);
    assert_eq!(CB_TABLE[0x91].kind, CbKind::Res(2));
    assert_eq!(CB_TABLE[0x91].operand, Operand::C);
    assert_eq!(CB_TABLE[0xFD].kind, CbKind::Set(7));
    assert_eq!(CB_TABLE[0xFD].operand, Operand::L);

    let mut names: Vec<String> = CB_TABLE.iter().map(ToString::to_string).collect();
    names.sort();
    names.dedup();
    assert_eq!(names.len(), 256);
}

#[test]
fn rotate_a_always_clears_zero() {
    // RLA with A=0x80 and no carry produces 0 but Z stays clear.
    let (mut cpu, mut bus) = setup(&[0x17, 0x07]);
    cpu.regs.a = 0x80;
    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 0x00);
    assert_eq!(cpu.regs.f, Flags::C);

    cpu.regs.a = 0x80;
    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 0x01);
    assert_eq!(cpu.regs.f, Flags::C);
}

#[test]
fn indirect_loads_step_hl() {
    // LD (HL+),A ; LD A,(HL-) ; LD (BC),A
    let (mut cpu, mut bus) = setup(&[0x22, 0x3A, 0x02]);
    cpu.regs.set_hl(0xC000);
    cpu.regs.set_bc(0xC100);
    cpu.regs.a = 0x5A;
    bus.mem[0xC001] = 0x77;

    assert_eq!(cpu.step(&mut bus), 8);
    assert_eq!(bus.mem[0xC000], 0x5A);
    assert_eq!(cpu.regs.hl(), 0xC001);

    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 0x77);
    assert_eq!(cpu.regs.hl(), 0xC000);

    cpu.step(&mut bus);
    assert_eq!(bus.mem[0xC100], 0x77);
}

#[test]
fn store_sp_is_little_endian() {
    let (mut cpu, mut bus) = setup(&[0x08, 0x00, 0xC0]);
    cpu.regs.sp = 0xBEEF;
    assert_eq!(cpu.step(&mut bus), 20);
    assert_eq!(&bus.mem[0xC000..0xC002], &[0xEF, 0xBE]);
}

#[test]
fn high_page_loads() {
    // LDH (0x80),A ; LD A,(C) ; LD (0xC000),A
    let (mut cpu, mut bus) = setup(&[0xE0, 0x80, 0xF2, 0xEA, 0x00, 0xC0]);
    cpu.regs.a = 0x11;
    cpu.regs.c = 0x81;
    bus.mem[0xFF81] = 0x22;

    assert_eq!(cpu.step(&mut bus), 12);
    assert_eq!(bus.mem[0xFF80], 0x11);
    assert_eq!(cpu.step(&mut bus), 8);
    assert_eq!(cpu.regs.a, 0x22);
    assert_eq!(cpu.step(&mut bus), 16);
    assert_eq!(bus.mem[0xC000], 0x22);
}

#[test]
fn illegal_opcode_is_a_reported_nop() {
    let (mut cpu, mut bus) = setup(&[0xD3, 0x00]);
    assert_eq!(cpu.step(&mut bus), 4);
    assert_eq!(cpu.regs.pc, 0x0101);
    assert!(!cpu.halted);
    assert_eq!(
        cpu.take_fault(),
        Some(CpuFault::IllegalOpcode {
            opcode: 0xD3,
            pc: 0x0100
        })
    );
    cpu.step(&mut bus);
    assert_eq!(cpu.take_fault(), None);
}

#[test]
fn every_illegal_opcode_is_flagged() {
    let illegal: Vec<u8> = (0..=255u8).filter(|&op| is_illegal(op)).collect();
    assert_eq!(illegal.len(), 11);
    for opcode in illegal {
        assert!(OPCODES[opcode as usize].mnemonic.starts_with("ILLEGAL"));
        assert_eq!(OPCODES[opcode as usize].ticks, 4);
    }
}

#[test]
fn stop_consumes_padding_byte() {
    let (mut cpu, mut bus) = setup(&[0x10, 0x00, 0x3C]);
    assert_eq!(cpu.step(&mut bus), 4);
    assert_eq!(cpu.regs.pc, 0x0102);
    assert!(cpu.halted);
    assert_eq!(cpu.step(&mut bus), HALT_TICKS);
    assert_eq!(cpu.regs.a, 0);
}

#[test]
fn call_vector_pushes_pc() {
    let (mut cpu, mut bus) = setup(&[]);
    cpu.regs.pc = 0x1234;
    cpu.call_vector(&mut bus, 0x0040);
    assert_eq!(cpu.regs.pc, 0x0040);
    assert_eq!(cpu.regs.sp, 0xFFFC);
    assert_eq!(&bus.mem[0xFFFC..0xFFFE], &[0x34, 0x12]);
}

#[test]
fn post_boot_registers() {
    let cpu = Cpu::post_boot();
    assert_eq!(cpu.regs.af(), 0x01B0);
    assert_eq!(cpu.regs.bc(), 0x0013);
    assert_eq!(cpu.regs.de(), 0x00D8);
    assert_eq!(cpu.regs.hl(), 0x014D);
    assert_eq!(cpu.regs.sp, 0xFFFE);
    assert_eq!(cpu.regs.pc, 0x0100);
    assert!(!cpu.ime);
}

#[test]
fn disassembles_operands() {
    let mut bus = TestBus::new();
    bus.load(0x0100, &[0x3E, 0x05, 0xC3, 0x50, 0x01, 0x18, 0xFE, 0xCB, 0x7C, 0xE8, 0xFE]);

    assert_eq!(disassemble(&mut bus, 0x0100), ("LD A,$05".to_string(), 2));
    assert_eq!(disassemble(&mut bus, 0x0102), ("JP $0150".to_string(), 3));
    assert_eq!(disassemble(&mut bus, 0x0105), ("JR $0105".to_string(), 2));
    assert_eq!(disassemble(&mut bus, 0x0107), ("BIT 7,H".to_string(), 2));
    assert_eq!(disassemble(&mut bus, 0x0109), ("ADD SP,-2".to_string(), 2));
    assert_eq!(OPCODES[0x86].mnemonic, "ADD A,(HL)");
    assert_eq!(OPCODES[0x96].mnemonic, "SUB (HL)");
    assert_eq!(OPCODES[0xFF].mnemonic, "RST 38H");
}
