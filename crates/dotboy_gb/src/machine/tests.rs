use super::boot_rom::BootRomError;
use super::bus::AddressSpace;
use super::cartridge::CartridgeError;
use super::interrupts::{Interrupt, InterruptController};
use super::test_rom::{image, with_program};
use super::timer::Timer;
use super::*;
use crate::cpu::{Bus, CpuFault, Flags};
use crate::{SCREEN_HEIGHT, SCREEN_WIDTH};

fn machine(program: &[u8]) -> GameBoy {
    GameBoy::from_rom(&with_program(program)).unwrap()
}

#[derive(Default)]
struct CountingSink {
    frames: usize,
    last_len: usize,
}

impl FrameSink for CountingSink {
    fn present(&mut self, frame: &[u8]) {
        self.frames += 1;
        self.last_len = frame.len();
    }
}

struct Held(Buttons);

impl InputSource for Held {
    fn buttons(&mut self) -> Buttons {
        self.0
    }
}

#[test]
fn program_runs_to_halt() {
    // LD A,5; INC A; HALT
    let mut gb = machine(&[0x3E, 0x05, 0x3C, 0x76]);

    assert_eq!(gb.step(), 8);
    assert_eq!(gb.step(), 4);
    assert_eq!(gb.step(), 4);

    let regs = &gb.cpu().regs;
    assert_eq!(regs.a, 6);
    assert!(!regs.flag(Flags::Z));
    assert!(!regs.flag(Flags::N));
    assert!(gb.cpu().halted);
    assert_eq!(regs.pc, 0x0104);

    // Nothing enabled in IE, so HALT just idles.
    assert_eq!(gb.step(), 4);
    assert!(gb.cpu().halted);
}

#[test]
fn post_boot_state() {
    let gb = machine(&[]);
    assert_eq!(gb.cpu().regs.pc, 0x0100);
    assert_eq!(gb.cpu().regs.sp, 0xFFFE);
    assert_eq!(gb.bus().peek(0xFF0F), 0xE1);
    assert_eq!(gb.bus().peek(0xFF40), 0x91);
    assert_eq!(gb.bus().peek(0xFF47), 0xFC);
    assert_eq!(gb.bus().peek(0xFF04), 0xAB);
    assert_eq!(gb.save_id(), "DOTBOY");
}

#[test]
fn bad_images_are_rejected() {
    assert!(matches!(
        GameBoy::from_rom(&[0; 0x20]),
        Err(GameBoyError::Cartridge(CartridgeError::TooShort { len: 0x20 }))
    ));

    let options = GameBoyOptions::builder()
        .rom(with_program(&[]))
        .boot_rom(vec![0; 100])
        .build();
    assert!(matches!(
        GameBoy::new(options),
        Err(GameBoyError::BootRom(BootRomError::WrongSize(100)))
    ));
}

#[test]
fn address_routing() {
    let gb = machine(&[]);
    let bus = gb.bus();
    assert_eq!(bus.route(0x0000), Some(SpaceId::Cartridge));
    assert_eq!(bus.route(0x8000), Some(SpaceId::Ppu));
    assert_eq!(bus.route(0xA000), Some(SpaceId::Cartridge));
    assert_eq!(bus.route(0xC000), Some(SpaceId::WorkRam));
    assert_eq!(bus.route(0xE000), Some(SpaceId::WorkRam));
    assert_eq!(bus.route(0xFE00), Some(SpaceId::Ppu));
    assert_eq!(bus.route(0xFEA0), Some(SpaceId::Io));
    assert_eq!(bus.route(0xFF00), Some(SpaceId::Joypad));
    assert_eq!(bus.route(0xFF02), Some(SpaceId::Serial));
    assert_eq!(bus.route(0xFF05), Some(SpaceId::Timer));
    assert_eq!(bus.route(0xFF0F), Some(SpaceId::Interrupts));
    assert_eq!(bus.route(0xFF26), Some(SpaceId::Io));
    assert_eq!(bus.route(0xFF46), Some(SpaceId::Dma));
    assert_eq!(bus.route(0xFF44), Some(SpaceId::Ppu));
    assert_eq!(bus.route(0xFF80), Some(SpaceId::HighRam));
    assert_eq!(bus.route(0xFFFF), Some(SpaceId::Interrupts));
    assert!(!bus.is_mapped(SpaceId::BootRom));
}

#[test]
fn echo_ram_mirrors_work_ram() {
    let mut gb = machine(&[]);
    let bus = gb.bus_mut();
    bus.write8(0xC123, 0x5A);
    assert_eq!(bus.read8(0xE123), 0x5A);
    bus.write8(0xFDFF, 0x77);
    assert_eq!(bus.read8(0xDDFF), 0x77);
}

#[test]
fn boot_rom_shadows_cartridge_until_disabled() {
    // LD A,1; LDH (0x50),A
    let mut boot = vec![0; 0x100];
    boot[..4].copy_from_slice(&[0x3E, 0x01, 0xE0, 0x50]);
    let options = GameBoyOptions::builder()
        .rom(with_program(&[]))
        .boot_rom(boot)
        .build();
    let mut gb = GameBoy::new(options).unwrap();

    assert_eq!(gb.cpu().regs.pc, 0x0000);
    assert_eq!(gb.bus().peek(0x0000), 0x3E);
    assert_eq!(gb.bus().route(0x0000), Some(SpaceId::BootRom));
    // Power-on: LCD off, nothing requested.
    assert_eq!(gb.bus().peek(0xFF40), 0x00);
    assert_eq!(gb.bus().peek(0xFF0F), 0xE0);

    gb.step();
    gb.step();

    assert!(!gb.bus().is_mapped(SpaceId::BootRom));
    assert_eq!(gb.bus().route(0x0000), Some(SpaceId::Cartridge));
    // Bank 0 of the test image starts with its bank number.
    assert_eq!(gb.bus().peek(0x0000), 0x00);
    // The disabling write landed in the I/O block underneath as well.
    assert_eq!(gb.bus().route(0xFF50), Some(SpaceId::Io));
    assert_eq!(gb.bus().peek(0xFF50), 0x01);
}

#[test]
fn zero_write_keeps_boot_rom_mapped() {
    let mut boot = vec![0; 0x100];
    boot[0] = 0xAA;
    let options = GameBoyOptions::builder()
        .rom(with_program(&[]))
        .boot_rom(boot)
        .build();
    let mut gb = GameBoy::new(options).unwrap();

    gb.bus_mut().write8(0xFF50, 0x00);
    assert!(gb.bus().is_mapped(SpaceId::BootRom));
    assert_eq!(gb.bus().peek(0x0000), 0xAA);
}

#[test]
fn timer_overflow_reloads_one_tick_late() {
    let mut timer = Timer::new();
    let mut ic = InterruptController::new();
    timer.write(0xFF06, 0xAA);
    timer.write(0xFF05, 0xFF);
    timer.write(0xFF07, 0x05);

    timer.step(15, &mut ic);
    assert_eq!(timer.tima(), 0xFF);

    timer.step(1, &mut ic);
    assert_eq!(timer.tima(), 0x00);
    assert!(ic.requested().is_empty());

    timer.step(1, &mut ic);
    assert_eq!(timer.tima(), 0xAA);
    assert_eq!(ic.requested(), Interrupt::TIMER);
}

#[test]
fn tima_write_cancels_pending_reload() {
    let mut timer = Timer::new();
    let mut ic = InterruptController::new();
    timer.write(0xFF06, 0xAA);
    timer.write(0xFF05, 0xFF);
    timer.write(0xFF07, 0x05);

    timer.step(16, &mut ic);
    timer.write(0xFF05, 0x10);
    timer.step(1, &mut ic);

    assert_eq!(timer.tima(), 0x10);
    assert!(ic.requested().is_empty());
}

#[test]
fn div_counts_every_256_ticks_and_resets_on_write() {
    let mut timer = Timer::new();
    let mut ic = InterruptController::new();

    timer.step(300, &mut ic);
    assert_eq!(timer.div(), 1);

    timer.write(0xFF04, 0x42);
    assert_eq!(timer.div(), 0);
    timer.step(255, &mut ic);
    assert_eq!(timer.div(), 0);
    timer.step(1, &mut ic);
    assert_eq!(timer.div(), 1);
}

#[test]
fn tac_selects_tima_period() {
    let mut ic = InterruptController::new();
    for (tac, period) in [(0x04, 1024), (0x05, 16), (0x06, 64), (0x07, 256)] {
        let mut timer = Timer::new();
        timer.write(0xFF07, tac);
        timer.step(period - 1, &mut ic);
        assert_eq!(timer.tima(), 0, "tac={tac:#04X}");
        timer.step(1, &mut ic);
        assert_eq!(timer.tima(), 1, "tac={tac:#04X}");
    }

    // Disabled: TIMA stays put.
    let mut timer = Timer::new();
    timer.write(0xFF07, 0x01);
    timer.step(1000, &mut ic);
    assert_eq!(timer.tima(), 0);
    assert_eq!(timer.read(0xFF07), 0xF9);
}

#[test]
fn oam_dma_copies_a_page_over_time() {
    let mut gb = machine(&[]);
    for i in 0..0xA0u16 {
        gb.bus_mut().write8(0xC000 + i, i as u8 ^ 0x5A);
    }

    gb.bus_mut().write8(0xFF46, 0xC0);
    assert!(gb.bus().hardware().dma.is_active());
    assert_eq!(gb.bus().peek(0xFF46), 0xC0);

    gb.bus_mut().step_dma(4 + 4 * 160 - 1);
    let oam = gb.bus().hardware().ppu.oam();
    assert_eq!(oam[0], 0x5A);
    assert_eq!(oam[158], 158 ^ 0x5A);
    assert_eq!(oam[159], 0);
    assert!(gb.bus().hardware().dma.is_active());

    gb.bus_mut().step_dma(1);
    assert_eq!(gb.bus().hardware().ppu.oam()[159], 159 ^ 0x5A);
    assert!(!gb.bus().hardware().dma.is_active());
}

#[test]
fn dma_restart_begins_again() {
    let mut gb = machine(&[]);
    gb.bus_mut().write8(0xC000, 0x11);
    gb.bus_mut().write8(0xD000, 0x22);

    gb.bus_mut().write8(0xFF46, 0xC0);
    gb.bus_mut().step_dma(100);
    gb.bus_mut().write8(0xFF46, 0xD0);
    gb.bus_mut().step_dma(8);

    assert_eq!(gb.bus().hardware().ppu.oam()[0], 0x22);
}

#[test]
fn interrupt_wakes_halt_and_vectors() {
    // EI; HALT
    let mut gb = machine(&[0xFB, 0x76]);
    gb.bus_mut().write8(0xFFFF, Interrupt::TIMER.bits());
    gb.bus_mut().write8(0xFF0F, 0x00);

    gb.step();
    assert!(!gb.cpu().ime);
    gb.step();
    assert!(gb.cpu().halted);
    assert!(gb.cpu().ime);

    gb.bus_mut().interrupts_mut().request(Interrupt::TIMER);
    assert_eq!(gb.step(), 4 + 20);

    let cpu = gb.cpu();
    assert!(!cpu.halted);
    assert!(!cpu.ime);
    assert_eq!(cpu.regs.pc, 0x0050);
    assert_eq!(cpu.regs.sp, 0xFFFC);
    assert_eq!(gb.bus().peek(0xFFFC), 0x02);
    assert_eq!(gb.bus().peek(0xFFFD), 0x01);
    assert!(gb.bus().interrupts().requested().is_empty());
}

#[test]
fn highest_priority_interrupt_wins() {
    // EI; NOP; NOP
    let mut gb = machine(&[0xFB, 0x00, 0x00]);
    gb.bus_mut().write8(0xFFFF, 0x1F);
    gb.bus_mut().write8(0xFF0F, 0x00);
    gb.step();
    gb.step();
    assert!(gb.cpu().ime);

    gb.bus_mut()
        .interrupts_mut()
        .request(Interrupt::JOYPAD | Interrupt::LCD_STAT);
    gb.step();

    assert_eq!(gb.cpu().regs.pc, 0x0048);
    assert_eq!(gb.bus().interrupts().requested(), Interrupt::JOYPAD);
}

#[test]
fn ei_opens_interrupts_after_one_instruction() {
    // EI; NOP; NOP; NOP with VBlank still requested from boot.
    let mut gb = machine(&[0xFB, 0x00, 0x00, 0x00]);
    gb.bus_mut().write8(0xFFFF, Interrupt::VBLANK.bits());
    assert_eq!(gb.bus().interrupts().pending(), Interrupt::VBLANK);

    assert_eq!(gb.step(), 4);
    assert_eq!(gb.cpu().regs.pc, 0x0101);
    assert_eq!(gb.step(), 4 + 20);

    let cpu = gb.cpu();
    assert!(!cpu.ime);
    assert_eq!(cpu.regs.pc, 0x0040);
    assert_eq!(cpu.regs.sp, 0xFFFC);
    assert_eq!(gb.bus().peek(0xFFFC), 0x02);
    assert_eq!(gb.bus().peek(0xFFFD), 0x01);
    assert!(gb.bus().interrupts().requested().is_empty());
}

#[test]
fn halt_with_ime_clear_wakes_without_service() {
    // HALT; NOP
    let mut gb = machine(&[0x76, 0x00]);
    gb.bus_mut().write8(0xFFFF, Interrupt::JOYPAD.bits());
    gb.bus_mut().write8(0xFF0F, 0x00);

    gb.step();
    assert!(gb.cpu().halted);

    gb.set_buttons(Buttons::A);
    assert_eq!(gb.step(), 4);

    assert!(!gb.cpu().halted);
    assert_eq!(gb.cpu().regs.pc, 0x0101);
    assert!(gb.bus().interrupts().requested().contains(Interrupt::JOYPAD));
}

#[test]
fn di_after_ei_keeps_interrupts_off() {
    // EI; DI; NOP
    let mut gb = machine(&[0xFB, 0xF3, 0x00]);
    gb.bus_mut().write8(0xFFFF, 0x1F);
    gb.step();
    gb.step();
    gb.step();
    assert!(!gb.cpu().ime);
    // VBlank is still requested from boot, but nothing was serviced.
    assert_eq!(gb.cpu().regs.pc, 0x0103);
}

#[test]
fn joypad_register_reflects_selected_group() {
    let mut gb = machine(&[]);
    gb.set_buttons(Buttons::RIGHT | Buttons::A);

    let bus = gb.bus_mut();
    bus.write8(0xFF00, 0x20);
    assert_eq!(bus.read8(0xFF00), 0xEE);
    bus.write8(0xFF00, 0x10);
    assert_eq!(bus.read8(0xFF00), 0xDE);
    bus.write8(0xFF00, 0x30);
    assert_eq!(bus.read8(0xFF00), 0xFF);
}

#[test]
fn new_presses_request_joypad_interrupt() {
    let mut gb = machine(&[]);
    gb.bus_mut().write8(0xFF0F, 0x00);

    gb.set_buttons(Buttons::START);
    assert_eq!(gb.bus().interrupts().requested(), Interrupt::JOYPAD);

    gb.bus_mut().write8(0xFF0F, 0x00);
    gb.set_buttons(Buttons::START);
    assert!(gb.bus().interrupts().requested().is_empty());

    gb.set_buttons(Buttons::empty());
    assert!(gb.bus().interrupts().requested().is_empty());
}

#[test]
fn serial_transfer_captures_output() {
    // LD A,'H'; LDH (SB),A; LD A,0x81; LDH (SC),A; HALT
    let mut gb = machine(&[0x3E, b'H', 0xE0, 0x01, 0x3E, 0x81, 0xE0, 0x02, 0x76]);
    gb.bus_mut().write8(0xFF0F, 0x00);
    for _ in 0..5 {
        gb.step();
    }

    assert_eq!(gb.serial_output(), b"H");
    assert_eq!(gb.bus().peek(0xFF01), 0xFF);
    assert_eq!(gb.bus().peek(0xFF02) & 0x80, 0);
    assert!(gb.bus().interrupts().requested().contains(Interrupt::SERIAL));

    assert_eq!(gb.take_serial_output(), b"H".to_vec());
    assert!(gb.serial_output().is_empty());
}

#[test]
fn illegal_opcode_is_reported() {
    let mut gb = machine(&[0xD3, 0x00]);
    gb.step();
    assert!(matches!(
        gb.take_fault(),
        Some(CpuFault::IllegalOpcode { opcode: 0xD3, .. })
    ));
    assert_eq!(gb.take_fault(), None);
    assert_eq!(gb.cpu().regs.pc, 0x0101);
}

#[test]
fn run_frame_presents_once_per_frame() {
    // JR -2
    let mut gb = machine(&[0x18, 0xFE]);
    let mut sink = CountingSink::default();
    let mut input = Held(Buttons::START);

    let ticks = gb.run_frame(&mut input, &mut sink);
    assert!(ticks >= TICKS_PER_FRAME);
    assert_eq!(sink.frames, 1);
    assert_eq!(sink.last_len, SCREEN_WIDTH * SCREEN_HEIGHT);
    assert_eq!(gb.bus().hardware().joypad.buttons(), Buttons::START);

    gb.run_frame(&mut input, &mut sink);
    gb.run_frame(&mut input, &mut sink);
    assert_eq!(sink.frames, 3);
    assert_eq!(gb.frames(), 3);
}

#[test]
fn lcd_off_presents_nothing() {
    // LDH (LCDC),A with A=0 after XOR A; then spin.
    let mut gb = machine(&[0xAF, 0xE0, 0x40, 0x18, 0xFE]);
    let mut sink = CountingSink::default();
    let mut input = Held(Buttons::empty());

    gb.run_frame(&mut input, &mut sink);
    assert_eq!(sink.frames, 0);
    assert_eq!(gb.bus().peek(0xFF44), 0);
}

#[test]
fn battery_ram_round_trips_through_store() {
    let rom = image(0x03, 0, 0x02);
    let mut store = MemoryBatteryStore::new();

    let mut gb = GameBoy::new(
        GameBoyOptions::builder()
            .rom(rom.clone())
            .save_id("pocket")
            .build(),
    )
    .unwrap();
    assert!(!gb.load_battery(&mut store).unwrap());

    gb.bus_mut().write8(0x0000, 0x0A);
    gb.bus_mut().write8(0xA000, 0x42);
    gb.bus_mut().write8(0xBFFF, 0x99);
    gb.save_battery(&mut store).unwrap();

    let saved = store.get("pocket").unwrap();
    assert_eq!(saved.len(), 0x2000);
    assert_eq!(saved[0], 0x42);

    let mut gb = GameBoy::new(
        GameBoyOptions::builder()
            .rom(rom)
            .save_id("pocket")
            .build(),
    )
    .unwrap();
    assert!(gb.load_battery(&mut store).unwrap());
    gb.bus_mut().write8(0x0000, 0x0A);
    assert_eq!(gb.bus_mut().read8(0xA000), 0x42);
    assert_eq!(gb.bus_mut().read8(0xBFFF), 0x99);
}

#[test]
fn cartridges_without_battery_skip_the_store() {
    let mut store = MemoryBatteryStore::new();
    store.save("DOTBOY", &[1, 2, 3]).unwrap();

    // MBC1+RAM, no battery.
    let mut gb = GameBoy::from_rom(&image(0x02, 0, 0x02)).unwrap();
    assert!(!gb.load_battery(&mut store).unwrap());
    gb.bus_mut().write8(0x0000, 0x0A);
    assert_eq!(gb.bus_mut().read8(0xA000), 0x00);

    gb.save_battery(&mut store).unwrap();
    assert_eq!(store.get("DOTBOY"), Some(&[1u8, 2, 3][..]));
}

#[test]
fn fallible_accessors_reach_every_mapped_address() {
    let mut boot = vec![0; 0x100];
    boot[0] = 0x31;
    let options = GameBoyOptions::builder()
        .rom(with_program(&[]))
        .boot_rom(boot)
        .build();
    let mut gb = GameBoy::new(options).unwrap();

    assert_eq!(gb.bus().try_read8(0x0000), Ok(0x31));
    assert_eq!(gb.bus().try_read8(0xFF50), Ok(0xFF));

    gb.bus_mut().try_write8(0xFF80, 0x12).unwrap();
    assert_eq!(gb.bus().try_read8(0xFF80), Ok(0x12));

    gb.bus_mut().try_write8(0xFF50, 0x01).unwrap();
    assert!(!gb.bus().is_mapped(SpaceId::BootRom));
    assert_eq!(gb.bus().try_read8(0x0000), Ok(0x00));
}
