use std::path::PathBuf;

use anyhow::{anyhow, Result};
use dotboy_gb::app::shades_to_rgb24;
use dotboy_gb::{Buttons, FrameSink, GameBoy, InputSource, SCREEN_HEIGHT, SCREEN_WIDTH};

const USAGE: &str = "Usage: gb_frame_dump <rom_path> <out_rgb24_path> [frames|--until-ldbb]";

/// LD B,B, the conventional software breakpoint of test ROMs.
const LD_B_B: u8 = 0x40;
const BREAKPOINT_BUDGET: u64 = 50_000_000;

struct NoInput;

impl InputSource for NoInput {
    fn buttons(&mut self) -> Buttons {
        Buttons::empty()
    }
}

struct Discard;

impl FrameSink for Discard {
    fn present(&mut self, _frame: &[u8]) {}
}

/// Step until the next instruction is LD B,B. Returns false when the budget
/// runs out first.
fn run_until_breakpoint(gb: &mut GameBoy, budget: u64) -> bool {
    for _ in 0..budget {
        let pc = gb.cpu().regs.pc;
        if !gb.cpu().halted && gb.bus().peek(pc) == LD_B_B {
            return true;
        }
        gb.step();
    }
    false
}

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let (Some(rom_path), Some(out_path)) = (args.next(), args.next()) else {
        eprintln!("{USAGE}");
        std::process::exit(2);
    };
    let rom_path = PathBuf::from(rom_path);
    let out_path = PathBuf::from(out_path);
    let mode = args.next().unwrap_or_else(|| "120".to_string());
    let frames: Option<u32> = if mode == "--until-ldbb" {
        None
    } else {
        Some(mode.parse().map_err(|_| {
            anyhow!("invalid frame count '{mode}'; expected an integer or '--until-ldbb'")
        })?)
    };

    let rom = std::fs::read(&rom_path)
        .map_err(|err| anyhow!("failed to read ROM '{}': {err}", rom_path.display()))?;
    let mut gb = GameBoy::from_rom(&rom)?;

    match frames {
        Some(frames) => {
            for _ in 0..frames {
                gb.run_frame(&mut NoInput, &mut Discard);
            }
        }
        None => {
            if !run_until_breakpoint(&mut gb, BREAKPOINT_BUDGET) {
                return Err(anyhow!(
                    "did not hit LD B,B within {BREAKPOINT_BUDGET} instructions"
                ));
            }
        }
    }

    let mut buffer = vec![0u8; SCREEN_WIDTH * SCREEN_HEIGHT * 3];
    shades_to_rgb24(gb.frame(), &mut buffer);
    std::fs::write(&out_path, &buffer)
        .map_err(|err| anyhow!("failed to write '{}': {err}", out_path.display()))?;

    match frames {
        Some(frames) => println!(
            "Wrote {} bytes ({SCREEN_WIDTH}x{SCREEN_HEIGHT} rgb24) after {frames} frames to '{}'",
            buffer.len(),
            out_path.display()
        ),
        None => println!(
            "Wrote {} bytes ({SCREEN_WIDTH}x{SCREEN_HEIGHT} rgb24) at LD B,B breakpoint to '{}'",
            buffer.len(),
            out_path.display()
        ),
    }
    Ok(())
}
