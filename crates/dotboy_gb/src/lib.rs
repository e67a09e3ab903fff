pub mod app;
pub mod bits;
pub mod cpu;
pub mod machine;

pub use app::GameBoyApp;
pub use machine::{
    BatteryStore, Buttons, FrameSink, GameBoy, GameBoyError, GameBoyOptions, InputSource,
    MemoryBatteryStore,
};

/// Logical screen width in pixels for the Game Boy DMG.
pub const SCREEN_WIDTH: usize = 160;
/// Logical screen height in pixels.
pub const SCREEN_HEIGHT: usize = 144;
/// Default integer scaling factor for the SDL frontend.
pub const SCREEN_SCALE: u32 = 4;
