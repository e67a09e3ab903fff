use dotboy_common::app::App;
use dotboy_common::key::Key;
use dotboy_common::Color;

use crate::machine::{
    BatteryStore, Buttons, FrameSink, GameBoy, GameBoyError, InputSource,
};
use crate::{SCREEN_HEIGHT, SCREEN_SCALE, SCREEN_WIDTH};

/// Shade 0 (lightest) to 3 on the DMG's green LCD.
pub const DMG_PALETTE: [Color; 4] = [
    Color::new_rgb(208, 208, 88),
    Color::new_rgb(160, 168, 64),
    Color::new_rgb(112, 128, 40),
    Color::new_rgb(64, 80, 16),
];

/// Host key bound to a Game Boy button, if any.
pub fn map_key(key: Key) -> Option<Buttons> {
    match key {
        Key::Up => Some(Buttons::UP),
        Key::Down => Some(Buttons::DOWN),
        Key::Left => Some(Buttons::LEFT),
        Key::Right => Some(Buttons::RIGHT),
        Key::Z => Some(Buttons::A),
        Key::X => Some(Buttons::B),
        Key::A => Some(Buttons::SELECT),
        Key::S => Some(Buttons::START),
        _ => None,
    }
}

/// Expand a shade frame into RGB24.
pub fn shades_to_rgb24(shades: &[u8], screen: &mut [u8]) {
    for (shade, out) in shades.iter().zip(screen.chunks_exact_mut(3)) {
        DMG_PALETTE[(shade & 0x03) as usize].write_rgb24(out);
    }
}

struct ScreenSink<'a> {
    screen: &'a mut [u8],
}

impl FrameSink for ScreenSink<'_> {
    fn present(&mut self, frame: &[u8]) {
        shades_to_rgb24(frame, self.screen);
    }
}

struct HeldButtons(Buttons);

impl InputSource for HeldButtons {
    fn buttons(&mut self) -> Buttons {
        self.0
    }
}

/// Drives a [`GameBoy`] from a frontend, one frame per `update`.
pub struct GameBoyApp {
    pub gb: GameBoy,
    battery: Box<dyn BatteryStore>,
    buttons: Buttons,
    scale: u32,
    should_exit: bool,
}

impl GameBoyApp {
    /// Wrap a machine and restore its battery RAM from `battery`.
    pub fn new(mut gb: GameBoy, mut battery: Box<dyn BatteryStore>) -> Result<Self, GameBoyError> {
        gb.load_battery(battery.as_mut())?;
        Ok(Self {
            gb,
            battery,
            buttons: Buttons::empty(),
            scale: SCREEN_SCALE,
            should_exit: false,
        })
    }

    pub fn with_scale(mut self, scale: u32) -> Self {
        self.scale = scale.max(1);
        self
    }

    pub fn buttons(&self) -> Buttons {
        self.buttons
    }
}

impl App for GameBoyApp {
    fn init(&mut self) {
        log::info!("gameboy app: '{}'", self.gb.header().title);
    }

    fn update(&mut self, screen: &mut [u8]) {
        let mut input = HeldButtons(self.buttons);
        let mut sink = ScreenSink { screen };
        self.gb.run_frame(&mut input, &mut sink);

        if let Some(fault) = self.gb.take_fault() {
            log::debug!("gameboy app: frame {} fault: {fault}", self.gb.frames());
        }
    }

    fn handle_key_event(&mut self, key: Key, is_down: bool) {
        if key == Key::Escape {
            self.should_exit = true;
            return;
        }
        let Some(button) = map_key(key) else {
            return;
        };
        self.buttons.set(button, is_down);
    }

    fn should_exit(&self) -> bool {
        self.should_exit
    }

    fn exit(&mut self) {
        log::info!("gameboy app: exit after {} frames", self.gb.frames());
        if let Err(err) = self.gb.save_battery(self.battery.as_mut()) {
            log::error!("gameboy app: {err}");
        }
    }

    fn width(&self) -> u32 {
        SCREEN_WIDTH as u32
    }

    fn height(&self) -> u32 {
        SCREEN_HEIGHT as u32
    }

    fn scale(&self) -> u32 {
        self.scale
    }

    fn title(&self) -> String {
        format!("dotboy - {}", self.gb.header().title)
    }
}
