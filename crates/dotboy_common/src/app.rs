use crate::key::Key;

/// A machine that a frontend can drive once per displayed frame.
///
/// The frontend owns the window and event loop; the app owns the emulated
/// hardware and fills `screen` with `width * height` RGB24 pixels on every
/// `update`.
pub trait App {
    fn init(&mut self);
    fn update(&mut self, screen: &mut [u8]);
    fn handle_key_event(&mut self, key: Key, is_down: bool);
    fn should_exit(&self) -> bool;
    fn exit(&mut self);

    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn scale(&self) -> u32;
    fn title(&self) -> String;
}
