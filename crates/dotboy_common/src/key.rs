/// Host keys a frontend can report.
///
/// Only the keys some app actually binds are listed; everything else is
/// reported as `Key::None`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Z,
    X,
    A,
    S,
    Enter,
    Backspace,
    Escape,
    None,
}
