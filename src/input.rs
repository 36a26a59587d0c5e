/// One tick's worth of player input, already reduced from raw key events.
///
/// Movement and sprint are level-triggered (held), jump and fire are
/// edge-triggered (pressed since the previous tick).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    pub left: bool,
    pub right: bool,
    pub sprint: bool,
    pub jump_pressed: bool,
    pub fire_pressed: bool,
}

impl InputSnapshot {
    pub fn is_moving(&self) -> bool {
        self.left || self.right
    }
}
