use super::WindowHandle;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragKind {
    Move,
    Resize,
}

/// Pointer interaction state of the manager.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    /// A client follows the pointer until the button is released.
    Dragging {
        window: WindowHandle,
        kind: DragKind,
        origin: super::Xyhw,
    },
    #[default]
    Normal,
}
