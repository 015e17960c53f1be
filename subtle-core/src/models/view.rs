use super::{TagMask, WindowHandle};
use serde::{Deserialize, Serialize};

/// Stable identity of a view; its position in the view list may change.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(pub u32);

/// A virtual desktop showing every client sharing one of its tags.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct View {
    pub id: ViewId,
    pub name: String,
    pub tags: TagMask,
    /// Panel button, once the display server created it.
    pub button: Option<WindowHandle>,
}

impl View {
    #[must_use]
    pub const fn new(id: ViewId, name: String, tags: TagMask) -> Self {
        Self {
            id,
            name,
            tags,
            button: None,
        }
    }
}
