use super::WindowHandle;
use serde::{Deserialize, Serialize};

/// A status icon embedded into the panel through XEMBED.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Tray {
    pub handle: WindowHandle,
    pub name: Option<String>,
    pub class: Option<String>,
    /// `XEMBED_MAPPED` from the icon's `_XEMBED_INFO`.
    pub mapped: bool,
    pub dead: bool,
}

impl Tray {
    #[must_use]
    pub const fn new(handle: WindowHandle) -> Self {
        Self {
            handle,
            name: None,
            class: None,
            mapped: true,
            dead: false,
        }
    }
}
