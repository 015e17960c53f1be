use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Modifier state, using the X protocol bit positions.
    #[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ModMask: u16 {
        const Shift = 1;
        /// Caps lock
        const Lock = 1 << 1;
        const Control = 1 << 2;
        /// Mod1
        const Alt = 1 << 3;
        /// Mod2
        const NumLock = 1 << 4;
        const Mod3 = 1 << 5;
        /// Mod4
        const Super = 1 << 6;
        const Mod5 = 1 << 7;
    }
}

impl ModMask {
    /// Drop the lock modifiers so a chord matches regardless of caps or num lock.
    #[must_use]
    pub fn clean(self) -> Self {
        self.difference(Self::NumLock | Self::Lock)
    }
}

#[must_use]
pub fn into_modmask(keys: &[&str]) -> ModMask {
    let mut mask = ModMask::empty();
    for s in keys {
        mask |= into_mod(s);
    }
    mask.clean()
}

#[must_use]
pub fn into_mod(key: &str) -> ModMask {
    match key {
        "S" | "Shift" => ModMask::Shift,
        "C" | "Control" => ModMask::Control,
        "A" | "Mod1" | "Alt" => ModMask::Alt,
        // NOTE: we are ignoring the state of Numlock
        // "Mod2" | "NumLock" => ModMask::NumLock,
        "Mod3" => ModMask::Mod3,
        "W" | "Mod4" | "Super" => ModMask::Super,
        "Mod5" => ModMask::Mod5,
        _ => ModMask::empty(),
    }
}

/// Whether `key` names a modifier.
#[must_use]
pub fn is_mod(key: &str) -> bool {
    !into_mod(key).is_empty()
}
