use super::{Gravity, TagMask, WindowHandle, Xyhw};
use crate::tiling::Sizing;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Modes and lifecycle markers of a client.
    #[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ClientFlags: u8 {
        const FULL = 1;
        const FLOAT = 1 << 1;
        const STICK = 1 << 2;
        /// The window is going away; further notifications are ignored.
        const DEAD = 1 << 7;
        const MODES = Self::FULL.bits() | Self::FLOAT.bits() | Self::STICK.bits();
    }
}

/// Size constraints requested through `WM_NORMAL_HINTS`.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SizeHints {
    pub min: Option<(i32, i32)>,
    pub max: Option<(i32, i32)>,
    pub increment: Option<(i32, i32)>,
}

impl SizeHints {
    /// Clamp a floating geometry to these hints.
    #[must_use]
    pub fn apply(&self, mut geometry: Xyhw) -> Xyhw {
        if let Some((minw, minh)) = self.min {
            geometry.w = geometry.w.max(minw);
            geometry.h = geometry.h.max(minh);
        }
        if let Some((maxw, maxh)) = self.max {
            if maxw > 0 {
                geometry.w = geometry.w.min(maxw);
            }
            if maxh > 0 {
                geometry.h = geometry.h.min(maxh);
            }
        }
        geometry
    }
}

/// A managed application window.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Client {
    pub handle: WindowHandle,
    pub geometry: Xyhw,
    pub tags: TagMask,
    pub gravity: Gravity,
    pub screen: usize,
    pub flags: ClientFlags,
    pub caption: Option<String>,
    pub class: Option<String>,
    pub colormap: Option<u64>,
    pub sizing: Sizing,
    pub size_hints: SizeHints,
    pub transient: bool,
    pub strut: Option<super::Strut>,
}

impl Client {
    #[must_use]
    pub fn new(handle: WindowHandle, geometry: Xyhw, tags: TagMask) -> Self {
        Self {
            handle,
            geometry,
            tags,
            gravity: Gravity::default(),
            screen: 0,
            flags: ClientFlags::empty(),
            caption: None,
            class: None,
            colormap: None,
            sizing: Sizing::Plain,
            size_hints: SizeHints::default(),
            transient: false,
            strut: None,
        }
    }

    #[must_use]
    pub const fn is_dead(&self) -> bool {
        self.flags.contains(ClientFlags::DEAD)
    }

    #[must_use]
    pub const fn is_floating(&self) -> bool {
        self.flags.contains(ClientFlags::FLOAT)
    }

    #[must_use]
    pub const fn is_fullscreen(&self) -> bool {
        self.flags.contains(ClientFlags::FULL)
    }

    #[must_use]
    pub const fn is_sticky(&self) -> bool {
        self.flags.contains(ClientFlags::STICK)
    }

    /// Visible on a view showing `view_tags`.
    #[must_use]
    pub const fn is_visible_on(&self, view_tags: TagMask) -> bool {
        !self.is_dead() && self.tags.intersects(view_tags)
    }

    /// Whether the tiling engine leaves this client alone.
    #[must_use]
    pub const fn is_tile_exempt(&self) -> bool {
        self.transient || self.flags.intersects(ClientFlags::MODES)
    }

    /// Flip the given mode bits. Non-mode bits in `modes` are ignored.
    pub fn toggle_mode(&mut self, modes: ClientFlags) {
        self.flags.toggle(modes & ClientFlags::MODES);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> Client {
        Client::new(WindowHandle(1), Xyhw::default(), TagMask::single(0).unwrap())
    }

    #[test]
    fn toggling_a_mode_twice_restores_it() {
        let mut client = client();
        client.toggle_mode(ClientFlags::FLOAT);
        assert!(client.is_floating());
        client.toggle_mode(ClientFlags::FLOAT);
        assert!(!client.is_floating());
    }

    #[test]
    fn toggling_cannot_revive_or_kill_a_client() {
        let mut client = client();
        client.toggle_mode(ClientFlags::DEAD | ClientFlags::FULL);
        assert!(!client.is_dead());
        assert!(client.is_fullscreen());
    }

    #[test]
    fn dead_clients_are_never_visible() {
        let mut client = client();
        let view = TagMask::single(0).unwrap();
        assert!(client.is_visible_on(view));
        client.flags |= ClientFlags::DEAD;
        assert!(!client.is_visible_on(view));
    }

    #[test]
    fn size_hints_clamp_geometry() {
        let hints = SizeHints {
            min: Some((100, 50)),
            max: Some((400, 0)),
            increment: None,
        };
        let out = hints.apply(Xyhw::new(0, 0, 800, 20));
        assert_eq!((out.w, out.h), (400, 50));
    }
}
