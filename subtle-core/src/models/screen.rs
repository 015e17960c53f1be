use super::Xyhw;
use serde::{Deserialize, Serialize};

/// Space reserved at the display edges by a dock or panel (`_NET_WM_STRUT`).
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Strut {
    pub left: i32,
    pub right: i32,
    pub top: i32,
    pub bottom: i32,
}

impl Strut {
    /// Largest reservation per edge.
    #[must_use]
    pub fn union(self, other: Self) -> Self {
        Self {
            left: self.left.max(other.left),
            right: self.right.max(other.right),
            top: self.top.max(other.top),
            bottom: self.bottom.max(other.bottom),
        }
    }
}

/// A physical output.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Screen {
    pub geometry: Xyhw,
    /// Geometry minus the panel and any struts.
    pub workarea: Xyhw,
}

impl Screen {
    #[must_use]
    pub const fn new(geometry: Xyhw) -> Self {
        Self {
            geometry,
            workarea: geometry,
        }
    }

    /// Recompute the work area. `display` is the bounding box of all screens,
    /// struts are measured from its edges; `panel` is the height of the
    /// panel on top of the screen.
    pub fn update_workarea(&mut self, display: Xyhw, strut: Strut, panel: i32) {
        let g = self.geometry;
        let left = (strut.left - (g.x - display.x)).clamp(0, g.w);
        let right = (strut.right - (display.x + display.w - g.x - g.w)).clamp(0, g.w - left);
        let top = (strut.top - (g.y - display.y)).max(0).max(panel).min(g.h);
        let bottom = (strut.bottom - (display.y + display.h - g.y - g.h)).clamp(0, g.h - top);
        self.workarea = Xyhw {
            x: g.x + left,
            y: g.y + top,
            w: g.w - left - right,
            h: g.h - top - bottom,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn struts_only_shrink_screens_touching_that_edge() {
        let display = Xyhw::new(0, 0, 2000, 1000);
        let strut = Strut {
            left: 50,
            bottom: 30,
            ..Strut::default()
        };
        let mut left = Screen::new(Xyhw::new(0, 0, 1000, 1000));
        let mut right = Screen::new(Xyhw::new(1000, 0, 1000, 1000));
        left.update_workarea(display, strut, 0);
        right.update_workarea(display, strut, 0);
        assert_eq!(left.workarea, Xyhw::new(50, 0, 950, 970));
        assert_eq!(right.workarea, Xyhw::new(1000, 0, 1000, 970));
    }

    #[test]
    fn panel_height_reserves_the_top() {
        let geometry = Xyhw::new(0, 0, 800, 600);
        let mut screen = Screen::new(geometry);
        screen.update_workarea(geometry, Strut::default(), 16);
        assert_eq!(screen.workarea, Xyhw::new(0, 16, 800, 584));
    }

    #[test]
    fn union_keeps_the_widest_reservation() {
        let a = Strut {
            top: 10,
            left: 5,
            ..Strut::default()
        };
        let b = Strut {
            top: 20,
            ..Strut::default()
        };
        assert_eq!(a.union(b), Strut { top: 20, left: 5, ..Strut::default() });
    }
}
