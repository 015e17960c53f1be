use super::{Direction, Xyhw};
use crate::tiling::Orientation;
use serde::{Deserialize, Serialize};

/// Placement preset laid out like a numeric keypad.
///
/// ```text
/// 7 8 9
/// 4 5 6
/// 1 2 3
/// ```
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "u8")]
pub struct Gravity(u8);

impl Gravity {
    pub const CENTER: Self = Self(5);

    #[must_use]
    pub const fn id(self) -> u8 {
        self.0
    }

    /// Column and row of the cell, row 0 being the top.
    const fn cell(self) -> (i32, i32) {
        let i = self.0 as i32 - 1;
        (i % 3, 2 - i / 3)
    }

    /// The part of `area` this gravity covers. Corners take a quarter, edges
    /// take half of the area along one axis and the center takes all of it.
    #[must_use]
    pub const fn rect_in(self, area: Xyhw) -> Xyhw {
        let (col, row) = self.cell();
        let half_w = area.w / 2;
        let half_h = area.h / 2;
        let (x, w) = match col {
            0 => (area.x, half_w),
            2 => (area.x + half_w, area.w - half_w),
            _ => (area.x, area.w),
        };
        let (y, h) = match row {
            0 => (area.y, half_h),
            2 => (area.y + half_h, area.h - half_h),
            _ => (area.y, area.h),
        };
        Xyhw { x, y, w, h }
    }

    /// How clients sharing this gravity are split.
    #[must_use]
    pub const fn orientation(self) -> Orientation {
        match self.cell().0 {
            1 => Orientation::Horizontal,
            _ => Orientation::Vertical,
        }
    }

    /// Score how well `other` continues a move from `self` in `direction`.
    /// Cells not lying in that direction score 0, a direct neighbour on the
    /// same line scores 100.
    #[must_use]
    pub fn score(self, other: Self, direction: Direction) -> i32 {
        let (fx, fy) = self.cell();
        let (tx, ty) = other.cell();
        let (along, across) = match direction {
            Direction::Left => (fx - tx, ty - fy),
            Direction::Right => (tx - fx, ty - fy),
            Direction::Up => (fy - ty, tx - fx),
            Direction::Down => (ty - fy, tx - fx),
        };
        if along <= 0 {
            return 0;
        }
        100 - 30 * (along - 1) - 20 * across.abs()
    }
}

impl Default for Gravity {
    fn default() -> Self {
        Self::CENTER
    }
}

impl TryFrom<u8> for Gravity {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (1..=9).contains(&value) {
            Ok(Self(value))
        } else {
            Err(format!("gravity {value} is outside 1-9"))
        }
    }
}

impl TryFrom<i64> for Gravity {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .map_err(|e| e.to_string())
            .and_then(Self::try_from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AREA: Xyhw = Xyhw::new(0, 0, 800, 600);

    fn gravity(id: u8) -> Gravity {
        Gravity::try_from(id).unwrap()
    }

    #[test]
    fn gravity_ids_outside_the_keypad_are_rejected() {
        assert!(Gravity::try_from(0_u8).is_err());
        assert!(Gravity::try_from(10_u8).is_err());
        assert!(Gravity::try_from(-1_i64).is_err());
        assert!(Gravity::try_from(9_i64).is_ok());
    }

    #[test]
    fn corners_take_a_quarter() {
        assert_eq!(gravity(7).rect_in(AREA), Xyhw::new(0, 0, 400, 300));
        assert_eq!(gravity(3).rect_in(AREA), Xyhw::new(400, 300, 400, 300));
    }

    #[test]
    fn edges_take_half_and_center_takes_all() {
        assert_eq!(gravity(8).rect_in(AREA), Xyhw::new(0, 0, 800, 300));
        assert_eq!(gravity(2).rect_in(AREA), Xyhw::new(0, 300, 800, 300));
        assert_eq!(gravity(4).rect_in(AREA), Xyhw::new(0, 0, 400, 600));
        assert_eq!(gravity(6).rect_in(AREA), Xyhw::new(400, 0, 400, 600));
        assert_eq!(gravity(5).rect_in(AREA), AREA);
    }

    #[test]
    fn odd_sizes_give_the_extra_pixel_to_the_far_cell() {
        let area = Xyhw::new(10, 10, 801, 601);
        assert_eq!(gravity(9).rect_in(area), Xyhw::new(410, 10, 401, 300));
        assert_eq!(gravity(1).rect_in(area), Xyhw::new(10, 310, 400, 301));
    }

    #[test]
    fn direct_neighbour_scores_perfectly() {
        assert_eq!(gravity(4).score(gravity(5), Direction::Right), 100);
        assert_eq!(gravity(5).score(gravity(8), Direction::Up), 100);
    }

    #[test]
    fn cells_behind_the_direction_score_zero() {
        assert_eq!(gravity(5).score(gravity(4), Direction::Right), 0);
        assert!(gravity(5).score(gravity(6), Direction::Right) > 0);
        assert_eq!(gravity(5).score(gravity(2), Direction::Up), 0);
    }

    #[test]
    fn distance_and_offset_lower_the_score() {
        assert_eq!(gravity(4).score(gravity(6), Direction::Right), 70);
        assert_eq!(gravity(4).score(gravity(9), Direction::Right), 50);
        assert_eq!(gravity(1).score(gravity(9), Direction::Right), 30);
    }
}
