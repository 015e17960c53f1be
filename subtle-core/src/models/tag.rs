use serde::{Deserialize, Serialize};

/// Bitmask of tags carried by clients and views.
///
/// Bit 0 is reserved so an empty mask can stand for "untagged"; the tag at
/// index `i` of [`Tags`] owns bit `i + 1`.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TagMask(u64);

impl TagMask {
    pub const EMPTY: Self = Self(0);
    /// Number of tags a mask can address.
    pub const CAPACITY: usize = 63;

    #[must_use]
    pub const fn from_bits(bits: u64) -> Self {
        Self(bits & !1)
    }

    #[must_use]
    pub const fn bits(self) -> u64 {
        self.0
    }

    /// Mask holding only the tag at `index`.
    #[must_use]
    pub fn single(index: usize) -> Option<Self> {
        (index < Self::CAPACITY).then(|| Self(1 << (index + 1)))
    }

    #[must_use]
    pub fn contains(self, index: usize) -> bool {
        Self::single(index).is_some_and(|bit| self.0 & bit.0 != 0)
    }

    pub fn set(&mut self, index: usize) {
        if let Some(bit) = Self::single(index) {
            self.0 |= bit.0;
        }
    }

    pub fn clear(&mut self, index: usize) {
        if let Some(bit) = Self::single(index) {
            self.0 &= !bit.0;
        }
    }

    #[must_use]
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Drop the tag at `index` and move every higher tag down by one so tag
    /// indices stay contiguous.
    #[must_use]
    pub fn without_tag(self, index: usize) -> Self {
        if index >= Self::CAPACITY {
            return self;
        }
        let bit = index + 1;
        let low = self.0 & ((1 << bit) - 1);
        let high = self.0.checked_shr(bit as u32 + 1).unwrap_or(0) << bit;
        Self(low | high)
    }
}

impl std::ops::BitOr for TagMask {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for TagMask {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
}

/// Ordered list of all known tags. A tag's position is its index in every
/// [`TagMask`].
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Tags {
    list: Vec<Tag>,
}

impl Tags {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a tag and return its index, or `None` when the mask is full.
    pub fn add(&mut self, name: &str) -> Option<usize> {
        if self.list.len() >= TagMask::CAPACITY {
            tracing::warn!("Cannot add tag {name}: all {} slots used", TagMask::CAPACITY);
            return None;
        }
        self.list.push(Tag {
            name: name.to_owned(),
        });
        Some(self.list.len() - 1)
    }

    /// Remove the tag at `index`. Callers must compact every mask with
    /// [`TagMask::without_tag`] afterwards.
    pub fn remove(&mut self, index: usize) -> Option<Tag> {
        (index < self.list.len()).then(|| self.list.remove(index))
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.list.iter().position(|t| t.name == name)
    }

    pub fn get(&self, index: usize) -> Option<&Tag> {
        self.list.get(index)
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tag> {
        self.list.iter()
    }

    /// Mask selecting every tag whose name is in `names`.
    pub fn mask_for(&self, names: &[String]) -> TagMask {
        let mut mask = TagMask::EMPTY;
        for index in names.iter().filter_map(|n| self.index_of(n)) {
            mask.set(index);
        }
        mask
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_index_zero_uses_bit_one() {
        assert_eq!(TagMask::single(0), Some(TagMask::from_bits(0b10)));
        assert_eq!(TagMask::single(TagMask::CAPACITY), None);
    }

    #[test]
    fn deleting_a_tag_shifts_higher_bits_down() {
        let mask = TagMask::from_bits(0b1110);
        assert_eq!(mask.without_tag(1), TagMask::from_bits(0b0110));
    }

    #[test]
    fn deleting_the_lowest_tag_keeps_nothing_below_it() {
        let mask = TagMask::from_bits(0b1010);
        assert_eq!(mask.without_tag(0), TagMask::from_bits(0b0100));
    }

    #[test]
    fn deleting_the_highest_tag_clears_the_top_bit() {
        let mask = TagMask::from_bits(1 << 63 | 0b10);
        assert_eq!(mask.without_tag(62), TagMask::from_bits(0b10));
    }

    #[test]
    fn deleting_an_out_of_range_tag_is_a_no_op() {
        let mask = TagMask::from_bits(0b1110);
        assert_eq!(mask.without_tag(TagMask::CAPACITY), mask);
        assert_eq!(mask.without_tag(200), mask);
    }

    #[test]
    fn reserved_bit_is_never_set() {
        assert_eq!(TagMask::from_bits(0b1111).bits(), 0b1110);
    }

    #[test]
    fn set_and_clear_only_touch_one_tag() {
        let mut mask = TagMask::EMPTY;
        mask.set(2);
        mask.set(4);
        mask.clear(2);
        assert!(!mask.contains(2));
        assert!(mask.contains(4));
        assert_eq!(mask.bits(), 1 << 5);
    }

    #[test]
    fn tag_list_refuses_more_tags_than_the_mask_holds() {
        let mut tags = Tags::new();
        for i in 0..TagMask::CAPACITY {
            assert_eq!(tags.add(&i.to_string()), Some(i));
        }
        assert_eq!(tags.add("overflow"), None);
    }

    #[test]
    fn mask_for_resolves_tag_names() {
        let mut tags = Tags::new();
        tags.add("www");
        tags.add("dev");
        tags.add("mail");
        let mask = tags.mask_for(&["mail".to_owned(), "www".to_owned(), "nope".to_owned()]);
        assert_eq!(mask.bits(), 0b1010);
    }
}
