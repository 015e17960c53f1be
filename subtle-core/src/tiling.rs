//! Recursive partitioning of a rectangle among weighted, plain and collapsed children.
use crate::models::{WindowHandle, Xyhw};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    /// Children side by side, the major axis is the width.
    Horizontal,
    /// Children stacked, the major axis is the height.
    Vertical,
}

/// How a child claims space on its container's major axis.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Sizing {
    /// Shares what is left equally with the other plain children.
    #[default]
    Plain,
    /// An explicit percentage of the container.
    Weighted(u8),
    /// Reduced to a single header bar.
    Collapsed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeId(usize);

#[derive(Clone, Debug, PartialEq, Eq)]
enum NodeKind {
    Container {
        orientation: Orientation,
        children: Vec<NodeId>,
    },
    Leaf(WindowHandle),
}

#[derive(Clone, Debug)]
struct Node {
    kind: NodeKind,
    sizing: Sizing,
    /// Floating, raised or transient nodes keep their own geometry.
    skip: bool,
}

/// Arena holding a tree of containers and leaves.
#[derive(Clone, Debug, Default)]
pub struct TileTree {
    nodes: Vec<Node>,
}

impl TileTree {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a container, as root when `parent` is `None`.
    pub fn add_container(
        &mut self,
        parent: Option<NodeId>,
        orientation: Orientation,
        sizing: Sizing,
    ) -> NodeId {
        self.push(
            parent,
            Node {
                kind: NodeKind::Container {
                    orientation,
                    children: vec![],
                },
                sizing,
                skip: false,
            },
        )
    }

    pub fn add_leaf(
        &mut self,
        parent: NodeId,
        window: WindowHandle,
        sizing: Sizing,
        skip: bool,
    ) -> NodeId {
        self.push(
            Some(parent),
            Node {
                kind: NodeKind::Leaf(window),
                sizing,
                skip,
            },
        )
    }

    fn push(&mut self, parent: Option<NodeId>, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        if let Some(NodeKind::Container { children, .. }) =
            parent.and_then(|p| self.nodes.get_mut(p.0)).map(|n| &mut n.kind)
        {
            children.push(id);
        }
        id
    }

    /// Lay out `root` inside `rect` and return the geometry of every leaf
    /// below it, in tree order. Skipped nodes are left out.
    pub fn arrange(&self, root: NodeId, rect: Xyhw, header: i32) -> Vec<(WindowHandle, Xyhw)> {
        let mut out = vec![];
        self.arrange_node(root, rect, header, &mut out);
        out
    }

    fn arrange_node(
        &self,
        id: NodeId,
        rect: Xyhw,
        header: i32,
        out: &mut Vec<(WindowHandle, Xyhw)>,
    ) {
        let Some(node) = self.nodes.get(id.0) else {
            return;
        };
        match &node.kind {
            NodeKind::Leaf(window) => out.push((*window, rect)),
            NodeKind::Container {
                orientation,
                children,
            } => {
                let tiled: Vec<&Node> = children
                    .iter()
                    .filter_map(|c| self.nodes.get(c.0))
                    .filter(|n| !n.skip)
                    .collect();
                let sizings: Vec<Sizing> = tiled.iter().map(|n| n.sizing).collect();
                let major = match orientation {
                    Orientation::Horizontal => rect.w,
                    Orientation::Vertical => rect.h,
                };
                let sizes = split(major, &sizings, *orientation, header);
                let ids = children
                    .iter()
                    .filter(|c| self.nodes.get(c.0).is_some_and(|n| !n.skip));
                let mut offset = 0;
                for ((child, size), sizing) in ids.zip(sizes).zip(sizings) {
                    let child_rect = match orientation {
                        Orientation::Horizontal => Xyhw {
                            x: rect.x + offset,
                            y: rect.y,
                            w: size,
                            h: if sizing == Sizing::Collapsed {
                                header.min(rect.h)
                            } else {
                                rect.h
                            },
                        },
                        Orientation::Vertical => Xyhw {
                            x: rect.x,
                            y: rect.y + offset,
                            w: rect.w,
                            h: size,
                        },
                    };
                    offset += size;
                    self.arrange_node(*child, child_rect, header, out);
                }
            }
        }
    }
}

/// Sizes of each child along the major axis. The sizes always add up to
/// exactly `major`; rounding leftovers go to the last child.
#[must_use]
pub fn split(major: i32, sizings: &[Sizing], orientation: Orientation, header: i32) -> Vec<i32> {
    if sizings.is_empty() {
        return vec![];
    }
    let major = major.max(0);
    let single = sizings.len() == 1;
    let mut left = major;
    let mut sizes: Vec<Option<i32>> = sizings
        .iter()
        .map(|sizing| match sizing {
            Sizing::Weighted(percent) if !single => {
                let want = major * i32::from((*percent).min(100)) / 100;
                let size = want.min(left);
                left -= size;
                Some(size)
            }
            // Collapsing only shortens the height.
            Sizing::Collapsed if orientation == Orientation::Vertical => {
                let size = header.max(0).min(left);
                left -= size;
                Some(size)
            }
            _ => None,
        })
        .collect();
    let plain = sizes.iter().filter(|s| s.is_none()).count() as i32;
    let share = if plain > 0 { left / plain } else { 0 };
    for size in &mut sizes {
        size.get_or_insert(share);
    }
    let mut sizes: Vec<i32> = sizes.into_iter().flatten().collect();
    let used: i32 = sizes.iter().sum();
    if let Some(last) = sizes.last_mut() {
        *last += major - used;
    }
    sizes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn horizontal(children: &[Sizing], rect: Xyhw) -> Vec<Xyhw> {
        let mut tree = TileTree::new();
        let root = tree.add_container(None, Orientation::Horizontal, Sizing::Plain);
        for (i, sizing) in children.iter().enumerate() {
            tree.add_leaf(root, WindowHandle(i as u64), *sizing, false);
        }
        tree.arrange(root, rect, 16)
            .into_iter()
            .map(|(_, r)| r)
            .collect()
    }

    #[test]
    fn three_plain_children_split_evenly() {
        let rects = horizontal(&[Sizing::Plain; 3], Xyhw::new(0, 0, 300, 100));
        let widths: Vec<i32> = rects.iter().map(|r| r.w).collect();
        assert_eq!(widths, vec![100, 100, 100]);
        let xs: Vec<i32> = rects.iter().map(|r| r.x).collect();
        assert_eq!(xs, vec![0, 100, 200]);
        assert!(rects.iter().all(|r| r.h == 100));
    }

    #[test]
    fn rounding_leftover_goes_to_the_last_child() {
        let rects = horizontal(&[Sizing::Plain; 3], Xyhw::new(0, 0, 301, 100));
        let widths: Vec<i32> = rects.iter().map(|r| r.w).collect();
        assert_eq!(widths, vec![100, 100, 101]);
    }

    #[test]
    fn single_weighted_child_fills_the_container() {
        let rects = horizontal(&[Sizing::Weighted(30)], Xyhw::new(0, 0, 300, 100));
        assert_eq!(rects, vec![Xyhw::new(0, 0, 300, 100)]);
    }

    #[test]
    fn weighted_children_take_their_percentage() {
        let sizes = split(
            400,
            &[Sizing::Weighted(50), Sizing::Plain, Sizing::Plain],
            Orientation::Horizontal,
            16,
        );
        assert_eq!(sizes, vec![200, 100, 100]);
    }

    #[test]
    fn collapsed_children_shrink_to_the_header_when_stacked() {
        let sizes = split(
            300,
            &[Sizing::Collapsed, Sizing::Plain, Sizing::Plain],
            Orientation::Vertical,
            20,
        );
        assert_eq!(sizes, vec![20, 140, 140]);
    }

    #[test]
    fn collapsed_children_side_by_side_keep_a_share_of_the_width() {
        let rects = horizontal(
            &[Sizing::Collapsed, Sizing::Plain],
            Xyhw::new(0, 0, 200, 100),
        );
        assert_eq!(rects[0], Xyhw::new(0, 0, 100, 16));
        assert_eq!(rects[1], Xyhw::new(100, 0, 100, 100));
    }

    #[test]
    fn skipped_children_are_not_laid_out() {
        let mut tree = TileTree::new();
        let root = tree.add_container(None, Orientation::Horizontal, Sizing::Plain);
        tree.add_leaf(root, WindowHandle(1), Sizing::Plain, false);
        tree.add_leaf(root, WindowHandle(2), Sizing::Plain, true);
        tree.add_leaf(root, WindowHandle(3), Sizing::Plain, false);
        let out = tree.arrange(root, Xyhw::new(0, 0, 200, 50), 16);
        assert_eq!(
            out,
            vec![
                (WindowHandle(1), Xyhw::new(0, 0, 100, 50)),
                (WindowHandle(3), Xyhw::new(100, 0, 100, 50)),
            ]
        );
    }

    #[test]
    fn nested_containers_are_arranged_recursively() {
        let mut tree = TileTree::new();
        let root = tree.add_container(None, Orientation::Horizontal, Sizing::Plain);
        tree.add_leaf(root, WindowHandle(1), Sizing::Plain, false);
        let column = tree.add_container(Some(root), Orientation::Vertical, Sizing::Plain);
        tree.add_leaf(column, WindowHandle(2), Sizing::Plain, false);
        tree.add_leaf(column, WindowHandle(3), Sizing::Plain, false);
        let out = tree.arrange(root, Xyhw::new(0, 0, 200, 101), 16);
        assert_eq!(
            out,
            vec![
                (WindowHandle(1), Xyhw::new(0, 0, 100, 101)),
                (WindowHandle(2), Xyhw::new(100, 0, 100, 50)),
                (WindowHandle(3), Xyhw::new(100, 50, 100, 51)),
            ]
        );
    }

    #[test]
    fn sizes_always_sum_to_the_container() {
        let mixes: [&[Sizing]; 6] = [
            &[Sizing::Plain],
            &[Sizing::Weighted(99)],
            &[Sizing::Weighted(70), Sizing::Weighted(70), Sizing::Plain],
            &[Sizing::Collapsed, Sizing::Collapsed, Sizing::Weighted(33)],
            &[Sizing::Plain, Sizing::Weighted(10), Sizing::Collapsed, Sizing::Plain],
            &[Sizing::Collapsed; 5],
        ];
        for sizings in mixes {
            for major in [0, 1, 7, 99, 300, 301, 1279, 1920] {
                for orientation in [Orientation::Horizontal, Orientation::Vertical] {
                    let sizes = split(major, sizings, orientation, 18);
                    assert_eq!(sizes.len(), sizings.len());
                    assert_eq!(sizes.iter().sum::<i32>(), major, "{sizings:?} in {major}");
                    assert!(sizes.iter().all(|s| *s >= 0), "{sizings:?} in {major}");
                }
            }
        }
    }
}
