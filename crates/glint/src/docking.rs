//! Dock-node registry, compiled under the `docking` feature
//!
//! A minimal docking surface: a tree of nodes subdividing the display into
//! rectangles by ratio splits. Interactive drag-docking belongs to the
//! widget layer above this crate; what lives here is the registry, its
//! layout pass, and the C-visible handles, which is the surface that
//! distinguishes the docking build variant.

use slotmap::{Key, KeyData, SlotMap};

slotmap::new_key_type! {
    struct DockNodeKey;
}

/// Opaque 64-bit dock-node handle; the zero value names no node.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DockNodeId(u64);

impl DockNodeId {
    /// The "no node" sentinel.
    #[must_use]
    pub const fn null() -> Self {
        Self(0)
    }

    /// Rebuilds an id from its raw value.
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw value for the C boundary.
    #[must_use]
    pub const fn to_raw(self) -> u64 {
        self.0
    }

    fn key(self) -> DockNodeKey {
        DockNodeKey::from(KeyData::from_ffi(self.0))
    }

    fn from_key(key: DockNodeKey) -> Self {
        Self(key.data().as_ffi())
    }
}

/// Side of the parent rectangle the first child of a split occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum SplitDirection {
    /// First child takes the left side.
    Left,
    /// First child takes the right side.
    Right,
    /// First child takes the top side.
    Up,
    /// First child takes the bottom side.
    Down,
}

impl SplitDirection {
    /// Looks up a direction by its C value.
    #[must_use]
    pub fn from_index(index: u32) -> Option<Self> {
        match index {
            0 => Some(Self::Left),
            1 => Some(Self::Right),
            2 => Some(Self::Up),
            3 => Some(Self::Down),
            _ => None,
        }
    }
}

/// Result type for dock operations.
pub type DockResult<T> = Result<T, DockError>;

/// Errors from dock-node operations.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum DockError {
    /// The id names no live node.
    #[error("Unknown dock node")]
    UnknownNode,

    /// The node already has children.
    #[error("Dock node is already split")]
    AlreadySplit,

    /// Ratio outside the open interval (0, 1).
    #[error("Invalid split ratio {0}")]
    InvalidRatio(f32),
}

struct DockNode {
    rect: [f32; 4],
    split: Option<Split>,
}

struct Split {
    direction: SplitDirection,
    ratio: f32,
    children: [DockNodeKey; 2],
}

/// Tree of dock nodes laid out over the display.
///
/// The root covers the whole display; the layout pass at the start of each
/// frame propagates the current display size through every split.
pub struct DockSpace {
    nodes: SlotMap<DockNodeKey, DockNode>,
    root: Option<DockNodeKey>,
    display_size: [f32; 2],
}

impl Default for DockSpace {
    fn default() -> Self {
        Self::new()
    }
}

impl DockSpace {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            root: None,
            display_size: [0.0, 0.0],
        }
    }

    /// Returns the root node covering the display, creating it on first
    /// use.
    pub fn dock_space(&mut self) -> DockNodeId {
        let key = match self.root {
            Some(key) => key,
            None => {
                let rect = [0.0, 0.0, self.display_size[0], self.display_size[1]];
                let key = self.nodes.insert(DockNode { rect, split: None });
                self.root = Some(key);
                log::debug!("Dock space created");
                key
            }
        };
        DockNodeId::from_key(key)
    }

    /// Splits a leaf node in two. The first returned id is the child on
    /// the `direction` side, sized by `ratio` of the parent.
    pub fn split_node(
        &mut self,
        id: DockNodeId,
        direction: SplitDirection,
        ratio: f32,
    ) -> DockResult<(DockNodeId, DockNodeId)> {
        if !(ratio > 0.0 && ratio < 1.0) {
            return Err(DockError::InvalidRatio(ratio));
        }
        let parent_rect = {
            let node = self.nodes.get(id.key()).ok_or(DockError::UnknownNode)?;
            if node.split.is_some() {
                return Err(DockError::AlreadySplit);
            }
            node.rect
        };

        let (first, second) = split_rect(parent_rect, direction, ratio);
        let a = self.nodes.insert(DockNode { rect: first, split: None });
        let b = self.nodes.insert(DockNode { rect: second, split: None });
        self.nodes[id.key()].split = Some(Split {
            direction,
            ratio,
            children: [a, b],
        });
        Ok((DockNodeId::from_key(a), DockNodeId::from_key(b)))
    }

    /// Removes a node's children (and their subtrees), making it a leaf
    /// again.
    pub fn collapse(&mut self, id: DockNodeId) -> DockResult<()> {
        let node = self.nodes.get_mut(id.key()).ok_or(DockError::UnknownNode)?;
        let Some(split) = node.split.take() else {
            return Ok(());
        };
        let mut pending = vec![split.children[0], split.children[1]];
        while let Some(key) = pending.pop() {
            if let Some(child) = self.nodes.remove(key) {
                if let Some(split) = child.split {
                    pending.extend_from_slice(&split.children);
                }
            }
        }
        Ok(())
    }

    /// Rectangle of a node, `[min_x, min_y, max_x, max_y]` in screen
    /// coordinates.
    #[must_use]
    pub fn node_rect(&self, id: DockNodeId) -> Option<[f32; 4]> {
        self.nodes.get(id.key()).map(|node| node.rect)
    }

    /// Number of live nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Propagates the display size through the tree; runs when a frame
    /// begins.
    pub(crate) fn update(&mut self, display_size: [f32; 2]) {
        self.display_size = display_size;
        let Some(root) = self.root else { return };
        let mut pending = vec![(root, [0.0, 0.0, display_size[0], display_size[1]])];
        while let Some((key, rect)) = pending.pop() {
            let Some(node) = self.nodes.get_mut(key) else { continue };
            node.rect = rect;
            if let Some(split) = &node.split {
                let (first, second) = split_rect(rect, split.direction, split.ratio);
                pending.push((split.children[0], first));
                pending.push((split.children[1], second));
            }
        }
    }
}

fn split_rect(rect: [f32; 4], direction: SplitDirection, ratio: f32) -> ([f32; 4], [f32; 4]) {
    let [x0, y0, x1, y1] = rect;
    match direction {
        SplitDirection::Left => {
            let mid = x0 + (x1 - x0) * ratio;
            ([x0, y0, mid, y1], [mid, y0, x1, y1])
        }
        SplitDirection::Right => {
            let mid = x1 - (x1 - x0) * ratio;
            ([mid, y0, x1, y1], [x0, y0, mid, y1])
        }
        SplitDirection::Up => {
            let mid = y0 + (y1 - y0) * ratio;
            ([x0, y0, x1, mid], [x0, mid, x1, y1])
        }
        SplitDirection::Down => {
            let mid = y1 - (y1 - y0) * ratio;
            ([x0, mid, x1, y1], [x0, y0, x1, mid])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn space_800x600() -> DockSpace {
        let mut space = DockSpace::new();
        space.update([800.0, 600.0]);
        space
    }

    #[test]
    fn test_root_covers_display() {
        let mut space = space_800x600();
        let root = space.dock_space();
        assert_eq!(space.node_rect(root), Some([0.0, 0.0, 800.0, 600.0]));
        // Repeated calls return the same node.
        assert_eq!(space.dock_space(), root);
        assert_eq!(space.node_count(), 1);
    }

    #[test]
    fn test_split_left_divides_by_ratio() {
        let mut space = space_800x600();
        let root = space.dock_space();
        let (left, rest) = space.split_node(root, SplitDirection::Left, 0.25).unwrap();
        assert_eq!(space.node_rect(left), Some([0.0, 0.0, 200.0, 600.0]));
        assert_eq!(space.node_rect(rest), Some([200.0, 0.0, 800.0, 600.0]));
        assert_eq!(space.node_count(), 3);
    }

    #[test]
    fn test_split_down_takes_bottom_side() {
        let mut space = space_800x600();
        let root = space.dock_space();
        let (bottom, top) = space.split_node(root, SplitDirection::Down, 0.5).unwrap();
        assert_eq!(space.node_rect(bottom), Some([0.0, 300.0, 800.0, 600.0]));
        assert_eq!(space.node_rect(top), Some([0.0, 0.0, 800.0, 300.0]));
    }

    #[test]
    fn test_layout_follows_display_resize() {
        let mut space = space_800x600();
        let root = space.dock_space();
        let (left, _) = space.split_node(root, SplitDirection::Left, 0.5).unwrap();
        space.update([400.0, 300.0]);
        assert_eq!(space.node_rect(root), Some([0.0, 0.0, 400.0, 300.0]));
        assert_eq!(space.node_rect(left), Some([0.0, 0.0, 200.0, 300.0]));
    }

    #[test]
    fn test_double_split_is_rejected() {
        let mut space = space_800x600();
        let root = space.dock_space();
        space.split_node(root, SplitDirection::Left, 0.5).unwrap();
        assert_eq!(
            space.split_node(root, SplitDirection::Up, 0.5),
            Err(DockError::AlreadySplit)
        );
    }

    #[test]
    fn test_invalid_ratio_is_rejected() {
        let mut space = space_800x600();
        let root = space.dock_space();
        assert_eq!(
            space.split_node(root, SplitDirection::Left, 0.0),
            Err(DockError::InvalidRatio(0.0))
        );
        assert_eq!(
            space.split_node(root, SplitDirection::Left, 1.5),
            Err(DockError::InvalidRatio(1.5))
        );
    }

    #[test]
    fn test_collapse_removes_subtree() {
        let mut space = space_800x600();
        let root = space.dock_space();
        let (left, _) = space.split_node(root, SplitDirection::Left, 0.5).unwrap();
        space.split_node(left, SplitDirection::Up, 0.5).unwrap();
        assert_eq!(space.node_count(), 5);

        space.collapse(root).unwrap();
        assert_eq!(space.node_count(), 1);
        assert_eq!(space.node_rect(left), None);
        // Collapsing a leaf is a no-op.
        space.collapse(root).unwrap();
    }

    #[test]
    fn test_stale_id_reports_unknown() {
        let mut space = space_800x600();
        let root = space.dock_space();
        let (left, _) = space.split_node(root, SplitDirection::Left, 0.5).unwrap();
        space.collapse(root).unwrap();
        assert_eq!(
            space.split_node(left, SplitDirection::Up, 0.5),
            Err(DockError::UnknownNode)
        );
        assert_eq!(space.node_rect(DockNodeId::null()), None);
    }
}
