use core::fmt;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum NodeColor {
    #[default]
    Red,
    Black,
}

impl NodeColor {
    pub fn is_red(self) -> bool {
        matches!(self, NodeColor::Red)
    }

    pub fn is_black(self) -> bool {
        matches!(self, NodeColor::Black)
    }
}

impl fmt::Display for NodeColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeColor::Red => f.write_str("red"),
            NodeColor::Black => f.write_str("black"),
        }
    }
}

/// Handle to a node stored in a [`Blackwood`](crate::Blackwood) arena.
///
/// Handles are only meaningful for the tree that produced them, and only until the next
/// mutating operation on that tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(pub(crate) usize);

impl NodeIndex {
    pub fn get(self) -> usize {
        self.0
    }
}

/// Side of a parent a child hangs from. Every fixup case is written once against a
/// `Direction` and its [`opposite`](Direction::opposite).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    Left,
    Right,
}

impl Direction {
    pub(crate) fn opposite(self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// A link to a child or parent. `None` is the absent marker: always black, never holding
/// a key or value.
pub(crate) type Link = Option<NodeIndex>;

#[derive(Debug)]
pub(crate) struct BlackwoodNode<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) color: NodeColor,
    pub(crate) parent: Link,
    pub(crate) left: Link,
    pub(crate) right: Link,
}

impl<K, V> BlackwoodNode<K, V> {
    pub(crate) fn new_isolated(key: K, value: V) -> Self {
        Self {
            key,
            value,
            color: NodeColor::default(),
            parent: None,
            left: None,
            right: None,
        }
    }

    pub(crate) fn child(&self, dir: Direction) -> Link {
        match dir {
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }

    pub(crate) fn set_child(&mut self, dir: Direction, link: Link) {
        match dir {
            Direction::Left => self.left = link,
            Direction::Right => self.right = link,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_nodes_are_red_and_detached() {
        let node = BlackwoodNode::new_isolated(4, "four");

        assert_eq!(node.color, NodeColor::Red);
        assert_eq!((node.parent, node.left, node.right), (None, None, None));
    }

    #[test]
    fn child_slots_follow_direction() {
        let mut node = BlackwoodNode::new_isolated(1, ());
        node.set_child(Direction::Left, Some(NodeIndex(3)));
        node.set_child(Direction::Left.opposite(), Some(NodeIndex(5)));

        assert_eq!(node.left, Some(NodeIndex(3)));
        assert_eq!(node.child(Direction::Right), Some(NodeIndex(5)));
    }
}
