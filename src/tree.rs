use core::cmp::Ordering;
use core::mem;

use log::{debug, trace};

use crate::config::{BlackwoodConfig, DuplicatePolicy};
use crate::error::BlackwoodError;
use crate::node::{BlackwoodNode, Direction, Link, NodeColor, NodeIndex};

/*
vacated arena slots go on a free list and are handed out again by the next insert. handles into the
arena are only valid until the next mutation.
*/

/// Ordered key-value storage backed by a Red-Black Tree.
///
/// Nodes live in a single arena and refer to each other through [`NodeIndex`] handles. Every
/// missing child, and the parent of the root, is the absent link `None`, which is treated as
/// a black leaf by all balancing code.
#[derive(Debug)]
pub struct Blackwood<K: Ord, V> {
    storage: Vec<Option<BlackwoodNode<K, V>>>,
    free: Vec<NodeIndex>,
    pub(crate) root: Link,
    len: usize,
    config: BlackwoodConfig,
}

impl<K: Ord, V> Blackwood<K, V> {
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(BlackwoodConfig::default())
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_config(BlackwoodConfig::new().initial_capacity(capacity))
    }

    #[must_use]
    pub fn with_config(config: BlackwoodConfig) -> Self {
        Self {
            storage: Vec::with_capacity(config.initial_capacity),
            free: Vec::new(),
            root: None,
            len: 0,
            config,
        }
    }

    pub fn config(&self) -> &BlackwoodConfig {
        &self.config
    }

    /// Reserves room for at least `additional` more nodes.
    pub fn reserve(&mut self, additional: usize) {
        self.storage.reserve(additional.saturating_sub(self.free.len()));
    }

    pub fn clear(&mut self) {
        self.storage.clear();
        self.free.clear();
        self.root = None;
        self.len = 0;
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn root_index(&self) -> Option<NodeIndex> {
        self.root
    }

    pub fn key(&self, idx: NodeIndex) -> &K {
        &self.node(idx).key
    }

    pub fn value(&self, idx: NodeIndex) -> &V {
        &self.node(idx).value
    }

    pub fn color(&self, idx: NodeIndex) -> NodeColor {
        self.node(idx).color
    }

    pub fn left(&self, idx: NodeIndex) -> Option<NodeIndex> {
        self.node(idx).left
    }

    pub fn right(&self, idx: NodeIndex) -> Option<NodeIndex> {
        self.node(idx).right
    }

    pub fn parent(&self, idx: NodeIndex) -> Option<NodeIndex> {
        self.node(idx).parent
    }

    /// Returns the handle of the node holding `key`.
    pub fn find_node(&self, key: &K) -> Option<NodeIndex> {
        let mut current_node = self.root;

        while let Some(idx) = current_node {
            let curr_node_storage = self.node(idx);

            match key.cmp(&curr_node_storage.key) {
                Ordering::Less => {
                    current_node = curr_node_storage.left;
                }
                Ordering::Equal => {
                    return Some(idx);
                }
                Ordering::Greater => {
                    current_node = curr_node_storage.right;
                }
            }
        }

        None
    }

    pub fn find(&self, key: &K) -> Option<&V> {
        self.find_node(key).map(|idx| &self.node(idx).value)
    }

    pub fn find_mut(&mut self, key: &K) -> Option<&mut V> {
        let idx = self.find_node(key)?;
        Some(&mut self.node_mut(idx).value)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.find_node(key).is_some()
    }

    /// Returns the entry following `key` in key order, if `key` is stored and is not the
    /// largest key.
    pub fn successor(&self, key: &K) -> Option<(&K, &V)> {
        let idx = self.find_node(key)?;
        let next = self.successor_of(idx)?;
        let node = self.node(next);

        Some((&node.key, &node.value))
    }

    /// In-order successor of the node at `idx`: the minimum of its right subtree, or else the
    /// nearest ancestor whose left subtree contains it.
    pub fn successor_of(&self, idx: NodeIndex) -> Option<NodeIndex> {
        if let Some(right) = self.node(idx).right {
            return Some(self.leftmost(right));
        }

        let mut current = idx;
        let mut parent = self.node(idx).parent;
        while let Some(parent_idx) = parent {
            if self.node(parent_idx).left == Some(current) {
                return Some(parent_idx);
            }
            current = parent_idx;
            parent = self.node(parent_idx).parent;
        }

        None
    }

    /// Inserts `value` under `key`.
    ///
    /// Returns `Ok(None)` when a new node was created. When `key` is already present the
    /// configured [`DuplicatePolicy`] applies: `Reject` fails with
    /// [`BlackwoodError::DuplicateKey`] and leaves the tree untouched, `Replace` swaps the
    /// stored value and returns the previous one.
    pub fn insert(&mut self, key: K, value: V) -> Result<Option<V>, BlackwoodError> {
        let mut current_node = self.root;
        let mut parent_node = None;
        let mut side = Direction::Left;

        while let Some(idx) = current_node {
            parent_node = Some(idx);
            let curr_node_storage = self.node(idx);

            match key.cmp(&curr_node_storage.key) {
                Ordering::Less => {
                    side = Direction::Left;
                    current_node = curr_node_storage.left;
                }
                Ordering::Greater => {
                    side = Direction::Right;
                    current_node = curr_node_storage.right;
                }
                Ordering::Equal => return self.insert_duplicate(idx, value),
            }
        }

        let new_node_pos = self.allocate(BlackwoodNode::new_isolated(key, value));
        self.node_mut(new_node_pos).parent = parent_node;

        match parent_node {
            Some(parent_idx) => self.node_mut(parent_idx).set_child(side, Some(new_node_pos)),
            None => self.root = Some(new_node_pos),
        }
        self.len += 1;

        self.fix_red_violation(new_node_pos);

        Ok(None)
    }

    fn insert_duplicate(&mut self, idx: NodeIndex, value: V) -> Result<Option<V>, BlackwoodError> {
        match self.config.duplicates {
            DuplicatePolicy::Reject => {
                debug!("rejecting insert of a key already held by node {}", idx.0);
                Err(BlackwoodError::DuplicateKey)
            }
            DuplicatePolicy::Replace => Ok(Some(mem::replace(&mut self.node_mut(idx).value, value))),
        }
    }

    /// Removes `key` and returns its value, or [`BlackwoodError::KeyNotFound`] without touching
    /// the tree.
    pub fn delete(&mut self, key: &K) -> Result<V, BlackwoodError> {
        let Some(target) = self.find_node(key) else {
            debug!("delete of a key that is not in the tree");
            return Err(BlackwoodError::KeyNotFound);
        };

        let target_node = self.node(target);
        let doomed = match (target_node.left, target_node.right) {
            (Some(_), Some(right)) => {
                // the successor's entry moves up into target; the successor's node goes away
                let successor = self.leftmost(right);
                self.swap_entries(target, successor);
                successor
            }
            _ => target,
        };

        let value = self.unlink(doomed);
        self.len -= 1;

        Ok(value)
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.delete(key).ok()
    }

    /// Structurally removes a node with at most one child and returns the value it held.
    fn unlink(&mut self, doomed: NodeIndex) -> V {
        let doomed_node = self.node(doomed);
        let original_color = doomed_node.color;
        let only_child = doomed_node.left.or(doomed_node.right);

        let (x, x_parent, value) = match only_child {
            Some(child) => {
                // absorb the child into `doomed` so the parent's link stays as is
                let absorbed = self.release(child);
                for grandchild in [absorbed.left, absorbed.right].into_iter().flatten() {
                    self.node_mut(grandchild).parent = Some(doomed);
                }

                let node = self.node_mut(doomed);
                let value = mem::replace(&mut node.value, absorbed.value);
                node.key = absorbed.key;
                node.color = absorbed.color;
                node.left = absorbed.left;
                node.right = absorbed.right;

                (Some(doomed), node.parent, value)
            }
            None => {
                let parent = doomed_node.parent;
                match parent {
                    Some(parent_idx) => {
                        let side = self.side_of(Some(doomed), parent_idx);
                        self.node_mut(parent_idx).set_child(side, None);
                    }
                    None => self.root = None,
                }

                (None, parent, self.release(doomed).value)
            }
        };

        if original_color.is_black() && self.root.is_some() {
            self.fix_black_violation(x, x_parent);
        }

        value
    }

    fn fix_red_violation(&mut self, start_node_idx: NodeIndex) {
        let mut curr_node = start_node_idx;

        loop {
            let Some(mut parent_idx) = self.node(curr_node).parent else {
                break;
            };
            if self.node(parent_idx).color.is_black() {
                break;
            }
            let Some(grandparent_idx) = self.node(parent_idx).parent else {
                self.set_color(parent_idx, NodeColor::Black);
                break;
            };

            let side = self.side_of(Some(parent_idx), grandparent_idx);
            let uncle = self.child(grandparent_idx, side.opposite());

            if let Some(uncle_idx) = uncle.filter(|&u| self.node(u).color.is_red()) {
                trace!("insert fixup: red uncle {}, recoloring", uncle_idx.0);
                self.set_color(parent_idx, NodeColor::Black);
                self.set_color(uncle_idx, NodeColor::Black);
                self.set_color(grandparent_idx, NodeColor::Red);

                curr_node = grandparent_idx;
                continue;
            }

            if self.child(parent_idx, side.opposite()) == Some(curr_node) {
                trace!("insert fixup: inner child {}, rotating parent", curr_node.0);
                self.rotate(parent_idx, side);
                mem::swap(&mut curr_node, &mut parent_idx);
            }

            trace!("insert fixup: outer child {}, rotating grandparent", curr_node.0);
            self.set_color(parent_idx, NodeColor::Black);
            self.set_color(grandparent_idx, NodeColor::Red);
            self.rotate(grandparent_idx, side.opposite());
        }

        if let Some(root) = self.root {
            self.set_color(root, NodeColor::Black);
        }
    }

    /// Restores black heights after a black node was removed above `x`. `x_parent` is
    /// carried separately because `x` may be the absent link.
    fn fix_black_violation(&mut self, mut x: Link, mut x_parent: Link) {
        while x != self.root && self.link_color(x).is_black() {
            let Some(parent_idx) = x_parent else {
                break;
            };
            let side = self.side_of(x, parent_idx);
            let mut sibling = self.sibling(parent_idx, side);

            if self.node(sibling).color.is_red() {
                trace!("delete fixup: red sibling {}", sibling.0);
                self.set_color(sibling, NodeColor::Black);
                self.set_color(parent_idx, NodeColor::Red);
                self.rotate(parent_idx, side);
                sibling = self.sibling(parent_idx, side);
            }

            let near = self.child(sibling, side);
            let far = self.child(sibling, side.opposite());

            if self.link_color(near).is_black() && self.link_color(far).is_black() {
                trace!("delete fixup: black sibling {} with black children", sibling.0);
                self.set_color(sibling, NodeColor::Red);
                x = Some(parent_idx);
                x_parent = self.node(parent_idx).parent;
                continue;
            }

            if self.link_color(far).is_black() {
                trace!("delete fixup: red near nephew under {}", sibling.0);
                if let Some(near_idx) = near {
                    self.set_color(near_idx, NodeColor::Black);
                }
                self.set_color(sibling, NodeColor::Red);
                self.rotate(sibling, side.opposite());
                sibling = self.sibling(parent_idx, side);
            }

            trace!("delete fixup: red far nephew under {}", sibling.0);
            let parent_color = self.node(parent_idx).color;
            self.set_color(sibling, parent_color);
            self.set_color(parent_idx, NodeColor::Black);
            if let Some(far_idx) = self.child(sibling, side.opposite()) {
                self.set_color(far_idx, NodeColor::Black);
            }
            self.rotate(parent_idx, side);

            x = self.root;
            x_parent = None;
        }

        if let Some(x_idx) = x {
            self.set_color(x_idx, NodeColor::Black);
        }
    }

    /// Promotes the child of `center` opposite to `dir` above it, moving `center` down on the
    /// `dir` side.
    fn rotate(&mut self, center: NodeIndex, dir: Direction) {
        let pivot = self.child(center, dir.opposite());
        debug_assert!(pivot.is_some(), "rotation of node {} around an absent child", center.0);
        let Some(pivot_idx) = pivot else {
            return;
        };
        trace!("rotating {:?} around node {}", dir, center.0);

        let grandparent_idx = self.node(center).parent;
        let transferred = self.child(pivot_idx, dir);

        self.node_mut(center).set_child(dir.opposite(), transferred);
        if let Some(transferred_idx) = transferred {
            self.node_mut(transferred_idx).parent = Some(center);
        }

        self.node_mut(pivot_idx).set_child(dir, Some(center));
        self.node_mut(center).parent = Some(pivot_idx);
        self.node_mut(pivot_idx).parent = grandparent_idx;

        match grandparent_idx {
            Some(gp) => {
                let side = self.side_of(Some(center), gp);
                self.node_mut(gp).set_child(side, Some(pivot_idx));
            }
            None => self.root = Some(pivot_idx),
        }
    }

    fn leftmost(&self, mut idx: NodeIndex) -> NodeIndex {
        while let Some(left) = self.node(idx).left {
            idx = left;
        }
        idx
    }

    /// Sibling of the child on `side` of `parent_idx`. A black child always has a real
    /// sibling in a tree with uniform black height.
    fn sibling(&self, parent_idx: NodeIndex, side: Direction) -> NodeIndex {
        match self.child(parent_idx, side.opposite()) {
            Some(sibling) => sibling,
            None => panic!(
                "node {} has no sibling subtree opposite a black child; black heights diverged",
                parent_idx.0
            ),
        }
    }

    /// Which side of `parent_idx` the link `child` hangs from. An absent `child` is matched
    /// against the absent slot.
    fn side_of(&self, child: Link, parent_idx: NodeIndex) -> Direction {
        if self.node(parent_idx).left == child {
            Direction::Left
        } else {
            Direction::Right
        }
    }

    fn child(&self, idx: NodeIndex, dir: Direction) -> Link {
        self.node(idx).child(dir)
    }

    pub(crate) fn link_color(&self, link: Link) -> NodeColor {
        link.map_or(NodeColor::Black, |idx| self.node(idx).color)
    }

    pub(crate) fn set_color(&mut self, idx: NodeIndex, color: NodeColor) {
        self.node_mut(idx).color = color;
    }

    fn swap_entries(&mut self, a: NodeIndex, b: NodeIndex) {
        let (low, high) = if a.0 < b.0 { (a.0, b.0) } else { (b.0, a.0) };
        assert_ne!(low, high, "cannot swap a node's entry with itself");

        let (head, tail) = self.storage.split_at_mut(high);
        match (head[low].as_mut(), tail[0].as_mut()) {
            (Some(first), Some(second)) => {
                mem::swap(&mut first.key, &mut second.key);
                mem::swap(&mut first.value, &mut second.value);
            }
            _ => panic!("swap between vacant arena slots {low} and {high}"),
        }
    }

    fn allocate(&mut self, node: BlackwoodNode<K, V>) -> NodeIndex {
        match self.free.pop() {
            Some(idx) => {
                self.storage[idx.0] = Some(node);
                idx
            }
            None => {
                self.storage.push(Some(node));
                NodeIndex(self.storage.len() - 1)
            }
        }
    }

    fn release(&mut self, idx: NodeIndex) -> BlackwoodNode<K, V> {
        match self.storage.get_mut(idx.0).and_then(Option::take) {
            Some(node) => {
                self.free.push(idx);
                node
            }
            None => panic!("release of vacant arena slot {}", idx.0),
        }
    }

    pub(crate) fn node(&self, idx: NodeIndex) -> &BlackwoodNode<K, V> {
        match self.storage.get(idx.0) {
            Some(Some(node)) => node,
            _ => panic!("node {} is not live in this tree", idx.0),
        }
    }

    fn node_mut(&mut self, idx: NodeIndex) -> &mut BlackwoodNode<K, V> {
        match self.storage.get_mut(idx.0) {
            Some(Some(node)) => node,
            _ => panic!("node {} is not live in this tree", idx.0),
        }
    }

    #[cfg(test)]
    pub(crate) fn arena_len(&self) -> usize {
        self.storage.len()
    }
}

impl<K: Ord, V> Default for Blackwood<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
