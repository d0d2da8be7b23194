use core::fmt;
use core::str::FromStr;

use crate::error::BlackwoodError;
use crate::node::NodeIndex;
use crate::tree::Blackwood;

/// Order in which [`Blackwood::traverse`] visits nodes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum TraversalOrder {
    /// Left subtree, node, right subtree. Yields keys in ascending order.
    #[default]
    InOrder,
    /// Node, left subtree, right subtree.
    PreOrder,
    /// Left subtree, right subtree, node.
    PostOrder,
}

impl FromStr for TraversalOrder {
    type Err = BlackwoodError;

    fn from_str(mode: &str) -> Result<Self, Self::Err> {
        match mode {
            "in-order" => Ok(TraversalOrder::InOrder),
            "pre-order" => Ok(TraversalOrder::PreOrder),
            "post-order" => Ok(TraversalOrder::PostOrder),
            _ => Err(BlackwoodError::InvalidInput(format!(
                "unknown traversal mode `{mode}`"
            ))),
        }
    }
}

impl fmt::Display for TraversalOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraversalOrder::InOrder => f.write_str("in-order"),
            TraversalOrder::PreOrder => f.write_str("pre-order"),
            TraversalOrder::PostOrder => f.write_str("post-order"),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Step {
    Descend(NodeIndex),
    Emit(NodeIndex),
}

/// Read-only walk over a tree in one [`TraversalOrder`].
///
/// Cloning a traversal gives an independent cursor at the same position.
#[derive(Debug)]
pub struct Traversal<'a, K: Ord, V> {
    tree: &'a Blackwood<K, V>,
    order: TraversalOrder,
    stack: Vec<Step>,
}

impl<K: Ord, V> Traversal<'_, K, V> {
    pub fn order(&self) -> TraversalOrder {
        self.order
    }
}

impl<K: Ord, V> Clone for Traversal<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree,
            order: self.order,
            stack: self.stack.clone(),
        }
    }
}

impl<'a, K: Ord, V> Iterator for Traversal<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let tree = self.tree;

        while let Some(step) = self.stack.pop() {
            match step {
                Step::Emit(idx) => {
                    let node = tree.node(idx);
                    return Some((&node.key, &node.value));
                }
                Step::Descend(idx) => {
                    let node = tree.node(idx);
                    let left = node.left.map(Step::Descend);
                    let right = node.right.map(Step::Descend);
                    let here = Some(Step::Emit(idx));

                    let steps = match self.order {
                        TraversalOrder::InOrder => [left, here, right],
                        TraversalOrder::PreOrder => [here, left, right],
                        TraversalOrder::PostOrder => [left, right, here],
                    };
                    self.stack.extend(steps.into_iter().rev().flatten());
                }
            }
        }

        None
    }
}

impl<K: Ord, V> Blackwood<K, V> {
    pub fn traverse(&self, order: TraversalOrder) -> Traversal<'_, K, V> {
        Traversal {
            tree: self,
            order,
            stack: self.root.map(Step::Descend).into_iter().collect(),
        }
    }

    pub fn keys(&self, order: TraversalOrder) -> impl Iterator<Item = &K> + Clone + '_ {
        self.traverse(order).map(|(key, _)| key)
    }

    /// Entries in ascending key order.
    pub fn iter(&self) -> Traversal<'_, K, V> {
        self.traverse(TraversalOrder::InOrder)
    }
}

impl<K: Ord + fmt::Display, V> Blackwood<K, V> {
    /// Keys joined by `", "` in the order named by `mode` (`in-order`, `pre-order` or
    /// `post-order`). An unknown mode renders as the empty string.
    pub fn render(&self, mode: &str) -> String {
        match mode.parse::<TraversalOrder>() {
            Ok(order) => self.render_order(order),
            Err(_) => String::new(),
        }
    }

    pub fn render_order(&self, order: TraversalOrder) -> String {
        self.keys(order)
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl<'a, K: Ord, V> IntoIterator for &'a Blackwood<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Traversal<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
