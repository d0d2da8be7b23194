use crate::error::{BlackwoodError, InvariantViolation};
use crate::node::{Link, NodeIndex};
use crate::tree::Blackwood;

/// Shape summary produced by a successful [`Blackwood::validate`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TreeStats {
    /// Nodes reachable from the root.
    pub len: usize,
    /// Black nodes on every path from the root down to an absent link, root included.
    pub black_height: usize,
    /// Nodes on the longest root-to-leaf path.
    pub depth: usize,
}

struct Walk<'k, K> {
    lower: Option<&'k K>,
    upper: Option<&'k K>,
    depth: usize,
}

impl<K: Ord, V> Blackwood<K, V> {
    /// Walks the whole tree and checks search order, parent links, node count and the
    /// red-black coloring rules.
    pub fn validate(&self) -> Result<TreeStats, BlackwoodError> {
        let mut stats = TreeStats::default();

        if let Some(root) = self.root {
            let node = self.node(root);
            if node.color.is_red() {
                return Err(InvariantViolation::RedRoot(root.get()).into());
            }
            if node.parent.is_some() {
                return Err(InvariantViolation::ParentLink {
                    child: root.get(),
                    expected: None,
                }
                .into());
            }
        }

        let walk = Walk {
            lower: None,
            upper: None,
            depth: 1,
        };
        stats.black_height = self.validate_subtree(self.root, walk, &mut stats)?;

        if stats.len != self.len() {
            return Err(InvariantViolation::SizeMismatch {
                recorded: self.len(),
                reachable: stats.len,
            }
            .into());
        }

        Ok(stats)
    }

    /// Returns the black height of the subtree at `link`.
    fn validate_subtree(
        &self,
        link: Link,
        walk: Walk<'_, K>,
        stats: &mut TreeStats,
    ) -> Result<usize, InvariantViolation> {
        let Some(idx) = link else {
            return Ok(0);
        };
        let node = self.node(idx);

        stats.len += 1;
        stats.depth = stats.depth.max(walk.depth);

        let below_lower = walk.lower.is_some_and(|lower| node.key <= *lower);
        let above_upper = walk.upper.is_some_and(|upper| node.key >= *upper);
        if below_lower || above_upper {
            return Err(InvariantViolation::Ordering(idx.get()));
        }

        for child in [node.left, node.right].into_iter().flatten() {
            self.validate_link(idx, child)?;
        }

        let left = self.validate_subtree(
            node.left,
            Walk {
                lower: walk.lower,
                upper: Some(&node.key),
                depth: walk.depth + 1,
            },
            stats,
        )?;
        let right = self.validate_subtree(
            node.right,
            Walk {
                lower: Some(&node.key),
                upper: walk.upper,
                depth: walk.depth + 1,
            },
            stats,
        )?;

        if left != right {
            return Err(InvariantViolation::BlackHeight {
                node: idx.get(),
                left,
                right,
            });
        }

        Ok(left + usize::from(node.color.is_black()))
    }

    fn validate_link(&self, parent: NodeIndex, child: NodeIndex) -> Result<(), InvariantViolation> {
        let child_node = self.node(child);

        if child_node.parent != Some(parent) {
            return Err(InvariantViolation::ParentLink {
                child: child.get(),
                expected: Some(parent.get()),
            });
        }
        if self.node(parent).color.is_red() && child_node.color.is_red() {
            return Err(InvariantViolation::RedRed {
                parent: parent.get(),
                child: child.get(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeColor;

    fn ascending(count: u32) -> Blackwood<u32, ()> {
        let mut tree = Blackwood::new();
        for key in 1..=count {
            tree.insert(key, ()).unwrap();
        }
        tree
    }

    #[test]
    pub fn empty_tree_is_valid() {
        let stats = Blackwood::<u8, ()>::new().validate().unwrap();

        assert_eq!(stats, TreeStats::default());
    }

    #[test]
    pub fn seven_ascending_keys() {
        let stats = ascending(7).validate().unwrap();

        assert_eq!(stats.len, 7);
        assert_eq!(stats.black_height, 2);
        assert!(stats.depth <= 4);
    }

    #[test]
    pub fn height_stays_logarithmic() {
        let stats = ascending(1024).validate().unwrap();

        // 2 * log2(n + 1)
        assert!(stats.depth <= 20, "depth {} too large", stats.depth);
    }

    #[test]
    pub fn detects_red_root() {
        let mut tree = ascending(3);
        let root = tree.root_index().unwrap();
        tree.set_color(root, NodeColor::Red);

        assert_eq!(
            tree.validate(),
            Err(BlackwoodError::Invariant(InvariantViolation::RedRoot(root.get())))
        );
    }

    #[test]
    pub fn detects_red_red_pair() {
        // 2B(1B, 3B(_, 4R))
        let mut tree = ascending(4);
        let three = tree.find_node(&3).unwrap();
        let four = tree.find_node(&4).unwrap();
        tree.set_color(three, NodeColor::Red);

        assert!(matches!(
            tree.validate(),
            Err(BlackwoodError::Invariant(InvariantViolation::RedRed { parent, child }))
                if parent == three.get() && child == four.get()
        ));
    }

    #[test]
    pub fn detects_uneven_black_height() {
        let mut tree = ascending(4);
        let four = tree.find_node(&4).unwrap();
        tree.set_color(four, NodeColor::Black);

        assert!(matches!(
            tree.validate(),
            Err(BlackwoodError::Invariant(InvariantViolation::BlackHeight { .. }))
        ));
    }
}
