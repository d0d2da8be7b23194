//! Ordered key-value storage on a Red-Black Tree.
//!
//! [`Blackwood`] keeps its nodes in one arena and links them by index, with the absent link
//! standing in for the black sentinel leaf. Inserts and deletes rebalance before returning,
//! so lookups stay logarithmic.
//!
//! ```
//! use blackwood::{Blackwood, BlackwoodError, NodeColor};
//!
//! let mut tree = Blackwood::new();
//! for key in [10, 20, 30] {
//!     tree.insert(key, key.to_string()).unwrap();
//! }
//!
//! let root = tree.root_index().unwrap();
//! assert_eq!((*tree.key(root), tree.color(root)), (20, NodeColor::Black));
//! assert_eq!(tree.render("in-order"), "10, 20, 30");
//!
//! assert_eq!(tree.delete(&20).as_deref(), Ok("20"));
//! assert_eq!(tree.delete(&20), Err(BlackwoodError::KeyNotFound));
//! assert_eq!(tree.render("in-order"), "10, 30");
//! ```

mod config;
mod error;
mod node;
mod record;
mod traverse;
mod tree;
mod validate;

pub use config::{BlackwoodConfig, DuplicatePolicy};
pub use error::{BlackwoodError, InvariantViolation};
pub use node::{NodeColor, NodeIndex};
pub use record::{Record, RecordTree};
pub use traverse::{Traversal, TraversalOrder};
pub use tree::Blackwood;
pub use validate::TreeStats;
