//! Immutable views of the mirror.

mod debug_print;

use core::fmt;
use core::hash::{Hash, Hasher};
use core::slice;

use crate::node_ref::NodeRef;
use crate::path::Path;
use crate::trek;

pub use self::debug_print::DisplayTree;

/// Record of a node at the time a snapshot was taken.
///
/// Records compare and hash by path only.
#[derive(Debug, Clone)]
pub struct SnapshotNode<H> {
    /// Path from the root.
    path: Path,
    /// Human-readable description.
    description: String,
    /// Number of children, including dead ones.
    child_count: usize,
    /// Handle to the external node.
    node: H,
}

impl<H> SnapshotNode<H> {
    /// Creates a record.
    #[inline]
    #[must_use]
    pub(crate) fn new(path: Path, description: String, child_count: usize, node: H) -> Self {
        Self {
            path,
            description,
            child_count,
            node,
        }
    }

    /// Returns the path from the root.
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the description.
    #[inline]
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the number of children the node had.
    ///
    /// Dead children are counted since they still occupy sibling indices.
    #[inline]
    #[must_use]
    pub fn child_count(&self) -> usize {
        self.child_count
    }

    /// Returns the handle to the external node.
    #[inline]
    #[must_use]
    pub fn node(&self) -> &H {
        &self.node
    }

    /// Returns the length of the path.
    #[inline]
    #[must_use]
    pub fn depth(&self) -> usize {
        self.path.len()
    }

    /// Returns the signed distance from `other` to this node.
    ///
    /// Negative if this node is an ancestor of `other`, positive if it is a
    /// descendant, zero if the paths are the same. Returns `None` if the
    /// nodes are on different branches.
    #[must_use]
    pub fn depth_relative_to(&self, other: &Path) -> Option<isize> {
        trek::subtract(&self.path, other).stride()
    }
}

impl<H: NodeRef> SnapshotNode<H> {
    /// Returns true if the external node is still alive.
    #[inline]
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.node.is_alive()
    }

    /// Returns a strong reference if the external node is still alive.
    #[inline]
    #[must_use]
    pub fn upgrade(&self) -> Option<H::Live> {
        self.node.upgrade()
    }
}

impl<H> PartialEq for SnapshotNode<H> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl<H> Eq for SnapshotNode<H> {}

impl<H> Hash for SnapshotNode<H> {
    #[inline]
    fn hash<S: Hasher>(&self, state: &mut S) {
        self.path.hash(state);
    }
}

/// Prints `description`, a `?` if the node has died, and the path.
impl<H: NodeRef> fmt::Display for SnapshotNode<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let suffix = if self.is_alive() { "" } else { "?" };
        write!(f, "{}{} {}", self.description, suffix, self.path)
    }
}

/// Pre-order list of node records published at once.
#[derive(Debug, Clone)]
pub struct Snapshot<H> {
    /// Publish counter.
    generation: u64,
    /// Records in pre-order.
    nodes: Vec<SnapshotNode<H>>,
}

impl<H> Default for Snapshot<H> {
    #[inline]
    fn default() -> Self {
        Self {
            generation: 0,
            nodes: Vec::new(),
        }
    }
}

impl<H> Snapshot<H> {
    /// Creates a snapshot from pre-ordered records.
    #[inline]
    #[must_use]
    pub fn new(generation: u64, nodes: Vec<SnapshotNode<H>>) -> Self {
        Self { generation, nodes }
    }

    /// Returns the publish counter.
    ///
    /// The empty snapshot a session starts with is generation 0.
    #[inline]
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns the records.
    #[inline]
    #[must_use]
    pub fn nodes(&self) -> &[SnapshotNode<H>] {
        &self.nodes
    }

    /// Returns the number of records.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if there are no records.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns an iterator over the records in pre-order.
    #[inline]
    pub fn iter(&self) -> slice::Iter<'_, SnapshotNode<H>> {
        self.nodes.iter()
    }

    /// Returns the record with the given path.
    #[must_use]
    pub fn find(&self, path: &Path) -> Option<&SnapshotNode<H>> {
        self.nodes.iter().find(|node| node.path == *path)
    }

    /// Returns the records in the subtree of `start`, inclusive.
    ///
    /// With `rebase`, paths are rewritten as if `start` were the root: a
    /// record at `start ++ rest` gets the path `[0] ++ rest`.
    #[must_use]
    pub fn subtree(&self, start: &Path, rebase: bool) -> Self
    where
        H: Clone,
    {
        let nodes = self
            .nodes
            .iter()
            .skip_while(|node| !start.is_prefix_of(&node.path))
            .take_while(|node| start.is_prefix_of(&node.path))
            .map(|node| {
                let mut node = node.clone();
                if rebase {
                    node.path = core::iter::once(0)
                        .chain(node.path[start.len()..].iter().copied())
                        .collect();
                }
                node
            })
            .collect();

        Self {
            generation: self.generation,
            nodes,
        }
    }

    /// Returns a printer of the records as an indented tree.
    #[inline]
    #[must_use]
    pub fn display_tree(&self) -> DisplayTree<'_, H> {
        DisplayTree::new(&self.nodes)
    }
}

impl<'a, H> IntoIterator for &'a Snapshot<H> {
    type Item = &'a SnapshotNode<H>;
    type IntoIter = slice::Iter<'a, SnapshotNode<H>>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

/// Shortens `text` to at most `limit` characters, ending it with `...` if
/// it was cut.
///
/// ```
/// use lineage::truncate_label;
///
/// assert_eq!(truncate_label("Hello", 20), "Hello");
/// assert_eq!(
///     truncate_label("The quick brown fox jumps", 20),
///     "The quick brown f..."
/// );
/// ```
#[must_use]
pub fn truncate_label(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_owned();
    }
    let mut truncated: String = text.chars().take(limit.saturating_sub(3)).collect();
    truncated.push_str("...");
    truncated
}
