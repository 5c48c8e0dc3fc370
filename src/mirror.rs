//! Mirror of an externally-mutated tree.

mod hierarchy;
mod id;

use rustc_hash::FxHashMap;

use crate::node_ref::NodeRef;
use crate::path::Path;
use crate::snapshot::SnapshotNode;

use self::hierarchy::traverse::{AncestorsTraverser, DepthFirstTraverser, DftEvent};
use self::hierarchy::Hierarchy;
use self::id::SlotId;

/// Shadow copy of an external tree, driven by a cursor-based edit protocol.
///
/// The mirror holds only non-owning handles. External nodes may die at any
/// time; dead nodes are detected and skipped when a snapshot is taken.
///
/// No operation fails. Edits referring to unknown nodes or out-of-range
/// indices are ignored, since the runtime emitting them may be ahead of or
/// behind what the mirror tracks.
///
/// ```
/// use std::rc::Rc;
/// use lineage::{Mirror, Path};
///
/// let root = Rc::new("Root");
/// let column = Rc::new("Column");
/// let text = Rc::new("Text");
///
/// let mut mirror = Mirror::new();
/// mirror.set_root(Rc::downgrade(&root));
/// mirror.insert(0, Rc::downgrade(&column));
/// mirror.down(&Rc::downgrade(&column));
/// mirror.insert(0, Rc::downgrade(&text));
/// mirror.up();
///
/// let nodes = mirror.snapshot(|node| node.to_string());
/// let paths: Vec<_> = nodes.iter().map(|node| node.path().to_string()).collect();
/// assert_eq!(paths, ["[0]", "[0,0]", "[0,0,0]"]);
/// assert_eq!(
///     mirror.path_of(&Rc::downgrade(&text)),
///     Some(Path::from([0, 0, 0]))
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Mirror<H: NodeRef> {
    /// Links between slots.
    hierarchy: Hierarchy,
    /// External handles, indexed by slot ID.
    handles: Vec<Option<H>>,
    /// Slot of every tracked node identity.
    index: FxHashMap<H::Key, SlotId>,
    /// Root slot.
    root: Option<SlotId>,
    /// Current slot of the edit cursor.
    cursor: Option<SlotId>,
    /// Slots the cursor came from.
    stack: Vec<SlotId>,
}

impl<H: NodeRef> Default for Mirror<H> {
    #[inline]
    fn default() -> Self {
        Self {
            hierarchy: Hierarchy::default(),
            handles: Vec::new(),
            index: FxHashMap::default(),
            root: None,
            cursor: None,
            stack: Vec::new(),
        }
    }
}

impl<H: NodeRef> Mirror<H> {
    /// Creates an empty mirror.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Discards the current tree and makes `node` the sole root.
    ///
    /// The cursor is moved to the new root.
    pub fn set_root(&mut self, node: H) {
        self.hierarchy.clear();
        self.handles.clear();
        self.index.clear();
        self.stack.clear();

        let root = self.track(node);
        self.root = Some(root);
        self.cursor = Some(root);
        tracing::trace!(key = ?self.key_of(root), "root set");
    }

    /// Moves the cursor to the tracked `node`, remembering the current one.
    ///
    /// Does nothing if the node is not tracked.
    pub fn down(&mut self, node: &H) {
        let key = node.key();
        let Some(&slot) = self.index.get(&key) else {
            tracing::debug!(?key, "ignored `down` to an untracked node");
            return;
        };
        if let Some(cursor) = self.cursor {
            self.stack.push(cursor);
        }
        self.cursor = Some(slot);
        tracing::trace!(?key, depth = self.stack.len(), "cursor down");
    }

    /// Moves the cursor back to where the latest [`down`][`Self::down`]
    /// came from.
    ///
    /// Does nothing if the cursor stack is empty.
    pub fn up(&mut self) {
        match self.stack.pop() {
            Some(slot) => {
                self.cursor = Some(slot);
                tracing::trace!(depth = self.stack.len(), "cursor up");
            }
            None => tracing::debug!("ignored `up` with an empty cursor stack"),
        }
    }

    /// Inserts `node` as the `index`-th child of the cursor.
    ///
    /// An index past the end appends. Does nothing without a cursor.
    pub fn insert(&mut self, index: usize, node: H) {
        let Some(cursor) = self.cursor else {
            tracing::debug!(index, "ignored `insert` without a cursor");
            return;
        };
        let slot = self.track(node);
        self.hierarchy.insert_at(cursor, index, slot);
        tracing::trace!(index, key = ?self.key_of(slot), "inserted");
    }

    /// Removes `count` consecutive children of the cursor starting at
    /// `index`, together with their subtrees.
    ///
    /// The range is clamped to the available children. Does nothing if
    /// `index` is out of range or there is no cursor.
    pub fn remove(&mut self, index: usize, count: usize) {
        let Some(cursor) = self.cursor else {
            tracing::debug!(index, count, "ignored `remove` without a cursor");
            return;
        };
        let targets: Vec<_> = self
            .hierarchy
            .children(cursor)
            .skip(index)
            .take(count)
            .collect();
        if targets.is_empty() {
            tracing::debug!(index, count, "ignored `remove` out of range");
            return;
        }
        for &target in &targets {
            self.remove_subtree(target);
        }
        // `down` can target any tracked node, so the stack may refer to
        // nodes below the removed ones.
        let hierarchy = &self.hierarchy;
        self.stack.retain(|&slot| hierarchy.is_alive(slot));
        tracing::trace!(index, count = targets.len(), "removed");
    }

    /// Moves `count` consecutive children of the cursor starting at `from`
    /// so that they begin at `to`, preserving their order.
    ///
    /// `to` is in pre-move coordinates: moving forward lands the block at
    /// `to - count`, moving backward lands it at `to`. The block is clamped
    /// to the available children. Does nothing if `from == to`, if `from` is
    /// out of range, or if there is no cursor.
    pub fn move_children(&mut self, from: usize, to: usize, count: usize) {
        let Some(cursor) = self.cursor else {
            tracing::debug!(from, to, count, "ignored `move` without a cursor");
            return;
        };
        if from == to {
            tracing::trace!(from, to, count, "ignored `move` in place");
            return;
        }
        let block: Vec<_> = self
            .hierarchy
            .children(cursor)
            .skip(from)
            .take(count)
            .collect();
        if block.is_empty() {
            tracing::debug!(from, to, count, "ignored `move` out of range");
            return;
        }

        let dest = if from > to {
            to
        } else {
            to.saturating_sub(count)
        };
        for &slot in &block {
            self.hierarchy.detach(slot);
        }
        for (offset, &slot) in block.iter().enumerate() {
            self.hierarchy.insert_at(cursor, dest + offset, slot);
        }
        tracing::trace!(from, to, count = block.len(), "moved");
    }

    /// Removes every child of the root and moves the cursor back to the
    /// root.
    pub fn clear(&mut self) {
        let Some(root) = self.root else {
            tracing::debug!("ignored `clear` without a root");
            return;
        };
        let children: Vec<_> = self.hierarchy.children(root).collect();
        for child in children {
            self.remove_subtree(child);
        }
        self.stack.clear();
        self.cursor = Some(root);
        tracing::trace!("cleared");
    }

    /// Returns the records of all live nodes in pre-order.
    ///
    /// The root path is `[0]`. A node whose external reference is dead is
    /// skipped together with its subtree, but still occupies its index among
    /// its siblings.
    pub fn snapshot<F>(&self, mut describe: F) -> Vec<SnapshotNode<H>>
    where
        F: FnMut(&H::Live) -> String,
    {
        let Some(root) = self.root else {
            return Vec::new();
        };

        let mut nodes = Vec::new();
        let mut path = Vec::new();
        // Index of the next child to open, for every open node.
        let mut next_index: Vec<usize> = Vec::new();
        let mut traverser = DepthFirstTraverser::with_toplevel(root);
        while let Some(ev) = traverser.next(&self.hierarchy) {
            match ev {
                DftEvent::Open(slot) => {
                    match next_index.last_mut() {
                        Some(index) => {
                            path.push(*index);
                            *index += 1;
                        }
                        None => path.push(0),
                    }
                    next_index.push(0);

                    let handle = self.handle(slot);
                    match handle.upgrade() {
                        Some(live) => nodes.push(SnapshotNode::new(
                            Path::from(path.as_slice()),
                            describe(&live),
                            self.hierarchy.child_count(slot),
                            handle.clone(),
                        )),
                        None => traverser.skip_children(slot),
                    }
                }
                DftEvent::Close(_) => {
                    path.pop();
                    next_index.pop();
                }
            }
        }

        nodes
    }

    /// Returns the current path of the tracked `node`.
    ///
    /// The path is computed from the links regardless of liveness.
    #[must_use]
    pub fn path_of(&self, node: &H) -> Option<Path> {
        let slot = *self.index.get(&node.key())?;
        let mut indices = Vec::new();
        let mut traverser = AncestorsTraverser::with_start(slot);
        while let Some(id) = traverser.next(&self.hierarchy) {
            let index = match self.hierarchy.parent(id) {
                Some(_) => self.hierarchy.child_index(id),
                None => 0,
            };
            indices.push(index);
        }
        indices.reverse();

        Some(Path::from(indices))
    }

    /// Returns true if the node is tracked.
    #[inline]
    #[must_use]
    pub fn contains(&self, node: &H) -> bool {
        self.index.contains_key(&node.key())
    }

    /// Returns the number of nodes in the tree, including dead ones.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.hierarchy.live_count()
    }

    /// Returns true if no root is set.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns the root handle.
    #[must_use]
    pub fn root(&self) -> Option<&H> {
        self.root.map(|slot| self.handle(slot))
    }

    /// Returns the handle under the cursor.
    #[must_use]
    pub fn cursor(&self) -> Option<&H> {
        self.cursor.map(|slot| self.handle(slot))
    }

    /// Returns the number of `down` moves not yet matched by `up`.
    #[inline]
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Returns true if every `down` has been matched by `up`.
    #[inline]
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.stack.is_empty()
    }

    /// Allocates a detached slot for `node` and tracks its identity.
    ///
    /// A node tracked already is re-pointed to the new slot.
    fn track(&mut self, node: H) -> SlotId {
        let slot = self.hierarchy.create_root();
        let index = slot.get();
        if index >= self.handles.len() {
            self.handles.resize_with(index + 1, || None);
        }
        self.index.insert(node.key(), slot);
        self.handles[index] = Some(node);

        slot
    }

    /// Frees the subtree of `slot` and untracks the nodes in it.
    fn remove_subtree(&mut self, slot: SlotId) {
        for removed in self.hierarchy.remove_subtree(slot) {
            let Some(handle) = self.handles[removed.get()].take() else {
                continue;
            };
            let key = handle.key();
            // The identity may have been re-pointed to a newer slot.
            if self.index.get(&key) == Some(&removed) {
                self.index.remove(&key);
            }
        }
    }

    /// Returns the handle of a live slot.
    fn handle(&self, slot: SlotId) -> &H {
        self.handles[slot.get()]
            .as_ref()
            .expect("[consistency] live slots must have a handle")
    }

    /// Returns the identity of the node in a live slot.
    fn key_of(&self, slot: SlotId) -> H::Key {
        self.handle(slot).key()
    }
}
