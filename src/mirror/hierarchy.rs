//! Arena hierarchy of mirror slots.

pub(crate) mod traverse;

use core::fmt;

use crate::mirror::id::SlotId;

use self::traverse::{DepthFirstTraverser, DftEvent, SiblingsTraverser};

/// Destination of a detached slot being inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InsertAs {
    /// As the last child.
    LastChildOf(SlotId),
    /// As the previous sibling.
    PreviousSiblingOf(SlotId),
}

/// Parent/sibling/child links of every slot, without payloads.
#[derive(Debug, Clone, Default)]
pub(crate) struct Hierarchy {
    /// Links storage, indexed by slot ID.
    links: Vec<Links>,
    /// Removed slots available for reuse.
    vacant: Vec<SlotId>,
}

impl Hierarchy {
    /// Allocates a slot that is not connected to anything.
    ///
    /// # Panics
    ///
    /// Panics if the slot ID overflows.
    pub(crate) fn create_root(&mut self) -> SlotId {
        if let Some(id) = self.vacant.pop() {
            self.links[id.get()] = Links::new_root(id);
            return id;
        }
        let id = SlotId::from_usize(self.links.len())
            .expect("[precondition] slot ID overflowed presumably due to too many live nodes");
        self.links.push(Links::new_root(id));

        id
    }

    /// Returns the links of the slot if it is alive.
    #[must_use]
    pub(crate) fn links(&self, id: SlotId) -> Option<&Links> {
        self.links.get(id.get()).filter(|v| v.is_alive())
    }

    /// Returns the mutable links of the slot if it is alive.
    #[must_use]
    fn links_mut(&mut self, id: SlotId) -> Option<&mut Links> {
        self.links.get_mut(id.get()).filter(|v| v.is_alive())
    }

    /// Returns true if the slot is alive.
    #[inline]
    #[must_use]
    pub(crate) fn is_alive(&self, id: SlotId) -> bool {
        self.links(id).is_some()
    }

    /// Returns the number of live slots.
    #[must_use]
    pub(crate) fn live_count(&self) -> usize {
        self.links.len() - self.vacant.len()
    }

    /// Drops every slot.
    pub(crate) fn clear(&mut self) {
        self.links.clear();
        self.vacant.clear();
    }

    /// Connects `parent`, `prev_child`, and `next_child` as adjacent family.
    ///
    /// ```text
    ///    parent
    ///     /  \
    ///    /    \
    /// prev -> next
    /// ```
    ///
    /// Updates `prev->parent`, `prev->next_sibling`, `next->parent`,
    /// `next->prev_sibling_cyclic`, and the parent's first child (when
    /// `prev_child` is `None`) or the first child's cyclic link (when
    /// `next_child` is `None`).
    ///
    /// Nodes must be connected in order, the last one at last, so that the
    /// cyclic link of the first child ends up on the real last child.
    ///
    /// # Panics
    ///
    /// Panics if `prev_child` and `next_child` are both given without a
    /// parent, or are the same node.
    fn connect_triangle(
        &mut self,
        parent: Option<SlotId>,
        prev_child: Option<SlotId>,
        next_child: Option<SlotId>,
    ) {
        assert!(
            parent.is_some() || prev_child.is_none() || next_child.is_none(),
            "[precondition] nodes cannot have siblings without having a parent"
        );
        assert!(
            prev_child.is_none() || prev_child != next_child,
            "[precondition] a node cannot be adjacent sibling of itself"
        );

        if let Some(prev_child) = prev_child {
            let links = self
                .links_mut(prev_child)
                .expect("[precondition] `prev_child` must be alive");
            links.parent = parent;
            links.next_sibling = next_child;
        }

        if let Some(next_child) = next_child {
            // Without a real previous sibling, `next_child` becomes the first
            // child and its cyclic link must point at the current last child.
            let prev_cyclic = prev_child.unwrap_or_else(|| {
                parent
                    .and_then(|parent| self.last_child(parent))
                    .unwrap_or(next_child)
            });
            let links = self
                .links_mut(next_child)
                .expect("[precondition] `next_child` must be alive");
            links.parent = parent;
            links.prev_sibling_cyclic = Some(prev_cyclic);
        }

        // The parent is touched last: resolving `next_child`'s cyclic link
        // above needs the unmodified last child.
        let Some(parent) = parent else {
            return;
        };
        match prev_child {
            None => {
                self.links_mut(parent)
                    .expect("[precondition] `parent` must be alive")
                    .first_child = next_child;
            }
            Some(prev_child) if next_child.is_none() => {
                let first_child = self
                    .first_child(parent)
                    .expect("[consistency] `parent` has at least `prev_child` as a child");
                self.links_mut(first_child)
                    .expect("[consistency] children of a live node must be alive")
                    .prev_sibling_cyclic = Some(prev_child);
            }
            Some(_) => {}
        }
    }

    /// Detaches the subtree rooted at `node` from its parent and siblings.
    ///
    /// The structure below `node` is preserved, and `node` becomes a root.
    ///
    /// # Panics
    ///
    /// Panics if the node is not alive.
    pub(crate) fn detach(&mut self, node: SlotId) {
        let links = self
            .links(node)
            .expect("[precondition] the node must be alive");
        // A node without a parent is already detached.
        let Some(parent) = links.parent else {
            return;
        };
        let next = links.next_sibling;
        let prev = self.prev_sibling(node);

        self.connect_triangle(Some(parent), prev, next);

        let links = self
            .links_mut(node)
            .expect("[precondition] the node must be alive");
        links.parent = None;
        links.next_sibling = None;
        links.prev_sibling_cyclic = Some(node);
    }

    /// Inserts the detached root `node` at `dest`.
    ///
    /// # Panics
    ///
    /// Panics if any node involved is not alive, if `node` still has a parent,
    /// or if the anchor of `dest` is `node` itself.
    pub(crate) fn insert(&mut self, node: SlotId, dest: InsertAs) {
        assert!(
            self.parent(node).is_none(),
            "[precondition] only detached nodes can be inserted"
        );
        let (parent, prev, next) = match dest {
            InsertAs::LastChildOf(parent) => (parent, self.last_child(parent), None),
            InsertAs::PreviousSiblingOf(next) => {
                let parent = self
                    .parent(next)
                    .expect("[precondition] the anchor must have a parent to have siblings");
                (parent, self.prev_sibling(next), Some(next))
            }
        };
        assert_ne!(parent, node, "[precondition] a node cannot be its own child");

        self.connect_triangle(Some(parent), prev, Some(node));
        self.connect_triangle(Some(parent), Some(node), next);
    }

    /// Inserts the detached root `node` as the `index`-th child of `parent`.
    ///
    /// An index past the end appends.
    pub(crate) fn insert_at(&mut self, parent: SlotId, index: usize, node: SlotId) {
        let dest = match self.child_at(parent, index) {
            Some(anchor) => InsertAs::PreviousSiblingOf(anchor),
            None => InsertAs::LastChildOf(parent),
        };
        self.insert(node, dest);
    }

    /// Detaches and frees the subtree rooted at `node`.
    ///
    /// Returns the freed slots in pre-order, `node` first.
    ///
    /// # Panics
    ///
    /// Panics if the node is not alive.
    pub(crate) fn remove_subtree(&mut self, node: SlotId) -> Vec<SlotId> {
        self.detach(node);

        let mut removed = Vec::new();
        let mut traverser = DepthFirstTraverser::with_toplevel(node);
        while let Some(ev) = traverser.next(self) {
            if let DftEvent::Open(id) = ev {
                removed.push(id);
            }
        }
        for &id in &removed {
            self.links[id.get()].make_removed();
            self.vacant.push(id);
        }

        removed
    }

    /// Returns the parent of a live node.
    #[inline]
    #[must_use]
    pub(crate) fn parent(&self, id: SlotId) -> Option<SlotId> {
        self.links(id).and_then(|links| links.parent)
    }

    /// Returns the next sibling of a live node.
    #[inline]
    #[must_use]
    pub(crate) fn next_sibling(&self, id: SlotId) -> Option<SlotId> {
        self.links(id).and_then(|links| links.next_sibling)
    }

    /// Returns the previous sibling of a live node.
    #[must_use]
    pub(crate) fn prev_sibling(&self, id: SlotId) -> Option<SlotId> {
        let prev_cyclic = self.links(id)?.prev_sibling_cyclic?;
        // The cyclic link of the first sibling is the last sibling, which is
        // the only sibling without a next one.
        self.links(prev_cyclic)
            .expect("[consistency] the cyclic previous sibling must be alive")
            .next_sibling
            .and(Some(prev_cyclic))
    }

    /// Returns the first child of a live node.
    #[inline]
    #[must_use]
    pub(crate) fn first_child(&self, id: SlotId) -> Option<SlotId> {
        self.links(id).and_then(|links| links.first_child)
    }

    /// Returns the last child of a live node.
    #[must_use]
    pub(crate) fn last_child(&self, id: SlotId) -> Option<SlotId> {
        let first_child = self.first_child(id)?;
        let last_child = self
            .links(first_child)
            .expect("[consistency] children of a live node must be alive")
            .prev_sibling_cyclic;
        Some(last_child.expect("[consistency] the last child must be alive"))
    }

    /// Returns the `index`-th child.
    #[must_use]
    pub(crate) fn child_at(&self, parent: SlotId, index: usize) -> Option<SlotId> {
        self.children(parent).nth(index)
    }

    /// Returns the number of children.
    #[must_use]
    pub(crate) fn child_count(&self, parent: SlotId) -> usize {
        self.children(parent).count()
    }

    /// Returns the position of the node among its siblings.
    #[must_use]
    pub(crate) fn child_index(&self, id: SlotId) -> usize {
        let mut index = 0;
        let mut current = id;
        while let Some(prev) = self.prev_sibling(current) {
            index += 1;
            current = prev;
        }
        index
    }

    /// Returns an iterator over the children of the node.
    #[inline]
    #[must_use]
    pub(crate) fn children(&self, parent: SlotId) -> Children<'_> {
        Children {
            hier: self,
            traverser: SiblingsTraverser::with_parent(parent, self),
        }
    }
}

/// Children iterator.
#[derive(Debug, Clone)]
pub(crate) struct Children<'a> {
    /// Hierarchy.
    hier: &'a Hierarchy,
    /// Traverser.
    traverser: SiblingsTraverser,
}

impl Iterator for Children<'_> {
    type Item = SlotId;

    #[inline]
    fn next(&mut self) -> Option<SlotId> {
        self.traverser.next(self.hier)
    }
}

/// Links of a slot.
#[derive(Clone, Copy, PartialEq, Eq)]
pub(crate) struct Links {
    /// Parent.
    parent: Option<SlotId>,
    /// Cyclic previous sibling.
    ///
    /// `None` if the slot is vacant. For the first sibling, the last sibling;
    /// otherwise the previous sibling. Keeping this cyclic makes a separate
    /// "last child" field unnecessary.
    prev_sibling_cyclic: Option<SlotId>,
    /// Next sibling.
    next_sibling: Option<SlotId>,
    /// First child.
    first_child: Option<SlotId>,
}

impl Links {
    /// Creates links for a node connected to nothing.
    #[inline]
    #[must_use]
    fn new_root(id: SlotId) -> Self {
        Self {
            parent: None,
            prev_sibling_cyclic: Some(id),
            next_sibling: None,
            first_child: None,
        }
    }

    /// Returns true if the slot is occupied.
    #[inline]
    #[must_use]
    fn is_alive(&self) -> bool {
        self.prev_sibling_cyclic.is_some()
    }

    /// Marks the slot vacant.
    ///
    /// Callers are responsible for keeping the rest of the hierarchy from
    /// referring to it.
    fn make_removed(&mut self) {
        self.parent = None;
        self.prev_sibling_cyclic = None;
        self.next_sibling = None;
        self.first_child = None;
    }
}

// For compact printing.
impl fmt::Debug for Links {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        /// Prints an optional slot ID without the `Some(..)` wrapper.
        struct Opt(Option<SlotId>);
        impl fmt::Debug for Opt {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self.0 {
                    Some(id) => fmt::Debug::fmt(&id, f),
                    None => f.write_str("None"),
                }
            }
        }

        f.debug_struct("Links")
            .field("parent", &Opt(self.parent))
            .field("prev_sibling_cyclic", &Opt(self.prev_sibling_cyclic))
            .field("next_sibling", &Opt(self.next_sibling))
            .field("first_child", &Opt(self.first_child))
            .finish()
    }
}
