//! Traversers over the arena hierarchy.
//!
//! Traversers hold no borrow of the hierarchy; it is passed to every step.

use crate::mirror::hierarchy::Hierarchy;
use crate::mirror::id::SlotId;

/// Depth-first traversal event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DftEvent {
    /// Node open.
    Open(SlotId),
    /// Node close.
    Close(SlotId),
}

/// Forward depth-first traverser.
#[derive(Debug, Clone, Copy)]
pub(crate) struct DepthFirstTraverser {
    /// Next event to emit, and the last event of the traversal.
    next: Option<(DftEvent, DftEvent)>,
}

impl DepthFirstTraverser {
    /// Creates a traverser over the subtree of `id`.
    ///
    /// The toplevel does not need to be the root of a tree.
    #[inline]
    #[must_use]
    pub(crate) fn with_toplevel(id: SlotId) -> Self {
        Self {
            next: Some((DftEvent::Open(id), DftEvent::Close(id))),
        }
    }

    /// Returns the next event and advances.
    pub(crate) fn next(&mut self, hier: &Hierarchy) -> Option<DftEvent> {
        let (next, last) = self.next?;
        self.next = if next == last {
            None
        } else {
            Some((Self::successor(next, hier), last))
        };
        Some(next)
    }

    /// Skips the rest of the subtree opened by the latest `Open(id)` event.
    ///
    /// The next event is `Close(id)`.
    pub(crate) fn skip_children(&mut self, id: SlotId) {
        if let Some((DftEvent::Open(_), last)) = self.next {
            self.next = Some((DftEvent::Close(id), last));
        }
    }

    /// Returns the event following `ev` in a full traversal.
    fn successor(ev: DftEvent, hier: &Hierarchy) -> DftEvent {
        match ev {
            // Dive into the first child if available, or leave the node.
            DftEvent::Open(id) => match hier.first_child(id) {
                Some(first_child) => DftEvent::Open(first_child),
                None => DftEvent::Close(id),
            },
            // Move to the next sibling if available, or leave the parent.
            DftEvent::Close(id) => match hier.next_sibling(id) {
                Some(next_sibling) => DftEvent::Open(next_sibling),
                None => DftEvent::Close(hier.parent(id).expect(
                    "[consistency] parent node must exist since the node is not the toplevel",
                )),
            },
        }
    }
}

/// Ancestors traverser.
///
/// Note that this returns the starting node first.
#[derive(Debug, Clone, Copy)]
pub(crate) struct AncestorsTraverser {
    /// Next node to emit.
    next: Option<SlotId>,
}

impl AncestorsTraverser {
    /// Creates a traverser starting from `id`.
    #[inline]
    #[must_use]
    pub(crate) fn with_start(id: SlotId) -> Self {
        Self { next: Some(id) }
    }

    /// Returns the next node and advances.
    pub(crate) fn next(&mut self, hier: &Hierarchy) -> Option<SlotId> {
        let next = self.next?;
        self.next = hier.parent(next);
        Some(next)
    }
}

/// Forward siblings traverser.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SiblingsTraverser {
    /// Next node to emit.
    next: Option<SlotId>,
}

impl SiblingsTraverser {
    /// Creates a traverser over the children of `parent`.
    #[inline]
    #[must_use]
    pub(crate) fn with_parent(parent: SlotId, hier: &Hierarchy) -> Self {
        Self {
            next: hier.first_child(parent),
        }
    }

    /// Returns the next sibling and advances.
    pub(crate) fn next(&mut self, hier: &Hierarchy) -> Option<SlotId> {
        let next = self.next?;
        self.next = hier.next_sibling(next);
        Some(next)
    }
}
