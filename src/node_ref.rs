//! Non-owning references to nodes owned by the rendering runtime.

use core::fmt;
use core::hash::Hash;
use std::rc::{self, Rc};
use std::sync::{self, Arc};

/// Non-owning handle to an external node.
///
/// The rendering runtime owns node lifetime. The mirror only keeps handles,
/// identifies nodes by [`key`][`Self::key`], and checks liveness with
/// [`upgrade`][`Self::upgrade`] when a snapshot is taken. A node may die at
/// any moment without notification.
///
/// The key must stay unique among nodes whose handles are held, even after
/// the node dies. Pointer identity of a weak allocation satisfies this since
/// the allocation is not released while a weak handle exists.
pub trait NodeRef: Clone {
    /// Identity of the node.
    type Key: Copy + Eq + Hash + fmt::Debug;
    /// Strong reference available while the node is alive.
    type Live;

    /// Returns the identity of the node.
    #[must_use]
    fn key(&self) -> Self::Key;

    /// Returns a strong reference if the node is still alive.
    #[must_use]
    fn upgrade(&self) -> Option<Self::Live>;

    /// Returns true if the node is still alive.
    #[inline]
    #[must_use]
    fn is_alive(&self) -> bool {
        self.upgrade().is_some()
    }
}

/// Identity of a node referenced through a weak pointer.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PtrKey(usize);

impl PtrKey {
    /// Creates a key from the address of an allocation.
    #[inline]
    #[must_use]
    fn from_ptr<T: ?Sized>(ptr: *const T) -> Self {
        Self(ptr.cast::<()>() as usize)
    }
}

// Prevent `{:#?}` from printing the value in redundant 3 lines.
impl fmt::Debug for PtrKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PtrKey({:#x})", self.0)
    }
}

impl<T> NodeRef for rc::Weak<T> {
    type Key = PtrKey;
    type Live = Rc<T>;

    #[inline]
    fn key(&self) -> PtrKey {
        PtrKey::from_ptr(self.as_ptr())
    }

    #[inline]
    fn upgrade(&self) -> Option<Rc<T>> {
        rc::Weak::upgrade(self)
    }

    #[inline]
    fn is_alive(&self) -> bool {
        self.strong_count() != 0
    }
}

impl<T> NodeRef for sync::Weak<T> {
    type Key = PtrKey;
    type Live = Arc<T>;

    #[inline]
    fn key(&self) -> PtrKey {
        PtrKey::from_ptr(self.as_ptr())
    }

    #[inline]
    fn upgrade(&self) -> Option<Arc<T>> {
        sync::Weak::upgrade(self)
    }

    #[inline]
    fn is_alive(&self) -> bool {
        self.strong_count() != 0
    }
}
