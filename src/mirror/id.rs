//! Arena slot ID.

use core::fmt;
use core::num::NonZeroU32;

/// Index of a slot in the mirror arena.
///
/// Stored as `index + 1` so that `Option<SlotId>` costs nothing extra.
/// Slot IDs are reused after their node is removed; they never leave the
/// crate, so stale IDs cannot be observed by users.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct SlotId(NonZeroU32);

impl SlotId {
    /// Creates a slot ID from the raw index.
    ///
    /// Returns `None` if the index does not fit.
    #[inline]
    #[must_use]
    pub(crate) fn from_usize(index: usize) -> Option<Self> {
        let raw = u32::try_from(index).ok()?.checked_add(1)?;
        NonZeroU32::new(raw).map(Self)
    }

    /// Returns the raw index.
    #[inline]
    #[must_use]
    pub(crate) fn get(self) -> usize {
        (self.0.get() - 1) as usize
    }
}

// Prevent `{:#?}` from printing the value in redundant 3 lines.
impl fmt::Debug for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SlotId({})", self.get())
    }
}
