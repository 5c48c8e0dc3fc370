//! Displacement algebra over paths.
//!
//! A [`Trek`] is either an absolute position in a tree or a relative offset
//! between two positions. Subtracting two absolute paths tells how far (and
//! through which children) one node sits from another; adding an offset to a
//! base re-derives a position. Both operations are total: when there is no
//! answer they return [`Trek::Unrelated`].
//!
//! ```
//! use lineage::Trek;
//!
//! let clicked = Trek::absolute([0, 1, 2, 3]);
//! let frame = Trek::absolute([0, 1]);
//!
//! // The frame is two levels above the clicked node.
//! let up = &frame - &clicked;
//! assert_eq!(up, Trek::ancestor([2, 3]));
//! assert_eq!(up.stride(), Some(-2));
//!
//! // Walking back down from the frame lands on the clicked node again.
//! assert_eq!(&frame + &(&clicked - &frame), clicked);
//! ```

use core::fmt;
use core::num::NonZeroUsize;
use core::ops::{Add, Deref, Sub};

use serde::{Deserialize, Serialize};

use crate::path::{common_prefix_len, Path};

/// Non-empty sequence of child indices carried by a [`Trek`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<usize>", into = "Vec<usize>")]
pub struct Trail(Vec<usize>);

impl Trail {
    /// Creates a trail, or returns `None` if `indices` is empty.
    #[inline]
    #[must_use]
    pub fn new(indices: Vec<usize>) -> Option<Self> {
        if indices.is_empty() {
            None
        } else {
            Some(Self(indices))
        }
    }

    /// Returns the number of steps.
    #[inline]
    #[must_use]
    pub fn steps(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.0.len()).expect("[validity] a trail is never empty")
    }

    /// Returns the indices as a slice.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    /// Consumes the trail and returns the indices.
    #[inline]
    #[must_use]
    pub fn into_vec(self) -> Vec<usize> {
        self.0
    }
}

impl Deref for Trail {
    type Target = [usize];

    #[inline]
    fn deref(&self) -> &[usize] {
        &self.0
    }
}

impl TryFrom<Vec<usize>> for Trail {
    type Error = &'static str;

    fn try_from(indices: Vec<usize>) -> Result<Self, Self::Error> {
        Self::new(indices).ok_or("a trail must contain at least one index")
    }
}

impl From<Trail> for Vec<usize> {
    #[inline]
    fn from(trail: Trail) -> Self {
        trail.0
    }
}

/// Displacement between positions in a tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Trek {
    /// No relation could be established.
    Unrelated,
    /// Same position. Also the absolute position of the root.
    Identity,
    /// Non-empty root-relative path.
    Absolute(Trail),
    /// Steps down from an ancestor, in order.
    Descendant(Trail),
    /// Steps up to an ancestor.
    ///
    /// The trail lists, in ancestor-to-descendant order, the indices that
    /// would be descended again to return.
    Ancestor(Trail),
}

/// Direction class used by subtraction.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Class {
    /// `Identity` and `Absolute`.
    Absolute,
    /// `Descendant`.
    Down,
    /// `Ancestor`.
    Up,
}

impl Trek {
    /// Creates an absolute position. The empty path becomes [`Trek::Identity`].
    #[must_use]
    pub fn absolute(path: impl Into<Path>) -> Self {
        Trail::new(path.into().into_vec()).map_or(Self::Identity, Self::Absolute)
    }

    /// Returns [`Trek::Identity`].
    #[inline]
    #[must_use]
    pub const fn identity() -> Self {
        Self::Identity
    }

    /// Returns [`Trek::Unrelated`].
    #[inline]
    #[must_use]
    pub const fn unrelated() -> Self {
        Self::Unrelated
    }

    /// Creates a downward offset. The empty trail becomes [`Trek::Identity`].
    #[must_use]
    pub fn descendant(trail: impl Into<Path>) -> Self {
        Trail::new(trail.into().into_vec()).map_or(Self::Identity, Self::Descendant)
    }

    /// Creates an upward offset. The empty trail becomes [`Trek::Identity`].
    #[must_use]
    pub fn ancestor(trail: impl Into<Path>) -> Self {
        Trail::new(trail.into().into_vec()).map_or(Self::Identity, Self::Ancestor)
    }

    /// Signed number of levels: `0` for positions, positive downward,
    /// negative upward, `None` when unrelated.
    ///
    /// ```
    /// use lineage::Trek;
    ///
    /// assert_eq!(Trek::absolute([0, 1]).stride(), Some(0));
    /// assert_eq!(Trek::descendant([4, 2]).stride(), Some(2));
    /// assert_eq!(Trek::ancestor([4]).stride(), Some(-1));
    /// assert_eq!(Trek::Unrelated.stride(), None);
    /// ```
    #[must_use]
    pub fn stride(&self) -> Option<isize> {
        match self {
            Self::Unrelated => None,
            Self::Identity | Self::Absolute(_) => Some(0),
            Self::Descendant(trail) => Some(signed(trail.len())),
            Self::Ancestor(trail) => Some(-signed(trail.len())),
        }
    }

    /// Number of levels regardless of direction.
    #[inline]
    #[must_use]
    pub fn magnitude(&self) -> Option<usize> {
        self.stride().map(isize::unsigned_abs)
    }

    /// Indices carried by the value. Empty for `Unrelated` and `Identity`.
    #[must_use]
    pub fn trail(&self) -> &[usize] {
        match self {
            Self::Unrelated | Self::Identity => &[],
            Self::Absolute(trail) | Self::Descendant(trail) | Self::Ancestor(trail) => {
                trail.as_slice()
            }
        }
    }

    /// Returns true for [`Trek::Unrelated`].
    #[inline]
    #[must_use]
    pub fn is_unrelated(&self) -> bool {
        matches!(self, Self::Unrelated)
    }

    /// Returns true for anything but [`Trek::Unrelated`].
    #[inline]
    #[must_use]
    pub fn is_related(&self) -> bool {
        !self.is_unrelated()
    }

    /// Returns true for [`Trek::Identity`].
    #[inline]
    #[must_use]
    pub fn is_identity(&self) -> bool {
        matches!(self, Self::Identity)
    }

    /// Returns true for a non-empty absolute path.
    #[inline]
    #[must_use]
    pub fn is_absolute(&self) -> bool {
        matches!(self, Self::Absolute(_))
    }

    /// Returns true for a downward offset.
    #[inline]
    #[must_use]
    pub fn is_descendant(&self) -> bool {
        matches!(self, Self::Descendant(_))
    }

    /// Returns true for an upward offset.
    #[inline]
    #[must_use]
    pub fn is_ancestor(&self) -> bool {
        matches!(self, Self::Ancestor(_))
    }

    /// Returns the root-relative path of an absolute position.
    #[must_use]
    pub fn to_path(&self) -> Option<Path> {
        match self {
            Self::Identity => Some(Path::root()),
            Self::Absolute(trail) => Some(Path::from(trail.as_slice())),
            _ => None,
        }
    }

    /// Returns the subtraction class, or `None` when unrelated.
    fn class(&self) -> Option<Class> {
        match self {
            Self::Unrelated => None,
            Self::Identity | Self::Absolute(_) => Some(Class::Absolute),
            Self::Descendant(_) => Some(Class::Down),
            Self::Ancestor(_) => Some(Class::Up),
        }
    }

    /// Returns the displacement from `other` to `self`.
    #[must_use]
    pub fn minus(&self, other: &Self) -> Self {
        let (class, other_class) = match (self.class(), other.class()) {
            (Some(a), Some(b)) => (a, b),
            _ => return Self::Unrelated,
        };
        if class != other_class {
            return Self::Unrelated;
        }
        let (a, b) = (self.trail(), other.trail());
        let common = common_prefix_len(a, b);
        let same_sign = |rest: &[usize]| match class {
            Class::Absolute | Class::Down => Self::descendant(rest),
            Class::Up => Self::ancestor(rest),
        };
        let opposite_sign = |rest: &[usize]| match class {
            Class::Absolute | Class::Down => Self::ancestor(rest),
            Class::Up => Self::descendant(rest),
        };

        if common == a.len() && common == b.len() {
            Self::Identity
        } else if common == b.len() {
            same_sign(&a[common..])
        } else if common == a.len() {
            opposite_sign(&b[common..])
        } else {
            Self::Unrelated
        }
    }

    /// Applies the offset `delta` to `self`.
    ///
    /// `Identity` is neutral, except that descending from it gives an
    /// absolute position since it is also the root.
    #[must_use]
    pub fn plus(&self, delta: &Self) -> Self {
        match (self, delta) {
            (Self::Unrelated, _) | (_, Self::Unrelated) => Self::Unrelated,
            // `Identity` as a base is the root position.
            (Self::Identity, Self::Descendant(down)) => Self::Absolute(down.clone()),
            (Self::Identity, other) | (other, Self::Identity) => other.clone(),
            (Self::Absolute(base), Self::Descendant(down)) => Self::absolute(concat(base, down)),
            (Self::Absolute(base), Self::Ancestor(up)) => match base.strip_suffix(up.as_slice()) {
                Some(rest) => Self::absolute(rest),
                None => Self::Unrelated,
            },
            (Self::Descendant(first), Self::Descendant(second)) => {
                Self::descendant(concat(first, second))
            }
            // The later climb ends higher up, so its indices come first.
            (Self::Ancestor(first), Self::Ancestor(second)) => {
                Self::ancestor(concat(second, first))
            }
            (Self::Descendant(down), Self::Ancestor(up)) => {
                match down.strip_suffix(up.as_slice()) {
                    Some(rest) => Self::descendant(rest),
                    None => Self::Unrelated,
                }
            }
            (Self::Ancestor(up), Self::Descendant(down)) => {
                match down.strip_prefix(up.as_slice()) {
                    Some(rest) => Self::descendant(rest),
                    None => Self::Unrelated,
                }
            }
            (_, Self::Absolute(_)) => Self::Unrelated,
        }
    }
}

/// Returns the displacement from `base` to `target`, i.e. `target - base`.
///
/// ```
/// use lineage::{trek, Path, Trek};
///
/// let base = Path::from([0, 1]);
/// let target = Path::from([0, 1, 4]);
/// assert_eq!(trek::subtract(&target, &base), Trek::descendant([4]));
/// ```
#[must_use]
pub fn subtract(target: &Path, base: &Path) -> Trek {
    Trek::absolute(target.clone()).minus(&Trek::absolute(base.clone()))
}

/// Applies `delta` to `base`, i.e. `base + delta`.
#[inline]
#[must_use]
pub fn add(base: &Trek, delta: &Trek) -> Trek {
    base.plus(delta)
}

/// Concatenates two index slices.
fn concat(head: &[usize], tail: &[usize]) -> Vec<usize> {
    let mut indices = Vec::with_capacity(head.len() + tail.len());
    indices.extend_from_slice(head);
    indices.extend_from_slice(tail);
    indices
}

/// Converts a trail length to a signed stride.
fn signed(len: usize) -> isize {
    isize::try_from(len).expect("[consistency] a trail cannot be longer than `isize::MAX`")
}

impl Sub for Trek {
    type Output = Trek;

    #[inline]
    fn sub(self, rhs: Trek) -> Trek {
        self.minus(&rhs)
    }
}

impl<'a> Sub<&'a Trek> for &'a Trek {
    type Output = Trek;

    #[inline]
    fn sub(self, rhs: &'a Trek) -> Trek {
        self.minus(rhs)
    }
}

impl Add for Trek {
    type Output = Trek;

    #[inline]
    fn add(self, rhs: Trek) -> Trek {
        self.plus(&rhs)
    }
}

impl<'a> Add<&'a Trek> for &'a Trek {
    type Output = Trek;

    #[inline]
    fn add(self, rhs: &'a Trek) -> Trek {
        self.plus(rhs)
    }
}

impl From<Path> for Trek {
    #[inline]
    fn from(path: Path) -> Self {
        Self::absolute(path)
    }
}

impl fmt::Display for Trek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unrelated => f.write_str("unrelated"),
            Self::Identity => f.write_str("identity"),
            Self::Absolute(trail) => write!(f, "{}", Path::from(trail.as_slice())),
            Self::Descendant(trail) => write!(f, "+{}", Path::from(trail.as_slice())),
            Self::Ancestor(trail) => write!(f, "-{}", Path::from(trail.as_slice())),
        }
    }
}
