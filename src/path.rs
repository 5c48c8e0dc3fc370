//! Paths from the root of a mirrored tree.

use core::fmt;
use core::ops::Deref;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Ordered sequence of child indices locating a node from the root.
///
/// The empty path is the root itself. Snapshots produced by
/// [`Mirror`][`crate::Mirror`] prefix every path with the root sentinel `0`,
/// so the root record reads `[0]` and its second child reads `[0, 1]`.
///
/// Indices are contiguous with the child count of the parent at the time the
/// path was read. They are not stable: inserting, removing, or moving a
/// preceding sibling changes the path of a node.
#[derive(Debug, Default, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path(Vec<usize>);

impl Path {
    /// Returns the path of the root.
    #[inline]
    #[must_use]
    pub const fn root() -> Self {
        Self(Vec::new())
    }

    /// Returns the number of indices, i.e. the depth below the root.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if this is the root path.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the indices as a slice.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    /// Returns the index of the node inside its parent, if any.
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<usize> {
        self.0.last().copied()
    }

    /// Returns the path of the parent, or `None` for the root.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        let (_, parent) = self.0.split_last()?;
        Some(Self(parent.to_vec()))
    }

    /// Returns the path of the `index`-th child.
    #[must_use]
    pub fn child(&self, index: usize) -> Self {
        let mut indices = Vec::with_capacity(self.0.len() + 1);
        indices.extend_from_slice(&self.0);
        indices.push(index);
        Self(indices)
    }

    /// Appends an index in place.
    #[inline]
    pub fn push(&mut self, index: usize) {
        self.0.push(index);
    }

    /// Removes and returns the last index.
    #[inline]
    pub fn pop(&mut self) -> Option<usize> {
        self.0.pop()
    }

    /// Returns the length of the longest common prefix.
    #[must_use]
    pub fn common_prefix_len(&self, other: &[usize]) -> usize {
        common_prefix_len(&self.0, other)
    }

    /// Returns true if `self` is a (non-strict) prefix of `other`.
    ///
    /// ```
    /// use lineage::Path;
    ///
    /// let parent = Path::from(vec![0, 1]);
    /// assert!(parent.is_prefix_of(&[0, 1, 2]));
    /// assert!(parent.is_prefix_of(&[0, 1]));
    /// assert!(!parent.is_prefix_of(&[0, 2, 1]));
    /// ```
    #[must_use]
    pub fn is_prefix_of(&self, other: &[usize]) -> bool {
        other.starts_with(&self.0)
    }

    /// Returns true if `self` is a strict ancestor of `other`.
    #[must_use]
    pub fn is_ancestor_of(&self, other: &[usize]) -> bool {
        self.0.len() < other.len() && self.is_prefix_of(other)
    }

    /// Returns true if both paths have the same parent and differ only in the
    /// last index.
    #[must_use]
    pub fn is_sibling_of(&self, other: &[usize]) -> bool {
        match (self.0.split_last(), other.split_last()) {
            (Some((a, a_parent)), Some((b, b_parent))) => a != b && a_parent == b_parent,
            _ => false,
        }
    }

    /// Consumes the path and returns the indices.
    #[inline]
    #[must_use]
    pub fn into_vec(self) -> Vec<usize> {
        self.0
    }
}

/// Returns the length of the longest common prefix of two index slices.
#[must_use]
pub(crate) fn common_prefix_len(a: &[usize], b: &[usize]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

impl Deref for Path {
    type Target = [usize];

    #[inline]
    fn deref(&self) -> &[usize] {
        &self.0
    }
}

impl AsRef<[usize]> for Path {
    #[inline]
    fn as_ref(&self) -> &[usize] {
        &self.0
    }
}

impl From<Vec<usize>> for Path {
    #[inline]
    fn from(indices: Vec<usize>) -> Self {
        Self(indices)
    }
}

impl From<&[usize]> for Path {
    #[inline]
    fn from(indices: &[usize]) -> Self {
        Self(indices.to_vec())
    }
}

impl<const N: usize> From<[usize; N]> for Path {
    #[inline]
    fn from(indices: [usize; N]) -> Self {
        Self(indices.to_vec())
    }
}

impl FromIterator<usize> for Path {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl PartialEq<[usize]> for Path {
    #[inline]
    fn eq(&self, other: &[usize]) -> bool {
        self.0 == other
    }
}

impl<const N: usize> PartialEq<[usize; N]> for Path {
    #[inline]
    fn eq(&self, other: &[usize; N]) -> bool {
        self.0 == other
    }
}

/// Formats as `[0,1,2]`.
impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, index) in self.0.iter().enumerate() {
            if i != 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", index)?;
        }
        f.write_str("]")
    }
}

/// Error returned when parsing a [`Path`] fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParsePathError {
    /// Opening and closing brackets do not match.
    #[error("unbalanced brackets in path `{input}`")]
    UnbalancedBrackets {
        /// The rejected input.
        input: String,
    },
    /// A segment is not a non-negative integer.
    #[error("invalid path index `{segment}` at position {position}")]
    InvalidIndex {
        /// The rejected segment.
        segment: String,
        /// Zero-based position of the segment.
        position: usize,
    },
}

/// Parses `[0,1,2]`, `0,1,2`, `[]`, or the empty string.
///
/// Whitespace around indices is ignored.
///
/// ```
/// use lineage::Path;
///
/// let path: Path = "[0, 1, 2]".parse().unwrap();
/// assert_eq!(path, [0, 1, 2]);
/// assert_eq!(path.to_string(), "[0,1,2]");
/// ```
impl FromStr for Path {
    type Err = ParsePathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let inner = match (trimmed.strip_prefix('['), trimmed.strip_suffix(']')) {
            (Some(rest), Some(_)) => &rest[..rest.len() - 1],
            (None, None) => trimmed,
            _ => {
                return Err(ParsePathError::UnbalancedBrackets {
                    input: s.to_owned(),
                })
            }
        };
        if inner.trim().is_empty() {
            return Ok(Self::root());
        }

        inner
            .split(',')
            .enumerate()
            .map(|(position, segment)| {
                segment
                    .trim()
                    .parse::<usize>()
                    .map_err(|_| ParsePathError::InvalidIndex {
                        segment: segment.trim().to_owned(),
                        position,
                    })
            })
            .collect()
    }
}
