//! Node bounds.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::node_ref::NodeRef;

/// A point in window coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal position.
    pub x: f32,
    /// Vertical position.
    pub y: f32,
}

impl Point {
    /// Creates a new point.
    #[inline]
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Bounds of a node in window coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

impl Rect {
    /// Creates a new rectangle.
    #[inline]
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge.
    #[inline]
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge.
    #[inline]
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Checks if a point is inside the rectangle, edges included.
    #[inline]
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.y >= self.y
            && point.x <= self.right()
            && point.y <= self.bottom()
    }
}

/// Provider of node bounds for hit testing.
pub trait GeometrySource<H> {
    /// Returns the current bounds of the node.
    ///
    /// Returns `None` if the bounds are unknown or the node is not attached
    /// to the window.
    fn bounds(&self, node: &H) -> Option<Rect>;

    /// Consults `fallback` when this source knows nothing about a node.
    #[inline]
    fn or<S: GeometrySource<H>>(self, fallback: S) -> Fallback<Self, S>
    where
        Self: Sized,
    {
        Fallback {
            primary: self,
            fallback,
        }
    }
}

/// Creates a source from a closure.
///
/// ```
/// use std::rc::{self, Rc};
/// use lineage::geometry::{self, GeometrySource, Rect};
///
/// let source = geometry::from_fn(|_: &rc::Weak<&str>| {
///     Some(Rect::new(0.0, 0.0, 8.0, 8.0))
/// });
/// let node = Rc::new("Box");
/// assert_eq!(source.bounds(&Rc::downgrade(&node)).map(|r| r.width), Some(8.0));
/// ```
#[inline]
pub fn from_fn<H, F>(f: F) -> FromFn<F>
where
    F: Fn(&H) -> Option<Rect>,
{
    FromFn(f)
}

/// Source backed by a closure.
///
/// Created by [`from_fn`].
#[derive(Debug, Clone, Copy)]
pub struct FromFn<F>(F);

impl<H, F> GeometrySource<H> for FromFn<F>
where
    F: Fn(&H) -> Option<Rect>,
{
    #[inline]
    fn bounds(&self, node: &H) -> Option<Rect> {
        (self.0)(node)
    }
}

/// Source that consults a fallback when the primary one has no bounds.
#[derive(Debug, Clone, Copy)]
pub struct Fallback<P, S> {
    /// Consulted first.
    primary: P,
    /// Consulted on a miss.
    fallback: S,
}

impl<H, P, S> GeometrySource<H> for Fallback<P, S>
where
    P: GeometrySource<H>,
    S: GeometrySource<H>,
{
    #[inline]
    fn bounds(&self, node: &H) -> Option<Rect> {
        self.primary
            .bounds(node)
            .or_else(|| self.fallback.bounds(node))
    }
}

/// Cached bounds of a node.
#[derive(Debug, Clone)]
struct Entry<H> {
    /// Handle used to check liveness on eviction.
    node: H,
    /// Last known bounds.
    rect: Rect,
    /// Whether the node was attached to the window when last seen.
    attached: bool,
}

/// Last known bounds of nodes, keyed by node identity.
///
/// Entries of dead nodes are dropped by [`evict_dead`][`Self::evict_dead`];
/// until then they are never returned.
#[derive(Debug, Clone)]
pub struct GeometryCache<H: NodeRef> {
    /// Entries.
    entries: FxHashMap<H::Key, Entry<H>>,
}

impl<H: NodeRef> Default for GeometryCache<H> {
    #[inline]
    fn default() -> Self {
        Self {
            entries: FxHashMap::default(),
        }
    }
}

impl<H: NodeRef> GeometryCache<H> {
    /// Creates an empty cache.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the bounds of an attached node.
    pub fn store(&mut self, node: &H, rect: Rect) {
        self.entries.insert(
            node.key(),
            Entry {
                node: node.clone(),
                rect,
                attached: true,
            },
        );
    }

    /// Returns the last known bounds of a live node.
    #[must_use]
    pub fn lookup(&self, node: &H) -> Option<Rect> {
        self.entries
            .get(&node.key())
            .filter(|entry| entry.node.is_alive())
            .map(|entry| entry.rect)
    }

    /// Returns true if the node has bounds and was attached when last seen.
    #[must_use]
    pub fn is_attached(&self, node: &H) -> bool {
        self.entries
            .get(&node.key())
            .map_or(false, |entry| entry.attached && entry.node.is_alive())
    }

    /// Marks the node as detached from the window, keeping its bounds.
    pub fn detach(&mut self, node: &H) {
        if let Some(entry) = self.entries.get_mut(&node.key()) {
            entry.attached = false;
        }
    }

    /// Drops the entries of dead nodes.
    ///
    /// Returns the number of dropped entries.
    pub fn evict_dead(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.node.is_alive());
        let evicted = before - self.entries.len();
        if evicted != 0 {
            tracing::trace!(evicted, "evicted geometry of dead nodes");
        }
        evicted
    }

    /// Returns the number of entries, including those of dead nodes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no entries.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every entry.
    #[inline]
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Only bounds of live, attached nodes are provided.
impl<H: NodeRef> GeometrySource<H> for GeometryCache<H> {
    #[inline]
    fn bounds(&self, node: &H) -> Option<Rect> {
        self.entries
            .get(&node.key())
            .filter(|entry| entry.attached && entry.node.is_alive())
            .map(|entry| entry.rect)
    }
}

impl<H, S: GeometrySource<H> + ?Sized> GeometrySource<H> for &S {
    #[inline]
    fn bounds(&self, node: &H) -> Option<Rect> {
        (**self).bounds(node)
    }
}
