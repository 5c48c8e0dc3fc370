//! Edit dispatch and snapshot publishing.

use core::fmt;
use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::config::MirrorConfig;
use crate::geometry::{GeometryCache, GeometrySource, Point};
use crate::hit_test::hit_test;
use crate::mirror::Mirror;
use crate::node_ref::NodeRef;
use crate::snapshot::{truncate_label, Snapshot, SnapshotNode};

/// Structural change notification from the rendering runtime.
///
/// Indices are relative to the children of the node under the cursor at
/// the time the event is applied.
#[derive(Debug, Clone)]
pub enum EditEvent<H> {
    /// A batch of edits begins.
    BatchStart,
    /// A batch of edits is complete.
    BatchEnd,
    /// The tree is replaced by a sole root.
    SetRoot(H),
    /// The cursor moves to a tracked node.
    Down(H),
    /// The cursor moves back.
    Up,
    /// A node is inserted under the cursor.
    Insert {
        /// Position among the children.
        index: usize,
        /// New node.
        node: H,
    },
    /// Children of the cursor are removed.
    Remove {
        /// Position of the first removed child.
        index: usize,
        /// Number of removed children.
        count: usize,
    },
    /// Children of the cursor are moved.
    Move {
        /// Position of the first moved child.
        from: usize,
        /// Destination, in coordinates before the move.
        to: usize,
        /// Number of moved children.
        count: usize,
    },
    /// All children of the root are removed.
    Clear,
}

/// Handle of a snapshot subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Callback receiving every published snapshot.
type Subscriber<H> = Box<dyn FnMut(&Arc<Snapshot<H>>)>;

/// Mirror of one rendering surface, with coalesced snapshot publishing.
///
/// Edits are applied as they arrive. Completing a batch only marks a
/// snapshot pending; [`on_frame`][`Self::on_frame`] produces at most one
/// snapshot per call no matter how many batches completed since the last
/// one.
///
/// ```
/// use std::rc::Rc;
/// use lineage::{EditEvent, Session};
///
/// let root = Rc::new("Root");
/// let text = Rc::new("Text");
///
/// let mut session = Session::new();
/// session.extend([
///     EditEvent::BatchStart,
///     EditEvent::SetRoot(Rc::downgrade(&root)),
///     EditEvent::Insert { index: 0, node: Rc::downgrade(&text) },
///     EditEvent::BatchEnd,
/// ]);
///
/// let snapshot = session.on_frame(|node| node.to_string()).expect("batch completed");
/// assert_eq!(snapshot.len(), 2);
/// assert!(session.on_frame(|node| node.to_string()).is_none());
/// ```
pub struct Session<H: NodeRef> {
    /// Mirror of the external tree.
    mirror: Mirror<H>,
    /// Runtime switches.
    config: MirrorConfig,
    /// Last known bounds of nodes.
    geometry: GeometryCache<H>,
    /// Latest published snapshot.
    published: Arc<ArcSwap<Snapshot<H>>>,
    /// Number of open batches.
    batch_depth: usize,
    /// Whether a batch completed since the last publish.
    pending: bool,
    /// Generation of the latest published snapshot.
    generation: u64,
    /// Snapshot callbacks.
    subscribers: Vec<(SubscriptionId, Subscriber<H>)>,
    /// Next subscription handle.
    next_subscription: u64,
}

impl<H: NodeRef> Default for Session<H> {
    #[inline]
    fn default() -> Self {
        Self::with_config(MirrorConfig::default())
    }
}

impl<H: NodeRef> Session<H> {
    /// Creates a session with the default config.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a session with the given config.
    #[must_use]
    pub fn with_config(config: MirrorConfig) -> Self {
        Self {
            mirror: Mirror::new(),
            config,
            geometry: GeometryCache::new(),
            published: Arc::new(ArcSwap::from_pointee(Snapshot::default())),
            batch_depth: 0,
            pending: false,
            generation: 0,
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Applies an edit event.
    pub fn apply(&mut self, event: EditEvent<H>) {
        match event {
            EditEvent::BatchStart => self.batch_depth += 1,
            EditEvent::BatchEnd => self.end_batch(),
            EditEvent::SetRoot(node) => self.mirror.set_root(node),
            EditEvent::Down(node) => self.mirror.down(&node),
            EditEvent::Up => self.mirror.up(),
            EditEvent::Insert { index, node } => self.mirror.insert(index, node),
            EditEvent::Remove { index, count } => self.mirror.remove(index, count),
            EditEvent::Move { from, to, count } => self.mirror.move_children(from, to, count),
            EditEvent::Clear => self.mirror.clear(),
        }
    }

    /// Closes the innermost batch.
    fn end_batch(&mut self) {
        match self.batch_depth.checked_sub(1) {
            Some(depth) => self.batch_depth = depth,
            None => tracing::warn!("`BatchEnd` without a matching `BatchStart`"),
        }
        if self.batch_depth != 0 {
            return;
        }

        if !self.mirror.is_balanced() {
            // The cursor stays where it is until the next `set_root` or `clear`.
            tracing::warn!(
                depth = self.mirror.depth(),
                "batch ended with unmatched `down` events"
            );
        }
        self.geometry.evict_dead();
        if self.config.snapshots_enabled {
            self.pending = true;
        }
    }

    /// Publishes a snapshot if a batch completed since the last publish.
    ///
    /// `describe` produces the description of each live node; it is
    /// truncated to the configured limit. Returns the published snapshot.
    pub fn on_frame<F>(&mut self, mut describe: F) -> Option<Arc<Snapshot<H>>>
    where
        F: FnMut(&H::Live) -> String,
    {
        if !self.pending {
            return None;
        }
        self.pending = false;

        let limit = self.config.description_limit;
        let nodes = self.mirror.snapshot(|live| {
            let description = describe(live);
            match limit {
                Some(limit) => truncate_label(&description, limit),
                None => description,
            }
        });
        self.generation += 1;
        let snapshot = Arc::new(Snapshot::new(self.generation, nodes));
        self.published.store(Arc::clone(&snapshot));
        tracing::debug!(
            generation = self.generation,
            nodes = snapshot.len(),
            "snapshot published"
        );

        for (_, subscriber) in &mut self.subscribers {
            subscriber(&snapshot);
        }

        Some(snapshot)
    }

    /// Returns true if a snapshot will be published on the next frame.
    #[inline]
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Returns the latest published snapshot.
    ///
    /// Before the first publish, this is an empty snapshot of generation 0.
    #[inline]
    #[must_use]
    pub fn latest(&self) -> Arc<Snapshot<H>> {
        self.published.load_full()
    }

    /// Returns a handle for reading published snapshots.
    #[inline]
    #[must_use]
    pub fn reader(&self) -> SnapshotReader<H> {
        SnapshotReader {
            published: Arc::clone(&self.published),
        }
    }

    /// Registers a callback called with every published snapshot.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&Arc<Snapshot<H>>) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Removes a subscription.
    ///
    /// Returns false if it was already removed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(subscription, _)| *subscription != id);
        self.subscribers.len() != before
    }

    /// Returns the config.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &MirrorConfig {
        &self.config
    }

    /// Replaces the config.
    ///
    /// Disabling snapshots drops a pending one.
    pub fn set_config(&mut self, config: MirrorConfig) {
        if !config.snapshots_enabled && self.pending {
            tracing::debug!("pending snapshot dropped since snapshots are disabled");
            self.pending = false;
        }
        self.config = config;
    }

    /// Returns the mirror.
    #[inline]
    #[must_use]
    pub fn mirror(&self) -> &Mirror<H> {
        &self.mirror
    }

    /// Returns the geometry cache.
    #[inline]
    #[must_use]
    pub fn geometry(&self) -> &GeometryCache<H> {
        &self.geometry
    }

    /// Returns the geometry cache.
    #[inline]
    #[must_use]
    pub fn geometry_mut(&mut self) -> &mut GeometryCache<H> {
        &mut self.geometry
    }

    /// Returns the deepest node of the latest snapshot under `point`.
    ///
    /// Bounds come from the geometry cache if it is enabled, and from
    /// `fallback` for nodes the cache knows nothing about.
    #[must_use]
    pub fn hit_test<S>(&self, point: Point, fallback: &S) -> Option<SnapshotNode<H>>
    where
        S: GeometrySource<H> + ?Sized,
    {
        let snapshot = self.latest();
        let hit = if self.config.geometry_cache_enabled {
            hit_test(snapshot.nodes(), point, &(&self.geometry).or(fallback))
        } else {
            hit_test(snapshot.nodes(), point, fallback)
        };
        hit.cloned()
    }
}

impl<H: NodeRef> Extend<EditEvent<H>> for Session<H> {
    fn extend<I: IntoIterator<Item = EditEvent<H>>>(&mut self, events: I) {
        for event in events {
            self.apply(event);
        }
    }
}

impl<H: NodeRef> fmt::Debug for Session<H>
where
    H: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("mirror", &self.mirror)
            .field("config", &self.config)
            .field("batch_depth", &self.batch_depth)
            .field("pending", &self.pending)
            .field("generation", &self.generation)
            .field("subscribers", &self.subscribers.len())
            .finish_non_exhaustive()
    }
}

/// Read handle of the snapshots published by a [`Session`].
///
/// Readers never block the session. The handle can be sent to other threads
/// if the node handle type is `Send + Sync`.
pub struct SnapshotReader<H> {
    /// Latest published snapshot.
    published: Arc<ArcSwap<Snapshot<H>>>,
}

impl<H> SnapshotReader<H> {
    /// Returns the latest published snapshot.
    #[inline]
    #[must_use]
    pub fn load(&self) -> Arc<Snapshot<H>> {
        self.published.load_full()
    }

    /// Returns the generation of the latest published snapshot.
    #[inline]
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.published.load().generation()
    }
}

impl<H> Clone for SnapshotReader<H> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            published: Arc::clone(&self.published),
        }
    }
}

impl<H> fmt::Debug for SnapshotReader<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnapshotReader")
            .field("generation", &self.generation())
            .finish()
    }
}
