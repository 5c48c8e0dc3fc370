//! Shadow mirror of an externally mutated tree, and an algebra of paths.
//!
//! A rendering runtime owns a tree of nodes and reports structural edits
//! through [`EditEvent`]s. A [`Session`] replays them on a [`Mirror`] that
//! only holds weak handles, and publishes immutable [`Snapshot`]s once per
//! frame. Snapshot records carry a [`Path`] from the root, and paths can be
//! compared with the [`Trek`] displacement algebra:
//!
//! ```
//! use lineage::{trek, Path, Trek};
//!
//! let button = Path::from([0, 1, 2]);
//! let column = Path::from([0, 1]);
//!
//! let down = trek::subtract(&button, &column);
//! assert_eq!(down, Trek::descendant([2]));
//! assert_eq!(Trek::absolute(column) + down, Trek::absolute(button));
//! ```
#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod config;
pub mod geometry;
mod mirror;
pub mod node_ref;
pub mod path;
mod session;
pub mod snapshot;
pub mod trek;

pub use self::config::{ConfigError, MirrorConfig};
pub use self::geometry::{GeometryCache, GeometrySource, Point, Rect};
pub use self::hit_test::hit_test;
pub use self::mirror::Mirror;
pub use self::node_ref::{NodeRef, PtrKey};
pub use self::path::{ParsePathError, Path};
pub use self::session::{EditEvent, Session, SnapshotReader, SubscriptionId};
pub use self::snapshot::{truncate_label, Snapshot, SnapshotNode};
pub use self::trek::{Trail, Trek};
