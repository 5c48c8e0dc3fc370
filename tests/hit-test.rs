//! Tests for hit testing over snapshots.

use std::rc::{self, Rc};

use lineage::geometry::{GeometryCache, Point, Rect};
use lineage::{hit_test, Mirror, SnapshotNode};

type Handle = rc::Weak<&'static str>;

/// Sample tree with bounds.
///
/// ```text
/// root    (0, 0) 100x100
/// |-- a   (0, 0) 50x50
/// |   `-- a0  (10, 10) 10x10
/// `-- b   (40, 40) 50x50
/// ```
struct Scene {
    nodes: Vec<Rc<&'static str>>,
    mirror: Mirror<Handle>,
    cache: GeometryCache<Handle>,
}

impl Scene {
    fn new() -> Self {
        let nodes: Vec<_> = ["root", "a", "a0", "b"].into_iter().map(Rc::new).collect();
        let handle = |i: usize| Rc::downgrade(&nodes[i]);

        let mut mirror = Mirror::new();
        mirror.set_root(handle(0));
        mirror.insert(0, handle(1));
        mirror.insert(1, handle(3));
        mirror.down(&handle(1));
        mirror.insert(0, handle(2));
        mirror.up();

        let mut cache = GeometryCache::new();
        cache.store(&handle(0), Rect::new(0.0, 0.0, 100.0, 100.0));
        cache.store(&handle(1), Rect::new(0.0, 0.0, 50.0, 50.0));
        cache.store(&handle(2), Rect::new(10.0, 10.0, 10.0, 10.0));
        cache.store(&handle(3), Rect::new(40.0, 40.0, 50.0, 50.0));

        Self {
            nodes,
            mirror,
            cache,
        }
    }

    fn handle(&self, name: &str) -> Handle {
        let node = self
            .nodes
            .iter()
            .find(|node| ***node == name)
            .expect("node must be defined");
        Rc::downgrade(node)
    }

    fn records(&self) -> Vec<SnapshotNode<Handle>> {
        self.mirror.snapshot(|node| node.to_string())
    }

    fn hit(&self, x: f32, y: f32) -> Option<String> {
        let records = self.records();
        hit_test(&records, Point::new(x, y), &self.cache)
            .map(|node| node.description().to_owned())
    }
}

#[test]
fn deepest_node_wins() {
    let scene = Scene::new();
    assert_eq!(scene.hit(15.0, 15.0).as_deref(), Some("a0"));
    assert_eq!(scene.hit(30.0, 30.0).as_deref(), Some("a"));
    assert_eq!(scene.hit(95.0, 5.0).as_deref(), Some("root"));
}

#[test]
fn later_sibling_wins_ties() {
    let scene = Scene::new();
    // `a` and `b` overlap in (40..=50, 40..=50).
    assert_eq!(scene.hit(45.0, 45.0).as_deref(), Some("b"));
}

#[test]
fn edges_are_inside() {
    let scene = Scene::new();
    assert_eq!(scene.hit(20.0, 20.0).as_deref(), Some("a0"));
    assert_eq!(scene.hit(100.0, 100.0).as_deref(), Some("root"));
    assert_eq!(scene.hit(100.1, 100.0), None);
}

#[test]
fn nodes_without_geometry_are_skipped() {
    let mut scene = Scene::new();
    scene.cache.clear();
    scene
        .cache
        .store(&scene.handle("root"), Rect::new(0.0, 0.0, 100.0, 100.0));
    assert_eq!(scene.hit(15.0, 15.0).as_deref(), Some("root"));
}

#[test]
fn detached_nodes_are_skipped() {
    let mut scene = Scene::new();
    let a0 = scene.handle("a0");
    scene.cache.detach(&a0);
    assert_eq!(scene.hit(15.0, 15.0).as_deref(), Some("a"));
}

#[test]
fn nodes_dying_after_the_snapshot_are_skipped() {
    let mut scene = Scene::new();
    let records = scene.records();
    scene.nodes.retain(|node| **node != "a0");
    let hit = hit_test(&records, Point::new(15.0, 15.0), &scene.cache);
    assert_eq!(hit.map(SnapshotNode::description), Some("a"));
}

#[test]
fn empty_snapshot_hits_nothing() {
    let scene = Scene::new();
    let records: Vec<SnapshotNode<Handle>> = Vec::new();
    assert!(hit_test(&records, Point::new(1.0, 1.0), &scene.cache).is_none());
}
