//! Property tests of the mirror against a `Vec`-based tree model.
//!
//! Random edit sequences are applied to both the mirror and a naive nested
//! `Vec` tree. After every sequence:
//!
//! 1. Snapshots list the same live nodes with the same paths and child counts
//! 2. Every node in the model is tracked, and nothing else
//! 3. `path_of` agrees with the snapshot paths
//! 4. The cursor depth matches

use std::rc::{self, Rc};

use lineage::{Mirror, Path};
use proptest::prelude::*;

// ── Strategies ──────────────────────────────────────────────────────────

/// Edits applied relative to the cursor.
#[derive(Debug, Clone)]
enum Op {
    Insert(usize),
    Remove(usize, usize),
    Move(usize, usize, usize),
    Down(usize),
    Up,
    Clear,
    Kill(usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        6 => (0usize..6).prop_map(Op::Insert),
        2 => (0usize..6, 0usize..4).prop_map(|(i, n)| Op::Remove(i, n)),
        2 => (0usize..6, 0usize..7, 0usize..4).prop_map(|(f, t, n)| Op::Move(f, t, n)),
        3 => (0usize..6).prop_map(Op::Down),
        2 => Just(Op::Up),
        1 => Just(Op::Clear),
        1 => (0usize..64).prop_map(Op::Kill),
    ]
}

// ── Model ───────────────────────────────────────────────────────────────

#[derive(Debug)]
struct ModelNode {
    id: usize,
    children: Vec<ModelNode>,
}

impl ModelNode {
    fn leaf(id: usize) -> Self {
        Self {
            id,
            children: Vec::new(),
        }
    }

    fn count(&self) -> usize {
        1 + self.children.iter().map(Self::count).sum::<usize>()
    }

    fn ids(&self, out: &mut Vec<usize>) {
        out.push(self.id);
        for child in &self.children {
            child.ids(out);
        }
    }
}

struct Harness {
    mirror: Mirror<rc::Weak<usize>>,
    /// Strong references by node ID; `None` once killed.
    strong: Vec<Option<Rc<usize>>>,
    /// Weak handles by node ID, kept so that addresses are never reused.
    handles: Vec<rc::Weak<usize>>,
    root: ModelNode,
    /// Child indices from the root to the cursor.
    cursor: Vec<usize>,
    stack: Vec<Vec<usize>>,
}

impl Harness {
    fn new() -> Self {
        let mut harness = Self {
            mirror: Mirror::new(),
            strong: Vec::new(),
            handles: Vec::new(),
            root: ModelNode::leaf(0),
            cursor: Vec::new(),
            stack: Vec::new(),
        };
        let root = harness.create_node();
        harness.mirror.set_root(root);
        harness
    }

    fn create_node(&mut self) -> rc::Weak<usize> {
        let node = Rc::new(self.strong.len());
        let weak = Rc::downgrade(&node);
        self.strong.push(Some(node));
        self.handles.push(weak.clone());
        weak
    }

    fn cursor_node(&mut self) -> &mut ModelNode {
        let mut node = &mut self.root;
        for &i in &self.cursor {
            node = &mut node.children[i];
        }
        node
    }

    fn apply(&mut self, op: &Op) {
        match *op {
            Op::Insert(index) => {
                let weak = self.create_node();
                let id = self.handles.len() - 1;
                self.mirror.insert(index, weak);
                let children = &mut self.cursor_node().children;
                let at = index.min(children.len());
                children.insert(at, ModelNode::leaf(id));
            }
            Op::Remove(index, count) => {
                self.mirror.remove(index, count);
                let children = &mut self.cursor_node().children;
                if index < children.len() {
                    let end = (index + count).min(children.len());
                    children.drain(index..end);
                }
            }
            Op::Move(from, to, count) => {
                self.mirror.move_children(from, to, count);
                let children = &mut self.cursor_node().children;
                if from == to || from >= children.len() {
                    return;
                }
                let dest = if from > to {
                    to
                } else {
                    to.saturating_sub(count)
                };
                let end = (from + count).min(children.len());
                let block: Vec<_> = children.drain(from..end).collect();
                for (offset, node) in block.into_iter().enumerate() {
                    let at = (dest + offset).min(children.len());
                    children.insert(at, node);
                }
            }
            Op::Down(index) => {
                let Some(id) = self.cursor_node().children.get(index).map(|n| n.id) else {
                    return;
                };
                let handle = self.handles[id].clone();
                self.mirror.down(&handle);
                self.stack.push(self.cursor.clone());
                self.cursor.push(index);
            }
            Op::Up => {
                self.mirror.up();
                if let Some(cursor) = self.stack.pop() {
                    self.cursor = cursor;
                }
            }
            Op::Clear => {
                self.mirror.clear();
                self.root.children.clear();
                self.cursor.clear();
                self.stack.clear();
            }
            Op::Kill(n) => {
                let id = n % self.strong.len();
                self.strong[id] = None;
            }
        }
    }

    /// Returns `(path, id, child_count)` of live nodes in pre-order.
    fn expected_records(&self) -> Vec<(Vec<usize>, usize, usize)> {
        fn collect(
            node: &ModelNode,
            strong: &[Option<Rc<usize>>],
            path: &mut Vec<usize>,
            out: &mut Vec<(Vec<usize>, usize, usize)>,
        ) {
            if strong[node.id].is_none() {
                return;
            }
            out.push((path.clone(), node.id, node.children.len()));
            for (i, child) in node.children.iter().enumerate() {
                path.push(i);
                collect(child, strong, path, out);
                path.pop();
            }
        }

        let mut out = Vec::new();
        collect(&self.root, &self.strong, &mut vec![0], &mut out);
        out
    }

    fn actual_records(&self) -> Vec<(Vec<usize>, usize, usize)> {
        self.mirror
            .snapshot(|node| node.to_string())
            .iter()
            .map(|record| {
                let id = record
                    .description()
                    .parse()
                    .expect("descriptions are node IDs");
                (record.path().to_vec(), id, record.child_count())
            })
            .collect()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn snapshot_matches_model(ops in prop::collection::vec(op_strategy(), 0..60)) {
        let mut harness = Harness::new();
        for op in &ops {
            harness.apply(op);
        }

        prop_assert_eq!(harness.actual_records(), harness.expected_records());
        prop_assert_eq!(harness.mirror.depth(), harness.stack.len());
    }

    #[test]
    fn tracked_nodes_match_model(ops in prop::collection::vec(op_strategy(), 0..60)) {
        let mut harness = Harness::new();
        for op in &ops {
            harness.apply(op);
        }

        let mut ids = Vec::new();
        harness.root.ids(&mut ids);
        prop_assert_eq!(harness.mirror.len(), harness.root.count());
        for (id, handle) in harness.handles.iter().enumerate() {
            prop_assert_eq!(harness.mirror.contains(handle), ids.contains(&id), "node {}", id);
        }
    }

    #[test]
    fn path_of_agrees_with_snapshot(ops in prop::collection::vec(op_strategy(), 0..60)) {
        let mut harness = Harness::new();
        for op in &ops {
            harness.apply(op);
        }

        for (path, id, _) in harness.expected_records() {
            prop_assert_eq!(
                harness.mirror.path_of(&harness.handles[id]),
                Some(Path::from(path))
            );
        }
    }
}
