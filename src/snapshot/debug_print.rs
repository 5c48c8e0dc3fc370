//! Tree printer.

use core::fmt::{self, Write as _};

use crate::node_ref::NodeRef;
use crate::snapshot::SnapshotNode;

/// Returns the guide drawn for an item on its first line or on a
/// continuation line.
fn guide(is_last_sibling: bool, is_first_line: bool) -> &'static str {
    match (is_last_sibling, is_first_line) {
        (false, true) => "|-- ",
        (false, false) => "|   ",
        (true, true) => "`-- ",
        (true, false) => "    ",
    }
}

/// Writes a record, prefixing each of its lines with the guides of the open
/// items.
///
/// `open` tells for each open item below the root whether it is the last
/// sibling, the record itself last.
fn write_record<H: NodeRef>(
    f: &mut fmt::Formatter<'_>,
    open: &[bool],
    node: &SnapshotNode<H>,
) -> fmt::Result {
    let text = node.to_string();
    for (i, line) in text.split('\n').enumerate() {
        if i != 0 {
            f.write_char('\n')?;
        }
        let mut prefix = String::new();
        if let Some((&is_last, outer)) = open.split_last() {
            for &outer_last in outer {
                prefix.push_str(guide(outer_last, false));
            }
            prefix.push_str(guide(is_last, i == 0));
        }
        if line.is_empty() {
            f.write_str(prefix.trim_end())?;
        } else {
            f.write_str(&prefix)?;
            f.write_str(line)?;
        }
    }

    Ok(())
}

/// Printer of snapshot records as an indented tree.
///
/// The first record is printed as the root. Note that the output format is
/// meant for humans and is not guaranteed to be stable.
///
/// ```text
/// Root [0]
/// |-- Column [0,0]
/// |   |-- Text [0,0,0]
/// |   `-- Text [0,0,1]
/// `-- Row [0,1]
/// ```
pub struct DisplayTree<'a, H> {
    /// Records in pre-order.
    nodes: &'a [SnapshotNode<H>],
}

impl<'a, H> DisplayTree<'a, H> {
    /// Creates a printer for the records.
    #[inline]
    #[must_use]
    pub(crate) fn new(nodes: &'a [SnapshotNode<H>]) -> Self {
        Self { nodes }
    }
}

impl<H: NodeRef> fmt::Display for DisplayTree<'_, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some((root, descendants)) = self.nodes.split_first() else {
            return Ok(());
        };
        let base = root.depth();
        let mut open = Vec::new();
        // Child counts of the open items, the root first.
        let mut child_counts = vec![root.child_count()];

        write_record(f, &open, root)?;
        for node in descendants {
            let depth = node.depth().saturating_sub(base).max(1);
            open.truncate(depth - 1);
            child_counts.truncate(depth);

            let parent_count = child_counts.last().copied().unwrap_or(0);
            let is_last_sibling = node
                .path()
                .last()
                .map_or(true, |index| index + 1 >= parent_count);
            open.push(is_last_sibling);
            f.write_char('\n')?;
            write_record(f, &open, node)?;
            child_counts.push(node.child_count());
        }

        Ok(())
    }
}
