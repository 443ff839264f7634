use std::fmt;

use super::node::NodeId;
use super::OrderedMap;

/// Renders the tree top-down, one record per line:
///
/// ```text
///  ── 3
///     ├── 1
///     │   ├── 0
///     │   └── 2
///     └── 7
/// ```
///
/// Each line shows the record's value; tombstones are prefixed with `deleted`.
impl<K, V: fmt::Display, C> fmt::Display for OrderedMap<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.root {
            Some(root) => self.render(f, root, "", " ── ", "    "),
            None => Ok(()),
        }
    }
}

impl<K, V: fmt::Display, C> OrderedMap<K, V, C> {
    fn render(
        &self,
        f: &mut fmt::Formatter<'_>,
        id: NodeId,
        prefix: &str,
        connector: &str,
        indent: &str,
    ) -> fmt::Result {
        let node = self.arena.get(id);

        write!(f, "{prefix}{connector}")?;
        match (node.tombstone, &node.value) {
            (true, Some(value)) => writeln!(f, "deleted {value}")?,
            (true, None) => writeln!(f, "deleted")?,
            (false, Some(value)) => writeln!(f, "{value}")?,
            (false, None) => writeln!(f)?,
        }

        let children: Vec<NodeId> = node.left.into_iter().chain(node.right).collect();
        let child_prefix = format!("{prefix}{indent}");
        for (i, child) in children.iter().enumerate() {
            if i + 1 == children.len() {
                self.render(f, *child, &child_prefix, "└── ", "    ")?;
            } else {
                self.render(f, *child, &child_prefix, "├── ", "│   ")?;
            }
        }
        Ok(())
    }
}
