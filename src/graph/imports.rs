// src/graph/imports.rs

use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::{Path, PathBuf};

use petgraph::graphmap::DiGraphMap;
use petgraph::visit::Bfs;
use tracing::debug;

use crate::graph::resolve::{normalize, resolve_import, with_default_extension};

/// Which source files import which other source files.
///
/// Keys are importers; values are the resolved absolute paths of their
/// direct imports. An entry only exists once its key has been compiled
/// successfully at least once.
#[derive(Debug, Clone)]
pub struct ImportGraph {
    default_extension: String,
    imports: HashMap<PathBuf, HashSet<PathBuf>>,
}

impl ImportGraph {
    pub fn new(default_extension: impl Into<String>) -> Self {
        Self {
            default_extension: default_extension.into(),
            imports: HashMap::new(),
        }
    }

    /// Replace the import set of `source` with the resolution of `raw_refs`.
    ///
    /// The previous entry is discarded wholesale, which is what drops stale
    /// edges after an import is deleted from the file.
    pub fn record_imports<S: AsRef<str>>(&mut self, source: &Path, raw_refs: &[S]) {
        let source = normalize(source);
        let importer_dir = source.parent().map(Path::to_path_buf).unwrap_or_default();

        let resolved: HashSet<PathBuf> = raw_refs
            .iter()
            .map(|r| resolve_import(&importer_dir, r.as_ref(), &self.default_extension))
            .collect();

        debug!(source = ?source, imports = resolved.len(), "recorded imports");
        self.imports.insert(source, resolved);
    }

    /// Every importer whose recorded imports contain `changed`.
    ///
    /// `changed` is normalized and given the default extension when it has
    /// none, mirroring how bare import references are resolved.
    pub fn dependents_of(&self, changed: &Path) -> BTreeSet<PathBuf> {
        let target = self.comparable(changed);
        self.imports
            .iter()
            .filter(|(_, imports)| imports.contains(&target))
            .map(|(importer, _)| importer.clone())
            .collect()
    }

    /// Every file that reaches `changed` through one or more import edges.
    pub fn transitive_dependents(&self, changed: &Path) -> BTreeSet<PathBuf> {
        let target = self.comparable(changed);

        // Edges point from an imported file to its importer.
        let mut graph: DiGraphMap<&Path, ()> = DiGraphMap::new();
        for (importer, imports) in &self.imports {
            graph.add_node(importer.as_path());
            for imported in imports {
                graph.add_edge(imported.as_path(), importer.as_path(), ());
            }
        }

        let mut found = BTreeSet::new();
        if !graph.contains_node(target.as_path()) {
            return found;
        }

        let mut bfs = Bfs::new(&graph, target.as_path());
        while let Some(node) = bfs.next(&graph) {
            if node != target.as_path() {
                found.insert(node.to_path_buf());
            }
        }
        found
    }

    /// Drop `path` as an importer. Edges from other files that point at
    /// `path` are kept and simply dangle until the file reappears.
    pub fn forget(&mut self, path: &Path) -> bool {
        self.imports.remove(&normalize(path)).is_some()
    }

    pub fn contains(&self, source: &Path) -> bool {
        self.imports.contains_key(&normalize(source))
    }

    pub fn len(&self) -> usize {
        self.imports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.imports.is_empty()
    }

    fn comparable(&self, path: &Path) -> PathBuf {
        normalize(&with_default_extension(path, &self.default_extension))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(s: &str) -> PathBuf {
        PathBuf::from(s)
    }

    #[test]
    fn dependents_resolve_relative_to_importer_dir() {
        let mut graph = ImportGraph::new("less");
        graph.record_imports(&p("/s/pages/home.less"), &["../base", "local.less"]);
        graph.record_imports(&p("/s/main.less"), &["base"]);

        assert_eq!(
            graph.dependents_of(&p("/s/base.less")),
            BTreeSet::from([p("/s/main.less"), p("/s/pages/home.less")])
        );
        assert_eq!(
            graph.dependents_of(&p("/s/pages/local.less")),
            BTreeSet::from([p("/s/pages/home.less")])
        );
    }

    #[test]
    fn changed_path_without_extension_gets_default() {
        let mut graph = ImportGraph::new("less");
        graph.record_imports(&p("/s/a.less"), &["b"]);
        assert_eq!(
            graph.dependents_of(&p("/s/./b")),
            BTreeSet::from([p("/s/a.less")])
        );
    }

    #[test]
    fn record_replaces_previous_entry() {
        let mut graph = ImportGraph::new("less");
        graph.record_imports(&p("/s/a.less"), &["b"]);
        graph.record_imports(&p("/s/a.less"), &["c"]);

        assert!(graph.dependents_of(&p("/s/b.less")).is_empty());
        assert_eq!(graph.dependents_of(&p("/s/c.less")).len(), 1);
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn forget_keeps_inbound_edges_dangling() {
        let mut graph = ImportGraph::new("less");
        graph.record_imports(&p("/s/a.less"), &["b"]);
        graph.record_imports(&p("/s/b.less"), &["c"]);

        assert!(graph.forget(&p("/s/b.less")));
        assert!(!graph.contains(&p("/s/b.less")));
        // a still points at b; nothing points at c anymore.
        assert_eq!(graph.dependents_of(&p("/s/b.less")), BTreeSet::from([p("/s/a.less")]));
        assert!(graph.dependents_of(&p("/s/c.less")).is_empty());
        assert!(!graph.forget(&p("/s/missing.less")));
    }

    #[test]
    fn transitive_dependents_follow_chains_and_survive_cycles() {
        let mut graph = ImportGraph::new("less");
        graph.record_imports(&p("/s/main.less"), &["layout"]);
        graph.record_imports(&p("/s/layout.less"), &["grid"]);
        graph.record_imports(&p("/s/grid.less"), &["layout"]);
        graph.record_imports(&p("/s/other.less"), &Vec::<String>::new());

        assert_eq!(
            graph.transitive_dependents(&p("/s/grid.less")),
            BTreeSet::from([p("/s/layout.less"), p("/s/main.less")])
        );
        assert!(graph.transitive_dependents(&p("/s/unknown.less")).is_empty());
        assert!(graph.transitive_dependents(&p("/s/main.less")).is_empty());
    }
}
