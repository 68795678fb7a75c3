//! Directory/file hierarchy built from module-relative paths.
//!
//! Files are added one path at a time, creating directory nodes on the way.
//! Totals are not maintained incrementally: [`PathTree::accumulate`] walks
//! the whole tree bottom-up and recomputes every node's totals together with
//! the column widths the table renderer needs.

use std::collections::BTreeMap;

use crate::model::{digits_count, percent, Band, FileCoverage};

/// Narrowest the statements column may get, in digits (fits `Stmts`).
const MIN_STMTS_LEN: usize = 5;

/// Totals and render widths of a subtree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    pub all: u64,
    pub covered: u64,
    /// Widest `indent * 2 + name` label.
    pub file_max_len: usize,
    /// Widest `covered` + `all` digit count (the slash is not included).
    pub stmts_max_len: usize,
    /// Longest full path.
    pub full_path_max_len: usize,
}

impl Stats {
    fn absorb(&mut self, other: &Stats) {
        self.all += other.all;
        self.covered += other.covered;
        self.file_max_len = self.file_max_len.max(other.file_max_len);
        self.stmts_max_len = self.stmts_max_len.max(other.stmts_max_len);
        self.full_path_max_len = self.full_path_max_len.max(other.full_path_max_len);
    }
}

/// One path segment: a directory or a source file.
#[derive(Debug, Clone)]
pub struct Node {
    name: String,
    full_path: String,
    level: usize,
    value: Option<FileCoverage>,
    children: BTreeMap<String, Node>,
    all_statements: u64,
    covered: u64,
}

impl Node {
    fn new(name: &str, full_path: String, level: usize) -> Self {
        Self {
            name: name.to_string(),
            full_path,
            level,
            value: None,
            children: BTreeMap::new(),
            all_statements: 0,
            covered: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Segment chain from the top of the tree, e.g. `gocov/internal`.
    pub fn full_path(&self) -> &str {
        &self.full_path
    }

    /// Depth below the synthetic root; top-level nodes are level 0.
    #[must_use]
    pub fn level(&self) -> usize {
        self.level
    }

    /// The file's coverage, present only on file nodes.
    pub fn value(&self) -> Option<&FileCoverage> {
        self.value.as_ref()
    }

    #[must_use]
    pub fn is_file(&self) -> bool {
        self.value.is_some()
    }

    /// Children in ascending name order.
    pub fn children(&self) -> impl Iterator<Item = &Node> {
        self.children.values()
    }

    #[must_use]
    pub fn all_statements(&self) -> u64 {
        self.all_statements
    }

    #[must_use]
    pub fn covered(&self) -> u64 {
        self.covered
    }

    /// Covered percentage; 0.0 for a node without statements.
    #[must_use]
    pub fn percent(&self) -> f64 {
        percent(self.covered, self.all_statements)
    }

    #[must_use]
    pub fn band(&self) -> Band {
        Band::of(self.percent())
    }

    fn accumulate(&mut self) -> Stats {
        let mut stats = Stats::default();
        if let Some(value) = &self.value {
            stats.all = value.all_statements;
            stats.covered = value.covered;
        }
        for child in self.children.values_mut() {
            stats.absorb(&child.accumulate());
        }

        self.all_statements = stats.all;
        self.covered = stats.covered;

        let own = Stats {
            all: 0,
            covered: 0,
            file_max_len: self.level * 2 + self.name.chars().count(),
            stmts_max_len: digits_count(stats.all) + digits_count(stats.covered),
            full_path_max_len: self.full_path.chars().count(),
        };
        stats.absorb(&own);
        stats
    }
}

/// Which nodes a rendering shows.
#[derive(Debug, Clone, Copy, Default)]
pub struct Filter<'a> {
    /// Deepest level shown; 0 means unlimited.
    pub depth: usize,
    /// Full path prefixes to narrow the output to; empty shows everything.
    pub paths: &'a [String],
}

impl Filter<'_> {
    #[must_use]
    pub fn within_depth(&self, node: &Node) -> bool {
        self.depth == 0 || node.level <= self.depth
    }

    /// Top-level nodes, nodes under a selected prefix and the ancestors of a
    /// selected prefix are shown.
    #[must_use]
    pub fn selects(&self, node: &Node) -> bool {
        if self.paths.is_empty() || node.level == 0 {
            return true;
        }
        self.paths.iter().any(|selected| {
            node.full_path.starts_with(selected.as_str())
                || selected
                    .strip_prefix(node.full_path.as_str())
                    .is_some_and(|rest| rest.starts_with('/'))
        })
    }
}

/// Path tree with a synthetic, never rendered, root.
#[derive(Debug, Clone)]
pub struct PathTree {
    root: Node,
}

impl Default for PathTree {
    fn default() -> Self {
        Self::new()
    }
}

impl PathTree {
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: Node::new("root", String::new(), 0),
        }
    }

    /// Insert a file under its `/`-separated module-relative path, creating
    /// missing directory nodes.
    pub fn add(&mut self, path: &str, value: FileCoverage) {
        let segments: Vec<&str> = path.split('/').collect();
        let mut node = &mut self.root;
        for (level, segment) in segments.iter().enumerate() {
            node = node
                .children
                .entry((*segment).to_string())
                .or_insert_with(|| Node::new(segment, segments[..=level].join("/"), level));
        }
        if node.value.is_none() && node.children.is_empty() {
            node.value = Some(value);
        }
    }

    /// Recompute every node's totals bottom-up and return the tree-wide
    /// totals and widths. The synthetic root contributes to the totals only.
    pub fn accumulate(&mut self) -> Stats {
        let mut stats = Stats::default();
        for child in self.root.children.values_mut() {
            stats.absorb(&child.accumulate());
        }
        self.root.all_statements = stats.all;
        self.root.covered = stats.covered;
        stats.stmts_max_len = stats.stmts_max_len.max(MIN_STMTS_LEN);
        stats
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Top-level nodes in ascending name order.
    pub fn top_level(&self) -> impl Iterator<Item = &Node> {
        self.root.children()
    }

    /// Find a node by its full path.
    pub fn find(&self, full_path: &str) -> Option<&Node> {
        let mut node = &self.root;
        for segment in full_path.split('/') {
            node = node.children.get(segment)?;
        }
        Some(node)
    }

    /// Nodes a rendering shows, in render order (depth first, children
    /// sorted by name).
    pub fn visible<'t>(&'t self, filter: &Filter<'_>) -> Vec<&'t Node> {
        fn walk<'t>(node: &'t Node, filter: &Filter<'_>, out: &mut Vec<&'t Node>) {
            if !filter.within_depth(node) {
                return;
            }
            if filter.selects(node) {
                out.push(node);
            }
            for child in node.children() {
                walk(child, filter, out);
            }
        }

        let mut out = Vec::new();
        for node in self.top_level() {
            walk(node, filter, &mut out);
        }
        out
    }
}
