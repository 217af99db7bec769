//! Dependency graphs decoded from `%gra` tiers.
//!
//! Edges are stored flat, indexed by dependent position; node 0 is the
//! virtual root and tokens occupy nodes 1..=n. A graph that violates the
//! well-formedness conditions is kept but marked `faulty`, and the
//! structural accessors below return nothing for it.

use std::collections::BTreeMap;

use petgraph::algo::dijkstra;
use petgraph::graph::{DiGraph, NodeIndex};

use crate::model::Token;

/// One `dep|head|rel` triple.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GraEdge {
    /// 1-based dependent node.
    pub dependent: usize,
    /// Head node; 0 is the virtual root.
    pub head: usize,
    /// Relation label, e.g. `SUBJ`, `ROOT`.
    pub relation: String,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DependencyGraph {
    n_tokens: usize,
    edges: Vec<GraEdge>,
    faulty: bool,
}

/// One row of CoNLL-style tabular output.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConllRow {
    /// 1-based node index.
    pub index: usize,
    pub word: String,
    pub lemma: String,
    pub pos: String,
    pub head: usize,
    pub relation: String,
}

/// Root-relative depths for drawing a graph as a tree.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeLayout {
    /// Depth of each token node (1-based), root excluded. Nodes unreachable
    /// from the root are absent.
    pub depths: BTreeMap<usize, usize>,
    pub max_depth: usize,
}

impl DependencyGraph {
    /// Build a graph over `n_tokens` tokens from decoded triples.
    ///
    /// The result is marked faulty when the triple count disagrees with the
    /// token count, a dependent index is repeated, out of range, or zero, or
    /// an edge is a self-loop.
    pub fn new(n_tokens: usize, edges: Vec<GraEdge>) -> DependencyGraph {
        let mut faulty = edges.len() != n_tokens;
        let mut seen = vec![false; n_tokens + 1];
        for e in &edges {
            if e.dependent == 0
                || e.dependent > n_tokens
                || e.head > n_tokens
                || e.dependent == e.head
                || seen[e.dependent]
            {
                faulty = true;
                break;
            }
            seen[e.dependent] = true;
        }
        DependencyGraph {
            n_tokens,
            edges,
            faulty,
        }
    }

    pub fn faulty_with(n_tokens: usize, edges: Vec<GraEdge>) -> DependencyGraph {
        DependencyGraph {
            n_tokens,
            edges,
            faulty: true,
        }
    }

    pub fn is_faulty(&self) -> bool {
        self.faulty
    }

    /// Node count, including the virtual root.
    pub fn n_nodes(&self) -> usize {
        self.n_tokens + 1
    }

    pub fn n_tokens(&self) -> usize {
        self.n_tokens
    }

    pub fn edges(&self) -> &[GraEdge] {
        &self.edges
    }

    /// Head of the 1-based dependent node. `None` on faulty graphs.
    pub fn head_of(&self, dependent: usize) -> Option<usize> {
        if self.faulty {
            return None;
        }
        self.edges
            .iter()
            .find(|e| e.dependent == dependent)
            .map(|e| e.head)
    }

    /// Relation label on the edge out of the given dependent node.
    pub fn rel_of(&self, dependent: usize) -> Option<&str> {
        if self.faulty {
            return None;
        }
        self.edges
            .iter()
            .find(|e| e.dependent == dependent)
            .map(|e| e.relation.as_str())
    }

    /// Dependents of the given head node, in surface order.
    pub fn dependents_of(&self, head: usize) -> Vec<usize> {
        if self.faulty {
            return Vec::new();
        }
        self.edges
            .iter()
            .filter(|e| e.head == head)
            .map(|e| e.dependent)
            .collect()
    }

    pub fn edge_exists(&self, dependent: usize, head: usize) -> bool {
        !self.faulty
            && self
                .edges
                .iter()
                .any(|e| e.dependent == dependent && e.head == head)
    }

    /// CoNLL-style rows pairing each token with its head and relation.
    /// Empty on faulty graphs or when the token slice disagrees in length.
    pub fn conll_rows(&self, tokens: &[Token]) -> Vec<ConllRow> {
        if self.faulty || tokens.len() != self.n_tokens {
            return Vec::new();
        }
        let mut rows = Vec::with_capacity(self.n_tokens);
        for (i, token) in tokens.iter().enumerate() {
            let node = i + 1;
            let (head, relation) = self
                .edges
                .iter()
                .find(|e| e.dependent == node)
                .map(|e| (e.head, e.relation.clone()))
                .unwrap_or((0, String::new()));
            rows.push(ConllRow {
                index: node,
                word: token.word.clone(),
                lemma: token.lemma_str().to_string(),
                pos: token.pos_str().to_string(),
                head,
                relation,
            });
        }
        rows
    }

    /// Project the graph onto root-relative depths. `None` on faulty graphs.
    pub fn layout(&self) -> Option<TreeLayout> {
        if self.faulty {
            return None;
        }
        let mut g: DiGraph<usize, ()> = DiGraph::new();
        let nodes: Vec<NodeIndex> = (0..self.n_nodes()).map(|i| g.add_node(i)).collect();
        for e in &self.edges {
            g.add_edge(nodes[e.head], nodes[e.dependent], ());
        }
        let dist = dijkstra(&g, nodes[0], None, |_| 1usize);
        let mut depths = BTreeMap::new();
        let mut max_depth = 0;
        for (ix, d) in dist {
            let node = g[ix];
            if node == 0 {
                continue;
            }
            max_depth = max_depth.max(d);
            depths.insert(node, d);
        }
        Some(TreeLayout { depths, max_depth })
    }
}
