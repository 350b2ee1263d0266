//! Breadth-first relationship building.
//!
//! Walks the classified rows level by level. Level-0 rows hang under the root
//! assembly code; rows at level `k` hang under the parents resolved at level
//! `k - 1` whose position is a prefix of theirs. Rows sharing a code under the
//! same parent are consolidated into one edge with the summed quantity.
//!
//! Every component code is expanded at most once: the first position at which
//! a code is resolved is the only one whose children are read. Later
//! occurrences of the same code elsewhere in the tree reuse that expansion.

use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

use super::classifier::ClassifiedRows;
use crate::models::{ConsolidationRecord, DuplicateRecord, Edge, LeveledRow};

/// A code registered as a parent, with the position used to find its children
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedParent {
    pub code: String,
    pub position: String,
    pub depth: usize,
}

/// Edges and audit records produced for one root assembly
#[derive(Debug, Clone, Default)]
pub struct RelationshipGraph {
    /// Emitted edges in breadth-first order
    pub edges: Vec<Edge>,
    /// Aggregated quantity per (parent, child) pair
    pub edge_quantities: HashMap<(String, String), f64>,
    pub duplicates: Vec<DuplicateRecord>,
    pub consolidations: Vec<ConsolidationRecord>,
    /// Parents in registration order
    pub resolved_parents: Vec<ResolvedParent>,
}

impl RelationshipGraph {
    /// Number of distinct (parent, child) pairs
    pub fn distinct_pairs(&self) -> usize {
        self.edge_quantities.len()
    }

    pub fn resolved_parent(&self, code: &str) -> Option<&ResolvedParent> {
        self.resolved_parents.iter().find(|p| p.code == code)
    }
}

/// Rows of one level sharing a code under one parent
struct CodeGroup<'a> {
    code: &'a str,
    total: f64,
    occurrences: Vec<&'a LeveledRow>,
}

impl CodeGroup<'_> {
    fn representative_position(&self) -> &str {
        &self.occurrences[0].position
    }
}

/// Group rows by code, keeping first-appearance order of the codes
fn group_by_code<'a>(rows: impl Iterator<Item = &'a LeveledRow>) -> Vec<CodeGroup<'a>> {
    let mut groups: Vec<CodeGroup<'a>> = Vec::new();
    let mut index_of: HashMap<&'a str, usize> = HashMap::new();

    for row in rows {
        let quantity = row.quantity.unwrap_or(0.0);
        match index_of.get(row.code.as_str()) {
            Some(&i) => {
                groups[i].total += quantity;
                groups[i].occurrences.push(row);
            }
            None => {
                index_of.insert(row.code.as_str(), groups.len());
                groups.push(CodeGroup {
                    code: row.code.as_str(),
                    total: quantity,
                    occurrences: vec![row],
                });
            }
        }
    }

    groups
}

/// Whether `candidate` is a direct-descendant position of `parent_position`.
///
/// A `N.0` parent is a top-level marker: its children are `N.x` positions that
/// are not themselves `.0` markers.
pub fn is_child_position(parent_position: &str, candidate: &str) -> bool {
    if parent_position.ends_with(".0") {
        let prefix = parent_position.split('.').next().unwrap_or(parent_position);
        candidate.starts_with(prefix)
            && candidate[prefix.len()..].starts_with('.')
            && !candidate.ends_with(".0")
    } else {
        candidate.starts_with(parent_position)
            && candidate[parent_position.len()..].starts_with('.')
    }
}

struct Builder {
    graph: RelationshipGraph,
    registered: HashSet<String>,
}

impl Builder {
    fn new() -> Self {
        Self {
            graph: RelationshipGraph::default(),
            registered: HashSet::new(),
        }
    }

    /// Emit duplicates, consolidations and one edge per group under `parent`
    fn emit(&mut self, parent: &str, groups: &[CodeGroup<'_>]) {
        for group in groups {
            let count = group.occurrences.len();
            if count > 1 {
                for (i, row) in group.occurrences.iter().enumerate() {
                    self.graph.duplicates.push(DuplicateRecord {
                        line_number: row.line_number(),
                        position: row.position.clone(),
                        quantity: row.quantity,
                        code: group.code.to_string(),
                        rank: i + 1,
                        occurrences: count,
                        consolidated_quantity: group.total,
                    });
                }
                self.graph.consolidations.push(ConsolidationRecord {
                    parent: parent.to_string(),
                    child: group.code.to_string(),
                    quantity: group.total,
                    occurrences: count,
                    child_position: group.representative_position().to_string(),
                });
                debug!(
                    "Consolidated {} occurrences of {} under {} (qty {})",
                    count, group.code, parent, group.total
                );
            }

            *self
                .graph
                .edge_quantities
                .entry((parent.to_string(), group.code.to_string()))
                .or_insert(0.0) += group.total;
            self.graph.edges.push(Edge {
                parent: parent.to_string(),
                child: group.code.to_string(),
                quantity: group.total,
            });
        }
    }

    fn register(&mut self, parents: Vec<ResolvedParent>) {
        for parent in parents {
            if self.registered.insert(parent.code.clone()) {
                self.graph.resolved_parents.push(parent);
            }
        }
    }

    fn parents_at(&self, depth: usize) -> Vec<ResolvedParent> {
        self.graph
            .resolved_parents
            .iter()
            .filter(|p| p.depth == depth)
            .cloned()
            .collect()
    }
}

/// Build the deduplicated parent-child edge set for `root_code`
pub fn build_relationships(classified: &ClassifiedRows, root_code: &str) -> RelationshipGraph {
    let mut builder = Builder::new();

    let top_level = classified.rows_at(0);
    if !top_level.is_empty() {
        let groups = group_by_code(top_level.iter());
        builder.emit(root_code, &groups);
        let parents = groups
            .iter()
            .map(|g| ResolvedParent {
                code: g.code.to_string(),
                position: g.representative_position().to_string(),
                depth: 0,
            })
            .collect();
        builder.register(parents);
    }

    let mut level = 1;
    loop {
        let rows = classified.rows_at(level);
        let parents = builder.parents_at(level - 1);
        if rows.is_empty() || parents.is_empty() {
            break;
        }

        let mut next_level = Vec::new();
        let mut pending: HashSet<String> = HashSet::new();

        for parent in &parents {
            let groups = group_by_code(
                rows.iter()
                    .filter(|row| is_child_position(&parent.position, &row.position)),
            );
            builder.emit(&parent.code, &groups);

            for group in &groups {
                if !builder.registered.contains(group.code) && pending.insert(group.code.to_string())
                {
                    next_level.push(ResolvedParent {
                        code: group.code.to_string(),
                        position: group.representative_position().to_string(),
                        depth: level,
                    });
                }
            }
        }

        debug!(
            "Level {}: {} parents, {} new parents registered",
            level,
            parents.len(),
            next_level.len()
        );
        builder.register(next_level);
        level += 1;
    }

    let graph = builder.graph;
    info!(
        "Built {} relationships ({} duplicates, {} consolidations) under {}",
        graph.edges.len(),
        graph.duplicates.len(),
        graph.consolidations.len(),
        root_code
    );
    graph
}
