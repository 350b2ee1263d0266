//! Post-build inspection of the generated structure.
//!
//! Purchased (`Z`) parts are never assemblies in NEO. An edge whose parent
//! code contains a `Z` usually means a drawing number was typed in the wrong
//! row, so such edges are reported back to the user.

use crate::constants::{HEADER_LINE_OFFSET, PURCHASED_PART_PREFIX};
use crate::models::{Edge, format_quantity};

/// An edge whose parent code contains `Z`
#[derive(Debug, Clone, PartialEq)]
pub struct ZParentEntry {
    /// Line of the edge in the generated file (header is line 1)
    pub line_number: usize,
    pub parent: String,
    pub child: String,
    pub quantity: f64,
}

impl ZParentEntry {
    pub fn describe(&self) -> String {
        format!(
            "Line {}: {} -> {} (qty {})",
            self.line_number,
            self.parent,
            self.child,
            format_quantity(self.quantity)
        )
    }
}

/// Find edges with a `Z` in the parent column, case-insensitive
pub fn find_z_parents(edges: &[Edge]) -> Vec<ZParentEntry> {
    edges
        .iter()
        .enumerate()
        .filter(|(_, edge)| {
            edge.parent
                .chars()
                .any(|c| c.eq_ignore_ascii_case(&PURCHASED_PART_PREFIX))
        })
        .map(|(i, edge)| ZParentEntry {
            line_number: i + HEADER_LINE_OFFSET,
            parent: edge.parent.clone(),
            child: edge.child.clone(),
            quantity: edge.quantity,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_z_parents_found_with_line_numbers() {
        let edges = vec![
            Edge {
                parent: "ROOT".into(),
                child: "Z1".into(),
                quantity: 1.0,
            },
            Edge {
                parent: "Z1".into(),
                child: "G2".into(),
                quantity: 2.0,
            },
            Edge {
                parent: "gz3".into(),
                child: "G4".into(),
                quantity: 1.5,
            },
        ];
        let found = find_z_parents(&edges);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].line_number, 3);
        assert_eq!(found[1].parent, "gz3");
        assert_eq!(found[0].describe(), "Line 3: Z1 -> G2 (qty 2)");
    }

    #[test]
    fn test_no_z_parents() {
        let edges = vec![Edge {
            parent: "ROOT".into(),
            child: "Z1".into(),
            quantity: 1.0,
        }];
        assert!(find_z_parents(&edges).is_empty());
    }
}
