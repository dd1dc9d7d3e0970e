//! Static description of how the pieces of the system connect, drawn on the
//! Architecture page

use std::collections::HashSet;

use thiserror::Error;

/// Variant order is the order of the legend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumIter)]
pub enum NodeKind {
    Client,
    Service,
    Worker,
    Storage,
    External,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArchNode {
    pub id: &'static str,
    pub label: &'static str,
    pub kind: NodeKind,
    /// Position as a fraction of the canvas, both axes in `0.0..=1.0`
    pub pos: (f32, f32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchEdge {
    pub from: &'static str,
    pub to: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArchitectureGraph {
    pub nodes: &'static [ArchNode],
    pub edges: &'static [ArchEdge],
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("node id used more than once: {0}")]
    DuplicateNode(&'static str),
    #[error("edge {from} -> {to} references unknown node {missing}")]
    DanglingEdge {
        from: &'static str,
        to: &'static str,
        missing: &'static str,
    },
    #[error("node {0} is positioned outside the canvas")]
    OutOfBounds(&'static str),
}

const fn node(id: &'static str, label: &'static str, kind: NodeKind, pos: (f32, f32)) -> ArchNode {
    ArchNode {
        id,
        label,
        kind,
        pos,
    }
}

const fn edge(from: &'static str, to: &'static str, label: &'static str) -> ArchEdge {
    ArchEdge { from, to, label }
}

pub const SYSTEM_GRAPH: ArchitectureGraph = ArchitectureGraph {
    nodes: &[
        node("dashboard", "Emuy Tools", NodeKind::Client, (0.5, 0.08)),
        node("auth", "Auth Service", NodeKind::Service, (0.15, 0.4)),
        node("attendance", "Attendance API", NodeKind::Service, (0.38, 0.4)),
        node("events", "Events API", NodeKind::Service, (0.62, 0.4)),
        node("bingo", "Bingo API", NodeKind::Service, (0.85, 0.4)),
        node("calendar_sync", "Calendar Sync Worker", NodeKind::Worker, (0.62, 0.7)),
        node("database", "Database", NodeKind::Storage, (0.38, 0.92)),
        node("discord", "Discord OAuth", NodeKind::External, (0.05, 0.7)),
        node("google", "Google Calendar", NodeKind::External, (0.85, 0.92)),
        node("github", "GitHub", NodeKind::External, (0.92, 0.08)),
    ],
    edges: &[
        edge("dashboard", "auth", "session"),
        edge("dashboard", "attendance", "records"),
        edge("dashboard", "calendar_sync", "status"),
        edge("dashboard", "github", "actions"),
        edge("auth", "discord", "oauth"),
        edge("auth", "database", "users"),
        edge("attendance", "database", "records"),
        edge("events", "database", "events"),
        edge("bingo", "database", "boards"),
        edge("calendar_sync", "events", "read"),
        edge("calendar_sync", "google", "publish"),
    ],
};

impl ArchitectureGraph {
    pub fn node(&self, id: &str) -> Option<&ArchNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn validate(&self) -> Result<(), GraphError> {
        let mut seen = HashSet::new();
        for node in self.nodes {
            if !seen.insert(node.id) {
                return Err(GraphError::DuplicateNode(node.id));
            }
            let (x, y) = node.pos;
            if !(0.0..=1.0).contains(&x) || !(0.0..=1.0).contains(&y) {
                return Err(GraphError::OutOfBounds(node.id));
            }
        }
        for edge in self.edges {
            for end in [edge.from, edge.to] {
                if !seen.contains(end) {
                    return Err(GraphError::DanglingEdge {
                        from: edge.from,
                        to: edge.to,
                        missing: end,
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator as _;

    #[test]
    fn kinds_iterate_in_legend_order() {
        let actual: Vec<NodeKind> = NodeKind::iter().collect();
        assert_eq!(
            actual,
            [
                NodeKind::Client,
                NodeKind::Service,
                NodeKind::Worker,
                NodeKind::Storage,
                NodeKind::External
            ]
        );
    }

    #[test]
    fn system_graph_is_valid() {
        assert_eq!(SYSTEM_GRAPH.validate(), Ok(()));
    }

    #[test]
    fn every_node_is_connected() {
        for node in SYSTEM_GRAPH.nodes {
            assert!(
                SYSTEM_GRAPH
                    .edges
                    .iter()
                    .any(|e| e.from == node.id || e.to == node.id),
                "{} has no edges",
                node.id
            );
        }
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        const NODES: &[ArchNode] = &[
            node("a", "A", NodeKind::Service, (0.1, 0.1)),
            node("a", "A again", NodeKind::Service, (0.2, 0.2)),
        ];
        let graph = ArchitectureGraph {
            nodes: NODES,
            edges: &[],
        };
        assert_eq!(graph.validate(), Err(GraphError::DuplicateNode("a")));
    }

    #[test]
    fn dangling_edges_are_rejected() {
        const NODES: &[ArchNode] = &[node("a", "A", NodeKind::Service, (0.1, 0.1))];
        const EDGES: &[ArchEdge] = &[edge("a", "b", "?")];
        let graph = ArchitectureGraph {
            nodes: NODES,
            edges: EDGES,
        };
        assert_eq!(
            graph.validate(),
            Err(GraphError::DanglingEdge {
                from: "a",
                to: "b",
                missing: "b"
            })
        );
    }

    #[test]
    fn off_canvas_nodes_are_rejected() {
        const NODES: &[ArchNode] = &[node("a", "A", NodeKind::Service, (1.5, 0.1))];
        let graph = ArchitectureGraph {
            nodes: NODES,
            edges: &[],
        };
        assert_eq!(graph.validate(), Err(GraphError::OutOfBounds("a")));
    }
}
