//! Static cartesian map of the sovereign capsule lattice.
//!
//! Describes how capsules relate to one another in a cartesian lattice so
//! pipeline steps get a deterministic view of layer positions and edges.
//! Each node references a capsule or ledger artifact and sits in a logical
//! layer (lineage, motion, runtime, and so on); edges record the rationale
//! for each dependency. The data mirrors the lineage of the existing sealed
//! capsules and is exportable as JSON or a markdown table.

use anyhow::Result;
use serde::Serialize;
use std::collections::BTreeMap;

/// A single position inside the cartesian map.
#[derive(Debug, Clone, Serialize)]
pub struct CapsuleNode {
    pub node_id: &'static str,
    pub capsule_ref: &'static str,
    pub description: &'static str,
    pub layer: &'static str,
    pub position: (i64, i64),
}

/// A directional edge connecting two cartesian nodes.
#[derive(Debug, Clone, Serialize)]
pub struct CapsuleEdge {
    pub source: &'static str,
    pub target: &'static str,
    pub rationale: &'static str,
}

/// The entire lattice with nodes and edges.
#[derive(Debug, Clone, Serialize)]
pub struct CartesianMap {
    pub nodes: Vec<CapsuleNode>,
    pub edges: Vec<CapsuleEdge>,
}

impl CartesianMap {
    /// Lookup of layer name to node identifiers, nodes in declaration order.
    pub fn layer_index(&self) -> BTreeMap<&'static str, Vec<&'static str>> {
        let mut index: BTreeMap<&'static str, Vec<&'static str>> = BTreeMap::new();
        for node in &self.nodes {
            index.entry(node.layer).or_default().push(node.node_id);
        }
        index
    }
}

/// The canonical lattice nodes.
pub const CARTESIAN_NODES: &[CapsuleNode] = &[
    CapsuleNode {
        node_id: "ssot",
        capsule_ref: "capsule.scene.ethereal.v2",
        description: "Single source of truth scene capsule",
        layer: "lineage",
        position: (0, 2),
    },
    CapsuleNode {
        node_id: "canon_kit",
        capsule_ref: "capsule.canon.kit.v1.1.1",
        description: "Canonical kit freeze binding runtime props",
        layer: "lineage",
        position: (1, 2),
    },
    CapsuleNode {
        node_id: "motion_loop",
        capsule_ref: "relay.legoF1.monza.loop.v1",
        description: "240-frame stop-motion relay ledger",
        layer: "motion",
        position: (0, 1),
    },
    CapsuleNode {
        node_id: "qulock",
        capsule_ref: "capsule.engine.qlock.runtime.v1",
        description: "QLOCK runtime engine attestation",
        layer: "runtime",
        position: (1, 1),
    },
    CapsuleNode {
        node_id: "pivot",
        capsule_ref: "capsule.node.q9.pivot.v1",
        description: "Q9 pivot node bridging semantics and artifacts",
        layer: "graph",
        position: (0, 0),
    },
    CapsuleNode {
        node_id: "cartesian_map",
        capsule_ref: "capsule.map.qube.cartesian.v1",
        description: "Canonical cartesian lattice map sealed for runtime",
        layer: "graph",
        position: (1, 0),
    },
    CapsuleNode {
        node_id: "pedagogy",
        capsule_ref: "capsule.relay.pedagogy.queenboo.v1",
        description: "Contributor descent capsule binding training loops",
        layer: "training",
        position: (2, 1),
    },
    CapsuleNode {
        node_id: "marketing",
        capsule_ref: "relay.trailer.legoF1.plan.v1",
        description: "Public relay plan for Lego F1 25 trailer",
        layer: "broadcast",
        position: (2, 0),
    },
    CapsuleNode {
        node_id: "federation",
        capsule_ref: "capsule.federate.v1",
        description: "Broadcast frame for distributing sealed bundles",
        layer: "broadcast",
        position: (3, 0),
    },
];

/// The canonical lattice edges.
pub const CARTESIAN_EDGES: &[CapsuleEdge] = &[
    CapsuleEdge {
        source: "ssot",
        target: "motion_loop",
        rationale: "Motion ledger derives from SSOT lineage",
    },
    CapsuleEdge {
        source: "canon_kit",
        target: "qulock",
        rationale: "Canonical kit is rendered through QLOCK",
    },
    CapsuleEdge {
        source: "qulock",
        target: "cartesian_map",
        rationale: "Runtime engine feeds the cockpit map",
    },
    CapsuleEdge {
        source: "motion_loop",
        target: "pivot",
        rationale: "Pivot node consumes motion embeddings",
    },
    CapsuleEdge {
        source: "cartesian_map",
        target: "pedagogy",
        rationale: "Map anchors contributor descent rituals",
    },
    CapsuleEdge {
        source: "cartesian_map",
        target: "marketing",
        rationale: "Cockpit map informs marketing relay broadcast",
    },
    CapsuleEdge {
        source: "cartesian_map",
        target: "federation",
        rationale: "Sealed map is broadcast across the federation mesh",
    },
];

/// Construct the canonical cartesian map.
pub fn build_default_map() -> CartesianMap {
    CartesianMap {
        nodes: CARTESIAN_NODES.to_vec(),
        edges: CARTESIAN_EDGES.to_vec(),
    }
}

/// Pretty-printed JSON rendering with sorted keys.
pub fn emit_json(map: &CartesianMap) -> Result<String> {
    let value = serde_json::to_value(map)?;
    Ok(serde_json::to_string_pretty(&value)?)
}

/// Render the map as a simple markdown table, one row per node.
pub fn emit_markdown(map: &CartesianMap) -> String {
    let mut lines = vec![
        "| Node | Capsule | Layer | Position | Description |".to_string(),
        "|---|---|---|---|---|".to_string(),
    ];
    for node in &map.nodes {
        lines.push(format!(
            "| {} | {} | {} | ({}, {}) | {} |",
            node.node_id,
            node.capsule_ref,
            node.layer,
            node.position.0,
            node.position.1,
            node.description,
        ));
    }
    lines.join("\n")
}
