//! The shared record → node/edge → layout pipeline behind every diagram.

use std::collections::HashMap;

use serde::Serialize;

use crate::layout::{self, LayoutConfig, Point, RankDir, Size};
use crate::style::{EdgeStyle, NodeStyle};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DiagramKind {
    Context,
    Container,
    Component,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeKind {
    BoundedContext,
    Aggregate,
    Entity,
    ValueObject,
    Repository,
    Component,
    ExternalSystem,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeLabel {
    pub title: String,
    /// Bracketed type line, e.g. `[Aggregate]`.
    pub stereotype: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramNode {
    pub id: String,
    pub kind: NodeKind,
    pub label: NodeLabel,
    pub style: NodeStyle,
    pub position: Point,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub label: String,
    pub style: EdgeStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagram {
    pub kind: DiagramKind,
    pub direction: RankDir,
    pub nodes: Vec<DiagramNode>,
    pub edges: Vec<DiagramEdge>,
    pub width: f64,
    pub height: f64,
}

impl Diagram {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: &str) -> Option<&DiagramNode> {
        self.nodes.iter().find(|n| n.id == id)
    }
}

/// A node before layout.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeSpec {
    pub id: String,
    pub kind: NodeKind,
    pub label: NodeLabel,
    pub style: NodeStyle,
    pub size: Size,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EdgeSpec {
    pub source: String,
    pub target: String,
    pub label: String,
    pub style: EdgeStyle,
}

/// How one diagram turns domain records into nodes and edges.
///
/// `nodes` is called once per record in order; `edges` sees every record at
/// once so it can match names across them. Edges naming a node id that was
/// never produced are dropped by [`project`].
pub trait Projection {
    type Record;

    const KIND: DiagramKind;

    fn layout(&self) -> LayoutConfig;

    fn records(&self) -> Vec<Self::Record>;

    fn nodes(&self, record: &Self::Record) -> Vec<NodeSpec>;

    fn edges(&self, records: &[Self::Record]) -> Vec<EdgeSpec>;
}

pub fn project<P: Projection>(projection: &P) -> Diagram {
    let config = projection.layout();
    let records = projection.records();
    let specs: Vec<NodeSpec> = records.iter().flat_map(|r| projection.nodes(r)).collect();

    let index: HashMap<&str, usize> = specs
        .iter()
        .enumerate()
        .map(|(i, spec)| (spec.id.as_str(), i))
        .collect();

    let mut links = Vec::new();
    let mut edges = Vec::new();
    for spec in projection.edges(&records) {
        let (Some(&s), Some(&t)) = (index.get(spec.source.as_str()), index.get(spec.target.as_str()))
        else {
            tracing::debug!(source = %spec.source, target = %spec.target, "edge endpoint missing; dropped");
            continue;
        };
        links.push((s, t));
        edges.push(DiagramEdge {
            id: format!("edge-{}", edges.len()),
            source: spec.source,
            target: spec.target,
            label: spec.label,
            style: spec.style,
        });
    }

    let sizes: Vec<Size> = specs.iter().map(|s| s.size).collect();
    let positions = layout::layout(&sizes, &links, &config);
    let extent = layout::bounds(&sizes, &positions);

    let nodes = specs
        .into_iter()
        .zip(positions)
        .map(|(spec, position)| DiagramNode {
            id: spec.id,
            kind: spec.kind,
            label: spec.label,
            style: spec.style,
            position,
            width: spec.size.width,
            height: spec.size.height,
        })
        .collect();

    Diagram {
        kind: P::KIND,
        direction: config.direction,
        nodes,
        edges,
        width: extent.width,
        height: extent.height,
    }
}
