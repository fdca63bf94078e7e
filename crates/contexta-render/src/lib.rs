//! Presentation of a [`StructuredDomainModel`]: cards, a legend and laid-out
//! diagrams, plus text and SVG output for them.

pub mod cards;
pub mod diagrams;
pub mod graph;
pub mod layout;
pub mod legend;
pub mod style;
pub mod svg;
pub mod text;

use contexta_core::StructuredDomainModel;
use serde::Serialize;

pub use cards::{Card, CardItem, Section, SectionKind, NO_CONTEXTS};
pub use diagrams::{component_diagram, container_diagram, container_diagram_for, context_diagram};
pub use graph::{Diagram, DiagramEdge, DiagramKind, DiagramNode, NodeKind, NodeLabel, Projection};
pub use legend::{legend, Legend};
pub use svg::{render_svg, Svg};
pub use text::{render_edges, render_text, TextView};

/// Per-context diagrams. Either is `None` when the context has nothing to draw.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextView {
    pub context: String,
    pub containers: Option<Diagram>,
    pub components: Option<Diagram>,
}

/// Everything a front end shows for one model.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainView {
    pub cards: Vec<Card>,
    /// Set instead of context cards when the model has no bounded contexts.
    pub notice: Option<&'static str>,
    pub legend: Legend,
    pub context_diagram: Option<Diagram>,
    pub context_views: Vec<ContextView>,
}

pub fn present(model: &StructuredDomainModel) -> DomainView {
    let mut cards: Vec<Card> = model.domain.iter().map(cards::overview_card).collect();
    cards.extend(model.bounded_contexts.iter().map(cards::context_card));

    let notice = model.bounded_contexts.is_empty().then_some(NO_CONTEXTS);
    let map = (!model.bounded_contexts.is_empty() || !model.external_systems.is_empty()).then(|| {
        context_diagram(&model.bounded_contexts, &model.context_map, &model.external_systems)
    });

    let context_views = model
        .bounded_contexts
        .iter()
        .map(|context| ContextView {
            context: context.name.clone(),
            containers: container_diagram_for(context),
            components: (!context.components.is_empty())
                .then(|| component_diagram(&context.components)),
        })
        .collect();

    tracing::debug!(
        contexts = model.bounded_contexts.len(),
        relationships = model.context_map.len(),
        externals = model.external_systems.len(),
        "presented domain model"
    );

    DomainView {
        cards,
        notice,
        legend: legend(),
        context_diagram: map,
        context_views,
    }
}
