//! Plain-text rendering for terminals.

use std::fmt::{self, Write};

use crate::cards::Card;
use crate::graph::Diagram;
use crate::legend::Legend;
use crate::DomainView;

fn write_card(out: &mut impl Write, card: &Card) -> fmt::Result {
    writeln!(out, "== {} ==", card.title)?;
    if let Some(subtitle) = &card.subtitle {
        writeln!(out, "{subtitle}")?;
    }
    if let Some(relation) = &card.relation_to_domain {
        writeln!(out, "Relation to domain: {relation}")?;
    }
    for section in &card.sections {
        writeln!(out, "\n  {}:", section.title)?;
        for item in &section.items {
            match &item.detail {
                Some(detail) => writeln!(out, "    - {}: {detail}", item.title)?,
                None => writeln!(out, "    - {}", item.title)?,
            }
            for (label, value) in &item.facts {
                writeln!(out, "        {label}: {value}")?;
            }
        }
    }
    out.write_char('\n')
}

fn title<'a>(diagram: &'a Diagram, id: &'a str) -> &'a str {
    diagram.node(id).map_or(id, |n| n.label.title.as_str())
}

/// Edges as `source --[label]--> target`, using node titles.
pub fn render_edges(diagram: &Diagram) -> String {
    diagram
        .edges
        .iter()
        .map(|edge| {
            format!(
                "  {} --[{}]--> {}\n",
                title(diagram, &edge.source),
                edge.label,
                title(diagram, &edge.target)
            )
        })
        .collect()
}

fn write_legend(out: &mut impl Write, legend: &Legend) -> fmt::Result {
    writeln!(out, "Legend:")?;
    for symbol in &legend.symbols {
        writeln!(out, "  {} {}: {}", symbol.symbol, symbol.name, symbol.meaning)?;
    }
    let patterns: Vec<&str> = legend.patterns.iter().map(|p| p.label.as_str()).collect();
    writeln!(out, "  Patterns: {}", patterns.join(", "))
}

/// Terminal rendering of a [`DomainView`]: cards, the context map as edge
/// lines, then the legend.
pub struct TextView<'a>(pub &'a DomainView);

impl fmt::Display for TextView<'_> {
    fn fmt(&self, out: &mut fmt::Formatter<'_>) -> fmt::Result {
        let view = self.0;
        for card in &view.cards {
            write_card(out, card)?;
        }
        if let Some(notice) = view.notice {
            writeln!(out, "{notice}\n")?;
        }
        if let Some(diagram) = view.context_diagram.as_ref().filter(|d| !d.edges.is_empty()) {
            writeln!(out, "Context map:")?;
            out.write_str(&render_edges(diagram))?;
            out.write_char('\n')?;
        }
        write_legend(out, &view.legend)
    }
}

pub fn render_text(view: &DomainView) -> String {
    TextView(view).to_string()
}
