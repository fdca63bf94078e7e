//! Card view of a domain model: one overview card and one card per bounded
//! context, each made of titled sections.

use contexta_core::{Aggregate, BoundedContext, Component, DomainOverview, NamedItem, Term};
use serde::Serialize;

use crate::style::{self, Palette};

pub const NO_CONTEXTS: &str = "No bounded contexts found.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SectionKind {
    Purpose,
    Responsibilities,
    UbiquitousLanguage,
    Aggregates,
    DomainServices,
    ApplicationServices,
    DomainEvents,
    Components,
}

impl SectionKind {
    pub fn title(self) -> &'static str {
        match self {
            SectionKind::Purpose => "Purpose",
            SectionKind::Responsibilities => "Responsibilities",
            SectionKind::UbiquitousLanguage => "Ubiquitous Language",
            SectionKind::Aggregates => "Aggregates",
            SectionKind::DomainServices => "Domain Services",
            SectionKind::ApplicationServices => "Application Services",
            SectionKind::DomainEvents => "Domain Events",
            SectionKind::Components => "Components",
        }
    }

    pub fn palette(self) -> Palette {
        match self {
            SectionKind::UbiquitousLanguage => style::LANGUAGE,
            SectionKind::Aggregates => style::AGGREGATES,
            SectionKind::DomainServices => style::DOMAIN_SERVICES,
            SectionKind::ApplicationServices => style::APPLICATION_SERVICES,
            SectionKind::DomainEvents => style::DOMAIN_EVENTS,
            SectionKind::Purpose | SectionKind::Responsibilities | SectionKind::Components => {
                style::NEUTRAL
            }
        }
    }
}

/// One line in a section, with optional `label: value` facts beneath it.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardItem {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub facts: Vec<(String, String)>,
}

impl CardItem {
    fn plain(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    fn with_detail(title: &str, detail: &str) -> Self {
        Self {
            title: title.to_string(),
            detail: (!detail.trim().is_empty()).then(|| detail.to_string()),
            facts: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub kind: SectionKind,
    pub title: &'static str,
    pub palette: Palette,
    pub items: Vec<CardItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relation_to_domain: Option<String>,
    pub sections: Vec<Section>,
}

fn section(kind: SectionKind, items: Vec<CardItem>) -> Option<Section> {
    (!items.is_empty()).then(|| Section {
        kind,
        title: kind.title(),
        palette: kind.palette(),
        items,
    })
}

fn optional(text: &str) -> Option<String> {
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

fn named(items: &[NamedItem]) -> Vec<CardItem> {
    items
        .iter()
        .map(|item| CardItem::with_detail(&item.name, &item.description))
        .collect()
}

fn terms(items: &[Term]) -> Vec<CardItem> {
    items
        .iter()
        .map(|t| CardItem::with_detail(&t.term, &t.definition))
        .collect()
}

fn joined(names: impl Iterator<Item = String>) -> Option<String> {
    let names: Vec<String> = names.filter(|n| !n.is_empty()).collect();
    (!names.is_empty()).then(|| names.join(", "))
}

fn aggregate_item(aggregate: &Aggregate) -> CardItem {
    let mut facts = Vec::new();
    if let Some(root) = optional(&aggregate.root_entity) {
        facts.push(("Root entity".to_string(), root));
    }
    if let Some(entities) = joined(aggregate.entities.iter().map(|e| e.name.clone())) {
        facts.push(("Entities".to_string(), entities));
    }
    if let Some(values) = joined(aggregate.value_objects.iter().map(|v| v.name.clone())) {
        facts.push(("Value objects".to_string(), values));
    }
    if let Some(repository) = aggregate.repository.as_deref().and_then(optional) {
        facts.push(("Repository".to_string(), repository));
    }
    CardItem {
        title: aggregate.name.clone(),
        detail: optional(&aggregate.description),
        facts,
    }
}

fn component_item(component: &Component) -> CardItem {
    let mut facts = Vec::new();
    if let Some(kind) = optional(&component.kind) {
        facts.push(("Type".to_string(), kind));
    }
    if let Some(deps) = joined(component.dependencies.iter().cloned()) {
        facts.push(("Depends on".to_string(), deps));
    }
    if let Some(peers) = joined(component.interactions.iter().cloned()) {
        facts.push(("Interacts with".to_string(), peers));
    }
    CardItem {
        title: component.name.clone(),
        detail: optional(&component.description),
        facts,
    }
}

pub fn overview_card(domain: &DomainOverview) -> Card {
    let purpose = optional(&domain.purpose)
        .map(CardItem::plain)
        .into_iter()
        .collect();
    Card {
        title: domain.name.clone(),
        subtitle: optional(&domain.description),
        relation_to_domain: None,
        sections: section(SectionKind::Purpose, purpose).into_iter().collect(),
    }
}

pub fn context_card(context: &BoundedContext) -> Card {
    let responsibilities = context
        .responsibilities
        .iter()
        .filter(|r| !r.trim().is_empty())
        .map(CardItem::plain)
        .collect();

    let sections = [
        section(SectionKind::Responsibilities, responsibilities),
        section(SectionKind::UbiquitousLanguage, terms(&context.ubiquitous_language)),
        section(
            SectionKind::Aggregates,
            context.aggregates.iter().map(aggregate_item).collect(),
        ),
        section(SectionKind::DomainServices, named(&context.domain_services)),
        section(SectionKind::ApplicationServices, named(&context.application_services)),
        section(SectionKind::DomainEvents, named(&context.domain_events)),
        section(
            SectionKind::Components,
            context.components.iter().map(component_item).collect(),
        ),
    ];

    Card {
        title: context.name.clone(),
        subtitle: optional(&context.description),
        relation_to_domain: optional(&context.relation_to_domain),
        sections: sections.into_iter().flatten().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contexta_core::{Entity, ValueObject};

    #[test]
    fn empty_sections_are_omitted() {
        let card = context_card(&BoundedContext {
            name: "Billing".into(),
            domain_events: vec![NamedItem {
                name: "InvoiceIssued".into(),
                description: String::new(),
            }],
            ..BoundedContext::default()
        });
        assert_eq!(card.title, "Billing");
        assert_eq!(card.subtitle, None);
        let kinds: Vec<SectionKind> = card.sections.iter().map(|s| s.kind).collect();
        assert_eq!(kinds, [SectionKind::DomainEvents]);
        assert_eq!(card.sections[0].palette, style::DOMAIN_EVENTS);
        assert_eq!(card.sections[0].items[0].detail, None);
    }

    #[test]
    fn sections_follow_a_fixed_order() {
        let card = context_card(&BoundedContext {
            name: "Sales".into(),
            responsibilities: vec!["Take orders".into(), " ".into()],
            ubiquitous_language: vec![Term {
                term: "Order".into(),
                definition: "A request to buy".into(),
            }],
            domain_services: vec![NamedItem {
                name: "Pricing".into(),
                description: "Computes totals".into(),
            }],
            components: vec![Component {
                name: "Order API".into(),
                kind: "API".into(),
                ..Component::default()
            }],
            ..BoundedContext::default()
        });
        let kinds: Vec<SectionKind> = card.sections.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            [
                SectionKind::Responsibilities,
                SectionKind::UbiquitousLanguage,
                SectionKind::DomainServices,
                SectionKind::Components,
            ]
        );
        assert_eq!(card.sections[0].items.len(), 1);
        assert_eq!(
            card.sections[3].items[0].facts,
            [("Type".to_string(), "API".to_string())]
        );
    }

    #[test]
    fn aggregate_facts_list_members() {
        let item = aggregate_item(&Aggregate {
            name: "Order".into(),
            root_entity: "Order".into(),
            entities: vec![
                Entity {
                    name: "OrderLine".into(),
                    attributes: vec![],
                },
                Entity {
                    name: "Shipment".into(),
                    attributes: vec![],
                },
            ],
            value_objects: vec![ValueObject {
                name: "Money".into(),
                properties: vec![],
            }],
            repository: Some("OrderRepository".into()),
            description: "Purchase lifecycle".into(),
        });
        assert_eq!(item.detail.as_deref(), Some("Purchase lifecycle"));
        assert_eq!(
            item.facts,
            [
                ("Root entity".to_string(), "Order".to_string()),
                ("Entities".to_string(), "OrderLine, Shipment".to_string()),
                ("Value objects".to_string(), "Money".to_string()),
                ("Repository".to_string(), "OrderRepository".to_string()),
            ]
        );
    }

    #[test]
    fn overview_without_purpose_has_no_sections() {
        let card = overview_card(&DomainOverview {
            name: "Retail".into(),
            description: "Selling things".into(),
            purpose: String::new(),
        });
        assert_eq!(card.subtitle.as_deref(), Some("Selling things"));
        assert!(card.sections.is_empty());
    }
}
