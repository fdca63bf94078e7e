//! The three concrete projections: context map, aggregate containers and
//! components.

use contexta_core::{Aggregate, BoundedContext, Component, ContextRelationship, ExternalSystem};

use crate::graph::{project, Diagram, DiagramKind, EdgeSpec, NodeKind, NodeLabel, NodeSpec, Projection};
use crate::layout::{LayoutConfig, RankDir, Size};
use crate::style;

fn non_empty(text: &str) -> Option<String> {
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

// --- Context map ---

pub struct ContextProjection<'a> {
    pub contexts: &'a [BoundedContext],
    pub relationships: &'a [ContextRelationship],
    pub externals: &'a [ExternalSystem],
}

/// Bounded contexts first, then external systems. Both share one numbering.
#[derive(Debug, Clone, Copy)]
pub enum ContextRecord<'a> {
    Context(usize, &'a BoundedContext),
    External(usize, &'a ExternalSystem),
}

const CONTEXT_SIZE: Size = Size {
    width: 220.0,
    height: 120.0,
};
const EXTERNAL_SIZE: Size = Size {
    width: 200.0,
    height: 100.0,
};

fn context_id(index: usize) -> String {
    format!("context-{}", index + 1)
}

/// Exact name first, then a case-insensitive comparison of trimmed names.
fn find_by_name<'n>(names: impl Iterator<Item = &'n str> + Clone, name: &str) -> Option<usize> {
    names.clone().position(|n| n == name).or_else(|| {
        let wanted = name.trim().to_lowercase();
        if wanted.is_empty() {
            return None;
        }
        names.clone().position(|n| n.trim().to_lowercase() == wanted)
    })
}

impl ContextProjection<'_> {
    fn external_id(&self, index: usize) -> String {
        format!("external-{}", self.contexts.len() + index + 1)
    }

    /// Node id for a context-map endpoint. Contexts win over external
    /// systems of the same name.
    fn resolve(&self, name: &str) -> Option<String> {
        find_by_name(self.contexts.iter().map(|c| c.name.as_str()), name)
            .map(context_id)
            .or_else(|| {
                find_by_name(self.externals.iter().map(|e| e.name.as_str()), name)
                    .map(|j| self.external_id(j))
            })
    }
}

impl<'a> Projection for ContextProjection<'a> {
    type Record = ContextRecord<'a>;
    const KIND: DiagramKind = DiagramKind::Context;

    fn layout(&self) -> LayoutConfig {
        LayoutConfig {
            direction: RankDir::TopBottom,
            rank_sep: 100.0,
            node_sep: 80.0,
        }
    }

    fn records(&self) -> Vec<Self::Record> {
        let contexts = self.contexts.iter().enumerate();
        let externals = self.externals.iter().enumerate();
        contexts
            .map(|(i, c)| ContextRecord::Context(i, c))
            .chain(externals.map(|(j, e)| ContextRecord::External(j, e)))
            .collect()
    }

    fn nodes(&self, record: &Self::Record) -> Vec<NodeSpec> {
        let node = match *record {
            ContextRecord::Context(i, context) => NodeSpec {
                id: context_id(i),
                kind: NodeKind::BoundedContext,
                label: NodeLabel {
                    title: context.name.clone(),
                    stereotype: "[Bounded Context]".into(),
                    description: non_empty(&context.description),
                    details: Vec::new(),
                },
                style: style::BOUNDED_CONTEXT,
                size: CONTEXT_SIZE,
            },
            ContextRecord::External(j, system) => NodeSpec {
                id: self.external_id(j),
                kind: NodeKind::ExternalSystem,
                label: NodeLabel {
                    title: system.name.clone(),
                    stereotype: "[External System]".into(),
                    description: non_empty(&system.description),
                    details: Vec::new(),
                },
                style: style::EXTERNAL_SYSTEM,
                size: EXTERNAL_SIZE,
            },
        };
        vec![node]
    }

    fn edges(&self, _records: &[Self::Record]) -> Vec<EdgeSpec> {
        self.relationships
            .iter()
            .filter_map(|rel| {
                let (Some(source), Some(target)) = (self.resolve(&rel.upstream), self.resolve(&rel.downstream))
                else {
                    tracing::debug!(upstream = %rel.upstream, downstream = %rel.downstream, "context-map names not found");
                    return None;
                };
                Some(EdgeSpec {
                    source,
                    target,
                    label: rel.pattern.label().to_string(),
                    style: style::pattern_style(&rel.pattern),
                })
            })
            .collect()
    }
}

pub fn context_diagram(
    contexts: &[BoundedContext],
    relationships: &[ContextRelationship],
    externals: &[ExternalSystem],
) -> Diagram {
    project(&ContextProjection {
        contexts,
        relationships,
        externals,
    })
}

// --- Containers ---

/// A repository node. `aggregate_root` is the aggregate that declared it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryRef {
    pub name: String,
    pub aggregate_root: Option<String>,
}

impl RepositoryRef {
    /// Repositories declared by the aggregates, first declaration wins for
    /// names repeated case-insensitively.
    pub fn declared_by(aggregates: &[Aggregate]) -> Vec<RepositoryRef> {
        let mut out: Vec<RepositoryRef> = Vec::new();
        for aggregate in aggregates {
            let Some(name) = aggregate.repository.as_deref().and_then(non_empty) else {
                continue;
            };
            if out.iter().any(|r| r.name.eq_ignore_ascii_case(&name)) {
                continue;
            }
            out.push(RepositoryRef {
                name,
                aggregate_root: non_empty(&aggregate.name),
            });
        }
        out
    }
}

/// Whether a repository persists the given aggregate. Case-insensitive; empty
/// names never match.
pub fn repository_matches(repository: &RepositoryRef, aggregate: &str) -> bool {
    let aggregate = aggregate.trim().to_lowercase();
    let repo = repository.name.trim().to_lowercase();
    if aggregate.is_empty() || repo.is_empty() {
        return false;
    }
    if let Some(root) = &repository.aggregate_root {
        if root.trim().to_lowercase() == aggregate {
            return true;
        }
    }
    if repo.contains(&aggregate) {
        return true;
    }
    let stripped = repo.replacen("repository", "", 1).replacen("repo", "", 1);
    let stripped = stripped.trim();
    !stripped.is_empty() && aggregate.contains(stripped)
}

pub struct ContainerProjection<'a> {
    pub aggregates: &'a [Aggregate],
    pub repositories: Vec<RepositoryRef>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerRecord {
    Aggregate(usize),
    Repository(usize),
}

const AGGREGATE_SIZE: Size = Size {
    width: 180.0,
    height: 80.0,
};
const ENTITY_SIZE: Size = Size {
    width: 160.0,
    height: 70.0,
};
const VALUE_OBJECT_SIZE: Size = Size {
    width: 150.0,
    height: 65.0,
};
const REPOSITORY_SIZE: Size = Size {
    width: 170.0,
    height: 75.0,
};

impl ContainerProjection<'_> {
    fn aggregate_nodes(&self, i: usize) -> Vec<NodeSpec> {
        let aggregate = &self.aggregates[i];
        let mut details = Vec::new();
        if let Some(root) = non_empty(&aggregate.root_entity) {
            details.push(format!("Root: {root}"));
        }
        let mut nodes = vec![NodeSpec {
            id: format!("aggregate-{i}"),
            kind: NodeKind::Aggregate,
            label: NodeLabel {
                title: aggregate.name.clone(),
                stereotype: "[Aggregate]".into(),
                description: non_empty(&aggregate.description),
                details,
            },
            style: style::AGGREGATE,
            size: AGGREGATE_SIZE,
        }];
        nodes.extend(aggregate.entities.iter().enumerate().map(|(j, entity)| NodeSpec {
            id: format!("entity-{i}-{j}"),
            kind: NodeKind::Entity,
            label: NodeLabel {
                title: entity.name.clone(),
                stereotype: "[Entity]".into(),
                description: None,
                details: entity.attributes.clone(),
            },
            style: style::ENTITY,
            size: ENTITY_SIZE,
        }));
        nodes.extend(aggregate.value_objects.iter().enumerate().map(|(k, vo)| NodeSpec {
            id: format!("vo-{i}-{k}"),
            kind: NodeKind::ValueObject,
            label: NodeLabel {
                title: vo.name.clone(),
                stereotype: "[Value Object]".into(),
                description: None,
                details: vo.properties.clone(),
            },
            style: style::VALUE_OBJECT,
            size: VALUE_OBJECT_SIZE,
        }));
        nodes
    }
}

impl Projection for ContainerProjection<'_> {
    type Record = ContainerRecord;
    const KIND: DiagramKind = DiagramKind::Container;

    fn layout(&self) -> LayoutConfig {
        LayoutConfig {
            direction: RankDir::TopBottom,
            rank_sep: 80.0,
            node_sep: 60.0,
        }
    }

    fn records(&self) -> Vec<Self::Record> {
        (0..self.aggregates.len())
            .map(ContainerRecord::Aggregate)
            .chain((0..self.repositories.len()).map(ContainerRecord::Repository))
            .collect()
    }

    fn nodes(&self, record: &Self::Record) -> Vec<NodeSpec> {
        match *record {
            ContainerRecord::Aggregate(i) => self.aggregate_nodes(i),
            ContainerRecord::Repository(r) => vec![NodeSpec {
                id: format!("repo-{r}"),
                kind: NodeKind::Repository,
                label: NodeLabel {
                    title: self.repositories[r].name.clone(),
                    stereotype: "[Repository]".into(),
                    description: None,
                    details: Vec::new(),
                },
                style: style::REPOSITORY,
                size: REPOSITORY_SIZE,
            }],
        }
    }

    fn edges(&self, _records: &[Self::Record]) -> Vec<EdgeSpec> {
        let mut edges = Vec::new();
        for (i, aggregate) in self.aggregates.iter().enumerate() {
            let parent = format!("aggregate-{i}");
            let children = (0..aggregate.entities.len())
                .map(|j| format!("entity-{i}-{j}"))
                .chain((0..aggregate.value_objects.len()).map(|k| format!("vo-{i}-{k}")));
            edges.extend(children.map(|child| EdgeSpec {
                source: parent.clone(),
                target: child,
                label: "contains".into(),
                style: style::CONTAINS,
            }));

            if let Some(r) = self
                .repositories
                .iter()
                .position(|repo| repository_matches(repo, &aggregate.name))
            {
                edges.push(EdgeSpec {
                    source: parent.clone(),
                    target: format!("repo-{r}"),
                    label: "persists".into(),
                    style: style::PERSISTS,
                });
            }
        }
        edges
    }
}

pub fn container_diagram(aggregates: &[Aggregate], repositories: Vec<RepositoryRef>) -> Diagram {
    project(&ContainerProjection {
        aggregates,
        repositories,
    })
}

/// Container diagram for one context, or `None` when it has no aggregates.
pub fn container_diagram_for(context: &BoundedContext) -> Option<Diagram> {
    if context.aggregates.is_empty() {
        return None;
    }
    let repositories = RepositoryRef::declared_by(&context.aggregates);
    Some(container_diagram(&context.aggregates, repositories))
}

// --- Components ---

pub struct ComponentProjection<'a> {
    pub components: &'a [Component],
}

fn component_id(index: usize) -> String {
    format!("component-{}", index + 1)
}

fn depends_on(candidate: &str, dependency: &str) -> bool {
    candidate == dependency || candidate.contains(dependency) || dependency.contains(candidate)
}

fn interacts_with(candidate: &str, interaction: &str) -> bool {
    candidate == interaction || candidate.contains(interaction)
}

impl ComponentProjection<'_> {
    fn link(
        &self,
        from: usize,
        names: &[String],
        matches: fn(&str, &str) -> bool,
        label: &str,
        edge_style: style::EdgeStyle,
    ) -> Vec<EdgeSpec> {
        names
            .iter()
            .filter(|name| !name.trim().is_empty())
            .filter_map(|name| {
                let target = self
                    .components
                    .iter()
                    .position(|c| !c.name.is_empty() && matches(&c.name, name))?;
                // The first match decides; a component matching itself gets no edge
                if target == from {
                    return None;
                }
                Some(EdgeSpec {
                    source: component_id(from),
                    target: component_id(target),
                    label: label.to_string(),
                    style: edge_style,
                })
            })
            .collect()
    }
}

impl<'a> Projection for ComponentProjection<'a> {
    type Record = (usize, &'a Component);
    const KIND: DiagramKind = DiagramKind::Component;

    fn layout(&self) -> LayoutConfig {
        LayoutConfig {
            direction: RankDir::TopBottom,
            rank_sep: 120.0,
            node_sep: 80.0,
        }
    }

    fn records(&self) -> Vec<Self::Record> {
        self.components.iter().enumerate().collect()
    }

    fn nodes(&self, &(i, component): &Self::Record) -> Vec<NodeSpec> {
        let kind = non_empty(&component.kind).unwrap_or_else(|| "Component".into());
        let height = if component.responsibilities.is_empty() {
            100.0
        } else {
            160.0
        };
        vec![NodeSpec {
            id: component_id(i),
            kind: NodeKind::Component,
            label: NodeLabel {
                title: component.name.clone(),
                stereotype: format!("[{kind}]"),
                description: non_empty(&component.description),
                details: component.responsibilities.clone(),
            },
            style: style::component_style(&component.kind),
            size: Size {
                width: 240.0,
                height,
            },
        }]
    }

    fn edges(&self, records: &[Self::Record]) -> Vec<EdgeSpec> {
        let mut edges = Vec::new();
        for &(i, component) in records {
            edges.extend(self.link(i, &component.dependencies, depends_on, "uses", style::USES));
            edges.extend(self.link(
                i,
                &component.interactions,
                interacts_with,
                "interacts",
                style::INTERACTS,
            ));
        }
        edges
    }
}

pub fn component_diagram(components: &[Component]) -> Diagram {
    project(&ComponentProjection { components })
}
