//! Static colour tables.

use contexta_core::IntegrationPattern;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NodeStyle {
    pub background: &'static str,
    pub border: &'static str,
    pub text: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EdgeStyle {
    pub stroke: &'static str,
    pub dashed: bool,
    pub animated: bool,
}

/// Accent and fill for a card section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Palette {
    pub accent: &'static str,
    pub fill: &'static str,
}

const WHITE: &str = "#ffffff";

const fn node(background: &'static str, border: &'static str) -> NodeStyle {
    NodeStyle {
        background,
        border,
        text: WHITE,
    }
}

const fn edge(stroke: &'static str, dashed: bool) -> EdgeStyle {
    EdgeStyle {
        stroke,
        dashed,
        animated: false,
    }
}

// --- Nodes ---

pub const BOUNDED_CONTEXT: NodeStyle = node("#1168bd", "#0d4d8c");
pub const AGGREGATE: NodeStyle = node("#1168bd", "#0d4d8c");
pub const ENTITY: NodeStyle = node("#63b3ed", "#4299e1");
pub const VALUE_OBJECT: NodeStyle = node("#48bb78", "#38a169");
pub const REPOSITORY: NodeStyle = node("#ed8936", "#c05621");
pub const EXTERNAL_SYSTEM: NodeStyle = node("#999999", "#666666");

pub const COMPONENT: NodeStyle = node("#4a5568", "#2d3748");
pub const INTERFACE: NodeStyle = node("#805ad5", "#6b46c1");
pub const DATABASE: NodeStyle = node("#dd6b20", "#c05621");
pub const EXTERNAL: NodeStyle = node("#718096", "#4a5568");

/// Pick a component colour from its free-text type.
pub fn component_style(kind: &str) -> NodeStyle {
    let kind = kind.to_lowercase();
    if kind.contains("interface") || kind.contains("api") {
        INTERFACE
    } else if kind.contains("database") || kind.contains("repository") {
        DATABASE
    } else if kind.contains("external") || kind.contains("externo") {
        EXTERNAL
    } else {
        COMPONENT
    }
}

// --- Edges ---

pub const USES: EdgeStyle = EdgeStyle {
    stroke: "#805ad5",
    dashed: false,
    animated: true,
};
pub const INTERACTS: EdgeStyle = edge("#4299e1", true);
pub const PERSISTS: EdgeStyle = edge("#ed8936", false);
pub const CONTAINS: EdgeStyle = edge("#a0aec0", false);

/// Used for any tag outside the eight known patterns.
pub const FALLBACK_PATTERN: EdgeStyle = edge("#718096", true);

pub fn pattern_style(pattern: &IntegrationPattern) -> EdgeStyle {
    let stroke = match pattern {
        IntegrationPattern::SharedKernel => "#d53f8c",
        IntegrationPattern::CustomerSupplier => "#1168bd",
        IntegrationPattern::Conformist => "#dd6b20",
        IntegrationPattern::AnticorruptionLayer => "#e53e3e",
        IntegrationPattern::OpenHostService => "#38a169",
        IntegrationPattern::PublishedLanguage => "#319795",
        IntegrationPattern::SeparateWays => return edge("#a0aec0", true),
        IntegrationPattern::Partnership => "#805ad5",
        IntegrationPattern::Unknown(_) => return FALLBACK_PATTERN,
    };
    EdgeStyle {
        stroke,
        dashed: false,
        animated: true,
    }
}

// --- Card sections ---

pub const LANGUAGE: Palette = Palette { accent: "#3182ce", fill: "#ebf8ff" };
pub const AGGREGATES: Palette = Palette { accent: "#805ad5", fill: "#faf5ff" };
pub const DOMAIN_SERVICES: Palette = Palette { accent: "#38a169", fill: "#f0fff4" };
pub const APPLICATION_SERVICES: Palette = Palette { accent: "#d69e2e", fill: "#fffff0" };
pub const DOMAIN_EVENTS: Palette = Palette { accent: "#e53e3e", fill: "#fff5f5" };
pub const NEUTRAL: Palette = Palette { accent: "#4a5568", fill: "#f7fafc" };
