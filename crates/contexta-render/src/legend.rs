use contexta_core::IntegrationPattern;
use serde::Serialize;

use crate::style::{self, EdgeStyle, NodeStyle};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolEntry {
    pub symbol: &'static str,
    pub name: &'static str,
    pub meaning: &'static str,
    pub style: NodeStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternEntry {
    pub label: String,
    pub style: EdgeStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Legend {
    pub symbols: Vec<SymbolEntry>,
    pub patterns: Vec<PatternEntry>,
}

/// Label of the pattern-key entry for tags outside the known set.
pub const OTHER_PATTERN: &str = "Other";

pub fn legend() -> Legend {
    let symbols = vec![
        SymbolEntry {
            symbol: "●",
            name: "Root entity",
            meaning: "Entry point of the aggregate",
            style: style::AGGREGATE,
        },
        SymbolEntry {
            symbol: "■",
            name: "Entities",
            meaning: "Objects with a unique identity",
            style: style::ENTITY,
        },
        SymbolEntry {
            symbol: "◆",
            name: "Value objects",
            meaning: "Immutable objects without identity",
            style: style::VALUE_OBJECT,
        },
        SymbolEntry {
            symbol: "▤",
            name: "Repository",
            meaning: "Persists and retrieves aggregates",
            style: style::REPOSITORY,
        },
    ];

    let patterns = IntegrationPattern::KNOWN
        .iter()
        .map(|p| PatternEntry {
            label: p.label().to_string(),
            style: style::pattern_style(p),
        })
        .chain(std::iter::once(PatternEntry {
            label: OTHER_PATTERN.to_string(),
            style: style::FALLBACK_PATTERN,
        }))
        .collect();

    Legend { symbols, patterns }
}
