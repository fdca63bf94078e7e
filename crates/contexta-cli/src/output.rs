use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ValueEnum;
use contexta_core::StructuredDomainModel;
use contexta_render::{present, render_svg, render_text, Diagram, DomainView};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Text,
    Json,
}

pub fn emit(model: &StructuredDomainModel, format: Format, svg_dir: Option<&Path>) -> Result<()> {
    let view = present(model);
    match format {
        Format::Text => print!("{}", render_text(&view)),
        Format::Json => println!("{}", serde_json::to_string_pretty(&view)?),
    }
    if let Some(dir) = svg_dir {
        let written = write_svgs(&view, dir)?;
        tracing::info!(count = written.len(), dir = %dir.display(), "diagrams written");
    }
    Ok(())
}

fn file_stem(name: &str, index: usize) -> String {
    let mut stem = String::new();
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            stem.push(c.to_ascii_lowercase());
        } else if !stem.ends_with('-') {
            stem.push('-');
        }
    }
    let stem = stem.trim_matches('-');
    if stem.is_empty() {
        format!("context-{}", index + 1)
    } else {
        stem.to_string()
    }
}

fn write_svg(dir: &Path, file: String, diagram: &Diagram) -> Result<PathBuf> {
    let path = dir.join(file);
    std::fs::write(&path, render_svg(diagram))
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

/// Write `context-map.svg` plus one file per non-empty context diagram. Every
/// context gets its own stem, so no file is written twice.
pub fn write_svgs(view: &DomainView, dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    let mut written = Vec::new();
    if let Some(diagram) = &view.context_diagram {
        written.push(write_svg(dir, "context-map.svg".into(), diagram)?);
    }
    let mut taken = HashSet::new();
    for (i, context) in view.context_views.iter().enumerate() {
        let mut stem = file_stem(&context.context, i);
        // Names that slug alike get the context's position appended
        while !taken.insert(stem.clone()) {
            stem = format!("{stem}-{}", i + 1);
        }
        if let Some(diagram) = &context.containers {
            written.push(write_svg(dir, format!("{stem}-containers.svg"), diagram)?);
        }
        if let Some(diagram) = &context.components {
            written.push(write_svg(dir, format!("{stem}-components.svg"), diagram)?);
        }
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stems_are_lowercase_and_dashed() {
        assert_eq!(file_stem("Order Management", 0), "order-management");
        assert_eq!(file_stem("  R&D!! ", 0), "r-d");
        assert_eq!(file_stem("???", 2), "context-3");
    }

    #[test]
    fn writes_one_svg_per_diagram() {
        let model: StructuredDomainModel = serde_json::from_str(
            r#"{"boundedContexts": [
                {"name": "Sales", "aggregates": [{"name": "Order"}],
                 "components": [{"name": "Order API"}]},
                {"name": "Billing"}
            ]}"#,
        )
        .unwrap();
        let dir = tempfile::tempdir().unwrap();
        let written = write_svgs(&present(&model), &dir.path().join("svg")).unwrap();
        let names: Vec<String> = written
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            ["context-map.svg", "sales-containers.svg", "sales-components.svg"]
        );
        let svg = std::fs::read_to_string(&written[0]).unwrap();
        assert!(svg.starts_with("<svg"));
    }

    #[test]
    fn contexts_that_slug_alike_get_separate_files() {
        let model: StructuredDomainModel = serde_json::from_str(
            r#"{"boundedContexts": [
                {"name": "Order Mgmt", "aggregates": [{"name": "Order"}]},
                {"name": "order-mgmt", "aggregates": [{"name": "Cart"}]},
                {"name": "Order  Mgmt!", "aggregates": [{"name": "Quote"}]}
            ]}"#,
        )
        .unwrap();
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("svg");
        let written = write_svgs(&present(&model), &out).unwrap();
        let names: Vec<String> = written
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            [
                "context-map.svg",
                "order-mgmt-containers.svg",
                "order-mgmt-2-containers.svg",
                "order-mgmt-3-containers.svg",
            ]
        );
        assert_eq!(std::fs::read_dir(&out).unwrap().count(), written.len());
        let second = std::fs::read_to_string(&written[2]).unwrap();
        assert!(second.contains("Cart"));
    }
}
