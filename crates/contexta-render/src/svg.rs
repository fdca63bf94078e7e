//! Standalone SVG drawing of a laid-out [`Diagram`].

use std::collections::BTreeSet;
use std::fmt;

use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};

use crate::graph::{Diagram, DiagramEdge, DiagramNode};
use crate::layout::{Point, RankDir};

const MARGIN: f64 = 24.0;
const LINE_HEIGHT: f64 = 14.0;
const MAX_DETAIL_LINES: usize = 4;

fn marker_id(stroke: &str) -> String {
    format!("arrow-{}", stroke.trim_start_matches('#'))
}

fn anchors(diagram: &Diagram, source: &DiagramNode, target: &DiagramNode) -> (Point, Point) {
    let center = |n: &DiagramNode| Point {
        x: n.position.x + n.width / 2.0,
        y: n.position.y + n.height / 2.0,
    };
    let (s, t) = (center(source), center(target));
    match diagram.direction {
        RankDir::TopBottom => {
            let down = t.y >= s.y;
            let sy = if down { source.position.y + source.height } else { source.position.y };
            let ty = if down { target.position.y } else { target.position.y + target.height };
            (Point { x: s.x, y: sy }, Point { x: t.x, y: ty })
        }
        RankDir::LeftRight => {
            let right = t.x >= s.x;
            let sx = if right { source.position.x + source.width } else { source.position.x };
            let tx = if right { target.position.x } else { target.position.x + target.width };
            (Point { x: sx, y: s.y }, Point { x: tx, y: t.y })
        }
    }
}

fn write_edge(out: &mut fmt::Formatter<'_>, diagram: &Diagram, edge: &DiagramEdge) -> fmt::Result {
    let (Some(source), Some(target)) = (diagram.node(&edge.source), diagram.node(&edge.target)) else {
        return Ok(());
    };
    let (a, b) = anchors(diagram, source, target);
    let dash = if edge.style.dashed { r#" stroke-dasharray="5,5""# } else { "" };
    writeln!(
        out,
        r#"  <line id="{}" x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="{}" stroke-width="2"{} marker-end="url(#{})"/>"#,
        attr(&edge.id),
        a.x,
        a.y,
        b.x,
        b.y,
        edge.style.stroke,
        dash,
        marker_id(edge.style.stroke),
    )?;
    if !edge.label.is_empty() {
        writeln!(
            out,
            r#"  <text x="{:.1}" y="{:.1}" font-size="10" font-weight="600" fill="{}" text-anchor="middle">{}</text>"#,
            (a.x + b.x) / 2.0,
            (a.y + b.y) / 2.0 - 4.0,
            edge.style.stroke,
            text(&edge.label),
        )?;
    }
    Ok(())
}

fn write_node(out: &mut fmt::Formatter<'_>, node: &DiagramNode) -> fmt::Result {
    let (x, y) = (node.position.x, node.position.y);
    let cx = x + node.width / 2.0;
    writeln!(out, r#"  <g id="{}">"#, attr(&node.id))?;
    writeln!(
        out,
        r#"    <rect x="{x:.1}" y="{y:.1}" width="{:.1}" height="{:.1}" rx="8" fill="{}" stroke="{}" stroke-width="2"/>"#,
        node.width, node.height, node.style.background, node.style.border,
    )?;

    let mut lines: Vec<(&str, &str, &str)> = vec![
        (node.label.title.as_str(), "13", "bold"),
        (node.label.stereotype.as_str(), "10", "normal"),
    ];
    lines.extend(
        node.label
            .details
            .iter()
            .take(MAX_DETAIL_LINES)
            .map(|d| (d.as_str(), "9", "normal")),
    );
    let mut baseline = y + 20.0;
    for (content, size, weight) in lines.into_iter().filter(|(c, _, _)| !c.is_empty()) {
        if baseline > y + node.height - 4.0 {
            break;
        }
        writeln!(
            out,
            r#"    <text x="{cx:.1}" y="{baseline:.1}" font-size="{size}" font-weight="{weight}" fill="{}" text-anchor="middle">{}</text>"#,
            node.style.text,
            text(content),
        )?;
        baseline += LINE_HEIGHT;
    }
    writeln!(out, "  </g>")
}

/// A diagram as a standalone SVG document. Writing it propagates the
/// destination's errors.
pub struct Svg<'a>(pub &'a Diagram);

impl fmt::Display for Svg<'_> {
    fn fmt(&self, out: &mut fmt::Formatter<'_>) -> fmt::Result {
        let diagram = self.0;
        let width = diagram.width + 2.0 * MARGIN;
        let height = diagram.height + 2.0 * MARGIN;
        writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width:.0}" height="{height:.0}" viewBox="{:.0} {:.0} {width:.0} {height:.0}" font-family="sans-serif">"#,
            -MARGIN, -MARGIN,
        )?;

        let strokes: BTreeSet<&str> = diagram.edges.iter().map(|e| e.style.stroke).collect();
        if !strokes.is_empty() {
            out.write_str("  <defs>\n")?;
            for stroke in strokes {
                writeln!(
                    out,
                    r#"    <marker id="{}" viewBox="0 0 10 10" refX="10" refY="5" markerWidth="8" markerHeight="8" orient="auto-start-reverse"><path d="M 0 0 L 10 5 L 0 10 z" fill="{stroke}"/></marker>"#,
                    marker_id(stroke),
                )?;
            }
            out.write_str("  </defs>\n")?;
        }

        for edge in &diagram.edges {
            write_edge(out, diagram, edge)?;
        }
        for node in &diagram.nodes {
            write_node(out, node)?;
        }
        out.write_str("</svg>\n")
    }
}

pub fn render_svg(diagram: &Diagram) -> String {
    Svg(diagram).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagrams::{component_diagram, context_diagram};
    use contexta_core::{BoundedContext, Component, ContextRelationship, IntegrationPattern};

    #[test]
    fn escapes_names_and_draws_markers() {
        let contexts = [
            BoundedContext {
                name: "R&D <Labs>".into(),
                ..BoundedContext::default()
            },
            BoundedContext {
                name: "Sales".into(),
                ..BoundedContext::default()
            },
        ];
        let relationships = [ContextRelationship {
            upstream: "R&D <Labs>".into(),
            downstream: "Sales".into(),
            pattern: IntegrationPattern::SeparateWays,
            description: String::new(),
        }];
        let svg = render_svg(&context_diagram(&contexts, &relationships, &[]));
        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(svg.contains("R&amp;D &lt;Labs&gt;"));
        assert!(!svg.contains("<Labs>"));
        assert!(svg.contains(r#"<marker id="arrow-a0aec0""#));
        assert!(svg.contains(r#"stroke-dasharray="5,5""#));
        assert!(svg.contains("Separate Ways"));
    }

    #[test]
    fn empty_diagram_is_still_a_document() {
        let svg = render_svg(&component_diagram(&[]));
        assert!(svg.contains("</svg>"));
        assert!(!svg.contains("<defs>"));
    }

    #[test]
    fn one_group_per_node() {
        let components = [
            Component {
                name: "API".into(),
                dependencies: vec!["Store".into()],
                ..Component::default()
            },
            Component {
                name: "Store".into(),
                ..Component::default()
            },
        ];
        let svg = render_svg(&component_diagram(&components));
        assert_eq!(svg.matches("<g id=").count(), 2);
        assert_eq!(svg.matches("<line ").count(), 1);
    }

    /// Accepts a fixed number of bytes, then refuses.
    struct Cramped(usize);

    impl fmt::Write for Cramped {
        fn write_str(&mut self, s: &str) -> fmt::Result {
            self.0 = self.0.checked_sub(s.len()).ok_or(fmt::Error)?;
            Ok(())
        }
    }

    #[test]
    fn write_failures_reach_the_caller() {
        use std::fmt::Write as _;

        let components = [Component {
            name: "API".into(),
            ..Component::default()
        }];
        let diagram = component_diagram(&components);
        let full = render_svg(&diagram);
        assert_eq!(format!("{}", Svg(&diagram)), full);

        assert!(write!(Cramped(full.len()), "{}", Svg(&diagram)).is_ok());
        assert!(write!(Cramped(full.len() / 2), "{}", Svg(&diagram)).is_err());
    }
}
