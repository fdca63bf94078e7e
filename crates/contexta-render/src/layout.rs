//! Layered layout for directed graphs.
//!
//! Cycles are broken by reversing DFS back edges, ranks come from a
//! longest-path pass over the resulting DAG, nodes inside a rank are ordered
//! with a few barycenter sweeps, and coordinates are packed using the rank and
//! node separations. Positions are top-left corners and never negative.

use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::{depth_first_search, DfsEvent};
use petgraph::Direction;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashSet;

const ORDERING_SWEEPS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RankDir {
    #[serde(rename = "TB")]
    TopBottom,
    #[serde(rename = "LR")]
    LeftRight,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutConfig {
    pub direction: RankDir,
    pub rank_sep: f64,
    pub node_sep: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

/// Assign a position to every node. Edges naming out-of-range nodes and
/// self-loops are ignored.
pub fn layout(sizes: &[Size], edges: &[(usize, usize)], config: &LayoutConfig) -> Vec<Point> {
    let n = sizes.len();
    if n == 0 {
        return Vec::new();
    }

    let links: Vec<(usize, usize)> = edges
        .iter()
        .copied()
        .filter(|&(s, t)| s < n && t < n && s != t)
        .collect();
    let dag = acyclic(n, &links);
    let rank = longest_path_ranks(n, &dag);
    let layers = order_layers(n, &dag, &rank);
    place(sizes, &layers, config)
}

/// Extent of the laid-out drawing.
pub fn bounds(sizes: &[Size], positions: &[Point]) -> Size {
    sizes.iter().zip(positions).fold(
        Size {
            width: 0.0,
            height: 0.0,
        },
        |acc, (size, pos)| Size {
            width: acc.width.max(pos.x + size.width),
            height: acc.height.max(pos.y + size.height),
        },
    )
}

fn graph_of(n: usize, links: &[(usize, usize)]) -> DiGraph<(), ()> {
    let mut graph = DiGraph::with_capacity(n, links.len());
    for _ in 0..n {
        graph.add_node(());
    }
    for &(s, t) in links {
        graph.add_edge(NodeIndex::new(s), NodeIndex::new(t), ());
    }
    graph
}

fn acyclic(n: usize, links: &[(usize, usize)]) -> Vec<(usize, usize)> {
    let graph = graph_of(n, links);
    let mut back_edges = HashSet::new();
    depth_first_search(&graph, graph.node_indices(), |event| {
        if let DfsEvent::BackEdge(u, v) = event {
            back_edges.insert((u.index(), v.index()));
        }
    });
    links
        .iter()
        .map(|&(s, t)| if back_edges.contains(&(s, t)) { (t, s) } else { (s, t) })
        .collect()
}

fn longest_path_ranks(n: usize, dag: &[(usize, usize)]) -> Vec<usize> {
    let graph = graph_of(n, dag);
    let order = toposort(&graph, None).unwrap_or_else(|cycle| {
        tracing::warn!(node = cycle.node_id().index(), "cycle survived reversal; using input order");
        graph.node_indices().collect()
    });
    let mut rank = vec![0usize; n];
    for node in order {
        for pred in graph.neighbors_directed(node, Direction::Incoming) {
            rank[node.index()] = rank[node.index()].max(rank[pred.index()] + 1);
        }
    }
    rank
}

fn order_layers(n: usize, dag: &[(usize, usize)], rank: &[usize]) -> Vec<Vec<usize>> {
    let depth = rank.iter().copied().max().unwrap_or(0) + 1;
    let mut layers: Vec<Vec<usize>> = vec![Vec::new(); depth];
    for (node, &r) in rank.iter().enumerate() {
        layers[r].push(node);
    }

    let mut preds: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut succs: Vec<Vec<usize>> = vec![Vec::new(); n];
    for &(s, t) in dag {
        if rank[t] == rank[s] + 1 {
            preds[t].push(s);
            succs[s].push(t);
        }
    }

    let mut slot = vec![0usize; n];
    for layer in &layers {
        reindex(layer, &mut slot);
    }

    for _ in 0..ORDERING_SWEEPS {
        for r in 1..depth {
            sort_by_barycenter(&mut layers[r], &preds, &slot);
            reindex(&layers[r], &mut slot);
        }
        for r in (0..depth.saturating_sub(1)).rev() {
            sort_by_barycenter(&mut layers[r], &succs, &slot);
            reindex(&layers[r], &mut slot);
        }
    }
    layers
}

fn reindex(layer: &[usize], slot: &mut [usize]) {
    for (i, &node) in layer.iter().enumerate() {
        slot[node] = i;
    }
}

fn sort_by_barycenter(layer: &mut [usize], neighbors: &[Vec<usize>], slot: &[usize]) {
    let key = |node: usize| -> f64 {
        let adjacent = &neighbors[node];
        if adjacent.is_empty() {
            slot[node] as f64
        } else {
            adjacent.iter().map(|&m| slot[m] as f64).sum::<f64>() / adjacent.len() as f64
        }
    };
    let mut keyed: Vec<(f64, usize)> = layer.iter().map(|&node| (key(node), node)).collect();
    // stable: ties keep their current order
    keyed.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));
    for (dst, (_, node)) in layer.iter_mut().zip(keyed) {
        *dst = node;
    }
}

fn place(sizes: &[Size], layers: &[Vec<usize>], config: &LayoutConfig) -> Vec<Point> {
    // (along the rank axis, across it)
    let extents = |size: Size| match config.direction {
        RankDir::TopBottom => (size.height, size.width),
        RankDir::LeftRight => (size.width, size.height),
    };

    let mut centers = vec![(0.0f64, 0.0f64); sizes.len()];
    let mut rank_offset = 0.0;
    for layer in layers {
        let thickness = layer
            .iter()
            .map(|&node| extents(sizes[node]).0)
            .fold(0.0, f64::max);
        let span: f64 = layer.iter().map(|&node| extents(sizes[node]).1).sum::<f64>()
            + config.node_sep * layer.len().saturating_sub(1) as f64;

        let rank_center = rank_offset + thickness / 2.0;
        let mut cursor = -span / 2.0;
        for &node in layer {
            let across = extents(sizes[node]).1;
            centers[node] = (rank_center, cursor + across / 2.0);
            cursor += across + config.node_sep;
        }
        rank_offset += thickness + config.rank_sep;
    }

    let mut points: Vec<Point> = centers
        .iter()
        .zip(sizes)
        .map(|(&(along, across), size)| {
            let (cx, cy) = match config.direction {
                RankDir::TopBottom => (across, along),
                RankDir::LeftRight => (along, across),
            };
            Point {
                x: cx - size.width / 2.0,
                y: cy - size.height / 2.0,
            }
        })
        .collect();

    let min_x = points.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
    let min_y = points.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
    for p in &mut points {
        p.x -= min_x;
        p.y -= min_y;
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    const TB: LayoutConfig = LayoutConfig {
        direction: RankDir::TopBottom,
        rank_sep: 100.0,
        node_sep: 80.0,
    };

    fn boxes(n: usize) -> Vec<Size> {
        vec![
            Size {
                width: 200.0,
                height: 100.0
            };
            n
        ]
    }

    fn overlaps(a: (Point, Size), b: (Point, Size)) -> bool {
        a.0.x < b.0.x + b.1.width
            && b.0.x < a.0.x + a.1.width
            && a.0.y < b.0.y + b.1.height
            && b.0.y < a.0.y + a.1.height
    }

    #[test]
    fn empty_graph_has_no_positions() {
        assert!(layout(&[], &[(0, 1)], &TB).is_empty());
    }

    #[test]
    fn chain_descends_by_rank_separation() {
        let pos = layout(&boxes(3), &[(0, 1), (1, 2)], &TB);
        assert_eq!(pos[0].y, 0.0);
        assert_eq!(pos[1].y, 200.0);
        assert_eq!(pos[2].y, 400.0);
        assert_eq!(pos[0].x, pos[2].x);
    }

    #[test]
    fn left_right_grows_along_x() {
        let config = LayoutConfig {
            direction: RankDir::LeftRight,
            ..TB
        };
        let pos = layout(&boxes(2), &[(0, 1)], &config);
        assert_eq!(pos[0].x, 0.0);
        assert_eq!(pos[1].x, 300.0);
        assert_eq!(pos[0].y, pos[1].y);
    }

    #[test]
    fn siblings_share_a_rank_without_overlap() {
        let sizes = boxes(4);
        let pos = layout(&sizes, &[(0, 1), (0, 2), (0, 3)], &TB);
        for i in 1..4 {
            assert_eq!(pos[i].y, 200.0);
            for j in (i + 1)..4 {
                assert!(!overlaps((pos[i], sizes[i]), (pos[j], sizes[j])));
                assert!((pos[i].x - pos[j].x).abs() >= 280.0);
            }
        }
    }

    #[test]
    fn cycles_and_self_loops_still_lay_out() {
        let sizes = boxes(3);
        let pos = layout(&sizes, &[(0, 1), (1, 2), (2, 0), (1, 1), (5, 0)], &TB);
        assert_eq!(pos.len(), 3);
        let mut ys: Vec<f64> = pos.iter().map(|p| p.y).collect();
        ys.sort_by(|a, b| a.partial_cmp(b).unwrap());
        ys.dedup();
        assert_eq!(ys.len(), 3);
    }

    #[test]
    fn disconnected_nodes_stay_on_the_first_rank() {
        let sizes = boxes(3);
        let pos = layout(&sizes, &[], &TB);
        assert!(pos.iter().all(|p| p.y == 0.0));
        assert!(pos.iter().all(|p| p.x >= 0.0));
        let extent = bounds(&sizes, &pos);
        assert_eq!(extent.width, 3.0 * 200.0 + 2.0 * 80.0);
        assert_eq!(extent.height, 100.0);
    }

    #[test]
    fn crossing_is_removed_by_ordering() {
        // 0 -> 3 and 1 -> 2: ordering should put 3 before 2 on the second rank
        let pos = layout(&boxes(4), &[(0, 3), (1, 2)], &TB);
        assert!(pos[0].x < pos[1].x);
        assert!(pos[3].x < pos[2].x);
    }
}
