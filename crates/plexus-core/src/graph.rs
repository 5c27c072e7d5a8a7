//! Static link graph between nodes.
//!
//! The topology is decided once from the initial node layout: candidate pairs
//! closer than the palette's maximum distance pass through a keep gate that is
//! generous inside a cluster and stingy across clusters, which gives the
//! picture its "community" look. After that only colors and the per-frame
//! live intensity change.

use crate::constants::{LINK_FADE_START, LINK_MIN_INTENSITY};
use crate::nodes::Node;
use crate::palette::{PaletteConfig, Rgb};
use crate::random::FieldRng;
use smallvec::SmallVec;

#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
    /// Lower node index.
    pub a: u32,
    /// Higher node index.
    pub b: u32,
    /// Inverse of the endpoints' initial distance.
    pub weight: f32,
    pub color: Rgb,
}

pub struct Graph {
    edges: Vec<Edge>,
    intensity: Vec<f32>,
    adjacency: Vec<SmallVec<[u32; 8]>>,
    max_distance: f32,
}

#[derive(Clone, Copy, Debug)]
pub struct GraphBuilder {
    pub max_distance: f32,
    pub intra_keep: f32,
    pub cross_keep: f32,
    pub max_degree: usize,
}

impl GraphBuilder {
    pub fn new(max_distance: f32) -> Self {
        Self {
            max_distance,
            intra_keep: 0.6,
            cross_keep: 0.12,
            max_degree: usize::MAX,
        }
    }

    pub fn from_config(config: &PaletteConfig) -> Self {
        Self {
            max_distance: config.max_edge_distance,
            intra_keep: config.intra_cluster_keep,
            cross_keep: config.cross_cluster_keep,
            max_degree: config.detail.max_degree(),
        }
    }

    /// Build the link set for `nodes`. Deterministic for a given stream.
    pub fn build(&self, nodes: &[Node], rng: &mut FieldRng) -> Graph {
        let mut edges = Vec::new();
        let mut adjacency: Vec<SmallVec<[u32; 8]>> = vec![SmallVec::new(); nodes.len()];
        for i in 0..nodes.len() {
            for j in (i + 1)..nodes.len() {
                let (na, nb) = (&nodes[i], &nodes[j]);
                let dist = na.position.distance(nb.position);
                if dist >= self.max_distance {
                    continue;
                }
                let p = if na.cluster == nb.cluster {
                    self.intra_keep
                } else {
                    self.cross_keep
                };
                // The gate is drawn for every candidate so the stream position
                // does not depend on the degree cap.
                let keep = rng.keep(p);
                if !keep
                    || adjacency[i].len() >= self.max_degree
                    || adjacency[j].len() >= self.max_degree
                {
                    continue;
                }
                adjacency[i].push(j as u32);
                adjacency[j].push(i as u32);
                edges.push(Edge {
                    a: i as u32,
                    b: j as u32,
                    weight: 1.0 / dist.max(1e-4),
                    color: na.color.lerp(nb.color, 0.5),
                });
            }
        }
        log::debug!(
            "graph built: nodes={} edges={} max_distance={:.3}",
            nodes.len(),
            edges.len(),
            self.max_distance
        );
        Graph {
            intensity: vec![1.0; edges.len()],
            edges,
            adjacency,
            max_distance: self.max_distance,
        }
    }
}

impl Graph {
    /// Recompute each link's live intensity from current node positions.
    ///
    /// Links whose endpoints drifted apart fade toward a floor; topology does
    /// not change.
    pub fn refresh_weights(&mut self, nodes: &[Node]) {
        let span = (1.0 - LINK_FADE_START).max(f32::EPSILON);
        for (edge, out) in self.edges.iter().zip(self.intensity.iter_mut()) {
            let (Some(a), Some(b)) = (nodes.get(edge.a as usize), nodes.get(edge.b as usize)) else {
                continue;
            };
            let ratio = a.position.distance(b.position) / self.max_distance;
            *out = (1.0 - (ratio - LINK_FADE_START) / span).clamp(LINK_MIN_INTENSITY, 1.0);
        }
    }

    /// Recolor links from their endpoints' current colors.
    pub fn retint(&mut self, nodes: &[Node]) {
        for edge in &mut self.edges {
            if let (Some(a), Some(b)) = (nodes.get(edge.a as usize), nodes.get(edge.b as usize)) {
                edge.color = a.color.lerp(b.color, 0.5);
            }
        }
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn edge(&self, index: usize) -> Option<&Edge> {
        self.edges.get(index)
    }

    pub fn intensity(&self) -> &[f32] {
        &self.intensity
    }

    pub fn neighbors(&self, node: usize) -> &[u32] {
        self.adjacency
            .get(node)
            .map(|n| n.as_slice())
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn max_distance(&self) -> f32 {
        self.max_distance
    }
}
