use crate::constants::*;
use crate::palette::{ColorSet, PaletteConfig, Rgb};
use crate::random::FieldRng;
use glam::Vec3;

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Per-node offset into the drift and glow oscillators, 0..2π.
    pub phase: f32,
    pub size: f32,
    pub cluster: u16,
    pub color: Rgb,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cluster {
    pub anchor: Vec3,
}

/// Owns every animated point of a scene and integrates their motion.
pub struct NodePool {
    nodes: Vec<Node>,
    clusters: Vec<Cluster>,
    slack_radius: f32,
    time: f32,
    pointer_enabled: bool,
}

impl NodePool {
    /// Lay out cluster anchors and spawn nodes around them round-robin.
    pub fn spawn(config: &PaletteConfig, layout: &mut FieldRng, rng: &mut FieldRng) -> Self {
        let clusters: Vec<Cluster> = layout
            .cluster_anchors(config.cluster_count)
            .into_iter()
            .map(|anchor| Cluster { anchor })
            .collect();
        let spawn_radius = config.slack_radius * SPAWN_RADIUS_FRACTION;
        let nodes = (0..config.node_count)
            .map(|i| {
                let cluster = (i % clusters.len()) as u16;
                let anchor = clusters[cluster as usize].anchor;
                Node {
                    position: rng.point_in_ball(anchor, spawn_radius),
                    velocity: rng.velocity(INITIAL_SPEED_MAX),
                    phase: rng.phase(),
                    size: rng.in_range(config.node_size),
                    cluster,
                    color: config.colors.cluster_color(cluster),
                }
            })
            .collect();
        Self {
            nodes,
            clusters,
            slack_radius: config.slack_radius,
            time: 0.0,
            pointer_enabled: true,
        }
    }

    /// Advance every node by `dt` seconds.
    ///
    /// Velocity picks up a sinusoidal drift, a spring toward the cluster anchor
    /// once beyond the slack radius, and a weak pull toward `pointer` (ignored
    /// when pointer input is disabled). Works in place; `dt <= 0` is a no-op.
    pub fn integrate(&mut self, dt: f32, pointer: Option<Vec3>) {
        if dt <= 0.0 || !dt.is_finite() {
            return;
        }
        let k = dt * REFERENCE_FPS;
        let damping = VELOCITY_DAMPING.powf(k);
        self.time += dt;
        let pointer = pointer.filter(|_| self.pointer_enabled);
        let slack = self.slack_radius;
        let time = self.time;

        for node in &mut self.nodes {
            let anchor = self.clusters[node.cluster as usize].anchor;
            let t = time * DRIFT_FREQ + node.phase;
            let mut accel = Vec3::new(t.sin(), (t * 0.87 + 1.3).cos(), 0.5 * (t * 0.61).sin())
                * DRIFT_AMPLITUDE;

            let offset = node.position - anchor;
            let dist = offset.length();
            if dist > slack {
                accel -= offset * ((dist - slack) / dist * SPRING_COEFF);
            }
            if let Some(p) = pointer {
                accel += (p - node.position) * POINTER_ATTRACTION;
            }

            node.velocity = (node.velocity + accel * k) * damping;
            node.position += node.velocity * k;
        }
    }

    /// Touch-only devices never feed the pointer attraction.
    pub fn set_pointer_enabled(&mut self, enabled: bool) {
        self.pointer_enabled = enabled;
    }

    pub fn pointer_enabled(&self) -> bool {
        self.pointer_enabled
    }

    /// Recolor nodes from a new color set; motion state is untouched.
    pub fn retint(&mut self, colors: &ColorSet) {
        for node in &mut self.nodes {
            node.color = colors.cluster_color(node.cluster);
        }
    }

    /// Glow factor in 0..1 from the node's pulsation phase.
    #[inline]
    pub fn glow(&self, index: usize) -> f32 {
        let phase = self.nodes.get(index).map_or(0.0, |n| n.phase);
        0.5 + 0.5 * (self.time * 2.0 + phase).sin()
    }

    pub fn distance_to_anchor(&self, index: usize) -> Option<f32> {
        let node = self.nodes.get(index)?;
        let anchor = self.clusters.get(node.cluster as usize)?.anchor;
        Some(node.position.distance(anchor))
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn slack_radius(&self) -> f32 {
        self.slack_radius
    }

    /// Simulation time accumulated by `integrate`, in seconds.
    pub fn time(&self) -> f32 {
        self.time
    }
}
