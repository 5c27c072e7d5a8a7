use crate::graph::Graph;
use crate::nodes::Node;
use crate::palette::{PaletteConfig, Rgb};
use crate::random::FieldRng;
use glam::Vec3;

/// A recycled token travelling along one link.
#[derive(Clone, Debug, PartialEq)]
pub struct Pulse {
    /// Link being travelled; `None` only while the graph has no links.
    pub edge: Option<u32>,
    /// Fraction of the link covered, 0..=1.
    pub progress: f32,
    /// Progress per second.
    pub speed: f32,
    pub color: Rgb,
    /// Completed traversals; bumps on every wrap.
    pub traversals: u32,
    accent: usize,
}

/// Fixed pool of pulses that wrap onto a fresh random link when they arrive.
pub struct PulseAnimator {
    pulses: Vec<Pulse>,
    rng: FieldRng,
}

impl PulseAnimator {
    pub fn new(config: &PaletteConfig, graph: &Graph, mut rng: FieldRng) -> Self {
        let accents = &config.colors.accents;
        let pulses = (0..config.pulse_count)
            .map(|_| {
                let accent = rng.pick(accents.len()).unwrap_or(0);
                Pulse {
                    edge: rng.pick(graph.len()).map(|e| e as u32),
                    progress: rng.unit(),
                    speed: rng.in_range(config.pulse_speed),
                    color: accents[accent % accents.len()],
                    traversals: 0,
                    accent,
                }
            })
            .collect();
        Self { pulses, rng }
    }

    /// Move every pulse forward by `speed * dt`.
    ///
    /// A pulse that passes the end of its link restarts at 0 on a uniformly
    /// chosen link with a new accent color. The wrap happens here, before any
    /// position is read for the frame.
    pub fn advance(&mut self, dt: f32, graph: &Graph, accents: &[Rgb]) {
        if dt <= 0.0 || !dt.is_finite() {
            return;
        }
        let edge_count = graph.len();
        for pulse in &mut self.pulses {
            if edge_count == 0 {
                pulse.edge = None;
                continue;
            }
            if pulse.edge.map_or(true, |e| e as usize >= edge_count) {
                pulse.edge = self.rng.pick(edge_count).map(|e| e as u32);
                pulse.progress = 0.0;
            }
            pulse.progress += pulse.speed * dt;
            if pulse.progress > 1.0 {
                pulse.progress = 0.0;
                pulse.edge = self.rng.pick(edge_count).map(|e| e as u32);
                if let Some(accent) = self.rng.pick(accents.len()) {
                    pulse.accent = accent;
                    pulse.color = accents[accent];
                }
                pulse.traversals = pulse.traversals.wrapping_add(1);
            }
        }
    }

    /// Point on the pulse's link at its current progress.
    pub fn position(&self, index: usize, nodes: &[Node], graph: &Graph) -> Option<Vec3> {
        let pulse = self.pulses.get(index)?;
        let edge = graph.edge(pulse.edge? as usize)?;
        let a = nodes.get(edge.a as usize)?.position;
        let b = nodes.get(edge.b as usize)?.position;
        Some(a.lerp(b, pulse.progress.clamp(0.0, 1.0)))
    }

    /// Swap accent colors, keeping each pulse's slot in the accent list.
    pub fn retint(&mut self, accents: &[Rgb]) {
        if accents.is_empty() {
            return;
        }
        for pulse in &mut self.pulses {
            pulse.color = accents[pulse.accent % accents.len()];
        }
    }

    pub fn pulses(&self) -> &[Pulse] {
        &self.pulses
    }

    pub fn len(&self) -> usize {
        self.pulses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pulses.is_empty()
    }
}
