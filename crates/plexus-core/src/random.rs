//! Seeded procedural generation for scene layout, nodes, links and pulses.
//!
//! Each concern draws from its own stream derived from the scene seed, so the
//! number of values one consumer takes never shifts what another one sees
//! (pulse recycling cannot perturb the link set, for example).

use crate::constants::{ANCHOR_MARGIN, DEPTH_BAND};
use glam::Vec3;
use rand::prelude::*;
use rand::rngs::StdRng;
use std::f32::consts::TAU;

const STREAM_MIX: u64 = 0x9E37_79B9_7F4A_7C15;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stream {
    Layout,
    Nodes,
    Edges,
    Pulses,
}

impl Stream {
    fn salt(self) -> u64 {
        match self {
            Stream::Layout => 1,
            Stream::Nodes => 2,
            Stream::Edges => 3,
            Stream::Pulses => 4,
        }
    }
}

/// Seed holder that hands out independent deterministic streams.
#[derive(Clone, Copy, Debug)]
pub struct RandomField {
    seed: u64,
}

impl RandomField {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn stream(&self, stream: Stream) -> FieldRng {
        let mix = self.seed ^ stream.salt().wrapping_mul(STREAM_MIX);
        FieldRng {
            rng: StdRng::seed_from_u64(mix),
        }
    }
}

pub struct FieldRng {
    rng: StdRng,
}

impl FieldRng {
    /// Cluster anchors inside the unit square, spread apart where possible.
    pub fn cluster_anchors(&mut self, count: usize) -> Vec<Vec3> {
        let min_sep = 0.45 / (count.max(1) as f32).sqrt();
        let mut anchors: Vec<Vec3> = Vec::with_capacity(count);
        for _ in 0..count {
            let mut candidate = self.anchor_candidate();
            for _ in 0..32 {
                if anchors.iter().all(|a| a.distance(candidate) >= min_sep) {
                    break;
                }
                candidate = self.anchor_candidate();
            }
            anchors.push(candidate);
        }
        anchors
    }

    fn anchor_candidate(&mut self) -> Vec3 {
        let span = 1.0 - 2.0 * ANCHOR_MARGIN;
        Vec3::new(
            ANCHOR_MARGIN + self.rng.gen::<f32>() * span,
            ANCHOR_MARGIN + self.rng.gen::<f32>() * span,
            (self.rng.gen::<f32>() - 0.5) * DEPTH_BAND,
        )
    }

    /// Uniform point within `radius` of `center`, flattened in depth.
    pub fn point_in_ball(&mut self, center: Vec3, radius: f32) -> Vec3 {
        center + self.unit_ball() * radius
    }

    /// Random velocity no faster than `max_speed`.
    pub fn velocity(&mut self, max_speed: f32) -> Vec3 {
        self.unit_ball() * max_speed
    }

    fn unit_ball(&mut self) -> Vec3 {
        for _ in 0..16 {
            let v = Vec3::new(
                self.rng.gen_range(-1.0..=1.0),
                self.rng.gen_range(-1.0..=1.0),
                self.rng.gen_range(-1.0..=1.0),
            );
            if v.length_squared() <= 1.0 {
                return v * Vec3::new(1.0, 1.0, 0.5);
            }
        }
        Vec3::ZERO
    }

    pub fn phase(&mut self) -> f32 {
        self.rng.gen::<f32>() * TAU
    }

    pub fn in_range(&mut self, (min, max): (f32, f32)) -> f32 {
        if max > min {
            self.rng.gen_range(min..max)
        } else {
            min
        }
    }

    /// Bernoulli gate used to thin candidate links.
    pub fn keep(&mut self, probability: f32) -> bool {
        self.rng.gen::<f32>() < probability
    }

    /// Uniform index below `len`; `None` when there is nothing to pick.
    pub fn pick(&mut self, len: usize) -> Option<usize> {
        (len > 0).then(|| self.rng.gen_range(0..len))
    }

    pub fn unit(&mut self) -> f32 {
        self.rng.gen::<f32>()
    }
}
