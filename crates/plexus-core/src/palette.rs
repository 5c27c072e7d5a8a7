//! Per-scene configuration: counts, link distance, colors and detail tier.
//!
//! A [`PaletteConfig`] is supplied once when a scene is created and is never
//! patched in place. The only live change a scene accepts is a re-tint, which
//! swaps the [`ColorSet`] and leaves every structural field untouched.

use thiserror::Error;

/// Upper bound on nodes per scene; graph construction is quadratic in this.
pub const MAX_NODES: usize = 4096;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PaletteError {
    #[error("{field} must be at least 1")]
    ZeroCount { field: &'static str },
    #[error("node_count {0} exceeds the limit of {MAX_NODES}")]
    TooManyNodes(usize),
    #[error("cluster_count {clusters} exceeds node_count {nodes}")]
    TooManyClusters { clusters: usize, nodes: usize },
    #[error("{field} must be finite and positive, got {value}")]
    NonPositive { field: &'static str, value: f32 },
    #[error("{field} must be a probability in [0, 1], got {value}")]
    InvalidProbability { field: &'static str, value: f32 },
    #[error("{field} range is empty or negative: {min}..{max}")]
    InvalidRange {
        field: &'static str,
        min: f32,
        max: f32,
    },
    #[error("{0} color list is empty")]
    EmptyColors(&'static str),
    #[error("invalid hex color {0:?}, expected #rrggbb")]
    InvalidHex(String),
    #[error("unknown preset {0:?}")]
    UnknownPreset(String),
}

/// Linear RGB color with components in 0..1.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` (the leading `#` is optional).
    pub fn from_hex(hex: &str) -> Result<Self, PaletteError> {
        let digits = hex.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(PaletteError::InvalidHex(hex.to_string()));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map(|v| v as f32 / 255.0)
                .map_err(|_| PaletteError::InvalidHex(hex.to_string()))
        };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn lerp(self, other: Rgb, t: f32) -> Rgb {
        Rgb::new(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
        )
    }

    #[inline]
    pub fn with_alpha(self, a: f32) -> [f32; 4] {
        [self.r, self.g, self.b, a]
    }
}

/// Mesh resolution of node sprites; also bounds graph density on weak devices.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GeometryDetail {
    Low,
    Medium,
    High,
}

impl GeometryDetail {
    /// Triangle-fan segments of the disc used for node and pulse sprites.
    pub fn disc_segments(self) -> u32 {
        match self {
            GeometryDetail::Low => 6,
            GeometryDetail::Medium => 12,
            GeometryDetail::High => 24,
        }
    }

    /// Maximum links any node may take part in.
    pub fn max_degree(self) -> usize {
        match self {
            GeometryDetail::Low => 3,
            GeometryDetail::Medium => 5,
            GeometryDetail::High => 8,
        }
    }
}

/// How pointer input moves the viewpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CameraStyle {
    /// Eye translates slightly with the pointer.
    Parallax,
    /// Scene tilts around its centre, used by the full-screen journey visual.
    Orbit,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ColorSet {
    /// One color per cluster (cycled when there are more clusters).
    pub base: Vec<Rgb>,
    /// Pulse colors.
    pub accents: Vec<Rgb>,
    pub background: Rgb,
}

impl ColorSet {
    pub fn from_hex(base: &[&str], accents: &[&str], background: &str) -> Result<Self, PaletteError> {
        let parse = |list: &[&str]| list.iter().map(|h| Rgb::from_hex(h)).collect::<Result<Vec<_>, _>>();
        let set = Self {
            base: parse(base)?,
            accents: parse(accents)?,
            background: Rgb::from_hex(background)?,
        };
        set.validate()?;
        Ok(set)
    }

    pub fn validate(&self) -> Result<(), PaletteError> {
        if self.base.is_empty() {
            return Err(PaletteError::EmptyColors("base"));
        }
        if self.accents.is_empty() {
            return Err(PaletteError::EmptyColors("accent"));
        }
        Ok(())
    }

    pub fn cluster_color(&self, cluster: u16) -> Rgb {
        // validate() guarantees a non-empty list
        self.base[cluster as usize % self.base.len()]
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PaletteConfig {
    pub node_count: usize,
    pub pulse_count: usize,
    pub cluster_count: usize,
    /// Links are only admitted below this initial distance (logical units).
    pub max_edge_distance: f32,
    /// Distance from the anchor beyond which the restoring spring engages.
    pub slack_radius: f32,
    /// Keep probability for candidate links inside one cluster.
    pub intra_cluster_keep: f32,
    /// Keep probability for candidate links between clusters.
    pub cross_cluster_keep: f32,
    pub node_size: (f32, f32),
    /// Pulse progress per second.
    pub pulse_speed: (f32, f32),
    pub colors: ColorSet,
    pub detail: GeometryDetail,
    pub camera: CameraStyle,
}

impl PaletteConfig {
    pub fn validate(&self) -> Result<(), PaletteError> {
        if self.node_count == 0 {
            return Err(PaletteError::ZeroCount { field: "node_count" });
        }
        if self.node_count > MAX_NODES {
            return Err(PaletteError::TooManyNodes(self.node_count));
        }
        if self.cluster_count == 0 {
            return Err(PaletteError::ZeroCount {
                field: "cluster_count",
            });
        }
        // every cluster must own at least one node
        if self.cluster_count > self.node_count {
            return Err(PaletteError::TooManyClusters {
                clusters: self.cluster_count,
                nodes: self.node_count,
            });
        }
        positive("max_edge_distance", self.max_edge_distance)?;
        positive("slack_radius", self.slack_radius)?;
        probability("intra_cluster_keep", self.intra_cluster_keep)?;
        probability("cross_cluster_keep", self.cross_cluster_keep)?;
        range("node_size", self.node_size)?;
        range("pulse_speed", self.pulse_speed)?;
        self.colors.validate()
    }

    /// Same config with a different color set; structure is kept as-is.
    pub fn with_colors(&self, colors: ColorSet) -> Self {
        Self {
            colors,
            ..self.clone()
        }
    }

    /// True when `other` only differs in colors.
    pub fn same_structure(&self, other: &PaletteConfig) -> bool {
        self.with_colors(other.colors.clone()) == *other
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), PaletteError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(PaletteError::NonPositive { field, value })
    }
}

fn probability(field: &'static str, value: f32) -> Result<(), PaletteError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(PaletteError::InvalidProbability { field, value })
    }
}

fn range(field: &'static str, (min, max): (f32, f32)) -> Result<(), PaletteError> {
    if min.is_finite() && max.is_finite() && min >= 0.0 && min <= max {
        Ok(())
    } else {
        Err(PaletteError::InvalidRange { field, min, max })
    }
}

/// The hosting site's visuals, each a thin set of parameters over one engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Preset {
    Hero,
    About,
    Services,
    SpaceJourney,
    Neural,
}

impl Preset {
    pub const ALL: [Preset; 5] = [
        Preset::Hero,
        Preset::About,
        Preset::Services,
        Preset::SpaceJourney,
        Preset::Neural,
    ];

    pub fn from_name(name: &str) -> Result<Self, PaletteError> {
        match name.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "hero" => Ok(Preset::Hero),
            "about" => Ok(Preset::About),
            "services" => Ok(Preset::Services),
            "space-journey" | "journey" => Ok(Preset::SpaceJourney),
            "neural" => Ok(Preset::Neural),
            _ => Err(PaletteError::UnknownPreset(name.to_string())),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Preset::Hero => "hero",
            Preset::About => "about",
            Preset::Services => "services",
            Preset::SpaceJourney => "space-journey",
            Preset::Neural => "neural",
        }
    }

    pub fn config(self) -> PaletteConfig {
        match self {
            Preset::Hero => PaletteConfig {
                node_count: 140,
                pulse_count: 24,
                cluster_count: 5,
                max_edge_distance: 0.16,
                slack_radius: 0.12,
                intra_cluster_keep: 0.55,
                cross_cluster_keep: 0.12,
                node_size: (0.004, 0.009),
                pulse_speed: (0.35, 0.8),
                colors: ColorSet {
                    base: vec![
                        Rgb::new(0.24, 0.52, 1.0),
                        Rgb::new(0.30, 0.85, 0.95),
                        Rgb::new(0.55, 0.42, 1.0),
                    ],
                    accents: vec![Rgb::new(0.95, 0.98, 1.0), Rgb::new(0.40, 0.95, 1.0)],
                    background: Rgb::new(0.02, 0.03, 0.07),
                },
                detail: GeometryDetail::Medium,
                camera: CameraStyle::Parallax,
            },
            Preset::About => PaletteConfig {
                node_count: 70,
                pulse_count: 10,
                cluster_count: 3,
                max_edge_distance: 0.2,
                slack_radius: 0.14,
                intra_cluster_keep: 0.6,
                cross_cluster_keep: 0.1,
                node_size: (0.005, 0.010),
                pulse_speed: (0.25, 0.55),
                colors: ColorSet {
                    base: vec![Rgb::new(0.62, 0.38, 0.98), Rgb::new(0.92, 0.45, 0.85)],
                    accents: vec![Rgb::new(1.0, 0.85, 0.98)],
                    background: Rgb::new(0.04, 0.02, 0.07),
                },
                detail: GeometryDetail::Medium,
                camera: CameraStyle::Parallax,
            },
            Preset::Services => PaletteConfig {
                node_count: 90,
                pulse_count: 16,
                cluster_count: 4,
                max_edge_distance: 0.18,
                slack_radius: 0.12,
                intra_cluster_keep: 0.5,
                cross_cluster_keep: 0.15,
                node_size: (0.004, 0.008),
                pulse_speed: (0.3, 0.7),
                colors: ColorSet {
                    base: vec![
                        Rgb::new(0.16, 0.82, 0.66),
                        Rgb::new(0.20, 0.62, 0.92),
                        Rgb::new(0.55, 0.90, 0.45),
                    ],
                    accents: vec![Rgb::new(0.85, 1.0, 0.9), Rgb::new(1.0, 0.92, 0.5)],
                    background: Rgb::new(0.02, 0.05, 0.05),
                },
                detail: GeometryDetail::Low,
                camera: CameraStyle::Parallax,
            },
            Preset::SpaceJourney => PaletteConfig {
                node_count: 320,
                pulse_count: 48,
                cluster_count: 7,
                max_edge_distance: 0.12,
                slack_radius: 0.1,
                intra_cluster_keep: 0.45,
                cross_cluster_keep: 0.05,
                node_size: (0.002, 0.007),
                pulse_speed: (0.5, 1.2),
                colors: ColorSet {
                    base: vec![
                        Rgb::new(0.55, 0.70, 1.0),
                        Rgb::new(0.95, 0.95, 1.0),
                        Rgb::new(0.35, 0.45, 0.95),
                        Rgb::new(0.80, 0.55, 1.0),
                    ],
                    accents: vec![Rgb::new(1.0, 0.72, 0.35), Rgb::new(1.0, 1.0, 1.0)],
                    background: Rgb::new(0.0, 0.0, 0.02),
                },
                detail: GeometryDetail::High,
                camera: CameraStyle::Orbit,
            },
            Preset::Neural => PaletteConfig {
                node_count: 110,
                pulse_count: 30,
                cluster_count: 6,
                max_edge_distance: 0.17,
                slack_radius: 0.11,
                intra_cluster_keep: 0.65,
                cross_cluster_keep: 0.18,
                node_size: (0.004, 0.009),
                pulse_speed: (0.6, 1.1),
                colors: ColorSet {
                    base: vec![Rgb::new(0.98, 0.30, 0.62), Rgb::new(0.45, 0.35, 1.0)],
                    accents: vec![Rgb::new(1.0, 0.9, 0.4), Rgb::new(0.5, 1.0, 0.95)],
                    background: Rgb::new(0.03, 0.01, 0.05),
                },
                detail: GeometryDetail::High,
                camera: CameraStyle::Parallax,
            },
        }
    }
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Preset::Hero.config()
    }
}
