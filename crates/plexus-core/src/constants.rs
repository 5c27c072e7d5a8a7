// Simulation, scheduling and camera tuning constants shared by every scene.
//
// Force coefficients are expressed per reference frame (60 Hz) and scaled by
// `dt * REFERENCE_FPS` at integration time.

// Time base
pub const REFERENCE_FPS: f32 = 60.0;
pub const MAX_STEP_SEC: f32 = 0.050; // largest single advance after a long pause

// Node kinematics
pub const SPRING_COEFF: f32 = 5.0e-5; // pull toward the cluster anchor beyond slack
pub const VELOCITY_DAMPING: f32 = 0.999; // applied to velocity once per reference frame
pub const POINTER_ATTRACTION: f32 = 5.0e-6; // pull toward the pointer (mouse only)
pub const DRIFT_AMPLITUDE: f32 = 2.0e-6; // sinusoidal drift acceleration
pub const DRIFT_FREQ: f32 = 1.3; // rad/s, kept well away from the spring's natural frequency
pub const INITIAL_SPEED_MAX: f32 = 2.5e-4; // logical units per reference frame
pub const SPAWN_RADIUS_FRACTION: f32 = 0.8; // spawn ball radius relative to slack radius
pub const DEPTH_BAND: f32 = 0.08; // half-thickness of the z band nodes spawn in

// Cluster layout
pub const ANCHOR_MARGIN: f32 = 0.12; // keep anchors away from the unit-square border

// Links
pub const LINK_FADE_START: f32 = 0.6; // live distance / max distance where fading begins
pub const LINK_MIN_INTENSITY: f32 = 0.05;

// Frame scheduling
pub const HIGH_TIER_INTERVAL_MS: f64 = 1000.0 / 60.0;
pub const LOW_TIER_INTERVAL_MS: f64 = 1000.0 / 30.0;
pub const NARROW_VIEWPORT_CSS_PX: f32 = 768.0; // below this width the low tier applies
pub const FRAME_SLACK_MS: f64 = 1.0; // rAF jitter tolerance when gating frames
pub const COST_EMA_ALPHA: f64 = 0.1;
pub const COST_BUDGET_FRACTION: f64 = 0.85; // sustained cost above this share of the interval degrades
pub const DEGRADE_STREAK_FRAMES: u32 = 30;

// Camera
pub const CAMERA_DAMPING: f32 = 0.04; // per reference frame
pub const CAMERA_Z: f32 = 1.6;
pub const CAMERA_FOVY: f32 = std::f32::consts::FRAC_PI_4;
pub const PARALLAX_RANGE: f32 = 0.08; // eye offset at the viewport edge
pub const ORBIT_RANGE_RAD: f32 = 0.35; // scene tilt at the viewport edge

// Sprites
pub const PULSE_SIZE_SCALE: f32 = 1.8; // pulse sprite size relative to the palette's max node size
