//! One running copy of the engine bound to one drawing surface.
//!
//! A [`Scene`] owns all of its mutable state: nodes, links, pulses, the frame
//! scheduler, the camera and the render resources. Nothing is shared between
//! scenes, so any number of them can run side by side on one page. After
//! `dispose` every method is a no-op.

use crate::camera::CameraController;
use crate::constants::{MAX_STEP_SEC, PULSE_SIZE_SCALE};
use crate::graph::{Graph, GraphBuilder};
use crate::lifecycle::{LifecycleState, RenderBackend, ResourceLifecycleManager};
use crate::nodes::NodePool;
use crate::packed::{AllocationRequest, FrameData, FrameUniforms, LineVertex, SpriteInstance};
use crate::palette::{PaletteConfig, PaletteError};
use crate::pulses::PulseAnimator;
use crate::random::{RandomField, Stream};
use crate::scheduler::{DeviceTier, FrameDecision, FrameScheduler};
use crate::viewport::Viewport;
use glam::Vec3;

const LINK_ALPHA: f32 = 0.35;

/// What the host knows about its surface when it creates a scene.
#[derive(Clone, Copy, Debug)]
pub struct HostInfo {
    pub viewport: Viewport,
    /// Coarse pointer and no hover: pointer input is never consumed.
    pub touch_only: bool,
}

impl Default for HostInfo {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            touch_only: false,
        }
    }
}

pub struct Scene {
    palette: PaletteConfig,
    field: RandomField,
    nodes: NodePool,
    graph: Graph,
    pulses: PulseAnimator,
    scheduler: FrameScheduler,
    camera: CameraController,
    resources: ResourceLifecycleManager,
    viewport: Viewport,
    node_sprites: Vec<SpriteInstance>,
    link_vertices: Vec<LineVertex>,
    pulse_sprites: Vec<SpriteInstance>,
    disposed: bool,
}

impl Scene {
    pub fn new(palette: PaletteConfig, seed: u64) -> Result<Self, PaletteError> {
        Self::with_host(palette, seed, HostInfo::default())
    }

    /// Build nodes, links and pulses for `palette` from `seed`. Nothing is
    /// drawn until a backend is attached.
    pub fn with_host(palette: PaletteConfig, seed: u64, host: HostInfo) -> Result<Self, PaletteError> {
        palette.validate()?;
        let field = RandomField::new(seed);
        let (nodes, graph, pulses) = populate(&palette, &field, host.touch_only);
        log::info!(
            "scene created: seed={seed} nodes={} links={} pulses={}",
            nodes.len(),
            graph.len(),
            pulses.len()
        );
        let scheduler = FrameScheduler::new(DeviceTier::for_width(host.viewport.width));
        Ok(Self {
            node_sprites: Vec::with_capacity(nodes.len()),
            link_vertices: Vec::with_capacity(link_vertex_capacity(&palette)),
            pulse_sprites: Vec::with_capacity(pulses.len()),
            camera: CameraController::new(palette.camera, host.touch_only),
            palette,
            field,
            nodes,
            graph,
            pulses,
            scheduler,
            resources: ResourceLifecycleManager::new(),
            viewport: host.viewport,
            disposed: false,
        })
    }

    /// Hand the scene its drawing surface. False means the surface could not
    /// be set up; the scene keeps simulating and draws nothing.
    pub fn attach(&mut self, backend: Box<dyn RenderBackend>) -> bool {
        if self.disposed {
            return false;
        }
        let request = self.allocation_request();
        self.resources.attach(backend, &request)
    }

    /// Buffer sizes for the current palette. Link capacity covers the degree
    /// cap, so a structural reset never needs a reallocation.
    pub fn allocation_request(&self) -> AllocationRequest {
        AllocationRequest {
            node_capacity: self.palette.node_count,
            link_vertex_capacity: link_vertex_capacity(&self.palette),
            pulse_capacity: self.palette.pulse_count,
            disc_segments: self.palette.detail.disc_segments(),
            physical_size: self.viewport.physical_size(),
        }
    }

    /// Start the frame scheduler.
    pub fn on_mount(&mut self) -> bool {
        if self.disposed {
            return false;
        }
        let started = self.scheduler.attach();
        if !self.viewport.visible {
            self.scheduler.set_visible(false);
        }
        started
    }

    /// New CSS size and pixel ratio. Reconfigures the surface and projection;
    /// node positions stay in the same normalized space.
    pub fn on_resize(&mut self, width: f32, height: f32, dpr: f32) {
        if self.disposed {
            return;
        }
        let visible = self.viewport.visible;
        self.viewport = Viewport { visible, ..Viewport::new(width, height, dpr) };
        self.scheduler.set_viewport_width(self.viewport.width);
        let (w, h) = self.viewport.physical_size();
        self.resources.resize(w, h);
    }

    pub fn on_visibility_change(&mut self, visible: bool) {
        if self.disposed {
            return;
        }
        self.viewport.visible = visible;
        self.scheduler.set_visible(visible);
    }

    /// Pointer sample in scene space (0..1 on both axes, y down).
    pub fn on_pointer_move(&mut self, x: f32, y: f32) {
        if self.disposed {
            return;
        }
        self.camera.push_pointer(x, y);
    }

    pub fn on_pointer_leave(&mut self) {
        if self.disposed {
            return;
        }
        self.camera.clear_pointer();
    }

    /// Re-tint nodes, links and pulses from `palette`'s colors. Structure
    /// (counts, distances, topology) is kept; use [`Scene::reset`] for that.
    pub fn on_palette_change(&mut self, palette: &PaletteConfig) -> bool {
        if self.disposed {
            return false;
        }
        if let Err(e) = palette.colors.validate() {
            log::warn!("palette change rejected: {e}");
            return false;
        }
        if !self.palette.same_structure(palette) {
            log::warn!("palette change carries structural edits; applying colors only");
        }
        self.palette = self.palette.with_colors(palette.colors.clone());
        self.nodes.retint(&self.palette.colors);
        self.graph.retint(self.nodes.nodes());
        self.pulses.retint(&self.palette.colors.accents);
        true
    }

    /// Rebuild nodes, links and pulses from a new seed.
    pub fn reset(&mut self, seed: u64) {
        if self.disposed {
            return;
        }
        self.field = RandomField::new(seed);
        let (nodes, graph, pulses) = populate(&self.palette, &self.field, !self.camera.accepts_pointer());
        self.nodes = nodes;
        self.graph = graph;
        self.pulses = pulses;
        log::debug!("scene reset: seed={seed} links={}", self.graph.len());
    }

    pub fn on_unmount(&mut self) {
        self.dispose();
    }

    /// Release every resource and stop the scheduler. Idempotent.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.scheduler.dispose();
        self.camera.dispose();
        self.resources.dispose();
        log::info!("scene disposed");
    }

    /// Frame callback body. Runs at most one simulation step and one draw.
    pub fn frame(&mut self, now_ms: f64) -> FrameDecision {
        if self.disposed {
            return FrameDecision::Halt;
        }
        let decision = self.scheduler.tick(now_ms);
        if let FrameDecision::Run { dt } = decision {
            self.step(dt);
            self.render();
        }
        decision
    }

    /// Report how long the last frame body took so the scheduler can degrade.
    pub fn record_frame_cost(&mut self, cost_ms: f64) {
        if !self.disposed {
            self.scheduler.record_cost(cost_ms);
        }
    }

    /// Advance the simulation by `dt` seconds, clamped to one safe step.
    pub fn step(&mut self, dt: f32) {
        if self.disposed || !dt.is_finite() {
            return;
        }
        let dt = dt.clamp(0.0, MAX_STEP_SEC);
        self.nodes.integrate(dt, self.camera.pointer_world());
        self.graph.refresh_weights(self.nodes.nodes());
        self.pulses.advance(dt, &self.graph, &self.palette.colors.accents);
        self.camera.apply(dt);
    }

    /// Pack the current state and hand it to the backend.
    pub fn render(&mut self) -> bool {
        if self.disposed || !self.resources.is_rendering() {
            return false;
        }
        self.pack();
        let (w, h) = self.viewport.physical_size();
        let frame = FrameData {
            uniforms: FrameUniforms {
                view_proj: self.camera.transform(self.viewport.aspect()).to_cols_array_2d(),
                resolution: [w as f32, h as f32],
                time: self.nodes.time(),
                aspect: self.viewport.aspect(),
            },
            clear: self.palette.colors.background,
            links: &self.link_vertices,
            nodes: &self.node_sprites,
            pulses: &self.pulse_sprites,
        };
        self.resources.present(&frame)
    }

    fn pack(&mut self) {
        let nodes = self.nodes.nodes();

        self.node_sprites.clear();
        self.node_sprites
            .extend(nodes.iter().enumerate().map(|(i, n)| SpriteInstance {
                pos_size: n.position.extend(n.size).to_array(),
                color: n.color.with_alpha(0.55 + 0.45 * self.nodes.glow(i)),
            }));

        self.link_vertices.clear();
        for (edge, intensity) in self.graph.edges().iter().zip(self.graph.intensity()) {
            let color = edge.color.with_alpha(LINK_ALPHA * intensity);
            for end in [edge.a, edge.b] {
                let p = nodes[end as usize].position;
                self.link_vertices.push(LineVertex {
                    pos: p.extend(1.0).to_array(),
                    color,
                });
            }
        }

        let pulse_size = self.palette.node_size.1 * PULSE_SIZE_SCALE;
        self.pulse_sprites.clear();
        for (i, pulse) in self.pulses.pulses().iter().enumerate() {
            if let Some(p) = self.pulses.position(i, nodes, &self.graph) {
                self.pulse_sprites.push(SpriteInstance {
                    pos_size: p.extend(pulse_size).to_array(),
                    color: pulse.color.with_alpha(1.0),
                });
            }
        }
    }

    /// Current position of pulse `index`, if it sits on a link.
    pub fn pulse_position(&self, index: usize) -> Option<Vec3> {
        self.pulses.position(index, self.nodes.nodes(), &self.graph)
    }

    pub fn nodes(&self) -> &NodePool {
        &self.nodes
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn pulses(&self) -> &PulseAnimator {
        &self.pulses
    }

    pub fn palette(&self) -> &PaletteConfig {
        &self.palette
    }

    pub fn scheduler(&self) -> &FrameScheduler {
        &self.scheduler
    }

    pub fn camera(&self) -> &CameraController {
        &self.camera
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn lifecycle_state(&self) -> LifecycleState {
        self.resources.state()
    }

    pub fn is_rendering(&self) -> bool {
        self.resources.is_rendering()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn seed(&self) -> u64 {
        self.field.seed()
    }
}

fn populate(palette: &PaletteConfig, field: &RandomField, touch_only: bool) -> (NodePool, Graph, PulseAnimator) {
    let mut nodes = NodePool::spawn(
        palette,
        &mut field.stream(Stream::Layout),
        &mut field.stream(Stream::Nodes),
    );
    nodes.set_pointer_enabled(!touch_only);
    let graph = GraphBuilder::from_config(palette).build(nodes.nodes(), &mut field.stream(Stream::Edges));
    let pulses = PulseAnimator::new(palette, &graph, field.stream(Stream::Pulses));
    (nodes, graph, pulses)
}

fn link_vertex_capacity(palette: &PaletteConfig) -> usize {
    let max_edges = palette.node_count * palette.node_count.saturating_sub(1) / 2;
    let capped = palette.node_count * palette.detail.max_degree() / 2;
    2 * max_edges.min(capped)
}
