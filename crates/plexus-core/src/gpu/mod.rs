//! wgpu implementation of [`RenderBackend`], shared by the web and native
//! front-ends.

mod helpers;

use crate::lifecycle::{BackendError, RenderBackend};
use crate::packed::{AllocationRequest, FrameData, FrameUniforms, LineVertex, SpriteInstance};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

struct SceneResources {
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    line_pipeline: wgpu::RenderPipeline,
    sprite_pipeline: wgpu::RenderPipeline,
    disc_vb: wgpu::Buffer,
    disc_vertices: u32,
    link_vb: wgpu::Buffer,
    link_capacity: usize,
    node_vb: wgpu::Buffer,
    node_capacity: usize,
    pulse_vb: wgpu::Buffer,
    pulse_capacity: usize,
}

impl SceneResources {
    fn destroy(self) {
        for buffer in [
            &self.uniform_buffer,
            &self.disc_vb,
            &self.link_vb,
            &self.node_vb,
            &self.pulse_vb,
        ] {
            buffer.destroy();
        }
    }
}

pub struct GpuRenderer {
    surface: Option<wgpu::Surface<'static>>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    resources: Option<SceneResources>,
    lost: Arc<AtomicBool>,
    released: bool,
}

impl GpuRenderer {
    /// Create the surface on `target` and acquire a device for it.
    pub async fn new(
        target: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
    ) -> Result<Self, BackendError> {
        let instance = wgpu::Instance::default();
        let surface = instance
            .create_surface(target)
            .map_err(|e| BackendError::SurfaceUnavailable(e.to_string()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| BackendError::SurfaceUnavailable("no compatible GPU adapter".into()))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::MemoryUsage,
                    label: Some("plexus_device"),
                },
                None,
            )
            .await
            .map_err(|e| BackendError::SurfaceUnavailable(format!("request_device: {e}")))?;

        let lost = Arc::new(AtomicBool::new(false));
        let lost_flag = lost.clone();
        device.set_device_lost_callback(move |reason, message| {
            log::warn!("GPU device lost ({reason:?}): {message}");
            lost_flag.store(true, Ordering::SeqCst);
        });
        let oom_flag = lost.clone();
        device.on_uncaptured_error(Box::new(move |err| match err {
            wgpu::Error::OutOfMemory { .. } => {
                log::error!("GPU out of memory: {err}");
                oom_flag.store(true, Ordering::SeqCst);
            }
            other => log::error!("GPU error: {other}"),
        }));

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8UnormSrgb | wgpu::TextureFormat::Rgba8UnormSrgb
                )
            })
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| BackendError::SurfaceUnavailable("surface reports no formats".into()))?;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        log::info!(
            "GPU surface ready: {:?} {}x{} ({})",
            format,
            config.width,
            config.height,
            adapter.get_info().name
        );

        Ok(Self {
            surface: Some(surface),
            device,
            queue,
            config,
            resources: None,
            lost,
            released: false,
        })
    }

    fn check_context(&self) -> Result<(), BackendError> {
        if self.released || self.lost.load(Ordering::SeqCst) {
            Err(BackendError::ContextLost)
        } else {
            Ok(())
        }
    }
}

impl RenderBackend for GpuRenderer {
    fn allocate(&mut self, request: &AllocationRequest) -> Result<(), BackendError> {
        self.check_context()?;
        let max_buffer = self.device.limits().max_buffer_size;
        let link_bytes = (request.link_vertex_capacity * std::mem::size_of::<LineVertex>()) as u64;
        if link_bytes > max_buffer {
            return Err(BackendError::Allocation(format!(
                "link buffer of {link_bytes} bytes exceeds device limit {max_buffer}"
            )));
        }
        if let Some(old) = self.resources.take() {
            old.destroy();
        }

        let device = &self.device;
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("plexus_shader"),
            source: wgpu::ShaderSource::Wgsl(crate::PLEXUS_WGSL.into()),
        });
        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("frame_uniforms"),
            size: std::mem::size_of::<FrameUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("frame_bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("frame_bg"),
            layout: &bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("plexus_pl"),
            bind_group_layouts: &[&bgl],
            push_constant_ranges: &[],
        });
        let line_pipeline = helpers::make_pipeline(
            device,
            "line_pipeline",
            &layout,
            &shader,
            "vs_line",
            "fs_line",
            &[helpers::line_layout()],
            wgpu::PrimitiveTopology::LineList,
            self.config.format,
        );
        let sprite_pipeline = helpers::make_pipeline(
            device,
            "sprite_pipeline",
            &layout,
            &shader,
            "vs_sprite",
            "fs_sprite",
            &[helpers::disc_layout(), helpers::instance_layout()],
            wgpu::PrimitiveTopology::TriangleList,
            self.config.format,
        );
        let (disc_vb, disc_vertices) = helpers::create_disc_buffer(device, request.disc_segments);
        let sprite_stride = std::mem::size_of::<SpriteInstance>();
        self.resources = Some(SceneResources {
            uniform_buffer,
            bind_group,
            line_pipeline,
            sprite_pipeline,
            disc_vb,
            disc_vertices,
            link_vb: helpers::create_vertex_buffer(
                device,
                "link_vb",
                request.link_vertex_capacity,
                std::mem::size_of::<LineVertex>(),
            ),
            link_capacity: request.link_vertex_capacity,
            node_vb: helpers::create_vertex_buffer(device, "node_vb", request.node_capacity, sprite_stride),
            node_capacity: request.node_capacity,
            pulse_vb: helpers::create_vertex_buffer(device, "pulse_vb", request.pulse_capacity, sprite_stride),
            pulse_capacity: request.pulse_capacity,
        });
        let (w, h) = request.physical_size;
        self.resize(w, h)
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<(), BackendError> {
        self.check_context()?;
        let Some(surface) = self.surface.as_ref() else {
            return Err(BackendError::SurfaceUnavailable("surface released".into()));
        };
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.config.width = width;
        self.config.height = height;
        surface.configure(&self.device, &self.config);
        Ok(())
    }

    fn draw(&mut self, frame: &FrameData<'_>) -> Result<(), BackendError> {
        self.check_context()?;
        let (Some(surface), Some(res)) = (self.surface.as_ref(), self.resources.as_ref()) else {
            return Err(BackendError::SurfaceUnavailable("resources not allocated".into()));
        };

        let links = &frame.links[..frame.links.len().min(res.link_capacity)];
        let nodes = &frame.nodes[..frame.nodes.len().min(res.node_capacity)];
        let pulses = &frame.pulses[..frame.pulses.len().min(res.pulse_capacity)];
        self.queue
            .write_buffer(&res.uniform_buffer, 0, bytemuck::bytes_of(&frame.uniforms));
        if !links.is_empty() {
            self.queue.write_buffer(&res.link_vb, 0, bytemuck::cast_slice(links));
        }
        if !nodes.is_empty() {
            self.queue.write_buffer(&res.node_vb, 0, bytemuck::cast_slice(nodes));
        }
        if !pulses.is_empty() {
            self.queue.write_buffer(&res.pulse_vb, 0, bytemuck::cast_slice(pulses));
        }

        let output = match surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                surface.configure(&self.device, &self.config);
                return Err(BackendError::FrameDropped("surface reconfigured".into()));
            }
            Err(wgpu::SurfaceError::OutOfMemory) => return Err(BackendError::ContextLost),
            Err(e) => return Err(BackendError::FrameDropped(e.to_string())),
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("plexus_encoder"),
            });
        {
            let bg = frame.clear;
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("plexus_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: bg.r as f64,
                            g: bg.g as f64,
                            b: bg.b as f64,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            rpass.set_bind_group(0, &res.bind_group, &[]);
            if !links.is_empty() {
                rpass.set_pipeline(&res.line_pipeline);
                rpass.set_vertex_buffer(0, res.link_vb.slice(..));
                rpass.draw(0..links.len() as u32, 0..1);
            }
            rpass.set_pipeline(&res.sprite_pipeline);
            rpass.set_vertex_buffer(0, res.disc_vb.slice(..));
            if !nodes.is_empty() {
                rpass.set_vertex_buffer(1, res.node_vb.slice(..));
                rpass.draw(0..res.disc_vertices, 0..nodes.len() as u32);
            }
            if !pulses.is_empty() {
                rpass.set_vertex_buffer(1, res.pulse_vb.slice(..));
                rpass.draw(0..res.disc_vertices, 0..pulses.len() as u32);
            }
        }
        self.queue.submit(Some(encoder.finish()));
        output.present();
        Ok(())
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        if let Some(res) = self.resources.take() {
            res.destroy();
        }
        self.surface = None;
        self.device.destroy();
        log::debug!("GPU resources released");
    }
}
