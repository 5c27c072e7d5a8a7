use anyhow::Context;
use clap::Parser;
use plexus_core::gpu::GpuRenderer;
use plexus_core::{FrameDecision, HostInfo, Preset, Scene, Viewport};
use std::sync::Arc;
use std::time::Instant;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::{Event, WindowEvent};
use winit::event_loop::EventLoop;
use winit::window::WindowBuilder;

/// Preview a plexus scene in a desktop window.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// hero, about, services, space-journey or neural
    #[arg(long, default_value = "hero")]
    preset: String,
    /// Random when omitted.
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long, default_value_t = 1280)]
    width: u32,
    #[arg(long, default_value_t = 720)]
    height: u32,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let palette = Preset::from_name(&args.preset)?.config();
    let seed = args.seed.unwrap_or_else(rand::random);

    let event_loop = EventLoop::new().context("event loop")?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(format!("plexus · {} · seed {seed}", args.preset))
            .with_inner_size(LogicalSize::new(args.width, args.height))
            .build(&event_loop)
            .context("window")?,
    );

    let size = window.inner_size();
    let mut scene = Scene::with_host(
        palette,
        seed,
        HostInfo {
            viewport: viewport_for(size, window.scale_factor()),
            touch_only: false,
        },
    )?;
    match pollster::block_on(GpuRenderer::new(window.clone(), size.width, size.height)) {
        Ok(backend) => {
            if !scene.attach(Box::new(backend)) {
                log::warn!("renderer attach failed; running headless");
            }
        }
        Err(e) => log::warn!("no GPU surface ({e}); running headless"),
    }
    scene.on_mount();
    log::info!("preset={} seed={seed}", args.preset);

    let start = Instant::now();
    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent { event, .. } => match event {
            WindowEvent::Resized(size) => {
                let vp = viewport_for(size, window.scale_factor());
                scene.on_resize(vp.width, vp.height, vp.dpr);
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                let vp = viewport_for(window.inner_size(), scale_factor);
                scene.on_resize(vp.width, vp.height, vp.dpr);
            }
            WindowEvent::CursorMoved { position, .. } => {
                let size = window.inner_size();
                if size.width > 0 && size.height > 0 {
                    scene.on_pointer_move(
                        position.x as f32 / size.width as f32,
                        position.y as f32 / size.height as f32,
                    );
                }
            }
            WindowEvent::CursorLeft { .. } => scene.on_pointer_leave(),
            WindowEvent::Occluded(occluded) => scene.on_visibility_change(!occluded),
            WindowEvent::CloseRequested => {
                scene.on_unmount();
                elwt.exit();
            }
            WindowEvent::RedrawRequested => {
                let frame_start = Instant::now();
                let now_ms = start.elapsed().as_secs_f64() * 1000.0;
                match scene.frame(now_ms) {
                    FrameDecision::Run { .. } => {
                        scene.record_frame_cost(frame_start.elapsed().as_secs_f64() * 1000.0)
                    }
                    FrameDecision::Halt => elwt.exit(),
                    FrameDecision::Skip => {}
                }
            }
            _ => {}
        },
        Event::AboutToWait => window.request_redraw(),
        _ => {}
    })?;
    Ok(())
}

fn viewport_for(size: PhysicalSize<u32>, scale_factor: f64) -> Viewport {
    let logical: LogicalSize<f32> = size.to_logical(scale_factor);
    Viewport::new(logical.width, logical.height, scale_factor as f32)
}
