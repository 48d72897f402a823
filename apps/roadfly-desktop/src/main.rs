mod grab;
mod keys;

use anyhow::{Result, anyhow};
use clap::Parser;
use egui::Context as EguiContext;
use grab::WindowGrab;
use roadfly_assets::{LoadingManager, MatcapImage};
use roadfly_input::{InputQueue, ResumePrompt};
use roadfly_motion::{
    BoundaryConstraint, Controls, ControlsConfig, FirstPersonCamera, PointerLockControls,
    SharedBounds,
};
use roadfly_render_wgpu::RoadRenderer;
use roadfly_scene::{RoadAnimator, RoadModel};
use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{DeviceEvent, ElementState, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowId};

#[derive(Parser)]
#[command(name = "roadfly-desktop", about = "Fly a first-person camera over an animated road")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Road model (glTF or GLB)
    #[arg(long, default_value = "assets/road.gltf")]
    model: PathBuf,

    /// Matcap texture (PNG or JPEG)
    #[arg(long, default_value = "assets/matcap.png")]
    matcap: PathBuf,

    /// Keep the built-in flat matcap instead of loading one
    #[arg(long)]
    no_matcap: bool,

    /// Controls configuration (YAML)
    #[arg(long)]
    config: Option<PathBuf>,
}

type RoadControls = Controls<PointerLockControls<WindowGrab>>;

enum Overlay {
    Loading(usize, usize),
    Resume,
    Hidden,
}

struct Gpu {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

struct GpuApp {
    controls_config: ControlsConfig,
    input: InputQueue,
    prompt: ResumePrompt,
    bounds: SharedBounds,
    animator: RoadAnimator,
    loader: Option<LoadingManager>,
    road: Option<RoadModel>,
    controls: Option<RoadControls>,
    start: Instant,
    fatal: Option<anyhow::Error>,
    window: Option<Arc<Window>>,
    gpu: Option<Gpu>,
    renderer: Option<RoadRenderer>,
    pending_matcap: Option<MatcapImage>,
    egui_ctx: EguiContext,
}

impl GpuApp {
    fn new(controls_config: ControlsConfig, loader: LoadingManager) -> Self {
        Self {
            controls_config,
            input: InputQueue::new(),
            prompt: ResumePrompt::new(),
            bounds: Rc::new(Cell::new(None)),
            animator: RoadAnimator::default(),
            loader: Some(loader),
            road: None,
            controls: None,
            start: Instant::now(),
            fatal: None,
            window: None,
            gpu: None,
            renderer: None,
            pending_matcap: None,
            egui_ctx: EguiContext::default(),
        }
    }

    fn init_gpu(&mut self, window: Arc<Window>) -> Result<()> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .ok_or_else(|| anyhow!("no suitable GPU adapter"))?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("roadfly_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or_else(|| anyhow!("surface reports no formats"))?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let egui_winit = egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );

        self.gpu = Some(Gpu {
            surface,
            device,
            queue,
            config,
            egui_winit,
            egui_renderer,
        });
        Ok(())
    }

    fn create_controls(&mut self, window: Arc<Window>) {
        let size = window.inner_size();
        let mut camera = FirstPersonCamera::default();
        camera.set_aspect(size.width, size.height);

        let pointer = PointerLockControls::new(camera, WindowGrab::new(window));
        let controls = Controls::new(pointer, &mut self.input, self.controls_config.clone())
            .with_lock_observer(self.prompt.clone())
            .with_constraint(BoundaryConstraint::new(self.bounds.clone()));
        self.controls = Some(controls);
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        tracing::error!("{err:#}");
        self.fatal = Some(err);
        event_loop.exit();
    }

    /// Collect finished asset loads; the first error ends the app.
    fn poll_loader(&mut self, event_loop: &ActiveEventLoop) {
        let Some(loader) = &mut self.loader else {
            return;
        };
        match loader.poll() {
            Ok(Some(assets)) => {
                self.loader = None;
                self.bounds.set(Some(assets.road.world_bounds()));
                self.pending_matcap = assets.matcap;
                self.road = Some(assets.road);
                tracing::info!("all assets loaded");
            }
            Ok(None) => {}
            Err(e) => {
                self.loader = None;
                self.fail(event_loop, e.into());
            }
        }
    }

    fn ensure_renderer(&mut self) {
        if self.renderer.is_some() {
            return;
        }
        let (Some(gpu), Some(road)) = (&self.gpu, &self.road) else {
            return;
        };
        let mut renderer = RoadRenderer::new(
            &gpu.device,
            &gpu.queue,
            gpu.config.format,
            gpu.config.width,
            gpu.config.height,
            road,
        );
        if let Some(matcap) = self.pending_matcap.take() {
            renderer.set_matcap(&gpu.device, &gpu.queue, &matcap);
        }
        self.renderer = Some(renderer);
    }

    /// Input, integrator with constraint, then the animator reading the
    /// constrained camera position.
    fn tick(&mut self) {
        let Some(controls) = &mut self.controls else {
            return;
        };
        controls.pump(&mut self.input);

        let Some(road) = &mut self.road else {
            return;
        };
        let t_ms = self.start.elapsed().as_secs_f64() * 1000.0;
        controls.update(t_ms);
        self.animator.animate(road, controls.position(), t_ms);
    }

    fn overlay(&self) -> Overlay {
        if let Some(loader) = &self.loader {
            let (done, total) = loader.progress();
            return Overlay::Loading(done, total);
        }
        if self.prompt.is_visible() {
            Overlay::Resume
        } else {
            Overlay::Hidden
        }
    }

    fn draw(&mut self) {
        let overlay = self.overlay();
        let (Some(window), Some(gpu)) = (&self.window, &mut self.gpu) else {
            return;
        };

        let output = match gpu.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.surface.configure(&gpu.device, &gpu.config);
                return;
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut cleared = false;
        if let (Some(renderer), Some(road), Some(controls)) =
            (&self.renderer, &self.road, &self.controls)
        {
            renderer.render(
                &gpu.device,
                &gpu.queue,
                &view,
                controls.camera().camera(),
                road,
            );
            cleared = true;
        }

        let raw_input = gpu.egui_winit.take_egui_input(window);
        let full_output = self.egui_ctx.run(raw_input, |ctx| draw_overlay(ctx, &overlay));
        gpu.egui_winit
            .handle_platform_output(window, full_output.platform_output);

        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [gpu.config.width, gpu.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            gpu.egui_renderer
                .update_texture(&gpu.device, &gpu.queue, *id, image_delta);
        }
        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("egui_encoder"),
            });
        gpu.egui_renderer.update_buffers(
            &gpu.device,
            &gpu.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );
        {
            let load = if cleared {
                wgpu::LoadOp::Load
            } else {
                wgpu::LoadOp::Clear(wgpu::Color::WHITE)
            };
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();
            gpu.egui_renderer
                .render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        gpu.queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            gpu.egui_renderer.free_texture(id);
        }

        output.present();
        window.request_redraw();
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(controls) = self.controls.take() {
            controls.destroy(&mut self.input);
        }
        event_loop.exit();
    }
}

fn draw_overlay(ctx: &egui::Context, overlay: &Overlay) {
    let text = match overlay {
        Overlay::Loading(done, total) => format!("Loading {done}/{total}"),
        Overlay::Resume => "Click to resume".to_string(),
        Overlay::Hidden => return,
    };
    egui::Area::new(egui::Id::new("overlay"))
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .interactable(false)
        .show(ctx, |ui| {
            ui.label(
                egui::RichText::new(text)
                    .size(28.0)
                    .color(egui::Color32::DARK_GRAY),
            );
        });
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title("roadfly")
            .with_inner_size(PhysicalSize::new(1280u32, 720));
        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                tracing::error!("cannot create window: {e}");
                event_loop.exit();
                return;
            }
        };

        if let Err(e) = self.init_gpu(window.clone()) {
            self.fail(event_loop, e);
            return;
        }
        self.create_controls(window.clone());
        self.window = Some(window);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let (Some(window), Some(gpu)) = (&self.window, &mut self.gpu) {
            let response = gpu.egui_winit.on_window_event(window, &event);
            if response.consumed {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => self.shutdown(event_loop),
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.config.width = new_size.width.max(1);
                    gpu.config.height = new_size.height.max(1);
                    gpu.surface.configure(&gpu.device, &gpu.config);
                    if let Some(renderer) = &mut self.renderer {
                        renderer.resize(&gpu.device, gpu.config.width, gpu.config.height);
                    }
                }
                if let Some(controls) = &mut self.controls {
                    controls
                        .camera_mut()
                        .camera_mut()
                        .set_aspect(new_size.width, new_size.height);
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key,
                        state,
                        ..
                    },
                ..
            } => {
                if logical_key == Key::Named(NamedKey::Escape) && state == ElementState::Pressed {
                    if let Some(controls) = &mut self.controls {
                        controls.unlock();
                    }
                }
                if let Some(id) = keys::key_identifier(&logical_key) {
                    match state {
                        ElementState::Pressed => self.input.key_down(id),
                        ElementState::Released => self.input.key_up(id),
                    }
                }
            }
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state: ElementState::Pressed,
                ..
            } => {
                if let Some(controls) = &mut self.controls {
                    if !controls.is_locked() {
                        controls.lock();
                    }
                }
            }
            WindowEvent::Focused(false) => {
                if let Some(controls) = &mut self.controls {
                    controls.unlock();
                }
            }
            WindowEvent::RedrawRequested => {
                self.poll_loader(event_loop);
                if self.fatal.is_some() {
                    return;
                }
                self.ensure_renderer();
                self.tick();
                self.draw();
            }
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            if let Some(controls) = &mut self.controls {
                controls
                    .camera_mut()
                    .look(delta.0 as f32, delta.1 as f32);
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("roadfly-desktop starting");

    let controls_config = match &cli.config {
        Some(path) => ControlsConfig::load(path)?,
        None => ControlsConfig::default(),
    };
    let matcap = (!cli.no_matcap).then_some(cli.matcap);
    let loader = LoadingManager::start(cli.model, matcap);

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(controls_config, loader);
    event_loop.run_app(&mut app)?;

    match app.fatal {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
