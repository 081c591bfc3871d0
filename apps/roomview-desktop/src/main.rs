use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context as _, Result};
use clap::Parser;
use egui::Context as EguiContext;
use glam::Vec2;
use roomview_assets::{LoadStatus, Model, ModelLoader};
use roomview_audio::{MediaTrack, SilentTrack};
use roomview_common::ViewportSize;
use roomview_control::{
    ControlConfig, CursorIcon, SceneContext, bind_model, click, hover, pointer_to_ndc,
};
use roomview_input::UiCommand;
use roomview_render_wgpu::{OrbitCamera, SceneRenderer};
use roomview_scene::{Ray, SceneGraph};
use roomview_tools::SceneInspector;
use roomview_ui::{PageState, widgets};
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::Key;
use winit::window::{Window, WindowId};

#[derive(Parser)]
#[command(name = "roomview-desktop", about = "Gamer room viewer")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// glTF/GLB model of the room
    #[arg(long, default_value = "setup_gamer.glb")]
    model: PathBuf,

    /// Background music file (played only with the `audio` feature)
    #[arg(long)]
    music: Option<PathBuf>,

    /// Initial music volume, 0 to 1
    #[arg(long)]
    volume: Option<f32>,

    #[arg(long, default_value_t = 1280)]
    width: u32,

    #[arg(long, default_value_t = 720)]
    height: u32,
}

type Track = Box<dyn MediaTrack>;

#[cfg(feature = "audio")]
fn open_track(music: Option<&Path>) -> Track {
    let Some(path) = music else {
        return Box::new(SilentTrack::new());
    };
    match roomview_audio::RodioTrack::open(path) {
        Ok(track) => {
            tracing::info!("music loaded: {}", path.display());
            Box::new(track)
        }
        Err(e) => {
            tracing::warn!("music unavailable ({}): {e}", path.display());
            Box::new(SilentTrack::new())
        }
    }
}

#[cfg(not(feature = "audio"))]
fn open_track(music: Option<&Path>) -> Track {
    if let Some(path) = music {
        tracing::warn!(
            "built without the `audio` feature; not playing {}",
            path.display()
        );
    }
    Box::new(SilentTrack::new())
}

/// Application state.
struct AppState {
    scene: SceneGraph,
    control: SceneContext,
    camera: OrbitCamera,
    page: PageState<Track>,
    loader: Option<ModelLoader>,
    viewport: ViewportSize,
    // Pointer state
    cursor: Option<Vec2>,
    dragging: bool,
    last_frame: Instant,
}

impl AppState {
    fn new(page: PageState<Track>, loader: Option<ModelLoader>, viewport: ViewportSize) -> Self {
        let mut camera = OrbitCamera::default();
        camera.set_viewport(viewport);
        Self {
            scene: SceneGraph::new(),
            control: SceneContext::new(ControlConfig::default()),
            camera,
            page,
            loader,
            viewport,
            cursor: None,
            dragging: false,
            last_frame: Instant::now(),
        }
    }

    /// Check the background load. True once a model has been placed.
    fn poll_model(&mut self) -> bool {
        let Some(loader) = &mut self.loader else {
            return false;
        };
        match loader.poll() {
            LoadStatus::Pending => false,
            LoadStatus::Ready(Ok(model)) => {
                self.loader = None;
                self.install_model(model)
            }
            LoadStatus::Ready(Err(e)) => {
                tracing::error!("failed to load model {}: {e}", loader.path().display());
                self.loader = None;
                false
            }
            LoadStatus::Consumed => {
                self.loader = None;
                false
            }
        }
    }

    fn install_model(&mut self, model: Model) -> bool {
        let template = model.into_template();
        match bind_model(&mut self.scene, &template) {
            Ok(bindings) => {
                if let Some(rig) = bindings.rig {
                    self.control.bind(rig);
                }
                tracing::info!("{}", SceneInspector::summary(&self.scene));
                tracing::debug!(
                    "bindings:\n{}",
                    SceneInspector::binding_report(&self.scene, &bindings)
                );
                true
            }
            Err(e) => {
                tracing::error!("failed to place model: {e}");
                false
            }
        }
    }

    fn pointer_ray(&self, pos: Vec2) -> Ray {
        self.camera
            .ray_through(pointer_to_ndc(pos.x, pos.y, self.viewport))
    }

    fn on_cursor_moved(&mut self, pos: Vec2, over_ui: bool) {
        if self.dragging {
            if let Some(last) = self.cursor {
                self.camera.drag(pos - last, self.viewport.height as f32);
            }
        }
        self.cursor = Some(pos);
        self.page.cursor = if over_ui {
            CursorIcon::Default
        } else {
            hover(&self.scene, &self.pointer_ray(pos))
        };
    }

    /// A completed left click. Every click counts toward music autostart;
    /// only clicks outside the widgets reach the scene.
    fn on_click(&mut self, over_ui: bool) {
        self.page.note_page_click();
        if over_ui {
            return;
        }
        let Some(pos) = self.cursor else { return };
        if let Some(command) = click(&self.scene, &self.pointer_ray(pos)) {
            self.page.dispatch(command);
        }
    }

    fn resize(&mut self, viewport: ViewportSize) {
        self.viewport = viewport;
        self.camera.set_viewport(viewport);
    }

    /// Advance one frame. True when new geometry must be uploaded.
    fn frame(&mut self, dt: f32) -> bool {
        let loaded = self.poll_model();
        self.control.update(&mut self.scene);
        self.camera.update(dt);
        loaded
    }
}

/// Window, surface and renderers. Created once the event loop resumes.
struct Gpu {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: SceneRenderer,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

impl Gpu {
    fn new(
        event_loop: &ActiveEventLoop,
        size: PhysicalSize<u32>,
        egui_ctx: &EguiContext,
    ) -> Result<Self> {
        let attrs = Window::default_attributes()
            .with_title("Gamer Setup")
            .with_inner_size(size);
        let window = Arc::new(event_loop.create_window(attrs).context("create window")?);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("create surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("no suitable GPU adapter")?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("roomview_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .context("create device")?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .context("surface reports no formats")?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let renderer = SceneRenderer::new(&device, surface_format, config.width, config.height);

        let egui_winit = egui_winit::State::new(
            egui_ctx.clone(),
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

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            renderer,
            egui_winit,
            egui_renderer,
        })
    }

    fn resize(&mut self, size: PhysicalSize<u32>) -> ViewportSize {
        self.config.width = size.width.max(1);
        self.config.height = size.height.max(1);
        self.surface.configure(&self.device, &self.config);
        self.renderer
            .resize(&self.device, self.config.width, self.config.height);
        ViewportSize::new(self.config.width, self.config.height)
    }

    /// Draw the scene and the page widgets, then apply the widget commands.
    fn render_frame(&mut self, state: &mut AppState, egui_ctx: &EguiContext) {
        let output = match self.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
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

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame_encoder"),
            });

        self.renderer.render(
            &self.queue,
            &mut encoder,
            &view,
            &state.camera,
            &state.scene,
        );

        let raw_input = self.egui_winit.take_egui_input(&self.window);
        let mut commands: Vec<UiCommand> = Vec::new();
        let full_output = egui_ctx.run(raw_input, |ctx| {
            commands = widgets::draw(ctx, &state.page);
        });
        state.page.end_frame(commands);

        self.egui_winit
            .handle_platform_output(&self.window, full_output.platform_output);

        let paint_jobs = egui_ctx.tessellate(full_output.shapes, full_output.pixels_per_point);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer
                .update_texture(&self.device, &self.queue, *id, image_delta);
        }
        self.egui_renderer.update_buffers(
            &self.device,
            &self.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();
            self.egui_renderer
                .render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        self.queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        output.present();
        self.window.request_redraw();
    }
}

struct GpuApp {
    state: AppState,
    initial_size: PhysicalSize<u32>,
    gpu: Option<Gpu>,
    egui_ctx: EguiContext,
}

impl GpuApp {
    fn new(state: AppState, initial_size: PhysicalSize<u32>) -> Self {
        Self {
            state,
            initial_size,
            gpu: None,
            egui_ctx: EguiContext::default(),
        }
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }
        match Gpu::new(event_loop, self.initial_size, &self.egui_ctx) {
            Ok(gpu) => {
                let size = gpu.window.inner_size();
                self.state
                    .resize(ViewportSize::new(size.width.max(1), size.height.max(1)));
                self.gpu = Some(gpu);
            }
            Err(e) => {
                tracing::error!("graphics initialization failed: {e:#}");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(gpu) = &mut self.gpu else {
            return;
        };
        let consumed = gpu.egui_winit.on_window_event(&gpu.window, &event).consumed;
        let over_ui = consumed || self.egui_ctx.is_pointer_over_area();

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                let viewport = gpu.resize(new_size);
                self.state.resize(viewport);
            }
            WindowEvent::Focused(false) => {
                self.state.control.keys.release_all();
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key: Key::Character(text),
                        state: key_state,
                        ..
                    },
                ..
            } if !consumed => {
                self.state
                    .control
                    .keys
                    .handle_key_text(text.as_str(), key_state == ElementState::Pressed);
            }
            WindowEvent::CursorMoved { position, .. } => {
                let pos = Vec2::new(position.x as f32, position.y as f32);
                self.state.on_cursor_moved(pos, over_ui);
            }
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state: btn_state,
                ..
            } => match btn_state {
                ElementState::Pressed => self.state.dragging = !over_ui,
                ElementState::Released => {
                    self.state.dragging = false;
                    self.state.on_click(over_ui);
                }
            },
            WindowEvent::MouseWheel { delta, .. } if !over_ui => {
                let steps = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(p) => p.y as f32 / 50.0,
                };
                self.state.camera.zoom(steps);
            }
            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let dt = (now - self.state.last_frame).as_secs_f32().min(0.1);
                self.state.last_frame = now;
                if self.state.frame(dt) {
                    gpu.renderer.upload_scene(&gpu.device, &self.state.scene);
                }
                gpu.render_frame(&mut self.state, &self.egui_ctx);
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(gpu) = &self.gpu {
            gpu.window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("roomview-desktop starting");

    let mut page = PageState::new(open_track(cli.music.as_deref()));
    if let Some(volume) = cli.volume {
        page.dispatch(UiCommand::SetVolume(volume.clamp(0.0, 1.0)));
    }
    let loader = ModelLoader::spawn(&cli.model);
    let viewport = ViewportSize::new(cli.width.max(1), cli.height.max(1));
    let state = AppState::new(page, Some(loader), viewport);

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(state, PhysicalSize::new(viewport.width, viewport.height));
    event_loop.run_app(&mut app)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use roomview_scene::{MeshData, NodeTemplate};
    use std::time::Duration;

    /// A quad in the z = 0 plane facing the default camera, plus a character.
    fn room_model() -> Model {
        let panel = MeshData {
            positions: vec![
                Vec3::new(-2.0, -1.0, 0.0),
                Vec3::new(2.0, -1.0, 0.0),
                Vec3::new(2.0, 3.0, 0.0),
                Vec3::new(-2.0, 3.0, 0.0),
            ],
            indices: vec![0, 1, 2, 0, 2, 3],
            ..MeshData::default()
        };
        Model {
            name: "setup_gamer".into(),
            roots: vec![
                NodeTemplate::new("Monitor_Panel").with_mesh(panel),
                NodeTemplate::new("Steve_ROOT").with_child(NodeTemplate::new("Pierna_L")),
            ],
        }
    }

    fn state() -> AppState {
        let page = PageState::new(Box::new(SilentTrack::new()) as Track);
        AppState::new(page, None, ViewportSize::new(1280, 720))
    }

    #[test]
    fn installed_model_drives_the_character() {
        let mut app = state();
        assert!(app.install_model(room_model()));
        assert!(app.control.rig().is_some());

        app.control.keys.handle_key_text("w", true);
        app.frame(1.0 / 60.0);
        let root = app.scene.find_by_name("Steve_ROOT").unwrap();
        assert!(app.scene.get(root).unwrap().local.position.z > 0.0);
    }

    #[test]
    fn failed_load_leaves_an_empty_usable_scene() {
        let page = PageState::new(Box::new(SilentTrack::new()) as Track);
        let loader = ModelLoader::spawn("missing_room.glb");
        let mut app = AppState::new(page, Some(loader), ViewportSize::new(1280, 720));
        app.control.keys.handle_key_text("w", true);

        let deadline = Instant::now() + Duration::from_secs(10);
        while app.loader.is_some() {
            assert!(!app.frame(1.0 / 60.0));
            assert!(Instant::now() < deadline, "model load never finished");
            std::thread::sleep(Duration::from_millis(5));
        }
        assert!(!app.frame(1.0 / 60.0));
        assert!(app.control.rig().is_none());
        assert_eq!(app.scene.len(), 1);

        app.on_cursor_moved(Vec2::new(640.0, 360.0), false);
        assert_eq!(app.page.cursor, CursorIcon::Default);
        app.on_click(false);
        assert!(!app.page.overlay.is_visible());
    }

    #[test]
    fn hover_and_click_on_monitor_open_overlay() {
        let mut app = state();
        app.install_model(room_model());

        app.on_cursor_moved(Vec2::new(640.0, 360.0), false);
        assert_eq!(app.page.cursor, CursorIcon::Pointer);

        app.on_click(false);
        assert!(app.page.overlay.is_visible());

        app.page.dispatch(UiCommand::CloseOverlay);
        app.on_click(true);
        assert!(!app.page.overlay.is_visible());
    }

    #[test]
    fn pointer_over_widgets_shows_default_cursor() {
        let mut app = state();
        app.install_model(room_model());
        app.on_cursor_moved(Vec2::new(640.0, 360.0), true);
        assert_eq!(app.page.cursor, CursorIcon::Default);
    }

    #[test]
    fn click_counts_toward_autostart() {
        let mut app = state();
        app.on_click(true);
        app.page.end_frame([]);
        assert!(app.page.music.is_playing());
    }

    #[test]
    fn drag_orbits_camera() {
        let mut app = state();
        let start = app.camera.theta;
        app.on_cursor_moved(Vec2::new(100.0, 100.0), false);
        app.dragging = true;
        app.on_cursor_moved(Vec2::new(200.0, 100.0), false);
        app.camera.enable_damping = false;
        app.frame(1.0 / 60.0);
        assert!(app.camera.theta < start);
    }

    #[test]
    fn resize_updates_camera_aspect() {
        let mut app = state();
        app.resize(ViewportSize::new(800, 800));
        assert_eq!(app.camera.aspect, 1.0);
    }
}
