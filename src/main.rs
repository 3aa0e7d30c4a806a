//! label-viewer: full-screen museum label kiosk.
//!
//! Shows the shelf overview, lets visitors tap objects to open their label
//! panels, and drifts back to the shelf after ten quiet minutes. Escape ends
//! the session.
//!
//! Uses vello/wgpu for rendering and winit for the window and input; all
//! navigation decisions live in the `label_viewer` library.

mod assets;
mod render;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};
use vello::peniko::color::palette;
use vello::util::{RenderContext, RenderSurface};
use vello::{AaConfig, Renderer, RendererOptions, Scene};
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, KeyEvent, MouseButton, Touch, TouchPhase, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Fullscreen, Window};

use vello::wgpu;

use label_viewer::config::{ConfigError, KioskConfig};
use label_viewer::{KioskHost, Navigator, Panel, PanelGraph, logging, pump};

use assets::AssetCache;
use render::CanvasFit;

/// Museum label kiosk
#[derive(Parser, Debug)]
#[command(name = "label-viewer", version, about = "Full-screen museum label kiosk")]
struct Args {
    /// Kiosk config file (default: ~/.config/label-viewer/kiosk.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Start in windowed mode instead of fullscreen
    #[arg(short, long)]
    windowed: bool,

    /// Directory panel images are resolved against
    #[arg(short, long)]
    assets: Option<PathBuf>,

    /// Seconds of inactivity before returning to the home panel
    #[arg(long)]
    idle_timeout: Option<u64>,

    /// Validate the panel graph and exit
    #[arg(long)]
    check: bool,

    /// Print the effective configuration (including the graph) as TOML and exit
    #[arg(long)]
    dump_config: bool,
}

impl Args {
    /// Overlay command-line flags, then re-check the merged result.
    fn apply(&self, config: &mut KioskConfig) -> Result<(), ConfigError> {
        if self.windowed {
            config.window.windowed = true;
        }
        if let Some(root) = &self.assets {
            config.assets.root = root.clone();
        }
        if let Some(secs) = self.idle_timeout {
            config.idle_timeout_secs = secs;
        }
        config.validate()
    }
}

#[derive(Debug)]
enum RenderState {
    Active {
        surface: Box<RenderSurface<'static>>,
        valid_surface: bool,
        window: Arc<Window>,
    },
    Suspended(Option<Arc<Window>>),
}

impl RenderState {
    fn window(&self) -> Option<&Arc<Window>> {
        match self {
            Self::Active { window, .. } => Some(window),
            Self::Suspended(window) => window.as_ref(),
        }
    }
}

// ---------------------------------------------------------------------------
// Host capabilities backed by the winit window
// ---------------------------------------------------------------------------

struct WindowHost<'a> {
    window: Option<&'a Arc<Window>>,
    hide_cursor: bool,
    exit: bool,
}

impl KioskHost for WindowHost<'_> {
    fn show_panel(&mut self, _from: &Panel, to: &Panel) {
        info!(target: "host", panel = %to.id, background = %to.background, "Showing panel");
        if let Some(window) = self.window {
            window.request_redraw();
        }
    }

    fn hide_cursor(&mut self) {
        if let (true, Some(window)) = (self.hide_cursor, self.window) {
            window.set_cursor_visible(false);
        }
    }

    fn exit(&mut self) {
        self.exit = true;
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

struct App {
    context: RenderContext,
    renderers: Vec<Option<Renderer>>,
    state: RenderState,
    scene: Scene,
    navigator: Navigator,
    assets: AssetCache,
    config: KioskConfig,
    /// Last known pointer position in window coordinates.
    cursor: PhysicalPosition<f64>,
}

impl App {
    /// Deliver queued navigator notifications to the window.
    fn deliver(&mut self, event_loop: &ActiveEventLoop) {
        let mut host = WindowHost {
            window: self.state.window(),
            hide_cursor: self.config.window.hide_cursor,
            exit: false,
        };
        pump(&self.navigator, &mut host);
        if host.exit {
            info!("Exiting kiosk session");
            event_loop.exit();
        }
    }

    fn tap(&mut self, position: PhysicalPosition<f64>, event_loop: &ActiveEventLoop) {
        let RenderState::Active { surface, .. } = &self.state else {
            return;
        };
        let fit = CanvasFit::new(
            self.config.canvas,
            surface.config.width as f64,
            surface.config.height as f64,
        );
        if let Some(point) = fit.to_canvas(position.x, position.y) {
            self.navigator.handle_pointer_event(point);
            self.deliver(event_loop);
        }
    }

    fn redraw(&mut self) {
        let RenderState::Active {
            surface,
            valid_surface,
            ..
        } = &mut self.state
        else {
            return;
        };
        if !*valid_surface {
            return;
        }

        self.scene.reset();

        let width = surface.config.width as f64;
        let height = surface.config.height as f64;
        let fit = CanvasFit::new(self.config.canvas, width, height);

        render::render_panel(
            &mut self.scene,
            width,
            height,
            self.navigator.current_panel(),
            &self.assets,
            &fit,
        );

        let device_handle = &self.context.devices[surface.dev_id];
        let Some(renderer) = self.renderers[surface.dev_id].as_mut() else {
            return;
        };

        if let Err(e) = renderer.render_to_texture(
            &device_handle.device,
            &device_handle.queue,
            &self.scene,
            &surface.target_view,
            &vello::RenderParams {
                base_color: palette::css::BLACK,
                width: surface.config.width,
                height: surface.config.height,
                antialiasing_method: AaConfig::Msaa16,
            },
        ) {
            error!("Failed to render panel: {}", e);
            return;
        }

        let surface_texture = match surface.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(e) => {
                error!("Failed to get surface texture: {}", e);
                return;
            }
        };

        let mut encoder =
            device_handle
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("Surface Blit"),
                });
        surface.blitter.copy(
            &device_handle.device,
            &mut encoder,
            &surface.target_view,
            &surface_texture
                .texture
                .create_view(&wgpu::TextureViewDescriptor::default()),
        );
        device_handle.queue.submit([encoder.finish()]);
        surface_texture.present();
        let _ = device_handle.device.poll(wgpu::PollType::Poll);
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let RenderState::Suspended(cached_window) = &mut self.state else {
            return;
        };

        let window = match cached_window.take() {
            Some(window) => window,
            None => match create_window(event_loop, self.config.window.windowed) {
                Ok(window) => window,
                Err(e) => {
                    error!("Failed to create window: {:#}", e);
                    event_loop.exit();
                    return;
                }
            },
        };

        let size = window.inner_size();
        let surface_future = self.context.create_surface(
            window.clone(),
            size.width,
            size.height,
            wgpu::PresentMode::AutoVsync,
        );
        let surface = match pollster::block_on(surface_future) {
            Ok(surface) => surface,
            Err(e) => {
                error!("Failed to create surface: {}", e);
                event_loop.exit();
                return;
            }
        };

        self.renderers
            .resize_with(self.context.devices.len(), || None);
        if self.renderers[surface.dev_id].is_none() {
            match create_renderer(&self.context, &surface) {
                Ok(renderer) => self.renderers[surface.dev_id] = Some(renderer),
                Err(e) => {
                    error!("Failed to create renderer: {:#}", e);
                    event_loop.exit();
                    return;
                }
            }
        }

        let mut host = WindowHost {
            window: Some(&window),
            hide_cursor: self.config.window.hide_cursor,
            exit: false,
        };
        host.hide_cursor();
        window.request_redraw();

        self.state = RenderState::Active {
            surface: Box::new(surface),
            valid_surface: true,
            window,
        };
    }

    fn suspended(&mut self, _event_loop: &ActiveEventLoop) {
        if let RenderState::Active { window, .. } = &self.state {
            self.state = RenderState::Suspended(Some(window.clone()));
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        match &self.state {
            RenderState::Active { window, .. } if window.id() == window_id => {}
            _ => return,
        }

        match event {
            WindowEvent::CloseRequested => {
                self.navigator.request_exit();
                self.deliver(event_loop);
            }

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key: Key::Named(NamedKey::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                self.navigator.request_exit();
                self.deliver(event_loop);
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = position;
            }

            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => {
                self.tap(self.cursor, event_loop);
            }

            WindowEvent::Touch(Touch {
                phase: TouchPhase::Started,
                location,
                ..
            }) => {
                self.tap(location, event_loop);
            }

            WindowEvent::Resized(size) => {
                if let RenderState::Active {
                    surface,
                    valid_surface,
                    window,
                } = &mut self.state
                {
                    if size.width != 0 && size.height != 0 {
                        self.context
                            .resize_surface(surface, size.width, size.height);
                        *valid_surface = true;
                        window.request_redraw();
                    } else {
                        *valid_surface = false;
                    }
                }
            }

            WindowEvent::RedrawRequested => self.redraw(),

            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        self.navigator.tick(Instant::now());
        self.deliver(event_loop);
        // Nothing animates; sleep until input arrives or the idle deadline.
        event_loop.set_control_flow(ControlFlow::WaitUntil(self.navigator.idle_deadline()));
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = KioskConfig::load_or_default(args.config.as_deref())
        .context("failed to load kiosk config")?;
    let log_guard = logging::init(&config.logging);
    args.apply(&mut config).context("invalid command-line option")?;
    if let Some(dir) = &log_guard.file_dir {
        info!(dir = %dir.display(), "Writing log file");
    }

    let graph = PanelGraph::build(config.graph_spec()).context("panel graph is invalid")?;

    if args.dump_config {
        let effective = KioskConfig {
            graph: Some(graph.to_spec()),
            ..config
        };
        let text = effective.to_toml().context("failed to serialize config")?;
        print!("{text}");
        return Ok(());
    }

    if args.check {
        println!(
            "panel graph OK: {} panels, home `{}`, {} assets",
            graph.len(),
            graph.home(),
            graph.assets().len()
        );
        return Ok(());
    }

    info!(
        version = env!("CARGO_PKG_VERSION"),
        assets = %config.assets.root.display(),
        "label-viewer starting"
    );

    let assets = AssetCache::load(&config.assets.root, &graph);
    if assets.is_empty() {
        warn!(root = %config.assets.root.display(), "No panel images found; drawing placeholders");
    }
    let navigator = Navigator::new(graph, config.idle_timeout());

    let mut app = App {
        context: RenderContext::new(),
        renderers: vec![],
        state: RenderState::Suspended(None),
        scene: Scene::new(),
        navigator,
        assets,
        config,
        cursor: PhysicalPosition::new(0.0, 0.0),
    };

    let event_loop = EventLoop::new()?;
    event_loop
        .run_app(&mut app)
        .context("event loop terminated abnormally")?;

    Ok(())
}

fn create_window(event_loop: &ActiveEventLoop, windowed: bool) -> Result<Arc<Window>> {
    let mut attr = Window::default_attributes().with_title("label-viewer");

    if !windowed {
        attr = attr.with_fullscreen(Some(Fullscreen::Borderless(None)));
    } else {
        attr = attr.with_inner_size(winit::dpi::LogicalSize::new(1280, 720));
    }

    Ok(Arc::new(event_loop.create_window(attr)?))
}

fn create_renderer(render_cx: &RenderContext, surface: &RenderSurface<'_>) -> Result<Renderer> {
    Renderer::new(
        &render_cx.devices[surface.dev_id].device,
        RendererOptions::default(),
    )
    .context("couldn't create vello renderer")
}
