use std::{ffi::CString, num::NonZeroU32, process::ExitCode, rc::Rc};

use glutin::{
    config::ConfigTemplateBuilder,
    context::{ContextApi, ContextAttributesBuilder, GlProfile, PossiblyCurrentContext, Version},
    display::{GetGlDisplay, GlDisplay},
    prelude::*,
    surface::{Surface, SwapInterval, WindowSurface},
};
use glutin_winit::{DisplayBuilder, GlWindow};
use log::{debug, error, info, warn, LevelFilter};
use raw_window_handle::HasRawWindowHandle;
use simple_logger::SimpleLogger;
use winit::{
    dpi::LogicalSize,
    event::{Event, WindowEvent},
    event_loop::{EventLoop, EventLoopBuilder},
    window::{Window, WindowBuilder},
};

use firststeps::{
    config::{default_config_path, load_or_create_config},
    AppConfig, AppError, GlowContext, InputState, Renderer, Result, TriangleScene,
};

// Fields drop in order: GL objects go before the context that owns them.
struct App {
    scene: Option<TriangleScene<GlowContext>>,
    renderer: Renderer<GlowContext>,
    input: InputState,
    gl_surface: Surface<WindowSurface>,
    gl_context: PossiblyCurrentContext,
    window: Window,
}

impl App {
    fn new(config: &AppConfig, event_loop: &EventLoop<()>) -> Result<Self> {
        let window_builder = WindowBuilder::new()
            .with_title(&config.window.title)
            .with_inner_size(LogicalSize::new(config.window.width, config.window.height));

        let template = ConfigTemplateBuilder::new().with_alpha_size(8);
        let display_builder = DisplayBuilder::new().with_window_builder(Some(window_builder));

        let (window, gl_config) = display_builder
            .build(event_loop, template, |configs| {
                configs
                    .reduce(|accum, config| {
                        if config.num_samples() > accum.num_samples() {
                            config
                        } else {
                            accum
                        }
                    })
                    .expect("display offered no GL configs")
            })
            .map_err(|e| AppError::WindowCreationFailed(e.to_string()))?;

        let window = window.ok_or_else(|| {
            AppError::WindowCreationFailed("display builder returned no window".to_string())
        })?;
        let raw_window_handle = window.raw_window_handle();

        let context_attributes = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(Version::new(
                config.window.gl_major,
                config.window.gl_minor,
            ))))
            .with_profile(GlProfile::Core)
            .build(Some(raw_window_handle));

        let gl_display = gl_config.display();

        let gl_context = unsafe { gl_display.create_context(&gl_config, &context_attributes) }
            .map_err(|e| AppError::WindowCreationFailed(format!("OpenGL context: {e}")))?;

        let attrs = window.build_surface_attributes(<_>::default());
        let gl_surface = unsafe { gl_display.create_window_surface(&gl_config, &attrs) }
            .map_err(|e| AppError::WindowCreationFailed(format!("GL surface: {e}")))?;

        let gl_context = gl_context
            .make_current(&gl_surface)
            .map_err(|e| AppError::WindowCreationFailed(format!("make current: {e}")))?;

        if config.window.vsync {
            if let Err(e) =
                gl_surface.set_swap_interval(&gl_context, SwapInterval::Wait(NonZeroU32::MIN))
            {
                warn!("Failed to enable vsync: {}", e);
            }
        }

        // Load OpenGL functions
        let probe = CString::new("glCreateShader")
            .map_err(|e| AppError::ContextLoaderFailed(e.to_string()))?;
        if gl_display.get_proc_address(probe.as_c_str()).is_null() {
            return Err(AppError::ContextLoaderFailed(
                "glCreateShader did not resolve".to_string(),
            ));
        }
        let gl = Rc::new(unsafe {
            GlowContext::from_loader(|symbol| gl_display.get_proc_address(symbol))
        });
        info!("OpenGL {} on {}", gl.version_string(), gl.renderer_string());

        let renderer = Renderer::new(Rc::clone(&gl), &config.render);
        let size = window.inner_size();
        renderer.resize_viewport(size.width, size.height);

        let scene = if config.render.draw_triangle {
            Some(TriangleScene::new(gl)?)
        } else {
            info!("Triangle disabled, rendering a blank window");
            None
        };

        Ok(Self {
            scene,
            renderer,
            input: InputState::default(),
            gl_surface,
            gl_context,
            window,
        })
    }

    /// Returns true once the application should shut down.
    fn handle_window_event(&mut self, event: &WindowEvent) -> Result<bool> {
        match event {
            WindowEvent::CloseRequested => return Ok(true),
            WindowEvent::Resized(size) => {
                if let (Some(width), Some(height)) =
                    (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
                {
                    self.gl_surface.resize(&self.gl_context, width, height);
                }
                self.renderer.resize_viewport(size.width, size.height);
            }
            WindowEvent::KeyboardInput { event, .. } => self.input.handle_key_event(event),
            WindowEvent::Focused(false) => self.input.reset(),
            WindowEvent::RedrawRequested => {
                if self.input.exit_requested() {
                    debug!("Exit key held");
                    return Ok(true);
                }
                self.render()?;
            }
            _ => {}
        }
        Ok(false)
    }

    fn render(&self) -> Result<()> {
        self.renderer
            .render_frame(self.scene.as_ref().map(TriangleScene::draw_call));
        self.gl_surface
            .swap_buffers(&self.gl_context)
            .map_err(|e| AppError::Presentation(e.to_string()))
    }

    fn cleanup(&mut self) {
        // Release the program and buffers while the context is still current.
        self.scene = None;
    }
}

fn load_config() -> Result<AppConfig> {
    let path = default_config_path().map_err(|e| AppError::Config(format!("{e:#}")))?;
    info!("Using config {}", path.display());
    load_or_create_config(&path).map_err(|e| AppError::Config(format!("{e:#}")))
}

fn run() -> Result<()> {
    let config = load_config()?;
    log::set_max_level(config.log_level);

    let event_loop = EventLoopBuilder::new().build()?;
    let mut app = App::new(&config, &event_loop)?;

    let mut outcome = Ok(());
    event_loop.run(|event, elwt| match event {
        Event::WindowEvent { event, .. } => match app.handle_window_event(&event) {
            Ok(false) => {}
            Ok(true) => elwt.exit(),
            Err(e) => {
                outcome = Err(e);
                elwt.exit();
            }
        },
        Event::AboutToWait => app.window.request_redraw(),
        Event::LoopExiting => app.cleanup(),
        _ => (),
    })?;

    info!("Shutting down");
    outcome
}

fn main() -> ExitCode {
    if let Err(e) = SimpleLogger::new().with_level(LevelFilter::Trace).init() {
        eprintln!("Failed to initialize logger: {e}");
        return ExitCode::FAILURE;
    }

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
