//! Window, frame loop and GPU ownership

use anyhow::{Context, Result};
use sdfpad_engine::Canvas;
use sdfpad_render::{GpuContext, WgpuBackend, init_with_surface, wgpu};
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::editor::{self, EditorAction};
use crate::panels;
use crate::settings::{self, Settings};
use crate::watch::FragmentWatcher;

/// Everything that only exists while the window does
struct Gpu {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,
    context: GpuContext,
    backend: WgpuBackend,
    egui_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

/// Editor application state
struct SdfPadApp {
    /// Effective settings (stored values plus command line overrides)
    settings: Settings,
    /// Settings as loaded from disk; only the window size is written back
    stored: Settings,
    instance: wgpu::Instance,
    canvas: Canvas<WgpuBackend>,
    egui_ctx: egui::Context,
    actions: Vec<EditorAction>,
    watcher: Option<FragmentWatcher>,
    gpu: Option<Gpu>,
}

impl SdfPadApp {
    fn new(settings: Settings, stored: Settings) -> Self {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let canvas = Canvas::new(settings.fragment_source());

        let watcher = if settings.watch_shaders && settings.watched_dir().is_none() {
            tracing::warn!("--watch has no effect without a shader directory");
            None
        } else {
            settings
                .watched_dir()
                .and_then(|dir| match FragmentWatcher::new(dir) {
                    Ok(watcher) => Some(watcher),
                    Err(e) => {
                        tracing::warn!("Hot reload disabled: {}", e);
                        None
                    }
                })
        };

        let egui_ctx = egui::Context::default();
        egui_ctx.set_visuals(egui::Visuals::dark());

        Self {
            settings,
            stored,
            instance,
            canvas,
            egui_ctx,
            actions: Vec::new(),
            watcher,
            gpu: None,
        }
    }

    fn create_gpu(&self, event_loop: &ActiveEventLoop) -> Result<Gpu> {
        let window_attrs = Window::default_attributes()
            .with_title(&self.settings.window_title)
            .with_inner_size(LogicalSize::new(
                self.settings.window_width,
                self.settings.window_height,
            ));

        let window = Arc::new(
            event_loop
                .create_window(window_attrs)
                .context("Failed to create window")?,
        );

        let surface = self
            .instance
            .create_surface(window.clone())
            .context("Failed to create surface")?;

        let context = pollster::block_on(init_with_surface(&self.instance, &surface))
            .context("Failed to initialize GPU")?;

        let size = window.inner_size();
        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: context.surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: wgpu::CompositeAlphaMode::Auto,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&context.device, &surface_config);

        let backend = WgpuBackend::new(
            context.device.clone(),
            context.queue.clone(),
            context.surface_format,
        );

        let egui_state = egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &*window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer =
            egui_wgpu::Renderer::new(&context.device, context.surface_format, None, 1, false);

        Ok(Gpu {
            window,
            surface,
            surface_config,
            context,
            backend,
            egui_state,
            egui_renderer,
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        // A zero size (minimized) keeps the canvas waiting for a real one.
        self.canvas.set_surface_size(width, height);

        let Some(gpu) = &mut self.gpu else {
            return;
        };
        if width > 0 && height > 0 {
            gpu.surface_config.width = width;
            gpu.surface_config.height = height;
            gpu.surface.configure(&gpu.context.device, &gpu.surface_config);
        }
    }

    fn reload_changed_fragments(&mut self) {
        let Some(watcher) = &self.watcher else {
            return;
        };
        let changed = watcher.drain_changes();
        if changed.is_empty() {
            return;
        }
        for path in &changed {
            tracing::info!("Shader fragment changed: {}", path.display());
        }
        self.canvas.mark_reshader();
    }

    fn render(&mut self) {
        self.reload_changed_fragments();

        let Some(gpu) = &mut self.gpu else {
            return;
        };

        // UI pass: panels record actions against the current layers.
        let raw_input = gpu.egui_state.take_egui_input(&gpu.window);
        let canvas = &mut self.canvas;
        let actions = &mut self.actions;
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            actions.clear();
            panels::show(ctx, canvas, actions);
        });
        gpu.egui_state
            .handle_platform_output(&gpu.window, full_output.platform_output);

        // New layers have had their focus request; later appends get theirs next frame.
        self.canvas.settle_new_layers();
        if let Some(text) = editor::apply(&mut self.canvas, self.actions.drain(..)) {
            editor::copy_to_clipboard(&text);
        }

        self.canvas.prepare(&mut gpu.backend);

        let device = &gpu.context.device;
        let queue = &gpu.context.queue;

        // Texture uploads must not be lost when the surface skips a frame.
        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        for (id, image_delta) in &full_output.textures_delta.set {
            gpu.egui_renderer
                .update_texture(device, queue, *id, image_delta);
        }

        let output = match gpu.surface.get_current_texture() {
            Ok(output) => output,
            Err(e) => {
                if matches!(e, wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) {
                    gpu.surface.configure(device, &gpu.surface_config);
                } else {
                    tracing::warn!("Surface error: {:?}", e);
                }
                free_textures(&mut gpu.egui_renderer, &full_output.textures_delta.free);
                return;
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [gpu.surface_config.width, gpu.surface_config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Frame Encoder"),
        });
        let ui_commands = gpu.egui_renderer.update_buffers(
            device,
            queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );

        {
            let [r, g, b, a] = self.settings.clear_color;
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Canvas Render Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a }),
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    timestamp_writes: None,
                    occlusion_query_set: None,
                })
                .forget_lifetime();

            self.canvas.draw(&gpu.backend, &mut pass);
            gpu.egui_renderer
                .render(&mut pass, &paint_jobs, &screen_descriptor);
        }

        queue.submit(ui_commands.into_iter().chain(std::iter::once(encoder.finish())));
        output.present();

        free_textures(&mut gpu.egui_renderer, &full_output.textures_delta.free);
    }

    /// Write the last window size back to the settings file
    fn remember_window_size(&self) {
        let Some(gpu) = &self.gpu else {
            return;
        };
        let size: LogicalSize<u32> = gpu.window.inner_size().to_logical(gpu.window.scale_factor());
        if size.width == 0 || size.height == 0 {
            return;
        }
        if size.width == self.stored.window_width && size.height == self.stored.window_height {
            return;
        }

        let updated = Settings {
            window_width: size.width,
            window_height: size.height,
            ..self.stored.clone()
        };
        if let Err(e) = settings::save_settings(&updated) {
            tracing::warn!("Failed to save settings: {:#}", e);
        }
    }
}

fn free_textures(renderer: &mut egui_wgpu::Renderer, ids: &[egui::TextureId]) {
    for id in ids {
        renderer.free_texture(id);
    }
}

impl ApplicationHandler for SdfPadApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }

        match self.create_gpu(event_loop) {
            Ok(gpu) => {
                let size = gpu.window.inner_size();
                self.gpu = Some(gpu);
                self.canvas.set_surface_size(size.width, size.height);
            }
            Err(e) => {
                tracing::error!("{:#}", e);
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
        if let Some(gpu) = &mut self.gpu {
            let response = gpu.egui_state.on_window_event(&gpu.window, &event);
            if response.repaint {
                gpu.window.request_redraw();
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                self.resize(new_size.width, new_size.height);
            }
            WindowEvent::RedrawRequested => {
                self.render();
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(gpu) = &self.gpu {
            gpu.window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.remember_window_size();
        if let Some(gpu) = &mut self.gpu {
            self.canvas.release(&mut gpu.backend);
        }
        tracing::info!("Goodbye");
    }
}

/// Open the editor window and run until it closes
pub fn run(settings: Settings, stored: Settings) -> Result<()> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = SdfPadApp::new(settings, stored);
    event_loop.run_app(&mut app)?;

    Ok(())
}
