use cgmath::Vector3;
use log::warn;
use std::sync::Arc;
use std::time::Instant;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowAttributes},
};

use crate::gfx::{
    camera::{
        camera_controller::CameraController,
        camera_utils::CameraManager,
        orbit_camera::{OrbitCamera, OrbitCameraBounds},
    },
    picking::ScenePicker,
    rendering::render_engine::RenderEngine,
    scene::{
        loader::{load_workbench, LoadStatus},
        scene::Scene,
    },
};
use crate::interaction::{
    classify::{classify, Role},
    movable::PropKind,
    theme::ThemeToggle,
    Classification,
};
use crate::ui::{self, UiManager};

/// Default model location, overridable with the `WORKBENCH_MODEL` env var.
const DEFAULT_MODEL_PATH: &str = "assets/workbench.obj";

pub struct WorkbenchApp {
    event_loop: Option<EventLoop<()>>,
    app_state: AppState,
}

struct AppState {
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    ui_manager: Option<UiManager>,
    scene: Scene,
    classification: Option<Classification>,
    picker: ScenePicker,
    theme: ThemeToggle,
    load_status: LoadStatus,
    cursor_position: Option<(f64, f64)>,
    last_frame: Instant,
}

impl WorkbenchApp {
    /// Create a new workbench viewer with the authored camera pose
    pub async fn new() -> Self {
        let event_loop = EventLoop::new().expect("Failed to create event loop");

        let mut camera = OrbitCamera::new(13.0, 0.35, 0.85, Vector3::new(-0.05, 1.34, -0.66), 1.0);
        camera.bounds = OrbitCameraBounds::workbench();
        let controller = CameraController::new(0.005, 0.1);

        let scene = Scene::new(CameraManager::new(camera, controller));

        Self {
            event_loop: Some(event_loop),
            app_state: AppState {
                window: None,
                render_engine: None,
                ui_manager: None,
                scene,
                classification: None,
                picker: ScenePicker::new(),
                theme: ThemeToggle::new(),
                load_status: LoadStatus::Loading {
                    loaded: 0,
                    total: 1,
                },
                cursor_position: None,
                last_frame: Instant::now(),
            },
        }
    }

    /// Run the application (consumes self and starts the event loop)
    pub fn run(mut self) {
        let event_loop = self.event_loop.take().expect("Event loop already consumed");
        event_loop.set_control_flow(ControlFlow::Poll);

        event_loop
            .run_app(&mut self.app_state)
            .expect("Failed to run event loop");
    }
}

impl AppState {
    /// Render surface size: the window's physical size with the device pixel
    /// ratio capped at 2x.
    fn surface_size(window: &Window) -> (u32, u32) {
        let size = window.inner_size();
        let scale = window.scale_factor();
        let capped = scale.min(2.0) / scale;
        (
            ((size.width as f64 * capped) as u32).max(1),
            ((size.height as f64 * capped) as u32).max(1),
        )
    }

    /// Loads the scene assets and classifies the result, exactly once.
    ///
    /// A failed load leaves the viewer up with an empty scene; the status
    /// line on the overlay carries the error.
    fn load_scene_assets(&mut self) {
        let model_path =
            std::env::var("WORKBENCH_MODEL").unwrap_or_else(|_| DEFAULT_MODEL_PATH.to_string());

        let load_status = &mut self.load_status;
        let result = load_workbench(&mut self.scene, &model_path, &mut |loaded, total| {
            *load_status = LoadStatus::Loading { loaded, total };
        });

        match result {
            Ok(()) => {
                let classification = classify(&self.scene.objects);
                self.scene.apply_classification(&classification);
                self.classification = Some(classification);
                self.load_status = LoadStatus::Ready;
            }
            Err(err) => {
                warn!("continuing with an empty scene: {err}");
                self.load_status = LoadStatus::Failed(err.to_string());
            }
        }
    }

    /// Pointer click: convert to NDC, pick among the pickable set, trigger
    /// the matching movable. Guarded triggers make repeat clicks no-ops.
    fn dispatch_click(&mut self) {
        let Some(window) = self.window.as_ref() else {
            return;
        };
        let Some((x, y)) = self.cursor_position else {
            return;
        };
        let Some(classification) = self.classification.as_mut() else {
            return;
        };

        let size = window.inner_size();
        if size.width == 0 || size.height == 0 {
            return;
        }
        let ndc = (
            (2.0 * x / size.width as f64 - 1.0) as f32,
            (1.0 - 2.0 * y / size.height as f64) as f32,
        );

        let Some(hit) = self.picker.pick(
            ndc,
            &self.scene.camera_manager.camera,
            &self.scene.objects,
            &classification.pickables,
        ) else {
            return;
        };

        let assignment = &classification.assignments[hit.object_index];
        let kind = if assignment.has_role(Role::Book) {
            Some(PropKind::Book)
        } else if assignment.has_role(Role::DrawerPart) {
            Some(PropKind::Drawer)
        } else {
            // Pickable but inert, reserved for future roles.
            None
        };

        if let Some(kind) = kind {
            if let Some(movable) = classification.movable_mut(kind) {
                movable.trigger();
            }
        }
    }

    /// Per-frame animation tick: keep the thread cycling, advance every
    /// in-flight tween, push the resulting positions into the scene.
    fn tick_animations(&mut self, dt: f32) {
        let Some(classification) = self.classification.as_mut() else {
            return;
        };

        if let Some(thread) = classification.movable_mut(PropKind::Thread) {
            if !thread.is_animating() {
                thread.trigger();
            }
        }

        for movable in &mut classification.movables {
            if let Some(position) = movable.update(dt) {
                self.scene.apply_movable_position(movable, position);
            }
        }
    }

    fn toggle_theme(&mut self) {
        if let Some(classification) = self.classification.as_ref() {
            self.theme.toggle(&mut self.scene.objects, classification);
        }
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Ok(window) = event_loop.create_window(
            WindowAttributes::default()
                .with_title("Workbench")
                .with_inner_size(winit::dpi::LogicalSize::new(1200, 800)),
        ) {
            let window_handle = Arc::new(window);
            self.window = Some(window_handle.clone());

            let (width, height) = Self::surface_size(&window_handle);

            let window_clone = window_handle.clone();
            let renderer = pollster::block_on(async move {
                RenderEngine::new(window_clone, width, height).await
            });

            self.load_scene_assets();
            self.scene
                .camera_manager
                .camera
                .resize_projection(width, height);
            self.scene
                .init_gpu_resources(renderer.device(), renderer.queue());

            let mut ui_manager = UiManager::new(
                renderer.device(),
                renderer.queue(),
                renderer.surface_format(),
                &window_handle,
            );
            ui_manager.update_display_size(width, height);

            self.ui_manager = Some(ui_manager);
            self.render_engine = Some(renderer);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &winit::event_loop::ActiveEventLoop,
        window_id: winit::window::WindowId,
        event: winit::event::WindowEvent,
    ) {
        if self.render_engine.is_none() {
            return;
        }
        let Some(window) = self.window.clone() else {
            return;
        };

        // The overlay gets first refusal on input events.
        if let Some(ui_manager) = self.ui_manager.as_mut() {
            let ui_event: winit::event::Event<()> = winit::event::Event::WindowEvent {
                window_id,
                event: event.clone(),
            };
            if ui_manager.handle_input(&window, &ui_event) {
                window.request_redraw();
                return;
            }
        }

        match event {
            WindowEvent::KeyboardInput {
                event: key_event, ..
            } => {
                self.scene
                    .camera_manager
                    .process_keyboard_event(&key_event);

                if let PhysicalKey::Code(key_code) = key_event.physical_key {
                    match key_code {
                        KeyCode::Escape => event_loop.exit(),
                        KeyCode::KeyT if key_event.state == ElementState::Pressed => {
                            self.toggle_theme();
                        }
                        _ => (),
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor_position = Some((position.x, position.y));
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => {
                self.dispatch_click();
            }
            WindowEvent::Resized(PhysicalSize { .. }) => {
                let (width, height) = Self::surface_size(&window);
                self.scene
                    .camera_manager
                    .camera
                    .resize_projection(width, height);
                if let Some(render_engine) = self.render_engine.as_mut() {
                    render_engine.resize(width, height);
                }
                if let Some(ui_manager) = self.ui_manager.as_mut() {
                    ui_manager.update_display_size(width, height);
                }
            }
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                // Clamp stalls (asset load, window drag) to one long frame.
                let dt = (now - self.last_frame).as_secs_f32().min(0.1);
                self.last_frame = now;

                self.tick_animations(dt);
                self.scene.update();

                let Some(render_engine) = self.render_engine.as_mut() else {
                    return;
                };
                self.scene.update_all_transforms(render_engine.queue());
                render_engine.update(self.scene.camera_manager.camera.uniform);

                let mut response = ui::PanelResponse::default();
                if let Some(ui_manager) = self.ui_manager.as_mut() {
                    let window_clone = window.clone();
                    let light_mode = self.theme.is_light();
                    let status = self.load_status.clone();
                    render_engine.render_frame(
                        &self.scene,
                        Some(|device: &wgpu::Device,
                              queue: &wgpu::Queue,
                              encoder: &mut wgpu::CommandEncoder,
                              color_attachment: &wgpu::TextureView| {
                            ui_manager.draw(
                                device,
                                queue,
                                encoder,
                                &window_clone,
                                color_attachment,
                                |ui| {
                                    response = ui::draw_overlay(
                                        ui,
                                        ui::PanelState {
                                            light_mode,
                                            status: &status,
                                        },
                                    );
                                },
                            );
                        }),
                    );
                } else {
                    render_engine.render_frame_simple(&self.scene);
                }

                if response.theme_toggled {
                    self.toggle_theme();
                }
            }
            _ => (),
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: winit::event::DeviceEvent,
    ) {
        let Some(window) = self.window.as_ref() else {
            return;
        };

        // Skip camera motion while the overlay owns the pointer.
        if let Some(ui_manager) = self.ui_manager.as_ref() {
            let io = ui_manager.context.io();
            if io.want_capture_mouse || io.want_capture_keyboard {
                return;
            }
        }

        self.scene.camera_manager.process_event(&event, window);
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }
}
