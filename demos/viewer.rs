//! Interactive PBR material viewer
//!
//! Run with:
//!   cargo run --example viewer
//!   cargo run --example viewer -- --mesh sphere
//!
//! Controls:
//!   Mouse drag - Orbit around the mesh
//!   Scroll     - Zoom in/out
//!   Escape     - Exit

use clap::{Parser, ValueEnum};
use glam::{Quat, Vec3};
use pbr_viewer::mesh::Mesh;
use pbr_viewer::scene::{Camera, OrbitController, SceneState};
use pbr_viewer::{panel, RenderLoop, ViewerConfig, WgpuRenderer};
use std::sync::Arc;
use std::time::Instant;
use winit::{
    dpi::PhysicalSize,
    event::{DeviceEvent, ElementState, Event, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ControlFlow, EventLoop, EventLoopWindowTarget},
    keyboard::{KeyCode, PhysicalKey},
    window::WindowBuilder,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum MeshKind {
    TorusKnot,
    Sphere,
}

#[derive(Parser, Debug)]
#[command(about = "Interactive PBR material viewer")]
struct Args {
    /// Mesh to display
    #[arg(long, value_enum, default_value_t = MeshKind::TorusKnot)]
    mesh: MeshKind,
    /// Window width
    #[arg(long, default_value_t = 1280)]
    width: u32,
    /// Window height
    #[arg(long, default_value_t = 720)]
    height: u32,
    /// Disable vsync
    #[arg(long)]
    no_vsync: bool,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let config = ViewerConfig {
        title: "PBR Viewer".to_string(),
        width: args.width,
        height: args.height,
        vsync: !args.no_vsync,
    };

    let mesh = match args.mesh {
        MeshKind::TorusKnot => Mesh::default_torus_knot(),
        MeshKind::Sphere => Mesh::sphere(48, 24),
    };

    println!("Starting PBR viewer ({})", mesh.name);
    println!();
    println!("Controls:");
    println!("  Mouse drag - Orbit");
    println!("  Scroll     - Zoom");
    println!("  Escape     - Exit");
    println!();

    let event_loop = EventLoop::new().expect("Failed to create event loop");

    let window = Arc::new(
        WindowBuilder::new()
            .with_title(&config.title)
            .with_inner_size(PhysicalSize::new(config.width, config.height))
            .build(&event_loop)
            .expect("Failed to create window"),
    );

    // Device acquisition failure is fatal: report it and never start the loop.
    let mut renderer = match WgpuRenderer::new(Arc::clone(&window), &mesh, &config) {
        Ok(renderer) => renderer,
        Err(e) => {
            eprintln!("Failed to start renderer: {e}");
            return;
        }
    };
    renderer.attach_egui(&window);

    let scene = SceneState::shared();

    let mut camera = Camera::new(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO);
    camera.set_aspect(config.width as f32, config.height as f32);
    let mut orbit = OrbitController::new(Vec3::ZERO, 5.0);
    orbit.sync_with_camera(&camera);

    let mut viewer = RenderLoop::new(renderer, scene.clone(), camera, Box::new(orbit));

    let mut last_frame = Instant::now();
    let mut spin = 0.0_f32;

    let window_clone = Arc::clone(&window);
    event_loop
        .run(move |event, elwt: &EventLoopWindowTarget<()>| {
            elwt.set_control_flow(ControlFlow::Poll);

            match event {
                Event::WindowEvent { event, .. } => {
                    // Pass events to egui first
                    let egui_consumed = viewer
                        .sink_mut()
                        .egui_mut()
                        .map(|egui| egui.on_window_event(&window_clone, &event))
                        .unwrap_or(false);

                    match &event {
                        WindowEvent::CloseRequested => {
                            viewer.teardown();
                            elwt.exit();
                        }
                        WindowEvent::Resized(size) => {
                            viewer.sink_mut().resize(size.width, size.height);
                            viewer
                                .camera_mut()
                                .set_aspect(size.width as f32, size.height as f32);
                        }
                        WindowEvent::KeyboardInput { event, .. } => {
                            if event.physical_key == PhysicalKey::Code(KeyCode::Escape)
                                && event.state == ElementState::Pressed
                            {
                                viewer.teardown();
                                elwt.exit();
                            }
                        }
                        WindowEvent::MouseInput { state, button, .. } if !egui_consumed => {
                            if *button == MouseButton::Left {
                                viewer.input_mut().orbit_active =
                                    *state == ElementState::Pressed;
                            }
                        }
                        WindowEvent::MouseWheel { delta, .. } if !egui_consumed => {
                            let scroll = match delta {
                                MouseScrollDelta::LineDelta(_, y) => *y,
                                MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 100.0,
                            };
                            viewer.input_mut().scroll_delta += scroll;
                        }
                        WindowEvent::Focused(false) => {
                            viewer.input_mut().orbit_active = false;
                        }
                        WindowEvent::RedrawRequested => {
                            let now = Instant::now();
                            let dt = (now - last_frame).as_secs_f32();
                            last_frame = now;

                            // Slow turntable under the orbit camera
                            spin += dt * 0.4;
                            scene.lock().set_model_rotation(Quat::from_rotation_y(spin));

                            let camera_pos = viewer.camera().position;
                            if let Some(egui) = viewer.sink_mut().egui_mut() {
                                egui.begin_frame(&window_clone);
                                panel::show(egui.context(), &scene, camera_pos);
                                egui.end_frame(&window_clone);
                            }

                            if let Err(e) = viewer.tick(dt) {
                                log::error!("Render error: {e}");
                            }
                        }
                        _ => {}
                    }
                }
                Event::DeviceEvent {
                    event: DeviceEvent::MouseMotion { delta },
                    ..
                } => {
                    let egui_wants_pointer = viewer
                        .sink_mut()
                        .egui_mut()
                        .map(|egui| egui.wants_pointer_input())
                        .unwrap_or(false);

                    if !egui_wants_pointer && viewer.input_mut().orbit_active {
                        viewer.input_mut().mouse_delta.x += delta.0 as f32;
                        viewer.input_mut().mouse_delta.y += delta.1 as f32;
                    }
                }
                Event::AboutToWait => {
                    window_clone.request_redraw();
                }
                _ => {}
            }
        })
        .expect("Event loop failed");
}
