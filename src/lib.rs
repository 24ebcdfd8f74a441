//! pbr-viewer - An interactive physically-based material viewer
//!
//! Renders a single mesh with a Cook-Torrance microfacet BRDF and lets the
//! material and light parameters be tuned live from a control panel while an
//! orbit camera circles the mesh.
//!
//! # Architecture
//! - [`shading`] - the Cook-Torrance shading model: pure CPU reference
//!   functions plus the WGSL program executed per fragment on the GPU
//! - [`scene`] - the mutable uniform state (material, light, camera) that is
//!   the single source of truth for every draw
//! - [`render_loop`] - the per-tick orchestration: controller update, camera
//!   sync, one draw, with an explicit `Running`/`Stopped` lifecycle
//! - [`renderer`] - the wgpu backend behind the [`renderer::FrameSink`] seam
//! - [`mesh`], [`scene::OrbitController`], [`panel`], [`egui_layer`] - the
//!   geometry, camera-controls and control-panel collaborators

pub mod egui_layer;
pub mod mesh;
pub mod panel;
pub mod render_loop;
pub mod renderer;
pub mod scene;
pub mod shading;

pub use render_loop::{LoopPhase, RenderLoop};
pub use renderer::{FrameSink, RenderError, WgpuRenderer};
pub use scene::{ParamUpdate, SceneState, SharedScene, UniformSet};

/// Configuration for the viewer window and surface
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    /// Window title
    pub title: String,
    /// Initial window width
    pub width: u32,
    /// Initial window height
    pub height: u32,
    /// Enable vsync
    pub vsync: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            title: "PBR Viewer".to_string(),
            width: 1280,
            height: 720,
            vsync: true,
        }
    }
}
