//! Scene state: the single source of truth for every draw
//!
//! The control panel writes here through [`SceneState::apply`], the render
//! loop mirrors the live camera position here once per tick, and a complete
//! [`UniformSet`] snapshot is taken under one lock per draw so no field can
//! ever be missing from a frame.

mod camera;
pub mod material;
mod orbit;

pub use camera::*;
pub use material::MaterialParams;
pub use orbit::*;

use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Quat, Vec3, Vec4};
use parking_lot::Mutex;

/// Declared domain of the light position sliders, per axis.
pub const LIGHT_RANGE: f32 = 10.0;

/// The single point light. Direction-only in the shading math; there is no
/// intensity or attenuation parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightState {
    pub position: Vec3,
}

impl Default for LightState {
    fn default() -> Self {
        Self {
            position: Vec3::new(5.0, 5.0, 5.0),
        }
    }
}

/// Mirror of the viewport camera's world position, refreshed every tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    pub position: Vec3,
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 5.0),
        }
    }
}

/// One mutation of a tunable parameter, routed from the control panel.
///
/// A single tagged entry point instead of one callback per field, so the
/// application logic lives in one place and tests need no UI.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamUpdate {
    Albedo(Vec3),
    Metalness(f32),
    Roughness(f32),
    LightX(f32),
    LightY(f32),
    LightZ(f32),
}

/// Scene state shared between the parameter bindings (writer) and the render
/// loop (reader, once per tick).
pub type SharedScene = Arc<Mutex<SceneState>>;

/// Owns the mutable uniform set and the mesh/light transforms.
#[derive(Debug, Clone)]
pub struct SceneState {
    material: MaterialParams,
    light: LightState,
    camera: CameraState,
    model_rotation: Quat,
}

impl Default for SceneState {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneState {
    pub fn new() -> Self {
        Self {
            material: MaterialParams::default(),
            light: LightState::default(),
            camera: CameraState::default(),
            model_rotation: Quat::IDENTITY,
        }
    }

    /// Wrap a fresh scene for sharing between the panel and the render loop.
    pub fn shared() -> SharedScene {
        Arc::new(Mutex::new(Self::new()))
    }

    pub fn material(&self) -> &MaterialParams {
        &self.material
    }

    pub fn light(&self) -> &LightState {
        &self.light
    }

    pub fn camera_position(&self) -> Vec3 {
        self.camera.position
    }

    pub fn model_rotation(&self) -> Quat {
        self.model_rotation
    }

    /// Apply one parameter mutation. Out-of-domain values clamp silently;
    /// the new value is visible to the next snapshot.
    pub fn apply(&mut self, update: ParamUpdate) {
        match update {
            ParamUpdate::Albedo(albedo) => self.material.set_albedo(albedo),
            ParamUpdate::Metalness(metalness) => self.material.set_metalness(metalness),
            ParamUpdate::Roughness(roughness) => self.material.set_roughness(roughness),
            ParamUpdate::LightX(x) => {
                self.light.position.x = x.clamp(-LIGHT_RANGE, LIGHT_RANGE);
            }
            ParamUpdate::LightY(y) => {
                self.light.position.y = y.clamp(-LIGHT_RANGE, LIGHT_RANGE);
            }
            ParamUpdate::LightZ(z) => {
                self.light.position.z = z.clamp(-LIGHT_RANGE, LIGHT_RANGE);
            }
        }
    }

    /// Mirror the live viewport camera position, called once per render tick
    /// before the draw's snapshot is taken.
    pub fn sync_camera(&mut self, position: Vec3) {
        self.camera.position = position;
    }

    pub fn set_model_rotation(&mut self, rotation: Quat) {
        self.model_rotation = rotation;
    }

    /// Snapshot the complete uniform set for one draw.
    pub fn uniform_set(&self) -> UniformSet {
        UniformSet {
            albedo: self.material.albedo(),
            metalness: self.material.metalness(),
            roughness: self.material.roughness(),
            light_pos: self.light.position,
            camera_pos: self.camera.position,
        }
    }

    /// Compose the GPU uniforms for one draw from the current snapshot and
    /// the camera's view-projection matrix.
    pub fn frame_uniforms(&self, view_proj: Mat4) -> FrameUniforms {
        FrameUniforms::compose(&self.uniform_set(), view_proj, Mat4::from_quat(self.model_rotation))
    }
}

/// The complete per-draw shader input bundle on the CPU side. Every field is
/// populated by construction; there is no partial state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniformSet {
    pub albedo: Vec3,
    pub metalness: f32,
    pub roughness: f32,
    pub light_pos: Vec3,
    pub camera_pos: Vec3,
}

/// GPU mirror of [`UniformSet`] plus the transform matrices, laid out to
/// match the `FrameUniforms` struct in [`crate::shading::PBR_SHADER`].
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct FrameUniforms {
    pub view_proj: Mat4,
    pub model: Mat4,
    pub normal_matrix: Mat4,
    pub camera_pos: Vec4,
    pub light_pos: Vec4,
    pub albedo: Vec4,
    /// x = metalness, y = roughness
    pub material: Vec4,
}

impl FrameUniforms {
    pub fn compose(set: &UniformSet, view_proj: Mat4, model: Mat4) -> Self {
        Self {
            view_proj,
            model,
            normal_matrix: model.inverse().transpose(),
            camera_pos: set.camera_pos.extend(1.0),
            light_pos: set.light_pos.extend(1.0),
            albedo: set.albedo.extend(1.0),
            material: Vec4::new(set.metalness, set.roughness, 0.0, 0.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_is_visible_in_next_snapshot() {
        let mut scene = SceneState::new();
        scene.apply(ParamUpdate::Metalness(0.8));
        assert_eq!(scene.uniform_set().metalness, 0.8);
        scene.apply(ParamUpdate::Albedo(Vec3::new(0.1, 0.2, 0.3)));
        assert_eq!(scene.uniform_set().albedo, Vec3::new(0.1, 0.2, 0.3));
    }

    #[test]
    fn light_x_at_domain_edge_reads_back_exactly() {
        let mut scene = SceneState::new();
        scene.apply(ParamUpdate::LightX(10.0));
        assert_eq!(scene.light().position.x, 10.0);
    }

    #[test]
    fn light_components_clamp_to_declared_domain() {
        let mut scene = SceneState::new();
        scene.apply(ParamUpdate::LightY(12.5));
        assert_eq!(scene.light().position.y, LIGHT_RANGE);
        scene.apply(ParamUpdate::LightZ(-42.0));
        assert_eq!(scene.light().position.z, -LIGHT_RANGE);
    }

    #[test]
    fn snapshot_is_complete_and_current() {
        let mut scene = SceneState::new();
        scene.sync_camera(Vec3::new(1.0, 2.0, 3.0));
        let set = scene.uniform_set();
        assert_eq!(set.camera_pos, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(set.light_pos, LightState::default().position);
        assert_eq!(set.albedo, MaterialParams::default().albedo());
    }

    #[test]
    fn frame_uniforms_mirror_the_snapshot() {
        let mut scene = SceneState::new();
        scene.apply(ParamUpdate::Roughness(0.4));
        scene.sync_camera(Vec3::new(0.0, 1.0, 4.0));
        let uniforms = scene.frame_uniforms(Mat4::IDENTITY);
        assert_eq!(uniforms.material.y, 0.4);
        assert_eq!(uniforms.camera_pos, Vec4::new(0.0, 1.0, 4.0, 1.0));
        assert_eq!(uniforms.model, Mat4::IDENTITY);
        assert_eq!(uniforms.normal_matrix, Mat4::IDENTITY);
    }

    #[test]
    fn uniform_buffer_layout_is_tight() {
        // Three mat4x4 plus four vec4, no implicit padding.
        assert_eq!(std::mem::size_of::<FrameUniforms>(), 3 * 64 + 4 * 16);
    }
}
