//! Material parameters for the metalness/roughness workflow

use glam::Vec3;

/// Lowest roughness the shading model accepts. The GGX distribution term
/// divides by `a^2`-derived quantities and is unstable at zero.
pub const ROUGHNESS_FLOOR: f32 = 0.01;

/// Live-tunable surface parameters.
///
/// Fields are private so every write path goes through the clamping setters:
/// out-of-domain values are silently clamped, never rejected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialParams {
    albedo: Vec3,
    metalness: f32,
    roughness: f32,
}

impl Default for MaterialParams {
    fn default() -> Self {
        // The reference scene's green torus knot.
        Self {
            albedo: Vec3::new(112.0, 249.0, 21.0) / 255.0,
            metalness: 0.201,
            roughness: 0.115,
        }
    }
}

impl MaterialParams {
    pub fn new(albedo: Vec3, metalness: f32, roughness: f32) -> Self {
        let mut params = Self::default();
        params.set_albedo(albedo);
        params.set_metalness(metalness);
        params.set_roughness(roughness);
        params
    }

    pub fn albedo(&self) -> Vec3 {
        self.albedo
    }

    pub fn metalness(&self) -> f32 {
        self.metalness
    }

    pub fn roughness(&self) -> f32 {
        self.roughness
    }

    pub fn set_albedo(&mut self, albedo: Vec3) {
        self.albedo = albedo.clamp(Vec3::ZERO, Vec3::ONE);
    }

    pub fn set_metalness(&mut self, metalness: f32) {
        self.metalness = metalness.clamp(0.0, 1.0);
    }

    pub fn set_roughness(&mut self, roughness: f32) {
        self.roughness = roughness.clamp(ROUGHNESS_FLOOR, 1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_scene() {
        let params = MaterialParams::default();
        assert_eq!(params.albedo(), Vec3::new(112.0, 249.0, 21.0) / 255.0);
        assert_eq!(params.metalness(), 0.201);
        assert_eq!(params.roughness(), 0.115);
    }

    #[test]
    fn metalness_clamps_to_unit_interval() {
        let mut params = MaterialParams::default();
        params.set_metalness(2.0);
        assert_eq!(params.metalness(), 1.0);
        params.set_metalness(-0.5);
        assert_eq!(params.metalness(), 0.0);
    }

    #[test]
    fn roughness_clamps_to_floor() {
        let mut params = MaterialParams::default();
        params.set_roughness(0.0);
        assert_eq!(params.roughness(), ROUGHNESS_FLOOR);
        params.set_roughness(-3.0);
        assert_eq!(params.roughness(), ROUGHNESS_FLOOR);
        params.set_roughness(1.5);
        assert_eq!(params.roughness(), 1.0);
    }

    #[test]
    fn albedo_clamps_per_channel() {
        let mut params = MaterialParams::default();
        params.set_albedo(Vec3::new(-1.0, 0.5, 2.0));
        assert_eq!(params.albedo(), Vec3::new(0.0, 0.5, 1.0));
    }

    #[test]
    fn in_domain_values_pass_through_unchanged() {
        let params = MaterialParams::new(Vec3::new(0.2, 0.4, 0.6), 0.33, 0.77);
        assert_eq!(params.metalness(), 0.33);
        assert_eq!(params.roughness(), 0.77);
    }
}
