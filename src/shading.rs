//! Cook-Torrance microfacet shading model
//!
//! The CPU functions here are the reference implementation of the BRDF and
//! are what the unit tests exercise. [`PBR_SHADER`] is the same math in WGSL,
//! term for term, executed per fragment on the GPU. Both sides must stay in
//! lockstep; a change to one is a change to the other.

use glam::{Vec3, Vec4};

use crate::scene::UniformSet;

/// Base reflectance of a dielectric surface at normal incidence.
pub const DIELECTRIC_F0: f32 = 0.04;
/// Flat ambient contribution, as a fraction of albedo. No occlusion.
pub const AMBIENT_FACTOR: f32 = 0.03;
/// Guard added to the specular denominator at grazing angles.
pub const SPECULAR_GUARD: f32 = 1e-4;
/// Display gamma for the linear-to-sRGB approximation.
pub const GAMMA: f32 = 2.2;

/// Diffuse and specular lobes of the BRDF, before the `N.L` factor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrdfTerms {
    pub diffuse: Vec3,
    pub specular: Vec3,
}

/// `F0 = lerp(0.04, albedo, metalness)`: dielectric baseline interpolated
/// toward the full albedo as the surface becomes metallic.
pub fn base_reflectance(albedo: Vec3, metalness: f32) -> Vec3 {
    Vec3::splat(DIELECTRIC_F0).lerp(albedo, metalness)
}

/// Schlick's approximation of the Fresnel term.
pub fn fresnel_schlick(v_dot_h: f32, f0: Vec3) -> Vec3 {
    f0 + (Vec3::ONE - f0) * (1.0 - v_dot_h).powi(5)
}

/// GGX/Trowbridge-Reitz normal distribution with `a = roughness^2`.
///
/// Undefined at `roughness = 0`; callers must respect the clamp floor
/// enforced by [`crate::scene::material::MaterialParams`].
pub fn distribution_ggx(n_dot_h: f32, roughness: f32) -> f32 {
    let a = roughness * roughness;
    let a2 = a * a;
    let d = n_dot_h * n_dot_h * (a2 - 1.0) + 1.0;
    a2 / (std::f32::consts::PI * d * d)
}

/// Smith joint masking-shadowing with the direct-lighting k-remap
/// `k = (roughness + 1)^2 / 8`.
pub fn geometry_smith(n_dot_v: f32, n_dot_l: f32, roughness: f32) -> f32 {
    let k = (roughness + 1.0) * (roughness + 1.0) / 8.0;
    smith_g1(n_dot_v, k) * smith_g1(n_dot_l, k)
}

fn smith_g1(n_dot_x: f32, k: f32) -> f32 {
    n_dot_x / (n_dot_x * (1.0 - k) + k)
}

/// Evaluate both BRDF lobes for unit vectors `n`, `v`, `l`.
///
/// Energy conserving: metals contribute no diffuse, and the diffuse lobe only
/// receives the light the Fresnel term did not reflect specularly.
pub fn brdf(n: Vec3, v: Vec3, l: Vec3, albedo: Vec3, metalness: f32, roughness: f32) -> BrdfTerms {
    let h = (v + l).normalize_or_zero();

    let n_dot_v = n.dot(v).max(0.0);
    let n_dot_l = n.dot(l).max(0.0);
    let n_dot_h = n.dot(h).max(0.0);
    let v_dot_h = v.dot(h).max(0.0);

    let f0 = base_reflectance(albedo, metalness);
    let f = fresnel_schlick(v_dot_h, f0);
    let d = distribution_ggx(n_dot_h, roughness);
    let g = geometry_smith(n_dot_v, n_dot_l, roughness);

    let specular = f * (d * g / (4.0 * n_dot_v * n_dot_l + SPECULAR_GUARD));
    let diffuse = (Vec3::ONE - f) * (1.0 - metalness) * albedo / std::f32::consts::PI;

    BrdfTerms { diffuse, specular }
}

/// Shade one surface point against the current uniform set.
///
/// Returns the gamma-encoded output color with alpha 1. When the light is
/// behind the surface (`N.L = 0`) only the ambient term survives.
pub fn shade(world_pos: Vec3, normal: Vec3, uniforms: &UniformSet) -> Vec4 {
    let n = normal.normalize_or_zero();
    let v = (uniforms.camera_pos - world_pos).normalize_or_zero();
    let l = (uniforms.light_pos - world_pos).normalize_or_zero();

    let terms = brdf(n, v, l, uniforms.albedo, uniforms.metalness, uniforms.roughness);
    let n_dot_l = n.dot(l).max(0.0);

    let ambient = AMBIENT_FACTOR * uniforms.albedo;
    let color = (terms.diffuse + terms.specular) * n_dot_l + ambient;

    gamma_encode(color).extend(1.0)
}

/// Componentwise `c^(1/2.2)`, clamped to the displayable range.
pub fn gamma_encode(color: Vec3) -> Vec3 {
    color.powf(1.0 / GAMMA).min(Vec3::ONE)
}

/// The shading program executed by the GPU. The fragment stage is the WGSL
/// rendition of [`brdf`] and [`shade`]; the vertex stage forwards world
/// position, normal and uv.
pub const PBR_SHADER: &str = r#"
struct FrameUniforms {
    view_proj: mat4x4<f32>,
    model: mat4x4<f32>,
    normal_matrix: mat4x4<f32>,
    camera_pos: vec4<f32>,
    light_pos: vec4<f32>,
    albedo: vec4<f32>,
    // x = metalness, y = roughness
    material: vec4<f32>,
}

@group(0) @binding(0) var<uniform> frame: FrameUniforms;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
}

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_position: vec3<f32>,
    @location(1) world_normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
}

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    var out: VertexOutput;

    let world_pos = frame.model * vec4<f32>(in.position, 1.0);
    out.world_position = world_pos.xyz;
    out.clip_position = frame.view_proj * world_pos;
    out.world_normal = normalize((frame.normal_matrix * vec4<f32>(in.normal, 0.0)).xyz);
    out.uv = in.uv;

    return out;
}

const PI: f32 = 3.14159265359;
const DIELECTRIC_F0: f32 = 0.04;
const AMBIENT_FACTOR: f32 = 0.03;
const SPECULAR_GUARD: f32 = 1e-4;

fn fresnel_schlick(v_dot_h: f32, f0: vec3<f32>) -> vec3<f32> {
    return f0 + (vec3<f32>(1.0) - f0) * pow(1.0 - v_dot_h, 5.0);
}

fn distribution_ggx(n_dot_h: f32, roughness: f32) -> f32 {
    let a = roughness * roughness;
    let a2 = a * a;
    let d = n_dot_h * n_dot_h * (a2 - 1.0) + 1.0;
    return a2 / (PI * d * d);
}

fn smith_g1(n_dot_x: f32, k: f32) -> f32 {
    return n_dot_x / (n_dot_x * (1.0 - k) + k);
}

fn geometry_smith(n_dot_v: f32, n_dot_l: f32, roughness: f32) -> f32 {
    let k = (roughness + 1.0) * (roughness + 1.0) / 8.0;
    return smith_g1(n_dot_v, k) * smith_g1(n_dot_l, k);
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let albedo = frame.albedo.rgb;
    let metalness = frame.material.x;
    let roughness = frame.material.y;

    let n = normalize(in.world_normal);
    let v = normalize(frame.camera_pos.xyz - in.world_position);
    let l = normalize(frame.light_pos.xyz - in.world_position);
    let h = normalize(v + l);

    let n_dot_v = max(dot(n, v), 0.0);
    let n_dot_l = max(dot(n, l), 0.0);
    let n_dot_h = max(dot(n, h), 0.0);
    let v_dot_h = max(dot(v, h), 0.0);

    let f0 = mix(vec3<f32>(DIELECTRIC_F0), albedo, metalness);
    let f = fresnel_schlick(v_dot_h, f0);
    let d = distribution_ggx(n_dot_h, roughness);
    let g = geometry_smith(n_dot_v, n_dot_l, roughness);

    let specular = f * (d * g / (4.0 * n_dot_v * n_dot_l + SPECULAR_GUARD));
    let diffuse = (vec3<f32>(1.0) - f) * (1.0 - metalness) * albedo / PI;

    let ambient = AMBIENT_FACTOR * albedo;
    let color = (diffuse + specular) * n_dot_l + ambient;

    return vec4<f32>(pow(color, vec3<f32>(1.0 / 2.2)), 1.0);
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::material::ROUGHNESS_FLOOR;
    use crate::scene::SceneState;

    fn default_uniforms() -> UniformSet {
        SceneState::new().uniform_set()
    }

    fn assert_close(actual: Vec3, expected: Vec3, tol: f32) {
        assert!(
            (actual - expected).abs().max_element() < tol,
            "expected {expected:?}, got {actual:?}"
        );
    }

    #[test]
    fn golden_facing_fragment() {
        // Default material and light, camera at (0,0,5), fragment at the
        // origin facing +Z. Reference triple computed from this algorithm
        // when it was fixed.
        let out = shade(Vec3::ZERO, Vec3::Z, &default_uniforms());
        assert_close(
            out.truncate(),
            Vec3::new(0.298467, 0.409163, 0.143611),
            1e-4,
        );
        assert_eq!(out.w, 1.0);
    }

    #[test]
    fn light_behind_leaves_only_ambient() {
        let mut uniforms = default_uniforms();
        uniforms.light_pos = Vec3::new(0.0, 0.0, -5.0);

        let out = shade(Vec3::ZERO, Vec3::Z, &uniforms);
        let ambient = gamma_encode(AMBIENT_FACTOR * uniforms.albedo);
        assert_eq!(out.truncate(), ambient);
    }

    #[test]
    fn metal_has_no_diffuse() {
        let n = Vec3::Z;
        let v = Vec3::new(0.0, 0.6, 0.8).normalize();
        let l = Vec3::new(0.3, -0.2, 0.9).normalize();
        for roughness in [ROUGHNESS_FLOOR, 0.3, 0.7, 1.0] {
            let terms = brdf(n, v, l, Vec3::new(0.9, 0.5, 0.2), 1.0, roughness);
            assert_eq!(terms.diffuse, Vec3::ZERO);
        }
    }

    #[test]
    fn dielectric_base_reflectance_ignores_albedo() {
        for albedo in [Vec3::ZERO, Vec3::ONE, Vec3::new(0.1, 0.9, 0.4)] {
            assert_eq!(base_reflectance(albedo, 0.0), Vec3::splat(DIELECTRIC_F0));
        }
    }

    #[test]
    fn ggx_distribution_narrows_as_roughness_rises() {
        // At N.H = 1 the peak height must fall monotonically with roughness.
        let mut previous = f32::INFINITY;
        let mut roughness = 0.01_f32;
        while roughness <= 1.0 {
            let d = distribution_ggx(1.0, roughness);
            assert!(d.is_finite());
            assert!(d < previous, "D not decreasing at roughness {roughness}");
            previous = d;
            roughness += 0.01;
        }
    }

    #[test]
    fn output_finite_across_parameter_grid() {
        let directions = [
            Vec3::Z,
            Vec3::new(0.0, 1.0, 0.001).normalize(),
            Vec3::new(1.0, 1.0, 1.0).normalize(),
            Vec3::new(-0.3, 0.4, 0.2).normalize(),
        ];
        for step_m in 0..=4 {
            for step_r in 0..=4 {
                let metalness = step_m as f32 / 4.0;
                let roughness = (step_r as f32 / 4.0).max(ROUGHNESS_FLOOR);
                for v in directions {
                    for l in directions {
                        let out = shade_with(v, l, metalness, roughness);
                        assert!(out.is_finite(), "non-finite output: {out:?}");
                    }
                }
            }
        }
    }

    #[test]
    fn degenerate_half_vector_is_finite() {
        // L exactly opposite V makes V+L vanish; the half vector falls back
        // to zero and the result must still be finite.
        let v = Vec3::Z;
        let out = shade_with(v, -v, 0.5, 0.2);
        assert!(out.is_finite());
    }

    fn shade_with(v_dir: Vec3, l_dir: Vec3, metalness: f32, roughness: f32) -> Vec4 {
        let uniforms = UniformSet {
            albedo: Vec3::new(0.44, 0.98, 0.08),
            metalness,
            roughness,
            light_pos: l_dir * 5.0,
            camera_pos: v_dir * 5.0,
        };
        shade(Vec3::ZERO, Vec3::Z, &uniforms)
    }
}
