//! Mesh data structures and generation
//!
//! The renderer is agnostic to topology; anything with positions, normals and
//! uvs satisfies the geometry contract. The torus knot is the reference
//! default, the UV sphere a simpler alternative.

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};

/// Vertex format consumed by the shading pipeline
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub uv: Vec2,
}

/// A mesh with vertex and index data
#[derive(Debug, Clone)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    pub name: String,
}

impl Mesh {
    pub fn new(name: &str) -> Self {
        Self {
            vertices: Vec::new(),
            indices: Vec::new(),
            name: name.to_string(),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// Get vertex data as bytes
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Get index data as bytes
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    /// Create a (p, q) torus knot with a circular tube cross-section.
    ///
    /// The center curve winds `p` times around the torus axis and `q` times
    /// through its hole; a local frame built from the curve tangent sweeps
    /// the tube profile along it.
    pub fn torus_knot(
        p: u32,
        q: u32,
        radius: f32,
        tube_radius: f32,
        tubular_segments: u32,
        radial_segments: u32,
    ) -> Self {
        let mut mesh = Mesh::new("torus_knot");

        let curve_point = |u: f32| -> Vec3 {
            let qu_over_p = q as f32 / p as f32 * u;
            let cs = qu_over_p.cos();
            Vec3::new(
                radius * (2.0 + cs) * 0.5 * u.cos(),
                radius * (2.0 + cs) * 0.5 * u.sin(),
                radius * qu_over_p.sin() * 0.5,
            )
        };

        for i in 0..=tubular_segments {
            let u = i as f32 / tubular_segments as f32 * p as f32 * std::f32::consts::TAU;

            // Frame from two nearby curve samples; robust enough for the
            // knot's curvature at these segment counts.
            let p1 = curve_point(u);
            let p2 = curve_point(u + 0.01);
            let tangent = p2 - p1;
            let seed = p2 + p1;
            let bitangent = tangent.cross(seed).normalize();
            let normal_axis = bitangent.cross(tangent).normalize();

            for j in 0..=radial_segments {
                let v = j as f32 / radial_segments as f32 * std::f32::consts::TAU;
                let cx = -tube_radius * v.cos();
                let cy = tube_radius * v.sin();

                let position = p1 + cx * normal_axis + cy * bitangent;
                mesh.vertices.push(Vertex {
                    position,
                    normal: (position - p1).normalize(),
                    uv: Vec2::new(
                        i as f32 / tubular_segments as f32,
                        j as f32 / radial_segments as f32,
                    ),
                });
            }
        }

        for i in 0..tubular_segments {
            for j in 0..radial_segments {
                let current = i * (radial_segments + 1) + j;
                let next = current + radial_segments + 1;

                mesh.indices.extend_from_slice(&[
                    current,
                    next,
                    current + 1,
                    current + 1,
                    next,
                    next + 1,
                ]);
            }
        }

        mesh
    }

    /// The reference default: a (2, 3) torus knot sized for the viewer.
    pub fn default_torus_knot() -> Self {
        Self::torus_knot(2, 3, 1.0, 0.4, 128, 24)
    }

    /// Create a UV sphere
    pub fn sphere(segments: u32, rings: u32) -> Self {
        let mut mesh = Mesh::new("sphere");

        let segment_angle = std::f32::consts::TAU / segments as f32;
        let ring_angle = std::f32::consts::PI / rings as f32;

        for ring in 0..=rings {
            let phi = ring as f32 * ring_angle;
            let y = phi.cos();
            let ring_radius = phi.sin();

            for segment in 0..=segments {
                let theta = segment as f32 * segment_angle;
                let x = ring_radius * theta.cos();
                let z = ring_radius * theta.sin();

                mesh.vertices.push(Vertex {
                    position: Vec3::new(x, y, z),
                    normal: Vec3::new(x, y, z).normalize(),
                    uv: Vec2::new(
                        segment as f32 / segments as f32,
                        ring as f32 / rings as f32,
                    ),
                });
            }
        }

        for ring in 0..rings {
            for segment in 0..segments {
                let current = ring * (segments + 1) + segment;
                let next = current + segments + 1;

                mesh.indices.extend_from_slice(&[
                    current,
                    next,
                    current + 1,
                    current + 1,
                    next,
                    next + 1,
                ]);
            }
        }

        mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn torus_knot_has_expected_counts() {
        let mesh = Mesh::torus_knot(2, 3, 1.0, 0.4, 64, 8);
        assert_eq!(mesh.vertex_count(), 65 * 9);
        assert_eq!(mesh.index_count(), 64 * 8 * 6);
    }

    #[test]
    fn torus_knot_normals_are_unit_length() {
        let mesh = Mesh::torus_knot(2, 3, 1.0, 0.4, 32, 6);
        for vertex in &mesh.vertices {
            assert!((vertex.normal.length() - 1.0).abs() < 1e-3);
        }
    }

    #[test]
    fn torus_knot_indices_stay_in_bounds() {
        let mesh = Mesh::default_torus_knot();
        let count = mesh.vertex_count() as u32;
        assert!(mesh.indices.iter().all(|&i| i < count));
    }

    #[test]
    fn sphere_has_expected_counts() {
        let mesh = Mesh::sphere(16, 8);
        assert_eq!(mesh.vertex_count(), 17 * 9);
        assert_eq!(mesh.index_count(), 16 * 8 * 6);
    }

    #[test]
    fn sphere_normals_are_unit_length() {
        let mesh = Mesh::sphere(16, 8);
        for vertex in &mesh.vertices {
            assert!((vertex.normal.length() - 1.0).abs() < 1e-3);
        }
    }

    #[test]
    fn vertex_bytes_cover_all_vertices() {
        let mesh = Mesh::sphere(8, 4);
        assert_eq!(
            mesh.vertex_bytes().len(),
            mesh.vertex_count() * std::mem::size_of::<Vertex>()
        );
    }
}
