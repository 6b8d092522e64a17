//! CPU-side geometry for the scene's drawables.
//!
//! Everything here is deterministic and free of GPU types so it can be
//! tested natively; the viewer only copies the results into vertex buffers.

use foundation::math::Vec3;

/// A sphere vertex.
///
/// `uv` uses the GPU texture convention: `v = 0` is the top row of the image
/// (the north pole), `u = 0` is longitude -180.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MeshVertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub uv: [f64; 2],
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TriangleMesh {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

impl TriangleMesh {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Copy of the mesh with every vertex shifted by `offset`.
    pub fn translated(&self, offset: Vec3) -> Self {
        Self {
            vertices: self
                .vertices
                .iter()
                .map(|v| MeshVertex {
                    position: v.position + offset,
                    ..*v
                })
                .collect(),
            indices: self.indices.clone(),
        }
    }
}

/// UV sphere centered at the origin.
///
/// Vertex `(ix, iy)` sits at azimuth `u = ix / width_segments` and polar
/// angle `v = iy / height_segments`, using the same axis convention as
/// `foundation::math::project`: `u` maps to longitude `u * 360 - 180`, `v`
/// to latitude `90 - v * 180`. The pole rows get a half-segment `u` offset
/// so pole triangles sample the texture column they fan out from. Pole
/// rows emit one triangle per segment instead of two.
pub fn uv_sphere(radius: f64, width_segments: u32, height_segments: u32) -> TriangleMesh {
    let width_segments = width_segments.max(3);
    let height_segments = height_segments.max(2);

    let stride = (width_segments + 1) as usize;
    let mut vertices = Vec::with_capacity(stride * (height_segments as usize + 1));

    for iy in 0..=height_segments {
        let v = iy as f64 / height_segments as f64;
        let u_offset = if iy == 0 {
            0.5 / width_segments as f64
        } else if iy == height_segments {
            -0.5 / width_segments as f64
        } else {
            0.0
        };

        let polar = v * std::f64::consts::PI;
        let sin_p = polar.sin();
        let cos_p = polar.cos();

        for ix in 0..=width_segments {
            let u = ix as f64 / width_segments as f64;
            let azimuth = u * std::f64::consts::TAU;

            let position = Vec3::new(
                -radius * azimuth.cos() * sin_p,
                radius * cos_p,
                radius * azimuth.sin() * sin_p,
            );
            vertices.push(MeshVertex {
                position,
                normal: position.normalize_or_zero(),
                uv: [u + u_offset, v],
            });
        }
    }

    let at = |ix: u32, iy: u32| iy * (width_segments + 1) + ix;
    let mut indices =
        Vec::with_capacity(width_segments as usize * (2 * height_segments as usize - 2) * 3);
    for iy in 0..height_segments {
        for ix in 0..width_segments {
            let a = at(ix + 1, iy);
            let b = at(ix, iy);
            let c = at(ix, iy + 1);
            let d = at(ix + 1, iy + 1);

            if iy != 0 {
                indices.extend_from_slice(&[a, b, d]);
            }
            if iy != height_segments - 1 {
                indices.extend_from_slice(&[b, c, d]);
            }
        }
    }

    TriangleMesh { vertices, indices }
}

/// 32-bit integer mix (non-linear) to avoid visible correlation patterns.
pub fn hash_u32(x_in: u32) -> u32 {
    let mut x = x_in;
    x ^= x >> 16;
    x = x.wrapping_mul(0x7feb_352d);
    x ^= x >> 15;
    x = x.wrapping_mul(0x846c_a68b);
    x ^= x >> 16;
    x
}

fn hash01(x: u32) -> f64 {
    hash_u32(x) as f64 / u32::MAX as f64
}

/// Deterministic star positions, uniform in `[-half_extent, half_extent]^3`.
pub fn starfield_positions(count: u32, half_extent: f64, seed: u32) -> Vec<Vec3> {
    let seed_mix = hash_u32(seed ^ 0x9e37_79b9);
    (0..count)
        .map(|i| {
            let base = i.wrapping_mul(3);
            let coord = |axis: u32| {
                let r = hash01(hash_u32(base.wrapping_add(axis)) ^ seed_mix);
                (r * 2.0 - 1.0) * half_extent
            };
            Vec3::new(coord(0), coord(1), coord(2))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{hash_u32, starfield_positions, uv_sphere};
    use foundation::math::{Vec3, project, unproject};

    #[test]
    fn sphere_counts_match_segments() {
        let mesh = uv_sphere(100.0, 30, 30);
        assert_eq!(mesh.vertices.len(), 31 * 31);
        assert_eq!(mesh.indices.len(), (30 * (2 * 30 - 2) * 3) as usize);
        assert_eq!(mesh.triangle_count(), 30 * 58);
        let max = *mesh.indices.iter().max().expect("indices");
        assert!((max as usize) < mesh.vertices.len());
    }

    #[test]
    fn sphere_vertices_lie_on_radius_with_unit_normals() {
        let mesh = uv_sphere(100.0, 30, 30);
        for v in &mesh.vertices {
            assert!((v.position.length() - 100.0).abs() < 1e-9);
            assert!((v.normal.length() - 1.0).abs() < 1e-9);
            // Pole rows carry a half-segment offset past the seam.
            assert!((-0.5 / 30.0..=1.0 + 0.5 / 30.0).contains(&v.uv[0]));
            assert!((0.0..=1.0).contains(&v.uv[1]));
        }
    }

    #[test]
    fn sphere_layout_matches_projection() {
        // Interior vertex at u = 10/30, v = 10/30.
        let mesh = uv_sphere(100.0, 30, 30);
        let vertex = mesh.vertices[10 * 31 + 10];
        let lat = 90.0 - (10.0 / 30.0) * 180.0;
        let lon = (10.0 / 30.0) * 360.0 - 180.0;
        let expected = project(lat, lon, 100.0);
        assert!(vertex.position.distance(expected) < 1e-9);

        let (geo, _) = unproject(vertex.position).expect("on sphere");
        assert!((geo.lat_deg - lat).abs() < 1e-9);
        assert!((geo.lon_deg - lon).abs() < 1e-9);
    }

    #[test]
    fn translated_mesh_moves_every_vertex() {
        let mesh = uv_sphere(2.0, 16, 16);
        let offset = Vec3::new(10.0, 0.0, -5.0);
        let moved = mesh.translated(offset);
        assert_eq!(moved.indices, mesh.indices);
        for (a, b) in mesh.vertices.iter().zip(&moved.vertices) {
            assert_eq!(b.position, a.position + offset);
            assert_eq!(b.normal, a.normal);
        }
    }

    #[test]
    fn hash_is_stable() {
        assert_eq!(hash_u32(0), 0);
        assert_eq!(hash_u32(1), hash_u32(1));
        assert_ne!(hash_u32(1), hash_u32(2));
    }

    #[test]
    fn starfield_is_deterministic_and_bounded() {
        let a = starfield_positions(10_000, 1000.0, 7);
        let b = starfield_positions(10_000, 1000.0, 7);
        assert_eq!(a.len(), 10_000);
        assert_eq!(a, b);
        for p in &a {
            assert!(p.x.abs() <= 1000.0 && p.y.abs() <= 1000.0 && p.z.abs() <= 1000.0);
        }
        assert_ne!(a, starfield_positions(10_000, 1000.0, 8));
    }

    #[test]
    fn starfield_spreads_across_octants() {
        let stars = starfield_positions(4_000, 1.0, 1);
        let mut octants = [0usize; 8];
        for p in &stars {
            let idx = (p.x > 0.0) as usize | ((p.y > 0.0) as usize) << 1 | ((p.z > 0.0) as usize) << 2;
            octants[idx] += 1;
        }
        for count in octants {
            assert!(count > 300, "octant counts {octants:?}");
        }
    }
}
