/// Geometry of a 3D drawable, in local space around the entity transform.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Shape3D {
    /// UV sphere centered on the transform.
    Sphere {
        radius: f64,
        width_segments: u32,
        height_segments: u32,
    },
    /// Points scattered uniformly in the cube `[-half_extent, half_extent]^3`.
    PointCloud {
        count: u32,
        half_extent: f64,
        seed: u32,
    },
}

/// Surface appearance, mapped onto a render pipeline by the viewer.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Material {
    /// Diffuse-lit surface, optionally modulated by the globe texture.
    Lit { color: [f32; 4], textured: bool },
    /// Flat color, ignores lights.
    Unlit { color: [f32; 4] },
    /// Screen-space points.
    Points { color: [f32; 4], size: f32 },
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Drawable3D {
    pub shape: Shape3D,
    pub material: Material,
}

impl Drawable3D {
    pub fn sphere(radius: f64, width_segments: u32, height_segments: u32, material: Material) -> Self {
        Self {
            shape: Shape3D::Sphere {
                radius,
                width_segments,
                height_segments,
            },
            material,
        }
    }

    pub fn point_cloud(count: u32, half_extent: f64, seed: u32, material: Material) -> Self {
        Self {
            shape: Shape3D::PointCloud {
                count,
                half_extent,
                seed,
            },
            material,
        }
    }

    /// Whether ray picking considers this drawable.
    ///
    /// Only solid spheres are pickable; point clouds are backdrop.
    pub fn is_pickable(&self) -> bool {
        matches!(self.shape, Shape3D::Sphere { .. })
    }
}
