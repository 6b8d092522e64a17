use foundation::math::Vec3;

/// World-space placement. Entities in this viewer never rotate or scale.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    pub position: Vec3,
}

impl Transform {
    pub fn identity() -> Self {
        Self {
            position: Vec3::ZERO,
        }
    }

    pub fn at(position: Vec3) -> Self {
        Self { position }
    }

    /// Map a local-space point into world space.
    pub fn apply(&self, local: Vec3) -> Vec3 {
        self.position + local
    }
}

#[cfg(test)]
mod tests {
    use super::Transform;
    use foundation::math::Vec3;

    #[test]
    fn identity_is_origin() {
        let transform = Transform::identity();
        assert_eq!(transform.position, Vec3::ZERO);
    }

    #[test]
    fn apply_translates() {
        let t = Transform::at(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(t.apply(Vec3::new(1.0, 0.0, -1.0)), Vec3::new(2.0, 2.0, 2.0));
    }
}
