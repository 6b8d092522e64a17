use foundation::math::Vec3;

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Light {
    /// Uniform light from every direction.
    Ambient { color: [f32; 3], intensity: f32 },
    /// Parallel light arriving from `direction` (pointing toward the light).
    Directional {
        color: [f32; 3],
        intensity: f32,
        direction: Vec3,
    },
}

impl Light {
    pub fn ambient(color: [f32; 3], intensity: f32) -> Self {
        Light::Ambient { color, intensity }
    }

    /// Directional light; `direction` is normalized, falling back to +Y.
    pub fn directional(color: [f32; 3], intensity: f32, direction: Vec3) -> Self {
        Light::Directional {
            color,
            intensity,
            direction: direction.try_normalize().unwrap_or(Vec3::Y),
        }
    }
}

/// Lighting terms reduced to what the lit shader consumes.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LightingSummary {
    pub ambient: [f32; 3],
    pub directional: [f32; 3],
    pub direction: Vec3,
}

impl LightingSummary {
    /// Sum ambient contributions; the first directional light wins.
    pub fn from_lights(lights: &[Light]) -> Self {
        let mut ambient = [0.0f32; 3];
        let mut directional = None;
        for light in lights {
            match *light {
                Light::Ambient { color, intensity } => {
                    for (acc, c) in ambient.iter_mut().zip(color) {
                        *acc += c * intensity;
                    }
                }
                Light::Directional {
                    color,
                    intensity,
                    direction,
                } if directional.is_none() => {
                    directional = Some((color.map(|c| c * intensity), direction));
                }
                Light::Directional { .. } => {}
            }
        }

        let (directional, direction) = directional.unwrap_or(([0.0; 3], Vec3::Y));
        Self {
            ambient,
            directional,
            direction,
        }
    }
}
