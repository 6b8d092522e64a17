//! Viewer configuration.
//!
//! Defaults reproduce the fixed constants of the demo page. A JSON document
//! may override any subset of fields; missing fields keep their defaults.

use foundation::math::{GeoCoordinate, Vec3};
use scene::components::Light;
use scene::prefabs::GlobeSceneParams;
use serde::{Deserialize, Serialize};

use crate::error::ViewerError;

/// Upper bound for any sphere tessellation axis.
pub const MAX_SPHERE_SEGMENTS: u32 = 512;

/// Upper bound for the starfield; each star becomes six vertices.
pub const MAX_STAR_COUNT: u32 = 200_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct ViewerConfig {
    pub marker: MarkerConfig,
    pub globe: GlobeConfig,
    pub stars: StarsConfig,
    pub camera: CameraConfig,
    pub controls: ControlsConfig,
    pub lighting: LightingConfig,
    pub transition: TransitionConfig,
    pub assets: AssetsConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MarkerConfig {
    pub lat_deg: f64,
    pub lon_deg: f64,
    pub radius: f64,
    pub segments: u32,
    pub color: [f32; 4],
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            // Tokyo.
            lat_deg: 35.6895,
            lon_deg: 139.6917,
            radius: 2.0,
            segments: 16,
            color: [1.0, 0.0, 0.0, 1.0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlobeConfig {
    pub radius: f64,
    pub width_segments: u32,
    pub height_segments: u32,
}

impl Default for GlobeConfig {
    fn default() -> Self {
        Self {
            radius: 100.0,
            width_segments: 30,
            height_segments: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StarsConfig {
    pub count: u32,
    /// Stars fill the cube `[-half_extent, half_extent]^3`.
    pub half_extent: f64,
    pub size: f32,
    pub seed: u32,
}

impl Default for StarsConfig {
    fn default() -> Self {
        Self {
            count: 10_000,
            half_extent: 1000.0,
            size: 0.5,
            seed: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CameraConfig {
    pub fov_y_deg: f64,
    pub near: f64,
    pub far: f64,
    pub initial_position: [f64; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_y_deg: 50.0,
            near: 1.0,
            far: 1000.0,
            initial_position: [0.0, 0.0, 400.0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ControlsConfig {
    pub enable_damping: bool,
    pub damping_factor: f64,
    pub enable_pan: bool,
    pub min_distance: f64,
    pub max_distance: f64,
    pub rotate_speed: f64,
    pub zoom_speed: f64,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            enable_damping: true,
            damping_factor: 0.25,
            enable_pan: false,
            min_distance: 100.0,
            max_distance: 600.0,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LightingConfig {
    pub ambient_color: [f32; 3],
    pub ambient_intensity: f32,
    pub directional_color: [f32; 3],
    pub directional_intensity: f32,
    pub directional_direction: [f64; 3],
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            ambient_color: [1.0, 1.0, 1.0],
            ambient_intensity: 1.0,
            directional_color: [1.0, 1.0, 1.0],
            directional_intensity: 0.5,
            directional_direction: [1.0, 1.0, 1.0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TransitionConfig {
    pub duration_ms: f64,
    /// Camera target distance as a multiple of the globe radius.
    pub focus_distance_factor: f64,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            duration_ms: 1000.0,
            focus_distance_factor: 4.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AssetsConfig {
    pub globe_texture_url: String,
    /// Element the canvas is appended to.
    pub container_id: String,
    pub canvas_id: String,
    /// Button that re-centers the camera on the marker.
    pub focus_button_id: String,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            globe_texture_url: "./assets/earth_tx.png".to_string(),
            container_id: "three".to_string(),
            canvas_id: "globe-canvas".to_string(),
            focus_button_id: "backToHuddle".to_string(),
        }
    }
}

impl ViewerConfig {
    /// Parse a JSON overlay and validate the result.
    pub fn from_json_str(text: &str) -> Result<Self, ViewerError> {
        let config: ViewerConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ViewerError> {
        fn positive(name: &str, v: f64) -> Result<(), ViewerError> {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(ViewerError::InvalidConfig(format!("{name} must be positive, got {v}")))
            }
        }
        fn finite(name: &str, v: f64) -> Result<(), ViewerError> {
            if v.is_finite() {
                Ok(())
            } else {
                Err(ViewerError::InvalidConfig(format!("{name} must be finite")))
            }
        }

        let bounded = |name: &str, v: u32, max: u32| {
            if v <= max {
                Ok(())
            } else {
                Err(ViewerError::InvalidConfig(format!("{name} must be at most {max}, got {v}")))
            }
        };

        finite("marker.lat_deg", self.marker.lat_deg)?;
        finite("marker.lon_deg", self.marker.lon_deg)?;
        positive("marker.radius", self.marker.radius)?;
        bounded("marker.segments", self.marker.segments, MAX_SPHERE_SEGMENTS)?;
        positive("globe.radius", self.globe.radius)?;
        bounded("globe.width_segments", self.globe.width_segments, MAX_SPHERE_SEGMENTS)?;
        bounded("globe.height_segments", self.globe.height_segments, MAX_SPHERE_SEGMENTS)?;
        bounded("stars.count", self.stars.count, MAX_STAR_COUNT)?;
        positive("stars.half_extent", self.stars.half_extent)?;
        positive("camera.fov_y_deg", self.camera.fov_y_deg)?;
        if self.camera.fov_y_deg >= 180.0 {
            return Err(ViewerError::InvalidConfig(
                "camera.fov_y_deg must be below 180".to_string(),
            ));
        }
        positive("camera.near", self.camera.near)?;
        if self.camera.far <= self.camera.near {
            return Err(ViewerError::InvalidConfig(
                "camera.far must exceed camera.near".to_string(),
            ));
        }
        for (i, v) in self.camera.initial_position.iter().enumerate() {
            finite(&format!("camera.initial_position[{i}]"), *v)?;
        }
        if !(0.0..=1.0).contains(&self.controls.damping_factor) {
            return Err(ViewerError::InvalidConfig(
                "controls.damping_factor must be within [0, 1]".to_string(),
            ));
        }
        positive("controls.min_distance", self.controls.min_distance)?;
        if self.controls.max_distance < self.controls.min_distance {
            return Err(ViewerError::InvalidConfig(
                "controls.max_distance must not be below controls.min_distance".to_string(),
            ));
        }
        finite("transition.duration_ms", self.transition.duration_ms)?;
        positive(
            "transition.focus_distance_factor",
            self.transition.focus_distance_factor,
        )?;
        Ok(())
    }

    pub fn marker_coordinate(&self) -> GeoCoordinate {
        GeoCoordinate::new(self.marker.lat_deg, self.marker.lon_deg)
    }

    pub fn initial_camera_position(&self) -> Vec3 {
        Vec3::from_array(self.camera.initial_position)
    }

    /// Camera destination when focusing the marker: the marker direction
    /// scaled to `focus_distance_factor` globe radii.
    pub fn focus_position(&self) -> Vec3 {
        self.marker_coordinate().to_vec3(self.globe.radius) * self.transition.focus_distance_factor
    }

    pub fn scene_params(&self) -> GlobeSceneParams {
        let l = &self.lighting;
        GlobeSceneParams {
            globe_radius: self.globe.radius,
            globe_width_segments: self.globe.width_segments,
            globe_height_segments: self.globe.height_segments,
            marker: self.marker_coordinate(),
            marker_radius: self.marker.radius,
            marker_segments: self.marker.segments,
            marker_color: self.marker.color,
            star_count: self.stars.count,
            star_half_extent: self.stars.half_extent,
            star_seed: self.stars.seed,
            star_size: self.stars.size,
            ambient: Light::ambient(l.ambient_color, l.ambient_intensity),
            directional: Light::directional(
                l.directional_color,
                l.directional_intensity,
                Vec3::from_array(l.directional_direction),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{MAX_SPHERE_SEGMENTS, MAX_STAR_COUNT, ViewerConfig};
    use crate::error::ViewerError;
    use foundation::math::{Vec3, project};
    use pretty_assertions::assert_eq;
    use scene::prefabs::GlobeSceneParams;

    #[test]
    fn defaults_match_demo_constants() {
        let config = ViewerConfig::default();
        assert_eq!(config.marker.lat_deg, 35.6895);
        assert_eq!(config.marker.lon_deg, 139.6917);
        assert_eq!(config.stars.count, 10_000);
        assert_eq!(config.controls.min_distance, 100.0);
        assert_eq!(config.controls.max_distance, 600.0);
        assert_eq!(config.transition.duration_ms, 1000.0);
        assert_eq!(config.initial_camera_position(), Vec3::new(0.0, 0.0, 400.0));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn default_scene_params_agree_with_scene_defaults() {
        assert_eq!(ViewerConfig::default().scene_params(), GlobeSceneParams::default());
    }

    #[test]
    fn focus_position_is_four_radii_along_marker() {
        let config = ViewerConfig::default();
        let expected = project(35.6895, 139.6917, 100.0) * 4.0;
        assert_eq!(config.focus_position(), expected);
        assert!((config.focus_position().length() - 400.0).abs() < 1e-9);
    }

    #[test]
    fn json_overlay_keeps_unspecified_defaults() {
        let config = ViewerConfig::from_json_str(
            r#"{ "marker": { "lat_deg": 48.8566, "lon_deg": 2.3522 }, "transition": { "duration_ms": 250 } }"#,
        )
        .expect("valid overlay");
        assert_eq!(config.marker.lat_deg, 48.8566);
        assert_eq!(config.marker.radius, 2.0);
        assert_eq!(config.transition.duration_ms, 250.0);
        assert_eq!(config.transition.focus_distance_factor, 4.0);
        assert_eq!(config.globe, ViewerConfig::default().globe);
    }

    #[test]
    fn rejects_unknown_fields_and_bad_json() {
        assert!(matches!(
            ViewerConfig::from_json_str(r#"{ "globe": { "radius": 1, "colour": 3 } }"#),
            Err(ViewerError::ConfigParse(_))
        ));
        assert!(matches!(
            ViewerConfig::from_json_str("{"),
            Err(ViewerError::ConfigParse(_))
        ));
    }

    #[test]
    fn rejects_invalid_values() {
        for text in [
            r#"{ "globe": { "radius": 0 } }"#,
            r#"{ "camera": { "near": 10, "far": 5 } }"#,
            r#"{ "controls": { "min_distance": 700 } }"#,
            r#"{ "controls": { "damping_factor": 1.5 } }"#,
            r#"{ "transition": { "focus_distance_factor": -1 } }"#,
            r#"{ "globe": { "width_segments": 4294967295 } }"#,
            r#"{ "globe": { "height_segments": 513 } }"#,
            r#"{ "marker": { "segments": 100000 } }"#,
            r#"{ "stars": { "count": 200001 } }"#,
        ] {
            assert!(
                matches!(
                    ViewerConfig::from_json_str(text),
                    Err(ViewerError::InvalidConfig(_))
                ),
                "accepted {text}"
            );
        }
    }

    #[test]
    fn segment_and_star_limits_are_inclusive() {
        let config = ViewerConfig::from_json_str(
            r#"{ "globe": { "width_segments": 512, "height_segments": 512 },
                 "marker": { "segments": 512 }, "stars": { "count": 200000 } }"#,
        )
        .expect("limits are accepted");
        assert_eq!(config.globe.width_segments, MAX_SPHERE_SEGMENTS);
        assert_eq!(config.stars.count, MAX_STAR_COUNT);
    }

    #[test]
    fn non_positive_duration_is_allowed() {
        let config = ViewerConfig::from_json_str(r#"{ "transition": { "duration_ms": 0 } }"#)
            .expect("zero duration snaps");
        assert_eq!(config.transition.duration_ms, 0.0);
    }
}
