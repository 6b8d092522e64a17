use runtime::{Event, EventKind, Frame, FrameLoop};
use scene::World;
use scene::components::LightingSummary;
use scene::picking::PickHit;
use scene::prefabs::{GlobeScene, assemble_globe_scene};
use tracing::{debug, info, warn};

use crate::assets::TextureImage;
use crate::camera::Camera;
use crate::config::ViewerConfig;
use crate::input::{describe_hit, handle_click};
use crate::render::{Globals, Renderer, SceneGeometry};
use crate::rig::CameraRig;

/// CSS-pixel viewport and the device pixel ratio backing it.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub pixel_ratio: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64, pixel_ratio: f64) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
            pixel_ratio: if pixel_ratio > 0.0 { pixel_ratio } else { 1.0 },
        }
    }

    /// Backing-store size in physical pixels.
    pub fn physical_size(&self) -> (u32, u32) {
        (
            (self.width * self.pixel_ratio).round().max(1.0) as u32,
            (self.height * self.pixel_ratio).round().max(1.0) as u32,
        )
    }
}

/// The whole viewer: scene, camera rig, frame loop and (once attached) the
/// renderer. One instance exists per page.
#[derive(Debug)]
pub struct GlobeApp {
    config: ViewerConfig,
    world: World,
    scene: GlobeScene,
    lighting: LightingSummary,
    rig: CameraRig,
    frame_loop: FrameLoop,
    viewport: Viewport,
    renderer: Option<Renderer>,
}

impl GlobeApp {
    pub fn new(config: ViewerConfig, viewport: Viewport) -> Self {
        let mut world = World::new();
        let scene = assemble_globe_scene(&mut world, &config.scene_params());
        let lighting = LightingSummary::from_lights(&world.lights());
        let mut rig = CameraRig::new(&config);
        rig.set_viewport(viewport.width, viewport.height);

        info!(
            entities = world.entity_count(),
            lat = config.marker.lat_deg,
            lon = config.marker.lon_deg,
            "globe scene assembled"
        );

        Self {
            config,
            world,
            scene,
            lighting,
            rig,
            frame_loop: FrameLoop::new(),
            viewport,
            renderer: None,
        }
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn scene(&self) -> &GlobeScene {
        &self.scene
    }

    pub fn camera(&self) -> &Camera {
        &self.rig.camera
    }

    pub fn rig(&self) -> &CameraRig {
        &self.rig
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn scene_geometry(&self) -> SceneGeometry {
        SceneGeometry::from_world(&self.world)
    }

    pub fn attach_renderer(&mut self, mut renderer: Renderer) {
        let (w, h) = self.viewport.physical_size();
        renderer.resize(w, h);
        self.renderer = Some(renderer);
    }

    pub fn has_renderer(&self) -> bool {
        self.renderer.is_some()
    }

    pub fn set_globe_texture(&mut self, image: &TextureImage) {
        if let Some(renderer) = &mut self.renderer {
            renderer.set_globe_texture(image);
        }
    }

    /// Fly the camera to its focus position above the marker.
    ///
    /// The camera ends `focus_distance_factor` globe radii from the center
    /// on the marker's radial line, looking at the marker. `now_ms` is the
    /// host time of the request (`performance.now()`), the same clock that
    /// stamps frames.
    pub fn focus_marker(&mut self, now_ms: f64) {
        let target = self.config.focus_position();
        let look_at = self.scene.marker_position;
        let duration_ms = self.config.transition.duration_ms;
        info!(duration_ms, now_ms, "focusing marker");
        self.rig.focus(target, look_at, now_ms, duration_ms);
    }

    /// Advance one display frame: tick systems, log their events, draw.
    ///
    /// Returns the events raised since the previous frame.
    pub fn frame(&mut self, now_ms: f64) -> Vec<Event> {
        let frame = self.frame_loop.step(now_ms, &mut [&mut self.rig]);

        let events = self.frame_loop.bus_mut().drain();
        for event in &events {
            info!(kind = %event.kind, frame = event.frame_index, "{}", event.message);
        }

        self.render(frame);
        events
    }

    fn render(&self, frame: Frame) {
        let Some(renderer) = &self.renderer else {
            return;
        };
        let (w, h) = self.viewport.physical_size();
        let globals = Globals::new(
            &self.rig.camera,
            &self.lighting,
            self.config.stars.size,
            [w as f32, h as f32],
        );
        if let Err(err) = renderer.render(&globals) {
            // Surface loss during resize is transient; the next frame retries.
            debug!(frame = frame.index, %err, "frame skipped");
        }
    }

    /// Pick at a pointer position in CSS pixels and report the hit.
    pub fn click(&mut self, x_px: f64, y_px: f64) -> Option<PickHit> {
        let hit = handle_click(
            &self.world,
            &self.rig.camera,
            x_px,
            y_px,
            self.viewport.width,
            self.viewport.height,
        )?;
        let frame = self.frame_loop.current_frame();
        self.frame_loop
            .bus_mut()
            .emit(frame, EventKind::Pick, describe_hit(&hit, &self.scene));
        Some(hit)
    }

    pub fn pointer_down(&mut self, x_px: f64, y_px: f64, button: i16) {
        self.rig.controls.on_pointer_down([x_px, y_px], button);
    }

    pub fn pointer_move(&mut self, x_px: f64, y_px: f64) {
        self.rig.controls.on_pointer_move([x_px, y_px]);
    }

    pub fn pointer_up(&mut self) {
        self.rig.controls.on_pointer_up();
    }

    pub fn wheel(&mut self, delta_y: f64) {
        self.rig.controls.on_wheel(delta_y);
    }

    pub fn resize(&mut self, viewport: Viewport) {
        if viewport.width <= 0.0 || viewport.height <= 0.0 {
            warn!(?viewport, "ignoring degenerate viewport");
            return;
        }
        self.viewport = viewport;
        self.rig.set_viewport(viewport.width, viewport.height);
        let (w, h) = viewport.physical_size();
        if let Some(renderer) = &mut self.renderer {
            renderer.resize(w, h);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{GlobeApp, Viewport};
    use crate::config::ViewerConfig;
    use foundation::math::{Vec3, project};
    use pretty_assertions::assert_eq;
    use runtime::EventKind;

    fn app() -> GlobeApp {
        GlobeApp::new(ViewerConfig::default(), Viewport::new(800.0, 600.0, 2.0))
    }

    fn tokyo_focus() -> Vec3 {
        project(35.6895, 139.6917, 100.0) * 4.0
    }

    fn run(app: &mut GlobeApp, from_ms: f64, to_ms: f64) -> Vec<runtime::Event> {
        let mut events = Vec::new();
        let mut now = from_ms;
        while now <= to_ms {
            events.extend(app.frame(now));
            now += 16.0;
        }
        events
    }

    #[test]
    fn starts_at_initial_camera_without_renderer() {
        let app = app();
        assert!(!app.has_renderer());
        assert_eq!(app.camera().position, Vec3::new(0.0, 0.0, 400.0));
        assert_eq!(app.world().entity_count(), 5);
        assert_eq!(app.viewport().physical_size(), (1600, 1200));
    }

    #[test]
    fn focus_marker_flies_to_four_radii_above_tokyo() {
        let mut app = app();
        app.focus_marker(0.0);
        // 63 frames of 16 ms cover the 1000 ms transition.
        let events = run(&mut app, 0.0, 1008.0);

        let expected = tokyo_focus();
        assert_eq!(app.camera().position, expected);
        assert_eq!(app.camera().look_at, app.scene().marker_position);
        let kinds: Vec<_> = events.iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![EventKind::Camera]);

        // Orbit controls take over without a jump.
        run(&mut app, 1024.0, 1200.0);
        assert!(app.camera().position.distance(expected) < 1e-6);
        assert_eq!(app.camera().look_at, Vec3::ZERO);
    }

    #[test]
    fn midway_through_transition_camera_is_interpolated() {
        let mut app = app();
        app.frame(0.0);
        app.focus_marker(0.0);
        app.frame(250.0);
        app.frame(500.0);
        let start = Vec3::new(0.0, 0.0, 400.0);
        assert!(app.camera().position.distance(start.lerp(tokyo_focus(), 0.5)) < 1e-9);
    }

    #[test]
    fn single_coarse_frame_reaches_midpoint_then_target() {
        let mut app = app();
        app.frame(0.0);
        app.focus_marker(0.0);

        app.frame(500.0);
        let start = Vec3::new(0.0, 0.0, 400.0);
        assert!(app.camera().position.distance(start.lerp(tokyo_focus(), 0.5)) < 1e-9);

        let events = app.frame(1000.0);
        assert_eq!(app.camera().position, tokyo_focus());
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, EventKind::Camera);
    }

    #[test]
    fn frame_long_after_duration_lands_exactly_on_target() {
        let mut app = app();
        app.frame(0.0);
        app.focus_marker(0.0);
        // The tab was hidden for a minute.
        let events = app.frame(60_000.0);
        assert_eq!(app.camera().position, tokyo_focus());
        assert_eq!(app.camera().look_at, app.scene().marker_position);
        assert_eq!(events.len(), 1);
        assert!(app.frame(60_016.0).is_empty());
    }

    #[test]
    fn focus_between_frames_starts_at_the_request_time() {
        let mut app = app();
        app.frame(0.0);
        app.frame(16.0);
        app.focus_marker(200.0);
        app.frame(216.0);

        let start = Vec3::new(0.0, 0.0, 400.0);
        let expected = start.lerp(tokyo_focus(), 16.0 / 1000.0);
        assert!(app.camera().position.distance(expected) < 1e-9);

        // Frames are irregular; the pose depends only on host time.
        app.frame(233.0);
        app.frame(711.0);
        let expected = start.lerp(tokyo_focus(), 511.0 / 1000.0);
        assert!(app.camera().position.distance(expected) < 1e-9);

        app.frame(1199.0);
        assert!(app.rig().transition().is_running());
        app.frame(1200.0);
        assert_eq!(app.camera().position, tokyo_focus());
        assert!(!app.rig().transition().is_running());
    }

    #[test]
    fn refocusing_mid_flight_restarts_from_current_position() {
        let mut app = app();
        app.frame(0.0);
        app.focus_marker(0.0);
        app.frame(200.0);
        app.frame(400.0);
        let midway = app.camera().position;

        app.focus_marker(400.0);
        app.frame(600.0);
        assert!(app.camera().position.distance(midway.lerp(tokyo_focus(), 0.2)) < 1e-9);
    }

    #[test]
    fn click_at_center_reports_globe_pick() {
        let mut app = app();
        let hit = app.click(400.0, 300.0).expect("hit");
        assert_eq!(hit.entity, app.scene().globe);

        let events = app.frame(0.0);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, EventKind::Pick);
        assert!(events[0].message.starts_with("globe"));
    }

    #[test]
    fn click_on_background_reports_nothing() {
        let mut app = app();
        assert!(app.click(5.0, 5.0).is_none());
        assert!(app.frame(0.0).is_empty());
    }

    #[test]
    fn resize_updates_aspect_and_rejects_degenerate() {
        let mut app = app();
        app.resize(Viewport::new(1000.0, 500.0, 1.0));
        assert_eq!(app.camera().aspect, 2.0);
        app.resize(Viewport::new(0.0, 500.0, 1.0));
        assert_eq!(app.viewport(), Viewport::new(1000.0, 500.0, 1.0));
    }

    #[test]
    fn wheel_input_zooms_out_when_idle() {
        let mut app = app();
        app.frame(0.0);
        for i in 0..50 {
            app.wheel(100.0);
            app.frame(16.0 * (i + 1) as f64);
        }
        assert!((app.camera().position.length() - 600.0).abs() < 1e-9);
    }
}
