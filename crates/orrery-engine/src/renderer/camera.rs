use glam::{Mat4, Quat, Vec2, Vec3, Vec4Swizzles};
use std::f32::consts::{PI, TAU};

/// Result of projecting a world-space point to the screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Screen position in pixels (origin top-left, Y down).
    pub pos: Vec2,
    /// Distance along the view axis (larger = farther).
    pub depth: f32,
    /// Pixels per world unit at this depth.
    pub scale: f32,
}

/// Keeps the polar angle away from the poles so `look_at` stays defined.
const POLAR_EPS: f32 = 1e-4;

/// Perspective camera orbiting a target, with damped orbit controls.
///
/// Angles follow the usual spherical convention: `azimuth` is measured
/// around +Y starting from +Z, `polar` is measured down from +Y.
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    pub target: Vec3,
    pub azimuth: f32,
    pub polar: f32,
    pub distance: f32,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
    viewport: Vec2,

    pub auto_rotate: bool,
    /// Auto-rotation speed; 1.0 is one revolution per minute.
    pub auto_rotate_speed: f32,
    /// Fraction of the pending rotation applied per update.
    pub damping: f32,
    pub min_distance: f32,
    pub max_distance: f32,

    pending_azimuth: f32,
    pending_polar: f32,
    home: Vec3,
}

impl OrbitCamera {
    pub fn new(viewport_width: f32, viewport_height: f32) -> Self {
        let mut cam = Self {
            target: Vec3::ZERO,
            azimuth: 0.0,
            polar: PI / 2.0,
            distance: 50.0,
            fov_y: 55f32.to_radians(),
            near: 0.1,
            far: 3000.0,
            viewport: Vec2::new(viewport_width.max(1.0), viewport_height.max(1.0)),
            auto_rotate: false,
            auto_rotate_speed: 0.1,
            damping: 0.03,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            pending_azimuth: 0.0,
            pending_polar: 0.0,
            home: Vec3::new(0.0, 0.0, 50.0),
        };
        cam.save_home();
        cam
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    pub fn aspect(&self) -> f32 {
        self.viewport.x / self.viewport.y
    }

    /// Update the viewport size (e.g. on window resize).
    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport = Vec2::new(width.max(1.0), height.max(1.0));
    }

    /// World-space eye position.
    pub fn position(&self) -> Vec3 {
        let sin_polar = self.polar.sin();
        self.target
            + Vec3::new(
                sin_polar * self.azimuth.sin(),
                self.polar.cos(),
                sin_polar * self.azimuth.cos(),
            ) * self.distance
    }

    /// Place the eye at a world position, keeping the current target.
    pub fn set_position(&mut self, pos: Vec3) {
        let offset = pos - self.target;
        let r = offset.length();
        if r < 1e-6 {
            return;
        }
        self.distance = r;
        self.azimuth = offset.x.atan2(offset.z);
        self.polar = (offset.y / r).clamp(-1.0, 1.0).acos().clamp(POLAR_EPS, PI - POLAR_EPS);
    }

    /// Remember the current position for [`reset`](Self::reset).
    pub fn save_home(&mut self) {
        self.home = self.position();
    }

    /// Return to the saved home position and drop any pending motion.
    pub fn reset(&mut self) {
        self.pending_azimuth = 0.0;
        self.pending_polar = 0.0;
        self.set_position(self.home);
    }

    /// Queue rotation from a pointer drag of `(dx, dy)` pixels.
    pub fn drag(&mut self, dx: f32, dy: f32) {
        self.pending_azimuth -= TAU * dx / self.viewport.y;
        self.pending_polar -= TAU * dy / self.viewport.y;
    }

    /// Dolly by wheel steps; positive steps move closer.
    pub fn zoom(&mut self, steps: f32) {
        self.distance = (self.distance * 0.95f32.powf(steps))
            .clamp(self.min_distance, self.max_distance);
    }

    /// Advance auto-rotation and damped motion by one frame.
    pub fn update(&mut self, dt: f32) {
        if self.auto_rotate {
            self.pending_azimuth -= TAU / 60.0 * self.auto_rotate_speed * dt;
        }
        self.azimuth = (self.azimuth + self.pending_azimuth * self.damping).rem_euclid(TAU);
        self.polar = (self.polar + self.pending_polar * self.damping)
            .clamp(POLAR_EPS, PI - POLAR_EPS);
        self.pending_azimuth *= 1.0 - self.damping;
        self.pending_polar *= 1.0 - self.damping;
        self.distance = self.distance.clamp(self.min_distance, self.max_distance);
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect(), self.near, self.far)
    }

    /// Rotation taking world directions into view space.
    pub fn view_rotation(&self) -> Quat {
        Quat::from_mat4(&self.view_matrix()).normalize()
    }

    /// Project a world position to screen pixels. `None` when behind the near plane.
    pub fn project(&self, world: Vec3) -> Option<Projection> {
        let clip = self.projection_matrix() * self.view_matrix() * world.extend(1.0);
        if clip.w < self.near {
            return None;
        }
        let ndc = clip.xy() / clip.w;
        let pos = Vec2::new(
            (ndc.x + 1.0) * 0.5 * self.viewport.x,
            (1.0 - ndc.y) * 0.5 * self.viewport.y,
        );
        let focal = self.viewport.y * 0.5 / (self.fov_y * 0.5).tan();
        Some(Projection {
            pos,
            depth: clip.w,
            scale: focal / clip.w,
        })
    }

    /// Pixel size of a distance-attenuated point sprite.
    pub fn point_size(&self, size: f32, depth: f32) -> f32 {
        size * self.viewport.y * 0.5 / depth.max(self.near)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn camera() -> OrbitCamera {
        let mut cam = OrbitCamera::new(800.0, 600.0);
        cam.set_position(Vec3::new(0.0, 0.0, 100.0));
        cam
    }

    #[test]
    fn target_projects_to_center() {
        let proj = camera().project(Vec3::ZERO).unwrap();
        assert_relative_eq!(proj.pos.x, 400.0, epsilon = 1e-3);
        assert_relative_eq!(proj.pos.y, 300.0, epsilon = 1e-3);
        assert_relative_eq!(proj.depth, 100.0, epsilon = 1e-3);
    }

    #[test]
    fn behind_camera_is_culled() {
        assert!(camera().project(Vec3::new(0.0, 0.0, 200.0)).is_none());
    }

    #[test]
    fn farther_points_are_smaller() {
        let cam = camera();
        let near = cam.project(Vec3::new(0.0, 0.0, 50.0)).unwrap();
        let far = cam.project(Vec3::new(0.0, 0.0, -50.0)).unwrap();
        assert!(far.depth > near.depth);
        assert!(far.scale < near.scale);
    }

    #[test]
    fn up_is_screen_up() {
        let proj = camera().project(Vec3::new(0.0, 10.0, 0.0)).unwrap();
        assert!(proj.pos.y < 300.0);
    }

    #[test]
    fn set_position_round_trips() {
        let mut cam = OrbitCamera::new(800.0, 600.0);
        let p = Vec3::new(35.0, 28.0, 35.0);
        cam.set_position(p);
        assert!(cam.position().abs_diff_eq(p, 1e-3));
    }

    #[test]
    fn reset_restores_home() {
        let mut cam = OrbitCamera::new(800.0, 600.0);
        cam.set_position(Vec3::new(32.0, 25.6, 32.0));
        cam.save_home();
        cam.drag(120.0, 40.0);
        for _ in 0..30 {
            cam.update(1.0 / 60.0);
        }
        cam.zoom(5.0);
        cam.reset();
        assert!(cam.position().abs_diff_eq(Vec3::new(32.0, 25.6, 32.0), 1e-3));
    }

    #[test]
    fn zoom_respects_limits() {
        let mut cam = camera();
        cam.min_distance = 15.0;
        cam.max_distance = 192.0;
        cam.zoom(200.0);
        assert_eq!(cam.distance, 15.0);
        cam.zoom(-200.0);
        assert_eq!(cam.distance, 192.0);
    }

    #[test]
    fn auto_rotate_converges_to_configured_rate() {
        let mut cam = camera();
        cam.auto_rotate = true;
        cam.auto_rotate_speed = 1.0;
        let dt = 1.0 / 60.0;
        // Let damping reach steady state.
        for _ in 0..2000 {
            cam.update(dt);
        }
        let before = cam.azimuth;
        cam.update(dt);
        let step = (before - cam.azimuth).rem_euclid(TAU);
        assert_relative_eq!(step, TAU / 60.0 * dt, epsilon = 1e-5);
    }

    #[test]
    fn drag_motion_decays() {
        let mut cam = camera();
        cam.drag(100.0, 0.0);
        let start = cam.azimuth;
        for _ in 0..600 {
            cam.update(1.0 / 60.0);
        }
        let settled = cam.azimuth;
        cam.update(1.0 / 60.0);
        assert!((settled - start).abs() > 0.1);
        assert!((cam.azimuth - settled).abs() < 1e-4);
    }

    #[test]
    fn view_rotation_maps_forward_to_negative_z() {
        let cam = camera();
        let fwd = (cam.target - cam.position()).normalize();
        let v = cam.view_rotation() * fwd;
        assert!(v.abs_diff_eq(Vec3::new(0.0, 0.0, -1.0), 1e-4));
    }
}
