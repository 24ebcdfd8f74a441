//! Camera controllers
//!
//! The viewer's camera is driven by a damped orbit: dragging applies angular
//! velocity that keeps decaying after release, so the camera coasts to a stop
//! instead of freezing the moment the button comes up.

use glam::{Vec2, Vec3};

use super::Camera;

/// Per-frame input consumed by camera controllers
#[derive(Debug, Clone, Default)]
pub struct CameraInput {
    /// Mouse delta since last frame (in pixels)
    pub mouse_delta: Vec2,
    /// Mouse scroll delta (positive = scroll up)
    pub scroll_delta: f32,
    /// Whether an orbit drag is active (mouse button held)
    pub orbit_active: bool,
}

impl CameraInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset per-frame deltas (call after update)
    pub fn reset_deltas(&mut self) {
        self.mouse_delta = Vec2::ZERO;
        self.scroll_delta = 0.0;
    }
}

/// Abstract camera controller trait
pub trait CameraController {
    /// Update the camera based on input and delta time
    fn update(&mut self, camera: &mut Camera, input: &CameraInput, dt: f32);

    /// Get the controller name for debugging
    fn name(&self) -> &'static str;
}

/// Damped orbit controller
///
/// - Mouse drag: orbit around the target
/// - Scroll: zoom in/out (change distance)
/// - Released drags leave residual velocity that decays exponentially
pub struct OrbitController {
    /// Target point to orbit around
    pub target: Vec3,
    /// Distance from target
    pub distance: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Current azimuth angle (horizontal) in radians
    pub azimuth: f32,
    /// Current elevation angle (vertical) in radians
    pub elevation: f32,
    pub min_elevation: f32,
    pub max_elevation: f32,
    /// Orbit sensitivity (radians per pixel)
    pub orbit_sensitivity: f32,
    /// Zoom factor per scroll unit
    pub zoom_factor: f32,
    /// Exponential decay rate of residual orbit velocity, per second
    pub damping: f32,
    /// Residual angular velocity in radians per second (azimuth, elevation)
    velocity: Vec2,
}

impl Default for OrbitController {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            distance: 5.0,
            min_distance: 1.0,
            max_distance: 50.0,
            azimuth: std::f32::consts::FRAC_PI_2,
            elevation: 0.0,
            min_elevation: -std::f32::consts::FRAC_PI_2 + 0.05,
            max_elevation: std::f32::consts::FRAC_PI_2 - 0.05,
            orbit_sensitivity: 0.005,
            zoom_factor: 1.1,
            damping: 6.0,
            velocity: Vec2::ZERO,
        }
    }
}

impl OrbitController {
    pub fn new(target: Vec3, distance: f32) -> Self {
        Self {
            target,
            distance,
            ..Default::default()
        }
    }

    /// Create with specific angles
    pub fn with_angles(mut self, azimuth_degrees: f32, elevation_degrees: f32) -> Self {
        self.azimuth = azimuth_degrees.to_radians();
        self.elevation = elevation_degrees.to_radians();
        self
    }

    /// Initialize from the camera's current position and target
    pub fn sync_with_camera(&mut self, camera: &Camera) {
        self.target = camera.target;
        let offset = camera.position - camera.target;
        self.distance = offset.length().max(self.min_distance);
        self.elevation = (offset.y / self.distance).asin();
        self.azimuth = offset.z.atan2(offset.x);
    }

    /// Residual orbit speed in radians per second
    pub fn residual_speed(&self) -> f32 {
        self.velocity.length()
    }

    /// Calculate camera position from orbit parameters
    fn calculate_position(&self) -> Vec3 {
        let x = self.distance * self.elevation.cos() * self.azimuth.cos();
        let y = self.distance * self.elevation.sin();
        let z = self.distance * self.elevation.cos() * self.azimuth.sin();
        self.target + Vec3::new(x, y, z)
    }
}

impl CameraController for OrbitController {
    fn update(&mut self, camera: &mut Camera, input: &CameraInput, dt: f32) {
        if input.scroll_delta != 0.0 {
            if input.scroll_delta > 0.0 {
                self.distance /= self.zoom_factor;
            } else {
                self.distance *= self.zoom_factor;
            }
            self.distance = self.distance.clamp(self.min_distance, self.max_distance);
        }

        if input.orbit_active && input.mouse_delta != Vec2::ZERO {
            let step = input.mouse_delta * self.orbit_sensitivity;
            self.azimuth += step.x;
            self.elevation += step.y;
            // A drag sets the velocity the coast will start from.
            self.velocity = step / dt.max(1e-3);
        } else {
            self.azimuth += self.velocity.x * dt;
            self.elevation += self.velocity.y * dt;
            self.velocity *= (-self.damping * dt).exp();
            if self.velocity.length_squared() < 1e-8 {
                self.velocity = Vec2::ZERO;
            }
        }

        self.elevation = self.elevation.clamp(self.min_elevation, self.max_elevation);
        self.azimuth %= 2.0 * std::f32::consts::PI;

        camera.position = self.calculate_position();
        camera.target = self.target;
    }

    fn name(&self) -> &'static str {
        "Orbit"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drag(controller: &mut OrbitController, camera: &mut Camera, delta: Vec2) {
        let input = CameraInput {
            mouse_delta: delta,
            orbit_active: true,
            ..Default::default()
        };
        controller.update(camera, &input, 1.0 / 60.0);
    }

    fn coast(controller: &mut OrbitController, camera: &mut Camera) {
        controller.update(camera, &CameraInput::new(), 1.0 / 60.0);
    }

    #[test]
    fn drag_orbits_around_target() {
        let mut controller = OrbitController::new(Vec3::ZERO, 5.0);
        let mut camera = Camera::default();
        let before = controller.azimuth;
        drag(&mut controller, &mut camera, Vec2::new(40.0, 0.0));
        assert!(controller.azimuth > before);
        assert!((camera.position.length() - 5.0).abs() < 1e-4);
        assert_eq!(camera.target, Vec3::ZERO);
    }

    #[test]
    fn released_drag_coasts_then_settles() {
        let mut controller = OrbitController::new(Vec3::ZERO, 5.0);
        let mut camera = Camera::default();
        drag(&mut controller, &mut camera, Vec2::new(40.0, 0.0));
        let speed_after_drag = controller.residual_speed();
        assert!(speed_after_drag > 0.0);

        let azimuth_before_coast = controller.azimuth;
        coast(&mut controller, &mut camera);
        assert!(controller.azimuth > azimuth_before_coast);
        assert!(controller.residual_speed() < speed_after_drag);

        for _ in 0..600 {
            coast(&mut controller, &mut camera);
        }
        assert_eq!(controller.residual_speed(), 0.0);
    }

    #[test]
    fn elevation_stays_clamped() {
        let mut controller = OrbitController::new(Vec3::ZERO, 5.0);
        let mut camera = Camera::default();
        for _ in 0..100 {
            drag(&mut controller, &mut camera, Vec2::new(0.0, 500.0));
        }
        assert!(controller.elevation <= controller.max_elevation);
    }

    #[test]
    fn zoom_respects_distance_limits() {
        let mut controller = OrbitController::new(Vec3::ZERO, 5.0);
        let mut camera = Camera::default();
        let input = CameraInput {
            scroll_delta: 1.0,
            ..Default::default()
        };
        for _ in 0..200 {
            controller.update(&mut camera, &input, 1.0 / 60.0);
        }
        assert_eq!(controller.distance, controller.min_distance);
    }
}
