use crate::DEFAULT_ALIGNMENT_ANGLE;
use crate::motion::{AnimatedValue, MotionPolicy, TransitionKind};
use std::time::Duration;

/// Keeps the selected segment's center angle lined up with the static
/// indicator by rotating the whole ring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationController {
    angle: AnimatedValue,
    alignment: f64,
}

impl Default for RotationController {
    fn default() -> Self {
        Self::new(DEFAULT_ALIGNMENT_ANGLE)
    }
}

impl RotationController {
    pub fn new(alignment: f64) -> Self {
        Self {
            angle: AnimatedValue::new(0.0),
            alignment,
        }
    }

    pub fn alignment(&self) -> f64 {
        self.alignment
    }

    pub fn set_alignment(&mut self, alignment: f64) {
        self.alignment = alignment;
    }

    /// Current (possibly in-flight) ring rotation in radians.
    pub fn angle(&self) -> f64 {
        self.angle.value()
    }

    pub fn target(&self) -> f64 {
        self.angle.target()
    }

    pub fn target_for(&self, center_angle: f64) -> f64 {
        self.alignment - center_angle
    }

    /// Animates toward the rotation that puts `center_angle` on the
    /// alignment angle, starting from wherever the ring currently is.
    pub fn align_to(&mut self, center_angle: f64, policy: &MotionPolicy) {
        let target = self.target_for(center_angle);
        if target == self.angle.target() {
            return;
        }

        log::debug!(
            "Rotating ring from {:.3} to {:.3} rad",
            self.angle.value(),
            target
        );
        self.angle
            .animate_to(target, policy.transition(TransitionKind::Rotation));
    }

    pub fn retime(&mut self, policy: &MotionPolicy) {
        self.angle
            .retime(policy.transition(TransitionKind::Rotation));
    }

    pub fn snap_to(&mut self, center_angle: f64) {
        self.angle.set_immediate(self.target_for(center_angle));
    }

    pub fn tick(&mut self, dt: Duration) {
        self.angle.tick(dt);
    }

    pub fn is_animating(&self) -> bool {
        self.angle.is_animating()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::REDUCED_MOTION_DURATION;
    use std::f64::consts::PI;

    const FRAME: Duration = Duration::from_millis(16);

    fn settle(rotation: &mut RotationController) {
        for _ in 0..1000 {
            if !rotation.is_animating() {
                return;
            }
            rotation.tick(FRAME);
        }
    }

    #[test]
    fn test_settles_on_alignment() {
        let mut rotation = RotationController::default();
        let center = 0.3 * PI;

        rotation.align_to(center, &MotionPolicy::default());
        settle(&mut rotation);

        assert!(!rotation.is_animating());
        assert!((center + rotation.angle() - DEFAULT_ALIGNMENT_ANGLE).abs() < 1e-9);
    }

    #[test]
    fn test_custom_alignment() {
        let mut rotation = RotationController::new(-PI / 2.0);
        rotation.align_to(PI, &MotionPolicy::new(true));
        rotation.tick(REDUCED_MOTION_DURATION);

        assert!((PI + rotation.angle() - (-PI / 2.0)).abs() < 1e-9);
    }

    #[test]
    fn test_interrupted_rotation_does_not_snap() {
        let mut rotation = RotationController::default();
        let policy = MotionPolicy::default();

        rotation.align_to(PI / 2.0, &policy);
        for _ in 0..4 {
            rotation.tick(FRAME);
        }
        let in_flight = rotation.angle();

        rotation.align_to(-PI / 4.0, &policy);
        assert_eq!(rotation.angle(), in_flight);
        assert_eq!(rotation.target(), PI / 4.0);

        rotation.tick(FRAME);
        assert!((rotation.angle() - in_flight).abs() < 0.5);
    }

    #[test]
    fn test_same_target_does_not_restart() {
        let mut rotation = RotationController::default();
        let policy = MotionPolicy::new(true);

        rotation.align_to(1.0, &policy);
        rotation.tick(Duration::from_millis(60));
        let in_flight = rotation.angle();

        rotation.align_to(1.0, &policy);
        rotation.tick(Duration::from_millis(40));
        assert!(!rotation.is_animating());
        assert_ne!(rotation.angle(), in_flight);
    }

    #[test]
    fn test_snap_has_no_animation() {
        let mut rotation = RotationController::default();
        rotation.snap_to(2.0);
        assert!(!rotation.is_animating());
        assert_eq!(rotation.angle(), -2.0);
    }
}
