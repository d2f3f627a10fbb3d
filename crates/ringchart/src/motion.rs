//! Timing for every animated property of the chart.
//!
//! A [`MotionPolicy`] turns a [`TransitionKind`] into a concrete
//! [`Transition`], and [`AnimatedValue`] plays transitions back one frame
//! delta at a time. Nothing in here knows about wall-clock time; hosts call
//! `tick` with the elapsed duration since the previous frame.

use crate::{PULSE_PEAK_SCALE, PULSE_WINDOW, REDUCED_MOTION_DURATION};
use std::f64::consts::{PI, TAU};
use std::time::Duration;

const MAX_SPRING_STEP: f64 = 1.0 / 240.0;
const SETTLE_EPSILON: f64 = 1e-4;

/// Damped spring described the way designers tune them: `response` is the
/// undamped period in seconds, `damping_fraction` is 1.0 for critical damping
/// and lower for overshoot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spring {
    pub response: f64,
    pub damping_fraction: f64,
}

impl Spring {
    pub const ROTATION: Self = Self::new(0.55, 0.75);
    pub const EMPHASIS: Self = Self::new(0.35, 0.6);
    pub const MORPH: Self = Self::new(0.4, 0.8);
    pub const PULSE: Self = Self::new(0.28, 0.55);

    pub const fn new(response: f64, damping_fraction: f64) -> Self {
        Self {
            response,
            damping_fraction,
        }
    }

    fn stiffness(&self) -> f64 {
        let omega = TAU / self.response;
        omega * omega
    }

    fn damping(&self) -> f64 {
        4.0 * PI * self.damping_fraction / self.response
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transition {
    Spring(Spring),
    Linear(Duration),
}

impl Transition {
    /// Fixed duration, if the transition has one.
    pub fn duration(&self) -> Option<Duration> {
        match self {
            Self::Spring(_) => None,
            Self::Linear(d) => Some(*d),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransitionKind {
    Rotation,
    SelectionScale,
    CenterMorph,
    Pulse,
}

impl TransitionKind {
    pub const ALL: [Self; 4] = [
        Self::Rotation,
        Self::SelectionScale,
        Self::CenterMorph,
        Self::Pulse,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MotionPolicy {
    pub reduced_motion: bool,
}

impl MotionPolicy {
    pub fn new(reduced_motion: bool) -> Self {
        Self { reduced_motion }
    }

    pub fn transition(&self, kind: TransitionKind) -> Transition {
        if self.reduced_motion {
            return Transition::Linear(match kind {
                // two legs that together fit the cap
                TransitionKind::Pulse => REDUCED_MOTION_DURATION / 2,
                _ => REDUCED_MOTION_DURATION,
            });
        }

        Transition::Spring(match kind {
            TransitionKind::Rotation => Spring::ROTATION,
            TransitionKind::SelectionScale => Spring::EMPHASIS,
            TransitionKind::CenterMorph => Spring::MORPH,
            TransitionKind::Pulse => Spring::PULSE,
        })
    }

    /// How long the pulse holds its peak target before releasing.
    pub fn pulse_hold(&self) -> Duration {
        if self.reduced_motion {
            REDUCED_MOTION_DURATION / 2
        } else {
            PULSE_WINDOW / 2
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Motion {
    Idle,
    Spring(Spring),
    Linear {
        from: f64,
        elapsed: Duration,
        duration: Duration,
    },
}

/// A scalar that moves toward a target under a [`Transition`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimatedValue {
    value: f64,
    velocity: f64,
    target: f64,
    motion: Motion,
}

impl AnimatedValue {
    pub fn new(value: f64) -> Self {
        Self {
            value,
            velocity: 0.0,
            target: value,
            motion: Motion::Idle,
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn is_animating(&self) -> bool {
        self.motion != Motion::Idle
    }

    pub fn set_immediate(&mut self, value: f64) {
        *self = Self::new(value);
    }

    /// Starts (or redirects) an animation. The in-flight value, and for
    /// springs the velocity too, carries over so retargeting never jumps.
    pub fn animate_to(&mut self, target: f64, transition: Transition) {
        let motion = match transition {
            Transition::Linear(duration) if duration.is_zero() => {
                self.set_immediate(target);
                return;
            }
            Transition::Linear(duration) => {
                self.velocity = 0.0;
                Motion::Linear {
                    from: self.value,
                    elapsed: Duration::ZERO,
                    duration,
                }
            }
            Transition::Spring(spring) => Motion::Spring(spring),
        };
        self.target = target;
        self.motion = motion;

        if self.value == target && self.velocity == 0.0 {
            self.motion = Motion::Idle;
        }
    }

    /// Replays an in-flight animation toward the same target under a new
    /// transition. Idle values stay put.
    pub fn retime(&mut self, transition: Transition) {
        if self.is_animating() {
            self.animate_to(self.target, transition);
        }
    }

    pub fn tick(&mut self, dt: Duration) {
        match self.motion {
            Motion::Idle => {}
            Motion::Linear {
                from,
                elapsed,
                duration,
            } => {
                let elapsed = elapsed + dt;
                if elapsed >= duration {
                    self.set_immediate(self.target);
                } else {
                    let t = elapsed.as_secs_f64() / duration.as_secs_f64();
                    self.value = from + (self.target - from) * t;
                    self.motion = Motion::Linear {
                        from,
                        elapsed,
                        duration,
                    };
                }
            }
            Motion::Spring(spring) => self.step_spring(spring, dt.as_secs_f64()),
        }
    }

    fn step_spring(&mut self, spring: Spring, seconds: f64) {
        let (k, c) = (spring.stiffness(), spring.damping());
        let mut remaining = seconds;

        while remaining > 0.0 {
            let h = remaining.min(MAX_SPRING_STEP);
            let accel = -k * (self.value - self.target) - c * self.velocity;
            self.velocity += accel * h;
            self.value += self.velocity * h;
            remaining -= h;
        }

        if (self.value - self.target).abs() < SETTLE_EPSILON
            && self.velocity.abs() < SETTLE_EPSILON
        {
            self.set_immediate(self.target);
        }
    }
}

/// One-shot ring scale pulse played when the number of categories changes.
///
/// The pulse rises toward [`PULSE_PEAK_SCALE`], holds that target for
/// [`MotionPolicy::pulse_hold`], then releases back to 1.0. Triggering again
/// before the release restarts the hold, so only the latest change counts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PopPulse {
    scale: AnimatedValue,
    hold_remaining: Option<Duration>,
    release: Transition,
}

impl Default for PopPulse {
    fn default() -> Self {
        Self {
            scale: AnimatedValue::new(1.0),
            hold_remaining: None,
            release: Transition::Linear(Duration::ZERO),
        }
    }
}

impl PopPulse {
    pub fn trigger(&mut self, policy: &MotionPolicy) {
        let transition = policy.transition(TransitionKind::Pulse);
        self.scale.animate_to(PULSE_PEAK_SCALE, transition);
        self.hold_remaining = Some(policy.pulse_hold());
        self.release = transition;
    }

    /// Moves a running pulse onto `policy`'s timing, shortening the hold if
    /// the new one is shorter.
    pub fn retime(&mut self, policy: &MotionPolicy) {
        let transition = policy.transition(TransitionKind::Pulse);
        self.release = transition;
        self.hold_remaining = self.hold_remaining.map(|h| h.min(policy.pulse_hold()));
        self.scale.retime(transition);
    }

    pub fn scale(&self) -> f64 {
        self.scale.value()
    }

    pub fn is_active(&self) -> bool {
        self.hold_remaining.is_some() || self.scale.is_animating()
    }

    pub fn tick(&mut self, dt: Duration) {
        match self.hold_remaining {
            Some(remaining) if dt >= remaining => {
                self.scale.tick(remaining);
                self.hold_remaining = None;
                self.scale.animate_to(1.0, self.release);
                self.scale.tick(dt - remaining);
            }
            Some(remaining) => {
                self.scale.tick(dt);
                self.hold_remaining = Some(remaining - dt);
            }
            None => self.scale.tick(dt),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: Duration = Duration::from_millis(16);

    fn settle(value: &mut AnimatedValue) -> Duration {
        let mut elapsed = Duration::ZERO;
        while value.is_animating() && elapsed < Duration::from_secs(10) {
            value.tick(FRAME);
            elapsed += FRAME;
        }
        elapsed
    }

    #[test]
    fn test_reduced_motion_caps_every_transition() {
        let policy = MotionPolicy::new(true);
        for kind in TransitionKind::ALL {
            let duration = policy.transition(kind).duration();
            assert!(
                duration.is_some_and(|d| d <= REDUCED_MOTION_DURATION),
                "{kind:?} escaped the cap"
            );
        }
    }

    #[test]
    fn test_full_motion_uses_springs() {
        let policy = MotionPolicy::default();
        for kind in TransitionKind::ALL {
            assert!(matches!(policy.transition(kind), Transition::Spring(_)));
        }
    }

    #[test]
    fn test_linear_reaches_target_exactly() {
        let mut value = AnimatedValue::new(0.0);
        value.animate_to(10.0, Transition::Linear(Duration::from_millis(100)));

        value.tick(Duration::from_millis(50));
        assert!((value.value() - 5.0).abs() < 1e-9);
        assert!(value.is_animating());

        value.tick(Duration::from_millis(50));
        assert_eq!(value.value(), 10.0);
        assert!(!value.is_animating());
    }

    #[test]
    fn test_spring_settles_on_target_with_overshoot() {
        let mut value = AnimatedValue::new(0.0);
        value.animate_to(1.0, Transition::Spring(Spring::PULSE));

        let mut peak: f64 = 0.0;
        for _ in 0..30 {
            value.tick(FRAME);
            peak = peak.max(value.value());
        }
        assert!(peak > 1.0, "underdamped spring should overshoot");

        settle(&mut value);
        assert_eq!(value.value(), 1.0);
        assert!(!value.is_animating());
    }

    #[test]
    fn test_spring_outlasts_reduced_cap() {
        let mut value = AnimatedValue::new(0.0);
        value.animate_to(2.0, Transition::Spring(Spring::ROTATION));
        value.tick(REDUCED_MOTION_DURATION);
        assert!(value.is_animating());
    }

    #[test]
    fn test_retarget_starts_from_in_flight_value() {
        let mut value = AnimatedValue::new(0.0);
        value.animate_to(1.0, Transition::Spring(Spring::ROTATION));
        for _ in 0..5 {
            value.tick(FRAME);
        }
        let in_flight = value.value();
        assert!(in_flight > 0.0 && in_flight < 1.0);

        value.animate_to(-1.0, Transition::Spring(Spring::ROTATION));
        assert_eq!(value.value(), in_flight);

        value.animate_to(3.0, Transition::Linear(Duration::from_millis(100)));
        assert_eq!(value.value(), in_flight);
        value.tick(Duration::from_millis(50));
        assert!((value.value() - (in_flight + 3.0) / 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_animating_to_current_value_is_idle() {
        let mut value = AnimatedValue::new(4.0);
        value.animate_to(4.0, Transition::Spring(Spring::EMPHASIS));
        assert!(!value.is_animating());
    }

    #[test]
    fn test_reduced_pulse_finishes_within_cap() {
        let policy = MotionPolicy::new(true);
        let mut pulse = PopPulse::default();
        pulse.trigger(&policy);

        pulse.tick(Duration::from_millis(50));
        assert_eq!(pulse.scale(), PULSE_PEAK_SCALE);

        pulse.tick(Duration::from_millis(50));
        assert_eq!(pulse.scale(), 1.0);
        assert!(!pulse.is_active());
    }

    #[test]
    fn test_reduced_pulse_single_large_tick() {
        let policy = MotionPolicy::new(true);
        let mut pulse = PopPulse::default();
        pulse.trigger(&policy);

        pulse.tick(REDUCED_MOTION_DURATION);
        assert_eq!(pulse.scale(), 1.0);
        assert!(!pulse.is_active());
    }

    #[test]
    fn test_pulse_retrigger_restarts_hold() {
        let policy = MotionPolicy::default();
        let mut pulse = PopPulse::default();
        pulse.trigger(&policy);

        pulse.tick(Duration::from_millis(120));
        pulse.trigger(&policy);
        pulse.tick(Duration::from_millis(120));

        // the first hold (140ms) has long passed, but the restart keeps the peak target
        assert_eq!(pulse.hold_remaining, Some(Duration::from_millis(20)));
        assert_eq!(pulse.scale.target(), PULSE_PEAK_SCALE);
    }

    #[test]
    fn test_full_pulse_returns_to_rest() {
        let policy = MotionPolicy::default();
        let mut pulse = PopPulse::default();
        pulse.trigger(&policy);

        let mut peak: f64 = 1.0;
        let mut elapsed = Duration::ZERO;
        while pulse.is_active() && elapsed < Duration::from_secs(10) {
            pulse.tick(FRAME);
            elapsed += FRAME;
            peak = peak.max(pulse.scale());
        }

        assert!(peak > 1.04);
        assert_eq!(pulse.scale(), 1.0);
    }

    #[test]
    fn test_retime_moves_spring_onto_linear_cap() {
        let mut value = AnimatedValue::new(0.0);
        value.animate_to(1.0, MotionPolicy::default().transition(TransitionKind::Rotation));
        value.tick(FRAME);

        value.retime(MotionPolicy::new(true).transition(TransitionKind::Rotation));
        value.tick(REDUCED_MOTION_DURATION);

        assert!(!value.is_animating());
        assert_eq!(value.value(), 1.0);
    }

    #[test]
    fn test_retime_leaves_idle_values_alone() {
        let mut value = AnimatedValue::new(3.0);
        value.retime(Transition::Linear(REDUCED_MOTION_DURATION));
        assert!(!value.is_animating());
        assert_eq!(value.value(), 3.0);
    }
}
