//! Animated preset transitions
//!
//! A [`TransitionState`] blends one channel from the curve it was showing to a
//! new target. [`EqVisualState`] owns the unified and left/right channels and
//! advances them from frame timestamps.

use std::time::{Duration, Instant};

use super::curve::interpolate;
use super::easing::Easing;
use super::preset::BandGains;

/// One channel's transition
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionState {
    from: BandGains,
    to: BandGains,
    progress: f32,
}

impl TransitionState {
    /// Settled on `gains`, nothing to animate
    pub fn steady(gains: BandGains) -> Self {
        Self {
            from: gains.clone(),
            to: gains,
            progress: 1.0,
        }
    }

    pub fn from(&self) -> &BandGains {
        &self.from
    }

    pub fn to(&self) -> &BandGains {
        &self.to
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn is_animating(&self) -> bool {
        self.progress < 1.0
    }

    /// Curve currently on screen
    pub fn current(&self, easing: Easing) -> BandGains {
        if !self.is_animating() {
            return self.to.clone();
        }
        interpolate(Some(&self.from), &self.to, self.progress, &easing)
    }

    /// Start a transition to `target` from whatever is currently displayed.
    ///
    /// Requesting the target already being shown or approached is a no-op.
    pub fn retarget(&mut self, target: BandGains, easing: Easing) {
        if target == self.to {
            return;
        }
        self.from = self.current(easing);
        self.to = target;
        self.progress = 0.0;
    }

    /// Move forward by `delta` of the whole transition. Progress never goes
    /// back; reaching 1 collapses the state onto its target.
    pub fn advance(&mut self, delta: f32) {
        if !self.is_animating() {
            return;
        }
        let delta = if delta.is_finite() { delta.max(0.0) } else { 1.0 };
        self.progress = (self.progress + delta).min(1.0);
        if self.progress >= 1.0 {
            self.from = self.to.clone();
        }
    }
}

/// Everything the renderer needs for one paint, already interpolated
#[derive(Debug, Clone, PartialEq)]
pub struct EqSnapshot {
    pub eq_enabled: bool,
    pub split_ear: bool,
    pub unified: BandGains,
    pub left: BandGains,
    pub right: BandGains,
}

/// Visual state of the EQ display
#[derive(Debug, Clone)]
pub struct EqVisualState {
    enabled: bool,
    split_ear: bool,
    unified: TransitionState,
    left: TransitionState,
    right: TransitionState,
    easing: Easing,
    duration: Duration,
    last_tick: Option<Instant>,
}

impl EqVisualState {
    pub fn new(unified: BandGains, left: BandGains, right: BandGains) -> Self {
        Self {
            enabled: true,
            split_ear: false,
            unified: TransitionState::steady(unified),
            left: TransitionState::steady(left),
            right: TransitionState::steady(right),
            easing: Easing::default(),
            duration: Duration::from_millis(300),
            last_tick: None,
        }
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn set_easing(&mut self, easing: Easing) {
        self.easing = easing;
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn set_split_ear(&mut self, split_ear: bool) {
        self.split_ear = split_ear;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_split_ear(&self) -> bool {
        self.split_ear
    }

    pub fn set_unified(&mut self, gains: BandGains) {
        self.unified.retarget(gains, self.easing);
    }

    pub fn set_left(&mut self, gains: BandGains) {
        self.left.retarget(gains, self.easing);
    }

    pub fn set_right(&mut self, gains: BandGains) {
        self.right.retarget(gains, self.easing);
    }

    pub fn is_animating(&self) -> bool {
        self.unified.is_animating() || self.left.is_animating() || self.right.is_animating()
    }

    /// Advance every channel to frame time `now`. Returns true while any
    /// channel is still animating.
    pub fn tick(&mut self, now: Instant) -> bool {
        if !self.is_animating() {
            self.last_tick = None;
            return false;
        }

        let delta = match self.last_tick {
            _ if self.duration.is_zero() => 1.0,
            // First frame of a transition paints its starting curve
            None => 0.0,
            Some(last) => {
                now.saturating_duration_since(last).as_secs_f32() / self.duration.as_secs_f32()
            }
        };
        self.last_tick = Some(now);

        for channel in [&mut self.unified, &mut self.left, &mut self.right] {
            channel.advance(delta);
        }
        let animating = self.is_animating();
        if !animating {
            // The next transition measures from its own first frame
            self.last_tick = None;
        }
        animating
    }

    pub fn snapshot(&self) -> EqSnapshot {
        EqSnapshot {
            eq_enabled: self.enabled,
            split_ear: self.split_ear,
            unified: self.unified.current(self.easing),
            left: self.left.current(self.easing),
            right: self.right.current(self.easing),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gains(values: &[f32]) -> BandGains {
        BandGains::new(values.to_vec())
    }

    #[test]
    fn test_transition_collapses_at_end() {
        let mut state = TransitionState::steady(gains(&[0.0, 0.0, 0.0]));
        state.retarget(gains(&[6.0, -3.0, 2.0]), Easing::Linear);
        assert!(state.is_animating());

        state.advance(0.5);
        assert_eq!(state.current(Easing::Linear).as_slice(), &[3.0, -1.5, 1.0]);

        state.advance(0.75);
        assert!(!state.is_animating());
        assert_eq!(state.progress(), 1.0);
        assert_eq!(state.from(), state.to());
    }

    #[test]
    fn test_progress_never_decreases() {
        let mut state = TransitionState::steady(gains(&[0.0]));
        state.retarget(gains(&[10.0]), Easing::Linear);
        state.advance(0.4);
        state.advance(-0.3);
        state.advance(f32::NAN);
        assert_eq!(state.progress(), 1.0);
    }

    #[test]
    fn test_retarget_starts_from_displayed_curve() {
        let mut state = TransitionState::steady(gains(&[0.0]));
        state.retarget(gains(&[10.0]), Easing::Linear);
        state.advance(0.5);

        state.retarget(gains(&[-10.0]), Easing::Linear);

        assert_eq!(state.from(), &gains(&[5.0]));
        assert_eq!(state.progress(), 0.0);
        assert_eq!(state.current(Easing::Linear), gains(&[5.0]));
    }

    #[test]
    fn test_retarget_to_same_target_keeps_going() {
        let mut state = TransitionState::steady(gains(&[0.0]));
        state.retarget(gains(&[10.0]), Easing::Linear);
        state.advance(0.5);

        state.retarget(gains(&[10.0]), Easing::Linear);

        assert_eq!(state.progress(), 0.5);
    }

    #[test]
    fn test_visual_state_ticks_over_duration() {
        let flat = gains(&[0.0, 0.0, 0.0]);
        let mut eq = EqVisualState::new(flat.clone(), flat.clone(), flat)
            .with_easing(Easing::Linear)
            .with_duration(Duration::from_millis(200));
        let start = Instant::now();

        eq.set_unified(gains(&[4.0, 4.0, 4.0]));
        assert!(eq.tick(start));
        assert_eq!(eq.snapshot().unified, gains(&[0.0, 0.0, 0.0]));

        assert!(eq.tick(start + Duration::from_millis(100)));
        assert_eq!(eq.snapshot().unified, gains(&[2.0, 2.0, 2.0]));

        assert!(!eq.tick(start + Duration::from_millis(250)));
        assert_eq!(eq.snapshot().unified, gains(&[4.0, 4.0, 4.0]));
        assert!(!eq.is_animating());
    }

    #[test]
    fn test_later_transition_starts_from_its_first_frame() {
        let flat = gains(&[0.0, 0.0, 0.0]);
        let mut eq = EqVisualState::new(flat.clone(), flat.clone(), flat)
            .with_easing(Easing::Linear)
            .with_duration(Duration::from_millis(200));
        let start = Instant::now();
        eq.set_unified(gains(&[4.0, 4.0, 4.0]));
        eq.tick(start);
        assert!(!eq.tick(start + Duration::from_millis(200)));

        // Long idle gap before the next preset change
        let later = start + Duration::from_secs(10);
        eq.set_unified(gains(&[0.0, 0.0, 0.0]));

        assert!(eq.tick(later));
        assert_eq!(eq.snapshot().unified, gains(&[4.0, 4.0, 4.0]));
    }

    #[test]
    fn test_snapshot_carries_flags_and_channels() {
        let mut eq = EqVisualState::new(
            gains(&[0.0, 0.0, 0.0]),
            gains(&[1.0, 1.0, 1.0]),
            gains(&[2.0, 2.0, 2.0]),
        );
        eq.set_enabled(false);
        eq.set_split_ear(true);

        let snapshot = eq.snapshot();

        assert!(!snapshot.eq_enabled);
        assert!(snapshot.split_ear);
        assert_eq!(snapshot.left, gains(&[1.0, 1.0, 1.0]));
        assert_eq!(snapshot.right, gains(&[2.0, 2.0, 2.0]));
    }
}
