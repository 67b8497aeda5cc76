//! Motion models.
//!
//! Two movement families: linear movers (player, bullets) add a constant
//! velocity once per tick, and oscillating movers follow a per-axis sine wave
//! driven by an integer tick timer. The wave is sampled from the current
//! timer, then the timer advances and wraps at the period, so a mover's
//! position is always a pure function of `(origin, amplitude, period, phase,
//! timer)`.

use std::f32::consts::TAU;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::GameError;

/// One axis of sinusoidal motion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisWave {
    pub origin: f32,
    pub amplitude: f32,
    /// Wave period in ticks. Always > 0; enforced at construction.
    pub period: u32,
    /// Phase offset in radians, subtracted from the wave argument.
    pub phase: f32,
    /// Current position in the cycle, in `0..period`.
    pub timer: u32,
}

impl AxisWave {
    pub fn new(origin: f32, amplitude: f32, period: u32, phase: f32) -> Result<Self, GameError> {
        if period == 0 {
            return Err(GameError::Configuration(
                "oscillator period must be positive".into(),
            ));
        }
        Ok(Self {
            origin,
            amplitude,
            period,
            phase,
            timer: 0,
        })
    }

    /// Instantaneous coordinate for the current timer value.
    pub fn sample(&self) -> f32 {
        let arg = TAU / self.period as f32 * self.timer as f32 - self.phase;
        self.origin + self.amplitude * arg.sin()
    }

    /// Step the cycle timer, wrapping to 0 exactly at the period.
    pub fn advance(&mut self) {
        self.timer = (self.timer + 1) % self.period;
    }
}

/// Two-axis oscillation for mover enemies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoverMotion {
    pub x: AxisWave,
    pub y: AxisWave,
}

impl MoverMotion {
    pub fn new(
        origin: Vec2,
        amplitude: Vec2,
        period: (u32, u32),
        phase: (f32, f32),
    ) -> Result<Self, GameError> {
        Ok(Self {
            x: AxisWave::new(origin.x, amplitude.x, period.0, phase.0)?,
            y: AxisWave::new(origin.y, amplitude.y, period.1, phase.1)?,
        })
    }

    pub fn sample(&self) -> Vec2 {
        Vec2::new(self.x.sample(), self.y.sample())
    }

    pub fn advance(&mut self) {
        self.x.advance();
        self.y.advance();
    }
}

/// Linear step: one tick's worth of constant velocity.
#[inline]
pub fn step_linear(pos: &mut Vec2, vel: Vec2) {
    *pos += vel;
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_zero_period_rejected() {
        assert!(AxisWave::new(0.0, 10.0, 0, 0.0).is_err());
        assert!(MoverMotion::new(Vec2::ZERO, Vec2::splat(10.0), (120, 0), (0.0, 0.0)).is_err());
    }

    #[test]
    fn test_sample_matches_formula() {
        let mut wave = AxisWave::new(200.0, 60.0, 120, 0.5).unwrap();
        wave.timer = 17;
        let expected = 200.0 + 60.0 * (TAU / 120.0 * 17.0 - 0.5).sin();
        assert_eq!(wave.sample(), expected);
    }

    #[test]
    fn test_timer_wraps_at_period() {
        let mut wave = AxisWave::new(0.0, 1.0, 4, 0.0).unwrap();
        let observed: Vec<u32> = (0..9)
            .map(|_| {
                let t = wave.timer;
                wave.advance();
                t
            })
            .collect();
        assert_eq!(observed, vec![0, 1, 2, 3, 0, 1, 2, 3, 0]);
    }

    #[test]
    fn test_zero_amplitude_axis_is_static() {
        let mut wave = AxisWave::new(50.0, 0.0, 120, 1.0).unwrap();
        for _ in 0..300 {
            assert_eq!(wave.sample(), 50.0);
            wave.advance();
        }
    }

    proptest! {
        #[test]
        fn prop_sample_stays_within_amplitude(
            origin in -1000.0f32..1000.0,
            amplitude in -200.0f32..200.0,
            period in 1u32..600,
            phase in -10.0f32..10.0,
            steps in 0usize..2000,
        ) {
            let mut wave = AxisWave::new(origin, amplitude, period, phase).unwrap();
            for _ in 0..steps {
                wave.advance();
            }
            let lo = origin - amplitude.abs();
            let hi = origin + amplitude.abs();
            let pos = wave.sample();
            // Small epsilon for float rounding at the extremes.
            prop_assert!(pos >= lo - 1e-3 && pos <= hi + 1e-3);
        }

        #[test]
        fn prop_timer_always_below_period(period in 1u32..600, steps in 0usize..5000) {
            let mut wave = AxisWave::new(0.0, 1.0, period, 0.0).unwrap();
            for _ in 0..steps {
                wave.advance();
                prop_assert!(wave.timer < period);
            }
        }
    }
}
