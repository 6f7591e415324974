use crate::color::Color;
use crate::input::{stick_direction, Direction, PadInputs};
use crate::math::{normalize, Vec3};
use std::f64::consts::TAU;

/// Frames during which a held stick cannot switch cars again
pub const SWITCH_COOLDOWN_FRAMES: u32 = 15;
/// Turntable rotation per frame, in radians
pub const ROTATION_STEP: f64 = 0.008;

/// Ambient plus one directional light
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lighting {
    pub ambient: Color,
    pub directional: Color,
    /// Normalized direction the light travels in
    pub direction: Vec3,
}

impl Default for Lighting {
    /// Neutral overhead lighting
    fn default() -> Self {
        Lighting {
            ambient: Color::rgb8(80, 80, 80),
            directional: Color::rgb8(220, 220, 220),
            direction: normalize(&[0.0, -1.0, -0.2]),
        }
    }
}

/// Showcase state, written once per frame by `update`
#[derive(Debug, Clone, PartialEq)]
pub struct ShowcaseState {
    /// Index of the car on the turntable
    pub current_car: usize,
    /// Turntable angle in [0, 2π)
    pub rotation_y: f64,
    /// Frames left before the stick may switch cars again
    pub stick_cooldown: u32,
    /// Stick currently deflected left
    pub arrow_left: bool,
    /// Stick currently deflected right
    pub arrow_right: bool,
    pub lighting: Lighting,
}

impl Default for ShowcaseState {
    fn default() -> Self {
        ShowcaseState::new()
    }
}

impl ShowcaseState {
    pub fn new() -> Self {
        ShowcaseState {
            current_car: 0,
            rotation_y: 0.0,
            stick_cooldown: 0,
            arrow_left: false,
            arrow_right: false,
            lighting: Lighting::default(),
        }
    }

    /// Advances one frame: selection, arrow feedback and rotation
    pub fn update(&mut self, inputs: &PadInputs, car_count: usize) {
        let direction = stick_direction(inputs.stick_x);
        self.arrow_left = direction == Some(Direction::Left);
        self.arrow_right = direction == Some(Direction::Right);

        if self.stick_cooldown > 0 {
            self.stick_cooldown -= 1;
        }
        if self.stick_cooldown == 0 {
            match direction {
                Some(Direction::Left) => {
                    self.select_previous(car_count);
                    self.stick_cooldown = SWITCH_COOLDOWN_FRAMES;
                }
                Some(Direction::Right) => {
                    self.select_next(car_count);
                    self.stick_cooldown = SWITCH_COOLDOWN_FRAMES;
                }
                None => {}
            }
        }

        self.advance_rotation();
    }

    pub fn select_next(&mut self, car_count: usize) {
        if car_count == 0 {
            return;
        }
        self.current_car = (self.current_car + 1) % car_count;
    }

    pub fn select_previous(&mut self, car_count: usize) {
        if car_count == 0 {
            return;
        }
        self.current_car = (self.current_car + car_count - 1) % car_count;
    }

    /// Turns the turntable one step, wrapping by a full turn to stay smooth
    pub fn advance_rotation(&mut self) {
        self.rotation_y += ROTATION_STEP;
        if self.rotation_y >= TAU {
            self.rotation_y -= TAU;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn stick(stick_x: i8) -> PadInputs {
        PadInputs {
            stick_x,
            quit: false,
        }
    }

    #[test]
    fn next_wraps_over_car_count() {
        for count in [3, 4] {
            for initial in 0..count {
                let mut state = ShowcaseState {
                    current_car: initial,
                    ..ShowcaseState::new()
                };
                for k in 1..=10 {
                    state.select_next(count);
                    assert_eq!(state.current_car, (initial + k) % count);
                }
            }
        }
    }

    #[test]
    fn previous_wraps_over_car_count() {
        for count in [3, 4] {
            for initial in 0..count {
                let mut state = ShowcaseState {
                    current_car: initial,
                    ..ShowcaseState::new()
                };
                for k in 1..=10 {
                    state.select_previous(count);
                    assert_eq!(state.current_car, (initial + 10 * count - k) % count);
                }
            }
        }
    }

    #[test]
    fn rotation_stays_in_range_and_tracks_frames() {
        let mut state = ShowcaseState::new();
        for frame in 1..=5000u32 {
            state.advance_rotation();
            assert!(state.rotation_y >= 0.0 && state.rotation_y < TAU);
            if frame % 997 == 0 {
                let expected = (frame as f64 * ROTATION_STEP) % TAU;
                assert_abs_diff_eq!(state.rotation_y, expected, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn wrap_subtracts_a_full_turn() {
        let mut state = ShowcaseState {
            rotation_y: TAU - 0.003,
            ..ShowcaseState::new()
        };
        state.advance_rotation();
        assert_abs_diff_eq!(state.rotation_y, 0.005, epsilon = 1e-12);
    }

    #[test]
    fn held_stick_switches_once_per_cooldown() {
        let mut state = ShowcaseState::new();
        let mut changes = Vec::new();
        for frame in 0..31 {
            let before = state.current_car;
            state.update(&stick(127), 4);
            if state.current_car != before {
                changes.push(frame);
            }
        }
        assert_eq!(changes, vec![0, 15, 30]);
        assert_eq!(state.current_car, 3);
    }

    #[test]
    fn cooldown_blocks_opposite_direction_too() {
        let mut state = ShowcaseState::new();
        state.update(&stick(127), 3);
        assert_eq!(state.current_car, 1);
        for _ in 0..14 {
            state.update(&stick(-127), 3);
            assert_eq!(state.current_car, 1);
        }
        state.update(&stick(-127), 3);
        assert_eq!(state.current_car, 0);
    }

    #[test]
    fn arrows_mirror_stick_even_during_cooldown() {
        let mut state = ShowcaseState::new();
        let script = [127, 127, 0, -100, -100, 30, -128, 90];
        for (frame, x) in script.into_iter().enumerate() {
            state.update(&stick(x), 3);
            assert_eq!(state.arrow_left, x < -64, "frame {frame}");
            assert_eq!(state.arrow_right, x > 64, "frame {frame}");
        }
        assert!(state.stick_cooldown > 0);
    }

    #[test]
    fn deadzone_input_does_not_switch() {
        let mut state = ShowcaseState::new();
        for x in [-64, -10, 0, 10, 64] {
            state.update(&stick(x), 3);
        }
        assert_eq!(state.current_car, 0);
        assert_eq!(state.stick_cooldown, 0);
    }

    #[test]
    fn empty_garage_keeps_index() {
        let mut state = ShowcaseState::new();
        state.update(&stick(127), 0);
        assert_eq!(state.current_car, 0);
    }

    #[test]
    fn default_light_points_down_and_back() {
        let light = Lighting::default();
        assert_abs_diff_eq!(
            crate::math::dot(&light.direction, &light.direction),
            1.0,
            epsilon = 1e-12
        );
        assert!(light.direction[1] < 0.0);
    }
}
