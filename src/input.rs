use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

/// Minimum stick deflection treated as a left/right command
pub const STICK_DEADZONE: i8 = 64;
/// Full stick deflection produced by the keyboard
pub const FULL_DEFLECTION: i8 = 127;

/// One frame of controller input
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PadInputs {
    /// Horizontal analog stick axis, negative is left
    pub stick_x: i8,
    /// Request to leave the showcase
    pub quit: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

/// Classifies a stick sample, `None` inside the deadzone
pub fn stick_direction(stick_x: i8) -> Option<Direction> {
    if stick_x < -STICK_DEADZONE {
        Some(Direction::Left)
    } else if stick_x > STICK_DEADZONE {
        Some(Direction::Right)
    } else {
        None
    }
}

/// Source of per-frame controller input
pub trait Joypad {
    fn poll(&mut self) -> anyhow::Result<PadInputs>;
}

/// Stick deflection that stays applied for a number of frames after a press
#[derive(Debug)]
struct HeldStick {
    value: i8,
    remaining: u32,
    hold_frames: u32,
}

impl HeldStick {
    fn new(hold_frames: u32) -> Self {
        HeldStick {
            value: 0,
            remaining: 0,
            hold_frames,
        }
    }

    fn press(&mut self, value: i8) {
        self.value = value;
        self.remaining = self.hold_frames;
    }

    fn release(&mut self) {
        self.remaining = 0;
    }

    fn sample(&mut self) -> i8 {
        if self.remaining == 0 {
            return 0;
        }
        self.remaining -= 1;
        self.value
    }
}

/// Emulates the analog stick with the terminal keyboard.
///
/// Terminals only report presses and auto-repeat, so a press keeps the
/// stick deflected for `hold_frames` frames; auto-repeat refreshes it.
pub struct KeyboardJoypad {
    stick: HeldStick,
}

impl KeyboardJoypad {
    pub fn new(hold_frames: u32) -> Self {
        KeyboardJoypad {
            stick: HeldStick::new(hold_frames),
        }
    }

    /// Applies one key event, returning `true` when it asks to quit
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        let deflection = match key.code {
            KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => -FULL_DEFLECTION,
            KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => FULL_DEFLECTION,
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => return true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return true,
            _ => return false,
        };
        if key.kind == KeyEventKind::Release {
            if self.stick.value == deflection {
                self.stick.release();
            }
        } else {
            self.stick.press(deflection);
        }
        false
    }
}

impl Joypad for KeyboardJoypad {
    fn poll(&mut self) -> anyhow::Result<PadInputs> {
        let mut quit = false;
        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                quit |= self.handle_key(key);
            }
        }
        Ok(PadInputs {
            stick_x: self.stick.sample(),
            quit,
        })
    }
}
