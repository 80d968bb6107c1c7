//! Player Input
//!
//! The driver polls its input device and hands the world at most one
//! command per tick. Commands are momentary: a tick without a command is
//! an idle tick (which recharges the sprayer), not a repeat of the last one.

use serde::{Serialize, Deserialize};

/// One player command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Command {
    /// Walk the rim counter-clockwise (+5°)
    RotateLeft = 0,
    /// Walk the rim clockwise (-5°)
    RotateRight = 1,
    /// Fire one spray straight ahead
    FireSpray = 2,
    /// Fire a ring of sixteen flames
    FireFlame = 3,
}

/// A command issued on a specific tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimedCommand {
    /// Tick the command applies to
    pub tick: u32,
    /// The command
    pub command: Command,
}

/// Input recording for one attempt at a level.
///
/// Only ticks that carry a command are stored; every other tick up to
/// `end_tick` is idle.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InputRecording {
    /// Last tick covered by the recording
    pub end_tick: u32,

    /// Commands in ascending tick order
    entries: Vec<TimedCommand>,
}

impl InputRecording {
    /// Create an empty recording.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the input for a tick.
    ///
    /// Commands must arrive in ascending tick order; a command at or before
    /// the last stored one is ignored.
    pub fn record(&mut self, tick: u32, command: Option<Command>) {
        if let Some(command) = command {
            if self.entries.last().is_some_and(|e| e.tick >= tick) {
                return;
            }
            self.entries.push(TimedCommand { tick, command });
        }
        self.end_tick = self.end_tick.max(tick);
    }

    /// Command recorded for `tick`, if any.
    ///
    /// Uses binary search.
    pub fn get_input_at(&self, tick: u32) -> Option<Command> {
        self.entries
            .binary_search_by_key(&tick, |e| e.tick)
            .ok()
            .map(|idx| self.entries[idx].command)
    }

    /// Number of stored commands.
    pub fn command_count(&self) -> usize {
        self.entries.len()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_sparse() {
        let mut recording = InputRecording::new();
        recording.record(1, None);
        recording.record(2, Some(Command::RotateLeft));
        recording.record(3, None);
        recording.record(5, Some(Command::FireSpray));
        recording.record(8, None);

        assert_eq!(recording.command_count(), 2);
        assert_eq!(recording.end_tick, 8);
        assert_eq!(recording.get_input_at(2), Some(Command::RotateLeft));
        assert_eq!(recording.get_input_at(3), None);
        assert_eq!(recording.get_input_at(5), Some(Command::FireSpray));
        assert_eq!(recording.get_input_at(100), None);
    }

    #[test]
    fn test_recording_ignores_out_of_order() {
        let mut recording = InputRecording::new();
        recording.record(4, Some(Command::FireFlame));
        recording.record(3, Some(Command::FireSpray));
        recording.record(4, Some(Command::RotateRight));

        assert_eq!(recording.command_count(), 1);
        assert_eq!(recording.get_input_at(4), Some(Command::FireFlame));
    }
}
