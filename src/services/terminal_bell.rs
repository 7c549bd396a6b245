//! Terminal-bell backed sound effects
//!
//! Plays BEL bytes through the controlling terminal. Most emulators render
//! BEL as a single fixed chirp, so the effects differ only in count and
//! spacing. Playback runs on short-lived helper threads; failures are
//! swallowed, the countdown never depends on audio.

use std::io::Write;
use std::thread;
use std::time::Duration;

use super::sound::{SoundEffects, PIP_SPACING};

/// Spacing between the alarm's bell burst
const ALARM_BURST_SPACING: Duration = Duration::from_millis(120);
const ALARM_BURST_COUNT: u32 = 3;

/// Sound backend that rings the terminal bell
#[derive(Debug, Clone, Copy)]
pub struct TerminalBell;

impl TerminalBell {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TerminalBell {
    fn default() -> Self {
        Self::new()
    }
}

/// Ring the bell `count` times with `spacing` between rings, off-thread
fn ring(count: u32, spacing: Duration) {
    if count == 0 {
        return;
    }
    thread::spawn(move || {
        let mut stdout = std::io::stdout();
        for played in 0..count {
            if played > 0 {
                thread::sleep(spacing);
            }
            let _ = stdout.write_all(b"\x07");
            let _ = stdout.flush();
        }
    });
}

impl SoundEffects for TerminalBell {
    fn unlock(&self) {
        // a terminal needs no warm-up
    }

    fn play_tick(&self) {
        ring(1, PIP_SPACING);
    }

    fn play_pip(&self) {
        ring(1, PIP_SPACING);
    }

    fn play_sequence(&self, count: u32) {
        ring(count, PIP_SPACING);
    }

    fn play_warning(&self) {
        ring(1, PIP_SPACING);
    }

    fn play_alarm(&self) {
        ring(ALARM_BURST_COUNT, ALARM_BURST_SPACING);
    }
}
