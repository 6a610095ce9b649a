//! Decorative waveform shown while speaking
//!
//! The waveform is not derived from audio. It is three layered sine waves
//! that drift over time, redrawn at a fixed frame interval. `FrameTask` is
//! the repeating task behind it: the main loop polls it, and it only yields
//! frames while playback is speaking.

use super::PlaybackState;
use std::time::{Duration, Instant};

/// Logical canvas size the waves are computed on
pub const CANVAS_WIDTH: f32 = 400.0;
pub const CANVAS_HEIGHT: f32 = 100.0;

const WAVES: usize = 3;
const X_STEP: usize = 2;
const LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// One drawn frame: a polyline per wave, in canvas coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub waves: Vec<Vec<(f32, f32)>>,
}

impl Frame {
    /// Frame `elapsed` after the animation started
    pub fn at(elapsed: Duration) -> Self {
        let time = elapsed.as_millis() as f32 * 0.005;
        let center = CANVAS_HEIGHT / 2.0;
        let amplitude = CANVAS_HEIGHT * 0.3;

        let waves = (0..WAVES)
            .map(|wave| {
                let w = wave as f32;
                (0..CANVAS_WIDTH as usize)
                    .step_by(X_STEP)
                    .map(|x| {
                        let x = x as f32;
                        let y = center
                            + (x * 0.02 + time + w).sin() * amplitude * (0.5 + w * 0.3)
                            + (x * 0.01 + time * 1.5 + w).sin() * amplitude * 0.3;
                        (x, y)
                    })
                    .collect()
            })
            .collect();

        Self { waves }
    }

    /// Opacity wave `index` is drawn with
    pub fn alpha(index: usize) -> f32 {
        0.7 - index as f32 * 0.2
    }

    /// Render the front wave as a row of block characters
    pub fn render(&self, columns: usize) -> String {
        let Some(wave) = self.waves.first() else {
            return idle_line(columns);
        };
        if wave.is_empty() {
            return idle_line(columns);
        }

        (0..columns)
            .map(|col| {
                let idx = col * wave.len() / columns.max(1);
                let (_, y) = wave[idx.min(wave.len() - 1)];
                // Canvas y grows downwards
                let height = ((CANVAS_HEIGHT - y) / CANVAS_HEIGHT).clamp(0.0, 1.0);
                let level = (height * (LEVELS.len() - 1) as f32).round() as usize;
                LEVELS[level]
            })
            .collect()
    }
}

/// Flat line drawn while not speaking
pub fn idle_line(columns: usize) -> String {
    "─".repeat(columns)
}

/// Cancellable repeating frame task
#[derive(Debug)]
pub struct FrameTask {
    interval: Duration,
    started_at: Option<Instant>,
    last_frame: Option<Instant>,
}

impl FrameTask {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            started_at: None,
            last_frame: None,
        }
    }

    /// Begin animating; a running task keeps its start time
    pub fn start(&mut self, now: Instant) {
        if self.started_at.is_none() {
            self.started_at = Some(now);
            self.last_frame = None;
        }
    }

    /// Cancel the task
    pub fn stop(&mut self) {
        self.started_at = None;
        self.last_frame = None;
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Next frame if one is due and playback is speaking
    pub fn poll(&mut self, now: Instant, state: PlaybackState) -> Option<Frame> {
        if state != PlaybackState::Speaking {
            self.stop();
            return None;
        }
        let started = self.started_at?;

        if let Some(last) = self.last_frame {
            if now.saturating_duration_since(last) < self.interval {
                return None;
            }
        }

        self.last_frame = Some(now);
        Some(Frame::at(now.saturating_duration_since(started)))
    }
}
