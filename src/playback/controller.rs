//! Playback state machine
//!
//! Commands (play, pause, stop) move the state immediately and are passed to
//! the engine. Engine notifications confirm or override the state later.
//! Notifications are matched against the utterance in flight, so anything
//! arriving for an utterance that was already stopped or replaced is
//! dropped.

use super::state::{ControlSurface, PlaybackState, Status, StatusKind, NO_TEXT_MESSAGE};
use super::visualizer::{Frame, FrameTask};
use crate::speech::{EngineEvent, EngineEventKind, SpeechEngine, UtteranceId, UtteranceRequest};
use crate::{MaruError, Result};
use crossbeam_channel::Receiver;
use log::{debug, error, warn};
use std::time::{Duration, Instant};

/// How long an error stays on the status line by default
pub const ERROR_DISPLAY: Duration = Duration::from_millis(3000);

/// Default visualizer frame interval
pub const FRAME_INTERVAL: Duration = Duration::from_millis(50);

/// Drives a speech engine from user commands and engine notifications
pub struct PlaybackController<E: SpeechEngine> {
    engine: E,
    events: Receiver<EngineEvent>,
    state: PlaybackState,
    current: Option<UtteranceId>,
    status: Status,
    error_until: Option<Instant>,
    error_display: Duration,
    frames: FrameTask,
}

impl<E: SpeechEngine> PlaybackController<E> {
    pub fn new(engine: E) -> Self {
        let events = engine.events();
        Self {
            engine,
            events,
            state: PlaybackState::Idle,
            current: None,
            status: Status::ready(),
            error_until: None,
            error_display: ERROR_DISPLAY,
            frames: FrameTask::new(FRAME_INTERVAL),
        }
    }

    /// Use a different error display duration
    pub fn with_error_display(mut self, duration: Duration) -> Self {
        self.error_display = duration;
        self
    }

    /// Use a different visualizer frame interval
    pub fn with_frame_interval(mut self, interval: Duration) -> Self {
        self.frames = FrameTask::new(interval);
        self
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn controls(&self) -> ControlSurface {
        ControlSurface::for_state(self.state)
    }

    /// Utterance currently in flight
    pub fn current_utterance(&self) -> Option<UtteranceId> {
        self.current
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    /// Whether the visualizer task is running
    pub fn visualizer_running(&self) -> bool {
        self.frames.is_running()
    }

    /// Start speaking, or resume when paused
    ///
    /// `build` is only called when starting from idle. An empty text shows a
    /// message and leaves the state alone.
    pub fn play<F>(&mut self, build: F) -> Result<()>
    where
        F: FnOnce() -> Result<UtteranceRequest>,
    {
        match self.state {
            PlaybackState::Speaking => Ok(()),
            PlaybackState::Paused => {
                debug!("Resuming playback");
                if let Err(e) = self.engine.resume() {
                    self.fail(e.to_string());
                    return Err(e);
                }
                self.status = Status::speaking();
                self.enter(PlaybackState::Speaking);
                Ok(())
            }
            PlaybackState::Idle => {
                let request = match build() {
                    Ok(request) => request,
                    Err(MaruError::NoText) => {
                        self.show_error(NO_TEXT_MESSAGE);
                        return Err(MaruError::NoText);
                    }
                    Err(e) => {
                        self.show_error(e.to_string());
                        return Err(e);
                    }
                };

                match self.engine.speak(&request) {
                    Ok(id) => {
                        debug!("Utterance {:?} handed to engine", id);
                        self.current = Some(id);
                        self.status = Status::speaking();
                        self.enter(PlaybackState::Speaking);
                        Ok(())
                    }
                    Err(e) => {
                        self.fail(e.to_string());
                        Err(e)
                    }
                }
            }
        }
    }

    /// Pause; only does something while speaking
    pub fn pause(&mut self) -> Result<()> {
        if self.state != PlaybackState::Speaking {
            return Ok(());
        }

        debug!("Pausing playback");
        if let Err(e) = self.engine.pause() {
            self.fail(e.to_string());
            // Idle must not leave audio playing
            if let Err(cancel) = self.engine.cancel() {
                warn!("Engine cancel failed: {}", cancel);
            }
            return Err(e);
        }
        self.status = Status::paused();
        self.enter(PlaybackState::Paused);
        Ok(())
    }

    /// Stop and drop the utterance in flight
    pub fn stop(&mut self) -> Result<()> {
        if self.state == PlaybackState::Idle {
            return Ok(());
        }

        debug!("Stopping playback");
        self.current = None;
        self.status = Status::ready();
        self.enter(PlaybackState::Idle);

        // Already idle whatever the engine says
        if let Err(e) = self.engine.cancel() {
            warn!("Engine cancel failed: {}", e);
        }
        Ok(())
    }

    /// Pause while speaking, resume while paused
    pub fn toggle(&mut self) -> Result<()> {
        match self.state {
            PlaybackState::Speaking => self.pause(),
            PlaybackState::Paused => self.play(|| Err(MaruError::NoText)),
            PlaybackState::Idle => Ok(()),
        }
    }

    /// Apply one engine notification
    pub fn handle_event(&mut self, event: &EngineEvent) {
        if self.current != Some(event.utterance) {
            debug!(
                "Ignoring {:?} for utterance {:?} (current {:?})",
                event.kind, event.utterance, self.current
            );
            return;
        }

        match &event.kind {
            // A late start must not undo a pause requested since
            EngineEventKind::Start if self.state == PlaybackState::Paused => {}
            EngineEventKind::Start | EngineEventKind::Resume => {
                self.status = Status::speaking();
                self.enter(PlaybackState::Speaking);
            }
            EngineEventKind::Pause => {
                self.status = Status::paused();
                self.enter(PlaybackState::Paused);
            }
            EngineEventKind::End => {
                self.current = None;
                self.status = Status::ready();
                self.enter(PlaybackState::Idle);
            }
            EngineEventKind::Error(message) => {
                self.fail(format!("Speech synthesis error: {}", message))
            }
        }
    }

    /// Poll the engine and apply every pending notification
    pub fn drain_events(&mut self) -> usize {
        if let Err(e) = self.engine.poll() {
            warn!("Engine poll failed: {}", e);
        }

        let mut handled = 0;
        while let Ok(event) = self.events.try_recv() {
            self.handle_event(&event);
            handled += 1;
        }
        handled
    }

    /// Put the ready message back once an error has been shown long enough
    pub fn tick(&mut self, now: Instant) {
        let Some(deadline) = self.error_until else {
            return;
        };
        if now < deadline {
            return;
        }

        self.error_until = None;
        if self.state == PlaybackState::Idle && self.status.kind == StatusKind::Error {
            self.status = Status::ready();
        }
    }

    /// When the status line next needs attention
    pub fn next_deadline(&self) -> Option<Instant> {
        self.error_until
    }

    /// Visualizer frame, if one is due
    pub fn next_frame(&mut self, now: Instant) -> Option<Frame> {
        self.frames.poll(now, self.state)
    }

    pub fn frame_interval(&self) -> Duration {
        self.frames.interval()
    }

    fn enter(&mut self, state: PlaybackState) {
        if state != self.state {
            debug!("Playback {} -> {}", self.state, state);
        }
        self.state = state;

        if state == PlaybackState::Speaking {
            self.frames.start(Instant::now());
        } else {
            self.frames.stop();
        }
    }

    fn fail(&mut self, message: String) {
        error!("{}", message);
        self.current = None;
        self.enter(PlaybackState::Idle);
        self.show_error(message);
    }

    fn show_error(&mut self, message: impl Into<String>) {
        self.status = Status::error(message);
        self.error_until = Some(Instant::now() + self.error_display);
    }
}
