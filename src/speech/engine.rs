//! Speech engine abstraction
//!
//! The engine is an external service: it accepts utterance requests and
//! later reports what happened to them through `EngineEvent`s on a channel.
//! Nothing here assumes the notifications arrive in any particular order.

use super::utterance::{UtteranceId, UtteranceRequest};
use crate::voice::Voice;
use crate::Result;
use crossbeam_channel::Receiver;

/// What happened to an utterance
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEventKind {
    Start,
    End,
    Pause,
    Resume,
    Error(String),
}

/// Notification from the engine about one utterance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineEvent {
    pub utterance: UtteranceId,
    pub kind: EngineEventKind,
}

impl EngineEvent {
    pub fn new(utterance: UtteranceId, kind: EngineEventKind) -> Self {
        Self { utterance, kind }
    }
}

/// Speech engine interface
///
/// Backends wrap a platform synthesizer; tests use a fake that records
/// commands and emits synthetic events.
pub trait SpeechEngine {
    /// Start speaking a request, replacing anything in flight
    fn speak(&mut self, request: &UtteranceRequest) -> Result<UtteranceId>;

    /// Pause the current utterance
    fn pause(&mut self) -> Result<()>;

    /// Resume a paused utterance
    fn resume(&mut self) -> Result<()>;

    /// Drop the current utterance
    fn cancel(&mut self) -> Result<()>;

    /// Voices currently known to the host (may be empty while it loads them)
    fn voices(&mut self) -> Result<Vec<Voice>>;

    /// Receiver for engine notifications
    fn events(&self) -> Receiver<EngineEvent>;

    /// Give backends without completion callbacks a chance to report
    fn poll(&mut self) -> Result<()> {
        Ok(())
    }
}

impl<E: SpeechEngine + ?Sized> SpeechEngine for Box<E> {
    fn speak(&mut self, request: &UtteranceRequest) -> Result<UtteranceId> {
        (**self).speak(request)
    }

    fn pause(&mut self) -> Result<()> {
        (**self).pause()
    }

    fn resume(&mut self) -> Result<()> {
        (**self).resume()
    }

    fn cancel(&mut self) -> Result<()> {
        (**self).cancel()
    }

    fn voices(&mut self) -> Result<Vec<Voice>> {
        (**self).voices()
    }

    fn events(&self) -> Receiver<EngineEvent> {
        (**self).events()
    }

    fn poll(&mut self) -> Result<()> {
        (**self).poll()
    }
}
