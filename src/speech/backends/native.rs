//! Native speech backend using the tts crate
//!
//! The `tts` crate gives one interface to:
//! - Speech Dispatcher on Linux
//! - AVFoundation on macOS/iOS
//! - WinRT/SAPI on Windows
//!
//! It has no pause primitive. Pausing stops the synthesizer and keeps the
//! request; resuming speaks that request again from the beginning.

use crate::speech::{
    EngineEvent, EngineEventKind, SpeechEngine, UtteranceId, UtteranceRequest,
};
use crate::voice::Voice;
use crate::{MaruError, Result};
use crossbeam_channel::{unbounded, Receiver, Sender};
use log::{debug, error, warn};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tts::Tts as TtsCrate;

/// No utterance in flight
const NO_UTTERANCE: u64 = 0;

/// How long a synthesizer may take to report speaking after `speak`
const START_GRACE: Duration = Duration::from_millis(500);

/// Whether a polled utterance has finished
///
/// `is_speaking` is `None` when the platform cannot report it; the
/// utterance then counts as finished at the first poll. A synthesizer that
/// never reported speaking is taken as done once the grace period passed,
/// since short utterances can end between two polls.
fn utterance_finished(is_speaking: Option<bool>, seen_speaking: bool, elapsed: Duration) -> bool {
    match is_speaking {
        None => true,
        Some(true) => false,
        Some(false) => seen_speaking || elapsed >= START_GRACE,
    }
}

/// Native TTS backend using the tts crate
pub struct NativeEngine {
    /// The tts crate's TTS instance
    tts: TtsCrate,

    /// Last id handed out
    next_id: u64,

    /// Utterance the platform callbacks report about
    current: Arc<AtomicU64>,

    /// Request kept for resuming after an emulated pause
    paused: Option<(UtteranceId, UtteranceRequest)>,

    /// Request being spoken, kept so pause can hold on to it
    speaking: Option<(UtteranceId, UtteranceRequest)>,

    /// Whether the platform reports utterance begin/end itself
    callbacks: bool,

    /// Whether `is_speaking` has been true for the current utterance
    seen_speaking: bool,

    /// When the current utterance was handed to the synthesizer
    started_at: Option<Instant>,

    sender: Sender<EngineEvent>,
    receiver: Receiver<EngineEvent>,
}

impl NativeEngine {
    /// Create a native engine on the platform's default synthesizer
    pub fn new() -> Result<Self> {
        debug!("Creating native TTS backend");

        let tts = TtsCrate::default()
            .map_err(|e| MaruError::Speech(format!("Failed to initialize TTS: {}", e)))?;
        let (sender, receiver) = unbounded();
        let current = Arc::new(AtomicU64::new(NO_UTTERANCE));

        let features = tts.supported_features();
        let callbacks = features.utterance_callbacks;
        if callbacks {
            Self::register_callbacks(&tts, &sender, &current)?;
        } else {
            warn!("Utterance callbacks not supported, polling for completion");
        }

        debug!("Native TTS backend created successfully");

        Ok(Self {
            tts,
            next_id: NO_UTTERANCE,
            current,
            paused: None,
            speaking: None,
            callbacks,
            seen_speaking: false,
            started_at: None,
            sender,
            receiver,
        })
    }

    fn register_callbacks(
        tts: &TtsCrate,
        sender: &Sender<EngineEvent>,
        current: &Arc<AtomicU64>,
    ) -> Result<()> {
        let begin_tx = sender.clone();
        let begin_current = Arc::clone(current);
        tts.on_utterance_begin(Some(Box::new(move |_| {
            let id = begin_current.load(Ordering::SeqCst);
            if id != NO_UTTERANCE {
                let _ = begin_tx.send(EngineEvent::new(UtteranceId(id), EngineEventKind::Start));
            }
        })))?;

        let end_tx = sender.clone();
        let end_current = Arc::clone(current);
        tts.on_utterance_end(Some(Box::new(move |_| {
            let id = end_current.load(Ordering::SeqCst);
            if id != NO_UTTERANCE {
                let _ = end_tx.send(EngineEvent::new(UtteranceId(id), EngineEventKind::End));
            }
        })))?;

        Ok(())
    }

    /// Map a request rate (1.0 = normal) onto the platform's rate scale
    fn convert_rate(&self, rate: f32) -> f32 {
        (self.tts.normal_rate() * rate).clamp(self.tts.min_rate(), self.tts.max_rate())
    }

    /// Map a request pitch (1.0 = normal) onto the platform's pitch scale
    fn convert_pitch(&self, pitch: f32) -> f32 {
        (self.tts.normal_pitch() * pitch).clamp(self.tts.min_pitch(), self.tts.max_pitch())
    }

    /// Map a request volume (0.0-1.0) onto the platform's volume scale
    fn convert_volume(&self, volume: f32) -> f32 {
        let (min, max) = (self.tts.min_volume(), self.tts.max_volume());
        min + (max - min) * volume
    }

    fn apply_parameters(&mut self, request: &UtteranceRequest) -> Result<()> {
        let features = self.tts.supported_features();

        if features.rate {
            let rate = self.convert_rate(request.rate);
            self.tts.set_rate(rate)?;
        }
        if features.pitch {
            let pitch = self.convert_pitch(request.pitch);
            self.tts.set_pitch(pitch)?;
        }
        if features.volume {
            let volume = self.convert_volume(request.volume);
            self.tts.set_volume(volume)?;
        }

        if let Some(wanted) = &request.voice {
            if features.voice {
                let voices = self.tts.voices()?;
                match voices.iter().find(|v| v.id() == wanted.id) {
                    Some(voice) => self.tts.set_voice(voice)?,
                    None => warn!("Voice {} no longer available", wanted.name),
                }
            }
        }

        Ok(())
    }

    fn start(&mut self, id: UtteranceId, request: &UtteranceRequest) -> Result<()> {
        self.apply_parameters(request)?;
        self.current.store(id.0, Ordering::SeqCst);
        self.seen_speaking = false;
        self.started_at = Some(Instant::now());

        debug!("Speaking utterance {:?}: {}", id, request.text);
        self.tts.speak(request.text.as_str(), true).map_err(|e| {
            error!("Failed to speak: {}", e);
            MaruError::Speech(format!("Speak failed: {}", e))
        })?;

        if !self.callbacks {
            self.emit(id, EngineEventKind::Start);
        }
        Ok(())
    }

    fn emit(&self, id: UtteranceId, kind: EngineEventKind) {
        let _ = self.sender.send(EngineEvent::new(id, kind));
    }
}

impl SpeechEngine for NativeEngine {
    fn speak(&mut self, request: &UtteranceRequest) -> Result<UtteranceId> {
        self.next_id += 1;
        let id = UtteranceId(self.next_id);
        self.paused = None;

        self.start(id, request)?;
        self.speaking = Some((id, request.clone()));
        Ok(id)
    }

    fn pause(&mut self) -> Result<()> {
        let Some(id) = self.speaking.as_ref().map(|(id, _)| *id) else {
            return Ok(());
        };

        debug!("Pausing utterance {:?}", id);
        // Keep callbacks for the stopped utterance from reporting an end
        self.current.store(NO_UTTERANCE, Ordering::SeqCst);
        if let Err(e) = self.tts.stop() {
            self.current.store(id.0, Ordering::SeqCst);
            return Err(MaruError::Speech(format!("Pause failed: {}", e)));
        }

        self.paused = self.speaking.take();
        self.emit(id, EngineEventKind::Pause);
        Ok(())
    }

    fn resume(&mut self) -> Result<()> {
        let Some((id, request)) = self.paused.take() else {
            return Ok(());
        };

        debug!("Resuming utterance {:?}", id);
        self.start(id, &request)?;
        self.speaking = Some((id, request));
        self.emit(id, EngineEventKind::Resume);
        Ok(())
    }

    fn cancel(&mut self) -> Result<()> {
        debug!("Canceling speech");
        self.current.store(NO_UTTERANCE, Ordering::SeqCst);
        self.paused = None;
        self.speaking = None;

        if self.tts.supported_features().stop {
            self.tts.stop().map_err(|e| {
                error!("Failed to cancel speech: {}", e);
                MaruError::Speech(format!("Cancel failed: {}", e))
            })?;
        }
        Ok(())
    }

    fn voices(&mut self) -> Result<Vec<Voice>> {
        let features = self.tts.supported_features();
        if !features.voice {
            return Ok(Vec::new());
        }

        let default_id = if features.get_voice {
            self.tts.voice()?.map(|v| v.id())
        } else {
            None
        };

        let voices = self
            .tts
            .voices()?
            .into_iter()
            .map(|v| Voice {
                is_default: default_id.as_deref() == Some(v.id().as_str()),
                id: v.id(),
                name: v.name(),
                lang: v.language().to_string(),
                is_local: true,
            })
            .collect();
        Ok(voices)
    }

    fn events(&self) -> Receiver<EngineEvent> {
        self.receiver.clone()
    }

    fn poll(&mut self) -> Result<()> {
        if self.callbacks {
            return Ok(());
        }
        let Some(id) = self.speaking.as_ref().map(|(id, _)| *id) else {
            return Ok(());
        };

        let is_speaking = if self.tts.supported_features().is_speaking {
            Some(self.tts.is_speaking()?)
        } else {
            None
        };
        if is_speaking == Some(true) {
            self.seen_speaking = true;
        }

        let elapsed = self.started_at.map_or(Duration::MAX, |t| t.elapsed());
        if utterance_finished(is_speaking, self.seen_speaking, elapsed) {
            debug!("Utterance {:?} finished", id);
            self.speaking = None;
            self.started_at = None;
            self.current.store(NO_UTTERANCE, Ordering::SeqCst);
            self.emit(id, EngineEventKind::End);
        }
        Ok(())
    }
}
