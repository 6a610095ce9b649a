//! Application context
//!
//! `AppContext` owns everything one session needs: the text being edited,
//! the language and voice choices, the host's voice list and the playback
//! controller wrapping the speech engine. Front-ends drive it through
//! methods and never reach for global state.

pub mod config;

use crate::input::ShortcutAction;
use crate::language::{detect_language, language_display_name, LanguageMode};
use crate::playback::PlaybackController;
use crate::speech::{SpeechEngine, SpeechParams, UtteranceRequest};
use crate::text::{char_count_label, LengthLevel};
use crate::voice::{rank_voices, select_preferred_voice, GenderFilter, Voice};
use crate::{MaruError, Result};
use config::Config;
use log::{debug, info, warn};
use std::time::{Duration, Instant};

/// Polls the host for its voice list until it has one
#[derive(Debug)]
struct VoiceRetry {
    delay: Duration,
    attempts_left: u32,
    next_at: Option<Instant>,
}

/// State of one text-to-speech session
pub struct AppContext<E: SpeechEngine> {
    text: String,
    language_mode: LanguageMode,
    /// Last language detected from the text, when in auto mode
    detected: Option<&'static str>,
    gender: GenderFilter,
    params: SpeechParams,

    /// Every voice the host reported
    voices: Vec<Voice>,
    /// Voices offered for the current language and gender
    ranked: Vec<Voice>,
    /// Index into `ranked`
    selected: Option<usize>,
    /// Voice the user picked by name; kept across re-ranking
    chosen_name: Option<String>,

    voice_retry: VoiceRetry,
    playback: PlaybackController<E>,
}

impl<E: SpeechEngine> AppContext<E> {
    /// Create a session around `engine` with settings from `config`
    pub fn new(engine: E, config: &Config) -> Self {
        let playback = PlaybackController::new(engine)
            .with_error_display(config.error_display())
            .with_frame_interval(config.frame_interval());

        let mut app = Self {
            text: String::new(),
            language_mode: config.language(),
            detected: None,
            gender: config.gender(),
            params: config.speech_params(),
            voices: Vec::new(),
            ranked: Vec::new(),
            selected: None,
            chosen_name: config.voice(),
            voice_retry: VoiceRetry {
                delay: config.voice_retry_delay(),
                attempts_left: config.voice_retry_attempts(),
                next_at: None,
            },
            playback,
        };

        app.refresh_voices(Instant::now());
        app
    }

    // Text

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the text, re-detecting its language in auto mode
    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_string();

        if self.language_mode != LanguageMode::Auto {
            return;
        }

        let detected = if self.text.trim().is_empty() {
            None
        } else {
            Some(detect_language(&self.text))
        };

        if detected != self.detected {
            debug!("Detected language changed to {:?}", detected);
            self.detected = detected;
            self.rerank();
        }
    }

    /// Length of the text in characters
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    pub fn length_level(&self) -> LengthLevel {
        LengthLevel::for_len(self.char_count())
    }

    pub fn char_count_label(&self) -> String {
        char_count_label(self.char_count())
    }

    // Language

    pub fn language_mode(&self) -> &LanguageMode {
        &self.language_mode
    }

    pub fn set_language_mode(&mut self, mode: LanguageMode) {
        self.language_mode = mode;
        self.detected = match self.language_mode {
            LanguageMode::Auto if !self.text.trim().is_empty() => Some(detect_language(&self.text)),
            _ => None,
        };
        self.rerank();
    }

    /// Language voices are filtered by; `None` offers all voices
    pub fn filter_language(&self) -> Option<&str> {
        match &self.language_mode {
            LanguageMode::Fixed(tag) => Some(tag.as_str()),
            LanguageMode::Auto => self.detected,
        }
    }

    /// Language the next utterance is tagged with
    pub fn speech_language(&self) -> String {
        match &self.language_mode {
            LanguageMode::Fixed(tag) => tag.clone(),
            LanguageMode::Auto => detect_language(&self.text).to_string(),
        }
    }

    /// Label such as "Detected: Japanese", empty unless auto-detecting
    pub fn detected_language_label(&self) -> String {
        match (&self.language_mode, self.detected) {
            (LanguageMode::Auto, Some(tag)) => {
                format!("Detected: {}", language_display_name(tag))
            }
            _ => String::new(),
        }
    }

    // Voices

    pub fn gender_filter(&self) -> GenderFilter {
        self.gender
    }

    pub fn set_gender_filter(&mut self, gender: GenderFilter) {
        self.gender = gender;
        self.rerank();
    }

    /// Every voice the host reported
    pub fn voices(&self) -> &[Voice] {
        &self.voices
    }

    /// Voices offered for the current language and gender, best first
    pub fn ranked_voices(&self) -> &[Voice] {
        &self.ranked
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_voice(&self) -> Option<&Voice> {
        self.selected.and_then(|i| self.ranked.get(i))
    }

    /// Select an entry of `ranked_voices`
    pub fn select_voice(&mut self, index: usize) -> Result<()> {
        let voice = self.ranked.get(index).ok_or_else(|| {
            MaruError::Other(format!(
                "Voice index {} out of range (have {} voices)",
                index,
                self.ranked.len()
            ))
        })?;
        debug!("Selected voice {}", voice.name);
        self.chosen_name = Some(voice.name.clone());
        self.selected = Some(index);
        Ok(())
    }

    /// Select a voice by name; returns whether it is currently offered
    pub fn select_voice_by_name(&mut self, name: &str) -> bool {
        self.chosen_name = Some(name.to_string());
        match self.ranked.iter().position(|v| v.name == name) {
            Some(index) => {
                self.selected = Some(index);
                true
            }
            None => false,
        }
    }

    /// Ask the host for its voices; schedules a retry if it has none yet
    pub fn refresh_voices(&mut self, now: Instant) -> bool {
        let voices = match self.playback.engine_mut().voices() {
            Ok(voices) => voices,
            Err(e) => {
                warn!("Failed to list voices: {}", e);
                Vec::new()
            }
        };

        if voices.is_empty() {
            if self.voice_retry.attempts_left > 0 {
                self.voice_retry.attempts_left -= 1;
                self.voice_retry.next_at = Some(now + self.voice_retry.delay);
                debug!(
                    "No voices yet, retrying in {:?} ({} attempts left)",
                    self.voice_retry.delay, self.voice_retry.attempts_left
                );
            } else {
                self.voice_retry.next_at = None;
                warn!("Host reported no voices; speaking with its default voice");
            }
            return false;
        }

        info!("Loaded {} voices", voices.len());
        self.voice_retry.next_at = None;
        self.voices = voices;
        self.rerank();
        true
    }

    /// Whether a voice list retry is scheduled
    pub fn voices_pending(&self) -> bool {
        self.voice_retry.next_at.is_some()
    }

    fn rerank(&mut self) {
        self.ranked = rank_voices(&self.voices, self.filter_language(), self.gender);

        let chosen = self
            .chosen_name
            .as_deref()
            .and_then(|name| self.ranked.iter().position(|v| v.name == name));

        self.selected = match chosen {
            Some(index) => Some(index),
            None if self.ranked.is_empty() => None,
            None => Some(select_preferred_voice(&self.ranked, &self.speech_language())),
        };
        debug!(
            "Ranked {} voices, selected {:?}",
            self.ranked.len(),
            self.selected_voice().map(|v| v.name.as_str())
        );
    }

    // Speech parameters

    pub fn params(&self) -> SpeechParams {
        self.params
    }

    pub fn set_params(&mut self, params: SpeechParams) {
        self.params = params;
    }

    // Playback

    pub fn playback(&self) -> &PlaybackController<E> {
        &self.playback
    }

    pub fn playback_mut(&mut self) -> &mut PlaybackController<E> {
        &mut self.playback
    }

    /// Speak the current text, or resume if paused
    pub fn play(&mut self) -> Result<()> {
        let lang = self.speech_language();
        let params = self.params;
        let text = &self.text;
        let voice = self.selected.and_then(|i| self.ranked.get(i));

        self.playback
            .play(|| UtteranceRequest::build(text, voice, &lang, params))
    }

    pub fn pause(&mut self) -> Result<()> {
        self.playback.pause()
    }

    pub fn stop(&mut self) -> Result<()> {
        self.playback.stop()
    }

    pub fn toggle(&mut self) -> Result<()> {
        self.playback.toggle()
    }

    /// Run a shortcut; returns false when it asks to quit
    pub fn apply_shortcut(&mut self, action: ShortcutAction) -> Result<bool> {
        match action {
            ShortcutAction::Play => self.play()?,
            ShortcutAction::TogglePause => self.toggle()?,
            ShortcutAction::Stop => self.stop()?,
            ShortcutAction::Quit => {
                self.stop()?;
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Apply pending engine notifications
    pub fn drain_engine_events(&mut self) -> usize {
        self.playback.drain_events()
    }

    /// Run timed work: voice list retries and status line expiry
    pub fn tick(&mut self, now: Instant) {
        if let Some(at) = self.voice_retry.next_at {
            if now >= at {
                self.refresh_voices(now);
            }
        }
        self.playback.tick(now);
    }

    /// Time until `tick` has something to do
    pub fn time_until_next_tick(&self, now: Instant) -> Option<Duration> {
        [self.voice_retry.next_at, self.playback.next_deadline()]
            .into_iter()
            .flatten()
            .min()
            .map(|at| at.saturating_duration_since(now))
    }
}
