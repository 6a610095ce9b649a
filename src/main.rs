//! maru-tts main entry point
//!
//! Speaks the text given on the command line (or piped on stdin). From an
//! interactive terminal it stays open with playback shortcuts:
//! Ctrl+J play, Ctrl+Space pause/resume, Esc stop, q quit.

use anyhow::{bail, Context};
use log::{debug, error, info, warn};
use maru_tts::app::config::Config;
use maru_tts::app::AppContext;
use maru_tts::input::{action_for_input, create_default_keymap};
use maru_tts::playback::{PlaybackState, StatusKind};
use maru_tts::speech::{create_engine, SpeechEngine};
use maru_tts::terminal::{
    get_terminal_size, is_tty, pad_to_width, restore_termios, set_raw_mode, status_line,
};
use maru_tts::voice::{infer_gender, voice_label, GenderFilter};
use mio::{Events, Interest, Poll, Token};
use nix::libc;
use serde::Serialize;
use std::io::{self, Read, Write};
use std::os::unix::io::{AsRawFd, RawFd};
use std::process;
use std::time::{Duration, Instant};

/// Token for stdin in mio poll
const STDIN: Token = Token(0);

/// Longest the event loop sleeps without checking the engine
const MAX_WAIT: Duration = Duration::from_millis(100);

const USAGE: &str = "Usage: maru-tts [--debug] [--list-voices [--json]] [--lang TAG|auto]
                [--gender all|female|male|unknown] [--voice NAME]
                [--rate F] [--pitch F] [--volume 0-100] [TEXT...]";

/// Command line options
#[derive(Debug, Default)]
struct Options {
    debug: bool,
    list_voices: bool,
    json: bool,
    lang: Option<String>,
    gender: Option<String>,
    voice: Option<String>,
    rate: Option<String>,
    pitch: Option<String>,
    volume: Option<String>,
    text: Vec<String>,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> anyhow::Result<Options> {
    let mut opts = Options::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        let mut value = |name: &str| {
            args.next()
                .with_context(|| format!("{} needs a value\n{}", name, USAGE))
        };
        match arg.as_str() {
            "--debug" | "-d" => opts.debug = true,
            "--list-voices" => opts.list_voices = true,
            "--json" => opts.json = true,
            "--lang" => opts.lang = Some(value("--lang")?),
            "--gender" => opts.gender = Some(value("--gender")?),
            "--voice" => opts.voice = Some(value("--voice")?),
            "--rate" => opts.rate = Some(value("--rate")?),
            "--pitch" => opts.pitch = Some(value("--pitch")?),
            "--volume" => opts.volume = Some(value("--volume")?),
            "--help" | "-h" => {
                println!("{}", USAGE);
                process::exit(0);
            }
            "--" => {
                opts.text.extend(args.by_ref());
            }
            other if other.starts_with("--") => bail!("Unknown option {}\n{}", other, USAGE),
            _ => opts.text.push(arg),
        }
    }

    Ok(opts)
}

fn main() {
    let opts = match parse_args(std::env::args().skip(1)) {
        Ok(opts) => opts,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(2);
        }
    };

    // Initialize logger
    if opts.debug {
        // Debug mode: write to maru-tts.log
        use std::fs::OpenOptions;
        match OpenOptions::new()
            .create(true)
            .append(true)
            .open("maru-tts.log")
        {
            Ok(log_file) => {
                env_logger::Builder::new()
                    .filter_level(log::LevelFilter::Debug)
                    .target(env_logger::Target::Pipe(Box::new(log_file)))
                    .init();
            }
            Err(e) => {
                eprintln!("Warning: Failed to open maru-tts.log for debug logging: {}", e);
                env_logger::Builder::new()
                    .filter_level(log::LevelFilter::Warn)
                    .init();
            }
        }

        info!(
            "maru-tts version {} starting (debug mode, logging to maru-tts.log)",
            maru_tts::VERSION
        );
    } else {
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Error)
            .parse_default_env()
            .init();
    }

    if let Err(e) = run(opts) {
        error!("Fatal error: {:#}", e);
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run(opts: Options) -> anyhow::Result<()> {
    let mut config = Config::load().context("Failed to load configuration")?;
    info!("Configuration loaded from {:?}", config.path());
    apply_overrides(&mut config, &opts)?;

    let engine = create_engine()?;
    let mut app = AppContext::new(engine, &config);

    if opts.list_voices {
        wait_for_voices(&mut app);
        return list_voices(&app, opts.json);
    }

    let stdin_fd = io::stdin().as_raw_fd();
    let interactive = is_tty(stdin_fd);

    let text = if !opts.text.is_empty() {
        opts.text.join(" ")
    } else if !interactive {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read text from stdin")?;
        text
    } else {
        bail!("No text given\n{}", USAGE);
    };
    app.set_text(&text);

    if interactive {
        run_interactive(&mut app, stdin_fd, config.visualizer())
    } else {
        speak_once(&mut app)
    }
}

/// Fold command line overrides into the loaded configuration
///
/// Overrides are only kept in memory; the file is left as it was.
fn apply_overrides(config: &mut Config, opts: &Options) -> anyhow::Result<()> {
    if let Some(gender) = &opts.gender {
        if GenderFilter::parse(gender).is_none() {
            bail!("Unknown gender filter {:?}\n{}", gender, USAGE);
        }
    }

    let numeric = [
        ("rate", &opts.rate),
        ("pitch", &opts.pitch),
        ("volume", &opts.volume),
    ];
    for (key, value) in numeric {
        if let Some(value) = value {
            value
                .parse::<f32>()
                .with_context(|| format!("--{} expects a number, got {:?}", key, value))?;
        }
    }

    let overrides = [
        ("language", &opts.lang),
        ("gender", &opts.gender),
        ("voice", &opts.voice),
        ("rate", &opts.rate),
        ("pitch", &opts.pitch),
        ("volume", &opts.volume),
    ];
    for (key, value) in overrides {
        if let Some(value) = value {
            debug!("Override speech.{} = {}", key, value);
            config.set("speech", key, value);
        }
    }
    Ok(())
}

/// Tick until the host has reported voices or retries ran out
fn wait_for_voices<E: SpeechEngine>(app: &mut AppContext<E>) {
    while app.voices_pending() {
        let now = Instant::now();
        let wait = app.time_until_next_tick(now).unwrap_or(MAX_WAIT);
        std::thread::sleep(wait);
        app.tick(Instant::now());
    }
}

#[derive(Serialize)]
struct VoiceListing<'a> {
    #[serde(flatten)]
    voice: &'a maru_tts::voice::Voice,
    gender: maru_tts::voice::Gender,
    selected: bool,
}

fn list_voices<E: SpeechEngine>(app: &AppContext<E>, json: bool) -> anyhow::Result<()> {
    let selected = app.selected_index();

    if json {
        let listing: Vec<VoiceListing> = app
            .ranked_voices()
            .iter()
            .enumerate()
            .map(|(i, voice)| VoiceListing {
                voice,
                gender: infer_gender(&voice.name, &voice.lang),
                selected: selected == Some(i),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    if app.ranked_voices().is_empty() {
        println!("No voices available");
    }
    for (i, voice) in app.ranked_voices().iter().enumerate() {
        let marker = if selected == Some(i) { '>' } else { ' ' };
        println!("{} {:3} {}", marker, i, voice_label(voice));
    }
    Ok(())
}

/// Speak the text and return once playback is idle again
fn speak_once<E: SpeechEngine>(app: &mut AppContext<E>) -> anyhow::Result<()> {
    wait_for_voices(app);
    app.play()?;

    while app.playback().state() != PlaybackState::Idle {
        std::thread::sleep(app.playback().frame_interval().min(MAX_WAIT));
        app.drain_engine_events();
        app.tick(Instant::now());
    }

    let status = app.playback().status();
    if status.kind == StatusKind::Error {
        bail!("{}", status.message);
    }
    Ok(())
}

/// Interactive session with playback shortcuts
fn run_interactive<E: SpeechEngine>(
    app: &mut AppContext<E>,
    stdin_fd: RawFd,
    visualizer: bool,
) -> anyhow::Result<()> {
    let keymap = create_default_keymap();
    info!("Key handler initialized with {} bindings", keymap.len());

    let original_termios = set_raw_mode(stdin_fd)?;
    let _guard = TermiosGuard {
        fd: stdin_fd,
        termios: original_termios,
    };

    let mut poll = Poll::new()?;
    let mut events = Events::with_capacity(16);
    let mut stdin_source = mio::unix::SourceFd(&stdin_fd);
    poll.registry()
        .register(&mut stdin_source, STDIN, Interest::READABLE)?;

    let mut out = io::stdout();
    write!(
        out,
        "{}\r\nCtrl+J play | Ctrl+Space pause/resume | Esc stop | q quit\r\n",
        app.detected_language_label()
    )?;

    let mut wave = String::new();
    let mut running = true;

    while running {
        let now = Instant::now();
        let mut timeout = app.time_until_next_tick(now).unwrap_or(MAX_WAIT).min(MAX_WAIT);
        if app.playback().state() != PlaybackState::Idle {
            timeout = timeout.min(app.playback().frame_interval());
        }

        if let Err(e) = poll.poll(&mut events, Some(timeout)) {
            if e.kind() != io::ErrorKind::Interrupted {
                return Err(e.into());
            }
        }

        for event in events.iter() {
            if event.token() != STDIN {
                continue;
            }
            let mut buf = [0u8; 64];
            let n = io::stdin().read(&mut buf)?;
            if n == 0 {
                running = false;
                break;
            }

            if let Some(action) = action_for_input(&keymap, &buf[..n]) {
                debug!("Shortcut {:?}", action);
                match app.apply_shortcut(action) {
                    Ok(keep_going) => running = keep_going,
                    // Already on the status line
                    Err(e) => warn!("{}", e),
                }
            }
        }

        app.drain_engine_events();
        let now = Instant::now();
        app.tick(now);

        let (cols, _) = get_terminal_size(stdin_fd)?;
        let cols = usize::from(cols);

        if visualizer {
            if let Some(frame) = app.playback_mut().next_frame(now) {
                wave = frame.render(cols);
            } else if app.playback().state() != PlaybackState::Speaking {
                wave = maru_tts::playback::visualizer::idle_line(cols);
            }
        }

        let line = status_line(
            app.playback().status(),
            &app.playback().controls(),
            &app.char_count_label(),
        );
        write!(out, "\r\x1b[K{}", pad_to_width(&line, cols.saturating_sub(1)))?;
        if visualizer {
            write!(out, "\r\n\x1b[K{}\x1b[1A\r", wave)?;
        }
        out.flush()?;
    }

    write!(out, "\r\n\r\n")?;
    out.flush()?;
    Ok(())
}

/// RAII guard to restore terminal on exit
struct TermiosGuard {
    fd: RawFd,
    termios: libc::termios,
}

impl Drop for TermiosGuard {
    fn drop(&mut self) {
        restore_termios(self.fd, &self.termios);
        debug!("Terminal attributes restored");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_args() {
        let opts = parse_args(args(&["--lang", "en-US", "--rate", "1.5", "hello", "world"])).unwrap();
        assert_eq!(opts.lang.as_deref(), Some("en-US"));
        assert_eq!(opts.rate.as_deref(), Some("1.5"));
        assert_eq!(opts.text, vec!["hello", "world"]);

        let opts = parse_args(args(&["--", "--not-a-flag"])).unwrap();
        assert_eq!(opts.text, vec!["--not-a-flag"]);

        assert!(parse_args(args(&["--voice"])).is_err());
        assert!(parse_args(args(&["--bogus"])).is_err());
    }

    #[test]
    fn test_overrides_validated() {
        let mut config = Config::in_memory();
        let opts = Options {
            rate: Some("fast".to_string()),
            ..Default::default()
        };
        assert!(apply_overrides(&mut config, &opts).is_err());

        let opts = Options {
            rate: Some("2".to_string()),
            gender: Some("male".to_string()),
            ..Default::default()
        };
        apply_overrides(&mut config, &opts).unwrap();
        assert_eq!(config.rate(), 2.0);
        assert_eq!(config.gender(), GenderFilter::Only(maru_tts::voice::Gender::Male));
    }
}
