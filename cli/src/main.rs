//! Threshold CLI - line-driven host for the unlock sequence.
//!
//! # Architecture
//!
//! The binary plays the part of the page that embeds the unlock core: it
//! turns stdin lines into controller input, performs host effects by
//! printing them, and renders the resulting [`Scene`](threshold_engine::Scene)
//! as text.
//!
//! ```text
//! stdin line -> command::parse -> Session::input -> Controller
//!                                      |
//!                                      v
//!              pump results -> render::effect / render::scene -> stdout
//! ```
//!
//! Logs go to `~/.threshold/logs/threshold.log`, never to the terminal.

mod command;
mod render;

use anyhow::{Context, Result};
use std::{
    fs::{self, OpenOptions},
    path::PathBuf,
    sync::Mutex,
};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use threshold_engine::threshold_gestures::{
    OrientationPlatform, OrientationSupport, PermissionResponse, Point, UserGesture,
};
use threshold_engine::threshold_providers::{ContentSource, Evaluator, RemoteJudge};
use threshold_engine::threshold_types::RevealLayer;
use threshold_engine::{Controller, RandomPicker, Session, SystemClock, ThresholdConfig};

use command::{Command, HELP};

type CliSession = Session<RemoteJudge, ContentSource, SystemClock, RandomPicker>;

/// Knob center in the coordinates `drag` takes.
const KNOB_CENTER: Point = Point::new(0.0, 0.0);

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let (log_file, init_warnings) = open_log_file();

    if let Some((log_path, file)) = log_file {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .with(env_filter)
            .init();

        tracing::info!(path = %log_path.display(), "Logging initialized");
        for warning in init_warnings {
            tracing::warn!("{warning}");
        }
        return;
    }

    // No log file: stay silent rather than interleave logs with the scene.
    tracing_subscriber::registry().with(env_filter).init();
}

fn open_log_file() -> (Option<(PathBuf, std::fs::File)>, Vec<String>) {
    let mut warnings = Vec::new();

    for candidate in log_file_candidates() {
        if let Some(parent) = candidate.parent()
            && let Err(e) = fs::create_dir_all(parent)
        {
            warnings.push(format!(
                "Failed to create log dir {}: {e}",
                parent.display()
            ));
            continue;
        }

        match OpenOptions::new()
            .create(true)
            .append(true)
            .open(&candidate)
        {
            Ok(file) => return (Some((candidate, file)), warnings),
            Err(e) => {
                warnings.push(format!(
                    "Failed to open log file {}: {e}",
                    candidate.display()
                ));
            }
        }
    }

    (None, warnings)
}

fn log_file_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    // Primary: ~/.threshold/logs/threshold.log
    if let Some(config_path) = ThresholdConfig::path()
        && let Some(config_dir) = config_path.parent()
    {
        candidates.push(config_dir.join("logs").join("threshold.log"));
    }

    // Fallback: ./.threshold/logs/threshold.log
    candidates.push(PathBuf::from(".threshold").join("logs").join("threshold.log"));

    candidates
}

/// A terminal has no motion sensors to guard; access is granted on request.
struct TerminalPlatform {
    support: OrientationSupport,
}

impl OrientationPlatform for TerminalPlatform {
    fn support(&self) -> OrientationSupport {
        self.support
    }

    fn request_permission(&mut self) -> PermissionResponse {
        PermissionResponse::Granted
    }
}

fn build_session(config: &ThresholdConfig) -> Result<CliSession> {
    let judge = config.judge().context("invalid [judge] configuration")?;
    let store = config
        .content_source()
        .context("invalid [content] configuration")?;
    let evaluator = Evaluator::new(judge).with_timeout(config.evaluation_timeout());
    let controller = Controller::new(config.unlock.clone(), config.orientation_support());
    Ok(Session::new(controller, evaluator, store, SystemClock::new()))
}

/// Apply one command. Returns a note for the user, if any.
async fn execute(
    session: &mut CliSession,
    platform: &mut TerminalPlatform,
    command: Command,
) -> Option<String> {
    match command {
        Command::Tap => session.input(Controller::tap),
        Command::Activate => session.input(Controller::activate),
        Command::Drag { x, y } => {
            let pointer = Point::new(x, y);
            session.input(|c, now| {
                if c.is_dragging() {
                    c.drag_to(pointer, KNOB_CENTER, now);
                } else {
                    c.begin_drag(pointer, KNOB_CENTER, now);
                }
            });
        }
        Command::Release => session.input(Controller::release),
        Command::Escape => session.input(Controller::escape),
        Command::Answer(text) => {
            if let Err(rejected) = session.input(|c, now| c.submit_answer(&text, now)) {
                return Some(format!("answer not accepted: {rejected}"));
            }
            if let Some(evaluation) = session.wait_for_evaluation().await {
                tracing::debug!(?evaluation, "Answer evaluated");
            }
        }
        Command::Scroll { progress, offset } => {
            session.input(|c, now| c.scroll(progress, offset, now));
        }
        Command::Tilt(beta) => session.input(|c, now| c.tilt_sample(beta, now)),
        Command::AllowTilt => {
            let listening = session.input(|c, _| {
                c.request_orientation_permission(UserGesture::witnessed(), platform)
            });
            if !listening {
                return Some("device orientation is unavailable".to_string());
            }
        }
        Command::Corner(corner) => session.input(|c, now| {
            c.corner_tap(corner, now);
            c.corner_tap(corner, now);
        }),
        Command::Swipe { from, to } => session.input(|c, now| {
            c.swipe_start(from, now);
            c.swipe_move(to, now);
            c.swipe_release(now);
        }),
        Command::Close => session.input(Controller::close),
        Command::Wait(duration) => {
            tokio::time::sleep(duration).await;
            session.tick();
        }
        Command::Show | Command::Help | Command::Quit => {}
    }
    None
}

async fn run(session: &mut CliSession, platform: &mut TerminalPlatform) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    stdout
        .write_all(b"threshold: type `help` for commands\n")
        .await?;
    stdout.flush().await?;

    while let Some(line) = lines.next_line().await? {
        session.tick();
        session.pump();

        let mut out = String::new();
        match command::parse(&line) {
            Ok(None) => continue,
            Ok(Some(Command::Quit)) => break,
            Ok(Some(Command::Help)) => {
                out.push_str(HELP);
                out.push('\n');
            }
            Ok(Some(command)) => {
                if let Some(note) = execute(session, platform, command).await {
                    out.push_str(&note);
                    out.push('\n');
                }
                session.pump();
                for effect in session.take_host_effects() {
                    if let Some(text) = render::effect(&effect) {
                        out.push_str(&text);
                        out.push('\n');
                    }
                }
                out.push_str(&render::scene(&session.scene(), |layer| {
                    session.content(layer)
                }));
            }
            Err(e) => {
                out.push_str(&e.to_string());
                out.push('\n');
            }
        }

        stdout.write_all(out.as_bytes()).await?;
        stdout.flush().await?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = ThresholdConfig::load()
        .context("failed to load config")?
        .unwrap_or_default();
    let mut session = build_session(&config)?;
    session.load(RevealLayer::Public);

    let mut platform = TerminalPlatform {
        support: config.orientation_support(),
    };
    let result = run(&mut session, &mut platform).await;
    session.shutdown();
    result
}
