//! Line commands read from stdin.

use std::time::Duration;

use threshold_engine::threshold_gestures::Corner;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Tap,
    Activate,
    /// Pointer position relative to the knob center.
    Drag { x: f64, y: f64 },
    Release,
    Escape,
    Answer(String),
    Scroll { progress: f64, offset: f64 },
    Tilt(f64),
    /// Ask for device orientation access.
    AllowTilt,
    /// Double tap on one corner glyph.
    Corner(Corner),
    Swipe { from: f64, to: f64 },
    Close,
    Wait(Duration),
    Show,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("unknown command `{0}` (try `help`)")]
    Unknown(String),
    #[error("`{command}` expects {expected}")]
    Arguments {
        command: &'static str,
        expected: &'static str,
    },
}

pub const HELP: &str = "\
commands:
  tap                  tap the trigger target
  activate             press the activation control
  drag <x> <y>         drag the knob pointer (first drag starts the gesture)
  release              release the knob
  escape               close the overlay
  answer <text>        answer the question
  scroll <frac> <px>   scroll the public feed
  tilt <beta>          device front-back tilt in degrees
  allow-tilt           request orientation access
  corner <0-3>         double tap a corner glyph
  swipe <from> <to>    vertical swipe in pixels
  close                close the revealed layers
  wait <ms>            let time pass
  show                 print the scene
  quit";

fn number(arg: Option<&str>) -> Option<f64> {
    arg.and_then(|a| a.parse::<f64>().ok())
        .filter(|n| n.is_finite())
}

pub fn parse(line: &str) -> Result<Option<Command>, ParseError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (name, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();
    let mut args = rest.split_whitespace();

    let command = match name.to_ascii_lowercase().as_str() {
        "tap" => Command::Tap,
        "activate" => Command::Activate,
        "drag" => match (number(args.next()), number(args.next())) {
            (Some(x), Some(y)) => Command::Drag { x, y },
            _ => {
                return Err(ParseError::Arguments {
                    command: "drag",
                    expected: "two numbers",
                });
            }
        },
        "release" => Command::Release,
        "escape" | "esc" => Command::Escape,
        "answer" => Command::Answer(rest.to_string()),
        "scroll" => match (number(args.next()), number(args.next())) {
            (Some(progress), offset) => Command::Scroll {
                progress,
                offset: offset.unwrap_or(0.0),
            },
            _ => {
                return Err(ParseError::Arguments {
                    command: "scroll",
                    expected: "a fraction and an optional pixel offset",
                });
            }
        },
        "tilt" => match number(args.next()) {
            Some(beta) => Command::Tilt(beta),
            None => {
                return Err(ParseError::Arguments {
                    command: "tilt",
                    expected: "an angle in degrees",
                });
            }
        },
        "allow-tilt" => Command::AllowTilt,
        "corner" => match args
            .next()
            .and_then(|a| a.parse::<usize>().ok())
            .and_then(Corner::from_index)
        {
            Some(corner) => Command::Corner(corner),
            None => {
                return Err(ParseError::Arguments {
                    command: "corner",
                    expected: "an index from 0 to 3",
                });
            }
        },
        "swipe" => match (number(args.next()), number(args.next())) {
            (Some(from), Some(to)) => Command::Swipe { from, to },
            _ => {
                return Err(ParseError::Arguments {
                    command: "swipe",
                    expected: "start and end positions",
                });
            }
        },
        "close" => Command::Close,
        "wait" => match args.next().and_then(|a| a.parse::<u64>().ok()) {
            Some(ms) => Command::Wait(Duration::from_millis(ms)),
            None => {
                return Err(ParseError::Arguments {
                    command: "wait",
                    expected: "milliseconds",
                });
            }
        },
        "show" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(ParseError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}
