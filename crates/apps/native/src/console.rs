use std::io::{self, BufRead};
use std::thread;

use crossbeam_channel::{Receiver, unbounded};
use foundation::math::Vec2;
use layers::MapStyle;
use panel::UiInput;
use panel::ids;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommandError {
    #[error("unknown command: {0}")]
    Unknown(String),

    #[error("{command} expects {expected}")]
    Usage {
        command: &'static str,
        expected: &'static str,
    },

    #[error("{command}: not a number: {value}")]
    NotANumber { command: &'static str, value: String },
}

/// One line typed at the console.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Inputs replayed into the panel in order.
    Inputs(Vec<UiInput>),
    Status,
    Quit,
}

pub const HELP: &str = "commands: play | start | stop | style <outdoors|satellite|dark|url> | \
speed <0-10> | volume <0-100> | flight on|off | autopilot on|off | compass on|off | \
knob <dx> <dy> | zen | esc | refresh | status | quit";

/// Parses a console line. Blank lines yield `Ok(None)`.
///
/// `knob_center` is where the heading knob sits on the virtual screen; a
/// `knob` command presses the pointer at that point plus the given offset.
pub fn parse_command(line: &str, knob_center: Vec2) -> Result<Option<Command>, CommandError> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = words.collect();

    let single = |input: UiInput| Ok(Some(Command::Inputs(vec![input])));

    match head.to_ascii_lowercase().as_str() {
        "play" => single(UiInput::click(ids::PLAY_BTN)),
        "start" => single(UiInput::click(ids::START_OVERLAY)),
        "stop" => single(UiInput::click(ids::STOP_BTN)),
        "zen" => single(UiInput::click(ids::ZEN_MODE_BTN)),
        "esc" => single(UiInput::key("Escape")),
        "refresh" => single(UiInput::click(ids::REFRESH_BTN)),
        "status" => Ok(Some(Command::Status)),
        "quit" | "exit" => Ok(Some(Command::Quit)),
        "style" => {
            let [name] = args[..] else {
                return Err(CommandError::Usage {
                    command: "style",
                    expected: "one style name",
                });
            };
            single(UiInput::change(ids::MAP_STYLE, style_url(name)))
        }
        "speed" => {
            let value = number_arg("speed", &args)?;
            single(UiInput::input(ids::FLY_SPEED, value))
        }
        "volume" => {
            let value = number_arg("volume", &args)?;
            single(UiInput::input(ids::MASTER_VOLUME, value))
        }
        "flight" => single(UiInput::toggle(ids::FLIGHT_TOGGLE, on_off("flight", &args)?)),
        "autopilot" => single(UiInput::toggle(
            ids::AUTOPILOT_TOGGLE,
            on_off("autopilot", &args)?,
        )),
        "compass" => single(UiInput::toggle(
            ids::COMPASS_TOGGLE,
            on_off("compass", &args)?,
        )),
        "knob" => {
            let [dx, dy] = args[..] else {
                return Err(CommandError::Usage {
                    command: "knob",
                    expected: "<dx> <dy>",
                });
            };
            let dx = parse_number("knob", dx)?;
            let dy = parse_number("knob", dy)?;
            Ok(Some(Command::Inputs(vec![
                UiInput::PointerDown {
                    target: Some(ids::HEADING_KNOB.to_string()),
                    x: knob_center.x + dx,
                    y: knob_center.y + dy,
                },
                UiInput::PointerUp,
            ])))
        }
        _ => Err(CommandError::Unknown(head.to_string())),
    }
}

pub fn style_url(name: &str) -> String {
    match name.to_ascii_lowercase().as_str() {
        "outdoors" => MapStyle::OUTDOORS.to_string(),
        "satellite" => MapStyle::SATELLITE.to_string(),
        "dark" => MapStyle::DARK.to_string(),
        _ => name.to_string(),
    }
}

fn parse_number(command: &'static str, value: &str) -> Result<f64, CommandError> {
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| CommandError::NotANumber {
            command,
            value: value.to_string(),
        })
}

/// The slider value as typed, after checking it is numeric.
fn number_arg(command: &'static str, args: &[&str]) -> Result<String, CommandError> {
    let [value] = args[..] else {
        return Err(CommandError::Usage {
            command,
            expected: "one number",
        });
    };
    parse_number(command, value)?;
    Ok(value.to_string())
}

fn on_off(command: &'static str, args: &[&str]) -> Result<bool, CommandError> {
    match args {
        ["on"] => Ok(true),
        ["off"] => Ok(false),
        _ => Err(CommandError::Usage {
            command,
            expected: "on|off",
        }),
    }
}

/// Reads stdin on a background thread and forwards parsed commands.
///
/// Parse errors are logged and skipped. The channel closes when stdin does.
pub fn spawn_stdin(knob_center: Vec2) -> Receiver<Command> {
    let (tx, rx) = unbounded();
    thread::Builder::new()
        .name("console".into())
        .spawn(move || {
            let stdin = io::stdin();
            for line in stdin.lock().lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(err) => {
                        warn!("console read failed: {err}");
                        break;
                    }
                };
                match parse_command(&line, knob_center) {
                    Ok(Some(cmd)) => {
                        if tx.send(cmd).is_err() {
                            break;
                        }
                    }
                    Ok(None) => {}
                    Err(err) => warn!("{err}; {HELP}"),
                }
            }
            debug!("console closed");
        })
        .map_err(|err| warn!("console thread failed to start: {err}"))
        .ok();
    rx
}
