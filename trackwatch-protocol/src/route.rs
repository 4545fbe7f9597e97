//! Request routing and command extraction

use heapless::Vec;
use trackwatch_core::state::{Command, CommandRequest, MAX_ECHO_LEN};

use crate::request::Request;

/// Where a request goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Dashboard page
    Dashboard,
    /// Status document
    Status,
    /// Button press, answered with the status document
    Act(Option<CommandRequest>),
    /// Unknown path, redirect to the dashboard
    Redirect,
}

/// Route a parsed request
pub fn route(request: &Request) -> Route {
    match request.path() {
        "/" => Route::Dashboard,
        "/data.json" => Route::Status,
        "/act" => Route::Act(request.query().and_then(parse_command)),
        _ => Route::Redirect,
    }
}

fn command_for(name: &str) -> Option<Command> {
    match name {
        "btn_fwd" => Some(Command::Forward),
        "btn_stop" => Some(Command::Stop),
        "btn_back" => Some(Command::Back),
        _ => None,
    }
}

/// Extract the button command from a query string
///
/// When several button parameters are present the last one wins.
/// The parameter value is percent-decoded and kept as echo text.
pub fn parse_command(query: &str) -> Option<CommandRequest> {
    let mut found = None;
    for pair in query.split('&') {
        let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
        if let Some(command) = command_for(name) {
            found = Some((command, value));
        }
    }

    let (command, value) = found?;
    let decoded: Vec<u8, MAX_ECHO_LEN> = percent_decode(value);
    let echo = core::str::from_utf8(&decoded).unwrap_or("");
    Some(CommandRequest::with_echo(command, echo))
}

/// Decode `+` and `%XX` escapes, truncating to the output capacity
///
/// A `%` not followed by two hex digits is kept as is.
fn percent_decode<const N: usize>(input: &str) -> Vec<u8, N> {
    let bytes = input.as_bytes();
    let mut out = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let byte = match bytes[i] {
            b'+' => b' ',
            b'%' if i + 2 < bytes.len() => {
                match (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                    (Some(hi), Some(lo)) => {
                        i += 2;
                        hi << 4 | lo
                    }
                    _ => b'%',
                }
            }
            b => b,
        };
        if out.push(byte).is_err() {
            break;
        }
        i += 1;
    }

    // Drop a multi-byte character cut by truncation
    if let Err(e) = core::str::from_utf8(&out) {
        if e.error_len().is_none() {
            out.truncate(e.valid_up_to());
        }
    }
    out
}

fn hex_value(digit: u8) -> Option<u8> {
    match digit {
        b'0'..=b'9' => Some(digit - b'0'),
        b'a'..=b'f' => Some(digit - b'a' + 10),
        b'A'..=b'F' => Some(digit - b'A' + 10),
        _ => None,
    }
}
