//! Line-based parser for the monitor configuration file
//!
//! Handles the small TOML subset used by `monitor.toml`:
//!
//! - `[section]` headers (`timing`, `severity`, `access_point`, `pins`)
//! - `key = value` with strings, integers, booleans and two-element arrays
//! - `#` comments, whole-line or trailing
//!
//! Keys that are not set keep their defaults. Unknown sections and keys
//! are rejected so typos do not silently fall back to defaults.

use heapless::String;

use super::types::{ConfigError, MonitorConfig, PinConfig};
use crate::safety::PercentBand;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Timing,
    Severity,
    AccessPoint,
    Pins,
}

/// Parse configuration text, starting from defaults
pub fn parse_config(input: &str) -> Result<MonitorConfig, ConfigError> {
    let mut config = MonitorConfig::default();
    let mut section = Section::Root;

    for (index, line) in input.lines().enumerate() {
        let line_no = (index + 1).min(u16::MAX as usize) as u16;
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') {
            let header = strip_comment(line);
            if !header.ends_with(']') {
                return Err(ConfigError::Syntax { line: line_no });
            }
            section = parse_section_header(&header[1..header.len() - 1])
                .ok_or(ConfigError::UnknownSection { line: line_no })?;
            continue;
        }

        let (key, value) =
            parse_key_value(line).ok_or(ConfigError::Syntax { line: line_no })?;
        apply_value(section, key, value, line_no, &mut config)?;
    }

    config.validate()?;
    Ok(config)
}

fn parse_section_header(header: &str) -> Option<Section> {
    match header.trim() {
        "timing" => Some(Section::Timing),
        "severity" => Some(Section::Severity),
        "access_point" => Some(Section::AccessPoint),
        "pins" => Some(Section::Pins),
        _ => None,
    }
}

fn apply_value(
    section: Section,
    key: &str,
    value: &str,
    line: u16,
    config: &mut MonitorConfig,
) -> Result<(), ConfigError> {
    let invalid = ConfigError::InvalidValue { line };
    let unknown = ConfigError::UnknownKey { line };

    match section {
        Section::Root => return Err(unknown),
        Section::Timing => {
            let ms: u32 = parse_int(value).ok_or(invalid)?;
            match key {
                "classify_interval_ms" => config.timing.classify_interval_ms = ms,
                "heartbeat_interval_ms" => config.timing.heartbeat_interval_ms = ms,
                "poll_interval_ms" => config.timing.poll_interval_ms = ms,
                _ => return Err(unknown),
            }
        }
        Section::Severity => {
            let band = parse_band(value).ok_or(invalid)?;
            match key {
                "normal" => config.severity.normal = band,
                "crack" => config.severity.crack = band,
                "break" => config.severity.rail_break = band,
                _ => return Err(unknown),
            }
        }
        Section::AccessPoint => {
            let ap = &mut config.access_point;
            match key {
                "ssid" => ap.ssid = parse_heapless(value).ok_or(ConfigError::InvalidSsid)?,
                "password" => {
                    ap.password = parse_heapless(value).ok_or(ConfigError::InvalidPassword)?
                }
                "address" => ap.address = parse_ipv4(parse_string(value)).ok_or(invalid)?,
                "prefix_len" => ap.prefix_len = parse_int(value).ok_or(invalid)?,
                "channel" => ap.channel = parse_int(value).ok_or(invalid)?,
                "port" => ap.port = parse_int(value).ok_or(invalid)?,
                _ => return Err(unknown),
            }
        }
        Section::Pins => {
            let pin = parse_pin(value).ok_or(ConfigError::InvalidPin { line })?;
            let pins = &mut config.pins;
            match key {
                "ir_left" => pins.ir_left = pin,
                "ir_right" => pins.ir_right = pin,
                "motor_positive" => pins.motor_positive = pin,
                "motor_negative" => pins.motor_negative = pin,
                "buzzer" => pins.buzzer = pin,
                "heartbeat" => pins.heartbeat = pin,
                _ => return Err(unknown),
            }
        }
    }

    Ok(())
}

/// Drop a trailing comment that is not inside a string
fn strip_comment(text: &str) -> &str {
    match text.find('#') {
        Some(pos) if text[..pos].matches('"').count() % 2 == 0 => text[..pos].trim(),
        _ => text,
    }
}

/// Split `key = value`, removing inline comments
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = strip_comment(line[eq_pos + 1..].trim());

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

/// Remove surrounding quotes, if any
fn parse_string(value: &str) -> &str {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

fn parse_heapless<const N: usize>(value: &str) -> Option<String<N>> {
    String::try_from(parse_string(value)).ok()
}

fn parse_int<T: core::str::FromStr>(value: &str) -> Option<T> {
    value.parse().ok()
}

/// Parse `[low, high]`
fn parse_band(value: &str) -> Option<PercentBand> {
    let inner = value.strip_prefix('[')?.strip_suffix(']')?;
    let mut parts = inner.split(',').map(str::trim);
    let low = parse_int(parts.next()?)?;
    let high = parse_int(parts.next()?)?;
    if parts.next().is_some() {
        return None;
    }
    Some(PercentBand::new(low, high))
}

/// Parse a dotted IPv4 address
fn parse_ipv4(value: &str) -> Option<[u8; 4]> {
    let mut octets = [0u8; 4];
    let mut parts = value.split('.');
    for octet in octets.iter_mut() {
        *octet = parse_int(parts.next()?)?;
    }
    if parts.next().is_some() {
        return None;
    }
    Some(octets)
}

/// Parse a pin string like "gpio2", "!gpio3", "^!gpio4"
fn parse_pin(value: &str) -> Option<PinConfig> {
    let mut s = parse_string(value);
    let mut pin = PinConfig::default();

    loop {
        if let Some(rest) = s.strip_prefix('!') {
            pin.inverted = true;
            s = rest;
        } else if let Some(rest) = s.strip_prefix('^') {
            pin.pull_up = true;
            s = rest;
        } else {
            break;
        }
    }

    pin.pin = s.strip_prefix("gpio")?.parse().ok()?;
    Some(pin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::safety::SeverityBands;

    const SAMPLE: &str = r#"
# Track monitor
[timing]
classify_interval_ms = 2000   # slower cadence
heartbeat_interval_ms = 250

[severity]
normal = [0, 5]
crack = [40, 70]
break = [80, 100]

[access_point]
ssid = "yard-7"
password = "switchyard"
address = "10.0.0.1"
channel = 11

[pins]
ir_left = "!gpio10"
ir_right = "^!gpio11"
"#;

    #[test]
    fn test_parse_sample() {
        let config = parse_config(SAMPLE).unwrap();
        assert_eq!(config.timing.classify_interval_ms, 2000);
        assert_eq!(config.timing.heartbeat_interval_ms, 250);
        assert_eq!(config.timing.poll_interval_ms, 10);

        assert_eq!(config.severity.normal, PercentBand::new(0, 5));
        assert_eq!(config.severity.rail_break, PercentBand::new(80, 100));

        assert_eq!(config.access_point.ssid.as_str(), "yard-7");
        assert!(!config.access_point.is_open());
        assert_eq!(config.access_point.address, [10, 0, 0, 1]);
        assert_eq!(config.access_point.channel, 11);
        assert_eq!(config.access_point.port, 80);

        assert_eq!(config.pins.ir_left, PinConfig::inverted(10));
        assert!(config.pins.ir_right.pull_up);
        assert!(config.pins.ir_right.inverted);
        assert_eq!(config.pins.buzzer, PinConfig::new(6));
    }

    #[test]
    fn test_empty_input_gives_defaults() {
        assert_eq!(parse_config(""), Ok(MonitorConfig::default()));
        assert_eq!(parse_config("").unwrap().severity, SeverityBands::DEFAULT);
    }

    #[test]
    fn test_unknown_key() {
        let input = "[timing]\nclassify_ms = 5\n";
        assert_eq!(parse_config(input), Err(ConfigError::UnknownKey { line: 2 }));
    }

    #[test]
    fn test_unknown_section() {
        let input = "[display]\n";
        assert_eq!(parse_config(input), Err(ConfigError::UnknownSection { line: 1 }));
    }

    #[test]
    fn test_key_outside_section() {
        assert_eq!(parse_config("ssid = \"x\""), Err(ConfigError::UnknownKey { line: 1 }));
    }

    #[test]
    fn test_syntax_error() {
        let input = "[pins]\nbuzzer gpio6\n";
        assert_eq!(parse_config(input), Err(ConfigError::Syntax { line: 2 }));
    }

    #[test]
    fn test_bad_pin() {
        let input = "[pins]\nbuzzer = \"pin6\"\n";
        assert_eq!(parse_config(input), Err(ConfigError::InvalidPin { line: 2 }));
    }

    #[test]
    fn test_bad_band_rejected_by_validation() {
        let input = "[severity]\ncrack = [70, 40]\n";
        assert_eq!(parse_config(input), Err(ConfigError::InvalidBand));
    }

    #[test]
    fn test_malformed_band() {
        let input = "[severity]\ncrack = [40, 50, 60]\n";
        assert_eq!(parse_config(input), Err(ConfigError::InvalidValue { line: 2 }));
    }

    #[test]
    fn test_hash_inside_string_kept() {
        let input = "[access_point]\nssid = \"rail#1\" # comment\n";
        assert_eq!(parse_config(input).unwrap().access_point.ssid.as_str(), "rail#1");
    }

    #[test]
    fn test_ssid_too_long() {
        let input = "[access_point]\nssid = \"abcdefghijklmnopqrstuvwxyz0123456789\"\n";
        assert_eq!(parse_config(input), Err(ConfigError::InvalidSsid));
    }

    #[test]
    fn test_parse_ipv4() {
        assert_eq!(parse_ipv4("192.168.1.1"), Some([192, 168, 1, 1]));
        assert_eq!(parse_ipv4("192.168.1"), None);
        assert_eq!(parse_ipv4("192.168.1.1.1"), None);
        assert_eq!(parse_ipv4("256.0.0.1"), None);
    }

    #[test]
    fn test_parse_pin_modifiers() {
        assert_eq!(parse_pin("\"gpio15\""), Some(PinConfig::new(15)));
        assert_eq!(parse_pin("!gpio3"), Some(PinConfig::inverted(3)));
        assert_eq!(parse_pin("gpio"), None);
    }
}
