//! Build script for trackwatch-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates monitor.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

const SECTIONS: &[(&str, &[&str])] = &[
    (
        "timing",
        &["classify_interval_ms", "heartbeat_interval_ms", "poll_interval_ms"],
    ),
    ("severity", &["normal", "crack", "break"]),
    (
        "access_point",
        &["ssid", "password", "address", "prefix_len", "channel", "port"],
    ),
    (
        "pins",
        &["ir_left", "ir_right", "motor_positive", "motor_negative", "buzzer", "heartbeat"],
    ),
];

/// GPIOs wired to the CYW43 Wi-Fi chip on the Pico W
const WIFI_PINS: &[i64] = &[23, 24, 25, 29];

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR is set by cargo"));

    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).expect("create memory.x in OUT_DIR");
    f.write_all(memory_x).expect("write memory.x");

    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate monitor.toml configuration at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=monitor.toml");

    let config_path = Path::new("monitor.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: monitor.toml not found!                                  ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds monitor.toml as its configuration.          ║\n\
            ║  Please create one in the trackwatch-firmware directory.         ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read monitor.toml                              ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in monitor.toml                      ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                {}\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();
    validate_layout(&config, &mut errors);
    validate_timing(&config, &mut errors);
    validate_severity(&config, &mut errors);
    validate_access_point(&config, &mut errors);
    validate_pins(&config, &mut errors);
    report("Invalid monitor configuration", &errors);

    println!("cargo:warning=monitor.toml validated successfully");
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Fail the build with a framed list of errors
fn report(title: &str, errors: &[String]) {
    if errors.is_empty() {
        return;
    }
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title,
        errors
            .iter()
            .map(|e| format!("║  • {:<62} ║", e))
            .collect::<Vec<_>>()
            .join("\n")
    );
}

fn section<'a>(config: &'a toml::Value, name: &str) -> Option<&'a toml::value::Table> {
    config.get(name).and_then(|s| s.as_table())
}

/// Reject unknown sections and keys; the firmware parser does the same
fn validate_layout(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(root) = config.as_table() else {
        return;
    };

    for (name, value) in root {
        let Some((_, keys)) = SECTIONS.iter().find(|(s, _)| s == name) else {
            errors.push(format!("unknown section or key '{}'", name));
            continue;
        };
        let Some(table) = value.as_table() else {
            errors.push(format!("[{}] must be a table", name));
            continue;
        };
        for key in table.keys() {
            if !keys.contains(&key.as_str()) {
                errors.push(format!("[{}] unknown key '{}'", name, key));
            }
        }
    }
}

fn validate_timing(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(timing) = section(config, "timing") else {
        return;
    };

    for (key, value) in timing {
        match value.as_integer() {
            Some(ms) if ms > 0 && ms <= u32::MAX as i64 => {}
            _ => errors.push(format!("[timing] {} must be a positive integer", key)),
        }
    }
}

fn validate_severity(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(severity) = section(config, "severity") else {
        return;
    };

    for (key, value) in severity {
        let band: Option<Vec<i64>> = value
            .as_array()
            .map(|a| a.iter().filter_map(|v| v.as_integer()).collect());
        match band.as_deref() {
            Some([low, high]) if 0 <= *low && low < high && *high <= 100 => {}
            _ => errors.push(format!("[severity] {} must be [low, high] with 0 <= low < high <= 100", key)),
        }
    }
}

fn validate_access_point(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(ap) = section(config, "access_point") else {
        return;
    };

    if let Some(ssid) = ap.get("ssid") {
        match ssid.as_str() {
            Some(s) if !s.is_empty() && s.len() <= 32 => {}
            _ => errors.push("[access_point] ssid must be 1-32 characters".to_string()),
        }
    }

    if let Some(password) = ap.get("password") {
        match password.as_str() {
            Some(p) if p.is_empty() || (8..=63).contains(&p.len()) => {}
            _ => errors.push("[access_point] password must be empty or 8-63 characters".to_string()),
        }
    }

    if let Some(address) = ap.get("address") {
        let valid = address
            .as_str()
            .map(|a| a.parse::<std::net::Ipv4Addr>().is_ok())
            .unwrap_or(false);
        if !valid {
            errors.push("[access_point] address must be a dotted IPv4 address".to_string());
        }
    }

    let ranges: &[(&str, i64, i64)] = &[("prefix_len", 0, 32), ("channel", 1, 13), ("port", 1, 65535)];
    for (key, min, max) in ranges {
        if let Some(value) = ap.get(*key) {
            match value.as_integer() {
                Some(v) if (*min..=*max).contains(&v) => {}
                _ => errors.push(format!("[access_point] {} must be {}-{}", key, min, max)),
            }
        }
    }
}

fn validate_pins(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(pins) = section(config, "pins") else {
        return;
    };

    let mut seen: Vec<(i64, &str)> = Vec::new();
    for (key, value) in pins {
        let Some(pin) = value.as_str().and_then(parse_pin) else {
            errors.push(format!("[pins] {} must look like \"gpioN\", \"!gpioN\"", key));
            continue;
        };
        if !(0..30).contains(&pin) || WIFI_PINS.contains(&pin) {
            errors.push(format!("[pins] {} uses gpio{}, not available on Pico W", key, pin));
        }
        if let Some((_, other)) = seen.iter().find(|(p, _)| *p == pin) {
            errors.push(format!("[pins] {} and {} share gpio{}", other, key, pin));
        }
        seen.push((pin, key));
    }
}

fn parse_pin(value: &str) -> Option<i64> {
    value
        .trim_start_matches(['!', '^'])
        .strip_prefix("gpio")?
        .parse()
        .ok()
}
