//! Status document served at `/data.json`
//!
//! A flat JSON object of string fields that the dashboard script copies
//! into the page. Field order is fixed. The document is rendered by hand
//! into a fixed buffer; all values are escaped.
//!
//! Output is compact, with no whitespace between members. The dashboard
//! reads it through `JSON.parse`, so the field set and values are the
//! compatibility contract, not the exact bytes.

use core::fmt::Write;

use heapless::String;
use trackwatch_core::safety::FaultState;
use trackwatch_core::state::{Command, ControlHighlight, StatusSnapshot};

/// Buffer size that always holds a rendered status document
pub const JSON_CAPACITY: usize = 640;

/// Maximum banner message length
pub const MESSAGE_LEN: usize = 128;

/// Errors that can occur while rendering into a fixed buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WriteError {
    /// Output buffer is full
    BufferFull,
}

impl From<core::fmt::Error> for WriteError {
    fn from(_: core::fmt::Error) -> Self {
        WriteError::BufferFull
    }
}

/// Dashboard view of a [`StatusSnapshot`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusDocument {
    message: String<MESSAGE_LEN>,
    message_class: &'static str,
    left: &'static str,
    right: &'static str,
    highlight: ControlHighlight,
    ai_status: &'static str,
    fault_percent: String<8>,
    severity: &'static str,
    ai_class: &'static str,
}

impl StatusDocument {
    /// Build the document for a snapshot
    pub fn from_snapshot(snapshot: &StatusSnapshot) -> Self {
        let fault = &snapshot.fault;
        let mut doc = Self {
            message: String::new(),
            message_class: "hide",
            left: "",
            right: "",
            highlight: snapshot.highlight,
            ai_status: fault.status_label(),
            fault_percent: String::new(),
            severity: "Unknown",
            ai_class: "primary",
        };

        if !fault.is_classified() {
            let _ = doc.fault_percent.push_str("0.00");
            return doc;
        }

        let _ = write!(doc.fault_percent, "{}.00", fault.percent);
        doc.severity = fault.severity.label();
        doc.ai_class = fault.severity.style_class();
        doc.message_class = if fault.is_active { "danger" } else { "success" };
        doc.write_message(fault);

        if let Some(reading) = snapshot.reading {
            doc.left = level_text(reading.left);
            doc.right = level_text(reading.right);
        }

        doc
    }

    fn write_message(&mut self, fault: &FaultState) {
        let label = fault.status_label();
        let _ = if fault.is_active {
            write!(
                self.message,
                "\u{26a0} {} detected! Train Stopped \u{1f6a8} | Fault: {}% | Severity: {}",
                label, self.fault_percent, self.severity
            )
        } else {
            write!(
                self.message,
                "AI Status: {} | Fault: {}% | Severity: {}",
                label, self.fault_percent, self.severity
            )
        };
    }

    /// Banner message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Banner style class
    pub fn message_class(&self) -> &'static str {
        self.message_class
    }

    /// Fields in document order
    pub fn fields(&self) -> [(&'static str, &str); 16] {
        [
            ("message", self.message.as_str()),
            ("message_class", self.message_class),
            ("left", self.left),
            ("left_class", "success"),
            ("right", self.right),
            ("right_class", "success"),
            ("btn_fwd", Command::Forward.label()),
            ("btn_fwd_class", self.highlight.class_for(Command::Forward)),
            ("btn_stop", Command::Stop.label()),
            ("btn_stop_class", self.highlight.class_for(Command::Stop)),
            ("btn_back", Command::Back.label()),
            ("btn_back_class", self.highlight.class_for(Command::Back)),
            ("ai_status", self.ai_status),
            ("fault_percent", self.fault_percent.as_str()),
            ("severity", self.severity),
            ("ai_class", self.ai_class),
        ]
    }

    /// Render the JSON object into `out`, replacing its contents
    pub fn write_json<const N: usize>(&self, out: &mut String<N>) -> Result<(), WriteError> {
        out.clear();
        out.push('{').map_err(|_| WriteError::BufferFull)?;
        for (i, (key, value)) in self.fields().iter().enumerate() {
            if i > 0 {
                out.push(',').map_err(|_| WriteError::BufferFull)?;
            }
            write!(out, "\"{}\":\"", key)?;
            write_escaped(out, value)?;
            out.push('"').map_err(|_| WriteError::BufferFull)?;
        }
        out.push('}').map_err(|_| WriteError::BufferFull)
    }
}

fn level_text(tripped: bool) -> &'static str {
    if tripped {
        "1"
    } else {
        "0"
    }
}

/// Write a JSON string body, escaping quotes, backslashes and controls
fn write_escaped<const N: usize>(out: &mut String<N>, s: &str) -> Result<(), WriteError> {
    for ch in s.chars() {
        let result = match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c < ' ' => out.push('?'),
            c => out.push(c),
        };
        result.map_err(|_| WriteError::BufferFull)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use trackwatch_core::classifier::{FaultClass, FeatureVector};
    use trackwatch_core::safety::Severity;
    use trackwatch_core::traits::ActuatorOutputs;

    fn snapshot(class: FaultClass, active: bool, percent: u8) -> StatusSnapshot {
        StatusSnapshot {
            fault: FaultState {
                is_active: active,
                percent,
                severity: Severity::for_class(class),
                last_class: Some(class),
            },
            reading: Some(FeatureVector::from_raw(class.id() & 1, class.id() >> 1)),
            highlight: ControlHighlight::on(Command::Stop),
            outputs: ActuatorOutputs::alarm(),
        }
    }

    fn render(doc: &StatusDocument) -> String<JSON_CAPACITY> {
        let mut out = String::new();
        doc.write_json(&mut out).unwrap();
        out
    }

    #[test]
    fn test_boot_document() {
        let doc = StatusDocument::from_snapshot(&StatusSnapshot::boot());
        assert_eq!(
            render(&doc).as_str(),
            "{\"message\":\"\",\"message_class\":\"hide\",\"left\":\"\",\"left_class\":\"success\",\
             \"right\":\"\",\"right_class\":\"success\",\"btn_fwd\":\"FORWARD\",\"btn_fwd_class\":\"success\",\
             \"btn_stop\":\"STOP\",\"btn_stop_class\":\"success\",\"btn_back\":\"BACK\",\"btn_back_class\":\"success\",\
             \"ai_status\":\"Unknown\",\"fault_percent\":\"0.00\",\"severity\":\"Unknown\",\"ai_class\":\"primary\"}"
        );
    }

    #[test]
    fn test_normal_message() {
        let doc = StatusDocument::from_snapshot(&snapshot(FaultClass::Normal, false, 4));
        assert_eq!(doc.message(), "AI Status: Normal | Fault: 4.00% | Severity: Safe");
        assert_eq!(doc.message_class(), "success");

        let json = render(&doc);
        assert!(json.contains("\"left\":\"0\""));
        assert!(json.contains("\"ai_class\":\"success\""));
    }

    #[test]
    fn test_active_fault_message() {
        let doc = StatusDocument::from_snapshot(&snapshot(FaultClass::Break, true, 91));
        assert_eq!(
            doc.message(),
            "\u{26a0} Break detected! Train Stopped \u{1f6a8} | Fault: 91.00% | Severity: Critical"
        );
        assert_eq!(doc.message_class(), "danger");

        let json = render(&doc);
        assert!(json.contains("\"left\":\"1\",\"left_class\":\"success\",\"right\":\"1\""));
        assert!(json.contains("\"btn_stop_class\":\"danger\""));
        assert!(json.contains("\"btn_fwd_class\":\"success\""));
        assert!(json.contains("\"ai_class\":\"danger\""));
    }

    #[test]
    fn test_crack_right_reading() {
        let doc = StatusDocument::from_snapshot(&snapshot(FaultClass::CrackRight, true, 50));
        let json = render(&doc);
        assert!(json.contains("\"left\":\"0\""));
        assert!(json.contains("\"right\":\"1\""));
        assert!(json.contains("\"severity\":\"Moderate\",\"ai_class\":\"warning\""));
    }

    #[test]
    fn test_field_order() {
        let doc = StatusDocument::from_snapshot(&StatusSnapshot::boot());
        let keys = doc.fields().map(|(k, _)| k);
        assert_eq!(keys[0], "message");
        assert_eq!(keys[12], "ai_status");
        assert_eq!(keys[15], "ai_class");
    }

    #[test]
    fn test_escaping() {
        let mut out: String<32> = String::new();
        write_escaped(&mut out, "a\"b\\c\nd\u{1}").unwrap();
        assert_eq!(out.as_str(), "a\\\"b\\\\c\\nd?");
    }

    #[test]
    fn test_buffer_full() {
        let doc = StatusDocument::from_snapshot(&StatusSnapshot::boot());
        let mut out: String<64> = String::new();
        assert_eq!(doc.write_json(&mut out), Err(WriteError::BufferFull));
    }
}
