//! iCalendar (RFC 5545) export of a timeline or a set of picked classes.

use chrono::{DateTime, Utc};

use crate::timeline::Event;

pub const PRODID: &str = "-//Fit Tartans//Fitness Scheduler//EN";

/// Content lines longer than this many octets are folded.
const MAX_LINE_OCTETS: usize = 75;

fn ical_time(dt: DateTime<Utc>) -> String {
    dt.format("%Y%m%dT%H%M%SZ").to_string()
}

/// Escape TEXT values: backslash, semicolon, comma and newlines.
fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            _ => out.push(c),
        }
    }
    out
}

/// Append one content line, folded at 75 octets, with CRLF.
fn push_line(out: &mut String, line: &str) {
    let mut used = 0;
    for c in line.chars() {
        let len = c.len_utf8();
        if used + len > MAX_LINE_OCTETS {
            out.push_str("\r\n ");
            used = 1;
        }
        out.push(c);
        used += len;
    }
    out.push_str("\r\n");
}

/// Render events as a VCALENDAR document.
pub fn to_ical(events: &[Event]) -> String {
    let mut out = String::new();
    push_line(&mut out, "BEGIN:VCALENDAR");
    push_line(&mut out, "VERSION:2.0");
    push_line(&mut out, &format!("PRODID:{PRODID}"));
    push_line(&mut out, "CALSCALE:GREGORIAN");
    push_line(&mut out, "METHOD:PUBLISH");

    for (index, event) in events.iter().enumerate() {
        let start = ical_time(event.start);
        push_line(&mut out, "BEGIN:VEVENT");
        push_line(&mut out, &format!("UID:{start}-{index}-{}@fittartans", event.source));
        push_line(&mut out, &format!("DTSTAMP:{start}"));
        push_line(&mut out, &format!("DTSTART:{start}"));
        push_line(&mut out, &format!("DTEND:{}", ical_time(event.end)));
        push_line(&mut out, &format!("SUMMARY:{}", escape_text(&event.title)));
        if let Some(description) = &event.description {
            push_line(&mut out, &format!("DESCRIPTION:{}", escape_text(description)));
        }
        if let Some(location) = &event.location {
            push_line(&mut out, &format!("LOCATION:{}", escape_text(location)));
        }
        if let Some(url) = &event.url {
            push_line(&mut out, &format!("URL:{url}"));
        }
        if let Some(class_type) = &event.class_type {
            push_line(&mut out, &format!("CATEGORIES:{}", escape_text(class_type)));
        }
        push_line(&mut out, "END:VEVENT");
    }

    push_line(&mut out, "END:VCALENDAR");
    out
}
