// Small helpers shared by the renderer and the console output: the clock
// abstraction, date formatting, HTML escaping and number formatting.
use chrono::{DateTime, Datelike, Local, NaiveDate, TimeZone};
use num_format::{Locale, ToFormattedString};
use std::borrow::Cow;

/// Source of "now" for the rendered page.
///
/// The date and year are the only values in the document that do not come
/// from the config; `--as-of` and the tests pin them with [`FixedClock`].
pub trait Clock {
    fn now(&self) -> DateTime<Local>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Local>);

impl FixedClock {
    /// Midnight local time on `date`.
    pub fn on(date: NaiveDate) -> Option<Self> {
        let midnight = date.and_hms_opt(0, 0, 0)?;
        Local.from_local_datetime(&midnight).earliest().map(FixedClock)
    }

    #[cfg(test)]
    pub fn ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).and_then(Self::on)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.0
    }
}

/// `January 05, 2026` style date used in the status banner.
pub fn long_date<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format("%B %d, %Y").to_string()
}

pub fn year<Tz: TimeZone>(at: &DateTime<Tz>) -> i32 {
    at.year()
}

pub fn escape_html(s: &str) -> Cow<'_, str> {
    if !s.contains(|c| matches!(c, '&' | '<' | '>' | '"' | '\'')) {
        return Cow::Borrowed(s);
    }
    let mut out = String::with_capacity(s.len() + 16);
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Escape `s` for use inside a single-quoted JS string in a `<script>` block.
pub fn escape_js_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            // Keeps `</script>` in a value from closing the block.
            '<' => out.push_str("\\x3C"),
            _ => out.push(c),
        }
    }
    out
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    // Used for byte counts in the batch summary (e.g. `18,204 bytes`).
    n.to_formatted_string(&Locale::en)
}
