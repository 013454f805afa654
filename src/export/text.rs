//! Plain-text helpers for document export.

use chrono::{Datelike, NaiveDate, Weekday};
use regex::Regex;
use std::sync::LazyLock;

use super::template::is_xml_char;

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<\s*(/?)\s*([a-zA-Z][a-zA-Z0-9]*)[^>]*>").expect("valid tag regex"));
static ENTITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&(#[xX][0-9a-fA-F]+|#[0-9]+|[a-zA-Z]+);").expect("valid entity regex"));
static WS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

enum ListKind {
    Ordered(usize),
    Unordered,
}

struct TextBuilder {
    out: String,
    at_line_start: bool,
}

impl TextBuilder {
    fn newline(&mut self) {
        self.out.push('\n');
        self.at_line_start = true;
    }

    /// Start a new line unless we are already at the start of one.
    fn break_line(&mut self) {
        if !self.out.is_empty() && !self.out.ends_with('\n') {
            self.newline();
        }
    }

    fn push_marker(&mut self, marker: &str) {
        self.out.push_str(marker);
        self.at_line_start = true;
    }

    fn push_text(&mut self, text: &str) {
        let text = if self.at_line_start { text.trim_start() } else { text };
        if text.is_empty() {
            return;
        }
        self.out.push_str(text);
        self.at_line_start = false;
    }
}

fn decode_entities(text: &str) -> String {
    ENTITY_RE
        .replace_all(text, |caps: &regex::Captures| {
            let name = &caps[1];
            let decoded = match name {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "nbsp" => Some(' '),
                _ if name.starts_with("#x") || name.starts_with("#X") => {
                    u32::from_str_radix(&name[2..], 16).ok().and_then(char::from_u32)
                }
                _ if name.starts_with('#') => name[1..].parse().ok().and_then(char::from_u32),
                _ => None,
            };
            match decoded {
                Some(c) if is_xml_char(c) => c.to_string(),
                // Control characters such as `&#0;` cannot appear in a document.
                Some(_) => String::new(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Convert a rich-text HTML fragment to plain text for a document template.
///
/// Block elements and `<br>` become line breaks, ordered list items are numbered
/// (`1. `), unordered ones get `- `, and nested lists indent by two spaces.
///
/// ```
/// use radir::export::text::html_to_text;
/// let html = "<p>Catatan</p><ol><li>Satu</li><li>Dua</li></ol>";
/// assert_eq!(html_to_text(html), "Catatan\n1. Satu\n2. Dua");
/// ```
pub fn html_to_text(html: &str) -> String {
    let mut b = TextBuilder { out: String::new(), at_line_start: true };
    let mut lists: Vec<ListKind> = Vec::new();
    let mut last = 0;

    let emit_text = |b: &mut TextBuilder, raw: &str| {
        let collapsed = WS_RE.replace_all(raw, " ");
        b.push_text(&decode_entities(&collapsed));
    };

    for caps in TAG_RE.captures_iter(html) {
        let Some(whole) = caps.get(0) else { continue };
        emit_text(&mut b, &html[last..whole.start()]);
        last = whole.end();

        let closing = !caps[1].is_empty();
        let tag = caps[2].to_ascii_lowercase();
        match (tag.as_str(), closing) {
            ("br", _) => b.newline(),
            ("p" | "div" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "blockquote", _) => b.break_line(),
            ("ol", false) => {
                b.break_line();
                lists.push(ListKind::Ordered(0));
            }
            ("ul", false) => {
                b.break_line();
                lists.push(ListKind::Unordered);
            }
            ("ol" | "ul", true) => {
                lists.pop();
                b.break_line();
            }
            ("li", false) => {
                b.break_line();
                let indent = "  ".repeat(lists.len().saturating_sub(1));
                let marker = match lists.last_mut() {
                    Some(ListKind::Ordered(n)) => {
                        *n += 1;
                        format!("{indent}{n}. ")
                    }
                    Some(ListKind::Unordered) | None => format!("{indent}- "),
                };
                b.push_marker(&marker);
            }
            ("li", true) => b.break_line(),
            _ => {}
        }
    }
    emit_text(&mut b, &html[last..]);

    let mut lines: Vec<&str> = Vec::new();
    for line in b.out.lines().map(str::trim_end) {
        if line.is_empty() && lines.last().is_none_or(|prev| prev.is_empty()) {
            continue;
        }
        lines.push(line);
    }
    lines.join("\n").trim().to_string()
}

const UNITS: [&str; 12] = [
    "", "satu", "dua", "tiga", "empat", "lima", "enam", "tujuh", "delapan", "sembilan",
    "sepuluh", "sebelas",
];

fn spell(n: u64) -> String {
    let join = |head: String, rest: u64| {
        if rest == 0 { head } else { format!("{head} {}", spell(rest)) }
    };
    match n {
        0..=11 => UNITS[n as usize].to_string(),
        12..=19 => format!("{} belas", spell(n - 10)),
        20..=99 => join(format!("{} puluh", spell(n / 10)), n % 10),
        100..=199 => join("seratus".to_string(), n - 100),
        200..=999 => join(format!("{} ratus", spell(n / 100)), n % 100),
        1_000..=1_999 => join("seribu".to_string(), n - 1_000),
        2_000..=999_999 => join(format!("{} ribu", spell(n / 1_000)), n % 1_000),
        1_000_000..=999_999_999 => join(format!("{} juta", spell(n / 1_000_000)), n % 1_000_000),
        1_000_000_000..=999_999_999_999 => {
            join(format!("{} miliar", spell(n / 1_000_000_000)), n % 1_000_000_000)
        }
        _ => join(
            format!("{} triliun", spell(n / 1_000_000_000_000)),
            n % 1_000_000_000_000,
        ),
    }
}

/// Indonesian spelled-out form of a number, e.g. `12` -> `"dua belas"`.
pub fn terbilang(n: u64) -> String {
    if n == 0 { "nol".to_string() } else { spell(n) }
}

const MONTHS: [&str; 12] = [
    "Januari", "Februari", "Maret", "April", "Mei", "Juni", "Juli", "Agustus", "September",
    "Oktober", "November", "Desember",
];

/// `2026-03-10` -> `"10 Maret 2026"`.
pub fn tanggal(date: NaiveDate) -> String {
    format!("{} {} {}", date.day(), MONTHS[date.month0() as usize], date.year())
}

pub fn nama_hari(date: NaiveDate) -> &'static str {
    match date.weekday() {
        Weekday::Mon => "Senin",
        Weekday::Tue => "Selasa",
        Weekday::Wed => "Rabu",
        Weekday::Thu => "Kamis",
        Weekday::Fri => "Jumat",
        Weekday::Sat => "Sabtu",
        Weekday::Sun => "Minggu",
    }
}
