use crate::catalog::MessageCatalog;
use crate::store::{ErrorSummary, FieldErrorMap};
use anstyle::{AnsiColor, Style};
use serde::Serialize;
use std::io::{self, Write};

/// JSON shape printed by `snag parse --json`
#[derive(Debug, Serialize)]
pub struct ParseReport<'a> {
    pub status: Option<u16>,
    pub message: &'a str,
    pub fields: &'a FieldErrorMap,
}

impl<'a> ParseReport<'a> {
    pub fn new(summary: &'a ErrorSummary, fields: &'a FieldErrorMap) -> Self {
        Self {
            status: summary.status,
            message: &summary.message,
            fields,
        }
    }
}

fn pretty_print_json_colored(value: &serde_json::Value) -> String {
    use colored_json::{Color, ColoredFormatter, PrettyFormatter, Styler};
    let styler = Styler {
        key: Color::Yellow.bold(),
        ..Default::default()
    };
    let formatter = ColoredFormatter::with_styler(PrettyFormatter::new(), styler);
    formatter
        .to_colored_json_auto(value)
        .unwrap_or_else(|_| serde_json::to_string_pretty(value).unwrap_or_default())
}

fn get_status_style(status: Option<u16>) -> Style {
    let color = match status {
        Some(200..=299) => AnsiColor::Green,
        Some(300..=399) => AnsiColor::Yellow,
        Some(400..=599) => AnsiColor::Red,
        _ => AnsiColor::White,
    };
    Style::new().fg_color(Some(anstyle::Color::Ansi(color))).bold()
}

fn format_status(status: Option<u16>) -> String {
    match status {
        Some(code) => code.to_string(),
        None => "-".to_string(),
    }
}

fn format_status_line(summary: &ErrorSummary) -> String {
    let status_style = get_status_style(summary.status);
    format!(
        "{}Status: {}{} {}\n",
        status_style.render(),
        format_status(summary.status),
        anstyle::Reset.render(),
        summary.message
    )
}

fn format_field(name: &str, messages: &[&str]) -> String {
    let key_style = Style::new().fg_color(Some(anstyle::Color::Ansi(AnsiColor::Blue)));
    let value_style = Style::new().fg_color(Some(anstyle::Color::Ansi(AnsiColor::White)));
    let mut output = String::new();
    for message in messages {
        output.push_str(&format!(
            "{}{}: {}{}{}\n",
            key_style.render(),
            name,
            value_style.render(),
            message,
            anstyle::Reset.render()
        ));
    }
    output
}

pub fn format_fields(fields: &FieldErrorMap) -> String {
    fields
        .iter()
        .map(|(name, errors)| format_field(name, &errors.messages()))
        .collect()
}

/// Status line followed by one line per field message
pub fn format_summary(summary: &ErrorSummary, fields: &FieldErrorMap) -> String {
    let mut output = format_status_line(summary);
    output.push_str(&format_fields(fields));
    output
}

pub fn format_report_json(report: &ParseReport<'_>) -> String {
    match serde_json::to_value(report) {
        Ok(value) => pretty_print_json_colored(&value),
        Err(_) => "{}".to_string(),
    }
}

/// Catalog entries sorted by status, then the fallback
pub fn format_catalog(catalog: &MessageCatalog) -> String {
    let mut output = String::new();
    for (status, message) in catalog.messages() {
        output.push_str(&format!(
            "{}{}{} {}\n",
            get_status_style(Some(*status)).render(),
            status,
            anstyle::Reset.render(),
            message
        ));
    }
    output.push_str(&format!(
        "{}*{} {}\n",
        get_status_style(None).render(),
        anstyle::Reset.render(),
        catalog.fallback_message()
    ));
    output
}

pub fn print_summary(summary: &ErrorSummary, fields: &FieldErrorMap, json: bool) {
    let _ = print_summary_to(&mut io::stdout(), summary, fields, json);
}

fn print_summary_to<W: Write>(
    writer: &mut W,
    summary: &ErrorSummary,
    fields: &FieldErrorMap,
    json: bool,
) -> io::Result<()> {
    if json {
        writeln!(writer, "{}", format_report_json(&ParseReport::new(summary, fields)))
    } else {
        write!(writer, "{}", format_summary(summary, fields))
    }
}
