//! Terminal colors for `fbrt` output, dropped when the stream is redirected.

use std::io::IsTerminal;

use owo_colors::{OwoColorize, Style};

fn paint(text: &str, style: Style, terminal: bool) -> String {
    if terminal {
        text.style(style).to_string()
    } else {
        text.to_owned()
    }
}

pub fn success(text: impl AsRef<str>) -> String {
    paint(text.as_ref(), Style::new().green(), std::io::stdout().is_terminal())
}

pub fn accent(text: impl AsRef<str>) -> String {
    paint(text.as_ref(), Style::new().cyan(), std::io::stdout().is_terminal())
}

pub fn error(text: impl AsRef<str>) -> String {
    paint(text.as_ref(), Style::new().red().bold(), std::io::stderr().is_terminal())
}
