use std::fmt::Display;

use crate::terminal::colors;
use colored::*;
use tracing::info;

pub const TOTAL_WIDTH: usize = 64;
pub const PRINT_TARGET: &str = "alpho::print";

const KEY_WIDTH: usize = 12;

/// Writes a pre-formatted line to the terminal, without a log symbol.
pub fn print(msg: &str) {
    info!(target: PRINT_TARGET, "{msg}");
}

pub fn banner(q_level: u8) {
    if q_level > 0 {
        return;
    }

    let text: String = format!("⟦ ALPHO v{} ⟧", env!("CARGO_PKG_VERSION"));
    let sep_width: usize = TOTAL_WIDTH.saturating_sub(console::measure_text_width(&text)) / 2;
    let sep: ColoredString = "═".repeat(sep_width).color(colors::SEPARATOR);

    print(&format!("{}{}{}", sep, text.color(colors::PRIMARY).bold(), sep));
}

pub fn header(msg: &str, q_level: u8) {
    if q_level > 0 {
        return;
    }

    let formatted: String = format!("⟦ {} ⟧", msg);
    let msg_len: usize = formatted.chars().count();

    let dash_count: usize = TOTAL_WIDTH.saturating_sub(msg_len);
    let left: usize = dash_count / 2;
    let right: usize = dash_count - left;

    let line: ColoredString = format!(
        "{}{}{}",
        "─".repeat(left),
        formatted.to_uppercase().color(colors::PRIMARY),
        "─".repeat(right)
    )
    .color(colors::SEPARATOR);

    print(&format!("{}", line));
}

pub fn fat_separator() {
    let sep: ColoredString = "═".repeat(TOTAL_WIDTH).color(colors::SEPARATOR);
    print(&format!("{}", sep));
}

pub fn aligned_line<V: Display>(key: &str, value: V) {
    let dots: String = ".".repeat((KEY_WIDTH + 1).saturating_sub(key.len()));
    let colon: String = format!(
        "{}{}",
        dots.color(colors::SEPARATOR),
        ":".color(colors::SEPARATOR)
    );
    let value: ColoredString = value.to_string().color(colors::TEXT_DEFAULT);
    print_status(format!("{}{} {}", key.color(colors::ACCENT), colon, value));
}

pub fn print_status<T: AsRef<str>>(msg: T) {
    let prefix: ColoredString = ">".color(colors::SEPARATOR);
    print(&format!("{} {}", prefix, msg.as_ref()));
}

pub fn centerln(msg: &str) {
    let space: String = " ".repeat(TOTAL_WIDTH.saturating_sub(console::measure_text_width(msg)) / 2);
    print(&format!("{}{}", space, msg));
}
