use std::io::Write;
use std::time::Duration;

use crate::terminal::colors;
use colored::*;
use tracing::{debug, info};

pub const TOTAL_WIDTH: usize = 64;

/// Events on this target are printed without a level prefix.
pub const PRINT_TARGET: &str = "hostmap::print";

pub fn print(msg: &str) {
    info!(target: PRINT_TARGET, "{msg}");
}

pub fn header(msg: &str) {
    let formatted: String = format!("⟦ {} ⟧", msg);
    let msg_len: usize = formatted.chars().count();

    let dash_count: usize = TOTAL_WIDTH.saturating_sub(msg_len);
    let left: usize = dash_count / 2;
    let right: usize = dash_count - left;

    let line: ColoredString = format!(
        "{}{}{}",
        "─".repeat(left),
        formatted.to_uppercase().bright_green(),
        "─".repeat(right)
    )
    .bright_black();

    print(&format!("{}", line));
}

pub fn fat_separator() {
    let sep: ColoredString = "═".repeat(TOTAL_WIDTH).bright_black();
    print(&format!("{}", sep));
}

pub fn aligned_line(key: &str, value: impl std::fmt::Display, key_width: usize) {
    let dots: String = ".".repeat((key_width + 1).saturating_sub(key.len()));
    let colon: String = format!(
        "{}{}",
        dots.color(colors::SEPARATOR),
        ":".color(colors::SEPARATOR)
    );
    let value: ColoredString = value.to_string().color(colors::TEXT_DEFAULT);
    print_status(format!("{}{} {}", key.color(colors::PRIMARY), colon, value));
}

pub fn print_status<T: AsRef<str>>(msg: T) {
    let prefix: ColoredString = ">".color(colors::SEPARATOR);
    let message: String = format!("{} {}", prefix, msg.as_ref().color(colors::TEXT_DEFAULT));
    print(&message);
}

pub fn centerln(msg: &str) {
    let space = " ".repeat(TOTAL_WIDTH.saturating_sub(console::measure_text_width(msg)) / 2);
    print(&format!("{}{}{}", space, msg, space));
}

/// Key/value block followed by a centred completion line.
pub fn summary(title: &str, details: &[(&str, usize)], total_time: Duration) {
    let key_width: usize = details.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
    for (key, value) in details {
        aligned_line(key, value, key_width);
    }

    let elapsed: ColoredString = format!("{:.2}s", total_time.as_secs_f64()).bold().yellow();
    let output: String = format!("{} {} in {}", title.bold().color(colors::ACCENT), "finished".color(colors::TEXT_DEFAULT), elapsed);
    fat_separator();
    centerln(&output);
}

/// Writes one listing line to stdout, where the hosts data belongs.
pub fn row<W: Write>(out: &mut W, line: &str) {
    if let Err(e) = out.write_all(line.as_bytes()) {
        debug!("Could not echo listing row: {e}");
    }
}
