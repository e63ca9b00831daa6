//! Console output helpers shared by the subcommands.

use colored::{ColoredString, Colorize};

const RULE_WIDTH: usize = 60;

/// Disable ANSI colors for the rest of the process.
pub fn disable_color() {
    colored::control::set_override(false);
}

/// Render a titled block with a left gutter. Lines are printed as given.
pub fn panel_text(title: &str, lines: &[String]) -> String {
    let head = format!("╭─ {} ", title);
    let fill = RULE_WIDTH.saturating_sub(head.chars().count());
    let mut out = format!("{}{}\n", head, "─".repeat(fill));
    for line in lines {
        if line.is_empty() {
            out.push_str("│\n");
        } else {
            out.push_str(&format!("│ {}\n", line));
        }
    }
    out.push_str(&format!("╰{}", "─".repeat(RULE_WIDTH - 1)));
    out
}

pub fn panel(title: &str, lines: &[String]) {
    println!("{}", panel_text(title, lines));
}

pub fn heading(text: &str) -> ColoredString {
    text.bold().cyan()
}

pub fn ok(message: &str) {
    println!("  {} {}", "✓".green(), message);
}

pub fn step(message: &str) {
    println!("\n{}", message.bold());
}

pub fn warn(message: &str) {
    println!("{}", message.yellow());
}
