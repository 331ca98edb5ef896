//! Console output helpers
//!
//! Colored, tagged terminal output for the interactive session.

/// ANSI color codes
pub mod color {
    pub const BLUE: &str = "\x1b[94m";
    pub const GREEN: &str = "\x1b[92m";
    pub const YELLOW: &str = "\x1b[93m";
    pub const RED: &str = "\x1b[91m";
    pub const PURPLE: &str = "\x1b[95m";
    pub const END: &str = "\x1b[0m";
}

pub fn print_info(msg: &str) {
    println!("{}[INFO]{} {msg}", color::GREEN, color::END);
}

pub fn print_warning(msg: &str) {
    println!("{}[WARNING]{} {msg}", color::YELLOW, color::END);
}

pub fn print_error(msg: &str) {
    println!("{}[ERROR]{} {msg}", color::RED, color::END);
}

/// Tagged assistant output, e.g. `[gpt-oss-20b] ...`
pub fn print_assistant(model_tag: &str, msg: &str) {
    println!("{}[{}]{} {msg}", color::PURPLE, model_tag.to_uppercase(), color::END);
}

/// The `[YOU]` input prompt, without a trailing newline.
pub fn user_prompt() -> String {
    format!("\n{}[YOU]{} ", color::BLUE, color::END)
}
