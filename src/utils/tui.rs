use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;

pub fn create_spinner(message: String) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_strings(&["-", "\\", "|", "/"])
        .template("{msg} {spinner}")
    {
        spinner.set_style(style);
    }
    spinner.set_message(message);
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));
    spinner
}

pub fn ok(line: impl std::fmt::Display) {
    println!("{} {line}", "[ok]".green());
}

pub fn warn(line: impl std::fmt::Display) {
    println!("{} {line}", "[warn]".yellow());
}

pub fn error(line: impl std::fmt::Display) {
    println!("{} {line}", "[error]".red());
}
