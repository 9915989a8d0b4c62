use crate::types::Result;
use dialoguer::{theme::ColorfulTheme, Input};

/// Reads one free-text line from the terminal. Blank input is returned as-is.
pub fn ask_question(prompt: &str, placeholder: &str) -> Result<String> {
    let answer: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(format!("{prompt} ({placeholder})"))
        .allow_empty(true)
        .interact_text()?;
    Ok(answer)
}

/// True for the words that end an interactive session.
pub fn is_exit_command(input: &str) -> bool {
    let trimmed = input.trim();
    trimmed.eq_ignore_ascii_case("exit") || trimmed.eq_ignore_ascii_case("quit")
}
