// UI layer: operator prompts through `dialoguer` and spinners through
// `indicatif`. The workflow only sees the `Operator` trait so a scripted
// operator can stand in for the terminal.

use anyhow::Result;
use dialoguer::Input;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Source of operator answers.
pub trait Operator {
    /// Number of days without check-in after which a sensor counts as inactive.
    fn ask_days(&mut self) -> Result<u32>;

    /// Free-text answer to `prompt`, as typed.
    fn answer(&mut self, prompt: &str) -> Result<String>;
}

/// Only an exact `y` or `Y` counts as consent.
pub fn is_confirmation(answer: &str) -> bool {
    answer == "y" || answer == "Y"
}

/// Interactive operator on the controlling terminal.
pub struct Terminal;

impl Operator for Terminal {
    fn ask_days(&mut self) -> Result<u32> {
        // `interact_text` re-prompts until the input parses as a u32.
        let days: u32 = Input::new()
            .with_prompt("How many days ago should we search for?")
            .interact_text()?;
        Ok(days)
    }

    fn answer(&mut self, prompt: &str) -> Result<String> {
        let answer: String = Input::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?;
        Ok(answer)
    }
}

/// Spinner shown while a request is in flight. Call `finish_and_clear` when done.
pub fn spinner(msg: &str) -> Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(120));
    Ok(pb)
}
