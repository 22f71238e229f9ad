//! rampup theme for interactive prompts

use console::Style;
use dialoguer::theme::Theme;
use std::fmt;

/// Branded theme for dialoguer prompts
pub struct RampTheme {
    pub prompt_style: Style,
    pub active_style: Style,
    pub inactive_style: Style,
    pub hint_style: Style,
    pub success_style: Style,
    pub error_style: Style,
    pub active_prefix: String,
    pub inactive_prefix: String,
    pub prompt_prefix: String,
    pub success_prefix: String,
}

impl Default for RampTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl RampTheme {
    pub fn new() -> Self {
        // Color256 approximations of the terminal palette in cli::colors
        Self {
            prompt_style: Style::new().fg(console::Color::Color256(117)).bold(),
            active_style: Style::new().fg(console::Color::Color256(220)).bold(),
            inactive_style: Style::new().fg(console::Color::Color256(252)),
            hint_style: Style::new().fg(console::Color::Color256(242)),
            success_style: Style::new().fg(console::Color::Color256(114)),
            error_style: Style::new().fg(console::Color::Color256(210)),
            active_prefix: "❯ ".to_string(),
            inactive_prefix: "  ".to_string(),
            prompt_prefix: "󰈙 ".to_string(),
            success_prefix: "✓ ".to_string(),
        }
    }
}

impl Theme for RampTheme {
    fn format_prompt(&self, f: &mut dyn fmt::Write, prompt: &str) -> fmt::Result {
        write!(
            f,
            "{}{} {}",
            self.prompt_style.apply_to(&self.prompt_prefix),
            self.prompt_style.apply_to(prompt),
            self.hint_style.apply_to("(type to filter, enter select)")
        )
    }

    fn format_error(&self, f: &mut dyn fmt::Write, err: &str) -> fmt::Result {
        write!(f, "{}", self.error_style.apply_to(err))
    }

    fn format_input_prompt(
        &self,
        f: &mut dyn fmt::Write,
        prompt: &str,
        default: Option<&str>,
    ) -> fmt::Result {
        write!(f, "{}{}", self.prompt_prefix, self.prompt_style.apply_to(prompt))?;
        if let Some(default) = default {
            write!(f, " {}", self.hint_style.apply_to(format!("[{}]", default)))?;
        }
        write!(f, ": ")
    }

    fn format_input_prompt_selection(
        &self,
        f: &mut dyn fmt::Write,
        prompt: &str,
        sel: &str,
    ) -> fmt::Result {
        write!(
            f,
            "{}{}: {}",
            self.success_prefix,
            self.prompt_style.apply_to(prompt),
            self.success_style.apply_to(sel)
        )
    }

    fn format_select_prompt(&self, f: &mut dyn fmt::Write, prompt: &str) -> fmt::Result {
        self.format_prompt(f, prompt)
    }

    fn format_select_prompt_selection(
        &self,
        f: &mut dyn fmt::Write,
        prompt: &str,
        sel: &str,
    ) -> fmt::Result {
        write!(
            f,
            "{}{}: {}",
            self.success_style.apply_to(&self.success_prefix),
            self.prompt_style.apply_to(prompt),
            self.success_style.apply_to(sel)
        )
    }

    fn format_select_prompt_item(
        &self,
        f: &mut dyn fmt::Write,
        text: &str,
        active: bool,
    ) -> fmt::Result {
        if active {
            write!(
                f,
                "{}{}",
                self.active_style.apply_to(&self.active_prefix),
                self.active_style.apply_to(text)
            )
        } else {
            write!(f, "{}{}", self.inactive_prefix, self.inactive_style.apply_to(text))
        }
    }
}
