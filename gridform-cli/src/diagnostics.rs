use std::fmt::Write as _;

use color_eyre::eyre::{Result, eyre};

/// Input and output problems gathered before the UI starts, reported together.
#[derive(Debug, Default)]
pub(crate) struct Diagnostics {
    messages: Vec<String>,
}

impl Diagnostics {
    pub(crate) fn input(&mut self, label: &str, message: impl Into<String>) {
        self.messages
            .push(format!("input ({label}): {}", message.into()));
    }

    pub(crate) fn output(&mut self, message: impl Into<String>) {
        self.messages.push(format!("output: {}", message.into()));
    }

    pub(crate) fn count(&self) -> usize {
        self.messages.len()
    }

    pub(crate) fn finish(self) -> Result<()> {
        if self.messages.is_empty() {
            return Ok(());
        }
        let mut body = String::from("encountered input/output issues:\n");
        for (idx, message) in self.messages.iter().enumerate() {
            let _ = writeln!(body, "  {}. {message}", idx + 1);
        }
        Err(eyre!(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_numbered_in_order() {
        let mut diagnostics = Diagnostics::default();
        assert!(Diagnostics::default().finish().is_ok());
        diagnostics.input("form", "missing");
        diagnostics.output("taken");
        assert_eq!(diagnostics.count(), 2);
        let message = diagnostics.finish().expect_err("errors").to_string();
        assert!(message.contains("1. input (form): missing"));
        assert!(message.contains("2. output: taken"));
    }
}
