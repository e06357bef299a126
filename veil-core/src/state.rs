//! The engine's mutable state: the compiled rule set and the registry of
//! tracked windows.

use crate::models::{Handle, Registry};
use crate::rules::{parse_rules, ParseError, Rule};

#[derive(Debug, Default)]
pub struct State<H: Handle> {
    pub rules: Vec<Rule>,
    pub registry: Registry<H>,
}

impl<H: Handle> State<H> {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Compiles the rule text and replaces the rule set wholesale. On a
    /// parse error the previous rule set is left untouched.
    ///
    /// # Errors
    ///
    /// Returns the parse error for the caller to surface; nothing from the
    /// failed input is retained.
    pub fn load_rules(&mut self, text: &str) -> Result<usize, ParseError> {
        self.rules = parse_rules(text)?;
        Ok(self.rules.len())
    }
}
