//! The configuration surface the core consumes.

pub trait Config {
    /// Raw rule text to compile at startup.
    fn rules_text(&self) -> &str;
}

#[cfg(test)]
pub struct TestConfig {
    pub rules: String,
}

#[cfg(test)]
impl Config for TestConfig {
    fn rules_text(&self) -> &str {
        &self.rules
    }
}
