use std::collections::HashSet;

use crate::classifier::classify;
use crate::config::Config;
use crate::display_servers::DisplayServer;
use crate::models::Handle;
use crate::rules::ParseError;
use crate::state::State;

/// Owns the engine state and the display-server connection.
pub struct Manager<H: Handle, C, SERVER> {
    pub state: State<H>,
    pub config: C,
    pub display_server: SERVER,
}

impl<H, C, SERVER> Manager<H, C, SERVER>
where
    H: Handle,
    C: Config,
    SERVER: DisplayServer<H>,
{
    pub fn new(config: C) -> Self {
        let display_server = SERVER::new(&config);
        Self {
            state: State::new(),
            config,
            display_server,
        }
    }

    /// Compiles the configured rule text into the active rule set.
    ///
    /// # Errors
    ///
    /// Returns the parse error for the caller to surface; the caller is
    /// expected to refuse to start in that case.
    pub fn load_rules(&mut self) -> Result<usize, ParseError> {
        self.state.load_rules(self.config.rules_text())
    }

    /// Walks the whole window tree from the root, parents before children,
    /// and tracks every window that matches a rule. Previously tracked
    /// windows are dropped first. No opacity is applied here; applying is a
    /// separate step so callers can pick apply-once or monitoring behavior.
    pub fn scan_windows(&mut self) {
        self.state.registry.clear();

        let root = self.display_server.root();
        let mut pending = vec![root];
        let mut seen = HashSet::new();
        while let Some(window) = pending.pop() {
            if !seen.insert(window) {
                continue;
            }
            if let Some(tracked) = classify(&self.display_server, &self.state.rules, window) {
                self.state.registry.track(tracked);
            }
            pending.extend(self.display_server.list_children(window));
        }
        tracing::debug!(tracked = self.state.registry.len(), "window scan complete");
    }

    /// Applies opacity to every tracked window. With `consider_focus`, the
    /// currently focused window (queried once) gets its focus opacity and
    /// everything else its normal opacity; without it, every window gets
    /// its normal opacity.
    pub fn apply_all(&self, consider_focus: bool) {
        let focused = if consider_focus {
            self.display_server.get_focused_window()
        } else {
            None
        };

        for window in self.state.registry.windows() {
            let opacity = if focused == Some(window.window()) || focused == Some(window.target())
            {
                window.focus_opacity
            } else {
                window.normal_opacity
            };
            self.display_server.set_opacity(window.target(), opacity);
        }
        self.display_server.flush();
    }
}

#[cfg(test)]
impl
    Manager<
        crate::models::MockHandle,
        crate::config::TestConfig,
        crate::display_servers::MockDisplayServer<crate::models::MockHandle>,
    >
{
    pub fn new_test(rules: &str) -> Self {
        let mut manager = Self::new(crate::config::TestConfig {
            rules: rules.to_string(),
        });
        manager.load_rules().expect("test rules failed to parse");
        manager
    }
}
