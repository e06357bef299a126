use crate::classifier::{classify, resolve_target};
use crate::config::Config;
use crate::display_servers::{DisplayServer, EventMask};
use crate::models::{FocusState, Handle, Manager, WindowHandle};

impl<H, C, SERVER> Manager<H, C, SERVER>
where
    H: Handle,
    C: Config,
    SERVER: DisplayServer<H>,
{
    /// A window appeared. If it matches a rule, start tracking it, watch
    /// its target for focus changes and give it its normal opacity.
    pub fn window_created_handler(&mut self, handle: WindowHandle<H>) -> bool {
        let Some(tracked) = classify(&self.display_server, &self.state.rules, handle) else {
            return false;
        };
        let target = tracked.target();
        let normal_opacity = tracked.normal_opacity;
        tracing::debug!(window = ?handle, ?target, "tracking new window");

        self.state.registry.track(tracked);
        self.display_server.subscribe(target, EventMask::FocusChange);
        self.display_server.set_opacity(target, normal_opacity);
        true
    }

    /// A tracked window moved in the tree, which happens when a reparenting
    /// window manager wraps it in a decoration frame after creation. The
    /// target is resolved again and the opacity moves to the new target.
    /// Events for untracked windows are ignored.
    pub fn window_reparented_handler(&mut self, handle: WindowHandle<H>) -> bool {
        let Some(old_target) = self
            .state
            .registry
            .find_by_window(handle)
            .map(|tracked| tracked.target())
        else {
            return false;
        };
        let Some(new_target) = resolve_target(&self.display_server, handle) else {
            return false;
        };
        tracing::debug!(window = ?handle, ?old_target, ?new_target, "window reparented");

        self.state.registry.reparent(handle, new_target);
        let Some(normal_opacity) =
            self.state
                .registry
                .find_by_target_mut(new_target)
                .map(|tracked| {
                    tracked.focus_state = FocusState::Normal;
                    tracked.normal_opacity
                })
        else {
            return false;
        };

        self.display_server
            .subscribe(new_target, EventMask::FocusChange);
        self.display_server.set_opacity(new_target, normal_opacity);
        true
    }

    /// A window went away. The destroyed id may be either the matched
    /// window or its decoration frame, so both indices are consulted.
    pub fn window_destroyed_handler(&mut self, handle: WindowHandle<H>) -> bool {
        let id = match self.state.registry.find_by_window(handle) {
            Some(tracked) => tracked.window(),
            None => match self.state.registry.find_by_target(handle) {
                Some(tracked) => tracked.window(),
                None => return false,
            },
        };

        if let Some(removed) = self.state.registry.untrack(id) {
            tracing::debug!(
                window = ?removed.window(),
                target = ?removed.target(),
                "untracking destroyed window"
            );
            return true;
        }
        false
    }
}
