use crate::config::Config;
use crate::display_servers::DisplayServer;
use crate::models::{FocusState, Handle, Manager, WindowHandle};

impl<H, C, SERVER> Manager<H, C, SERVER>
where
    H: Handle,
    C: Config,
    SERVER: DisplayServer<H>,
{
    /// A target window took the input focus; switch the tracked window to
    /// its focus opacity. Events for untracked targets are ignored.
    pub fn focus_in_handler(&mut self, target: WindowHandle<H>) -> bool {
        let Some((apply_to, opacity)) =
            self.state
                .registry
                .find_by_target_mut(target)
                .map(|tracked| {
                    tracked.focus_state = FocusState::Focused;
                    (tracked.target(), tracked.focus_opacity)
                })
        else {
            return false;
        };
        self.display_server.set_opacity(apply_to, opacity);
        true
    }

    /// A target window lost the input focus; back to the normal opacity.
    pub fn focus_out_handler(&mut self, target: WindowHandle<H>) -> bool {
        let Some((apply_to, opacity)) =
            self.state
                .registry
                .find_by_target_mut(target)
                .map(|tracked| {
                    tracked.focus_state = FocusState::Normal;
                    (tracked.target(), tracked.normal_opacity)
                })
        else {
            return false;
        };
        self.display_server.set_opacity(apply_to, opacity);
        true
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use crate::display_servers::DisplayServer;
    use crate::models::{Manager, WindowHandle};
    use crate::DisplayEvent;

    fn manager_with_tracked_window() -> (
        Manager<
            crate::models::MockHandle,
            crate::config::TestConfig,
            crate::display_servers::MockDisplayServer<crate::models::MockHandle>,
        >,
        WindowHandle<crate::models::MockHandle>,
    ) {
        let mut manager = Manager::new_test("WM_CLASS(xterm){focus:0.8;normal:0.5;}");
        let root = manager.display_server.root();
        let frame = WindowHandle(1);
        let client = WindowHandle(2);
        manager.display_server.add_window(frame, Some(root));
        manager.display_server.add_window(client, Some(frame));
        manager
            .display_server
            .set_property(client, "WM_CLASS", "xterm");
        manager.scan_windows();
        manager.display_server.clear_applied();
        (manager, frame)
    }

    #[test]
    fn focus_in_applies_the_focus_opacity_to_the_target() {
        let (mut manager, frame) = manager_with_tracked_window();

        assert!(manager.display_event_handler(DisplayEvent::FocusIn(frame)));

        assert_eq!(
            manager.display_server.applied_opacities(),
            vec![(frame, 0.8)]
        );
        let tracked = manager.state.registry.find_by_target(frame).unwrap();
        assert!(tracked.is_focused());
    }

    #[test]
    fn focus_out_returns_to_the_normal_opacity() {
        let (mut manager, frame) = manager_with_tracked_window();
        manager.display_event_handler(DisplayEvent::FocusIn(frame));
        manager.display_server.clear_applied();

        assert!(manager.display_event_handler(DisplayEvent::FocusOut(frame)));

        assert_eq!(
            manager.display_server.applied_opacities(),
            vec![(frame, 0.5)]
        );
        let tracked = manager.state.registry.find_by_target(frame).unwrap();
        assert!(!tracked.is_focused());
    }

    #[test]
    fn focus_events_for_the_matched_window_itself_are_ignored() {
        // Focus subscriptions are made on targets; an event carrying the
        // inner window id finds nothing in the target index.
        let (mut manager, _) = manager_with_tracked_window();

        assert!(!manager.display_event_handler(DisplayEvent::FocusIn(WindowHandle(2))));
        assert!(manager.display_server.applied_opacities().is_empty());
    }
}
