use crate::config::Config;
use crate::display_servers::DisplayServer;
use crate::models::{Handle, Manager};
use crate::DisplayEvent;

impl<H, C, SERVER> Manager<H, C, SERVER>
where
    H: Handle,
    C: Config,
    SERVER: DisplayServer<H>,
{
    /// Applies one event to the manager. Returns true if the event changed
    /// tracking state or re-applied an opacity.
    pub fn display_event_handler(&mut self, event: DisplayEvent<H>) -> bool {
        match event {
            DisplayEvent::WindowCreated(handle) => self.window_created_handler(handle),
            DisplayEvent::WindowReparented(handle) => self.window_reparented_handler(handle),
            DisplayEvent::FocusIn(handle) => self.focus_in_handler(handle),
            DisplayEvent::FocusOut(handle) => self.focus_out_handler(handle),
            DisplayEvent::WindowDestroyed(handle) => self.window_destroyed_handler(handle),
        }
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use crate::display_servers::DisplayServer;
    use crate::models::{Manager, WindowHandle};
    use crate::DisplayEvent;

    // The end-to-end life of one tracked window: bulk load, a focus cycle,
    // destruction, and a stale focus event afterwards.
    #[test]
    fn a_tracked_window_survives_a_full_focus_cycle() {
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
        manager.apply_all(false);
        assert_eq!(
            manager.display_server.applied_opacities(),
            vec![(frame, 0.5)]
        );

        manager.display_server.clear_applied();
        assert!(manager.display_event_handler(DisplayEvent::FocusIn(frame)));
        assert_eq!(
            manager.display_server.applied_opacities(),
            vec![(frame, 0.8)]
        );

        manager.display_server.clear_applied();
        assert!(manager.display_event_handler(DisplayEvent::FocusOut(frame)));
        assert_eq!(
            manager.display_server.applied_opacities(),
            vec![(frame, 0.5)]
        );

        assert!(manager.display_event_handler(DisplayEvent::WindowDestroyed(client)));
        assert!(manager.state.registry.is_empty());

        manager.display_server.clear_applied();
        assert!(!manager.display_event_handler(DisplayEvent::FocusIn(frame)));
        assert!(manager.display_server.applied_opacities().is_empty());
    }
}
