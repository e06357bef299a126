use crate::config::Config;
use crate::display_servers::{DisplayServer, EventMask};
use crate::models::{Handle, Manager};

impl<H, C, SERVER> Manager<H, C, SERVER>
where
    H: Handle,
    C: Config,
    SERVER: DisplayServer<H>,
{
    /// Watches the display server and applies rules as windows come, go,
    /// move and change focus. Waiting for the connection to become readable
    /// is the loop's only suspension point; every pending event is then
    /// processed to completion before waiting again. This function does not
    /// return.
    pub async fn event_loop(mut self) {
        self.display_server
            .subscribe(self.display_server.root(), EventMask::Substructure);
        for window in self.state.registry.windows() {
            self.display_server
                .subscribe(window.target(), EventMask::FocusChange);
        }
        self.display_server.flush();

        loop {
            self.display_server.wait_readable().await;
            for event in self.display_server.get_next_events() {
                tracing::trace!(?event, "display event");
                self.display_event_handler(event);
            }
            self.display_server.flush();
        }
    }
}
