use std::future::Future;
use std::pin::Pin;

use crate::config::Config;
use crate::models::{Handle, WindowHandle};
use crate::DisplayEvent;

#[cfg(test)]
mod mock_display_server;

#[cfg(test)]
pub use self::mock_display_server::MockDisplayServer;

/// The event classes a window can be subscribed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventMask {
    /// Creation, reparenting and destruction of child windows. Used on the
    /// root window.
    Substructure,
    /// Focus-in/focus-out events. Used on target windows.
    FocusChange,
}

/// A window's position in the tree as reported by the server. `parent` is
/// `None` for the root window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeLink<H: Handle> {
    pub parent: Option<WindowHandle<H>>,
    pub root: WindowHandle<H>,
}

/// The connection to the windowing system.
///
/// Query methods report failures as `None`/empty results; the engine treats
/// those as "no value" and carries on, so implementations should log rather
/// than panic.
pub trait DisplayServer<H: Handle> {
    fn new(config: &impl Config) -> Self;

    fn root(&self) -> WindowHandle<H>;

    /// Reads a string property of a window. Property-name interning is the
    /// implementation's concern and should be cached for the process
    /// lifetime.
    fn get_string_property(&self, window: WindowHandle<H>, name: &str) -> Option<String>;

    fn get_parent_and_root(&self, window: WindowHandle<H>) -> Option<TreeLink<H>>;

    fn list_children(&self, window: WindowHandle<H>) -> Vec<WindowHandle<H>>;

    fn get_focused_window(&self) -> Option<WindowHandle<H>>;

    /// Writes the opacity value, in `[0, 1]`, to the window.
    fn set_opacity(&self, window: WindowHandle<H>, value: f32);

    fn subscribe(&self, window: WindowHandle<H>, mask: EventMask);

    fn get_next_events(&mut self) -> Vec<DisplayEvent<H>>;

    fn wait_readable(&self) -> Pin<Box<dyn Future<Output = ()>>>;

    fn flush(&self);
}
