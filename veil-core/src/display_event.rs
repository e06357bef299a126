use crate::models::{Handle, WindowHandle};

/// A window life-cycle or focus event sourced from the display server.
/// Focus events carry the id the server delivered them for, which is the
/// target window the focus subscription was made on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayEvent<H: Handle> {
    WindowCreated(WindowHandle<H>),
    WindowReparented(WindowHandle<H>),
    FocusIn(WindowHandle<H>),
    FocusOut(WindowHandle<H>),
    WindowDestroyed(WindowHandle<H>),
}
