use veil_core::{DisplayEvent, WindowHandle};
use x11_dl::xlib;

use crate::XlibWindowHandle;

/// Translates a raw X event into a [`DisplayEvent`]. Event types the
/// engine has no use for are dropped.
pub fn from_xlib_event(raw_event: xlib::XEvent) -> Option<DisplayEvent<XlibWindowHandle>> {
    match raw_event.get_type() {
        // New window was created.
        xlib::CreateNotify => {
            let event = xlib::XCreateWindowEvent::from(raw_event);
            Some(DisplayEvent::WindowCreated(handle(event.window)))
        }
        // Window was moved to a new parent, usually into a decoration
        // frame.
        xlib::ReparentNotify => {
            let event = xlib::XReparentEvent::from(raw_event);
            Some(DisplayEvent::WindowReparented(handle(event.window)))
        }
        // A subscribed target window gained the input focus.
        xlib::FocusIn => {
            let event = xlib::XFocusChangeEvent::from(raw_event);
            Some(DisplayEvent::FocusIn(handle(event.window)))
        }
        // A subscribed target window lost the input focus.
        xlib::FocusOut => {
            let event = xlib::XFocusChangeEvent::from(raw_event);
            Some(DisplayEvent::FocusOut(handle(event.window)))
        }
        // Window is gone.
        xlib::DestroyNotify => {
            let event = xlib::XDestroyWindowEvent::from(raw_event);
            Some(DisplayEvent::WindowDestroyed(handle(event.window)))
        }
        _other => None,
    }
}

const fn handle(window: xlib::Window) -> WindowHandle<XlibWindowHandle> {
    WindowHandle(XlibWindowHandle(window))
}
