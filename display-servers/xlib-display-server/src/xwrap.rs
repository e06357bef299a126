//! A wrapper around calls to xlib and X related functions.
// We allow this _ because if we don't we'll receive an error that it isn't read on _task_guard.
#![allow(clippy::used_underscore_binding)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::os::raw::{c_int, c_long, c_uchar, c_uint, c_ulong};
use std::sync::Arc;
use std::time::Duration;
use std::{ptr, slice};

use tokio::sync::{oneshot, Notify};
use x11_dl::xlib;

use crate::xatom::{self, XAtom};

/// How much property data a single string read will request, in bytes.
const MAX_PROPERTY_VALUE_LEN: c_long = 512;

const OPAQUE: f64 = u32::MAX as f64;

// Xlib reports asynchronous errors through this hook. Windows regularly
// disappear between a query being issued and answered, so `BadWindow` is
// expected traffic, not a fault.
pub extern "C" fn on_error_from_xlib(_: *mut xlib::Display, er: *mut xlib::XErrorEvent) -> c_int {
    let err = unsafe { *er };
    if err.error_code == xlib::BadWindow {
        return 0;
    }
    1
}

/// Contains Xserver information and origins.
pub struct XWrap {
    xlib: xlib::Xlib,
    display: *mut xlib::Display,
    root: xlib::Window,
    pub atoms: XAtom,
    name_atoms: RefCell<HashMap<String, xlib::Atom>>,
    _task_guard: oneshot::Receiver<()>,
    pub task_notify: Arc<Notify>,
}

impl Default for XWrap {
    fn default() -> Self {
        Self::new()
    }
}

impl XWrap {
    /// # Panics
    ///
    /// Panics if unable to contact xorg.
    // `XOpenDisplay`: https://tronche.com/gui/x/xlib/display/opening.html
    // `XConnectionNumber`: https://tronche.com/gui/x/xlib/display/display-macros.html#ConnectionNumber
    // `XDefaultRootWindow`: https://tronche.com/gui/x/xlib/display/display-macros.html#DefaultRootWindow
    // `XSetErrorHandler`: https://tronche.com/gui/x/xlib/event-handling/protocol-errors/XSetErrorHandler.html
    #[must_use]
    pub fn new() -> Self {
        const SERVER: mio::Token = mio::Token(0);
        let xlib = xlib::Xlib::open().expect("Couldn't not connect to Xorg Server");
        let display = unsafe { (xlib.XOpenDisplay)(ptr::null()) };
        assert!(!display.is_null(), "Null pointer in display");

        let fd = unsafe { (xlib.XConnectionNumber)(display) };

        let (guard, _task_guard) = oneshot::channel();
        let notify = Arc::new(Notify::new());
        let task_notify = notify.clone();

        let mut poll = mio::Poll::new().expect("Unable to boot Mio");
        let mut events = mio::Events::with_capacity(1);
        poll.registry()
            .register(
                &mut mio::unix::SourceFd(&fd),
                SERVER,
                mio::Interest::READABLE,
            )
            .expect("Unable to boot Mio");
        let timeout = Duration::from_millis(100);
        tokio::task::spawn_blocking(move || loop {
            if guard.is_closed() {
                return;
            }

            if let Err(err) = poll.poll(&mut events, Some(timeout)) {
                tracing::warn!("Xlib socket poll failed with {:?}", err);
                continue;
            }

            events
                .iter()
                .filter(|event| SERVER == event.token())
                .for_each(|_| notify.notify_one());
        });

        let atoms = XAtom::new(&xlib, display);
        let root = unsafe { (xlib.XDefaultRootWindow)(display) };

        unsafe { (xlib.XSetErrorHandler)(Some(on_error_from_xlib)) };

        Self {
            xlib,
            display,
            root,
            atoms,
            name_atoms: RefCell::new(HashMap::new()),
            _task_guard,
            task_notify,
        }
    }

    /// Returns the default root.
    #[must_use]
    pub const fn get_default_root(&self) -> xlib::Window {
        self.root
    }

    /// Returns the atom for a property name. Atoms are stable for the
    /// process lifetime, so each name is interned once and cached.
    pub fn atom(&self, name: &str) -> xlib::Atom {
        if let Some(atom) = self.name_atoms.borrow().get(name) {
            return *atom;
        }
        let atom = xatom::from_name(&self.xlib, self.display, name);
        self.name_atoms.borrow_mut().insert(name.to_string(), atom);
        atom
    }

    /// Returns a string property of a window, read up to its first NUL.
    /// `None` when the property is absent or not a string.
    // `XGetWindowProperty`: https://tronche.com/gui/x/xlib/window-information/XGetWindowProperty.html
    #[must_use]
    pub fn get_string_property(
        &self,
        window: xlib::Window,
        property: xlib::Atom,
    ) -> Option<String> {
        let mut format_return: i32 = 0;
        let mut nitems_return: c_ulong = 0;
        let mut bytes_after_return: c_ulong = 0;
        let mut type_return: xlib::Atom = 0;
        let mut prop_return: *mut c_uchar = ptr::null_mut();
        unsafe {
            let status = (self.xlib.XGetWindowProperty)(
                self.display,
                window,
                property,
                0,
                MAX_PROPERTY_VALUE_LEN / 4,
                xlib::False,
                xlib::XA_STRING,
                &mut type_return,
                &mut format_return,
                &mut nitems_return,
                &mut bytes_after_return,
                &mut prop_return,
            );
            if status != i32::from(xlib::Success) || prop_return.is_null() {
                return None;
            }
            if type_return != xlib::XA_STRING {
                (self.xlib.XFree)(prop_return.cast());
                return None;
            }
            let bytes = slice::from_raw_parts(prop_return, nitems_return as usize);
            let value = bytes
                .split(|&byte| byte == 0)
                .next()
                .map(|s| String::from_utf8_lossy(s).into_owned());
            (self.xlib.XFree)(prop_return.cast());
            value.filter(|value| !value.is_empty())
        }
    }

    /// Returns the parent, root and children of a window, or `None` when
    /// the query fails (for instance because the window is already gone).
    // `XQueryTree`: https://tronche.com/gui/x/xlib/window-information/XQueryTree.html
    #[must_use]
    pub fn query_tree(
        &self,
        window: xlib::Window,
    ) -> Option<(xlib::Window, xlib::Window, Vec<xlib::Window>)> {
        let mut root_return: xlib::Window = 0;
        let mut parent_return: xlib::Window = 0;
        let mut array: *mut xlib::Window = ptr::null_mut();
        let mut length: c_uint = 0;
        unsafe {
            let status = (self.xlib.XQueryTree)(
                self.display,
                window,
                &mut root_return,
                &mut parent_return,
                &mut array,
                &mut length,
            );
            if status == 0 {
                return None;
            }
            let children = if array.is_null() {
                vec![]
            } else {
                let children = slice::from_raw_parts(array, length as usize).to_vec();
                (self.xlib.XFree)(array.cast());
                children
            };
            Some((parent_return, root_return, children))
        }
    }

    /// Returns the window holding the input focus, if any.
    // `XGetInputFocus`: https://tronche.com/gui/x/xlib/input/XGetInputFocus.html
    #[must_use]
    pub fn get_input_focus(&self) -> Option<xlib::Window> {
        let mut focused: xlib::Window = 0;
        let mut revert_to: c_int = 0;
        unsafe {
            (self.xlib.XGetInputFocus)(self.display, &mut focused, &mut revert_to);
        }
        // PointerRoot (1) and None (0) mean no client window has the focus.
        if focused > 1 {
            Some(focused)
        } else {
            None
        }
    }

    /// Writes an opacity in `[0, 1]` to the window as a 32-bit cardinal.
    // `XChangeProperty`: https://tronche.com/gui/x/xlib/window-information/XChangeProperty.html
    pub fn set_window_opacity(&self, window: xlib::Window, opacity: f32) {
        let value = (f64::from(opacity) * OPAQUE) as c_ulong;
        // Format-32 properties travel as an array of C longs.
        let data = [value as c_long];
        tracing::debug!(window, opacity, value, "setting window opacity");
        unsafe {
            (self.xlib.XChangeProperty)(
                self.display,
                window,
                self.atoms.NetWMWindowOpacity,
                xlib::XA_CARDINAL,
                32,
                xlib::PropModeReplace,
                data.as_ptr().cast::<u8>(),
                1,
            );
        }
    }

    /// Registers this client for the given events from the window.
    // `XSelectInput`: https://tronche.com/gui/x/xlib/event-handling/XSelectInput.html
    pub fn select_input(&self, window: xlib::Window, mask: c_long) {
        unsafe {
            (self.xlib.XSelectInput)(self.display, window, mask);
        }
    }

    /// Returns how many events are ready to be read without blocking.
    #[must_use]
    pub fn queue_len(&self) -> i32 {
        unsafe { (self.xlib.XPending)(self.display) }
    }

    /// Returns the next event from the queue. Blocks when the queue is
    /// empty, so only call it after checking `queue_len`.
    #[must_use]
    pub fn get_next_event(&self) -> xlib::XEvent {
        unsafe {
            let mut event: xlib::XEvent = std::mem::zeroed();
            (self.xlib.XNextEvent)(self.display, &mut event);
            event
        }
    }

    pub fn flush(&self) {
        unsafe { (self.xlib.XFlush)(self.display) };
    }
}
