//! Atoms the adapter needs by name.

use std::ffi::CString;
use std::os::raw::c_char;

use x11_dl::xlib;

#[allow(non_snake_case)]
pub struct XAtom {
    pub NetWMWindowOpacity: xlib::Atom,
}

impl XAtom {
    pub fn new(xlib: &xlib::Xlib, dpy: *mut xlib::Display) -> XAtom {
        XAtom {
            NetWMWindowOpacity: from_name(xlib, dpy, "_NET_WM_WINDOW_OPACITY"),
        }
    }
}

pub fn from_name(xlib: &xlib::Xlib, dpy: *mut xlib::Display, name: &str) -> xlib::Atom {
    let cstring = CString::new(name).unwrap_or_default();
    unsafe { (xlib.XInternAtom)(dpy, cstring.as_ptr().cast::<c_char>(), xlib::False) }
}
