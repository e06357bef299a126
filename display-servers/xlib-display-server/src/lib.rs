// allow casting types
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

mod event_translate;
mod xatom;
mod xwrap;

pub use xwrap::XWrap;

use std::future::Future;
use std::pin::Pin;

use veil_core::config::Config;
use veil_core::models::Handle;
use veil_core::{DisplayEvent, DisplayServer, EventMask, TreeLink, WindowHandle};
use x11_dl::xlib;

use event_translate::from_xlib_event;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct XlibWindowHandle(pub xlib::Window);
impl Handle for XlibWindowHandle {}

pub struct XlibDisplayServer {
    xw: XWrap,
    root: xlib::Window,
}

impl DisplayServer<XlibWindowHandle> for XlibDisplayServer {
    fn new(_config: &impl Config) -> Self {
        let xw = XWrap::new();
        let root = xw.get_default_root();
        Self { xw, root }
    }

    fn root(&self) -> WindowHandle<XlibWindowHandle> {
        WindowHandle(XlibWindowHandle(self.root))
    }

    fn get_string_property(
        &self,
        window: WindowHandle<XlibWindowHandle>,
        name: &str,
    ) -> Option<String> {
        let WindowHandle(XlibWindowHandle(window)) = window;
        let atom = self.xw.atom(name);
        self.xw.get_string_property(window, atom)
    }

    fn get_parent_and_root(
        &self,
        window: WindowHandle<XlibWindowHandle>,
    ) -> Option<TreeLink<XlibWindowHandle>> {
        let WindowHandle(XlibWindowHandle(window)) = window;
        let (parent, root, _) = self.xw.query_tree(window)?;
        Some(TreeLink {
            parent: (parent != 0).then(|| WindowHandle(XlibWindowHandle(parent))),
            root: WindowHandle(XlibWindowHandle(root)),
        })
    }

    fn list_children(
        &self,
        window: WindowHandle<XlibWindowHandle>,
    ) -> Vec<WindowHandle<XlibWindowHandle>> {
        let WindowHandle(XlibWindowHandle(window)) = window;
        match self.xw.query_tree(window) {
            Some((_, _, children)) => children
                .into_iter()
                .map(|child| WindowHandle(XlibWindowHandle(child)))
                .collect(),
            None => {
                tracing::warn!(window, "failed to query tree for children");
                vec![]
            }
        }
    }

    fn get_focused_window(&self) -> Option<WindowHandle<XlibWindowHandle>> {
        self.xw
            .get_input_focus()
            .map(|focused| WindowHandle(XlibWindowHandle(focused)))
    }

    fn set_opacity(&self, window: WindowHandle<XlibWindowHandle>, value: f32) {
        let WindowHandle(XlibWindowHandle(window)) = window;
        self.xw.set_window_opacity(window, value);
    }

    fn subscribe(&self, window: WindowHandle<XlibWindowHandle>, mask: EventMask) {
        let WindowHandle(XlibWindowHandle(window)) = window;
        let mask = match mask {
            EventMask::Substructure => xlib::SubstructureNotifyMask,
            EventMask::FocusChange => xlib::FocusChangeMask,
        };
        self.xw.select_input(window, mask);
    }

    fn get_next_events(&mut self) -> Vec<DisplayEvent<XlibWindowHandle>> {
        let mut events = Vec::new();
        let events_in_queue = self.xw.queue_len();
        for _ in 0..events_in_queue {
            let xlib_event = self.xw.get_next_event();
            if let Some(event) = from_xlib_event(xlib_event) {
                tracing::trace!("DisplayEvent: {:?}", event);
                events.push(event);
            }
        }
        events
    }

    fn wait_readable(&self) -> Pin<Box<dyn Future<Output = ()>>> {
        let task_notify = self.xw.task_notify.clone();
        Box::pin(async move {
            task_notify.notified().await;
        })
    }

    fn flush(&self) {
        self.xw.flush();
    }
}
