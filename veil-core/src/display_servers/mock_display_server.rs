//! An in-memory display server with a scriptable window tree, used to
//! exercise the classifier and the event handlers.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::pin::Pin;

use super::{Config, DisplayServer, EventMask, TreeLink};
use crate::models::{Handle, WindowHandle};
use crate::DisplayEvent;

#[derive(Debug, Clone, Default)]
struct MockWindow<H: Handle> {
    parent: Option<WindowHandle<H>>,
    children: Vec<WindowHandle<H>>,
    properties: HashMap<String, String>,
}

pub struct MockDisplayServer<H: Handle> {
    root: WindowHandle<H>,
    windows: HashMap<WindowHandle<H>, MockWindow<H>>,
    focused: Option<WindowHandle<H>>,
    broken_tree: HashSet<WindowHandle<H>>,
    pub applied: RefCell<Vec<(WindowHandle<H>, f32)>>,
    pub subscriptions: RefCell<Vec<(WindowHandle<H>, EventMask)>>,
}

impl<H: Handle> MockDisplayServer<H> {
    /// Adds a window below `parent`. Windows added with no parent behave
    /// like orphans: the server knows them but reports no tree position
    /// above them.
    pub fn add_window(&mut self, window: WindowHandle<H>, parent: Option<WindowHandle<H>>) {
        self.windows.entry(window).or_default().parent = parent;
        if let Some(parent) = parent {
            self.windows.entry(parent).or_default().children.push(window);
        }
    }

    pub fn set_property(&mut self, window: WindowHandle<H>, name: &str, value: &str) {
        self.windows
            .entry(window)
            .or_default()
            .properties
            .insert(name.to_string(), value.to_string());
    }

    pub fn set_focused(&mut self, window: Option<WindowHandle<H>>) {
        self.focused = window;
    }

    /// Makes tree queries for the window fail from now on.
    pub fn break_tree_query(&mut self, window: WindowHandle<H>) {
        self.broken_tree.insert(window);
    }

    pub fn applied_opacities(&self) -> Vec<(WindowHandle<H>, f32)> {
        self.applied.borrow().clone()
    }

    pub fn clear_applied(&self) {
        self.applied.borrow_mut().clear();
    }
}

impl<H: Handle> DisplayServer<H> for MockDisplayServer<H> {
    fn new(_: &impl Config) -> Self {
        let root = WindowHandle(H::default());
        let mut windows = HashMap::new();
        windows.insert(root, MockWindow::default());
        Self {
            root,
            windows,
            focused: None,
            broken_tree: HashSet::new(),
            applied: RefCell::new(vec![]),
            subscriptions: RefCell::new(vec![]),
        }
    }

    fn root(&self) -> WindowHandle<H> {
        self.root
    }

    fn get_string_property(&self, window: WindowHandle<H>, name: &str) -> Option<String> {
        self.windows.get(&window)?.properties.get(name).cloned()
    }

    fn get_parent_and_root(&self, window: WindowHandle<H>) -> Option<TreeLink<H>> {
        if self.broken_tree.contains(&window) {
            return None;
        }
        let window = self.windows.get(&window)?;
        Some(TreeLink {
            parent: window.parent,
            root: self.root,
        })
    }

    fn list_children(&self, window: WindowHandle<H>) -> Vec<WindowHandle<H>> {
        self.windows
            .get(&window)
            .map(|w| w.children.clone())
            .unwrap_or_default()
    }

    fn get_focused_window(&self) -> Option<WindowHandle<H>> {
        self.focused
    }

    fn set_opacity(&self, window: WindowHandle<H>, value: f32) {
        self.applied.borrow_mut().push((window, value));
    }

    fn subscribe(&self, window: WindowHandle<H>, mask: EventMask) {
        self.subscriptions.borrow_mut().push((window, mask));
    }

    fn get_next_events(&mut self) -> Vec<DisplayEvent<H>> {
        vec![]
    }

    fn wait_readable(&self) -> Pin<Box<dyn Future<Output = ()>>> {
        Box::pin(async {})
    }

    fn flush(&self) {}
}
