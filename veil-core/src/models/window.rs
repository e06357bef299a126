//! Tracked window information.

use std::fmt::Debug;
use std::hash::Hash;

/// A trait which backend specific window handles need to implement.
pub trait Handle:
    Debug + Clone + Copy + PartialEq + Eq + Hash + Default + Send + 'static
{
}

/// A backend-agnostic handle to a window used to identify it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct WindowHandle<H>(pub H)
where
    H: Handle;

/// Handle for testing purposes.
pub type MockHandle = i32;
impl Handle for MockHandle {}

/// The focus half of a tracked window's state. A window is `Normal` from
/// the moment it is tracked until a focus-in event arrives for its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusState {
    #[default]
    Normal,
    Focused,
}

/// A window that matched a rule and is having its opacity managed.
///
/// `window` is the window that matched; `target` is its topmost ancestor
/// below the root, which is where the opacity property is actually written.
/// Reparenting window managers wrap matched windows in decoration frames,
/// so the two frequently differ.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedWindow<H: Handle> {
    window: WindowHandle<H>,
    target: WindowHandle<H>,
    pub focus_opacity: f32,
    pub normal_opacity: f32,
    pub focus_state: FocusState,
}

impl<H: Handle> TrackedWindow<H> {
    pub fn new(
        window: WindowHandle<H>,
        target: WindowHandle<H>,
        focus_opacity: f32,
        normal_opacity: f32,
    ) -> Self {
        Self {
            window,
            target,
            focus_opacity,
            normal_opacity,
            focus_state: FocusState::Normal,
        }
    }

    pub const fn window(&self) -> WindowHandle<H> {
        self.window
    }

    pub const fn target(&self) -> WindowHandle<H> {
        self.target
    }

    pub const fn is_focused(&self) -> bool {
        matches!(self.focus_state, FocusState::Focused)
    }

    // The registry owns target changes so the by-target index can follow.
    pub(crate) fn set_target(&mut self, target: WindowHandle<H>) {
        self.target = target;
    }
}
