mod manager;
mod registry;
mod window;

pub use manager::Manager;
pub use registry::Registry;
pub use window::{FocusState, Handle, MockHandle, TrackedWindow, WindowHandle};
