//! The store of currently tracked windows.

use std::collections::HashMap;

use super::{Handle, TrackedWindow, WindowHandle};

/// Owns every [`TrackedWindow`] and keeps two lookup indices over them: one
/// by the window that matched a rule and one by the target window the
/// opacity is written to.
///
/// The window map is the single owner of the values; the target index only
/// holds window ids. Invariant: every tracked window has exactly one target
/// index entry, keyed by its current target, and no target entry exists
/// without its window entry.
#[derive(Debug, Default)]
pub struct Registry<H: Handle> {
    windows: HashMap<WindowHandle<H>, TrackedWindow<H>>,
    targets: HashMap<WindowHandle<H>, WindowHandle<H>>,
}

impl<H: Handle> Registry<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts the window under both indices, replacing and returning any
    /// previous entry for the same window id. A replaced entry's target
    /// index entry is removed first.
    pub fn track(&mut self, tracked: TrackedWindow<H>) -> Option<TrackedWindow<H>> {
        let id = tracked.window();
        let target = tracked.target();
        let prev = self.windows.insert(id, tracked);
        if let Some(prev) = &prev {
            if self.targets.get(&prev.target()) == Some(&id) {
                self.targets.remove(&prev.target());
            }
        }
        self.targets.insert(target, id);
        prev
    }

    pub fn find_by_window(&self, id: WindowHandle<H>) -> Option<&TrackedWindow<H>> {
        self.windows.get(&id)
    }

    pub fn find_by_target(&self, target: WindowHandle<H>) -> Option<&TrackedWindow<H>> {
        self.windows.get(self.targets.get(&target)?)
    }

    pub fn find_by_target_mut(
        &mut self,
        target: WindowHandle<H>,
    ) -> Option<&mut TrackedWindow<H>> {
        let id = *self.targets.get(&target)?;
        self.windows.get_mut(&id)
    }

    /// Removes the window from both indices. Unknown ids are a no-op.
    pub fn untrack(&mut self, id: WindowHandle<H>) -> Option<TrackedWindow<H>> {
        let removed = self.windows.remove(&id)?;
        if self.targets.get(&removed.target()) == Some(&id) {
            self.targets.remove(&removed.target());
        }
        Some(removed)
    }

    /// Moves the window's target index entry to `new_target` and updates the
    /// tracked window in place. The window index entry is untouched.
    pub fn reparent(&mut self, id: WindowHandle<H>, new_target: WindowHandle<H>) -> bool {
        let Some(tracked) = self.windows.get_mut(&id) else {
            return false;
        };
        let old_target = tracked.target();
        tracked.set_target(new_target);
        if self.targets.get(&old_target) == Some(&id) {
            self.targets.remove(&old_target);
        }
        self.targets.insert(new_target, id);
        true
    }

    pub fn clear(&mut self) {
        self.windows.clear();
        self.targets.clear();
    }

    pub fn windows(&self) -> impl Iterator<Item = &TrackedWindow<H>> {
        self.windows.values()
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MockHandle;

    fn tracked(window: i32, target: i32) -> TrackedWindow<MockHandle> {
        TrackedWindow::new(WindowHandle(window), WindowHandle(target), 0.8, 0.5)
    }

    // Both indices must resolve every window to the same value, and the
    // target index must not hold anything the window index does not.
    fn assert_indices_consistent(registry: &Registry<MockHandle>) {
        for (id, window) in &registry.windows {
            let by_target = registry
                .find_by_target(window.target())
                .expect("window unreachable through its target");
            assert!(std::ptr::eq(window, by_target));
            assert_eq!(registry.targets.get(&window.target()), Some(id));
        }
        for (target, id) in &registry.targets {
            let window = registry
                .find_by_window(*id)
                .expect("target entry without a window entry");
            assert_eq!(window.target(), *target);
        }
    }

    #[test]
    fn tracked_windows_are_reachable_through_both_indices() {
        let mut registry = Registry::new();
        registry.track(tracked(1, 10));
        registry.track(tracked(2, 20));

        let by_window = registry.find_by_window(WindowHandle(1)).unwrap();
        let by_target = registry.find_by_target(WindowHandle(10)).unwrap();
        assert!(std::ptr::eq(by_window, by_target));
        assert_eq!(registry.len(), 2);
        assert_indices_consistent(&registry);
    }

    #[test]
    fn tracking_the_same_window_twice_keeps_one_entry_per_index() {
        let mut registry = Registry::new();
        registry.track(tracked(1, 10));
        let replaced = registry.track(tracked(1, 11));

        assert_eq!(replaced.unwrap().target(), WindowHandle(10));
        assert_eq!(registry.len(), 1);
        assert!(registry.find_by_target(WindowHandle(10)).is_none());
        assert_eq!(
            registry
                .find_by_target(WindowHandle(11))
                .unwrap()
                .window(),
            WindowHandle(1)
        );
        assert_indices_consistent(&registry);
    }

    #[test]
    fn untrack_removes_both_index_entries() {
        let mut registry = Registry::new();
        registry.track(tracked(1, 10));

        let removed = registry.untrack(WindowHandle(1));

        assert_eq!(removed.unwrap().window(), WindowHandle(1));
        assert!(registry.find_by_window(WindowHandle(1)).is_none());
        assert!(registry.find_by_target(WindowHandle(10)).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn untrack_of_an_unknown_id_is_a_no_op() {
        let mut registry = Registry::new();
        registry.track(tracked(1, 10));

        assert!(registry.untrack(WindowHandle(99)).is_none());
        assert_eq!(registry.len(), 1);
        assert_indices_consistent(&registry);
    }

    #[test]
    fn reparent_moves_the_target_index_entry() {
        let mut registry = Registry::new();
        registry.track(tracked(1, 10));

        assert!(registry.reparent(WindowHandle(1), WindowHandle(20)));

        assert!(registry.find_by_target(WindowHandle(10)).is_none());
        let by_target = registry.find_by_target(WindowHandle(20)).unwrap();
        assert_eq!(by_target.window(), WindowHandle(1));
        assert_eq!(by_target.target(), WindowHandle(20));
        assert_indices_consistent(&registry);
    }

    #[test]
    fn reparent_of_an_unknown_id_is_rejected() {
        let mut registry: Registry<MockHandle> = Registry::new();
        assert!(!registry.reparent(WindowHandle(1), WindowHandle(20)));
        assert!(registry.is_empty());
    }

    #[test]
    fn clear_empties_both_indices() {
        let mut registry = Registry::new();
        registry.track(tracked(1, 10));
        registry.track(tracked(2, 20));

        registry.clear();

        assert!(registry.is_empty());
        assert!(registry.find_by_target(WindowHandle(10)).is_none());
        assert!(registry.find_by_target(WindowHandle(20)).is_none());
    }

    #[test]
    fn indices_stay_consistent_across_mixed_operations() {
        let mut registry = Registry::new();
        registry.track(tracked(1, 10));
        registry.track(tracked(2, 20));
        registry.track(tracked(3, 30));
        registry.reparent(WindowHandle(2), WindowHandle(21));
        registry.track(tracked(1, 12));
        registry.untrack(WindowHandle(3));
        registry.reparent(WindowHandle(1), WindowHandle(13));

        assert_eq!(registry.len(), 2);
        assert_indices_consistent(&registry);
    }
}
