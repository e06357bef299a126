//! Decides whether a window matches the rule set and which window the
//! opacity should be written to.

use crate::display_servers::DisplayServer;
use crate::models::{Handle, TrackedWindow, WindowHandle};
use crate::rules::Rule;

/// Upper bound on the ancestor walk, in case a misbehaving server reports a
/// cyclic or absurdly deep tree.
const MAX_ANCESTOR_DEPTH: usize = 1024;

/// Checks the window against the rules in order and returns a tracked
/// window built from the first rule whose every matcher succeeds, or `None`
/// when no rule matches. A property that is absent or differs fails its
/// matcher and moves evaluation to the next rule.
///
/// Returns `None` as well when the match succeeds but the target cannot be
/// resolved; that window is skipped, not the scan.
pub fn classify<H, SERVER>(
    server: &SERVER,
    rules: &[Rule],
    window: WindowHandle<H>,
) -> Option<TrackedWindow<H>>
where
    H: Handle,
    SERVER: DisplayServer<H>,
{
    let (index, rule) = rules.iter().enumerate().find(|(_, rule)| {
        rule.matchers.iter().all(|matcher| {
            server
                .get_string_property(window, &matcher.property)
                .is_some_and(|value| value == matcher.value)
        })
    })?;

    let target = resolve_target(server, window)?;
    tracing::debug!(
        ?window,
        ?target,
        rule = index,
        focus_opacity = rule.focus_opacity,
        normal_opacity = rule.normal_opacity,
        "window matched rule"
    );
    Some(TrackedWindow::new(
        window,
        target,
        rule.focus_opacity,
        rule.normal_opacity,
    ))
}

/// Walks the ancestor chain upward until the parent is the root; the window
/// just below the root is the target. A window with no parent at all is its
/// own target. A failed tree query aborts the walk.
pub fn resolve_target<H, SERVER>(
    server: &SERVER,
    window: WindowHandle<H>,
) -> Option<WindowHandle<H>>
where
    H: Handle,
    SERVER: DisplayServer<H>,
{
    let mut current = window;
    for _ in 0..MAX_ANCESTOR_DEPTH {
        let Some(link) = server.get_parent_and_root(current) else {
            tracing::warn!(?window, ?current, "tree query failed while resolving target");
            return None;
        };
        match link.parent {
            None => return Some(current),
            Some(parent) if parent == link.root => return Some(current),
            Some(parent) => current = parent,
        }
    }
    tracing::warn!(?window, "giving up on ancestor chain deeper than {MAX_ANCESTOR_DEPTH}");
    None
}
