// Submit triggering
// Fallback-chained activation of the host page's send control

use std::sync::LazyLock;

use log::debug;

use crate::dom::{NodeId, Page, Selector};
use crate::editable::EditableHost;
use crate::key::{Key, KeyEvent};

/// Default submit-control selectors, in priority order. Host pages ship
/// localized control labels, so the list carries the known variants;
/// it is plain data and can be swapped wholesale when the host markup
/// changes.
pub const DEFAULT_SUBMIT_SELECTORS: [&str; 6] = [
    r#"[aria-label="Send"]"#,
    r#"[aria-label="Send message"]"#,
    r#"[data-tooltip*="Send"]"#,
    r#"[aria-label="送信"]"#,
    r#"[aria-label="メッセージを送信"]"#,
    r#"[data-tooltip*="送信"]"#,
];

static DEFAULTS: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    DEFAULT_SUBMIT_SELECTORS
        .iter()
        .map(|s| Selector::parse(s).expect("default submit selector"))
        .collect()
});

pub fn default_submit_selectors() -> Vec<Selector> {
    DEFAULTS.clone()
}

/// Locates and activates the submit control for `host`, best-effort.
///
/// Search order: (1) walk outward from the host, searching each
/// ancestor's subtree (pruning the child subtree already covered) —
/// the control for the focused composer is more likely a near relative
/// than the first match anywhere in a page that may host several
/// composers; (2) the entire owning document; (3) give up locating a
/// control and dispatch a synthetic bubbling Enter keydown at the
/// host, handing the decision back to the page's own handlers.
pub fn submit(page: &mut Page, host: EditableHost, selectors: &[Selector]) {
    let mut searched: Option<NodeId> = None;
    let mut cursor = Some(host.node);
    while let Some(scope) = cursor {
        if let Some(control) = first_match(page, scope, selectors, searched) {
            debug!("submit control {:?} found near host", control);
            page.click(control);
            return;
        }
        searched = Some(scope);
        cursor = page.parent(scope);
    }

    let root = page.document_root(page.document_of(host.node));
    if let Some(control) = first_match(page, root, selectors, None) {
        debug!("submit control {:?} found document-wide", control);
        page.click(control);
        return;
    }

    debug!("no submit control matched; dispatching synthetic Enter");
    page.dispatch_synthetic(host.node, KeyEvent::new(Key::Enter), true);
}

fn first_match(
    page: &Page,
    scope: NodeId,
    selectors: &[Selector],
    skip: Option<NodeId>,
) -> Option<NodeId> {
    selectors
        .iter()
        .find_map(|selector| page.query_selector_in(scope, selector, skip))
}
