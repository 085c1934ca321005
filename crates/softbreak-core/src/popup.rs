// Suggestion-popup visibility detection
//
// Autocomplete and mention popups are routinely rendered far from the
// editable host: portaled to the document body, inside shadow-hosted
// widgets, in the top document when the composer lives in a frame, or
// in a sibling frame. A naive search under the host's subtree
// under-detects, and a missed popup turns plain Enter into a line
// break right when the user meant "commit the highlighted suggestion".
//
// The search walks an ordered scope list with an explicit worklist and
// a visited-set guard; cross-origin scopes drop out silently.

use std::collections::{HashSet, VecDeque};

use log::trace;

use crate::dom::{NodeId, Page};
use crate::editable::EditableHost;

/// Structural role marking a suggestion surface.
const SUGGESTION_ROLE: &str = "listbox";

/// True when a suggestion popup is actually visible anywhere reachable
/// from `host`'s owning document.
///
/// Scope order: the owning document, shadow subtrees reachable from the
/// current scope (recursively), the same-origin top document if
/// different, then same-origin frames of the owning document. The
/// first visible candidate short-circuits the whole search.
pub fn is_suggestion_popup_visible(page: &Page, host: EditableHost) -> bool {
    let owning = page.document_of(host.node);
    let mut visited: HashSet<NodeId> = HashSet::new();
    let mut queue: VecDeque<NodeId> = VecDeque::new();

    queue.push_back(page.document_root(owning));
    if scan_scopes(page, &mut queue, &mut visited) {
        return true;
    }

    match page.top_document_from(owning) {
        Ok(top) if top != owning => {
            queue.push_back(page.document_root(top));
            if scan_scopes(page, &mut queue, &mut visited) {
                return true;
            }
        }
        _ => {}
    }

    for frame in page.frames_in(owning) {
        match page.content_document(frame) {
            Ok(Some(doc)) => queue.push_back(page.document_root(doc)),
            Ok(None) => {}
            Err(denied) => trace!("popup scan skips frame: {}", denied),
        }
    }
    scan_scopes(page, &mut queue, &mut visited)
}

/// Drains the scope worklist. Shadow roots discovered along the way are
/// enqueued behind the scope that hosts them; the visited set bounds
/// pathological nesting and repeated roots.
fn scan_scopes(page: &Page, queue: &mut VecDeque<NodeId>, visited: &mut HashSet<NodeId>) -> bool {
    while let Some(root) = queue.pop_front() {
        if !visited.insert(root) {
            continue;
        }
        for node in page.subtree(root) {
            if let Some(shadow) = page.node(node).shadow_root() {
                queue.push_back(shadow);
            }
            if is_candidate(page, node) && is_actually_visible(page, node) {
                trace!("visible suggestion popup at {:?}", node);
                return true;
            }
        }
    }
    false
}

fn is_candidate(page: &Page, node: NodeId) -> bool {
    page.node(node).attr("role") == Some(SUGGESTION_ROLE)
}

/// "Actually visible": attached to a live document, rendered by its
/// resolved style, and laid out with a non-degenerate box.
pub(crate) fn is_actually_visible(page: &Page, node: NodeId) -> bool {
    page.is_connected(node)
        && page.node(node).style().renders()
        && !page.node(node).rect().is_degenerate()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{ComputedStyle, Rect};
    use crate::editable;

    fn page_with_composer() -> (Page, EditableHost) {
        let mut page = Page::new("https://chat.example.com");
        let root = page.document_root(page.top_document());
        let region = page.create_rich_region(root);
        let host = editable::resolve(&page, region).unwrap();
        (page, host)
    }

    fn make_visible(page: &mut Page, node: NodeId) {
        page.set_rect(node, Rect::new(40.0, 300.0, 280.0, 160.0));
    }

    #[test]
    fn test_no_popup_anywhere() {
        let (page, host) = page_with_composer();
        assert!(!is_suggestion_popup_visible(&page, host));
    }

    #[test]
    fn test_visible_popup_in_owning_document() {
        let (mut page, host) = page_with_composer();
        let root = page.document_root(page.top_document());
        let popup = page.create_element(root, "div");
        page.set_attr(popup, "role", "listbox");
        make_visible(&mut page, popup);
        assert!(is_suggestion_popup_visible(&page, host));
    }

    #[test]
    fn test_hidden_popup_not_counted() {
        let (mut page, host) = page_with_composer();
        let root = page.document_root(page.top_document());
        let popup = page.create_element(root, "div");
        page.set_attr(popup, "role", "listbox");
        make_visible(&mut page, popup);
        page.set_style(popup, ComputedStyle::display_none());
        assert!(!is_suggestion_popup_visible(&page, host));
    }

    #[test]
    fn test_degenerate_rect_not_counted() {
        let (mut page, host) = page_with_composer();
        let root = page.document_root(page.top_document());
        let popup = page.create_element(root, "div");
        page.set_attr(popup, "role", "listbox");
        // Default zero rect: styled visible but never laid out.
        assert!(!is_suggestion_popup_visible(&page, host));
    }

    #[test]
    fn test_detached_popup_not_counted() {
        let (mut page, host) = page_with_composer();
        let root = page.document_root(page.top_document());
        let popup = page.create_element(root, "div");
        page.set_attr(popup, "role", "listbox");
        make_visible(&mut page, popup);
        page.detach(popup);
        assert!(!is_suggestion_popup_visible(&page, host));
    }

    #[test]
    fn test_popup_inside_shadow_subtree() {
        let (mut page, host) = page_with_composer();
        let root = page.document_root(page.top_document());
        let widget = page.create_element(root, "div");
        let shadow = page.attach_shadow(widget);
        let popup = page.create_element(shadow, "div");
        page.set_attr(popup, "role", "listbox");
        make_visible(&mut page, popup);
        assert!(is_suggestion_popup_visible(&page, host));
    }

    #[test]
    fn test_popup_in_nested_shadow() {
        let (mut page, host) = page_with_composer();
        let root = page.document_root(page.top_document());
        let outer_host = page.create_element(root, "div");
        let outer_shadow = page.attach_shadow(outer_host);
        let inner_host = page.create_element(outer_shadow, "div");
        let inner_shadow = page.attach_shadow(inner_host);
        let popup = page.create_element(inner_shadow, "div");
        page.set_attr(popup, "role", "listbox");
        make_visible(&mut page, popup);
        assert!(is_suggestion_popup_visible(&page, host));
    }

    #[test]
    fn test_popup_in_top_document_seen_from_frame() {
        // Composer lives in a same-origin frame, the popup is portaled
        // into the top document.
        let mut page = Page::new("https://chat.example.com");
        let root = page.document_root(page.top_document());
        let frame = page.create_frame(root, "https://chat.example.com");
        let frame_doc = page.load_frame(frame);
        let region = page.create_rich_region(page.document_root(frame_doc));
        let host = editable::resolve(&page, region).unwrap();

        let popup = page.create_element(root, "div");
        page.set_attr(popup, "role", "listbox");
        make_visible(&mut page, popup);
        assert!(is_suggestion_popup_visible(&page, host));
    }

    #[test]
    fn test_popup_in_same_origin_child_frame() {
        let (mut page, host) = page_with_composer();
        let root = page.document_root(page.top_document());
        let frame = page.create_frame(root, "https://chat.example.com");
        let frame_doc = page.load_frame(frame);
        let popup = page.create_element(page.document_root(frame_doc), "div");
        page.set_attr(popup, "role", "listbox");
        make_visible(&mut page, popup);
        assert!(is_suggestion_popup_visible(&page, host));
    }

    #[test]
    fn test_cross_origin_frame_excluded_silently() {
        let (mut page, host) = page_with_composer();
        let root = page.document_root(page.top_document());
        let frame = page.create_frame(root, "https://ads.example.net");
        let ad_doc = page.load_frame(frame);
        // A visible listbox inside the cross-origin document must not
        // be reachable, and the query must not fail.
        let popup = page.create_element(page.document_root(ad_doc), "div");
        page.set_attr(popup, "role", "listbox");
        make_visible(&mut page, popup);
        assert!(!is_suggestion_popup_visible(&page, host));
    }

    #[test]
    fn test_cross_origin_top_excluded_silently() {
        // Composer in a frame whose origin differs from the top page.
        let mut page = Page::new("https://portal.example.org");
        let root = page.document_root(page.top_document());
        let popup = page.create_element(root, "div");
        page.set_attr(popup, "role", "listbox");
        make_visible(&mut page, popup);

        let frame = page.create_frame(root, "https://chat.example.com");
        let frame_doc = page.load_frame(frame);
        let region = page.create_rich_region(page.document_root(frame_doc));
        let host = editable::resolve(&page, region).unwrap();
        assert!(!is_suggestion_popup_visible(&page, host));
    }

    #[test]
    fn test_unloaded_frame_skipped() {
        let (mut page, host) = page_with_composer();
        let root = page.document_root(page.top_document());
        page.create_frame(root, "https://chat.example.com");
        assert!(!is_suggestion_popup_visible(&page, host));
    }
}
