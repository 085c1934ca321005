// Editable-field resolution
// Finds the composition surface an event actually targets

use crate::dom::{NodeId, Page};

/// What kind of surface the user is typing into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditableKind {
    /// A `textarea`: linear text buffer plus integer selection range.
    PlainField,
    /// A `contenteditable="true"` region driven by rich-text commands.
    RichRegion,
}

/// The resolved editable host for one keydown. At most one exists per
/// event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditableHost {
    pub node: NodeId,
    pub kind: EditableKind,
}

/// Walks the ancestor chain from `target` toward the document root and
/// returns the first recognized editable host, or `None` when the root
/// is reached without a match. Pure lookup, O(depth).
///
/// Single-line inputs are deliberately not recognized: they cannot
/// hold a line break, so there is nothing for the engine to rewrite.
pub fn resolve(page: &Page, target: NodeId) -> Option<EditableHost> {
    let mut cursor = Some(target);
    while let Some(node) = cursor {
        if let Some(kind) = editable_kind(page, node) {
            return Some(EditableHost { node, kind });
        }
        cursor = page.parent(node);
    }
    None
}

fn editable_kind(page: &Page, node: NodeId) -> Option<EditableKind> {
    let node = page.node(node);
    if node.tag() == "textarea" {
        Some(EditableKind::PlainField)
    } else if node.attr("contenteditable") == Some("true") {
        Some(EditableKind::RichRegion)
    } else {
        None
    }
}
