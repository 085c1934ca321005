// Node arena primitives for the host-page model

use indexmap::IndexMap;

use super::style::{ComputedStyle, Rect};
use crate::key::KeyEvent;

/// Arena handle for a node within a `Page`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

/// Arena handle for a document within a `Page`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentId(pub(crate) usize);

/// Plain-field text buffer with an integer selection range.
///
/// Offsets are byte offsets into `value` and always sit on character
/// boundaries; a collapsed selection has `selection_start ==
/// selection_end`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBuffer {
    pub value: String,
    pub selection_start: usize,
    pub selection_end: usize,
}

impl TextBuffer {
    pub fn with_cursor_at_end(value: &str) -> Self {
        Self {
            value: value.to_string(),
            selection_start: value.len(),
            selection_end: value.len(),
        }
    }
}

/// Rich-text command issued against a contenteditable region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditCommand {
    /// Soft break: a new visual line inside the current block.
    InsertLineBreak,
    /// Block split: in a list this produces the next list item.
    InsertParagraph,
}

/// Live editing state of a rich-text region: the caret context the
/// engine queries, plus the log of commands it issued. The host page
/// owns the actual rich-text tree; only the observable surface is
/// modeled here.
#[derive(Debug, Clone, Default)]
pub struct RichState {
    pub caret_in_list: bool,
    pub commands: Vec<EditCommand>,
}

/// Frame state carried by an `iframe` element.
#[derive(Debug, Clone)]
pub struct FrameState {
    pub origin: String,
    pub content: Option<DocumentId>,
    pub loaded: bool,
}

/// Structural mutation record, drained by the frame injector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    /// A frame-bearing element was added somewhere in the tree.
    FrameAdded(NodeId),
    /// A frame finished loading its content document.
    FrameLoaded(NodeId),
}

/// Synthetic keydown the engine dispatched back at the host page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntheticKeydown {
    pub target: NodeId,
    pub event: KeyEvent,
    pub bubbles: bool,
}

/// One element in the arena.
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) document: DocumentId,
    pub(crate) tag: String,
    pub(crate) attrs: IndexMap<String, String>,
    pub(crate) style: ComputedStyle,
    pub(crate) rect: Rect,
    pub(crate) shadow_root: Option<NodeId>,
    pub(crate) frame: Option<FrameState>,
    pub(crate) text: Option<TextBuffer>,
    pub(crate) rich: Option<RichState>,
}

impl Node {
    pub(crate) fn new(tag: &str, document: DocumentId, parent: Option<NodeId>) -> Self {
        Self {
            parent,
            children: Vec::new(),
            document,
            tag: tag.to_ascii_lowercase(),
            attrs: IndexMap::new(),
            style: ComputedStyle::default(),
            rect: Rect::default(),
            shadow_root: None,
            frame: None,
            text: None,
            rich: None,
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.contains_key(name)
    }

    pub fn style(&self) -> ComputedStyle {
        self.style
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn shadow_root(&self) -> Option<NodeId> {
        self.shadow_root
    }

    pub fn is_frame(&self) -> bool {
        self.frame.is_some()
    }

    pub fn frame(&self) -> Option<&FrameState> {
        self.frame.as_ref()
    }
}
