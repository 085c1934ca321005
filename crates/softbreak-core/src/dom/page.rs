// Page model: documents, frames, and the node arena
//
// This is the seam between the engine and the host environment. The
// engine never reaches into a live browser; it routes against this
// model, and the host layer keeps the model current. Cross-origin
// boundaries surface as `AccessDenied` values so every call site makes
// its fallback decision explicitly.

use std::fmt;

use super::node::{
    DocumentId, EditCommand, FrameState, Mutation, Node, NodeId, RichState, SyntheticKeydown,
    TextBuffer,
};
use super::selector::Selector;
use super::style::{ComputedStyle, Rect};
use crate::key::KeyEvent;

/// Cross-origin access refusal. A value, not a panic: the scope that
/// produced it is excluded from the current operation and everything
/// else proceeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessDenied;

impl fmt::Display for AccessDenied {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cross-origin access denied")
    }
}

impl std::error::Error for AccessDenied {}

#[derive(Debug, Clone)]
struct Document {
    root: NodeId,
    origin: String,
}

/// The host-page model: one top-level document plus any frame-hosted
/// documents, sharing a single node arena.
#[derive(Debug)]
pub struct Page {
    nodes: Vec<Node>,
    documents: Vec<Document>,
    top: DocumentId,
    mutations: Vec<Mutation>,
    clicks: Vec<NodeId>,
    synthetic: Vec<SyntheticKeydown>,
}

impl Page {
    /// New page with an empty top-level document at `origin`. The
    /// document root is a `body` element.
    pub fn new(origin: &str) -> Self {
        let mut page = Self {
            nodes: Vec::new(),
            documents: Vec::new(),
            top: DocumentId(0),
            mutations: Vec::new(),
            clicks: Vec::new(),
            synthetic: Vec::new(),
        };
        page.top = page.create_document(origin);
        page
    }

    fn create_document(&mut self, origin: &str) -> DocumentId {
        let doc = DocumentId(self.documents.len());
        let root = self.push_node(Node::new("body", doc, None));
        self.documents.push(Document {
            root,
            origin: origin.to_string(),
        });
        doc
    }

    fn push_node(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    // ── Document access ─────────────────────────────────────────

    pub fn top_document(&self) -> DocumentId {
        self.top
    }

    pub fn document_root(&self, doc: DocumentId) -> NodeId {
        self.documents[doc.0].root
    }

    pub fn document_origin(&self, doc: DocumentId) -> &str {
        &self.documents[doc.0].origin
    }

    pub fn same_origin(&self, a: DocumentId, b: DocumentId) -> bool {
        self.document_origin(a) == self.document_origin(b)
    }

    /// The top-level document as reachable from `from`: denied when
    /// the origins differ, exactly like a frame boundary.
    pub fn top_document_from(&self, from: DocumentId) -> Result<DocumentId, AccessDenied> {
        if self.same_origin(from, self.top) {
            Ok(self.top)
        } else {
            Err(AccessDenied)
        }
    }

    // ── Tree construction ───────────────────────────────────────

    pub fn create_element(&mut self, parent: NodeId, tag: &str) -> NodeId {
        let doc = self.nodes[parent.0].document;
        let id = self.push_node(Node::new(tag, doc, Some(parent)));
        self.nodes[parent.0].children.push(id);
        id
    }

    pub fn set_attr(&mut self, node: NodeId, name: &str, value: &str) {
        self.nodes[node.0]
            .attrs
            .insert(name.to_string(), value.to_string());
    }

    pub fn set_style(&mut self, node: NodeId, style: ComputedStyle) {
        self.nodes[node.0].style = style;
    }

    pub fn set_rect(&mut self, node: NodeId, rect: Rect) {
        self.nodes[node.0].rect = rect;
    }

    /// Attaches a shadow subtree to `host` and returns its root. The
    /// shadow root's children are reachable only through it, never via
    /// the host's light children.
    pub fn attach_shadow(&mut self, host: NodeId) -> NodeId {
        let doc = self.nodes[host.0].document;
        let root = self.push_node(Node::new("#shadow-root", doc, Some(host)));
        self.nodes[host.0].shadow_root = Some(root);
        root
    }

    /// Creates a plain text field with an empty buffer.
    pub fn create_textarea(&mut self, parent: NodeId) -> NodeId {
        let id = self.create_element(parent, "textarea");
        self.nodes[id.0].text = Some(TextBuffer::default());
        id
    }

    /// Creates a rich-text region (`contenteditable="true"`).
    pub fn create_rich_region(&mut self, parent: NodeId) -> NodeId {
        let id = self.create_element(parent, "div");
        self.set_attr(id, "contenteditable", "true");
        self.nodes[id.0].rich = Some(RichState::default());
        id
    }

    /// Adds an unloaded `iframe` destined for `origin` and records the
    /// structural mutation the injector watches for.
    pub fn create_frame(&mut self, parent: NodeId, origin: &str) -> NodeId {
        let id = self.create_element(parent, "iframe");
        self.nodes[id.0].frame = Some(FrameState {
            origin: origin.to_string(),
            content: None,
            loaded: false,
        });
        self.mutations.push(Mutation::FrameAdded(id));
        id
    }

    /// Finishes loading a frame: creates its content document and
    /// records the load mutation. Returns the new document.
    ///
    /// # Panics
    /// Panics if `frame` is not a frame element.
    pub fn load_frame(&mut self, frame: NodeId) -> DocumentId {
        let origin = self.nodes[frame.0]
            .frame
            .as_ref()
            .expect("load_frame on a non-frame node")
            .origin
            .clone();
        let doc = self.create_document(&origin);
        let state = self.nodes[frame.0].frame.as_mut().expect("frame state");
        state.content = Some(doc);
        state.loaded = true;
        self.mutations.push(Mutation::FrameLoaded(frame));
        doc
    }

    /// Detaches `node` from its parent, leaving it (and its subtree)
    /// disconnected from any live document.
    pub fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node.0].parent.take() {
            self.nodes[parent.0].children.retain(|&c| c != node);
        }
    }

    // ── Queries ─────────────────────────────────────────────────

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn document_of(&self, node: NodeId) -> DocumentId {
        self.nodes[node.0].document
    }

    /// A node is connected iff walking its ancestor chain reaches the
    /// root of its owning document. Shadow children connect through
    /// their host.
    pub fn is_connected(&self, node: NodeId) -> bool {
        let root = self.document_root(self.document_of(node));
        let mut cursor = node;
        loop {
            if cursor == root {
                return true;
            }
            match self.nodes[cursor.0].parent {
                Some(parent) => cursor = parent,
                None => return false,
            }
        }
    }

    /// Content document of a frame element. `Err(AccessDenied)` for a
    /// cross-origin frame, `Ok(None)` while the frame has not finished
    /// loading, and `Ok(None)` for non-frame nodes.
    pub fn content_document(&self, frame: NodeId) -> Result<Option<DocumentId>, AccessDenied> {
        let Some(state) = self.nodes[frame.0].frame.as_ref() else {
            return Ok(None);
        };
        let owner = self.document_of(frame);
        if state.origin != self.document_origin(owner) {
            return Err(AccessDenied);
        }
        Ok(state.content)
    }

    /// Frame elements in `doc`'s light tree, in document order.
    pub fn frames_in(&self, doc: DocumentId) -> Vec<NodeId> {
        self.subtree(self.document_root(doc))
            .filter(|&n| self.nodes[n.0].is_frame())
            .collect()
    }

    /// Depth-first, document-order iterator over the light tree under
    /// `root` (inclusive). Does not descend into shadow roots or frame
    /// content documents.
    pub fn subtree(&self, root: NodeId) -> SubtreeIter<'_> {
        SubtreeIter {
            page: self,
            stack: vec![root],
        }
    }

    /// First node under `root` (in document order) matching `selector`,
    /// skipping the subtree rooted at `skip` when given.
    pub fn query_selector_in(
        &self,
        root: NodeId,
        selector: &Selector,
        skip: Option<NodeId>,
    ) -> Option<NodeId> {
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            if Some(id) == skip {
                continue;
            }
            if selector.matches(self, id) {
                return Some(id);
            }
            for &child in self.nodes[id.0].children.iter().rev() {
                stack.push(child);
            }
        }
        None
    }

    // ── Text buffers ────────────────────────────────────────────

    pub fn text_buffer(&self, node: NodeId) -> Option<&TextBuffer> {
        self.nodes[node.0].text.as_ref()
    }

    /// Replaces the buffer value and puts the cursor at the end.
    pub fn set_text(&mut self, node: NodeId, value: &str) {
        self.nodes[node.0].text = Some(TextBuffer::with_cursor_at_end(value));
    }

    pub fn set_selection(&mut self, node: NodeId, start: usize, end: usize) {
        if let Some(buffer) = self.nodes[node.0].text.as_mut() {
            buffer.selection_start = start;
            buffer.selection_end = end;
        }
    }

    pub(crate) fn apply_text(&mut self, node: NodeId, buffer: TextBuffer) {
        self.nodes[node.0].text = Some(buffer);
    }

    // ── Rich regions ────────────────────────────────────────────

    pub fn set_caret_in_list(&mut self, node: NodeId, in_list: bool) {
        if let Some(rich) = self.nodes[node.0].rich.as_mut() {
            rich.caret_in_list = in_list;
        }
    }

    /// Whether the current selection sits inside an unordered-list
    /// construct. False for nodes without rich state.
    pub fn caret_in_list(&self, node: NodeId) -> bool {
        self.nodes[node.0]
            .rich
            .as_ref()
            .map(|r| r.caret_in_list)
            .unwrap_or(false)
    }

    pub fn exec_command(&mut self, node: NodeId, command: EditCommand) {
        if let Some(rich) = self.nodes[node.0].rich.as_mut() {
            rich.commands.push(command);
        }
    }

    pub fn commands(&self, node: NodeId) -> &[EditCommand] {
        self.nodes[node.0]
            .rich
            .as_ref()
            .map(|r| r.commands.as_slice())
            .unwrap_or(&[])
    }

    // ── Effects the engine applies to the host page ─────────────

    pub fn click(&mut self, node: NodeId) {
        self.clicks.push(node);
    }

    pub fn clicks(&self) -> &[NodeId] {
        &self.clicks
    }

    pub fn dispatch_synthetic(&mut self, target: NodeId, event: KeyEvent, bubbles: bool) {
        self.synthetic.push(SyntheticKeydown {
            target,
            event,
            bubbles,
        });
    }

    pub fn synthetic_events(&self) -> &[SyntheticKeydown] {
        &self.synthetic
    }

    // ── Mutation queue ──────────────────────────────────────────

    /// Drains pending structural mutations, oldest first.
    pub fn take_mutations(&mut self) -> Vec<Mutation> {
        std::mem::take(&mut self.mutations)
    }
}

/// Iterator behind `Page::subtree`.
pub struct SubtreeIter<'a> {
    page: &'a Page,
    stack: Vec<NodeId>,
}

impl Iterator for SubtreeIter<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        for &child in self.page.nodes[id.0].children.iter().rev() {
            self.stack.push(child);
        }
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subtree_document_order() {
        let mut page = Page::new("https://app.example.com");
        let root = page.document_root(page.top_document());
        let a = page.create_element(root, "div");
        let b = page.create_element(a, "span");
        let c = page.create_element(root, "div");

        let order: Vec<NodeId> = page.subtree(root).collect();
        assert_eq!(order, vec![root, a, b, c]);
    }

    #[test]
    fn test_subtree_skips_shadow_and_frames() {
        let mut page = Page::new("https://app.example.com");
        let root = page.document_root(page.top_document());
        let host = page.create_element(root, "div");
        let shadow = page.attach_shadow(host);
        let inner = page.create_element(shadow, "div");
        let frame = page.create_frame(root, "https://app.example.com");
        let frame_doc = page.load_frame(frame);
        let frame_child = page.create_element(page.document_root(frame_doc), "div");

        let order: Vec<NodeId> = page.subtree(root).collect();
        assert!(order.contains(&host));
        assert!(order.contains(&frame));
        assert!(!order.contains(&inner));
        assert!(!order.contains(&frame_child));
    }

    #[test]
    fn test_is_connected() {
        let mut page = Page::new("https://app.example.com");
        let root = page.document_root(page.top_document());
        let branch = page.create_element(root, "div");
        let leaf = page.create_element(branch, "span");
        assert!(page.is_connected(leaf));

        page.detach(branch);
        assert!(!page.is_connected(leaf));
        assert!(!page.is_connected(branch));
        assert!(page.is_connected(root));
    }

    #[test]
    fn test_shadow_children_connect_through_host() {
        let mut page = Page::new("https://app.example.com");
        let root = page.document_root(page.top_document());
        let host = page.create_element(root, "div");
        let shadow = page.attach_shadow(host);
        let inner = page.create_element(shadow, "div");
        assert!(page.is_connected(inner));

        page.detach(host);
        assert!(!page.is_connected(inner));
    }

    #[test]
    fn test_content_document_same_origin() {
        let mut page = Page::new("https://app.example.com");
        let root = page.document_root(page.top_document());
        let frame = page.create_frame(root, "https://app.example.com");
        assert_eq!(page.content_document(frame), Ok(None));

        let doc = page.load_frame(frame);
        assert_eq!(page.content_document(frame), Ok(Some(doc)));
        assert!(page.same_origin(page.top_document(), doc));
    }

    #[test]
    fn test_content_document_cross_origin_denied() {
        let mut page = Page::new("https://app.example.com");
        let root = page.document_root(page.top_document());
        let frame = page.create_frame(root, "https://ads.example.net");
        page.load_frame(frame);
        assert_eq!(page.content_document(frame), Err(AccessDenied));
    }

    #[test]
    fn test_top_document_from_frame() {
        let mut page = Page::new("https://app.example.com");
        let root = page.document_root(page.top_document());
        let same = page.create_frame(root, "https://app.example.com");
        let same_doc = page.load_frame(same);
        assert_eq!(page.top_document_from(same_doc), Ok(page.top_document()));

        let cross = page.create_frame(root, "https://ads.example.net");
        let cross_doc = page.load_frame(cross);
        assert_eq!(page.top_document_from(cross_doc), Err(AccessDenied));
    }

    #[test]
    fn test_mutation_queue_drains_once() {
        let mut page = Page::new("https://app.example.com");
        let root = page.document_root(page.top_document());
        let frame = page.create_frame(root, "https://app.example.com");
        page.load_frame(frame);

        let mutations = page.take_mutations();
        assert_eq!(
            mutations,
            vec![Mutation::FrameAdded(frame), Mutation::FrameLoaded(frame)]
        );
        assert!(page.take_mutations().is_empty());
    }

    #[test]
    fn test_query_selector_in_with_skip() {
        let mut page = Page::new("https://app.example.com");
        let root = page.document_root(page.top_document());
        let inner = page.create_element(root, "div");
        let inner_btn = page.create_element(inner, "button");
        page.set_attr(inner_btn, "aria-label", "Send");
        let outer_btn = page.create_element(root, "button");
        page.set_attr(outer_btn, "aria-label", "Send");

        let selector = Selector::parse(r#"[aria-label="Send"]"#).unwrap();
        assert_eq!(
            page.query_selector_in(root, &selector, None),
            Some(inner_btn)
        );
        assert_eq!(
            page.query_selector_in(root, &selector, Some(inner)),
            Some(outer_btn)
        );
    }
}
