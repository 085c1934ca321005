// Demo composer page
// A chat-like host page for exercising the engine from the CLI:
// rich-text composer with send button, hidden mention popup portaled
// to the body, a plain textarea variant, a cross-origin ad frame, and
// an embedded composer frame the page mounts mid-session

use softbreak_core::{ComputedStyle, NodeId, Page, Rect};

const CHAT_ORIGIN: &str = "https://chat.example.com";
const AD_ORIGIN: &str = "https://ads.example.net";

/// The demo page plus handles to the nodes scripts interact with.
#[derive(Debug)]
pub struct ComposerPage {
    pub page: Page,
    pub composer: NodeId,
    pub textarea: NodeId,
    pub send_button: NodeId,
    pub popup: NodeId,
    pub embedded_textarea: Option<NodeId>,
}

impl ComposerPage {
    pub fn build() -> Self {
        let mut page = Page::new(CHAT_ORIGIN);
        let root = page.document_root(page.top_document());

        let main = page.create_element(root, "main");
        page.create_element(main, "section");

        let footer = page.create_element(main, "footer");
        let composer = page.create_rich_region(footer);
        let textarea = page.create_textarea(footer);
        let actions = page.create_element(footer, "div");
        let send_button = page.create_element(actions, "button");
        page.set_attr(send_button, "aria-label", "Send");
        page.set_attr(send_button, "data-tooltip", "Send message (Enter)");
        page.set_rect(send_button, Rect::new(720.0, 640.0, 32.0, 32.0));

        // Mention popup, portaled to the body and hidden until a
        // script shows it.
        let popup = page.create_element(root, "div");
        page.set_attr(popup, "role", "listbox");
        page.set_style(popup, ComputedStyle::display_none());

        // Third-party frame the engine must never trip over.
        let ad_frame = page.create_frame(root, AD_ORIGIN);
        page.load_frame(ad_frame);

        Self {
            page,
            composer,
            textarea,
            send_button,
            popup,
            embedded_textarea: None,
        }
    }

    pub fn show_popup(&mut self) {
        self.page.set_style(self.popup, ComputedStyle::default());
        self.page
            .set_rect(self.popup, Rect::new(24.0, 420.0, 320.0, 180.0));
    }

    pub fn hide_popup(&mut self) {
        self.page
            .set_style(self.popup, ComputedStyle::display_none());
        self.page.set_rect(self.popup, Rect::default());
    }

    /// Mounts the embedded composer variant the host page adds lazily:
    /// a same-origin frame holding its own textarea. Returns the
    /// textarea; the frame-load mutation sits in the page queue until
    /// the injector polls.
    pub fn mount_embedded_frame(&mut self) -> NodeId {
        let root = self.page.document_root(self.page.top_document());
        let frame = self.page.create_frame(root, CHAT_ORIGIN);
        let doc = self.page.load_frame(frame);
        let embedded = self.page.create_textarea(self.page.document_root(doc));
        self.embedded_textarea = Some(embedded);
        embedded
    }
}

impl Default for ComposerPage {
    fn default() -> Self {
        Self::build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use softbreak_core::{editable, is_suggestion_popup_visible, EditableKind};

    #[test]
    fn test_build_resolves_both_composers() {
        let demo = ComposerPage::build();
        let rich = editable::resolve(&demo.page, demo.composer).unwrap();
        assert_eq!(rich.kind, EditableKind::RichRegion);
        let plain = editable::resolve(&demo.page, demo.textarea).unwrap();
        assert_eq!(plain.kind, EditableKind::PlainField);
    }

    #[test]
    fn test_popup_toggles_visibility() {
        let mut demo = ComposerPage::build();
        let host = editable::resolve(&demo.page, demo.composer).unwrap();
        assert!(!is_suggestion_popup_visible(&demo.page, host));

        demo.show_popup();
        assert!(is_suggestion_popup_visible(&demo.page, host));

        demo.hide_popup();
        assert!(!is_suggestion_popup_visible(&demo.page, host));
    }

    #[test]
    fn test_embedded_frame_is_same_origin() {
        let mut demo = ComposerPage::build();
        let embedded = demo.mount_embedded_frame();
        let doc = demo.page.document_of(embedded);
        assert!(demo.page.same_origin(doc, demo.page.top_document()));
    }
}
