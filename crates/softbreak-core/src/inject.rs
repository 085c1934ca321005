// Frame injection
// Keeps capture-phase interception attached across the top document
// and lazily mounted same-origin frames

use std::collections::HashSet;

use log::{debug, trace};

use crate::dom::{DocumentId, Mutation, NodeId, Page};
use crate::key::KeyEvent;
use crate::router::{KeyRouter, RouteDecision, RouteOutcome};

/// Owns the router's attachments. Created through `start`, torn down
/// through `stop`; there is no implicit registration at load time, so
/// repeated initialization cannot double-attach.
#[derive(Debug)]
pub struct FrameInjector {
    router: KeyRouter,
    attached: HashSet<DocumentId>,
    stopped: bool,
}

impl FrameInjector {
    /// Attaches `router` to the page's top document and to every
    /// same-origin frame document already loaded, then returns the
    /// handle that keeps coverage current.
    pub fn start(page: &Page, router: KeyRouter) -> Self {
        let mut injector = Self {
            router,
            attached: HashSet::new(),
            stopped: false,
        };
        injector.attach_document(page.top_document());
        injector.attach_reachable_frames(page);
        injector
    }

    fn attach_document(&mut self, doc: DocumentId) {
        if self.stopped {
            return;
        }
        if self.attached.insert(doc) {
            debug!("keydown interception attached to {:?}", doc);
        }
    }

    /// Walks loaded frames reachable from already attached documents,
    /// attaching each same-origin content document. Cross-origin frames
    /// fail the access check and stay unintercepted.
    fn attach_reachable_frames(&mut self, page: &Page) {
        let mut worklist: Vec<DocumentId> = self.attached.iter().copied().collect();
        while let Some(doc) = worklist.pop() {
            for frame in page.frames_in(doc) {
                match page.content_document(frame) {
                    Ok(Some(content)) => {
                        if !self.attached.contains(&content) {
                            self.attach_document(content);
                            worklist.push(content);
                        }
                    }
                    Ok(None) => {}
                    Err(denied) => {
                        trace!("frame {:?} left unintercepted: {}", frame, denied)
                    }
                }
            }
        }
    }

    /// Drains the page's structural mutation queue, attaching frames
    /// that finished loading since the last poll. This is the watch
    /// that keeps coverage current as the host page lazily mounts
    /// embedded composers.
    ///
    /// Attachment is asynchronous relative to the frame's own content:
    /// a keydown dispatched inside a loaded frame before the next poll
    /// routes natively. Accepted limitation.
    pub fn poll(&mut self, page: &mut Page) {
        if self.stopped {
            return;
        }
        for mutation in page.take_mutations() {
            match mutation {
                Mutation::FrameAdded(frame) => {
                    trace!("frame {:?} added, waiting for load", frame);
                }
                Mutation::FrameLoaded(frame) => match page.content_document(frame) {
                    Ok(Some(doc)) => self.attach_document(doc),
                    Ok(None) => {}
                    Err(denied) => {
                        trace!("frame {:?} left unintercepted: {}", frame, denied)
                    }
                },
            }
        }
    }

    pub fn is_attached(&self, doc: DocumentId) -> bool {
        self.attached.contains(&doc)
    }

    pub fn router(&self) -> &KeyRouter {
        &self.router
    }

    /// Disposer: drops every attachment. Subsequent dispatches route
    /// natively everywhere.
    pub fn stop(&mut self) {
        self.attached.clear();
        self.stopped = true;
        debug!("keydown interception stopped");
    }

    /// Capture-phase dispatch entry. The router runs before any native
    /// handling iff the target's document is attached; otherwise the
    /// event is reported as untouched.
    pub fn dispatch_keydown(
        &self,
        page: &mut Page,
        target: NodeId,
        event: &KeyEvent,
    ) -> RouteOutcome {
        if self.is_attached(page.document_of(target)) {
            self.router.handle(page, target, event)
        } else {
            RouteOutcome {
                decision: RouteDecision::Ignored,
                default_prevented: false,
                propagation_stopped: false,
            }
        }
    }
}
