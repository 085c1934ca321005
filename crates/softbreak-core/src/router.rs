// Capture-phase Enter routing
// Decides pass-through vs. line-break vs. submit for each keydown

use log::debug;

use crate::config::SendKeyProvider;
use crate::dom::{NodeId, Page, Selector};
use crate::editable;
use crate::insert;
use crate::key::{Key, KeyEvent};
use crate::popup;
use crate::submit;

/// Terminal action taken for one keydown. No state survives between
/// events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    /// Not ours: non-Enter key, active IME composition, or no editable
    /// ancestor. Native behavior proceeds unmodified.
    Ignored,
    /// A suggestion popup is visible: native Enter must run so it
    /// commits the highlighted suggestion.
    Passthrough,
    /// A line break was inserted and native handling suppressed.
    LineBreak,
    /// The submit trigger ran and native handling was suppressed.
    Submit,
}

/// What the router did with the event, including the flags the host
/// dispatch layer acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteOutcome {
    pub decision: RouteDecision,
    pub default_prevented: bool,
    pub propagation_stopped: bool,
}

impl RouteOutcome {
    /// Event untouched: native handling proceeds.
    fn native(decision: RouteDecision) -> Self {
        Self {
            decision,
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    /// Default action suppressed and propagation stopped: the engine
    /// owns this keystroke.
    fn suppressed(decision: RouteDecision) -> Self {
        Self {
            decision,
            default_prevented: true,
            propagation_stopped: true,
        }
    }
}

/// The capture-phase Enter handler. Holds the injected configuration
/// provider and the submit-control selector list; everything else is
/// resolved per event.
#[derive(Debug)]
pub struct KeyRouter {
    config: SendKeyProvider,
    submit_selectors: Vec<Selector>,
}

impl KeyRouter {
    pub fn new(config: SendKeyProvider) -> Self {
        Self::with_selectors(config, submit::default_submit_selectors())
    }

    pub fn with_selectors(config: SendKeyProvider, submit_selectors: Vec<Selector>) -> Self {
        Self {
            config,
            submit_selectors,
        }
    }

    pub fn config(&self) -> &SendKeyProvider {
        &self.config
    }

    /// Routes one keydown dispatched at `target`.
    ///
    /// The order of checks is the contract: IME composition and
    /// non-Enter keys pass untouched before anything is resolved; a
    /// held modifier decides submit-vs-break from the current config
    /// snapshot; an unmodified Enter defers to a visible suggestion
    /// popup before claiming the keystroke as a line break.
    pub fn handle(&self, page: &mut Page, target: NodeId, event: &KeyEvent) -> RouteOutcome {
        if event.composing {
            return RouteOutcome::native(RouteDecision::Ignored);
        }
        if event.key != Key::Enter {
            return RouteOutcome::native(RouteDecision::Ignored);
        }
        let Some(host) = editable::resolve(page, target) else {
            return RouteOutcome::native(RouteDecision::Ignored);
        };

        if let Some(modifier) = event.modifiers.active() {
            if self.config.current().submits(modifier) {
                debug!("{}: submit via {:?}", event, modifier);
                submit::submit(page, host, &self.submit_selectors);
                return RouteOutcome::suppressed(RouteDecision::Submit);
            }
            debug!("{}: line break via {:?}", event, modifier);
            insert::insert_line_break(page, host);
            return RouteOutcome::suppressed(RouteDecision::LineBreak);
        }

        if popup::is_suggestion_popup_visible(page, host) {
            debug!("{}: suggestion popup visible, passing through", event);
            return RouteOutcome::native(RouteDecision::Passthrough);
        }

        debug!("{}: line break", event);
        insert::insert_line_break(page, host);
        RouteOutcome::suppressed(RouteDecision::LineBreak)
    }
}
