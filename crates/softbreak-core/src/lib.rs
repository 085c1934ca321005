// Softbreak Core Library
// Enter-key interception engine for message-composition surfaces

pub mod config;
pub mod dom;
pub mod editable;
pub mod inject;
pub mod insert;
pub mod key;
pub mod popup;
pub mod router;
pub mod submit;

pub use config::{SendKeyConfig, SendKeyProvider};
pub use dom::{
    AccessDenied, ComputedStyle, Display, DocumentId, EditCommand, Mutation, NodeId, Page, Rect,
    Selector, SelectorParseError, SyntheticKeydown, TextBuffer, Visibility,
};
pub use editable::{EditableHost, EditableKind};
pub use inject::FrameInjector;
pub use key::{Key, KeyEvent, Modifier, ModifierSet};
pub use popup::is_suggestion_popup_visible;
pub use router::{KeyRouter, RouteDecision, RouteOutcome};
pub use submit::{default_submit_selectors, DEFAULT_SUBMIT_SELECTORS};
