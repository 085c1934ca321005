// Host-page model
// The DOM surface the interception engine routes against

mod node;
mod page;
mod selector;
mod style;

pub use node::{
    DocumentId, EditCommand, FrameState, Mutation, Node, NodeId, RichState, SyntheticKeydown,
    TextBuffer,
};
pub use page::{AccessDenied, Page, SubtreeIter};
pub use selector::{Selector, SelectorParseError};
pub use style::{ComputedStyle, Display, Rect, Visibility};
