// Line-break insertion
// Splits the buffer or issues the rich-text command, keeping list
// context alive across the break

use std::sync::LazyLock;

use regex::Regex;

use crate::dom::{EditCommand, Page, TextBuffer};
use crate::editable::{EditableHost, EditableKind};

/// Bullet marker at the start of the current line: optional leading
/// whitespace, one of `*` `+` `-`, then at least one space or tab.
static LIST_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[ \t]*[*+-][ \t]+").unwrap());

/// Inserts a line break at the current cursor/selection of `host`.
/// Best-effort: a host with no usable buffer state is left untouched.
pub fn insert_line_break(page: &mut Page, host: EditableHost) {
    match host.kind {
        EditableKind::PlainField => insert_plain(page, host),
        EditableKind::RichRegion => insert_rich(page, host),
    }
}

/// Plain fields get the break spliced into the buffer. When the text
/// before the cursor on the current line opens with a bullet marker,
/// the same marker text is re-inserted after the break and the cursor
/// lands after it, so Enter continues the list the way rich editors do.
fn insert_plain(page: &mut Page, host: EditableHost) {
    let Some(buffer) = page.text_buffer(host.node) else {
        return;
    };
    let value = buffer.value.clone();
    let (start, end) = ordered_selection(buffer, value.len());
    if !value.is_char_boundary(start) || !value.is_char_boundary(end) {
        return;
    }

    let line_start = value[..start].rfind('\n').map(|i| i + 1).unwrap_or(0);
    let marker = LIST_MARKER
        .find(&value[line_start..start])
        .map(|m| m.as_str().to_string());

    let continuation = marker.as_deref().unwrap_or("");
    let mut next = String::with_capacity(value.len() + 1 + continuation.len());
    next.push_str(&value[..start]);
    next.push('\n');
    next.push_str(continuation);
    next.push_str(&value[end..]);

    let caret = start + 1 + continuation.len();
    page.apply_text(
        host.node,
        TextBuffer {
            value: next,
            selection_start: caret,
            selection_end: caret,
        },
    );
}

/// Rich regions are driven by commands: inside an unordered list the
/// break must split the block (producing the next list item, matching
/// native multi-line list editing); anywhere else a soft line break is
/// enough.
fn insert_rich(page: &mut Page, host: EditableHost) {
    let command = if page.caret_in_list(host.node) {
        EditCommand::InsertParagraph
    } else {
        EditCommand::InsertLineBreak
    };
    page.exec_command(host.node, command);
}

fn ordered_selection(buffer: &TextBuffer, len: usize) -> (usize, usize) {
    let start = buffer.selection_start.min(len);
    let end = buffer.selection_end.min(len);
    if start <= end {
        (start, end)
    } else {
        (end, start)
    }
}
