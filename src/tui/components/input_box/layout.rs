//! Wrapping and cursor placement for the input box.
//!
//! The buffer is wrapped one logical line at a time, so a newline always
//! starts a new row. Columns are display cells, not bytes or chars.

use unicode_width::UnicodeWidthStr;

/// Top + bottom borders consumed vertically
pub(super) const VERTICAL_OVERHEAD: u16 = 2;
/// Left + right borders consumed horizontally
const HORIZONTAL_OVERHEAD: u16 = 2;
/// Maximum visible content rows before internal scrolling kicks in
pub(super) const MAX_VISIBLE_LINES: u16 = 4;

pub(super) fn inner_width(area_width: u16) -> usize {
    area_width.saturating_sub(HORIZONTAL_OVERHEAD) as usize
}

fn wrap_options(width: usize) -> textwrap::Options<'static> {
    textwrap::Options::new(width)
        .break_words(true)
        .word_separator(textwrap::WordSeparator::AsciiSpace)
}

fn wrap_line(line: &str, width: usize) -> Vec<String> {
    let wrapped = textwrap::wrap(line, wrap_options(width));
    if wrapped.is_empty() {
        vec![String::new()]
    } else {
        wrapped.into_iter().map(|l| l.into_owned()).collect()
    }
}

/// Display rows for `text`. Never empty.
pub(super) fn rows(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![String::new()];
    }
    text.split('\n').flat_map(|line| wrap_line(line, width)).collect()
}

/// Row and column of the cell just after byte offset `pos`.
pub(super) fn cursor_cell(text: &str, pos: usize, width: usize) -> (usize, usize) {
    if width == 0 {
        return (0, 0);
    }
    let before = &text[..pos];
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);

    let rows_above: usize = if line_start == 0 {
        0
    } else {
        text[..line_start - 1]
            .split('\n')
            .map(|line| wrap_line(line, width).len())
            .sum()
    };

    let partial = &before[line_start..];
    let segments = wrap_line(partial, width);
    let row_in_line = segments.len() - 1;
    let earlier: usize = segments[..row_in_line].iter().map(|s| s.width()).sum();
    // Trailing spaces are trimmed from segments but still occupy cells
    let col = partial.width().saturating_sub(earlier).min(width);

    (rows_above + row_in_line, col)
}

/// Scroll offset that keeps `cursor_row` inside the visible window.
pub(super) fn scroll_for(cursor_row: usize, current: usize) -> usize {
    let visible = MAX_VISIBLE_LINES as usize;
    if cursor_row < current {
        cursor_row
    } else if cursor_row >= current + visible {
        cursor_row + 1 - visible
    } else {
        current
    }
}

pub(super) fn prev_char_boundary(text: &str, pos: usize) -> usize {
    text[..pos]
        .char_indices()
        .next_back()
        .map_or(0, |(i, _)| i)
}

pub(super) fn next_char_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .chars()
        .next()
        .map_or(text.len(), |c| pos + c.len_utf8())
}
