//! # Transcript
//!
//! What the panel shows, as opposed to what the conversation remembers.
//! The two diverge on purpose: notices (greeting, connection fallback) and
//! a reply that is still streaming are visible here but never stored as
//! turns.

/// How an entry is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Typed by the user. Always shown literally.
    User,
    /// Reply text. Rendered as Markdown when the renderer is ready.
    Assistant,
    /// Transient widget message (greeting, connection fallback).
    Notice,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub kind: EntryKind,
    pub text: String,
}

#[derive(Debug, Clone, Default)]
pub struct Transcript {
    entries: Vec<Entry>,
    /// Index of the assistant entry currently receiving chunks.
    live: Option<usize>,
    /// Typing indicator, drawn after the last entry.
    typing: bool,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn is_typing(&self) -> bool {
        self.typing
    }

    pub fn live_index(&self) -> Option<usize> {
        self.live
    }

    pub fn push_user(&mut self, text: &str) {
        self.push(EntryKind::User, text);
    }

    pub fn push_notice(&mut self, text: &str) {
        self.push(EntryKind::Notice, text);
    }

    pub fn show_typing(&mut self) {
        self.typing = true;
    }

    pub fn hide_typing(&mut self) {
        self.typing = false;
    }

    /// Opens an empty assistant entry that subsequent `replace_live` calls fill.
    pub fn begin_reply(&mut self) {
        if self.live.is_none() {
            self.push(EntryKind::Assistant, "");
            self.live = Some(self.entries.len() - 1);
        }
    }

    /// Replaces the live entry's text with the full accumulated reply.
    pub fn replace_live(&mut self, text: &str) {
        if self.live.is_none() {
            self.begin_reply();
        }
        if let Some(entry) = self.live.and_then(|i| self.entries.get_mut(i)) {
            entry.text.clear();
            entry.text.push_str(text);
        }
    }

    /// The live entry becomes an ordinary assistant entry.
    pub fn finish_reply(&mut self) {
        self.live = None;
    }

    /// Drops a partially streamed reply.
    pub fn discard_reply(&mut self) {
        if let Some(i) = self.live.take()
            && i < self.entries.len()
        {
            self.entries.remove(i);
        }
    }

    fn push(&mut self, kind: EntryKind, text: &str) {
        self.entries.push(Entry {
            kind,
            text: text.to_string(),
        });
    }
}
