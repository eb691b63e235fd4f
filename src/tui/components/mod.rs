//! # TUI Components
//!
//! ```text
//! components/
//! ├── bubble.rs        (Launcher, bottom-right corner)
//! ├── title_bar.rs     (Panel header: title, endpoint, renderer state)
//! ├── message.rs       (One transcript entry, plus the typing indicator)
//! ├── message_list.rs  (Scrollable transcript with a layout cache)
//! └── input_box/       (Message field, disabled while a reply is pending)
//! ```
//!
//! Stateless components (`Bubble`, `TitleBar`, `Message`) are rebuilt every
//! frame from props. Stateful ones keep their state in `TuiState`
//! (`MessageListState`, `InputBox`) and handle events through
//! [`EventHandler`](super::component::EventHandler).

pub mod bubble;
pub mod input_box;
pub mod message;
pub mod message_list;
mod title_bar;

pub use bubble::Bubble;
pub use input_box::{InputBox, InputEvent};
pub use message_list::{MessageList, MessageListState};
pub use title_bar::TitleBar;
