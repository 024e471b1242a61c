//! `ha-chat` — inbound chat routing and outbound chat buffering.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                   |
//! |-------------|------------------------------------------------------------|
//! | [`message`] | `ChannelKind`, `ChatMessage`, `Outbound`                   |
//! | [`command`] | `Command` — a private message parsed as `name arg…`        |
//! | [`router`]  | `ResponseRouter<C>`, `ResponseGroup<C>`, `RouterHost`, `DispatchOutcome` |
//!
//! # Cargo features
//!
//! | Feature   | Effect                                                 |
//! |-----------|--------------------------------------------------------|
//! | `fx-hash` | Uses FxHash for the pending-response index.            |
//!
//! # Dispatch order
//!
//! ```text
//! private message matching a pending response → remove its group, run action
//! other private message with a first word      → Command
//! everything else                              → Conversation
//! ```

pub mod command;
pub mod message;
pub mod router;


pub use command::Command;
pub use message::{ChannelKind, ChatMessage, Outbound};
pub use router::{DispatchOutcome, ResponseAction, ResponseGroup, ResponseRouter, RouterHost};
