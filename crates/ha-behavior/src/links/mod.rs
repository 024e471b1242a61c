//! Concrete links, in the order [`BehaviorChain::standard`] wires them.
//!
//! | Link                       | Concern                                          |
//! |----------------------------|--------------------------------------------------|
//! | [`ErrandLink`]             | walk the host to one-off story events            |
//! | [`JojaMembershipLink`]     | buy the Joja membership when configured          |
//! | [`DialogueLink`]           | click through dialogue, questions, naming, level-up |
//! | [`SleepLink`]              | go to bed with everyone else and end the day     |
//! | [`FestivalAttendanceLink`] | follow everyone into today's festival            |
//! | [`FestivalEventStartLink`] | start the festival's main event on a vote        |
//! | [`FestivalEndLink`]        | leave the festival with everyone else            |
//!
//! [`BehaviorChain::standard`]: crate::BehaviorChain::standard

mod dialogue;
mod errand;
mod festival;
mod joja;
mod sleep;

pub use dialogue::DialogueLink;
pub use errand::ErrandLink;
pub use festival::{FestivalAttendanceLink, FestivalEndLink, FestivalEventStartLink};
pub use joja::JojaMembershipLink;
pub use sleep::SleepLink;
