//! `ha-session` — the automated host's session: event entry points, the
//! host context every callback works on, and the chat command listeners.
//!
//! # Event entry points
//!
//! ```text
//! on_day_start      → BehaviorState::new_day, ReadinessRegistry::reset_all
//! on_tick           → ⓪ WorldOps::restore_host_vitals (host_keep_alive)
//!                     ① BehaviorChain::process      (≤ 1 world action)
//!                     ② TimeoutScheduler::advance   (expired confirmations,
//!                                                    inactivity sweeps)
//!                     ③ outbox → WorldOps::send_chat
//! on_chat           → festival votes → pending responses → command listeners
//! on_ready_changed  → ReadinessRegistry::observe
//! on_connect        → InactivityTracker::touch
//! on_disconnect     → drop readiness, pending responses, votes, requests,
//!                     inactivity record
//! shutdown          → clear everything the session owns
//! ```
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use ha_core::{AutomationConfig, HostApiVersion, ParticipantId};
//! use ha_session::SessionBuilder;
//! use ha_world::{AdapterRegistry, ScriptedWorld};
//!
//! let adapters = AdapterRegistry::new()
//!     .register(HostApiVersion::Current, || {
//!         Box::new(ScriptedWorld::new(HostApiVersion::Current, ParticipantId(1)))
//!     });
//! let mut session = SessionBuilder::new(AutomationConfig::default())
//!     .adapters(adapters)
//!     .build()?;
//! session.on_day_start();
//! session.run_ticks(60);
//! ```

pub mod builder;
pub mod commands;
pub mod context;
pub mod error;
pub mod inactivity;
pub mod observer;
pub mod session;


pub use builder::SessionBuilder;
pub use commands::{CommandListener, CommandSet};
pub use context::HostContext;
pub use error::{SessionError, SessionResult};
pub use observer::{NoopObserver, SessionObserver};
pub use session::{ChatOutcome, Session};
