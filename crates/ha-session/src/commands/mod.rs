//! Chat command listeners.
//!
//! A private message that matched no pending response is parsed into a
//! [`Command`] and offered to the listeners of a [`CommandSet`].  The first
//! listener that claims the command name handles it.
//!
//! | Listener                        | Names                          | Admin only |
//! |---------------------------------|--------------------------------|------------|
//! | [`BuildListener`]               | `build <kind>`                 | no         |
//! | [`DemolishListener`]            | `demolish` (then `yes`/`no`)   | no         |
//! | [`PauseListener`]               | `pause`                        | yes        |
//! | [`MoveBuildPermissionListener`] | `mbp`, `movebuildpermission`   | yes        |
//! | [`CancelListener`]              | `cancel`                       | no         |
//!
//! "Admin only" means the sender must be in `config.admins` when that list
//! is non-empty.

pub mod admin;
pub mod build;
pub mod cancel;
pub mod demolish;

use ha_chat::Command;
use ha_core::ParticipantId;

use crate::HostContext;

pub use admin::{MoveBuildPermissionListener, PauseListener};
pub use build::BuildListener;
pub use cancel::CancelListener;
pub use demolish::DemolishListener;

/// Reply sent to a non-admin who tries an admin command.
pub const NOT_ALLOWED: &str = "Error: You are not allowed to use that command.";

/// One chat command.
pub trait CommandListener {
    /// Command names this listener answers to, lower-case.
    fn names(&self) -> &'static [&'static str];

    /// Whether only whitelisted administrators may run it.
    fn admin_only(&self) -> bool {
        false
    }

    fn handle(&self, ctx: &mut HostContext, sender: ParticipantId, cmd: &Command);
}

/// Ordered set of command listeners.
#[derive(Default)]
pub struct CommandSet {
    listeners: Vec<Box<dyn CommandListener>>,
}

impl CommandSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<L: CommandListener + 'static>(mut self, listener: L) -> Self {
        self.listeners.push(Box::new(listener));
        self
    }

    /// Every built-in listener.
    pub fn standard() -> Self {
        Self::new()
            .with(BuildListener)
            .with(DemolishListener)
            .with(PauseListener)
            .with(MoveBuildPermissionListener)
            .with(CancelListener)
    }

    /// Hand `cmd` to the listener that claims it.  Returns `false` if none
    /// does.
    pub fn dispatch(&self, ctx: &mut HostContext, sender: ParticipantId, cmd: &Command) -> bool {
        let Some(listener) = self.listeners.iter().find(|l| cmd.is_any(l.names())) else {
            return false;
        };
        if listener.admin_only() && !ctx.config.is_admin(sender) {
            tracing::warn!(%sender, command = %cmd.name, "refused admin command");
            ctx.reply(sender, NOT_ALLOWED);
            return true;
        }
        tracing::debug!(%sender, command = %cmd.name, args = ?cmd.args, "running command");
        listener.handle(ctx, sender, cmd);
        true
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.listeners.iter().flat_map(|l| l.names().iter().copied()).collect()
    }
}
