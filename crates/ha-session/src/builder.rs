//! Fluent builder for constructing a [`Session`].

use ha_behavior::BehaviorChain;
use ha_core::AutomationConfig;
use ha_world::{AdapterRegistry, WorldOps};

use crate::inactivity;
use crate::{CommandSet, HostContext, NoopObserver, Session, SessionError, SessionObserver, SessionResult};

/// Fluent builder for [`Session`].
///
/// # Required inputs
///
/// - [`AutomationConfig`], validated by [`build`][Self::build]
/// - a world adapter: either `.world(w)` directly, or `.adapters(registry)`
///   to pick the one matching `config.host_version`
///
/// # Optional inputs (have defaults)
///
/// | Method           | Default                     |
/// |------------------|-----------------------------|
/// | `.chain(c)`      | `BehaviorChain::standard()` |
/// | `.commands(s)`   | `CommandSet::standard()`    |
/// | `.observer(o)`   | `NoopObserver`              |
pub struct SessionBuilder {
    config:   AutomationConfig,
    world:    Option<Box<dyn WorldOps>>,
    adapters: Option<AdapterRegistry>,
    chain:    Option<BehaviorChain>,
    commands: Option<CommandSet>,
    observer: Option<Box<dyn SessionObserver>>,
}

impl SessionBuilder {
    pub fn new(config: AutomationConfig) -> Self {
        Self {
            config,
            world:    None,
            adapters: None,
            chain:    None,
            commands: None,
            observer: None,
        }
    }

    /// Use this world adapter regardless of `config.host_version`.
    pub fn world(mut self, world: Box<dyn WorldOps>) -> Self {
        self.world = Some(world);
        self
    }

    /// Select the adapter for `config.host_version` from `registry`.
    /// Ignored when [`world`][Self::world] was also called.
    pub fn adapters(mut self, registry: AdapterRegistry) -> Self {
        self.adapters = Some(registry);
        self
    }

    pub fn chain(mut self, chain: BehaviorChain) -> Self {
        self.chain = Some(chain);
        self
    }

    pub fn commands(mut self, commands: CommandSet) -> Self {
        self.commands = Some(commands);
        self
    }

    pub fn observer<O: SessionObserver + 'static>(mut self, observer: O) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    /// Validate the config, resolve the world adapter and return a session
    /// ready for its first event.
    pub fn build(self) -> SessionResult<Session> {
        self.config.validate()?;

        let world = match (self.world, self.adapters) {
            (Some(world), _) => world,
            (None, Some(registry)) => registry.select(self.config.host_version)?,
            (None, None) => return Err(SessionError::NoWorld),
        };
        if world.api_version() != self.config.host_version {
            tracing::warn!(
                configured = ?self.config.host_version,
                adapter = ?world.api_version(),
                "world adapter speaks a different host API than configured"
            );
        }

        tracing::info!(
            host = %world.host(),
            version = ?world.api_version(),
            tick_rate = self.config.tick_rate,
            "session built"
        );
        let mut ctx = HostContext::new(world, self.config);
        if ctx.config.auto_kick_enabled {
            inactivity::arm(&mut ctx);
            tracing::info!(minutes = ctx.config.effective_auto_kick_minutes(), "auto-kick enabled");
        }
        Ok(Session {
            ctx,
            chain:    self.chain.unwrap_or_else(BehaviorChain::standard),
            commands: self.commands.unwrap_or_else(CommandSet::standard),
            observer: self.observer.unwrap_or_else(|| Box::new(NoopObserver)),
        })
    }
}
