//! The `BehaviorLink` trait and the ordered chain that drives it.

use crate::{BehaviorState, LinkContext};

/// Result of one link's turn.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum LinkOutcome {
    /// Issued one world-affecting operation.  Stops the chain.
    Acted,
    /// Consumed a wait tick.  Stops the chain.
    Waited,
    /// Nothing to do; the next link gets the tick.
    Forward,
}

/// One automation concern in the chain.
///
/// # Contract
///
/// - Perform at most one world-affecting operation per call.
/// - Never panic.  A failed operation is logged and reported as `Forward`.
/// - Keep all cross-tick state in [`BehaviorState`]; links are stateless.
/// - While the link's precondition does not hold, return `Forward` without
///   touching `state`.
pub trait BehaviorLink {
    /// Short name used in logs and test assertions.
    fn name(&self) -> &'static str;

    fn process(&self, state: &mut BehaviorState, ctx: &mut LinkContext<'_>) -> LinkOutcome;
}

/// What the chain did this tick.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct ChainStep {
    pub outcome: LinkOutcome,
    /// The link that stopped the walk; `None` when every link forwarded.
    pub link:    Option<&'static str>,
}

impl ChainStep {
    pub fn acted(&self) -> bool {
        self.outcome == LinkOutcome::Acted
    }
}

/// An ordered list of links, walked once per tick.
#[derive(Default)]
pub struct BehaviorChain {
    links: Vec<Box<dyn BehaviorLink>>,
}

impl BehaviorChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `link` at the end of the chain.
    pub fn then<L: BehaviorLink + 'static>(mut self, link: L) -> Self {
        self.links.push(Box::new(link));
        self
    }

    /// The standard chain in its fixed order.
    pub fn standard() -> Self {
        use crate::links::*;
        let mut chain = Self::new();
        for errand in crate::Errand::ALL {
            chain = chain.then(ErrandLink::new(errand));
        }
        chain
            .then(JojaMembershipLink)
            .then(DialogueLink)
            .then(SleepLink)
            .then(FestivalAttendanceLink)
            .then(FestivalEventStartLink)
            .then(FestivalEndLink)
    }

    /// Walk the links until one stops the walk.
    pub fn process(&self, state: &mut BehaviorState, ctx: &mut LinkContext<'_>) -> ChainStep {
        for link in &self.links {
            let outcome = link.process(state, ctx);
            if outcome != LinkOutcome::Forward {
                tracing::trace!(link = link.name(), ?outcome, "chain stopped");
                return ChainStep { outcome, link: Some(link.name()) };
            }
        }
        ChainStep { outcome: LinkOutcome::Forward, link: None }
    }

    pub fn link_names(&self) -> Vec<&'static str> {
        self.links.iter().map(|l| l.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}
