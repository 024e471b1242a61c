use ha_core::AutomationConfig;
use ha_world::{Menu, Question, WorldResult};

use crate::{BehaviorLink, BehaviorState, LinkContext, LinkOutcome};

/// Resolves interactive prompts on the host: plain dialogue, questions,
/// naming prompts and the level-up summary.
pub struct DialogueLink;

/// Which response to pick for `q`.
///
/// The cave question is answered per `cave_choice`, a yes/no question per
/// `accept_pet`; anything else gets its first response.
fn pick_response(q: &Question, config: &AutomationConfig) -> usize {
    if let (Some(_), Some(_)) = (q.position_of("mushrooms"), q.position_of("bats")) {
        if let Some(i) = q.position_of(config.cave_choice.response_text()) {
            return i;
        }
    }
    if let (Some(yes), Some(no)) = (q.position_of("yes"), q.position_of("no")) {
        return if config.accept_pet { yes } else { no };
    }
    0
}

impl BehaviorLink for DialogueLink {
    fn name(&self) -> &'static str {
        "dialogue"
    }

    fn process(&self, state: &mut BehaviorState, ctx: &mut LinkContext<'_>) -> LinkOutcome {
        let menu = match ctx.world.active_menu() {
            Some(m @ (Menu::Dialogue(_) | Menu::Naming | Menu::LevelUp)) => m,
            _ => {
                state.dialogue_wait = 0;
                return LinkOutcome::Forward;
            }
        };
        if state.dialogue_wait > 0 {
            state.dialogue_wait -= 1;
            return LinkOutcome::Waited;
        }

        let result: WorldResult<()> = match &menu {
            Menu::Dialogue(None) => ctx.world.advance_dialogue(),
            Menu::Dialogue(Some(q)) => {
                let index = pick_response(q, ctx.config);
                tracing::info!(prompt = %q.prompt, response = ?q.responses.get(index), "answering question");
                ctx.world.choose_response(index)
            }
            Menu::Naming => {
                tracing::info!(name = %ctx.config.pet_name, "submitting name");
                ctx.world.submit_name(&ctx.config.pet_name)
            }
            _ => ctx.world.dismiss_level_up(),
        };

        match result {
            Ok(()) => {
                state.dialogue_wait = ctx.dialogue_wait_ticks();
                LinkOutcome::Acted
            }
            Err(error) => {
                tracing::warn!(?menu, %error, "could not resolve menu");
                LinkOutcome::Forward
            }
        }
    }
}
