//! Uniform random player driven by its own seeded generator.

use std::sync::Mutex;

use crate::AIOpponent;
use cardtable_engine::action::Action;
use cardtable_engine::game::GameState;
use cardtable_engine::player::PlayerId;
use cardtable_engine::reducer::Reducer;
use cardtable_engine::rng::{Seed, SeededRng};

/// Picks any legal move with equal probability.
///
/// The generator is private to the player, so its draws never disturb the
/// deal; two players built from the same seed make the same choices.
#[derive(Debug)]
pub struct RandomAI {
    rng: Mutex<SeededRng>,
}

impl RandomAI {
    pub fn new(seed: Seed) -> Self {
        Self {
            rng: Mutex::new(SeededRng::new(seed)),
        }
    }
}

impl<R: Reducer> AIOpponent<R> for RandomAI {
    fn select<'a>(
        &self,
        _view: &GameState<R::Payload>,
        _player_id: &PlayerId,
        legal: &'a [Action],
    ) -> Option<&'a Action> {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        rng.pick(legal)
    }

    fn name(&self) -> &str {
        "RandomAI"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardtable_engine::player::Player;
    use cardtable_engine::spades::SpadesReducer;

    fn setup() -> (SpadesReducer, GameState<cardtable_engine::spades::SpadesState>) {
        let players: Vec<Player> = (1..=4)
            .map(|i| Player::ai(format!("p{}", i), format!("Bot {}", i)))
            .collect();
        let rules = SpadesReducer::new();
        let state = rules.initial_state(11, &players).unwrap();
        (rules, state)
    }

    #[test]
    fn same_seed_same_choices() {
        let (rules, state) = setup();
        let me = PlayerId::new("p1");
        let legal = rules.valid_actions(&state, &me);
        let a = RandomAI::new(5);
        let b = RandomAI::new(5);
        for _ in 0..10 {
            let x = AIOpponent::<SpadesReducer>::select(&a, &state, &me, &legal);
            let y = AIOpponent::<SpadesReducer>::select(&b, &state, &me, &legal);
            assert_eq!(x, y);
            assert!(x.is_some());
        }
    }

    #[test]
    fn empty_legal_set_yields_none() {
        let (_, state) = setup();
        let ai = RandomAI::new(1);
        let me = PlayerId::new("p1");
        assert!(AIOpponent::<SpadesReducer>::select(&ai, &state, &me, &[]).is_none());
    }
}
