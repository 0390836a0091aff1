use crate::snake::{Direction, Snake, BLOCK};
use crate::{Cell, GridInt};

use rand::Rng;
use serde::{Deserialize, Serialize};

pub const GRID_WIDTH: GridInt = 640;
pub const GRID_HEIGHT: GridInt = 240;

pub const START_CELLS: [Cell; 2] = [
    (GRID_WIDTH / 4, GRID_HEIGHT / 2),
    (3 * GRID_WIDTH / 4, GRID_HEIGHT / 2),
];

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// The given player index outlasted the other.
    Win(usize),
    /// Head-to-head, or both snakes crashing in the same tick.
    Draw,
}

/// Sound cues raised by a tick, for the presentation layer to play.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Cue {
    Crunch,
    Horn,
    Kiss,
    Hiss,
}

/// Everything a round consists of: both snakes, the food cell and the
/// outcome once one is decided. Holds no terminal or audio handles, so it
/// can be ticked headless, and a serialized snapshot restores to identical
/// subsequent behavior given the same inputs and RNG stream.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundState {
    snakes: [Snake; 2],
    food: Cell,
    outcome: Option<Outcome>,
}

impl RoundState {
    pub fn new(names: [&str; 2], rng: &mut impl Rng) -> Self {
        RoundState {
            snakes: [
                Snake::new(names[0], START_CELLS[0]),
                Snake::new(names[1], START_CELLS[1]),
            ],
            food: random_food_cell(rng),
            outcome: None,
        }
    }

    pub fn snakes(&self) -> &[Snake; 2] {
        &self.snakes
    }

    pub fn snake(&self, player: usize) -> &Snake {
        &self.snakes[player]
    }

    pub fn food(&self) -> Cell {
        self.food
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// Routes a directional key to the owning snake. The only way input
    /// reaches the simulation; always happens before the tick's movement.
    pub fn set_direction(&mut self, player: usize, requested: Direction) {
        self.snakes[player].set_direction(requested);
    }

    /// One simulation step. Every collision predicate is evaluated against a
    /// snapshot of the pre-tick state, then resolved once with fixed priority
    /// (head-to-head, then body collision, then bounds/self). Movement only
    /// commits on a tick where no terminal condition fired.
    pub fn tick(&mut self, rng: &mut impl Rng) -> Vec<Cue> {
        if self.outcome.is_some() {
            return vec![];
        }

        let heads = [self.snakes[0].head(), self.snakes[1].head()];
        let next = [self.snakes[0].next_head(), self.snakes[1].next_head()];

        if next[0] == heads[1] || next[1] == heads[0] {
            self.outcome = Some(Outcome::Draw);
            return vec![Cue::Kiss];
        }

        let body_hit = [
            self.snakes[1].positions().contains(&next[0]),
            self.snakes[0].positions().contains(&next[1]),
        ];
        // Self-collision is checked on the pre-advance body, so it fires one
        // tick after the overlap is created
        let crashed = [
            out_of_bounds(next[0]) || self.snakes[0].collides_with_self(),
            out_of_bounds(next[1]) || self.snakes[1].collides_with_self(),
        ];

        let lost = [body_hit[0] || crashed[0], body_hit[1] || crashed[1]];
        if lost[0] || lost[1] {
            self.outcome = Some(match lost {
                [true, true] => Outcome::Draw,
                [true, false] => Outcome::Win(1),
                _ => Outcome::Win(0),
            });
            let cue = if body_hit[0] || body_hit[1] { Cue::Horn } else { Cue::Hiss };
            return vec![cue];
        }

        let mut cues = vec![];
        for i in 0..2 {
            self.snakes[i].advance();
            if self.snakes[i].head() == self.food {
                self.snakes[i].grow();
                self.food = random_food_cell(rng);
                cues.push(Cue::Crunch);
            }
        }
        cues
    }
}

fn out_of_bounds((x, y): Cell) -> bool {
    x >= GRID_WIDTH || x < 0 || y >= GRID_HEIGHT || y < 0
}

/// Uniform over the whole grid, block-aligned. Landing on a snake body is
/// allowed, matching the reference behavior.
fn random_food_cell(rng: &mut impl Rng) -> Cell {
    (
        rng.gen_range(0..GRID_WIDTH / BLOCK) * BLOCK,
        rng.gen_range(0..GRID_HEIGHT / BLOCK) * BLOCK,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snake::Direction::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(99)
    }

    fn duel() -> RoundState {
        let mut state = RoundState::new(["Adam", "Eve"], &mut rng());
        state.food = (600, 230); // out of everyone's way
        state
    }

    #[test]
    fn nobody_moves_before_the_first_key() {
        let mut r = rng();
        let mut state = duel();
        for _ in 0..3 {
            state.tick(&mut r);
        }
        assert_eq!(state.snake(0).head(), START_CELLS[0]);
        assert_eq!(state.snake(1).head(), START_CELLS[1]);
        assert!(state.outcome().is_none());
    }

    #[test]
    fn segment_count_never_exceeds_length() {
        let mut r = rng();
        let mut state = duel();
        state.set_direction(0, Right);
        state.set_direction(1, Left);
        for _ in 0..10 {
            state.tick(&mut r);
            for snake in state.snakes() {
                assert!(snake.positions().len() <= snake.length());
            }
        }
    }

    #[test]
    fn running_into_the_opponent_loses_the_round() {
        // Adam's next head lands on Eve's body, one cell behind her head
        let adam = Snake::from_parts("Adam", vec![(10, 10)], 1, Some(Right));
        let eve = Snake::from_parts("Eve", vec![(20, 10), (20, 20)], 2, Some(Down));
        let mut state = RoundState { snakes: [adam, eve], food: (600, 230), outcome: None };

        let cues = state.tick(&mut rng());
        assert_eq!(state.outcome(), Some(Outcome::Win(1)));
        assert_eq!(cues, vec![Cue::Horn]);
        // No movement commits on a terminal tick
        assert_eq!(state.snake(0).positions(), &[(10, 10)]);
        assert_eq!(state.snake(1).positions(), &[(20, 10), (20, 20)]);
    }

    #[test]
    fn head_to_head_ends_in_a_draw() {
        let adam = Snake::from_parts("Adam", vec![(10, 10)], 1, Some(Right));
        let eve = Snake::from_parts("Eve", vec![(20, 10)], 1, Some(Left));
        let mut state = RoundState { snakes: [adam, eve], food: (600, 230), outcome: None };

        let cues = state.tick(&mut rng());
        assert_eq!(state.outcome(), Some(Outcome::Draw));
        assert_eq!(cues, vec![Cue::Kiss]);
    }

    #[test]
    fn head_to_head_outranks_other_collisions() {
        // Adam is about to leave the grid, but Eve is also about to land on
        // his head: the mutual collision wins
        let adam = Snake::from_parts("Adam", vec![(0, 10)], 1, Some(Left));
        let eve = Snake::from_parts("Eve", vec![(10, 10)], 1, Some(Left));
        let mut state = RoundState { snakes: [adam, eve], food: (600, 230), outcome: None };

        let cues = state.tick(&mut rng());
        assert_eq!(state.outcome(), Some(Outcome::Draw));
        assert_eq!(cues, vec![Cue::Kiss]);
    }

    #[test]
    fn leaving_the_grid_hands_the_opponent_the_win() {
        let cases = [
            ((0, 120), Left),
            ((GRID_WIDTH - BLOCK, 120), Right),
            ((320, 0), Up),
            ((320, GRID_HEIGHT - BLOCK), Down),
        ];

        for &(start, dir) in cases.iter() {
            let runaway = Snake::from_parts("Adam", vec![start], 1, Some(dir));
            let bystander = Snake::from_parts("Eve", vec![(100, 60)], 1, None);
            let mut state =
                RoundState { snakes: [runaway, bystander], food: (600, 230), outcome: None };

            let cues = state.tick(&mut rng());
            assert_eq!(state.outcome(), Some(Outcome::Win(1)), "direction {:?}", dir);
            assert_eq!(cues, vec![Cue::Hiss]);
        }

        // Same rule with the players swapped
        let bystander = Snake::from_parts("Adam", vec![(100, 60)], 1, None);
        let runaway = Snake::from_parts("Eve", vec![(0, 120)], 1, Some(Left));
        let mut state = RoundState { snakes: [bystander, runaway], food: (600, 230), outcome: None };
        state.tick(&mut rng());
        assert_eq!(state.outcome(), Some(Outcome::Win(0)));
    }

    #[test]
    fn self_collision_loses_one_tick_late() {
        let looped = Snake::from_parts(
            "Adam",
            vec![(10, 10), (20, 10), (20, 20), (10, 20), (10, 10)],
            5,
            Some(Up),
        );
        let other = Snake::from_parts("Eve", vec![(480, 120)], 1, None);
        let mut state = RoundState { snakes: [looped, other], food: (600, 230), outcome: None };

        let cues = state.tick(&mut rng());
        assert_eq!(state.outcome(), Some(Outcome::Win(1)));
        assert_eq!(cues, vec![Cue::Hiss]);
    }

    #[test]
    fn simultaneous_crashes_are_a_draw() {
        let adam = Snake::from_parts("Adam", vec![(0, 120)], 1, Some(Left));
        let eve = Snake::from_parts("Eve", vec![(GRID_WIDTH - BLOCK, 120)], 1, Some(Right));
        let mut state = RoundState { snakes: [adam, eve], food: (600, 230), outcome: None };

        let cues = state.tick(&mut rng());
        assert_eq!(state.outcome(), Some(Outcome::Draw));
        assert_eq!(cues, vec![Cue::Hiss]);
    }

    #[test]
    fn eating_grows_by_one_and_respawns_food() {
        let mut r = rng();
        let mut state = duel();
        state.food = (START_CELLS[0].0 + BLOCK, START_CELLS[0].1); // in Adam's path
        state.set_direction(0, Right);
        state.set_direction(1, Down);

        let cues = state.tick(&mut r);
        assert!(cues.contains(&Cue::Crunch));
        assert_eq!(state.snake(0).length(), 2);
        assert_eq!(state.snake(0).positions().len(), 1);

        let (fx, fy) = state.food();
        assert!(fx >= 0 && fx < GRID_WIDTH && fy >= 0 && fy < GRID_HEIGHT);
        assert_eq!((fx % BLOCK, fy % BLOCK), (0, 0));

        // The extra segment appears on the next advance
        state.tick(&mut r);
        assert_eq!(state.snake(0).positions().len(), 2);
    }

    #[test]
    fn ticking_a_finished_round_changes_nothing() {
        let adam = Snake::from_parts("Adam", vec![(10, 10)], 1, Some(Right));
        let eve = Snake::from_parts("Eve", vec![(20, 10)], 1, Some(Left));
        let mut state = RoundState { snakes: [adam, eve], food: (600, 230), outcome: None };
        state.tick(&mut rng());
        assert!(state.is_over());

        let frozen = state.clone();
        let cues = state.tick(&mut rng());
        assert!(cues.is_empty());
        assert_eq!(state, frozen);
    }

    #[test]
    fn fresh_rounds_always_start_identically() {
        let mut r1 = StdRng::seed_from_u64(5);
        let mut wrecked = RoundState::new(["Adam", "Eve"], &mut r1);
        wrecked.set_direction(0, Left);
        for _ in 0..20 {
            wrecked.tick(&mut r1);
        }
        assert!(wrecked.is_over());

        let mut r2 = StdRng::seed_from_u64(5);
        let restarted = RoundState::new(["Adam", "Eve"], &mut r2);
        let mut r3 = StdRng::seed_from_u64(5);
        let reference = RoundState::new(["Adam", "Eve"], &mut r3);

        assert_eq!(restarted, reference);
        assert_eq!(restarted.snake(0).positions(), &[START_CELLS[0]]);
        assert_eq!(restarted.snake(1).positions(), &[START_CELLS[1]]);
        assert_eq!(restarted.snake(0).length(), 1);
        assert_eq!(restarted.snake(0).direction(), None);
        assert!(restarted.outcome().is_none());
    }

    #[test]
    fn snapshot_round_trips_and_replays_identically() {
        let mut r = StdRng::seed_from_u64(12);
        let mut state = RoundState::new(["Adam", "Eve"], &mut r);
        state.set_direction(0, Right);
        state.set_direction(1, Left);
        for _ in 0..5 {
            state.tick(&mut r);
        }

        let json = serde_json::to_string(&state).unwrap();
        let mut restored: RoundState = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, state);

        let mut r2 = r.clone();
        let script = [(0, Down), (1, Up), (0, Right)];
        for (i, &(player, dir)) in script.iter().enumerate() {
            state.set_direction(player, dir);
            restored.set_direction(player, dir);
            let original_cues = state.tick(&mut r);
            let restored_cues = restored.tick(&mut r2);
            assert_eq!(original_cues, restored_cues, "tick {}", i);
            assert_eq!(state, restored, "tick {}", i);
        }
    }
}
