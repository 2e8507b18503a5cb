// Single-actor forward simulation
//
// Only the mover advances. Everyone else stays frozen except where the mover
// walks into a body segment, in which case that body is cut short: those
// trailing segments must already have left for the cell to have been passable.

use std::sync::Arc;

use crate::config::GameRulesConfig;
use crate::types::{Coord, Direction};
use crate::world::{Actor, WorldError, WorldModel};

pub struct Simulator<'a> {
    rules: &'a GameRulesConfig,
}

impl<'a> Simulator<'a> {
    pub fn new(rules: &'a GameRulesConfig) -> Self {
        Simulator { rules }
    }

    /// Moves the controlled actor one step
    pub fn apply(&self, world: &WorldModel, direction: Direction) -> Result<WorldModel, WorldError> {
        self.apply_for(world, &world.controlled().id, direction)
    }

    /// Moves any actor one step
    pub fn apply_for(
        &self,
        world: &WorldModel,
        actor_id: &str,
        direction: Direction,
    ) -> Result<WorldModel, WorldError> {
        crate::profile!("simulation", {
            let mover = world
                .actor(actor_id)
                .ok_or_else(|| WorldError::UnknownActor(actor_id.to_string()))?;
            let next = direction.apply(&mover.head());
            if !world.in_bounds(&next) {
                return Err(WorldError::BodyOutOfBounds {
                    id: mover.id.clone(),
                    cell: next,
                });
            }

            let mut body = Vec::with_capacity(mover.body.len() + 1);
            body.push(next);
            body.extend_from_slice(&mover.body[..mover.body.len() - 1]);
            let mut health = (mover.health - self.rules.health_loss_per_turn).max(0);

            let mut food = world.food_set().clone();
            if world.has_food(&next) {
                let mut remaining = (*food).clone();
                remaining.remove(&next);
                food = Arc::new(remaining);
                health = self.rules.health_on_food.min(self.rules.max_health);
                let tail = body[body.len() - 1];
                body.push(tail);
            }

            let moved = Arc::new(Actor::new(
                mover.id.clone(),
                mover.name.clone(),
                health,
                body,
            ));

            let actors = world
                .shared_actors()
                .map(|actor| {
                    if actor.id == actor_id {
                        moved.clone()
                    } else {
                        truncated(actor, &next)
                    }
                })
                .collect();

            world.rebuild(food, actors)
        })
    }

    /// Walks the controlled actor along `path`, where `path[0]` is its current head
    pub fn apply_path(&self, world: &WorldModel, path: &[Coord]) -> Result<WorldModel, WorldError> {
        let me = world.controlled();
        if path.first() != Some(&me.head()) {
            return Err(WorldError::PathNotAtHead { id: me.id.clone() });
        }

        let mut current = world.clone();
        for pair in path.windows(2) {
            let direction = Direction::between(&pair[0], &pair[1]).ok_or(
                WorldError::NonAdjacentStep {
                    from: pair[0],
                    to: pair[1],
                },
            )?;
            current = self.apply(&current, direction)?;
        }
        Ok(current)
    }
}

fn truncated(actor: &Arc<Actor>, entered: &Coord) -> Arc<Actor> {
    match actor.body.iter().position(|cell| cell == entered) {
        Some(index) if index > 0 => Arc::new(Actor::new(
            actor.id.clone(),
            actor.name.clone(),
            actor.health,
            actor.body[..index].to_vec(),
        )),
        _ => actor.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{board, config, snake, world};

    #[test]
    fn test_step_moves_head_and_drops_tail() {
        let board = board(
            7,
            7,
            &[],
            vec![snake("me", &[(3, 3), (3, 2), (3, 1)], 90)],
        );
        let world = world(&board, "me");
        let config = config();
        let simulator = Simulator::new(&config.game_rules);

        let next = simulator.apply(&world, Direction::Up).unwrap();
        let me = next.controlled();
        assert_eq!(
            me.body,
            vec![Coord::new(3, 4), Coord::new(3, 3), Coord::new(3, 2)]
        );
        assert_eq!(me.health, 89);
        assert!(next.is_open(&Coord::new(3, 1)));
        // The input is untouched
        assert_eq!(world.controlled().head(), Coord::new(3, 3));
    }

    #[test]
    fn test_eating_restores_health_and_grows() {
        let board = board(
            7,
            7,
            &[(3, 4)],
            vec![snake("me", &[(3, 3), (3, 2), (3, 1)], 20)],
        );
        let world = world(&board, "me");
        let config = config();
        let simulator = Simulator::new(&config.game_rules);

        let next = simulator.apply(&world, Direction::Up).unwrap();
        let me = next.controlled();
        assert_eq!(me.health, 100);
        assert_eq!(me.length(), 4);
        assert_eq!(me.growth_pending(), 1);
        assert!(!next.has_food(&Coord::new(3, 4)));
        assert_eq!(world.food().count(), 1);
    }

    #[test]
    fn test_entering_a_vacated_segment_truncates_its_owner() {
        let board = board(
            7,
            7,
            &[],
            vec![
                snake("me", &[(1, 2), (1, 3), (1, 4)], 90),
                snake("them", &[(4, 2), (3, 2), (2, 2)], 90),
            ],
        );
        let world = world(&board, "me");
        let config = config();
        let simulator = Simulator::new(&config.game_rules);

        let next = simulator.apply(&world, Direction::Right).unwrap();
        let them = next.actor("them").unwrap();
        assert_eq!(them.body, vec![Coord::new(4, 2), Coord::new(3, 2)]);
        assert_eq!(next.controlled().head(), Coord::new(2, 2));
    }

    #[test]
    fn test_path_must_start_at_head_and_be_contiguous() {
        let board = board(7, 7, &[], vec![snake("me", &[(3, 3), (3, 2)], 90)]);
        let world = world(&board, "me");
        let config = config();
        let simulator = Simulator::new(&config.game_rules);

        assert!(matches!(
            simulator.apply_path(&world, &[Coord::new(0, 0), Coord::new(0, 1)]),
            Err(WorldError::PathNotAtHead { .. })
        ));
        assert!(matches!(
            simulator.apply_path(&world, &[Coord::new(3, 3), Coord::new(5, 3)]),
            Err(WorldError::NonAdjacentStep { .. })
        ));

        let walked = simulator
            .apply_path(
                &world,
                &[Coord::new(3, 3), Coord::new(4, 3), Coord::new(5, 3)],
            )
            .unwrap();
        assert_eq!(walked.controlled().head(), Coord::new(5, 3));
        assert_eq!(walked.controlled().health, 88);
    }

    #[test]
    fn test_moving_off_the_board_is_an_error() {
        let board = board(3, 3, &[], vec![snake("me", &[(0, 0)], 90)]);
        let world = world(&board, "me");
        let config = config();
        let simulator = Simulator::new(&config.game_rules);

        assert!(simulator.apply(&world, Direction::Left).is_err());
    }
}
