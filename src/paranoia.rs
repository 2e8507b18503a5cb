// One-ply adversarial check of our own objective
//
// After our move, each nearby opponent is given the controlled seat and asked
// whether it has a tactic that targets us. The checker only ever runs the
// tactics-only policy, so it cannot recurse into itself.

use crate::config::Config;
use crate::objective::{Label, Objective};
use crate::policy::Policy;
use crate::simulator::Simulator;
use crate::world::{Actor, WorldModel};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThreatKind {
    /// Our move cannot even be simulated
    IllegalMove,
    /// An opponent at least our size can move onto our new head
    HeadToHead,
    /// An opponent has this tactic against us
    Tactic(Label),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Threat {
    pub opponent_id: String,
    pub kind: ThreatKind,
    /// Manhattan distance from the opponent's head to our new head
    pub distance: i32,
}

impl Threat {
    /// Higher is worse
    pub fn severity(&self) -> u8 {
        match self.kind {
            ThreatKind::IllegalMove => 2,
            ThreatKind::HeadToHead => 1,
            ThreatKind::Tactic(_) => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Safe,
    Unsafe(Threat),
}

pub struct AdversarialChecker<'a> {
    config: &'a Config,
    policy: Policy<'a>,
    simulator: Simulator<'a>,
}

impl<'a> AdversarialChecker<'a> {
    pub fn new(config: &'a Config) -> Self {
        AdversarialChecker {
            config,
            policy: Policy::new(config),
            simulator: Simulator::new(&config.game_rules),
        }
    }

    /// Judges whether following `objective` leaves us open to an immediate counter
    pub fn check(&self, world: &WorldModel, objective: &Objective) -> Verdict {
        crate::profile!("paranoia", {
            let me = world.controlled();
            let future = match self.simulator.apply(world, objective.direction) {
                Ok(future) => future,
                Err(e) => {
                    log::warn!("cannot simulate {}: {}", objective.direction.as_str(), e);
                    return Verdict::Unsafe(Threat {
                        opponent_id: me.id.clone(),
                        kind: ThreatKind::IllegalMove,
                        distance: 0,
                    });
                }
            };

            let moved = future.controlled();
            let new_head = moved.head();

            for (distance, opponent) in self.nearby_opponents(world, &future) {
                if opponent.length() >= moved.length() && opponent.head().is_adjacent(&new_head) {
                    return Verdict::Unsafe(Threat {
                        opponent_id: opponent.id.clone(),
                        kind: ThreatKind::HeadToHead,
                        distance,
                    });
                }

                let mirrored = match future.relabel(&opponent.id) {
                    Ok(mirrored) => mirrored,
                    Err(e) => {
                        log::warn!("cannot relabel {}: {}", opponent.id, e);
                        continue;
                    }
                };

                if let Some(counter) = self.policy.tactics_only(&mirrored) {
                    let aimed_at_us = counter.target.as_deref() == Some(me.id.as_str());
                    if counter.label.is_tactic() && aimed_at_us {
                        return Verdict::Unsafe(Threat {
                            opponent_id: opponent.id.clone(),
                            kind: ThreatKind::Tactic(counter.label),
                            distance,
                        });
                    }
                }
            }

            Verdict::Safe
        })
    }

    /// Opponents that still have a move, closest to our new head first
    fn nearby_opponents<'w>(
        &self,
        world: &'w WorldModel,
        future: &WorldModel,
    ) -> Vec<(i32, &'w Actor)> {
        let new_head = future.controlled().head();
        let mut ranked: Vec<(i32, &Actor)> = world
            .opponents()
            .filter(|opponent| {
                !world
                    .passable_neighbours(&opponent.head(), opponent, 1, 0)
                    .is_empty()
            })
            .map(|opponent| (opponent.head().manhattan(&new_head), opponent))
            .collect();
        ranked.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.id.cmp(&b.1.id)));
        ranked.truncate(self.config.paranoia.max_opponents);
        ranked
    }
}
