// What the policy wants to do this tick, and why

use serde::Serialize;
use std::fmt;

use crate::types::Direction;

/// Reason attached to a proposed move, also sent back as the shout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Label {
    Cornering,
    Trapping,
    WallingOff,
    Attacking,
    SafeFood,
    RiskyFood,
    GoingToCenter,
    GoingToTail,
    Stalling,
    NoSafeMove,
}

impl Label {
    pub const ALL: [Label; 10] = [
        Label::Cornering,
        Label::Trapping,
        Label::WallingOff,
        Label::Attacking,
        Label::SafeFood,
        Label::RiskyFood,
        Label::GoingToCenter,
        Label::GoingToTail,
        Label::Stalling,
        Label::NoSafeMove,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Cornering => "Cornering",
            Label::Trapping => "Trapping",
            Label::WallingOff => "Walling off",
            Label::Attacking => "Attacking",
            Label::SafeFood => "Safe food",
            Label::RiskyFood => "Risky food",
            Label::GoingToCenter => "Going to center",
            Label::GoingToTail => "Going to my tail",
            Label::Stalling => "Stalling",
            Label::NoSafeMove => "No safe move",
        }
    }

    /// Cornering, trapping and walling off: the labels an opponent can be hit with
    pub fn is_tactic(&self) -> bool {
        matches!(self, Label::Cornering | Label::Trapping | Label::WallingOff)
    }

    pub fn parse(s: &str) -> Option<Label> {
        Label::ALL.into_iter().find(|label| label.as_str() == s)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Objective {
    pub label: Label,
    pub direction: Direction,
    /// Opponent a tactic is aimed at
    pub target: Option<String>,
}

impl Objective {
    pub fn new(label: Label, direction: Direction) -> Self {
        Objective {
            label,
            direction,
            target: None,
        }
    }

    pub fn targeting(label: Label, direction: Direction, target: &str) -> Self {
        Objective {
            label,
            direction,
            target: Some(target.to_string()),
        }
    }

    /// No legal move exists; answer the configured default anyway
    pub fn forced_death(default_move: Direction) -> Self {
        Objective::new(Label::NoSafeMove, default_move)
    }

    pub fn is_forced_death(&self) -> bool {
        self.label == Label::NoSafeMove
    }
}
