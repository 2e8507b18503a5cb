// World model for a single tick
//
// A WorldModel is built fresh from a snapshot (or from a simulator step) and is read-only
// afterwards. Actors sit behind Arc so hypothetical boards share everything they do not change.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use crate::types::{Battlesnake, Board, Coord, Direction};

/// Highest health value the rules allow
pub const MAX_HEALTH: i32 = 100;

/// Reasons a snapshot cannot be turned into a world model
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorldError {
    #[error("board dimensions must be positive and fit in memory, got {width}x{height}")]
    InvalidDimensions { width: i32, height: i32 },
    #[error("actor '{id}' has an empty body")]
    EmptyBody { id: String },
    #[error("actor '{id}' reports head ({}, {}) but its body starts at ({}, {})", .head.x, .head.y, .body_head.x, .body_head.y)]
    HeadMismatch { id: String, head: Coord, body_head: Coord },
    #[error("actor '{id}' has body cell ({}, {}) outside the board", .cell.x, .cell.y)]
    BodyOutOfBounds { id: String, cell: Coord },
    #[error("actor '{id}' has a gap in its body at ({}, {})", .cell.x, .cell.y)]
    DisjointBody { id: String, cell: Coord },
    #[error("food at ({}, {}) lies outside the board", .0.x, .0.y)]
    FoodOutOfBounds(Coord),
    #[error("actor '{id}' has health {health}, expected 0..={max}", max = MAX_HEALTH)]
    InvalidHealth { id: String, health: i32 },
    #[error("actor '{id}' declares length {declared} but has {actual} body cells")]
    LengthMismatch { id: String, declared: i32, actual: usize },
    #[error("actor id '{0}' appears more than once")]
    DuplicateActor(String),
    #[error("actor '{0}' is not on the board")]
    UnknownActor(String),
    #[error("path must start at the head of '{id}'")]
    PathNotAtHead { id: String },
    #[error("step from ({}, {}) to ({}, {}) is not a single orthogonal move", .from.x, .from.y, .to.x, .to.y)]
    NonAdjacentStep { from: Coord, to: Coord },
}

/// What occupies a grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Empty,
    Food,
    Head,
    Body,
    Tail,
}

impl Marker {
    fn symbol(&self) -> char {
        match self {
            Marker::Empty => '.',
            Marker::Food => 'F',
            Marker::Head => 'H',
            Marker::Body => 'b',
            Marker::Tail => 't',
        }
    }
}

/// Whose perspective an actor is seen from inside one world model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Controlled,
    Opponent,
}

/// One snake: body ordered head first, trailing duplicates are growth still in the pipe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: String,
    pub name: String,
    pub health: i32,
    pub body: Vec<Coord>,
}

impl Actor {
    pub fn new(id: impl Into<String>, name: impl Into<String>, health: i32, body: Vec<Coord>) -> Self {
        Actor {
            id: id.into(),
            name: name.into(),
            health,
            body,
        }
    }

    fn from_wire(snake: &Battlesnake) -> Result<Self, WorldError> {
        if snake.length < 0 || snake.length as usize != snake.body.len() {
            return Err(WorldError::LengthMismatch {
                id: snake.id.clone(),
                declared: snake.length,
                actual: snake.body.len(),
            });
        }
        if let Some(&body_head) = snake.body.first() {
            if body_head != snake.head {
                return Err(WorldError::HeadMismatch {
                    id: snake.id.clone(),
                    head: snake.head,
                    body_head,
                });
            }
        }
        Ok(Actor::new(
            snake.id.clone(),
            snake.name.clone(),
            snake.health,
            snake.body.clone(),
        ))
    }

    pub fn head(&self) -> Coord {
        self.body[0]
    }

    pub fn tail(&self) -> Coord {
        self.body[self.body.len() - 1]
    }

    pub fn length(&self) -> usize {
        self.body.len()
    }

    /// Ticks the tail stays put because the snake is still growing out of it
    pub fn growth_pending(&self) -> usize {
        let tail = self.tail();
        self.body
            .iter()
            .rev()
            .skip(1)
            .take_while(|cell| **cell == tail)
            .count()
    }

    /// Body with consecutive duplicate cells collapsed
    pub fn segments(&self) -> Vec<Coord> {
        let mut segments: Vec<Coord> = Vec::with_capacity(self.body.len());
        for cell in &self.body {
            if segments.last() != Some(cell) {
                segments.push(*cell);
            }
        }
        segments
    }

    /// Direction of the last move, None for a snake that has not left its spawn cell
    pub fn heading(&self) -> Option<Direction> {
        let head = self.head();
        let neck = self.body.iter().find(|cell| **cell != head)?;
        Direction::between(neck, &head)
    }
}

#[derive(Debug, Clone)]
struct Seat {
    role: Role,
    actor: Arc<Actor>,
}

/// Read-only view of the board from one actor's perspective
#[derive(Debug, Clone)]
pub struct WorldModel {
    width: i32,
    height: i32,
    food: Arc<BTreeSet<Coord>>,
    // The controlled seat is always first
    seats: Vec<Seat>,
    grid: Vec<Marker>,
}

impl WorldModel {
    /// Builds the world model for one tick, dropping dead snakes (health exactly 0)
    ///
    /// # Arguments
    /// * `board` - Board as received from the game server
    /// * `controlled_id` - Id of the snake we are choosing a move for
    pub fn from_board(board: &Board, controlled_id: &str) -> Result<Self, WorldError> {
        let mut controlled = None;
        let mut opponents = Vec::new();
        let mut seen = BTreeSet::new();

        for snake in board.snakes.iter().filter(|s| s.health != 0) {
            if !seen.insert(snake.id.as_str()) {
                return Err(WorldError::DuplicateActor(snake.id.clone()));
            }
            let actor = Arc::new(Actor::from_wire(snake)?);
            if snake.id == controlled_id {
                controlled = Some(actor);
            } else {
                opponents.push(actor);
            }
        }

        let controlled =
            controlled.ok_or_else(|| WorldError::UnknownActor(controlled_id.to_string()))?;
        let food: BTreeSet<Coord> = board.food.iter().copied().collect();

        Self::assemble(
            board.width,
            board.height,
            Arc::new(food),
            controlled,
            opponents,
        )
    }

    fn assemble(
        width: i32,
        height: i32,
        food: Arc<BTreeSet<Coord>>,
        controlled: Arc<Actor>,
        opponents: Vec<Arc<Actor>>,
    ) -> Result<Self, WorldError> {
        let cells = match width.checked_mul(height) {
            Some(cells) if width > 0 && height > 0 => cells as usize,
            _ => return Err(WorldError::InvalidDimensions { width, height }),
        };

        let mut seats = Vec::with_capacity(opponents.len() + 1);
        seats.push(Seat {
            role: Role::Controlled,
            actor: controlled,
        });
        seats.extend(opponents.into_iter().map(|actor| Seat {
            role: Role::Opponent,
            actor,
        }));

        let mut world = WorldModel {
            width,
            height,
            food,
            seats,
            grid: vec![Marker::Empty; cells],
        };
        world.validate()?;
        world.mark_grid();
        Ok(world)
    }

    fn validate(&self) -> Result<(), WorldError> {
        let mut ids = BTreeSet::new();
        for actor in self.actors() {
            if !ids.insert(actor.id.as_str()) {
                return Err(WorldError::DuplicateActor(actor.id.clone()));
            }
            if actor.body.is_empty() {
                return Err(WorldError::EmptyBody {
                    id: actor.id.clone(),
                });
            }
            if !(0..=MAX_HEALTH).contains(&actor.health) {
                return Err(WorldError::InvalidHealth {
                    id: actor.id.clone(),
                    health: actor.health,
                });
            }
            for (index, cell) in actor.body.iter().enumerate() {
                if !self.in_bounds(cell) {
                    return Err(WorldError::BodyOutOfBounds {
                        id: actor.id.clone(),
                        cell: *cell,
                    });
                }
                if index > 0 {
                    let previous = actor.body[index - 1];
                    if previous != *cell && !previous.is_adjacent(cell) {
                        return Err(WorldError::DisjointBody {
                            id: actor.id.clone(),
                            cell: *cell,
                        });
                    }
                }
            }
        }

        if let Some(food) = self.food.iter().find(|food| !self.in_bounds(food)) {
            return Err(WorldError::FoodOutOfBounds(*food));
        }
        Ok(())
    }

    fn mark_grid(&mut self) {
        for seat in &self.seats {
            let body = &seat.actor.body;
            if body.len() > 2 {
                for cell in &body[1..body.len() - 1] {
                    let index = self.index(cell);
                    self.grid[index] = Marker::Body;
                }
            }
            let head = self.index(&seat.actor.head());
            self.grid[head] = Marker::Head;
            let tail = self.index(&seat.actor.tail());
            self.grid[tail] = Marker::Tail;
        }

        let foods: Vec<usize> = self.food.iter().map(|food| self.index(food)).collect();
        for index in foods {
            self.grid[index] = Marker::Food;
        }
    }

    /// A new model of the same board in which `actor_id` is the controlled actor and
    /// the previously controlled actor becomes an opponent
    pub fn relabel(&self, actor_id: &str) -> Result<WorldModel, WorldError> {
        let chosen = self
            .seats
            .iter()
            .find(|seat| seat.actor.id == actor_id)
            .ok_or_else(|| WorldError::UnknownActor(actor_id.to_string()))?;

        let opponents = self
            .seats
            .iter()
            .filter(|seat| seat.actor.id != actor_id)
            .map(|seat| seat.actor.clone())
            .collect();

        Self::assemble(
            self.width,
            self.height,
            self.food.clone(),
            chosen.actor.clone(),
            opponents,
        )
    }

    /// A new model with the same roles, replacing food and actors.
    /// `actors` must be in the order returned by `actors()`.
    pub(crate) fn rebuild(
        &self,
        food: Arc<BTreeSet<Coord>>,
        mut actors: Vec<Arc<Actor>>,
    ) -> Result<WorldModel, WorldError> {
        let opponents = actors.split_off(1);
        let controlled = actors
            .pop()
            .ok_or_else(|| WorldError::UnknownActor(self.controlled().id.clone()))?;
        Self::assemble(self.width, self.height, food, controlled, opponents)
    }

    fn index(&self, cell: &Coord) -> usize {
        (cell.y * self.width + cell.x) as usize
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn in_bounds(&self, cell: &Coord) -> bool {
        cell.x >= 0 && cell.x < self.width && cell.y >= 0 && cell.y < self.height
    }

    /// Marker at a cell, None when outside the board
    pub fn marker(&self, cell: &Coord) -> Option<Marker> {
        if self.in_bounds(cell) {
            Some(self.grid[self.index(cell)])
        } else {
            None
        }
    }

    /// Empty or food: nothing to wait for
    pub fn is_open(&self, cell: &Coord) -> bool {
        matches!(self.marker(cell), Some(Marker::Empty) | Some(Marker::Food))
    }

    pub fn has_food(&self, cell: &Coord) -> bool {
        self.food.contains(cell)
    }

    pub fn food(&self) -> impl Iterator<Item = &Coord> {
        self.food.iter()
    }

    pub(crate) fn food_set(&self) -> &Arc<BTreeSet<Coord>> {
        &self.food
    }

    pub fn controlled(&self) -> &Actor {
        &self.seats[0].actor
    }

    pub fn opponents(&self) -> impl Iterator<Item = &Actor> {
        self.seats
            .iter()
            .filter(|seat| seat.role == Role::Opponent)
            .map(|seat| seat.actor.as_ref())
    }

    pub fn opponent_count(&self) -> usize {
        self.seats.len() - 1
    }

    /// Every actor, controlled first
    pub fn actors(&self) -> impl Iterator<Item = &Actor> {
        self.seats.iter().map(|seat| seat.actor.as_ref())
    }

    pub(crate) fn shared_actors(&self) -> impl Iterator<Item = &Arc<Actor>> {
        self.seats.iter().map(|seat| &seat.actor)
    }

    pub fn actor(&self, id: &str) -> Option<&Actor> {
        self.actors().find(|actor| actor.id == id)
    }

    pub fn role_of(&self, id: &str) -> Option<Role> {
        self.seats
            .iter()
            .find(|seat| seat.actor.id == id)
            .map(|seat| seat.role)
    }

    /// True when the controlled actor is longer than every opponent by more than `buffer`
    pub fn is_controlled_largest(&self, buffer: usize) -> bool {
        let mine = self.controlled().length();
        self.opponents().all(|opponent| mine > opponent.length() + buffer)
    }

    pub fn center(&self) -> Coord {
        Coord::new((self.width - 1) / 2, (self.height - 1) / 2)
    }

    pub fn is_edge(&self, cell: &Coord) -> bool {
        cell.x == 0 || cell.y == 0 || cell.x == self.width - 1 || cell.y == self.height - 1
    }

    pub fn is_corner(&self, cell: &Coord) -> bool {
        (cell.x == 0 || cell.x == self.width - 1) && (cell.y == 0 || cell.y == self.height - 1)
    }

    /// Directions pointing out of the board from a cell on the outermost ring
    pub fn outward_directions(&self, cell: &Coord) -> Vec<Direction> {
        let mut outward = Vec::new();
        if cell.x == self.width - 1 {
            outward.push(Direction::Right);
        }
        if cell.x == 0 {
            outward.push(Direction::Left);
        }
        if cell.y == self.height - 1 {
            outward.push(Direction::Up);
        }
        if cell.y == 0 {
            outward.push(Direction::Down);
        }
        outward
    }
}

impl fmt::Display for WorldModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in (0..self.height).rev() {
            let row: String = (0..self.width)
                .map(|x| self.grid[self.index(&Coord::new(x, y))].symbol())
                .collect();
            writeln!(f, "{}", row)?;
        }
        Ok(())
    }
}
