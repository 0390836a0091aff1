use crate::{Cell, GridInt};
use serde::{Deserialize, Serialize};
use Direction::*;

pub const BLOCK: GridInt = 10;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn opposite(self) -> Direction {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }

    /// One block of movement along this direction.
    pub fn delta(self) -> (GridInt, GridInt) {
        match self {
            Up => (0, -BLOCK),
            Down => (0, BLOCK),
            Left => (-BLOCK, 0),
            Right => (BLOCK, 0),
        }
    }
}

/// One player's trail. Positions run tail to head; the last cell is the head.
/// The snake never checks bounds itself, that is the round controller's job.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snake {
    name: String,
    positions: Vec<Cell>,
    length: usize,
    direction: Option<Direction>,
}

impl Snake {
    pub fn new(name: &str, start: Cell) -> Self {
        Snake {
            name: name.to_string(),
            positions: vec![start],
            length: 1,
            direction: None,
        }
    }

    #[cfg(test)]
    pub fn from_parts(name: &str, positions: Vec<Cell>, length: usize, direction: Option<Direction>) -> Self {
        Snake { name: name.to_string(), positions, length, direction }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn positions(&self) -> &[Cell] {
        &self.positions
    }

    pub fn head(&self) -> Cell {
        *self.positions.last().unwrap()
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn direction(&self) -> Option<Direction> {
        self.direction
    }

    /// Commits a new direction, except when it would be an instant U-turn.
    /// A snake that has not started moving yet accepts any direction.
    pub fn set_direction(&mut self, requested: Direction) {
        match self.direction {
            Some(current) if requested == current.opposite() => {}
            _ => self.direction = Some(requested),
        }
    }

    /// Where the head would land next tick. The head itself while no
    /// direction is committed. May lie outside the grid.
    pub fn next_head(&self) -> Cell {
        let (x, y) = self.head();
        match self.direction {
            Some(dir) => {
                let (dx, dy) = dir.delta();
                (x + dx, y + dy)
            }
            None => (x, y),
        }
    }

    pub fn advance(&mut self) {
        if self.direction.is_none() {
            return;
        }

        let new_head = self.next_head();
        self.positions.push(new_head);
        if self.positions.len() > self.length {
            self.positions.remove(0);
        }
    }

    /// Takes effect on the next advance: the tail is retained instead of dropped.
    pub fn grow(&mut self) {
        self.length += 1;
    }

    pub fn collides_with_self(&self) -> bool {
        let head = self.head();
        self.positions[..self.positions.len() - 1].contains(&head)
    }
}

#[test]
fn rejects_reversal_once_committed() {
    let mut snake = Snake::new("Adam", (100, 100));
    snake.set_direction(Left);
    assert_eq!(snake.direction(), Some(Left));

    snake.set_direction(Right); // exact reverse, ignored
    assert_eq!(snake.direction(), Some(Left));

    snake.set_direction(Up);
    assert_eq!(snake.direction(), Some(Up));
    snake.set_direction(Down);
    assert_eq!(snake.direction(), Some(Up));
}

#[test]
fn holds_position_until_first_direction() {
    let mut snake = Snake::new("Eve", (100, 100));
    snake.advance();
    assert_eq!(snake.positions(), &[(100, 100)]);
    assert_eq!(snake.next_head(), (100, 100));
}

#[test]
fn drops_tail_once_over_length() {
    let mut snake = Snake::new("Adam", (100, 100));
    snake.set_direction(Right);
    snake.advance();
    assert_eq!(snake.positions(), &[(110, 100)]);

    snake.grow();
    snake.advance();
    snake.advance();
    assert_eq!(snake.positions(), &[(120, 100), (130, 100)]);
    assert_eq!(snake.head(), (130, 100));
}

#[test]
fn self_collision_sees_everything_but_the_head() {
    let mut snake = Snake::new("Eve", (100, 100));
    snake.set_direction(Right);
    assert!(!snake.collides_with_self());

    // A 2x2 loop whose head has just rejoined its tail cell
    let looped = Snake::from_parts(
        "Eve",
        vec![(10, 10), (20, 10), (20, 20), (10, 20), (10, 10)],
        5,
        Some(Up),
    );
    assert!(looped.collides_with_self());
}
