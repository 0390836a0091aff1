mod audio;
mod game;
mod round;
mod snake;
mod term;

pub type GridInt = i32;
pub type Cell = (GridInt, GridInt);

pub type TermInt = u16;
pub type TermCoords = (TermInt, TermInt);

fn main() {
    let mut game = game::SnakeGame::new();
    game.initialize();

    // The modal loop takes care of exiting cleanly on Q or CTRL+C
    game.run();
}
