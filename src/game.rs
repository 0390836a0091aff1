use std::{mem, process::exit, thread::sleep, time::Duration};

use crate::audio::Audio;
use crate::round::{Cue, Outcome, RoundState};
use crate::snake::{Direction::*, BLOCK};
use crate::term::TermManager;
use crate::{Cell, TermCoords, TermInt};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::style::Color;
use rand::rngs::StdRng;
use rand::SeedableRng;

const TICK_MS: u64 = 1000 / 15;
const NAME_MAX: usize = 12;

const PLACEHOLDER_NAMES: [&str; 2] = ["Adam", "Eve"];
const SNAKE_COLORS: [Color; 2] = [Color::Yellow, Color::Cyan];
const FOOD_COLOR: Color = Color::Magenta;

/// The three modal states the event loop cycles through. Round state travels
/// with the mode, so there is never a round outside of play.
enum Mode {
    Menu { active: usize },
    Playing(RoundState),
    RoundOver(RoundState),
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Menu { active: 0 }
    }
}

pub struct SnakeGame {
    term: TermManager,
    audio: Audio,
    rng: StdRng,
    names: [String; 2],
    mode: Mode,
}

impl SnakeGame {
    pub fn new() -> Self {
        SnakeGame {
            term: TermManager::new(),
            audio: Audio::new(),
            rng: StdRng::from_entropy(),
            names: [String::new(), String::new()],
            mode: Mode::default(),
        }
    }

    pub fn initialize(&mut self) {
        self.term.setup();
        self.audio.play(Cue::Hiss);
        self.draw_menu(0);
    }

    pub fn run(&mut self) {
        loop {
            sleep(Duration::from_millis(TICK_MS));

            let events = self.term.read_key_events_queue();
            for ev in events.iter() {
                if is_ctrl_c(ev) {
                    self.clean_exit();
                }
            }

            let mode = mem::take(&mut self.mode);
            self.mode = match mode {
                Mode::Menu { active } => self.menu_frame(events, active),
                Mode::Playing(round) => self.playing_frame(events, round),
                Mode::RoundOver(round) => self.round_over_frame(events, round),
            };
        }
    }

    ///////////////////////////////////////////////////////////////////////////

    fn menu_frame(&mut self, events: Vec<KeyEvent>, mut active: usize) -> Mode {
        for KeyEvent { code, modifiers: _ } in events {
            match code {
                KeyCode::Enter => return self.start_round(),
                KeyCode::Tab => active = 1 - active,
                KeyCode::Backspace => {
                    self.names[active].pop();
                }
                KeyCode::Char(c) => {
                    if self.names[active].len() < NAME_MAX {
                        self.names[active].push(c);
                    }
                }
                _ => {}
            }
        }

        self.draw_menu(active);
        Mode::Menu { active }
    }

    fn playing_frame(&mut self, events: Vec<KeyEvent>, mut round: RoundState) -> Mode {
        for KeyEvent { code, modifiers: _ } in events {
            match code {
                // Player 1, WASD
                KeyCode::Char('w') => round.set_direction(0, Up),
                KeyCode::Char('a') => round.set_direction(0, Left),
                KeyCode::Char('s') => round.set_direction(0, Down),
                KeyCode::Char('d') => round.set_direction(0, Right),
                // Player 2, arrows
                KeyCode::Up => round.set_direction(1, Up),
                KeyCode::Left => round.set_direction(1, Left),
                KeyCode::Down => round.set_direction(1, Down),
                KeyCode::Right => round.set_direction(1, Right),
                _ => {}
            }
        }

        for cue in round.tick(&mut self.rng) {
            self.audio.play(cue);
        }
        self.draw_round(&round);

        if round.is_over() {
            self.audio.stop_music();
            self.draw_end_screen(&round);
            Mode::RoundOver(round)
        } else {
            Mode::Playing(round)
        }
    }

    fn round_over_frame(&mut self, events: Vec<KeyEvent>, round: RoundState) -> Mode {
        for KeyEvent { code, modifiers: _ } in events {
            match code {
                KeyCode::Char('r') | KeyCode::Char('R') => return self.start_round(),
                KeyCode::Char('q') | KeyCode::Char('Q') => self.clean_exit(),
                _ => {}
            }
        }

        Mode::RoundOver(round)
    }

    fn start_round(&mut self) -> Mode {
        let names = [
            resolved_name(&self.names[0], PLACEHOLDER_NAMES[0]),
            resolved_name(&self.names[1], PLACEHOLDER_NAMES[1]),
        ];
        let round = RoundState::new(names, &mut self.rng);

        self.term.clear();
        self.term.draw_borders();
        self.audio.start_music();
        Mode::Playing(round)
    }

    fn draw_menu(&mut self, active: usize) {
        let mut lines: Vec<(String, Color)> = vec![
            ("S N A K E  D U E L".to_string(), FOOD_COLOR),
            (String::new(), Color::Reset),
        ];

        for i in 0..2 {
            let marker = if i == active { '>' } else { ' ' };
            let shown = if self.names[i].is_empty() { PLACEHOLDER_NAMES[i] } else { &self.names[i] };
            lines.push((
                format!("{} Player {}: {:<width$}", marker, i + 1, shown, width = NAME_MAX),
                SNAKE_COLORS[i],
            ));
        }

        lines.push((String::new(), Color::Reset));
        lines.push(("Tab to switch, Enter to start".to_string(), Color::Grey));

        self.term.show_message(&lines);
    }

    fn draw_round(&mut self, round: &RoundState) {
        let mut cells = vec![(to_board(round.food()), FOOD_COLOR)];
        for (i, snake) in round.snakes().iter().enumerate() {
            for &pos in snake.positions() {
                cells.push((to_board(pos), SNAKE_COLORS[i]));
            }
        }

        self.term.draw_frame(&cells);
    }

    fn draw_end_screen(&mut self, round: &RoundState) {
        let headline = match round.outcome() {
            Some(Outcome::Win(i)) => (format!("{} wins!", round.snake(i).name()), SNAKE_COLORS[i]),
            Some(Outcome::Draw) => ("You are here forever".to_string(), FOOD_COLOR),
            None => return,
        };

        let lines = vec![
            headline,
            (String::new(), Color::Reset),
            ("Press R to restart or Q to quit".to_string(), FOOD_COLOR),
        ];

        self.term.show_message(&lines);
    }

    fn clean_exit(&mut self) -> ! {
        self.audio.stop_music();
        self.term.restore();
        exit(0);
    }
}

fn resolved_name<'a>(entered: &'a str, placeholder: &'a str) -> &'a str {
    if entered.is_empty() {
        placeholder
    } else {
        entered
    }
}

fn to_board((x, y): Cell) -> TermCoords {
    ((x / BLOCK) as TermInt, (y / BLOCK) as TermInt)
}

fn is_ctrl_c(ev: &KeyEvent) -> bool {
    matches!(ev, KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::CONTROL })
}
