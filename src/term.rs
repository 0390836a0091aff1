use crate::round::{GRID_HEIGHT, GRID_WIDTH};
use crate::snake::BLOCK;
use crate::{TermCoords, TermInt};
use std::{io::{stdout, Stdout, Write}, time::Duration};

use crossterm::event::{poll, read, Event, KeyEvent};
use crossterm::style::Color;
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, queue, style, terminal};

pub const BOARD_COLS: TermInt = (GRID_WIDTH / BLOCK) as TermInt;
pub const BOARD_ROWS: TermInt = (GRID_HEIGHT / BLOCK) as TermInt;

const CELL_CHAR: char = '█';

pub struct TermManager {
    stdout: Stdout,
    prev_cells: Vec<(TermCoords, Color)>,
}

impl TermManager {
    pub fn new() -> Self {
        let (width, height) = terminal::size().expect("Error reading size.");
        if width < BOARD_COLS + 2 || height < BOARD_ROWS + 2 {
            panic!(
                "Terminal too small: the board needs {}x{} characters, got {}x{}.",
                BOARD_COLS + 2,
                BOARD_ROWS + 2,
                width,
                height
            );
        }

        TermManager { stdout: stdout(), prev_cells: vec![] }
    }

    pub fn setup(&mut self) {
        execute!(self.stdout, EnterAlternateScreen).expect("Error entering alt screen");
        self.set_raw_mode(true);
        self.set_cursor_visibility(false);
    }

    pub fn restore(&mut self) {
        self.set_raw_mode(false);
        self.set_cursor_visibility(true);
        execute!(self.stdout, LeaveAlternateScreen).expect("Error leaving alt screen");
    }

    pub fn read_key_events_queue(&self) -> Vec<KeyEvent> {
        let mut events = vec![];

        while poll(Duration::from_millis(1)).unwrap() {
            if let Event::Key(ev) = read().unwrap() {
                events.push(ev);
            }
        }

        events
    }

    pub fn draw_borders(&mut self) {
        let end_x = BOARD_COLS + 1;
        let end_y = BOARD_ROWS + 1;

        queue!(self.stdout, style::SetForegroundColor(Color::DarkGrey)).unwrap();

        for x in 0..=end_x {
            let ch = if x == 0 || x == end_x { '+' } else { '-' };
            self.print_at((x, 0), ch);
            self.print_at((x, end_y), ch);
        }

        for y in 1..end_y {
            self.print_at((0, y), '|');
            self.print_at((end_x, y), '|');
        }

        queue!(self.stdout, style::ResetColor).unwrap();
        self.flush();
    }

    /// Draws one frame of board cells and erases whatever the previous frame
    /// left behind. Positions are board coordinates; the border offset is
    /// applied here.
    pub fn draw_frame(&mut self, cells: &[(TermCoords, Color)]) {
        let stale: Vec<TermCoords> = self
            .prev_cells
            .iter()
            .filter(|(pos, _)| !cells.iter().any(|(p, _)| p == pos))
            .map(|&(pos, _)| pos)
            .collect();

        for pos in stale {
            self.print_cell(pos, None);
        }
        for &(pos, color) in cells {
            self.print_cell(pos, Some(color));
        }

        self.prev_cells = cells.to_vec();
        self.flush();
    }

    pub fn show_message(&mut self, lines: &[(String, Color)]) {
        let msg_height = lines.len() as TermInt + 2;
        let msg_width = lines.iter().map(|(s, _)| s.chars().count()).max().unwrap_or(0) as TermInt + 4;
        let center = ((BOARD_COLS + 2) / 2, (BOARD_ROWS + 2) / 2);
        let top_left = (center.0 - msg_width / 2, center.1 - msg_height / 2);

        // Blank top and bottom padding rows
        let blank = " ".repeat(msg_width as usize);
        for y in [top_left.1, top_left.1 + msg_height - 1].iter() {
            queue!(self.stdout, cursor::MoveTo(top_left.0, *y), style::Print(&blank)).unwrap();
        }

        for (i, (line, color)) in lines.iter().enumerate() {
            let padded = format!("{: ^width$}", line, width = msg_width as usize);
            queue!(
                self.stdout,
                cursor::MoveTo(top_left.0, top_left.1 + i as TermInt + 1),
                style::SetForegroundColor(*color),
                style::Print(padded),
                style::ResetColor
            )
            .unwrap();
        }

        self.flush();
    }

    pub fn clear(&mut self) {
        execute!(self.stdout, terminal::Clear(ClearType::All)).expect("Error clearing.");
        self.prev_cells.clear();
    }

    pub fn flush(&mut self) {
        self.stdout.flush().expect("Error flushing.");
    }

    ///////////////////////////////////////////////////////////////////////////

    fn print_cell(&mut self, (x, y): TermCoords, color: Option<Color>) {
        let pos = (x + 1, y + 1); // inside the border
        match color {
            Some(c) => queue!(
                self.stdout,
                cursor::MoveTo(pos.0, pos.1),
                style::SetForegroundColor(c),
                style::Print(CELL_CHAR),
                style::ResetColor
            )
            .unwrap(),
            None => self.print_at(pos, ' '),
        }
    }

    fn print_at(&mut self, pos: TermCoords, ch: char) {
        queue!(self.stdout, cursor::MoveTo(pos.0, pos.1), style::Print(ch)).unwrap();
    }

    fn set_raw_mode(&self, option: bool) {
        let res = if option {
            terminal::enable_raw_mode()
        } else {
            terminal::disable_raw_mode()
        };

        res.expect("Error setting raw mode.");
    }

    fn set_cursor_visibility(&mut self, option: bool) {
        let res = if option {
            execute!(self.stdout, cursor::Show)
        } else {
            execute!(self.stdout, cursor::Hide)
        };

        res.expect("Error setting cursor visibility.");
    }
}
