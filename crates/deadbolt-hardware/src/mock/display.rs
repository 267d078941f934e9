//! Mock character display.
//!
//! An in-memory 2×16 character grid with a cursor, mirroring the panel's
//! LCD. The node writes through the [`Display`] trait; tests read the grid
//! back through a [`MockDisplayHandle`].

use crate::traits::Display;
use std::sync::{Arc, Mutex, PoisonError};

/// Default display geometry: 2 rows of 16 columns.
const ROWS: usize = 2;
const COLS: usize = 16;

#[derive(Debug)]
struct Grid {
    cells: [[char; COLS]; ROWS],
    cursor_row: usize,
    cursor_col: usize,
}

impl Grid {
    fn new() -> Self {
        Grid {
            cells: [[' '; COLS]; ROWS],
            cursor_row: 0,
            cursor_col: 0,
        }
    }

    fn put(&mut self, ch: char) {
        if self.cursor_col < COLS && self.cursor_row < ROWS {
            self.cells[self.cursor_row][self.cursor_col] = ch;
            self.cursor_col += 1;
        }
        // Writes past the end of a row are dropped, like the real part.
    }
}

/// Mock display device.
#[derive(Debug)]
pub struct MockDisplay {
    grid: Arc<Mutex<Grid>>,
}

impl MockDisplay {
    /// Create a new mock display and its observation handle.
    pub fn new() -> (Self, MockDisplayHandle) {
        let grid = Arc::new(Mutex::new(Grid::new()));
        (
            MockDisplay {
                grid: Arc::clone(&grid),
            },
            MockDisplayHandle { grid },
        )
    }
}

impl Display for MockDisplay {
    fn clear(&self) {
        let mut grid = self.grid.lock().unwrap_or_else(PoisonError::into_inner);
        *grid = Grid::new();
    }

    fn move_cursor(&self, row: u8, col: u8) {
        let mut grid = self.grid.lock().unwrap_or_else(PoisonError::into_inner);
        grid.cursor_row = row as usize;
        grid.cursor_col = col as usize;
    }

    fn print_str(&self, text: &str) {
        let mut grid = self.grid.lock().unwrap_or_else(PoisonError::into_inner);
        for ch in text.chars() {
            grid.put(ch);
        }
    }

    fn print_char(&self, ch: char) {
        let mut grid = self.grid.lock().unwrap_or_else(PoisonError::into_inner);
        grid.put(ch);
    }
}

/// Handle for reading back what a [`MockDisplay`] shows.
///
/// Cloneable; can be shared across tasks.
#[derive(Debug, Clone)]
pub struct MockDisplayHandle {
    grid: Arc<Mutex<Grid>>,
}

impl MockDisplayHandle {
    /// Contents of one row, right-trimmed.
    #[must_use]
    pub fn line(&self, row: usize) -> String {
        let grid = self.grid.lock().unwrap_or_else(PoisonError::into_inner);
        if row >= ROWS {
            return String::new();
        }
        grid.cells[row]
            .iter()
            .collect::<String>()
            .trim_end()
            .to_string()
    }

    /// All rows, right-trimmed.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        (0..ROWS).map(|row| self.line(row)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_and_read_back() {
        let (display, handle) = MockDisplay::new();

        display.print_str("Enter N_Password");
        assert_eq!(handle.line(0), "Enter N_Password");
        assert_eq!(handle.line(1), "");
    }

    #[test]
    fn test_move_cursor_and_echo() {
        let (display, handle) = MockDisplay::new();

        display.print_str("Enter Password:");
        display.move_cursor(1, 0);
        display.print_char('*');
        display.print_char('*');

        assert_eq!(handle.line(0), "Enter Password:");
        assert_eq!(handle.line(1), "**");
    }

    #[test]
    fn test_clear_homes_cursor() {
        let (display, handle) = MockDisplay::new();

        display.move_cursor(1, 0);
        display.print_str("Error");
        display.clear();
        display.print_str("Ready");

        assert_eq!(handle.line(0), "Ready");
        assert_eq!(handle.line(1), "");
    }

    #[test]
    fn test_overflowing_row_is_clipped() {
        let (display, handle) = MockDisplay::new();

        display.print_str("0123456789ABCDEFXYZ");
        assert_eq!(handle.line(0), "0123456789ABCDEF");
    }

    #[test]
    fn test_out_of_bounds_line_reads_empty() {
        let (_display, handle) = MockDisplay::new();
        assert_eq!(handle.line(5), "");
    }
}
