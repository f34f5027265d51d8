use std::io::Write;

use crate::{
    board::Board,
    error::GolResult,
    session::{BoardRenderer, CostLogger},
};

const SQUARE_SYMBOL: char = '■';

pub fn convert_to_string(board: &Board) -> String {
    let side = board.side();
    let mut result = String::with_capacity(side * (side + 1));

    for row in 0..side {
        for col in 0..side {
            if board.get(row, col) {
                result.push(SQUARE_SYMBOL);
            } else {
                result.push(' ');
            }
        }
        if row < side - 1 {
            result.push('\n');
        }
    }

    result
}

/// Writes labelled boards as text, one block per board.
pub struct TerminalRenderer<W: Write> {
    out: W,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> BoardRenderer for TerminalRenderer<W> {
    fn render(&mut self, board: &Board, label: &str) -> GolResult<()> {
        writeln!(self.out, "{label}:")?;
        writeln!(self.out, "{}", convert_to_string(board))?;
        writeln!(self.out)?;
        Ok(())
    }
}

/// Prints one `step: * Cost: value` line per sampled cost.
pub struct ConsoleCostLogger<W: Write> {
    out: W,
}

impl<W: Write> ConsoleCostLogger<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> CostLogger for ConsoleCostLogger<W> {
    fn log(&mut self, step: usize, cost: f64) -> GolResult<()> {
        writeln!(self.out, "{step}: * Cost: {cost}")?;
        Ok(())
    }
}
