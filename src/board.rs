//! # Board Codec
//!
//! Square boolean grids and the conversions the rest of the crate needs:
//!
//! - Padding a board with a one-cell dead border (and removing it again)
//! - Row-major flattening into the numeric vectors fed to the network
//! - Moving boards in and out of Burn tensors
//!
//! A [`Board`] of side `N` is stored row-major as `N * N` booleans. A
//! [`PaddedBoard`] wraps a board of side `N + 2` whose border cells are dead.

use burn::{
    prelude::Backend,
    tensor::{Bool, Float, Tensor},
};

use crate::error::{GolError, GolResult, ensure_positive};

/// Values at or above this threshold are read back as live cells.
pub const ALIVE_THRESHOLD: f32 = 0.5;

/// A square grid of live/dead cells.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    side: usize,
    cells: Vec<bool>,
}

impl Board {
    /// Builds a board from row-major cells.
    ///
    /// # Errors
    ///
    /// - [`GolError::InvalidSize`] if `side` is 0
    /// - [`GolError::Shape`] if `cells.len() != side * side`
    pub fn new(side: usize, cells: Vec<bool>) -> GolResult<Self> {
        ensure_positive("board side", side)?;
        if cells.len() != side * side {
            return Err(GolError::Shape {
                expected: side * side,
                actual: cells.len(),
            });
        }
        Ok(Self { side, cells })
    }

    /// A board with every cell dead.
    pub fn dead(side: usize) -> GolResult<Self> {
        Self::new(side, vec![false; side * side])
    }

    /// Builds a board from rows of 0/1 values. Any non-zero value is alive.
    ///
    /// ```
    /// use gol_learn::board::Board;
    ///
    /// let blinker = Board::from_rows(&[[0, 0, 0], [1, 1, 1], [0, 0, 0]]).unwrap();
    /// assert_eq!(blinker.population(), 3);
    /// ```
    pub fn from_rows<const N: usize>(rows: &[[u8; N]]) -> GolResult<Self> {
        if rows.len() != N {
            return Err(GolError::Shape {
                expected: N * N,
                actual: rows.len() * N,
            });
        }
        let cells = rows.iter().flatten().map(|&v| v != 0).collect();
        Self::new(N, cells)
    }

    pub fn side(&self) -> usize {
        self.side
    }

    pub fn cells(&self) -> &[bool] {
        &self.cells
    }

    pub fn get(&self, row: usize, col: usize) -> bool {
        self.cells[row * self.side + col]
    }

    /// Number of live cells.
    pub fn population(&self) -> usize {
        self.cells.iter().filter(|&&alive| alive).count()
    }

    /// Surrounds the board with a one-cell dead border.
    pub fn pad(&self) -> PaddedBoard {
        let outer = self.side + 2;
        let mut cells = vec![false; outer * outer];
        for row in 0..self.side {
            let src = &self.cells[row * self.side..(row + 1) * self.side];
            let start = (row + 1) * outer + 1;
            cells[start..start + self.side].copy_from_slice(src);
        }
        PaddedBoard {
            grid: Board { side: outer, cells },
        }
    }

    /// Drops the outermost ring of cells, keeping the `side - 2` interior.
    ///
    /// # Errors
    ///
    /// Returns [`GolError::InvalidSize`] if the board has no interior (side < 3).
    pub fn interior(&self) -> GolResult<Board> {
        if self.side < 3 {
            return Err(GolError::InvalidSize {
                what: "padded board side",
                value: self.side.saturating_sub(2),
            });
        }
        Ok(self.crop())
    }

    fn crop(&self) -> Board {
        let inner = self.side - 2;
        let cells = (1..=inner)
            .flat_map(|row| {
                let start = row * self.side + 1;
                self.cells[start..start + inner].iter().copied()
            })
            .collect();
        Board { side: inner, cells }
    }

    /// Row-major linearization: 1.0 for live cells, 0.0 for dead ones.
    pub fn flatten(&self) -> Vec<f32> {
        self.cells
            .iter()
            .map(|&alive| if alive { 1.0 } else { 0.0 })
            .collect()
    }

    /// Inverse of [`Board::flatten`].
    ///
    /// Values produced by the predictor network are real numbers, so each value
    /// is read as alive when it reaches [`ALIVE_THRESHOLD`]. Exact 0/1 vectors
    /// round-trip unchanged.
    ///
    /// # Errors
    ///
    /// - [`GolError::InvalidSize`] if `side` is 0
    /// - [`GolError::Shape`] if `values.len() != side * side`
    pub fn unflatten(values: &[f32], side: usize) -> GolResult<Board> {
        ensure_positive("board side", side)?;
        if values.len() != side * side {
            return Err(GolError::Shape {
                expected: side * side,
                actual: values.len(),
            });
        }
        let cells = values.iter().map(|&v| v >= ALIVE_THRESHOLD).collect();
        Ok(Board { side, cells })
    }

    /// Converts the board to a `[side, side]` float tensor of 0.0/1.0 values.
    pub fn to_tensor<B: Backend>(&self, device: &B::Device) -> Tensor<B, 2, Float> {
        Tensor::<B, 1>::from_floats(self.flatten().as_slice(), device)
            .reshape([self.side, self.side])
    }

    /// Reads a square boolean tensor back into a board.
    ///
    /// # Errors
    ///
    /// - [`GolError::Shape`] if the tensor is not square
    /// - [`GolError::Tensor`] if the tensor data cannot be read as booleans
    pub fn from_bool_tensor<B: Backend>(grid: Tensor<B, 2, Bool>) -> GolResult<Board> {
        let [height, width] = grid.dims();
        if height != width {
            return Err(GolError::Shape {
                expected: height * height,
                actual: height * width,
            });
        }
        let cells: Vec<bool> = grid
            .into_data()
            .to_vec()
            .map_err(|err| GolError::Tensor(format!("{err:?}")))?;
        Board::new(height, cells)
    }
}

/// A board of side `N + 2` whose one-cell border is dead.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaddedBoard {
    grid: Board,
}

impl PaddedBoard {
    /// Side of the embedded interior board.
    pub fn interior_side(&self) -> usize {
        self.grid.side - 2
    }

    /// The full padded grid, border included.
    pub fn grid(&self) -> &Board {
        &self.grid
    }

    /// Removes the border again.
    pub fn unpad(&self) -> Board {
        self.grid.crop()
    }

    /// Flattens the full padded grid; length is `(N + 2)^2`.
    pub fn flatten(&self) -> Vec<f32> {
        self.grid.flatten()
    }

    pub fn to_tensor<B: Backend>(&self, device: &B::Device) -> Tensor<B, 2, Float> {
        self.grid.to_tensor(device)
    }

    /// True when every border cell is dead.
    pub fn border_is_dead(&self) -> bool {
        let side = self.grid.side;
        (0..side).all(|i| {
            !self.grid.get(0, i)
                && !self.grid.get(side - 1, i)
                && !self.grid.get(i, 0)
                && !self.grid.get(i, side - 1)
        })
    }
}
