//! # Game of Life Rule Engine
//!
//! Computes the canonical next generation of a board. The work is split in two
//! tensor passes:
//!
//! 1. **Neighbor counting**: a 3x3 ring kernel convolved over the padded board
//!    with no extra padding, so every output cell sums the 8 unit-offset windows
//!    around the matching interior cell.
//! 2. **Transition**: a three-way rule applied with boolean tensor ops:
//!    - count == 3 → alive (birth, or survival with 3 neighbors)
//!    - count == 2 → unchanged (a live cell survives, a dead one stays dead)
//!    - otherwise  → dead
//!
//! Labels for training examples come from here, so this module is the ground
//! truth the predictor network is trained against.

use burn::{
    module::{Module, Param},
    nn::{
        PaddingConfig2d,
        conv::{Conv2d, Conv2dConfig},
    },
    prelude::Backend,
    tensor::{Bool, Float, Tensor},
};

use crate::{
    board::{Board, PaddedBoard},
    error::{GolError, GolResult},
};

/// Ring kernel counting the 8 neighbors of a cell.
///
/// ```text
/// [1.0, 1.0, 1.0]
/// [1.0, 0.0, 1.0]
/// [1.0, 1.0, 1.0]
/// ```
const RING_3X3: [[f64; 3]; 3] = [[1.0, 1.0, 1.0], [1.0, 0.0, 1.0], [1.0, 1.0, 1.0]];

/// Live-neighbor counts (0..=8) for every interior cell of a padded board.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NeighborCountGrid {
    side: usize,
    counts: Vec<u8>,
}

impl NeighborCountGrid {
    pub fn side(&self) -> usize {
        self.side
    }

    pub fn counts(&self) -> &[u8] {
        &self.counts
    }

    pub fn get(&self, row: usize, col: usize) -> u8 {
        self.counts[row * self.side + col]
    }

    fn to_tensor<B: Backend>(&self, device: &B::Device) -> Tensor<B, 2, Float> {
        let values: Vec<f32> = self.counts.iter().map(|&c| f32::from(c)).collect();
        Tensor::<B, 1>::from_floats(values.as_slice(), device).reshape([self.side, self.side])
    }
}

/// Neighbor counter and transition rule for Conway's Game of Life.
#[derive(Module, Debug)]
pub struct RuleEngine<B: Backend> {
    /// Single-channel 3x3 convolution without bias or padding; the input is
    /// expected to already carry its dead border.
    conv: Conv2d<B>,
}

impl<B: Backend> RuleEngine<B> {
    /// Creates a rule engine on `device` with the ring kernel loaded.
    pub fn new(device: &B::Device) -> Self {
        let kernel: Tensor<B, 2, Float> = Tensor::from_floats(RING_3X3, device);
        let mut conv = Conv2dConfig::new([1, 1], [3, 3])
            .with_bias(false)
            .with_padding(PaddingConfig2d::Valid)
            .init(device);
        conv.weight = Param::from_tensor(kernel.reshape([1, 1, 3, 3]));
        Self { conv }
    }

    /// Sums the 8 neighbors of every interior cell.
    ///
    /// `padded` has shape `[N + 2, N + 2]`; the result has shape `[N, N]`.
    ///
    /// # Errors
    ///
    /// - [`GolError::Shape`] if `padded` is not square
    /// - [`GolError::InvalidSize`] if it has no interior (side < 3)
    pub fn count_neighbors(
        &self,
        padded: Tensor<B, 2, Float>,
    ) -> GolResult<Tensor<B, 2, Float>> {
        let [outer, width] = padded.dims();
        if outer != width {
            return Err(GolError::Shape {
                expected: outer * outer,
                actual: outer * width,
            });
        }
        if outer < 3 {
            return Err(GolError::InvalidSize {
                what: "padded board side",
                value: outer.saturating_sub(2),
            });
        }

        let inner = outer - 2;
        Ok(self
            .conv
            .forward(padded.reshape([1, 1, outer, outer]))
            .reshape([inner, inner]))
    }

    /// Applies the transition rule cell by cell.
    ///
    /// `board` holds 0.0/1.0 values and `counts` the matching neighbor counts;
    /// both have shape `[N, N]`.
    pub fn next_state(
        board: Tensor<B, 2, Float>,
        counts: Tensor<B, 2, Float>,
    ) -> Tensor<B, 2, Bool> {
        let rebirth = counts.clone().equal_elem(3.0);

        // Two neighbors keep the current state.
        let survive = counts.equal_elem(2.0).bool_and(board.equal_elem(1.0));

        rebirth.bool_or(survive)
    }

    /// Neighbor counts of a padded board as a host-side grid.
    pub fn count_board_neighbors(&self, padded: &PaddedBoard) -> GolResult<NeighborCountGrid> {
        let device = self.conv.weight.device();
        let counts = self.count_neighbors(padded.to_tensor(&device))?;
        let values: Vec<f32> = counts
            .into_data()
            .convert::<f32>()
            .to_vec()
            .map_err(|err| GolError::Tensor(format!("{err:?}")))?;

        Ok(NeighborCountGrid {
            side: padded.interior_side(),
            counts: values.into_iter().map(|v| v.round() as u8).collect(),
        })
    }

    /// Next generation of `board` given its neighbor counts.
    ///
    /// # Errors
    ///
    /// Returns [`GolError::Shape`] if `counts` was computed for a board of a
    /// different side.
    pub fn next_board(&self, board: &Board, counts: &NeighborCountGrid) -> GolResult<Board> {
        if board.side() != counts.side {
            return Err(GolError::Shape {
                expected: board.side() * board.side(),
                actual: counts.counts.len(),
            });
        }
        let device = self.conv.weight.device();
        let next = Self::next_state(board.to_tensor(&device), counts.to_tensor(&device));
        Board::from_bool_tensor(next)
    }

    /// Pads, counts and transitions `board` in one go.
    pub fn step(&self, board: &Board) -> GolResult<Board> {
        let counts = self.count_board_neighbors(&board.pad())?;
        self.next_board(board, &counts)
    }
}

impl<B: Backend> Default for RuleEngine<B> {
    /// Rule engine on the backend's default device.
    fn default() -> Self {
        Self::new(&B::Device::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    fn engine() -> RuleEngine<TestBackend> {
        RuleEngine::default()
    }

    #[test]
    fn blinker_flips_to_vertical() {
        let rules = engine();
        let horizontal = Board::from_rows(&[[0, 0, 0], [1, 1, 1], [0, 0, 0]]).unwrap();
        let vertical = Board::from_rows(&[[0, 1, 0], [0, 1, 0], [0, 1, 0]]).unwrap();

        let counts = rules.count_board_neighbors(&horizontal.pad()).unwrap();
        assert_eq!(counts.counts(), &[2, 3, 2, 1, 2, 1, 2, 3, 2]);

        assert_eq!(rules.next_board(&horizontal, &counts).unwrap(), vertical);
        assert_eq!(rules.step(&vertical).unwrap(), horizontal);
    }

    #[test]
    fn block_is_still_life() {
        let rules = engine();
        let block = Board::from_rows(&[[0, 0, 0, 0], [0, 1, 1, 0], [0, 1, 1, 0], [0, 0, 0, 0]])
            .unwrap();
        assert_eq!(rules.step(&block).unwrap(), block);
    }

    #[test]
    fn border_cells_have_no_phantom_neighbors() {
        let rules = engine();
        let full = Board::new(3, vec![true; 9]).unwrap();
        let counts = rules.count_board_neighbors(&full.pad()).unwrap();
        assert_eq!(counts.counts(), &[3, 5, 3, 5, 8, 5, 3, 5, 3]);

        // Corners survive with 3, everything else dies.
        let next = rules.next_board(&full, &counts).unwrap();
        assert_eq!(
            next,
            Board::from_rows(&[[1, 0, 1], [0, 0, 0], [1, 0, 1]]).unwrap()
        );
    }

    #[test]
    fn two_neighbors_keep_current_state() {
        let rules = engine();
        let board = Board::from_rows(&[[1, 0], [0, 1]]).unwrap();
        let counts = rules.count_board_neighbors(&board.pad()).unwrap();
        assert_eq!(counts.counts(), &[1, 2, 2, 1]);

        let next = rules.next_board(&board, &counts).unwrap();
        assert_eq!(next, Board::dead(2).unwrap());
    }

    #[test]
    fn next_board_is_deterministic() {
        let rules = engine();
        let board = Board::from_rows(&[[1, 1, 0], [0, 1, 1], [1, 0, 0]]).unwrap();
        let counts = rules.count_board_neighbors(&board.pad()).unwrap();
        assert_eq!(
            rules.next_board(&board, &counts).unwrap(),
            rules.next_board(&board, &counts).unwrap()
        );
    }

    #[test]
    fn count_neighbors_rejects_unusable_tensors() {
        let rules = engine();
        let device = Default::default();

        let too_small = Tensor::<TestBackend, 2>::zeros([2, 2], &device);
        assert!(matches!(
            rules.count_neighbors(too_small),
            Err(GolError::InvalidSize { value: 0, .. })
        ));

        let not_square = Tensor::<TestBackend, 2>::zeros([4, 5], &device);
        assert!(matches!(
            rules.count_neighbors(not_square),
            Err(GolError::Shape {
                expected: 16,
                actual: 20
            })
        ));

        let padded = Tensor::<TestBackend, 2>::ones([3, 3], &device);
        let counts = rules.count_neighbors(padded).unwrap();
        assert_eq!(counts.dims(), [1, 1]);
    }

    #[test]
    fn next_board_rejects_mismatched_counts() {
        let rules = engine();
        let small = Board::dead(2).unwrap();
        let counts = rules.count_board_neighbors(&Board::dead(3).unwrap().pad()).unwrap();
        assert!(matches!(
            rules.next_board(&small, &counts),
            Err(GolError::Shape { .. })
        ));
    }
}
