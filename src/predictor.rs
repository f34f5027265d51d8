//! Applies a trained [`PredictorNetwork`] to single boards.

use burn::{prelude::Backend, tensor::Tensor};

use crate::{
    board::Board,
    error::{GolError, GolResult},
    network::PredictorNetwork,
};

/// Read-only view of a network used to predict next generations.
pub struct Predictor<'a, B: Backend> {
    network: &'a PredictorNetwork<B>,
    device: B::Device,
}

impl<'a, B: Backend> Predictor<'a, B> {
    pub fn new(network: &'a PredictorNetwork<B>, device: &B::Device) -> Self {
        Self {
            network,
            device: device.clone(),
        }
    }

    /// Predicted next generation of `board`, thresholded back to live/dead cells.
    pub fn predict(&self, board: &Board) -> GolResult<Board> {
        let values = self.forward_padded(board)?;
        Board::unflatten(&values, board.side() + 2)?.interior()
    }

    /// Raw network output for the `N x N` interior, row-major.
    pub fn predict_raw(&self, board: &Board) -> GolResult<Vec<f32>> {
        let values = self.forward_padded(board)?;
        let outer = board.side() + 2;
        Ok((1..=board.side())
            .flat_map(|row| values[row * outer + 1..row * outer + 1 + board.side()].to_vec())
            .collect())
    }

    fn forward_padded(&self, board: &Board) -> GolResult<Vec<f32>> {
        if board.side() != self.network.side() {
            return Err(GolError::Shape {
                expected: self.network.side() * self.network.side(),
                actual: board.side() * board.side(),
            });
        }

        let width = self.network.width();
        let input = Tensor::<B, 1>::from_floats(board.pad().flatten().as_slice(), &self.device)
            .reshape([1, width]);
        self.network
            .forward(input)
            .into_data()
            .convert::<f32>()
            .to_vec()
            .map_err(|err| GolError::Tensor(format!("{err:?}")))
    }
}
