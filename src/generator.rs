//! # Training Example Generation
//!
//! Random boards labelled with their next generation. Both halves of an
//! [`Example`] are kept in padded form so that every example has the same
//! `(N + 2)^2` width as the predictor network's input and output.

use burn::{
    prelude::Backend,
    tensor::{Float, Tensor},
};
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    board::{Board, PaddedBoard},
    error::{GolResult, ensure_positive},
    rules::RuleEngine,
};

/// A random board and the board that follows it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Example {
    pub input: PaddedBoard,
    pub next: PaddedBoard,
}

/// A fixed-size group of examples consumed by one training step.
#[derive(Clone, Debug)]
pub struct Batch {
    examples: Vec<Example>,
}

impl Batch {
    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    pub fn examples(&self) -> &[Example] {
        &self.examples
    }

    /// Stacks the batch into `[batch, width]` input and target tensors.
    pub fn to_tensors<B: Backend>(
        &self,
        device: &B::Device,
    ) -> (Tensor<B, 2, Float>, Tensor<B, 2, Float>) {
        let width = self
            .examples
            .first()
            .map(|example| example.input.flatten().len())
            .unwrap_or(0);

        let mut inputs = Vec::with_capacity(self.len() * width);
        let mut targets = Vec::with_capacity(self.len() * width);
        for example in &self.examples {
            inputs.extend(example.input.flatten());
            targets.extend(example.next.flatten());
        }

        let inputs = Tensor::<B, 1>::from_floats(inputs.as_slice(), device)
            .reshape([self.len(), width]);
        let targets = Tensor::<B, 1>::from_floats(targets.as_slice(), device)
            .reshape([self.len(), width]);
        (inputs, targets)
    }
}

/// Produces random boards and labels them with [`RuleEngine`].
pub struct ExampleGenerator<B: Backend> {
    rules: RuleEngine<B>,
    rng: StdRng,
}

impl<B: Backend> ExampleGenerator<B> {
    /// Creates a generator. Without a seed the RNG is seeded randomly.
    pub fn new(device: &B::Device, seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(rand::random);
        tracing::debug!(seed, "example generator seeded");
        Self {
            rules: RuleEngine::new(device),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn rules(&self) -> &RuleEngine<B> {
        &self.rules
    }

    /// A board whose cells are independently alive with probability 1/2.
    pub fn random_board(&mut self, side: usize) -> GolResult<Board> {
        ensure_positive("board side", side)?;
        let cells = (0..side * side).map(|_| self.rng.random_bool(0.5)).collect();
        Board::new(side, cells)
    }

    /// One random board paired with its successor, both padded.
    pub fn generate_example(&mut self, side: usize) -> GolResult<Example> {
        let board = self.random_board(side)?;
        let input = board.pad();
        let counts = self.rules.count_board_neighbors(&input)?;
        let next = self.rules.next_board(&board, &counts)?;

        Ok(Example {
            input,
            next: next.pad(),
        })
    }

    /// `batch_size` independent examples.
    pub fn generate_batch(&mut self, side: usize, batch_size: usize) -> GolResult<Batch> {
        ensure_positive("board side", side)?;
        ensure_positive("batch size", batch_size)?;

        let examples = (0..batch_size)
            .map(|_| self.generate_example(side))
            .collect::<GolResult<Vec<_>>>()?;
        tracing::trace!(side, batch_size, "generated batch");
        Ok(Batch { examples })
    }
}
