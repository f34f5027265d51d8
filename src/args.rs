//! # Command Line Arguments and Board Files
//!
//! This module provides command line argument parsing and board-file loading
//! for the training driver. It handles:
//!
//! - Parsing the training hyperparameters and run length
//! - Loading or saving a [`TrainingConfig`] as JSON
//! - Loading a square Game of Life board from a text file for prediction
//!
//! ## Example Usage
//!
//! ```no_run
//! use clap::Parser;
//! use gol_learn::args::{self, Args};
//!
//! let args = Args::parse();
//! let config = args.training_config()?;
//! if let Some(path) = &args.input_file {
//!     let board = args::import_board(path, args.alive_symbol)?;
//! }
//! # Ok::<(), gol_learn::error::GolError>(())
//! ```

use std::{fs, path::PathBuf};

use burn::config::Config;
use clap::Parser;

use crate::{
    board::Board,
    error::{GolError, GolResult},
    network::{HiddenActivation, OutputActivation, PredictorNetworkConfig},
    trainer::TrainingConfig,
};

/// Command line arguments for training the next-generation predictor.
///
/// ## Examples
///
/// ```bash
/// # Train with the defaults (5x5 boards, 10000 steps) and predict 3 sequences
/// cargo run --release
///
/// # Shorter run, cost every 100 steps, then predict a board from a file
/// cargo run -- -n 2000 --sample-every 100 -i glider.txt
///
/// # Reuse a saved configuration
/// cargo run -- --config training.json
/// ```
#[derive(Parser, Debug)]
#[command(version, about = "Trains a dense network to predict Game of Life generations")]
pub struct Args {
    /// Interior side of the generated boards
    #[arg(short = 's', long, default_value_t = 5)]
    pub side: usize,

    /// Examples per training step
    #[arg(short = 'b', long, default_value_t = 1)]
    pub batch_size: usize,

    /// Learning rate of the first decay period
    #[arg(long, default_value_t = 0.042)]
    pub learning_rate: f64,

    /// Steps between two learning-rate decays
    #[arg(long, default_value_t = 42)]
    pub decay_period: usize,

    /// Factor applied to the learning rate every decay period
    #[arg(long, default_value_t = 0.85)]
    pub decay_factor: f64,

    /// Number of dense layers (2 or 3)
    #[arg(short = 'l', long, default_value_t = 3)]
    pub layers: usize,

    /// Activation after hidden layers: relu, sigmoid or none
    #[arg(long, default_value = "relu")]
    pub hidden_activation: HiddenActivation,

    /// Activation after the output layer: linear or sigmoid
    #[arg(long, default_value = "linear")]
    pub output_activation: OutputActivation,

    /// Build dense layers without bias vectors
    #[arg(long)]
    pub no_bias: bool,

    /// Bias switch for each dense layer, first layer first (e.g. `true,false,true`)
    #[arg(long, value_delimiter = ',', conflicts_with = "no_bias")]
    pub layer_bias: Vec<bool>,

    /// Seed for board generation
    #[arg(long)]
    pub seed: Option<u64>,

    /// Load the training configuration from a JSON file
    ///
    /// When set, the hyperparameter flags above are ignored; `--seed` still
    /// overrides the file's seed.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Save the effective training configuration to a JSON file
    #[arg(long)]
    pub save_config: Option<PathBuf>,

    /// Number of training steps to run
    #[arg(short = 'n', long, default_value_t = 10_000)]
    pub steps: usize,

    /// Sample the training cost every this many steps
    #[arg(long, default_value_t = 250)]
    pub sample_every: usize,

    /// Random sequences to show before training and predict afterwards
    #[arg(long, default_value_t = 3)]
    pub sequences: usize,

    /// Board file to predict after training
    ///
    /// Each line is a row; all rows must have as many cells as there are rows.
    #[arg(short = 'i', long)]
    pub input_file: Option<PathBuf>,

    /// Symbol representing alive cells in the board file
    #[arg(short = 'a', long, default_value = "X")]
    pub alive_symbol: char,
}

impl Args {
    /// Builds the training configuration from `--config` or from the flags.
    pub fn training_config(&self) -> GolResult<TrainingConfig> {
        let layer_bias = (!self.layer_bias.is_empty()).then(|| self.layer_bias.clone());
        let config = match &self.config {
            Some(path) => TrainingConfig::load(path)
                .map_err(|err| GolError::Config(format!("{}: {err:?}", path.display())))?,
            None => TrainingConfig::new(
                PredictorNetworkConfig::new()
                    .with_side(self.side)
                    .with_layer_count(self.layers)
                    .with_hidden_activation(self.hidden_activation.clone())
                    .with_output_activation(self.output_activation.clone())
                    .with_include_bias(!self.no_bias)
                    .with_layer_bias(layer_bias),
            )
            .with_batch_size(self.batch_size)
            .with_initial_learning_rate(self.learning_rate)
            .with_decay_period(self.decay_period)
            .with_decay_factor(self.decay_factor),
        };

        let config = match self.seed {
            Some(seed) => config.with_seed(Some(seed)),
            None => config,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Parses a board from text.
///
/// Cells equal to `alive_symbol` are alive, every other character is dead.
/// Empty lines are skipped; the remaining rows must form a square.
///
/// # Errors
///
/// Returns [`GolError::InvalidBoardFile`] if there are no rows or if a row's
/// length differs from the number of rows.
pub fn parse_board(content: &str, alive_symbol: char) -> GolResult<Board> {
    let lines: Vec<&str> = content.lines().filter(|line| !line.is_empty()).collect();

    if lines.is_empty() {
        return Err(GolError::InvalidBoardFile(
            "file contains no valid grid data".to_string(),
        ));
    }

    let side = lines.len();
    let mut cells = Vec::with_capacity(side * side);
    for (i, line) in lines.iter().enumerate() {
        let width = line.chars().count();
        if width != side {
            return Err(GolError::InvalidBoardFile(format!(
                "row {i} has length {width}, expected {side}"
            )));
        }
        cells.extend(line.chars().map(|ch| ch == alive_symbol));
    }

    Board::new(side, cells)
}

/// Reads a board file, see [`parse_board`] for the format.
pub fn import_board(path: &PathBuf, alive_symbol: char) -> GolResult<Board> {
    let content = fs::read_to_string(path)?;
    parse_board(&content, alive_symbol)
}
