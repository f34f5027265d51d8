//! # gol-learn
//!
//! Trains a small dense network to predict the next generation of Conway's
//! Game of Life. Training examples are random boards labelled by a
//! convolution-based rule engine; the network is fitted with SGD on a
//! mean-squared-error objective and can then be applied to new boards.
//!
//! Components, leaves first:
//!
//! - [`board`]: padding, flattening and tensor conversion of square boards
//! - [`rules`]: neighbor counting and the transition rule
//! - [`generator`]: random labelled examples and batches
//! - [`network`]: the predictor network and its configuration
//! - [`trainer`]: SGD steps with a step-indexed learning-rate decay
//! - [`predictor`]: network evaluation on single boards
//! - [`session`]: the object tying the above to a renderer and a cost logger

pub mod args;
pub mod board;
pub mod error;
pub mod generator;
pub mod network;
pub mod predictor;
pub mod render;
pub mod rules;
pub mod session;
pub mod trainer;

pub use board::{Board, PaddedBoard};
pub use error::{GolError, GolResult};
pub use session::{BoardRenderer, CostLogger, Session};
