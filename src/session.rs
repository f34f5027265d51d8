//! # Session
//!
//! One explicit object owning the trainer (and through it the predictor
//! network and its training state) together with the sequences added for
//! display. Presentation is left to two collaborators:
//!
//! - [`BoardRenderer`] shows a board under a label
//! - [`CostLogger`] receives every sampled training cost
//!
//! A typical run adds a few sequences, trains, then predicts each sequence:
//!
//! ```no_run
//! use burn::backend::{Autodiff, NdArray};
//! use gol_learn::{
//!     network::PredictorNetworkConfig,
//!     render::{ConsoleCostLogger, TerminalRenderer},
//!     session::Session,
//!     trainer::TrainingConfig,
//! };
//!
//! let device = Default::default();
//! let config = TrainingConfig::new(PredictorNetworkConfig::new());
//! let mut session = Session::<Autodiff<NdArray>>::new(config, &device)?;
//! let mut renderer = TerminalRenderer::new(std::io::stdout());
//! let mut logger = ConsoleCostLogger::new(std::io::stdout());
//!
//! session.add_sequence(&mut renderer)?;
//! session.on_train_requested(10_000, 250, &mut logger)?;
//! session.predict_sequences(&mut renderer)?;
//! # Ok::<(), gol_learn::error::GolError>(())
//! ```

use burn::tensor::backend::AutodiffBackend;

use crate::{
    board::Board,
    error::{GolResult, ensure_positive},
    generator::Example,
    predictor::Predictor,
    trainer::{Trainer, TrainingConfig, TrainingState},
};

/// Label of the board an example starts from.
pub const SEQUENCE_LABEL: &str = "Sequence";
/// Label of the rule-computed successor.
pub const NEXT_SEQUENCE_LABEL: &str = "Next Sequence";
/// Label of a network prediction.
pub const PREDICTION_LABEL: &str = "Prediction";

/// Displays a board under a title.
pub trait BoardRenderer {
    fn render(&mut self, board: &Board, label: &str) -> GolResult<()>;
}

/// Receives costs sampled during training.
pub trait CostLogger {
    fn log(&mut self, step: usize, cost: f64) -> GolResult<()>;
}

/// Owns the trainer and the displayed sequences for one run.
///
/// The trainer is the only writer of the network; predictions read a
/// non-autodiff copy taken at call time.
pub struct Session<B: AutodiffBackend> {
    trainer: Trainer<B>,
    sequences: Vec<Example>,
    device: B::Device,
}

impl<B: AutodiffBackend> Session<B> {
    pub fn new(config: TrainingConfig, device: &B::Device) -> GolResult<Self> {
        Ok(Self {
            trainer: Trainer::new(config, device)?,
            sequences: Vec::new(),
            device: device.clone(),
        })
    }

    pub fn trainer(&self) -> &Trainer<B> {
        &self.trainer
    }

    pub fn state(&self) -> TrainingState {
        self.trainer.state()
    }

    /// Sequences added with [`Session::add_sequence`], oldest first.
    pub fn sequences(&self) -> &[Example] {
        &self.sequences
    }

    /// A fresh example at the configured size.
    pub fn on_sequence_requested(&mut self) -> GolResult<Example> {
        self.trainer.generate_example()
    }

    /// Generates an example, renders both of its boards and keeps it for
    /// later predictions.
    pub fn add_sequence<R: BoardRenderer>(&mut self, renderer: &mut R) -> GolResult<&Example> {
        let example = self.on_sequence_requested()?;
        renderer.render(&example.input.unpad(), SEQUENCE_LABEL)?;
        renderer.render(&example.next.unpad(), NEXT_SEQUENCE_LABEL)?;

        let index = self.sequences.len();
        self.sequences.push(example);
        tracing::debug!(count = index + 1, "sequence added");
        Ok(&self.sequences[index])
    }

    /// Runs `total_steps` training steps, sampling the cost on every
    /// `sample_every`-th step (the first step is always sampled).
    ///
    /// # Errors
    ///
    /// A `sample_every` of 0 is rejected before any step runs.
    pub fn on_train_requested<L: CostLogger>(
        &mut self,
        total_steps: usize,
        sample_every: usize,
        logger: &mut L,
    ) -> GolResult<TrainingState> {
        ensure_positive("sample interval", sample_every)?;
        tracing::info!(total_steps, sample_every, "training started");

        for i in 0..total_steps {
            let step = self.trainer.state().step;
            let Some(cost) = self.trainer.train_step(i % sample_every == 0)? else {
                continue;
            };

            if cost.is_finite() {
                tracing::info!(step, cost, "sampled cost");
            } else {
                tracing::warn!(step, cost, "training diverged");
            }
            logger.log(step, cost)?;
        }

        let state = self.trainer.state();
        tracing::info!(
            step = state.step,
            learning_rate = state.learning_rate,
            "training finished"
        );
        Ok(state)
    }

    /// Predicts the next generation of `board` with the current network.
    pub fn on_predict_requested(&self, board: &Board) -> GolResult<Board> {
        let network = self.trainer.inference_model();
        Predictor::new(&network, &self.device).predict(board)
    }

    /// Renders a prediction for every stored sequence.
    pub fn predict_sequences<R: BoardRenderer>(&self, renderer: &mut R) -> GolResult<()> {
        let network = self.trainer.inference_model();
        let predictor = Predictor::new(&network, &self.device);
        for example in &self.sequences {
            let prediction = predictor.predict(&example.input.unpad())?;
            renderer.render(&prediction, PREDICTION_LABEL)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::GolError, network::PredictorNetworkConfig};
    use burn::backend::{Autodiff, NdArray};

    type TestBackend = Autodiff<NdArray>;

    #[derive(Default)]
    struct RecordingRenderer {
        rendered: Vec<(String, Board)>,
    }

    impl BoardRenderer for RecordingRenderer {
        fn render(&mut self, board: &Board, label: &str) -> GolResult<()> {
            self.rendered.push((label.to_string(), board.clone()));
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingLogger {
        costs: Vec<(usize, f64)>,
    }

    impl CostLogger for RecordingLogger {
        fn log(&mut self, step: usize, cost: f64) -> GolResult<()> {
            self.costs.push((step, cost));
            Ok(())
        }
    }

    fn session() -> Session<TestBackend> {
        let config =
            TrainingConfig::new(PredictorNetworkConfig::new().with_side(3)).with_seed(Some(9));
        Session::new(config, &Default::default()).unwrap()
    }

    #[test]
    fn sequence_request_uses_configured_size() {
        let mut session = session();
        let example = session.on_sequence_requested().unwrap();
        assert_eq!(example.input.interior_side(), 3);
        assert!(session.sequences().is_empty());
    }

    #[test]
    fn added_sequences_are_rendered_and_kept() {
        let mut session = session();
        let mut renderer = RecordingRenderer::default();

        let example = session.add_sequence(&mut renderer).unwrap().clone();
        assert_eq!(session.sequences().len(), 1);
        assert_eq!(session.sequences()[0], example);

        let second = session.add_sequence(&mut renderer).unwrap().clone();
        assert_eq!(session.sequences().len(), 2);
        assert_eq!(session.sequences()[1], second);

        let labels: Vec<&str> = renderer.rendered.iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(
            labels,
            [
                SEQUENCE_LABEL,
                NEXT_SEQUENCE_LABEL,
                SEQUENCE_LABEL,
                NEXT_SEQUENCE_LABEL
            ]
        );
        assert_eq!(renderer.rendered[0].1, example.input.unpad());
        assert_eq!(renderer.rendered[1].1, example.next.unpad());
    }

    #[test]
    fn training_samples_cost_at_interval() {
        let mut session = session();
        let mut logger = RecordingLogger::default();

        let state = session.on_train_requested(10, 4, &mut logger).unwrap();
        assert_eq!(state.step, 10);

        let steps: Vec<usize> = logger.costs.iter().map(|&(step, _)| step).collect();
        assert_eq!(steps, [0, 4, 8]);
        assert_eq!(state.last_cost, Some(logger.costs[2].1));
    }

    #[test]
    fn logged_steps_continue_across_requests() {
        let mut session = session();
        let mut logger = RecordingLogger::default();

        session.on_train_requested(3, 5, &mut logger).unwrap();
        session.on_train_requested(3, 5, &mut logger).unwrap();

        let steps: Vec<usize> = logger.costs.iter().map(|&(step, _)| step).collect();
        assert_eq!(steps, [0, 3]);
    }

    #[test]
    fn zero_sample_interval_is_rejected_before_training() {
        let mut session = session();
        let mut logger = RecordingLogger::default();

        let result = session.on_train_requested(5, 0, &mut logger);
        assert!(matches!(result, Err(GolError::InvalidSize { .. })));
        assert_eq!(session.state().step, 0);
    }

    #[test]
    fn predictions_are_rendered_for_every_sequence() {
        let mut session = session();
        let mut renderer = RecordingRenderer::default();
        session.add_sequence(&mut renderer).unwrap();
        session.add_sequence(&mut renderer).unwrap();
        renderer.rendered.clear();

        session.predict_sequences(&mut renderer).unwrap();
        assert_eq!(renderer.rendered.len(), 2);
        assert!(
            renderer
                .rendered
                .iter()
                .all(|(label, board)| label == PREDICTION_LABEL && board.side() == 3)
        );
    }

    #[test]
    fn predict_request_returns_board_of_same_side() {
        let session = session();
        let board = Board::from_rows(&[[0, 0, 0], [1, 1, 1], [0, 0, 0]]).unwrap();
        assert_eq!(session.on_predict_requested(&board).unwrap().side(), 3);
    }
}
