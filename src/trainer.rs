//! # Trainer
//!
//! Stochastic gradient descent over freshly generated batches. Each call to
//! [`Trainer::train_step`] runs to completion before returning:
//!
//! 1. Generate a new batch from the [`ExampleGenerator`]
//! 2. Derive the learning rate from the step counter:
//!    `initial * factor^floor(step / period)`
//! 3. Forward the batch, take the mean-squared error against the labels and
//!    apply one SGD update
//! 4. Advance the step counter
//! 5. Read the scalar cost back only when it was asked for
//!
//! Reading the cost forces the loss to be materialized, so callers usually
//! sample it every few hundred steps only.

use burn::{
    config::Config,
    module::AutodiffModule,
    nn::loss::{MseLoss, Reduction},
    optim::{GradientsParams, Optimizer, Sgd, SgdConfig, adaptor::OptimizerAdaptor},
    tensor::{ElementConversion, backend::AutodiffBackend},
};

use crate::{
    error::{GolResult, ensure_positive},
    generator::{Example, ExampleGenerator},
    network::{PredictorNetwork, PredictorNetworkConfig},
};

/// Hyperparameters of a training session.
#[derive(Config, Debug)]
pub struct TrainingConfig {
    pub network: PredictorNetworkConfig,
    /// Examples per training step.
    #[config(default = 1)]
    pub batch_size: usize,
    #[config(default = 0.042)]
    pub initial_learning_rate: f64,
    /// Number of steps between two learning-rate decays.
    #[config(default = 42)]
    pub decay_period: usize,
    /// Multiplier applied to the learning rate once per decay period.
    #[config(default = 0.85)]
    pub decay_factor: f64,
    /// Seed for board generation; random when unset.
    pub seed: Option<u64>,
}

impl TrainingConfig {
    pub fn validate(&self) -> GolResult<()> {
        self.network.validate()?;
        ensure_positive("batch size", self.batch_size)?;
        ensure_positive("decay period", self.decay_period)?;
        Ok(())
    }

    /// Learning rate in effect at `step`.
    pub fn learning_rate(&self, step: usize) -> f64 {
        let decays = step / self.decay_period.max(1);
        let exponent = i32::try_from(decays).unwrap_or(i32::MAX);
        self.initial_learning_rate * self.decay_factor.powi(exponent)
    }
}

/// Observable progress of a [`Trainer`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrainingState {
    /// Completed training steps.
    pub step: usize,
    /// Learning rate the next step will use.
    pub learning_rate: f64,
    /// Most recently sampled cost, if any step sampled one yet.
    pub last_cost: Option<f64>,
}

/// Owns the predictor network and mutates it one batch at a time.
pub struct Trainer<B: AutodiffBackend> {
    config: TrainingConfig,
    model: PredictorNetwork<B>,
    optim: OptimizerAdaptor<Sgd<B::InnerBackend>, PredictorNetwork<B>, B>,
    generator: ExampleGenerator<B::InnerBackend>,
    loss: MseLoss,
    device: B::Device,
    state: TrainingState,
}

impl<B: AutodiffBackend> Trainer<B> {
    /// Validates `config` and initializes a fresh network on `device`.
    ///
    /// # Errors
    ///
    /// Any invalid size or layer count is reported before anything is allocated.
    pub fn new(config: TrainingConfig, device: &B::Device) -> GolResult<Self> {
        config.validate()?;
        let model = config.network.init::<B>(device)?;
        let generator = ExampleGenerator::new(device, config.seed);
        let state = TrainingState {
            step: 0,
            learning_rate: config.learning_rate(0),
            last_cost: None,
        };

        tracing::info!(
            side = config.network.side,
            batch_size = config.batch_size,
            learning_rate = config.initial_learning_rate,
            "trainer ready"
        );
        Ok(Self {
            optim: SgdConfig::new().init(),
            config,
            model,
            generator,
            loss: MseLoss::new(),
            device: device.clone(),
            state,
        })
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    pub fn state(&self) -> TrainingState {
        self.state
    }

    pub fn model(&self) -> &PredictorNetwork<B> {
        &self.model
    }

    /// The network without autodiff tracking, for prediction.
    pub fn inference_model(&self) -> PredictorNetwork<B::InnerBackend> {
        self.model.valid()
    }

    /// One fresh example at the configured board size.
    pub fn generate_example(&mut self) -> GolResult<Example> {
        self.generator.generate_example(self.config.network.side)
    }

    /// Runs one optimizer update on a new batch.
    ///
    /// Returns the batch's mean-squared error when `should_sample_cost` is set
    /// and `None` otherwise. A diverged network yields a NaN or infinite cost
    /// rather than an error.
    pub fn train_step(&mut self, should_sample_cost: bool) -> GolResult<Option<f64>> {
        let batch = self
            .generator
            .generate_batch(self.config.network.side, self.config.batch_size)?;
        let learning_rate = self.config.learning_rate(self.state.step);

        let (inputs, targets) = batch.to_tensors::<B>(&self.device);
        let predictions = self.model.forward(inputs);
        let loss = self.loss.forward(predictions, targets, Reduction::Mean);
        let cost = should_sample_cost.then(|| loss.clone().into_scalar().elem::<f64>());

        let grads = GradientsParams::from_grads(loss.backward(), &self.model);
        self.model = self.optim.step(learning_rate, self.model.clone(), grads);

        self.state.step += 1;
        self.state.learning_rate = self.config.learning_rate(self.state.step);
        if cost.is_some() {
            self.state.last_cost = cost;
        }
        tracing::trace!(step = self.state.step, learning_rate, "training step done");

        Ok(cost)
    }
}
