//! # Predictor Network
//!
//! A small fixed-topology feedforward regression model. A flattened padded board
//! of width `W = (N + 2)^2` goes in, a flattened predicted next board of the same
//! width comes out. Every layer is a dense `W -> W` layer; hidden layers are
//! followed by the configured activation and the last layer by the output
//! activation (linear by default).

use burn::{
    config::Config,
    module::{Ignored, Module},
    nn::{Initializer, Linear, LinearConfig},
    prelude::Backend,
    tensor::{
        Float, Tensor,
        activation::{relu, sigmoid},
    },
};
use std::str::FromStr;

use crate::error::{GolError, GolResult, ensure_positive};

/// Nonlinearity applied after each hidden layer.
#[derive(Config, Debug, PartialEq)]
pub enum HiddenActivation {
    Relu,
    Sigmoid,
    Identity,
}

/// Nonlinearity applied after the output layer.
#[derive(Config, Debug, PartialEq)]
pub enum OutputActivation {
    Linear,
    Sigmoid,
}

impl FromStr for HiddenActivation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "relu" => Ok(Self::Relu),
            "sigmoid" => Ok(Self::Sigmoid),
            "none" | "identity" => Ok(Self::Identity),
            other => Err(format!("unknown hidden activation '{other}'")),
        }
    }
}

impl FromStr for OutputActivation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "linear" | "none" => Ok(Self::Linear),
            "sigmoid" => Ok(Self::Sigmoid),
            other => Err(format!("unknown output activation '{other}'")),
        }
    }
}

/// Configuration of the [`PredictorNetwork`].
#[derive(Config, Debug)]
pub struct PredictorNetworkConfig {
    /// Interior board side `N`.
    #[config(default = 5)]
    pub side: usize,
    /// Number of dense layers, 2 or 3.
    #[config(default = 3)]
    pub layer_count: usize,
    #[config(default = "HiddenActivation::Relu")]
    pub hidden_activation: HiddenActivation,
    #[config(default = "OutputActivation::Linear")]
    pub output_activation: OutputActivation,
    /// Bias default for every dense layer.
    #[config(default = true)]
    pub include_bias: bool,
    /// Per-layer bias switches, first layer first. Overrides `include_bias`
    /// and must hold exactly `layer_count` entries when set.
    pub layer_bias: Option<Vec<bool>>,
    /// Weight initializer for every dense layer.
    #[config(default = "Initializer::XavierUniform { gain: 1.0 }")]
    pub initializer: Initializer,
}

impl PredictorNetworkConfig {
    /// Width of the flattened padded board, `(N + 2)^2`.
    pub fn width(&self) -> usize {
        (self.side + 2) * (self.side + 2)
    }

    pub fn validate(&self) -> GolResult<()> {
        ensure_positive("board side", self.side)?;
        if !(2..=3).contains(&self.layer_count) {
            return Err(GolError::InvalidLayerCount(self.layer_count));
        }
        if let Some(layer_bias) = &self.layer_bias {
            if layer_bias.len() != self.layer_count {
                return Err(GolError::InvalidLayerBias {
                    layers: self.layer_count,
                    given: layer_bias.len(),
                });
            }
        }
        Ok(())
    }

    /// Whether dense layer `index` carries a bias vector.
    pub fn bias_for_layer(&self, index: usize) -> bool {
        self.layer_bias
            .as_ref()
            .and_then(|layer_bias| layer_bias.get(index).copied())
            .unwrap_or(self.include_bias)
    }

    /// Allocates the network's parameters on `device`.
    pub fn init<B: Backend>(&self, device: &B::Device) -> GolResult<PredictorNetwork<B>> {
        self.validate()?;
        let width = self.width();
        let layers = (0..self.layer_count)
            .map(|index| {
                LinearConfig::new(width, width)
                    .with_bias(self.bias_for_layer(index))
                    .with_initializer(self.initializer.clone())
                    .init(device)
            })
            .collect();

        tracing::debug!(
            side = self.side,
            width,
            layers = self.layer_count,
            "predictor network initialized"
        );
        Ok(PredictorNetwork {
            layers,
            hidden_activation: Ignored(self.hidden_activation.clone()),
            output_activation: Ignored(self.output_activation.clone()),
            side: self.side,
        })
    }
}

/// Dense regression network mapping a board to its predicted successor.
#[derive(Module, Debug)]
pub struct PredictorNetwork<B: Backend> {
    layers: Vec<Linear<B>>,
    hidden_activation: Ignored<HiddenActivation>,
    output_activation: Ignored<OutputActivation>,
    side: usize,
}

impl<B: Backend> PredictorNetwork<B> {
    /// Interior board side the network was built for.
    pub fn side(&self) -> usize {
        self.side
    }

    /// Input and output width.
    pub fn width(&self) -> usize {
        (self.side + 2) * (self.side + 2)
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Applies every layer to a `[batch, width]` input.
    pub fn forward(&self, input: Tensor<B, 2, Float>) -> Tensor<B, 2, Float> {
        let last = self.layers.len() - 1;
        self.layers
            .iter()
            .enumerate()
            .fold(input, |x, (index, layer)| {
                let x = layer.forward(x);
                if index == last {
                    match self.output_activation.0 {
                        OutputActivation::Linear => x,
                        OutputActivation::Sigmoid => sigmoid(x),
                    }
                } else {
                    match self.hidden_activation.0 {
                        HiddenActivation::Relu => relu(x),
                        HiddenActivation::Sigmoid => sigmoid(x),
                        HiddenActivation::Identity => x,
                    }
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    #[test]
    fn defaults_match_documented_configuration() {
        let config = PredictorNetworkConfig::new();
        assert_eq!(config.side, 5);
        assert_eq!(config.layer_count, 3);
        assert_eq!(config.hidden_activation, HiddenActivation::Relu);
        assert_eq!(config.output_activation, OutputActivation::Linear);
        assert!(config.include_bias);
        assert_eq!(config.layer_bias, None);
        assert_eq!(config.width(), 49);
    }

    #[test]
    fn bias_is_chosen_per_layer() {
        let device = Default::default();
        let network = PredictorNetworkConfig::new()
            .with_side(2)
            .with_layer_bias(Some(vec![true, false, true]))
            .init::<TestBackend>(&device)
            .unwrap();

        let has_bias: Vec<bool> = network.layers.iter().map(|l| l.bias.is_some()).collect();
        assert_eq!(has_bias, [true, false, true]);

        let input = Tensor::<TestBackend, 2>::ones([2, 16], &device);
        assert_eq!(network.forward(input).dims(), [2, 16]);
    }

    #[test]
    fn global_bias_switch_applies_to_every_layer() {
        let device = Default::default();
        let network = PredictorNetworkConfig::new()
            .with_side(2)
            .with_layer_count(2)
            .with_include_bias(false)
            .init::<TestBackend>(&device)
            .unwrap();
        assert!(network.layers.iter().all(|l| l.bias.is_none()));
    }

    #[test]
    fn rejects_bias_list_of_wrong_length() {
        let device = Default::default();
        let result = PredictorNetworkConfig::new()
            .with_layer_count(2)
            .with_layer_bias(Some(vec![true, false, true]))
            .init::<TestBackend>(&device);
        assert!(matches!(
            result,
            Err(GolError::InvalidLayerBias {
                layers: 2,
                given: 3
            })
        ));
    }

    #[test]
    fn forward_preserves_width() {
        let device = Default::default();
        let network = PredictorNetworkConfig::new()
            .with_side(3)
            .init::<TestBackend>(&device)
            .unwrap();
        assert_eq!(network.layer_count(), 3);

        let input = Tensor::<TestBackend, 2>::zeros([4, 25], &device);
        assert_eq!(network.forward(input).dims(), [4, 25]);
    }

    #[test]
    fn sigmoid_output_stays_in_unit_interval() {
        let device = Default::default();
        let network = PredictorNetworkConfig::new()
            .with_side(2)
            .with_layer_count(2)
            .with_output_activation(OutputActivation::Sigmoid)
            .init::<TestBackend>(&device)
            .unwrap();

        let input = Tensor::<TestBackend, 2>::ones([1, 16], &device);
        let values: Vec<f32> = network.forward(input).into_data().to_vec().unwrap();
        assert!(values.iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn rejects_unsupported_layer_counts() {
        let device = Default::default();
        for count in [0, 1, 4] {
            let result = PredictorNetworkConfig::new()
                .with_layer_count(count)
                .init::<TestBackend>(&device);
            assert!(matches!(result, Err(GolError::InvalidLayerCount(n)) if n == count));
        }
    }

    #[test]
    fn parses_activation_names() {
        assert_eq!("ReLU".parse::<HiddenActivation>().unwrap(), HiddenActivation::Relu);
        assert_eq!("none".parse::<HiddenActivation>().unwrap(), HiddenActivation::Identity);
        assert_eq!("sigmoid".parse::<OutputActivation>().unwrap(), OutputActivation::Sigmoid);
        assert!("tanh".parse::<HiddenActivation>().is_err());
    }
}
