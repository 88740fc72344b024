use rand::Rng;
use serde::{Deserialize, Serialize};

/// Transfer function applied on every hidden and output neuron.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    Tanh,
    Sigmoid,
    Linear,
}

impl Activation {
    fn apply(self, x: f64) -> f64 {
        match self {
            Activation::Tanh => x.tanh(),
            Activation::Sigmoid => 1.0 / (1.0 + (-x).exp()),
            Activation::Linear => x,
        }
    }

    /// Derivative expressed through the activation's own output `y = f(x)`.
    fn derivative(self, y: f64) -> f64 {
        match self {
            Activation::Tanh => 1.0 - y * y,
            Activation::Sigmoid => y * (1.0 - y),
            Activation::Linear => 1.0,
        }
    }
}

/// Shape and training parameters of a multilayer perceptron.
///
/// ```text
/// layer_sizes = [input, h1, ..., hk, output]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MlpConfig {
    pub layer_sizes: Vec<usize>,
    pub activation: Activation,
    pub learning_rate: f64,
}

impl MlpConfig {
    /// Random weights and biases, uniform in `±1/sqrt(fan_in)`.
    pub fn init<R: Rng + ?Sized>(&self, rng: &mut R) -> Mlp {
        let layers = self
            .layer_sizes
            .windows(2)
            .map(|pair| DenseLayer::random(pair[0], pair[1], rng))
            .collect();
        Mlp {
            layers,
            activation: self.activation,
            learning_rate: self.learning_rate,
            update_count: 0,
        }
    }
}

/// Fully connected layer. `weights[o * inputs + i]` connects input `i` to
/// output `o`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct DenseLayer {
    inputs: usize,
    outputs: usize,
    weights: Vec<f64>,
    biases: Vec<f64>,
}

impl DenseLayer {
    fn random<R: Rng + ?Sized>(inputs: usize, outputs: usize, rng: &mut R) -> Self {
        let range = 1.0 / (inputs.max(1) as f64).sqrt();
        let weights = (0..inputs * outputs)
            .map(|_| rng.random_range(-range..range))
            .collect();
        let biases = (0..outputs).map(|_| rng.random_range(-range..range)).collect();
        DenseLayer {
            inputs,
            outputs,
            weights,
            biases,
        }
    }

    fn forward(&self, input: &[f64], activation: Activation) -> Vec<f64> {
        (0..self.outputs)
            .map(|o| {
                let row = &self.weights[o * self.inputs..(o + 1) * self.inputs];
                let net: f64 = row.iter().zip(input).map(|(w, x)| w * x).sum::<f64>() + self.biases[o];
                activation.apply(net)
            })
            .collect()
    }
}

/// Feed-forward value network trained online, one sample at a time, by
/// backpropagation of the squared error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mlp {
    layers: Vec<DenseLayer>,
    activation: Activation,
    learning_rate: f64,
    #[serde(default)]
    update_count: u64,
}

impl Mlp {
    pub fn input_size(&self) -> usize {
        self.layers.first().map_or(0, |l| l.inputs)
    }

    pub fn output_size(&self) -> usize {
        self.layers.last().map_or(0, |l| l.outputs)
    }

    pub fn layer_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![self.input_size()];
        sizes.extend(self.layers.iter().map(|l| l.outputs));
        sizes
    }

    pub fn activation(&self) -> Activation {
        self.activation
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn set_learning_rate(&mut self, learning_rate: f64) {
        self.learning_rate = learning_rate;
    }

    /// Number of single-sample updates applied since initialization.
    pub fn update_count(&self) -> u64 {
        self.update_count
    }

    /// Output of the first (and, for value networks, only) output neuron.
    pub fn evaluate(&self, input: &[f64]) -> f64 {
        self.outputs(input)[0]
    }

    pub fn outputs(&self, input: &[f64]) -> Vec<f64> {
        debug_assert_eq!(input.len(), self.input_size());
        self.layers
            .iter()
            .fold(input.to_vec(), |x, layer| layer.forward(&x, self.activation))
    }

    /// One stochastic gradient step on `0.5 * (target - output)^2`.
    pub fn learn_once(&mut self, input: &[f64], target: f64) {
        debug_assert_eq!(input.len(), self.input_size());

        // activations[0] is the input, activations[l + 1] the output of layer l
        let mut activations = Vec::with_capacity(self.layers.len() + 1);
        activations.push(input.to_vec());
        for layer in &self.layers {
            let next = layer.forward(activations.last().map_or(&[][..], |a| a.as_slice()), self.activation);
            activations.push(next);
        }

        let output = &activations[self.layers.len()];
        let mut deltas: Vec<f64> = output
            .iter()
            .map(|&y| (y - target) * self.activation.derivative(y))
            .collect();

        for l in (0..self.layers.len()).rev() {
            let layer_input = &activations[l];

            // Deltas for the layer below use the weights before this update
            let below = if l > 0 {
                let layer = &self.layers[l];
                (0..layer.inputs)
                    .map(|i| {
                        let back: f64 = (0..layer.outputs)
                            .map(|o| layer.weights[o * layer.inputs + i] * deltas[o])
                            .sum();
                        back * self.activation.derivative(layer_input[i])
                    })
                    .collect()
            } else {
                Vec::new()
            };

            let rate = self.learning_rate;
            let layer = &mut self.layers[l];
            for o in 0..layer.outputs {
                let step = rate * deltas[o];
                let row = &mut layer.weights[o * layer.inputs..(o + 1) * layer.inputs];
                for (w, x) in row.iter_mut().zip(layer_input) {
                    *w -= step * x;
                }
                layer.biases[o] -= step;
            }

            deltas = below;
        }

        self.update_count += 1;
    }

    /// One online iteration over `samples`: the same as calling
    /// [`Mlp::learn_once`] for each sample in order.
    pub fn learn_batch(&mut self, samples: &[(Vec<f64>, f64)]) {
        for (input, target) in samples {
            self.learn_once(input, *target);
        }
    }

    /// True when no weight or bias is NaN or infinite.
    pub fn is_finite(&self) -> bool {
        self.layers
            .iter()
            .all(|l| l.weights.iter().chain(&l.biases).all(|v| v.is_finite()))
    }

    /// Internal consistency check for networks read from disk.
    pub fn validate_shape(&self) -> Result<(), String> {
        if self.layers.is_empty() {
            return Err("network has no layers".into());
        }
        for (index, layer) in self.layers.iter().enumerate() {
            if layer.inputs == 0 || layer.outputs == 0 {
                return Err(format!("layer {index} has a zero dimension"));
            }
            if layer.weights.len() != layer.inputs * layer.outputs {
                return Err(format!(
                    "layer {index} has {} weights, expected {}",
                    layer.weights.len(),
                    layer.inputs * layer.outputs
                ));
            }
            if layer.biases.len() != layer.outputs {
                return Err(format!(
                    "layer {index} has {} biases, expected {}",
                    layer.biases.len(),
                    layer.outputs
                ));
            }
        }
        for (index, pair) in self.layers.windows(2).enumerate() {
            if pair[0].outputs != pair[1].inputs {
                return Err(format!(
                    "layer {index} outputs {} values but layer {} expects {}",
                    pair[0].outputs,
                    index + 1,
                    pair[1].inputs
                ));
            }
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(format!("invalid learning rate {}", self.learning_rate));
        }
        Ok(())
    }
}
