use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Category of a node in a phenotype network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NeuronType {
    /// Constant-valued sensor, usually loaded with 1.0.
    Bias,
    /// Sensor fed from the environment.
    Input,
    /// Network output.
    Output,
    /// Internal neuron.
    Hidden,
    /// Module boundary composing a sub-network.
    Control,
}

impl NeuronType {
    pub const ALL: [NeuronType; 5] = [
        NeuronType::Bias,
        NeuronType::Input,
        NeuronType::Output,
        NeuronType::Hidden,
        NeuronType::Control,
    ];

    /// Sensors receive their values from outside instead of from links.
    #[must_use]
    pub fn is_sensor(self) -> bool {
        matches!(self, NeuronType::Bias | NeuronType::Input)
    }

    /// Neurons sum their incoming links and run an activation function.
    #[must_use]
    pub fn is_neuron(self) -> bool {
        matches!(self, NeuronType::Hidden | NeuronType::Output)
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            NeuronType::Bias => "bias",
            NeuronType::Input => "input",
            NeuronType::Output => "output",
            NeuronType::Hidden => "hidden",
            NeuronType::Control => "control",
        }
    }
}

impl fmt::Display for NeuronType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for NeuronType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.name() == s)
            .ok_or_else(|| anyhow::anyhow!("Unknown neuron type: {}", s))
    }
}

/// Identifier of the function a node applies to its input.
///
/// Variants prefixed with `Module` are multi-input functions used by
/// control nodes; everything else maps a single sum to a single value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivationType {
    SigmoidPlain,
    SigmoidReduced,
    SigmoidSteepened,
    SigmoidBipolar,
    SigmoidInverseAbsolute,
    SigmoidLeftShifted,
    SigmoidLeftShiftedSteepened,
    SigmoidRightShiftedSteepened,
    Tanh,
    GaussianBipolar,
    Linear,
    LinearAbs,
    LinearClipped,
    Null,
    Sign,
    Sine,
    Step,
    /// Product of all inputs.
    ModuleMultiply,
    /// Largest input.
    ModuleMax,
    /// Smallest input.
    ModuleMin,
}

impl ActivationType {
    pub const ALL: [ActivationType; 20] = [
        ActivationType::SigmoidPlain,
        ActivationType::SigmoidReduced,
        ActivationType::SigmoidSteepened,
        ActivationType::SigmoidBipolar,
        ActivationType::SigmoidInverseAbsolute,
        ActivationType::SigmoidLeftShifted,
        ActivationType::SigmoidLeftShiftedSteepened,
        ActivationType::SigmoidRightShiftedSteepened,
        ActivationType::Tanh,
        ActivationType::GaussianBipolar,
        ActivationType::Linear,
        ActivationType::LinearAbs,
        ActivationType::LinearClipped,
        ActivationType::Null,
        ActivationType::Sign,
        ActivationType::Sine,
        ActivationType::Step,
        ActivationType::ModuleMultiply,
        ActivationType::ModuleMax,
        ActivationType::ModuleMin,
    ];

    #[must_use]
    pub fn is_module(self) -> bool {
        matches!(
            self,
            ActivationType::ModuleMultiply | ActivationType::ModuleMax | ActivationType::ModuleMin
        )
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            ActivationType::SigmoidPlain => "sigmoid_plain",
            ActivationType::SigmoidReduced => "sigmoid_reduced",
            ActivationType::SigmoidSteepened => "sigmoid_steepened",
            ActivationType::SigmoidBipolar => "sigmoid_bipolar",
            ActivationType::SigmoidInverseAbsolute => "sigmoid_inverse_absolute",
            ActivationType::SigmoidLeftShifted => "sigmoid_left_shifted",
            ActivationType::SigmoidLeftShiftedSteepened => "sigmoid_left_shifted_steepened",
            ActivationType::SigmoidRightShiftedSteepened => "sigmoid_right_shifted_steepened",
            ActivationType::Tanh => "tanh",
            ActivationType::GaussianBipolar => "gaussian_bipolar",
            ActivationType::Linear => "linear",
            ActivationType::LinearAbs => "linear_abs",
            ActivationType::LinearClipped => "linear_clipped",
            ActivationType::Null => "null",
            ActivationType::Sign => "sign",
            ActivationType::Sine => "sine",
            ActivationType::Step => "step",
            ActivationType::ModuleMultiply => "module_multiply",
            ActivationType::ModuleMax => "module_max",
            ActivationType::ModuleMin => "module_min",
        }
    }
}

impl Default for ActivationType {
    fn default() -> Self {
        ActivationType::SigmoidSteepened
    }
}

impl fmt::Display for ActivationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ActivationType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.name() == s)
            .ok_or_else(|| anyhow::anyhow!("Unknown activation type: {}", s))
    }
}
