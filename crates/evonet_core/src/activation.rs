//! Activation functions for neurons and control modules.

use crate::error::{NetError, Result};
use evonet_data::ActivationType;

const STEEPNESS: f64 = 4.924273;
const SHIFT: f64 = 2.4621365;

/// Trait implementing the math behind an [`ActivationType`].
pub trait ActivationLogic {
    /// Maps the summed input of a neuron to its output.
    fn activate(&self, input: f64) -> Result<f64>;

    /// Maps the inputs of a control module to its outputs.
    fn activate_module(&self, inputs: &[f64]) -> Result<Vec<f64>>;
}

impl ActivationLogic for ActivationType {
    fn activate(&self, x: f64) -> Result<f64> {
        let y = match self {
            ActivationType::SigmoidPlain => 1.0 / (1.0 + (-x).exp()),
            ActivationType::SigmoidReduced => 1.0 / (1.0 + (-0.5 * x).exp()),
            ActivationType::SigmoidSteepened => 1.0 / (1.0 + (-STEEPNESS * x).exp()),
            ActivationType::SigmoidBipolar => 2.0 / (1.0 + (-STEEPNESS * x).exp()) - 1.0,
            ActivationType::SigmoidInverseAbsolute => 0.5 + (x / (1.0 + x.abs())) * 0.5,
            ActivationType::SigmoidLeftShifted => 1.0 / (1.0 + (-x - SHIFT).exp()),
            ActivationType::SigmoidLeftShiftedSteepened => {
                1.0 / (1.0 + (-(STEEPNESS * x + SHIFT)).exp())
            }
            ActivationType::SigmoidRightShiftedSteepened => {
                1.0 / (1.0 + (-(STEEPNESS * x - SHIFT)).exp())
            }
            ActivationType::Tanh => (0.9 * x).tanh(),
            ActivationType::GaussianBipolar => 2.0 * (-(x * 2.5).powi(2)).exp() - 1.0,
            ActivationType::Linear => x,
            ActivationType::LinearAbs => x.abs(),
            ActivationType::LinearClipped => x.clamp(-1.0, 1.0),
            ActivationType::Null => 0.0,
            ActivationType::Sign => {
                if x > 0.0 {
                    1.0
                } else if x < 0.0 {
                    -1.0
                } else {
                    0.0
                }
            }
            ActivationType::Sine => x.sin(),
            ActivationType::Step => {
                if x <= 0.0 {
                    0.0
                } else {
                    1.0
                }
            }
            ActivationType::ModuleMultiply
            | ActivationType::ModuleMax
            | ActivationType::ModuleMin => {
                return Err(NetError::UnsupportedActivation {
                    activation: *self,
                    target: "a neuron",
                })
            }
        };
        Ok(y)
    }

    fn activate_module(&self, inputs: &[f64]) -> Result<Vec<f64>> {
        if !self.is_module() {
            return Err(NetError::UnsupportedActivation {
                activation: *self,
                target: "a control module",
            });
        }
        if inputs.is_empty() {
            return Err(NetError::EmptyModuleInput { activation: *self });
        }
        let out = match self {
            ActivationType::ModuleMultiply => inputs.iter().product::<f64>(),
            ActivationType::ModuleMax => inputs.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            _ => inputs.iter().copied().fold(f64::INFINITY, f64::min),
        };
        Ok(vec![out])
    }
}
