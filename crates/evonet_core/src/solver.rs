//! Evaluation contract shared by the graph and the compiled solver, and the
//! compiled solver itself.
//!
//! A [`CompiledSolver`] addresses neurons by dense index in the fixed layout
//! `bias | input | output | hidden`. Ordinary bias links are folded into a
//! per-neuron bias weight scaled by the bias signal; every other link,
//! time-delayed bias links included, becomes a [`CompiledLink`]. Each solver
//! owns its activation registers, so concurrent evaluators need their own
//! copy.

use crate::activation::ActivationLogic;
use crate::error::{NetError, Result};
use crate::network::DEFAULT_ACTIVATION_STEPS;
use evonet_data::ActivationType;
use std::ops::Range;

/// Operations an evaluator needs from an executable phenotype.
pub trait Solver {
    /// Propagates until every output has activated at least once, running at
    /// least one full step and at most `max_steps`.
    fn activate_steps(&mut self, max_steps: usize) -> Result<bool>;

    fn activate(&mut self) -> Result<bool> {
        self.activate_steps(DEFAULT_ACTIVATION_STEPS)
    }

    /// Runs [`Solver::activate`] `steps` times, stopping at the first failure.
    fn forward_steps(&mut self, steps: usize) -> Result<bool>;

    fn recursive_steps(&mut self) -> Result<bool>;

    /// Steps until no neuron signal changes by more than the given delta.
    fn relax(&mut self, max_steps: usize, max_allowed_signal_delta: f64) -> Result<bool>;

    /// Clears activation state.
    fn flush(&mut self) -> Result<bool>;

    fn load_sensors(&mut self, inputs: &[f64]) -> Result<()>;

    /// Output values in output declaration order.
    fn read_outputs(&self) -> Vec<f64>;

    fn node_count(&self) -> usize;

    fn link_count(&self) -> usize;
}

/// Connection between two neurons of a compiled solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompiledLink {
    pub source_index: usize,
    pub target_index: usize,
    pub weight: f64,
    pub time_delayed: bool,
}

/// Control module resolved into solver indices.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledModule {
    /// Gene id of the control node this module was built from.
    pub control_id: usize,
    pub input_indices: Vec<usize>,
    pub output_indices: Vec<usize>,
    pub activation_type: ActivationType,
}

/// Immutable topology produced by [`crate::network::Network::compile`].
#[derive(Debug, Clone, PartialEq)]
pub struct SolverTopology {
    pub bias_neuron_count: usize,
    pub input_neuron_count: usize,
    pub output_neuron_count: usize,
    pub total_neuron_count: usize,
    pub activation_functions: Vec<ActivationType>,
    /// Summed weight of the folded bias links into each neuron.
    pub bias_list: Vec<f64>,
    /// Neurons that had at least one bias link folded in.
    pub biased: Vec<bool>,
    pub bias_link_count: usize,
    pub connections: Vec<CompiledLink>,
    /// Range of `connections` targeting each neuron.
    pub incoming: Vec<Range<usize>>,
    /// Hidden and output neurons in the source network's node order.
    pub neuron_order: Vec<usize>,
    /// Sensor indices in the source network's input order.
    pub sensor_order: Vec<usize>,
    pub modules: Vec<CompiledModule>,
}

/// Index-addressed evaluator equivalent to the graph activation engine.
#[derive(Debug, Clone)]
pub struct CompiledSolver {
    topology: SolverTopology,
    signals: Vec<f64>,
    previous: Vec<f64>,
    counts: Vec<u32>,
    active: Vec<bool>,
    sums: Vec<f64>,
}

impl CompiledSolver {
    #[must_use]
    pub fn new(topology: SolverTopology) -> Self {
        let n = topology.total_neuron_count;
        Self {
            topology,
            signals: vec![0.0; n],
            previous: vec![0.0; n],
            counts: vec![0; n],
            active: vec![false; n],
            sums: vec![0.0; n],
        }
    }

    #[must_use]
    pub fn topology(&self) -> &SolverTopology {
        &self.topology
    }

    fn sensor_count(&self) -> usize {
        self.topology.bias_neuron_count + self.topology.input_neuron_count
    }

    fn active_out(&self, i: usize) -> f64 {
        if self.counts[i] > 0 {
            self.signals[i]
        } else {
            0.0
        }
    }

    fn active_out_td(&self, i: usize) -> f64 {
        if self.counts[i] > 1 {
            self.previous[i]
        } else {
            0.0
        }
    }

    /// Output of the bias slots: 0 until sensors are loaded, then 1.0.
    fn bias_signal(&self) -> f64 {
        if self.topology.bias_neuron_count > 0 {
            self.active_out(0)
        } else {
            0.0
        }
    }

    fn set_signal(&mut self, i: usize, value: f64) {
        self.previous[i] = self.signals[i];
        self.signals[i] = value;
        self.counts[i] += 1;
    }

    fn output_is_off(&self) -> bool {
        let start = self.sensor_count();
        self.counts[start..start + self.topology.output_neuron_count]
            .iter()
            .any(|&c| c == 0)
    }

    /// One propagation step. Returns the largest signal change.
    fn step(&mut self) -> Result<f64> {
        let sensors = self.sensor_count();
        let bias = self.bias_signal();
        for k in 0..self.topology.neuron_order.len() {
            let t = self.topology.neuron_order[k];
            let mut sum = 0.0;
            let mut live = false;
            for link in &self.topology.connections[self.topology.incoming[t].clone()] {
                let s = link.source_index;
                if link.time_delayed {
                    sum += link.weight * self.active_out_td(s);
                } else {
                    sum += link.weight * self.active_out(s);
                    if s < sensors || self.active[s] {
                        live = true;
                    }
                }
            }
            if self.topology.biased[t] {
                sum += self.topology.bias_list[t] * bias;
                live = true;
            }
            self.sums[t] = sum;
            if live {
                self.active[t] = true;
            }
        }

        let mut delta: f64 = 0.0;
        for k in 0..self.topology.neuron_order.len() {
            let t = self.topology.neuron_order[k];
            if self.active[t] {
                let out = self.topology.activation_functions[t].activate(self.sums[t])?;
                delta = delta.max((out - self.signals[t]).abs());
                self.set_signal(t, out);
            }
        }

        for m in 0..self.topology.modules.len() {
            let inputs: Vec<f64> = self.topology.modules[m]
                .input_indices
                .iter()
                .map(|&i| self.active_out(i))
                .collect();
            let module = &self.topology.modules[m];
            let outputs = module.activation_type.activate_module(&inputs)?;
            if outputs.len() != module.output_indices.len() {
                return Err(NetError::ModuleArity {
                    id: module.control_id,
                    got: outputs.len(),
                    expected: module.output_indices.len(),
                });
            }
            let targets = module.output_indices.clone();
            for (t, value) in targets.into_iter().zip(outputs) {
                delta = delta.max((value - self.signals[t]).abs());
                self.set_signal(t, value);
            }
        }
        Ok(delta)
    }
}

impl Solver for CompiledSolver {
    fn activate_steps(&mut self, max_steps: usize) -> Result<bool> {
        let mut one_time = false;
        let mut abort_count = 0;
        while self.output_is_off() || !one_time {
            if abort_count >= max_steps {
                tracing::warn!(max_steps, "Compiled solver outputs did not settle");
                return Err(NetError::ExceededMaxActivationAttempts(max_steps));
            }
            self.step()?;
            one_time = true;
            abort_count += 1;
        }
        Ok(true)
    }

    fn forward_steps(&mut self, steps: usize) -> Result<bool> {
        let mut res = false;
        for _ in 0..steps {
            res = self.activate()?;
        }
        Ok(res)
    }

    fn recursive_steps(&mut self) -> Result<bool> {
        Err(NetError::NotImplemented("RecursiveSteps"))
    }

    fn relax(&mut self, max_steps: usize, max_allowed_signal_delta: f64) -> Result<bool> {
        for _ in 0..max_steps {
            if self.step()? <= max_allowed_signal_delta {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn flush(&mut self) -> Result<bool> {
        self.signals.fill(0.0);
        self.previous.fill(0.0);
        self.counts.fill(0);
        self.active.fill(false);
        self.sums.fill(0.0);
        Ok(true)
    }

    /// Accepts true inputs only; bias slots are always loaded with 1.0.
    fn load_sensors(&mut self, inputs: &[f64]) -> Result<()> {
        if inputs.len() != self.topology.input_neuron_count {
            return Err(NetError::UnsupportedSensorsArraySize {
                got: inputs.len(),
                expected: self.topology.input_neuron_count,
            });
        }
        let bias = self.topology.bias_neuron_count;
        let order = self.topology.sensor_order.clone();
        let mut values = inputs.iter();
        for i in order {
            let value = if i < bias {
                1.0
            } else {
                values.next().copied().unwrap_or_default()
            };
            self.set_signal(i, value);
        }
        Ok(())
    }

    fn read_outputs(&self) -> Vec<f64> {
        let start = self.sensor_count();
        self.signals[start..start + self.topology.output_neuron_count].to_vec()
    }

    fn node_count(&self) -> usize {
        self.topology.total_neuron_count + self.topology.modules.len()
    }

    fn link_count(&self) -> usize {
        let module_links: usize = self
            .topology
            .modules
            .iter()
            .map(|m| m.input_indices.len() + m.output_indices.len())
            .sum();
        self.topology.connections.len() + self.topology.bias_link_count + module_links
    }
}
