use crate::error::{NetError, Result};
use evonet_data::{ActivationType, NeuronType};
use std::fmt;

/// Position of a node in its network's node table.
pub type NodeIndex = usize;

/// Behavioural variant of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Sensor or neuron driven by a single activation function.
    Neuron,
    /// Module boundary mapping several node values onto others.
    ControlModule,
}

/// A neuron or control node together with its activation registers.
#[derive(Debug, Clone)]
pub struct Node {
    /// Gene id, unique within a network.
    pub id: usize,
    pub neuron_type: NeuronType,
    pub activation_type: ActivationType,
    /// Current output.
    pub activation: f64,
    /// Sum of incoming signals for the step being computed.
    pub activation_sum: f64,
    /// Times this node has been activated or loaded since the last flush.
    pub activations_count: u32,
    pub(crate) is_active: bool,
    pub(crate) last_activation: f64,
    pub(crate) last_activation2: f64,
    pub(crate) incoming: Vec<usize>,
    pub(crate) outgoing: Vec<usize>,
}

impl Node {
    #[must_use]
    pub fn new(id: usize, neuron_type: NeuronType, activation_type: ActivationType) -> Self {
        Self {
            id,
            neuron_type,
            activation_type,
            activation: 0.0,
            activation_sum: 0.0,
            activations_count: 0,
            is_active: false,
            last_activation: 0.0,
            last_activation2: 0.0,
            incoming: Vec::new(),
            outgoing: Vec::new(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> NodeKind {
        match self.neuron_type {
            NeuronType::Control => NodeKind::ControlModule,
            _ => NodeKind::Neuron,
        }
    }

    #[must_use]
    pub fn is_sensor(&self) -> bool {
        self.neuron_type.is_sensor()
    }

    #[must_use]
    pub fn is_neuron(&self) -> bool {
        self.neuron_type.is_neuron()
    }

    /// Whether the node has received live input since the last flush.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Indices of incoming links in the owning network.
    #[must_use]
    pub fn incoming(&self) -> &[usize] {
        &self.incoming
    }

    /// Indices of outgoing links in the owning network.
    #[must_use]
    pub fn outgoing(&self) -> &[usize] {
        &self.outgoing
    }

    /// Output seen by ordinary links; zero until the node first activates.
    #[must_use]
    pub fn active_out(&self) -> f64 {
        if self.activations_count > 0 {
            self.activation
        } else {
            0.0
        }
    }

    /// Output seen by time-delayed links: the previous step's value.
    #[must_use]
    pub fn active_out_td(&self) -> f64 {
        if self.activations_count > 1 {
            self.last_activation
        } else {
            0.0
        }
    }

    /// Loads a sensor value. Returns false for non-sensor nodes.
    pub fn sensor_load(&mut self, value: f64) -> bool {
        if !self.is_sensor() {
            return false;
        }
        self.save_activations();
        self.activations_count += 1;
        self.activation = value;
        true
    }

    pub(crate) fn set_activation(&mut self, value: f64) {
        self.save_activations();
        self.activation = value;
        self.activations_count += 1;
    }

    fn save_activations(&mut self) {
        self.last_activation2 = self.last_activation;
        self.last_activation = self.activation;
    }

    /// Clears activation registers and counters.
    pub fn flushback(&mut self) {
        self.activations_count = 0;
        self.activation = 0.0;
        self.activation_sum = 0.0;
        self.last_activation = 0.0;
        self.last_activation2 = 0.0;
        self.is_active = false;
    }

    /// Verifies that a flush left no state behind.
    pub fn flushback_check(&self) -> Result<()> {
        let reason = if self.activations_count > 0 {
            format!("activation count {}", self.activations_count)
        } else if self.activation != 0.0 {
            format!("activation {}", self.activation)
        } else if self.last_activation != 0.0 {
            format!("previous activation {}", self.last_activation)
        } else if self.last_activation2 != 0.0 {
            format!("previous activation 2 {}", self.last_activation2)
        } else {
            return Ok(());
        };
        Err(NetError::FlushCheck {
            id: self.id,
            reason,
        })
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({} id:{:3}, {} -> step: {} = {:.3} {:.3})",
            self.neuron_type,
            self.id,
            self.activation_type,
            self.activations_count,
            self.activation,
            self.activation_sum
        )
    }
}

/// Directed, weighted connection between two nodes of one network.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    pub source: NodeIndex,
    pub target: NodeIndex,
    pub weight: f64,
    pub is_recurrent: bool,
    pub is_time_delayed: bool,
}

impl Link {
    #[must_use]
    pub fn new(source: NodeIndex, target: NodeIndex, weight: f64) -> Self {
        Self {
            source,
            target,
            weight,
            is_recurrent: false,
            is_time_delayed: false,
        }
    }

    #[must_use]
    pub fn recurrent(mut self, recurrent: bool) -> Self {
        self.is_recurrent = recurrent;
        self
    }

    #[must_use]
    pub fn time_delayed(mut self, time_delayed: bool) -> Self {
        self.is_time_delayed = time_delayed;
        self
    }
}
