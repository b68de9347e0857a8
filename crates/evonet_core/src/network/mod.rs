//! Phenotype networks: an index-stable node table with links stored by
//! index, evaluated in place by the activation engine.

pub mod compile;
pub mod forward;
pub mod node;
pub mod topology;

pub use node::{Link, Node, NodeIndex, NodeKind};

use crate::error::{NetError, Result};
use evonet_data::{ActivationType, NeuronType};
use std::collections::HashMap;
use std::fmt::Write as _;

/// Step budget used by [`crate::solver::Solver::activate`].
pub const DEFAULT_ACTIVATION_STEPS: usize = 20;

/// Executable phenotype graph.
#[derive(Debug, Clone)]
pub struct Network {
    pub id: usize,
    pub name: String,
    pub(crate) nodes: Vec<Node>,
    pub(crate) links: Vec<Link>,
    pub(crate) inputs: Vec<NodeIndex>,
    pub(crate) outputs: Vec<NodeIndex>,
    /// Every non-control node, in table order.
    pub(crate) all_nodes: Vec<NodeIndex>,
    pub(crate) control_nodes: Vec<NodeIndex>,
}

impl Network {
    /// Creates a network without control nodes.
    pub fn new(
        id: usize,
        nodes: Vec<Node>,
        links: Vec<Link>,
        inputs: Vec<NodeIndex>,
        outputs: Vec<NodeIndex>,
    ) -> Result<Self> {
        Self::new_modular(id, nodes, links, inputs, outputs, Vec::new())
    }

    /// Creates a network whose `control` nodes compose sub-network modules.
    ///
    /// Links touching a control node are registered on the control node only.
    /// Every other link is registered as incoming on its target and outgoing
    /// on its source.
    pub fn new_modular(
        id: usize,
        mut nodes: Vec<Node>,
        links: Vec<Link>,
        inputs: Vec<NodeIndex>,
        outputs: Vec<NodeIndex>,
        control: Vec<NodeIndex>,
    ) -> Result<Self> {
        let len = nodes.len();
        let check = |index: NodeIndex| {
            if index < len {
                Ok(())
            } else {
                Err(NetError::LinkOutOfRange { index, len })
            }
        };

        for &idx in &inputs {
            check(idx)?;
            require(&nodes[idx], nodes[idx].is_sensor(), "an input")?;
        }
        for &idx in &outputs {
            check(idx)?;
            require(&nodes[idx], nodes[idx].neuron_type == NeuronType::Output, "an output")?;
        }
        for &idx in &control {
            check(idx)?;
            require(&nodes[idx], nodes[idx].kind() == NodeKind::ControlModule, "a control node")?;
        }
        for (idx, node) in nodes.iter().enumerate() {
            if node.kind() == NodeKind::ControlModule && !control.contains(&idx) {
                return Err(NetError::WrongNodeCategory {
                    id: node.id,
                    expected: "a listed control node",
                    actual: node.neuron_type,
                });
            }
        }

        for (li, link) in links.iter().enumerate() {
            check(link.source)?;
            check(link.target)?;
            let source_ctrl = nodes[link.source].kind() == NodeKind::ControlModule;
            let target_ctrl = nodes[link.target].kind() == NodeKind::ControlModule;
            match (source_ctrl, target_ctrl) {
                (true, true) => {
                    return Err(NetError::WrongNodeCategory {
                        id: nodes[link.target].id,
                        expected: "a module endpoint",
                        actual: NeuronType::Control,
                    })
                }
                (true, false) => nodes[link.source].outgoing.push(li),
                (false, true) => nodes[link.target].incoming.push(li),
                (false, false) => {
                    nodes[link.target].incoming.push(li);
                    nodes[link.source].outgoing.push(li);
                }
            }
        }

        let all_nodes = (0..len).filter(|i| !control.contains(i)).collect();
        Ok(Self {
            id,
            name: String::new(),
            nodes,
            links,
            inputs,
            outputs,
            all_nodes,
            control_nodes: control,
        })
    }

    #[must_use]
    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn node(&self, index: NodeIndex) -> Option<&Node> {
        self.nodes.get(index)
    }

    #[must_use]
    pub fn link(&self, index: usize) -> Option<&Link> {
        self.links.get(index)
    }

    /// Index of the node carrying gene id `id`.
    #[must_use]
    pub fn index_of(&self, id: usize) -> Option<NodeIndex> {
        self.nodes.iter().position(|n| n.id == id)
    }

    #[must_use]
    pub fn inputs(&self) -> &[NodeIndex] {
        &self.inputs
    }

    #[must_use]
    pub fn outputs(&self) -> &[NodeIndex] {
        &self.outputs
    }

    /// Every node except control nodes.
    #[must_use]
    pub fn all_nodes(&self) -> &[NodeIndex] {
        &self.all_nodes
    }

    #[must_use]
    pub fn control_nodes(&self) -> &[NodeIndex] {
        &self.control_nodes
    }

    #[must_use]
    pub fn is_modular(&self) -> bool {
        !self.control_nodes.is_empty()
    }

    /// Adds a link between two existing, non-control nodes.
    pub fn add_link(&mut self, link: Link) -> Result<usize> {
        let len = self.nodes.len();
        for index in [link.source, link.target] {
            if index >= len {
                return Err(NetError::LinkOutOfRange { index, len });
            }
            let node = &self.nodes[index];
            require(node, node.kind() == NodeKind::Neuron, "a link endpoint")?;
        }
        let li = self.links.len();
        self.links.push(link);
        self.nodes[link.target].incoming.push(li);
        self.nodes[link.source].outgoing.push(li);
        Ok(li)
    }

    /// Number of nodes, control nodes included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.all_nodes.len() + self.control_nodes.len()
    }

    /// Number of links, recounted from the node table on every call.
    #[must_use]
    pub fn link_count(&self) -> usize {
        let mut count: usize = self
            .all_nodes
            .iter()
            .map(|&i| self.nodes[i].incoming.len())
            .sum();
        for &ci in &self.control_nodes {
            count += self.nodes[ci].incoming.len() + self.nodes[ci].outgoing.len();
        }
        count
    }

    #[must_use]
    pub fn complexity(&self) -> usize {
        self.node_count() + self.link_count()
    }

    /// Summary of the output node registers.
    #[must_use]
    pub fn print_activation(&self) -> String {
        self.print_nodes("outputs", "Output", &self.outputs)
    }

    /// Summary of the input node registers.
    #[must_use]
    pub fn print_input(&self) -> String {
        self.print_nodes("inputs", "Input", &self.inputs)
    }

    fn print_nodes(&self, title: &str, label: &str, list: &[NodeIndex]) -> String {
        let mut out = format!("Network {} with id {} {}: (", self.name, self.id, title);
        for (i, &idx) in list.iter().enumerate() {
            let _ = write!(out, "[{} #{}: {}] ", label, i, self.nodes[idx]);
        }
        out.push(')');
        out
    }
}

fn require(node: &Node, ok: bool, expected: &'static str) -> Result<()> {
    if ok {
        Ok(())
    } else {
        Err(NetError::WrongNodeCategory {
            id: node.id,
            expected,
            actual: node.neuron_type,
        })
    }
}

/// Builds a [`Network`] from node and link descriptions keyed by gene id.
///
/// Inputs are the sensors and outputs the output neurons, both in the
/// order they were added.
#[derive(Debug, Default)]
pub struct NetworkBuilder {
    id: usize,
    name: String,
    nodes: Vec<Node>,
    links: Vec<Link>,
    lookup: HashMap<usize, NodeIndex>,
}

impl NetworkBuilder {
    #[must_use]
    pub fn new(id: usize) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = name.into();
        self
    }

    pub fn add_node(
        &mut self,
        id: usize,
        neuron_type: NeuronType,
        activation: ActivationType,
    ) -> Result<NodeIndex> {
        if self.lookup.contains_key(&id) {
            return Err(NetError::DuplicateNode(id));
        }
        let idx = self.nodes.len();
        self.nodes.push(Node::new(id, neuron_type, activation));
        self.lookup.insert(id, idx);
        Ok(idx)
    }

    pub fn connect(
        &mut self,
        from: usize,
        to: usize,
        weight: f64,
        recurrent: bool,
        time_delayed: bool,
    ) -> Result<()> {
        let source = *self
            .lookup
            .get(&from)
            .ok_or(NetError::MissingNode { role: "source", id: from })?;
        let target = *self
            .lookup
            .get(&to)
            .ok_or(NetError::MissingNode { role: "target", id: to })?;
        self.links.push(
            Link::new(source, target, weight)
                .recurrent(recurrent)
                .time_delayed(time_delayed),
        );
        Ok(())
    }

    pub fn build(self) -> Result<Network> {
        let pick = |pred: fn(&Node) -> bool| -> Vec<NodeIndex> {
            self.nodes
                .iter()
                .enumerate()
                .filter(|(_, n)| pred(n))
                .map(|(i, _)| i)
                .collect()
        };
        let inputs = pick(|n| n.is_sensor());
        let outputs = pick(|n| n.neuron_type == NeuronType::Output);
        let control = pick(|n| n.kind() == NodeKind::ControlModule);
        let net = Network::new_modular(self.id, self.nodes, self.links, inputs, outputs, control)?;
        Ok(net.with_name(self.name))
    }
}
