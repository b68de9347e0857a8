use super::*;
use crate::solver::{CompiledLink, CompiledModule, CompiledSolver, SolverTopology};

impl Network {
    /// Builds an index-addressed solver for repeated evaluation.
    ///
    /// The result no longer references this network; rebuild it after any
    /// structural change.
    pub fn compile(&self) -> Result<CompiledSolver> {
        let mut bias_list = Vec::new();
        let mut in_list = Vec::new();
        let mut hidden_list = Vec::new();
        for &idx in &self.all_nodes {
            match self.nodes[idx].neuron_type {
                NeuronType::Bias => bias_list.push(idx),
                NeuronType::Input => in_list.push(idx),
                NeuronType::Hidden => hidden_list.push(idx),
                NeuronType::Output | NeuronType::Control => {}
            }
        }

        let mut lookup: HashMap<NodeIndex, usize> = HashMap::new();
        let mut activations = Vec::new();
        for &idx in bias_list
            .iter()
            .chain(&in_list)
            .chain(&self.outputs)
            .chain(&hidden_list)
        {
            lookup.insert(idx, activations.len());
            activations.push(self.nodes[idx].activation_type);
        }
        let total = activations.len();

        let mut biases = vec![0.0; total];
        let mut biased = vec![false; total];
        let mut bias_link_count = 0;
        let mut connections = Vec::new();
        let mut incoming = vec![0..0; total];
        for &idx in in_list.iter().chain(&hidden_list).chain(&self.outputs) {
            let target = *lookup.get(&idx).ok_or(NetError::MissingNode {
                role: "target",
                id: self.nodes[idx].id,
            })?;
            let start = connections.len();
            for &li in &self.nodes[idx].incoming {
                let link = &self.links[li];
                let source_node = &self.nodes[link.source];
                let source = *lookup.get(&link.source).ok_or(NetError::MissingNode {
                    role: "source",
                    id: source_node.id,
                })?;
                if source_node.neuron_type == NeuronType::Bias && !link.is_time_delayed {
                    biases[target] += link.weight;
                    biased[target] = true;
                    bias_link_count += 1;
                } else {
                    connections.push(CompiledLink {
                        source_index: source,
                        target_index: target,
                        weight: link.weight,
                        time_delayed: link.is_time_delayed,
                    });
                }
            }
            incoming[target] = start..connections.len();
        }

        let mut modules = Vec::with_capacity(self.control_nodes.len());
        for &ci in &self.control_nodes {
            let control = &self.nodes[ci];
            let resolve = |li: &usize, role: &'static str, endpoint: NodeIndex| {
                lookup.get(&endpoint).copied().ok_or(NetError::MissingNode {
                    role,
                    id: self.nodes[endpoint].id,
                })
                .map_err(|e| e.with_context(format!("control node {} link {}", control.id, li)))
            };
            let input_indices = control
                .incoming
                .iter()
                .map(|li| resolve(li, "input", self.links[*li].source))
                .collect::<Result<Vec<_>>>()?;
            let output_indices = control
                .outgoing
                .iter()
                .map(|li| resolve(li, "output", self.links[*li].target))
                .collect::<Result<Vec<_>>>()?;
            modules.push(CompiledModule {
                control_id: control.id,
                input_indices,
                output_indices,
                activation_type: control.activation_type,
            });
        }

        let neuron_order = self
            .all_nodes
            .iter()
            .filter(|&&i| self.nodes[i].is_neuron())
            .filter_map(|i| lookup.get(i).copied())
            .collect();
        let sensor_order = self
            .inputs
            .iter()
            .filter_map(|i| lookup.get(i).copied())
            .collect();

        tracing::debug!(
            network = self.id,
            neurons = total,
            links = connections.len(),
            modules = modules.len(),
            "Compiled network solver"
        );

        Ok(CompiledSolver::new(SolverTopology {
            bias_neuron_count: bias_list.len(),
            input_neuron_count: in_list.len(),
            output_neuron_count: self.outputs.len(),
            total_neuron_count: total,
            activation_functions: activations,
            bias_list: biases,
            biased,
            bias_link_count,
            connections,
            incoming,
            neuron_order,
            sensor_order,
            modules,
        }))
    }
}
