use super::*;
use crate::activation::ActivationLogic;
use crate::solver::Solver;

impl Network {
    /// True while at least one output has never activated.
    #[must_use]
    pub fn output_is_off(&self) -> bool {
        self.outputs
            .iter()
            .any(|&i| self.nodes[i].activations_count == 0)
    }

    /// One propagation step: sum, activate, then run control modules.
    fn step(&mut self) -> Result<()> {
        let Self {
            nodes,
            links,
            all_nodes,
            control_nodes,
            ..
        } = self;

        for &idx in all_nodes.iter() {
            if !nodes[idx].is_neuron() {
                continue;
            }
            let mut sum = 0.0;
            let mut live = false;
            for &li in &nodes[idx].incoming {
                let link = &links[li];
                let source = &nodes[link.source];
                if link.is_time_delayed {
                    sum += link.weight * source.active_out_td();
                } else {
                    sum += link.weight * source.active_out();
                    if source.is_active || source.is_sensor() {
                        live = true;
                    }
                }
            }
            let node = &mut nodes[idx];
            node.activation_sum = sum;
            if live {
                node.is_active = true;
            }
        }

        for &idx in all_nodes.iter() {
            let node = &mut nodes[idx];
            if node.is_neuron() && node.is_active {
                let out = node.activation_type.activate(node.activation_sum)?;
                node.set_activation(out);
            }
        }

        for &ci in control_nodes.iter() {
            nodes[ci].is_active = false;
            let inputs: Vec<f64> = nodes[ci]
                .incoming
                .iter()
                .map(|&li| nodes[links[li].source].active_out())
                .collect();
            let outputs = nodes[ci].activation_type.activate_module(&inputs)?;
            if outputs.len() != nodes[ci].outgoing.len() {
                return Err(NetError::ModuleArity {
                    id: nodes[ci].id,
                    got: outputs.len(),
                    expected: nodes[ci].outgoing.len(),
                });
            }
            for (k, value) in outputs.into_iter().enumerate() {
                let target = links[nodes[ci].outgoing[k]].target;
                nodes[target].set_activation(value);
            }
            nodes[ci].is_active = true;
        }
        Ok(())
    }
}

impl Solver for Network {
    fn activate_steps(&mut self, max_steps: usize) -> Result<bool> {
        let mut one_time = false;
        let mut abort_count = 0;
        while self.output_is_off() || !one_time {
            if abort_count >= max_steps {
                tracing::warn!(network = self.id, max_steps, "Network outputs did not settle");
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

    fn relax(&mut self, _max_steps: usize, _max_allowed_signal_delta: f64) -> Result<bool> {
        Err(NetError::NotImplemented("Relax"))
    }

    /// Resets every non-control node, stopping at the first node that fails
    /// its post-reset check. Nodes after it keep their state.
    fn flush(&mut self) -> Result<bool> {
        for &idx in &self.all_nodes {
            let node = &mut self.nodes[idx];
            node.flushback();
            node.flushback_check()?;
        }
        Ok(true)
    }

    /// Loads sensors in declared order. A vector one bias short of the input
    /// slots fills true inputs only and forces 1.0 into bias nodes.
    fn load_sensors(&mut self, sensors: &[f64]) -> Result<()> {
        if sensors.len() == self.inputs.len() {
            for (&idx, &value) in self.inputs.iter().zip(sensors) {
                self.nodes[idx].sensor_load(value);
            }
            return Ok(());
        }

        let true_inputs = self
            .inputs
            .iter()
            .filter(|&&i| self.nodes[i].neuron_type == NeuronType::Input)
            .count();
        if sensors.len() != true_inputs {
            return Err(NetError::UnsupportedSensorsArraySize {
                got: sensors.len(),
                expected: self.inputs.len(),
            });
        }
        let mut values = sensors.iter();
        for &idx in &self.inputs {
            let node = &mut self.nodes[idx];
            let value = match node.neuron_type {
                NeuronType::Input => values.next().copied().unwrap_or_default(),
                _ => 1.0,
            };
            node.sensor_load(value);
        }
        Ok(())
    }

    fn read_outputs(&self) -> Vec<f64> {
        self.outputs
            .iter()
            .map(|&i| self.nodes[i].activation)
            .collect()
    }

    fn node_count(&self) -> usize {
        Network::node_count(self)
    }

    fn link_count(&self) -> usize {
        Network::link_count(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn direct(activation: ActivationType) -> Network {
        let mut b = NetworkBuilder::new(1);
        b.add_node(1, NeuronType::Bias, ActivationType::Null).unwrap();
        b.add_node(2, NeuronType::Input, ActivationType::Null).unwrap();
        b.add_node(3, NeuronType::Output, activation).unwrap();
        b.connect(1, 3, 0.5, false, false).unwrap();
        b.connect(2, 3, 2.0, false, false).unwrap();
        b.build().unwrap()
    }

    #[test]
    fn test_single_step_linear() {
        let mut net = direct(ActivationType::Linear);
        net.load_sensors(&[3.0]).unwrap();
        assert!(net.activate().unwrap());
        assert_eq!(net.read_outputs(), vec![6.5]);
    }

    #[test]
    fn test_zero_budget_fails() {
        let mut net = direct(ActivationType::Linear);
        net.load_sensors(&[1.0]).unwrap();
        assert!(matches!(
            net.activate_steps(0),
            Err(NetError::ExceededMaxActivationAttempts(0))
        ));
    }

    #[test]
    fn test_time_delayed_link_reads_previous_step() {
        let mut b = NetworkBuilder::new(1);
        b.add_node(1, NeuronType::Input, ActivationType::Null).unwrap();
        b.add_node(2, NeuronType::Hidden, ActivationType::Linear).unwrap();
        b.add_node(3, NeuronType::Output, ActivationType::Linear).unwrap();
        b.connect(1, 2, 1.0, false, false).unwrap();
        b.connect(1, 3, 0.0, false, false).unwrap();
        b.connect(2, 3, 1.0, true, true).unwrap();
        let mut net = b.build().unwrap();

        let mut outputs = Vec::new();
        for value in [1.0, 2.0, 3.0, 4.0] {
            net.load_sensors(&[value]).unwrap();
            net.activate().unwrap();
            outputs.push(net.read_outputs()[0]);
        }
        // hidden activations lag the input by one step, the delayed link by one more
        assert_eq!(outputs, vec![0.0, 0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_relaxation_strategies_are_not_implemented() {
        let mut net = direct(ActivationType::Linear);
        assert!(matches!(net.recursive_steps(), Err(NetError::NotImplemented(_))));
        assert!(matches!(net.relax(10, 0.1), Err(NetError::NotImplemented(_))));
    }

    #[test]
    fn test_load_sensors_rejects_bad_length() {
        let mut net = direct(ActivationType::Linear);
        assert!(matches!(
            net.load_sensors(&[1.0, 2.0, 3.0]),
            Err(NetError::UnsupportedSensorsArraySize { got: 3, expected: 2 })
        ));
    }

    #[test]
    fn test_flush_resets_every_node() {
        let mut net = direct(ActivationType::Linear);
        net.load_sensors(&[1.0]).unwrap();
        net.activate().unwrap();
        assert!(net.flush().unwrap());
        for &i in net.all_nodes() {
            assert_eq!(net.node(i).unwrap().activations_count, 0);
        }
    }

    #[test]
    fn test_module_arity_mismatch() {
        let mut b = NetworkBuilder::new(1);
        b.add_node(1, NeuronType::Input, ActivationType::Null).unwrap();
        b.add_node(2, NeuronType::Output, ActivationType::Linear).unwrap();
        b.add_node(3, NeuronType::Output, ActivationType::Linear).unwrap();
        b.add_node(9, NeuronType::Control, ActivationType::ModuleMin).unwrap();
        b.connect(1, 9, 1.0, false, false).unwrap();
        b.connect(9, 2, 1.0, false, false).unwrap();
        b.connect(9, 3, 1.0, false, false).unwrap();
        let mut net = b.build().unwrap();
        net.load_sensors(&[0.5]).unwrap();
        assert!(matches!(
            net.activate(),
            Err(NetError::ModuleArity { id: 9, got: 1, expected: 2 })
        ));
    }
}
