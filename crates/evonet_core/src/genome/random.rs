use evonet_data::{ActivationType, Genome, LinkGene, NeuronType, NodeGene};
use rand::seq::SliceRandom;
use rand::Rng;

/// Creates a random genome: one bias node, then `inputs`, `outputs` and
/// `hidden` nodes with consecutive ids starting at 1.
///
/// Every hidden node reads from at least one sensor and every output from at
/// least one sensor or hidden node. Each further candidate link is added with
/// probability `link_prob`. Outputs may also feed hidden nodes back through
/// recurrent, time-delayed links.
pub fn create_genome_random_with_rng<R: Rng>(
    id: usize,
    inputs: usize,
    outputs: usize,
    hidden: usize,
    link_prob: f64,
    rng: &mut R,
) -> Genome {
    let p = if link_prob.is_nan() {
        0.0
    } else {
        link_prob.clamp(0.0, 1.0)
    };
    let mut genome = Genome::new(id);

    let mut push = |neuron_type: NeuronType, count: usize| -> Vec<usize> {
        (0..count)
            .map(|_| {
                let node_id = genome.nodes.len() + 1;
                let activation = if neuron_type.is_sensor() {
                    ActivationType::Null
                } else {
                    ActivationType::SigmoidSteepened
                };
                genome.nodes.push(NodeGene {
                    id: node_id,
                    neuron_type,
                    activation,
                });
                node_id
            })
            .collect()
    };
    let mut sensors = push(NeuronType::Bias, 1);
    sensors.extend(push(NeuronType::Input, inputs));
    let output_ids = push(NeuronType::Output, outputs);
    let hidden_ids = push(NeuronType::Hidden, hidden);

    let mut links = Vec::new();
    for &h in &hidden_ids {
        connect_layer(&sensors, h, p, rng, &mut links);
    }
    let upstream: Vec<usize> = sensors.iter().chain(&hidden_ids).copied().collect();
    for &o in &output_ids {
        connect_layer(&upstream, o, p, rng, &mut links);
    }

    for (innovation, (from, to)) in links.into_iter().enumerate() {
        genome.genes.push(LinkGene {
            from,
            to,
            weight: rng.gen_range(-1.0..1.0),
            recurrent: false,
            time_delayed: false,
            innovation: innovation + 1,
            enabled: true,
        });
    }

    for &o in &output_ids {
        for &h in &hidden_ids {
            if rng.gen_bool(p * 0.25) {
                let innovation = genome.next_innovation();
                genome.genes.push(LinkGene {
                    from: o,
                    to: h,
                    weight: rng.gen_range(-1.0..1.0),
                    recurrent: true,
                    time_delayed: true,
                    innovation,
                    enabled: true,
                });
            }
        }
    }
    genome
}

fn connect_layer<R: Rng>(
    sources: &[usize],
    target: usize,
    p: f64,
    rng: &mut R,
    links: &mut Vec<(usize, usize)>,
) {
    let before = links.len();
    for &s in sources {
        if rng.gen_bool(p) {
            links.push((s, target));
        }
    }
    if links.len() == before {
        if let Some(&s) = sources.choose(rng) {
            links.push((s, target));
        }
    }
}
