//! Line-oriented text form of a [`Genome`].
//!
//! ```text
//! genomestart 7
//! node 1 bias null
//! node 2 input null
//! node 3 output sigmoid_steepened
//! gene 1 3 0.5 false false 1 true
//! gene 2 3 -1.25 false false 2 true
//! module 10 module_max 2,3 3
//! genomeend 7
//! ```

use crate::error::{NetError, Result};
use evonet_data::{Genome, LinkGene, ModuleGene, NodeGene};
use std::io::{BufRead, Write};
use std::str::FromStr;

pub fn write_genome<W: Write>(genome: &Genome, w: &mut W) -> Result<()> {
    writeln!(w, "genomestart {}", genome.id)?;
    for node in &genome.nodes {
        writeln!(w, "node {} {} {}", node.id, node.neuron_type, node.activation)?;
    }
    for gene in &genome.genes {
        writeln!(
            w,
            "gene {} {} {} {} {} {} {}",
            gene.from,
            gene.to,
            gene.weight,
            gene.recurrent,
            gene.time_delayed,
            gene.innovation,
            gene.enabled
        )?;
    }
    for module in &genome.modules {
        writeln!(
            w,
            "module {} {} {} {}",
            module.id,
            module.activation,
            join_ids(&module.inputs),
            join_ids(&module.outputs)
        )?;
    }
    writeln!(w, "genomeend {}", genome.id)?;
    Ok(())
}

/// Reads one genome, consuming input up to and including its end record.
pub fn read_genome<R: BufRead>(r: &mut R, id: usize) -> Result<Genome> {
    let mut genome = Genome::new(id);
    let mut started = false;
    let mut line = String::new();
    loop {
        line.clear();
        if r.read_line(&mut line)? == 0 {
            return Err(NetError::malformed(format!(
                "genome {id} ended before its end record"
            )));
        }
        let mut fields = line.split_whitespace();
        let Some(keyword) = fields.next() else {
            continue;
        };
        let rest: Vec<&str> = fields.collect();

        match (keyword, started) {
            ("genomestart", false) => {
                let header: usize = parse_field(&rest, 0, "genome id")?;
                if header != id {
                    return Err(NetError::malformed(format!(
                        "genome id {header} does not match expected {id}"
                    )));
                }
                started = true;
            }
            (_, false) => {
                return Err(NetError::malformed(format!(
                    "expected genomestart, found {keyword}"
                )));
            }
            ("node", true) => genome.nodes.push(NodeGene {
                id: parse_field(&rest, 0, "node id")?,
                neuron_type: parse_field(&rest, 1, "neuron type")?,
                activation: parse_field(&rest, 2, "activation")?,
            }),
            ("gene", true) => genome.genes.push(LinkGene {
                from: parse_field(&rest, 0, "gene source")?,
                to: parse_field(&rest, 1, "gene target")?,
                weight: parse_field(&rest, 2, "gene weight")?,
                recurrent: parse_field(&rest, 3, "recurrent flag")?,
                time_delayed: parse_field(&rest, 4, "time-delayed flag")?,
                innovation: parse_field(&rest, 5, "innovation")?,
                enabled: parse_field(&rest, 6, "enabled flag")?,
            }),
            ("module", true) => genome.modules.push(ModuleGene {
                id: parse_field(&rest, 0, "module id")?,
                activation: parse_field(&rest, 1, "module activation")?,
                inputs: parse_ids(field(&rest, 2, "module inputs")?)?,
                outputs: parse_ids(field(&rest, 3, "module outputs")?)?,
            }),
            ("genomeend", true) => {
                let footer: usize = parse_field(&rest, 0, "genome id")?;
                if footer != id {
                    return Err(NetError::malformed(format!(
                        "genome end id {footer} does not match expected {id}"
                    )));
                }
                return Ok(genome);
            }
            (other, true) => {
                return Err(NetError::malformed(format!("unknown genome record: {other}")));
            }
        }
    }
}

fn field<'a>(rest: &[&'a str], at: usize, what: &str) -> Result<&'a str> {
    rest.get(at)
        .copied()
        .ok_or_else(|| NetError::malformed(format!("missing {what}")))
}

fn parse_field<T>(rest: &[&str], at: usize, what: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = field(rest, at, what)?;
    raw.parse()
        .map_err(|e| NetError::malformed(format!("bad {what} {raw:?}: {e}")))
}

fn join_ids(ids: &[usize]) -> String {
    if ids.is_empty() {
        return "-".to_string();
    }
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

fn parse_ids(raw: &str) -> Result<Vec<usize>> {
    if raw == "-" {
        return Ok(Vec::new());
    }
    raw.split(',')
        .map(|s| {
            s.parse()
                .map_err(|e| NetError::malformed(format!("bad module node id {s:?}: {e}")))
        })
        .collect()
}
