//! Organisms: a genotype, the phenotype it expresses, and the bookkeeping an
//! evolutionary epoch keeps about them.
//!
//! ## Wire format
//!
//! An organism travels between evaluation contexts as one header line
//! `<fitness> <generation> <genome id>` immediately followed by the genome's
//! own serialization. The phenotype is never sent; the receiver rebuilds it
//! through genesis.

use crate::error::{NetError, Result};
use crate::genome::Encoding;
use crate::network::Network;
use std::cmp::Ordering;
use std::fmt;
use std::io::{BufRead, Cursor, Write};

/// Identifier of the species an organism belongs to.
pub type SpeciesId = usize;

#[derive(Debug, Clone)]
pub struct Organism<G: Encoding, D = ()> {
    pub fitness: f64,
    /// Fitness before any sharing or adjustment.
    pub original_fitness: f64,
    /// Distance from the task goal, e.g. a mean squared error.
    pub error: f64,
    pub is_winner: bool,
    pub phenotype: Network,
    pub genotype: G,
    pub species: Option<SpeciesId>,
    /// Number of children this organism may have.
    pub expected_offspring: f64,
    pub generation: u32,
    /// Algorithm-specific payload, never inspected here.
    pub data: Option<D>,
    pub to_eliminate: bool,
    /// Species champion.
    pub is_champion: bool,
    /// Offspring reserved for a population leader.
    pub super_champ_offspring: usize,
    pub is_population_champion: bool,
    /// Duplicate child of a population champion.
    pub is_population_champion_child: bool,
    /// Best fitness the tracked champion ever reached.
    pub highest_fitness: f64,
    pub mutation_struct_baby: bool,
    pub mate_baby: bool,
    pub flag: i32,
}

impl<G: Encoding, D> Organism<G, D> {
    /// Creates an organism and expresses its phenotype.
    pub fn new(fitness: f64, genotype: G, generation: u32) -> Result<Self> {
        let phenotype = genotype.genesis(genotype.id())?;
        Ok(Self {
            fitness,
            original_fitness: 0.0,
            error: 0.0,
            is_winner: false,
            phenotype,
            genotype,
            species: None,
            expected_offspring: 0.0,
            generation,
            data: None,
            to_eliminate: false,
            is_champion: false,
            super_champ_offspring: 0,
            is_population_champion: false,
            is_population_champion_child: false,
            highest_fitness: 0.0,
            mutation_struct_baby: false,
            mate_baby: false,
            flag: 0,
        })
    }

    /// Rebuilds the phenotype after the genotype changed. Solvers compiled
    /// from the old phenotype are stale afterwards.
    pub fn update_phenotype(&mut self) -> Result<()> {
        self.phenotype = self.genotype.genesis(self.genotype.id())?;
        Ok(())
    }

    /// True for a tracked champion clone that fell below the champion's best.
    #[must_use]
    pub fn check_champion_child_damaged(&self) -> bool {
        self.is_population_champion_child && self.highest_fitness > self.fitness
    }

    #[must_use]
    pub fn complexity(&self) -> usize {
        self.phenotype.complexity()
    }

    /// Selection order: fitness ascending, then higher complexity first, then
    /// lower genome id first.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Ordering {
        self.fitness
            .partial_cmp(&other.fitness)
            .unwrap_or_else(|| self.fitness.total_cmp(&other.fitness))
            .then_with(|| other.complexity().cmp(&self.complexity()))
            .then_with(|| self.genotype.id().cmp(&other.genotype.id()))
    }

    pub fn write_to<W: Write>(&self, w: &mut W) -> Result<()> {
        writeln!(w, "{} {} {}", self.fitness, self.generation, self.genotype.id())?;
        self.genotype.write_to(w)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.write_to(&mut buf)?;
        Ok(buf)
    }

    /// Decodes a wire record and rebuilds the phenotype. Bookkeeping flags
    /// are not transmitted and start out cleared.
    pub fn read_from<R: BufRead>(r: &mut R) -> Result<Self> {
        let mut line = String::new();
        r.read_line(&mut line)?;
        let (fitness, generation, id) = parse_header(&line)?;
        let genotype = G::read_from(r, id)
            .map_err(|e| e.with_context(format!("decoding genome {id}")))?;
        Self::new(fitness, genotype, generation)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::read_from(&mut Cursor::new(bytes))
    }
}

/// Parses a `<fitness> <generation> <genome id>` header line.
pub fn parse_header(line: &str) -> Result<(f64, u32, usize)> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    let [fitness, generation, id] = fields.as_slice() else {
        return Err(NetError::malformed(format!(
            "organism header needs 3 fields, got {:?}",
            line.trim_end()
        )));
    };
    let bad = |what: &str, raw: &str| NetError::malformed(format!("bad {what} {raw:?}"));
    Ok((
        fitness.parse().map_err(|_| bad("fitness", *fitness))?,
        generation.parse().map_err(|_| bad("generation", *generation))?,
        id.parse().map_err(|_| bad("genome id", *id))?,
    ))
}

/// Sorts organisms from least to most fit.
pub fn sort_organisms<G: Encoding, D>(organisms: &mut [Organism<G, D>]) {
    organisms.sort_by(|a, b| a.compare(b));
}

impl<G: Encoding, D> fmt::Display for Organism<G, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let champ = if self.is_champion { " - CHAMPION - " } else { "" };
        let elim = if self.to_eliminate {
            " - TO BE ELIMINATED - "
        } else {
            ""
        };
        write!(
            f,
            "[Organism generation: {}, fitness: {:.3}, original fitness: {:.3}{}{}]",
            self.generation, self.fitness, self.original_fitness, champ, elim
        )
    }
}
