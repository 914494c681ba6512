use std::collections::HashSet;

use log::{debug, trace};

use crate::tree_sequence::{TreeSequence, Population, NodeId};

mod error;
pub use error::IndividualError;

mod reference;
pub use reference::{ReferenceToken, PopulationKey};

/// Identity metadata derived for each individual of the tree sequence.
///
/// # Fields
/// - `id`          : row index of the individual within the tree sequence.
/// - `tskit_id`    : `tsk_<id>`, i.e. the sample column name used within the VCF.
/// - `name`        : `tsk_<id>_<popname>_<ind_index>`
/// - `ind_index`   : 0-based index of the individual within its population.
/// - `is_reference`: whether this individual carries the reference haplotype.
/// - `vcf_header`  : `##SAMPLE=<...>` meta-information line describing this individual.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndividualMetadata {
    pub id          : usize,
    pub tskit_id    : String,
    pub name        : String,
    pub popname     : String,
    pub ind_index   : usize,
    pub population  : Population,
    pub description : String,
    pub is_reference: bool,
    pub vcf_header  : String,
}

impl IndividualMetadata {
    fn new(id: usize, population: &Population, ind_index: usize) -> Self {
        let tskit_id = format!("tsk_{id}");
        let name     = format!("{tskit_id}_{}_{ind_index}", population.name);
        let description = format!("tskit_individual:{tskit_id}, name:{name}, population:{}", population.name);
        let vcf_header  = format!(
            "##SAMPLE=<ID={tskit_id},Name={name},Index={id},Population={},Description=\"{}\">",
            population.name, population.description.replace('"', "'")
        );
        Self {
            id,
            tskit_id,
            name,
            popname: population.name.clone(),
            ind_index,
            population: population.clone(),
            description,
            is_reference: false,
            vcf_header,
        }
    }
}

/// An individual of the tree sequence, along with its haplotype nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Individual {
    pub nodes   : Vec<NodeId>,
    pub metadata: IndividualMetadata,
}

impl Individual {
    pub fn id(&self) -> usize {
        self.metadata.id
    }

    pub fn ploidy(&self) -> usize {
        self.nodes.len()
    }

    /// FASTA record identifier of the given haplotype: `tsk_<id>-<haplotype>`.
    pub fn record_id(&self, haplotype: usize) -> String {
        format!("{}-{haplotype}", self.metadata.tskit_id)
    }
}

/// Annotate every individual of `ts` with identity metadata, preserving storage order.
///
/// The per-population index is a counter reset whenever the population of the current individual differs
/// from the one of the previous individual.
///
/// # Errors
/// `NonContiguousPopulation` if individuals are not grouped by population, i.e. if a population reappears
/// once another population has started.
pub fn annotate(ts: &TreeSequence) -> Result<Vec<Individual>, IndividualError> {
    let mut individuals = Vec::with_capacity(ts.individuals().len());
    let mut closed: HashSet<&str> = HashSet::new();
    let mut previous: Option<&str> = None;
    let mut ind_index = 0;

    for raw in ts.individuals() {
        let population = ts.individual_population(raw);
        let popname = population.name.as_str();

        if let Some(prev) = previous.filter(|prev| *prev != popname) {
            closed.insert(prev);
            if closed.contains(popname) {
                return Err(IndividualError::NonContiguousPopulation{individual: raw.id, population: popname.to_string()})
            }
            ind_index = 0;
        }
        previous = Some(popname);

        let metadata = IndividualMetadata::new(raw.id, population, ind_index);
        trace!("{}", metadata.vcf_header);
        individuals.push(Individual { nodes: raw.nodes.clone(), metadata });
        ind_index += 1;
    }
    debug!("Annotated {} individuals", individuals.len());
    Ok(individuals)
}

/// Borrowed split of the annotated individuals into the (0 or 1) reference individual and the samples.
#[derive(Debug)]
pub struct Partition<'a> {
    pub reference: Option<&'a Individual>,
    pub samples  : Vec<&'a Individual>,
}

impl<'a> Partition<'a> {
    /// Split `individuals`, preserving order within each group.
    pub fn new(individuals: &'a [Individual]) -> Self {
        let (references, samples): (Vec<&Individual>, Vec<&Individual>) = individuals.iter()
            .partition(|ind| ind.metadata.is_reference);
        Self { reference: references.first().copied(), samples }
    }
}
