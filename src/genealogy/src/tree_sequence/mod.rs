use std::path::Path;

use anyhow::Result;
use itertools::Itertools;
use log::{debug, info};

use located_error::LocatedError;

mod error;
pub use error::TreeSequenceError;

mod tables;
pub use tables::{Tables, Population, Node, Edge, Site, Mutation, NodeId};

mod tskit_loader;
mod text_loader;

use crate::variant::Variants;

/// Nodes (haplotypes) of a tree sequence individual, in node table order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndividualNodes {
    pub id   : usize,
    pub nodes: Vec<NodeId>,
}

/// Validated, immutable tree sequence.
///
/// # Invariants
/// - every node, population, site and individual reference is in range.
/// - edges satisfy `0 <= left < right <= sequence_length`, and parents are strictly older than their children.
/// - the edges of a given child never overlap.
/// - sites are sorted, and distinct once discretized (`floor(position)`), within `[0, floor(sequence_length))`.
/// - mutations are sorted by site. Allelic states are single characters.
/// - every individual owns at least one node, and all its nodes belong to the same population.
#[derive(Debug, Clone)]
pub struct TreeSequence {
    tables        : Tables,
    individuals   : Vec<IndividualNodes>,
    parent_edges  : Vec<Vec<Edge>>,
    site_mutations: Vec<Vec<usize>>,
}

impl TreeSequence {
    /// Load a tree sequence from disk.
    /// - regular file: tskit binary `.trees` file.
    /// - directory   : tskit text tables (`nodes.txt`, `edges.txt`, `sites.txt`, `mutations.txt`, and optionally
    ///   `populations.txt` + `sequence_length.txt`).
    ///
    /// # Errors
    /// - `InputNotFound` if `path` does not exist.
    /// - any loading or validation error of the underlying tables.
    pub fn load(path: &Path) -> Result<Self> {
        let loc_msg = || format!("While loading tree sequence '{}'", path.display());
        if !path.exists() {
            return Err(TreeSequenceError::InputNotFound(path.to_path_buf())).with_loc(loc_msg)
        }

        let tables = match path.is_dir() {
            true  => text_loader::load_tables(path),
            false => tskit_loader::load_tables(path),
        }.with_loc(loc_msg)?;

        let ts = Self::new(tables).with_loc(loc_msg)?;
        info!("Loaded tree sequence: {} individuals, {} nodes, {} sites, sequence length {}",
            ts.individuals.len(), ts.tables.nodes.len(), ts.tables.sites.len(), ts.tables.sequence_length
        );
        Ok(ts)
    }

    /// Validate `tables` and index them.
    pub fn new(tables: Tables) -> Result<Self, TreeSequenceError> {
        Self::validate_populations(&tables)?;
        Self::validate_nodes(&tables)?;
        let parent_edges = Self::index_edges(&tables)?;
        Self::validate_sites(&tables)?;
        let site_mutations = Self::index_mutations(&tables)?;
        let individuals = Self::collect_individuals(&tables)?;

        debug!("Indexed {} edges and {} mutations", tables.edges.len(), tables.mutations.len());
        Ok(Self { tables, individuals, parent_edges, site_mutations })
    }

    fn validate_populations(tables: &Tables) -> Result<(), TreeSequenceError> {
        use TreeSequenceError::MalformedTables;
        if !(tables.sequence_length.is_finite() && tables.sequence_length > 0.0) {
            return Err(MalformedTables(format!("invalid sequence length {}", tables.sequence_length)))
        }
        for (row, population) in tables.populations.iter().enumerate() {
            if population.id != row {
                return Err(TreeSequenceError::malformed("population", row, format!("unexpected id {}", population.id)))
            }
        }
        Ok(())
    }

    fn validate_nodes(tables: &Tables) -> Result<(), TreeSequenceError> {
        for (row, node) in tables.nodes.iter().enumerate() {
            if !node.time.is_finite() {
                return Err(TreeSequenceError::malformed("node", row, "non-finite time"))
            }
            if let Some(pop) = node.population.filter(|pop| *pop >= tables.populations.len()) {
                return Err(TreeSequenceError::malformed("node", row, format!("population {pop} out of bounds")))
            }
            if let Some(ind) = node.individual.filter(|ind| *ind >= tables.num_individuals) {
                return Err(TreeSequenceError::malformed("node", row, format!("individual {ind} out of bounds")))
            }
        }
        Ok(())
    }

    /// Group edges by child, sorted by left coordinate.
    fn index_edges(tables: &Tables) -> Result<Vec<Vec<Edge>>, TreeSequenceError> {
        let num_nodes = tables.nodes.len();
        let mut parent_edges: Vec<Vec<Edge>> = vec![Vec::new(); num_nodes];
        for (row, edge) in tables.edges.iter().enumerate() {
            let malformed = |reason: String| TreeSequenceError::malformed("edge", row, reason);
            if edge.parent >= num_nodes || edge.child >= num_nodes {
                return Err(malformed(format!("node out of bounds ({} -> {})", edge.parent, edge.child)))
            }
            if !(0.0 <= edge.left && edge.left < edge.right && edge.right <= tables.sequence_length) {
                return Err(malformed(format!("invalid interval [{}, {})", edge.left, edge.right)))
            }
            if tables.nodes[edge.parent].time <= tables.nodes[edge.child].time {
                return Err(malformed(format!("parent {} is not older than child {}", edge.parent, edge.child)))
            }
            parent_edges[edge.child].push(*edge);
        }

        for (child, edges) in parent_edges.iter_mut().enumerate() {
            edges.sort_by(|a, b| a.left.total_cmp(&b.left));
            if let Some((a, b)) = edges.iter().tuple_windows().find(|(a, b)| b.left < a.right) {
                return Err(TreeSequenceError::MalformedTables(format!(
                    "node {child} has overlapping parents over [{}, {})", b.left, a.right
                )))
            }
        }
        Ok(parent_edges)
    }

    fn validate_sites(tables: &Tables) -> Result<(), TreeSequenceError> {
        let discrete_length = tables.sequence_length.floor();
        let mut previous: Option<usize> = None;
        for (row, site) in tables.sites.iter().enumerate() {
            let malformed = |reason: String| TreeSequenceError::malformed("site", row, reason);
            if !(0.0 <= site.position && site.position.floor() < discrete_length) {
                return Err(malformed(format!(
                    "position {} lies outside of the sequence ({} bp)", site.position, discrete_length
                )))
            }
            let position = site.position.floor() as usize;
            if previous.is_some_and(|prev| position <= prev) {
                return Err(malformed(format!("position {} is unsorted or collides with the previous site", site.position)))
            }
            if site.ancestral_state.chars().count() != 1 {
                return Err(malformed(format!("ancestral state '{}' is not a single character", site.ancestral_state)))
            }
            previous = Some(position);
        }
        Ok(())
    }

    /// Group mutation rows by site, in table order.
    fn index_mutations(tables: &Tables) -> Result<Vec<Vec<usize>>, TreeSequenceError> {
        let mut site_mutations = vec![Vec::new(); tables.sites.len()];
        let mut previous_site = 0;
        for (row, mutation) in tables.mutations.iter().enumerate() {
            let malformed = |reason: String| TreeSequenceError::malformed("mutation", row, reason);
            if mutation.site >= tables.sites.len() {
                return Err(malformed(format!("site {} out of bounds", mutation.site)))
            }
            if mutation.node >= tables.nodes.len() {
                return Err(malformed(format!("node {} out of bounds", mutation.node)))
            }
            if mutation.site < previous_site {
                return Err(malformed("mutations are not sorted by site".to_string()))
            }
            if mutation.derived_state.chars().count() != 1 {
                return Err(malformed(format!("derived state '{}' is not a single character", mutation.derived_state)))
            }
            previous_site = mutation.site;
            site_mutations[mutation.site].push(row);
        }
        Ok(site_mutations)
    }

    /// Reconstruct the node list of every individual from the node table.
    fn collect_individuals(tables: &Tables) -> Result<Vec<IndividualNodes>, TreeSequenceError> {
        let mut individuals: Vec<IndividualNodes> = (0..tables.num_individuals)
            .map(|id| IndividualNodes { id, nodes: Vec::new() })
            .collect();

        for (node_id, node) in tables.nodes.iter().enumerate() {
            if let Some(ind) = node.individual {
                individuals[ind].nodes.push(node_id);
            }
        }

        for individual in &individuals {
            let malformed = |reason: String| TreeSequenceError::malformed("individual", individual.id, reason);
            let Some(first) = individual.nodes.first() else {
                return Err(malformed("individual has no nodes".to_string()))
            };
            let Some(population) = tables.nodes[*first].population else {
                return Err(malformed(format!("node {first} has no population")))
            };
            if let Some(node) = individual.nodes.iter().find(|n| tables.nodes[**n].population != Some(population)) {
                return Err(malformed(format!("nodes {first} and {node} belong to different populations")))
            }
        }
        Ok(individuals)
    }

    pub fn sequence_length(&self) -> f64 {
        self.tables.sequence_length
    }

    /// Number of whole base pairs covered by the sequence.
    pub fn discrete_length(&self) -> usize {
        self.tables.sequence_length.floor() as usize
    }

    pub fn populations(&self) -> &[Population] {
        &self.tables.populations
    }

    pub fn population(&self, id: usize) -> Option<&Population> {
        self.tables.populations.get(id)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.tables.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.tables.edges
    }

    pub fn sites(&self) -> &[Site] {
        &self.tables.sites
    }

    pub fn mutations(&self) -> &[Mutation] {
        &self.tables.mutations
    }

    pub fn individuals(&self) -> &[IndividualNodes] {
        &self.individuals
    }

    /// Population of an individual, i.e. the population of its first node.
    pub fn individual_population(&self, individual: &IndividualNodes) -> &Population {
        // Guaranteed by `collect_individuals()`
        let pop = individual.nodes.first()
            .and_then(|node| self.tables.nodes[*node].population)
            .unwrap_or_default();
        &self.tables.populations[pop]
    }

    /// 0-based base pair coordinate of a site.
    pub fn discrete_position(&self, site: usize) -> usize {
        self.tables.sites[site].position.floor() as usize
    }

    /// Parent of `child` at genomic coordinate `x`, if any.
    pub fn parent(&self, child: NodeId, x: f64) -> Option<NodeId> {
        let edges = self.parent_edges.get(child)?;
        let idx = edges.partition_point(|edge| edge.left <= x);
        edges.get(idx.checked_sub(1)?)
            .filter(|edge| x < edge.right)
            .map(|edge| edge.parent)
    }

    /// Mutation rows of a site, in table order.
    pub(crate) fn site_mutations(&self, site: usize) -> &[usize] {
        &self.site_mutations[site]
    }

    /// Iterate over the genotypes of `samples` at every site.
    pub fn variants(&self, samples: &[NodeId]) -> Variants<'_> {
        Variants::new(self, samples)
    }
}
