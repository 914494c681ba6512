//! In-memory view of a simulated genealogy (tree sequence) and of the individuals it carries.
//!
//! - [`TreeSequence`]: validated tables (populations, nodes, edges, sites, mutations), loaded from a tskit
//!   `.trees` file or from a directory of tskit text tables.
//! - [`Variant`]: genotype calls of a set of haplotype nodes at one site.
//! - [`Individual`]: an individual of the tree sequence, annotated with identity metadata.

pub mod tree_sequence;
pub use tree_sequence::{TreeSequence, TreeSequenceError, Tables, Population, Node, Edge, Site, Mutation, NodeId};

mod variant;
pub use variant::{Variant, Variants};

pub mod individual;
pub use individual::{Individual, IndividualMetadata, IndividualError, ReferenceToken, PopulationKey, Partition};

#[cfg(test)]
pub(crate) mod test_utils;
