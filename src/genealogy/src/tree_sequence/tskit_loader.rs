use std::path::Path;

use log::debug;
use tskit::TableCollection;

use super::{Tables, Node, Edge, Site, Mutation, TreeSequenceError};

/// Decode an allelic state column. Missing states are read as empty strings.
fn to_state(state: Option<Vec<u8>>) -> String {
    state.map(|bytes| String::from_utf8_lossy(&bytes).into_owned()).unwrap_or_default()
}

/// Required reference column: a `NULL` id is a malformed row.
fn required(id: Option<usize>, table: &'static str, row: usize, column: &str) -> Result<usize, TreeSequenceError> {
    id.ok_or_else(|| TreeSequenceError::malformed(table, row, format!("NULL {column}")))
}

/// Load the tables of a tskit binary tree sequence file.
pub(super) fn load_tables(path: &Path) -> Result<Tables, TreeSequenceError> {
    let filename = path.to_str().ok_or_else(|| TreeSequenceError::InvalidPath(path.to_path_buf()))?;
    debug!("Loading tskit tables from {filename}");
    let tables = TableCollection::new_from_file(filename)?;

    let mut out = Tables::new(f64::from(tables.sequence_length()));

    for (row, population) in tables.populations().iter().enumerate() {
        let decoded = Tables::decode_population(row, population.metadata.as_deref())
            .map_err(|err| TreeSequenceError::PopulationMetadata(row, err))?;
        out.populations.push(decoded);
    }

    out.num_individuals = tables.individuals().iter().count();

    out.nodes = tables.nodes().iter().map(|node| Node {
        time      : f64::from(node.time),
        is_sample : node.flags.is_sample(),
        population: node.population.to_usize(),
        individual: node.individual.to_usize(),
    }).collect();

    out.edges = tables.edges().iter().enumerate().map(|(row, edge)| Ok(Edge {
        left  : f64::from(edge.left),
        right : f64::from(edge.right),
        parent: required(edge.parent.to_usize(), "edge", row, "parent")?,
        child : required(edge.child.to_usize(), "edge", row, "child")?,
    })).collect::<Result<_, TreeSequenceError>>()?;

    out.sites = tables.sites().iter().map(|site| Site {
        position       : f64::from(site.position),
        ancestral_state: to_state(site.ancestral_state),
    }).collect();

    out.mutations = tables.mutations().iter().enumerate().map(|(row, mutation)| Ok(Mutation {
        site         : required(mutation.site.to_usize(), "mutation", row, "site")?,
        node         : required(mutation.node.to_usize(), "mutation", row, "node")?,
        derived_state: to_state(mutation.derived_state),
    })).collect::<Result<_, TreeSequenceError>>()?;

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{two_demes_tables, dump_trees};
    use crate::TreeSequence;

    #[test]
    fn null_ids_are_none() {
        assert_eq!(tskit::NodeId::NULL.to_usize(), None);
        assert_eq!(tskit::NodeId::from(4).to_usize(), Some(4));
        assert_eq!(tskit::PopulationId::from(0).to_usize(), Some(0));
    }

    #[test]
    fn states() {
        assert_eq!(to_state(Some(b"A".to_vec())), "A");
        assert_eq!(to_state(None), "");
    }

    #[test]
    fn load_trees_file() {
        let tmpdir = tempfile::tempdir().expect("tempdir");
        let path = tmpdir.path().join("two-demes.trees");
        let expected = two_demes_tables();
        dump_trees(&expected, &path);

        let tables = load_tables(&path).expect("valid trees file");
        assert_eq!(tables.sequence_length, 20.0);
        assert_eq!(tables.populations, expected.populations);
        assert_eq!(tables.num_individuals, 4);
        assert_eq!(tables.nodes, expected.nodes);
        assert_eq!(tables.sites, expected.sites);
        assert_eq!(tables.mutations, expected.mutations);
        assert_eq!(tables.edges, expected.edges);
    }

    #[test]
    fn trees_file_genotypes() {
        let tmpdir = tempfile::tempdir().expect("tempdir");
        let path = tmpdir.path().join("two-demes.trees");
        dump_trees(&two_demes_tables(), &path);

        let ts = TreeSequence::load(&path).expect("valid tree sequence");
        assert_eq!(ts.individuals().len(), 4);
        assert_eq!(ts.individual_population(&ts.individuals()[2]).name, "B");
        assert_eq!(ts.individual_population(&ts.individuals()[2]).description, "Population B");

        let genotypes: Vec<Vec<usize>> = ts.variants(&[0, 1, 2, 3]).map(|variant| variant.genotypes).collect();
        assert_eq!(genotypes, vec![vec![1, 1, 0, 0], vec![0, 0, 0, 0], vec![1, 1, 1, 0], vec![0, 0, 1, 0]]);
    }

    #[test]
    fn null_population_metadata() {
        let tmpdir = tempfile::tempdir().expect("tempdir");
        let path = tmpdir.path().join("unused-population.trees");
        let mut tables = two_demes_tables();
        tables.populations.push(crate::Population::unnamed(2));
        dump_trees(&tables, &path);

        let tables = load_tables(&path).expect("null metadata is tolerated");
        assert_eq!(tables.populations.len(), 3);
        assert_eq!(tables.populations[2], crate::Population::unnamed(2));
    }

    #[test]
    fn corrupted_file() {
        let tmpdir = tempfile::tempdir().expect("tempdir");
        let path = tmpdir.path().join("corrupted.trees");
        std::fs::write(&path, b"this is not a kastore file").expect("write");
        assert!(matches!(load_tables(&path), Err(TreeSequenceError::Tskit(_))));
    }
}
