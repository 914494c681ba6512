use std::path::{Path, PathBuf};

use genealogy::TreeSequence;

/// Text tables of the two-deme integration test tree sequence.
pub fn two_demes_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../tests/test-data/two-demes")
}

/// Two demes (A, B), two diploid individuals each, sequence length 20. Sites at 2.0, 7.5, 12.0 and 15.0
pub fn two_demes() -> TreeSequence {
    TreeSequence::load(&two_demes_dir()).expect("valid two-deme tree sequence")
}

/// Raw JSON population metadata.
struct PopulationJson(String);

impl tskit::metadata::MetadataRoundtrip for PopulationJson {
    fn encode(&self) -> Result<Vec<u8>, tskit::metadata::MetadataError> {
        Ok(self.0.clone().into_bytes())
    }

    fn decode(md: &[u8]) -> Result<Self, tskit::metadata::MetadataError> {
        Ok(Self(String::from_utf8_lossy(md).into_owned()))
    }
}

impl tskit::metadata::PopulationMetadata for PopulationJson {}

fn tsk_id(id: usize) -> i32 {
    i32::try_from(id).expect("id fits within tsk_id_t")
}

/// Write the two-deme tree sequence into `<dir>/two-demes.trees`, through the tskit table API.
pub fn two_demes_trees(dir: &Path) -> PathBuf {
    let ts = two_demes();
    let mut tables = tskit::TableCollection::new(ts.sequence_length()).expect("valid sequence length");

    for population in ts.populations() {
        let metadata = format!(r#"{{"name": "{}", "description": "{}"}}"#, population.name, population.description);
        tables.add_population_with_metadata(&PopulationJson(metadata)).expect("add population");
    }
    for _ in ts.individuals() {
        tables.add_individual(0, None, None).expect("add individual");
    }
    for node in ts.nodes() {
        let flags = match node.is_sample {
            true  => tskit::NodeFlags::new_sample(),
            false => tskit::NodeFlags::default(),
        };
        let population = node.population.map_or(tskit::PopulationId::NULL, |pop| tsk_id(pop).into());
        let individual = node.individual.map_or(tskit::IndividualId::NULL, |ind| tsk_id(ind).into());
        tables.add_node(flags, node.time, population, individual).expect("add node");
    }
    for edge in ts.edges() {
        tables.add_edge(edge.left, edge.right, tsk_id(edge.parent), tsk_id(edge.child)).expect("add edge");
    }
    for site in ts.sites() {
        tables.add_site(site.position, Some(site.ancestral_state.as_bytes())).expect("add site");
    }
    for mutation in ts.mutations() {
        let time = ts.nodes()[mutation.node].time;
        tables.add_mutation(tsk_id(mutation.site), tsk_id(mutation.node), tskit::MutationId::NULL, time, Some(mutation.derived_state.as_bytes()))
            .expect("add mutation");
    }

    let path = dir.join("two-demes.trees");
    tables.dump(path.to_str().expect("UTF-8 path"), tskit::TableOutputOptions::default()).expect("dump tables");
    path
}
