use crate::tree_sequence::{Tables, TreeSequence, Population, Node, Edge, Site, Mutation};

fn population(id: usize, name: &str) -> Population {
    Population { id, name: name.to_string(), description: format!("Population {name}") }
}

fn node(time: f64, population: usize, individual: Option<usize>) -> Node {
    Node { time, is_sample: individual.is_some(), population: Some(population), individual }
}

fn edge(left: f64, right: f64, parent: usize, child: usize) -> Edge {
    Edge { left, right, parent, child }
}

fn site(position: f64, ancestral_state: &str) -> Site {
    Site { position, ancestral_state: ancestral_state.to_string() }
}

fn mutation(site: usize, node: usize, derived_state: &str) -> Mutation {
    Mutation { site, node, derived_state: derived_state.to_string() }
}

/// Two demes (A, B), two diploid individuals each, sequence length 20.
///
/// ```text
///                12                 (t=3)
///          /------------\
///         10             11         (t=2)
///      /--+--\        /--+--\
///     8   2*  3       9   6   7     (t=1)   *: [0,10); node 2 hangs below 8 over [10,20)
///    / \             / \
///   0   1           4   5           (t=0)
/// ```
/// Sites: 2.0 (A, 8->T) | 7.5 (C, 11->G, 9->C) | 12.0 (T, 8->C) | 15.0 (G, 2->A)
pub fn two_demes_tables() -> Tables {
    let mut tables = Tables::new(20.0);
    tables.populations = vec![population(0, "A"), population(1, "B")];
    tables.num_individuals = 4;
    tables.nodes = vec![
        node(0.0, 0, Some(0)), node(0.0, 0, Some(0)),
        node(0.0, 0, Some(1)), node(0.0, 0, Some(1)),
        node(0.0, 1, Some(2)), node(0.0, 1, Some(2)),
        node(0.0, 1, Some(3)), node(0.0, 1, Some(3)),
        node(1.0, 0, None),    node(1.0, 1, None),
        node(2.0, 0, None),    node(2.0, 1, None),
        node(3.0, 0, None),
    ];
    tables.edges = vec![
        edge(0.0 , 20.0, 8 , 0 ), edge(0.0, 20.0, 8 , 1 ),
        edge(10.0, 20.0, 8 , 2 ),
        edge(0.0 , 20.0, 9 , 4 ), edge(0.0, 20.0, 9 , 5 ),
        edge(0.0 , 20.0, 10, 8 ), edge(0.0, 10.0, 10, 2 ), edge(0.0, 20.0, 10, 3),
        edge(0.0 , 20.0, 11, 9 ), edge(0.0, 20.0, 11, 6 ), edge(0.0, 20.0, 11, 7),
        edge(0.0 , 20.0, 12, 10), edge(0.0, 20.0, 12, 11),
    ];
    tables.sites = vec![site(2.0, "A"), site(7.5, "C"), site(12.0, "T"), site(15.0, "G")];
    tables.mutations = vec![
        mutation(0, 8, "T"),
        mutation(1, 11, "G"),
        mutation(1, 9, "C"),
        mutation(2, 8, "C"),
        mutation(3, 2, "A"),
    ];
    tables
}

pub fn two_demes() -> TreeSequence {
    TreeSequence::new(two_demes_tables()).expect("valid two-deme tree sequence")
}

/// Raw JSON population metadata, as written by msprime.
struct PopulationJson(Vec<u8>);

impl tskit::metadata::MetadataRoundtrip for PopulationJson {
    fn encode(&self) -> Result<Vec<u8>, tskit::metadata::MetadataError> {
        Ok(self.0.clone())
    }

    fn decode(md: &[u8]) -> Result<Self, tskit::metadata::MetadataError> {
        Ok(Self(md.to_vec()))
    }
}

impl tskit::metadata::PopulationMetadata for PopulationJson {}

fn tsk_id(id: usize) -> i32 {
    i32::try_from(id).expect("id fits within tsk_id_t")
}

/// Write `tables` into a tskit `.trees` file, through the tskit table API. Unnamed populations get `null`
/// metadata, the way SLiM describes unused population slots.
pub fn dump_trees(tables: &Tables, path: &std::path::Path) {
    let mut tsk = tskit::TableCollection::new(tables.sequence_length).expect("valid sequence length");

    for population in &tables.populations {
        let metadata = match *population == Population::unnamed(population.id) {
            true  => b"null".to_vec(),
            false => serde_json::json!({"name": population.name, "description": population.description}).to_string().into_bytes(),
        };
        tsk.add_population_with_metadata(&PopulationJson(metadata)).expect("add population");
    }

    for _ in 0..tables.num_individuals {
        tsk.add_individual(0, None, None).expect("add individual");
    }

    for node in &tables.nodes {
        let flags = match node.is_sample {
            true  => tskit::NodeFlags::new_sample(),
            false => tskit::NodeFlags::default(),
        };
        let population = node.population.map_or(tskit::PopulationId::NULL, |pop| tsk_id(pop).into());
        let individual = node.individual.map_or(tskit::IndividualId::NULL, |ind| tsk_id(ind).into());
        tsk.add_node(flags, node.time, population, individual).expect("add node");
    }

    for edge in &tables.edges {
        tsk.add_edge(edge.left, edge.right, tsk_id(edge.parent), tsk_id(edge.child)).expect("add edge");
    }

    for site in &tables.sites {
        tsk.add_site(site.position, Some(site.ancestral_state.as_bytes())).expect("add site");
    }

    for mutation in &tables.mutations {
        let time = tables.nodes[mutation.node].time;
        tsk.add_mutation(tsk_id(mutation.site), tsk_id(mutation.node), tskit::MutationId::NULL, time, Some(mutation.derived_state.as_bytes()))
            .expect("add mutation");
    }

    tsk.dump(path.to_str().expect("UTF-8 path"), tskit::TableOutputOptions::default()).expect("dump tables");
}
