use serde::Deserialize;

/// 0-based row index within the node table.
pub type NodeId = usize;

/// A deme of the simulated demography.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Population {
    pub id         : usize,
    pub name       : String,
    pub description: String,
}

impl Population {
    /// Fallback used whenever a population row carries no metadata.
    #[must_use]
    pub fn unnamed(id: usize) -> Self {
        Self { id, name: format!("pop_{id}"), description: String::new() }
    }
}

impl std::fmt::Display for Population {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// JSON population metadata, as written by msprime.
#[derive(Debug, Deserialize)]
pub(crate) struct PopulationRecord {
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Node {
    pub time      : f64,
    pub is_sample : bool,
    pub population: Option<usize>,
    pub individual: Option<usize>,
}

/// `parent` is the parent of `child` over the half-open genomic interval `[left, right)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub left  : f64,
    pub right : f64,
    pub parent: NodeId,
    pub child : NodeId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Site {
    pub position       : f64,
    pub ancestral_state: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Mutation {
    pub site         : usize,
    pub node         : NodeId,
    pub derived_state: String,
}

/// Raw, unvalidated tables. Converted into a [`TreeSequence`](super::TreeSequence) through
/// [`TreeSequence::new`](super::TreeSequence::new).
#[derive(Debug, Clone, Default)]
pub struct Tables {
    pub sequence_length: f64,
    pub populations    : Vec<Population>,
    pub nodes          : Vec<Node>,
    pub edges          : Vec<Edge>,
    pub sites          : Vec<Site>,
    pub mutations      : Vec<Mutation>,
    pub num_individuals: usize,
}

impl Tables {
    #[must_use]
    pub fn new(sequence_length: f64) -> Self {
        Self { sequence_length, ..Default::default() }
    }

    /// Decode population metadata bytes. Empty or `null` metadata (e.g. unused SLiM population slots) yields
    /// an unnamed population.
    pub(crate) fn decode_population(id: usize, metadata: Option<&[u8]>) -> Result<Population, serde_json::Error> {
        let Some(bytes) = metadata.filter(|md| !md.is_empty()) else {
            return Ok(Population::unnamed(id))
        };
        let Some(record) = serde_json::from_slice::<Option<PopulationRecord>>(bytes)? else {
            return Ok(Population::unnamed(id))
        };
        Ok(Population {
            id,
            name       : record.name.unwrap_or_else(|| format!("pop_{id}")),
            description: record.description.unwrap_or_default(),
        })
    }
}
