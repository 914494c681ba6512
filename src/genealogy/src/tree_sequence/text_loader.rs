use std::{collections::HashMap, fs, path::{Path, PathBuf}, str::FromStr};

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use log::debug;

use super::{Tables, Population, Node, Edge, Site, Mutation, TreeSequenceError};

const NODES_TABLE          : &str = "nodes.txt";
const EDGES_TABLE          : &str = "edges.txt";
const SITES_TABLE          : &str = "sites.txt";
const MUTATIONS_TABLE      : &str = "mutations.txt";
const POPULATIONS_TABLE    : &str = "populations.txt";
const SEQUENCE_LENGTH_FILE : &str = "sequence_length.txt";

/// A tab-separated table, with a header line naming its columns.
struct TextTable {
    path   : PathBuf,
    columns: HashMap<String, usize>,
    rows   : Vec<(usize, Vec<String>)>,
}

impl TextTable {
    fn read(path: PathBuf) -> Result<Self, TreeSequenceError> {
        let contents = fs::read_to_string(&path).map_err(|e| TreeSequenceError::ReadTable(path.clone(), e))?;
        let mut lines = contents.lines()
            .enumerate()
            .map(|(idx, line)| (idx + 1, line))
            .filter(|(_, line)| !line.trim().is_empty());

        let columns = match lines.next() {
            Some((_, header)) => header.split('\t').enumerate().map(|(i, name)| (name.trim().to_string(), i)).collect(),
            None              => HashMap::new(),
        };

        let rows = lines.map(|(idx, line)| (idx, line.split('\t').map(|f| f.trim().to_string()).collect())).collect();
        Ok(Self { path, columns, rows })
    }

    /// Read a table only if it exists within `dir`.
    fn read_optional(dir: &Path, name: &str) -> Result<Option<Self>, TreeSequenceError> {
        let path = dir.join(name);
        match path.exists() {
            true  => Self::read(path).map(Some),
            false => Ok(None),
        }
    }

    fn read_required(dir: &Path, name: &str) -> Result<Self, TreeSequenceError> {
        let path = dir.join(name);
        if !path.exists() {
            return Err(TreeSequenceError::MissingTable(path))
        }
        Self::read(path)
    }

    fn parse_err(&self, line: usize, err: impl Into<String>) -> TreeSequenceError {
        TreeSequenceError::ParseTable{path: self.path.clone(), line, err: err.into()}
    }

    /// Raw field of a row. `None` if the column is absent from the header.
    fn field<'a>(&self, row: &'a [String], line: usize, column: &str) -> Result<Option<&'a str>, TreeSequenceError> {
        let Some(idx) = self.columns.get(column) else {
            return Ok(None)
        };
        row.get(*idx)
            .map(|field| Some(field.as_str()))
            .ok_or_else(|| self.parse_err(line, format!("missing value for column '{column}'")))
    }

    fn parse<T>(&self, row: &[String], line: usize, column: &str) -> Result<T, TreeSequenceError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        let field = self.field(row, line, column)?
            .ok_or_else(|| self.parse_err(line, format!("missing column '{column}'")))?;
        field.parse::<T>().map_err(|e| self.parse_err(line, format!("invalid {column} '{field}' [{e}]")))
    }

    /// Parse a tskit id column, where `-1` stands for NULL. Absent columns are NULL.
    fn parse_id(&self, row: &[String], line: usize, column: &str) -> Result<Option<usize>, TreeSequenceError> {
        match self.field(row, line, column)? {
            None => Ok(None),
            Some(_) => {
                let id: i64 = self.parse(row, line, column)?;
                Ok(usize::try_from(id).ok())
            }
        }
    }
}

/// Metadata column of a text table. tskit's `dump_text()` base64-encodes metadata by default, while
/// hand-written tables usually carry raw JSON.
fn decode_metadata(field: &str) -> Vec<u8> {
    let field = field.trim();
    if field.starts_with(['{', '[']) || field == "null" {
        return field.as_bytes().to_vec()
    }
    BASE64.decode(field).unwrap_or_else(|_| field.as_bytes().to_vec())
}

/// Load a tree sequence from a directory of tskit text tables.
pub(super) fn load_tables(dir: &Path) -> Result<Tables, TreeSequenceError> {
    debug!("Loading tskit text tables from {}", dir.display());

    let nodes_table = TextTable::read_required(dir, NODES_TABLE)?;
    let mut nodes = Vec::with_capacity(nodes_table.rows.len());
    for (line, row) in &nodes_table.rows {
        let is_sample: u8 = nodes_table.parse(row, *line, "is_sample")?;
        nodes.push(Node {
            time      : nodes_table.parse(row, *line, "time")?,
            is_sample : is_sample != 0,
            population: nodes_table.parse_id(row, *line, "population")?,
            individual: nodes_table.parse_id(row, *line, "individual")?,
        });
    }

    let edges_table = TextTable::read_required(dir, EDGES_TABLE)?;
    let mut edges = Vec::with_capacity(edges_table.rows.len());
    for (line, row) in &edges_table.rows {
        edges.push(Edge {
            left  : edges_table.parse(row, *line, "left")?,
            right : edges_table.parse(row, *line, "right")?,
            parent: edges_table.parse(row, *line, "parent")?,
            child : edges_table.parse(row, *line, "child")?,
        });
    }

    let sites_table = TextTable::read_required(dir, SITES_TABLE)?;
    let mut sites = Vec::with_capacity(sites_table.rows.len());
    for (line, row) in &sites_table.rows {
        sites.push(Site {
            position       : sites_table.parse(row, *line, "position")?,
            ancestral_state: sites_table.parse(row, *line, "ancestral_state")?,
        });
    }

    let mutations_table = TextTable::read_required(dir, MUTATIONS_TABLE)?;
    let mut mutations = Vec::with_capacity(mutations_table.rows.len());
    for (line, row) in &mutations_table.rows {
        mutations.push(Mutation {
            site         : mutations_table.parse(row, *line, "site")?,
            node         : mutations_table.parse(row, *line, "node")?,
            derived_state: mutations_table.parse(row, *line, "derived_state")?,
        });
    }

    let mut populations = Vec::new();
    if let Some(table) = TextTable::read_optional(dir, POPULATIONS_TABLE)? {
        for (id, (line, row)) in table.rows.iter().enumerate() {
            let metadata = table.field(row, *line, "metadata")?.map(decode_metadata);
            let population = Tables::decode_population(id, metadata.as_deref())
                .map_err(|err| TreeSequenceError::PopulationMetadata(id, err))?;
            populations.push(population);
        }
    }

    // ---- Populations referenced by nodes but absent from the population table are left unnamed.
    let max_population = nodes.iter().filter_map(|node| node.population).max();
    if let Some(max) = max_population {
        populations.extend((populations.len()..=max).map(Population::unnamed));
    }

    let num_individuals = nodes.iter()
        .filter_map(|node| node.individual)
        .max()
        .map_or(0, |max| max + 1);

    let sequence_length = match fs::read_to_string(dir.join(SEQUENCE_LENGTH_FILE)) {
        Ok(contents) => contents.trim().parse::<f64>().map_err(|e| TreeSequenceError::ParseTable{
            path: dir.join(SEQUENCE_LENGTH_FILE), line: 1, err: e.to_string()
        })?,
        Err(_) => edges.iter().map(|edge| edge.right).fold(0.0, f64::max),
    };

    Ok(Tables { sequence_length, populations, nodes, edges, sites, mutations, num_individuals })
}
