use std::{collections::HashSet, io::Write};

use log::debug;

use crate::{Graph, RegistryError};

/// Models bundled with the binary: (name, uri, demes YAML)
const BUNDLED_MODELS: [(&str, &str, &str); 2] = [
    ("ooa", "models/ooa.yaml", include_str!("../models/ooa.yaml")),
    ("ooa_with_outgroups", "models/ooa_with_outgroups.yaml", include_str!("../models/ooa_with_outgroups.yaml")),
];

/// Column width of model names, within `repo --ls` listings.
const NAME_WIDTH: usize = 30;

/// A registered demographic model.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    pub name : String,
    pub uri  : String,
    pub yaml : String,
    pub graph: Graph,
}

/// Immutable, ordered, table of demographic models.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelRegistry {
    models: Vec<Model>,
}

impl ModelRegistry {
    /// Registry of the models bundled with the binary.
    pub fn bundled() -> Result<Self, RegistryError> {
        Self::from_sources(BUNDLED_MODELS)
    }

    /// Build a registry from `(name, uri, yaml)` triplets, preserving their order.
    ///
    /// # Errors
    /// - `DuplicateModel` if a name is registered twice.
    /// - `ParseModel` or `InvalidModel` if a YAML document is not a valid `demes` model.
    pub fn from_sources<I, S>(sources: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = (S, S, S)>,
        S: AsRef<str>,
    {
        let mut names = HashSet::new();
        let mut models = Vec::new();
        for (name, uri, yaml) in sources {
            let name = name.as_ref().to_string();
            if !names.insert(name.clone()) {
                return Err(RegistryError::DuplicateModel(name))
            }
            let graph = Graph::from_yaml(&name, yaml.as_ref())?;
            debug!("Registered demographic model '{name}' ({} demes)", graph.demes.len());
            models.push(Model { name, uri: uri.as_ref().to_string(), yaml: yaml.as_ref().to_string(), graph });
        }
        Ok(Self { models })
    }

    pub fn get(&self, name: &str) -> Result<&Model, RegistryError> {
        self.models.iter()
            .find(|model| model.name == name)
            .ok_or_else(|| RegistryError::ModelNotFound(name.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Model> {
        self.models.iter()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Write a `name / uri` table of all the models, in registry order.
    pub fn list<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        writeln!(out, "{:<width$}uri", "name", width = NAME_WIDTH)?;
        for model in &self.models {
            writeln!(out, "{:<width$}{}", model.name, model.uri, width = NAME_WIDTH)?;
        }
        Ok(())
    }
}
