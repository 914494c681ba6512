use std::collections::HashSet;

use serde::{Serialize, Deserialize};

use crate::RegistryError;

/// A `demes` demographic model specification.
///
/// Only the fields required to describe and sanity-check bundled models are deserialized. Unknown fields
/// (`metadata`, `defaults`, ...) are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    #[serde(default)]
    pub description    : String,
    #[serde(default)]
    pub doi            : Vec<String>,
    pub time_units     : String,
    #[serde(default)]
    pub generation_time: Option<f64>,
    pub demes          : Vec<Deme>,
    #[serde(default)]
    pub migrations     : Vec<Migration>,
    #[serde(default)]
    pub pulses         : Vec<Pulse>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deme {
    pub name       : String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub ancestors  : Vec<String>,
    #[serde(default)]
    pub proportions: Vec<f64>,
    #[serde(default)]
    pub start_time : Option<f64>,
    #[serde(default)]
    pub epochs     : Vec<Epoch>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Epoch {
    #[serde(default)]
    pub end_time     : Option<f64>,
    #[serde(default)]
    pub start_size   : Option<f64>,
    #[serde(default)]
    pub end_size     : Option<f64>,
    #[serde(default)]
    pub size_function: Option<String>,
}

/// Either an asymmetric (`source` -> `dest`) or a symmetric (`demes`) migration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Migration {
    #[serde(default)]
    pub source    : Option<String>,
    #[serde(default)]
    pub dest      : Option<String>,
    #[serde(default)]
    pub demes     : Vec<String>,
    pub rate      : f64,
    #[serde(default)]
    pub start_time: Option<f64>,
    #[serde(default)]
    pub end_time  : Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pulse {
    pub sources    : Vec<String>,
    pub dest       : String,
    pub time       : f64,
    pub proportions: Vec<f64>,
}

impl Migration {
    /// Names of all the demes involved in this migration.
    pub fn participants(&self) -> impl Iterator<Item = &str> {
        self.source.iter().chain(self.dest.iter()).chain(self.demes.iter()).map(String::as_str)
    }
}

impl Graph {
    /// Deserialize and check a `demes` YAML document.
    pub fn from_yaml(model: &str, yaml: &str) -> Result<Self, RegistryError> {
        let graph: Self = serde_yaml::from_str(yaml)
            .map_err(|err| RegistryError::ParseModel{model: model.to_string(), err})?;
        graph.validate(model)?;
        Ok(graph)
    }

    pub fn deme(&self, name: &str) -> Option<&Deme> {
        self.demes.iter().find(|deme| deme.name == name)
    }

    /// Names of the demes alive at time 0, i.e. the demes that may be sampled.
    pub fn extant_demes(&self) -> Vec<&str> {
        self.demes.iter()
            .filter(|deme| deme.epochs.last().and_then(|epoch| epoch.end_time).unwrap_or(0.0) == 0.0)
            .map(|deme| deme.name.as_str())
            .collect()
    }

    /// Referential sanity checks:
    /// - at least one deme, with unique names.
    /// - ancestors are declared before their descendants.
    /// - migrations and pulses only refer to declared demes.
    fn validate(&self, model: &str) -> Result<(), RegistryError> {
        let invalid = |reason: String| RegistryError::InvalidModel{model: model.to_string(), reason};
        if self.demes.is_empty() {
            return Err(invalid("model has no deme".to_string()))
        }

        let mut declared: HashSet<&str> = HashSet::with_capacity(self.demes.len());
        for deme in &self.demes {
            if let Some(ancestor) = deme.ancestors.iter().find(|a| !declared.contains(a.as_str())) {
                return Err(invalid(format!("ancestor '{ancestor}' of deme '{}' is not declared beforehand", deme.name)))
            }
            if !declared.insert(deme.name.as_str()) {
                return Err(invalid(format!("deme '{}' is declared twice", deme.name)))
            }
        }

        let referenced = self.migrations.iter().flat_map(Migration::participants)
            .chain(self.pulses.iter().flat_map(|pulse| pulse.sources.iter().chain(std::iter::once(&pulse.dest)).map(String::as_str)));
        for name in referenced {
            if !declared.contains(name) {
                return Err(invalid(format!("unknown deme '{name}'")))
            }
        }
        Ok(())
    }
}
