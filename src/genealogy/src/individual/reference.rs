use std::{fmt::{self, Display, Formatter}, str::FromStr};

use lazy_static::lazy_static;
use regex::Regex;
use log::info;

use super::{Individual, IndividualError};

/// Population part of a [`ReferenceToken`]: either a numeric population id or a population name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopulationKey {
    Id(usize),
    Name(String),
}

impl PopulationKey {
    fn matches(&self, individual: &Individual) -> bool {
        match self {
            Self::Id(id)     => individual.metadata.population.id == *id,
            Self::Name(name) => individual.metadata.popname == *name,
        }
    }
}

impl Display for PopulationKey {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::Id(id)     => write!(f, "{id}"),
            Self::Name(name) => write!(f, "{name}"),
        }
    }
}

/// A `<population>:<index>` selector, pointing to the `index`-th individual of a population.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceToken {
    pub population: PopulationKey,
    pub index     : usize,
}

impl FromStr for ReferenceToken {
    type Err = IndividualError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        lazy_static! {
            static ref RE: Regex = Regex::new(r"^([^:\s]+):(\d+)$").expect("Failed to parse regex.");
        }
        let invalid = || IndividualError::InvalidReferenceToken(s.to_string());
        let captures = RE.captures(s.trim()).ok_or_else(invalid)?;

        let population = match captures[1].parse::<usize>() {
            Ok(id) => PopulationKey::Id(id),
            Err(_) => PopulationKey::Name(captures[1].to_string()),
        };
        let index = captures[2].parse::<usize>().map_err(|_| invalid())?;
        Ok(Self { population, index })
    }
}

impl Display for ReferenceToken {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.population, self.index)
    }
}

impl ReferenceToken {
    /// Mark the first individual matching this token as the reference, and return its position within
    /// `individuals`.
    ///
    /// # Errors
    /// `ReferenceNotFound` if no individual matches.
    pub fn designate(&self, individuals: &mut [Individual]) -> Result<usize, IndividualError> {
        let (idx, individual) = individuals.iter_mut()
            .enumerate()
            .find(|(_, ind)| ind.metadata.ind_index == self.index && self.population.matches(ind))
            .ok_or_else(|| IndividualError::ReferenceNotFound(self.to_string()))?;

        individual.metadata.is_reference = true;
        info!("Using {} ({}) as reference individual", individual.metadata.tskit_id, individual.metadata.name);
        Ok(idx)
    }
}
