use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum IndividualError {
    #[error("Individuals are not grouped by population: individual tsk_{individual} belongs to population '{population}', which was already interrupted by another population")]
    NonContiguousPopulation{individual: usize, population: String},

    #[error("Invalid reference chromosome '{0}'. Expected <population identifier>:<index>, e.g. 'YRI:0' or '1:0'")]
    InvalidReferenceToken(String),

    #[error("No individual matches the requested reference chromosome '{0}'")]
    ReferenceNotFound(String),
}
