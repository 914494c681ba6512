use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Unknown demographic model '{0}'. Use 'simseqgen repo --ls' to list the available models")]
    ModelNotFound(String),

    #[error("Demographic model '{0}' is registered twice")]
    DuplicateModel(String),

    #[error("Failed to parse demographic model '{model}'")]
    ParseModel{model: String, #[source] err: serde_yaml::Error},

    #[error("Invalid demographic model '{model}': {reason}")]
    InvalidModel{model: String, reason: String},
}
