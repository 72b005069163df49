use thiserror::Error;

#[derive(Debug, Error)]
pub enum GaError {
    #[error("GA configuration error: {0}")]
    Config(String),

    #[error("unknown {family} '{name}'")]
    UnknownScheme { family: &'static str, name: String },

    #[error("allele set for gene {gene} is empty")]
    EmptyAlleleSet { gene: usize },

    #[error("the genome has no genes")]
    EmptyGenome,

    #[error("evolution finished without an evaluated individual")]
    NoSolution,
}

pub type GaResult<T> = Result<T, GaError>;
