use thiserror::Error;

#[derive(Debug, Error)]
pub enum BrainError {
    #[error("network must take {expected} inputs, genome takes {found}")]
    InputCount { expected: usize, found: usize },

    #[error("network must produce {expected} outputs, genome produces {found}")]
    OutputCount { expected: usize, found: usize },

    #[error("gene {gene} connects a node the genome does not have")]
    DanglingGene { gene: usize },

    #[error("gene {gene} has a non-finite weight")]
    NonFinite { gene: usize },

    #[error("artifact i/o: {0}")]
    Io(#[from] std::io::Error),

    #[error("artifact encoding: {0}")]
    Codec(#[from] postcard::Error),

    #[error("not a {expected} artifact")]
    BadMagic { expected: &'static str },

    #[error("artifact version {found} is not supported (expected {expected})")]
    Version { expected: u16, found: u16 },
}
