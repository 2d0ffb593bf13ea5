use thiserror::Error;

/// Invalid command-processor register contents.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RegsError {
    #[error("output semantic id {0} does not name an output vertex field")]
    InvalidSemantic(u8),

    #[error("register index {index} out of range (expected less than {count})")]
    RegisterOutOfRange { index: u8, count: usize },

    #[error("attribute index {index} out of range (expected less than {count})")]
    AttributeOutOfRange { index: u8, count: usize },

    #[error("{total} output attributes configured, hardware supports at most {max}")]
    TooManyOutputAttributes { total: usize, max: usize },
}

/// A shader program that cannot be executed.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ProgramError {
    #[error("program has {len} instructions, at most {max} are supported")]
    TooLong { len: usize, max: usize },

    #[error("instruction {offset} references {kind} register {index}, only {count} exist")]
    RegisterOutOfRange {
        offset: usize,
        kind: &'static str,
        index: u8,
        count: usize,
    },
}

/// Failure to construct an execution engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("engine is not supported on this target: {0}")]
    Unsupported(&'static str),

    #[error("failed to reserve {requested} bytes for compiled code")]
    OutOfMemory { requested: usize },
}
