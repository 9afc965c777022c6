// Adapters layer: concrete implementations of the domain ports (file system, terminal, external commands).

pub mod collaborators;
pub mod operator;
pub mod storage;
