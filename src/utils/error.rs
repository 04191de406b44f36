use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("vertex #{0} out of range for graph of {1} vertices")]
    VertexOutOfRange(usize, usize),
    #[error("arc {0} -> {1} carries invalid weight {2}")]
    InvalidWeight(usize, usize, f64),
}
