use thiserror::Error;

#[derive(Error, Debug)]
pub enum GraphError {
	#[error("duplicate skill id: {0}")]
	DuplicateId(String),

	#[error("skill data could not be decoded: {0}")]
	Parse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GraphError>;
