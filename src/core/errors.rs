use thiserror::Error;

#[derive(Error, Debug)]
pub enum TansuError {
    #[error("I/O error: {0}")]
    Io(Box<std::io::Error>),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("closet document is malformed: {0}")]
    Malformed(String),

    #[error("box number {0} is out of range (valid: 1-7)")]
    BoxOutOfRange(usize),

    #[error("box {box_number} is full ({capacity} items)")]
    BoxFull { box_number: usize, capacity: usize },

    #[error("a cloth named '{0}' already exists")]
    DuplicateName(String),

    #[error("category index {0} is out of range (valid: 0-6)")]
    UnknownCategoryIndex(usize),

    #[error("unknown category: {0}")]
    UnknownCategory(String),

    #[error("TansuError: {0}")]
    Custom(String),
}

impl From<std::io::Error> for TansuError {
    fn from(error: std::io::Error) -> Self {
        TansuError::Io(Box::new(error))
    }
}
