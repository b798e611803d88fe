// Error taxonomy for the disavow pipeline.
//
// Table-local errors (a single backlink export that can't be read or mapped)
// are caught by the generate pipeline and turned into skip warnings. The rest
// abort the operation they occur in.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DisavowError {
    /// A backlink table's headers can't be mapped onto the canonical record shape.
    #[error("unrecognized backlink export format in {table}: {reason}")]
    UnrecognizedSchema { table: String, reason: String },

    /// A backlink table parsed but has no rows or no columns.
    #[error("{table} is empty or has no columns")]
    EmptyInput { table: String },

    /// A backlink table couldn't be decoded as UTF-8 or the Western fallback encoding.
    #[error("could not decode {table}: {reason}")]
    DecodeFailure { table: String, reason: String },

    /// A backlink table decoded but isn't valid delimited data.
    #[error("malformed delimited data in {table}: {reason}")]
    Malformed { table: String, reason: String },

    /// A backlink table couldn't be read from disk.
    #[error("could not read {table}: {source}")]
    Unreadable {
        table: String,
        #[source]
        source: std::io::Error,
    },

    /// A tabular input lacks a column the operation depends on.
    #[error("{input} has no `{column}` column")]
    MissingColumn { input: String, column: String },

    /// A workbook lacks the sheet the operation depends on.
    #[error("{input} has no sheet named \"{sheet}\"")]
    MissingSheet { input: String, sheet: String },

    /// A required input wasn't supplied at all.
    #[error("missing required input: {0}")]
    MissingRequiredInput(String),

    /// A spam rule couldn't be built from its phrase list.
    #[error("invalid {category} rule: {reason}")]
    InvalidRule { category: String, reason: String },

    /// Every backlink table was skipped, so there is nothing to classify.
    #[error("no usable backlink tables ({skipped} skipped)")]
    NoUsableTables { skipped: usize },
}

impl DisavowError {
    /// Whether this error only invalidates the one table it came from.
    pub fn is_table_local(&self) -> bool {
        matches!(
            self,
            DisavowError::UnrecognizedSchema { .. }
                | DisavowError::EmptyInput { .. }
                | DisavowError::DecodeFailure { .. }
                | DisavowError::Malformed { .. }
                | DisavowError::Unreadable { .. }
        )
    }
}
