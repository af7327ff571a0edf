use thiserror::Error;

/// Failures surfaced by a generation pass.
///
/// None of these are retried: the generator is deterministic given a random
/// source and the store contents, so a failure is reported as-is.
#[derive(Debug, Error)]
pub enum Error {
  /// The store rejected a write (duplicate key, foreign key). Fatal for the
  /// whole pass.
  #[error("store rejected statement: {source}")]
  Constraint {
    #[from]
    source: rusqlite::Error,
  },

  /// The derived query did not match exactly one row, meaning the alias or
  /// fragment composition went wrong somewhere during the pass.
  #[error("query matched {rows} rows, expected exactly one: {sql}")]
  GenerationInvariant { sql: String, rows: usize },

  /// Rejected before any row is written.
  #[error("invalid generator configuration: {reason}")]
  Configuration { reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;
