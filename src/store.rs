//! Backing store contract and its SQLite implementation.

pub mod queries;
pub mod sqlite;
#[cfg(test)] pub mod test_utils;

use crate::{
  BranchId,
  LeafId,
  NodeId,
  error::Result,
  query::Query,
};

/// What the generator needs from a relational engine: inserts that hand back
/// an autogenerated row id, an exact-match point lookup, ad-hoc query
/// execution, and a commit boundary. Any engine with these operations can
/// host the generated trees.
pub trait Store {
  /// Inserts a leaf row, returning its id. No uniqueness by name.
  fn insert_leaf(&mut self, name: i64) -> Result<LeafId>;

  /// Point lookup of a leaf by name, for the interning policy. When several
  /// rows share the name, any one of them may be returned.
  fn find_leaf(&self, name: i64) -> Result<Option<LeafId>>;

  /// Inserts a branch row, returning its id. No uniqueness by name.
  fn insert_branch(&mut self, name: i64) -> Result<BranchId>;

  /// Records `child` as the `idx`-th child of `parent`.
  fn insert_child(
    &mut self,
    parent: BranchId,
    idx: i64,
    child: NodeId,
  ) -> Result<()>;

  /// Commits everything written since the previous commit.
  fn commit(&mut self) -> Result<()>;

  /// Executes an ad-hoc query and returns how many rows it matched.
  fn count_matches(&self, query: &Query) -> Result<usize>;
}
