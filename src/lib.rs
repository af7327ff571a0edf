//! Builds random trees of typed nodes inside a relational store and, in the
//! same pass, derives a SQL query that re-finds exactly the tree it just
//! stored.
//!
//! A tree is made of [`Branch`] and [`Leaf`] rows linked by ordered `Child`
//! edges. [`TreeQueryGenerator`] walks the tree shape depth-first, writes the
//! rows as it goes, and accumulates query fragments (selectable columns, join
//! clauses, predicates) that pin every node down by name and position. The
//! rendered query is expected to match a single row; anything else means the
//! fragment composition is broken and surfaces as
//! [`Error::GenerationInvariant`].
//!
//! [`Branch`]: NodeId::Branch
//! [`Leaf`]: NodeId::Leaf

use derive_more::Deref;

pub mod error;
pub mod generator;
pub mod query;
pub mod store;

pub use error::{
  Error,
  Result,
};
pub use generator::{
  GeneratedTree,
  GeneratorConfig,
  LeafOdds,
  RandomSource,
  TreeQueryGenerator,
};
pub use query::Query;
pub use store::{
  Store,
  sqlite::SqliteStore,
};

/// Row id of a leaf node, assigned by the backing store.
#[derive(Deref, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LeafId(pub(crate) i64);

/// Row id of a branch node, assigned by the backing store.
#[derive(Deref, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BranchId(pub(crate) i64);

/// A stored tree node. Conceptually a sum type; the store encodes it as a
/// discriminant plus two nullable foreign keys on the `Child` relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeId {
  Branch(BranchId),
  Leaf(LeafId),
}

impl NodeId {
  #[must_use]
  pub fn is_branch(self) -> bool {
    matches!(self, Self::Branch(_))
  }

  /// Raw row id in whichever relation the node lives in.
  #[must_use]
  pub fn row_id(self) -> i64 {
    match self {
      Self::Branch(id) => *id,
      Self::Leaf(id) => *id,
    }
  }
}
