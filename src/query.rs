//! Structured query fragments and their rendering.
//!
//! The generator never splices values into query text. It accumulates
//! fragments in a [`QueryParts`] and renders them once, at the end of the
//! pass, with every literal bound as a positional parameter.

use itertools::Itertools as _;

/// A rendered query plus the values to bind, in placeholder order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
  pub sql:    String,
  pub params: Vec<i64>,
}

/// Fragments accumulated for one subtree.
///
/// Each recursion level owns its fragments and splices its children's in
/// child order, so sibling subtrees never interleave. `params` runs parallel
/// to `predicates`: one bound value per predicate.
#[derive(Debug, Default)]
pub struct QueryParts {
  pub(crate) selects:    Vec<String>,
  pub(crate) joins:      Vec<String>,
  pub(crate) predicates: Vec<String>,
  pub(crate) params:     Vec<i64>,
}

impl QueryParts {
  pub(crate) fn push_predicate(&mut self, predicate: String, param: i64) {
    self.predicates.push(predicate);
    self.params.push(param);
  }

  /// Splices a child subtree's fragments into this one, preserving the
  /// child's internal order.
  pub(crate) fn absorb(&mut self, child: QueryParts) {
    self.selects.extend(child.selects);
    self.joins.extend(child.joins);
    self.predicates.extend(child.predicates);
    self.params.extend(child.params);
  }

  /// Renders the final query text. `root_table` is the table expression of
  /// the tree's root node; every other table is introduced by a join clause.
  pub(crate) fn render(self, root_table: &str) -> Query {
    let selects = self.selects.iter().join(", ");
    let predicates = self.predicates.iter().join(" AND ");

    let mut sql = format!("SELECT DISTINCT {selects} FROM {root_table}");
    for join in &self.joins {
      sql.push(' ');
      sql.push_str(join);
    }
    sql.push_str(&format!(" WHERE {predicates};"));

    Query {
      sql,
      params: self.params,
    }
  }
}
