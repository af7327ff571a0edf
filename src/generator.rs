//! The tree-and-query generator.
//!
//! One pass builds a randomly shaped tree of branch and leaf rows in the
//! store, depth-first, and on the way back up assembles a query that pins
//! every stored node down by name, child position and kind. Executing that
//! query against the same store must yield exactly one row: the chain of row
//! ids from the root to the innermost nodes.

use log::{
  debug,
  trace,
};

use crate::{
  NodeId,
  error::{
    Error,
    Result,
  },
  query::{
    Query,
    QueryParts,
  },
  store::Store,
};

/// Uniform draws backing the generator. Injectable so tests can replay a
/// fixed sequence instead of sampling.
pub trait RandomSource {
  /// Draws a value uniformly from `[0, bound)`. `bound` is at least 1.
  fn below(&mut self, bound: u64) -> u64;
}

impl RandomSource for fastrand::Rng {
  fn below(&mut self, bound: u64) -> u64 {
    self.u64(..bound)
  }
}

/// Odds of cutting a subtree short with a leaf before depth runs out: at
/// every node above depth zero, a draw over `sides` outcomes greater than
/// `cutoff` forces a leaf. The default reproduces the historical 2-in-8
/// chance; the exact fraction only shapes the tree distribution and carries
/// no other meaning, hence it is configurable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeafOdds {
  pub sides:  u64,
  pub cutoff: u64,
}

impl Default for LeafOdds {
  fn default() -> Self {
    Self { sides: 8, cutoff: 5 }
  }
}

/// Shape parameters for one generation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorConfig {
  /// Maximum recursion depth. At depth zero the generator always produces a
  /// leaf.
  pub depth: u32,

  /// Exclusive upper bound on children per branch; the child count is drawn
  /// from `[0, length)`. `length == 1` therefore makes every branch
  /// childless, which is a valid empty branch, not an error.
  pub length: u64,

  /// Early-termination policy.
  pub leaf_odds: LeafOdds,
}

impl Default for GeneratorConfig {
  fn default() -> Self {
    Self::new(1, 1)
  }
}

impl GeneratorConfig {
  #[must_use]
  pub fn new(depth: u32, length: u64) -> Self {
    Self {
      depth,
      length,
      leaf_odds: LeafOdds::default(),
    }
  }

  fn validate(&self) -> Result<()> {
    if self.length < 1 {
      return Err(Error::Configuration {
        reason: format!("length must be at least 1, got {}", self.length),
      });
    }
    if self.leaf_odds.sides < 1 {
      return Err(Error::Configuration {
        reason: "leaf odds need at least one side".into(),
      });
    }
    Ok(())
  }
}

/// The outcome of one generation pass: the root node written to the store
/// and the query that should re-find it.
#[derive(Debug)]
pub struct GeneratedTree {
  pub root:  NodeId,
  pub query: Query,
}

impl GeneratedTree {
  /// Executes the derived query and verifies the pass post-condition: the
  /// result set holds exactly one row.
  pub fn check<S: Store>(&self, store: &S) -> Result<()> {
    let rows = store.count_matches(&self.query)?;
    if rows == 1 {
      Ok(())
    } else {
      Err(Error::GenerationInvariant {
        sql: self.query.sql.clone(),
        rows,
      })
    }
  }
}

/// What a recursion level hands to its parent: how to select and join the
/// node it created.
struct NodeSpec {
  alias:  u64,
  column: String,
  table:  String,
  node:   NodeId,
}

/// Builds random trees and the queries that match them.
///
/// Leaf rows are interned by name during query-deriving passes: an existing
/// leaf with the drawn name is reused instead of inserting a duplicate, so
/// trees in one store may share leaves. Branches are always fresh.
pub struct TreeQueryGenerator<R> {
  config:  GeneratorConfig,
  rng:     R,
  aliases: u64,
}

impl<R: RandomSource> TreeQueryGenerator<R> {
  pub fn new(config: GeneratorConfig, rng: R) -> Self {
    Self {
      config,
      rng,
      aliases: 0,
    }
  }

  /// Runs one generation pass: populates the store with a random tree,
  /// commits, and returns the root together with the derived query.
  pub fn generate<S: Store>(&mut self, store: &mut S) -> Result<GeneratedTree> {
    self.config.validate()?;
    self.aliases = 0;

    let (root, parts) = self.grow(store, self.config.depth)?;
    store.commit()?;

    let query = parts.render(&root.table);
    debug!(
      "generated tree rooted at {root:?} with {params} bound values",
      root = root.node,
      params = query.params.len(),
    );

    Ok(GeneratedTree {
      root: root.node,
      query,
    })
  }

  /// Populates the store with a random tree without deriving a query.
  /// Unlike [`generate`](Self::generate), leaves are always fresh rows here,
  /// since nothing needs to re-find them by name.
  pub fn plant<S: Store>(&mut self, store: &mut S) -> Result<NodeId> {
    self.config.validate()?;
    let node = self.plant_node(store, self.config.depth)?;
    store.commit()?;
    Ok(node)
  }

  fn next_alias(&mut self) -> u64 {
    self.aliases += 1;
    self.aliases
  }

  /// Whether the node at `depth` becomes a leaf: forced at depth zero,
  /// otherwise decided by the early-termination draw.
  fn wants_leaf(&mut self, depth: u32) -> bool {
    depth == 0
      || self.rng.below(self.config.leaf_odds.sides)
        > self.config.leaf_odds.cutoff
  }

  /// Draws a node name from a range sized by remaining depth, so deeper
  /// nodes pick from a larger space. This only reduces the collision
  /// probability; it guarantees nothing.
  fn draw_name(&mut self, depth: u32) -> i64 {
    let exponent = self.config.depth - depth + 1;
    let span = 10_i64.checked_pow(exponent).unwrap_or(i64::MAX);
    self.rng.below(span as u64) as i64
  }

  fn grow<S: Store>(
    &mut self,
    store: &mut S,
    depth: u32,
  ) -> Result<(NodeSpec, QueryParts)> {
    let mut parts = QueryParts::default();

    if self.wants_leaf(depth) {
      let name = self.draw_name(depth);
      let id = match store.find_leaf(name)? {
        Some(id) => id,
        None => store.insert_leaf(name)?,
      };

      let alias = self.next_alias();
      trace!("leaf {name} as l{alias} (row {id})", id = *id);
      parts.selects.push(format!("l{alias}.leaf_id as l{alias}id"));
      parts.push_predicate(format!("l{alias}.name = ?"), name);

      return Ok((
        NodeSpec {
          alias,
          column: format!("l{alias}.leaf_id"),
          table: format!("Leaf as l{alias}"),
          node: NodeId::Leaf(id),
        },
        parts,
      ));
    }

    let name = self.draw_name(depth);
    let id = store.insert_branch(name)?;

    let alias = self.next_alias();
    trace!("branch {name} as b{alias} (row {id})", id = *id);
    let column = format!("b{alias}.branch_id");
    parts
      .selects
      .push(format!("b{alias}.branch_id as b{alias}id"));
    parts.push_predicate(format!("b{alias}.name = ?"), name);

    let children = self.rng.below(self.config.length);
    for idx in 0..children {
      let (child, child_parts) = self.grow(store, depth - 1)?;
      store.insert_child(id, idx as i64, child.node)?;

      // The edge alias borrows the child's number, which is unique per pass.
      let edge = format!("ch{alias}", alias = child.alias);
      let target = if child.node.is_branch() {
        "branch"
      } else {
        "leaf"
      };
      parts
        .joins
        .push(format!("JOIN Child as {edge} ON {edge}.parent_branch = {column}"));
      parts.joins.push(format!(
        "JOIN {table} ON {col} = {edge}.{target}",
        table = child.table,
        col = child.column,
      ));
      parts.absorb(child_parts);
      parts.push_predicate(format!("{edge}.idx = ?"), idx as i64);
      parts.push_predicate(
        format!("{edge}.is_branch = ?"),
        i64::from(child.node.is_branch()),
      );
    }

    Ok((
      NodeSpec {
        alias,
        column,
        table: format!("Branch as b{alias}"),
        node: NodeId::Branch(id),
      },
      parts,
    ))
  }

  fn plant_node<S: Store>(
    &mut self,
    store: &mut S,
    depth: u32,
  ) -> Result<NodeId> {
    if self.wants_leaf(depth) {
      let name = self.draw_name(depth);
      return Ok(NodeId::Leaf(store.insert_leaf(name)?));
    }

    let id = store.insert_branch(self.draw_name(depth))?;
    let children = self.rng.below(self.config.length);
    for idx in 0..children {
      let child = self.plant_node(store, depth - 1)?;
      store.insert_child(id, idx as i64, child)?;
    }
    Ok(NodeId::Branch(id))
  }
}
