use std::path::Path;

use log::debug;
use rusqlite::{
  Connection,
  OptionalExtension as _,
};

use crate::{
  BranchId,
  LeafId,
  NodeId,
  error::Result,
  query::Query,
  store::{
    Store,
    queries,
  },
};

/// SQLite-backed store over a single long-lived connection.
///
/// A transaction is open at all times; [`Store::commit`] ends it and starts
/// the next one, so writes between commits roll back when the store is
/// dropped. Note that SQLite caps a join at 64 tables, which bounds how deep
/// and wide a queryable tree can get.
#[derive(Debug)]
pub struct SqliteStore {
  conn: Connection,
}

impl SqliteStore {
  /// Opens an in-memory store with the tree schema applied.
  pub fn in_memory() -> Result<Self> {
    Self::from_connection(Connection::open_in_memory()?)
  }

  /// Opens (or creates) a store backed by a database file.
  pub fn open(path: &Path) -> Result<Self> {
    Self::from_connection(Connection::open(path)?)
  }

  fn from_connection(conn: Connection) -> Result<Self> {
    conn.execute_batch(queries::SCHEMA)?;
    conn.execute_batch("BEGIN;")?;
    debug!("tree schema applied, first transaction open");
    Ok(Self { conn })
  }
}

impl Store for SqliteStore {
  fn insert_leaf(&mut self, name: i64) -> Result<LeafId> {
    self
      .conn
      .prepare_cached(queries::INSERT_LEAF)?
      .execute([name])?;
    Ok(LeafId(self.conn.last_insert_rowid()))
  }

  fn find_leaf(&self, name: i64) -> Result<Option<LeafId>> {
    let id = self
      .conn
      .prepare_cached(queries::QUERY_LEAF)?
      .query_row([name], |row| row.get(0))
      .optional()?;
    Ok(id.map(LeafId))
  }

  fn insert_branch(&mut self, name: i64) -> Result<BranchId> {
    self
      .conn
      .prepare_cached(queries::INSERT_BRANCH)?
      .execute([name])?;
    Ok(BranchId(self.conn.last_insert_rowid()))
  }

  fn insert_child(
    &mut self,
    parent: BranchId,
    idx: i64,
    child: NodeId,
  ) -> Result<()> {
    let statement = if child.is_branch() {
      queries::INSERT_BRANCH_CHILD
    } else {
      queries::INSERT_LEAF_CHILD
    };
    self
      .conn
      .prepare_cached(statement)?
      .execute([*parent, idx, child.row_id()])?;
    Ok(())
  }

  fn commit(&mut self) -> Result<()> {
    self.conn.execute_batch("COMMIT; BEGIN;")?;
    Ok(())
  }

  fn count_matches(&self, query: &Query) -> Result<usize> {
    let mut statement = self.conn.prepare(&query.sql)?;
    let rows = statement
      .query_map(rusqlite::params_from_iter(&query.params), |_| Ok(()))?;

    let mut count = 0;
    for row in rows {
      row?;
      count += 1;
    }
    Ok(count)
  }
}

#[cfg(test)]
mod tests {
  use crate::{
    NodeId,
    query::Query,
    store::{
      Store as _,
      sqlite::SqliteStore,
      test_utils,
    },
  };

  #[test]
  fn find_leaf_sees_uncommitted_insert() {
    test_utils::init_test_logger();
    let mut store = SqliteStore::in_memory().expect("open store");

    let id = store.insert_leaf(7).expect("insert leaf");
    assert_eq!(store.find_leaf(7).expect("find leaf"), Some(id));
    assert_eq!(store.find_leaf(8).expect("find absent leaf"), None);
  }

  #[test]
  fn child_edges_record_kind_and_position() {
    let mut store = SqliteStore::in_memory().expect("open store");

    let parent = store.insert_branch(1).expect("insert branch");
    let branch = store.insert_branch(2).expect("insert branch");
    let leaf = store.insert_leaf(3).expect("insert leaf");
    store
      .insert_child(parent, 0, NodeId::Branch(branch))
      .expect("insert branch edge");
    store
      .insert_child(parent, 1, NodeId::Leaf(leaf))
      .expect("insert leaf edge");

    let branch_edge = Query {
      sql:    "SELECT child_id FROM Child WHERE parent_branch = ? AND idx = \
               ? AND is_branch = 1 AND branch = ?;"
        .into(),
      params: vec![*parent, 0, *branch],
    };
    let leaf_edge = Query {
      sql:    "SELECT child_id FROM Child WHERE parent_branch = ? AND idx = \
               ? AND is_branch = 0 AND leaf = ?;"
        .into(),
      params: vec![*parent, 1, *leaf],
    };

    assert_eq!(store.count_matches(&branch_edge).expect("count"), 1);
    assert_eq!(store.count_matches(&leaf_edge).expect("count"), 1);
  }

  #[test]
  fn commit_persists_across_reopen() {
    let dir = tempfile::TempDir::new().expect("create temp dir");
    let path = dir.path().join("trees.db");

    {
      let mut store = SqliteStore::open(&path).expect("open store");
      store.insert_leaf(42).expect("insert leaf");
      store.commit().expect("commit");
    }

    let store = SqliteStore::open(&path).expect("reopen store");
    assert!(store.find_leaf(42).expect("find leaf").is_some());
  }

  #[test]
  fn uncommitted_writes_roll_back_on_drop() {
    let dir = tempfile::TempDir::new().expect("create temp dir");
    let path = dir.path().join("trees.db");

    {
      let mut store = SqliteStore::open(&path).expect("open store");
      store.insert_leaf(42).expect("insert leaf");
    }

    let store = SqliteStore::open(&path).expect("reopen store");
    assert_eq!(store.find_leaf(42).expect("find leaf"), None);
  }
}
