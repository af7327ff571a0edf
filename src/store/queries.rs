//! SQL text for the tree schema and its point statements.

/// Three relations: the two node kinds plus the ordered child edges. A child
/// edge is a tagged union in disguise: `is_branch` discriminates which of the
/// two nullable foreign keys holds the target.
pub(crate) const SCHEMA: &str = "
  CREATE TABLE IF NOT EXISTS Leaf (
    leaf_id INTEGER PRIMARY KEY AUTOINCREMENT,
    name INTEGER
  );

  CREATE TABLE IF NOT EXISTS Branch (
    branch_id INTEGER PRIMARY KEY AUTOINCREMENT,
    name INTEGER
  );

  CREATE TABLE IF NOT EXISTS Child (
    child_id INTEGER PRIMARY KEY AUTOINCREMENT,
    parent_branch INTEGER,
    idx INTEGER,
    is_branch BOOLEAN,
    branch INTEGER,
    leaf INTEGER,
    FOREIGN KEY (parent_branch) REFERENCES Branch (branch_id)
      ON DELETE NO ACTION ON UPDATE NO ACTION,
    FOREIGN KEY (branch) REFERENCES Branch (branch_id)
      ON DELETE NO ACTION ON UPDATE NO ACTION,
    FOREIGN KEY (leaf) REFERENCES Leaf (leaf_id)
      ON DELETE NO ACTION ON UPDATE NO ACTION
  );

  CREATE INDEX IF NOT EXISTS leafNameIx ON Leaf (name);
  CREATE INDEX IF NOT EXISTS branchNameIx ON Branch (name);
  CREATE INDEX IF NOT EXISTS childPBIx ON Child (parent_branch);
  CREATE INDEX IF NOT EXISTS childBIx ON Child (branch);
  CREATE INDEX IF NOT EXISTS childLIx ON Child (leaf);
  CREATE INDEX IF NOT EXISTS childISDIx ON Child (idx, is_branch);
";

pub(crate) const INSERT_LEAF: &str = "INSERT INTO Leaf (name) VALUES (?);";

pub(crate) const QUERY_LEAF: &str =
  "SELECT leaf_id FROM Leaf WHERE name = ?;";

pub(crate) const INSERT_BRANCH: &str =
  "INSERT INTO Branch (name) VALUES (?);";

pub(crate) const INSERT_BRANCH_CHILD: &str = "
  INSERT INTO Child (parent_branch, idx, is_branch, branch)
  VALUES (?, ?, 1, ?);
";

pub(crate) const INSERT_LEAF_CHILD: &str = "
  INSERT INTO Child (parent_branch, idx, is_branch, leaf)
  VALUES (?, ?, 0, ?);
";
