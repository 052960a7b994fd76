use crate::error::Result;
use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Visited registry and product sink for one crawl. Two logically
/// independent sets share the same backing file: `visited` guards container
/// expansion (the catalog graph is not guaranteed acyclic), `recorded`
/// guards the one-line-per-product output. On open, every line of an
/// existing file seeds BOTH sets, so a resumed run neither re-records nor
/// re-expands anything it already wrote.
pub struct Ledger {
    visited: HashSet<String>,
    recorded: HashSet<String>,
    sink: File,
    seeded: usize,
}

impl Ledger {
    /// Open (or create) the sink at `path` and seed the sets from its
    /// current contents. Filesystem errors here are fatal: the traversal
    /// must not begin without a durable sink.
    pub fn open(path: &Path) -> Result<Self> {
        let mut visited = HashSet::new();
        let mut recorded = HashSet::new();

        if path.exists() {
            let existing = std::fs::read_to_string(path)?;
            for line in existing.lines() {
                let id = line.trim();
                if id.is_empty() {
                    continue;
                }
                visited.insert(id.to_string());
                recorded.insert(id.to_string());
            }
            info!("opened existing output file, got {} entries", recorded.len());
        }

        let sink = OpenOptions::new().create(true).append(true).open(path)?;
        let seeded = recorded.len();

        Ok(Self {
            visited,
            recorded,
            sink,
            seeded,
        })
    }

    pub fn is_visited(&self, id: &str) -> bool {
        self.visited.contains(id)
    }

    pub fn mark_visited(&mut self, id: &str) {
        self.visited.insert(id.to_string());
    }

    pub fn is_recorded(&self, id: &str) -> bool {
        self.recorded.contains(id)
    }

    /// Record one product identifier. Returns `false` for a duplicate
    /// without touching the sink. The append goes to the file before the
    /// in-memory set is updated: a failed write propagates and the set is
    /// left untouched, so the sink never lags behind what a resumed run
    /// will treat as already recorded.
    pub fn record(&mut self, id: &str) -> Result<bool> {
        if self.recorded.contains(id) {
            return Ok(false);
        }
        writeln!(self.sink, "{id}")?;
        self.recorded.insert(id.to_string());
        Ok(true)
    }

    /// Entries loaded from a pre-existing file at open time.
    pub fn seeded(&self) -> usize {
        self.seeded
    }

    pub fn recorded_count(&self) -> usize {
        self.recorded.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn fresh_ledger_records_in_discovery_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("en-US.txt");

        let mut ledger = Ledger::open(&path).unwrap();
        assert_eq!(ledger.seeded(), 0);
        assert!(ledger.record("EP9000-CUSA00001_00").unwrap());
        assert!(ledger.record("EP9000-CUSA00002_00").unwrap());
        assert!(ledger.record("EP9000-CUSA00003_00").unwrap());

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            contents,
            "EP9000-CUSA00001_00\nEP9000-CUSA00002_00\nEP9000-CUSA00003_00\n"
        );
    }

    #[test]
    fn duplicate_record_is_a_no_op() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("en-US.txt");

        let mut ledger = Ledger::open(&path).unwrap();
        assert!(ledger.record("A").unwrap());
        assert!(!ledger.record("A").unwrap());
        assert_eq!(ledger.recorded_count(), 1);

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "A\n");
    }

    #[test]
    fn reopen_seeds_both_sets_identically() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("en-US.txt");
        std::fs::write(&path, "A\nB\n").unwrap();

        let mut ledger = Ledger::open(&path).unwrap();
        assert_eq!(ledger.seeded(), 2);
        assert!(ledger.is_recorded("A"));
        assert!(ledger.is_recorded("B"));
        assert!(ledger.is_visited("A"));
        assert!(ledger.is_visited("B"));

        // Seeded ids are no-ops, new ids still append.
        assert!(!ledger.record("A").unwrap());
        assert!(ledger.record("C").unwrap());
        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "A\nB\nC\n");
    }

    #[test]
    fn visited_marks_do_not_leak_into_the_sink() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("en-US.txt");

        let mut ledger = Ledger::open(&path).unwrap();
        ledger.mark_visited("STORE-CONTAINER-1");
        assert!(ledger.is_visited("STORE-CONTAINER-1"));
        assert!(!ledger.is_recorded("STORE-CONTAINER-1"));

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.is_empty());
    }

    #[test]
    fn blank_lines_are_skipped_when_seeding() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("en-US.txt");
        std::fs::write(&path, "A\n\n  \nB\n").unwrap();

        let ledger = Ledger::open(&path).unwrap();
        assert_eq!(ledger.seeded(), 2);
    }
}
