use std::collections::{HashSet, VecDeque};

use git2::Oid;

use super::RefReader;
use crate::domain::Commit;
use crate::error::Result;

/// Breadth-first ancestor walk with a visited set
///
/// Every commit is yielded at most once, so merge-heavy histories cost
/// O(reachable commits). The first error ends the walk.
pub struct Ancestors<'r, R: RefReader> {
    reader: &'r R,
    queue: VecDeque<Oid>,
    seen: HashSet<Oid>,
    failed: bool,
}

impl<'r, R: RefReader> Ancestors<'r, R> {
    pub fn new(reader: &'r R, start: Oid) -> Self {
        let mut seen = HashSet::new();
        seen.insert(start);
        Ancestors {
            reader,
            queue: VecDeque::from([start]),
            seen,
            failed: false,
        }
    }
}

impl<R: RefReader> Iterator for Ancestors<'_, R> {
    type Item = Result<Commit>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let id = self.queue.pop_front()?;

        match self.reader.find_commit(id) {
            Ok(commit) => {
                for parent in &commit.parents {
                    if self.seen.insert(*parent) {
                        self.queue.push_back(*parent);
                    }
                }
                Some(Ok(commit))
            }
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}
