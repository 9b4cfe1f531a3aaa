use parking_lot::Mutex;

/// One record of a table. The mutex guards only this row's cells; it is held
/// just long enough to snapshot or overwrite them, never across I/O.
#[derive(Debug)]
pub struct Row {
    cells: Mutex<Vec<String>>,
}

impl Row {
    #[must_use]
    pub fn new(cells: Vec<String>) -> Self {
        Self {
            cells: Mutex::new(cells),
        }
    }

    /// Copies the cells out under the row lock, so a reader never observes a
    /// half-written row.
    #[must_use]
    pub fn snapshot(&self) -> Vec<String> {
        self.cells.lock().clone()
    }

    /// Tests the cell at `col` with `test` and, on a match, overwrites the
    /// cells named by `assignments` (column index, new value) in one critical
    /// section. Returns whether the row matched.
    pub fn update_if(
        &self,
        test: impl FnOnce(&[String]) -> bool,
        assignments: &[(usize, String)],
    ) -> bool {
        let mut cells = self.cells.lock();
        if !test(&cells) {
            return false;
        }
        for (idx, value) in assignments {
            cells[*idx] = value.clone();
        }
        true
    }

    /// Tests the row under its lock without mutating it.
    pub fn matches(&self, test: impl FnOnce(&[String]) -> bool) -> bool {
        test(&self.cells.lock())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_copies_cells() {
        let row = Row::new(vec!["1".into(), "Amy".into()]);
        assert_eq!(row.snapshot(), vec!["1".to_string(), "Amy".to_string()]);
    }

    #[test]
    fn test_update_if_only_on_match() {
        let row = Row::new(vec!["1".into(), "Amy".into()]);
        let changed = row.update_if(|cells| cells[0] == "2", &[(1, "Bo".into())]);
        assert!(!changed);
        assert_eq!(row.snapshot()[1], "Amy");

        let changed = row.update_if(|cells| cells[0] == "1", &[(1, "Bo".into())]);
        assert!(changed);
        assert_eq!(row.snapshot()[1], "Bo");
    }
}
