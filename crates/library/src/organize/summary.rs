use crate::organize::Action;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Running tally of an organize pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub moved: u64,
    pub previewed: u64,
    pub skipped: u64,
    pub unchanged: u64,
    pub failed: u64,
}
impl Summary {
    pub fn record(&mut self, action: &Action) {
        match action {
            Action::Unchanged(_) => self.unchanged += 1,
            Action::Previewed { .. } => self.previewed += 1,
            Action::Skipped { .. } => self.skipped += 1,
            Action::Moved { .. } => self.moved += 1,
        }
    }

    pub fn record_failure(&mut self) {
        self.failed += 1;
    }

    /// Number of items processed, successfully or not.
    pub fn total(&self) -> u64 {
        self.moved + self.previewed + self.skipped + self.unchanged + self.failed
    }
}

impl Display for Summary {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "{} moved, {} previewed, {} skipped, {} unchanged, {} failed",
            self.moved, self.previewed, self.skipped, self.unchanged, self.failed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_tally() {
        let (from, to) = (PathBuf::from("a.flac"), PathBuf::from("b/a.flac"));
        let mut summary = Summary::default();
        summary.record(&Action::Unchanged(from.clone()));
        summary.record(&Action::Unchanged(from.clone()));
        summary.record(&Action::Skipped { from: from.clone(), to: to.clone() });
        summary.record(&Action::Moved { from, to, pruned: vec![] });
        summary.record_failure();
        assert_eq!(
            summary,
            Summary {
                moved: 1,
                previewed: 0,
                skipped: 1,
                unchanged: 2,
                failed: 1
            }
        );
        assert_eq!(summary.total(), 5);
        assert_eq!(summary.to_string(), "1 moved, 0 previewed, 1 skipped, 2 unchanged, 1 failed");
    }
}
