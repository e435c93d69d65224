//! Ordered log of recoverable problems

use crate::types::{Problem, ProblemKind};

/// Append-only problem collector
///
/// Problems keep the order they were reported in; nothing is merged or
/// deduplicated.
#[derive(Debug, Default)]
pub struct ProblemLog {
    problems: Vec<Problem>,
}

impl ProblemLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a problem found on `line`
    pub fn report(&mut self, line: usize, kind: ProblemKind) {
        let problem = Problem::new(line, kind);
        log::debug!("Line {}: {} ({})", problem.line, problem.description, problem.severity);
        self.problems.push(problem);
    }

    pub fn len(&self) -> usize {
        self.problems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }

    pub fn into_vec(self) -> Vec<Problem> {
        self.problems
    }
}
