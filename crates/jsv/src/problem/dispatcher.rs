use std::mem;
use std::slice::Iter;
use std::vec::IntoIter;

use super::{MessageKey, Problem};
use crate::params;
use crate::parser::ParseError;
use crate::schema::Schema;

/// Receiver of the problems found while evaluating an instance.
pub trait ProblemDispatcher {
    /// Dispatch one problem.
    fn dispatch_problem(&mut self, problem: Problem);

    /// Dispatch the problem raised when the event source itself fails.
    ///
    /// No further evaluation takes place after this call.
    fn dispatch_inevitable_problem(&mut self, error: &ParseError, schema: &Schema) {
        let problem = Problem::builder()
            .key(MessageKey::Syntax)
            .params(params! {
                "message" => error.detail(),
                "schema" => schema.to_string(),
            })
            .location(error.location())
            .build();
        self.dispatch_problem(problem);
    }
}

/// An ordered collection of dispatched problems.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProblemList {
    problems: Vec<Problem>,
}

impl ProblemList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.problems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }

    pub fn iter(&self) -> Iter<'_, Problem> {
        self.problems.iter()
    }

    pub fn as_slice(&self) -> &[Problem] {
        &self.problems
    }

    /// Move all problems out, leaving this list empty.
    pub fn take(&mut self) -> Vec<Problem> {
        mem::take(&mut self.problems)
    }

    pub fn into_vec(self) -> Vec<Problem> {
        self.problems
    }
}

impl ProblemDispatcher for ProblemList {
    fn dispatch_problem(&mut self, problem: Problem) {
        self.problems.push(problem);
    }
}

impl IntoIterator for ProblemList {
    type Item = Problem;
    type IntoIter = IntoIter<Problem>;

    fn into_iter(self) -> Self::IntoIter {
        self.problems.into_iter()
    }
}

impl<'a> IntoIterator for &'a ProblemList {
    type Item = &'a Problem;
    type IntoIter = Iter<'a, Problem>;

    fn into_iter(self) -> Self::IntoIter {
        self.problems.iter()
    }
}
