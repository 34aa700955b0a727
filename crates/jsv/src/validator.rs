//! Driving one validation run over a stream of events.

use std::mem;

use bon::Builder;
use serde::Serialize;
use tracing::{debug, trace};

use crate::evaluator::{BoxedEvaluator, PathTracker};
use crate::parser::{JsonParser, ParseError};
use crate::problem::{Problem, ProblemDispatcher};
use crate::schema::Schema;
use crate::types::{Event, Location};

/// Options for a validation run.
#[derive(Debug, Clone, Default, Builder)]
pub struct ValidatorOptions {
    /// Keep at most this many problems; later ones are counted in
    /// [`ValidationReport::dropped`].
    pub max_problems: Option<usize>,
}

/// The result of one validation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    /// `Some(valid)` for a complete document, `None` when the run was
    /// aborted or the document ended early.
    pub outcome: Option<bool>,
    pub problems: Vec<Problem>,
    /// Problems discarded because of [`ValidatorOptions::max_problems`].
    #[serde(skip_serializing_if = "is_zero")]
    pub dropped: usize,
}

impl ValidationReport {
    /// Whether the document was read completely and matched the schema.
    pub fn is_valid(&self) -> bool {
        self.outcome == Some(true)
    }
}

fn is_zero(count: &usize) -> bool {
    *count == 0
}

enum RunState<'s> {
    /// No event seen yet.
    Ready,
    /// The root evaluator is still undecided.
    Evaluating(BoxedEvaluator<'s>),
    /// The root decided; the rest of the document is read for syntax only.
    Draining(bool),
    Finished(bool),
    Aborted,
}

/// Collects problems up to an optional limit.
#[derive(Debug, Default)]
struct ProblemSink {
    problems: Vec<Problem>,
    limit: Option<usize>,
    dropped: usize,
}

impl ProblemDispatcher for ProblemSink {
    fn dispatch_problem(&mut self, problem: Problem) {
        if self.limit.is_some_and(|limit| self.problems.len() >= limit) {
            trace!(%problem, "dropping problem over the limit");
            self.dropped += 1;
            return;
        }
        self.problems.push(problem);
    }
}

/// Validates one instance document against a schema.
///
/// Events are fed one at a time with [`Validator::feed`]. The root evaluator
/// is created from the type of the first event; once it decides, the rest
/// of the document is still consumed so that trailing syntax errors are
/// reported. A failing event source ends the run through
/// [`Validator::abort`].
///
/// # Example
///
/// ```
/// use jsv::{SchemaReader, Validator};
///
/// let schema = SchemaReader::new()
///     .read_str(r#"{"required": ["id"]}"#)
///     .unwrap();
///
/// let report = Validator::validate_str(&schema, r#"{"name": "x"}"#);
/// assert_eq!(report.outcome, Some(false));
/// assert_eq!(report.problems[0].key().as_str(), "instance.problem.required");
///
/// assert!(Validator::validate_str(&schema, r#"{"id": 1}"#).is_valid());
/// ```
pub struct Validator<'s> {
    schema: &'s Schema,
    state: RunState<'s>,
    tracker: PathTracker,
    sink: ProblemSink,
}

impl<'s> Validator<'s> {
    pub fn new(schema: &'s Schema) -> Self {
        Self::with_options(schema, ValidatorOptions::default())
    }

    pub fn with_options(schema: &'s Schema, options: ValidatorOptions) -> Self {
        Self {
            schema,
            state: RunState::Ready,
            tracker: PathTracker::new(),
            sink: ProblemSink {
                limit: options.max_problems,
                ..ProblemSink::default()
            },
        }
    }

    /// Validate a complete document held in memory.
    pub fn validate_str(schema: &'s Schema, text: &str) -> ValidationReport {
        Self::new(schema).run(text)
    }

    /// Parse `text` and feed every event, aborting on the first syntax
    /// error.
    pub fn run(mut self, text: &str) -> ValidationReport {
        let mut parser = JsonParser::new(text);
        while let Some(next) = parser.next() {
            match next {
                Ok(event) => self.feed(&event, parser.location()),
                Err(error) => {
                    self.abort(&error);
                    break;
                }
            }
        }
        self.finish()
    }

    /// Whether the root evaluator has reached a decision.
    pub fn is_decided(&self) -> bool {
        matches!(self.state, RunState::Draining(_) | RunState::Finished(_))
    }

    /// Feed the next event of the document, located at `location`.
    ///
    /// # Panics
    ///
    /// Panics if an event arrives after the document ended or after the run
    /// was aborted, or if the document starts with a closing event or key.
    pub fn feed(&mut self, event: &Event<'_>, location: Location) {
        self.tracker.set_location(location);
        self.tracker.enter(event);
        let depth = self.tracker.depth();
        let closes = depth == 0 && !event.is_start();

        self.state = match mem::replace(&mut self.state, RunState::Aborted) {
            RunState::Ready => {
                let Some(ty) = event.instance_type() else {
                    panic!("document starts with {event}, expected a value");
                };
                debug!(%ty, schema = %self.schema, "run started");
                let root = self.schema.create_evaluator(ty);
                self.step(root, event, depth, closes)
            }
            RunState::Evaluating(root) => self.step(root, event, depth, closes),
            RunState::Draining(valid) if closes => RunState::Finished(valid),
            state @ RunState::Draining(_) => state,
            RunState::Finished(_) => panic!("event {event} received after the document ended"),
            RunState::Aborted => panic!("event {event} received after the run was aborted"),
        };

        self.tracker.leave(event);
    }

    fn step(
        &mut self,
        mut root: BoxedEvaluator<'s>,
        event: &Event<'_>,
        depth: usize,
        closes: bool,
    ) -> RunState<'s> {
        let outcome = root.evaluate(event, &self.tracker, depth, &mut self.sink);
        match outcome.as_bool() {
            Some(valid) => {
                debug!(valid, problems = self.sink.problems.len(), "run decided");
                if closes {
                    RunState::Finished(valid)
                } else {
                    RunState::Draining(valid)
                }
            }
            None if closes => panic!("root evaluator left the document undecided at {event}"),
            None => RunState::Evaluating(root),
        }
    }

    /// End the run because the event source failed.
    ///
    /// Problems found so far are discarded; the report holds the syntax
    /// problem alone and has no outcome.
    pub fn abort(&mut self, error: &ParseError) {
        debug!(%error, "run aborted");
        self.sink.problems.clear();
        self.sink.dropped = 0;
        self.sink.dispatch_inevitable_problem(error, self.schema);
        self.state = RunState::Aborted;
    }

    /// End the run and collect its report.
    pub fn finish(self) -> ValidationReport {
        let outcome = match self.state {
            RunState::Finished(valid) => Some(valid),
            RunState::Aborted => None,
            RunState::Ready | RunState::Evaluating(_) | RunState::Draining(_) => {
                debug!("run finished before the document ended");
                None
            }
        };
        ValidationReport {
            outcome,
            problems: self.sink.problems,
            dropped: self.sink.dropped,
        }
    }
}
