/// The tri-state result of feeding one event to an evaluator.
///
/// `Pending` means the evaluator needs more events. An evaluator never
/// returns `Pending` for its terminal event: the closing event of its
/// container, or the single event of a scalar value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    True,
    False,
    Pending,
}

impl Outcome {
    /// Whether a final decision has been reached.
    pub fn is_decided(self) -> bool {
        self != Outcome::Pending
    }

    /// The decision as a boolean, if decided.
    pub fn as_bool(self) -> Option<bool> {
        match self {
            Outcome::True => Some(true),
            Outcome::False => Some(false),
            Outcome::Pending => None,
        }
    }
}

impl From<bool> for Outcome {
    fn from(value: bool) -> Self {
        if value { Outcome::True } else { Outcome::False }
    }
}
