//! Validation problems and the channel they are reported through.
//!
//! Evaluators never fail with an error when an instance is invalid. They
//! build a [`Problem`] carrying a [`MessageKey`] and named parameters and
//! hand it to a [`ProblemDispatcher`]. Rendering keys into human-readable
//! text is left to the consumer.

mod dispatcher;
mod message;
mod param;
mod record;

pub use dispatcher::{ProblemDispatcher, ProblemList};
pub use message::MessageKey;
pub use param::{ParamValue, Params};
pub use record::Problem;
