mod event;
mod instance_type;
mod location;
mod outcome;

pub use event::Event;
pub use instance_type::InstanceType;
pub use location::Location;
pub use outcome::Outcome;
