use crate::types::{Event, Location};

/// Incidental data about the event being evaluated.
pub trait EventContext {
    /// Where the current event starts in the source text.
    fn location(&self) -> Location;

    /// JSON pointer of the value the current event belongs to.
    fn pointer(&self) -> String;
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Frame {
    Object(Option<String>),
    Array(Option<usize>),
}

/// Tracks the JSON pointer and depth of a streamed document.
///
/// Call [`PathTracker::enter`] before an event is evaluated and
/// [`PathTracker::leave`] after. Between the two calls the tracker describes
/// the event: its depth relative to the root and the pointer of the value it
/// belongs to.
///
/// # Example
///
/// ```
/// use jsv::{Event, EventContext, PathTracker};
///
/// let mut tracker = PathTracker::new();
/// for event in [Event::StartObject, Event::Key("a/b".into())] {
///     tracker.enter(&event);
///     tracker.leave(&event);
/// }
/// let value = Event::StartArray;
/// tracker.enter(&value);
/// assert_eq!(tracker.pointer(), "/a~1b");
/// assert_eq!(tracker.depth(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PathTracker {
    frames: Vec<Frame>,
    location: Location,
}

impl PathTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of open containers around the current event.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn set_location(&mut self, location: Location) {
        self.location = location;
    }

    /// Update the path for an event about to be evaluated.
    pub fn enter(&mut self, event: &Event<'_>) {
        match event {
            Event::EndObject | Event::EndArray => {
                self.frames.pop();
            }
            Event::Key(name) => {
                if let Some(Frame::Object(key)) = self.frames.last_mut() {
                    *key = Some(name.to_string());
                }
            }
            _ => {
                if let Some(Frame::Array(index)) = self.frames.last_mut() {
                    *index = Some(index.map_or(0, |i| i + 1));
                }
            }
        }
    }

    /// Update the path after an event was evaluated.
    pub fn leave(&mut self, event: &Event<'_>) {
        match event {
            Event::StartObject => self.frames.push(Frame::Object(None)),
            Event::StartArray => self.frames.push(Frame::Array(None)),
            _ => {}
        }
    }
}

impl EventContext for PathTracker {
    fn location(&self) -> Location {
        self.location
    }

    fn pointer(&self) -> String {
        let mut pointer = String::new();
        for frame in &self.frames {
            match frame {
                Frame::Object(Some(key)) => {
                    pointer.push('/');
                    pointer.push_str(&key.replace('~', "~0").replace('/', "~1"));
                }
                Frame::Array(Some(index)) => {
                    pointer.push('/');
                    pointer.push_str(&index.to_string());
                }
                Frame::Object(None) | Frame::Array(None) => {}
            }
        }
        pointer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_events;

    fn pointers(input: &str) -> Vec<(String, usize)> {
        let mut tracker = PathTracker::new();
        let mut seen = Vec::new();
        for event in parse_events(input).unwrap() {
            tracker.enter(&event);
            seen.push((tracker.pointer(), tracker.depth()));
            tracker.leave(&event);
        }
        seen
    }

    #[test]
    fn array_elements_are_indexed() {
        let seen = pointers("[1, [true], 3]");
        let expected = [
            ("", 0),
            ("/0", 1),
            ("/1", 1),
            ("/1/0", 2),
            ("/1", 1),
            ("/2", 1),
            ("", 0),
        ];
        let expected: Vec<(String, usize)> = expected
            .iter()
            .map(|(p, d)| ((*p).to_string(), *d))
            .collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn object_members_use_escaped_keys() {
        let seen = pointers(r#"{"m~n": {"x": null}}"#);
        assert_eq!(seen[1].0, "/m~0n");
        assert_eq!(seen[4].0, "/m~0n/x");
        assert_eq!(seen[5], ("/m~0n".to_string(), 1));
        assert_eq!(seen[6], (String::new(), 0));
    }
}
