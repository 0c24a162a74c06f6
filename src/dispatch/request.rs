use std::fmt;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub enum Direction {
    Up,
    Down,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "UP"),
            Direction::Down => write!(f, "DOWN"),
        }
    }
}

/// A rider waiting at `origin_floor` who wants to reach `destination_floor`.
///
/// Requests are plain values. Two requests with the same floors and direction
/// are still two riders; the queue keeps both.
///
/// # Example
/// ```rust
/// use elevator::dispatch::request::{Direction, Request};
/// let request = Request::new(2, 5, Direction::Up);
/// assert_eq!(request.to_string(), "[2,5,UP]");
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Request {
    pub origin_floor: i32,
    pub destination_floor: i32,
    pub direction: Direction,
}

impl Request {
    pub fn new(origin_floor: i32, destination_floor: i32, direction: Direction) -> Request {
        Request {
            origin_floor,
            destination_floor,
            direction,
        }
    }

    /// Ordering key used by the dispatch queue.
    pub fn key(&self) -> (i32, i32) {
        (self.origin_floor, self.destination_floor)
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{},{},{}]",
            self.origin_floor, self.destination_floor, self.direction
        )
    }
}
