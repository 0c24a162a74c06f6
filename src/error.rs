use thiserror::Error;

use crate::dispatch::request::Direction;

/// Reasons a request is refused at the dispatcher boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid Current Floor/ Destination Floor Selection: floor {floor} is outside {lowest}..={highest}")]
    FloorOutOfRange { floor: i32, lowest: i32, highest: i32 },
    #[error("Invalid Current Floor/ Destination Floor Selection: cannot go DOWN from the lowest floor {floor}")]
    DownFromLowestFloor { floor: i32 },
    #[error("Invalid Current Floor/ Destination Floor Selection: cannot go UP from the highest floor {floor}")]
    UpFromHighestFloor { floor: i32 },
    #[error("Invalid Current Floor/ Destination Floor Selection: {origin} -> {destination} is not {direction}")]
    DirectionMismatch {
        origin: i32,
        destination: i32,
        direction: Direction,
    },
}

/// A blocking call was woken by the stop signal instead of by work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("interrupted by shutdown")]
pub struct Interrupted;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed config file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("lowest floor {lowest} must be below highest floor {highest}")]
    FloorRange { lowest: i32, highest: i32 },
}
