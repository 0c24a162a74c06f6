use crate::dispatch::request::{Direction, Request};
use crate::error::ValidationError;
use crate::util::config::Config;

/// Decides whether a request may enter the dispatch queue.
pub trait RequestValidator: Send + Sync {
    fn validate(&self, request: &Request) -> Result<(), ValidationError>;
}

/// Checks floors against the building and direction against the floors.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FloorRangeValidator {
    lowest: i32,
    highest: i32,
}

impl FloorRangeValidator {
    pub fn new(lowest: i32, highest: i32) -> FloorRangeValidator {
        FloorRangeValidator { lowest, highest }
    }

    pub fn from_config(config: &Config) -> FloorRangeValidator {
        FloorRangeValidator::new(config.lowest_floor, config.highest_floor)
    }

    fn check_floor(&self, floor: i32) -> Result<(), ValidationError> {
        if floor < self.lowest || floor > self.highest {
            return Err(ValidationError::FloorOutOfRange {
                floor,
                lowest: self.lowest,
                highest: self.highest,
            });
        }
        Ok(())
    }
}

impl RequestValidator for FloorRangeValidator {
    fn validate(&self, request: &Request) -> Result<(), ValidationError> {
        self.check_floor(request.origin_floor)?;
        self.check_floor(request.destination_floor)?;

        let origin = request.origin_floor;
        let destination = request.destination_floor;
        match request.direction {
            Direction::Down if origin == self.lowest => {
                Err(ValidationError::DownFromLowestFloor { floor: origin })
            }
            Direction::Up if origin == self.highest => {
                Err(ValidationError::UpFromHighestFloor { floor: origin })
            }
            Direction::Up if origin >= destination => Err(ValidationError::DirectionMismatch {
                origin,
                destination,
                direction: Direction::Up,
            }),
            Direction::Down if origin <= destination => Err(ValidationError::DirectionMismatch {
                origin,
                destination,
                direction: Direction::Down,
            }),
            _ => Ok(()),
        }
    }
}
