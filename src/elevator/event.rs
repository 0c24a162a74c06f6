use chrono::{DateTime, Utc};

use crate::dispatch::request::Request;

#[derive(Copy, Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum EventKind {
    Picked { request: Request },
    Moved { from: i32, to: i32 },
    DoorsOpened { floor: i32 },
    Boarded { request: Request },
    DoorsClosed { floor: i32 },
    Idle { floor: i32 },
    Stopped,
}

/// Something an elevator did, as seen from outside.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ElevatorEvent {
    pub elevator: String,
    pub at: DateTime<Utc>,
    pub kind: EventKind,
}

impl ElevatorEvent {
    pub fn new(elevator: &str, kind: EventKind) -> ElevatorEvent {
        ElevatorEvent {
            elevator: elevator.to_string(),
            at: Utc::now(),
            kind,
        }
    }
}
