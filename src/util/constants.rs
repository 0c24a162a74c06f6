pub const LOWEST_FLOOR: i32 = 0;
pub const HIGHEST_FLOOR: i32 = 10;

pub const FLOOR_TRAVEL_MS: u64 = 3000;
pub const DOOR_DWELL_MS: u64 = 2000;

pub const DEFAULT_ELEVATORS: usize = 2;

pub const INVALID_REQUEST: &str = "Invalid Current Floor/ Destination Floor Selection";
