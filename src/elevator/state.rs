use crossbeam_channel as cbc;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::dispatch::queue::DispatchQueue;
use crate::dispatch::request::{Direction, Request};
use crate::elevator::event::{ElevatorEvent, EventKind};
use crate::elevator::stop_signal::StopSignal;
use crate::error::Interrupted;
use crate::util::config::Config;

#[derive(Copy, Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize, Hash)]
pub enum State {
    Idle,
    MovingUp,
    MovingDown,
    Stopped,
}

/// Everything one elevator knows about itself.
/// * `current_floor` where the car is, starting at the lowest floor
/// * `direction` the way it is heading, starting up
/// * `stops` floors it has promised to visit, for pickup or drop-off
/// * `queue` the shared pool it takes new work from
///
/// An `ElevatorState` belongs to exactly one worker thread.
#[derive(Debug)]
pub struct ElevatorState {
    name: String,
    current_floor: i32,
    direction: Direction,
    state: State,
    stops: BTreeSet<i32>,
    queue: Arc<DispatchQueue>,
    config: Config,
    events_tx: Option<cbc::Sender<ElevatorEvent>>,
}

impl ElevatorState {
    pub fn new(name: impl Into<String>, queue: Arc<DispatchQueue>, config: Config) -> ElevatorState {
        ElevatorState {
            name: name.into(),
            current_floor: config.lowest_floor,
            direction: Direction::Up,
            state: State::Idle,
            stops: BTreeSet::new(),
            queue,
            config,
            events_tx: None,
        }
    }

    /// Reports every move and door cycle on `events_tx`.
    pub fn with_events(mut self, events_tx: cbc::Sender<ElevatorEvent>) -> ElevatorState {
        self.events_tx = Some(events_tx);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn current_floor(&self) -> i32 {
        self.current_floor
    }
    pub fn direction(&self) -> Direction {
        self.direction
    }
    pub fn state(&self) -> State {
        self.state
    }
    pub fn stops(&self) -> &BTreeSet<i32> {
        &self.stops
    }
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn has_pending_stops(&self) -> bool {
        !self.stops.is_empty()
    }

    pub fn move_one_floor_up(&mut self) {
        self.direction = Direction::Up;
        if self.current_floor >= self.config.highest_floor {
            return;
        }
        self.state = State::MovingUp;
        self.stops.remove(&self.current_floor);
        self.current_floor += 1;
        pause(self.config.floor_travel_time());
        self.on_moved(self.current_floor - 1);
    }

    pub fn move_one_floor_down(&mut self) {
        self.direction = Direction::Down;
        if self.current_floor <= self.config.lowest_floor {
            return;
        }
        self.state = State::MovingDown;
        self.stops.remove(&self.current_floor);
        self.current_floor -= 1;
        pause(self.config.floor_travel_time());
        self.on_moved(self.current_floor + 1);
    }

    fn on_moved(&self, from: i32) {
        tracing::debug!(
            elevator = %self.name,
            from,
            to = self.current_floor,
            stops = ?self.stops,
            "moved one floor"
        );
        self.emit(EventKind::Moved {
            from,
            to: self.current_floor,
        });
    }

    /// A promised stop, or someone waiting here to travel our way.
    pub fn needs_to_stop_here(&self) -> bool {
        self.stops.contains(&self.current_floor)
            || self.queue.has_same_floor_pickup(self.current_floor, self.direction)
    }

    /// Opens the doors on the current floor.
    ///
    /// `accept_new_riders` - board everyone waiting here to travel our way.
    /// During shutdown this is `false`: riders get off, nobody gets on.
    pub fn service_current_floor(&mut self, accept_new_riders: bool) {
        self.state = State::Stopped;
        tracing::debug!(elevator = %self.name, floor = self.current_floor, stops = ?self.stops, "opening doors");
        self.emit(EventKind::DoorsOpened {
            floor: self.current_floor,
        });

        if accept_new_riders {
            for request in self
                .queue
                .drain_same_floor_pickups(self.current_floor, self.direction)
            {
                self.commit(&request);
                self.emit(EventKind::Boarded { request });
            }
        }
        self.stops.remove(&self.current_floor);

        pause(self.config.door_dwell_time());
        tracing::debug!(elevator = %self.name, floor = self.current_floor, stops = ?self.stops, "closing doors");
        self.emit(EventKind::DoorsClosed {
            floor: self.current_floor,
        });
    }

    pub fn needs_to_continue_up(&self) -> bool {
        self.stops.range(self.current_floor + 1..).next().is_some()
    }

    pub fn needs_to_continue_down(&self) -> bool {
        self.stops.range(..self.current_floor).next().is_some()
    }

    /// Promises to stop at both ends of `request`.
    pub fn commit(&mut self, request: &Request) {
        self.stops.insert(request.origin_floor);
        self.stops.insert(request.destination_floor);
        tracing::debug!(elevator = %self.name, %request, stops = ?self.stops, "took request");
    }

    /// Blocks for the next request, then drives to the rider.
    ///
    /// The car goes straight to the pickup floor without stopping on the way;
    /// riders it passes stay queued for a later pass.
    pub fn fetch_new_request(&mut self, stop: &StopSignal) -> Result<(), Interrupted> {
        self.state = State::Idle;
        self.emit(EventKind::Idle {
            floor: self.current_floor,
        });
        let request = self.queue.pick(self.current_floor, self.direction, stop)?;
        tracing::debug!(elevator = %self.name, %request, floor = self.current_floor, "picked request");
        self.emit(EventKind::Picked { request });

        while self.current_floor < request.origin_floor
            && self.current_floor < self.config.highest_floor
        {
            self.move_one_floor_up();
        }
        while self.current_floor > request.origin_floor
            && self.current_floor > self.config.lowest_floor
        {
            self.move_one_floor_down();
        }

        self.direction = if request.destination_floor < self.current_floor {
            Direction::Down
        } else {
            Direction::Up
        };
        self.stops.insert(request.destination_floor);
        if self.needs_to_stop_here() {
            self.service_current_floor(true);
        }
        Ok(())
    }

    /// Forgets every promised stop, returning them.
    pub fn abandon_stops(&mut self) -> Vec<i32> {
        std::mem::take(&mut self.stops).into_iter().collect()
    }

    pub(crate) fn emit(&self, kind: EventKind) {
        if let Some(events_tx) = &self.events_tx {
            // Nobody listening is fine.
            let _ = events_tx.send(ElevatorEvent::new(&self.name, kind));
        }
    }
}

fn pause(duration: Duration) {
    if !duration.is_zero() {
        thread::sleep(duration);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::elevator::stop_signal::StopHandle;

    fn up(origin: i32, destination: i32) -> Request {
        Request::new(origin, destination, Direction::Up)
    }

    fn down(origin: i32, destination: i32) -> Request {
        Request::new(origin, destination, Direction::Down)
    }

    fn initialize_elevator(queue: &Arc<DispatchQueue>) -> (ElevatorState, cbc::Receiver<ElevatorEvent>) {
        let (events_tx, events_rx) = cbc::unbounded::<ElevatorEvent>();
        let elevator = ElevatorState::new("Elevator-1", Arc::clone(queue), Config::instant(0, 10))
            .with_events(events_tx);
        (elevator, events_rx)
    }

    fn kinds(events_rx: &cbc::Receiver<ElevatorEvent>) -> Vec<EventKind> {
        events_rx.try_iter().map(|event| event.kind).collect()
    }

    #[test]
    fn it_initializes_at_lowest_floor_going_up() {
        let queue = Arc::new(DispatchQueue::new());
        let (elevator, _events_rx) = initialize_elevator(&queue);
        assert_eq!(elevator.current_floor(), 0);
        assert_eq!(elevator.direction(), Direction::Up);
        assert_eq!(elevator.state(), State::Idle);
        assert!(!elevator.has_pending_stops());
    }

    #[test]
    fn it_clears_the_floor_it_leaves() {
        let queue = Arc::new(DispatchQueue::new());
        let (mut elevator, events_rx) = initialize_elevator(&queue);
        elevator.commit(&up(0, 2));
        elevator.move_one_floor_up();
        assert_eq!(elevator.current_floor(), 1);
        assert_eq!(elevator.state(), State::MovingUp);
        assert_eq!(elevator.stops().iter().copied().collect::<Vec<_>>(), vec![2]);
        assert_eq!(kinds(&events_rx), vec![EventKind::Moved { from: 0, to: 1 }]);
    }

    #[test]
    fn it_does_not_leave_the_building() {
        let queue = Arc::new(DispatchQueue::new());
        let (mut elevator, events_rx) = initialize_elevator(&queue);
        elevator.move_one_floor_down();
        assert_eq!(elevator.current_floor(), 0);
        assert_eq!(elevator.direction(), Direction::Down);
        for _ in 0..15 {
            elevator.move_one_floor_up();
        }
        assert_eq!(elevator.current_floor(), 10);
        assert_eq!(kinds(&events_rx).len(), 10);
    }

    #[test]
    fn it_stops_for_same_direction_pickups_only() {
        let queue = Arc::new(DispatchQueue::new());
        let (mut elevator, _events_rx) = initialize_elevator(&queue);
        for _ in 0..3 {
            elevator.move_one_floor_up();
        }
        queue.add(down(3, 1));
        assert!(!elevator.needs_to_stop_here());
        queue.add(up(3, 6));
        assert!(elevator.needs_to_stop_here());
    }

    #[test]
    fn it_stops_at_committed_floors() {
        let queue = Arc::new(DispatchQueue::new());
        let (mut elevator, _events_rx) = initialize_elevator(&queue);
        elevator.commit(&up(1, 2));
        elevator.move_one_floor_up();
        assert!(elevator.needs_to_stop_here());
        elevator.service_current_floor(true);
        assert_eq!(elevator.state(), State::Stopped);
        assert!(!elevator.needs_to_stop_here());
        assert_eq!(elevator.stops().iter().copied().collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn it_boards_every_rider_going_our_way() {
        let queue = Arc::new(DispatchQueue::new());
        let (mut elevator, events_rx) = initialize_elevator(&queue);
        elevator.move_one_floor_up();
        elevator.move_one_floor_up();
        queue.add(up(2, 5));
        queue.add(up(2, 7));
        queue.add(down(2, 0));
        let _ = kinds(&events_rx);

        elevator.service_current_floor(true);
        assert_eq!(elevator.stops().iter().copied().collect::<Vec<_>>(), vec![5, 7]);
        assert_eq!(queue.len(), 1);
        assert!(queue.has_same_floor_down_pickup(2));
        assert_eq!(
            kinds(&events_rx),
            vec![
                EventKind::DoorsOpened { floor: 2 },
                EventKind::Boarded { request: up(2, 5) },
                EventKind::Boarded { request: up(2, 7) },
                EventKind::DoorsClosed { floor: 2 },
            ]
        );
    }

    #[test]
    fn it_boards_nobody_when_refusing_riders() {
        let queue = Arc::new(DispatchQueue::new());
        let (mut elevator, _events_rx) = initialize_elevator(&queue);
        elevator.commit(&up(0, 4));
        elevator.move_one_floor_up();
        queue.add(up(1, 9));
        elevator.service_current_floor(false);
        assert_eq!(elevator.stops().iter().copied().collect::<Vec<_>>(), vec![4]);
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn it_continues_only_for_strictly_farther_stops() {
        let queue = Arc::new(DispatchQueue::new());
        let (mut elevator, _events_rx) = initialize_elevator(&queue);
        for _ in 0..5 {
            elevator.move_one_floor_up();
        }
        elevator.commit(&up(5, 5));
        assert!(!elevator.needs_to_continue_up());
        assert!(!elevator.needs_to_continue_down());
        elevator.commit(&up(5, 8));
        assert!(elevator.needs_to_continue_up());
        elevator.commit(&down(5, 1));
        assert!(elevator.needs_to_continue_down());
    }

    #[test]
    fn it_travels_to_the_rider_before_heading_their_way() {
        let queue = Arc::new(DispatchQueue::new());
        let stop = StopHandle::new();
        let (mut elevator, events_rx) = initialize_elevator(&queue);
        queue.add(down(5, 2));
        elevator.fetch_new_request(&stop.signal()).unwrap();
        assert_eq!(elevator.current_floor(), 5);
        assert_eq!(elevator.direction(), Direction::Down);
        assert_eq!(elevator.stops().iter().copied().collect::<Vec<_>>(), vec![2]);

        let events = kinds(&events_rx);
        assert_eq!(events[0], EventKind::Idle { floor: 0 });
        assert_eq!(events[1], EventKind::Picked { request: down(5, 2) });
        assert_eq!(events.len(), 7);
        assert_eq!(events[6], EventKind::Moved { from: 4, to: 5 });
    }

    #[test]
    fn it_opens_at_the_pickup_floor_for_co_riders() {
        let queue = Arc::new(DispatchQueue::new());
        let stop = StopHandle::new();
        let (mut elevator, _events_rx) = initialize_elevator(&queue);
        queue.add(up(3, 6));
        queue.add(up(3, 9));
        elevator.fetch_new_request(&stop.signal()).unwrap();
        assert_eq!(elevator.current_floor(), 3);
        assert_eq!(elevator.stops().iter().copied().collect::<Vec<_>>(), vec![6, 9]);
        assert!(queue.is_empty());
    }

    #[test]
    fn it_gives_up_fetching_when_stopped() {
        let queue = Arc::new(DispatchQueue::new());
        let stop = StopHandle::new();
        let (mut elevator, _events_rx) = initialize_elevator(&queue);
        stop.stop();
        assert_eq!(elevator.fetch_new_request(&stop.signal()), Err(Interrupted));
        assert_eq!(elevator.current_floor(), 0);
    }

    #[test]
    fn it_abandons_all_stops() {
        let queue = Arc::new(DispatchQueue::new());
        let (mut elevator, _events_rx) = initialize_elevator(&queue);
        elevator.commit(&up(2, 6));
        assert_eq!(elevator.abandon_stops(), vec![2, 6]);
        assert!(!elevator.has_pending_stops());
    }
}
