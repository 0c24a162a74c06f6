use crate::dispatch::request::Direction;
use crate::elevator::event::EventKind;
use crate::elevator::state::ElevatorState;
use crate::elevator::stop_signal::StopSignal;
use crate::error::Interrupted;

/// Drives one [`ElevatorState`] until told to stop.
#[derive(Debug)]
pub struct ElevatorWorker {
    state: ElevatorState,
    stop: StopSignal,
}

impl ElevatorWorker {
    pub fn new(state: ElevatorState, stop: StopSignal) -> ElevatorWorker {
        ElevatorWorker { state, stop }
    }

    fn can_continue_up(&self) -> bool {
        let state = &self.state;
        state.current_floor() < state.config().highest_floor
            && state.direction() == Direction::Up
            && state.needs_to_continue_up()
    }

    fn can_continue_down(&self) -> bool {
        let state = &self.state;
        state.current_floor() > state.config().lowest_floor
            && state.direction() == Direction::Down
            && state.needs_to_continue_down()
    }

    /// Runs the control loop and hands the final state back.
    ///
    /// One step per iteration: move a floor (stopping there if needed), or
    /// block for new work. After a stop request the elevator finishes the
    /// stops ahead of it, boarding nobody, and quits as soon as it would have
    /// to wait for work.
    pub fn run(mut self) -> ElevatorState {
        tracing::info!(elevator = %self.state.name(), "elevator started running");

        while !self.stop.is_stopped() || self.state.has_pending_stops() {
            let accept_new_riders = !self.stop.is_stopped();
            if self.can_continue_up() {
                self.state.move_one_floor_up();
                if self.state.needs_to_stop_here() {
                    self.state.service_current_floor(accept_new_riders);
                }
            } else if self.can_continue_down() {
                self.state.move_one_floor_down();
                if self.state.needs_to_stop_here() {
                    self.state.service_current_floor(accept_new_riders);
                }
            } else if let Err(Interrupted) = self.state.fetch_new_request(&self.stop) {
                tracing::info!(elevator = %self.state.name(), "request to close down the elevator received");
                let abandoned = self.state.abandon_stops();
                if !abandoned.is_empty() {
                    tracing::warn!(
                        elevator = %self.state.name(),
                        floor = self.state.current_floor(),
                        ?abandoned,
                        "abandoning stops"
                    );
                }
                break;
            }
        }

        tracing::info!(elevator = %self.state.name(), floor = self.state.current_floor(), "closing down");
        self.state.emit(EventKind::Stopped);
        self.state
    }
}
