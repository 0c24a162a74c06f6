//! Starts and stops the elevators and feeds them requests.
use crossbeam_channel as cbc;
use std::io;
use std::sync::Arc;
use std::thread;

use crate::dispatch::queue::DispatchQueue;
use crate::dispatch::request::Request;
use crate::dispatch::validator::{FloorRangeValidator, RequestValidator};
use crate::elevator::event::ElevatorEvent;
use crate::elevator::state::ElevatorState;
use crate::elevator::stop_signal::StopHandle;
use crate::elevator::worker::ElevatorWorker;
use crate::error::ValidationError;
use crate::util::config::Config;

/// Owns the dispatch queue and one thread per elevator.
///
/// # Example
/// ```rust,no_run
/// use elevator::dispatch::request::{Direction, Request};
/// use elevator::manager::dispatcher::Dispatcher;
/// use elevator::util::config::Config;
/// let mut dispatcher = Dispatcher::new(Config::default());
/// dispatcher.start(2).unwrap();
/// dispatcher.submit(Request::new(2, 5, Direction::Up)).unwrap();
/// dispatcher.shutdown();
/// ```
pub struct Dispatcher {
    config: Config,
    queue: Arc<DispatchQueue>,
    validator: Box<dyn RequestValidator>,
    stop: StopHandle,
    workers: Vec<thread::JoinHandle<ElevatorState>>,
    events_tx: Option<cbc::Sender<ElevatorEvent>>,
}

impl Dispatcher {
    pub fn new(config: Config) -> Dispatcher {
        let validator = FloorRangeValidator::from_config(&config);
        Dispatcher::with_validator(config, Box::new(validator))
    }

    pub fn with_validator(config: Config, validator: Box<dyn RequestValidator>) -> Dispatcher {
        Dispatcher {
            config,
            queue: Arc::new(DispatchQueue::new()),
            validator,
            stop: StopHandle::new(),
            workers: Vec::new(),
            events_tx: None,
        }
    }

    /// Event stream of every elevator started after this call.
    pub fn subscribe(&mut self) -> cbc::Receiver<ElevatorEvent> {
        let (events_tx, events_rx) = cbc::unbounded::<ElevatorEvent>();
        self.events_tx = Some(events_tx);
        events_rx
    }

    /// Launches `number` elevators. Does nothing if they already run.
    pub fn start(&mut self, number: usize) -> io::Result<()> {
        if !self.workers.is_empty() {
            tracing::warn!(running = self.workers.len(), "elevators are already running");
            return Ok(());
        }
        if self.stop.is_stopped() {
            tracing::warn!("dispatcher has been shut down, not starting elevators");
            return Ok(());
        }

        for i in 1..=number {
            let name = format!("Elevator-{}", i);
            let mut state = ElevatorState::new(name.clone(), Arc::clone(&self.queue), self.config.clone());
            if let Some(events_tx) = &self.events_tx {
                state = state.with_events(events_tx.clone());
            }
            let worker = ElevatorWorker::new(state, self.stop.signal());
            let handle = thread::Builder::new().name(name).spawn(move || worker.run())?;
            self.workers.push(handle);
        }
        tracing::info!(elevators = number, "elevators started");
        Ok(())
    }

    /// Validates `request` and queues it for the elevators.
    pub fn submit(&self, request: Request) -> Result<(), ValidationError> {
        self.validator.validate(&request)?;
        self.queue.add(request);
        Ok(())
    }

    /// Tells every elevator to stop, waking those waiting for work.
    ///
    /// Returns `false` if shutdown had already been requested.
    pub fn shutdown(&self) -> bool {
        let first = self.stop.stop();
        if first {
            tracing::info!(elevators = self.workers.len(), "shutting down all the elevators");
        }
        first
    }

    /// Waits for every elevator thread to finish and returns their final states.
    pub fn join(&mut self) -> Vec<ElevatorState> {
        let mut states = Vec::new();
        for handle in self.workers.drain(..) {
            let name = handle.thread().name().unwrap_or("elevator").to_string();
            match handle.join() {
                Ok(state) => states.push(state),
                Err(_) => tracing::error!(elevator = %name, "elevator thread panicked"),
            }
        }
        states
    }

    pub fn is_running(&self) -> bool {
        !self.workers.is_empty() && !self.stop.is_stopped()
    }

    pub fn elevator_count(&self) -> usize {
        self.workers.len()
    }

    pub fn queue(&self) -> &Arc<DispatchQueue> {
        &self.queue
    }
}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        self.stop.stop();
    }
}
