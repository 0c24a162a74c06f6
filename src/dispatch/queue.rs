//! The shared store of requests no elevator has claimed yet.
//!
//! Requests live in two ordered maps, one per travel direction, keyed by
//! `(origin, destination, arrival)`. Callers of [`DispatchQueue::pick`] that
//! find nothing to do queue up as waiters; each [`DispatchQueue::add`] hands
//! its request straight to the oldest waiter, so waiters are served strictly
//! first come, first served and a request can never reach two of them.
use crossbeam_channel as cbc;
use std::collections::{BTreeMap, VecDeque};
use std::ops::Bound::{Excluded, Included, Unbounded};
use std::sync::{Mutex, MutexGuard};

use crate::dispatch::request::{Direction, Request};
use crate::elevator::stop_signal::StopSignal;
use crate::error::Interrupted;

type RequestKey = (i32, i32, u64);

#[derive(Debug)]
struct Waiter {
    id: u64,
    floor: i32,
    direction: Direction,
    handoff_tx: cbc::Sender<Request>,
}

#[derive(Debug, Default)]
struct Inner {
    going_up: BTreeMap<RequestKey, Request>,
    going_down: BTreeMap<RequestKey, Request>,
    waiters: VecDeque<Waiter>,
    next_seq: u64,
    next_waiter_id: u64,
}

#[derive(Debug, Default)]
pub struct DispatchQueue {
    inner: Mutex<Inner>,
}

impl Inner {
    fn insert(&mut self, request: Request) {
        let (origin, destination) = request.key();
        let key = (origin, destination, self.next_seq);
        self.next_seq += 1;
        match request.direction {
            Direction::Up => self.going_up.insert(key, request),
            Direction::Down => self.going_down.insert(key, request),
        };
    }

    fn is_empty(&self) -> bool {
        self.going_up.is_empty() && self.going_down.is_empty()
    }

    /// Up request with the lowest origin above `floor`.
    fn closest_up_above(&self, floor: i32) -> Option<RequestKey> {
        self.going_up
            .range((Included((floor + 1, i32::MIN, 0)), Unbounded))
            .next()
            .map(|(key, _)| *key)
    }

    /// Up request with the lowest origin at or above `floor`.
    fn closest_up_from(&self, floor: i32) -> Option<RequestKey> {
        self.going_up
            .range((Included((floor, i32::MIN, 0)), Unbounded))
            .next()
            .map(|(key, _)| *key)
    }

    /// Down request with the highest origin below `floor`.
    fn closest_down_below(&self, floor: i32) -> Option<RequestKey> {
        self.going_down
            .range((Unbounded, Excluded((floor, i32::MIN, 0))))
            .next_back()
            .map(|(key, _)| *key)
    }

    /// Down request with the highest origin at or below `floor`.
    fn closest_down_from(&self, floor: i32) -> Option<RequestKey> {
        self.going_down
            .range((Unbounded, Excluded((floor + 1, i32::MIN, 0))))
            .next_back()
            .map(|(key, _)| *key)
    }

    /// Removes the request an elevator at `floor` heading `direction` should
    /// serve next: the nearest one ahead going the same way, else the nearest
    /// one behind going the other way, else whatever is left.
    fn select(&mut self, floor: i32, direction: Direction) -> Option<Request> {
        match direction {
            Direction::Up => {
                if let Some(key) = self.closest_up_above(floor) {
                    return self.going_up.remove(&key);
                }
                if let Some(key) = self.closest_down_from(floor) {
                    return self.going_down.remove(&key);
                }
                self.going_down
                    .pop_first()
                    .or_else(|| self.going_up.pop_first())
                    .map(|(_, request)| request)
            }
            Direction::Down => {
                if let Some(key) = self.closest_down_below(floor) {
                    return self.going_down.remove(&key);
                }
                if let Some(key) = self.closest_up_from(floor) {
                    return self.going_up.remove(&key);
                }
                self.going_up
                    .pop_first()
                    .or_else(|| self.going_down.pop_first())
                    .map(|(_, request)| request)
            }
        }
    }

    /// Gives `request` to the oldest waiter, or stores it when nobody waits.
    fn dispatch(&mut self, request: Request) {
        self.insert(request);
        while let Some(waiter) = self.waiters.pop_front() {
            let chosen = match self.select(waiter.floor, waiter.direction) {
                Some(chosen) => chosen,
                None => return,
            };
            match waiter.handoff_tx.try_send(chosen) {
                Ok(()) => return,
                // Waiter already gone; put the request back and try the next one.
                Err(e) => self.insert(e.into_inner()),
            }
        }
    }

    fn same_floor(map: &BTreeMap<RequestKey, Request>, floor: i32) -> impl Iterator<Item = &RequestKey> {
        map.range((Included((floor, i32::MIN, 0)), Excluded((floor + 1, i32::MIN, 0))))
            .map(|(key, _)| key)
    }

    fn drain_same_floor(map: &mut BTreeMap<RequestKey, Request>, floor: i32) -> Vec<Request> {
        let keys: Vec<RequestKey> = Inner::same_floor(map, floor).copied().collect();
        keys.iter().filter_map(|key| map.remove(key)).collect()
    }
}

impl DispatchQueue {
    pub fn new() -> DispatchQueue {
        DispatchQueue::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // Every mutation leaves the maps consistent, so a panic elsewhere
        // while holding the lock does not invalidate them.
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Queues a request and wakes exactly one blocked [`pick`](Self::pick), the oldest.
    pub fn add(&self, request: Request) {
        let mut inner = self.lock();
        inner.dispatch(request);
        tracing::trace!(%request, queued = inner.going_up.len() + inner.going_down.len(), "request added");
    }

    /// Claims the best request for an elevator at `current_floor` heading
    /// `direction`, blocking while the queue is empty.
    ///
    /// Returns [`Interrupted`] if `stop` is raised before or while waiting.
    pub fn pick(
        &self,
        current_floor: i32,
        direction: Direction,
        stop: &StopSignal,
    ) -> Result<Request, Interrupted> {
        loop {
            if stop.is_stopped() {
                return Err(Interrupted);
            }

            let (id, handoff_rx) = {
                let mut inner = self.lock();
                if let Some(request) = inner.select(current_floor, direction) {
                    return Ok(request);
                }
                let (handoff_tx, handoff_rx) = cbc::bounded::<Request>(1);
                let id = inner.next_waiter_id;
                inner.next_waiter_id += 1;
                inner.waiters.push_back(Waiter {
                    id,
                    floor: current_floor,
                    direction,
                    handoff_tx,
                });
                (id, handoff_rx)
            };

            let handed = cbc::select! {
                recv(handoff_rx) -> handed => handed.ok(),
                recv(stop.receiver()) -> _ => {
                    self.abandon_wait(id, &handoff_rx);
                    return Err(Interrupted);
                }
            };
            match handed {
                Some(request) if !stop.is_stopped() => return Ok(request),
                Some(request) => {
                    self.add(request);
                    return Err(Interrupted);
                }
                // Dropped without a request; look again.
                None => {}
            }
        }
    }

    /// Deregisters waiter `id`. A request handed over in the meantime goes
    /// back into the queue.
    fn abandon_wait(&self, id: u64, handoff_rx: &cbc::Receiver<Request>) {
        let mut inner = self.lock();
        if let Some(position) = inner.waiters.iter().position(|waiter| waiter.id == id) {
            inner.waiters.remove(position);
            return;
        }
        if let Ok(request) = handoff_rx.try_recv() {
            inner.dispatch(request);
        }
    }

    pub fn has_same_floor_up_pickup(&self, current_floor: i32) -> bool {
        let inner = self.lock();
        let found = Inner::same_floor(&inner.going_up, current_floor).next().is_some();
        found
    }

    pub fn has_same_floor_down_pickup(&self, current_floor: i32) -> bool {
        let inner = self.lock();
        let found = Inner::same_floor(&inner.going_down, current_floor).next().is_some();
        found
    }

    pub fn has_same_floor_pickup(&self, current_floor: i32, direction: Direction) -> bool {
        match direction {
            Direction::Up => self.has_same_floor_up_pickup(current_floor),
            Direction::Down => self.has_same_floor_down_pickup(current_floor),
        }
    }

    /// Removes every up request waiting at `current_floor`.
    pub fn drain_same_floor_up_pickups(&self, current_floor: i32) -> Vec<Request> {
        let mut inner = self.lock();
        Inner::drain_same_floor(&mut inner.going_up, current_floor)
    }

    /// Removes every down request waiting at `current_floor`.
    pub fn drain_same_floor_down_pickups(&self, current_floor: i32) -> Vec<Request> {
        let mut inner = self.lock();
        Inner::drain_same_floor(&mut inner.going_down, current_floor)
    }

    pub fn drain_same_floor_pickups(&self, current_floor: i32, direction: Direction) -> Vec<Request> {
        match direction {
            Direction::Up => self.drain_same_floor_up_pickups(current_floor),
            Direction::Down => self.drain_same_floor_down_pickups(current_floor),
        }
    }

    /// Number of unclaimed requests.
    pub fn len(&self) -> usize {
        let inner = self.lock();
        inner.going_up.len() + inner.going_down.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Number of callers currently blocked in [`pick`](Self::pick).
    pub fn waiting(&self) -> usize {
        self.lock().waiters.len()
    }
}
