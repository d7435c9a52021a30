use super::errors::SimError;
use super::types::{ProcessId, ResourceId, SimTime};
use log::debug;
use serde::Serialize;
use std::collections::VecDeque;

/// Exclusive use of one slot of a resource.
///
/// Not clonable: the holder owns it until it is handed back to
/// [`Resource::release`], which is the only way to free the slot.
#[must_use = "a grant must be handed back through Resource::release"]
#[derive(Debug, PartialEq, Eq)]
pub struct Grant {
    resource: ResourceId,
    holder: ProcessId,
}

impl Grant {
    pub fn resource(&self) -> ResourceId {
        self.resource
    }

    pub fn holder(&self) -> ProcessId {
        self.holder
    }
}

/// Outcome of a request for a slot
#[derive(Debug)]
pub enum Acquisition {
    /// A slot was free; the caller continues without suspending
    Granted(Grant),
    /// The caller was appended to the wait queue at this position (1-based)
    Queued { position: usize },
}

/// Counters describing how a resource was used over a run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceStats {
    pub name: &'static str,
    pub capacity: usize,
    pub grants: u64,
    pub peak_holders: usize,
    pub peak_queue_length: usize,
    /// Holder-count integrated over time
    pub busy_time: SimTime,
    /// Total time granted requests spent in the wait queue
    pub queue_wait_time: SimTime,
    /// Requests still holding a slot when the run stopped
    pub holders_at_end: usize,
    /// Requests still queued when the run stopped
    pub waiting_at_end: usize,
    pub utilization: f64,
}

/// Capacity-bounded server with a FIFO wait queue
#[derive(Debug)]
pub struct Resource {
    id: ResourceId,
    name: &'static str,
    capacity: usize,
    holders: usize,
    waiters: VecDeque<(ProcessId, SimTime)>,
    grants: u64,
    peak_holders: usize,
    peak_queue_length: usize,
    busy_time: SimTime,
    queue_wait_time: SimTime,
    last_change: SimTime,
}

impl Resource {
    /// Create a new resource with the given number of slots
    pub fn new(id: ResourceId, name: &'static str, capacity: usize) -> Result<Self, SimError> {
        if capacity == 0 {
            return Err(SimError::InvalidInput(format!(
                "{} capacity must be greater than 0",
                name
            )));
        }

        Ok(Self {
            id,
            name,
            capacity,
            holders: 0,
            waiters: VecDeque::new(),
            grants: 0,
            peak_holders: 0,
            peak_queue_length: 0,
            busy_time: 0.0,
            queue_wait_time: 0.0,
            last_change: 0.0,
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Current number of holders
    pub fn holders(&self) -> usize {
        self.holders
    }

    /// Current number of queued requests
    pub fn queue_length(&self) -> usize {
        self.waiters.len()
    }

    /// Request a slot for `requester`
    pub fn acquire(&mut self, requester: ProcessId, now: SimTime) -> Acquisition {
        self.accumulate(now);

        if self.holders < self.capacity {
            debug!(
                "[Resource:{}] {} granted immediately at {:.3}",
                self.name, requester, now
            );
            return Acquisition::Granted(self.grant(requester));
        }

        self.waiters.push_back((requester, now));
        self.peak_queue_length = self.peak_queue_length.max(self.waiters.len());
        debug!(
            "[Resource:{}] {} queued at {:.3} (queue length: {})",
            self.name,
            requester,
            now,
            self.waiters.len()
        );
        Acquisition::Queued {
            position: self.waiters.len(),
        }
    }

    /// Free the slot held by `grant`.
    ///
    /// If anyone is waiting, the head of the queue takes the slot at once and
    /// its grant is returned so the caller can wake it.
    pub fn release(&mut self, grant: Grant, now: SimTime) -> Result<Option<Grant>, SimError> {
        if grant.resource != self.id {
            return Err(SimError::ForeignGrant {
                expected: self.id,
                found: grant.resource,
            });
        }

        self.accumulate(now);
        self.holders -= 1;
        debug!(
            "[Resource:{}] {} released at {:.3}",
            self.name, grant.holder, now
        );

        match self.waiters.pop_front() {
            Some((waiter, queued_at)) => {
                self.queue_wait_time += now - queued_at;
                debug!(
                    "[Resource:{}] {} granted from queue after waiting {:.3}",
                    self.name,
                    waiter,
                    now - queued_at
                );
                Ok(Some(self.grant(waiter)))
            }
            None => Ok(None),
        }
    }

    /// Snapshot of the usage counters, with busy time integrated up to `now`
    pub fn stats(&self, now: SimTime) -> ResourceStats {
        let busy_time = self.busy_time + self.holders as f64 * (now - self.last_change).max(0.0);
        let utilization = if now > 0.0 {
            busy_time / (self.capacity as f64 * now)
        } else {
            0.0
        };

        ResourceStats {
            name: self.name,
            capacity: self.capacity,
            grants: self.grants,
            peak_holders: self.peak_holders,
            peak_queue_length: self.peak_queue_length,
            busy_time,
            queue_wait_time: self.queue_wait_time,
            holders_at_end: self.holders,
            waiting_at_end: self.waiters.len(),
            utilization,
        }
    }

    fn grant(&mut self, holder: ProcessId) -> Grant {
        self.holders += 1;
        debug_assert!(self.holders <= self.capacity);
        self.grants += 1;
        self.peak_holders = self.peak_holders.max(self.holders);
        Grant {
            resource: self.id,
            holder,
        }
    }

    fn accumulate(&mut self, now: SimTime) {
        self.busy_time += self.holders as f64 * (now - self.last_change);
        self.last_change = now;
    }
}

/// All resources of a run, addressed by the IDs handed out by [`ResourcePool::add`]
#[derive(Debug, Default)]
pub struct ResourcePool {
    resources: Vec<Resource>,
}

impl ResourcePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resource; IDs are handed out in registration order
    pub fn add(&mut self, name: &'static str, capacity: usize) -> Result<ResourceId, SimError> {
        let id = ResourceId::new(self.resources.len());
        self.resources.push(Resource::new(id, name, capacity)?);
        Ok(id)
    }

    pub fn get(&self, id: ResourceId) -> Result<&Resource, SimError> {
        self.resources
            .get(id.index())
            .ok_or(SimError::UnknownResource(id))
    }

    pub fn get_mut(&mut self, id: ResourceId) -> Result<&mut Resource, SimError> {
        self.resources
            .get_mut(id.index())
            .ok_or(SimError::UnknownResource(id))
    }

    /// Stats of every resource, in registration order
    pub fn stats(&self, now: SimTime) -> Vec<ResourceStats> {
        self.resources.iter().map(|resource| resource.stats(now)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pid(raw: u64) -> ProcessId {
        ProcessId::new(raw)
    }

    fn expect_granted(acquisition: Acquisition) -> Grant {
        match acquisition {
            Acquisition::Granted(grant) => grant,
            Acquisition::Queued { position } => panic!("expected grant, queued at {}", position),
        }
    }

    #[test]
    fn test_zero_capacity_is_rejected() {
        assert!(matches!(
            Resource::new(ResourceId::new(1), "kitchen", 0),
            Err(SimError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_grants_up_to_capacity_then_queues() {
        let mut resource = Resource::new(ResourceId::new(0), "checkout", 2).unwrap();
        let _a = expect_granted(resource.acquire(pid(1), 0.0));
        let _b = expect_granted(resource.acquire(pid(2), 0.0));
        assert_eq!(resource.holders(), 2);

        match resource.acquire(pid(3), 0.0) {
            Acquisition::Queued { position } => assert_eq!(position, 1),
            Acquisition::Granted(_) => panic!("capacity exceeded"),
        }
        assert_eq!(resource.holders(), 2);
        assert_eq!(resource.queue_length(), 1);
    }

    #[test]
    fn test_release_hands_slot_to_waiters_in_fifo_order() {
        let mut resource = Resource::new(ResourceId::new(1), "kitchen", 1).unwrap();
        let first = expect_granted(resource.acquire(pid(1), 0.0));
        for raw in 2..=4 {
            assert!(matches!(resource.acquire(pid(raw), 1.0), Acquisition::Queued { .. }));
        }

        let mut served = Vec::new();
        let mut current = first;
        let mut now = 2.0;
        while let Some(next) = resource.release(current, now).unwrap() {
            assert_eq!(resource.holders(), 1);
            served.push(next.holder());
            current = next;
            now += 1.0;
        }

        assert_eq!(served, vec![pid(2), pid(3), pid(4)]);
        assert_eq!(resource.holders(), 0);
        assert_eq!(resource.queue_length(), 0);
    }

    #[test]
    fn test_release_without_waiters_frees_slot() {
        let mut resource = Resource::new(ResourceId::new(0), "checkout", 1).unwrap();
        let grant = expect_granted(resource.acquire(pid(1), 0.0));
        assert_eq!(resource.release(grant, 2.0).unwrap(), None);
        assert_eq!(resource.holders(), 0);
        let _again = expect_granted(resource.acquire(pid(2), 3.0));
    }

    #[test]
    fn test_foreign_grant_is_rejected() {
        let mut checkout = Resource::new(ResourceId::new(0), "checkout", 1).unwrap();
        let mut kitchen = Resource::new(ResourceId::new(1), "kitchen", 1).unwrap();
        let grant = expect_granted(checkout.acquire(pid(1), 0.0));

        let err = kitchen.release(grant, 1.0).unwrap_err();
        assert_eq!(
            err,
            SimError::ForeignGrant {
                expected: ResourceId::new(1),
                found: ResourceId::new(0),
            }
        );
    }

    #[test]
    fn test_stats_track_busy_time_and_queueing() {
        let mut resource = Resource::new(ResourceId::new(1), "kitchen", 1).unwrap();
        let first = expect_granted(resource.acquire(pid(1), 0.0));
        assert!(matches!(resource.acquire(pid(2), 1.0), Acquisition::Queued { .. }));
        let second = resource.release(first, 4.0).unwrap().unwrap();
        assert!(resource.release(second, 6.0).unwrap().is_none());

        let stats = resource.stats(10.0);
        assert_eq!(stats.grants, 2);
        assert_eq!(stats.peak_holders, 1);
        assert_eq!(stats.peak_queue_length, 1);
        assert!((stats.busy_time - 6.0).abs() < 1e-9);
        assert!((stats.queue_wait_time - 3.0).abs() < 1e-9);
        assert!((stats.utilization - 0.6).abs() < 1e-9);
        assert_eq!(stats.holders_at_end, 0);
    }

    #[test]
    fn test_pool_hands_out_ids_in_order() {
        let mut pool = ResourcePool::new();
        let desk = pool.add("desk", 1).unwrap();
        let oven = pool.add("oven", 3).unwrap();

        assert_eq!(desk, ResourceId::new(0));
        assert_eq!(oven, ResourceId::new(1));
        assert_eq!(pool.get(oven).unwrap().capacity(), 3);
        assert_eq!(pool.get(oven).unwrap().name(), "oven");
        assert_eq!(
            pool.get(ResourceId::new(2)).unwrap_err(),
            SimError::UnknownResource(ResourceId::new(2))
        );

        let names: Vec<&str> = pool.stats(0.0).iter().map(|stats| stats.name).collect();
        assert_eq!(names, vec!["desk", "oven"]);
        assert!(matches!(pool.add("broken", 0), Err(SimError::InvalidInput(_))));
    }
}
