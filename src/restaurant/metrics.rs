use crate::core::types::SimTime;
use crate::restaurant::menu::MenuItem;
use log::debug;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CustomerStatus {
    Satisfied,
    Complained,
}

impl CustomerStatus {
    /// Complained strictly above the threshold; waiting exactly the threshold is fine
    pub fn classify(waiting_time: SimTime, threshold: SimTime) -> Self {
        if waiting_time > threshold {
            CustomerStatus::Complained
        } else {
            CustomerStatus::Satisfied
        }
    }
}

impl std::fmt::Display for CustomerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CustomerStatus::Satisfied => write!(f, "Satisfied"),
            CustomerStatus::Complained => write!(f, "Complained"),
        }
    }
}

/// Timestamps collected by a customer on its way through both stages
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CustomerTimeline {
    pub arrival_time: SimTime,
    pub checkout_start: SimTime,
    /// Moment the kitchen request was made, before it was granted
    pub service_start: SimTime,
    pub kitchen_start: SimTime,
    pub completion_time: SimTime,
}

/// Immutable result for one customer that made it out of the kitchen
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerRecord {
    customer_id: u64,
    menu_item: MenuItem,
    timeline: CustomerTimeline,
    waiting_time: SimTime,
    service_time: SimTime,
    total_time: SimTime,
    status: CustomerStatus,
}

impl CustomerRecord {
    /// Derive the timing metrics from a finished timeline.
    ///
    /// Waiting time is the time queued for the checkout desk only. The fixed
    /// checkout interaction is not counted as waiting, so with the default
    /// threshold of 7 a customer complains once the checkout queue alone
    /// exceeds 7 minutes. Counting the interaction as waiting would move that
    /// point to a 5-minute queue. Service time runs from the kitchen request
    /// (so kitchen queueing counts as service) to completion.
    pub fn new(
        customer_id: u64,
        menu_item: MenuItem,
        timeline: CustomerTimeline,
        complaint_threshold: SimTime,
    ) -> Self {
        let waiting_time = timeline.checkout_start - timeline.arrival_time;
        let service_time = timeline.completion_time - timeline.service_start;
        let total_time = timeline.completion_time - timeline.arrival_time;

        Self {
            customer_id,
            menu_item,
            timeline,
            waiting_time,
            service_time,
            total_time,
            status: CustomerStatus::classify(waiting_time, complaint_threshold),
        }
    }

    pub fn customer_id(&self) -> u64 {
        self.customer_id
    }

    pub fn menu_item(&self) -> MenuItem {
        self.menu_item
    }

    pub fn timeline(&self) -> &CustomerTimeline {
        &self.timeline
    }

    pub fn arrival_time(&self) -> SimTime {
        self.timeline.arrival_time
    }

    pub fn completion_time(&self) -> SimTime {
        self.timeline.completion_time
    }

    pub fn waiting_time(&self) -> SimTime {
        self.waiting_time
    }

    pub fn service_time(&self) -> SimTime {
        self.service_time
    }

    pub fn total_time(&self) -> SimTime {
        self.total_time
    }

    pub fn status(&self) -> CustomerStatus {
        self.status
    }
}

impl std::fmt::Display for CustomerRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Customer {}: Waiting Time: {:.2} minutes, Service Time: {:.2} minutes, Total Time: {:.2} minutes, Status: {}",
            self.customer_id, self.waiting_time, self.service_time, self.total_time, self.status
        )
    }
}

/// Aggregate outcome of a run
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Summary {
    /// Nobody completed service, so there is no mean to report
    NoCustomers,
    Served {
        customer_count: usize,
        mean_waiting_time: SimTime,
        mean_total_time: SimTime,
        complaints: usize,
    },
}

impl Summary {
    pub fn customer_count(&self) -> usize {
        match self {
            Summary::NoCustomers => 0,
            Summary::Served { customer_count, .. } => *customer_count,
        }
    }

    /// Mean waiting time, undefined when nobody was served
    pub fn mean_waiting_time(&self) -> Option<SimTime> {
        match self {
            Summary::NoCustomers => None,
            Summary::Served {
                mean_waiting_time, ..
            } => Some(*mean_waiting_time),
        }
    }

    /// One-line form for logs
    pub fn headline(&self) -> String {
        match self {
            Summary::NoCustomers => "no customers served".to_string(),
            Summary::Served {
                customer_count,
                mean_waiting_time,
                complaints,
                ..
            } => format!(
                "{} customers served, mean wait {:.2}, {} complaints",
                customer_count, mean_waiting_time, complaints
            ),
        }
    }
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Summary::NoCustomers => write!(f, "No customers arrived during the simulation."),
            Summary::Served {
                customer_count,
                mean_waiting_time,
                ..
            } => write!(
                f,
                "Customers served: {}\nAverage customer waiting time: {:.2} minutes.\n",
                customer_count, mean_waiting_time
            ),
        }
    }
}

/// Arrivals and completed-customer records of one run, in completion order
#[derive(Debug, Default)]
pub struct MetricsCollector {
    arrivals: u64,
    records: Vec<CustomerRecord>,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a customer walking in, whether or not it finishes before the horizon
    pub fn note_arrival(&mut self) {
        self.arrivals += 1;
    }

    pub fn arrivals(&self) -> u64 {
        self.arrivals
    }

    pub fn record(&mut self, record: CustomerRecord) {
        debug!(
            "[MetricsCollector] Customer {} done: wait {:.3}, service {:.3}, total {:.3}, {}",
            record.customer_id,
            record.waiting_time,
            record.service_time,
            record.total_time,
            record.status
        );
        self.records.push(record);
    }

    pub fn into_records(self) -> Vec<CustomerRecord> {
        self.records
    }

    pub fn summarize(&self) -> Summary {
        if self.records.is_empty() {
            return Summary::NoCustomers;
        }

        let count = self.records.len();
        let total_wait: SimTime = self.records.iter().map(|r| r.waiting_time).sum();
        let total_time: SimTime = self.records.iter().map(|r| r.total_time).sum();
        let complaints = self
            .records
            .iter()
            .filter(|r| r.status == CustomerStatus::Complained)
            .count();

        Summary::Served {
            customer_count: count,
            mean_waiting_time: total_wait / count as f64,
            mean_total_time: total_time / count as f64,
            complaints,
        }
    }
}
