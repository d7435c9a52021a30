use crate::core::errors::SimError;
use crate::core::event::Signal;
use crate::core::process::{unexpected_signal, Activity, Process, ProcessKind};
use crate::core::resource::Grant;
use crate::core::types::SimTime;
use crate::restaurant::menu::MenuItem;
use crate::restaurant::metrics::{CustomerRecord, CustomerTimeline};
use crate::restaurant::simulation::{RestaurantContext, RestaurantState};
use crate::restaurant::stage::Stage;
use log::debug;

/// Per-customer constants taken from the run configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ServicePolicy {
    /// Time spent at the checkout desk once served; does not depend on the dish
    pub checkout_delay: SimTime,
    pub complaint_threshold: SimTime,
}

#[derive(Debug)]
enum CustomerState {
    Arrived,
    AwaitingCheckout,
    InCheckout(Grant),
    AwaitingKitchen { item: MenuItem },
    InKitchen { item: MenuItem, grant: Grant },
    Completed,
}

impl CustomerState {
    fn name(&self) -> &'static str {
        match self {
            CustomerState::Arrived => "Arrived",
            CustomerState::AwaitingCheckout => "AwaitingCheckout",
            CustomerState::InCheckout(_) => "InCheckout",
            CustomerState::AwaitingKitchen { .. } => "AwaitingKitchen",
            CustomerState::InKitchen { .. } => "InKitchen",
            CustomerState::Completed => "Completed",
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Timestamps {
    arrival_time: SimTime,
    checkout_start: SimTime,
    service_start: SimTime,
    kitchen_start: SimTime,
}

/// One customer: checkout, then kitchen, then a record.
///
/// Each grant lives inside the state that holds it, so leaving that state
/// means handing the grant back to its stage.
#[derive(Debug)]
pub struct CustomerProcess {
    customer_id: u64,
    policy: ServicePolicy,
    state: CustomerState,
    times: Timestamps,
}

impl CustomerProcess {
    pub fn new(customer_id: u64, policy: ServicePolicy) -> Self {
        Self {
            customer_id,
            policy,
            state: CustomerState::Arrived,
            times: Timestamps::default(),
        }
    }

    fn enter_checkout(&mut self, grant: Grant, ctx: &mut RestaurantContext<'_>) -> Result<Activity, SimError> {
        self.times.checkout_start = ctx.now();
        ctx.timeout(self.policy.checkout_delay)?;
        self.state = CustomerState::InCheckout(grant);
        Ok(Activity::Suspended)
    }

    fn request_kitchen(&mut self, ctx: &mut RestaurantContext<'_>) -> Result<Activity, SimError> {
        let item = ctx.model().generator().choose_menu_item();
        self.times.service_start = ctx.now();
        debug!(
            "[Customer:{}] ordered {} at {:.3}",
            self.customer_id,
            item.name,
            ctx.now()
        );

        match ctx.acquire(Stage::Kitchen.resource_id())? {
            Some(grant) => self.enter_kitchen(item, grant, ctx),
            None => {
                self.state = CustomerState::AwaitingKitchen { item };
                Ok(Activity::Suspended)
            }
        }
    }

    fn enter_kitchen(
        &mut self,
        item: MenuItem,
        grant: Grant,
        ctx: &mut RestaurantContext<'_>,
    ) -> Result<Activity, SimError> {
        self.times.kitchen_start = ctx.now();
        ctx.timeout(item.preparation_time)?;
        self.state = CustomerState::InKitchen { item, grant };
        Ok(Activity::Suspended)
    }

    fn complete(&mut self, item: MenuItem, ctx: &mut RestaurantContext<'_>) -> Result<Activity, SimError> {
        let timeline = CustomerTimeline {
            arrival_time: self.times.arrival_time,
            checkout_start: self.times.checkout_start,
            service_start: self.times.service_start,
            kitchen_start: self.times.kitchen_start,
            completion_time: ctx.now(),
        };
        let record = CustomerRecord::new(
            self.customer_id,
            item,
            timeline,
            self.policy.complaint_threshold,
        );
        ctx.model().metrics().record(record);
        self.state = CustomerState::Completed;
        Ok(Activity::Finished)
    }
}

impl Process<RestaurantState> for CustomerProcess {
    fn kind(&self) -> ProcessKind {
        ProcessKind::Entity
    }

    fn state_name(&self) -> &'static str {
        self.state.name()
    }

    fn resume(&mut self, signal: Signal, ctx: &mut RestaurantContext<'_>) -> Result<Activity, SimError> {
        let state = std::mem::replace(&mut self.state, CustomerState::Completed);
        match (state, signal) {
            (CustomerState::Arrived, Signal::Start) => {
                self.times.arrival_time = ctx.now();
                ctx.model().metrics().note_arrival();
                debug!("[Customer:{}] arrived at {:.3}", self.customer_id, ctx.now());
                match ctx.acquire(Stage::Checkout.resource_id())? {
                    Some(grant) => self.enter_checkout(grant, ctx),
                    None => {
                        self.state = CustomerState::AwaitingCheckout;
                        Ok(Activity::Suspended)
                    }
                }
            }
            (CustomerState::AwaitingCheckout, Signal::Granted(grant)) => {
                self.enter_checkout(grant, ctx)
            }
            (CustomerState::InCheckout(grant), Signal::Timeout) => {
                ctx.release(grant)?;
                self.request_kitchen(ctx)
            }
            (CustomerState::AwaitingKitchen { item }, Signal::Granted(grant)) => {
                self.enter_kitchen(item, grant, ctx)
            }
            (CustomerState::InKitchen { item, grant }, Signal::Timeout) => {
                ctx.release(grant)?;
                self.complete(item, ctx)
            }
            (state, signal) => {
                let err = unexpected_signal(ctx.id(), state.name(), &signal);
                self.state = state;
                Err(err)
            }
        }
    }
}
