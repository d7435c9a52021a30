use crate::core::errors::SimError;
use crate::core::event::Signal;
use crate::core::process::{unexpected_signal, Activity, Process, ProcessKind};
use crate::restaurant::customer::{CustomerProcess, ServicePolicy};
use crate::restaurant::simulation::{RestaurantContext, RestaurantState};
use log::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArrivalState {
    Idle,
    WaitingForNextArrival,
}

/// Spawns customers at exponential intervals.
///
/// There is no stop condition here; the run horizon is what ends the stream.
#[derive(Debug)]
pub struct ArrivalProcess {
    state: ArrivalState,
    customers_spawned: u64,
    policy: ServicePolicy,
}

impl ArrivalProcess {
    pub fn new(policy: ServicePolicy) -> Self {
        Self {
            state: ArrivalState::Idle,
            customers_spawned: 0,
            policy,
        }
    }

    fn wait_for_next(&mut self, ctx: &mut RestaurantContext<'_>) -> Result<Activity, SimError> {
        let gap = ctx.model().generator().next_inter_arrival();
        ctx.timeout(gap)?;
        self.state = ArrivalState::WaitingForNextArrival;
        Ok(Activity::Suspended)
    }
}

impl Process<RestaurantState> for ArrivalProcess {
    fn kind(&self) -> ProcessKind {
        ProcessKind::Source
    }

    fn state_name(&self) -> &'static str {
        match self.state {
            ArrivalState::Idle => "Idle",
            ArrivalState::WaitingForNextArrival => "WaitingForNextArrival",
        }
    }

    fn resume(&mut self, signal: Signal, ctx: &mut RestaurantContext<'_>) -> Result<Activity, SimError> {
        match (self.state, &signal) {
            (ArrivalState::Idle, Signal::Start) => self.wait_for_next(ctx),
            (ArrivalState::WaitingForNextArrival, Signal::Timeout) => {
                self.customers_spawned += 1;
                let customer = CustomerProcess::new(self.customers_spawned, self.policy);
                let pid = ctx.spawn(Box::new(customer))?;
                debug!(
                    "[Arrivals] Customer {} spawned as {} at {:.3}",
                    self.customers_spawned,
                    pid,
                    ctx.now()
                );
                self.wait_for_next(ctx)
            }
            _ => Err(unexpected_signal(ctx.id(), self.state_name(), &signal)),
        }
    }
}
