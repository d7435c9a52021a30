// Tests for restaurant runs through both stages
#[cfg(test)]
mod tests {
    use crate::core::errors::SimError;
    use crate::core::event::Signal;
    use crate::core::process::{unexpected_signal, Activity, Process, ProcessKind};
    use crate::core::resource::ResourcePool;
    use crate::core::simulation_engine::SimulationObserver;
    use crate::core::types::{ProcessId, SimTime};
    use crate::restaurant::config::SimulationConfig;
    use crate::restaurant::menu::{MenuItem, KIMCHI_FRIED_RICE, SPICY_RICE_CAKES};
    use crate::restaurant::metrics::{CustomerStatus, Summary};
    use crate::restaurant::random::ScriptedGenerator;
    use crate::restaurant::simulate;
    use crate::restaurant::simulation::{RestaurantContext, RestaurantState, Simulation};
    use crate::restaurant::stage::Stage;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn scripted_simulation(gaps: Vec<SimTime>, items: Vec<MenuItem>) -> Simulation {
        let mut sim = Simulation::with_generator(
            SimulationConfig::default(),
            Box::new(ScriptedGenerator::new(gaps, items)),
        )
        .unwrap();
        sim.spawn_arrivals().unwrap();
        sim
    }

    /// Four customers half a minute apart, hand-traced through both stages
    fn four_customer_trace() -> Simulation {
        scripted_simulation(
            vec![0.5, 0.5, 0.5, 0.5],
            vec![KIMCHI_FRIED_RICE, SPICY_RICE_CAKES, KIMCHI_FRIED_RICE, SPICY_RICE_CAKES],
        )
    }

    #[test]
    fn test_default_seeded_run_matches_reference_values() {
        let report = simulate(&SimulationConfig::default()).unwrap();

        assert_eq!(report.summary.customer_count(), 24);
        let mean = report.summary.mean_waiting_time().unwrap();
        assert!((mean - 1.1224213001375498).abs() < 1e-9, "mean wait {}", mean);
        assert_eq!(report.in_flight_customers, 7);
        assert_eq!(report.customers_arrived, 31);

        for record in &report.records[..2] {
            assert!(record.waiting_time().abs() < 1e-9);
            assert!((record.service_time() - 3.0).abs() < 1e-9);
            assert!((record.total_time() - 5.0).abs() < 1e-9);
            assert_eq!(record.menu_item(), SPICY_RICE_CAKES);
            assert_eq!(record.status(), CustomerStatus::Satisfied);
        }
        assert_eq!(report.records[0].customer_id(), 1);
        assert_eq!(report.records[1].customer_id(), 2);
    }

    #[test]
    fn test_lone_customer_never_waits() {
        let report = scripted_simulation(vec![1.0], vec![SPICY_RICE_CAKES])
            .run(50.0)
            .unwrap();

        assert_eq!(report.records.len(), 1);
        let record = &report.records[0];
        assert_eq!(record.customer_id(), 1);
        assert_eq!(record.arrival_time(), 1.0);
        assert_eq!(record.waiting_time(), 0.0);
        assert_eq!(record.service_time(), 3.0);
        assert_eq!(record.total_time(), 5.0);
        assert_eq!(record.completion_time(), 6.0);
        assert_eq!(record.status(), CustomerStatus::Satisfied);
        assert_eq!(report.customers_arrived, 1);
        assert_eq!(report.in_flight_customers, 0);
    }

    #[test]
    fn test_pinned_four_customer_trace() {
        let report = four_customer_trace().run(100.0).unwrap();

        // (id, arrival, checkout_start, service_start, kitchen_start, completion)
        let expected = [
            (1, 0.5, 0.5, 2.5, 2.5, 7.5),
            (2, 1.0, 2.5, 4.5, 7.5, 10.5),
            (3, 1.5, 4.5, 6.5, 10.5, 15.5),
            (4, 2.0, 6.5, 8.5, 15.5, 18.5),
        ];
        assert_eq!(report.records.len(), expected.len());
        for (record, (id, arrival, checkout, service, kitchen, done)) in
            report.records.iter().zip(expected.iter())
        {
            let timeline = record.timeline();
            assert_eq!(record.customer_id(), *id);
            assert_eq!(timeline.arrival_time, *arrival);
            assert_eq!(timeline.checkout_start, *checkout);
            assert_eq!(timeline.service_start, *service);
            assert_eq!(timeline.kitchen_start, *kitchen);
            assert_eq!(timeline.completion_time, *done);
        }

        let waits: Vec<f64> = report.records.iter().map(|r| r.waiting_time()).collect();
        assert_eq!(waits, vec![0.0, 1.5, 3.0, 4.5]);
        assert_eq!(report.summary.mean_waiting_time(), Some(2.25));
        assert_eq!(report.summary.customer_count(), 4);
        assert_eq!(report.final_time, 18.5);
    }

    #[test]
    fn test_complaint_threshold_in_a_rush() {
        // Four customers at t=1, two more at t=2; checkout takes 2 each
        let report = scripted_simulation(vec![1.0, 0.0, 0.0, 0.0, 1.0, 0.0], vec![])
            .run(200.0)
            .unwrap();

        let waits: Vec<f64> = report.records.iter().map(|r| r.waiting_time()).collect();
        assert_eq!(waits, vec![0.0, 2.0, 4.0, 6.0, 7.0, 9.0]);

        let statuses: Vec<CustomerStatus> = report.records.iter().map(|r| r.status()).collect();
        assert_eq!(statuses[4], CustomerStatus::Satisfied);
        assert_eq!(statuses[5], CustomerStatus::Complained);
        match report.summary {
            Summary::Served { complaints, .. } => assert_eq!(complaints, 1),
            Summary::NoCustomers => panic!("expected served summary"),
        }
    }

    #[test]
    fn test_horizon_abandons_in_flight_customers() {
        let report = four_customer_trace().run(10.0).unwrap();

        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].customer_id(), 1);
        assert_eq!(report.customers_arrived, 4);
        assert_eq!(report.in_flight_customers, 3);
        // Customer 2's kitchen timeout and the never-ending arrival gap
        assert_eq!(report.abandoned_events, 2);
        assert_eq!(report.final_time, 8.5);

        let kitchen = &report.resources[1];
        assert_eq!(kitchen.name, Stage::Kitchen.name());
        assert_eq!(kitchen.holders_at_end, 1);
        assert_eq!(kitchen.waiting_at_end, 2);
    }

    #[test]
    fn test_customer_finishing_at_horizon_is_recorded() {
        let report = four_customer_trace().run(7.5).unwrap();
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].completion_time(), 7.5);
    }

    #[test]
    fn test_zero_horizon_serves_nobody() {
        let report = simulate(&SimulationConfig::default().with_simulation_horizon(0)).unwrap();

        assert_eq!(report.summary, Summary::NoCustomers);
        assert_eq!(report.summary.mean_waiting_time(), None);
        assert_eq!(report.summary_text(), "No customers arrived during the simulation.");
        assert!(report.records.is_empty());
        assert_eq!(report.customers_arrived, 0);
    }

    #[test]
    fn test_first_arrival_after_horizon_serves_nobody() {
        let report = scripted_simulation(vec![5.0], vec![]).run(3.0).unwrap();
        assert_eq!(report.summary, Summary::NoCustomers);
        assert_eq!(report.in_flight_customers, 0);
        assert_eq!(report.abandoned_events, 1);
    }

    #[test]
    fn test_negative_horizon_is_rejected() {
        let sim = scripted_simulation(vec![1.0], vec![]);
        assert!(matches!(sim.run(-1.0), Err(SimError::InvalidInput(_))));
    }

    #[derive(Default)]
    struct StageProbe {
        peak_checkout: usize,
        peak_kitchen: usize,
        peak_kitchen_queue: usize,
        violations: usize,
    }

    struct SharedProbe(Rc<RefCell<StageProbe>>);

    impl SimulationObserver for SharedProbe {
        fn on_time_advance(&mut self, _old_time: SimTime, _new_time: SimTime) {}

        fn on_step_complete(&mut self, _time: SimTime, _process: ProcessId, resources: &ResourcePool) {
            let mut probe = self.0.borrow_mut();
            for stage in Stage::ALL {
                let resource = resources.get(stage.resource_id()).unwrap();
                if resource.holders() > resource.capacity() {
                    probe.violations += 1;
                }
            }
            let checkout = resources.get(Stage::Checkout.resource_id()).unwrap();
            let kitchen = resources.get(Stage::Kitchen.resource_id()).unwrap();
            probe.peak_checkout = probe.peak_checkout.max(checkout.holders());
            probe.peak_kitchen = probe.peak_kitchen.max(kitchen.holders());
            probe.peak_kitchen_queue = probe.peak_kitchen_queue.max(kitchen.queue_length());
        }
    }

    #[test]
    fn test_capacity_never_exceeded_under_load() {
        let config = SimulationConfig::default()
            .with_mean_inter_arrival(0.8)
            .with_capacities(2, 3);
        let probe = Rc::new(RefCell::new(StageProbe::default()));

        let mut sim = Simulation::new(config).unwrap();
        sim.add_observer(Box::new(SharedProbe(Rc::clone(&probe))));
        sim.spawn_arrivals().unwrap();
        let report = sim.run(200.0).unwrap();

        let probe = probe.borrow();
        assert_eq!(probe.violations, 0);
        assert_eq!(probe.peak_checkout, 2);
        assert!(probe.peak_kitchen <= 3);
        assert_eq!(probe.peak_kitchen_queue, report.resources[1].peak_queue_length);
        for stats in &report.resources {
            assert!(stats.peak_holders <= stats.capacity);
            assert!(stats.utilization >= 0.0 && stats.utilization <= 1.0 + 1e-9);
        }
    }

    #[test]
    fn test_single_server_stages_serve_in_arrival_order() {
        let report = simulate(
            &SimulationConfig::default()
                .with_mean_inter_arrival(1.5)
                .with_simulation_horizon(150),
        )
        .unwrap();
        assert!(report.records.len() > 2);

        for pair in report.records.windows(2) {
            assert!(pair[0].customer_id() < pair[1].customer_id());
            assert!(pair[0].timeline().checkout_start <= pair[1].timeline().checkout_start);
            assert!(pair[0].timeline().kitchen_start <= pair[1].timeline().kitchen_start);
        }
        assert_eq!(
            report.customers_arrived,
            report.records.len() as u64 + report.in_flight_customers as u64
        );
    }

    /// Grabs the free desk at t=0 and leaves at once
    struct Impatient;

    impl Process<RestaurantState> for Impatient {
        fn kind(&self) -> ProcessKind {
            ProcessKind::Entity
        }

        fn state_name(&self) -> &'static str {
            "Impatient"
        }

        fn resume(&mut self, signal: Signal, ctx: &mut RestaurantContext<'_>) -> Result<Activity, SimError> {
            match signal {
                Signal::Start => match ctx.acquire(Stage::Checkout.resource_id())? {
                    Some(grant) => {
                        ctx.release(grant)?;
                        Ok(Activity::Finished)
                    }
                    None => Ok(Activity::Suspended),
                },
                other => Err(unexpected_signal(ctx.id(), "Impatient", &other)),
            }
        }
    }

    #[test]
    fn test_injected_process_runs_alongside_customers() {
        let mut sim = Simulation::with_generator(
            SimulationConfig::default(),
            Box::new(ScriptedGenerator::new(vec![1.0], vec![SPICY_RICE_CAKES])),
        )
        .unwrap();
        sim.spawn(Box::new(Impatient)).unwrap();
        sim.spawn_arrivals().unwrap();
        let report = sim.run(20.0).unwrap();

        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].waiting_time(), 0.0);
        let checkout = &report.resources[0];
        assert_eq!(checkout.name, Stage::Checkout.name());
        assert_eq!(checkout.grants, 2);
    }
}
