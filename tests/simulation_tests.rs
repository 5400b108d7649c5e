#[cfg(test)]
mod tests {
    use macro_engine::*;
    use std::sync::Arc;

    fn config(steps: u64) -> SimConfig {
        SimConfig { num_steps: steps, horizon_steps: steps, ..SimConfig::default() }
    }

    /// Every shock and drift switched off, no organic opening or closing.
    fn quiet_config(steps: u64) -> SimConfig {
        let mut c = config(steps);
        c.close_warmup_steps = 0;
        c.troves.n_steady = 0.0;
        c.troves.open_sd = 0.0;
        c.troves.close_sd = 0.0;
        c.stability.yield_sd = 0.0;
        c.stability.pool_sd = 0.0;
        c.stability.pool_drift = 1.0;
        c.stability.theta = 0.0;
        c.pools.liquidity_sd = 0.0;
        c.pools.liquidity_drift = 1.0;
        c.pools.redemption_sd = 0.0;
        c.governance.bootstrap_earnings_sd = 0.0;
        c
    }

    fn flat_paths(len: usize) -> Arc<dyn PricePaths> {
        Arc::new(FixedPaths::constant(1000.0, 0.2, 1.0, len))
    }

    // ========== Determinism ==========

    #[test]
    fn test_same_seed_reproduces_run() {
        let c = config(500);
        let a = Simulation::with_generated_paths(c.clone()).expect("test: new").run().expect("test: run");
        let b = Simulation::with_generated_paths(c).expect("test: new").run().expect("test: run");
        assert_eq!(a.records, b.records);
        assert_eq!(a.troves.troves(), b.troves.troves());
    }

    #[test]
    fn test_run_seed_changes_outcome() {
        let a = Simulation::with_generated_paths(config(300)).expect("test: new").run().expect("test: run");
        let b = Simulation::with_generated_paths(SimConfig { run_seed: 1, ..config(300) })
            .expect("test: new")
            .run()
            .expect("test: run");
        assert_ne!(a.records, b.records);
    }

    // ========== Steady State ==========

    #[test]
    fn test_quiet_market_is_a_fixed_point() {
        let outcome = Simulation::new(quiet_config(200), flat_paths(200))
            .expect("test: new")
            .run()
            .expect("test: run");
        assert_eq!(outcome.termination, Termination::Completed { steps: 200 });

        let first = &outcome.records[0];
        for r in &outcome.records[1..] {
            assert_eq!(r.peg_price, 1.0, "step {}", r.step);
            assert_eq!(r.n_troves, first.n_troves);
            assert_eq!(r.n_opened + r.n_closed + r.n_liquidated + r.n_redeemed, 0);
            assert!((r.debt_supply - first.debt_supply).abs() < 1e-9 * first.debt_supply);
            assert!((r.stability_pool - first.stability_pool).abs() < 1e-9 * first.debt_supply);
            assert!((r.liquidity_pool - first.liquidity_pool).abs() < 1e-9 * first.debt_supply);
        }
    }

    // ========== Record Stream ==========

    #[test]
    fn test_records_are_in_step_order() {
        let outcome = Simulation::with_generated_paths(config(400)).expect("test: new").run().expect("test: run");
        for (i, r) in outcome.records.iter().enumerate() {
            assert_eq!(r.step, i as u64);
        }
        let last = outcome.last().expect("test: last record");
        assert_eq!(last.n_troves as usize, outcome.troves.len());
        assert!((last.debt_supply - outcome.troves.total_debt()).abs() < 1e-6);
    }

    #[test]
    fn test_no_live_trove_below_liquidation_ratio_after_step() {
        let mut sim = Simulation::with_generated_paths(config(300)).expect("test: new");
        match sim.advance(299) {
            Ok(()) | Err(SimError::ModelBreakdown { .. }) => {}
            Err(e) => panic!("unexpected error: {}", e),
        }
        let troves = sim.troves();
        // Liquidation runs first; ceiling troves are minted exactly at 1.1.
        let fresh_floor = sim.config().troves.liquidation_ratio - 1e-9;
        let step = sim.records().len() as u64 - 1;
        for t in troves.iter().filter(|t| t.opened_at == step) {
            assert!(troves.ratio_of(t) >= fresh_floor);
        }
    }

    #[test]
    fn test_close_shortfall_reaches_the_record() {
        let mut c = quiet_config(20);
        c.troves.n_steady = 25.0;
        let mut sim = Simulation::new(c, flat_paths(20)).expect("test: new");
        let population = sim.troves().len() as u32;
        assert_eq!(population, 10);

        let record = sim.step().expect("test: step").clone();
        assert_eq!(record.close_requested, 25);
        assert_eq!(record.n_closed, population);
        assert_eq!(record.close_shortfall, 25 - population);
        assert!(!record.status.is_terminal());
        // Every survivor was opened this step.
        assert!(sim.troves().iter().all(|t| t.opened_at == 1));
        assert!(sim.step().is_ok());
    }

    // ========== Conservation ==========

    #[test]
    fn test_debt_is_conserved_through_long_run() {
        let outcome = Simulation::with_generated_paths(config(2000)).expect("test: new").run().expect("test: run");
        let peak_supply = outcome.records.iter().map(|r| r.debt_supply).fold(1.0_f64, f64::max);
        let worst = outcome.records.iter().map(|r| r.conservation_error).fold(0.0_f64, f64::max);
        assert!(worst < 1e-9 * peak_supply, "worst debt error {} at peak supply {}", worst, peak_supply);
    }

    // ========== Breakdown ==========

    #[test]
    fn test_collateral_collapse_breaks_down_with_terminal_record() {
        let mut collateral = vec![1000.0; 50];
        for p in collateral.iter_mut().skip(5) {
            *p = 100.0;
        }
        let paths = FixedPaths::constant(1000.0, 0.2, 1.0, 50).with_collateral(collateral);
        let outcome = Simulation::new(config(50), Arc::new(paths)).expect("test: new").run().expect("test: run");

        assert_eq!(
            outcome.termination,
            Termination::Breakdown { step: 5, cause: BreakdownCause::NegativeLiquidityPool }
        );
        assert_eq!(outcome.records.len(), 6);
        let last = outcome.last().expect("test: terminal record");
        assert!(last.status.is_terminal());
        assert!(last.liquidity_pool < 0.0);
        assert!(outcome.records[..5].iter().all(|r| !r.status.is_terminal()));
    }

    // ========== Policy Comparison ==========

    #[test]
    fn test_policies_share_exogenous_paths() {
        let c = config(600);
        let paths: Arc<dyn PricePaths> = Arc::new(GeneratedPaths::generate(&c).expect("test: paths"));
        let cmp = run_policy_comparison(&c, paths).expect("test: compare");
        let n = cmp.fixed.records.len().min(cmp.base_rate.records.len());
        for i in 0..n {
            assert_eq!(cmp.fixed.records[i].collateral_price, cmp.base_rate.records[i].collateral_price);
        }
        assert!(cmp.fixed.records.iter().all(|r| r.issuance_rate == 0.01));
        assert!(cmp.base_rate.records.iter().all(|r| (0.0..=1.0).contains(&r.issuance_rate)));
        assert!(cmp.base_rate.records.iter().all(|r| r.issuance_rate == r.redemption_rate));
    }

    // ========== Configuration ==========

    #[test]
    fn test_partial_json_config_drives_a_run() {
        let c = SimConfig::from_json(
            r#"{ "num_steps": 50, "fee_policy": { "kind": "base_rate", "initial": 0.005, "decay": 0.9, "sensitivity": 1.0 } }"#,
        )
        .expect("test: config");
        let outcome = Simulation::with_generated_paths(c).expect("test: new").run().expect("test: run");
        assert_eq!(outcome.policy, "base-rate");
        assert_eq!(outcome.records[0].issuance_rate, 0.005);
    }

    #[test]
    fn test_invalid_config_is_rejected_before_running() {
        let mut c = config(10);
        c.troves.inattention_shape = -1.0;
        assert!(matches!(
            Simulation::with_generated_paths(c).err(),
            Some(SimError::InvalidConfig { field: "troves.inattention_shape", .. })
        ));
    }
}
