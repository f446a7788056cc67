//! Unit tests for vf-core primitives.

#[cfg(test)]
mod ids {
    use crate::{EntityId, LaneId, PathId};

    #[test]
    fn index_roundtrip() {
        let id = EntityId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(EntityId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn narrow_ids_reject_overflow() {
        assert!(LaneId::try_from(70_000usize).is_err());
        assert!(PathId::try_from(3usize).is_ok());
    }

    #[test]
    fn display() {
        assert_eq!(EntityId(7).to_string(), "EntityId(7)");
    }
}

#[cfg(test)]
mod time {
    use crate::SimTime;

    #[test]
    fn arithmetic() {
        let t = SimTime(10.0);
        assert_eq!(t + 5.0, SimTime(15.0));
        assert_eq!(t.offset(2.5), SimTime(12.5));
        assert_eq!(SimTime(15.0) - SimTime(10.0), 5.0);
        assert_eq!(SimTime(15.0).since(SimTime(4.0)), 11.0);
    }

    #[test]
    fn total_order() {
        let mut v = vec![SimTime(3.0), SimTime(0.5), SimTime(2.0)];
        v.sort();
        assert_eq!(v, vec![SimTime(0.5), SimTime(2.0), SimTime(3.0)]);
    }

    #[test]
    fn hms_display() {
        let t = SimTime(3_600.0 + 2.0 * 60.0 + 3.5);
        let (h, m, s) = t.hms();
        assert_eq!((h, m), (1, 2));
        assert!((s - 3.5).abs() < 1e-9);
        assert_eq!(t.to_string(), "01:02:03.500");
    }
}

#[cfg(test)]
mod rng {
    use crate::SimRng;

    #[test]
    fn deterministic_same_seed() {
        let mut r1 = SimRng::new(12345);
        let mut r2 = SimRng::new(12345);
        for _ in 0..100 {
            assert_eq!(r1.uniform(0.0, 1.0), r2.uniform(0.0, 1.0));
            assert_eq!(r1.exponential(10.0), r2.exponential(10.0));
        }
    }

    #[test]
    fn derived_seeds_differ() {
        let a = SimRng::derive_seed(42, 0);
        let b = SimRng::derive_seed(42, 1);
        assert_ne!(a, b);
        assert_ne!(a, 42);
    }

    #[test]
    fn uniform_in_bounds_and_degenerate() {
        let mut rng = SimRng::new(0);
        for _ in 0..1000 {
            let v = rng.uniform(60.0, 180.0);
            assert!((60.0..180.0).contains(&v));
        }
        assert_eq!(rng.uniform(5.0, 5.0), 5.0);
    }

    #[test]
    fn exponential_mean_is_close() {
        let mut rng = SimRng::new(7);
        let n = 20_000;
        let mean = (0..n).map(|_| rng.exponential(10.0)).sum::<f64>() / n as f64;
        assert!((mean - 10.0).abs() < 0.5, "mean {mean}");
    }

    #[test]
    fn gen_bool_extremes() {
        let mut rng = SimRng::new(0);
        assert!(!rng.gen_bool(0.0));
        assert!(rng.gen_bool(1.0));
    }
}

#[cfg(test)]
mod dist {
    use crate::{Categorical, ConfigError, DelaySpec, SimRng};

    #[test]
    fn categorical_rejects_bad_sum() {
        let err = Categorical::new("test", [(1u32, 0.5), (2, 0.4)]).unwrap_err();
        assert!(matches!(err, ConfigError::ProbabilitySum { .. }));
    }

    #[test]
    fn categorical_rejects_empty() {
        let err = Categorical::<u32>::new("test", []).unwrap_err();
        assert!(matches!(err, ConfigError::Empty { .. }));
    }

    #[test]
    fn categorical_frequencies() {
        let c = Categorical::new("test", [('a', 0.25), ('b', 0.75)]).unwrap();
        let mut rng = SimRng::new(3);
        let n = 20_000;
        let a = (0..n).filter(|_| *c.sample(&mut rng) == 'a').count();
        let frac = a as f64 / n as f64;
        assert!((frac - 0.25).abs() < 0.02, "got {frac}");
    }

    #[test]
    fn normal_delay_clamped_at_zero() {
        let spec = DelaySpec::Normal { mean_secs: 0.0, std_secs: 100.0 };
        let mut rng = SimRng::new(9);
        assert!((0..1000).all(|_| spec.sample(&mut rng) >= 0.0));
    }

    #[test]
    fn delay_validation() {
        assert!(DelaySpec::Fixed { secs: -1.0 }.validate("x").is_err());
        assert!(DelaySpec::Uniform { min_secs: 5.0, max_secs: 1.0 }.validate("x").is_err());
        assert!(DelaySpec::Exponential { mean_secs: 0.0 }.validate("x").is_err());
        assert!(DelaySpec::Uniform { min_secs: 0.0, max_secs: 0.0 }.validate("x").is_ok());
    }
}

#[cfg(test)]
mod config {
    use crate::{ConfigError, IngressConfig};

    #[test]
    fn baseline_is_valid() {
        let cfg = IngressConfig::baseline();
        cfg.validate().unwrap();
        assert_eq!(cfg.total_lanes(), 30);
        assert_eq!(cfg.arrival_window(), cfg.horizon_secs);
    }

    #[test]
    fn hold_times_from_throughput() {
        let cfg = IngressConfig::baseline();
        assert!((cfg.descent.escalator_hold_secs() - 1.5).abs() < 1e-12);
        assert!((cfg.descent.stairs_hold_secs() - 0.375).abs() < 1e-12);
    }

    #[test]
    fn rejects_unnormalised_path_probabilities() {
        let mut cfg = IngressConfig::baseline();
        cfg.paths[0].probability = 0.5;
        assert!(matches!(cfg.validate(), Err(ConfigError::ProbabilitySum { .. })));
    }

    #[test]
    fn rejects_negative_outage_bound() {
        let mut cfg = IngressConfig::baseline();
        cfg.security.outage_min_secs = -1.0;
        assert!(matches!(cfg.validate(), Err(ConfigError::Negative { .. })));
    }

    #[test]
    fn rejects_zero_capacity() {
        let mut cfg = IngressConfig::baseline();
        cfg.descent.escalator_capacity = 0;
        assert!(matches!(cfg.validate(), Err(ConfigError::NonPositive { .. })));

        let mut cfg = IngressConfig::baseline();
        cfg.security.checkpoints[1].lanes = 0;
        assert!(matches!(cfg.validate(), Err(ConfigError::NonPositive { .. })));
    }

    #[test]
    fn rejects_probability_out_of_range() {
        let mut cfg = IngressConfig::baseline();
        cfg.security.failure_probability = 1.5;
        assert!(matches!(cfg.validate(), Err(ConfigError::ProbabilityRange { .. })));
    }

    #[test]
    fn rejects_coordination_below_one() {
        let mut cfg = IngressConfig::baseline();
        cfg.security.coordination_factor = 0.9;
        assert!(cfg.validate().is_err());
    }
}

#[cfg(test)]
mod transport {
    use crate::TransportMode;

    #[test]
    fn display() {
        assert_eq!(TransportMode::Drive.to_string(), "drive");
        assert_eq!(TransportMode::Bus.as_str(), "bus");
    }
}
