//! Unit tests for odr-core primitives.

#[cfg(test)]
mod ids {
    use crate::{DetectorId, EdgeId, NodeId, RouteId};

    #[test]
    fn index_roundtrip() {
        let id = EdgeId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(EdgeId::try_from(42usize).unwrap(), id);
        assert_eq!(EdgeId::from_index(42), id);
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    #[should_panic(expected = "EdgeId index 4294967296 overflows")]
    fn oversized_index_panics() {
        EdgeId::from_index(u32::MAX as usize + 1);
    }

    #[test]
    fn ordering() {
        assert!(RouteId(0) < RouteId(1));
        assert!(NodeId(100) > NodeId(99));
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(NodeId::INVALID.0, u32::MAX);
        assert_eq!(EdgeId::INVALID.0, u32::MAX);
        assert_eq!(DetectorId::default(), DetectorId::INVALID);
    }

    #[test]
    fn display() {
        assert_eq!(DetectorId(7).to_string(), "DetectorId(7)");
    }
}

#[cfg(test)]
mod time {
    use crate::{parse_hhmm, OdrError, TimeGrid};

    #[test]
    fn grid_rejects_bad_bounds() {
        assert!(matches!(TimeGrid::new(0, 100, 0), Err(OdrError::Config(_))));
        assert!(matches!(TimeGrid::new(100, 100, 10), Err(OdrError::Config(_))));
    }

    #[test]
    fn slot_count_truncates() {
        let g = TimeGrid::new(0, 125, 60).unwrap();
        assert_eq!(g.slot_count(), 2);
        // 120..125 is a partial slot and not addressable.
        assert_eq!(g.slot_of(121), None);
    }

    #[test]
    fn slot_lookup() {
        let g = TimeGrid::new(43_200, 45_000, 60).unwrap();
        assert_eq!(g.slot_count(), 30);
        assert_eq!(g.slot_of(43_200), Some(0));
        assert_eq!(g.slot_of(43_259), Some(0));
        assert_eq!(g.slot_of(43_260), Some(1));
        assert_eq!(g.slot_of(45_000), None);
        assert_eq!(g.slot_of(43_199), None);
        assert_eq!(g.slot_start(3), 43_380);
    }

    #[test]
    fn require_slot_reports_window() {
        let g = TimeGrid::new(0, 600, 60).unwrap();
        match g.require_slot(900) {
            Err(OdrError::OutOfGrid { time, begin, end }) => {
                assert_eq!((time, begin, end), (900, 0, 600));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn hhmm_parsing() {
        assert_eq!(parse_hhmm("12.00").unwrap(), 43_200);
        assert_eq!(parse_hhmm(" 0.30 ").unwrap(), 1_800);
        assert_eq!(parse_hhmm("23.59").unwrap(), 86_340);
        assert!(parse_hhmm("24.00").is_err());
        assert!(parse_hhmm("12:00").is_err());
        assert!(parse_hhmm("12.7").is_err());
    }
}

#[cfg(test)]
mod rng {
    use crate::SimRng;

    #[test]
    fn same_seed_same_stream() {
        let mut a = SimRng::new(7);
        let mut b = SimRng::new(7);
        for _ in 0..16 {
            assert_eq!(a.gen_range(0..u64::MAX), b.gen_range(0..u64::MAX));
        }
    }

    #[test]
    fn children_diverge() {
        let mut root = SimRng::new(7);
        let mut c0 = root.child(0);
        let mut c1 = root.child(1);
        assert_ne!(c0.gen_range(0..u64::MAX), c1.gen_range(0..u64::MAX));
    }

    #[test]
    fn index_in_range() {
        let mut r = SimRng::new(3);
        for _ in 0..100 {
            assert!(r.index(5) < 5);
        }
    }
}

#[cfg(test)]
mod log {
    use crate::{LogLevel, Logger, MemoryLogger, NoopLogger};

    #[test]
    fn memory_logger_records_levels() {
        let log = MemoryLogger::new();
        log.info("starting");
        log.warning("unknown crossover");
        log.fatal("no routes");
        assert_eq!(log.entries().len(), 3);
        assert!(log.contains(LogLevel::Warning, "crossover"));
        assert_eq!(log.messages_at(LogLevel::Fatal), vec!["no routes".to_string()]);
    }

    #[test]
    fn noop_logger_is_object_safe() {
        let log: &dyn Logger = &NoopLogger;
        log.debug("ignored");
    }
}
