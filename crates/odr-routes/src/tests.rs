//! Unit tests for odr-routes.

#[cfg(test)]
mod helpers {
    use odr_detector::{DetectorRegistry, DetectorType};
    use odr_network::{RoadNetwork, RoadNetworkBuilder};

    use crate::{DistrictRegistry, EdgeRole};

    /// `e_ab` A→B and `e_ba` B→A, 100 m each.
    pub fn two_way() -> RoadNetwork {
        let mut b = RoadNetworkBuilder::new();
        b.add_edge("e_ab", "A", "B", 100.0, 10.0, false).unwrap();
        b.add_edge("e_ba", "B", "A", 100.0, 10.0, false).unwrap();
        b.build()
    }

    /// District `A` sends on `e_ab` and receives on `e_ba`; `B` the reverse.
    pub fn two_districts(net: &RoadNetwork) -> DistrictRegistry {
        let mut reg = DistrictRegistry::new();
        let a = reg.add_district("A", None).unwrap();
        let b = reg.add_district("B", None).unwrap();
        let ab = net.edge_by_name("e_ab").unwrap();
        let ba = net.edge_by_name("e_ba").unwrap();
        reg.add_edge(a, ab, EdgeRole::Source, "e_ab").unwrap();
        reg.add_edge(a, ba, EdgeRole::Sink, "e_ba").unwrap();
        reg.add_edge(b, ba, EdgeRole::Source, "e_ba").unwrap();
        reg.add_edge(b, ab, EdgeRole::Sink, "e_ab").unwrap();
        reg
    }

    /// A source and a sink detector on each edge.
    pub fn four_detectors(net: &RoadNetwork) -> DetectorRegistry {
        let mut reg = DetectorRegistry::new();
        reg.add(net, "ab_in", "e_ab_0", 10.0, DetectorType::Source).unwrap();
        reg.add(net, "ab_out", "e_ab_0", 90.0, DetectorType::Sink).unwrap();
        reg.add(net, "ba_in", "e_ba_0", 10.0, DetectorType::Source).unwrap();
        reg.add(net, "ba_out", "e_ba_0", 90.0, DetectorType::Sink).unwrap();
        reg
    }

    /// Feeder `s` S→A, two corridors A→B→E (30 s) and A→D→E (60 s),
    /// exit `t` E→T.
    pub fn corridor() -> RoadNetwork {
        let mut b = RoadNetworkBuilder::new();
        for (name, from, to, len) in [
            ("s", "S", "A", 50.0),
            ("ab", "A", "B", 100.0),
            ("be", "B", "E", 200.0),
            ("ad", "A", "D", 300.0),
            ("de", "D", "E", 300.0),
            ("t", "E", "T", 50.0),
        ] {
            b.add_edge(name, from, to, len, 10.0, false).unwrap();
        }
        b.build()
    }

    pub fn corridor_districts(net: &RoadNetwork) -> DistrictRegistry {
        let mut reg = DistrictRegistry::new();
        let w = reg.add_district("west", Some("g_west")).unwrap();
        let e = reg.add_district("east", Some("g_east")).unwrap();
        reg.add_edge(w, net.edge_by_name("s").unwrap(), EdgeRole::Source, "s").unwrap();
        reg.add_edge(e, net.edge_by_name("t").unwrap(), EdgeRole::Sink, "t").unwrap();
        reg
    }

    pub fn corridor_detectors(net: &RoadNetwork) -> DetectorRegistry {
        let mut reg = DetectorRegistry::new();
        reg.add(net, "d_s", "s_0", 10.0, DetectorType::Source).unwrap();
        reg.add(net, "d_t", "t_0", 10.0, DetectorType::Sink).unwrap();
        reg
    }
}

// ── Districts ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod districts {
    use odr_core::EdgeId;

    use crate::{DistrictRegistry, EdgeRole, RouteError};

    #[test]
    fn implicit_singleton_groups() {
        let net = super::helpers::two_way();
        let reg = super::helpers::two_districts(&net);
        assert_eq!(reg.group_count(), 2);
        let ab = net.edge_by_name("e_ab").unwrap();
        assert_ne!(reg.source_group(ab), reg.sink_group(ab));
        assert_eq!(reg.group(reg.source_group(ab).unwrap()).name, "A");
    }

    #[test]
    fn shared_group() {
        let mut reg = DistrictRegistry::new();
        let a = reg.add_district("a", Some("g")).unwrap();
        let b = reg.add_district("b", Some("g")).unwrap();
        assert_eq!(reg.district(a).group, reg.district(b).group);
        assert_eq!(reg.group(reg.district(a).group).districts.len(), 2);
        assert!(matches!(reg.add_district("a", Some("h")), Err(RouteError::GroupConflict { .. })));
        assert_eq!(reg.add_district("a", None).unwrap(), a);
    }

    #[test]
    fn roles_are_disjoint() {
        let mut reg = DistrictRegistry::new();
        let a = reg.add_district("a", None).unwrap();
        reg.add_edge(a, EdgeId::from_index(0), EdgeRole::Source, "x").unwrap();
        reg.add_edge(a, EdgeId::from_index(0), EdgeRole::Source, "x").unwrap();
        assert_eq!(reg.district(a).sources.len(), 1);
        assert!(matches!(
            reg.add_edge(a, EdgeId::from_index(0), EdgeRole::Sink, "x"),
            Err(RouteError::RoleConflict { .. })
        ));
    }

    #[test]
    fn unknown_edge_has_no_group() {
        let net = super::helpers::two_way();
        let reg = super::helpers::two_districts(&net);
        assert_eq!(reg.source_group(EdgeId::from_index(77)), None);
    }
}

// ── OD matrix ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod od {
    use crate::{OdMatrix, RouteError};

    fn names(n: &[&str]) -> Vec<String> {
        n.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn trips_round_cell_times_factor() {
        let m = OdMatrix::new(names(&["a", "b"]), vec![vec![0.0, 3.0], vec![5.0, 0.0]], 1.5).unwrap();
        assert_eq!(m.trips(0, 1), 5); // 4.5 rounds away from zero
        assert_eq!(m.trips(1, 0), 8); // 7.5
        assert_eq!(m.total_trips(), 13);
        assert_eq!(m.nonzero_cells().collect::<Vec<_>>(), vec![(0, 1, 5), (1, 0, 8)]);
    }

    #[test]
    fn dimension_mismatch_names_both_sizes() {
        let err = OdMatrix::new(names(&["a", "b"]), vec![vec![0.0, 1.0]], 1.0).unwrap_err();
        match err {
            RouteError::Dimension { declared, found, .. } => assert_eq!((declared, found), (2, 1)),
            other => panic!("unexpected {other:?}"),
        }
        assert!(OdMatrix::new(names(&["a"]), vec![vec![0.0, 1.0]], 1.0).is_err());
    }

    #[test]
    fn oversized_cell_is_rejected() {
        let err = OdMatrix::new(names(&["a", "b"]), vec![vec![0.0, 1e30], vec![0.0, 0.0]], 1.0)
            .unwrap_err();
        assert!(matches!(err, RouteError::BadCell { row: 0, col: 1, .. }), "{err:?}");

        let err = OdMatrix::new(names(&["a"]), vec![vec![f64::NAN]], 1.0).unwrap_err();
        assert!(matches!(err, RouteError::BadCell { row: 0, col: 0, .. }), "{err:?}");
    }

    #[test]
    fn trip_total_is_bounded() {
        let big = crate::od::MAX_TRIPS as f64;
        let err = OdMatrix::new(names(&["a", "b"]), vec![vec![0.0, big], vec![1.0, 0.0]], 1.0)
            .unwrap_err();
        assert!(matches!(err, RouteError::TooManyTrips { .. }), "{err:?}");
    }
}

// ── Loaders ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod loaders {
    use std::io::Cursor;

    use crate::{load_districts_reader, parse_od_matrix, RouteError};

    const V_FILE: &str = "$VMR\n\
                          * vehicle type\n\
                          car\n\
                          * window\n\
                          7.00 8.30\n\
                          * factor\n\
                          1.0\n\
                          2\n\
                          north south\n\
                          0 10\n\
                          10 0\n";

    #[test]
    fn v_format_matrix() {
        let m = parse_od_matrix(Cursor::new(V_FILE)).unwrap();
        assert!(m.use_vehicle_type);
        assert_eq!(m.vehicle_type, "car");
        assert_eq!((m.from_time, m.to_time), (25_200, 30_600));
        assert_eq!(m.districts, vec!["north".to_string(), "south".to_string()]);
        assert_eq!(m.trips(0, 1), 10);
        assert_eq!(m.total_trips(), 20);
    }

    #[test]
    fn v_header_without_vehicle_type() {
        let text = V_FILE.replace("$VMR", "$V-");
        assert!(!parse_od_matrix(Cursor::new(text)).unwrap().use_vehicle_type);
    }

    #[test]
    fn bad_header_rejected() {
        let text = V_FILE.replace("$VMR", "$O");
        assert!(matches!(parse_od_matrix(Cursor::new(text)), Err(RouteError::OdFormat { .. })));
    }

    #[test]
    fn too_many_districts_rejected() {
        let text = V_FILE.replace("\n2\n", "\n100\n");
        assert!(parse_od_matrix(Cursor::new(text)).is_err());
    }

    #[test]
    fn missing_row_is_dimension_error() {
        let text = V_FILE.trim_end().trim_end_matches("10 0").to_string();
        assert!(matches!(parse_od_matrix(Cursor::new(text)), Err(RouteError::Dimension { .. })));
    }

    #[test]
    fn district_csv() {
        let net = super::helpers::two_way();
        let csv = "district,group,edge,role\n\
                   A,,e_ab,source\n\
                   A,,e_ba,sink\n\
                   B,grp,e_ba,source\n";
        let reg = load_districts_reader(Cursor::new(csv), &net).unwrap();
        assert_eq!(reg.len(), 2);
        let a = reg.district(reg.by_name("A").unwrap());
        assert_eq!((a.sources.len(), a.sinks.len()), (1, 1));
        assert_eq!(reg.group(reg.district(reg.by_name("B").unwrap()).group).name, "grp");
    }

    #[test]
    fn district_csv_unknown_edge() {
        let net = super::helpers::two_way();
        let csv = "district,group,edge,role\nA,,nope,source\n";
        assert!(matches!(
            load_districts_reader(Cursor::new(csv), &net),
            Err(RouteError::UnknownEdge(_))
        ));
    }
}

// ── Catalog ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod catalog {
    use odr_core::{NoopLogger, SimRng};

    use crate::{CatalogOptions, RouteCatalog, RouteError};

    fn opts(k: usize, k_selected: Option<usize>) -> CatalogOptions {
        CatalogOptions { k, k_selected }
    }

    #[test]
    fn two_way_gives_one_route_per_direction() {
        let net = super::helpers::two_way();
        let districts = super::helpers::two_districts(&net);
        let dets = super::helpers::four_detectors(&net);
        let mut rng = SimRng::new(1);
        let cat = RouteCatalog::build(&net, &dets, &districts, opts(1, None), &mut rng, &NoopLogger).unwrap();

        assert_eq!(cat.len(), 2);
        let ab = net.edge_by_name("e_ab").unwrap();
        let ba = net.edge_by_name("e_ba").unwrap();
        let trip = cat.trip(ab, ab).unwrap();
        assert_eq!(trip.routes.len(), 1);
        assert_eq!(cat.route(trip.routes[0]).name, "e_ab_to_e_ab");
        assert!(cat.trip(ab, ba).is_none());
        assert_eq!(cat.routes_of_detector(dets.by_name("ab_in").unwrap()).len(), 1);
        assert!(cat.routes_of_detector(dets.by_name("ab_out").unwrap()).is_empty());
    }

    #[test]
    fn k_paths_named_with_suffix() {
        let net = super::helpers::corridor();
        let districts = super::helpers::corridor_districts(&net);
        let dets = super::helpers::corridor_detectors(&net);
        let mut rng = SimRng::new(1);
        let cat = RouteCatalog::build(&net, &dets, &districts, opts(3, None), &mut rng, &NoopLogger).unwrap();

        assert_eq!(cat.len(), 2);
        let fast = cat.route(cat.by_name("s_to_t").unwrap());
        let slow = cat.route(cat.by_name("s_to_t_1").unwrap());
        assert!(fast.duration_s < slow.duration_s);
        assert!((fast.distance_m - 400.0).abs() < 1e-9);
        assert!((fast.duration_s - 40.0).abs() < 1e-9);
        let trip = cat.trip(net.edge_by_name("s").unwrap(), net.edge_by_name("t").unwrap()).unwrap();
        assert_eq!(trip.routes.len(), 2);
    }

    #[test]
    fn k_selected_draws_subset() {
        let net = super::helpers::corridor();
        let districts = super::helpers::corridor_districts(&net);
        let dets = super::helpers::corridor_detectors(&net);
        let mut rng = SimRng::new(9);
        let cat = RouteCatalog::build(&net, &dets, &districts, opts(2, Some(1)), &mut rng, &NoopLogger).unwrap();
        assert_eq!(cat.len(), 1);
        assert_eq!(cat.trips().len(), 1);
    }

    #[test]
    fn k_selected_above_k_is_config_error() {
        let net = super::helpers::corridor();
        let districts = super::helpers::corridor_districts(&net);
        let dets = super::helpers::corridor_detectors(&net);
        let mut rng = SimRng::new(1);
        let r = RouteCatalog::build(&net, &dets, &districts, opts(1, Some(2)), &mut rng, &NoopLogger);
        assert!(matches!(r, Err(RouteError::Config(_))));
    }

    #[test]
    fn same_group_pairs_are_skipped() {
        let net = super::helpers::corridor();
        let mut districts = crate::DistrictRegistry::new();
        let w = districts.add_district("west", Some("g")).unwrap();
        let e = districts.add_district("east", Some("g")).unwrap();
        districts.add_edge(w, net.edge_by_name("s").unwrap(), crate::EdgeRole::Source, "s").unwrap();
        districts.add_edge(e, net.edge_by_name("t").unwrap(), crate::EdgeRole::Sink, "t").unwrap();
        let dets = super::helpers::corridor_detectors(&net);
        let mut rng = SimRng::new(1);
        let cat = RouteCatalog::build(&net, &dets, &districts, opts(2, None), &mut rng, &NoopLogger).unwrap();
        assert!(cat.is_empty());
    }

    #[test]
    fn identical_paths_deduplicate() {
        let net = super::helpers::two_way();
        let ab = net.edge_by_name("e_ab").unwrap();
        let route = odr_network::Route::from_edges(&net, vec![ab]);
        let mut cat = RouteCatalog::new();
        let a = cat.add_route(&net, &route);
        let b = cat.add_route(&net, &route);
        assert_eq!(a, b);
        assert_eq!(cat.len(), 1);
    }
}
