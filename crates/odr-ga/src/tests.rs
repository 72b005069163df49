//! Unit tests for odr-ga.

#[cfg(test)]
mod helpers {
    use crate::{AlleleSet, GaParams, GenomeShape};

    /// `n` binary genes, each allowing `{0, 1}`.
    pub fn binary_shape(n: usize) -> GenomeShape<i64> {
        GenomeShape::new((0..n).map(|i| AlleleSet::new(vec![0, 1], i).unwrap()).collect())
    }

    /// Number of ones.
    pub fn ones(genes: &[i64]) -> f64 {
        genes.iter().filter(|&&g| g == 1).count() as f64
    }

    pub fn small_params(generations: usize) -> GaParams {
        GaParams {
            seed: Some(7),
            generations,
            population_size: 12,
            populations: 3,
            mutation_probability: 0.05,
            ..GaParams::default()
        }
    }
}

// ── Scheme names ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod schemes {
    use odr_core::{LogLevel, MemoryLogger};

    use crate::{
        CrossoverScheme, GaError, GaKind, ReplacementScheme, ScoreColumn, ScoreSelection,
        SelectionScheme,
    };

    #[test]
    fn canonical_names_round_trip() {
        for k in GaKind::ALL {
            assert_eq!(k.name().parse::<GaKind>().unwrap(), *k);
        }
        for r in ReplacementScheme::ALL {
            assert_eq!(r.to_string().parse::<ReplacementScheme>().unwrap(), *r);
        }
    }

    #[test]
    fn selection_aliases() {
        assert_eq!("SRS".parse::<SelectionScheme>().unwrap(), SelectionScheme::StochasticRemainder);
        assert_eq!(" DS ".parse::<SelectionScheme>().unwrap(), SelectionScheme::Deterministic);
    }

    #[test]
    fn unknown_name_is_an_error() {
        let err = "Gaussian".parse::<SelectionScheme>().unwrap_err();
        assert!(matches!(err, GaError::UnknownScheme { family: "selection scheme", .. }));
        assert!("Blend".parse::<CrossoverScheme>().is_err());
    }

    #[test]
    fn unknown_crossover_falls_back_with_warning() {
        let log = MemoryLogger::new();
        assert_eq!(CrossoverScheme::parse_or_one_point("Blend", &log), CrossoverScheme::OnePoint);
        assert!(log.contains(LogLevel::Warning, "Blend"));

        let quiet = MemoryLogger::new();
        assert_eq!(CrossoverScheme::parse_or_one_point("Cycle", &quiet), CrossoverScheme::Cycle);
        assert!(quiet.entries().is_empty());
    }

    #[test]
    fn score_selection() {
        let s: ScoreSelection = "Maximum | GAStatistics::Mean".parse().unwrap();
        assert_eq!(s.columns(), &[ScoreColumn::Mean, ScoreColumn::Maximum]);
        assert_eq!("All".parse::<ScoreSelection>().unwrap(), ScoreSelection::all());
        assert!("GAStatistics::NoScores".parse::<ScoreSelection>().unwrap().is_empty());
        assert!("Median".parse::<ScoreSelection>().is_err());
    }
}

// ── Parameters ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod params {
    use crate::{Direction, GaParams, ScalingScheme};

    #[test]
    fn defaults_are_valid() {
        GaParams::default().validate().unwrap();
    }

    #[test]
    fn invalid_values_rejected() {
        let bad = [
            GaParams { population_size: 1, ..GaParams::default() },
            GaParams { offspring: 3, ..GaParams::default() },
            GaParams { crossover_probability: 1.5, ..GaParams::default() },
            GaParams { convergence_percentage: 0.0, ..GaParams::default() },
            GaParams { scaling: ScalingScheme::Linear, linear_multiplier: 1.0, ..GaParams::default() },
        ];
        for p in bad {
            assert!(p.validate().is_err(), "{p:?}");
        }
    }

    #[test]
    fn replacement_and_migration_counts() {
        let p = GaParams::default();
        assert_eq!(p.replacement_count(30), 8); // 0.25 × 30 = 7.5
        let by_number = GaParams { replacement_percentage: 0.0, ..GaParams::default() };
        assert_eq!(by_number.replacement_count(30), 5);
        assert_eq!(by_number.replacement_count(3), 3);
        assert_eq!(p.migration_count(30), 3);
    }

    #[test]
    fn mini_maxi() {
        assert_eq!(Direction::from_mini_maxi(-1).unwrap(), Direction::Minimize);
        assert!(Direction::from_mini_maxi(0).is_err());
    }
}

// ── Genomes ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod genomes {
    use crate::{AlleleSet, DistanceKind, GaError, GenomeShape};

    #[test]
    fn multiset_distance_consumes_matches() {
        let d = DistanceKind::Multiset.distance(&[1, 1, 2], &[2, 1, 3]);
        assert!((d - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(DistanceKind::Multiset.distance(&[3, 2, 1], &[1, 2, 3]), 0.0);
    }

    #[test]
    fn positional_distance() {
        let d = DistanceKind::Positional.distance(&[1, 2, 3], &[1, 3, 3]);
        assert!((d - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(DistanceKind::Positional.distance(&[3, 2, 1], &[1, 2, 3]), 2.0 / 3.0);
    }

    #[test]
    fn allele_set_dedupes_and_rejects_empty() {
        let s = AlleleSet::new(vec![5, 3, 5], 0).unwrap();
        assert_eq!(s.as_slice(), &[5, 3]);
        assert!(matches!(AlleleSet::<i64>::new(vec![], 4), Err(GaError::EmptyAlleleSet { gene: 4 })));
    }

    #[test]
    fn stepped_allele_set_is_inclusive() {
        assert_eq!(AlleleSet::stepped(0, 180, 60).as_slice(), &[0, 60, 120, 180]);
        assert_eq!(AlleleSet::stepped(60, 60, 60).as_slice(), &[60]);
        assert_eq!(AlleleSet::stepped(100, 50, 60).as_slice(), &[100]);
    }

    #[test]
    fn shape_permits_and_repairs() {
        let shape = GenomeShape::new(vec![AlleleSet::single(1), AlleleSet::new(vec![2, 3], 1).unwrap()]);
        assert!(shape.permits(&[1, 3]));
        assert!(!shape.permits(&[1, 4]));
        assert!(!shape.permits(&[1]));
        let mut genes = vec![9, 3];
        shape.repair(&mut genes, &[1, 2]);
        assert_eq!(genes, vec![1, 3]);
    }
}

// ── Operators ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod operators {
    use odr_core::SimRng;

    use crate::{AlleleSet, Crossover, GenomeShape, Initializer, Mutation};

    const ALL: [Crossover; 7] = [
        Crossover::OnePoint,
        Crossover::TwoPoint,
        Crossover::EvenOdd,
        Crossover::Uniform,
        Crossover::Cycle,
        Crossover::Order,
        Crossover::PartialMatch,
    ];

    /// Position `i` allows exactly `{a[i], b[i]}`.
    fn pair_shape(a: &[i64], b: &[i64]) -> GenomeShape<i64> {
        GenomeShape::new(
            a.iter()
                .zip(b)
                .enumerate()
                .map(|(i, (&x, &y))| AlleleSet::new(vec![x, y], i).unwrap())
                .collect(),
        )
    }

    #[test]
    fn children_stay_within_allele_sets() {
        let a = [1, 2, 3, 4, 5, 6, 7, 8];
        let b = [8, 6, 4, 2, 7, 5, 3, 1];
        let shape = pair_shape(&a, &b);
        let mut rng = SimRng::new(3);
        for op in ALL {
            for _ in 0..50 {
                let (c1, c2) = op.cross(&a, &b, &shape, &mut rng);
                assert!(shape.permits(&c1), "{op:?} produced {c1:?}");
                assert!(shape.permits(&c2), "{op:?} produced {c2:?}");
            }
        }
    }

    #[test]
    fn duplicate_genes_are_handled() {
        let a = [4; 6];
        let b = [4, 5, 4, 5, 4, 5];
        let shape = pair_shape(&a, &b);
        let mut rng = SimRng::new(11);
        for op in ALL {
            let (c1, c2) = op.cross(&a, &b, &shape, &mut rng);
            assert_eq!((c1.len(), c2.len()), (6, 6));
            assert!(shape.permits(&c1) && shape.permits(&c2), "{op:?}");
        }
    }

    #[test]
    fn cycle_crossover_follows_the_cycle() {
        let a = [1, 2, 3, 4];
        let b = [2, 1, 4, 3];
        let shape = pair_shape(&a, &b);
        let (c1, c2) = Crossover::Cycle.cross(&a, &b, &shape, &mut SimRng::new(0));
        assert_eq!(c1, vec![1, 2, 4, 3]);
        assert_eq!(c2, vec![2, 1, 3, 4]);
    }

    #[test]
    fn even_odd_alternates() {
        let a = [1, 1, 1, 1];
        let b = [2, 2, 2, 2];
        let (c1, c2) = Crossover::EvenOdd.cross(&a, &b, &pair_shape(&a, &b), &mut SimRng::new(0));
        assert_eq!(c1, vec![1, 2, 1, 2]);
        assert_eq!(c2, vec![2, 1, 2, 1]);
    }

    #[test]
    fn single_gene_parents_are_copied() {
        let shape = pair_shape(&[1], &[2]);
        let (c1, c2) = Crossover::OnePoint.cross(&[1], &[2], &shape, &mut SimRng::new(0));
        assert_eq!((c1, c2), (vec![1], vec![2]));
    }

    #[test]
    fn ordered_initializer_cycles_alleles() {
        let shape = GenomeShape::new((0..4).map(|i| AlleleSet::new(vec![10, 20], i).unwrap()).collect());
        let genes = Initializer::Ordered.initialize(&shape, &mut SimRng::new(0));
        assert_eq!(genes, vec![10, 20, 10, 20]);
    }

    #[test]
    fn flip_on_single_alleles_changes_nothing() {
        let shape = GenomeShape::new(vec![AlleleSet::single(1); 5]);
        let mut genes = vec![1; 5];
        assert_eq!(Mutation::Flip.mutate(&mut genes, &shape, 1.0, &mut SimRng::new(1)), 0);
        assert_eq!(genes, vec![1; 5]);
    }

    #[test]
    fn swap_respects_allele_sets() {
        let shape = GenomeShape::new(vec![
            AlleleSet::single(1),
            AlleleSet::new(vec![2, 3], 1).unwrap(),
            AlleleSet::new(vec![2, 3], 2).unwrap(),
        ]);
        let mut rng = SimRng::new(5);
        for _ in 0..50 {
            let mut genes = vec![1, 2, 3];
            Mutation::Swap.mutate(&mut genes, &shape, 1.0, &mut rng);
            assert!(shape.permits(&genes));
        }
    }
}

// ── Scaling and selection ──────────────────────────────────────────────────────

#[cfg(test)]
mod scaling_selection {
    use odr_core::SimRng;

    use crate::{Direction, DistanceKind, Individual, Scaling, Selection};

    fn pop(scores: &[f64]) -> Vec<Individual<i64>> {
        scores
            .iter()
            .enumerate()
            .map(|(i, &s)| Individual::scored(vec![i as i64], s))
            .collect()
    }

    #[test]
    fn linear_scaling_stretches_best_to_multiplier() {
        let mut p = pop(&[1.0, 2.0, 3.0]);
        Scaling::Linear { multiplier: 1.2 }.evaluate(&mut p, Direction::Maximize);
        let f: Vec<f64> = p.iter().map(|m| m.fitness).collect();
        for (got, want) in f.iter().zip([1.6, 2.0, 2.4]) {
            assert!((got - want).abs() < 1e-9, "{f:?}");
        }
    }

    #[test]
    fn minimising_inverts_fitness_order() {
        let mut p = pop(&[1.0, 3.0]);
        Scaling::None.evaluate(&mut p, Direction::Minimize);
        assert!(p[0].fitness > p[1].fitness);
    }

    #[test]
    fn sigma_truncation_clamps_at_zero() {
        let mut p = pop(&[0.0, 10.0]);
        Scaling::SigmaTruncation { multiplier: 0.0 }.evaluate(&mut p, Direction::Maximize);
        assert_eq!(p[0].fitness, 0.0);
        assert_eq!(p[1].fitness, 5.0);
    }

    #[test]
    fn sharing_divides_by_niche_count() {
        let mut p = vec![
            Individual::scored(vec![1, 1], 10.0),
            Individual::scored(vec![1, 1], 10.0),
            Individual::scored(vec![7, 8], 10.0),
        ];
        let sharing = Scaling::Sharing { cutoff: 0.5, alpha: 1.0, distance: DistanceKind::Positional };
        sharing.evaluate(&mut p, Direction::Maximize);
        assert_eq!(p[0].fitness, 5.0);
        assert_eq!(p[2].fitness, 10.0);
    }

    #[test]
    fn roulette_never_picks_zero_fitness() {
        let mut p = pop(&[0.0, 5.0, 0.0]);
        Scaling::None.evaluate(&mut p, Direction::Maximize);
        let picks = Selection::Roulette.select(&p, 100, &mut SimRng::new(2));
        assert!(picks.iter().all(|&i| i == 1));
    }

    #[test]
    fn all_zero_fitness_is_uniform() {
        let p = pop(&[0.0, 0.0, 0.0]);
        let picks = Selection::Roulette.select(&p, 300, &mut SimRng::new(2));
        for i in 0..3 {
            assert!(picks.contains(&i));
        }
    }

    #[test]
    fn deterministic_sampling_grants_integer_parts() {
        let mut p = pop(&[3.0, 1.0, 0.0, 0.0]);
        Scaling::None.evaluate(&mut p, Direction::Maximize);
        let picks = Selection::Deterministic.select(&p, 200, &mut SimRng::new(4));
        assert!(picks.iter().all(|&i| i < 2));
        assert!(picks.iter().filter(|&&i| i == 0).count() > picks.iter().filter(|&&i| i == 1).count());
    }

    #[test]
    fn every_scheme_returns_valid_indices() {
        let mut p = pop(&[1.0, 4.0, 2.0, 8.0, 3.0]);
        Scaling::None.evaluate(&mut p, Direction::Maximize);
        let mut rng = SimRng::new(9);
        for s in [
            Selection::Rank,
            Selection::Roulette,
            Selection::Tournament,
            Selection::Uniform,
            Selection::StochasticRemainder,
            Selection::Deterministic,
        ] {
            let picks = s.select(&p, 17, &mut rng);
            assert_eq!(picks.len(), 17);
            assert!(picks.iter().all(|&i| i < p.len()), "{s:?}");
        }
    }
}

// ── Replacement and statistics ─────────────────────────────────────────────────

#[cfg(test)]
mod replacement_stats {
    use odr_core::SimRng;

    use crate::{Direction, DistanceKind, Individual, Replacement, Statistics};

    fn members() -> Vec<Individual<i64>> {
        vec![
            Individual::scored(vec![1, 1], 5.0),
            Individual::scored(vec![2, 2], 9.0),
            Individual::scored(vec![3, 3], 1.0),
        ]
    }

    #[test]
    fn victims() {
        let m = members();
        let mut rng = SimRng::new(0);
        let d = Direction::Maximize;
        assert_eq!(Replacement::Worst.victim(&m, &[0, 0], (0, 1), &[], d, &mut rng), 2);
        assert_eq!(Replacement::Best.victim(&m, &[0, 0], (0, 1), &[], d, &mut rng), 1);
        assert_eq!(Replacement::Parent.victim(&m, &[0, 0], (0, 1), &[], d, &mut rng), 0);
        let crowding = Replacement::Crowding { distance: DistanceKind::Positional };
        assert_eq!(crowding.victim(&m, &[2, 2], (0, 2), &[], d, &mut rng), 1);
        assert!(Replacement::Random.victim(&m, &[0, 0], (0, 1), &[], d, &mut rng) < 3);
    }

    #[test]
    fn sibling_replaces_other_parent() {
        let m = members();
        let mut rng = SimRng::new(0);
        let d = Direction::Maximize;
        let first = Replacement::Parent.victim(&m, &[0, 0], (0, 2), &[], d, &mut rng);
        assert_eq!(first, 2);
        let second = Replacement::Parent.victim(&m, &[0, 0], (0, 2), &[first], d, &mut rng);
        assert_eq!(second, 0);
    }

    #[test]
    fn statistics_keep_distinct_best() {
        let m = members();
        let refs: Vec<&Individual<i64>> = m.iter().collect();
        let mut stats = Statistics::new(Direction::Maximize, 2);
        stats.record(0, &refs, None);
        assert_eq!(stats.current().maximum, 9.0);
        assert_eq!(stats.current().minimum, 1.0);
        assert_eq!(stats.current().mean, 5.0);
        assert_eq!(stats.best_individuals().len(), 2);
        assert_eq!(stats.best_individual().unwrap().genes, vec![2, 2]);

        stats.record(1, &refs, None);
        assert_eq!(stats.best_individuals().len(), 2);
        assert_eq!(stats.convergence(1), Some(1.0));
        assert_eq!(stats.convergence(2), None);
    }

    #[test]
    fn population_convergence_is_mean_over_best() {
        let m = members();
        let refs: Vec<&Individual<i64>> = m.iter().collect();
        let mut stats = Statistics::new(Direction::Maximize, 1);
        stats.record(0, &refs, None);
        let c = stats.population_convergence().unwrap();
        assert!((c - 5.0 / 9.0).abs() < 1e-12);
    }
}

// ── Engines ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod engines {
    use std::sync::Arc;

    use odr_core::{LogLevel, MemoryLogger};

    use crate::{
        AlleleSet, Direction, GaBuilder, GaError, GaKind, GaObserver, GaParams, GenomeShape,
        NoopObserver, ReplacementScheme, Statistics, TerminationScheme,
    };

    use super::helpers::{binary_shape, ones, small_params};

    #[derive(Default)]
    struct Counter {
        starts: usize,
        generations: usize,
        finishes: usize,
    }

    impl GaObserver<i64> for Counter {
        fn on_start(&mut self, _stats: &Statistics<i64>) {
            self.starts += 1;
        }
        fn on_generation(&mut self, _stats: &Statistics<i64>) {
            self.generations += 1;
        }
        fn on_finish(&mut self, _stats: &Statistics<i64>) {
            self.finishes += 1;
        }
    }

    #[test]
    fn runs_the_configured_generations() {
        let objective = |g: &[i64]| ones(g);
        let mut ga = GaBuilder::new(binary_shape(8), &objective, small_params(5)).build().unwrap();
        let mut obs = Counter::default();
        ga.run(&mut obs).unwrap();
        assert_eq!(ga.statistics().generation(), 5);
        assert_eq!((obs.starts, obs.generations, obs.finishes), (1, 5, 1));
    }

    #[test]
    fn elitism_never_loses_the_best() {
        let objective = |g: &[i64]| ones(g);
        let mut ga = GaBuilder::new(binary_shape(16), &objective, small_params(30)).build().unwrap();
        let best = ga.run(&mut NoopObserver).unwrap();
        let history = ga.statistics().best_history();
        assert!(history.windows(2).all(|w| w[1] >= w[0]), "{history:?}");
        assert_eq!(best.score, ones(&best.genes));
        assert!(best.score >= history[0]);
    }

    #[test]
    fn single_allele_genome_scores_once_per_member() {
        let shape = GenomeShape::new(vec![AlleleSet::single(3_i64); 20]);
        let objective = |g: &[i64]| g.iter().sum::<i64>() as f64;
        let params = GaParams { population_size: 4, ..small_params(1) };
        let mut ga = GaBuilder::new(shape, &objective, params).build().unwrap();
        let best = ga.run(&mut NoopObserver).unwrap();
        assert_eq!(best.score, 60.0);
        assert_eq!(best.genes, vec![3; 20]);
        assert_eq!(ga.statistics().evaluations(), 4);
    }

    #[test]
    fn same_seed_same_result() {
        let objective = |g: &[i64]| ones(g);
        let run = || {
            let mut ga = GaBuilder::new(binary_shape(12), &objective, small_params(10)).build().unwrap();
            ga.run(&mut NoopObserver).unwrap()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn steady_state_keeps_size_and_best() {
        let objective = |g: &[i64]| ones(g);
        let params = GaParams { kind: GaKind::SteadyState, ..small_params(15) };
        let mut ga = GaBuilder::new(binary_shape(10), &objective, params).build().unwrap();
        ga.run(&mut NoopObserver).unwrap();
        assert_eq!(ga.populations()[0].len(), 12);
        let history = ga.statistics().best_history();
        assert!(history.windows(2).all(|w| w[1] >= w[0]));
    }

    #[test]
    fn incremental_replaces_in_place() {
        let objective = |g: &[i64]| ones(g);
        let params = GaParams {
            kind: GaKind::Incremental,
            replacement: ReplacementScheme::Worst,
            offspring: 1,
            ..small_params(20)
        };
        let mut ga = GaBuilder::new(binary_shape(10), &objective, params).build().unwrap();
        ga.run(&mut NoopObserver).unwrap();
        assert_eq!(ga.populations()[0].len(), 12);
        // initial population plus at most one new child per generation
        assert!(ga.statistics().evaluations() <= 12 + 20);
    }

    #[test]
    fn deme_evolves_every_population() {
        let objective = |g: &[i64]| ones(g);
        let params = GaParams { kind: GaKind::Deme, ..small_params(6) };
        let mut ga = GaBuilder::new(binary_shape(10), &objective, params).build().unwrap();
        ga.run(&mut NoopObserver).unwrap();
        assert_eq!(ga.populations().len(), 3);
        assert!(ga.populations().iter().all(|p| p.len() == 12));
        assert_eq!(ga.statistics().generation(), 6);
    }

    #[test]
    fn minimising_prefers_zeros() {
        let objective = |g: &[i64]| ones(g);
        let params = GaParams { direction: Direction::Minimize, ..small_params(20) };
        let mut ga = GaBuilder::new(binary_shape(10), &objective, params).build().unwrap();
        let best = ga.run(&mut NoopObserver).unwrap();
        assert!(best.score <= ga.statistics().best_history()[0]);
    }

    #[test]
    fn convergence_stops_early_on_flat_scores() {
        let objective = |_: &[i64]| 42.0;
        let params = GaParams {
            termination: TerminationScheme::UponConvergence,
            convergence_generations: 3,
            ..small_params(100)
        };
        let mut ga = GaBuilder::new(binary_shape(4), &objective, params).build().unwrap();
        ga.run(&mut NoopObserver).unwrap();
        assert_eq!(ga.statistics().generation(), 3);
    }

    #[test]
    fn diversity_recorded_on_request() {
        let objective = |g: &[i64]| ones(g);
        let params = GaParams { record_diversity: true, ..small_params(2) };
        let mut ga = GaBuilder::new(binary_shape(6), &objective, params).build().unwrap();
        ga.run(&mut NoopObserver).unwrap();
        let d = ga.statistics().current().diversity.unwrap();
        assert!((0.0..=1.0).contains(&d));
    }

    #[test]
    fn empty_genome_is_rejected() {
        let objective = |g: &[i64]| ones(g);
        let r = GaBuilder::new(GenomeShape::default(), &objective, small_params(1)).build();
        assert!(matches!(r, Err(GaError::EmptyGenome)));
    }

    #[test]
    fn replacement_outside_incremental_warns() {
        let objective = |g: &[i64]| ones(g);
        let log = Arc::new(MemoryLogger::new());
        let params = GaParams { replacement: ReplacementScheme::Best, ..small_params(1) };
        GaBuilder::new(binary_shape(4), &objective, params)
            .logger(log.clone())
            .build()
            .unwrap();
        assert!(log.contains(LogLevel::Warning, "non-Incremental"));
    }
}
