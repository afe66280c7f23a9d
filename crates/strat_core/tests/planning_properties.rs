use strat_core::test_fixtures::{base_content, france_strategy};
use strat_core::{
    analyze_strategy, compute_lap_fuel, compute_race_fuel, compute_stint_fuel,
    compute_tyre_wear, generate_strategies, optimize_strategy, BoostLevel, Compound,
    PlannerContent, StrategyConstraints,
};

#[test]
fn test_remaining_never_increases_with_laps() {
    let content = base_content();
    for circuit in content.iter_circuits() {
        for compound in Compound::ALL {
            let mut previous = 100.0;
            for laps in 1..=circuit.laps {
                let result =
                    compute_tyre_wear(&content, &circuit.code.0, compound, laps, 60.0).unwrap();
                assert!(result.remaining <= previous, "{} {compound} lap {laps}", circuit.code);
                assert!(result.remaining > 0.0 && result.remaining <= 100.0);
                previous = result.remaining;
            }
        }
    }
}

#[test]
fn test_harder_compounds_wear_less() {
    let content = base_content();
    for circuit in content.iter_circuits() {
        let remaining: Vec<f64> = [
            Compound::SuperSoft,
            Compound::Medium,
            Compound::Hard,
        ]
        .into_iter()
        .map(|compound| {
            compute_tyre_wear(&content, &circuit.code.0, compound, 10, 50.0)
                .unwrap()
                .remaining
        })
        .collect();
        assert!(remaining[0] < remaining[1] && remaining[1] < remaining[2]);
    }
}

#[test]
fn test_more_fuel_points_burn_less_per_lap() {
    let content = base_content();
    let mut previous = f64::INFINITY;
    for points in [1.0, 10.0, 50.0, 100.0, 150.0, 200.0] {
        let lap = compute_lap_fuel(&content, "italy", points).unwrap();
        assert!(lap < previous, "points {points}");
        previous = lap;
    }
}

#[test]
fn test_race_fuel_equals_neutral_stint_over_race_distance() {
    let content = base_content();
    for circuit in content.iter_circuits() {
        let race = compute_race_fuel(&content, &circuit.code.0, 65.0).unwrap();
        let stint =
            compute_stint_fuel(&content, &circuit.code.0, 65.0, circuit.laps, BoostLevel::Neutral)
                .unwrap();
        assert!((race.fuel - stint.total_fuel).abs() < 1e-9);
    }
}

#[test]
fn test_generated_candidates_cover_requested_laps() {
    let content = base_content();
    let constraints = StrategyConstraints {
        max_stints: 5,
        preferred_compounds: Compound::ALL.to_vec(),
        min_stint_length: 2,
        max_stint_length: None,
    };
    for circuit in content.iter_circuits() {
        for candidate in
            generate_strategies(&content, &circuit.code.0, circuit.laps, 70.0, 70.0, &constraints)
        {
            assert_eq!(candidate.total_laps(), circuit.laps);
            assert!(candidate.stints.len() <= 5);
            let positions: Vec<u32> = candidate.stints.iter().map(|s| s.position).collect();
            let expected: Vec<u32> = (1..=u32::try_from(candidate.stints.len()).unwrap()).collect();
            assert_eq!(positions, expected);
        }
    }
}

#[test]
fn test_recommended_outscores_alternatives() {
    let content = base_content();
    let constraints = StrategyConstraints {
        max_stints: 4,
        preferred_compounds: vec![Compound::Medium, Compound::Hard, Compound::Soft],
        min_stint_length: 3,
        max_stint_length: Some(30),
    };
    for circuit in content.iter_circuits() {
        let result =
            optimize_strategy(&content, &circuit.code.0, circuit.laps, 80.0, 80.0, &constraints)
                .unwrap();
        let best = result.recommended.unwrap();
        assert!(result.alternatives.len() <= 4);
        assert!(result.alternatives.iter().all(|alt| alt.score <= best.score));
        assert!(result
            .alternatives
            .windows(2)
            .all(|pair| pair[0].score >= pair[1].score));
    }
}

#[test]
fn test_optimization_is_deterministic() {
    let content = base_content();
    let constraints = StrategyConstraints::default();
    let first = optimize_strategy(&content, "monaco", 29, 55.0, 90.0, &constraints).unwrap();
    let second = optimize_strategy(&content, "monaco", 29, 55.0, 90.0, &constraints).unwrap();
    assert_eq!(first, second);
}

type Operation<'a> = Box<dyn Fn(&PlannerContent) -> String + 'a>;

#[test]
fn test_pure_operations_are_idempotent() {
    let content = base_content();
    let strategy = france_strategy(&[(Compound::Soft, 12), (Compound::Hard, 12)]);
    let constraints = StrategyConstraints::default();
    let operations: Vec<(&str, Operation)> = vec![
        (
            "compute_tyre_wear",
            Box::new(|c| format!("{:?}", compute_tyre_wear(c, "france", Compound::Medium, 6, 49.0))),
        ),
        (
            "compute_race_fuel",
            Box::new(|c| format!("{:?}", compute_race_fuel(c, "monaco", 100.0))),
        ),
        (
            "compute_stint_fuel",
            Box::new(|c| {
                format!(
                    "{:?}",
                    compute_stint_fuel(c, "italy", 70.0, 9, BoostLevel::VeryHigh)
                )
            }),
        ),
        (
            "generate_strategies",
            Box::new(|c| {
                let candidates: Vec<_> =
                    generate_strategies(c, "monaco", 29, 55.0, 90.0, &constraints).collect();
                format!("{candidates:?}")
            }),
        ),
        (
            "analyze_strategy",
            Box::new(|c| format!("{:?}", analyze_strategy(c, &strategy, "france"))),
        ),
    ];
    for (name, operation) in &operations {
        let first = operation(&content);
        let second = operation(&content);
        assert!(!first.contains("Err"), "{name} failed: {first}");
        assert_eq!(first, second, "{name} is not idempotent");
    }
}

#[test]
fn test_unknown_boost_is_neutral_everywhere() {
    let content = base_content();
    for circuit in content.iter_circuits() {
        let neutral =
            compute_stint_fuel(&content, &circuit.code.0, 30.0, 6, BoostLevel::Neutral).unwrap();
        let unknown = compute_stint_fuel(
            &content,
            &circuit.code.0,
            30.0,
            6,
            BoostLevel::from_key("overdrive"),
        )
        .unwrap();
        assert_eq!(neutral, unknown);
    }
}
