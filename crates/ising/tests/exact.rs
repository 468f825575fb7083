use ising::{exact_ground_states, IsingError, IsingModel, SpinConfiguration};

#[test]
fn ferromagnetic_pair_has_two_ground_states() {
    let model = IsingModel::new(vec![0.0, 0.0], vec![vec![0.0, -1.0], vec![-1.0, 0.0]], 0.0).unwrap();

    let sol = exact_ground_states(&model, 10, 1e-12).unwrap();

    assert!((sol.energy + 1.0).abs() < 1e-12);
    assert!(sol.is_degenerate());
    assert_eq!(sol.ground_states.len(), 2);
    assert!(sol.contains(&SpinConfiguration::new(vec![-1, -1]).unwrap()));
    assert!(sol.contains(&SpinConfiguration::new(vec![1, 1]).unwrap()));
    assert_eq!(sol.states_evaluated, 4);
}

#[test]
fn field_selects_unique_ground_state() {
    let model = IsingModel::fields_only(vec![1.0, -2.0, 0.5]).unwrap();

    let sol = exact_ground_states(&model, 10, 1e-12).unwrap();

    assert!(!sol.is_degenerate());
    assert_eq!(sol.ground_states[0].spins(), &[-1, 1, -1]);
    assert!((sol.energy + 3.5).abs() < 1e-12);
}

#[test]
fn enumeration_limit_is_enforced() {
    let model = IsingModel::fields_only(vec![0.0; 6]).unwrap();
    let err = exact_ground_states(&model, 5, 1e-12).unwrap_err();
    assert!(matches!(err, IsingError::TooManySpins { spins: 6, limit: 5 }));
}
