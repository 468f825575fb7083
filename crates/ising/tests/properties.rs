//! Randomized invariants of the QUBO → Ising substitution.

use ising::{Qubo, SpinConfiguration};
use proptest::prelude::*;

fn arb_qubo() -> impl Strategy<Value = Qubo> {
    (1usize..=6).prop_flat_map(|n| {
        (
            Just(n),
            prop::collection::vec(-10.0f64..10.0, n * n),
            -5.0f64..5.0,
        )
            .prop_map(|(n, entries, constant)| {
                let mut q = Qubo::new(n);
                for i in 0..n {
                    for j in i..n {
                        q.add(i, j, entries[i * n + j]);
                    }
                }
                q.add_constant(constant);
                q
            })
    })
}

proptest! {
    #[test]
    fn coupling_matrix_is_symmetric_with_zero_diagonal(q in arb_qubo()) {
        let model = q.to_ising();
        let n = model.num_spins();
        for i in 0..n {
            prop_assert_eq!(model.coupling(i, i), 0.0);
            for j in 0..n {
                prop_assert_eq!(model.coupling(i, j), model.coupling(j, i));
            }
        }
    }

    #[test]
    fn energies_agree_on_every_configuration(q in arb_qubo()) {
        let model = q.to_ising();
        let n = model.num_spins();
        for index in 0..(1usize << n) {
            let c = SpinConfiguration::from_basis_index(index, n);
            let diff = (q.evaluate(&c.bits()) - model.energy(&c).unwrap()).abs();
            prop_assert!(diff < 1e-9, "index {} differs by {}", index, diff);
        }
    }

    #[test]
    fn flip_delta_is_exact(q in arb_qubo(), index in 0usize..64, site in 0usize..6) {
        let model = q.to_ising();
        let n = model.num_spins();
        let c = SpinConfiguration::from_basis_index(index % (1 << n), n);
        let site = site % n;
        let flipped = c.with_flipped(site);
        let direct = model.energy_of(flipped.spins()) - model.energy_of(c.spins());
        prop_assert!((model.flip_delta(c.spins(), site) - direct).abs() < 1e-9);
    }
}
