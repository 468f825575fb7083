use crate::C64;

/// Probability of each basis state.
pub fn probabilities(psi: &[C64]) -> Vec<f64> {
    psi.iter().map(|a| a.norm_sqr()).collect()
}

pub fn norm(psi: &[C64]) -> f64 {
    psi.iter().map(|a| a.norm_sqr()).sum::<f64>().sqrt()
}

/// Expectation value ⟨s_q⟩ of spin `q` (`+1` for bit 1).
pub fn expect_spin(psi: &[C64], q: usize) -> f64 {
    psi.iter()
        .enumerate()
        .map(|(z, a)| if (z >> q) & 1 == 1 { a.norm_sqr() } else { -a.norm_sqr() })
        .sum()
}

/// ⟨s_i s_j⟩ for any pair of spins.
pub fn expect_spin_pair(psi: &[C64], i: usize, j: usize) -> f64 {
    psi.iter()
        .enumerate()
        .map(|(z, a)| {
            let same = ((z >> i) & 1) == ((z >> j) & 1);
            if same {
                a.norm_sqr()
            } else {
                -a.norm_sqr()
            }
        })
        .sum()
}

/// ⟨ψ|H_P|ψ⟩ for a diagonal Hamiltonian.
pub fn expect_diagonal(psi: &[C64], diagonal: &[f64]) -> f64 {
    psi.iter().zip(diagonal).map(|(a, e)| a.norm_sqr() * e).sum()
}

/// Most probable basis index; lowest index on ties.
pub fn most_probable(psi: &[C64]) -> usize {
    let mut best = 0;
    let mut best_p = f64::NEG_INFINITY;
    for (z, a) in psi.iter().enumerate() {
        let p = a.norm_sqr();
        if p > best_p {
            best = z;
            best_p = p;
        }
    }
    best
}
