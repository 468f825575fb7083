//! Dense Kronecker-product construction of `H(s)`.
//!
//! Builds the same operator as [`AdiabaticHamiltonian::dense`] term by term
//! from single-spin matrices. Far slower; used to check the index-based
//! construction and its qubit ordering.
//!
//! [`AdiabaticHamiltonian::dense`]: crate::AdiabaticHamiltonian::dense

use faer::Mat;
use ising::IsingModel;

pub type Op2 = [[f64; 2]; 2];

pub fn identity() -> Op2 {
    [[1.0, 0.0], [0.0, 1.0]]
}

pub fn pauli_x() -> Op2 {
    [[0.0, 1.0], [1.0, 0.0]]
}

/// Spin operator with eigenvalue `-1` on `|0⟩` and `+1` on `|1⟩`.
pub fn spin_z() -> Op2 {
    [[-1.0, 0.0], [0.0, 1.0]]
}

fn to_mat(op: Op2) -> Mat<f64> {
    Mat::from_fn(2, 2, |i, j| op[i][j])
}

pub fn kron(a: &Mat<f64>, b: &Mat<f64>) -> Mat<f64> {
    let (br, bc) = (b.nrows(), b.ncols());
    Mat::from_fn(a.nrows() * br, a.ncols() * bc, |i, j| {
        a.read(i / br, j / bc) * b.read(i % br, j % bc)
    })
}

/// `op` acting on spin `site` of an `n`-spin register. Spin `q` is bit `q`
/// of the basis index, so spin 0 is the rightmost factor.
pub fn embed(op: Op2, site: usize, n: usize) -> Mat<f64> {
    let mut out = Mat::from_fn(1, 1, |_, _| 1.0);
    for q in (0..n).rev() {
        let factor = if q == site { op } else { identity() };
        out = kron(&out, &to_mat(factor));
    }
    out
}

fn add_scaled(acc: &mut Mat<f64>, term: &Mat<f64>, c: f64) {
    for i in 0..acc.nrows() {
        for j in 0..acc.ncols() {
            acc.write(i, j, acc.read(i, j) + c * term.read(i, j));
        }
    }
}

/// `(1 - s)(-Σ g_q X_q) + s (offset + Σ h_i Z_i + Σ_{i<j} J_ij Z_i Z_j)`.
pub fn tensor_hamiltonian(model: &IsingModel, mixer: &[f64], s: f64) -> Mat<f64> {
    let n = model.num_spins();
    let dim = 1usize << n;
    let mut h = Mat::<f64>::zeros(dim, dim);

    for i in 0..dim {
        h.write(i, i, s * model.offset());
    }
    for q in 0..n {
        add_scaled(&mut h, &embed(pauli_x(), q, n), -(1.0 - s) * mixer[q]);
        add_scaled(&mut h, &embed(spin_z(), q, n), s * model.fields()[q]);
    }
    for i in 0..n {
        for j in (i + 1)..n {
            let jij = model.coupling(i, j);
            if jij != 0.0 {
                let zz = &embed(spin_z(), i, n) * &embed(spin_z(), j, n);
                add_scaled(&mut h, &zz, s * jij);
            }
        }
    }
    h
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embed_orders_spin_zero_as_low_bit() {
        let z0 = embed(spin_z(), 0, 2);
        // basis index 1 = spin 0 up, spin 1 down
        assert_eq!(z0.read(1, 1), 1.0);
        assert_eq!(z0.read(2, 2), -1.0);

        let x1 = embed(pauli_x(), 1, 2);
        assert_eq!(x1.read(0, 2), 1.0);
        assert_eq!(x1.read(0, 1), 0.0);
    }
}
