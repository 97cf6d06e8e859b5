//! Dense square matrix multiplication (i-k-j loop order), verified with
//! Freivalds' algorithm.

use super::{WorkloadOutcome, seeded_rng, try_filled, try_with_capacity};
use crate::error::{BenchError, BenchResult};
use crate::metrics::MetricsBuilder;
use crate::params::BenchmarkParams;
use rand::Rng;

const NAME: &str = "matrix_multiplication";
const SEED: u64 = 0x4d41_5452;
const FREIVALDS_ROUNDS: usize = 2;

/// Row-major n×n matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    n: usize,
    data: Vec<f64>,
}

impl Matrix {
    fn zeroed(n: usize) -> BenchResult<Self> {
        let len = checked_square(n)?;
        Ok(Self {
            n,
            data: try_filled(NAME, len, 0.0)?,
        })
    }

    fn random(n: usize, rng: &mut impl Rng) -> BenchResult<Self> {
        let len = checked_square(n)?;
        let mut data = try_with_capacity(NAME, len)?;
        data.extend((0..len).map(|_| rng.random_range(-1.0..1.0)));
        Ok(Self { n, data })
    }

    fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.n..(i + 1) * self.n]
    }

    pub fn multiply(&self, other: &Matrix) -> BenchResult<Matrix> {
        let n = self.n;
        let mut out = Matrix::zeroed(n)?;
        for i in 0..n {
            let a_row = self.row(i);
            let out_row = &mut out.data[i * n..(i + 1) * n];
            for (k, &a) in a_row.iter().enumerate() {
                let b_row = other.row(k);
                for (o, &b) in out_row.iter_mut().zip(b_row) {
                    *o += a * b;
                }
            }
        }
        Ok(out)
    }

    fn mul_vec(&self, v: &[f64]) -> Vec<f64> {
        (0..self.n)
            .map(|i| self.row(i).iter().zip(v).map(|(a, b)| a * b).sum())
            .collect()
    }

    fn checksum(&self) -> f64 {
        self.data.iter().sum()
    }
}

fn checked_square(n: usize) -> BenchResult<usize> {
    n.checked_mul(n)
        .ok_or_else(|| BenchError::fault(NAME, format!("matrix size {} overflows", n)))
}

pub fn run(params: &BenchmarkParams) -> BenchResult<WorkloadOutcome> {
    let n = params.matrix_size;
    let mut rng = seeded_rng(SEED);
    let a = Matrix::random(n, &mut rng)?;
    let b = Matrix::random(n, &mut rng)?;

    let c = a.multiply(&b)?;
    let is_valid = freivalds_check(&a, &b, &c, &mut rng);

    let metrics = MetricsBuilder::new()
        .with("matrix_size", n)
        .with("checksum", c.checksum())
        .build();

    let n = n as u64;
    Ok(WorkloadOutcome {
        operations: 2u64.saturating_mul(n).saturating_mul(n).saturating_mul(n),
        is_valid,
        metrics,
    })
}

/// Probabilistic check that `c == a * b`: compare A(Br) with Cr for random r.
fn freivalds_check(a: &Matrix, b: &Matrix, c: &Matrix, rng: &mut impl Rng) -> bool {
    let n = a.n;
    let tolerance = 1e-9 * n.max(1) as f64;

    (0..FREIVALDS_ROUNDS).all(|_| {
        let r: Vec<f64> = (0..n).map(|_| rng.random_range(-1.0..1.0)).collect();
        let expected = a.mul_vec(&b.mul_vec(&r));
        let actual = c.mul_vec(&r);
        expected
            .iter()
            .zip(&actual)
            .all(|(e, x)| x.is_finite() && (e - x).abs() <= tolerance * (1.0 + e.abs()))
    })
}
