use alloc::vec;
use alloc::vec::Vec;

use crate::linalg::bidiagonal::{accumulate_left, accumulate_right, householder_bidiagonalize};
use crate::linalg::diagonalize::diagonalize;
use crate::linalg::reorder::{normalize_signs, sort_descending};
use crate::linalg::Convergence;
use crate::matrix::Matrix;
use crate::traits::FloatScalar;

/// Iteration budget per singular value in the diagonalization phase.
const MAX_SWEEPS: usize = 30;

// ── Working buffers ─────────────────────────────────────────────────

/// All mutable state of one decomposition, created at the start of a
/// `decompose` call and consumed when it returns. Nothing in here is
/// shared across calls, so concurrent decompositions of independent
/// matrices need no synchronization.
struct SvdBuffers<T> {
    /// M×N working copy of A; ends up holding U.
    u: Matrix<T>,
    /// N×N; ends up holding V.
    v: Matrix<T>,
    /// Length N; ends up holding the singular values.
    diag: Vec<T>,
    /// Length N; Householder superdiagonal residue, zeroed by the QR phase.
    superdiag: Vec<T>,
    /// Length M column scratch for the reorder pass.
    su: Vec<T>,
    /// Length N column scratch for the reorder pass.
    sv: Vec<T>,
}

impl<T: FloatScalar> SvdBuffers<T> {
    fn new(a: &Matrix<T>) -> Self {
        let m = a.nrows();
        let n = a.ncols();
        Self {
            u: a.clone(),
            v: Matrix::zeros(n, n, T::zero()),
            diag: vec![T::zero(); n],
            superdiag: vec![T::zero(); n],
            su: vec![T::zero(); m],
            sv: vec![T::zero(); n],
        }
    }
}

// ── Rank estimation ─────────────────────────────────────────────────

/// Numeric-rank policy for [`Svd::rank_with`].
///
/// [`Svd::decompose`] stores the rank computed under `FixedDecimal`;
/// `Relative` is the general-purpose alternative for callers that prefer
/// a scale-aware threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RankTolerance<T> {
    /// Count singular values still positive after rounding to four
    /// decimal places. Absolute, not scale-aware: matrices whose
    /// significant values are all below 5·10⁻⁵ report rank 0.
    FixedDecimal,
    /// Count singular values above `factor · ε · max(m, n) · σ_max`.
    /// `factor = 1` is the customary choice.
    Relative {
        /// Multiplier on the `ε · max(m, n) · σ_max` base threshold.
        factor: T,
    },
}

impl<T> Default for RankTolerance<T> {
    fn default() -> Self {
        RankTolerance::FixedDecimal
    }
}

fn rank_fixed_decimal<T: FloatScalar>(values: &[T]) -> usize {
    let scale = T::from(1.0e4).unwrap();
    values
        .iter()
        .filter(|&&w| (w * scale).round() > T::zero())
        .count()
}

fn rank_relative<T: FloatScalar>(values: &[T], m: usize, n: usize, factor: T) -> usize {
    let sigma_max = values.first().copied().unwrap_or_else(T::zero);
    let dim = T::from(m.max(n)).unwrap();
    let tol = factor * T::epsilon() * dim * sigma_max;
    values.iter().filter(|&&w| w > tol).count()
}

// ── Svd ─────────────────────────────────────────────────────────────

/// Singular value decomposition `A = U · S · Vᵀ` of a real M×N matrix.
///
/// Owns thin `U` (M×N), diagonal `S` (N×N), `V` (N×N), the singular
/// values (descending, non-negative), the numeric rank, and the
/// convergence status of the iteration. Immutable after construction.
///
/// Accuracy is specified for M ≥ N; for wide matrices decompose the
/// transpose and swap the roles of U and V.
///
/// # Example
///
/// ```
/// use singular::{Matrix, Svd};
///
/// let a = Matrix::from_rows(2, 2, &[4.0_f64, 0.0, 3.0, -5.0]);
/// let svd = Svd::decompose(&a);
///
/// assert!((svd.singular_values()[0] - 40.0_f64.sqrt()).abs() < 1e-10);
/// assert!((svd.singular_values()[1] - 10.0_f64.sqrt()).abs() < 1e-10);
/// assert_eq!(svd.rank(), 2);
///
/// let back = svd.compose();
/// assert!((&a - &back).norm_l1() < 1e-10);
/// ```
#[derive(Debug, Clone)]
pub struct Svd<T> {
    u: Matrix<T>,
    s: Matrix<T>,
    v: Matrix<T>,
    singular_values: Vec<T>,
    rank: usize,
    convergence: Convergence,
}

impl<T: FloatScalar> Svd<T> {
    /// Decompose a matrix.
    ///
    /// Runs Householder bidiagonalization, transform accumulation,
    /// implicit-shift QR diagonalization, descending reorder with sign
    /// normalization, and rank estimation. Never fails on finite input:
    /// a singular value that does not converge within the iteration
    /// budget is kept at its best approximation and reported through
    /// [`Svd::convergence`].
    ///
    /// Panics if `a` has zero rows or columns.
    pub fn decompose(a: &Matrix<T>) -> Self {
        let m = a.nrows();
        let n = a.ncols();
        assert!(
            m >= 1 && n >= 1,
            "SVD requires at least one row and one column"
        );

        let mut buf = SvdBuffers::new(a);

        let anorm = householder_bidiagonalize(&mut buf.u, &mut buf.diag, &mut buf.superdiag);
        accumulate_right(&buf.u, &mut buf.v, &buf.superdiag);
        accumulate_left(&mut buf.u, &buf.diag);

        let stalled = diagonalize(
            &mut buf.diag,
            &mut buf.superdiag,
            anorm,
            &mut buf.u,
            &mut buf.v,
            true,
            true,
            MAX_SWEEPS,
        );

        sort_descending(&mut buf.diag, &mut buf.u, &mut buf.v, &mut buf.su, &mut buf.sv);
        normalize_signs(&mut buf.u, &mut buf.v);

        let rank = rank_fixed_decimal(&buf.diag);

        let mut s = Matrix::zeros(n, n, T::zero());
        for (i, &w) in buf.diag.iter().enumerate() {
            s[(i, i)] = w;
        }

        Svd {
            u: buf.u,
            s,
            v: buf.v,
            singular_values: buf.diag,
            rank,
            convergence: if stalled == 0 {
                Convergence::Converged
            } else {
                Convergence::IterationLimit { values: stalled }
            },
        }
    }

    /// Compute only the singular values (descending), skipping the U/V
    /// accumulation and rotation updates.
    ///
    /// ```
    /// use singular::{Matrix, Svd};
    ///
    /// let a = Matrix::from_rows(2, 2, &[3.0_f64, 0.0, 0.0, 4.0]);
    /// let sv = Svd::singular_values_only(&a);
    /// assert!((sv[0] - 4.0).abs() < 1e-10);
    /// assert!((sv[1] - 3.0).abs() < 1e-10);
    /// ```
    pub fn singular_values_only(a: &Matrix<T>) -> Vec<T> {
        let m = a.nrows();
        let n = a.ncols();
        assert!(
            m >= 1 && n >= 1,
            "SVD requires at least one row and one column"
        );

        let mut buf = SvdBuffers::new(a);
        let anorm = householder_bidiagonalize(&mut buf.u, &mut buf.diag, &mut buf.superdiag);
        diagonalize(
            &mut buf.diag,
            &mut buf.superdiag,
            anorm,
            &mut buf.u,
            &mut buf.v,
            false,
            false,
            MAX_SWEEPS,
        );

        let mut values = buf.diag;
        for i in 0..values.len() {
            let mut max_idx = i;
            for j in (i + 1)..values.len() {
                if values[j] > values[max_idx] {
                    max_idx = j;
                }
            }
            if max_idx != i {
                values.swap(i, max_idx);
            }
        }
        values
    }

    /// The left singular vectors U (M×N, orthonormal columns).
    #[inline]
    pub fn u(&self) -> &Matrix<T> {
        &self.u
    }

    /// The diagonal matrix S (N×N) of singular values.
    #[inline]
    pub fn s(&self) -> &Matrix<T> {
        &self.s
    }

    /// The right singular vectors V (N×N, orthonormal columns).
    #[inline]
    pub fn v(&self) -> &Matrix<T> {
        &self.v
    }

    /// The singular values, sorted descending.
    #[inline]
    pub fn singular_values(&self) -> &[T] {
        &self.singular_values
    }

    /// Numeric rank under the fixed-decimal policy (see
    /// [`RankTolerance::FixedDecimal`]).
    #[inline]
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// Recompute the numeric rank under a chosen tolerance policy.
    ///
    /// ```
    /// use singular::{Matrix, RankTolerance, Svd};
    ///
    /// let a = Matrix::from_rows(2, 2, &[1.0_f64, 2.0, 2.0, 4.0]);
    /// let svd = Svd::decompose(&a);
    /// assert_eq!(svd.rank(), 1);
    /// assert_eq!(svd.rank_with(RankTolerance::Relative { factor: 1.0 }), 1);
    /// ```
    pub fn rank_with(&self, tol: RankTolerance<T>) -> usize {
        match tol {
            RankTolerance::FixedDecimal => rank_fixed_decimal(&self.singular_values),
            RankTolerance::Relative { factor } => rank_relative(
                &self.singular_values,
                self.u.nrows(),
                self.v.nrows(),
                factor,
            ),
        }
    }

    /// Convergence status of the diagonalization iteration.
    #[inline]
    pub fn convergence(&self) -> Convergence {
        self.convergence
    }

    /// Reconstruct `U · S · Vᵀ`, an approximation of the decomposed
    /// matrix (exact up to numerical error for converged input).
    pub fn compose(&self) -> Matrix<T> {
        self.u.matmul(&self.s).matmul(&self.v.transpose())
    }

    /// Condition number σ_max / σ_min.
    ///
    /// Returns infinity if the smallest singular value is zero.
    pub fn condition_number(&self) -> T {
        if self.singular_values.is_empty() {
            return T::one();
        }
        let s_max = self.singular_values[0];
        let s_min = self.singular_values[self.singular_values.len() - 1];
        if s_min == T::zero() {
            T::infinity()
        } else {
            s_max / s_min
        }
    }
}

// ── Convenience methods on Matrix ───────────────────────────────────

impl<T: FloatScalar> Matrix<T> {
    /// Singular value decomposition.
    ///
    /// ```
    /// use singular::Matrix;
    ///
    /// let a = Matrix::from_rows(3, 2, &[1.0_f64, 0.0, 0.0, 1.0, 0.0, 0.0]);
    /// let svd = a.svd();
    /// assert!((svd.singular_values()[0] - 1.0).abs() < 1e-10);
    /// assert!((svd.singular_values()[1] - 1.0).abs() < 1e-10);
    /// ```
    pub fn svd(&self) -> Svd<T> {
        Svd::decompose(self)
    }

    /// Singular values only (no U/V computation).
    ///
    /// ```
    /// use singular::Matrix;
    ///
    /// let a = Matrix::from_rows(2, 2, &[3.0_f64, 0.0, 0.0, 4.0]);
    /// let sv = a.singular_values_only();
    /// assert!((sv[0] - 4.0).abs() < 1e-10);
    /// ```
    pub fn singular_values_only(&self) -> Vec<T> {
        Svd::singular_values_only(self)
    }
}
