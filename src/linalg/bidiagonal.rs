use crate::linalg::numeric::same_sign;
use crate::traits::{FloatScalar, MatrixMut, MatrixRef};

// ── Householder reduction to bidiagonal form ────────────────────────

/// Reduce an M×N matrix to upper bidiagonal form via Householder
/// reflections applied alternately from the left (columns) and the
/// right (rows).
///
/// On return:
/// - `diag[0..n]` contains the bidiagonal diagonal
/// - `superdiag[i]` contains the superdiagonal entry of row `i - 1`
///   (`superdiag[0]` is always zero)
/// - `u` holds the reflector vectors packed into the transformed matrix,
///   ready for [`accumulate_right`] / [`accumulate_left`]
///
/// Returns `anorm`, the running maximum of `|diag[i]| + |superdiag[i]|`,
/// used as the convergence reference scale by the diagonalization.
///
/// A column or row whose absolute-value sum is exactly zero is skipped
/// (the reflection is the identity); this keeps every division in the
/// reduction well defined.
pub(crate) fn householder_bidiagonalize<T: FloatScalar>(
    u: &mut impl MatrixMut<T>,
    diag: &mut [T],
    superdiag: &mut [T],
) -> T {
    let m = u.nrows();
    let n = u.ncols();
    debug_assert!(diag.len() >= n);
    debug_assert!(superdiag.len() >= n);

    let mut g = T::zero();
    let mut scale = T::zero();
    let mut anorm = T::zero();

    for i in 0..n {
        let l = i + 2;
        superdiag[i] = scale * g;
        g = T::zero();
        scale = T::zero();

        // Column reflection: zero U[i+1.., i] below the diagonal.
        if i < m {
            for k in i..m {
                scale = scale + u.get(k, i).abs();
            }
            if scale != T::zero() {
                let mut s = T::zero();
                for k in i..m {
                    let x = *u.get(k, i) / scale;
                    *u.get_mut(k, i) = x;
                    s = s + x * x;
                }
                let f = *u.get(i, i);
                // Pivot sign chosen opposite to f to avoid cancellation
                g = -same_sign(s.sqrt(), f);
                let h = f * g - s; // strictly negative when scale != 0
                *u.get_mut(i, i) = f - g;
                for j in (l - 1)..n {
                    let mut s = T::zero();
                    for k in i..m {
                        s = s + *u.get(k, i) * *u.get(k, j);
                    }
                    let f = s / h;
                    for k in i..m {
                        let x = *u.get(k, i);
                        *u.get_mut(k, j) = *u.get(k, j) + f * x;
                    }
                }
                for k in i..m {
                    *u.get_mut(k, i) = *u.get(k, i) * scale;
                }
            }
        }
        diag[i] = scale * g;

        g = T::zero();
        scale = T::zero();

        // Row reflection: zero U[i, i+2..] right of the superdiagonal.
        if i < m && i + 1 != n {
            for k in (l - 1)..n {
                scale = scale + u.get(i, k).abs();
            }
            if scale != T::zero() {
                let mut s = T::zero();
                for k in (l - 1)..n {
                    let x = *u.get(i, k) / scale;
                    *u.get_mut(i, k) = x;
                    s = s + x * x;
                }
                let f = *u.get(i, l - 1);
                g = -same_sign(s.sqrt(), f);
                let h = f * g - s;
                *u.get_mut(i, l - 1) = f - g;
                // superdiag[l-1..] doubles as scratch for the scaled row
                // vector; every cell written here is overwritten again at
                // the top of a later pass before it is read as output.
                for k in (l - 1)..n {
                    superdiag[k] = *u.get(i, k) / h;
                }
                for j in (l - 1)..m {
                    let mut s = T::zero();
                    for k in (l - 1)..n {
                        s = s + *u.get(j, k) * *u.get(i, k);
                    }
                    for k in (l - 1)..n {
                        let x = superdiag[k];
                        *u.get_mut(j, k) = *u.get(j, k) + s * x;
                    }
                }
                for k in (l - 1)..n {
                    *u.get_mut(i, k) = *u.get(i, k) * scale;
                }
            }
        }
        anorm = anorm.max(diag[i].abs() + superdiag[i].abs());
    }
    anorm
}

// ── Accumulation of the right-hand transformations ──────────────────

/// Build the explicit orthogonal V (N×N) from the row reflectors packed
/// in `u` by [`householder_bidiagonalize`], walking i = n−1 down to 0.
///
/// `superdiag` must still hold the reduction's output. Divisions are
/// guarded on the stored pivot; a zero pivot means the reflection at
/// that index was the identity and its application is skipped.
pub(crate) fn accumulate_right<T: FloatScalar>(
    u: &impl MatrixRef<T>,
    v: &mut impl MatrixMut<T>,
    superdiag: &[T],
) {
    let n = u.ncols();
    let mut g = T::zero();
    let mut l = 0usize;

    for i in (0..n).rev() {
        if i < n - 1 {
            if g != T::zero() && *u.get(i, l) != T::zero() {
                for j in l..n {
                    // Double division avoids underflow in the product
                    *v.get_mut(j, i) = (*u.get(i, j) / *u.get(i, l)) / g;
                }
                for j in l..n {
                    let mut s = T::zero();
                    for k in l..n {
                        s = s + *u.get(i, k) * *v.get(k, j);
                    }
                    for k in l..n {
                        let x = *v.get(k, i);
                        *v.get_mut(k, j) = *v.get(k, j) + s * x;
                    }
                }
            }
            for j in l..n {
                *v.get_mut(i, j) = T::zero();
                *v.get_mut(j, i) = T::zero();
            }
        }
        *v.get_mut(i, i) = T::one();
        g = superdiag[i];
        l = i;
    }
}

// ── Accumulation of the left-hand transformations ───────────────────

/// Overwrite `u` (M×N) with the explicit thin left transform, walking
/// i = min(m,n)−1 down to 0 over the column reflectors packed in place.
///
/// `diag` must still hold the reduction's output. A zero `diag[i]`
/// means the column reflection at index i was the identity; that column
/// is zeroed and only its diagonal 1 survives. The interior division by
/// the stored pivot is guarded the same way.
pub(crate) fn accumulate_left<T: FloatScalar>(u: &mut impl MatrixMut<T>, diag: &[T]) {
    let m = u.nrows();
    let n = u.ncols();

    for i in (0..m.min(n)).rev() {
        let l = i + 1;
        let g = diag[i];
        for j in l..n {
            *u.get_mut(i, j) = T::zero();
        }
        if g != T::zero() {
            let g_inv = T::one() / g;
            for j in l..n {
                let mut s = T::zero();
                for k in l..m {
                    s = s + *u.get(k, i) * *u.get(k, j);
                }
                let pivot = *u.get(i, i);
                if pivot != T::zero() {
                    let f = (s / pivot) * g_inv;
                    for k in i..m {
                        let x = *u.get(k, i);
                        *u.get_mut(k, j) = *u.get(k, j) + f * x;
                    }
                }
            }
            for j in i..m {
                *u.get_mut(j, i) = *u.get(j, i) * g_inv;
            }
        } else {
            for j in i..m {
                *u.get_mut(j, i) = T::zero();
            }
        }
        *u.get_mut(i, i) = *u.get(i, i) + T::one();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Matrix;
    use alloc::vec;

    /// Reassemble U · B · Vᵀ from the phase outputs and compare to A.
    fn assert_bidiag_factors(a: &Matrix<f64>) {
        let m = a.nrows();
        let n = a.ncols();

        let mut u = a.clone();
        let mut v = Matrix::zeros(n, n, 0.0);
        let mut diag = vec![0.0; n];
        let mut superdiag = vec![0.0; n];

        let anorm = householder_bidiagonalize(&mut u, &mut diag, &mut superdiag);
        accumulate_right(&u, &mut v, &superdiag);
        accumulate_left(&mut u, &diag);

        assert!(anorm > 0.0);
        assert_eq!(superdiag[0], 0.0);

        // B is upper bidiagonal: diag[i] at (i, i), superdiag[i] at (i-1, i)
        let mut b = Matrix::zeros(n, n, 0.0);
        for i in 0..n {
            b[(i, i)] = diag[i];
            if i > 0 {
                b[(i - 1, i)] = superdiag[i];
            }
        }

        let back = u.matmul(&b).matmul(&v.transpose());
        for i in 0..m {
            for j in 0..n {
                assert!(
                    (back[(i, j)] - a[(i, j)]).abs() < 1e-10,
                    "UBV^T[({},{})] = {}, expected {}",
                    i,
                    j,
                    back[(i, j)],
                    a[(i, j)]
                );
            }
        }

        // Accumulated transforms have orthonormal columns
        let utu = u.transpose().matmul(&u);
        let vtv = v.transpose().matmul(&v);
        for i in 0..n {
            for j in 0..n {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!(
                    (utu[(i, j)] - expected).abs() < 1e-10,
                    "U^TU[({},{})]",
                    i,
                    j
                );
                assert!(
                    (vtv[(i, j)] - expected).abs() < 1e-10,
                    "V^TV[({},{})]",
                    i,
                    j
                );
            }
        }
    }

    #[test]
    fn square_3x3() {
        let a = Matrix::from_rows(3, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 10.0]);
        assert_bidiag_factors(&a);
    }

    #[test]
    fn tall_4x3() {
        let a = Matrix::from_rows(
            4,
            3,
            &[4.0, 1.0, -2.0, 1.0, 2.0, 0.0, -2.0, 0.0, 3.0, 2.0, 1.0, -2.0],
        );
        assert_bidiag_factors(&a);
    }

    #[test]
    fn tall_5x2() {
        let a = Matrix::from_rows(5, 2, &[1.0, 0.5, 2.0, -1.0, 0.0, 3.0, -2.0, 1.0, 4.0, 0.0]);
        assert_bidiag_factors(&a);
    }

    #[test]
    fn zero_column_skips_reflection() {
        // Middle column is all zeros: the column reflection at index 1
        // must be skipped, not divide by zero.
        let a: Matrix<f64> = Matrix::from_rows(3, 3, &[1.0, 0.0, 2.0, 3.0, 0.0, 4.0, 5.0, 0.0, 6.0]);
        let mut u = a.clone();
        let mut diag = vec![0.0; 3];
        let mut superdiag = vec![0.0; 3];
        let anorm = householder_bidiagonalize(&mut u, &mut diag, &mut superdiag);
        assert!(anorm.is_finite());
        for i in 0..3 {
            assert!(diag[i].is_finite());
            assert!(superdiag[i].is_finite());
        }
    }

    #[test]
    fn zero_matrix_is_identity_reduction() {
        let a = Matrix::zeros(3, 3, 0.0_f64);
        let mut u = a.clone();
        let mut v = Matrix::zeros(3, 3, 0.0);
        let mut diag = vec![0.0; 3];
        let mut superdiag = vec![0.0; 3];

        let anorm = householder_bidiagonalize(&mut u, &mut diag, &mut superdiag);
        assert_eq!(anorm, 0.0);
        assert_eq!(diag, vec![0.0; 3]);

        accumulate_right(&u, &mut v, &superdiag);
        accumulate_left(&mut u, &diag);

        // Identity reflections accumulate to identity transforms
        assert_eq!(v, Matrix::eye(3, 0.0));
        assert_eq!(u, Matrix::eye(3, 0.0));
    }

    #[test]
    fn diag_sign_opposes_pivot() {
        // First pivot is positive, so the reflected diagonal entry is
        // negative (sign chosen opposite to the pivot).
        let a: Matrix<f64> = Matrix::from_rows(2, 2, &[3.0, 1.0, 4.0, 2.0]);
        let mut u = a.clone();
        let mut diag = vec![0.0; 2];
        let mut superdiag = vec![0.0; 2];
        householder_bidiagonalize(&mut u, &mut diag, &mut superdiag);
        assert!(diag[0] < 0.0);
        assert!((diag[0].abs() - 5.0).abs() < 1e-12); // column norm
    }
}
