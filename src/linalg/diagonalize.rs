use crate::linalg::numeric::{hypot2, same_sign};
use crate::linalg::split_two_col_slices;
use crate::traits::{FloatScalar, MatrixMut};

/// Apply a Givens rotation to full columns `col_a` and `col_b`:
/// `a' = a·c + b·s`, `b' = b·c - a·s`.
fn rotate_columns<T: FloatScalar>(
    m: &mut impl MatrixMut<T>,
    col_a: usize,
    col_b: usize,
    c: T,
    s: T,
) {
    let (a, b) = split_two_col_slices(m, col_a, col_b, 0);
    for (x, y) in a.iter_mut().zip(b.iter_mut()) {
        let xa = *x;
        let yb = *y;
        *x = xa * c + yb * s;
        *y = yb * c - xa * s;
    }
}

/// Implicit-shift QR iteration on an upper bidiagonal matrix
/// (Golub–Reinsch diagonalization).
///
/// On entry, `diag`/`superdiag` hold the bidiagonal form produced by the
/// Householder reduction and `anorm` its reference scale; `u`/`v` hold the
/// accumulated transforms. On return `diag` holds the singular values
/// (non-negative, order not yet final) and the off-diagonal band is zero,
/// with every rotation mirrored into the columns of `u` and `v` when the
/// corresponding `compute_*` flag is set.
///
/// Each singular value gets at most `max_sweeps` passes. Exhausting the
/// budget is not an error: the current approximation is kept and the
/// value is counted in the return value, which is the number of singular
/// values that hit the cap (0 = full convergence).
pub(crate) fn diagonalize<T: FloatScalar>(
    diag: &mut [T],
    superdiag: &mut [T],
    anorm: T,
    u: &mut impl MatrixMut<T>,
    v: &mut impl MatrixMut<T>,
    compute_u: bool,
    compute_v: bool,
    max_sweeps: usize,
) -> usize {
    let n = diag.len();
    let threshold = T::epsilon() * anorm;
    let mut stalled = 0usize;

    for k in (0..n).rev() {
        for its in 0..max_sweeps {
            // Split test: walk l down from k looking for a negligible
            // superdiagonal entry (clean split, no cancellation needed)
            // or a negligible diagonal neighbor (cancellation needed).
            let mut split_clean = false;
            let mut l = k;
            loop {
                if l == 0 || superdiag[l].abs() <= threshold {
                    split_clean = true;
                    break;
                }
                if diag[l - 1].abs() <= threshold {
                    break;
                }
                l -= 1;
            }

            // diag[l-1] is negligible: cancel superdiag[l] with a chain
            // of rotations against column l-1 so the block splits at l.
            if !split_clean {
                let nm = l - 1;
                let mut c = T::zero();
                let mut s = T::one();
                for i in l..=k {
                    let f = s * superdiag[i];
                    superdiag[i] = c * superdiag[i];
                    if f.abs() <= threshold {
                        break;
                    }
                    let g = diag[i];
                    let h = hypot2(f, g);
                    diag[i] = h;
                    if h != T::zero() {
                        let h_inv = T::one() / h;
                        c = g * h_inv;
                        s = -f * h_inv;
                    }
                    if compute_u {
                        rotate_columns(u, nm, i, c, s);
                    }
                }
            }

            let z = diag[k];
            if l == k {
                // Converged. Normalize the sign at the source: the value
                // becomes non-negative and the matching V column flips.
                if z < T::zero() {
                    diag[k] = -z;
                    if compute_v {
                        for x in v.col_as_mut_slice(k, 0) {
                            *x = -*x;
                        }
                    }
                }
                break;
            }
            if its == max_sweeps - 1 {
                // Budget exhausted: keep the approximation, count it.
                stalled += 1;
            }

            // Implicit shift from the trailing 2×2 minor.
            let mut x = diag[l];
            let nm = k - 1;
            let mut y = diag[nm];
            let mut g = superdiag[nm];
            let mut h = superdiag[k];
            let two = T::one() + T::one();
            let denom = two * h * y;
            let mut f = if denom != T::zero() {
                ((y - z) * (y + z) + (g - h) * (g + h)) / denom
            } else {
                T::zero()
            };
            g = hypot2(f, T::one());
            // |f + same_sign(g, f)| >= 1, so the inner division is safe
            f = if x != T::zero() {
                ((x - z) * (x + z) + h * ((y / (f + same_sign(g, f))) - h)) / x
            } else {
                T::zero()
            };

            // Bulge chase: chained Givens rotations restore bidiagonal
            // form while the shift drives superdiag[k] toward zero.
            let mut c = T::one();
            let mut s = T::one();
            for j in l..=nm {
                let i = j + 1;
                g = superdiag[i];
                y = diag[i];
                h = s * g;
                g = c * g;

                let mut zr = hypot2(f, h);
                superdiag[j] = zr;
                if zr != T::zero() {
                    c = f / zr;
                    s = h / zr;
                }
                f = x * c + g * s;
                g = g * c - x * s;
                h = y * s;
                y = y * c;
                if compute_v {
                    rotate_columns(v, j, i, c, s);
                }

                zr = hypot2(f, h);
                diag[j] = zr;
                // Rotation can be arbitrary if zr is zero
                if zr != T::zero() {
                    let z_inv = T::one() / zr;
                    c = f * z_inv;
                    s = h * z_inv;
                }
                f = c * g + s * y;
                x = c * y - s * g;
                if compute_u {
                    rotate_columns(u, j, i, c, s);
                }
            }
            superdiag[l] = T::zero();
            superdiag[k] = f;
            diag[k] = x;
        }
    }
    stalled
}
