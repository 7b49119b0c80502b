use crate::linalg::split_two_col_slices;
use crate::traits::{FloatScalar, MatrixMut};

/// Sort the singular values descending, permuting the columns of `u` and
/// `v` in lock-step.
///
/// Shell sort with the 3h+1 gap sequence (1, 4, 13, 40, ...); the work is
/// negligible next to the decomposition itself. `su`/`sv` are the
/// caller-owned column scratch buffers (lengths ≥ nrows of `u`/`v`).
pub(crate) fn sort_descending<T: FloatScalar>(
    diag: &mut [T],
    u: &mut impl MatrixMut<T>,
    v: &mut impl MatrixMut<T>,
    su: &mut [T],
    sv: &mut [T],
) {
    let n = diag.len();
    let m_u = u.nrows();
    let m_v = v.nrows();
    debug_assert!(su.len() >= m_u);
    debug_assert!(sv.len() >= m_v);

    let mut inc = 1usize;
    loop {
        inc = 3 * inc + 1;
        if inc > n {
            break;
        }
    }

    loop {
        inc /= 3;
        for i in inc..n {
            let sw = diag[i];
            su[..m_u].copy_from_slice(u.col_as_slice(i, 0));
            sv[..m_v].copy_from_slice(v.col_as_slice(i, 0));

            let mut j = i;
            while diag[j - inc] < sw {
                diag[j] = diag[j - inc];
                let (src, dst) = split_two_col_slices(u, j - inc, j, 0);
                dst.copy_from_slice(src);
                let (src, dst) = split_two_col_slices(v, j - inc, j, 0);
                dst.copy_from_slice(src);
                j -= inc;
                if j < inc {
                    break;
                }
            }
            diag[j] = sw;
            u.col_as_mut_slice(j, 0).copy_from_slice(&su[..m_u]);
            v.col_as_mut_slice(j, 0).copy_from_slice(&sv[..m_v]);
        }
        if inc <= 1 {
            break;
        }
    }
}

/// Resolve the ±1 ambiguity of each singular-vector pair toward "mostly
/// positive": when more than half of the combined entries of U's and V's
/// k-th columns are negative, flip both columns.
///
/// The exact majority rule (strictly more than `(m + n) / 2` negative
/// entries) is a compatibility contract; callers may depend on which of
/// the two valid sign choices comes out.
pub(crate) fn normalize_signs<T: FloatScalar>(
    u: &mut impl MatrixMut<T>,
    v: &mut impl MatrixMut<T>,
) {
    let m = u.nrows();
    let n = v.nrows();

    for k in 0..v.ncols() {
        let mut negatives = 0usize;
        for &x in u.col_as_slice(k, 0) {
            if x < T::zero() {
                negatives += 1;
            }
        }
        for &x in v.col_as_slice(k, 0) {
            if x < T::zero() {
                negatives += 1;
            }
        }
        if 2 * negatives > m + n {
            for x in u.col_as_mut_slice(k, 0) {
                *x = -*x;
            }
            for x in v.col_as_mut_slice(k, 0) {
                *x = -*x;
            }
        }
    }
}
