//! Dense linear solve for the damped normal equations

/// Pivot magnitude below which a column is treated as unobservable
pub const PIVOT_EPSILON: f64 = 1e-12;

/// Solve `a · x = b` by Gaussian elimination with partial pivoting.
///
/// A column whose best pivot is numerically zero is skipped and its unknown
/// left at 0.0, so a parameter no measurement constrains simply does not
/// move.
pub fn solve_linear_system(a: &[Vec<f64>], b: &[f64]) -> Vec<f64> {
    let n = b.len();
    if n == 0 || a.len() != n {
        return vec![0.0; n];
    }

    let mut aug: Vec<Vec<f64>> = a
        .iter()
        .zip(b)
        .map(|(row, rhs)| {
            let mut r = row.clone();
            r.resize(n, 0.0);
            r.push(*rhs);
            r
        })
        .collect();

    // Forward elimination with partial pivoting
    for col in 0..n {
        let mut max_val = aug[col][col].abs();
        let mut max_row = col;
        for (row, r) in aug.iter().enumerate().skip(col + 1) {
            if r[col].abs() > max_val {
                max_val = r[col].abs();
                max_row = row;
            }
        }
        if !(max_val > PIVOT_EPSILON) {
            continue;
        }
        aug.swap(col, max_row);

        let pivot_row = aug[col].clone();
        let pivot = pivot_row[col];
        for r in aug.iter_mut().skip(col + 1) {
            let factor = r[col] / pivot;
            for (dst, src) in r[col..].iter_mut().zip(&pivot_row[col..]) {
                *dst -= factor * src;
            }
        }
    }

    // Back substitution
    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        if !(aug[i][i].abs() > PIVOT_EPSILON) {
            continue;
        }
        let mut sum = aug[i][n];
        for j in (i + 1)..n {
            sum -= aug[i][j] * x[j];
        }
        x[i] = sum / aug[i][i];
    }

    x
}
