//! Shared helpers for the integration tests

use ndarray::{ArrayBase, Data, Dimension};

/// Assert `|actual - desired| <= atol + rtol * |desired|` element-wise
#[allow(dead_code)]
pub fn assert_allclose<S1, S2, D1, D2>(
    actual: &ArrayBase<S1, D1>,
    desired: &ArrayBase<S2, D2>,
    rtol: f64,
    atol: f64,
) where
    S1: Data<Elem = f64>,
    S2: Data<Elem = f64>,
    D1: Dimension,
    D2: Dimension,
{
    assert_eq!(actual.shape(), desired.shape(), "shape mismatch");
    for (i, (a, d)) in actual.iter().zip(desired.iter()).enumerate() {
        assert!(
            (a - d).abs() <= atol + rtol * d.abs(),
            "element {}: {} != {} (rtol {}, atol {})",
            i,
            a,
            d,
            rtol,
            atol
        );
    }
}

/// Scalar version of [`assert_allclose`]
#[allow(dead_code)]
pub fn assert_close(actual: f64, desired: f64, rtol: f64, atol: f64) {
    assert!(
        (actual - desired).abs() <= atol + rtol * desired.abs(),
        "{} != {} (rtol {}, atol {})",
        actual,
        desired,
        rtol,
        atol
    );
}
