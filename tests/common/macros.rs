/// Asserts that two output vectors agree element-wise within a tolerance.
#[macro_export]
macro_rules! assert_outputs_close {
    ($left:expr, $right:expr) => {
        assert_outputs_close!($left, $right, 1e-9)
    };
    ($left:expr, $right:expr, $eps:expr) => {{
        let left: Vec<f64> = $left;
        let right: Vec<f64> = $right;
        assert_eq!(left.len(), right.len(), "output lengths differ");
        for (i, (l, r)) in left.iter().zip(right.iter()).enumerate() {
            assert!(
                (l - r).abs() <= $eps,
                "output {} differs: {} vs {} (eps {})",
                i,
                l,
                r,
                $eps
            );
        }
    }};
}

/// Asserts that a result failed with the given error variant.
#[macro_export]
macro_rules! assert_net_error {
    ($result:expr, $pattern:pat) => {
        match $result {
            Err(ref e) if matches!(e, $pattern) => {}
            Err(e) => panic!("unexpected error: {e:?}"),
            Ok(_) => panic!("expected an error"),
        }
    };
}
