//! Translation from program output to autoscaler metric values.
//!
//! The horizontal pod autoscaler computes
//!
//! ```text
//! desired_replicas = ceil(current_replicas * (current_value / target_value))
//! ```
//!
//! Solving for `current_value` gives the value to report so that the
//! autoscaler lands exactly on the replica count the program asked for.

/// Target value configured on the autoscaler for the subleq metric.
pub const TARGET_METRIC_VALUE: f64 = 1.0;

/// Map a program output to a desired pod count.
///
/// ```text
///  -1 (halted)       → 1
///   0 (no output)    → 2
///   n (character n)  → n + 2
/// ```
pub fn desired_pods(output: i64) -> i64 {
    output.saturating_add(2)
}

/// Metric value that makes the autoscaler scale `current_pods` to
/// `desired_pods` when its target is `target_value`.
///
/// Returns `None` when `current_pods` is zero; the ratio is undefined and
/// the autoscaler would not act on it anyway.
pub fn reported_metric_value(
    desired_pods: i64,
    current_pods: usize,
    target_value: f64,
) -> Option<f64> {
    if current_pods == 0 {
        return None;
    }
    Some(desired_pods as f64 * target_value / current_pods as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn desired_pods_offsets_by_two() {
        assert_eq!(desired_pods(-1), 1);
        assert_eq!(desired_pods(0), 2);
        assert_eq!(desired_pods(72), 74);
        assert_eq!(desired_pods(105), 107);
        for n in -50..50 {
            assert_eq!(desired_pods(n), n + 2);
        }
    }

    #[test]
    fn desired_pods_saturates() {
        assert_eq!(desired_pods(i64::MAX), i64::MAX);
    }

    #[test]
    fn reported_value_inverts_autoscaler_rule() {
        for current in 1..20usize {
            for desired in 1..200i64 {
                let value = reported_metric_value(desired, current, TARGET_METRIC_VALUE).unwrap();
                let replicas = current as f64 * (value / TARGET_METRIC_VALUE);
                assert!(
                    (replicas - desired as f64).abs() < 1e-9,
                    "current={current} desired={desired} replicas={replicas}"
                );
            }
        }
    }

    #[test]
    fn reported_value_examples() {
        assert_eq!(reported_metric_value(74, 2, 1.0), Some(37.0));
        assert_eq!(reported_metric_value(3, 2, 1.0), Some(1.5));
        assert_eq!(reported_metric_value(1, 4, 1.0), Some(0.25));
        assert_eq!(reported_metric_value(4, 2, 0.5), Some(1.0));
    }

    #[test]
    fn zero_current_pods_is_undefined() {
        assert_eq!(reported_metric_value(3, 0, TARGET_METRIC_VALUE), None);
    }
}
