use super::domain::{ComparisonOp, Status};

/// Decide pass/fail/pending from a comparison operator, the KPI-level
/// threshold, and the observed rate.
///
/// Total over its inputs: a missing rate means no data was submitted and an
/// unrecognized operator means the definition is incomplete; both resolve to
/// `Pending` so every report view has a renderable badge.
pub fn evaluate(condition: Option<ComparisonOp>, threshold: f64, actual: Option<f64>) -> Status {
    let Some(actual) = actual else {
        return Status::Pending;
    };
    let Some(op) = condition else {
        return Status::Pending;
    };

    if op.passes(threshold, actual) {
        Status::Pass
    } else {
        Status::Fail
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_actual_is_pending_for_every_operator() {
        for op in [
            ComparisonOp::GreaterOrEqual,
            ComparisonOp::Greater,
            ComparisonOp::LessOrEqual,
            ComparisonOp::Less,
            ComparisonOp::Equal,
            ComparisonOp::NotEqual,
        ] {
            assert_eq!(evaluate(Some(op), 80.0, None), Status::Pending);
        }
        assert_eq!(evaluate(None, 80.0, None), Status::Pending);
    }

    #[test]
    fn boundary_values_split_gte_from_gt() {
        assert_eq!(
            evaluate(Some(ComparisonOp::GreaterOrEqual), 80.0, Some(80.0)),
            Status::Pass
        );
        assert_eq!(
            evaluate(Some(ComparisonOp::Greater), 80.0, Some(80.0)),
            Status::Fail
        );
    }

    #[test]
    fn less_than_family_mirrors_the_bound() {
        assert_eq!(
            evaluate(Some(ComparisonOp::LessOrEqual), 2.0, Some(2.0)),
            Status::Pass
        );
        assert_eq!(
            evaluate(Some(ComparisonOp::Less), 2.0, Some(2.0)),
            Status::Fail
        );
        assert_eq!(
            evaluate(Some(ComparisonOp::Less), 2.0, Some(1.99)),
            Status::Pass
        );
    }

    #[test]
    fn equality_is_exact() {
        assert_eq!(
            evaluate(Some(ComparisonOp::Equal), 80.0, Some(80.0)),
            Status::Pass
        );
        assert_eq!(
            evaluate(Some(ComparisonOp::Equal), 80.0, Some(80.01)),
            Status::Fail
        );
        assert_eq!(
            evaluate(Some(ComparisonOp::NotEqual), 80.0, Some(80.01)),
            Status::Pass
        );
    }

    #[test]
    fn unknown_operator_never_passes_or_fails() {
        assert_eq!(evaluate(ComparisonOp::parse("bogus"), 80.0, Some(90.0)), Status::Pending);
        assert_eq!(evaluate(None, 80.0, Some(10.0)), Status::Pending);
    }
}
