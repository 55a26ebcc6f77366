use {
    crate::{Condition, ConditionKind, CurrentConditions},
    serde::{Deserialize, Serialize},
    std::fmt,
    thiserror::Error,
};

/// Comparison operators available in condition expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComparisonOp {
    Is,
    IsNot,
    Lt,
    Le,
    Gt,
    Ge,
}

impl ComparisonOp {
    /// Ordering operators only make sense for numeric conditions.
    pub fn is_ordering(self) -> bool {
        matches!(
            self,
            ComparisonOp::Lt | ComparisonOp::Le | ComparisonOp::Gt | ComparisonOp::Ge
        )
    }

    pub fn symbol(self) -> &'static str {
        match self {
            ComparisonOp::Is => "is",
            ComparisonOp::IsNot => "is not",
            ComparisonOp::Lt => "<",
            ComparisonOp::Le => "<=",
            ComparisonOp::Gt => ">",
            ComparisonOp::Ge => ">=",
        }
    }
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Compares two magnitudes using the specified operator.
pub fn compare_op(current: i64, target: i64, op: ComparisonOp) -> bool {
    match op {
        ComparisonOp::Is => current == target,
        ComparisonOp::IsNot => current != target,
        ComparisonOp::Lt => current < target,
        ComparisonOp::Le => current <= target,
        ComparisonOp::Gt => current > target,
        ComparisonOp::Ge => current >= target,
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConditionError {
    #[error("operator `{op}` needs a numeric condition but {kind} is not numeric")]
    OrderingOnValueCondition {
        op: ComparisonOp,
        kind: ConditionKind,
    },
}

/// A single comparison against the snapshot value of one condition kind.
///
/// Construction guarantees that ordering operators are only paired with numeric conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "OpExprRepr", into = "OpExprRepr")]
pub struct OpExpr {
    op: ComparisonOp,
    condition: Condition,
}

impl OpExpr {
    pub fn new(op: ComparisonOp, condition: Condition) -> Result<Self, ConditionError> {
        if op.is_ordering() && !condition.is_numeric() {
            return Err(ConditionError::OrderingOnValueCondition {
                op,
                kind: condition.kind(),
            });
        }
        Ok(Self { op, condition })
    }

    pub fn is(condition: Condition) -> Self {
        Self {
            op: ComparisonOp::Is,
            condition,
        }
    }

    pub fn is_not(condition: Condition) -> Self {
        Self {
            op: ComparisonOp::IsNot,
            condition,
        }
    }

    pub fn op(&self) -> ComparisonOp {
        self.op
    }

    pub fn condition(&self) -> &Condition {
        &self.condition
    }

    /// Evaluates this comparison against a snapshot. Unknown snapshot values are never satisfied,
    /// whatever the operator.
    pub fn satisfied_by(&self, snapshot: &CurrentConditions) -> bool {
        snapshot
            .get(self.condition.kind())
            .is_some_and(|current| self.compare(current))
    }

    fn compare(&self, current: &Condition) -> bool {
        if let (Some(current), Some(target)) = (current.magnitude(), self.condition.magnitude()) {
            return compare_op(current, target, self.op);
        }

        match self.op {
            ComparisonOp::Is => self.condition.satisfied_by(current),
            ComparisonOp::IsNot => !self.condition.satisfied_by(current),
            // unreachable through the constructors
            _ => false,
        }
    }
}

impl fmt::Display for OpExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.condition.kind(), self.op, self.condition)
    }
}

/// Serialized shape of an [`OpExpr`], e.g. `Ge(PlayerLevel(50))`.
#[derive(Debug, Clone, Serialize, Deserialize)]
enum OpExprRepr {
    Is(Condition),
    IsNot(Condition),
    Lt(Condition),
    Le(Condition),
    Gt(Condition),
    Ge(Condition),
}

impl TryFrom<OpExprRepr> for OpExpr {
    type Error = ConditionError;

    fn try_from(repr: OpExprRepr) -> Result<Self, Self::Error> {
        let (op, condition) = match repr {
            OpExprRepr::Is(c) => (ComparisonOp::Is, c),
            OpExprRepr::IsNot(c) => (ComparisonOp::IsNot, c),
            OpExprRepr::Lt(c) => (ComparisonOp::Lt, c),
            OpExprRepr::Le(c) => (ComparisonOp::Le, c),
            OpExprRepr::Gt(c) => (ComparisonOp::Gt, c),
            OpExprRepr::Ge(c) => (ComparisonOp::Ge, c),
        };
        OpExpr::new(op, condition)
    }
}

impl From<OpExpr> for OpExprRepr {
    fn from(expr: OpExpr) -> Self {
        let OpExpr { op, condition } = expr;
        match op {
            ComparisonOp::Is => OpExprRepr::Is(condition),
            ComparisonOp::IsNot => OpExprRepr::IsNot(condition),
            ComparisonOp::Lt => OpExprRepr::Lt(condition),
            ComparisonOp::Le => OpExprRepr::Le(condition),
            ComparisonOp::Gt => OpExprRepr::Gt(condition),
            ComparisonOp::Ge => OpExprRepr::Ge(condition),
        }
    }
}

#[cfg(test)]
mod tests {
    use {super::*, crate::LocationCondition};

    #[test]
    fn ordering_requires_numeric_condition() {
        let err = OpExpr::new(ComparisonOp::Gt, Condition::Job(22)).unwrap_err();
        assert_eq!(
            err,
            ConditionError::OrderingOnValueCondition {
                op: ComparisonOp::Gt,
                kind: ConditionKind::Job,
            }
        );

        assert!(OpExpr::new(ComparisonOp::Ge, Condition::PlayerLevel(50)).is_ok());
        assert!(OpExpr::new(ComparisonOp::Is, Condition::Job(22)).is_ok());
        assert!(OpExpr::new(ComparisonOp::IsNot, Condition::HudLayout(1)).is_ok());
    }

    #[test]
    fn numeric_comparisons_use_integer_ordering() {
        let snapshot = CurrentConditions::default().with(Condition::PlayerLevel(60));

        let cases = [
            (ComparisonOp::Is, 60, true),
            (ComparisonOp::IsNot, 60, false),
            (ComparisonOp::Lt, 61, true),
            (ComparisonOp::Lt, 60, false),
            (ComparisonOp::Le, 60, true),
            (ComparisonOp::Gt, 59, true),
            (ComparisonOp::Gt, 60, false),
            (ComparisonOp::Ge, 60, true),
            (ComparisonOp::Ge, 61, false),
        ];

        for (op, target, expected) in cases {
            let expr = OpExpr::new(op, Condition::PlayerLevel(target)).unwrap();
            assert_eq!(expr.satisfied_by(&snapshot), expected, "{expr}");
        }
    }

    #[test]
    fn value_comparisons_delegate_to_condition() {
        let snapshot = CurrentConditions::default().with(Condition::Location(
            LocationCondition::territory(132).with_region(7),
        ));

        let whole_territory = Condition::Location(LocationCondition::territory(132));
        assert!(OpExpr::is(whole_territory.clone()).satisfied_by(&snapshot));
        assert!(!OpExpr::is_not(whole_territory).satisfied_by(&snapshot));

        let elsewhere = Condition::Location(LocationCondition::territory(130));
        assert!(!OpExpr::is(elsewhere.clone()).satisfied_by(&snapshot));
        assert!(OpExpr::is_not(elsewhere).satisfied_by(&snapshot));
    }

    #[test]
    fn unknown_snapshot_value_is_never_satisfied() {
        let snapshot = CurrentConditions::default();

        assert!(!OpExpr::is(Condition::Job(22)).satisfied_by(&snapshot));
        assert!(!OpExpr::is_not(Condition::Job(22)).satisfied_by(&snapshot));
        assert!(
            !OpExpr::new(ComparisonOp::Lt, Condition::PlayerLevel(100))
                .unwrap()
                .satisfied_by(&snapshot)
        );
    }

    #[test]
    fn deserialization_rejects_ordering_on_value_kind() {
        let ok: OpExpr = ron::from_str("Ge(PlayerLevel(50))").unwrap();
        assert_eq!(ok.op(), ComparisonOp::Ge);
        assert_eq!(ok.condition(), &Condition::PlayerLevel(50));

        let rejected: Result<OpExpr, _> = ron::from_str("Lt(Job(22))");
        assert!(rejected.is_err());
    }
}
