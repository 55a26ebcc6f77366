use {
    crate::{CurrentConditions, OpExpr},
    serde::{Deserialize, Serialize},
    std::{fmt, iter, sync::Arc},
};

// ============================================================================
// Persistent slice helpers
// ============================================================================

fn appended<T: Clone>(items: &[T], item: T) -> Arc<[T]> {
    items.iter().cloned().chain(iter::once(item)).collect()
}

fn replaced<T: Clone>(items: &[T], index: usize, item: T) -> Option<Arc<[T]>> {
    (index < items.len()).then(|| {
        let mut items = items.to_vec();
        items[index] = item;
        items.into()
    })
}

fn removed<T: Clone>(items: &[T], index: usize) -> Option<Arc<[T]>> {
    (index < items.len()).then(|| {
        let mut items = items.to_vec();
        items.remove(index);
        items.into()
    })
}

// ============================================================================
// And
// ============================================================================

/// Conjunction of comparisons.
///
/// Satisfied when every member is satisfied. An empty `AndExpr` is never satisfied so that an
/// unfinished expression cannot accidentally match everything.
///
/// Values are immutable; the `with_*`/`without_*` methods return a new expression and leave the
/// receiver untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AndExpr {
    ops: Arc<[OpExpr]>,
}

impl AndExpr {
    pub fn new(ops: impl IntoIterator<Item = OpExpr>) -> Self {
        Self {
            ops: ops.into_iter().collect(),
        }
    }

    pub fn ops(&self) -> &[OpExpr] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn satisfied_by(&self, snapshot: &CurrentConditions) -> bool {
        !self.ops.is_empty() && self.ops.iter().all(|op| op.satisfied_by(snapshot))
    }

    #[must_use]
    pub fn with_op(&self, op: OpExpr) -> Self {
        Self {
            ops: appended(&self.ops, op),
        }
    }

    /// Replaces the comparison at `index`; out-of-range indices leave the expression unchanged.
    #[must_use]
    pub fn with_updated_op(&self, index: usize, op: OpExpr) -> Self {
        replaced(&self.ops, index, op)
            .map(|ops| Self { ops })
            .unwrap_or_else(|| self.clone())
    }

    #[must_use]
    pub fn without_op(&self, index: usize) -> Self {
        removed(&self.ops, index)
            .map(|ops| Self { ops })
            .unwrap_or_else(|| self.clone())
    }
}

impl FromIterator<OpExpr> for AndExpr {
    fn from_iter<I: IntoIterator<Item = OpExpr>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl fmt::Display for AndExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, op) in self.ops.iter().enumerate() {
            if i > 0 {
                f.write_str(" and ")?;
            }
            write!(f, "{op}")?;
        }
        Ok(())
    }
}

// ============================================================================
// Or
// ============================================================================

/// Disjunction of [`AndExpr`] groups, the top-level condition of a macro.
///
/// Satisfied when any group is satisfied; an empty `OrExpr` is never satisfied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrExpr {
    groups: Arc<[AndExpr]>,
}

impl OrExpr {
    pub fn new(groups: impl IntoIterator<Item = AndExpr>) -> Self {
        Self {
            groups: groups.into_iter().collect(),
        }
    }

    /// `Or[And[op]]`
    pub fn single(op: OpExpr) -> Self {
        Self::new([AndExpr::new([op])])
    }

    pub fn groups(&self) -> &[AndExpr] {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn satisfied_by(&self, snapshot: &CurrentConditions) -> bool {
        self.groups.iter().any(|group| group.satisfied_by(snapshot))
    }

    #[must_use]
    pub fn with_group(&self, group: AndExpr) -> Self {
        Self {
            groups: appended(&self.groups, group),
        }
    }

    #[must_use]
    pub fn with_updated_group(&self, index: usize, group: AndExpr) -> Self {
        replaced(&self.groups, index, group)
            .map(|groups| Self { groups })
            .unwrap_or_else(|| self.clone())
    }

    #[must_use]
    pub fn without_group(&self, index: usize) -> Self {
        removed(&self.groups, index)
            .map(|groups| Self { groups })
            .unwrap_or_else(|| self.clone())
    }
}

impl FromIterator<AndExpr> for OrExpr {
    fn from_iter<I: IntoIterator<Item = AndExpr>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl fmt::Display for OrExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.groups.is_empty() {
            return f.write_str("never");
        }
        for (i, group) in self.groups.iter().enumerate() {
            if i > 0 {
                f.write_str(" or ")?;
            }
            write!(f, "({group})")?;
        }
        Ok(())
    }
}
