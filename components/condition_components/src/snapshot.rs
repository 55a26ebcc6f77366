use {
    crate::{Condition, ConditionKind},
    bevy::prelude::*,
    std::collections::BTreeMap,
};

/// Immutable bundle of the "current" condition values, sampled once per poll.
///
/// Holds at most one value per [`ConditionKind`]. A missing kind means the value could not be
/// determined right now; every comparison against it is unsatisfied.
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq)]
pub struct CurrentConditions {
    values: BTreeMap<ConditionKind, Condition>,
}

impl CurrentConditions {
    pub fn get(&self, kind: ConditionKind) -> Option<&Condition> {
        self.values.get(&kind)
    }

    /// Stores `condition` in the slot of its kind, returning the value it replaced.
    pub fn insert(&mut self, condition: Condition) -> Option<Condition> {
        self.values.insert(condition.kind(), condition)
    }

    pub fn with(mut self, condition: Condition) -> Self {
        self.insert(condition);
        self
    }

    pub fn remove(&mut self, kind: ConditionKind) -> Option<Condition> {
        self.values.remove(&kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Condition> {
        self.values.values()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<Condition> for CurrentConditions {
    fn from_iter<I: IntoIterator<Item = Condition>>(iter: I) -> Self {
        let mut snapshot = Self::default();
        for condition in iter {
            snapshot.insert(condition);
        }
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_slot_per_kind() {
        let snapshot: CurrentConditions = [
            Condition::Job(19),
            Condition::PlayerLevel(90),
            Condition::Job(22),
        ]
        .into_iter()
        .collect();

        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.get(ConditionKind::Job), Some(&Condition::Job(22)));
        assert_eq!(snapshot.get(ConditionKind::Content), None);
    }

    #[test]
    fn equality_ignores_insertion_order() {
        let a = CurrentConditions::default()
            .with(Condition::Job(22))
            .with(Condition::HudLayout(1));
        let b = CurrentConditions::default()
            .with(Condition::HudLayout(1))
            .with(Condition::Job(22));

        assert_eq!(a, b);
        assert_ne!(a, b.with(Condition::HudLayout(2)));
    }
}
