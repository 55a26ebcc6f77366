use {
    bevy::prelude::*,
    condition_components::{Condition, ConditionKind, CurrentConditions},
    std::{
        collections::BTreeMap,
        sync::{Arc, RwLock},
    },
};

/// Reads the live value of one condition kind and lists the values a user can pick from.
///
/// Implementations sit at the boundary with the game client; the engine itself only ever calls
/// [`ConditionSource::current`].
pub trait ConditionSource: Send + Sync + 'static {
    fn kind(&self) -> ConditionKind;

    /// Current value, or `None` when it cannot be determined right now.
    fn current(&self) -> Option<Condition>;

    /// Every selectable value, broad and narrow.
    fn enumerate(&self) -> Vec<Condition>;

    /// Selectable values that are not a narrower form of another selectable value.
    fn top_level(&self) -> Vec<Condition> {
        let all = self.enumerate();
        all.iter()
            .filter(|candidate| !all.iter().any(|broad| is_narrower(candidate, broad)))
            .cloned()
            .collect()
    }

    /// Selectable values strictly more specific than `partial` (territory -> regions).
    fn narrow(&self, partial: &Condition) -> Vec<Condition> {
        self.enumerate()
            .into_iter()
            .filter(|candidate| is_narrower(candidate, partial))
            .collect()
    }
}

/// `candidate` is narrower than `broad` when it differs but still satisfies it.
pub fn is_narrower(candidate: &Condition, broad: &Condition) -> bool {
    candidate != broad && broad.satisfied_by(candidate)
}

/// Registry of condition sources, one per [`ConditionKind`].
#[derive(Resource, Default)]
pub struct ConditionSources {
    sources: BTreeMap<ConditionKind, Box<dyn ConditionSource>>,
}

impl ConditionSources {
    /// Registers `source` for its kind, returning the source it replaced.
    pub fn register(&mut self, source: impl ConditionSource) -> Option<Box<dyn ConditionSource>> {
        self.sources.insert(source.kind(), Box::new(source))
    }

    pub fn get(&self, kind: ConditionKind) -> Option<&dyn ConditionSource> {
        self.sources.get(&kind).map(|source| source.as_ref())
    }

    pub fn kinds(&self) -> impl Iterator<Item = ConditionKind> + '_ {
        self.sources.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Samples every source once. Values of the wrong kind are discarded.
    pub fn snapshot(&self) -> CurrentConditions {
        let mut snapshot = CurrentConditions::default();
        for (&kind, source) in &self.sources {
            let Some(value) = source.current() else {
                continue;
            };
            if value.kind() != kind {
                debug!(%kind, actual = %value.kind(), "condition source returned a foreign kind");
                continue;
            }
            snapshot.insert(value);
        }
        snapshot
    }
}

/// Write side of a [`SharedConditionSource`].
#[derive(Clone, Default)]
pub struct SourceHandle(Arc<RwLock<Option<Condition>>>);

impl SourceHandle {
    pub fn set(&self, value: Option<Condition>) {
        let mut guard = self.0.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = value;
    }

    pub fn get(&self) -> Option<Condition> {
        self.0
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

/// A source whose current value is pushed in from outside through a [`SourceHandle`].
///
/// Used when the client integration samples values on its own thread, and by tests.
pub struct SharedConditionSource {
    kind: ConditionKind,
    handle: SourceHandle,
    selectable: Vec<Condition>,
}

impl SharedConditionSource {
    pub fn new(kind: ConditionKind) -> Self {
        Self {
            kind,
            handle: SourceHandle::default(),
            selectable: Vec::new(),
        }
    }

    pub fn with_selectable(mut self, values: impl IntoIterator<Item = Condition>) -> Self {
        self.selectable = values
            .into_iter()
            .filter(|value| value.kind() == self.kind)
            .collect();
        self
    }

    pub fn handle(&self) -> SourceHandle {
        self.handle.clone()
    }
}

impl ConditionSource for SharedConditionSource {
    fn kind(&self) -> ConditionKind {
        self.kind
    }

    fn current(&self) -> Option<Condition> {
        self.handle.get()
    }

    fn enumerate(&self) -> Vec<Condition> {
        self.selectable.clone()
    }
}

#[cfg(test)]
mod tests {
    use {super::*, condition_components::LocationCondition};

    fn location(territory: u32, region: Option<u32>) -> Condition {
        Condition::Location(LocationCondition {
            territory_id: territory,
            region_id: region,
        })
    }

    fn location_source() -> SharedConditionSource {
        SharedConditionSource::new(ConditionKind::Location).with_selectable([
            location(132, None),
            location(132, Some(1)),
            location(132, Some(2)),
            location(133, None),
            location(133, Some(5)),
        ])
    }

    #[test]
    fn top_level_skips_narrow_values() {
        assert_eq!(
            location_source().top_level(),
            vec![location(132, None), location(133, None)]
        );
    }

    #[test]
    fn narrow_lists_regions_of_territory() {
        assert_eq!(
            location_source().narrow(&location(132, None)),
            vec![location(132, Some(1)), location(132, Some(2))]
        );
        assert!(location_source().narrow(&location(133, Some(5))).is_empty());
    }

    #[test]
    fn snapshot_reads_current_values_only() {
        let mut sources = ConditionSources::default();
        let job = SharedConditionSource::new(ConditionKind::Job);
        let job_handle = job.handle();
        let level = SharedConditionSource::new(ConditionKind::PlayerLevel);
        sources.register(job);
        sources.register(level);

        assert!(sources.snapshot().is_empty());

        job_handle.set(Some(Condition::Job(22)));
        let snapshot = sources.snapshot();
        assert_eq!(snapshot.get(ConditionKind::Job), Some(&Condition::Job(22)));
        assert_eq!(snapshot.get(ConditionKind::PlayerLevel), None);
    }

    #[test]
    fn foreign_kinds_are_dropped() {
        let mut sources = ConditionSources::default();
        let job = SharedConditionSource::new(ConditionKind::Job);
        job.handle().set(Some(Condition::HudLayout(1)));
        sources.register(job);

        assert!(sources.snapshot().is_empty());
    }

    #[test]
    fn register_replaces_same_kind() {
        let mut sources = ConditionSources::default();
        assert!(sources.register(SharedConditionSource::new(ConditionKind::Job)).is_none());
        assert!(sources.register(SharedConditionSource::new(ConditionKind::Job)).is_some());
        assert_eq!(sources.len(), 1);
    }
}
