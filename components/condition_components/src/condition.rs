use {
    serde::{Deserialize, Serialize},
    std::{collections::BTreeSet, fmt},
};

/// Tag identifying the kind of a [`Condition`].
///
/// Condition sources, snapshots and the UI key everything by this tag; there is exactly one
/// snapshot slot per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ConditionKind {
    Location,
    Content,
    Job,
    TargetName,
    PlayerStatus,
    PlayerFlags,
    PvpState,
    HudLayout,
    PlayerLevel,
    CraftMaxDurability,
    CraftMaxQuality,
}

impl ConditionKind {
    pub const ALL: [ConditionKind; 11] = [
        ConditionKind::Location,
        ConditionKind::Content,
        ConditionKind::Job,
        ConditionKind::TargetName,
        ConditionKind::PlayerStatus,
        ConditionKind::PlayerFlags,
        ConditionKind::PvpState,
        ConditionKind::HudLayout,
        ConditionKind::PlayerLevel,
        ConditionKind::CraftMaxDurability,
        ConditionKind::CraftMaxQuality,
    ];

    /// Numeric kinds expose a magnitude and accept ordering comparisons.
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            ConditionKind::PlayerLevel
                | ConditionKind::CraftMaxDurability
                | ConditionKind::CraftMaxQuality
        )
    }

    pub fn label(self) -> &'static str {
        match self {
            ConditionKind::Location => "Location",
            ConditionKind::Content => "Content",
            ConditionKind::Job => "Job",
            ConditionKind::TargetName => "Target Name",
            ConditionKind::PlayerStatus => "Player Status",
            ConditionKind::PlayerFlags => "Player Condition",
            ConditionKind::PvpState => "PvP State",
            ConditionKind::HudLayout => "HUD Layout",
            ConditionKind::PlayerLevel => "Player Level",
            ConditionKind::CraftMaxDurability => "Craft Max Durability",
            ConditionKind::CraftMaxQuality => "Craft Max Quality",
        }
    }
}

impl fmt::Display for ConditionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A territory, optionally narrowed down to one region (sub-area) inside it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocationCondition {
    pub territory_id: u32,
    #[serde(default)]
    pub region_id: Option<u32>,
}

impl LocationCondition {
    pub fn territory(territory_id: u32) -> Self {
        Self {
            territory_id,
            region_id: None,
        }
    }

    pub fn with_region(mut self, region_id: u32) -> Self {
        self.region_id = Some(region_id);
        self
    }

    /// A location without a region matches the whole territory.
    pub fn satisfied_by(&self, current: &LocationCondition) -> bool {
        if self.territory_id != current.territory_id {
            return false;
        }

        match self.region_id {
            None => true,
            Some(region) => current.region_id == Some(region),
        }
    }
}

/// PvP mode the player is currently queued into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PvpMode {
    NotInPvp,
    Frontline,
    CrystallineConflict,
    RivalWings,
}

/// One observable fact about the game client.
///
/// Conditions are immutable values: two conditions with equal payloads are interchangeable.
/// Game data (territory names, job names, status names) lives with the condition sources; the
/// engine only ever compares ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Condition {
    Location(LocationCondition),
    /// Duty (content finder condition) id.
    Content(u32),
    /// Class/job id.
    Job(u32),
    TargetName(String),
    /// Status effects that must all be present.
    PlayerStatus(BTreeSet<u32>),
    /// Engine condition flags (mounted, in combat, crafting, ...) that must all be set.
    PlayerFlags(BTreeSet<u32>),
    PvpState(PvpMode),
    HudLayout(u8),
    PlayerLevel(u32),
    CraftMaxDurability(u32),
    CraftMaxQuality(u32),
}

impl Condition {
    pub fn kind(&self) -> ConditionKind {
        match self {
            Condition::Location(_) => ConditionKind::Location,
            Condition::Content(_) => ConditionKind::Content,
            Condition::Job(_) => ConditionKind::Job,
            Condition::TargetName(_) => ConditionKind::TargetName,
            Condition::PlayerStatus(_) => ConditionKind::PlayerStatus,
            Condition::PlayerFlags(_) => ConditionKind::PlayerFlags,
            Condition::PvpState(_) => ConditionKind::PvpState,
            Condition::HudLayout(_) => ConditionKind::HudLayout,
            Condition::PlayerLevel(_) => ConditionKind::PlayerLevel,
            Condition::CraftMaxDurability(_) => ConditionKind::CraftMaxDurability,
            Condition::CraftMaxQuality(_) => ConditionKind::CraftMaxQuality,
        }
    }

    pub fn is_numeric(&self) -> bool {
        self.kind().is_numeric()
    }

    /// Integer magnitude of a numeric condition, `None` for value conditions.
    pub fn magnitude(&self) -> Option<i64> {
        match self {
            Condition::PlayerLevel(v)
            | Condition::CraftMaxDurability(v)
            | Condition::CraftMaxQuality(v) => Some(i64::from(*v)),
            _ => None,
        }
    }

    /// Returns true if `current` (usually a snapshot value) satisfies this condition.
    ///
    /// Most kinds compare by equality. `Location` ignores a missing region and the set kinds
    /// (`PlayerStatus`, `PlayerFlags`) require every element of `self` to be held by `current`.
    /// Conditions of different kinds never satisfy each other.
    pub fn satisfied_by(&self, current: &Condition) -> bool {
        match (self, current) {
            (Condition::Location(own), Condition::Location(other)) => own.satisfied_by(other),
            (Condition::PlayerStatus(required), Condition::PlayerStatus(held))
            | (Condition::PlayerFlags(required), Condition::PlayerFlags(held)) => {
                required.iter().all(|id| held.contains(id))
            }
            (own, other) if own.kind() == other.kind() => own == other,
            _ => false,
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Location(loc) => match loc.region_id {
                Some(region) => write!(f, "territory {} (region {})", loc.territory_id, region),
                None => write!(f, "territory {}", loc.territory_id),
            },
            Condition::Content(id) => write!(f, "content {id}"),
            Condition::Job(id) => write!(f, "job {id}"),
            Condition::TargetName(name) => write!(f, "target \"{name}\""),
            Condition::PlayerStatus(ids) => write!(f, "statuses {ids:?}"),
            Condition::PlayerFlags(ids) => write!(f, "flags {ids:?}"),
            Condition::PvpState(mode) => write!(f, "PvP {mode:?}"),
            Condition::HudLayout(index) => write!(f, "HUD layout {index}"),
            Condition::PlayerLevel(level) => write!(f, "level {level}"),
            Condition::CraftMaxDurability(v) => write!(f, "max durability {v}"),
            Condition::CraftMaxQuality(v) => write!(f, "max quality {v}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn statuses(ids: &[u32]) -> Condition {
        Condition::PlayerStatus(ids.iter().copied().collect())
    }

    #[test]
    fn location_without_region_matches_whole_territory() {
        let territory_only = Condition::Location(LocationCondition::territory(132));
        let with_region = Condition::Location(LocationCondition::territory(132).with_region(7));
        let other_region = Condition::Location(LocationCondition::territory(132).with_region(8));
        let other_territory = Condition::Location(LocationCondition::territory(133));

        // (stored, current, expected)
        let matrix = [
            (&territory_only, &territory_only, true),
            (&territory_only, &with_region, true),
            (&territory_only, &other_region, true),
            (&territory_only, &other_territory, false),
            (&with_region, &with_region, true),
            (&with_region, &territory_only, false),
            (&with_region, &other_region, false),
            (&with_region, &other_territory, false),
        ];

        for (stored, current, expected) in matrix {
            assert_eq!(
                stored.satisfied_by(current),
                expected,
                "{stored} satisfied by {current}"
            );
        }
    }

    #[test]
    fn status_requires_every_held_status() {
        let matrix = [
            (statuses(&[1]), statuses(&[1]), true),
            (statuses(&[1]), statuses(&[1, 2, 3]), true),
            (statuses(&[1, 2]), statuses(&[2, 1]), true),
            (statuses(&[1, 2]), statuses(&[1]), false),
            (statuses(&[1]), statuses(&[]), false),
            (statuses(&[]), statuses(&[4]), true),
        ];

        for (stored, current, expected) in matrix {
            assert_eq!(
                stored.satisfied_by(&current),
                expected,
                "{stored} satisfied by {current}"
            );
        }
    }

    #[test]
    fn player_flags_use_subset_semantics() {
        let mounted = Condition::PlayerFlags([4].into_iter().collect());
        let mounted_in_combat = Condition::PlayerFlags([4, 26].into_iter().collect());

        assert!(mounted.satisfied_by(&mounted_in_combat));
        assert!(!mounted_in_combat.satisfied_by(&mounted));
    }

    #[test]
    fn plain_kinds_are_satisfied_by_equality_only() {
        let values = [
            Condition::Content(17),
            Condition::Content(18),
            Condition::Job(19),
            Condition::Job(22),
            Condition::TargetName("Striking Dummy".into()),
            Condition::TargetName("striking dummy".into()),
            Condition::PvpState(PvpMode::NotInPvp),
            Condition::PvpState(PvpMode::Frontline),
            Condition::HudLayout(1),
            Condition::HudLayout(2),
            Condition::PlayerLevel(90),
            Condition::PlayerLevel(100),
            Condition::CraftMaxDurability(80),
            Condition::CraftMaxQuality(11000),
        ];

        for a in &values {
            for b in &values {
                assert_eq!(a.satisfied_by(b), a == b, "{a} vs {b}");
            }
        }
    }

    #[test]
    fn different_kinds_never_match() {
        assert!(!Condition::PlayerLevel(50).satisfied_by(&Condition::CraftMaxQuality(50)));
        assert!(!Condition::Job(22).satisfied_by(&Condition::Content(22)));
    }

    #[test]
    fn magnitude_only_for_numeric_kinds() {
        assert_eq!(Condition::PlayerLevel(90).magnitude(), Some(90));
        assert_eq!(Condition::CraftMaxDurability(70).magnitude(), Some(70));
        assert_eq!(Condition::Job(22).magnitude(), None);

        for kind in ConditionKind::ALL {
            let numeric = matches!(
                kind,
                ConditionKind::PlayerLevel
                    | ConditionKind::CraftMaxDurability
                    | ConditionKind::CraftMaxQuality
            );
            assert_eq!(kind.is_numeric(), numeric, "{kind}");
        }
    }

    #[test]
    fn conditions_parse_from_ron() {
        let parsed: Vec<Condition> = ron::from_str(
            r#"[
                Job(22),
                Location((territory_id: 132)),
                Location((territory_id: 132, region_id: Some(7))),
                PlayerStatus([1, 2]),
                PvpState(CrystallineConflict),
            ]"#,
        )
        .unwrap();

        assert_eq!(parsed[0], Condition::Job(22));
        assert_eq!(
            parsed[1],
            Condition::Location(LocationCondition::territory(132))
        );
        assert_eq!(
            parsed[2],
            Condition::Location(LocationCondition::territory(132).with_region(7))
        );
        assert_eq!(parsed[3], statuses(&[1, 2]));
        assert_eq!(parsed[4], Condition::PvpState(PvpMode::CrystallineConflict));
    }
}
