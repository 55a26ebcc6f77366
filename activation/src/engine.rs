use {
    activation_resources::ActiveSet,
    bevy::prelude::*,
    condition_components::CurrentConditions,
    macro_components::MacroTree,
};

/// Computes the active set for `snapshot`.
///
/// Macros are visited in declaration order. A macro becomes active when it has a link, none of
/// its slots is already claimed by an earlier active macro, and it is either always linked or its
/// conditions hold. Later macros that overlap an earlier claim are skipped without error, so the
/// first declared macro always wins a contested slot.
pub fn activate(tree: &MacroTree, snapshot: &CurrentConditions) -> ActiveSet {
    let mut active = ActiveSet::default();

    for (node, def) in tree.macros() {
        if !def.has_link() {
            continue;
        }

        let wants_slots = def.always_linked || def.conditions.satisfied_by(snapshot);
        if !wants_slots {
            continue;
        }

        if let Some(slot) = def
            .link
            .slot_refs()
            .find(|slot| active.claims.contains_key(slot))
        {
            trace!(
                macro_name = node.name(),
                %slot,
                owner = ?active.claims.get(&slot),
                "slot already claimed by an earlier macro"
            );
            continue;
        }

        for slot in def.link.slot_refs() {
            active.claims.insert(slot, node.id());
        }
        active.macros.push(node.id());
    }

    active
}
