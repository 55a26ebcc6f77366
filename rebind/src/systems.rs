use {
    crate::{RebindController, SlotStoreHandle},
    activation_resources::{ActivationStats, ActiveSet, MacroLibrary, RecomputePending},
    bevy::prelude::*,
    macro_events::{RebindFailed, RetryRebind},
};

pub fn listener_attached(controller: Res<RebindController>) -> bool {
    controller.is_attached()
}

/// Pushes the current active set into the slot store.
///
/// A store failure is reported through [`RebindFailed`]; the controller stays detached and this
/// system stops running until a [`RetryRebind`].
pub fn apply_rebind(
    library: Res<MacroLibrary>,
    active: Res<ActiveSet>,
    mut controller: ResMut<RebindController>,
    mut store: ResMut<SlotStoreHandle>,
    mut stats: ResMut<ActivationStats>,
    mut commands: Commands,
) {
    match controller.rebind(&library.tree, &active, store.0.as_mut()) {
        Ok(report) => {
            stats.rebinds += 1;
            if report.store_calls() > 0 {
                debug!(
                    written = report.written,
                    placeholders = report.placeholders,
                    deleted = report.deleted,
                    "slots rebound"
                );
            }
        }
        Err(error) => {
            error!(%error, "failed to write macro slots, rebinding suspended");
            commands.trigger(RebindFailed {
                slot: error.slot(),
                message: error.to_string(),
            });
        }
    }
}

pub fn retry_rebind(
    _trigger: On<RetryRebind>,
    mut controller: ResMut<RebindController>,
    mut pending: ResMut<RecomputePending>,
) {
    info!("rebinding resumed");
    controller.reattach();
    pending.request();
}
