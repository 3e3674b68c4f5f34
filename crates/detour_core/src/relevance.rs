use crate::{closure::Closure, transport_mode::TransportMode};

/// Whether `closure` obstructs travel with `mode`: it must be active and its
/// category must affect the mode.
pub fn is_relevant(closure: &Closure, mode: TransportMode) -> bool {
    closure.is_active() && closure.category.affects(mode)
}

pub fn relevant_closures(
    closures: &[Closure],
    mode: TransportMode,
) -> impl Iterator<Item = &Closure> {
    closures
        .iter()
        .filter(move |closure| is_relevant(closure, mode))
}
