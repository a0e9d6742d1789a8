// A poisoned lock means an expiry action cell was left in an inconsistent state. Actions never run
// while the lock is held, so this indicates a bug in the cell itself (we panic).
pub(crate) const ERR_POISONED_LOCK: &str = "encountered poisoned lock - an expiry action cell \
    was left in an inconsistent state";

pub(crate) const ERR_VACATED_GUARD: &str =
    "a shared callable guard only gives up its callable when it is dropped";
