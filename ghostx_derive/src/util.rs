pub(crate) mod args;

/// Name of the field holding the guard cells of a ghost.
pub(crate) const STATE_FIELD: &str = "__ghostx_state";
