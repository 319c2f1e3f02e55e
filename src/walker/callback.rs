//! Leaf callback capability

use crate::error::CallbackError;
use crate::namespace::{BlockLocation, NamespaceEntry};

/// Consumes every leaf entry a walk discovers
///
/// Invoked synchronously on the task that listed the entry's parent.
/// Invocations from different tasks may interleave arbitrarily. Returning an
/// error (or panicking) ends that task's listing and is reported like a
/// listing failure.
pub trait EntryCallback: Send + Sync {
    fn process(
        &self,
        entry: &NamespaceEntry,
        blocks: &[BlockLocation],
    ) -> Result<(), CallbackError>;
}

impl<F> EntryCallback for F
where
    F: Fn(&NamespaceEntry, &[BlockLocation]) -> Result<(), CallbackError> + Send + Sync,
{
    fn process(
        &self,
        entry: &NamespaceEntry,
        blocks: &[BlockLocation],
    ) -> Result<(), CallbackError> {
        self(entry, blocks)
    }
}

/// Pin a closure to the callback signature so its argument and return types
/// are inferred
pub fn callback_fn<F>(f: F) -> F
where
    F: Fn(&NamespaceEntry, &[BlockLocation]) -> Result<(), CallbackError> + Send + Sync,
{
    f
}
