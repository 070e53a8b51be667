use std::time::Duration;

use tracing::info;

use crate::document::{run_in_transaction, Document, ParameterSchema};
use crate::error::{ResourceError, Result};
use crate::reachability::{probe_with_timeout, ResourceProbe, PROBE_TIMEOUT};

/// Binds the report and metadata parameters a document lacks.
///
/// Parameter definitions live in a shared source, typically a file on a
/// network share. The source is probed first with a bounded wait; nothing
/// is bound when it cannot be reached.
pub struct ProvisionParameters<P> {
    probe: P,
    schema: ParameterSchema,
    timeout: Duration,
}

impl<P: ResourceProbe + Clone> ProvisionParameters<P> {
    /// Creates a new `ProvisionParameters` operation for the standard
    /// schema with a 2 second probe timeout.
    #[must_use]
    pub fn new(probe: P) -> Self {
        Self {
            probe,
            schema: ParameterSchema::standard(),
            timeout: PROBE_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Executes the operation and returns the number of bindings added.
    ///
    /// A document that already has every binding is left untouched and the
    /// source is not probed.
    ///
    /// # Errors
    ///
    /// Returns `ResourceError::Unreachable` if the source does not answer
    /// in time, or a transaction error if the bindings cannot be written.
    pub fn execute(&self, doc: &mut Document) -> Result<usize> {
        let missing = self.schema.missing(doc.bindings());
        if missing.is_empty() {
            return Ok(0);
        }
        if !probe_with_timeout(self.probe.clone(), self.timeout) {
            return Err(ResourceError::Unreachable {
                resource: self.probe.resource(),
                waited: self.timeout,
            }
            .into());
        }
        run_in_transaction(doc, "Provision Parameters", |txn| {
            for (category, name) in &missing {
                txn.bindings_mut().bind(*category, *name);
            }
            Ok(())
        })?;
        info!(added = missing.len(), "parameters provisioned");
        Ok(missing.len())
    }
}
