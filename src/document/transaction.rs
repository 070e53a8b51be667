use std::ops::{Deref, DerefMut};

use tracing::{debug, warn};

use crate::error::{Result, TransactionError};

use super::Document;

/// A scoped, all-or-nothing modification of a [`Document`].
///
/// The document is snapshotted on start. [`Transaction::commit`] publishes
/// the changes; dropping the transaction without a successful commit
/// restores the snapshot.
pub struct Transaction<'a> {
    doc: &'a mut Document,
    snapshot: Option<Document>,
    name: String,
    committed: bool,
}

impl<'a> Transaction<'a> {
    /// Opens a transaction on `doc`.
    ///
    /// # Errors
    ///
    /// Returns `TransactionError::ReadOnlyDocument` if the document refuses
    /// modification.
    pub fn start(doc: &'a mut Document, name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if doc.is_read_only() {
            return Err(TransactionError::ReadOnlyDocument(name).into());
        }
        debug!(transaction = %name, "transaction started");
        let snapshot = Some(doc.clone());
        Ok(Self {
            doc,
            snapshot,
            name,
            committed: false,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Validates the document and publishes the changes.
    ///
    /// # Errors
    ///
    /// Returns `TransactionError::CommitRejected` if validation fails; the
    /// changes are rolled back.
    pub fn commit(mut self) -> Result<()> {
        if let Err(reason) = self.doc.validate_references() {
            warn!(transaction = %self.name, %reason, "commit rejected");
            return Err(TransactionError::CommitRejected {
                name: self.name.clone(),
                reason,
            }
            .into());
        }
        self.committed = true;
        self.snapshot = None;
        debug!(transaction = %self.name, "transaction committed");
        Ok(())
    }
}

impl Deref for Transaction<'_> {
    type Target = Document;

    fn deref(&self) -> &Document {
        self.doc
    }
}

impl DerefMut for Transaction<'_> {
    fn deref_mut(&mut self) -> &mut Document {
        self.doc
    }
}

impl Drop for Transaction<'_> {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        if let Some(snapshot) = self.snapshot.take() {
            *self.doc = snapshot;
            debug!(transaction = %self.name, "transaction rolled back");
        }
    }
}

/// Runs `f` inside a transaction, committing only if it returns `Ok`.
///
/// # Errors
///
/// Propagates errors from starting the transaction, from `f`, and from the
/// commit. On any error the document is left as it was.
pub fn run_in_transaction<T, F>(doc: &mut Document, name: &str, f: F) -> Result<T>
where
    F: FnOnce(&mut Transaction<'_>) -> Result<T>,
{
    let mut txn = Transaction::start(doc, name)?;
    let value = f(&mut txn)?;
    txn.commit()?;
    Ok(value)
}
