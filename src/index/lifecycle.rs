use super::IndexDefinition;
use crate::client::SearchClient;
use crate::error::Result;
use crate::verify;

/// What to do with an index that already exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResetPolicy {
    /// Delete it and create it again, empty.
    #[default]
    Recreate,
    /// Leave it and its documents alone.
    KeepExisting,
}

/// How [`IndexLifecycle::ensure`] got the index into place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ensured {
    Created,
    Recreated,
    AlreadyPresent,
}

impl Ensured {
    /// `true` when the index is known to hold no documents.
    pub fn is_empty(self) -> bool {
        !matches!(self, Ensured::AlreadyPresent)
    }
}

#[derive(Clone)]
pub struct IndexLifecycle {
    client: SearchClient,
    definition: Option<IndexDefinition>,
}

impl IndexLifecycle {
    pub fn new(client: SearchClient) -> Self {
        Self {
            client,
            definition: None,
        }
    }

    /// Settings and mappings applied to every index this lifecycle creates.
    pub fn with_definition(mut self, definition: IndexDefinition) -> Self {
        self.definition = Some(definition);
        self
    }

    pub fn definition(&self) -> Option<&IndexDefinition> {
        self.definition.as_ref()
    }

    /// Leave `index` existing and empty: delete it if present, then create it.
    pub async fn ensure_clean(&self, index: &str) -> Result<Ensured> {
        self.ensure(index, ResetPolicy::Recreate).await
    }

    pub async fn ensure(&self, index: &str, policy: ResetPolicy) -> Result<Ensured> {
        let exists = self.client.index_exists(index).await?;

        let outcome = match (exists, policy) {
            (true, ResetPolicy::KeepExisting) => {
                tracing::info!(index, "index already present, keeping it");
                return Ok(Ensured::AlreadyPresent);
            }
            (true, ResetPolicy::Recreate) => {
                self.delete(index).await?;
                Ensured::Recreated
            }
            (false, _) => Ensured::Created,
        };

        self.create(index).await?;
        tracing::info!(index, outcome = ?outcome, "index ready");
        Ok(outcome)
    }

    async fn delete(&self, index: &str) -> Result<()> {
        let deleted = self.client.delete_index(index).await?;
        verify::acknowledged("delete", index, deleted.acknowledged)?;
        tracing::debug!(index, "deleted existing index");
        Ok(())
    }

    async fn create(&self, index: &str) -> Result<()> {
        let created = self
            .client
            .create_index(index, self.definition.as_ref())
            .await?;
        verify::index_created(&created, index)
    }
}
