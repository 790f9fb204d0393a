//! Contact message repository.

use shopfront_core::ContactMessage;

use super::{LocalStore, StoreError, keys};

/// Repository for contact form messages.
pub struct MessageRepository<'a> {
    store: &'a LocalStore,
}

impl<'a> MessageRepository<'a> {
    #[must_use]
    pub const fn new(store: &'a LocalStore) -> Self {
        Self { store }
    }

    /// All received messages, oldest first.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the document cannot be read.
    pub async fn list(&self) -> Result<Vec<ContactMessage>, StoreError> {
        Ok(self.store.load(keys::MESSAGES).await?.unwrap_or_default())
    }

    /// Append a message.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the collection cannot be read or written.
    pub async fn append(&self, message: ContactMessage) -> Result<(), StoreError> {
        let _guard = self.store.lock().await;
        let mut messages = self.list().await?;
        tracing::info!(email = %message.email, "Contact message received");
        messages.push(message);
        self.store.save(keys::MESSAGES, &messages).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use shopfront_core::ContactForm;

    #[tokio::test]
    async fn test_append_keeps_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());
        let repo = MessageRepository::new(&store);

        for name in ["First", "Second"] {
            let message = ContactForm {
                name: name.to_string(),
                email: "someone@example.com".to_string(),
                message: "Hello".to_string(),
                ..ContactForm::default()
            }
            .validate(Utc::now())
            .unwrap();
            repo.append(message).await.unwrap();
        }

        let names: Vec<String> = repo.list().await.unwrap().into_iter().map(|m| m.name).collect();
        assert_eq!(names, ["First", "Second"]);
    }
}
