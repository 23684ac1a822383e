//! Inbound port. UI (adapter) calls into the application.

use crate::domain::DomainError;

/// Input port: the interactive front end driving the CRM use cases.
#[async_trait::async_trait]
pub trait InputPort: Send + Sync {
    /// Run the main menu loop until the user exits.
    async fn run(&self) -> Result<(), DomainError>;
}
