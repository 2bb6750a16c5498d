//! Customer repository port.
//!
//! Customers are keyed by their provider handle. Writes are upserts: the
//! stored row is replaced by the incoming record, whatever was there before.

use async_trait::async_trait;

use crate::domain::billing::Customer;
use crate::domain::foundation::DomainError;

/// Repository port for customer persistence.
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Insert the customer, or overwrite every non-key field of the existing
    /// row with the same handle.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn upsert(&self, customer: &Customer) -> Result<(), DomainError>;

    /// Find a customer by handle.
    ///
    /// Returns `None` if not found.
    async fn find_by_handle(&self, handle: &str) -> Result<Option<Customer>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn customer_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn CustomerRepository) {}
    }
}
