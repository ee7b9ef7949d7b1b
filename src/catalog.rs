//! Package catalog - listing and seeding of top-up packages.

use tracing::{debug, info};

use crate::store::DocumentStore;
use crate::types::{Package, StoreError, default_packages};

/// Read access to the package catalog, plus default seeding.
pub struct Catalog<'a, S> {
    store: &'a S,
}

impl<'a, S: DocumentStore> Catalog<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// All packages, ascending by diamonds.
    pub async fn list(&self) -> Result<Vec<Package>, StoreError> {
        let packages = self.store.list_packages().await?;
        debug!(count = packages.len(), "listed packages");
        Ok(packages)
    }

    /// Insert every default package whose diamonds count is not in the
    /// catalog yet, then return the full catalog.
    ///
    /// Existing packages are never updated, so repeated calls are no-ops.
    pub async fn seed(&self) -> Result<Vec<Package>, StoreError> {
        let mut inserted = 0;
        for package in default_packages() {
            if self.store.insert_package_if_absent(&package).await? {
                debug!(diamonds = package.diamonds, "seeded package");
                inserted += 1;
            }
        }
        info!(inserted, "seeded default packages");

        self.list().await
    }
}
