//! Catalog lookup trait.

use super::model::{Business, HiredService, Service, ServiceCategory};

/// Read-only access to the marketplace reference data.
///
/// All lookups are exact-match on identifiers. Misses are empty results,
/// never errors.
pub trait Catalog: Send + Sync {
    fn categories(&self) -> &[ServiceCategory];

    /// Services offered in `category_id`, empty when the category is unknown.
    fn services_by_category(&self, category_id: &str) -> Vec<Service>;

    /// Searches every category for `service_id`.
    fn service_by_id(&self, service_id: &str) -> Option<Service>;

    fn business_by_id(&self, business_id: &str) -> Option<Business>;

    /// Hired services whose client is `client_id`, in catalog order.
    fn hired_services_by_client(&self, client_id: &str) -> Vec<HiredService>;

    fn hired_service_by_id(&self, hired_service_id: &str) -> Option<HiredService>;
}
