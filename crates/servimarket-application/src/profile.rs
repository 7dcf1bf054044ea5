//! Profile overview for the signed-in user.

use servimarket_core::catalog::{Catalog, HiredService, HiredServiceStatus};
use servimarket_core::session::{Role, Session};

/// What the profile screen shows: identity plus hiring statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileSummary {
    pub session: Session,
    pub hired_services: Vec<HiredService>,
}

impl ProfileSummary {
    pub fn build(session: Session, catalog: &dyn Catalog) -> Self {
        let hired_services = catalog.hired_services_by_client(&session.id);
        Self {
            session,
            hired_services,
        }
    }

    pub fn completed_count(&self) -> usize {
        self.hired_services
            .iter()
            .filter(|hired| hired.status == HiredServiceStatus::Completed)
            .count()
    }

    /// Services still awaiting fulfillment.
    pub fn open_services(&self) -> impl Iterator<Item = &HiredService> {
        self.hired_services.iter().filter(|hired| hired.status.is_open())
    }

    /// Rating with one decimal, or `N/A` for unrated users.
    pub fn rating_label(&self) -> String {
        match self.session.rating {
            Some(rating) => format!("{:.1}", rating),
            None => "N/A".to_string(),
        }
    }

    pub fn role_label(&self) -> &'static str {
        match self.session.role {
            Role::Client => "Cliente",
            Role::Business => "Negocio",
        }
    }

    /// First letter of the display name, used as the avatar placeholder.
    pub fn initial(&self) -> char {
        self.session.name.chars().next().unwrap_or('U')
    }
}
