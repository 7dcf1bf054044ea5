//! In-memory marketplace catalog with the demo data the app ships with.

use chrono::{NaiveDate, NaiveDateTime};
use servimarket_core::catalog::{
    Business, Catalog, DayHours, HiredService, HiredServiceStatus, Service, ServiceCategory,
    WorkingHours,
};

#[derive(Debug, Clone)]
pub struct MockCatalog {
    categories: Vec<ServiceCategory>,
    businesses: Vec<Business>,
    hired_services: Vec<HiredService>,
}

impl MockCatalog {
    pub fn new(
        categories: Vec<ServiceCategory>,
        businesses: Vec<Business>,
        hired_services: Vec<HiredService>,
    ) -> Self {
        Self {
            categories,
            businesses,
            hired_services,
        }
    }

    pub fn with_fixtures() -> Self {
        Self::new(fixture_categories(), fixture_businesses(), fixture_hired_services())
    }

    pub fn businesses(&self) -> &[Business] {
        &self.businesses
    }
}

impl Default for MockCatalog {
    fn default() -> Self {
        Self::with_fixtures()
    }
}

impl Catalog for MockCatalog {
    fn categories(&self) -> &[ServiceCategory] {
        &self.categories
    }

    fn services_by_category(&self, category_id: &str) -> Vec<Service> {
        self.categories
            .iter()
            .find(|category| category.id == category_id)
            .map(|category| category.services.clone())
            .unwrap_or_default()
    }

    fn service_by_id(&self, service_id: &str) -> Option<Service> {
        self.categories
            .iter()
            .flat_map(|category| category.services.iter())
            .find(|service| service.id == service_id)
            .cloned()
    }

    fn business_by_id(&self, business_id: &str) -> Option<Business> {
        self.businesses
            .iter()
            .find(|business| business.id == business_id)
            .cloned()
    }

    fn hired_services_by_client(&self, client_id: &str) -> Vec<HiredService> {
        self.hired_services
            .iter()
            .filter(|hired| hired.client_id == client_id)
            .cloned()
            .collect()
    }

    fn hired_service_by_id(&self, hired_service_id: &str) -> Option<HiredService> {
        self.hired_services
            .iter()
            .find(|hired| hired.id == hired_service_id)
            .cloned()
    }
}

// ============================================================================
// Fixtures
// ============================================================================

fn service(id: &str, name: &str, description: &str, price: f64, minutes: u32, category: &str) -> Service {
    Service {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        price,
        duration_minutes: minutes,
        category_id: category.to_string(),
    }
}

fn category(id: &str, name: &str, icon: &str, description: &str, services: Vec<Service>) -> ServiceCategory {
    ServiceCategory {
        id: id.to_string(),
        name: name.to_string(),
        icon: icon.to_string(),
        description: description.to_string(),
        services,
    }
}

fn fixture_categories() -> Vec<ServiceCategory> {
    vec![
        category(
            "1",
            "Plomería",
            "🔧",
            "Servicios de fontanería y desatascos",
            vec![
                service("1", "Reparación de fuga", "Reparación de fugas de agua en tuberías y grifos", 45.0, 60, "1"),
                service("2", "Desatasco", "Desatasco de tuberías y desagües", 35.0, 45, "1"),
                service("3", "Instalación de grifo", "Instalación y cambio de grifos", 55.0, 90, "1"),
            ],
        ),
        category(
            "2",
            "Electricidad",
            "⚡",
            "Servicios eléctricos y instalaciones",
            vec![
                service("4", "Reparación de enchufe", "Reparación y cambio de enchufes", 40.0, 45, "2"),
                service("5", "Instalación de lámpara", "Instalación de lámparas y luces", 30.0, 30, "2"),
                service("6", "Revisión eléctrica", "Revisión completa de instalación eléctrica", 80.0, 120, "2"),
            ],
        ),
        category(
            "3",
            "Herrería",
            "🔨",
            "Trabajos de herrería y metalurgia",
            vec![
                service("7", "Reparación de cerradura", "Reparación y cambio de cerraduras", 50.0, 60, "3"),
                service("8", "Instalación de persiana", "Instalación y reparación de persianas", 70.0, 90, "3"),
            ],
        ),
        category(
            "4",
            "Limpieza",
            "🧹",
            "Servicios de limpieza y mantenimiento",
            vec![
                service("9", "Limpieza general", "Limpieza completa de hogar u oficina", 60.0, 180, "4"),
                service("10", "Limpieza de ventanas", "Limpieza de ventanas y cristales", 35.0, 60, "4"),
            ],
        ),
    ]
}

fn fixture_businesses() -> Vec<Business> {
    vec![
        Business {
            id: "1".to_string(),
            name: "Carlos López".to_string(),
            email: "carlos@fontaneria.com".to_string(),
            phone: "+34612345678".to_string(),
            business_name: "Fontanería López".to_string(),
            description: "Servicios profesionales de fontanería con más de 15 años de experiencia"
                .to_string(),
            address: "Calle Mayor 123, Madrid".to_string(),
            category_ids: vec!["1".to_string()],
            working_hours: WorkingHours::weekdays_and_saturday(
                DayHours::open("08:00", "18:00"),
                DayHours::open("09:00", "14:00"),
            ),
            verified: true,
            rating: Some(4.8),
            reviews: Some(127),
        },
        Business {
            id: "2".to_string(),
            name: "Ana Martínez".to_string(),
            email: "ana@electricidad.com".to_string(),
            phone: "+34687654321".to_string(),
            business_name: "Electricidad Martínez".to_string(),
            description: "Instalaciones eléctricas profesionales y reparaciones urgentes".to_string(),
            address: "Avenida de la Paz 456, Barcelona".to_string(),
            category_ids: vec!["2".to_string()],
            working_hours: WorkingHours::weekdays_and_saturday(
                DayHours::open("07:00", "19:00"),
                DayHours::open("08:00", "16:00"),
            ),
            verified: true,
            rating: Some(4.9),
            reviews: Some(89),
        },
    ]
}

/// Builds a fixture timestamp; the literals below are all valid dates.
fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, minute, 0))
        .unwrap_or_default()
}

fn fixture_hired_services() -> Vec<HiredService> {
    vec![
        HiredService {
            id: "1".to_string(),
            client_id: "1".to_string(),
            business_id: "1".to_string(),
            service_id: "1".to_string(),
            status: HiredServiceStatus::Confirmed,
            scheduled_date: at(2024, 1, 15, 10, 0),
            address: "Calle Gran Vía 789, Madrid".to_string(),
            description: "Reparación de fuga en el baño principal".to_string(),
            price: 45.0,
            created_at: at(2024, 1, 14, 15, 30),
            updated_at: at(2024, 1, 14, 16, 0),
            rating: None,
            review: None,
        },
        HiredService {
            id: "2".to_string(),
            client_id: "1".to_string(),
            business_id: "2".to_string(),
            service_id: "4".to_string(),
            status: HiredServiceStatus::Completed,
            scheduled_date: at(2024, 1, 10, 14, 0),
            address: "Calle Gran Vía 789, Madrid".to_string(),
            description: "Reparación de enchufe en la cocina".to_string(),
            price: 40.0,
            created_at: at(2024, 1, 9, 10, 15),
            updated_at: at(2024, 1, 10, 15, 30),
            rating: Some(5),
            review: Some("Excelente servicio, muy profesional y puntual".to_string()),
        },
    ]
}
