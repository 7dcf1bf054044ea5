use anyhow::{Context, Result};
use servimarket_application::AppContext;

pub fn categories(context: &AppContext) {
    for category in context.catalog.categories() {
        println!(
            "{} [{}] {} - {} ({} services)",
            category.icon,
            category.id,
            category.name,
            category.description,
            category.services.len()
        );
    }
}

pub fn services(context: &AppContext, category_id: &str) {
    let services = context.catalog.services_by_category(category_id);
    if services.is_empty() {
        println!("No services in category {}", category_id);
        return;
    }
    for service in services {
        println!(
            "[{}] {} - €{:.2}, {} min\n    {}",
            service.id, service.name, service.price, service.duration_minutes, service.description
        );
    }
}

pub fn business(context: &AppContext, business_id: &str) -> Result<()> {
    let business = context
        .catalog
        .business_by_id(business_id)
        .with_context(|| format!("Business {} not found", business_id))?;

    let verified = if business.verified { " ✔" } else { "" };
    println!("{}{}", business.business_name, verified);
    println!("  {}", business.description);
    println!("  Owner:   {}", business.name);
    println!("  Address: {}", business.address);
    println!("  Phone:   {}", business.phone);
    if let Some(rating) = business.rating {
        println!("  Rating:  {:.1} ({} reviews)", rating, business.reviews.unwrap_or(0));
    }
    println!("  Hours:");
    for (day, hours) in business.working_hours.days() {
        if hours.available {
            println!("    {:<9} {}-{}", day, hours.open, hours.close);
        } else {
            println!("    {:<9} closed", day);
        }
    }
    Ok(())
}

pub fn hired(context: &AppContext) -> Result<()> {
    let profile = context.profile().context("Not signed in")?;
    if profile.hired_services.is_empty() {
        println!("No hired services yet");
        return Ok(());
    }

    for hired in &profile.hired_services {
        let service_name = context
            .catalog
            .service_by_id(&hired.service_id)
            .map(|service| service.name)
            .unwrap_or_else(|| format!("service {}", hired.service_id));
        println!(
            "[{}] {} - {} - {} - €{:.2}",
            hired.id,
            service_name,
            hired.status.label(),
            hired.scheduled_date.format("%Y-%m-%d %H:%M"),
            hired.price
        );
        if let (Some(rating), Some(review)) = (hired.rating, &hired.review) {
            println!("    {}★ {}", rating, review);
        }
    }
    Ok(())
}
