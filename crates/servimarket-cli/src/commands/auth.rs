use anyhow::{bail, Context, Result};
use servimarket_application::{AppContext, LoginError};
use servimarket_core::navigation::Route;
use servimarket_core::session::{Role, SessionPatch};

pub async fn login(context: &AppContext, email: &str, password: &str, role: Role) -> Result<()> {
    match context.store.login_detailed(email, password, role).await {
        Ok(session) => {
            println!("✅ Signed in as {} <{}> ({})", session.name, session.email, session.role);
            Ok(())
        }
        Err(LoginError::InvalidCredentials) => {
            bail!(
                "Invalid credentials. Demo accounts:\n  client:   juan@example.com\n  business: maria@example.com\n  password: 123456"
            )
        }
        Err(err) => Err(err).context("Login failed"),
    }
}

pub async fn logout(context: &AppContext) {
    context.store.logout().await;
    println!("👋 Signed out");
}

pub fn whoami(context: &AppContext) -> Result<()> {
    let profile = context.profile().context("Not signed in")?;
    let session = &profile.session;

    println!("[{}] {}", profile.initial(), session.name);
    println!("  Email:     {}", session.email);
    println!("  Phone:     {}", session.phone);
    println!("  Type:      {}", profile.role_label());
    if let Some(avatar) = &session.avatar {
        println!("  Avatar:    {}", avatar);
    }
    println!("  Services:  {}", profile.hired_services.len());
    println!("  Completed: {}", profile.completed_count());
    println!("  Rating:    {}", profile.rating_label());
    Ok(())
}

pub async fn update(
    context: &AppContext,
    name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    avatar: Option<String>,
) -> Result<()> {
    let mut patch = SessionPatch::new();
    if let Some(name) = name {
        patch = patch.with_name(name);
    }
    if let Some(email) = email {
        patch = patch.with_email(email);
    }
    if let Some(phone) = phone {
        patch = patch.with_phone(phone);
    }
    if let Some(avatar) = avatar {
        patch = patch.with_avatar(avatar);
    }
    if patch.is_empty() {
        bail!("Nothing to update: pass at least one of --name, --email, --phone, --avatar");
    }

    let write = context
        .store
        .update_user(patch)
        .context("Not signed in")?;
    // the runtime stops right after, so wait for the queued write
    write.await.context("Session write task failed")?;

    whoami(context)
}

pub fn route(context: &AppContext) {
    let route = Route::for_state(&context.store.snapshot());
    println!("{:?}", route);
    for screen in route.screens() {
        let marker = if screen.is_tab() { "tab" } else { "stack" };
        println!("  {:?} ({})", screen, marker);
    }
}
