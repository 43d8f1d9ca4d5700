use anyhow::{Result, bail};
use colored::Colorize;

use buddy_application::BuddyApp;
use buddy_core::buddy::{CreateBuddyRequest, Personality, UpdateBuddyRequest};
use buddy_core::error::ValidationError;
use buddy_core::style::TRANSFORMATION_STYLES;

use super::{print_details, summary_line};

/// Optional overrides for the settings command.
#[derive(Debug, Default)]
pub struct SettingsEdits {
    pub name: Option<String>,
    pub description: Option<String>,
    pub personality: Option<String>,
    pub image: Option<String>,
    pub memory: Option<bool>,
    pub creativity: Option<u8>,
}

pub async fn list(app: &BuddyApp) {
    let buddies = app.buddies().await;
    if buddies.is_empty() {
        println!("{}", "No buddies yet. Create one with `buddy create`.".bright_black());
        return;
    }
    for buddy in &buddies {
        println!("{}", summary_line(buddy));
    }
}

pub async fn show(app: &BuddyApp, id: &str) -> Result<()> {
    match app.buddy(id).await {
        Some(buddy) => {
            print_details(&buddy);
            Ok(())
        }
        None => bail!("No buddy with id {}", id),
    }
}

pub async fn create(
    app: &BuddyApp,
    name: String,
    personality: String,
    description: Option<String>,
    image: Option<String>,
) -> Result<()> {
    let mut request = CreateBuddyRequest::new(name, personality);
    if let Some(description) = description {
        request = request.with_description(description);
    }
    if let Some(image) = image {
        request = request.with_image_url(image);
    }

    app.start_create().await;
    let buddy = app.create_buddy(&request).await?;
    println!("{}", "Buddy created!".bright_green());
    print_details(&buddy);
    Ok(())
}

pub async fn settings(app: &BuddyApp, id: &str, edits: SettingsEdits) -> Result<()> {
    if !app.select_buddy(id).await.is_applied() {
        bail!("No buddy with id {}", id);
    }
    app.open_settings().await;

    let Some(current) = app.active_buddy().await else {
        bail!("No buddy with id {}", id);
    };
    let mut form = UpdateBuddyRequest::from_buddy(&current);
    if let Some(name) = edits.name {
        form.name = name;
    }
    if let Some(description) = edits.description {
        form.description = description;
    }
    if let Some(personality) = edits.personality {
        form.personality =
            Personality::parse(&personality).ok_or(ValidationError::MissingPersonality)?;
    }
    if let Some(image) = edits.image {
        form.image_url = image;
    }
    if let Some(memory) = edits.memory {
        form.memory = memory;
    }
    if let Some(creativity) = edits.creativity {
        form.creativity_percent = creativity;
    }

    let updated = app.save_settings(&form).await?;
    println!("{}", "Settings saved.".bright_green());
    print_details(&updated);
    Ok(())
}

pub async fn delete(app: &BuddyApp, id: &str) -> Result<()> {
    if app.delete_buddy(id).await? {
        println!("{}", format!("Deleted buddy {}", id).bright_green());
    } else {
        println!("{}", format!("No buddy with id {}", id).bright_black());
    }
    Ok(())
}

pub fn styles() {
    for style in TRANSFORMATION_STYLES {
        println!(
            "{} {}",
            style.id.bright_black(),
            style.name.bold()
        );
        println!("  {}", style.description);
        println!("  {} {}", "Model:".bright_black(), style.model);
    }
}
