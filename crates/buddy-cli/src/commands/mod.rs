pub mod buddy;
pub mod chat;
pub mod transform;

use colored::Colorize;

use buddy_core::buddy::Buddy;

/// One-line listing entry: avatar marker, id, name and personality.
pub fn summary_line(buddy: &Buddy) -> String {
    let avatar = match &buddy.image {
        Some(_) => "[img]".to_string(),
        None => format!("[{}]", buddy.initials()),
    };
    format!(
        "{} {} {} {}",
        avatar.bright_magenta(),
        buddy.id.bright_black(),
        buddy.name.bold(),
        format!("({})", buddy.personality).cyan()
    )
}

/// Full detail block for one buddy.
pub fn print_details(buddy: &Buddy) {
    let settings = buddy.effective_settings();
    println!("{}", summary_line(buddy));
    println!("  {}", buddy.description);
    println!(
        "  {} {}",
        "Personality:".bright_black(),
        buddy.personality.blurb()
    );
    if let Some(image) = &buddy.image {
        println!("  {} {}", "Image:".bright_black(), image);
    }
    if let Some(welcome) = &buddy.welcome_message {
        println!("  {} {}", "Welcome:".bright_black(), welcome);
    }
    println!(
        "  {} memory {}, creativity {}%",
        "Settings:".bright_black(),
        if settings.memory { "on" } else { "off" },
        settings.creativity_percent()
    );
    println!(
        "  {} {}",
        "Created:".bright_black(),
        buddy.created_at.format("%Y-%m-%d %H:%M")
    );
}
