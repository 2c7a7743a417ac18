//! Messaging database user cleanup tool.
//!
//! Deletes a user by email, relying on the schema's `ON DELETE CASCADE`
//! foreign keys to remove their threads, conversations, and messages.
//! Used to resolve UNIQUE constraint errors when a user's Firebase UID
//! changes and the account needs to re-register.
//!
//! ```text
//! clean-user alice@example.com     # delete a specific user (with prompt)
//! clean-user --list                # list all users
//! ```

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use clap::{CommandFactory, Parser};

use messaging_admin::cleanup::{self, RelatedCounts, UserRecord};
use messaging_admin::{db, Result};

#[derive(Parser, Debug)]
#[command(
    name = "clean-user",
    version,
    about = "Delete a user (and, via cascade, their data) from the messaging database"
)]
struct Args {
    /// Email of the user to delete
    email: Option<String>,

    /// List all users instead of deleting
    #[arg(long)]
    list: bool,

    /// Skip the interactive confirmation prompt
    #[arg(long)]
    yes: bool,

    /// Path to the messaging database
    #[arg(long, default_value = db::DEFAULT_DB_PATH, env = "MESSAGING_DB")]
    db: String,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();

    println!("{}", "=".repeat(78));
    println!("Messaging Database User Cleanup Tool");
    println!("{}", "=".repeat(78));

    if args.list {
        if let Err(e) = list_users(&args.db) {
            eprintln!("Error: {}", e);
        }
        return ExitCode::SUCCESS;
    }

    let Some(email) = args.email else {
        // Mirror the usage text for the bare invocation, then fail
        println!();
        let _ = Args::command().print_help();
        return ExitCode::FAILURE;
    };

    if let Err(e) = clean_user(&args.db, &email, args.yes) {
        eprintln!("\nError: {}", e);
    }
    ExitCode::SUCCESS
}

/// Delete `email` from the database after an interactive confirmation.
fn clean_user(db_path: &str, email: &str, skip_confirm: bool) -> Result<()> {
    let mut conn = db::open(db_path)?;

    let Some(user) = cleanup::find_user(&conn, email)? else {
        println!("\nUser not found: {}", email);
        return Ok(());
    };

    print_user(&user);

    let counts = cleanup::related_counts(&conn, &user.firebase_uid)?;
    println!("\nRelated data:");
    println!("   Threads:       {}", counts.threads);
    println!("   Conversations: {}", counts.conversations);
    println!("   Messages:      {}", counts.messages);

    if !skip_confirm && !confirm(email)? {
        println!("Deletion cancelled");
        return Ok(());
    }

    cleanup::delete_user(&mut conn, email)?;
    print_summary(email, counts);
    Ok(())
}

/// Prompt for confirmation; only the exact token "yes" authorizes deletion.
fn confirm(email: &str) -> Result<bool> {
    print!(
        "\nDelete user '{}' and all related data? (yes/no): ",
        email
    );
    io::stdout().flush()?;

    let mut response = String::new();
    io::stdin().lock().read_line(&mut response)?;
    Ok(cleanup::is_affirmative(&response))
}

fn print_user(user: &UserRecord) {
    println!("\nFound user:");
    println!("   Firebase UID: {}", user.firebase_uid);
    println!("   Email:        {}", user.email);
    println!(
        "   Display Name: {}",
        user.display_name.as_deref().unwrap_or("-")
    );
    println!("   Role:         {}", user.role);
}

fn print_summary(email: &str, counts: RelatedCounts) {
    // Cascade counts are the pre-deletion counts; the cascade itself is
    // the engine's work and is not re-checked here.
    println!("\nSuccessfully deleted user: {}", email);
    println!("   - User record deleted");
    println!("   - {} threads deleted (cascaded)", counts.threads);
    println!("   - {} conversations deleted (cascaded)", counts.conversations);
    println!("   - {} messages deleted (cascaded)", counts.messages);
}

/// Print every user in the database, ordered by email.
fn list_users(db_path: &str) -> Result<()> {
    let conn = db::open(db_path)?;
    let users = cleanup::list_users(&conn)?;

    if users.is_empty() {
        println!("\nNo users found in database");
        return Ok(());
    }

    println!("\nUsers in database ({}):", users.len());
    println!("{}", "-".repeat(78));
    for user in &users {
        println!("Email: {}", user.email);
        println!("  Firebase UID: {}", user.firebase_uid);
        println!(
            "  Display Name: {}",
            user.display_name.as_deref().unwrap_or("-")
        );
        println!("  Role:         {}", user.role);
        println!("  Last Seen:    {}", user.last_seen.as_deref().unwrap_or("-"));
        println!("{}", "-".repeat(78));
    }
    Ok(())
}
