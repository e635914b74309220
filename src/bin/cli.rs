use clap::{Parser, Subcommand};
use postboard::{
    config::Settings,
    db,
    repositories::{PostRepository, SqlitePostRepository, SqliteUserRepository},
    services::user_service::{CreateUserRequest, UpdatePasswordRequest, UserService},
};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "postboard-cli")]
#[command(about = "CLI tool for administering a postboard database", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending schema migrations and exit
    Migrate,

    /// User management commands
    User {
        #[command(subcommand)]
        command: UserCommands,
    },

    /// Post inspection commands
    Post {
        #[command(subcommand)]
        command: PostCommands,
    },
}

#[derive(Subcommand)]
enum UserCommands {
    /// Create a new user
    Create {
        /// Email address
        #[arg(short, long)]
        email: String,

        /// Password (will prompt if not provided)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// List all users
    List {
        /// Maximum number of users to display
        #[arg(short, long, default_value_t = 100)]
        limit: i64,

        /// Offset for pagination
        #[arg(short = 'o', long, default_value_t = 0)]
        offset: i64,
    },

    /// Set a new password for a user
    SetPassword {
        /// Email address of the user
        #[arg(short, long)]
        email: String,

        /// New password (will prompt if not provided)
        #[arg(short, long)]
        password: Option<String>,
    },
}

#[derive(Subcommand)]
enum PostCommands {
    /// List posts with their vote counts
    List {
        /// Only show posts whose title contains this text
        #[arg(short, long, default_value = "")]
        search: String,

        /// Maximum number of posts to display
        #[arg(short, long, default_value_t = 20)]
        limit: i64,

        /// Number of posts to skip
        #[arg(long, default_value_t = 0)]
        skip: i64,
    },
}

fn get_password(prompt: &str) -> Result<String, Box<dyn std::error::Error>> {
    use std::io::{self, Write};
    print!("{}: ", prompt);
    io::stdout().flush()?;

    Ok(rpassword::read_password()?)
}

fn confirm_password(prompt: &str) -> Result<(String, String), Box<dyn std::error::Error>> {
    let password = get_password(prompt)?;
    let confirm = get_password("Confirm password")?;
    Ok((password, confirm))
}

/// Use the given password, or prompt twice and insist both entries match.
fn resolve_password(
    password: Option<String>,
    prompt: &str,
) -> Result<String, Box<dyn std::error::Error>> {
    if let Some(pw) = password {
        return Ok(pw);
    }

    let (password, password_confirm) = confirm_password(prompt)?;
    if password != password_confirm {
        eprintln!("❌ Passwords do not match");
        std::process::exit(1);
    }
    Ok(password)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "postboard=warn".into()),
        )
        .init();

    // Parse CLI arguments
    let cli = Cli::parse();
    let settings = Settings::from_env()?;

    // Connect to database
    let pool = db::create_pool(&settings.database_url).await?;

    // Run migrations
    db::run_migrations(&pool).await?;

    let user_repository = Arc::new(SqliteUserRepository::new(pool.clone()));
    let user_service = UserService::new(user_repository);

    match cli.command {
        Commands::Migrate => {
            println!("✅ Database at '{}' is up to date", settings.database_url);
        }

        Commands::User { command } => match command {
            UserCommands::Create { email, password } => {
                let password = resolve_password(password, "Password")?;

                match user_service
                    .create_user(CreateUserRequest {
                        email: email.clone(),
                        password,
                    })
                    .await
                {
                    Ok(user) => {
                        println!("✅ User created successfully!");
                        println!("  ID: {}", user.id);
                        println!("  Email: {}", user.email);
                    }
                    Err(err) => {
                        eprintln!("❌ Failed to create user: {}", err);
                        std::process::exit(1);
                    }
                }
            }

            UserCommands::List { limit, offset } => {
                match user_service.list_users(Some(limit), Some(offset)).await {
                    Ok(users) => {
                        if users.is_empty() {
                            println!("No users found.");
                        } else {
                            println!("{:<5} {:<40} {:<25}", "ID", "Email", "Created");
                            println!("{}", "-".repeat(70));
                            for user in users {
                                println!(
                                    "{:<5} {:<40} {:<25}",
                                    user.id,
                                    user.email,
                                    user.created_at.to_rfc3339()
                                );
                            }
                        }
                    }
                    Err(err) => {
                        eprintln!("❌ Failed to list users: {}", err);
                        std::process::exit(1);
                    }
                }
            }

            UserCommands::SetPassword { email, password } => {
                match user_service.find_user_by_email(&email).await {
                    Ok(Some(user)) => {
                        let new_password = resolve_password(password, "New password")?;

                        let request = UpdatePasswordRequest {
                            user_id: user.id,
                            new_password,
                        };

                        match user_service.update_password(request).await {
                            Ok(()) => {
                                println!("✅ Password updated successfully for '{}'!", email);
                            }
                            Err(err) => {
                                eprintln!("❌ Failed to update password: {}", err);
                                std::process::exit(1);
                            }
                        }
                    }
                    Ok(None) => {
                        eprintln!("❌ User '{}' not found", email);
                        std::process::exit(1);
                    }
                    Err(err) => {
                        eprintln!("❌ Failed to find user: {}", err);
                        std::process::exit(1);
                    }
                }
            }
        },

        Commands::Post { command } => match command {
            PostCommands::List {
                search,
                limit,
                skip,
            } => {
                if limit < 0 || skip < 0 {
                    eprintln!("❌ --limit and --skip must not be negative");
                    std::process::exit(1);
                }

                let post_repository = SqlitePostRepository::new(pool.clone());
                match post_repository.list_with_votes(&search, limit, skip).await {
                    Ok(posts) => {
                        if posts.is_empty() {
                            println!("No posts found.");
                        } else {
                            println!(
                                "{:<5} {:<40} {:<30} {:<6} {:<9}",
                                "ID", "Title", "Owner", "Votes", "Published"
                            );
                            println!("{}", "-".repeat(94));
                            for entry in posts {
                                println!(
                                    "{:<5} {:<40} {:<30} {:<6} {:<9}",
                                    entry.post.id,
                                    entry.post.title,
                                    entry.post.owner.email,
                                    entry.votes,
                                    if entry.post.published { "Yes" } else { "No" }
                                );
                            }
                        }
                    }
                    Err(err) => {
                        eprintln!("❌ Failed to list posts: {}", err);
                        std::process::exit(1);
                    }
                }
            }
        },
    }

    Ok(())
}
