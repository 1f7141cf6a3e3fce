use burpees_core::{AuthProvider, Database, LocalAuth};
use clap::Subcommand;

#[derive(Subcommand)]
pub enum AuthAction {
    /// Sign in with a display name
    Login {
        name: String,
    },
    /// Sign out
    Logout,
    /// Show who is signed in
    Status {
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: AuthAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let mut auth = LocalAuth::new(&db);
    auth.refresh()?;

    match action {
        AuthAction::Login { name } => {
            auth.login(&name)?;
            println!("signed in as {}", auth.display_name().unwrap_or_default());
        }
        AuthAction::Logout => {
            auth.logout()?;
            println!("signed out");
        }
        AuthAction::Status { json } => {
            if json {
                let status = serde_json::json!({
                    "state": auth.state(),
                    "display_name": auth.display_name(),
                });
                println!("{}", serde_json::to_string_pretty(&status)?);
            } else {
                match auth.display_name() {
                    Some(name) => println!("{} as {name}", auth.state()),
                    None => println!("{}", auth.state()),
                }
            }
        }
    }
    Ok(())
}
