use std::io::{self, BufRead, Write};

use clap::Subcommand;
use serde_json::{json, Value};

use crate::cli::utils::{field, output_success, output_value};
use crate::cli::OutputFormat;
use crate::client::{ApiClient, AuthStore};

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Login as a team member")]
    Login {
        #[arg(help = "Email")]
        email: String,
        #[arg(long, env = "INNEXAR_PASSWORD", help = "Password (read from stdin if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Forget the stored session")]
    Logout,

    #[command(about = "Check the stored session against the server")]
    Status,

    #[command(about = "Show the user stored with the session")]
    Whoami,
}

pub async fn handle(cmd: AuthCommands, base_url: &str, output_format: OutputFormat) -> anyhow::Result<()> {
    let mut store = AuthStore::open_default()?;
    let client = ApiClient::new(base_url)?;

    match cmd {
        AuthCommands::Login { email, password } => {
            let password = match password {
                Some(password) => password,
                None => read_password()?,
            };
            store.login(&client, &email, &password).await?;
            let user = store.user().cloned().unwrap_or(Value::Null);
            output_success(
                output_format,
                &format!("Logged in as {}", field(&user, "email")),
                Some(json!({ "user": user })),
            )
        }
        AuthCommands::Logout => {
            store.logout()?;
            output_success(output_format, "Logged out", None)
        }
        AuthCommands::Status => {
            let authenticated = store.check_auth(&client).await?;
            let user = store.user().cloned().unwrap_or(Value::Null);
            output_value(
                output_format,
                &json!({ "authenticated": authenticated, "server": base_url, "user": user }),
                |_| {
                    if authenticated {
                        println!("Authenticated as {} on {}", field(&user, "email"), base_url);
                    } else {
                        println!("Not authenticated");
                    }
                },
            )
        }
        AuthCommands::Whoami => {
            let user = store.user().cloned().unwrap_or(Value::Null);
            output_value(output_format, &user, |user| {
                if user.is_null() {
                    println!("Not logged in");
                } else {
                    println!("{} <{}> {}", field(user, "name"), field(user, "email"), field(user, "role"));
                }
            })
        }
    }
}

fn read_password() -> anyhow::Result<String> {
    eprint!("Password: ");
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
