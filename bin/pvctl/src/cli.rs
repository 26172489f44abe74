//! Command-line front end for the admin console.
//!
//! # Usage
//!
//! ```bash
//! # Sign in and print a token to export as PV_ACCESS_TOKEN
//! pvctl login -e admin@clinic.org
//!
//! # Second page of blocked users, newest first
//! pvctl users list --status blocked --page 2
//!
//! # Promote a user
//! pvctl users update 42 --role admin
//!
//! # Finish a password reset from the emailed link
//! pvctl reset-password -e amy@clinic.org -t <token> -p 'N3w!pass'
//! ```

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use pv_client::{AdminConsole, ApiClient, ClientConfig, auth};
use pv_core::{
    AppContext, AuthenticatedUser, Role, SortDirection, SortField, SortSpec, UserId,
    display::FlashMessage,
    forms::{CreateUserForm, EditUserForm},
    password::{self, ResetPasswordForm},
    table::{RoleFilter, StatusFilter},
};

use crate::render;

/// Pharmacovigilance console administration.
#[derive(Parser, Debug)]
#[command(
    name = "pvctl",
    version,
    about = "Manage users of the signal-detection console",
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in and print the session token.
    Login {
        #[arg(short, long, env = "PV_EMAIL")]
        email: String,

        #[arg(short, long, env = "PV_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Email password-reset instructions.
    ForgotPassword {
        /// Address of the account.
        email: String,
    },

    /// Set a new password using the token from a reset link.
    ResetPassword {
        #[arg(short, long)]
        email: String,

        /// `token` parameter of the reset link.
        #[arg(short, long)]
        token: Option<String>,

        /// New password.
        #[arg(short, long)]
        password: String,

        /// Confirmation; defaults to the new password.
        #[arg(short, long)]
        confirm: Option<String>,
    },

    /// Manage console users (admin only).
    Users {
        #[command(subcommand)]
        command: UsersCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum UsersCommand {
    /// Show one page of the user table.
    List {
        /// Case-insensitive match on username or email.
        #[arg(short, long, default_value = "")]
        search: String,

        /// all, admin or normal.
        #[arg(short, long, default_value = "all")]
        role: RoleFilter,

        /// all, active or blocked.
        #[arg(long, default_value = "all")]
        status: StatusFilter,

        /// username, user_role, created_at or lastlogged_in. Newest
        /// accounts first when omitted.
        #[arg(long)]
        sort: Option<SortField>,

        /// Sort the chosen column descending.
        #[arg(long, requires = "sort")]
        desc: bool,

        #[arg(short, long, default_value_t = 1)]
        page: usize,
    },

    /// Create a user; the backend emails the credentials.
    Create {
        #[arg(short, long)]
        email: String,

        #[arg(short, long, default_value = "normal")]
        role: Role,
    },

    /// Change a user's username, role or password.
    Update {
        id: String,

        #[arg(short, long)]
        username: Option<String>,

        #[arg(short, long)]
        role: Option<Role>,

        #[arg(short, long)]
        password: Option<String>,
    },

    /// Clear a user's failed login attempts.
    Unblock { id: String },

    /// Delete a user.
    Delete { id: String },
}

pub async fn run(cli: Cli, config: &ClientConfig) -> anyhow::Result<()> {
    let client = ApiClient::new(config)?;

    match cli.command {
        Command::Login { email, password } => login(&client, &email, &password).await,
        Command::ForgotPassword { email } => {
            report(auth::request_password_reset(&client, &email).await)
        }
        Command::ResetPassword {
            email,
            token,
            password,
            confirm,
        } => {
            let form = ResetPasswordForm {
                email,
                confirm_password: confirm.unwrap_or_else(|| password.clone()),
                new_password: password,
                token,
            };
            reset_password(&client, &form).await
        }
        Command::Users { command } => {
            let console = open_console(config, client).await?;
            users(&console, command).await
        }
    }
}

fn report(flash: FlashMessage) -> anyhow::Result<()> {
    if flash.is_error() {
        bail!(flash.message);
    }
    println!("{flash}");
    Ok(())
}

/// Print the console's outcome message for the last operation.
fn report_console(console: &AdminConsole, ok: bool) -> anyhow::Result<()> {
    if ok {
        if let Some(message) = console.success() {
            println!("{message}");
        }
        return Ok(());
    }
    match console.error() {
        Some(message) => bail!(message),
        None => bail!("Another change is still being submitted"),
    }
}

async fn login(client: &ApiClient, email: &str, password: &str) -> anyhow::Result<()> {
    let mut ctx = AppContext::default();
    report(auth::login(client, &mut ctx, email, password).await)?;

    if let Some(user) = ctx.user() {
        println!("Signed in as {} ({})", user.username, user.role);
        println!("export PV_ACCESS_TOKEN={}", user.token);
    }
    Ok(())
}

async fn reset_password(client: &ApiClient, form: &ResetPasswordForm) -> anyhow::Result<()> {
    let check = form.check();
    for (label, met) in check.requirements() {
        println!("[{}] {label}", if met { "x" } else { " " });
    }
    if !check.is_valid() {
        bail!(password::REQUIREMENTS_NOT_MET);
    }

    report(auth::reset_password(client, form).await)
}

/// Sign in as an admin with the configured token or credentials.
async fn open_console(config: &ClientConfig, client: ApiClient) -> anyhow::Result<AdminConsole> {
    let mut ctx = AppContext::default();

    if let Some(token) = config.access_token.as_deref().filter(|t| !t.is_empty()) {
        // The backend checks the token's role on every admin route.
        ctx.login(AuthenticatedUser {
            id: UserId::Number(0),
            username: "token".to_string(),
            role: Role::Admin,
            token: token.to_string(),
        });
    } else if let Some((email, password)) = config.credentials() {
        let flash = auth::login(&client, &mut ctx, email, password).await;
        if flash.is_error() {
            bail!(flash.message);
        }
    } else {
        bail!("Set PV_ACCESS_TOKEN, or PV_EMAIL and PV_PASSWORD, to manage users");
    }

    Ok(AdminConsole::new(&ctx, client)?)
}

async fn users(console: &AdminConsole, command: UsersCommand) -> anyhow::Result<()> {
    match command {
        UsersCommand::List {
            search,
            role,
            status,
            sort,
            desc,
            page,
        } => {
            console.load_users().await;
            if let Some(error) = console.error() {
                bail!(error);
            }

            console.update_view(|view| {
                view.set_search(search);
                view.set_role_filter(role);
                view.set_status_filter(status);
                if let Some(field) = sort {
                    let direction = if desc {
                        SortDirection::Descending
                    } else {
                        SortDirection::Ascending
                    };
                    view.sort = SortSpec::new(field, direction);
                }
                view.set_page(page);
            });

            println!("{}", render::user_table(&console.page()));
            Ok(())
        }
        UsersCommand::Create { email, role } => {
            let ok = console.create_user(&CreateUserForm { email, role }).await;
            report_console(console, ok)
        }
        UsersCommand::Update {
            id,
            username,
            role,
            password,
        } => {
            let id = UserId::from(id.as_str());
            console.load_users().await;
            let record = console
                .find_user(&id)
                .with_context(|| format!("No user with id {id}"))?;

            let mut form = EditUserForm::from_record(&record);
            if let Some(username) = username {
                form.username = username;
            }
            if let Some(role) = role {
                form.role = role;
            }
            if let Some(password) = password {
                form.password = password;
            }

            let ok = console.update_user(&id, &form).await;
            report_console(console, ok)
        }
        UsersCommand::Unblock { id } => {
            let ok = console.unblock_user(&UserId::from(id.as_str())).await;
            report_console(console, ok)
        }
        UsersCommand::Delete { id } => {
            let ok = console.delete_user(&UserId::from(id.as_str())).await;
            report_console(console, ok)
        }
    }
}
