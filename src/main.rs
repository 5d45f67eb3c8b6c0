//! CLI entry point.

mod cli;

use clap::Parser;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use wattline::api;
use wattline::config::load_config;
use wattline::gateway::Gateway;
use wattline::session::AuthSession;
use wattline::store::{default_store_path, CredentialStore};
use wattline::types::LoginCredentials;

#[tokio::main]
async fn main() {
    init_tracing();
    let args = cli::Args::parse();

    let mut config = match load_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: failed to load config: {err}");
            std::process::exit(1);
        }
    };
    if let Some(url) = &args.base_url {
        config.base_url = url.clone();
    }

    let Some(store_path) = config.credentials_path.clone().or_else(default_store_path) else {
        eprintln!("error: could not resolve a credential store location; set credentials_path in wattline.toml");
        std::process::exit(1);
    };
    let store = CredentialStore::new(store_path);
    let gateway = Gateway::with_timeout(
        &config.base_url,
        store.clone(),
        Duration::from_secs(config.request_timeout_secs),
    );
    gateway.set_session_expired_hook(Arc::new(|| {
        eprintln!("Session expired. Run `wattline login` to sign in again.");
    }));
    let session = AuthSession::new(gateway.clone(), store);
    session.restore();

    if let Err(message) = run_command(args.command, &gateway, &session).await {
        eprintln!("error: {message}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run_command(
    command: cli::Command,
    gateway: &Gateway,
    session: &AuthSession,
) -> Result<(), String> {
    match command {
        cli::Command::Login { mail } => run_login(mail, session).await,
        cli::Command::Logout => {
            session.teardown().await;
            println!("Signed out.");
            Ok(())
        }
        cli::Command::Whoami => {
            require_login(session)?;
            let profile = api::user::get_info(gateway)
                .await
                .map_err(|err| err.to_string())?;
            println!(
                "{} <{}>",
                profile.real_name.as_deref().unwrap_or("(unnamed)"),
                profile.mail
            );
            println!("role:   {}", profile.role.as_str());
            if let Some(region) = &profile.region_name {
                println!("region: {region}");
            }
            if !profile.status.is_empty() {
                println!("status: {}", profile.status);
            }
            Ok(())
        }
        cli::Command::Bills { month, status, page } => {
            require_login(session)?;
            let query = api::bill::BillQuery {
                page,
                per_page: None,
                bill_month: month,
                status,
            };
            let page = api::bill::query(gateway, &query)
                .await
                .map_err(|err| err.to_string())?;
            if page.bills.is_empty() {
                println!("No bills.");
                return Ok(());
            }
            for bill in &page.bills {
                println!(
                    "#{:<8} {}  {:>9.2} kWh  {:>9.2} CNY  {}",
                    bill.bill_id, bill.bill_month, bill.total_usage, bill.bill_amount, bill.status
                );
            }
            println!(
                "page {}/{} ({} total)",
                page.pagination.page, page.pagination.pages, page.pagination.total
            );
            Ok(())
        }
        cli::Command::Meters => {
            require_login(session)?;
            let owned = api::user::meters(gateway)
                .await
                .map_err(|err| err.to_string())?;
            if owned.meters.is_empty() {
                println!("No meters bound to this account.");
                return Ok(());
            }
            for meter in &owned.meters {
                println!(
                    "#{:<8} {}  {}  {}",
                    meter.meter_id, meter.meter_code, meter.status, meter.install_address
                );
            }
            Ok(())
        }
        cli::Command::Notifications { unread } => {
            require_login(session)?;
            let query = api::notification::NotificationQuery {
                is_unread_only: unread.then_some(true),
                ..Default::default()
            };
            let value = api::notification::query(gateway, &query)
                .await
                .map_err(|err| err.to_string())?;
            let text = serde_json::to_string_pretty(&value).map_err(|err| err.to_string())?;
            println!("{text}");
            Ok(())
        }
    }
}

fn require_login(session: &AuthSession) -> Result<(), String> {
    if session.is_logged_in() {
        Ok(())
    } else {
        Err("not signed in; run `wattline login` first".to_string())
    }
}

async fn run_login(mail: Option<String>, session: &AuthSession) -> Result<(), String> {
    let mail = match mail {
        Some(mail) => mail,
        None => prompt_line("Mail: ")?,
    };
    let password = rpassword::prompt_password("Password: ")
        .map_err(|err| format!("failed to read password: {err}"))?;

    let credentials = LoginCredentials { mail, password };
    let data = session
        .sign_in(&credentials)
        .await
        .map_err(|err| err.to_string())?;
    match data.user_info {
        Some(user) => println!("Signed in as {} ({}).", user.mail, user.role.as_str()),
        None => println!("Signed in."),
    }
    Ok(())
}

fn prompt_line(prompt: &str) -> Result<String, String> {
    print!("{prompt}");
    std::io::stdout()
        .flush()
        .map_err(|err| format!("failed to write prompt: {err}"))?;
    let mut line = String::new();
    std::io::stdin()
        .read_line(&mut line)
        .map_err(|err| format!("failed to read input: {err}"))?;
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Err("mail address is required".to_string());
    }
    Ok(trimmed.to_string())
}
