//! CLI auth command handlers.

use std::io::Write;

use crate::auth::{AuthService, LoginOutcome, RegisterRequest};
use crate::client::ApiClient;

use super::{LoginArgs, RegisterArgs};

type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Handle `uruti auth login <email>`.
pub async fn handle_login(client: ApiClient, args: LoginArgs) -> CliResult {
    let auth = AuthService::new(client);
    let password = match args.password {
        Some(password) => password,
        None => prompt("Password")?,
    };

    match auth.login(&args.email, &password).await? {
        LoginOutcome::Authenticated(session) => {
            println!("✅ Logged in as {}", args.email);
            if let Some(tenant) = session.tenant_id {
                println!("   Tenant: {tenant}");
            }
        }
        LoginOutcome::MfaRequired { mfa_token } => {
            let code = match args.mfa_code {
                Some(code) => code,
                None => prompt("MFA code")?,
            };
            auth.verify_mfa(&mfa_token, code.trim()).await?;
            println!("✅ Logged in as {} (MFA verified)", args.email);
        }
    }
    Ok(())
}

/// Handle `uruti auth register <email>`.
pub async fn handle_register(client: ApiClient, args: RegisterArgs) -> CliResult {
    let auth = AuthService::new(client);
    let password = match args.password {
        Some(password) => password,
        None => prompt("Password")?,
    };
    let request = RegisterRequest {
        email: args.email.clone(),
        password,
        name: args.name,
        company_name: args.company,
    };

    match auth.register(&request).await? {
        LoginOutcome::Authenticated(_) => println!("✅ Registered and logged in as {}", args.email),
        LoginOutcome::MfaRequired { .. } => {
            println!("✅ Registered {}; log in to complete MFA setup", args.email)
        }
    }
    Ok(())
}

/// Handle `uruti auth demo`.
pub async fn handle_demo(client: ApiClient) -> CliResult {
    let auth = AuthService::new(client);
    let session = auth.demo().await?;
    let subject = session
        .token
        .claims()
        .and_then(|claims| claims.sub)
        .unwrap_or_else(|| auth.client().config().demo_identity.sub.clone());
    println!("✅ Demo session started for {subject}");
    Ok(())
}

/// Handle `uruti auth status`.
pub async fn handle_status(client: ApiClient) -> CliResult {
    let status = AuthService::new(client).status();

    println!("🔐 Session Status\n");
    let login = match (status.logged_in, status.expires_at) {
        (false, _) => "❌ Not logged in".to_string(),
        (true, Some(expires)) if status.is_expired() => {
            format!("⚠️  Token expired {} (will refresh on next request)", expires.format("%Y-%m-%d %H:%M"))
        }
        (true, Some(expires)) => format!("✅ Logged in (expires {})", expires.format("%Y-%m-%d %H:%M")),
        (true, None) => "✅ Logged in".to_string(),
    };
    println!("  Session: {login}");
    if let Some(subject) = status.subject {
        println!("  Subject: {subject}");
    }
    println!("  Tenant: {}", status.tenant_id);
    println!("  Company: {}", status.company_id);
    println!(
        "  Refresh token: {}",
        if status.has_refresh_token { "✅ Stored" } else { "❌ None" }
    );
    Ok(())
}

/// Handle `uruti auth logout`.
pub async fn handle_logout(client: ApiClient) -> CliResult {
    AuthService::new(client).logout().await?;
    println!("✅ Logged out");
    Ok(())
}

fn prompt(label: &str) -> Result<String, std::io::Error> {
    print!("{label}: ");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim_end_matches(&['\r', '\n'][..]).to_string())
}
