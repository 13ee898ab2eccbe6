//! Registration, login and session command handlers

use crate::security::evaluate_strength;
use crate::services::{AccountError, AccountService};

pub async fn cmd_register(
    accounts: &dyn AccountService,
    email: &str,
    password: &str,
    name: &str,
) -> anyhow::Result<()> {
    match accounts.register(email, password, name).await {
        Ok(user) => {
            println!("✓ Registered {} <{}>", user.name, user.email);
            println!("Sign in with: portal login {} <password>", user.email);
            Ok(())
        }
        Err(AccountError::DuplicateAccount) => {
            println!("An account with email {email} already exists.");
            Ok(())
        }
        Err(AccountError::WeakPassword(hint)) => {
            println!("Password rejected: {hint}");
            println!("Passwords need 8+ characters, an uppercase letter and a number.");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn cmd_login(
    accounts: &dyn AccountService,
    email: &str,
    password: &str,
) -> anyhow::Result<()> {
    match accounts.authenticate(email, password).await {
        Ok(user) => {
            let session = accounts.start_session(&user).await?;
            println!("✓ Signed in as {} ({})", session.name, session.role);
            Ok(())
        }
        // Unknown email and wrong password read the same to the user.
        Err(AccountError::NotFound | AccountError::InvalidCredentials) => {
            println!("Invalid email or password.");
            Ok(())
        }
        Err(AccountError::AccountDisabled) => {
            println!("This account has been disabled. Contact an administrator.");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn cmd_logout(accounts: &dyn AccountService) -> anyhow::Result<()> {
    match accounts.end_session().await? {
        Some(session) => println!("✓ Signed out {}", session.email),
        None => println!("Not signed in."),
    }
    Ok(())
}

pub async fn cmd_whoami(accounts: &dyn AccountService) -> anyhow::Result<()> {
    match accounts.current_session().await? {
        Some(session) => println!("{} <{}> [{}]", session.name, session.email, session.role),
        None => println!("Not signed in."),
    }
    Ok(())
}

pub fn cmd_strength(password: &str) {
    let strength = evaluate_strength(password);
    println!(
        "Score: {}/4 | {} | {}",
        strength.score,
        strength.message,
        if strength.valid { "accepted" } else { "rejected" }
    );
}
