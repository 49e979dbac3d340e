//! Account commands

use super::{report, spinner, App};
use anyhow::Result;
use shelfmark_core::Credentials;

/// Create an account; does not log in
pub async fn register(app: &App, username: &str, password: &str) -> Result<()> {
    let credentials = Credentials::new(username, password);

    let pb = spinner("Registering...");
    let result = app.session.register(&app.api, &credentials).await;
    pb.finish_and_clear();

    let message = result.map_err(|e| report(e, "Registration failed"))?;
    println!("{}", message);
    Ok(())
}

pub async fn login(app: &mut App, username: &str, password: &str) -> Result<()> {
    let credentials = Credentials::new(username, password);

    let pb = spinner("Logging in...");
    let result = app.session.login(&mut app.api, &credentials).await;
    pb.finish_and_clear();

    result.map_err(|e| report(e, "Login failed. Please check your credentials."))?;
    println!("Logged in as {}", username);
    Ok(())
}

pub async fn logout(app: &mut App) -> Result<()> {
    app.session
        .logout(&mut app.api)
        .await
        .map_err(|e| report(e, "Logout failed"))?;
    println!("Logged out");
    Ok(())
}

/// Report whether a token is stored; the token is never printed
pub fn whoami(app: &App) -> Result<()> {
    if app.session.is_authenticated() {
        println!(
            "Logged in (token stored at {})",
            app.session_path.display()
        );
    } else {
        println!("Not logged in");
    }
    Ok(())
}
