use super::prompts;
use crate::app::App;
use crate::output::{new_table, Output};
use cineo_core::{IdentityProvider, ProfileUpdate, Registration};
use color_eyre::Result;
use comfy_table::Cell;
use serde_json::json;

pub async fn run_register(
    app: &mut App,
    username: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    output: &Output,
) -> Result<()> {
    let registration = Registration {
        username: prompts::value_or_prompt(username, "Username")?,
        email: prompts::value_or_prompt(email, "Email")?,
        phone: match phone {
            Some(phone) => phone,
            None => prompts::prompt_string("Phone", Some("+994"))?,
        },
        password: prompts::prompt_new_password("Password")?,
    };
    let user = app.accounts().register(registration).await?;
    app.remember(&user)?;
    output.success(format!("Welcome, {}! You are signed in.", user.username));
    Ok(())
}

pub async fn run_login(app: &mut App, username: Option<String>, output: &Output) -> Result<()> {
    let username = prompts::value_or_prompt(username, "Username")?;
    let password = prompts::prompt_password("Password")?;
    let user = app.accounts().login(&username, &password).await?;
    app.remember(&user)?;
    output.success(format!("Signed in as {}", user.username));
    Ok(())
}

pub async fn run_logout(app: &mut App, output: &Output) -> Result<()> {
    match app.current_user().await? {
        Some(user) => {
            app.forget()?;
            output.success(format!("Signed out {}", user.username));
        }
        None => {
            app.forget()?;
            output.info("Nobody is signed in");
        }
    }
    Ok(())
}

pub async fn run_password(app: &App, output: &Output) -> Result<()> {
    let user = app.require_user().await?;
    let current = prompts::prompt_password("Current password")?;
    let new_password = prompts::prompt_new_password("New password")?;
    app.accounts().change_password(&user.id, &current, &new_password).await?;
    output.success("Password changed");
    Ok(())
}

pub async fn run_list_users(app: &App, output: &Output) -> Result<()> {
    let actor = app.require_user().await?;
    let users = app.accounts().list_users(&actor).await?;

    if !output.is_human() {
        let rows: Vec<_> = users
            .iter()
            .map(|u| json!({
                "id": u.id,
                "username": u.username,
                "email": u.email,
                "phone": u.phone,
                "role": u.role,
                "tracked": u.watch_history.len(),
            }))
            .collect();
        output.json(&json!(rows));
        return Ok(());
    }

    let mut table = new_table(&["ID", "Username", "Email", "Phone", "Role", "Tracked"]);
    for user in &users {
        table.add_row(vec![
            Cell::new(&user.id),
            Cell::new(&user.username),
            Cell::new(&user.email),
            Cell::new(&user.phone),
            Cell::new(if user.is_admin() { "admin" } else { "user" }),
            Cell::new(user.watch_history.len()),
        ]);
    }
    output.table(&table);
    Ok(())
}

pub async fn run_edit_user(
    app: &App,
    user_id: &str,
    update: ProfileUpdate,
    reset_password: bool,
    output: &Output,
) -> Result<()> {
    let actor = app.require_user().await?;
    let mut update = update;
    if reset_password {
        update.password = Some(prompts::prompt_new_password("New password")?);
    }
    let user = app.accounts().update_user(&actor, user_id, update).await?;
    output.success(format!("Updated {}", user.username));
    Ok(())
}
