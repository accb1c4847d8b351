//! One-shot CLI command handlers. Each talks straight to the backend and
//! prints plain text; the interactive editing experience lives in `tui`.

use std::io::Read;
use std::io::Write as _;
use std::path::Path;

use anyhow::{Context, Result, bail};

use crate::api::{ApiClient, RegisterRequest};
use crate::credentials::CredentialStore;

pub async fn login(
    api: &ApiClient,
    store: &CredentialStore,
    username: &str,
    password: Option<String>,
) -> Result<()> {
    let password = match password {
        Some(p) => p,
        None => prompt_line(&format!("Password for {username}: "))?,
    };
    let token = api
        .login(username, &password)
        .await
        .context("login failed")?;
    store.store(&token.access_token)?;
    println!("Logged in as {username}.");
    Ok(())
}

pub async fn register(
    api: &ApiClient,
    store: &CredentialStore,
    username: String,
    full_name: String,
    email: String,
    password: Option<String>,
) -> Result<()> {
    let password = match password {
        Some(p) => p,
        None => prompt_line("Choose a password: ")?,
    };
    let request = RegisterRequest {
        username: username.clone(),
        full_name,
        email,
        password,
    };
    let token = api
        .register(&request)
        .await
        .context("registration failed")?;
    store.store(&token.access_token)?;
    println!("Registered and logged in as {username}.");
    Ok(())
}

pub fn logout(store: &CredentialStore) -> Result<()> {
    store.clear()?;
    println!("Logged out.");
    Ok(())
}

pub async fn whoami(api: &ApiClient) -> Result<()> {
    let user = api.me().await?;
    let name = user.full_name.unwrap_or_default();
    let email = user.email.unwrap_or_default();
    println!("{} ({name} <{email}>)", user.username);
    Ok(())
}

pub async fn list_prompts(api: &ApiClient) -> Result<()> {
    let prompts = api.list_prompts().await?;
    if prompts.is_empty() {
        println!("No prompts yet. Create one with `promptdeck prompts create <name>`.");
        return Ok(());
    }
    println!("{:<6} {:<32} {}", "ID", "NAME", "CREATED");
    for p in prompts {
        println!(
            "{:<6} {:<32} {}",
            p.id,
            p.name,
            p.created_at.format("%Y-%m-%d %H:%M")
        );
    }
    Ok(())
}

pub async fn create_prompt(api: &ApiClient, name: &str) -> Result<()> {
    let prompt = api.create_prompt(name).await?;
    println!("Created prompt {} ({})", prompt.name, prompt.id);
    Ok(())
}

pub async fn rename_prompt(api: &ApiClient, prompt_id: i64, new_name: &str) -> Result<()> {
    let prompt = api.rename_prompt(prompt_id, new_name).await?;
    println!("Renamed prompt {} to {}", prompt.id, prompt.name);
    Ok(())
}

pub async fn delete_prompt(api: &ApiClient, prompt_id: i64, yes: bool) -> Result<()> {
    if !yes {
        let prompt = api.get_prompt(prompt_id).await?;
        let answer = prompt_line(&format!(
            "Delete prompt \"{}\" and all its versions? [y/N] ",
            prompt.name
        ))?;
        if !answer.eq_ignore_ascii_case("y") {
            println!("Aborted.");
            return Ok(());
        }
    }
    api.delete_prompt(prompt_id).await?;
    println!("Deleted prompt {prompt_id}.");
    Ok(())
}

pub async fn list_versions(api: &ApiClient, prompt_id: i64) -> Result<()> {
    let mut versions = api.list_versions(prompt_id).await?;
    if versions.is_empty() {
        println!("No versions yet for prompt {prompt_id}.");
        return Ok(());
    }
    // Most recent first, whatever order the backend returned.
    versions.sort_by(|a, b| b.number.cmp(&a.number));
    for v in versions {
        println!(
            "v{}  {}\n{}\n",
            v.number,
            v.created_at.format("%Y-%m-%d %H:%M"),
            indent(&v.system_prompt)
        );
    }
    Ok(())
}

pub async fn list_test_cases(api: &ApiClient, prompt_id: i64) -> Result<()> {
    let cases = api.list_test_cases(prompt_id).await?;
    if cases.is_empty() {
        println!("No test cases yet for prompt {prompt_id}.");
        return Ok(());
    }
    println!("{:<6} {}", "ID", "USER MESSAGE");
    for tc in cases {
        println!("{:<6} {}", tc.id, tc.user_message);
    }
    Ok(())
}

pub async fn add_test_case(api: &ApiClient, prompt_id: i64, message: &str) -> Result<()> {
    let tc = api.create_test_case(prompt_id, message).await?;
    println!("Added test case {} to prompt {}.", tc.id, prompt_id);
    Ok(())
}

pub async fn remove_test_case(api: &ApiClient, test_case_id: i64) -> Result<()> {
    api.delete_test_case(test_case_id).await?;
    println!("Deleted test case {test_case_id}.");
    Ok(())
}

/// Append a new version from a file or stdin.
pub async fn save_version(api: &ApiClient, prompt_id: i64, file: Option<&Path>) -> Result<()> {
    let text = read_text(file)?;
    let current = api.current_version(prompt_id).await?;
    if current.as_ref().is_some_and(|v| v.system_prompt == text) {
        bail!("text is identical to the current version; nothing to save");
    }
    let version = api.create_version(prompt_id, &text).await?;
    println!("Saved version {} of prompt {}.", version.number, prompt_id);
    Ok(())
}

/// Run a text snapshot against the prompt's test cases. Without `--file`
/// this runs the current version's text; with it, any draft file, saved or
/// not.
pub async fn run(api: &ApiClient, prompt_id: i64, file: Option<&Path>) -> Result<()> {
    let text = match file {
        Some(_) => read_text(file)?,
        None => api
            .current_version(prompt_id)
            .await?
            .map(|v| v.system_prompt)
            .context("prompt has no versions yet; pass --file to run a draft")?,
    };
    let results = api.run_prompt(prompt_id, &text).await?;
    for r in &results {
        println!("── test case {} ─────────────────────────", r.test_case_id);
        println!("user: {}", r.user_message);
        println!("{}\n", r.output);
    }
    println!("{} test case(s) ran.", results.len());
    Ok(())
}

fn read_text(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("failed to read prompt text from stdin")?;
            Ok(text)
        }
    }
}

fn prompt_line(message: &str) -> Result<String> {
    print!("{message}");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin()
        .read_line(&mut line)
        .context("failed to read from stdin")?;
    Ok(line.trim().to_string())
}

fn indent(text: &str) -> String {
    text.lines()
        .map(|l| format!("    {l}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indent_prefixes_every_line() {
        assert_eq!(indent("a\nb"), "    a\n    b");
    }

    #[test]
    fn indent_of_empty_text_is_empty() {
        assert_eq!(indent(""), "");
    }
}
