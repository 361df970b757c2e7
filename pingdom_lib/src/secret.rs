//! Secret backends for reading Pingdom credentials.
//!
//! Resolution is via secret backends only (1Password, Bitwarden, KeePassXC).
//! Each backend must yield all three values (username, password, application
//! key); a partial match counts as not configured.

use crate::credentials::Credentials;
use serde_json::Value;
use std::process::Command;

/// Read secret from a subprocess; stderr is discarded to avoid leaking into output.
fn run_cmd(args: &[&str]) -> Option<String> {
    run_cmd_with_env(args, &[])
}

/// Run a command with extra env vars (e.g. pass PINGDOM_BW_SESSION as BW_SESSION for `bw`).
fn run_cmd_with_env(args: &[&str], env_extra: &[(&str, &str)]) -> Option<String> {
    let (bin, rest) = args.split_first()?;
    let mut cmd = Command::new(bin);
    cmd.args(rest)
        .stdin(std::process::Stdio::null())
        .stdout(std::process::Stdio::piped())
        .stderr(std::process::Stdio::null());
    for (k, v) in env_extra {
        cmd.env(k, v);
    }
    let out = cmd.output().ok()?;
    if !out.status.success() {
        return None;
    }
    String::from_utf8(out.stdout)
        .ok()
        .map(|s| s.trim().to_string())
}

/// Non-empty, trimmed env var.
fn env_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn env_or(name: &str, default: &str) -> String {
    env_var(name).unwrap_or_else(|| default.to_string())
}

fn complete(username: String, password: String, app_key: String) -> Option<Credentials> {
    if username.is_empty() || password.is_empty() || app_key.is_empty() {
        return None;
    }
    Some(Credentials::new(username, password, app_key))
}

/// 1Password CLI (`op read`), one call per field.
///
/// Configure via:
/// - `PINGDOM_OP_ENTRY_PATH`: `op://Vault/Item`
/// - Or `PINGDOM_OP_VAULT` + `PINGDOM_OP_ITEM`
/// - Field names: `PINGDOM_OP_USERNAME_FIELD` (default `username`),
///   `PINGDOM_OP_PASSWORD_FIELD` (default `password`), `PINGDOM_OP_APP_KEY_FIELD` (default `app_key`)
pub fn one_password() -> Option<Credentials> {
    let base = match env_var("PINGDOM_OP_ENTRY_PATH") {
        Some(path) => path.trim_end_matches('/').to_string(),
        None => {
            let vault = env_var("PINGDOM_OP_VAULT")?;
            let item = env_var("PINGDOM_OP_ITEM")?;
            format!("op://{}/{}", vault, item)
        }
    };
    let read = |field_var: &str, default: &str| {
        let uri = format!("{}/{}", base, env_or(field_var, default));
        run_cmd(&["op", "read", &uri])
    };
    complete(
        read("PINGDOM_OP_USERNAME_FIELD", "username")?,
        read("PINGDOM_OP_PASSWORD_FIELD", "password")?,
        read("PINGDOM_OP_APP_KEY_FIELD", "app_key")?,
    )
}

/// Bitwarden CLI (`bw get item`).
///
/// Configure via:
/// - `PINGDOM_BW_ITEM_ID`: UUID of the login item (from `bw list items`)
/// - `PINGDOM_BW_SESSION`: optional session key (from `bw unlock --raw`) if vault is locked
/// - `PINGDOM_BW_APP_KEY_FIELD`: custom field holding the application key (default `App-Key`)
pub fn bitwarden() -> Option<Credentials> {
    let id = env_var("PINGDOM_BW_ITEM_ID")?;
    let env_extra: Vec<(String, String)> = env_var("PINGDOM_BW_SESSION")
        .map(|s| ("BW_SESSION".to_string(), s))
        .into_iter()
        .collect();
    let env_refs: Vec<(&str, &str)> = env_extra
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();
    let raw = run_cmd_with_env(&["bw", "get", "item", &id], &env_refs)?;
    let item: Value = serde_json::from_str(&raw).ok()?;
    credentials_from_bitwarden_item(&item, &env_or("PINGDOM_BW_APP_KEY_FIELD", "App-Key"))
}

/// Pull login username/password and the named custom field out of a `bw get item` document.
fn credentials_from_bitwarden_item(item: &Value, app_key_field: &str) -> Option<Credentials> {
    let login = item.get("login")?;
    let text = |v: Option<&Value>| v.and_then(Value::as_str).map(String::from);
    let app_key = item
        .get("fields")?
        .as_array()?
        .iter()
        .find(|f| f.get("name").and_then(Value::as_str) == Some(app_key_field))
        .and_then(|f| text(f.get("value")))?;
    complete(
        text(login.get("username"))?,
        text(login.get("password"))?,
        app_key,
    )
}

/// KeePassXC CLI (`keepassxc-cli show`), all three attributes in one call.
///
/// Configure via:
/// - `PINGDOM_KPXC_DB`: path to the .kdbx database file
/// - `PINGDOM_KPXC_ENTRY`: entry title or path (e.g. "Pingdom" or "Web/Pingdom")
/// - `PINGDOM_KPXC_APP_KEY_ATTRIBUTE`: attribute holding the application key (default `AppKey`)
pub fn keepassxc() -> Option<Credentials> {
    let db = env_var("PINGDOM_KPXC_DB")?;
    let entry = env_var("PINGDOM_KPXC_ENTRY")?;
    let app_key_attr = env_or("PINGDOM_KPXC_APP_KEY_ATTRIBUTE", "AppKey");
    let out = run_cmd(&[
        "keepassxc-cli",
        "show",
        "-a",
        "UserName",
        "-a",
        "Password",
        "-a",
        &app_key_attr,
        &db,
        &entry,
    ])?;
    // one attribute per line, in request order
    let mut lines = out.lines().map(|l| l.trim().to_string());
    complete(lines.next()?, lines.next()?, lines.next()?)
}
