//! The `quizrun login` command.

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;

use quizrun_client::config::{load_config_from, save_credentials, writable_config_path};
use quizrun_client::{HttpQuizService, StaticCredentials};
use quizrun_core::traits::Role;
use quizrun_core::ServiceError;

use super::explain;

pub async fn execute(
    username: String,
    password: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let password = match password {
        Some(password) => password,
        None => read_password(std::io::stdin().lock(), std::io::stderr())?,
    };

    let anonymous = Arc::new(StaticCredentials::new(None, Role::Student));
    let service = HttpQuizService::new(
        Some(config.base_url.clone()),
        config.timeout_secs,
        anonymous,
    )?;
    let grant = service
        .login(&username, &password)
        .await
        .map_err(|e| match e {
            ServiceError::FetchError { status: 401 | 403, .. } => {
                anyhow::anyhow!("login failed: invalid username or password")
            }
            other => explain(other),
        })?;

    let path = writable_config_path(config_path.as_deref());
    save_credentials(&path, &grant.token, grant.role)?;
    println!("Logged in as {username} ({})", grant.role);
    println!("Token saved to {}", path.display());
    Ok(())
}

/// Prompt on `prompt` and read one line from `input`.
fn read_password<R: BufRead, W: Write>(mut input: R, mut prompt: W) -> Result<String> {
    write!(prompt, "Password: ")?;
    prompt.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    let password = line.trim_end_matches(['\r', '\n']);
    if password.is_empty() {
        anyhow::bail!("no password given");
    }
    Ok(password.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Cursor;

    #[test]
    fn reads_password_line_without_newline() {
        let mut prompt = Vec::new();
        let password = read_password(Cursor::new("s3cret pass\r\n"), &mut prompt).unwrap();
        assert_eq!(password, "s3cret pass");
        assert_eq!(String::from_utf8(prompt).unwrap(), "Password: ");
    }

    #[test]
    fn empty_password_is_rejected() {
        assert!(read_password(Cursor::new(""), Vec::new()).is_err());
        assert!(read_password(Cursor::new("\n"), Vec::new()).is_err());
    }
}
