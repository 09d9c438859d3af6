use std::process::Command;

use derive_getters::Getters;
use serde::Deserialize;

use crate::config::ConfigError;

#[derive(Debug, Deserialize, Getters)]
pub struct PlainAuthConfig {
    user: String,
    #[getter(skip)]
    password_cmd: String,
}

impl PlainAuthConfig {
    /// Runs `password_cmd` and takes its first line of output.
    pub fn password(&self) -> Result<String, ConfigError> {
        let mut cmd_parts = self.password_cmd.split_whitespace();
        let program = cmd_parts
            .next()
            .ok_or_else(|| ConfigError::PasswordCommand("no program given".to_string()))?;
        let output = Command::new(program)
            .args(cmd_parts)
            .output()
            .map_err(|e| ConfigError::PasswordCommand(format!("{program}: {e}")))?;
        if !output.status.success() {
            return Err(ConfigError::PasswordCommand(format!(
                "{program} exited with {}",
                output.status
            )));
        }

        let stdout = String::from_utf8(output.stdout)
            .map_err(|_| ConfigError::PasswordCommand(format!("{program} printed non-UTF-8")))?;
        match stdout.lines().next() {
            Some(password) if !password.is_empty() => Ok(password.to_string()),
            _ => Err(ConfigError::PasswordCommand(format!(
                "{program} printed no password"
            ))),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum AuthConfig {
    Plain(PlainAuthConfig),
}

impl AuthConfig {
    pub fn user(&self) -> &str {
        match self {
            AuthConfig::Plain(plain) => plain.user(),
        }
    }

    pub fn password(&self) -> Result<String, ConfigError> {
        match self {
            AuthConfig::Plain(plain) => plain.password(),
        }
    }
}

#[cfg(test)]
mod tests {
    use assertables::*;
    use rstest::*;

    use super::*;

    fn plain(password_cmd: &str) -> AuthConfig {
        assert_ok!(toml::from_str(&format!(
            "type = \"Plain\"\nuser = \"alice\"\npassword_cmd = \"{password_cmd}\"\n"
        )))
    }

    #[rstest]
    fn test_password_comes_from_command() {
        let auth = plain("echo hunter2");

        assert_eq!("alice", auth.user());
        assert_eq!("hunter2", assert_ok!(auth.password()));
    }

    #[rstest]
    #[case("")]
    #[case("true")]
    #[case("false")]
    #[case("/nonexistent/password-helper")]
    fn test_failing_password_command_is_an_error(#[case] password_cmd: &str) {
        assert!(matches!(
            plain(password_cmd).password(),
            Err(ConfigError::PasswordCommand(_))
        ));
    }
}
