use secrecy::SecretString;

/// Username, password and controller host for one controller account.
///
/// Loaded once at startup and never mutated afterwards. The password
/// stays wrapped in a [`SecretString`] so it never shows up in `Debug`
/// output or logs.
#[derive(Debug, Clone)]
pub struct Credential {
    username: String,
    password: SecretString,
    controller_host: String,
}

impl Credential {
    pub fn new(
        username: impl Into<String>,
        password: SecretString,
        controller_host: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password,
            controller_host: controller_host.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &SecretString {
        &self.password
    }

    /// Bare host name or address of the controller, without scheme or port.
    pub fn controller_host(&self) -> &str {
        &self.controller_host
    }
}
