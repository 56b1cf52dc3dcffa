//! Login page model. There is no login endpoint: submission waits a moment,
//! always succeeds and only logs the email locally.

use std::time::Duration;

use tokio::time::Instant;
use tracing::info;

use super::form::{Field, FieldErrors};
use crate::validation::{check_email, check_password};

pub const SIMULATED_DELAY: Duration = Duration::from_millis(1500);
pub const SUCCESS_DISPLAY: Duration = Duration::from_secs(3);
pub const SUCCESS_MESSAGE: &str = "Login simulation successful! (Backend not implemented yet)";

#[derive(Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginForm")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

impl LoginForm {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();
        errors.check(Field::Email, check_email(&self.email));
        errors.check(Field::Password, check_password(&self.password));
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[derive(Debug, Default)]
pub struct LoginPage {
    pub form: LoginForm,
    errors: FieldErrors,
    loading: bool,
    succeeded_at: Option<Instant>,
}

impl LoginPage {
    pub fn with_form(form: LoginForm) -> Self {
        Self {
            form,
            ..Self::default()
        }
    }

    pub fn field_errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn submit_label(&self) -> &'static str {
        if self.loading {
            "Logging in..."
        } else {
            "Login"
        }
    }

    pub fn success_message(&self) -> Option<&'static str> {
        self.succeeded_at
            .filter(|at| at.elapsed() < SUCCESS_DISPLAY)
            .map(|_| SUCCESS_MESSAGE)
    }

    pub async fn submit(&mut self) -> Result<(), FieldErrors> {
        if let Err(errors) = self.form.validate() {
            self.errors = errors.clone();
            return Err(errors);
        }
        self.errors = FieldErrors::default();
        self.loading = true;
        tokio::time::sleep(SIMULATED_DELAY).await;
        self.loading = false;
        self.succeeded_at = Some(Instant::now());
        info!(email = %self.form.email, "login attempted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{INVALID_EMAIL, PASSWORD_TOO_SHORT};

    #[tokio::test(start_paused = true)]
    async fn submission_waits_then_succeeds() {
        let mut page = LoginPage::with_form(LoginForm::new("a@x.com", "whatever"));
        let started = Instant::now();
        page.submit().await.expect("valid form");

        assert!(started.elapsed() >= SIMULATED_DELAY);
        assert!(!page.is_loading());
        assert_eq!(page.submit_label(), "Login");
        assert_eq!(page.success_message(), Some(SUCCESS_MESSAGE));

        tokio::time::advance(SUCCESS_DISPLAY).await;
        assert_eq!(page.success_message(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_form_does_not_wait() {
        let mut page = LoginPage::with_form(LoginForm::new("nope", "123"));
        let started = Instant::now();
        let errors = page.submit().await.unwrap_err();

        assert_eq!(started.elapsed(), Duration::ZERO);
        assert_eq!(errors.get(Field::Email), Some(INVALID_EMAIL));
        assert_eq!(errors.get(Field::Password), Some(PASSWORD_TOO_SHORT));
        assert_eq!(page.success_message(), None);
    }
}
