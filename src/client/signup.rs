//! Signup page model: local validation, one submission at a time, and the
//! success/error banners the page shows afterwards.

use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info};

use super::api::{ApiError, RegistrationApi};
use super::form::{Field, FieldErrors};
use crate::user::dto::{RegisterRequest, RegisterResponse};
use crate::validation::{check_email, check_password, PASSWORDS_DONT_MATCH};

pub const FALLBACK_ERROR: &str = "Registration failed. Please try again.";

/// How long the success banner stays up.
pub const SUCCESS_DISPLAY: Duration = Duration::from_secs(5);

#[derive(Clone, Default, PartialEq, Eq)]
pub struct SignupForm {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl std::fmt::Debug for SignupForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignupForm")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

impl SignupForm {
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        confirm_password: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            confirm_password: confirm_password.into(),
        }
    }

    /// Validates every field and, on success, builds the request body.
    /// The confirmation is not part of the request.
    pub fn validate(&self) -> Result<RegisterRequest, FieldErrors> {
        let mut errors = FieldErrors::default();
        errors.check(Field::Email, check_email(&self.email));
        errors.check(Field::Password, check_password(&self.password));
        if self.password != self.confirm_password {
            errors.insert(Field::ConfirmPassword, PASSWORDS_DONT_MATCH);
        }
        if errors.is_empty() {
            Ok(RegisterRequest {
                email: self.email.clone(),
                password: self.password.clone(),
            })
        } else {
            Err(errors)
        }
    }
}

/// Why a submission did not reach the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Blocked {
    Busy,
    Invalid(FieldErrors),
}

#[derive(Debug, Clone)]
pub enum SubmitOutcome {
    Blocked(Blocked),
    Registered(RegisterResponse),
    Failed(String),
}

#[derive(Debug, Default)]
pub struct SignupPage {
    pub form: SignupForm,
    errors: FieldErrors,
    pending: bool,
    success: Option<(String, Instant)>,
    error: Option<String>,
}

impl SignupPage {
    pub fn with_form(form: SignupForm) -> Self {
        Self {
            form,
            ..Self::default()
        }
    }

    pub fn field_errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Inputs and the submit button are disabled while a request is in flight.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn submit_label(&self) -> &'static str {
        if self.pending {
            "Creating Account..."
        } else {
            "Sign Up"
        }
    }

    /// The success banner, until [`SUCCESS_DISPLAY`] has elapsed.
    pub fn success_message(&self) -> Option<&str> {
        self.success
            .as_ref()
            .filter(|(_, shown_at)| shown_at.elapsed() < SUCCESS_DISPLAY)
            .map(|(msg, _)| msg.as_str())
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Validates the form and enters the pending state.
    pub fn begin_submit(&mut self) -> Result<RegisterRequest, Blocked> {
        if self.pending {
            return Err(Blocked::Busy);
        }
        match self.form.validate() {
            Ok(request) => {
                self.errors = FieldErrors::default();
                self.success = None;
                self.error = None;
                self.pending = true;
                Ok(request)
            }
            Err(errors) => {
                debug!(fields = errors.len(), "signup form invalid");
                self.errors = errors.clone();
                Err(Blocked::Invalid(errors))
            }
        }
    }

    /// Applies the server's answer and leaves the pending state.
    pub fn finish_submit(
        &mut self,
        result: Result<RegisterResponse, ApiError>,
    ) -> SubmitOutcome {
        self.pending = false;
        match result {
            Ok(response) => {
                info!(user_id = %response.user.id, "account created");
                self.success = Some((response.message.clone(), Instant::now()));
                self.form = SignupForm::default();
                SubmitOutcome::Registered(response)
            }
            Err(e) => {
                let message = e.server_message().unwrap_or(FALLBACK_ERROR).to_string();
                info!(error = %e, "signup failed");
                self.error = Some(message.clone());
                SubmitOutcome::Failed(message)
            }
        }
    }

    pub async fn submit<A>(&mut self, api: &A) -> SubmitOutcome
    where
        A: RegistrationApi + ?Sized,
    {
        let request = match self.begin_submit() {
            Ok(r) => r,
            Err(blocked) => return SubmitOutcome::Blocked(blocked),
        };
        let result = api.register(&request).await;
        self.finish_submit(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::dto::PublicUser;
    use crate::validation::{INVALID_EMAIL, PASSWORD_TOO_SHORT};
    use async_trait::async_trait;
    use reqwest::StatusCode;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use time::OffsetDateTime;
    use uuid::Uuid;

    /// Records requests and answers with a canned reply.
    struct FakeApi {
        calls: AtomicUsize,
        last: Mutex<Option<RegisterRequest>>,
        reply: fn(&RegisterRequest) -> Result<RegisterResponse, ApiError>,
    }

    impl FakeApi {
        fn new(reply: fn(&RegisterRequest) -> Result<RegisterResponse, ApiError>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                last: Mutex::new(None),
                reply,
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl RegistrationApi for FakeApi {
        async fn register(
            &self,
            request: &RegisterRequest,
        ) -> Result<RegisterResponse, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last.lock().unwrap() = Some(request.clone());
            (self.reply)(request)
        }
    }

    fn accept(request: &RegisterRequest) -> Result<RegisterResponse, ApiError> {
        Ok(RegisterResponse {
            message: "User registered successfully".into(),
            user: PublicUser {
                id: Uuid::new_v4(),
                email: request.email.clone(),
                created_at: OffsetDateTime::now_utc(),
            },
        })
    }

    fn conflict(_: &RegisterRequest) -> Result<RegisterResponse, ApiError> {
        Err(ApiError::Server {
            status: StatusCode::CONFLICT,
            message: Some("Email already exists".into()),
        })
    }

    fn bare_failure(_: &RegisterRequest) -> Result<RegisterResponse, ApiError> {
        Err(ApiError::Server {
            status: StatusCode::BAD_GATEWAY,
            message: None,
        })
    }

    #[test]
    fn short_password_is_reported_on_password_field() {
        let errors = SignupForm::new("a@x.com", "12345", "12345")
            .validate()
            .unwrap_err();
        assert_eq!(errors.get(Field::Password), Some(PASSWORD_TOO_SHORT));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn mismatch_is_reported_on_confirmation_field() {
        let errors = SignupForm::new("a@x.com", "secret1", "secret2")
            .validate()
            .unwrap_err();
        assert_eq!(errors.get(Field::ConfirmPassword), Some(PASSWORDS_DONT_MATCH));
        assert_eq!(errors.get(Field::Password), None);
    }

    #[test]
    fn request_drops_confirmation() {
        let request = SignupForm::new("a@x.com", "secret1", "secret1")
            .validate()
            .unwrap();
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json, serde_json::json!({"email": "a@x.com", "password": "secret1"}));
    }

    #[tokio::test]
    async fn invalid_form_makes_no_call() {
        let api = FakeApi::new(accept);
        let mut page = SignupPage::with_form(SignupForm::new("bad", "123", "123"));
        let outcome = page.submit(&api).await;

        assert!(matches!(outcome, SubmitOutcome::Blocked(Blocked::Invalid(_))));
        assert_eq!(api.calls(), 0);
        assert_eq!(page.field_errors().get(Field::Email), Some(INVALID_EMAIL));
        assert_eq!(page.field_errors().get(Field::Password), Some(PASSWORD_TOO_SHORT));
    }

    #[tokio::test]
    async fn pending_page_refuses_second_submission() {
        let mut page = SignupPage::with_form(SignupForm::new("a@x.com", "secret1", "secret1"));
        page.begin_submit().unwrap();
        assert!(page.is_pending());
        assert_eq!(page.submit_label(), "Creating Account...");
        assert_eq!(page.begin_submit(), Err(Blocked::Busy));

        let api = FakeApi::new(accept);
        assert!(matches!(page.submit(&api).await, SubmitOutcome::Blocked(Blocked::Busy)));
        assert_eq!(api.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn success_clears_form_and_banner_expires() {
        let api = FakeApi::new(accept);
        let mut page = SignupPage::with_form(SignupForm::new("a@x.com", "secret1", "secret1"));
        let outcome = page.submit(&api).await;

        assert!(matches!(outcome, SubmitOutcome::Registered(ref r) if r.user.email == "a@x.com"));
        assert_eq!(
            api.last.lock().unwrap().as_ref().map(|r| r.email.as_str()),
            Some("a@x.com")
        );
        assert!(!page.is_pending());
        assert_eq!(page.submit_label(), "Sign Up");
        assert_eq!(page.form, SignupForm::default());
        assert_eq!(page.success_message(), Some("User registered successfully"));

        tokio::time::advance(Duration::from_secs(4)).await;
        assert!(page.success_message().is_some());
        tokio::time::advance(Duration::from_secs(1)).await;
        assert_eq!(page.success_message(), None);
    }

    #[tokio::test]
    async fn server_message_is_shown_on_failure() {
        let api = FakeApi::new(conflict);
        let mut page = SignupPage::with_form(SignupForm::new("a@x.com", "secret1", "secret1"));
        let outcome = page.submit(&api).await;

        assert!(matches!(outcome, SubmitOutcome::Failed(ref m) if m == "Email already exists"));
        assert_eq!(page.error_message(), Some("Email already exists"));
        assert_eq!(page.success_message(), None);
        // the form keeps its values so the user can fix the email
        assert_eq!(page.form.email, "a@x.com");
    }

    #[tokio::test]
    async fn fallback_message_when_server_says_nothing() {
        let api = FakeApi::new(bare_failure);
        let mut page = SignupPage::with_form(SignupForm::new("a@x.com", "secret1", "secret1"));
        page.submit(&api).await;
        assert_eq!(page.error_message(), Some(FALLBACK_ERROR));
    }

    #[tokio::test]
    async fn new_submission_clears_previous_error() {
        let mut page = SignupPage::with_form(SignupForm::new("a@x.com", "secret1", "secret1"));
        page.submit(&FakeApi::new(conflict)).await;
        assert!(page.error_message().is_some());

        page.form.email = "b@x.com".into();
        page.begin_submit().unwrap();
        assert_eq!(page.error_message(), None);
    }
}
