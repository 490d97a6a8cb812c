//! Two-step passcode sign-in: collect an email, request a code, collect the six
//! digits and exchange them for a session. The flow owns the form state and
//! refuses overlapping submissions; it never logs the email or the code.
//!
//! Each submission is split into `begin_*` and `complete_*` so a reactive view
//! can run the network call between them. `submit_email` and `submit_code`
//! chain both halves around an `AuthClient` for callers that can simply await.

use crate::{
    app_lib::{AppError, HttpTransport, Session, SessionStore, ValidationError},
    features::auth::{
        client::AuthClient,
        types::{CredentialRequest, PasscodeVerification},
    },
    routes::paths,
};
use regex::Regex;
use std::fmt;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Number of digits in an emailed passcode.
pub const CODE_LENGTH: usize = 6;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthStep {
    EnteringEmail,
    EnteringCode,
    Authenticated,
}

/// Result of typing into one digit slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DigitEntry {
    /// Digits were written; focus should move to `next_focus` when present.
    Filled { next_focus: Option<usize> },
    Cleared,
    /// Non-numeric input or an index outside the code; nothing changed.
    Rejected,
}

/// The six independently editable passcode slots.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct OtpDigits {
    slots: [Option<char>; CODE_LENGTH],
}

impl fmt::Debug for OtpDigits {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let filled = self.slots.iter().filter(|slot| slot.is_some()).count();
        formatter
            .debug_struct("OtpDigits")
            .field("filled", &filled)
            .finish()
    }
}

impl OtpDigits {
    /// Writes `value` into the slot at `index`. An empty value clears the slot;
    /// several digits (a paste) fill consecutive slots and stop at the end.
    /// Typing over a filled slot yields its old digit plus the new one, which
    /// replaces the old digit instead of spilling into the next slot.
    pub fn enter(&mut self, index: usize, value: &str) -> DigitEntry {
        if index >= CODE_LENGTH {
            return DigitEntry::Rejected;
        }
        let value = value.trim();
        if value.is_empty() {
            self.slots[index] = None;
            return DigitEntry::Cleared;
        }
        if !value.chars().all(|ch| ch.is_ascii_digit()) {
            return DigitEntry::Rejected;
        }
        let value = match self.slots[index] {
            Some(old) if value.len() == 2 && value.starts_with(old) => &value[1..],
            Some(old) if value.len() == 2 && value.ends_with(old) => &value[..1],
            _ => value,
        };

        let mut last = index;
        for (slot, digit) in self.slots[index..].iter_mut().zip(value.chars()) {
            *slot = Some(digit);
            last += 1;
        }
        DigitEntry::Filled {
            next_focus: (last < CODE_LENGTH).then_some(last),
        }
    }

    #[must_use]
    pub fn digit(&self, index: usize) -> Option<char> {
        self.slots.get(index).copied().flatten()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    /// The joined code, only once every slot is filled.
    #[must_use]
    pub fn code(&self) -> Option<String> {
        self.slots.iter().copied().collect()
    }

    pub fn clear(&mut self) {
        self.slots = [None; CODE_LENGTH];
    }
}

/// `local@domain.tld` shape check used before any request is made.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|re| re.is_match(email))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// Transient message shown after a submission settles.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: &'static str,
    pub message: &'static str,
}

impl Notice {
    const CODE_SENT: Notice = Notice {
        kind: NoticeKind::Success,
        title: "Code Sent",
        message: "Check your email for the 6-digit code.",
    };
    const SEND_FAILED: Notice = Notice {
        kind: NoticeKind::Error,
        title: "Error",
        message: "Failed to send code. Please try again.",
    };
    const VERIFIED: Notice = Notice {
        kind: NoticeKind::Success,
        title: "Verified",
        message: "Email verified successfully.",
    };
    const INVALID_CODE: Notice = Notice {
        kind: NoticeKind::Error,
        title: "Error",
        message: "Invalid code. Please try again.",
    };
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FlowError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("A submission is already in progress")]
    Busy,
    #[error("Not available at this step")]
    WrongStep,
    /// The flow was reset while the request was outstanding; its outcome was
    /// dropped.
    #[error("The request was abandoned before it settled")]
    Superseded,
    #[error(transparent)]
    Request(#[from] AppError),
}

/// Completion signal; the caller navigates to `redirect_to`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedIn {
    pub redirect_to: &'static str,
}

#[derive(Clone)]
pub struct AuthFlow {
    step: AuthStep,
    email: String,
    digits: OtpDigits,
    pending: bool,
    /// Set by `reset` while pending; the next completion is dropped.
    abandoned: bool,
    notice: Option<Notice>,
    notice_serial: u64,
}

impl fmt::Debug for AuthFlow {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("AuthFlow")
            .field("step", &self.step)
            .field("digits", &self.digits)
            .field("pending", &self.pending)
            .field("abandoned", &self.abandoned)
            .field("notice", &self.notice)
            .finish_non_exhaustive()
    }
}

impl Default for AuthFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthFlow {
    #[must_use]
    pub fn new() -> Self {
        Self {
            step: AuthStep::EnteringEmail,
            email: String::new(),
            digits: OtpDigits::default(),
            pending: false,
            abandoned: false,
            notice: None,
            notice_serial: 0,
        }
    }

    #[must_use]
    pub fn step(&self) -> AuthStep {
        self.step
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[must_use]
    pub fn digits(&self) -> &OtpDigits {
        &self.digits
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    #[must_use]
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Increases every time a notice is posted, so a delayed dismissal can
    /// tell whether the notice it was scheduled for is still showing.
    #[must_use]
    pub fn notice_serial(&self) -> u64 {
        self.notice_serial
    }

    /// Hides the notice posted as `serial`; newer notices stay.
    pub fn dismiss_notice(&mut self, serial: u64) {
        if serial == self.notice_serial {
            self.notice = None;
        }
    }

    fn post_notice(&mut self, notice: Notice) {
        self.notice_serial += 1;
        self.notice = Some(notice);
    }

    /// Clears the outstanding flag. Returns `Superseded` when the request
    /// belonged to a flow that has since been reset.
    fn settle(&mut self) -> Result<(), FlowError> {
        self.pending = false;
        if std::mem::take(&mut self.abandoned) {
            debug!("dropping outcome of an abandoned request");
            return Err(FlowError::Superseded);
        }
        Ok(())
    }

    /// Updates the email field; ignored outside the email step or while a
    /// request is outstanding.
    pub fn set_email(&mut self, email: &str) {
        if self.step == AuthStep::EnteringEmail && !self.pending {
            self.email = email.to_string();
        }
    }

    #[must_use]
    pub fn email_is_valid(&self) -> bool {
        is_valid_email(self.email.trim())
    }

    #[must_use]
    pub fn can_submit_email(&self) -> bool {
        self.step == AuthStep::EnteringEmail && !self.pending && self.email_is_valid()
    }

    /// Validates the email and marks the request as outstanding.
    ///
    /// # Errors
    /// `WrongStep` outside the email step, `Busy` while pending and
    /// `Validation(InvalidEmail)` for a malformed address.
    pub fn begin_email_submission(&mut self) -> Result<CredentialRequest, FlowError> {
        if self.step != AuthStep::EnteringEmail {
            return Err(FlowError::WrongStep);
        }
        if self.pending {
            return Err(FlowError::Busy);
        }
        let email = self.email.trim();
        if !is_valid_email(email) {
            return Err(ValidationError::InvalidEmail.into());
        }

        self.email = email.to_string();
        self.pending = true;
        self.notice = None;
        Ok(CredentialRequest {
            email: self.email.clone(),
        })
    }

    /// Applies the outcome of the passcode request.
    ///
    /// # Errors
    /// Returns the request error after recording the failure notice, or
    /// `Superseded` if the flow was reset in the meantime.
    pub fn complete_email_submission(&mut self, outcome: Result<(), AppError>) -> Result<(), FlowError> {
        self.settle()?;
        match outcome {
            Ok(()) => {
                self.step = AuthStep::EnteringCode;
                self.digits.clear();
                self.post_notice(Notice::CODE_SENT);
                info!("passcode step entered");
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "passcode request failed");
                self.post_notice(Notice::SEND_FAILED);
                Err(err.into())
            }
        }
    }

    /// Requests a passcode for the current email.
    ///
    /// # Errors
    /// Same as `begin_email_submission` and `complete_email_submission`.
    pub async fn submit_email<T: HttpTransport>(&mut self, client: &AuthClient<T>) -> Result<(), FlowError> {
        let request = self.begin_email_submission()?;
        let outcome = client.request_passcode(&request).await;
        self.complete_email_submission(outcome)
    }

    /// Types into a digit slot; ignored outside the code step or while pending.
    pub fn enter_digit(&mut self, index: usize, value: &str) -> DigitEntry {
        if self.step != AuthStep::EnteringCode || self.pending {
            return DigitEntry::Rejected;
        }
        self.digits.enter(index, value)
    }

    #[must_use]
    pub fn can_submit_code(&self) -> bool {
        self.step == AuthStep::EnteringCode && !self.pending && self.digits.is_complete()
    }

    /// Validates the code and marks the verification as outstanding.
    ///
    /// # Errors
    /// `WrongStep` outside the code step, `Busy` while pending and
    /// `Validation(IncompleteCode)` while any slot is empty.
    pub fn begin_code_submission(&mut self) -> Result<PasscodeVerification, FlowError> {
        if self.step != AuthStep::EnteringCode {
            return Err(FlowError::WrongStep);
        }
        if self.pending {
            return Err(FlowError::Busy);
        }
        let otp = self.digits.code().ok_or(ValidationError::IncompleteCode)?;

        self.pending = true;
        self.notice = None;
        Ok(PasscodeVerification {
            email: self.email.clone(),
            otp,
        })
    }

    /// Applies the outcome of the verification and persists the session.
    ///
    /// # Errors
    /// Returns the request or storage error after recording the failure notice,
    /// or `Superseded` without touching the store if the flow was reset in the
    /// meantime.
    pub fn complete_code_submission(
        &mut self,
        outcome: Result<Session, AppError>,
        store: &SessionStore,
    ) -> Result<SignedIn, FlowError> {
        self.settle()?;
        match outcome.and_then(|session| store.save(&session)) {
            Ok(()) => {
                self.step = AuthStep::Authenticated;
                self.post_notice(Notice::VERIFIED);
                info!("signed in");
                Ok(SignedIn {
                    redirect_to: paths::DASHBOARD,
                })
            }
            Err(err) => {
                warn!(error = %err, "passcode verification failed");
                self.post_notice(Notice::INVALID_CODE);
                Err(err.into())
            }
        }
    }

    /// Verifies the entered code and stores the resulting session.
    ///
    /// # Errors
    /// Same as `begin_code_submission` and `complete_code_submission`.
    pub async fn submit_code<T: HttpTransport>(
        &mut self,
        client: &AuthClient<T>,
        store: &SessionStore,
    ) -> Result<SignedIn, FlowError> {
        let request = self.begin_code_submission()?;
        let outcome = client.verify_passcode(&request).await;
        self.complete_code_submission(outcome, store)
    }

    /// "Wrong email? Change it": back to the email step with empty fields.
    pub fn change_email(&mut self) {
        if self.step == AuthStep::EnteringCode && !self.pending {
            self.clear_fields();
        }
    }

    /// Returns to a blank email step from anywhere. An outstanding request
    /// keeps the flow busy until it settles, and its outcome is dropped.
    pub fn reset(&mut self) {
        self.clear_fields();
        self.abandoned = self.pending;
        self.notice = None;
    }

    fn clear_fields(&mut self) {
        self.step = AuthStep::EnteringEmail;
        self.email.clear();
        self.digits.clear();
    }
}
