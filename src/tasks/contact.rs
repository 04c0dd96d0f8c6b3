use std::time::Duration;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::config::ContactFormConfig;
use crate::error::SiteError;

/// Visitor-entered contact form fields. Empty strings count as missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub service: String,
    pub message: String,
}

fn or_default<'a>(value: &'a str, default: &'a str) -> &'a str {
    if value.trim().is_empty() { default } else { value }
}

fn form_decode(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => spaced,
    }
}

impl ContactRequest {
    /// Parses `name=..&email=..` pairs; unknown keys are ignored.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut req = Self::default();
        for (key, value) in pairs {
            let slot = match key {
                "name" => &mut req.name,
                "email" => &mut req.email,
                "phone" => &mut req.phone,
                "service" => &mut req.service,
                "message" => &mut req.message,
                _ => continue,
            };
            *slot = value.to_string();
        }
        req
    }

    /// Parses an `application/x-www-form-urlencoded` string: `+` is a space
    /// and `%XX` escapes are decoded. A value that does not decode to UTF-8 is
    /// kept as typed.
    pub fn from_query(query: &str) -> Self {
        let pairs: Vec<(String, String)> = query
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .map(|(k, v)| (form_decode(k.trim()), form_decode(v.trim())))
            .collect();
        Self::from_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }

    pub fn email_body(&self) -> String {
        format!(
            "New Contact Request from Fresh Start Driving Website\n\
             \n\
             Name: {}\n\
             Email: {}\n\
             Phone: {}\n\
             Service Interested In: {}\n\
             \n\
             Message:\n\
             {}\n\
             \n\
             ---\n\
             This message was sent from the Fresh Start Driving Academy contact form.",
            or_default(&self.name, "Not provided"),
            or_default(&self.email, "Not provided"),
            or_default(&self.phone, "Not provided"),
            or_default(&self.service, "Not specified"),
            or_default(&self.message, "No message provided"),
        )
    }

    /// Fields posted to the endpoint, raw inputs followed by `subject` and `body`.
    pub fn form_fields(&self, subject: &str) -> Vec<(String, String)> {
        vec![
            ("name".into(), self.name.clone()),
            ("email".into(), self.email.clone()),
            ("phone".into(), self.phone.clone()),
            ("service".into(), self.service.clone()),
            ("message".into(), self.message.clone()),
            ("subject".into(), subject.to_string()),
            ("body".into(), self.email_body()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormResponse {
    pub status: u16,
    pub reason: String,
}

impl FormResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait FormEndpoint: Send + Sync {
    async fn post_form(&self, fields: &[(String, String)]) -> Result<FormResponse, SiteError>;
}

/// URL-encoded POST to a web-app endpoint.
#[derive(Debug, Clone)]
pub struct HttpFormEndpoint {
    http: reqwest::Client,
    url: String,
}

impl HttpFormEndpoint {
    pub fn new(http: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }

    pub fn from_config(cfg: &ContactFormConfig) -> Result<Self, SiteError> {
        let http = reqwest::Client::builder()
            .timeout(cfg.request_timeout)
            .build()?;
        Ok(Self::new(http, &cfg.endpoint))
    }
}

#[async_trait]
impl FormEndpoint for HttpFormEndpoint {
    async fn post_form(&self, fields: &[(String, String)]) -> Result<FormResponse, SiteError> {
        let response = self.http.post(&self.url).form(fields).send().await?;
        let status = response.status();
        Ok(FormResponse {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("").to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ButtonState {
    Idle,
    Sending,
    Sent,
    Failed { reason: String },
    Error,
}

/// Submit button of the contact form. Only its label, colour and enabled
/// flag change; the rest of the page is unaffected by a submission.
#[derive(Debug, Clone)]
pub struct SubmitButton {
    idle_label: String,
    state: ButtonState,
}

impl SubmitButton {
    pub fn new(idle_label: impl Into<String>) -> Self {
        Self {
            idle_label: idle_label.into(),
            state: ButtonState::Idle,
        }
    }

    pub fn state(&self) -> &ButtonState {
        &self.state
    }

    pub fn label(&self) -> String {
        match &self.state {
            ButtonState::Idle => self.idle_label.clone(),
            ButtonState::Sending => "Sending...".to_string(),
            ButtonState::Sent => "Message Sent!".to_string(),
            ButtonState::Failed { reason } => format!("Failed: {reason}"),
            ButtonState::Error => "Error".to_string(),
        }
    }

    pub fn is_disabled(&self) -> bool {
        self.state != ButtonState::Idle
    }

    pub fn color(&self) -> Option<&'static str> {
        match self.state {
            ButtonState::Sent => Some("#10b981"),
            ButtonState::Failed { .. } | ButtonState::Error => Some("#ef4444"),
            ButtonState::Idle | ButtonState::Sending => None,
        }
    }

    pub fn reset(&mut self) {
        self.state = ButtonState::Idle;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Sent,
    Rejected(FormResponse),
    /// Network failure; shown inline, never retried.
    Failed(String),
    /// A submission was already in flight.
    Busy,
}

/// Contact form: the fields, its submit button, and the submit flow.
#[derive(Debug, Clone)]
pub struct ContactForm {
    pub fields: ContactRequest,
    pub button: SubmitButton,
    subject: String,
    reset_after: Duration,
}

impl ContactForm {
    pub fn new(cfg: &ContactFormConfig) -> Self {
        Self {
            fields: ContactRequest::default(),
            button: SubmitButton::new("Send Message"),
            subject: cfg.subject.clone(),
            reset_after: cfg.reset_after,
        }
    }

    /// How long the result label stays before [`SubmitButton::reset`].
    pub fn reset_after(&self) -> Duration {
        self.reset_after
    }

    pub async fn submit(&mut self, endpoint: &dyn FormEndpoint) -> SubmitOutcome {
        if self.button.is_disabled() {
            return SubmitOutcome::Busy;
        }
        self.button.state = ButtonState::Sending;
        let fields = self.fields.form_fields(&self.subject);

        match endpoint.post_form(&fields).await {
            Ok(response) if response.is_success() => {
                info!(status = response.status, "contact form sent");
                self.button.state = ButtonState::Sent;
                self.fields = ContactRequest::default();
                SubmitOutcome::Sent
            }
            Ok(response) => {
                warn!(status = response.status, reason = %response.reason, "contact form rejected");
                self.button.state = ButtonState::Failed {
                    reason: response.reason.clone(),
                };
                SubmitOutcome::Rejected(response)
            }
            Err(err) => {
                warn!(error = %err, "contact form submission failed");
                self.button.state = ButtonState::Error;
                SubmitOutcome::Failed(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_fills_missing_fields() {
        let req = ContactRequest {
            name: "Sam".into(),
            ..Default::default()
        };
        let body = req.email_body();
        assert!(body.starts_with("New Contact Request from Fresh Start Driving Website\n\nName: Sam\n"));
        assert!(body.contains("Email: Not provided\n"));
        assert!(body.contains("Service Interested In: Not specified\n"));
        assert!(body.contains("Message:\nNo message provided\n"));
        assert!(body.ends_with("Fresh Start Driving Academy contact form."));
    }

    #[test]
    fn pairs_ignore_unknown_keys() {
        let req = ContactRequest::from_pairs([("name", "Jo"), ("to", "x@example.com"), ("phone", "0700")]);
        assert_eq!(req.name, "Jo");
        assert_eq!(req.phone, "0700");
        assert!(req.email.is_empty());
    }

    #[test]
    fn query_values_are_form_decoded() {
        let req = ContactRequest::from_query(
            "name=Sam+Patel&email=sam%40example.com&message=Hi%20there+now&phone=%2B44%20700",
        );
        assert_eq!(req.name, "Sam Patel");
        assert_eq!(req.email, "sam@example.com");
        assert_eq!(req.message, "Hi there now");
        assert_eq!(req.phone, "+44 700");
    }

    #[test]
    fn undecodable_value_is_kept_as_typed() {
        let req = ContactRequest::from_query("message=caf%FF");
        assert_eq!(req.message, "caf%FF");
    }

    #[test]
    fn fields_end_with_subject_and_body() {
        let fields = ContactRequest::default().form_fields("Contact Request");
        let keys: Vec<&str> = fields.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(
            keys,
            vec!["name", "email", "phone", "service", "message", "subject", "body"]
        );
    }

    #[test]
    fn button_labels() {
        let mut b = SubmitButton::new("Send Message");
        assert_eq!(b.label(), "Send Message");
        assert!(!b.is_disabled());
        b.state = ButtonState::Failed {
            reason: "Bad Gateway".into(),
        };
        assert_eq!(b.label(), "Failed: Bad Gateway");
        assert_eq!(b.color(), Some("#ef4444"));
        b.reset();
        assert_eq!(b.label(), "Send Message");
    }
}
