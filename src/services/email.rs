//! Email service for password reset codes

use lettre::{
    message::{header::ContentType, Mailbox, Message, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    SmtpTransport, Transport,
};
use std::str::FromStr;

use crate::{
    config::EmailConfig,
    error::{AppError, AppResult},
};

#[derive(Clone)]
pub struct EmailService {
    config: EmailConfig,
}

impl EmailService {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// Send a one-time password reset code
    pub async fn send_reset_code(&self, to: &str, name: &str, code: &str, ttl_minutes: i64) -> AppResult<()> {
        let subject = "Your Campus Assets password reset code";
        let body = reset_code_body(name, code, ttl_minutes);
        self.send_email(to, subject, &body).await
    }

    /// Generic email sending function
    async fn send_email(&self, to: &str, subject: &str, body: &str) -> AppResult<()> {
        let from_name = self
            .config
            .smtp_from_name
            .as_deref()
            .unwrap_or("Campus Assets");
        let from_mailbox = Mailbox::from_str(&format!("{} <{}>", from_name, self.config.smtp_from))
            .map_err(|e| AppError::Internal(format!("Invalid from address: {}", e)))?;

        let to_mailbox = Mailbox::from_str(to)
            .map_err(|e| AppError::BadRequest(format!("Invalid email address : {}", e)))?;

        let email = Message::builder()
            .from(from_mailbox)
            .to(to_mailbox)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(body.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(format!(
                                r#"<html><body><pre>{}</pre></body></html>"#,
                                body.replace('\n', "<br>")
                            )),
                    ),
            )
            .map_err(|e| AppError::Internal(format!("Failed to build email: {}", e)))?;

        let mailer_builder = if self.config.smtp_use_tls {
            SmtpTransport::starttls_relay(&self.config.smtp_host)
                .map_err(|e| AppError::Internal(format!("Failed to create SMTP transport: {}", e)))?
        } else {
            SmtpTransport::builder_dangerous(&self.config.smtp_host)
        }
        .port(self.config.smtp_port);

        let mailer_builder = if let (Some(username), Some(password)) =
            (&self.config.smtp_username, &self.config.smtp_password)
        {
            mailer_builder.credentials(Credentials::new(username.clone(), password.clone()))
        } else {
            mailer_builder
        };

        let mailer = mailer_builder.build();

        // SMTP transport is blocking
        tokio::task::spawn_blocking(move || mailer.send(&email))
            .await
            .map_err(|e| AppError::Internal(format!("Mail task failed: {}", e)))?
            .map_err(|e| AppError::Internal(format!("Failed to send email: {}", e)))?;

        tracing::info!("Password reset email sent to {}", to);
        Ok(())
    }
}

fn reset_code_body(name: &str, code: &str, ttl_minutes: i64) -> String {
    format!(
        r#"
Hello {name},

Your password reset code is: {code}

This code will expire in {ttl_minutes} minutes and can only be used once.

If you didn't request a password reset, you can ignore this email.
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_body_mentions_code_and_expiry() {
        let body = reset_code_body("Ada", "483920", 15);
        assert!(body.contains("Hello Ada"));
        assert!(body.contains("483920"));
        assert!(body.contains("15 minutes"));
    }
}
