use crate::config::logging::secure_log;
use crate::config::parameter;
use crate::error::mail_error::MailError;
use lettre::message::{header::ContentType, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::time::Duration;
use tracing::info;

/// Async SMTP mailer. Every send runs under a bounded timeout so a slow
/// relay can never hang an HTTP response.
#[derive(Clone)]
pub struct MailService {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    timeout: Duration,
}

impl MailService {
    pub fn from_parameters() -> Result<Self, MailError> {
        let host = parameter::get("SMTP_HOST");
        let port = validate_port(parameter::get_u64("SMTP_PORT"))?;

        // Implicit TLS on 465, STARTTLS otherwise
        let mut builder = if port == 465 {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&host)?
        }
        .port(port);

        if let Some(username) = parameter::get_optional("SMTP_USERNAME") {
            let password = parameter::get_optional("SMTP_PASSWORD").unwrap_or_default();
            builder = builder.credentials(Credentials::new(username, password));
        }

        let from: Mailbox = format!("Blogr <{}>", parameter::get("SMTP_FROM_EMAIL"))
            .parse()
            .map_err(MailError::Address)?;

        Ok(Self {
            transport: builder.build(),
            from,
            timeout: Duration::from_secs(parameter::get_u64("MAIL_TIMEOUT_SECONDS")),
        })
    }

    pub async fn send(
        &self,
        to: &str,
        subject: &str,
        text: String,
        html: String,
    ) -> Result<(), MailError> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(to.parse().map_err(MailError::Address)?)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(text),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html),
                    ),
            )?;

        match tokio::time::timeout(self.timeout, self.transport.send(message)).await {
            Ok(Ok(_)) => {
                info!("Mail dispatched to recipient");
                Ok(())
            }
            Ok(Err(e)) => {
                secure_log::secure_error!("SMTP send failed", e);
                Err(MailError::Smtp(e))
            }
            Err(_) => {
                secure_log::secure_error!(format!("SMTP send exceeded {:?} timeout", self.timeout));
                Err(MailError::Timeout)
            }
        }
    }

    pub async fn send_verification_email(&self, to: &str, name: &str, verify_url: &str) -> Result<(), MailError> {
        let (text, html) = verification_email_body(name, verify_url);
        self.send(to, "Verify your email address", text, html).await
    }

    pub async fn send_password_reset_email(&self, to: &str, name: &str, reset_url: &str) -> Result<(), MailError> {
        let (text, html) = password_reset_email_body(name, reset_url);
        self.send(to, "Reset your password", text, html).await
    }
}

/// Misconfigured ports fail startup instead of silently truncating.
fn validate_port(port: u64) -> Result<u16, MailError> {
    match u16::try_from(port) {
        Ok(p) if p != 0 => Ok(p),
        _ => Err(MailError::InvalidPort(port)),
    }
}

#[cfg(test)]
impl MailService {
    /// Transport pointed at a local relay nothing listens on; handler
    /// tests treat delivery as best-effort and never assert on it.
    pub(crate) fn local_stub() -> Self {
        Self {
            transport: AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous("localhost").build(),
            from: match "Blogr <no-reply@blogr.local>".parse() {
                Ok(mailbox) => mailbox,
                Err(_) => unreachable!(),
            },
            timeout: Duration::from_secs(1),
        }
    }
}

pub fn verification_email_body(name: &str, verify_url: &str) -> (String, String) {
    let text = format!(
        "Hello {name},\n\n\
         Thanks for registering!\n\n\
         Please verify your email by clicking the link below:\n\
         {verify_url}\n\n\
         If you did not create an account, you can safely ignore this email.\n"
    );
    let html = format!(
        "<div style=\"font-family: Arial, sans-serif; line-height: 1.6;\">\
         <h2>Welcome, {name}</h2>\
         <p>Thanks for registering with us.</p>\
         <p>Please verify your email address by clicking the button below:</p>\
         <a href=\"{verify_url}\" style=\"display:inline-block;padding:12px 20px;\
         background-color:#4f46e5;color:#ffffff;text-decoration:none;border-radius:6px;\
         font-weight:bold;\">Verify Email</a>\
         <p style=\"margin-top:20px;\">Or copy and paste this link into your browser:</p>\
         <p>{verify_url}</p>\
         <p style=\"margin-top:30px;font-size:12px;color:#555;\">\
         If you did not create an account, please ignore this email.</p>\
         </div>"
    );
    (text, html)
}

pub fn password_reset_email_body(name: &str, reset_url: &str) -> (String, String) {
    let text = format!(
        "Hello {name},\n\n\
         You requested a password reset.\n\n\
         Click the link below to reset your password:\n\
         {reset_url}\n\n\
         This link will expire in 15 minutes.\n\n\
         If you didn't request this, ignore this email.\n"
    );
    let html = format!(
        "<div style=\"font-family: Arial; line-height: 1.6\">\
         <h2>Password Reset</h2>\
         <p>You requested a password reset.</p>\
         <a href=\"{reset_url}\" style=\"padding:12px 18px;background:#ef4444;color:#fff;\
         text-decoration:none;border-radius:6px\">Reset Password</a>\
         <p style=\"margin-top:20px;font-size:12px;color:#555\">\
         This link expires in 15 minutes.</p>\
         </div>"
    );
    (text, html)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verification_body_embeds_link() {
        let url = "http://localhost:8080/api/auth/verify-email?token=abc";
        let (text, html) = verification_email_body("Ada", url);

        assert!(text.contains(url));
        assert!(html.contains(url));
        assert!(text.contains("Ada"));
    }

    #[test]
    fn test_out_of_range_port_rejected() {
        assert!(matches!(validate_port(0), Err(MailError::InvalidPort(0))));
        assert!(matches!(validate_port(70000), Err(MailError::InvalidPort(70000))));
        assert_eq!(validate_port(587).ok(), Some(587));
        assert_eq!(validate_port(465).ok(), Some(465));
    }

    #[test]
    fn test_reset_body_embeds_link() {
        let url = "http://localhost:5173/reset-password?token=abc";
        let (text, html) = password_reset_email_body("Ada", url);

        assert!(text.contains(url));
        assert!(html.contains(url));
    }
}
