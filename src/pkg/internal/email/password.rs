use std::fmt::{self, Display};

use super::{SendEmail, layout, send_email};
use crate::{conf::settings, prelude::Result};

pub struct PasswordResetTemplate<'a> {
    pub reset_url: &'a str,
}

impl<'a> Display for PasswordResetTemplate<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let content = format!(
            r#"
            <p class="message">We received a request to reset your password.</p>
            <p><a class="button" href="{url}">Reset Password</a></p>
            <p class="message">
                Or paste this link into your browser: {url}<br>
                The link expires in {ttl} minutes. Ignore this email if you did not ask for a reset.
            </p>
            "#,
            url = self.reset_url,
            ttl = settings.reset_ttl_minutes
        );
        write!(f, "{}", layout("Reset Your Password", &content))
    }
}

impl<'a> SendEmail for PasswordResetTemplate<'a> {
    fn send(&self, email: &str) -> Result<()> {
        send_email(email, "Reset your password", &format!("{}", &self), true)
    }
}

pub struct PasswordResetSuccessTemplate;

impl Display for PasswordResetSuccessTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let content = r#"
            <p class="message">Your password has been reset successfully.</p>
            <p class="message">If you did not do this, contact the placement cell immediately.</p>
            "#;
        write!(f, "{}", layout("Password Reset Successful", content))
    }
}

impl SendEmail for PasswordResetSuccessTemplate {
    fn send(&self, email: &str) -> Result<()> {
        send_email(email, "Password reset successful", &format!("{}", &self), true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_email_carries_the_link() {
        let url = "http://localhost:5173/reset-password/abc123";
        let html = PasswordResetTemplate { reset_url: url }.to_string();
        assert_eq!(html.matches(url).count(), 2);
        assert!(PasswordResetSuccessTemplate.to_string().contains("reset successfully"));
    }
}
