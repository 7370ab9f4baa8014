use std::fmt::{self, Display};

use super::{SendEmail, escape_html, layout, send_email};
use crate::{conf::settings, prelude::Result};

pub struct VerificationCodeTemplate<'a> {
    pub name: &'a str,
    pub code: &'a str,
}

impl<'a> Display for VerificationCodeTemplate<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let content = format!(
            r#"
            <p class="message">Hi {}, use this code to verify your email address.</p>
            <div class="highlight">{}</div>
            <p class="message">
                The code expires in {} minutes.<br>
                Do not share this code with anyone.
            </p>
            "#,
            escape_html(self.name),
            self.code,
            settings.verification_ttl_minutes
        );
        write!(f, "{}", layout("Verify Your Email", &content))
    }
}

impl<'a> SendEmail for VerificationCodeTemplate<'a> {
    fn send(&self, email: &str) -> Result<()> {
        send_email(
            email,
            &format!("Your {} verification code", &settings.service_name),
            &format!("{}", &self),
            true,
        )
    }
}
