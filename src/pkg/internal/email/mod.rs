use lettre::message::{Mailbox, header::ContentType};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

pub mod password;
pub mod verification;

use crate::{
    conf::settings,
    prelude::{AppError, Result},
};

pub trait SendEmail {
    fn send(&self, email: &str) -> Result<()>;
}

/// Builds the message up front so address errors surface to the caller, then
/// hands delivery to a blocking worker and returns without waiting on SMTP.
pub fn send_email(email: &str, subject: &str, body: &str, is_html: bool) -> Result<()> {
    if settings.smtp_server.is_empty() {
        tracing::info!("smtp not configured, skipping \"{}\" to {}", subject, email);
        return Ok(());
    }
    let (name, _) = email.split_once("@").unwrap_or(("unknown", ""));
    let content_type = if is_html {
        ContentType::TEXT_HTML
    } else {
        ContentType::TEXT_PLAIN
    };
    let message = Message::builder()
        .from(
            format!("{} <{}>", &settings.service_name, &settings.from_email)
                .parse::<Mailbox>()
                .map_err(|e| AppError::Email(format!("invalid sender address: {e}")))?,
        )
        .to(format!("{} <{}>", name, email)
            .parse::<Mailbox>()
            .map_err(|e| AppError::Email(format!("invalid recipient {email}: {e}")))?)
        .subject(subject)
        .header(content_type)
        .body(body.to_string())
        .map_err(|e| AppError::Email(e.to_string()))?;

    let mailer = SmtpTransport::starttls_relay(&settings.smtp_server)
        .map_err(|e| AppError::Email(e.to_string()))?
        .port(settings.smtp_port)
        .credentials(Credentials::new(
            settings.smtp_user.clone(),
            settings.smtp_pass.clone(),
        ))
        .build();

    let email = email.to_string();
    tracing::debug!("sending email to {}", &email);
    tokio::spawn(async move {
        let result = tokio::task::spawn_blocking(move || mailer.send(&message)).await;
        match result {
            Ok(Ok(_)) => tracing::info!("email sent to {}", &email),
            Ok(Err(e)) => tracing::error!("could not send email to {}: {:?}", &email, e),
            Err(e) => tracing::error!("email task failed: {:?}", e),
        }
    });
    Ok(())
}

/// Wraps template content in the shared portal email chrome.
pub(crate) fn layout(title: &str, content: &str) -> String {
    format!(
        r#"
        <!DOCTYPE html>
        <html>
        <head>
            <meta charset="utf-8">
            <meta name="viewport" content="width=device-width, initial-scale=1.0">
            <title>{title}</title>
            <style>
                body {{
                    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, 'Helvetica Neue', Arial, sans-serif;
                    line-height: 1.6;
                    margin: 0;
                    padding: 0;
                    background-color: #f9fafb;
                }}
                .container {{
                    max-width: 600px;
                    margin: 0 auto;
                    padding: 20px;
                }}
                .card {{
                    text-align: center;
                    margin: 40px 0;
                    padding: 30px;
                    background-color: #ffffff;
                    border-radius: 8px;
                    box-shadow: 0 2px 4px rgba(0, 0, 0, 0.1);
                }}
                .highlight {{
                    font-size: 32px;
                    font-weight: bold;
                    letter-spacing: 4px;
                    color: #13665b;
                    margin: 20px 0;
                }}
                .message {{
                    color: #4b5563;
                    font-size: 14px;
                    margin: 20px 0;
                }}
                .button {{
                    display: inline-block;
                    padding: 12px 24px;
                    background-color: #0d9488;
                    color: #ffffff;
                    border-radius: 6px;
                    text-decoration: none;
                }}
            </style>
        </head>
        <body>
            <div class="container">
                <div class="card">
                    <h2 style="color: #111827; margin: 0;">{title}</h2>
                    {content}
                </div>
                <p class="message">{service}</p>
            </div>
        </body>
        </html>
        "#,
        service = &settings.service_name,
    )
}

/// Escapes user-supplied text for interpolation into template markup.
pub(crate) fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
