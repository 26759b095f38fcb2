//! Email template rendering engine.
//!
//! Handlebars templates, one body per event, wrapped in a shared header and
//! footer. Rendering runs in strict mode, so a template never silently emits
//! an empty placeholder.

use std::sync::Arc;

use handlebars::Handlebars;
use tracing::debug;

use crate::error::{NotifyError, NotifyResult};
use crate::events::{EventKind, VAR_EMAIL};
use crate::recipient::RecipientData;

/// Rendered email content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEmail {
    /// Email subject line.
    pub subject: String,
    /// HTML body content.
    pub body: String,
}

/// Template engine for rendering notification emails.
#[derive(Clone)]
pub struct TemplateEngine {
    handlebars: Arc<Handlebars<'static>>,
}

impl TemplateEngine {
    /// Create a new template engine with every event template registered.
    pub fn new() -> NotifyResult<Self> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(true);

        handlebars.register_partial("header", HEADER_PARTIAL)?;
        handlebars.register_partial("footer", FOOTER_PARTIAL)?;

        for kind in EventKind::ALL {
            handlebars.register_template_string(kind.as_str(), body_template(kind))?;
            handlebars.register_template_string(&subject_key(kind), kind.subject())?;
        }

        Ok(Self {
            handlebars: Arc::new(handlebars),
        })
    }

    /// Render subject and body for an event.
    ///
    /// Fails with `MissingVariable` before touching the templates when the
    /// recipient data lacks the address or a variable the event requires.
    pub fn render(&self, kind: EventKind, data: &RecipientData) -> NotifyResult<RenderedEmail> {
        let missing = std::iter::once(VAR_EMAIL)
            .chain(kind.required_variables().iter().copied())
            .find(|var| !data.has(var));
        if let Some(var) = missing {
            return Err(NotifyError::MissingVariable(var.to_string()));
        }

        debug!(event = %kind, "Rendering notification email");

        let subject = self.handlebars.render(&subject_key(kind), data)?;
        let body = self.handlebars.render(kind.as_str(), data)?;

        Ok(RenderedEmail { subject, body })
    }
}

fn subject_key(kind: EventKind) -> String {
    format!("{}_subject", kind.as_str())
}

fn body_template(kind: EventKind) -> &'static str {
    match kind {
        EventKind::EmailVerification => EMAIL_VERIFICATION_TEMPLATE,
        EventKind::PasswordReset => PASSWORD_RESET_TEMPLATE,
        EventKind::AccountLocked => ACCOUNT_LOCKED_TEMPLATE,
        EventKind::AccountUnlocked => ACCOUNT_UNLOCKED_TEMPLATE,
        EventKind::RoleUpgrade => ROLE_UPGRADE_TEMPLATE,
        EventKind::ProfessionalStatusUpgrade => PROFESSIONAL_STATUS_TEMPLATE,
    }
}

// ============================================================================
// Email Templates
// ============================================================================

const HEADER_PARTIAL: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
</head>
<body style="margin: 0; padding: 0; font-family: Arial, sans-serif; background-color: #f4f4f5;">
  <div style="max-width: 600px; margin: 0 auto; padding: 40px 20px;">
    <div style="background-color: #ffffff; border-radius: 8px; padding: 40px;">
"#;

const FOOTER_PARTIAL: &str = r#"
    </div>
    <p style="color: #71717a; font-size: 12px; text-align: center; margin-top: 24px;">
      This message was sent to {{email}}. If you did not expect it, you can ignore it.
    </p>
  </div>
</body>
</html>"#;

const EMAIL_VERIFICATION_TEMPLATE: &str = r#"{{> header}}
      <h1 style="color: #18181b; font-size: 24px;">Welcome, {{name}}!</h1>
      <p style="color: #52525b; font-size: 16px; line-height: 24px;">
        Thanks for signing up. Please verify your email address to activate your account.
      </p>
      <p style="text-align: center;">
        <a href="{{verification_url}}" style="display: inline-block; background-color: #2563eb; color: #ffffff; padding: 12px 32px; text-decoration: none; border-radius: 6px;">Verify Email Address</a>
      </p>
      <p style="color: #71717a; font-size: 12px;">Or paste this link into your browser: {{verification_url}}</p>
{{> footer}}"#;

const PASSWORD_RESET_TEMPLATE: &str = r#"{{> header}}
      <h1 style="color: #18181b; font-size: 24px;">Reset your password</h1>
      <p style="color: #52525b; font-size: 16px; line-height: 24px;">
        Hi {{name}}, we received a request to reset the password for your account.
      </p>
      <p style="text-align: center;">
        <a href="{{reset_url}}" style="display: inline-block; background-color: #2563eb; color: #ffffff; padding: 12px 32px; text-decoration: none; border-radius: 6px;">Reset Password</a>
      </p>
      <p style="color: #71717a; font-size: 12px;">If you did not ask for a reset, no action is needed.</p>
{{> footer}}"#;

const ACCOUNT_LOCKED_TEMPLATE: &str = r#"{{> header}}
      <h1 style="color: #18181b; font-size: 24px;">Your account has been locked</h1>
      <p style="color: #52525b; font-size: 16px; line-height: 24px;">
        Hi {{name}}, your account was locked after too many failed login attempts.
        Please contact support to unlock it.
      </p>
{{> footer}}"#;

const ACCOUNT_UNLOCKED_TEMPLATE: &str = r#"{{> header}}
      <h1 style="color: #18181b; font-size: 24px;">Your account has been unlocked</h1>
      <p style="color: #52525b; font-size: 16px; line-height: 24px;">
        Hi {{name}}, your account is active again and you can log in.
      </p>
{{> footer}}"#;

const ROLE_UPGRADE_TEMPLATE: &str = r#"{{> header}}
      <h1 style="color: #18181b; font-size: 24px;">Your role has changed</h1>
      <p style="color: #52525b; font-size: 16px; line-height: 24px;">
        Hi {{name}}, your account has been upgraded to the {{role}} role.
      </p>
{{> footer}}"#;

const PROFESSIONAL_STATUS_TEMPLATE: &str = r#"{{> header}}
      <h1 style="color: #18181b; font-size: 24px;">Professional status granted</h1>
      <p style="color: #52525b; font-size: 16px; line-height: 24px;">
        Congratulations {{name}}, your account now has professional status.
      </p>
{{> footer}}"#;
