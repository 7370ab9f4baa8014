use std::str::FromStr;

use chrono::{Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use sqlx::prelude::Type;
use uuid::Uuid;
use validator::ValidateEmail;

use crate::{
    conf::settings,
    pkg::{
        internal::{
            adaptors::users::{
                mutators::UserMutator,
                selectors::UserSelector,
                spec::{NewUser, UserEntry},
            },
            email::{
                SendEmail,
                password::{PasswordResetSuccessTemplate, PasswordResetTemplate},
                verification::VerificationCodeTemplate,
            },
        },
        server::state::AppState,
    },
    prelude::{AppError, Result},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
pub enum Role {
    Student,
    Admin,
    Recruiter,
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "student" => Ok(Role::Student),
            "admin" => Ok(Role::Admin),
            "recruiter" => Ok(Role::Recruiter),
            _ => Err(AppError::bad_request(
                "Invalid role specified. Must be 'student', 'admin', or 'recruiter'.",
            )),
        }
    }
}

impl Role {
    /// Students and admins sign up with an institute address; recruiters may
    /// use any well-formed address.
    pub fn check_email(&self, email: &str, domain: &str, institute: &str) -> Result<()> {
        match self {
            Role::Student | Role::Admin => {
                let allowed = email
                    .rsplit_once('@')
                    .is_some_and(|(local, host)| !local.is_empty() && host == domain);
                if !allowed {
                    return Err(AppError::bad_request(format!(
                        "Only {institute} emails are allowed"
                    )));
                }
            }
            Role::Recruiter => {
                if !email.to_string().validate_email() {
                    return Err(AppError::bad_request("Invalid email format"));
                }
            }
        }
        Ok(())
    }
}

/// The authenticated caller, as injected by the authn middleware.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl From<UserEntry> for User {
    fn from(entry: UserEntry) -> Self {
        User {
            id: entry.id,
            name: entry.name,
            email: entry.email,
            role: entry.role,
        }
    }
}

pub enum LoginOutcome {
    Authenticated(User),
    Unverified(Uuid),
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

pub fn generate_code() -> String {
    rand::rng().random_range(100_000..1_000_000).to_string()
}

pub fn generate_reset_token() -> String {
    let mut bytes = [0u8; 20];
    rand::rng().fill(&mut bytes);
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Only the digest of a reset token is stored.
pub fn digest_token(token: &str) -> String {
    Sha256::digest(token.as_bytes())
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

pub async fn hash_password(password: &str) -> Result<String> {
    let password = password.to_string();
    let cost = settings.bcrypt_cost;
    Ok(tokio::task::spawn_blocking(move || bcrypt::hash(password, cost)).await??)
}

pub async fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let (password, hash) = (password.to_string(), hash.to_string());
    let matched = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash)).await?;
    // a malformed stored hash is treated as a mismatch
    Ok(matched.unwrap_or(false))
}

impl User {
    pub fn require_role(&self, roles: &[Role]) -> Result<()> {
        if roles.contains(&self.role) {
            Ok(())
        } else {
            tracing::warn!("{} ({:?}) denied, needs one of {:?}", &self.email, self.role, roles);
            Err(AppError::Forbidden(
                "You are not allowed to perform this action".into(),
            ))
        }
    }

    /// Loads a verified user; anything else means the session is no longer valid.
    pub async fn load_verified(state: &AppState, id: Uuid) -> Result<Self> {
        let mut conn = state.db_pool.acquire().await?;
        match UserSelector::new(&mut conn).get_by_id(id).await? {
            Some(entry) if entry.is_verified => Ok(entry.into()),
            _ => Err(AppError::Unauthorized("Unauthorized - user not found".into())),
        }
    }

    /// Creates the account, or refreshes an unverified one, and mails a fresh
    /// verification code. Returns the user id.
    pub async fn signup(
        state: &AppState,
        name: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<Uuid> {
        let password_hash = hash_password(password).await?;
        let code = generate_code();
        let mut conn = state.db_pool.acquire().await?;
        let user = UserMutator::new(&mut conn)
            .upsert_unverified(NewUser {
                name,
                email,
                password_hash: &password_hash,
                role,
                code: &code,
                code_expires_at: Utc::now() + Duration::minutes(settings.verification_ttl_minutes),
            })
            .await?
            .ok_or_else(|| AppError::bad_request("User already exists"))?;
        tracing::debug!("issued verification code for {}", &user.email);
        VerificationCodeTemplate {
            name: &user.name,
            code: &code,
        }
        .send(&user.email)?;
        tracing::info!("signup pending verification: {} ({:?})", &user.email, user.role);
        Ok(user.id)
    }

    pub async fn resend_code(state: &AppState, id: Uuid) -> Result<()> {
        let mut conn = state.db_pool.acquire().await?;
        let user = UserSelector::new(&mut conn)
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::bad_request("Invalid Details"))?;
        if user.is_verified {
            return Err(AppError::bad_request("Email already verified"));
        }
        let code = generate_code();
        UserMutator::new(&mut conn)
            .set_verification_code(
                id,
                &code,
                Utc::now() + Duration::minutes(settings.verification_ttl_minutes),
            )
            .await?;
        VerificationCodeTemplate {
            name: &user.name,
            code: &code,
        }
        .send(&user.email)?;
        Ok(())
    }

    pub async fn verify_email(state: &AppState, id: Uuid, code: &str) -> Result<Self> {
        let mut tx = state.db_pool.begin().await?;
        UserSelector::new(&mut tx)
            .get_by_verification_code(id, code)
            .await?
            .ok_or_else(|| AppError::bad_request("Invalid or expired verification code"))?;
        let user = UserMutator::new(&mut tx)
            .mark_verified(id)
            .await?
            .ok_or_else(|| AppError::bad_request("Invalid or expired verification code"))?;
        tx.commit().await?;
        tracing::info!("email verified for {}", &user.email);
        Ok(user.into())
    }

    pub async fn login(state: &AppState, email: &str, password: &str) -> Result<LoginOutcome> {
        let invalid = || AppError::bad_request("Invalid email or password");
        let mut conn = state.db_pool.acquire().await?;
        let user = UserSelector::new(&mut conn)
            .get_by_email(email)
            .await?
            .ok_or_else(invalid)?;
        if !verify_password(password, &user.password_hash).await? {
            tracing::warn!("failed login for {}", email);
            return Err(invalid());
        }
        if !user.is_verified {
            return Ok(LoginOutcome::Unverified(user.id));
        }
        Ok(LoginOutcome::Authenticated(user.into()))
    }

    pub async fn request_password_reset(state: &AppState, email: &str) -> Result<()> {
        let mut conn = state.db_pool.acquire().await?;
        let user = UserSelector::new(&mut conn)
            .get_by_email(email)
            .await?
            .ok_or_else(|| AppError::bad_request("User not found"))?;
        let token = generate_reset_token();
        UserMutator::new(&mut conn)
            .set_reset_token(
                user.id,
                &digest_token(&token),
                Utc::now() + Duration::minutes(settings.reset_ttl_minutes),
            )
            .await?;
        let reset_url = format!(
            "{}/reset-password/{}",
            settings.frontend_url.trim_end_matches('/'),
            token
        );
        PasswordResetTemplate {
            reset_url: &reset_url,
        }
        .send(&user.email)?;
        tracing::info!("password reset requested for {}", &user.email);
        Ok(())
    }

    pub async fn reset_password(state: &AppState, token: &str, password: &str) -> Result<()> {
        let invalid = || AppError::bad_request("Invalid or expired reset token");
        let digest = digest_token(token);
        let mut conn = state.db_pool.acquire().await?;
        UserSelector::new(&mut conn)
            .get_by_reset_digest(&digest)
            .await?
            .ok_or_else(invalid)?;
        let password_hash = hash_password(password).await?;
        let user = UserMutator::new(&mut conn)
            .consume_reset_token(&digest, &password_hash)
            .await?
            .ok_or_else(invalid)?;
        PasswordResetSuccessTemplate.send(&user.email)?;
        tracing::info!("password reset for {}", &user.email);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOMAIN: &str = "iitbhilai.ac.in";

    #[test]
    fn parses_known_roles_only() {
        assert_eq!("student".parse::<Role>().ok(), Some(Role::Student));
        assert_eq!("recruiter".parse::<Role>().ok(), Some(Role::Recruiter));
        let err = "superuser".parse::<Role>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid role specified. Must be 'student', 'admin', or 'recruiter'."
        );
    }

    #[test]
    fn students_and_admins_need_institute_email() {
        for role in [Role::Student, Role::Admin] {
            assert!(role.check_email("ravi@iitbhilai.ac.in", DOMAIN, "IIT Bhilai").is_ok());
            let err = role
                .check_email("ravi@gmail.com", DOMAIN, "IIT Bhilai")
                .unwrap_err();
            assert_eq!(err.to_string(), "Only IIT Bhilai emails are allowed");
            assert!(role.check_email("@iitbhilai.ac.in", DOMAIN, "IIT Bhilai").is_err());
            assert!(
                role.check_email("ravi@evil-iitbhilai.ac.in", DOMAIN, "IIT Bhilai")
                    .is_err()
            );
        }
    }

    #[test]
    fn recruiters_need_a_well_formed_email() {
        assert!(Role::Recruiter.check_email("hr@acme.com", DOMAIN, "IIT Bhilai").is_ok());
        let err = Role::Recruiter
            .check_email("not an email", DOMAIN, "IIT Bhilai")
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid email format");
    }

    #[test]
    fn codes_are_six_digits() {
        for _ in 0..100 {
            let code = generate_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
            assert!(!code.starts_with('0'));
        }
    }

    #[test]
    fn reset_tokens_are_random_hex_and_digest_is_stable() {
        let a = generate_reset_token();
        let b = generate_reset_token();
        assert_eq!(a.len(), 40);
        assert_ne!(a, b);
        assert_eq!(digest_token(&a), digest_token(&a));
        assert_ne!(digest_token(&a), a);
        assert_eq!(digest_token(&a).len(), 64);
    }

    #[test]
    fn normalizes_email_case_and_whitespace() {
        assert_eq!(normalize_email("  Ravi@IITBhilai.ac.in "), "ravi@iitbhilai.ac.in");
    }

    #[test]
    fn require_role_rejects_other_roles() {
        let user = User {
            id: Uuid::new_v4(),
            name: "Ravi".into(),
            email: "ravi@iitbhilai.ac.in".into(),
            role: Role::Student,
        };
        assert!(user.require_role(&[Role::Student]).is_ok());
        let err = user.require_role(&[Role::Admin, Role::Recruiter]).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn password_hash_verifies_only_the_original() -> Result<()> {
        let hash = hash_password("hunter22").await?;
        assert!(verify_password("hunter22", &hash).await?);
        assert!(!verify_password("hunter23", &hash).await?);
        assert!(!verify_password("hunter22", "not-a-hash").await?);
        Ok(())
    }

    mod with_db {
        use sqlx::PgPool;

        use super::*;
        use crate::pkg::server::fixtures::{pending_code, state, verified_user};

        const EMAIL: &str = "asha@iitbhilai.ac.in";

        #[sqlx::test(migrations = "./migrations")]
        async fn signup_verify_then_login(pool: PgPool) -> Result<()> {
            let state = state(pool);
            let id = User::signup(&state, "Asha", EMAIL, "secret123", Role::Student).await?;

            match User::login(&state, EMAIL, "secret123").await? {
                LoginOutcome::Unverified(pending) => assert_eq!(pending, id),
                LoginOutcome::Authenticated(_) => panic!("unverified account signed in"),
            }

            let err = User::verify_email(&state, id, "000000").await.unwrap_err();
            assert_eq!(err.to_string(), "Invalid or expired verification code");

            let code = pending_code(&state, id).await?;
            let user = User::verify_email(&state, id, &code).await?;
            assert_eq!((user.id, user.email.as_str()), (id, EMAIL));
            // spent codes do not verify twice
            assert!(User::verify_email(&state, id, &code).await.is_err());

            match User::login(&state, EMAIL, "secret123").await? {
                LoginOutcome::Authenticated(user) => assert_eq!(user.id, id),
                LoginOutcome::Unverified(_) => panic!("verified account reported unverified"),
            }
            let err = User::login(&state, EMAIL, "wrong-pass").await.err();
            assert_eq!(
                err.map(|e| e.to_string()).as_deref(),
                Some("Invalid email or password")
            );
            Ok(())
        }

        #[sqlx::test(migrations = "./migrations")]
        async fn expired_codes_are_rejected(pool: PgPool) -> Result<()> {
            let state = state(pool);
            let id = User::signup(&state, "Asha", EMAIL, "secret123", Role::Student).await?;
            let mut conn = state.db_pool.acquire().await?;
            UserMutator::new(&mut conn)
                .set_verification_code(id, "123456", Utc::now() - Duration::minutes(1))
                .await?;

            let err = User::verify_email(&state, id, "123456").await.unwrap_err();
            assert_eq!(err.to_string(), "Invalid or expired verification code");
            Ok(())
        }

        #[sqlx::test(migrations = "./migrations")]
        async fn signup_refreshes_pending_users_and_rejects_verified_ones(
            pool: PgPool,
        ) -> Result<()> {
            let state = state(pool);
            let first = User::signup(&state, "Asha", EMAIL, "secret123", Role::Student).await?;
            let again = User::signup(&state, "Asha K", EMAIL, "secret456", Role::Student).await?;
            assert_eq!(first, again);

            let code = pending_code(&state, first).await?;
            User::verify_email(&state, first, &code).await?;

            let err = User::signup(&state, "Asha", EMAIL, "secret789", Role::Student)
                .await
                .unwrap_err();
            assert_eq!(err.to_string(), "User already exists");
            Ok(())
        }

        #[sqlx::test(migrations = "./migrations")]
        async fn reset_tokens_are_spent_once(pool: PgPool) -> Result<()> {
            let state = state(pool);
            let user = verified_user(&state, EMAIL, Role::Student).await?;
            let mut conn = state.db_pool.acquire().await?;
            UserMutator::new(&mut conn)
                .set_reset_token(
                    user.id,
                    &digest_token("reset-me"),
                    Utc::now() + Duration::minutes(10),
                )
                .await?;
            drop(conn);

            let (a, b) = tokio::join!(
                User::reset_password(&state, "reset-me", "first-pass"),
                User::reset_password(&state, "reset-me", "second-pass")
            );
            assert_eq!(
                [a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count(),
                1,
                "exactly one reset may use the token"
            );

            let err = User::reset_password(&state, "reset-me", "third-pass")
                .await
                .unwrap_err();
            assert_eq!(err.to_string(), "Invalid or expired reset token");

            let winner = if a.is_ok() { "first-pass" } else { "second-pass" };
            assert!(matches!(
                User::login(&state, EMAIL, winner).await?,
                LoginOutcome::Authenticated(_)
            ));
            Ok(())
        }

        #[sqlx::test(migrations = "./migrations")]
        async fn garbage_reset_tokens_are_rejected(pool: PgPool) -> Result<()> {
            let state = state(pool);
            verified_user(&state, EMAIL, Role::Student).await?;
            let err = User::reset_password(&state, "no-such-token", "new-pass")
                .await
                .unwrap_err();
            assert!(matches!(err, AppError::BadRequest(_)));
            Ok(())
        }
    }
}
