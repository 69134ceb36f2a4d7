//! REST authentication routes.
//!
//! The session probe and the two password-reset routes are plain REST
//! endpoints consumed by the web client outside of GraphQL.

use axum::{http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use service::{
    command::{self, Command as _},
    domain::user,
};
use tracing as log;
use uuid::Uuid;

use crate::Context;

/// Response of the session verification route.
///
/// This is the one canonical shape: `userId` is present exactly when
/// `authenticated` is `true`.
#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponse {
    /// Indicator whether the request carries a valid session.
    pub authenticated: bool,

    /// ID of the authenticated user, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Uuid>,
}

/// `GET /api/auth/verify` handler.
///
/// Never fails: an absent, expired or malformed token simply yields
/// `authenticated: false`.
pub async fn verify(ctx: Context) -> Json<VerifyResponse> {
    let user_id: Option<Uuid> = match ctx.try_current_session().await {
        Ok(session) => session.map(|s| {
            let id: user::Id = s.user_id.into();
            id.into()
        }),
        Err(e) => {
            log::debug!("session verification failed: {e}");
            None
        }
    };
    Json(VerifyResponse {
        authenticated: user_id.is_some(),
        user_id,
    })
}

/// Request body of the forget-password route.
#[derive(Clone, Debug, Deserialize)]
pub struct ForgetRequest {
    /// Email the reset link is requested for.
    pub email: String,
}

/// Response body of the password-reset routes.
#[derive(Clone, Debug, Serialize)]
pub struct Message {
    /// Human-readable outcome.
    pub message: String,
}

impl Message {
    /// Builds a [`Message`] response with the provided status.
    fn with_status(
        status: StatusCode,
        message: impl Into<String>,
    ) -> (StatusCode, Json<Self>) {
        (
            status,
            Json(Self {
                message: message.into(),
            }),
        )
    }
}

/// `POST /api/auth/forget` handler.
///
/// Responds 400 when no user carries the email, 200 once the reset link is
/// mailed, and 500 on an internal failure.
pub async fn forget(
    ctx: Context,
    Json(body): Json<ForgetRequest>,
) -> (StatusCode, Json<Message>) {
    use command::request_password_reset::ExecutionError as E;

    let Some(email) = user::Email::new(body.email) else {
        return Message::with_status(
            StatusCode::BAD_REQUEST,
            "Invalid email address",
        );
    };

    match ctx
        .service()
        .execute(command::RequestPasswordReset { email })
        .await
    {
        Ok(()) => Message::with_status(StatusCode::OK, "Reset link sent"),
        Err(e) => match e.as_ref() {
            E::UserNotExists => Message::with_status(
                StatusCode::BAD_REQUEST,
                "No user with this email exists",
            ),
            E::Db(_) | E::JsonWebTokenEncodeError(_) | E::Mail(_) => {
                log::error!("password reset request failed: {e}");
                Message::with_status(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error",
                )
            }
        },
    }
}

/// Request body of the reset-password route.
#[derive(Debug, Deserialize)]
pub struct ResetRequest {
    /// Reset token from the mailed link.
    pub token: String,

    /// New password to set.
    pub password: String,
}

/// `POST /api/auth/reset` handler.
///
/// Responds 400 on an invalid or expired token, 404 when the user the
/// token was issued for no longer exists, 200 on success and 500
/// otherwise.
pub async fn reset(
    ctx: Context,
    Json(body): Json<ResetRequest>,
) -> (StatusCode, Json<Message>) {
    use command::reset_password::ExecutionError as E;

    let ResetRequest { token, password } = body;
    let Some(password) = user::Password::new(password) else {
        return Message::with_status(
            StatusCode::BAD_REQUEST,
            "Invalid password",
        );
    };

    match ctx
        .service()
        .execute(command::ResetPassword {
            token,
            password: secrecy::SecretBox::init_with(move || password),
        })
        .await
    {
        Ok(()) => Message::with_status(StatusCode::OK, "Password updated"),
        Err(e) => match e.as_ref() {
            E::TokenExpired => Message::with_status(
                StatusCode::BAD_REQUEST,
                "Reset token has expired",
            ),
            E::TokenInvalid => Message::with_status(
                StatusCode::BAD_REQUEST,
                "Reset token is invalid",
            ),
            E::UserNotExists(_) => Message::with_status(
                StatusCode::NOT_FOUND,
                "User no longer exists",
            ),
            E::Db(_) => {
                log::error!("password reset failed: {e}");
                Message::with_status(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error",
                )
            }
        },
    }
}
