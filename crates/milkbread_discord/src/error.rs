use miette::Diagnostic;
use serenity::http::HttpError;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum DiscordError {
    #[error("Discord client build failed")]
    #[diagnostic(
        code(milkbread::discord::client_build_failed),
        help("Check that the bot token and application id are valid")
    )]
    ClientBuildFailed {
        #[source]
        cause: serenity::Error,
    },

    #[error("Discord gateway connection lost")]
    #[diagnostic(
        code(milkbread::discord::gateway_connection_lost),
        help("Discord may be unreachable, or the token may have been revoked")
    )]
    GatewayConnectionLost {
        #[source]
        cause: serenity::Error,
    },
}

pub type Result<T> = std::result::Result<T, DiscordError>;

/// How answering one interaction failed. An expired token is routine and
/// swallowed by callers; anything else is worth logging.
#[derive(Error, Debug)]
pub enum InteractionError {
    #[error("interaction token expired")]
    Expired,
    #[error("interaction response failed")]
    Other(#[source] serenity::Error),
}

impl From<serenity::Error> for InteractionError {
    fn from(err: serenity::Error) -> Self {
        if let serenity::Error::Http(HttpError::UnsuccessfulRequest(ref response)) = err {
            if is_expired_code(response.error.code) {
                return InteractionError::Expired;
            }
        }
        InteractionError::Other(err)
    }
}

/// Error codes Discord returns once an interaction can no longer be
/// answered: 10062 Unknown interaction, 40060 already acknowledged.
pub fn is_expired_code(code: isize) -> bool {
    matches!(code, 10062 | 40060)
}
