//! JSON-lines console.
//!
//! Reads one JSON request per line and writes one JSON response per line.
//! Requests are tagged by `op`; privileged ones carry an `authorization`
//! field holding a `Bearer <token>` value:
//!
//! ```text
//! {"op":"login","username":"root","password":"..."}
//! {"op":"issue_key","authorization":"Bearer ...","class":"VIP","duration":"7 Days"}
//! ```
//!
//! Responses carry an HTTP-style `status` plus either `body` or `error`.
//! This is the only layer that knows about status codes.

use crate::error::{PanelError, PanelResult};
use crate::panel::{Panel, ProvisionRequest};
use keyforge_auth::bearer_token;
use keyforge_ledger::KeyRequest;
use keyforge_types::{KeyClass, KeyDuration, KeyId, OperatorId, Role};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

fn default_device_slots() -> u32 {
    1
}

/// A console request.
#[derive(Clone, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Request {
    Login {
        username: String,
        password: String,
    },
    Panel {
        authorization: Option<String>,
    },
    ToggleMaintenance {
        authorization: Option<String>,
    },
    IssueKey {
        authorization: Option<String>,
        class: String,
        duration: String,
        #[serde(default = "default_device_slots")]
        device_slots: u32,
    },
    RevokeKey {
        authorization: Option<String>,
        key_id: u64,
        owner: Option<u64>,
    },
    ProvisionOperator {
        authorization: Option<String>,
        username: String,
        password: String,
        role: String,
        initial_balance: Option<u64>,
    },
    Operators {
        authorization: Option<String>,
    },
    OperatorKeys {
        authorization: Option<String>,
        owner: u64,
    },
}

impl Request {
    /// Returns the `op` tag.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Login { .. } => "login",
            Self::Panel { .. } => "panel",
            Self::ToggleMaintenance { .. } => "toggle_maintenance",
            Self::IssueKey { .. } => "issue_key",
            Self::RevokeKey { .. } => "revoke_key",
            Self::ProvisionOperator { .. } => "provision_operator",
            Self::Operators { .. } => "operators",
            Self::OperatorKeys { .. } => "operator_keys",
        }
    }
}

/// Error payload of a failed response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub kind: String,
    pub message: String,
}

/// A console response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

impl Response {
    fn ok(body: Value) -> Self {
        Self {
            status: 200,
            body: Some(body),
            error: None,
        }
    }

    fn failure(err: &PanelError) -> Self {
        Self {
            status: status_code(err),
            body: None,
            error: Some(ErrorBody {
                kind: err.kind().to_string(),
                message: err.to_string(),
            }),
        }
    }
}

/// Maps a panel error to its HTTP-style status code.
#[must_use]
pub fn status_code(err: &PanelError) -> u16 {
    match err {
        PanelError::InvalidInput(_) | PanelError::InsufficientFunds { .. } => 400,
        PanelError::Unauthenticated => 401,
        PanelError::Forbidden(_) => 403,
        PanelError::NotFound(_) => 404,
        PanelError::ServiceUnavailable => 503,
        PanelError::Config(_) | PanelError::Internal(_) => 500,
    }
}

fn to_body<T: Serialize>(value: &T) -> PanelResult<Value> {
    serde_json::to_value(value).map_err(|e| PanelError::Internal(e.to_string()))
}

/// Runs one request against the panel.
///
/// # Errors
///
/// Whatever the panel operation returns, or [`PanelError::InvalidInput`] for
/// unknown class, duration or role labels.
pub fn dispatch(panel: &Panel, request: Request) -> PanelResult<Value> {
    match request {
        Request::Login { username, password } => to_body(&panel.login(&username, &password)?),
        Request::Panel { authorization } => to_body(&panel.panel(bearer_token(authorization.as_deref()))?),
        Request::ToggleMaintenance { authorization } => {
            to_body(&panel.toggle_maintenance(bearer_token(authorization.as_deref()))?)
        }
        Request::IssueKey {
            authorization,
            class,
            duration,
            device_slots,
        } => {
            let request = KeyRequest {
                class: class.parse::<KeyClass>()?,
                duration: duration.parse::<KeyDuration>()?,
                device_slots,
            };
            to_body(&panel.issue_key(bearer_token(authorization.as_deref()), &request)?)
        }
        Request::RevokeKey {
            authorization,
            key_id,
            owner,
        } => to_body(&panel.revoke_key(
            bearer_token(authorization.as_deref()),
            KeyId::new(key_id),
            owner.map(OperatorId::new),
        )?),
        Request::ProvisionOperator {
            authorization,
            username,
            password,
            role,
            initial_balance,
        } => {
            let request = ProvisionRequest {
                username,
                password,
                role: role.parse::<Role>()?,
                initial_balance,
            };
            let id = panel.provision_operator(bearer_token(authorization.as_deref()), &request)?;
            Ok(serde_json::json!({ "operator_id": id }))
        }
        Request::Operators { authorization } => to_body(&panel.operators(bearer_token(authorization.as_deref()))?),
        Request::OperatorKeys { authorization, owner } => to_body(
            &panel.operator_keys(bearer_token(authorization.as_deref()), OperatorId::new(owner))?,
        ),
    }
}

/// Parses and runs one request line.
pub fn handle_line(panel: &Panel, line: &str) -> Response {
    let request: Request = match serde_json::from_str(line) {
        Ok(request) => request,
        Err(e) => {
            debug!(error = %e, "Malformed request");
            return Response::failure(&PanelError::InvalidInput(format!("malformed request: {e}")));
        }
    };

    let op = request.name();
    let response = match dispatch(panel, request) {
        Ok(body) => Response::ok(body),
        Err(e) => Response::failure(&e),
    };
    debug!(op, status = response.status, "Request handled");
    response
}

/// Serves requests from `reader` until end of input and returns how many
/// were handled. Blank lines are skipped.
///
/// # Errors
///
/// Returns an I/O error if reading or writing fails.
pub async fn run<R, W>(panel: &Panel, reader: R, mut writer: W) -> std::io::Result<usize>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    let mut handled = 0;

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let response = handle_line(panel, &line);
        let mut encoded = serde_json::to_string(&response).map_err(std::io::Error::other)?;
        encoded.push('\n');
        writer.write_all(encoded.as_bytes()).await?;
        writer.flush().await?;
        handled += 1;
    }

    Ok(handled)
}
