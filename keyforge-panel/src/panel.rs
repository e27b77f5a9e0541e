//! The panel: every operator-facing operation over one owned state container.
//!
//! A [`Panel`] owns the credential store, the ledger and the maintenance flag
//! for its whole lifetime. Nothing is global, so tests build as many
//! independent panels as they like. Each privileged operation runs the same
//! pipeline: resolve the session, check the operation's role set, then act on
//! the caller's scope.

use crate::config::{OperatorSeed, PanelConfig};
use crate::error::{PanelError, PanelResult};
use keyforge_auth::access::CROSS_SCOPE;
use keyforge_auth::{
    Argon2Passwords, CredentialStore, Ed25519Tokens, MaintenanceGate, Operation, OperatorIdentity, PasswordHasher,
    Operator, SessionAuthenticator, TokenService, authorize, authorize_operation, provisionable_by,
};
use keyforge_ledger::{CodeGenerator, KeyRecord, KeyRequest, Ledger, LedgerError, RandomCodes, Scope};
use keyforge_types::{KeyId, OperatorId, Role};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Hashed at startup and verified against when a username is unknown, so a
/// miss costs the same as a wrong password.
const DECOY_PASSWORD: &str = "keyforge-decoy-credential";

/// Pluggable capabilities: password hashing, session tokens, key codes.
#[derive(Clone)]
pub struct Capabilities {
    pub passwords: Arc<dyn PasswordHasher>,
    pub tokens: Arc<dyn TokenService>,
    pub codes: Arc<dyn CodeGenerator>,
}

impl Capabilities {
    /// Builds the production capabilities described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`PanelError::Config`] if the hashing parameters or the token
    /// secret are unusable.
    pub fn from_config(config: &PanelConfig) -> PanelResult<Self> {
        let passwords =
            Argon2Passwords::new(&config.password_hashing).map_err(|e| PanelError::Config(e.to_string()))?;
        let tokens = match &config.token_secret {
            Some(secret) => Ed25519Tokens::from_base64_seed(secret).map_err(|e| PanelError::Config(e.to_string()))?,
            None => {
                warn!("No token_secret configured, sessions will not survive a restart");
                Ed25519Tokens::generate()
            }
        };
        Ok(Self {
            passwords: Arc::new(passwords),
            tokens: Arc::new(tokens),
            codes: Arc::new(RandomCodes::new(&config.code_prefix)),
        })
    }
}

/// Result of a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginOutcome {
    pub token: String,
    pub operator_id: OperatorId,
    pub username: String,
    pub role: Role,
    /// Balance of the pool the operator spends from.
    pub balance: u64,
}

/// What an operator sees on the panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelSnapshot {
    pub operator_id: OperatorId,
    pub role: Role,
    pub balance: u64,
    pub maintenance: bool,
    pub keys: Vec<KeyRecord>,
}

/// Maintenance flag after a toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintenanceState {
    pub active: bool,
}

/// Result of a successful issuance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuedKey {
    pub key: KeyRecord,
    pub cost: u64,
    /// Pool balance after the debit.
    pub balance: u64,
}

/// A request to create an operator.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisionRequest {
    pub username: String,
    pub password: String,
    pub role: Role,
    /// Starting private balance. Only valid for roles with a private pool.
    #[serde(default)]
    pub initial_balance: Option<u64>,
}

impl std::fmt::Debug for ProvisionRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProvisionRequest")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("role", &self.role)
            .field("initial_balance", &self.initial_balance)
            .finish()
    }
}

impl From<&OperatorSeed> for ProvisionRequest {
    fn from(seed: &OperatorSeed) -> Self {
        Self {
            username: seed.username.clone(),
            password: seed.password.clone(),
            role: seed.role,
            initial_balance: seed.balance,
        }
    }
}

/// One row of the operator listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorSummary {
    pub id: OperatorId,
    pub username: String,
    pub role: Role,
    /// Private balance; None for roles spending from the shared pool.
    pub balance: Option<u64>,
}

/// The injectable state container.
pub struct Panel {
    credentials: Arc<CredentialStore>,
    sessions: SessionAuthenticator,
    passwords: Arc<dyn PasswordHasher>,
    decoy_hash: String,
    ledger: Ledger,
    maintenance: MaintenanceGate,
    default_reseller_balance: u64,
}

impl std::fmt::Debug for Panel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Panel")
            .field("operators", &self.credentials.len())
            .field("ledger", &self.ledger)
            .field("maintenance", &self.maintenance.is_active())
            .finish_non_exhaustive()
    }
}

impl Panel {
    /// Builds a panel with production capabilities and seeds its operators.
    ///
    /// # Errors
    ///
    /// Returns [`PanelError::Config`] for invalid configuration, or the error
    /// of the first operator seed that cannot be created.
    pub fn bootstrap(config: &PanelConfig) -> PanelResult<Self> {
        let capabilities = Capabilities::from_config(config)?;
        Self::with_capabilities(config, capabilities)
    }

    /// Builds a panel with explicit capabilities and seeds its operators.
    ///
    /// # Errors
    ///
    /// Same as [`Panel::bootstrap`].
    pub fn with_capabilities(config: &PanelConfig, capabilities: Capabilities) -> PanelResult<Self> {
        config.validate()?;

        let credentials = Arc::new(CredentialStore::new());
        let decoy_hash = capabilities.passwords.hash(DECOY_PASSWORD)?;
        let panel = Self {
            sessions: SessionAuthenticator::new(
                Arc::clone(&credentials),
                capabilities.tokens,
                config.session_ttl_secs,
            ),
            credentials,
            passwords: capabilities.passwords,
            decoy_hash,
            ledger: Ledger::new(config.shared_pool, capabilities.codes),
            maintenance: MaintenanceGate::new(config.maintenance.enabled, config.maintenance.policy.clone()),
            default_reseller_balance: config.default_reseller_balance,
        };

        for seed in &config.operators {
            panel.create_operator(&ProvisionRequest::from(seed))?;
        }

        info!(
            operators = panel.credentials.len(),
            shared_pool = config.shared_pool,
            maintenance = config.maintenance.enabled,
            "Panel ready"
        );
        Ok(panel)
    }

    /// Returns true if maintenance is active.
    #[must_use]
    pub fn maintenance_active(&self) -> bool {
        self.maintenance.is_active()
    }

    // ── Pipeline ─────────────────────────────────────────────────

    fn identify(&self, token: Option<&str>) -> PanelResult<OperatorIdentity> {
        self.sessions.authenticate(token).map_err(|e| {
            debug!(error = %e, "Session rejected");
            PanelError::from(e)
        })
    }

    fn admit(&self, token: Option<&str>, operation: Operation) -> PanelResult<OperatorIdentity> {
        let identity = self.identify(token)?;
        authorize_operation(&identity, operation)?;
        Ok(identity)
    }

    fn scope_of(identity: &OperatorIdentity) -> Scope {
        Scope::for_operator(identity.id, identity.role)
    }

    /// Returns the operator if `password` matches. Unknown usernames are
    /// verified against the decoy hash and never match.
    fn verify_password(&self, operator: Option<Operator>, password: &str) -> Option<Operator> {
        match operator {
            Some(operator) => self.passwords.verify(password, &operator.password_hash).then_some(operator),
            None => {
                self.passwords.verify(password, &self.decoy_hash);
                None
            }
        }
    }

    /// Resolves the private scope of `owner`, which must be an operator with
    /// a private pool.
    fn private_scope(&self, owner: OperatorId) -> PanelResult<Scope> {
        let scope = Scope::Operator(owner);
        if self.ledger.has_account(scope) {
            Ok(scope)
        } else {
            Err(PanelError::NotFound(format!("no key scope for operator {owner}")))
        }
    }

    // ── Operations ───────────────────────────────────────────────

    /// Verifies credentials and starts a session.
    ///
    /// The password is always verified first. While maintenance is active, an
    /// exempt role only counts once the password matched, so every failed
    /// attempt on a username not exempt by name gets
    /// [`PanelError::ServiceUnavailable`], whatever the account's role.
    ///
    /// # Errors
    ///
    /// [`PanelError::ServiceUnavailable`] under maintenance,
    /// [`PanelError::Unauthenticated`] for an unknown username or a wrong
    /// password.
    pub fn login(&self, username: &str, password: &str) -> PanelResult<LoginOutcome> {
        let operator = self.credentials.find_by_username(username);
        let verified = self.verify_password(operator, password);

        if let Err(e) = self.maintenance.check_login(username, verified.as_ref().map(|op| op.role)) {
            warn!(username, "Login refused during maintenance");
            return Err(e.into());
        }

        let Some(operator) = verified else {
            warn!(username, "Login failed");
            return Err(PanelError::Unauthenticated);
        };

        let token = self.sessions.start_session(&operator)?;
        let balance = self
            .ledger
            .balance(Scope::for_operator(operator.id, operator.role))?;

        info!(operator_id = %operator.id, role = %operator.role, "Operator logged in");
        Ok(LoginOutcome {
            token,
            operator_id: operator.id,
            username: operator.username,
            role: operator.role,
            balance,
        })
    }

    /// Returns the caller's balance, the maintenance flag and the keys of the
    /// caller's scope. Reading twice without writes in between yields the
    /// same snapshot.
    ///
    /// # Errors
    ///
    /// [`PanelError::Unauthenticated`] or [`PanelError::Forbidden`].
    pub fn panel(&self, token: Option<&str>) -> PanelResult<PanelSnapshot> {
        let identity = self.admit(token, Operation::ViewPanel)?;
        let account = self.ledger.snapshot(Self::scope_of(&identity))?;

        Ok(PanelSnapshot {
            operator_id: identity.id,
            role: identity.role,
            balance: account.balance,
            maintenance: self.maintenance.is_active(),
            keys: account.keys,
        })
    }

    /// Flips the maintenance flag.
    ///
    /// # Errors
    ///
    /// [`PanelError::Unauthenticated`] or [`PanelError::Forbidden`].
    pub fn toggle_maintenance(&self, token: Option<&str>) -> PanelResult<MaintenanceState> {
        let identity = self.admit(token, Operation::ToggleMaintenance)?;
        let active = self.maintenance.toggle();
        info!(operator_id = %identity.id, active, "Maintenance toggled");
        Ok(MaintenanceState { active })
    }

    /// Runs the issuance transaction against the caller's pool.
    ///
    /// # Errors
    ///
    /// [`PanelError::Unauthenticated`], [`PanelError::Forbidden`],
    /// [`PanelError::InvalidInput`] for zero device slots, or
    /// [`PanelError::InsufficientFunds`]. On any error nothing is debited or
    /// minted.
    pub fn issue_key(&self, token: Option<&str>, request: &KeyRequest) -> PanelResult<IssuedKey> {
        let identity = self.admit(token, Operation::IssueKey)?;
        let issued = self.ledger.issue(Self::scope_of(&identity), request)?;

        info!(operator_id = %identity.id, key_id = %issued.key.id, "Operator issued key");
        Ok(IssuedKey {
            key: issued.key,
            cost: issued.cost,
            balance: issued.balance,
        })
    }

    /// Revokes a key.
    ///
    /// Without `owner` the key is looked up in the caller's own scope (the
    /// global scope for admin-tier). Naming another operator's scope requires
    /// an admin-tier role.
    ///
    /// # Errors
    ///
    /// [`PanelError::Unauthenticated`], [`PanelError::Forbidden`], or
    /// [`PanelError::NotFound`] if the scope or key does not exist.
    pub fn revoke_key(
        &self,
        token: Option<&str>,
        key_id: KeyId,
        owner: Option<OperatorId>,
    ) -> PanelResult<KeyRecord> {
        let identity = self.admit(token, Operation::RevokeKey)?;
        let own = Self::scope_of(&identity);

        let scope = match owner {
            None => own,
            Some(owner) if own.owner() == Some(owner) => own,
            Some(owner) => {
                authorize(&identity, CROSS_SCOPE, "revoke keys in another operator's scope")?;
                self.private_scope(owner)?
            }
        };

        let record = self.ledger.revoke(scope, key_id)?;
        info!(operator_id = %identity.id, scope = %scope, key_id = %key_id, "Operator revoked key");
        Ok(record)
    }

    /// Creates a new operator.
    ///
    /// Admins may create users, moderators and resellers; super admins may
    /// create any role. A reseller's private pool is opened before the new
    /// operator can log in.
    ///
    /// # Errors
    ///
    /// [`PanelError::Unauthenticated`], [`PanelError::Forbidden`], or
    /// [`PanelError::InvalidInput`] for an empty or taken username, an empty
    /// password, or a balance given for a role without a private pool.
    pub fn provision_operator(&self, token: Option<&str>, request: &ProvisionRequest) -> PanelResult<OperatorId> {
        let identity = self.admit(token, Operation::ProvisionOperator)?;
        if !provisionable_by(identity.role).contains(request.role) {
            warn!(operator_id = %identity.id, role = %request.role, "Provisioning denied");
            return Err(PanelError::Forbidden(format!(
                "role {} may not create {} operators",
                identity.role, request.role
            )));
        }

        let id = self.create_operator(request)?;
        info!(operator_id = %identity.id, new_operator_id = %id, role = %request.role, "Operator provisioned");
        Ok(id)
    }

    /// Lists every operator with its private balance.
    ///
    /// # Errors
    ///
    /// [`PanelError::Unauthenticated`] or [`PanelError::Forbidden`].
    pub fn operators(&self, token: Option<&str>) -> PanelResult<Vec<OperatorSummary>> {
        self.admit(token, Operation::InspectOperators)?;

        self.credentials
            .list()
            .into_iter()
            .map(|operator| -> PanelResult<OperatorSummary> {
                let balance = match Scope::for_operator(operator.id, operator.role) {
                    Scope::Global => None,
                    scope => Some(self.ledger.balance(scope)?),
                };
                Ok(OperatorSummary {
                    id: operator.id,
                    username: operator.username,
                    role: operator.role,
                    balance,
                })
            })
            .collect()
    }

    /// Lists the keys in another operator's private scope.
    ///
    /// # Errors
    ///
    /// [`PanelError::Unauthenticated`], [`PanelError::Forbidden`], or
    /// [`PanelError::NotFound`] if `owner` has no private scope.
    pub fn operator_keys(&self, token: Option<&str>, owner: OperatorId) -> PanelResult<Vec<KeyRecord>> {
        self.admit(token, Operation::InspectOperators)?;
        let scope = self.private_scope(owner)?;
        Ok(self.ledger.list(scope)?)
    }

    /// Validates, hashes and registers an operator, opening its private pool
    /// under the credential store's write lock.
    fn create_operator(&self, request: &ProvisionRequest) -> PanelResult<OperatorId> {
        let username = request.username.trim();
        if username.is_empty() {
            return Err(PanelError::InvalidInput("username must not be empty".into()));
        }
        if request.password.is_empty() {
            return Err(PanelError::InvalidInput("password must not be empty".into()));
        }

        let private_pool = request.role.has_private_pool();
        let balance = match (private_pool, request.initial_balance) {
            (true, balance) => balance.unwrap_or(self.default_reseller_balance),
            (false, None) => 0,
            (false, Some(_)) => {
                return Err(PanelError::InvalidInput(format!(
                    "role {} spends from the shared pool and takes no balance",
                    request.role
                )));
            }
        };
        if self.credentials.contains_username(username) {
            return Err(PanelError::InvalidInput(format!("username already taken: {username}")));
        }

        let hash = self.passwords.hash(&request.password)?;
        let (operator, opened) = self.credentials.insert_with(username, hash, request.role, |operator| {
            if private_pool {
                self.ledger.open_account(operator.id, balance)
            } else {
                Ok::<(), LedgerError>(())
            }
        })?;
        opened?;

        Ok(operator.id)
    }
}
