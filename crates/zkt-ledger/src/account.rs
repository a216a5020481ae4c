//! Accounts keyed by `(address, token)`.

use serde::{Deserialize, Serialize};

use zkt_core::{Address, TokenId};

/// Number of app-state words a contract account carries.
pub const APP_STATE_SLOTS: usize = 8;

/// Identifies one balance: an address holding one token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AccountId {
    /// Holder.
    pub address: Address,
    /// Token held.
    pub token_id: TokenId,
}

impl AccountId {
    /// `address` holding `token_id`.
    pub fn new(address: Address, token_id: TokenId) -> Self {
        Self { address, token_id }
    }

    /// `address` holding the settlement currency.
    pub fn settlement(address: Address) -> Self {
        Self::new(address, TokenId::SETTLEMENT)
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.address, self.token_id)
    }
}

/// What authorization an account action needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthRequired {
    /// Anyone may perform it.
    #[default]
    None,
    /// The holder's signature.
    Signature,
    /// A proof accepted by the account's owner contract.
    Proof,
    /// Nobody may perform it.
    Impossible,
}

/// Per-account permissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Permissions {
    /// Any interaction with the account at all.
    pub access: AuthRequired,
    /// Debiting the account.
    pub send: AuthRequired,
    /// Crediting the account.
    pub receive: AuthRequired,
}

impl Default for Permissions {
    fn default() -> Self {
        Self {
            access: AuthRequired::None,
            send: AuthRequired::Signature,
            receive: AuthRequired::None,
        }
    }
}

/// A partial permissions change. `None` leaves a field as it is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PermissionsUpdate {
    /// New `access`, if changing.
    #[serde(default)]
    pub access: Option<AuthRequired>,
    /// New `send`, if changing.
    #[serde(default)]
    pub send: Option<AuthRequired>,
    /// New `receive`, if changing.
    #[serde(default)]
    pub receive: Option<AuthRequired>,
}

impl PermissionsUpdate {
    /// `current` with this update applied.
    pub fn apply(&self, current: Permissions) -> Permissions {
        Permissions {
            access: self.access.unwrap_or(current.access),
            send: self.send.unwrap_or(current.send),
            receive: self.receive.unwrap_or(current.receive),
        }
    }
}

/// One balance record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Which balance this is.
    pub id: AccountId,
    /// Current balance.
    pub balance: u64,
    /// Number of authorized actions taken by the holder on this account.
    pub nonce: u64,
    /// Current permissions.
    pub permissions: Permissions,
}

impl Account {
    /// A zero-balance account with default permissions.
    pub fn empty(id: AccountId) -> Self {
        Self {
            id,
            balance: 0,
            nonce: 0,
            permissions: Permissions::default(),
        }
    }
}
