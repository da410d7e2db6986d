use serde::{Deserialize, Serialize};

/// Identity attested by a provider after a successful registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub provider: String,
    pub user_id: String,
    /// False while the account still needs confirming.
    pub confirmed: bool,
}
