//! Long-term access keys used to sign STS requests.

// self
use crate::auth::Secret;

/// Static access key pair resolved from the broker configuration for a single call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StaticCredentials {
	/// Access key identifier (`AKIA...`).
	pub access_key_id: String,
	/// Secret access key paired with [`StaticCredentials::access_key_id`].
	pub secret_access_key: Secret,
}
impl StaticCredentials {
	/// Creates a credential pair.
	pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<Secret>) -> Self {
		Self { access_key_id: access_key_id.into(), secret_access_key: secret_access_key.into() }
	}
}
