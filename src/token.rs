//! Issued token records and their host-facing JSON shape.
//!
//! Records are produced fresh per call and never cached. Serializing a record yields the
//! shape scripting hosts consume, with `Expiration` as epoch milliseconds.

// crates.io
use serde::Serializer;
use time::format_description::well_known::Rfc3339;
// self
use crate::{
	_prelude::*,
	auth::Secret,
	error::ResponseFormatError,
	sts::{CredentialsElement, FederatedUserElement, GetFederationTokenResponse, GetSessionTokenResponse},
};

/// Temporary credentials issued by STS.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TemporaryCredentials {
	/// Temporary access key id.
	pub access_key_id: String,
	/// Temporary secret access key.
	pub secret_access_key: Secret,
	/// Session token paired with the temporary keys.
	pub session_token: Secret,
	/// Instant the credentials stop working.
	#[serde(serialize_with = "serialize_epoch_millis")]
	pub expiration: OffsetDateTime,
}
impl TemporaryCredentials {
	/// Expiration as milliseconds since the Unix epoch.
	pub fn expiration_millis(&self) -> i64 {
		epoch_millis(self.expiration)
	}

	/// Returns `true` once `now` reaches the expiration instant.
	pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
		now >= self.expiration
	}
}
impl TryFrom<CredentialsElement> for TemporaryCredentials {
	type Error = ResponseFormatError;

	fn try_from(element: CredentialsElement) -> Result<Self, Self::Error> {
		let expiration = OffsetDateTime::parse(&element.expiration, &Rfc3339).map_err(|source| {
			ResponseFormatError::Expiration { value: element.expiration.clone(), source }
		})?;

		Ok(Self {
			access_key_id: element.access_key_id,
			secret_access_key: Secret::new(element.secret_access_key),
			session_token: Secret::new(element.session_token),
			expiration,
		})
	}
}

/// Identity of a federated user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct FederatedUser {
	/// ARN of the federated user.
	pub arn: String,
	/// Account-qualified federated user id.
	pub federated_user_id: String,
}
impl From<FederatedUserElement> for FederatedUser {
	fn from(element: FederatedUserElement) -> Self {
		Self { arn: element.arn, federated_user_id: element.federated_user_id }
	}
}

/// Result of `GetSessionToken`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SessionToken {
	/// Issued credentials.
	pub credentials: TemporaryCredentials,
}
impl SessionToken {
	/// Converts the record into the host's JSON shape.
	pub fn to_json(&self) -> Result<JsonValue, ResponseFormatError> {
		serde_json::to_value(self)
			.map_err(|source| ResponseFormatError::Shape { action: "session token", source })
	}
}
impl TryFrom<GetSessionTokenResponse> for SessionToken {
	type Error = ResponseFormatError;

	fn try_from(document: GetSessionTokenResponse) -> Result<Self, Self::Error> {
		Ok(Self { credentials: document.get_session_token_result.credentials.try_into()? })
	}
}

/// Result of `GetFederationToken`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct FederationToken {
	/// Issued credentials.
	pub credentials: TemporaryCredentials,
	/// Identity of the federated user.
	pub federated_user: FederatedUser,
	/// Percentage of the policy-size limit used, as reported by STS.
	pub packed_policy_size: Option<u32>,
}
impl FederationToken {
	/// Converts the record into the host's JSON shape.
	pub fn to_json(&self) -> Result<JsonValue, ResponseFormatError> {
		serde_json::to_value(self)
			.map_err(|source| ResponseFormatError::Shape { action: "federation token", source })
	}
}
impl TryFrom<GetFederationTokenResponse> for FederationToken {
	type Error = ResponseFormatError;

	fn try_from(document: GetFederationTokenResponse) -> Result<Self, Self::Error> {
		let result = document.get_federation_token_result;

		Ok(Self {
			credentials: result.credentials.try_into()?,
			federated_user: result.federated_user.into(),
			packed_policy_size: result.packed_policy_size,
		})
	}
}

fn epoch_millis(at: OffsetDateTime) -> i64 {
	(at.unix_timestamp_nanos() / 1_000_000) as i64
}

fn serialize_epoch_millis<S>(at: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
	S: Serializer,
{
	serializer.serialize_i64(epoch_millis(*at))
}
