//! XML documents returned by STS and their parsing helpers.

// crates.io
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	error::{ResponseFormatError, ServiceError},
	http::StsHttpResponse,
};

const BODY_PREVIEW_LEN: usize = 256;

/// `<GetSessionTokenResponse>` document.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetSessionTokenResponse {
	/// Result payload.
	pub get_session_token_result: GetSessionTokenResult,
	/// Request metadata.
	#[serde(default)]
	pub response_metadata: Option<ResponseMetadata>,
}

/// `<GetSessionTokenResult>` element.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetSessionTokenResult {
	/// Issued credentials.
	pub credentials: CredentialsElement,
}

/// `<GetFederationTokenResponse>` document.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetFederationTokenResponse {
	/// Result payload.
	pub get_federation_token_result: GetFederationTokenResult,
	/// Request metadata.
	#[serde(default)]
	pub response_metadata: Option<ResponseMetadata>,
}

/// `<GetFederationTokenResult>` element.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetFederationTokenResult {
	/// Issued credentials.
	pub credentials: CredentialsElement,
	/// Identity of the federated user.
	pub federated_user: FederatedUserElement,
	/// Percentage of the policy-size limit consumed by the packed policy.
	#[serde(default)]
	pub packed_policy_size: Option<u32>,
}

/// `<Credentials>` element.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CredentialsElement {
	/// Temporary access key id.
	pub access_key_id: String,
	/// Temporary secret access key.
	pub secret_access_key: String,
	/// Session token that accompanies the temporary keys.
	pub session_token: String,
	/// RFC 3339 expiration timestamp.
	pub expiration: String,
}

/// `<FederatedUser>` element.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FederatedUserElement {
	/// ARN of the federated user.
	pub arn: String,
	/// Account-qualified federated user id.
	pub federated_user_id: String,
}

/// `<ResponseMetadata>` element.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResponseMetadata {
	/// Request identifier.
	pub request_id: Option<String>,
}

/// `<ErrorResponse>` document.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ErrorResponse {
	/// Error details.
	pub error: ErrorElement,
	/// Request identifier.
	#[serde(default)]
	pub request_id: Option<String>,
}

/// `<Error>` element.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ErrorElement {
	/// `Sender` or `Receiver`.
	#[serde(rename = "Type", default)]
	pub kind: Option<String>,
	/// Error code.
	pub code: String,
	/// Error message.
	#[serde(default)]
	pub message: Option<String>,
}

/// Parses a successful reply into the action's document.
pub fn parse_document<T>(action: &'static str, body: &str) -> Result<T, ResponseFormatError>
where
	T: DeserializeOwned,
{
	let mut de = quick_xml::de::Deserializer::from_str(body);

	serde_path_to_error::deserialize(&mut de)
		.map_err(|source| ResponseFormatError::Xml { action, source })
}

/// Converts a non-2xx reply into a [`ServiceError`].
///
/// Bodies that are not STS error documents still yield an error carrying the HTTP status
/// and a short preview of the body.
pub fn service_error(response: &StsHttpResponse) -> ServiceError {
	match quick_xml::de::from_str::<ErrorResponse>(&response.body) {
		Ok(document) => ServiceError {
			kind: document.error.kind,
			code: document.error.code,
			message: document.error.message.unwrap_or_default(),
			status: response.status,
			request_id: document.request_id.or_else(|| response.request_id.clone()),
		},
		Err(_) => ServiceError {
			kind: None,
			code: format!("Http{}", response.status),
			message: body_preview(&response.body),
			status: response.status,
			request_id: response.request_id.clone(),
		},
	}
}

fn body_preview(body: &str) -> String {
	let trimmed = body.trim();

	if trimmed.is_empty() {
		return "STS returned an empty error body".into();
	}

	match trimmed.char_indices().nth(BODY_PREVIEW_LEN) {
		Some((idx, _)) => format!("{}...", &trimmed[..idx]),
		None => trimmed.to_owned(),
	}
}
