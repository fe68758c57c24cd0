//! Request types for `GetSessionToken` and `GetFederationToken`.

// crates.io
use percent_encoding::percent_decode_str;
// self
use crate::{
	_prelude::*,
	policy::PolicyDocument,
	sign,
	sts::{API_VERSION, GetFederationTokenResponse, GetSessionTokenResponse, StsAction},
};

/// `GetSessionToken` request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GetSessionTokenRequest {
	/// Lifetime of the issued credentials; STS applies its default when absent.
	pub duration_seconds: Option<i32>,
}
impl StsAction for GetSessionTokenRequest {
	type Response = GetSessionTokenResponse;

	const ACTION: &'static str = "GetSessionToken";

	fn parameters(&self) -> BTreeMap<&'static str, String> {
		let mut params = BTreeMap::new();

		if let Some(seconds) = self.duration_seconds {
			params.insert("DurationSeconds", seconds.to_string());
		}

		params
	}
}

/// `GetFederationToken` request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GetFederationTokenRequest {
	/// Federated user name; STS enforces the length and character set.
	pub name: String,
	/// Policy attached to the federated session.
	pub policy: PolicyDocument,
	/// Lifetime of the issued credentials; STS applies its default when absent.
	pub duration_seconds: Option<i32>,
}
impl StsAction for GetFederationTokenRequest {
	type Response = GetFederationTokenResponse;

	const ACTION: &'static str = "GetFederationToken";

	fn parameters(&self) -> BTreeMap<&'static str, String> {
		let mut params = BTreeMap::new();

		params.insert("Name", self.name.clone());
		params.insert("Policy", self.policy.to_json_string());

		if let Some(seconds) = self.duration_seconds {
			params.insert("DurationSeconds", seconds.to_string());
		}

		params
	}
}

/// Encodes an action as an `application/x-www-form-urlencoded` body.
pub fn encode_form<A>(action: &A) -> String
where
	A: StsAction,
{
	let mut params = action.parameters();

	params.insert("Action", A::ACTION.into());
	params.insert("Version", API_VERSION.into());

	params
		.iter()
		.map(|(key, value)| format!("{}={}", sign::encode_component(key), sign::encode_component(value)))
		.collect::<Vec<_>>()
		.join("&")
}

/// Decodes a form body produced by [`encode_form`] (or any STS client).
pub fn decode_form(body: &str) -> BTreeMap<String, String> {
	body.split('&')
		.filter(|pair| !pair.is_empty())
		.map(|pair| {
			let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
			let decode = |raw: &str| {
				percent_decode_str(&raw.replace('+', " ")).decode_utf8_lossy().into_owned()
			};

			(decode(key), decode(value))
		})
		.collect()
}
