//! IAM policy documents attached to federation requests.
//!
//! The broker does not interpret policy grammar. It only insists on a JSON object and
//! forwards the entries, in the order given, as compact JSON text.

// self
use crate::{_prelude::*, error::ArgumentError};

/// JSON policy object forwarded verbatim to STS.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PolicyDocument(JsonMap<String, JsonValue>);
impl PolicyDocument {
	/// Wraps an existing JSON object.
	pub fn new(entries: JsonMap<String, JsonValue>) -> Self {
		Self(entries)
	}

	/// Accepts the optional policy argument of a federation call.
	///
	/// `None` and JSON `null` are rejected with [`ArgumentError::MissingPolicy`].
	pub fn from_argument(value: Option<&JsonValue>) -> Result<Self, ArgumentError> {
		match value {
			None | Some(JsonValue::Null) => Err(ArgumentError::MissingPolicy),
			Some(value) => Self::try_from(value.clone()),
		}
	}

	/// Returns the policy entries.
	pub fn entries(&self) -> &JsonMap<String, JsonValue> {
		&self.0
	}

	/// Serializes the policy as compact JSON text.
	pub fn to_json_string(&self) -> String {
		JsonValue::Object(self.0.clone()).to_string()
	}
}
impl TryFrom<JsonValue> for PolicyDocument {
	type Error = ArgumentError;

	fn try_from(value: JsonValue) -> Result<Self, Self::Error> {
		match value {
			JsonValue::Object(entries) => Ok(Self(entries)),
			JsonValue::Null => Err(ArgumentError::MissingPolicy),
			other => Err(ArgumentError::PolicyNotObject { found: json_kind(&other) }),
		}
	}
}
impl FromStr for PolicyDocument {
	type Err = ArgumentError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let value: JsonValue =
			serde_json::from_str(s).map_err(|e| ArgumentError::invalid("policy", e.to_string()))?;

		Self::try_from(value)
	}
}
impl From<PolicyDocument> for JsonValue {
	fn from(value: PolicyDocument) -> Self {
		JsonValue::Object(value.0)
	}
}

pub(crate) fn json_kind(value: &JsonValue) -> &'static str {
	match value {
		JsonValue::Null => "null",
		JsonValue::Bool(_) => "a boolean",
		JsonValue::Number(_) => "a number",
		JsonValue::String(_) => "a string",
		JsonValue::Array(_) => "an array",
		JsonValue::Object(_) => "an object",
	}
}
