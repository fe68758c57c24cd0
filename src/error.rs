//! Broker-level error types shared across operations, transports, and the host binding.

// self
use crate::_prelude::*;

/// Broker-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical broker error exposed by public APIs.
///
/// Every failure aborts the in-flight operation; nothing is retried and no partial result
/// is returned.
#[derive(Debug, ThisError)]
pub enum Error {
	/// A caller-supplied argument or configuration value was rejected locally.
	#[error(transparent)]
	InvalidArgument(#[from] ArgumentError),
	/// STS rejected the request (bad credentials, bounds violations, throttling).
	#[error(transparent)]
	ServiceRejected(#[from] ServiceError),
	/// Client construction or the network round-trip failed.
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// STS answered successfully but the body could not be parsed or reshaped.
	#[error(transparent)]
	ResponseFormat(#[from] ResponseFormatError),
}
impl Error {
	/// Renders the error together with every underlying cause, outermost first.
	pub fn describe(&self) -> String {
		let mut message = self.to_string();
		let mut source = StdError::source(self);

		while let Some(cause) = source {
			let text = cause.to_string();

			if !message.contains(&text) {
				message.push_str(": ");
				message.push_str(&text);
			}

			source = cause.source();
		}

		message
	}
}

/// Local argument validation failures.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum ArgumentError {
	/// Federation requests need a policy document.
	#[error("policy cannot be null.")]
	MissingPolicy,
	/// The policy was supplied but is not a JSON object.
	#[error("policy must be a JSON object, found {found}.")]
	PolicyNotObject {
		/// JSON kind that was supplied instead.
		found: &'static str,
	},
	/// A required credential field has not been configured.
	#[error("{field} cannot be null.")]
	MissingCredential {
		/// Configuration property name.
		field: &'static str,
	},
	/// A host-supplied argument has the wrong shape.
	#[error("Argument `{name}` is invalid: {reason}.")]
	InvalidParameter {
		/// Argument or property name.
		name: String,
		/// Human-readable explanation.
		reason: String,
	},
	/// The host asked for a property the object does not expose.
	#[error("{class} has no property named `{name}`.")]
	UnknownProperty {
		/// Host class name.
		class: &'static str,
		/// Requested property.
		name: String,
	},
	/// The host invoked a function the object does not expose.
	#[error("{class} has no function named `{name}`.")]
	UnknownFunction {
		/// Host class name.
		class: &'static str,
		/// Requested function.
		name: String,
	},
}
impl ArgumentError {
	/// Builds an [`ArgumentError::InvalidParameter`].
	pub fn invalid(name: impl Into<String>, reason: impl Into<String>) -> Self {
		Self::InvalidParameter { name: name.into(), reason: reason.into() }
	}
}

/// Error document (or bare status) returned by STS.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error(
	"{message} (Service: AWSSecurityTokenService; Status Code: {status}; Error Code: {code}; Request ID: {})",
	.request_id.as_deref().unwrap_or("unknown")
)]
pub struct ServiceError {
	/// Fault side reported by STS (`Sender` or `Receiver`), when present.
	pub kind: Option<String>,
	/// STS error code, e.g. `InvalidClientTokenId` or `ValidationError`.
	pub code: String,
	/// Human-readable message supplied by STS.
	pub message: String,
	/// HTTP status code of the reply.
	pub status: u16,
	/// Request identifier for support cases.
	pub request_id: Option<String>,
}

/// Transport-level failures (client construction, proxy, network, signing).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// HTTP client could not be constructed from the transport configuration.
	#[error("HTTP client could not be constructed.")]
	ClientBuild {
		/// Underlying builder failure.
		#[source]
		source: BoxError,
	},
	/// Proxy settings do not form a valid proxy URL.
	#[error("Proxy `{proxy}` is invalid.")]
	InvalidProxy {
		/// Proxy authority as configured.
		proxy: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Request could not be signed.
	#[error("Unable to sign the STS request: {reason}.")]
	Signing {
		/// Signing failure description.
		reason: String,
	},
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the STS endpoint.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
}
impl TransportError {
	/// Wraps a transport's builder failure.
	pub fn client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::ClientBuild { source: Box::new(src) }
	}

	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		if e.is_builder() { Self::client_build(e) } else { Self::network(e) }
	}
}

/// Failures raised while parsing or reshaping a successful STS reply.
#[derive(Debug, ThisError)]
pub enum ResponseFormatError {
	/// XML body did not match the expected document.
	#[error("Failed to parse the {action} response.")]
	Xml {
		/// STS action whose response was being parsed.
		action: &'static str,
		/// Located parsing failure.
		#[source]
		source: serde_path_to_error::Error<quick_xml::DeError>,
	},
	/// Credential expiration is not an RFC 3339 timestamp.
	#[error("Credential expiration `{value}` is not a valid timestamp.")]
	Expiration {
		/// Raw value returned by STS.
		value: String,
		/// Underlying parsing failure.
		#[source]
		source: time::error::Parse,
	},
	/// Result could not be converted into the host's JSON shape.
	#[error("Failed to create the {action} response.")]
	Shape {
		/// STS action whose result was being converted.
		action: &'static str,
		/// Underlying serialization failure.
		#[source]
		source: serde_json::Error,
	},
}
