//! STS Query API actions: request parameters and XML reply documents.

pub mod request;
pub mod response;

pub use request::*;
pub use response::*;

// crates.io
use serde::de::DeserializeOwned;
// self
use crate::_prelude::*;

/// STS API version sent with every request.
pub const API_VERSION: &str = "2011-06-15";

/// One STS action: its name, its parameters, and the document it answers with.
pub trait StsAction {
	/// Action name sent as the `Action` parameter.
	const ACTION: &'static str;

	/// XML document returned on success.
	type Response: DeserializeOwned;

	/// Action-specific parameters (excluding `Action` and `Version`).
	fn parameters(&self) -> BTreeMap<&'static str, String>;
}
