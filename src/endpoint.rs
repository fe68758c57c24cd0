//! STS endpoint descriptor.
//!
//! Every broker targets the GovCloud STS gateway. The configured region is kept for the
//! host but never changes the endpoint: [`StsEndpoint::for_region`] returns the same
//! descriptor for valid, invalid, empty, and absent regions. Custom endpoints exist for
//! private deployments and tests.

// std
use std::net::IpAddr;
// crates.io
use url::Host;
// self
use crate::_prelude::*;

/// Region the fixed STS endpoint signs for.
pub const GOVCLOUD_REGION: &str = "us-gov-west-1";
/// Host of the fixed STS endpoint.
pub const GOVCLOUD_HOST: &str = "sts.us-gov-west-1.amazonaws.com";
/// Signing service name for STS.
pub const SERVICE: &str = "sts";

/// Errors raised while constructing custom endpoints.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum EndpointError {
	/// Endpoints must use HTTPS unless they point at a loopback address.
	#[error("The STS endpoint must use HTTPS: {url}.")]
	InsecureEndpoint {
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// Endpoint URL has no host component.
	#[error("The STS endpoint has no host: {url}.")]
	MissingHost {
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// Signing region cannot be empty.
	#[error("The signing region cannot be empty.")]
	EmptySigningRegion,
}

/// Validated STS endpoint plus the region used in the SigV4 credential scope.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StsEndpoint {
	url: String,
	host: String,
	signing_region: String,
}
impl StsEndpoint {
	/// Returns the fixed GovCloud endpoint.
	pub fn govcloud() -> Self {
		Self {
			url: format!("https://{GOVCLOUD_HOST}/"),
			host: GOVCLOUD_HOST.into(),
			signing_region: GOVCLOUD_REGION.into(),
		}
	}

	/// Resolves the endpoint for a configured region hint.
	///
	/// The hint is ignored; all regions route to [`StsEndpoint::govcloud`].
	pub fn for_region(_region: Option<&str>) -> Self {
		Self::govcloud()
	}

	/// Builds a custom endpoint. The URL path is ignored; requests always post to `/`.
	pub fn custom(url: Url, signing_region: impl Into<String>) -> Result<Self, EndpointError> {
		let signing_region = signing_region.into();

		if signing_region.trim().is_empty() {
			return Err(EndpointError::EmptySigningRegion);
		}

		let host = url.host().ok_or_else(|| EndpointError::MissingHost { url: url.to_string() })?;

		if url.scheme() != "https" && !(url.scheme() == "http" && is_loopback(&host)) {
			return Err(EndpointError::InsecureEndpoint { url: url.to_string() });
		}

		let authority = match url.port() {
			Some(port) => format!("{host}:{port}"),
			None => host.to_string(),
		};

		Ok(Self {
			url: format!("{}://{authority}/", url.scheme()),
			host: authority,
			signing_region,
		})
	}

	/// Full request URL.
	pub fn url(&self) -> &str {
		&self.url
	}

	/// Value of the signed `host` header.
	pub fn host(&self) -> &str {
		&self.host
	}

	/// Region used in the SigV4 credential scope.
	pub fn signing_region(&self) -> &str {
		&self.signing_region
	}
}
impl Default for StsEndpoint {
	fn default() -> Self {
		Self::govcloud()
	}
}

fn is_loopback(host: &Host<&str>) -> bool {
	match host {
		Host::Domain(domain) => domain.eq_ignore_ascii_case("localhost"),
		Host::Ipv4(ip) => IpAddr::V4(*ip).is_loopback(),
		Host::Ipv6(ip) => IpAddr::V6(*ip).is_loopback(),
	}
}
