//! Broker configuration surface and the per-call transport configuration derived from it.
//!
//! [`BrokerConfig`] mirrors the properties a scripting host sets on the broker object:
//! the static access key pair, a region hint, and optional proxy settings. Nothing is
//! validated when a value is stored; problems surface only when an operation runs.

// self
use crate::{
	_prelude::*,
	auth::{Secret, StaticCredentials},
	error::{ArgumentError, TransportError},
};

/// Mutable broker configuration.
///
/// Keys use the host property names (`AccessKeyId`, `ProxyPort`, ...) so the same JSON
/// document can seed the typed API and the host binding.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct BrokerConfig {
	access_key_id: Option<String>,
	secret_access_key: Option<Secret>,
	region: Option<String>,
	proxy_host: Option<String>,
	proxy_port: Option<u16>,
	proxy_user: Option<String>,
	proxy_password: Option<Secret>,
}
impl BrokerConfig {
	/// Creates a configuration holding the provided access key pair.
	pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<Secret>) -> Self {
		Self {
			access_key_id: Some(access_key_id.into()),
			secret_access_key: Some(secret_access_key.into()),
			..Default::default()
		}
	}

	/// Sets the region hint.
	pub fn with_region(mut self, region: impl Into<String>) -> Self {
		self.region = Some(region.into());

		self
	}

	/// Sets the proxy host and port.
	pub fn with_proxy(mut self, host: impl Into<String>, port: u16) -> Self {
		self.proxy_host = Some(host.into());
		self.proxy_port = Some(port);

		self
	}

	/// Sets the proxy basic-auth credentials.
	pub fn with_proxy_auth(mut self, user: impl Into<String>, password: impl Into<Secret>) -> Self {
		self.proxy_user = Some(user.into());
		self.proxy_password = Some(password.into());

		self
	}

	/// Returns the access key identifier.
	pub fn access_key_id(&self) -> Option<&str> {
		self.access_key_id.as_deref()
	}

	/// Replaces (or clears) the access key identifier.
	pub fn set_access_key_id(&mut self, value: Option<String>) {
		self.access_key_id = value;
	}

	/// Returns the secret access key.
	pub fn secret_access_key(&self) -> Option<&Secret> {
		self.secret_access_key.as_ref()
	}

	/// Replaces (or clears) the secret access key.
	pub fn set_secret_access_key(&mut self, value: Option<Secret>) {
		self.secret_access_key = value;
	}

	/// Returns the region hint.
	///
	/// The value is stored for the host's benefit only; see
	/// [`StsEndpoint::for_region`](crate::endpoint::StsEndpoint::for_region).
	pub fn region(&self) -> Option<&str> {
		self.region.as_deref()
	}

	/// Replaces (or clears) the region hint.
	pub fn set_region(&mut self, value: Option<String>) {
		self.region = value;
	}

	/// Returns the proxy host.
	pub fn proxy_host(&self) -> Option<&str> {
		self.proxy_host.as_deref()
	}

	/// Replaces (or clears) the proxy host.
	pub fn set_proxy_host(&mut self, value: Option<String>) {
		self.proxy_host = value;
	}

	/// Returns the proxy port.
	pub fn proxy_port(&self) -> Option<u16> {
		self.proxy_port
	}

	/// Replaces (or clears) the proxy port.
	pub fn set_proxy_port(&mut self, value: Option<u16>) {
		self.proxy_port = value;
	}

	/// Returns the proxy user.
	pub fn proxy_user(&self) -> Option<&str> {
		self.proxy_user.as_deref()
	}

	/// Replaces (or clears) the proxy user.
	pub fn set_proxy_user(&mut self, value: Option<String>) {
		self.proxy_user = value;
	}

	/// Returns the proxy password.
	pub fn proxy_password(&self) -> Option<&Secret> {
		self.proxy_password.as_ref()
	}

	/// Replaces (or clears) the proxy password.
	pub fn set_proxy_password(&mut self, value: Option<Secret>) {
		self.proxy_password = value;
	}

	/// Resolves the static credentials used to sign a request.
	pub fn credentials(&self) -> Result<StaticCredentials, ArgumentError> {
		let access_key_id = self
			.access_key_id
			.as_deref()
			.ok_or(ArgumentError::MissingCredential { field: "AccessKeyId" })?;
		let secret_access_key = self
			.secret_access_key
			.as_ref()
			.ok_or(ArgumentError::MissingCredential { field: "SecretAccessKey" })?;

		Ok(StaticCredentials::new(access_key_id, secret_access_key.clone()))
	}

	/// Builds the transport configuration for one call.
	///
	/// Proxy fields are copied whether or not they were set.
	pub fn transport_config(&self) -> TransportConfig {
		TransportConfig {
			proxy: ProxySettings {
				host: self.proxy_host.clone(),
				port: self.proxy_port,
				username: self.proxy_user.clone(),
				password: self.proxy_password.clone(),
			},
		}
	}
}

/// Client configuration handed to the transport on every call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransportConfig {
	/// Proxy routing for the call.
	pub proxy: ProxySettings,
}

/// Proxy settings copied from [`BrokerConfig`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProxySettings {
	/// Proxy host name or address; empty or absent means a direct connection.
	pub host: Option<String>,
	/// Proxy port; absent or `0` falls back to the scheme default.
	pub port: Option<u16>,
	/// Basic-auth user for authenticating proxies.
	pub username: Option<String>,
	/// Basic-auth password for authenticating proxies.
	pub password: Option<Secret>,
}
impl ProxySettings {
	/// Returns `true` when requests should be routed through a proxy.
	pub fn is_enabled(&self) -> bool {
		self.host.as_deref().is_some_and(|host| !host.trim().is_empty())
	}

	/// Builds the proxy URL, or `None` for direct connections.
	pub fn url(&self) -> Result<Option<Url>, TransportError> {
		let Some(host) = self.host.as_deref().map(str::trim).filter(|host| !host.is_empty())
		else {
			return Ok(None);
		};
		let authority = match self.port.filter(|port| *port != 0) {
			Some(port) => format!("{host}:{port}"),
			None => host.to_owned(),
		};
		let url = Url::parse(&format!("http://{authority}"))
			.map_err(|source| TransportError::InvalidProxy { proxy: authority, source })?;

		Ok(Some(url))
	}

	/// Returns the basic-auth pair when a proxy user is configured.
	///
	/// A missing password is sent as an empty string.
	pub fn basic_auth(&self) -> Option<(&str, &str)> {
		let user = self.username.as_deref().filter(|user| !user.is_empty())?;
		let password = self.password.as_ref().map(Secret::expose).unwrap_or_default();

		Some((user, password))
	}
}
