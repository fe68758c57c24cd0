//! The credential broker: configuration plus the two STS operations.

mod federation;
mod session;

// self
use crate::{
	_prelude::*,
	config::BrokerConfig,
	endpoint::StsEndpoint,
	http::StsHttpClient,
	sign,
	sts::{self, StsAction},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

#[cfg(feature = "reqwest")]
/// Broker specialized for the crate's default reqwest transport.
pub type ReqwestBroker = StsBroker<ReqwestHttpClient>;

/// Issues temporary AWS credentials through STS.
///
/// The broker owns its configuration and a shared transport. Each operation resolves the
/// static credentials, builds a fresh transport configuration, signs one request, and
/// performs a single round-trip; nothing is cached between calls.
pub struct StsBroker<C>
where
	C: ?Sized + StsHttpClient,
{
	/// HTTP transport used for every outbound request.
	pub http_client: Arc<C>,
	config: BrokerConfig,
	endpoint: Option<StsEndpoint>,
}
impl<C> StsBroker<C>
where
	C: ?Sized + StsHttpClient,
{
	/// Creates a broker that reuses the caller-provided transport.
	pub fn with_http_client(config: BrokerConfig, http_client: impl Into<Arc<C>>) -> Self {
		Self { http_client: http_client.into(), config, endpoint: None }
	}

	/// Overrides the endpoint that would otherwise be resolved from the region hint.
	pub fn with_endpoint(mut self, endpoint: StsEndpoint) -> Self {
		self.endpoint = Some(endpoint);

		self
	}

	/// Returns the configuration.
	pub fn config(&self) -> &BrokerConfig {
		&self.config
	}

	/// Returns the configuration for in-place updates.
	pub fn config_mut(&mut self) -> &mut BrokerConfig {
		&mut self.config
	}

	/// Returns the endpoint the next call will contact.
	pub fn endpoint(&self) -> StsEndpoint {
		match &self.endpoint {
			Some(endpoint) => endpoint.clone(),
			None => StsEndpoint::for_region(self.config.region()),
		}
	}

	/// Signs and sends `action`, then parses the success document.
	async fn dispatch<A>(&self, action: &A) -> Result<A::Response>
	where
		A: StsAction,
	{
		let credentials = self.config.credentials()?;
		let transport = self.config.transport_config();
		let request = sign::sign_request(
			&credentials,
			&self.endpoint(),
			sts::encode_form(action),
			OffsetDateTime::now_utc(),
		)?;
		let response = self.http_client.execute(&transport, request).await?;

		if !response.is_success() {
			return Err(sts::service_error(&response).into());
		}

		Ok(sts::parse_document(A::ACTION, &response.body)?)
	}
}
impl<C> Clone for StsBroker<C>
where
	C: ?Sized + StsHttpClient,
{
	fn clone(&self) -> Self {
		Self {
			http_client: Arc::clone(&self.http_client),
			config: self.config.clone(),
			endpoint: self.endpoint.clone(),
		}
	}
}
#[cfg(feature = "reqwest")]
impl StsBroker<ReqwestHttpClient> {
	/// Creates a broker backed by the default reqwest transport.
	pub fn new(config: BrokerConfig) -> Self {
		Self::with_http_client(config, ReqwestHttpClient)
	}
}
impl<C> Debug for StsBroker<C>
where
	C: ?Sized + StsHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("StsBroker")
			.field("config", &self.config)
			.field("endpoint", &self.endpoint())
			.finish()
	}
}
