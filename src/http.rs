//! Transport primitives for STS calls.
//!
//! [`StsHttpClient`] is the broker's only dependency on an HTTP stack. The broker hands
//! every call a fresh [`TransportConfig`] so implementations build their client per call
//! and honor the proxy settings as they are at that moment.

// self
use crate::{_prelude::*, config::TransportConfig, error::TransportError};

/// Header carrying the STS request identifier.
pub const REQUEST_ID_HEADER: &str = "x-amzn-requestid";

/// Boxed future returned by [`StsHttpClient::execute`].
pub type TransportFuture<'a> =
	Pin<Box<dyn Future<Output = Result<StsHttpResponse, TransportError>> + 'a + Send>>;

/// Abstraction over HTTP transports capable of delivering signed STS requests.
///
/// Implementations must be `Send + Sync + 'static` so a broker can be shared, and the
/// returned future must be `Send`. Non-2xx replies are returned as responses, not errors;
/// the broker classifies them.
pub trait StsHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Sends `request` using a client configured from `transport`.
	fn execute<'a>(
		&'a self,
		transport: &'a TransportConfig,
		request: StsHttpRequest,
	) -> TransportFuture<'a>;
}

/// Signed, ready-to-send STS request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StsHttpRequest {
	/// Absolute endpoint URL.
	pub url: String,
	/// Headers to attach, including `authorization`.
	pub headers: Vec<(String, String)>,
	/// Form-encoded body.
	pub body: String,
}
impl StsHttpRequest {
	/// Looks up a header value by case-insensitive name.
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers
			.iter()
			.find(|(key, _)| key.eq_ignore_ascii_case(name))
			.map(|(_, value)| value.as_str())
	}
}

/// Raw STS reply.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StsHttpResponse {
	/// HTTP status code.
	pub status: u16,
	/// Value of [`REQUEST_ID_HEADER`], when present.
	pub request_id: Option<String>,
	/// Response body (XML).
	pub body: String,
}
impl StsHttpResponse {
	/// Returns `true` for 2xx statuses.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}
}

/// Default reqwest-backed transport.
///
/// A new [`ReqwestClient`] is built for every call. Redirects are never followed and
/// system proxy variables are ignored; only the configured proxy is used.
#[cfg(feature = "reqwest")]
#[derive(Clone, Copy, Debug, Default)]
pub struct ReqwestHttpClient;
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Builds the per-call client for `transport`.
	pub fn build_client(&self, transport: &TransportConfig) -> Result<ReqwestClient, TransportError> {
		let builder = ReqwestClient::builder().redirect(reqwest::redirect::Policy::none());
		let builder = match transport.proxy.url()? {
			Some(url) => {
				let mut proxy = reqwest::Proxy::all(url).map_err(TransportError::client_build)?;

				if let Some((user, password)) = transport.proxy.basic_auth() {
					proxy = proxy.basic_auth(user, password);
				}

				builder.proxy(proxy)
			},
			None => builder.no_proxy(),
		};

		builder.build().map_err(TransportError::client_build)
	}
}
#[cfg(feature = "reqwest")]
impl StsHttpClient for ReqwestHttpClient {
	fn execute<'a>(
		&'a self,
		transport: &'a TransportConfig,
		request: StsHttpRequest,
	) -> TransportFuture<'a> {
		Box::pin(async move {
			let client = self.build_client(transport)?;
			let mut builder = client.post(&request.url);

			for (name, value) in &request.headers {
				builder = builder.header(name.as_str(), value.as_str());
			}

			let response = builder.body(request.body).send().await?;
			let status = response.status().as_u16();
			let request_id = response
				.headers()
				.get(REQUEST_ID_HEADER)
				.and_then(|value| value.to_str().ok())
				.map(str::to_owned);
			let body = response.text().await?;

			Ok(StsHttpResponse { status, request_id, body })
		})
	}
}
