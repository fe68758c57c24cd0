//! Scripting-host binding for the broker.
//!
//! [`SecurityTokenServiceObject`] is the object a host engine constructs and drives by
//! name: configuration properties are read and written as JSON values, and the four
//! operations are invoked with JSON argument lists. Every failure crosses the boundary as
//! a single [`ExtensionError`] that carries only a message, which is what script code can
//! catch.

// self
use crate::{
	_prelude::*,
	auth::Secret,
	broker::StsBroker,
	config::BrokerConfig,
	error::{ArgumentError, ResponseFormatError},
	http::StsHttpClient,
	obs::{self, OperationKind},
	policy::{self, PolicyDocument},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

/// Class name the object is registered under.
pub const CLASS_NAME: &str = "AWSSecurityTokenService";

/// The single error kind raised to script code.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("{message}")]
pub struct ExtensionError {
	message: String,
}
impl ExtensionError {
	/// Creates an error with the provided message.
	pub fn new(message: impl Into<String>) -> Self {
		Self { message: message.into() }
	}

	/// Returns the message shown to script code.
	pub fn message(&self) -> &str {
		&self.message
	}
}
impl From<Error> for ExtensionError {
	fn from(e: Error) -> Self {
		Self::new(e.describe())
	}
}
impl From<ArgumentError> for ExtensionError {
	fn from(e: ArgumentError) -> Self {
		Error::from(e).into()
	}
}

/// Configuration properties exposed to the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Property {
	/// `AccessKeyId`.
	AccessKeyId,
	/// `SecretAccessKey`.
	SecretAccessKey,
	/// `Region`.
	Region,
	/// `ProxyHost`.
	ProxyHost,
	/// `ProxyPort`.
	ProxyPort,
	/// `ProxyUser`.
	ProxyUser,
	/// `ProxyPassword`.
	ProxyPassword,
}
impl Property {
	/// Every property, in declaration order.
	pub const ALL: [Property; 7] = [
		Property::AccessKeyId,
		Property::SecretAccessKey,
		Property::Region,
		Property::ProxyHost,
		Property::ProxyPort,
		Property::ProxyUser,
		Property::ProxyPassword,
	];

	/// Returns the host-visible property name.
	pub const fn as_str(self) -> &'static str {
		match self {
			Property::AccessKeyId => "AccessKeyId",
			Property::SecretAccessKey => "SecretAccessKey",
			Property::Region => "Region",
			Property::ProxyHost => "ProxyHost",
			Property::ProxyPort => "ProxyPort",
			Property::ProxyUser => "ProxyUser",
			Property::ProxyPassword => "ProxyPassword",
		}
	}
}
impl Display for Property {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for Property {
	type Err = ArgumentError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::ALL
			.into_iter()
			.find(|property| property.as_str() == s)
			.ok_or_else(|| ArgumentError::UnknownProperty { class: CLASS_NAME, name: s.into() })
	}
}

/// Functions exposed to the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Function {
	/// `getSessionToken()`.
	GetSessionToken,
	/// `getSessionTokenWithDuration(durationSeconds)`.
	GetSessionTokenWithDuration,
	/// `getFederationToken(name, policy)`.
	GetFederationToken,
	/// `getFederationTokenWithDuration(name, policy, durationSeconds)`.
	GetFederationTokenWithDuration,
}
impl Function {
	/// Every function, in declaration order.
	pub const ALL: [Function; 4] = [
		Function::GetSessionToken,
		Function::GetSessionTokenWithDuration,
		Function::GetFederationToken,
		Function::GetFederationTokenWithDuration,
	];

	/// Returns the host-visible function name.
	pub const fn as_str(self) -> &'static str {
		match self {
			Function::GetSessionToken => "getSessionToken",
			Function::GetSessionTokenWithDuration => "getSessionTokenWithDuration",
			Function::GetFederationToken => "getFederationToken",
			Function::GetFederationTokenWithDuration => "getFederationTokenWithDuration",
		}
	}
}
impl Display for Function {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for Function {
	type Err = ArgumentError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::ALL
			.into_iter()
			.find(|function| function.as_str() == s)
			.ok_or_else(|| ArgumentError::UnknownFunction { class: CLASS_NAME, name: s.into() })
	}
}

/// Host-facing broker object.
///
/// Hosts hold shared references to script objects, so configuration lives behind a lock.
/// Each call snapshots the broker before awaiting; a property written while a call is in
/// flight applies to the next call.
pub struct SecurityTokenServiceObject<C>
where
	C: ?Sized + StsHttpClient,
{
	broker: Mutex<StsBroker<C>>,
}
impl<C> SecurityTokenServiceObject<C>
where
	C: ?Sized + StsHttpClient,
{
	/// Wraps an existing broker.
	pub fn with_broker(broker: StsBroker<C>) -> Self {
		Self { broker: Mutex::new(broker) }
	}

	/// Returns [`CLASS_NAME`].
	pub fn class_name(&self) -> &'static str {
		CLASS_NAME
	}

	/// Returns a copy of the current configuration.
	pub fn config(&self) -> BrokerConfig {
		self.broker.lock().config().clone()
	}

	/// Reads a property by host name.
	pub fn get(&self, name: &str) -> Result<JsonValue, ExtensionError> {
		let property = name.parse::<Property>()?;

		Ok(self.get_property(property))
	}

	/// Reads a property. Unset values read as `null`.
	pub fn get_property(&self, property: Property) -> JsonValue {
		let broker = self.broker.lock();
		let config = broker.config();
		let text = |value: Option<&str>| value.map_or(JsonValue::Null, |v| JsonValue::String(v.into()));

		match property {
			Property::AccessKeyId => text(config.access_key_id()),
			Property::SecretAccessKey => text(config.secret_access_key().map(Secret::expose)),
			Property::Region => text(config.region()),
			Property::ProxyHost => text(config.proxy_host()),
			Property::ProxyPort => config.proxy_port().map_or(JsonValue::Null, JsonValue::from),
			Property::ProxyUser => text(config.proxy_user()),
			Property::ProxyPassword => text(config.proxy_password().map(Secret::expose)),
		}
	}

	/// Writes a property by host name.
	pub fn set(&self, name: &str, value: JsonValue) -> Result<(), ExtensionError> {
		let property = name.parse::<Property>()?;

		Ok(self.set_property(property, value)?)
	}

	/// Writes a property; `null` clears it.
	///
	/// String properties accept strings only. `ProxyPort` accepts integers in `0..=65535`.
	pub fn set_property(&self, property: Property, value: JsonValue) -> Result<(), ArgumentError> {
		let mut broker = self.broker.lock();
		let config = broker.config_mut();

		match property {
			Property::AccessKeyId => config.set_access_key_id(string_value(property, value)?),
			Property::SecretAccessKey =>
				config.set_secret_access_key(string_value(property, value)?.map(Secret::new)),
			Property::Region => config.set_region(string_value(property, value)?),
			Property::ProxyHost => config.set_proxy_host(string_value(property, value)?),
			Property::ProxyPort => config.set_proxy_port(port_value(value)?),
			Property::ProxyUser => config.set_proxy_user(string_value(property, value)?),
			Property::ProxyPassword =>
				config.set_proxy_password(string_value(property, value)?.map(Secret::new)),
		}

		Ok(())
	}

	/// Invokes a function by host name with positional JSON arguments.
	///
	/// Missing trailing arguments read as `null`; extra arguments are ignored. A `null`
	/// duration selects the service default.
	pub async fn call(&self, name: &str, args: &[JsonValue]) -> Result<JsonValue, ExtensionError> {
		let function = name.parse::<Function>()?;
		let arg = |idx: usize| args.get(idx).unwrap_or(&JsonValue::Null);

		match function {
			Function::GetSessionToken => self.issue_session(None).await,
			Function::GetSessionTokenWithDuration =>
				self.issue_session(duration_argument(arg(0))?).await,
			Function::GetFederationToken => self.issue_federation(arg(0), arg(1), None).await,
			Function::GetFederationTokenWithDuration => {
				// The policy check precedes every other argument check.
				PolicyDocument::from_argument(Some(arg(1)))?;

				self.issue_federation(arg(0), arg(1), duration_argument(arg(2))?).await
			},
		}
	}

	/// `getSessionToken()`.
	pub async fn get_session_token(&self) -> Result<JsonValue, ExtensionError> {
		self.issue_session(None).await
	}

	/// `getSessionTokenWithDuration(durationSeconds)`.
	pub async fn get_session_token_with_duration(
		&self,
		duration_seconds: i32,
	) -> Result<JsonValue, ExtensionError> {
		self.issue_session(Some(duration_seconds)).await
	}

	/// `getFederationToken(name, policy)`.
	pub async fn get_federation_token(
		&self,
		name: &JsonValue,
		policy: &JsonValue,
	) -> Result<JsonValue, ExtensionError> {
		self.issue_federation(name, policy, None).await
	}

	/// `getFederationTokenWithDuration(name, policy, durationSeconds)`.
	pub async fn get_federation_token_with_duration(
		&self,
		name: &JsonValue,
		policy: &JsonValue,
		duration_seconds: i32,
	) -> Result<JsonValue, ExtensionError> {
		self.issue_federation(name, policy, Some(duration_seconds)).await
	}

	async fn issue_session(&self, duration_seconds: Option<i32>) -> Result<JsonValue, ExtensionError> {
		let broker = self.snapshot();
		let token = match duration_seconds {
			Some(seconds) => broker.session_token_with_duration(seconds).await?,
			None => broker.session_token().await?,
		};

		shape(OperationKind::SessionToken, token.to_json())
	}

	async fn issue_federation(
		&self,
		name: &JsonValue,
		policy: &JsonValue,
		duration_seconds: Option<i32>,
	) -> Result<JsonValue, ExtensionError> {
		let policy = PolicyDocument::from_argument(Some(policy))?;
		let name = name_argument(name)?;
		let broker = self.snapshot();
		let token = match duration_seconds {
			Some(seconds) =>
				broker.federation_token_with_duration(&name, Some(&policy), seconds).await?,
			None => broker.federation_token(&name, Some(&policy)).await?,
		};

		shape(OperationKind::FederationToken, token.to_json())
	}

	fn snapshot(&self) -> StsBroker<C> {
		self.broker.lock().clone()
	}
}
#[cfg(feature = "reqwest")]
impl SecurityTokenServiceObject<ReqwestHttpClient> {
	/// Constructs an unconfigured object backed by the default reqwest transport.
	pub fn new() -> Self {
		Self::with_broker(StsBroker::new(BrokerConfig::default()))
	}
}
#[cfg(feature = "reqwest")]
impl Default for SecurityTokenServiceObject<ReqwestHttpClient> {
	fn default() -> Self {
		Self::new()
	}
}
impl<C> Debug for SecurityTokenServiceObject<C>
where
	C: ?Sized + StsHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("SecurityTokenServiceObject").field("broker", &*self.broker.lock()).finish()
	}
}

fn shape(
	kind: OperationKind,
	json: Result<JsonValue, ResponseFormatError>,
) -> Result<JsonValue, ExtensionError> {
	json.map_err(|e| {
		let e = Error::from(e);

		obs::log_operation_failure(kind, &e);

		e.into()
	})
}

fn string_value(property: Property, value: JsonValue) -> Result<Option<String>, ArgumentError> {
	match value {
		JsonValue::Null => Ok(None),
		JsonValue::String(text) => Ok(Some(text)),
		other => Err(ArgumentError::invalid(
			property.as_str(),
			format!("expected a string, found {}", policy::json_kind(&other)),
		)),
	}
}

fn port_value(value: JsonValue) -> Result<Option<u16>, ArgumentError> {
	if value.is_null() {
		return Ok(None);
	}

	integer_value(&value)
		.and_then(|port| u16::try_from(port).ok())
		.map(Some)
		.ok_or_else(|| {
			ArgumentError::invalid(
				Property::ProxyPort.as_str(),
				format!("expected an integer between 0 and 65535, found {value}"),
			)
		})
}

fn duration_argument(value: &JsonValue) -> Result<Option<i32>, ArgumentError> {
	if value.is_null() {
		return Ok(None);
	}

	integer_value(value).and_then(|seconds| i32::try_from(seconds).ok()).map(Some).ok_or_else(
		|| ArgumentError::invalid("durationSeconds", format!("expected an integer, found {value}")),
	)
}

fn name_argument(value: &JsonValue) -> Result<String, ArgumentError> {
	match value {
		JsonValue::Null => Ok(String::new()),
		JsonValue::String(text) => Ok(text.clone()),
		JsonValue::Number(number) => Ok(number.to_string()),
		JsonValue::Bool(flag) => Ok(flag.to_string()),
		other => Err(ArgumentError::invalid(
			"name",
			format!("expected a string, found {}", policy::json_kind(other)),
		)),
	}
}

// Script numbers arrive as doubles; accept them when they hold an exact integer.
fn integer_value(value: &JsonValue) -> Option<i64> {
	let number = value.as_number()?;

	if let Some(int) = number.as_i64() {
		return Some(int);
	}

	number
		.as_f64()
		.filter(|float| float.fract() == 0.0 && float.abs() <= i64::MAX as f64)
		.map(|float| float as i64)
}
