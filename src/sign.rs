//! AWS Signature Version 4 signing for form-encoded STS requests.

// crates.io
use hmac::{Hmac, Mac};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use sha2::{Digest, Sha256};
use time::{format_description::BorrowedFormatItem, macros::format_description};
// self
use crate::{
	_prelude::*,
	auth::StaticCredentials,
	endpoint::{SERVICE, StsEndpoint},
	error::TransportError,
	http::StsHttpRequest,
};

/// Signing algorithm label.
pub const ALGORITHM: &str = "AWS4-HMAC-SHA256";
/// Content type of every STS request body.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=utf-8";

/// RFC 3986 unreserved characters stay literal; everything else is percent-encoded.
pub const AWS_QUERY_ENCODE_SET: &AsciiSet =
	&NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.').remove(b'~');

const AMZ_DATE: &[BorrowedFormatItem<'static>] =
	format_description!("[year][month][day]T[hour][minute][second]Z");
const SIGNED_HEADERS: &str = "content-type;host;x-amz-date";

type HmacSha256 = Hmac<Sha256>;

/// Percent-encodes a query/form component the way SigV4 expects.
pub fn encode_component(value: &str) -> String {
	utf8_percent_encode(value, AWS_QUERY_ENCODE_SET).to_string()
}

/// Signs a form body for `endpoint` at `now` and returns the request to send.
pub fn sign_request(
	credentials: &StaticCredentials,
	endpoint: &StsEndpoint,
	body: String,
	now: OffsetDateTime,
) -> Result<StsHttpRequest, TransportError> {
	let amz_date = now
		.to_offset(time::UtcOffset::UTC)
		.format(AMZ_DATE)
		.map_err(|e| TransportError::Signing { reason: e.to_string() })?;
	let date_stamp = &amz_date[..8];
	let canonical_headers = format!(
		"content-type:{FORM_CONTENT_TYPE}\nhost:{}\nx-amz-date:{amz_date}\n",
		endpoint.host()
	);
	let canonical_request = format!(
		"POST\n/\n\n{canonical_headers}\n{SIGNED_HEADERS}\n{}",
		hex::encode(Sha256::digest(body.as_bytes()))
	);
	let scope = format!("{date_stamp}/{}/{SERVICE}/aws4_request", endpoint.signing_region());
	let string_to_sign = format!(
		"{ALGORITHM}\n{amz_date}\n{scope}\n{}",
		hex::encode(Sha256::digest(canonical_request.as_bytes()))
	);
	let signing_key = derive_signing_key(
		credentials.secret_access_key.expose(),
		date_stamp,
		endpoint.signing_region(),
		SERVICE,
	)?;
	let signature = hex::encode(hmac(&signing_key, string_to_sign.as_bytes())?);
	let authorization = format!(
		"{ALGORITHM} Credential={}/{scope}, SignedHeaders={SIGNED_HEADERS}, Signature={signature}",
		credentials.access_key_id
	);

	Ok(StsHttpRequest {
		url: endpoint.url().to_owned(),
		headers: vec![
			("content-type".into(), FORM_CONTENT_TYPE.into()),
			("x-amz-date".into(), amz_date.clone()),
			("authorization".into(), authorization),
		],
		body,
	})
}

/// Derives the SigV4 signing key: `AWS4<secret>` → date → region → service → `aws4_request`.
pub fn derive_signing_key(
	secret: &str,
	date_stamp: &str,
	region: &str,
	service: &str,
) -> Result<Vec<u8>, TransportError> {
	let k_date = hmac(format!("AWS4{secret}").as_bytes(), date_stamp.as_bytes())?;
	let k_region = hmac(&k_date, region.as_bytes())?;
	let k_service = hmac(&k_region, service.as_bytes())?;

	hmac(&k_service, b"aws4_request")
}

fn hmac(key: &[u8], data: &[u8]) -> Result<Vec<u8>, TransportError> {
	let mut mac = <HmacSha256 as Mac>::new_from_slice(key)
		.map_err(|e| TransportError::Signing { reason: e.to_string() })?;

	mac.update(data);

	Ok(mac.finalize().into_bytes().to_vec())
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros::datetime;
	// self
	use super::*;

	fn credentials() -> StaticCredentials {
		StaticCredentials::new("AKIDEXAMPLE", "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY")
	}

	#[test]
	fn signing_key_matches_published_derivation() {
		let key = derive_signing_key(
			"wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY",
			"20120215",
			"us-east-1",
			"iam",
		)
		.expect("Signing key derivation should succeed.");

		assert_eq!(
			hex::encode(key),
			"f4780e2d9f65fa895f9c67b32ce1baf0b0d8a43505a000a1a9e090d414db404d"
		);
	}

	#[test]
	fn components_use_rfc3986_encoding() {
		assert_eq!(encode_component("a b+c/d~e_f.g-h"), "a%20b%2Bc%2Fd~e_f.g-h");
		assert_eq!(encode_component("{\"k\":1}"), "%7B%22k%22%3A1%7D");
	}

	#[test]
	fn signed_request_carries_scope_and_headers() {
		let now = datetime!(2024-03-05 06:07:08 UTC);
		let request = sign_request(
			&credentials(),
			&StsEndpoint::govcloud(),
			"Action=GetSessionToken&Version=2011-06-15".into(),
			now,
		)
		.expect("Signing should succeed.");

		assert_eq!(request.url, "https://sts.us-gov-west-1.amazonaws.com/");
		assert_eq!(request.header("x-amz-date"), Some("20240305T060708Z"));
		assert_eq!(request.header("content-type"), Some(FORM_CONTENT_TYPE));

		let authorization =
			request.header("authorization").expect("Authorization header should be present.");

		assert!(authorization.starts_with(
			"AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20240305/us-gov-west-1/sts/aws4_request, \
			 SignedHeaders=content-type;host;x-amz-date, Signature="
		));

		let signature = authorization.rsplit("Signature=").next().unwrap_or_default();

		assert_eq!(signature.len(), 64);
		assert!(signature.chars().all(|c| c.is_ascii_hexdigit()));
	}

	#[test]
	fn signature_depends_on_body_and_is_deterministic() {
		let now = datetime!(2024-03-05 06:07:08 UTC);
		let endpoint = StsEndpoint::govcloud();
		let sign = |body: &str| {
			sign_request(&credentials(), &endpoint, body.into(), now)
				.expect("Signing should succeed.")
				.header("authorization")
				.map(str::to_owned)
		};

		assert_eq!(sign("Action=GetSessionToken"), sign("Action=GetSessionToken"));
		assert_ne!(sign("Action=GetSessionToken"), sign("Action=GetFederationToken"));
	}
}
