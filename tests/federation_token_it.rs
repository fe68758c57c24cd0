mod common;

// crates.io
use httpmock::prelude::*;
// self
use common::*;
use sts_broker::{
	broker::StsBroker,
	endpoint::StsEndpoint,
	error::{ArgumentError, Error},
	policy::PolicyDocument,
	url::Url,
};

fn policy() -> PolicyDocument {
	POLICY.parse().expect("Policy fixture should parse.")
}

#[tokio::test]
async fn federation_token_requires_policy_for_every_name() {
	let (broker, fake) = fake_broker(config());

	for name in ["", "a", "Bob", "invalid name with spaces", &"x".repeat(64)] {
		let err = broker.federation_token(name, None).await.expect_err("Missing policy should fail.");

		assert!(matches!(err, Error::InvalidArgument(ArgumentError::MissingPolicy)));
		assert_eq!(err.to_string(), "policy cannot be null.");

		let err = broker
			.federation_token_with_duration(name, None, DURATION_SECONDS_MIN)
			.await
			.expect_err("Missing policy should fail before the duration is considered.");

		assert!(matches!(err, Error::InvalidArgument(ArgumentError::MissingPolicy)));
	}

	assert!(fake.recorded().is_empty());
}

#[tokio::test]
async fn federation_token_returns_user_identity() {
	let (broker, fake) = fake_broker(config());
	let started = now_millis();
	let token = broker
		.federation_token("Bob", Some(&policy()))
		.await
		.expect("Federation token should be issued.");
	let arn_len = token.federated_user.arn.len();
	let id_len = token.federated_user.federated_user_id.len();

	assert!((20..=2048).contains(&arn_len), "ARN length {arn_len}.");
	assert!((2..=96).contains(&id_len), "Federated user id length {id_len}.");
	assert!(token.federated_user.arn.ends_with(":federated-user/Bob"));
	assert!(token.packed_policy_size.is_some());
	assert_default_window(token.credentials.expiration_millis(), started);

	let recorded = fake.last();

	assert_eq!(recorded.form.get("Action").map(String::as_str), Some("GetFederationToken"));
	assert_eq!(recorded.form.get("Name").map(String::as_str), Some("Bob"));
	assert_eq!(recorded.form.get("Policy").map(String::as_str), Some(POLICY));
	assert!(!recorded.form.contains_key("DurationSeconds"));
}

#[tokio::test]
async fn federation_token_name_bounds_are_enforced_remotely() {
	let (broker, _fake) = fake_broker(config());
	let policy = policy();

	for name in ["ab".to_owned(), "x".repeat(32), "user+tag=1,a.b@c-d_e".to_owned()] {
		broker
			.federation_token(&name, Some(&policy))
			.await
			.unwrap_or_else(|e| panic!("Name `{name}` should be accepted: {e:?}"));
	}
	for name in ["a".to_owned(), "x".repeat(33), "has space".to_owned()] {
		let err = broker
			.federation_token(&name, Some(&policy))
			.await
			.expect_err("Out-of-bounds names should be rejected.");

		assert!(matches!(&err, Error::ServiceRejected(e) if e.code == "ValidationError"), "{err:?}");
	}
}

#[tokio::test]
async fn federation_token_duration_bounds_are_enforced_remotely() {
	let (broker, fake) = fake_broker(config());
	let policy = policy();

	for seconds in [DURATION_SECONDS_MIN, DURATION_SECONDS_MAX] {
		let started = now_millis();
		let token = broker
			.federation_token_with_duration("Bob", Some(&policy), seconds)
			.await
			.expect("In-range durations should be accepted.");
		let expected = started + i64::from(seconds) * 1_000;
		let expiration = token.credentials.expiration_millis();

		assert!((expected - PROCESSING_TIME_MILLIS..expected + PROCESSING_TIME_MILLIS).contains(&expiration));
		assert_eq!(fake.last().form.get("DurationSeconds"), Some(&seconds.to_string()));
	}
	for seconds in [DURATION_SECONDS_MIN - 1, DURATION_SECONDS_MAX + 1, 0, -1] {
		let err = broker
			.federation_token_with_duration("Bob", Some(&policy), seconds)
			.await
			.expect_err("Out-of-range durations should be rejected.");

		assert!(matches!(&err, Error::ServiceRejected(e) if e.code == "ValidationError"), "{err:?}");
	}
}

#[tokio::test]
async fn policy_entries_keep_their_order_on_the_wire() {
	let (broker, fake) = fake_broker(config());
	let policy: PolicyDocument = r#"{"Version":"2012-10-17","Statement":[{"Sid":"1","Effect":"Allow","Action":["s3:GetObject","s3:ListBucket"],"Resource":"*"}]}"#
		.parse()
		.expect("Policy should parse.");

	broker.federation_token("Alice", Some(&policy)).await.expect("Federation token should be issued.");

	let sent = fake.last().form.get("Policy").cloned().expect("Policy should be transmitted.");
	let round_trip: PolicyDocument = sent.parse().expect("Transmitted policy should parse.");

	assert_eq!(round_trip, policy);
	assert!(sent.starts_with(r#"{"Version":"2012-10-17","Statement""#));
}

#[tokio::test]
async fn reqwest_transport_returns_federated_user() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/").header_exists("authorization");
			then.status(200)
				.header("content-type", "text/xml")
				.body(federation_body("2030-01-01T00:00:00Z", "Bob", 6));
		})
		.await;
	let endpoint = StsEndpoint::custom(
		Url::parse(&server.url("/")).expect("Mock STS endpoint should parse successfully."),
		"us-gov-west-1",
	)
	.expect("Loopback mock endpoint should be accepted.");
	let token = StsBroker::new(config())
		.with_endpoint(endpoint)
		.federation_token("Bob", Some(&policy()))
		.await
		.expect("Federation token should be issued by the mock endpoint.");

	assert_eq!(token.federated_user.federated_user_id, format!("{ACCOUNT_ID}:Bob"));
	assert_eq!(token.packed_policy_size, Some(6));

	mock.assert_async().await;
}
