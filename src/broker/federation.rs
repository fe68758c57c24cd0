//! `GetFederationToken` orchestration.
//!
//! The only local check is the presence of a policy; name length, policy grammar, and
//! duration bounds are left to STS.

// self
use crate::{
	_prelude::*,
	broker::StsBroker,
	error::ArgumentError,
	http::StsHttpClient,
	obs::{self, OperationKind, OperationOutcome, OperationSpan},
	policy::PolicyDocument,
	sts::GetFederationTokenRequest,
	token::FederationToken,
};

impl<C> StsBroker<C>
where
	C: ?Sized + StsHttpClient,
{
	/// Issues federated credentials for `name` with the service's default lifetime.
	///
	/// Fails with [`ArgumentError::MissingPolicy`](crate::error::ArgumentError::MissingPolicy)
	/// when `policy` is `None`, whatever the name.
	pub async fn federation_token(
		&self,
		name: &str,
		policy: Option<&PolicyDocument>,
	) -> Result<FederationToken> {
		self.issue_federation_token("federation_token", name, policy, None).await
	}

	/// Issues federated credentials for `name` valid for `duration_seconds`.
	pub async fn federation_token_with_duration(
		&self,
		name: &str,
		policy: Option<&PolicyDocument>,
		duration_seconds: i32,
	) -> Result<FederationToken> {
		self.issue_federation_token(
			"federation_token_with_duration",
			name,
			policy,
			Some(duration_seconds),
		)
		.await
	}

	async fn issue_federation_token(
		&self,
		stage: &'static str,
		name: &str,
		policy: Option<&PolicyDocument>,
		duration_seconds: Option<i32>,
	) -> Result<FederationToken> {
		const KIND: OperationKind = OperationKind::FederationToken;

		let span = OperationSpan::new(KIND, stage);

		obs::record_operation_outcome(KIND, OperationOutcome::Attempt);

		let result = span
			.instrument(async move {
				let policy = policy.cloned().ok_or(ArgumentError::MissingPolicy)?;
				let request =
					GetFederationTokenRequest { name: name.to_owned(), policy, duration_seconds };
				let document = self.dispatch(&request).await?;

				Ok(FederationToken::try_from(document)?)
			})
			.await;

		match &result {
			Ok(_) => obs::record_operation_outcome(KIND, OperationOutcome::Success),
			Err(e) => {
				obs::log_operation_failure(KIND, e);
				obs::record_operation_outcome(KIND, OperationOutcome::Failure);
			},
		}

		result
	}
}
