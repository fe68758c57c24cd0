//! `GetSessionToken` orchestration.

// self
use crate::{
	_prelude::*,
	broker::StsBroker,
	http::StsHttpClient,
	obs::{self, OperationKind, OperationOutcome, OperationSpan},
	sts::GetSessionTokenRequest,
	token::SessionToken,
};

impl<C> StsBroker<C>
where
	C: ?Sized + StsHttpClient,
{
	/// Issues session credentials with the service's default lifetime.
	pub async fn session_token(&self) -> Result<SessionToken> {
		self.issue_session_token("session_token", None).await
	}

	/// Issues session credentials valid for `duration_seconds`.
	///
	/// STS enforces the bounds (900 to 129600 seconds).
	pub async fn session_token_with_duration(&self, duration_seconds: i32) -> Result<SessionToken> {
		self.issue_session_token("session_token_with_duration", Some(duration_seconds)).await
	}

	async fn issue_session_token(
		&self,
		stage: &'static str,
		duration_seconds: Option<i32>,
	) -> Result<SessionToken> {
		const KIND: OperationKind = OperationKind::SessionToken;

		let span = OperationSpan::new(KIND, stage);

		obs::record_operation_outcome(KIND, OperationOutcome::Attempt);

		let result = span
			.instrument(async move {
				let request = GetSessionTokenRequest { duration_seconds };
				let document = self.dispatch(&request).await?;

				Ok(SessionToken::try_from(document)?)
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
