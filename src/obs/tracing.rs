// self
use crate::{_prelude::*, error::Error, obs::OperationKind};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedOperation<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedOperation<F> = F;

/// A span builder used by broker operations.
#[derive(Clone, Debug)]
pub struct OperationSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl OperationSpan {
	/// Creates a new span tagged with the provided operation kind + stage.
	pub fn new(kind: OperationKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("sts_broker.operation", operation = kind.as_str(), stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedOperation<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Logs a failed operation for operators.
///
/// Unparseable replies are logged at `error`; every other failure at `info`.
pub fn log_operation_failure(kind: OperationKind, error: &Error) {
	#[cfg(feature = "tracing")]
	{
		match error {
			Error::ResponseFormat(_) => tracing::error!(
				operation = kind.as_str(),
				error = %error.describe(),
				"Failed to create the STS response."
			),
			_ => tracing::info!(
				operation = kind.as_str(),
				error = %error.describe(),
				"STS operation failed."
			),
		}
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (kind, error);
	}
}
