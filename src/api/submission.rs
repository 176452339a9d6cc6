//! Payload assembly and the single submission POST.
//!
//! The payload is a read-only snapshot of the session: sent once, never
//! reused. On success the caller refreshes its balances and closes the
//! form; on failure the backend message is surfaced verbatim and the form
//! stays open for another attempt.

use log::error;

use crate::{
    api::{resolver::PaymentSession, validator},
    consts,
    errors::SubmissionError,
    models::backend::{SubmissionKind, SubmissionPayload},
    services::ImplPaymentBackend,
};

/// Builds the backend payload from the current session state, re-running
/// the full validation synchronously first. The amount is always the
/// converted one so it stays consistent with the `currency` field, and
/// wallet submissions are forced to USD.
pub fn assemble(session: &PaymentSession) -> Result<SubmissionPayload, SubmissionError> {
    if let Err(e) = validator::validate(session) {
        error!("submission rejected before POST: {e}");
        return Err(SubmissionError {
            message: consts::FILL_REQUIRED_FIELDS_MSG.to_string(),
        });
    }

    let method = session.payment_method();
    let resolution = session.resolution();

    Ok(SubmissionPayload {
        payment_type: method.payment_type().to_string(),
        payment_method: method.specific_option().map(str::to_string),
        payment_details: method.payment_details(),
        duration_months: session.duration_months(),
        amount: resolution.converted_amount,
        currency: session.display_currency().to_string(),
        fees: resolution.fee,
        pack_id: session.pack().id,
    })
}

/// Assembles and sends exactly one POST to the endpoint for `kind`.
/// `Ok` carries the backend success message.
pub async fn submit(
    session: &PaymentSession,
    kind: &SubmissionKind,
    backend: &ImplPaymentBackend,
) -> Result<String, SubmissionError> {
    let payload = assemble(session)?;

    backend.submit(kind, &payload).await.map_err(|e| {
        error!("submission to {} failed: {e:#}", kind.endpoint_path());
        SubmissionError {
            message: e.to_string(),
        }
    })
}
