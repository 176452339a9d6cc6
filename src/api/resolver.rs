//! Per-form payment amount resolution.
//!
//! Every open payment form (pack purchase, renewal, withdrawal, funds
//! transfer) owns one [`PaymentSession`]; there is no shared global state.
//! The session snaps the duration, caches the fee quote and the converted
//! per-period unit price, and recomputes the resolved amounts whenever an
//! input changes.
//!
//! Async recalculation runs in three phases so a response that arrives
//! after the user already changed an input can be discarded: `begin`
//! snapshots the inputs with the current generation, the fetch runs
//! without borrowing the session, and `apply` rejects any response whose
//! generation no longer matches.

use chrono::Utc;
use log::error;
use rust_decimal::Decimal;

use crate::{
    consts,
    models::{
        cadence::SubscriptionCadence,
        fee::{FeeQuote, FeeScope},
        pack::Pack,
        payment_method::PaymentMethod,
        resolution::AmountResolution,
    },
    services::ImplPaymentBackend,
};

/// Converts an amount between two currencies, using USD strictly as the
/// pivot when neither side is USD. Equal currencies never hit the network.
pub async fn convert_via_pivot(
    backend: &ImplPaymentBackend,
    amount: Decimal,
    from: &str,
    to: &str,
) -> anyhow::Result<Decimal> {
    if from == to {
        return Ok(amount);
    }

    if from == consts::PIVOT_CURRENCY || to == consts::PIVOT_CURRENCY {
        return backend.convert(amount, from, to).await;
    }

    // never a direct cross-currency call
    let in_pivot = backend.convert(amount, from, consts::PIVOT_CURRENCY).await?;
    backend.convert(in_pivot, consts::PIVOT_CURRENCY, to).await
}

/// Outcome of applying an async recalculation to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecalcOutcome {
    Updated,
    /// The inputs changed while the request was in flight; nothing was
    /// mutated.
    Stale,
    /// A recalculation is already running for this session.
    Busy,
}

/// Snapshot of the inputs a recalculation runs against, tagged with the
/// generation it was taken at.
#[derive(Debug, Clone)]
pub struct RecalcRequest {
    generation: u64,
    scope: FeeScope,
    currency: String,
    unit_price_usd: Decimal,
    cached_unit_price: Option<Decimal>,
    is_wallet: bool,
    need_fee_quote: bool,
}

/// Raw results of the backend round-trips, to be applied to the session.
#[derive(Debug)]
pub struct RecalcResponse {
    generation: u64,
    fee_percentage: Option<anyhow::Result<Decimal>>,
    unit_price: anyhow::Result<Decimal>,
}

pub struct PaymentSession {
    pack: Pack,
    fee_scope: FeeScope,
    duration_months: u32,
    currency: String,
    payment_method: PaymentMethod,
    fee_quote: Option<FeeQuote>,
    resolution: AmountResolution,
    /// Converted price of one billing period, cached per currency so a
    /// duration-only change needs no network round-trip.
    unit_price_converted: Option<Decimal>,
    wallet_balance: Option<Decimal>,
    fees_error: bool,
    conversion_error: bool,
    loading: bool,
    generation: u64,
}

impl PaymentSession {
    /// Opens a session with the form defaults: one step of duration, USD
    /// display currency, the flow's default payment method. Fetches the
    /// fee quote once and resolves the initial amounts; for a wallet
    /// default the balance is fetched too.
    pub async fn open(
        pack: Pack,
        fee_scope: FeeScope,
        default_method: PaymentMethod,
        backend: &ImplPaymentBackend,
    ) -> Self {
        let mut session = Self {
            duration_months: pack.cadence.step(),
            pack,
            fee_scope,
            currency: consts::DEFAULT_DISPLAY_CURRENCY.to_string(),
            payment_method: default_method,
            fee_quote: None,
            resolution: AmountResolution::empty(),
            unit_price_converted: None,
            wallet_balance: None,
            fees_error: false,
            conversion_error: false,
            loading: false,
            generation: 0,
        };

        session.recalculate(backend).await;
        if session.payment_method.is_wallet() {
            session.refresh_wallet_balance(backend).await;
        }

        session
    }

    pub fn pack(&self) -> &Pack {
        &self.pack
    }

    pub fn cadence(&self) -> SubscriptionCadence {
        self.pack.cadence
    }

    pub fn duration_months(&self) -> u32 {
        self.duration_months
    }

    pub fn payment_method(&self) -> &PaymentMethod {
        &self.payment_method
    }

    pub fn resolution(&self) -> &AmountResolution {
        &self.resolution
    }

    pub fn wallet_balance(&self) -> Option<Decimal> {
        self.wallet_balance
    }

    pub fn fees_error(&self) -> bool {
        self.fees_error
    }

    pub fn conversion_error(&self) -> bool {
        self.conversion_error
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Currency the assembled payload is denominated in: wallet flows are
    /// always USD, everything else uses the selected display currency.
    pub fn display_currency(&self) -> &str {
        if self.payment_method.is_wallet() {
            consts::PIVOT_CURRENCY
        } else {
            &self.currency
        }
    }

    /// Fee percentage shown next to the total: always 0 for wallet.
    pub fn display_fee_percentage(&self) -> Decimal {
        if self.payment_method.is_wallet() {
            return Decimal::ZERO;
        }
        self.fee_quote
            .as_ref()
            .map(|quote| quote.percentage)
            .unwrap_or_default()
    }

    /// Applies a requested duration, snapped to the cadence. A duration-only
    /// change recomputes the amounts from the cached unit price with no
    /// network call.
    pub fn set_duration_months(&mut self, requested_months: u32) {
        let snapped = self.pack.cadence.snap_duration(requested_months);
        if snapped == self.duration_months {
            return;
        }

        self.duration_months = snapped;
        self.generation += 1;
        self.recompute_from_cache();
    }

    /// Switches the display currency. Invalidates the cached unit price;
    /// the caller must run [`Self::recalculate`] afterwards.
    pub fn set_currency(&mut self, currency: &str) {
        if currency == self.currency {
            return;
        }

        self.currency = currency.to_string();
        self.generation += 1;
        self.unit_price_converted = None;
        self.conversion_error = false;
    }

    /// Switches the payment method. Wallet amounts are USD-denominated, so
    /// entering or leaving wallet re-derives the amounts immediately.
    pub fn set_payment_method(&mut self, method: PaymentMethod) {
        self.payment_method = method;
        self.generation += 1;
        self.recompute_from_cache();
    }

    /// First phase: snapshot inputs and raise the busy flag. `None` while
    /// another recalculation is in flight, which disables re-entrant
    /// triggers in the forms.
    pub fn begin_recalculate(&mut self) -> Option<RecalcRequest> {
        if self.loading {
            return None;
        }
        self.loading = true;

        Some(RecalcRequest {
            generation: self.generation,
            scope: self.fee_scope,
            currency: self.currency.clone(),
            unit_price_usd: self.pack.price,
            cached_unit_price: self.unit_price_converted,
            is_wallet: self.payment_method.is_wallet(),
            need_fee_quote: self.fee_quote.is_none() || self.fees_error,
        })
    }

    /// Second phase: the backend round-trips. Runs without borrowing the
    /// session so inputs can keep changing while it is in flight.
    pub async fn fetch_amounts(
        request: RecalcRequest,
        backend: &ImplPaymentBackend,
    ) -> RecalcResponse {
        let fee_percentage = if request.need_fee_quote {
            Some(backend.fetch_fee_percentage(request.scope).await)
        } else {
            None
        };

        let unit_price = if request.is_wallet {
            // wallet skips conversion entirely
            Ok(request.unit_price_usd)
        } else if let Some(cached) = request.cached_unit_price {
            Ok(cached)
        } else {
            convert_via_pivot(
                backend,
                request.unit_price_usd,
                consts::PIVOT_CURRENCY,
                &request.currency,
            )
            .await
        };

        RecalcResponse {
            generation: request.generation,
            fee_percentage,
            unit_price,
        }
    }

    /// Third phase: apply the response, unless the inputs moved on in the
    /// meantime. On conversion failure the session falls back to the
    /// unconverted amount with a zero fee and flags the error; the user
    /// retries through [`Self::recalculate`].
    pub fn apply(&mut self, response: RecalcResponse) -> RecalcOutcome {
        self.loading = false;

        if response.generation != self.generation {
            return RecalcOutcome::Stale;
        }

        if let Some(quote) = response.fee_percentage {
            match quote {
                Ok(percentage) => {
                    self.fee_quote = Some(FeeQuote {
                        percentage,
                        fetched_at: Utc::now(),
                        scope: self.fee_scope,
                    });
                    self.fees_error = false;
                }
                Err(e) => {
                    error!("fee quote fetch failed: {e:#}");
                    self.fee_quote = None;
                    self.fees_error = true;
                }
            }
        }

        match response.unit_price {
            Ok(unit_price) => {
                self.conversion_error = false;
                if !self.payment_method.is_wallet() {
                    self.unit_price_converted = Some(unit_price);
                }
                self.apply_resolution(unit_price);
            }
            Err(e) => {
                error!("currency conversion failed: {e:#}");
                self.conversion_error = true;
                self.fees_error = true;
                self.unit_price_converted = None;
                self.apply_resolution(self.pack.price);
            }
        }

        RecalcOutcome::Updated
    }

    /// Runs the three recalculation phases back to back. This is both the
    /// normal resolution path and the manual recovery action after a fee
    /// or conversion failure.
    pub async fn recalculate(&mut self, backend: &ImplPaymentBackend) -> RecalcOutcome {
        let Some(request) = self.begin_recalculate() else {
            return RecalcOutcome::Busy;
        };

        let response = Self::fetch_amounts(request, backend).await;
        self.apply(response)
    }

    pub async fn refresh_wallet_balance(&mut self, backend: &ImplPaymentBackend) {
        match backend.wallet_balance().await {
            Ok(balance) => self.wallet_balance = Some(balance),
            Err(e) => {
                error!("wallet balance fetch failed: {e:#}");
                self.wallet_balance = None;
            }
        }
    }

    /// Re-derives the amounts from cached values only. Wallet always uses
    /// the USD pack price; otherwise the last converted unit price, or the
    /// unconverted price while none is cached.
    fn recompute_from_cache(&mut self) {
        let unit_price = if self.payment_method.is_wallet() {
            self.pack.price
        } else {
            self.unit_price_converted.unwrap_or(self.pack.price)
        };

        self.apply_resolution(unit_price);
    }

    fn apply_resolution(&mut self, unit_price: Decimal) {
        let periods = self.pack.cadence.periods(self.duration_months);
        let base_amount = self.pack.price * Decimal::from(periods);

        let converted = crate::utils::round2(unit_price * Decimal::from(periods));
        let fee = if self.payment_method.is_wallet() || self.fees_error {
            Decimal::ZERO
        } else {
            self.fee_quote
                .as_ref()
                .map(|quote| quote.fee_for(converted))
                .unwrap_or_default()
        };

        self.resolution = AmountResolution::derive(periods, base_amount, unit_price, fee);
    }
}
