use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use num_traits::ToPrimitive;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::funding_errors::FundingError;
use super::funding_model::{FundingEvent, FundingStatus, NewFundingEvent, SpendStrategy};
use super::funding_traits::{FundingRepositoryTrait, FundingServiceTrait};
use crate::errors::ValidationError;
use crate::Result;

/// Truncating division on exact decimal integers.
fn div_trunc(a: Decimal, b: Decimal) -> Decimal {
    (a / b).trunc()
}

/// Service for the append-only pay-in ledger and the per-currency spend
/// strategy.
pub struct FundingService {
    repository: Arc<dyn FundingRepositoryTrait>,
}

impl FundingService {
    pub fn new(repository: Arc<dyn FundingRepositoryTrait>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl FundingServiceTrait for FundingService {
    async fn record_funding(
        &self,
        new_event: NewFundingEvent,
        now: DateTime<Utc>,
    ) -> Result<FundingEvent> {
        if new_event.amount <= Decimal::ZERO {
            return Err(ValidationError::InvalidInput(format!(
                "funding amount must be positive, got {}",
                new_event.amount
            ))
            .into());
        }
        let event = FundingEvent {
            id: Uuid::new_v4().to_string(),
            external_id: new_event.external_id,
            user_id: new_event.user_id,
            amount: new_event.amount,
            currency: new_event.currency,
            status: FundingStatus::Request,
            seats: new_event.seats,
            freq: new_event.freq,
            created_at: now,
        };
        self.repository.insert_event(event).await
    }

    async fn confirm_funding(
        &self,
        external_id: &str,
        fee: Decimal,
        now: DateTime<Utc>,
    ) -> Result<()> {
        if self
            .repository
            .find_by_external_id(external_id, FundingStatus::Success)?
            .is_some()
        {
            debug!("pay-in {} already confirmed, skipping", external_id);
            return Ok(());
        }

        let request = self
            .repository
            .find_by_external_id(external_id, FundingStatus::Request)?
            .ok_or_else(|| {
                FundingError::NotFound(format!("no outstanding request for {}", external_id))
            })?;

        if fee < Decimal::ZERO || fee > request.amount {
            return Err(ValidationError::InvalidInput(format!(
                "fee {} out of range for pay-in of {}",
                fee, request.amount
            ))
            .into());
        }

        let success = FundingEvent {
            id: Uuid::new_v4().to_string(),
            status: FundingStatus::Success,
            amount: request.amount - fee,
            created_at: now,
            ..request.clone()
        };
        let fee_row = FundingEvent {
            id: Uuid::new_v4().to_string(),
            status: FundingStatus::Fee,
            amount: fee,
            created_at: now,
            ..request
        };
        self.repository.insert_settled_pair(success, fee_row).await
    }

    async fn record_gateway_transition(
        &self,
        external_id: &str,
        status: FundingStatus,
        now: DateTime<Utc>,
    ) -> Result<()> {
        if !status.is_gateway_transition() {
            return Err(FundingError::InvalidStatus(format!(
                "{} is not a gateway transition",
                status
            ))
            .into());
        }
        if self
            .repository
            .find_by_external_id(external_id, status)?
            .is_some()
        {
            debug!(
                "pay-in {} already transitioned to {}, skipping",
                external_id, status
            );
            return Ok(());
        }

        let request = self
            .repository
            .find_by_external_id(external_id, FundingStatus::Request)?
            .ok_or_else(|| {
                FundingError::NotFound(format!("no outstanding request for {}", external_id))
            })?;

        let transition = FundingEvent {
            id: Uuid::new_v4().to_string(),
            status,
            created_at: now,
            ..request
        };
        self.repository.insert_event(transition).await?;
        Ok(())
    }

    fn select_spend_strategy(
        &self,
        user_id: &str,
        committed_daily: &HashMap<String, Decimal>,
        committed_future: &HashMap<String, Decimal>,
    ) -> Result<Option<SpendStrategy>> {
        let totals = self
            .repository
            .sum_by_currency(user_id, FundingStatus::Success)?;

        // Iterate in lexicographic currency order; a later candidate must be
        // strictly better, so the smallest code wins ties.
        let mut currencies: Vec<&String> = totals.keys().collect();
        currencies.sort();

        let mut best: Option<SpendStrategy> = None;
        for currency in currencies {
            let mut remaining = totals[currency];
            if let Some(spent) = committed_daily.get(currency) {
                remaining -= *spent;
            }
            if let Some(parked) = committed_future.get(currency) {
                remaining -= *parked;
            }

            let latest = match self.repository.latest_success(user_id, currency)? {
                Some(event) => event,
                None => continue,
            };
            if latest.seats <= 0 || latest.freq <= 0 {
                // cancelled subscriptions zero these out
                debug!(
                    "skipping {} for user {}: seats {} freq {}",
                    currency, user_id, latest.seats, latest.freq
                );
                continue;
            }

            let per_day = div_trunc(
                div_trunc(latest.amount, Decimal::from(latest.seats)),
                Decimal::from(latest.freq),
            );
            if per_day <= Decimal::ZERO {
                continue;
            }

            let days_remaining = div_trunc(remaining, per_day).to_i64().unwrap_or(0);
            if days_remaining >= 1
                && best
                    .as_ref()
                    .map_or(true, |b| days_remaining > b.days_remaining)
            {
                best = Some(SpendStrategy {
                    currency: currency.clone(),
                    per_day,
                    days_remaining,
                });
            }
        }
        Ok(best)
    }

    fn events_for_user(&self, user_id: &str) -> Result<Vec<FundingEvent>> {
        self.repository.events_for_user(user_id)
    }
}
