use crate::domain::patron::PatronId;
use crate::domain::payment::{
    ChargeResponse, PaymentStatus, RefundResponse, TransactionId, is_transaction_id,
};
use crate::domain::ports::PaymentGateway;
use crate::error::GatewayError;
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::time::Duration;

/// Largest single charge the gateway accepts.
pub const MAX_CHARGE: Decimal = dec!(1000.00);

/// Amount reported for every transaction the gateway recognizes.
const VERIFIED_AMOUNT: Decimal = dec!(10.50);

/// A stand-in payment processor.
///
/// It never moves money: charges succeed for any well-formed request after
/// sleeping for `latency`, and ids are synthesized from the patron id and
/// the current unix timestamp.
#[derive(Debug, Clone, Default)]
pub struct SimulatedPaymentGateway {
    latency: Duration,
}

impl SimulatedPaymentGateway {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

#[async_trait]
impl PaymentGateway for SimulatedPaymentGateway {
    async fn process_payment(
        &self,
        patron_id: &str,
        amount: Decimal,
        description: &str,
    ) -> Result<ChargeResponse, GatewayError> {
        self.simulate_latency().await;

        let Ok(patron) = PatronId::parse(patron_id) else {
            return Ok(ChargeResponse::declined("Invalid patron ID format"));
        };
        if amount > MAX_CHARGE {
            return Ok(ChargeResponse::declined(format!(
                "Payment declined: amount exceeds limit of ${MAX_CHARGE:.2}"
            )));
        }
        if amount <= Decimal::ZERO {
            return Ok(ChargeResponse::declined("Invalid amount: must be greater than 0"));
        }

        let transaction_id = TransactionId::new(&patron, Utc::now());
        tracing::debug!(%transaction_id, %amount, description, "Simulated charge accepted");
        Ok(ChargeResponse::approved(
            transaction_id,
            format!("Payment of ${amount:.2} processed successfully"),
        ))
    }

    async fn refund_payment(
        &self,
        transaction_id: &str,
        amount: Decimal,
    ) -> Result<RefundResponse, GatewayError> {
        self.simulate_latency().await;

        if !is_transaction_id(transaction_id) {
            return Ok(RefundResponse {
                success: false,
                message: "Invalid transaction ID".to_string(),
            });
        }
        if amount <= Decimal::ZERO {
            return Ok(RefundResponse {
                success: false,
                message: "Invalid refund amount".to_string(),
            });
        }

        let refund_id = format!("refund_{transaction_id}_{}", Utc::now().timestamp());
        Ok(RefundResponse {
            success: true,
            message: format!(
                "Refund of ${amount:.2} processed successfully. Refund ID: {refund_id}"
            ),
        })
    }

    async fn verify_payment_status(
        &self,
        transaction_id: &str,
    ) -> Result<PaymentStatus, GatewayError> {
        self.simulate_latency().await;

        match TransactionId::parse(transaction_id) {
            Ok(transaction_id) => Ok(PaymentStatus::Completed {
                transaction_id,
                amount: VERIFIED_AMOUNT,
                timestamp: Utc::now(),
            }),
            Err(_) => Ok(PaymentStatus::NotFound {
                message: "Transaction not found".to_string(),
            }),
        }
    }
}
