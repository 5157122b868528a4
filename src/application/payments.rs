use super::library::Library;
use crate::domain::book::BookId;
use crate::domain::fee::MAX_LATE_FEE;
use crate::domain::patron::PatronId;
use crate::domain::payment::{PaymentStatus, TransactionId};
use crate::domain::ports::PaymentGateway;
use crate::error::{LibraryError, Result};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

/// A late fee that the gateway accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentReceipt {
    pub transaction_id: TransactionId,
    pub amount: Decimal,
    pub message: String,
}

impl fmt::Display for PaymentReceipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Payment successful! {}", self.message)
    }
}

impl Library {
    /// Charges a patron the late fee currently owed for one book.
    ///
    /// The gateway is only contacted once the patron id, the fee and the book
    /// have all checked out. A gateway fault is logged and reported as a
    /// failed payment; it never escapes as anything but `GatewayError`.
    pub async fn pay_late_fees(
        &self,
        patron_id: &str,
        book_id: BookId,
        gateway: &dyn PaymentGateway,
    ) -> Result<PaymentReceipt> {
        let patron = PatronId::parse(patron_id)?;

        let assessment = self
            .calculate_late_fee(patron.as_str(), book_id)
            .await
            .map_err(|e| {
                tracing::error!(%patron, book_id, error = %e, "Late fee assessment failed");
                LibraryError::CalculationError
            })?;

        let amount = assessment.fee_amount;
        if amount <= Decimal::ZERO {
            return Err(LibraryError::NoFeeDue);
        }

        let book = self
            .books
            .get_book_by_id(book_id)
            .await?
            .ok_or(LibraryError::BookNotFound)?;

        let description = format!("Late fees for '{}'", book.title);
        let response = match gateway
            .process_payment(patron.as_str(), amount, &description)
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(%patron, book_id, %amount, error = %e, "Payment gateway fault");
                return Err(LibraryError::GatewayError(format!(
                    "Payment processing error: {e}"
                )));
            }
        };

        match response.transaction_id {
            Some(transaction_id) if response.success => {
                tracing::info!(%patron, book_id, %amount, %transaction_id, "Late fees paid");
                Ok(PaymentReceipt {
                    transaction_id,
                    amount,
                    message: response.message,
                })
            }
            _ => {
                tracing::warn!(%patron, book_id, %amount, reason = %response.message, "Payment declined");
                Err(LibraryError::GatewayError(format!(
                    "Payment failed: {}",
                    response.message
                )))
            }
        }
    }

    /// Refunds all or part of a late-fee payment.
    ///
    /// The id must have the gateway's `txn_<patron>_<timestamp>` shape and the
    /// amount must lie in `(0, 15.00]`; otherwise the gateway is never called.
    /// The gateway's message is passed through unchanged.
    pub async fn refund_late_fee_payment(
        &self,
        transaction_id: &str,
        amount: Decimal,
        gateway: &dyn PaymentGateway,
    ) -> Result<String> {
        let transaction_id = TransactionId::parse(transaction_id)?;

        if amount <= Decimal::ZERO {
            return Err(LibraryError::InvalidAmount(
                "Refund amount must be greater than 0.".to_string(),
            ));
        }
        if amount > MAX_LATE_FEE {
            return Err(LibraryError::InvalidAmount(format!(
                "Refund amount exceeds maximum late fee of ${MAX_LATE_FEE:.2}."
            )));
        }

        match gateway.refund_payment(transaction_id.as_str(), amount).await {
            Ok(response) if response.success => {
                tracing::info!(%transaction_id, %amount, "Late fee refunded");
                Ok(response.message)
            }
            Ok(response) => {
                tracing::warn!(%transaction_id, %amount, reason = %response.message, "Refund declined");
                Err(LibraryError::GatewayError(response.message))
            }
            Err(e) => {
                tracing::error!(%transaction_id, %amount, error = %e, "Payment gateway fault");
                Err(LibraryError::GatewayError(format!(
                    "Refund processing error: {e}"
                )))
            }
        }
    }

    /// Asks the gateway what it knows about a transaction.
    pub async fn verify_payment(
        &self,
        transaction_id: &str,
        gateway: &dyn PaymentGateway,
    ) -> Result<PaymentStatus> {
        gateway
            .verify_payment_status(transaction_id)
            .await
            .map_err(|e| LibraryError::GatewayError(format!("Verification error: {e}")))
    }
}
