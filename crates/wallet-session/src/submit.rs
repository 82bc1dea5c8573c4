use serde::{Deserialize, Serialize};

use chain_evm::{address, units};

use crate::error::SessionError;
use crate::provider::{ProviderHandle, TransferParams};

/// A user-entered transfer: recipient address and amount in decimal ether.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferRequest {
    pub recipient: String,
    pub amount: String,
}

/// The durable record of a successfully submitted transfer. Produced once
/// per submission and never modified.
#[derive(Debug, Clone, Serialize)]
pub struct TransferReceipt {
    /// Transaction hash reported by the provider.
    pub tx_hash: String,
    /// Raw provider result, kept verbatim for the presentation layer.
    pub raw: serde_json::Value,
}

/// Validates and submits native-currency transfers.
///
/// Submission takes `&mut self`: one submitter can never have two transfers
/// in flight, which keeps balance accounting single-file per sender.
#[derive(Debug, Default)]
pub struct Submitter;

impl Submitter {
    pub fn new() -> Self {
        Self
    }

    /// Validates `request` and hands it to the bound provider.
    ///
    /// Validation is fail-fast and ordered: the recipient is checked before
    /// the amount, and the provider is never invoked for input that fails
    /// locally. A provider-level failure (rejection, insufficient funds,
    /// cancellation) surfaces as [`SessionError::ProviderRejected`] and is
    /// never retried here; transfers are not idempotent.
    pub fn submit(
        &mut self,
        handle: &ProviderHandle,
        sender: &str,
        request: &TransferRequest,
    ) -> Result<TransferReceipt, SessionError> {
        match address::validate_address(&request.recipient) {
            Ok(true) => {}
            Ok(false) => {
                return Err(SessionError::InvalidRecipient(format!(
                    "checksum mismatch: {}",
                    request.recipient
                )));
            }
            Err(err) => return Err(err.into()),
        }

        let value = units::parse_ether(&request.amount)?;
        if value.is_zero() {
            return Err(SessionError::InvalidAmount(
                "amount must be greater than zero".into(),
            ));
        }

        let params = TransferParams {
            from: sender.to_string(),
            to: request.recipient.clone(),
            value,
        };
        let raw = handle.provider().send_transfer(&params)?;

        let tx_hash = raw
            .get("transactionHash")
            .and_then(|hash| hash.as_str())
            .ok_or_else(|| {
                SessionError::ProviderRejected("result carries no transactionHash".into())
            })?
            .to_string();

        tracing::info!(tx_hash = %tx_hash, to = %params.to, "transfer submitted");
        Ok(TransferReceipt { tx_hash, raw })
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::mpsc::Sender;

    use alloy_primitives::U256;
    use serde_json::json;

    use super::*;
    use crate::provider::{
        bind, ChainId, Provider, ProviderError, ProviderEvent, SubscriptionId,
    };

    const SENDER: &str = "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed";
    const RECIPIENT: &str = "0xfb6916095ca1df60bb79ce92ce3ea74c37c5d359";

    /// Provider that records submitted transfers and scripts the outcome.
    struct RecordingProvider {
        reject: bool,
        submitted: RefCell<Vec<TransferParams>>,
    }

    impl RecordingProvider {
        fn bound(reject: bool) -> (ProviderHandle, Rc<Self>) {
            let provider = Rc::new(Self {
                reject,
                submitted: RefCell::new(Vec::new()),
            });
            let handle = bind(Some(Rc::clone(&provider) as Rc<dyn Provider>)).unwrap();
            (handle, provider)
        }

        fn submissions(&self) -> usize {
            self.submitted.borrow().len()
        }
    }

    impl Provider for RecordingProvider {
        fn request_accounts(&self) -> Result<Vec<String>, ProviderError> {
            Ok(vec![SENDER.to_string()])
        }

        fn chain_id(&self) -> Result<ChainId, ProviderError> {
            Ok(ChainId::from("1"))
        }

        fn accounts(&self) -> Result<Vec<String>, ProviderError> {
            Ok(vec![SENDER.to_string()])
        }

        fn balance_of(&self, _address: &str) -> Result<U256, ProviderError> {
            Ok(U256::ZERO)
        }

        fn send_transfer(
            &self,
            params: &TransferParams,
        ) -> Result<serde_json::Value, ProviderError> {
            self.submitted.borrow_mut().push(params.clone());
            if self.reject {
                Err(ProviderError::Rejected("user cancelled".into()))
            } else {
                Ok(json!({
                    "transactionHash": "0xabc123",
                    "blockNumber": 1_234_567,
                    "status": true,
                }))
            }
        }

        fn add_chain(&self, _payload: &serde_json::Value) -> Result<(), ProviderError> {
            Ok(())
        }

        fn subscribe(&self, _sink: Sender<ProviderEvent>) -> SubscriptionId {
            SubscriptionId(0)
        }

        fn unsubscribe(&self, _id: SubscriptionId) {}
    }

    fn request(recipient: &str, amount: &str) -> TransferRequest {
        TransferRequest {
            recipient: recipient.into(),
            amount: amount.into(),
        }
    }

    #[test]
    fn valid_transfer_returns_receipt() {
        let (handle, provider) = RecordingProvider::bound(false);
        let mut submitter = Submitter::new();

        let receipt = submitter
            .submit(&handle, SENDER, &request(RECIPIENT, "2.5"))
            .unwrap();

        assert_eq!(receipt.tx_hash, "0xabc123");
        assert_eq!(receipt.raw["blockNumber"], 1_234_567);
        assert_eq!(provider.submissions(), 1);
    }

    #[test]
    fn transfer_value_is_converted_to_wei() {
        let (handle, provider) = RecordingProvider::bound(false);
        let mut submitter = Submitter::new();

        submitter
            .submit(&handle, SENDER, &request(RECIPIENT, "2.5"))
            .unwrap();

        let submitted = provider.submitted.borrow();
        assert_eq!(submitted[0].value, U256::from(2_500_000_000_000_000_000u64));
        assert_eq!(submitted[0].from, SENDER);
        assert_eq!(submitted[0].to, RECIPIENT);
    }

    #[test]
    fn invalid_recipient_never_reaches_provider() {
        let (handle, provider) = RecordingProvider::bound(false);
        let mut submitter = Submitter::new();

        // Any amount, even a valid one: the recipient check comes first.
        for amount in ["1", "abc"] {
            let result = submitter.submit(&handle, SENDER, &request("not-an-address", amount));
            assert!(matches!(result, Err(SessionError::InvalidRecipient(_))));
        }
        assert_eq!(provider.submissions(), 0);
    }

    #[test]
    fn bad_checksum_recipient_is_rejected() {
        let (handle, provider) = RecordingProvider::bound(false);
        let mut submitter = Submitter::new();

        // One letter in the wrong case.
        let result = submitter.submit(
            &handle,
            SENDER,
            &request("0x5AAEB6053F3E94C9b9A09f33669435E7Ef1BeAed", "1"),
        );
        assert!(matches!(result, Err(SessionError::InvalidRecipient(_))));
        assert_eq!(provider.submissions(), 0);
    }

    #[test]
    fn bad_amounts_fail_with_invalid_amount() {
        let (handle, provider) = RecordingProvider::bound(false);
        let mut submitter = Submitter::new();

        for amount in ["0", "-1", "abc", "", "0.0"] {
            let result = submitter.submit(&handle, SENDER, &request(RECIPIENT, amount));
            assert!(
                matches!(result, Err(SessionError::InvalidAmount(_))),
                "amount {amount:?}"
            );
        }
        assert_eq!(provider.submissions(), 0);
    }

    #[test]
    fn provider_rejection_is_surfaced_not_retried() {
        let (handle, provider) = RecordingProvider::bound(true);
        let mut submitter = Submitter::new();

        let result = submitter.submit(&handle, SENDER, &request(RECIPIENT, "1"));
        assert!(matches!(result, Err(SessionError::ProviderRejected(_))));
        // Exactly one attempt.
        assert_eq!(provider.submissions(), 1);
    }
}
