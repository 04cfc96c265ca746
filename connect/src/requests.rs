use {
    crate::{
        client::{RpcRequest, SignClient},
        Error,
        Result,
        SessionManager,
    },
    bch_connect_domain::{ChainId, Method, Session},
    serde::{Deserialize, Serialize},
    serde_json::Value,
    std::sync::Arc,
    tracing::{debug, warn},
};

pub const DEFAULT_REQUEST_EXPIRY_SECS: u64 = 300;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignMessageRequest {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub user_prompt: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignTransactionRequest {
    /// Serialized unsigned transaction.
    pub transaction: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub source_outputs: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub broadcast: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub user_prompt: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignTransactionResponse {
    pub signed_transaction: String,
    pub signed_transaction_hash: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignTransactionOptions {
    pub request: SignTransactionRequest,
    pub expiry_secs: u64,
}

impl SignTransactionOptions {
    #[must_use]
    pub fn new(request: SignTransactionRequest) -> Self {
        Self {
            request,
            expiry_secs: DEFAULT_REQUEST_EXPIRY_SECS,
        }
    }

    #[must_use]
    pub fn expiry_secs(mut self, expiry_secs: u64) -> Self {
        self.expiry_secs = expiry_secs;
        self
    }
}

impl From<SignTransactionRequest> for SignTransactionOptions {
    fn from(request: SignTransactionRequest) -> Self {
        Self::new(request)
    }
}

/// One-shot request operations over the live client/session pair. They
/// borrow the manager's client and fail fast when no session is
/// settled; genuine RPC failures propagate to the caller.
impl SessionManager {
    fn request_context(&self) -> Result<(Arc<dyn SignClient>, Session)> {
        let client = self.client()?;
        let session = self.session().ok_or(Error::NoActiveSession)?;
        Ok((client, session))
    }

    async fn rpc(&self, method: Method, params: Value, expiry: Option<u64>) -> Result<Value> {
        let (client, session) = self.request_context()?;
        client
            .request(RpcRequest {
                chain_id: ChainId::from(self.config().network()),
                topic: session.topic.clone(),
                method,
                params,
                expiry,
            })
            .await
    }

    /// `bch_getAddresses`: token-aware address list known to the
    /// wallet. An empty list is an error.
    pub async fn get_addresses(&self) -> Result<Vec<String>> {
        let value = self
            .rpc(
                Method::GetAddresses,
                serde_json::json!({ "token": true }),
                None,
            )
            .await?;
        let addresses: Vec<String> = serde_json::from_value(value)?;
        if addresses.is_empty() {
            return Err(Error::EmptyAddressList);
        }
        Ok(addresses)
    }

    /// `bch_signMessage`: returns the signature string.
    pub async fn sign_message(&self, request: &SignMessageRequest) -> Result<String> {
        let value = self
            .rpc(Method::SignMessage, serde_json::to_value(request)?, None)
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    /// `bch_signTransaction`: returns the signed transaction, or
    /// `None` when the wallet acknowledged with a bare empty object.
    ///
    /// Some wallet versions in the field respond to a successfully
    /// processed signing request with `{}` instead of the expected
    /// payload, and the protocol layer surfaces that as a rejection.
    /// Rethrowing it would report a possibly-broadcast payment as a
    /// hard failure, so that exact shape downgrades to an unknown
    /// outcome. Anything else, including a rejection with a `message`
    /// field or an empty array, propagates unchanged.
    pub async fn sign_transaction(
        &self,
        options: impl Into<SignTransactionOptions>,
    ) -> Result<Option<SignTransactionResponse>> {
        let options = options.into();
        let params = serde_json::to_value(&options.request)?;
        match self
            .rpc(Method::SignTransaction, params, Some(options.expiry_secs))
            .await
        {
            Ok(value) => {
                debug!("transaction signing response: {value}");
                Ok(Some(serde_json::from_value(value)?))
            }
            Err(Error::Rpc(value)) if is_empty_object(&value) => {
                warn!(
                    "wallet acknowledged the signing request with an empty object; \
                     the transaction may still have been signed and broadcast, \
                     treating the outcome as unknown"
                );
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

/// A JSON object with zero keys. Arrays and every other value shape are
/// excluded; the boundary is deliberately exact.
pub(crate) fn is_empty_object(value: &Value) -> bool {
    matches!(value, Value::Object(map) if map.is_empty())
}
