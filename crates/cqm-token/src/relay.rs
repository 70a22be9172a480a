//! Wire types for the relay endpoint.
//!
//! - [`RelayPayload`] — what the wallet-facing client POSTs
//! - [`RelayFields`] — what the relayer accepts: presence-checked, untyped
//! - [`MetaTransferArgs`] — the typed `metaTransfer` arguments
//! - [`RelayResponse`] — the `{status, message}` acknowledgment

use alloy::primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::signature::SplitSignature;
use crate::CqmError;

/// Field names every relay request must carry.
pub const RELAY_FIELDS: [&str; 6] = ["from", "amount", "deadline", "v", "r", "s"];

/// Message returned with a 400 on a missing or null field.
pub const INVALID_PARAMETERS_MESSAGE: &str = "Invalid or missing parameters";

/// Signature material posted by the holder's client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayPayload {
    pub from: Address,
    /// Base units, decimal string.
    pub amount: String,
    /// Unix seconds, decimal string.
    pub deadline: String,
    pub v: u8,
    pub r: B256,
    pub s: B256,
}

impl RelayPayload {
    pub fn new(from: Address, amount: U256, deadline: U256, signature: SplitSignature) -> Self {
        Self {
            from,
            amount: amount.to_string(),
            deadline: deadline.to_string(),
            v: signature.v,
            r: signature.r,
            s: signature.s,
        }
    }
}

/// A relay request whose six fields are known to be present and non-null.
/// Values are kept as raw JSON; typing happens in [`MetaTransferArgs`].
#[derive(Debug, Clone, PartialEq)]
pub struct RelayFields {
    pub from: Value,
    pub amount: Value,
    pub deadline: Value,
    pub v: Value,
    pub r: Value,
    pub s: Value,
}

impl RelayFields {
    /// Parse a request body, checking only that every field is present.
    pub fn from_json(body: &[u8]) -> Result<Self, CqmError> {
        let value: Value = serde_json::from_slice(body)
            .map_err(|e| CqmError::InvalidInput(format!("body is not valid JSON: {e}")))?;
        let Value::Object(mut map) = value else {
            return Err(CqmError::InvalidInput(
                "body is not a JSON object".to_string(),
            ));
        };

        let missing: Vec<&str> = RELAY_FIELDS
            .iter()
            .copied()
            .filter(|name| map.get(*name).map_or(true, Value::is_null))
            .collect();
        if !missing.is_empty() {
            return Err(CqmError::InvalidInput(format!(
                "missing fields: {}",
                missing.join(", ")
            )));
        }

        let mut take = |name: &str| map.remove(name).unwrap_or(Value::Null);
        Ok(Self {
            from: take("from"),
            amount: take("amount"),
            deadline: take("deadline"),
            v: take("v"),
            r: take("r"),
            s: take("s"),
        })
    }
}

/// Typed `metaTransfer` arguments, minus the recipient (always the owner).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetaTransferArgs {
    pub from: Address,
    pub amount: U256,
    pub deadline: U256,
    pub v: u8,
    pub r: B256,
    pub s: B256,
}

impl TryFrom<&RelayFields> for MetaTransferArgs {
    type Error = CqmError;

    fn try_from(fields: &RelayFields) -> Result<Self, Self::Error> {
        Ok(Self {
            from: address_field("from", &fields.from)?,
            amount: uint_field("amount", &fields.amount)?,
            deadline: uint_field("deadline", &fields.deadline)?,
            v: u8_field("v", &fields.v)?,
            r: bytes32_field("r", &fields.r)?,
            s: bytes32_field("s", &fields.s)?,
        })
    }
}

fn invalid(name: &str, value: &Value) -> CqmError {
    CqmError::InvalidInput(format!("field {name} has unusable value {value}"))
}

fn address_field(name: &str, value: &Value) -> Result<Address, CqmError> {
    value
        .as_str()
        .and_then(|s| s.trim().parse().ok())
        .ok_or_else(|| invalid(name, value))
}

/// Accepts JSON integers and decimal or `0x` hex strings.
fn uint_field(name: &str, value: &Value) -> Result<U256, CqmError> {
    match value {
        Value::Number(n) => n.as_u64().map(U256::from),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
    .ok_or_else(|| invalid(name, value))
}

fn u8_field(name: &str, value: &Value) -> Result<u8, CqmError> {
    let n = uint_field(name, value)?;
    if n > U256::from(u8::MAX) {
        return Err(invalid(name, value));
    }
    Ok(n.to::<u8>())
}

fn bytes32_field(name: &str, value: &Value) -> Result<B256, CqmError> {
    value
        .as_str()
        .and_then(|s| s.trim().parse().ok())
        .ok_or_else(|| invalid(name, value))
}

/// Acknowledgment body of the relay endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayResponse {
    pub status: String,
    pub message: String,
}

impl RelayResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            message: "OK".to_string(),
        }
    }

    pub fn invalid_parameters() -> Self {
        Self {
            status: "error".to_string(),
            message: INVALID_PARAMETERS_MESSAGE.to_string(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn full_body() -> Value {
        json!({
            "from": "0x00000000000000000000000000000000000000ab",
            "amount": "1000",
            "deadline": "1700000000",
            "v": 27,
            "r": format!("0x{}", "11".repeat(32)),
            "s": format!("0x{}", "22".repeat(32)),
        })
    }

    #[test]
    fn accepts_all_fields_present() {
        let body = serde_json::to_vec(&full_body()).unwrap();
        let fields = RelayFields::from_json(&body).unwrap();
        assert_eq!(fields.amount, json!("1000"));
        assert_eq!(fields.v, json!(27));
    }

    #[test]
    fn presence_only_accepts_garbage_values() {
        let body = br#"{"from":"0xabc","amount":"lots","deadline":false,"v":"x","r":0,"s":""}"#;
        let fields = RelayFields::from_json(body).unwrap();
        assert!(MetaTransferArgs::try_from(&fields).is_err());
    }

    #[test]
    fn reports_each_missing_field() {
        for name in RELAY_FIELDS {
            let mut body = full_body();
            body.as_object_mut().unwrap().remove(name);
            let err = RelayFields::from_json(&serde_json::to_vec(&body).unwrap()).unwrap_err();
            assert!(err.to_string().contains(name), "{name}: {err}");
        }
    }

    #[test]
    fn null_counts_as_missing() {
        let mut body = full_body();
        body["amount"] = Value::Null;
        assert!(RelayFields::from_json(&serde_json::to_vec(&body).unwrap()).is_err());
    }

    #[test]
    fn rejects_non_object_bodies() {
        assert!(RelayFields::from_json(b"not json").is_err());
        assert!(RelayFields::from_json(b"[1,2,3]").is_err());
        assert!(RelayFields::from_json(b"").is_err());
    }

    #[test]
    fn converts_to_typed_args() {
        let body = serde_json::to_vec(&full_body()).unwrap();
        let fields = RelayFields::from_json(&body).unwrap();
        let args = MetaTransferArgs::try_from(&fields).unwrap();
        assert_eq!(args.from, Address::with_last_byte(0xab));
        assert_eq!(args.amount, U256::from(1000u64));
        assert_eq!(args.deadline, U256::from(1_700_000_000u64));
        assert_eq!(args.v, 27);
        assert_eq!(args.r, B256::repeat_byte(0x11));
        assert_eq!(args.s, B256::repeat_byte(0x22));
    }

    #[test]
    fn numeric_and_hex_uints_convert() {
        let mut body = full_body();
        body["amount"] = json!(1000);
        body["deadline"] = json!("0x6553f100");
        body["v"] = json!("28");
        let fields = RelayFields::from_json(&serde_json::to_vec(&body).unwrap()).unwrap();
        let args = MetaTransferArgs::try_from(&fields).unwrap();
        assert_eq!(args.amount, U256::from(1000u64));
        assert_eq!(args.deadline, U256::from(1_700_000_000u64));
        assert_eq!(args.v, 28);
    }

    #[test]
    fn oversized_v_is_rejected() {
        let mut body = full_body();
        body["v"] = json!(256);
        let fields = RelayFields::from_json(&serde_json::to_vec(&body).unwrap()).unwrap();
        assert!(MetaTransferArgs::try_from(&fields).is_err());
    }

    #[test]
    fn payload_wire_format() {
        let split = SplitSignature {
            r: B256::repeat_byte(0x11),
            s: B256::repeat_byte(0x22),
            v: 28,
        };
        let payload = RelayPayload::new(
            Address::with_last_byte(1),
            U256::from(1000u64),
            U256::from(1_700_000_000u64),
            split,
        );
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["amount"], "1000");
        assert_eq!(value["deadline"], "1700000000");
        assert_eq!(value["v"], 28);
        assert_eq!(value["r"], format!("0x{}", "11".repeat(32)));

        let fields = RelayFields::from_json(&serde_json::to_vec(&value).unwrap()).unwrap();
        let args = MetaTransferArgs::try_from(&fields).unwrap();
        assert_eq!(args.v, 28);
        assert_eq!(args.from, payload.from);
    }

    #[test]
    fn response_bodies() {
        assert_eq!(
            serde_json::to_value(RelayResponse::ok()).unwrap(),
            json!({"status": "ok", "message": "OK"})
        );
        assert_eq!(
            serde_json::to_value(RelayResponse::invalid_parameters()).unwrap(),
            json!({"status": "error", "message": "Invalid or missing parameters"})
        );
    }
}
