//! Customer types: the raw checkout form and the persisted customer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};

use super::{CustomerId, Email};

/// Customer details as submitted at checkout.
///
/// Every field is a raw string. Missing JSON fields deserialize as empty
/// strings so that they are reported by validation rather than rejected by
/// the decoder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomerForm {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub cc_number: String,
    pub cc_expiry_month: String,
    pub cc_expiry_year: String,
}

/// A validated customer ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCustomer {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: Email,
    pub cc_number: String,
    /// Last second of the card's expiry month, UTC.
    pub cc_expiry: DateTime<Utc>,
}

/// A persisted customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: Email,
    /// Card number as entered; serialized masked.
    #[serde(serialize_with = "serialize_masked")]
    pub cc_number: String,
    pub cc_expiry: DateTime<Utc>,
}

impl Customer {
    /// Attach a generated ID to a validated customer.
    #[must_use]
    pub fn from_new(id: CustomerId, new: NewCustomer) -> Self {
        Self {
            id,
            name: new.name,
            address: new.address,
            phone: new.phone,
            email: new.email,
            cc_number: new.cc_number,
            cc_expiry: new.cc_expiry,
        }
    }
}

fn mask_card_number(number: &str) -> String {
    let digits: Vec<char> = number.chars().filter(char::is_ascii_digit).collect();
    let visible = digits.len().saturating_sub(4);
    digits
        .iter()
        .enumerate()
        .map(|(i, c)| if i < visible { '*' } else { *c })
        .collect()
}

fn serialize_masked<S: Serializer>(number: &str, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&mask_card_number(number))
}
