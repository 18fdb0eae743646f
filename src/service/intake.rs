//! Form intake: raw HTML form fields to validated store input.
//!
//! Browsers submit empty inputs as empty strings, so every optional field is
//! trimmed and collapsed to `None` when blank.

use crate::db::models::{DEFAULT_ITEM_DESC, NewReceipt, OrgDetails};
use crate::error::ReceiptError;
use serde::Deserialize;

/// Organization name used when neither a profile nor the form supplies one.
pub const FALLBACK_ORG_NAME: &str = "Your Clinic";

/// Largest amount accepted for `amount` and `paid_amount`.
pub const MAX_AMOUNT: f64 = 9_999_999_999.99;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ReceiptForm {
    pub org_name: Option<String>,
    pub org_address: Option<String>,
    pub org_phone: Option<String>,
    pub org_email: Option<String>,
    pub reg_no: Option<String>,
    pub patient_name: Option<String>,
    pub guardian_name: Option<String>,
    pub address: Option<String>,
    pub age: Option<String>,
    pub gender: Option<String>,
    pub phone: Option<String>,
    pub consultant: Option<String>,
    pub item_desc: Option<String>,
    pub amount: Option<String>,
    pub paid_amount: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SetupForm {
    pub org_name: Option<String>,
    pub org_address: Option<String>,
    pub org_phone: Option<String>,
    pub org_email: Option<String>,
}

fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn require(value: Option<String>, name: &str) -> Result<String, ReceiptError> {
    clean(value).ok_or_else(|| ReceiptError::missing_field(name))
}

fn parse_age(value: Option<String>) -> Result<Option<u32>, ReceiptError> {
    clean(value)
        .map(|v| {
            v.parse::<u32>()
                .map_err(|_| ReceiptError::Validation(format!("`age` must be a whole number, got {v:?}")))
        })
        .transpose()
}

/// Blank means zero; thousands separators are accepted.
fn parse_amount(value: Option<String>, name: &str) -> Result<f64, ReceiptError> {
    let Some(raw) = clean(value) else {
        return Ok(0.0);
    };
    let amount: f64 = raw
        .replace(',', "")
        .parse()
        .map_err(|_| ReceiptError::Validation(format!("`{name}` must be a number, got {raw:?}")))?;
    if !amount.is_finite() || amount < 0.0 {
        return Err(ReceiptError::Validation(format!(
            "`{name}` must be a non-negative amount"
        )));
    }
    if amount > MAX_AMOUNT {
        return Err(ReceiptError::Validation(format!(
            "`{name}` must not exceed {MAX_AMOUNT:.2}"
        )));
    }
    Ok(amount)
}

impl ReceiptForm {
    /// Validate the form. When `profile` is set its organization block wins
    /// over whatever organization fields were posted.
    pub fn into_new_receipt(self, profile: Option<OrgDetails>) -> Result<NewReceipt, ReceiptError> {
        let org = match profile {
            Some(profile) => profile,
            None => OrgDetails {
                org_name: clean(self.org_name).unwrap_or_else(|| FALLBACK_ORG_NAME.to_string()),
                org_address: clean(self.org_address),
                org_phone: clean(self.org_phone),
                org_email: clean(self.org_email),
            },
        };

        Ok(NewReceipt {
            org,
            reg_no: clean(self.reg_no),
            patient_name: require(self.patient_name, "patient_name")?,
            guardian_name: clean(self.guardian_name),
            address: clean(self.address),
            age: parse_age(self.age)?,
            gender: clean(self.gender),
            phone: clean(self.phone),
            consultant: clean(self.consultant),
            item_desc: clean(self.item_desc).unwrap_or_else(|| DEFAULT_ITEM_DESC.to_string()),
            amount: parse_amount(self.amount, "amount")?,
            paid_amount: parse_amount(self.paid_amount, "paid_amount")?,
        })
    }
}

impl SetupForm {
    pub fn into_profile(self) -> Result<OrgDetails, ReceiptError> {
        Ok(OrgDetails {
            org_name: require(self.org_name, "org_name")?,
            org_address: clean(self.org_address),
            org_phone: clean(self.org_phone),
            org_email: clean(self.org_email),
        })
    }
}
