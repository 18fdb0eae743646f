use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_ITEM_DESC: &str = "Consultation Fees";

/// Organization block printed in the receipt header.
///
/// Also the on-disk shape of the one-time organization profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrgDetails {
    pub org_name: String,
    #[serde(default)]
    pub org_address: Option<String>,
    #[serde(default)]
    pub org_phone: Option<String>,
    #[serde(default)]
    pub org_email: Option<String>,
}

impl OrgDetails {
    /// Address split into printable lines, blank lines dropped.
    pub fn address_lines(&self) -> Vec<&str> {
        self.org_address
            .as_deref()
            .map(|a| a.lines().map(str::trim).filter(|l| !l.is_empty()).collect())
            .unwrap_or_default()
    }

    /// Phone and email joined by a space; `None` when both are empty.
    pub fn contact_line(&self) -> Option<String> {
        let parts: Vec<&str> = [self.org_phone.as_deref(), self.org_email.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        (!parts.is_empty()).then(|| parts.join(" "))
    }
}

/// Everything needed to insert a receipt row; `id` and `created_at` are
/// assigned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewReceipt {
    pub org: OrgDetails,
    pub reg_no: Option<String>,
    pub patient_name: String,
    pub guardian_name: Option<String>,
    pub address: Option<String>,
    pub age: Option<u32>,
    pub gender: Option<String>,
    pub phone: Option<String>,
    pub consultant: Option<String>,
    pub item_desc: String,
    pub amount: f64,
    pub paid_amount: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Receipt {
    pub id: i64,
    pub org: OrgDetails,
    pub reg_no: Option<String>,
    pub patient_name: String,
    pub guardian_name: Option<String>,
    pub address: Option<String>,
    pub age: Option<u32>,
    pub gender: Option<String>,
    pub phone: Option<String>,
    pub consultant: Option<String>,
    pub item_desc: String,
    pub amount: f64,
    pub paid_amount: f64,
    pub created_at: DateTime<Utc>,
}

impl Receipt {
    pub fn from_new(id: i64, new: NewReceipt, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            org: new.org,
            reg_no: new.reg_no,
            patient_name: new.patient_name,
            guardian_name: new.guardian_name,
            address: new.address,
            age: new.age,
            gender: new.gender,
            phone: new.phone,
            consultant: new.consultant,
            item_desc: new.item_desc,
            amount: new.amount,
            paid_amount: new.paid_amount,
            created_at,
        }
    }

    /// `"F / 30"`, `"F"`, `"30"` or `None`.
    pub fn gender_age(&self) -> Option<String> {
        match (self.gender.as_deref(), self.age) {
            (Some(g), Some(a)) => Some(format!("{g} / {a}")),
            (Some(g), None) => Some(g.to_string()),
            (None, Some(a)) => Some(a.to_string()),
            (None, None) => None,
        }
    }

    pub fn date_label(&self) -> String {
        self.created_at.format("%Y-%m-%d %H:%M").to_string()
    }

    /// Label/value rows shown on the preview page and the PDF; blanks become `-`.
    pub fn info_rows(&self) -> [(&'static str, String); 8] {
        fn or_dash(value: Option<&str>) -> String {
            value
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .unwrap_or("-")
                .to_string()
        }
        let address = self.address.as_deref().map(|a| {
            a.lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .collect::<Vec<_>>()
                .join(", ")
        });
        [
            ("Receipt Date", self.date_label()),
            ("Registration No.", or_dash(self.reg_no.as_deref())),
            ("Patient Name", self.patient_name.clone()),
            ("Guardian Name", or_dash(self.guardian_name.as_deref())),
            ("Address", or_dash(address.as_deref())),
            ("Gender/Age", or_dash(self.gender_age().as_deref())),
            ("Phone", or_dash(self.phone.as_deref())),
            ("Consultant", or_dash(self.consultant.as_deref())),
        ]
    }
}
