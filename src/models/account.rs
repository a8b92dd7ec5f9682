//! Account-lookup data structures: businesses, WhatsApp Business Accounts
//! and their phone numbers, as returned by the upstream account service.

use serde::{Deserialize, Serialize};

/// A business visible to the supplied access token
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Business {
    pub id: String,
    pub name: String,
}

/// A phone number registered under a WhatsApp Business Account
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PhoneNumber {
    pub phone_number_id: String,
    pub phone_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// A WhatsApp Business Account owning phone numbers and templates
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Waba {
    pub waba_id: String,
    pub business_name: String,
    #[serde(default)]
    pub phone_numbers: Vec<PhoneNumber>,
}

/// Flattened selection row the payload compiler resolves the sender against
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AccountOption {
    /// Selection key, matched against `PlaygroundConfig::selected_waba`
    pub value: String,
    pub label: String,
    pub phone: String,
    pub waba_id: String,
    pub phone_number_id: String,
    #[serde(default)]
    pub project_id: String,
}

impl From<&Waba> for AccountOption {
    fn from(waba: &Waba) -> Self {
        let first_phone = waba.phone_numbers.first();

        AccountOption {
            value: waba.waba_id.clone(),
            label: waba.business_name.clone(),
            phone: first_phone
                .map(|phone| phone.phone_number.clone())
                .unwrap_or_default(),
            waba_id: waba.waba_id.clone(),
            phone_number_id: first_phone
                .map(|phone| phone.phone_number_id.clone())
                .unwrap_or_default(),
            project_id: String::new(),
        }
    }
}
