use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::i18n::Language;

pub const UNKNOWN_FILE_NAME: &str = "Archivo desconocido";
pub const UNKNOWN_CLIENT: &str = "Cliente desconocido";
pub const UNKNOWN_INVOICE_NUMBER: &str = "N/A";
pub const DEFAULT_CURRENCY: &str = "EUR";

/// An invoice in canonical form. Every value here has already been checked
/// by the normalizer, so consumers can render it without further coercion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: String,
    pub file_name: String,
    pub cliente: String,
    pub invoice_number: String,
    pub date: NaiveDate,
    #[serde(with = "optional_date")]
    pub due_date: Option<NaiveDate>,
    pub total_amount: f64,
    pub tax_amount: f64,
    pub irpf_amount: f64,
    pub currency: String,
    pub line_items: Vec<LineItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub description: String,
    pub quantity: f64,
    pub unit_price: f64,
    pub total: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub api_key: Option<String>,
    pub key_endpoint: Option<String>,
    pub api_base: String,
    pub model: String,
    pub request_timeout_secs: u64,
    pub language: Language,
}

/// `dueDate` travels as `""` when the invoice has none.
mod optional_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::utils::{format_date, DATE_FORMAT};

    pub fn serialize<S>(value: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(date) => serializer.serialize_str(&format_date(*date)),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
        if raw.trim().is_empty() {
            return Ok(None);
        }
        NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
            .map(Some)
            .map_err(serde::de::Error::custom)
    }
}
