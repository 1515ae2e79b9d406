//! Conversion of raw store records into canonical [`Invoice`]s.
//!
//! The store enforces no schema, so every field is read independently and
//! falls back to a fixed default. Nothing in here returns an error or panics.

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::models::{
    Invoice, LineItem, DEFAULT_CURRENCY, UNKNOWN_CLIENT, UNKNOWN_FILE_NAME, UNKNOWN_INVOICE_NUMBER,
};
use crate::store::{Record, StoreValue};
use crate::utils::{has_canonical_year, parse_date, parse_decimal, today_utc};

#[derive(Debug, Clone, Copy)]
pub struct Normalizer {
    today: NaiveDate,
}

impl Default for Normalizer {
    fn default() -> Self {
        Normalizer::new()
    }
}

impl Normalizer {
    pub fn new() -> Self {
        Normalizer { today: today_utc() }
    }

    /// Fixes the date used when an issue date is missing.
    pub fn with_today(today: NaiveDate) -> Self {
        Normalizer { today }
    }

    pub fn normalize(&self, input: &StoreValue) -> Vec<Invoice> {
        let StoreValue::Array(items) = input else {
            warn!("Expected a sequence of invoice records, got {}", input.kind());
            return Vec::new();
        };

        let invoices: Vec<Invoice> = items
            .iter()
            .enumerate()
            .filter_map(|(position, item)| {
                item.as_record()
                    .map(|record| self.normalize_record(record, position))
            })
            .collect();

        if invoices.len() != items.len() {
            debug!("Dropped {} malformed invoice entries", items.len() - invoices.len());
        }
        invoices
    }

    /// `position` only matters when the record carries no id of its own.
    pub fn normalize_record(&self, record: &Record, position: usize) -> Invoice {
        Invoice {
            id: text(record.get("id")).unwrap_or_else(|| format!("invoice-{}", position)),
            file_name: text(record.get("fileName"))
                .unwrap_or_else(|| UNKNOWN_FILE_NAME.to_string()),
            cliente: text(record.get("cliente")).unwrap_or_else(|| UNKNOWN_CLIENT.to_string()),
            invoice_number: text(record.get("invoiceNumber"))
                .unwrap_or_else(|| UNKNOWN_INVOICE_NUMBER.to_string()),
            date: date(record.get("date")).unwrap_or(self.today),
            due_date: date(record.get("dueDate")),
            total_amount: amount(record.get("totalAmount")),
            tax_amount: amount(record.get("taxAmount")),
            irpf_amount: amount(record.get("irpfAmount")),
            currency: currency(record.get("currency")),
            line_items: line_items(record.get("lineItems")),
            download_url: text(record.get("downloadUrl")),
        }
    }
}

pub fn normalize_invoices(input: &StoreValue) -> Vec<Invoice> {
    Normalizer::new().normalize(input)
}

fn text(value: Option<&StoreValue>) -> Option<String> {
    match value? {
        StoreValue::String(raw) => {
            let trimmed = raw.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        StoreValue::Number(number) if number.is_finite() => Some(number.to_string()),
        _ => None,
    }
}

fn date(value: Option<&StoreValue>) -> Option<NaiveDate> {
    let date = match value? {
        StoreValue::Timestamp(timestamp) => timestamp.to_date().map(|d| d.date_naive()),
        StoreValue::Date(datetime) => Some(datetime.date_naive()),
        StoreValue::String(raw) => parse_date(raw),
        _ => None,
    };
    date.filter(|d| has_canonical_year(*d))
}

fn number(value: Option<&StoreValue>) -> Option<f64> {
    match value? {
        StoreValue::Number(number) if number.is_finite() => Some(*number),
        StoreValue::String(raw) => parse_decimal(raw),
        _ => None,
    }
}

/// Money fields are kept as magnitudes; withholdings often arrive negated.
fn amount(value: Option<&StoreValue>) -> f64 {
    number(value).map(f64::abs).unwrap_or(0.0)
}

fn currency(value: Option<&StoreValue>) -> String {
    let Some(raw) = text(value) else {
        return DEFAULT_CURRENCY.to_string();
    };
    match raw.as_str() {
        "€" => return "EUR".to_string(),
        "$" => return "USD".to_string(),
        "£" => return "GBP".to_string(),
        _ => {}
    }
    if raw.len() == 3 && raw.chars().all(|c| c.is_ascii_alphabetic()) {
        raw.to_ascii_uppercase()
    } else {
        DEFAULT_CURRENCY.to_string()
    }
}

fn line_items(value: Option<&StoreValue>) -> Vec<LineItem> {
    let Some(StoreValue::Array(items)) = value else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(StoreValue::as_record)
        .map(|item| LineItem {
            description: text(item.get("description")).unwrap_or_default(),
            quantity: number(item.get("quantity")).unwrap_or(0.0),
            unit_price: number(item.get("unitPrice")).unwrap_or(0.0),
            total: number(item.get("total")).unwrap_or(0.0),
        })
        .collect()
}
