use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use common::error::{AppError, Res};
use models::dtos::pay::CreatePaymentMethodRequest;

/// Card details as typed by the user.
#[derive(Debug, Clone, Default)]
pub struct CardDetails {
    pub number: String,
    pub holder: String,
    pub expiry_month: u32,
    pub expiry_year: u32,
    pub cvv: String,
    pub is_default: bool,
}

impl CardDetails {
    /// Normalizes and checks the card, collecting every field error at once.
    ///
    /// Only format is checked here; whether the card can actually be charged
    /// is up to the backend.
    pub fn into_request(self, today: NaiveDate) -> Res<CreatePaymentMethodRequest> {
        let number = normalize_card_number(&self.number);
        let brand = card_type(&number);
        let year = full_year(self.expiry_year);
        let mut errors = BTreeMap::new();

        if number.len() < 12 || number.len() > 19 || !luhn_valid(&number) {
            errors.insert("cardNumber".to_string(), "Invalid card number".to_string());
        }
        if self.holder.trim().is_empty() {
            errors.insert("cardHolder".to_string(), "Cardholder name is required".to_string());
        }
        if !expiry_valid(self.expiry_month, year, today) {
            errors.insert("expiry".to_string(), "Card has expired or date is invalid".to_string());
        }
        if !cvv_valid(&self.cvv, brand) {
            errors.insert("cvv".to_string(), "Invalid CVV".to_string());
        }

        if let Some(first) = errors.values().next().cloned() {
            return Err(AppError::Validation {
                message: first,
                fields: errors,
            });
        }

        Ok(CreatePaymentMethodRequest {
            card_number: number,
            card_holder: self.holder.trim().to_string(),
            card_type: brand.to_string(),
            expiry_month: self.expiry_month,
            expiry_year: year,
            cvv: self.cvv.trim().to_string(),
            is_default: self.is_default,
        })
    }
}

/// Drops spaces and dashes.
pub fn normalize_card_number(input: &str) -> String {
    input.chars().filter(|c| !matches!(c, ' ' | '-')).collect()
}

/// Groups digits by four for display: `4242 4242 4242 4242`.
pub fn format_card_number(input: &str) -> String {
    let digits = normalize_card_number(input);
    digits
        .as_bytes()
        .chunks(4)
        .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn luhn_valid(number: &str) -> bool {
    if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    let sum: u32 = number
        .bytes()
        .rev()
        .enumerate()
        .map(|(i, b)| {
            let d = (b - b'0') as u32;
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 { doubled - 9 } else { doubled }
            } else {
                d
            }
        })
        .sum();
    sum % 10 == 0
}

/// Card brand from the number's prefix.
pub fn card_type(number: &str) -> &'static str {
    let prefix = |len: usize| number.get(..len).and_then(|p| p.parse::<u32>().ok());

    if number.starts_with('4') {
        "visa"
    } else if matches!(prefix(2), Some(34 | 37)) {
        "amex"
    } else if matches!(prefix(2), Some(51..=55)) || matches!(prefix(4), Some(2221..=2720)) {
        "mastercard"
    } else if number.starts_with("6011") || number.starts_with("65") {
        "discover"
    } else {
        "unknown"
    }
}

/// A card is valid through the last day of its expiry month.
pub fn expiry_valid(month: u32, year: u32, today: NaiveDate) -> bool {
    if !(1..=12).contains(&month) {
        return false;
    }
    let year = full_year(year) as i32;
    (year, month) >= (today.year(), today.month())
}

/// American Express uses four digits, everything else three.
pub fn cvv_valid(cvv: &str, card_type: &str) -> bool {
    let cvv = cvv.trim();
    let expected = if card_type == "amex" { 4 } else { 3 };
    cvv.len() == expected && cvv.bytes().all(|b| b.is_ascii_digit())
}

fn full_year(year: u32) -> u32 {
    if year < 100 { 2000 + year } else { year }
}
