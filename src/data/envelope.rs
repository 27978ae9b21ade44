//! Backend envelope decoding.
//!
//! The sales backend wraps every listing in
//! `{"status": "sucesso", "dados": [...]}` or
//! `{"status": "<anything else>", "mensagem": "..."}`. Rows inside `dados` are
//! validated one by one; a bad row is reported, not fatal.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::{DecodedRecords, Money, RowError, SaleRecord};
use crate::error::LoadError;

pub const STATUS_SUCCESS: &str = "sucesso";

const DEFAULT_BACKEND_MESSAGE: &str = "Failed to load sales.";

#[derive(Debug, Deserialize, Serialize)]
pub struct Envelope {
    pub status: String,
    #[serde(default)]
    pub dados: Vec<RawSale>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mensagem: Option<String>,
}

/// A row as the backend sends it. Field names follow the wire format.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawSale {
    #[serde(default)]
    pub id: Option<i64>,
    pub data: String,
    pub produto: String,
    pub quantidade: i64,
    pub valor: Money,
}

impl From<&SaleRecord> for RawSale {
    fn from(record: &SaleRecord) -> Self {
        Self {
            id: record.id,
            data: record.date.to_string(),
            produto: record.product.clone(),
            quantidade: i64::from(record.quantity),
            valor: record.value,
        }
    }
}

impl Envelope {
    pub fn success(records: &[SaleRecord]) -> Self {
        Self {
            status: STATUS_SUCCESS.to_string(),
            dados: records.iter().map(RawSale::from).collect(),
            mensagem: None,
        }
    }

    /// Unwrap the payload, turning a failure status into [`LoadError::Backend`].
    pub fn into_records(self) -> Result<DecodedRecords, LoadError> {
        if self.status != STATUS_SUCCESS {
            let message = self
                .mensagem
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_BACKEND_MESSAGE.to_string());
            tracing::warn!(status = %self.status, %message, "backend reported failure");
            return Err(LoadError::Backend(message));
        }

        let mut decoded = DecodedRecords::default();
        for (index, raw) in self.dados.into_iter().enumerate() {
            let id = raw.id;
            match convert_row(raw) {
                Ok(record) => decoded.records.push(record),
                Err(message) => decoded.row_errors.push(RowError { index, id, message }),
            }
        }

        if !decoded.row_errors.is_empty() {
            tracing::warn!(
                rejected = decoded.row_errors.len(),
                accepted = decoded.records.len(),
                "rejected malformed sale rows"
            );
        }

        Ok(decoded)
    }
}

/// Decode a response body into records.
pub fn decode_envelope(body: &str) -> Result<DecodedRecords, LoadError> {
    let envelope: Envelope = serde_json::from_str(body)
        .map_err(|e| LoadError::Transport(format!("invalid response body: {e}")))?;
    envelope.into_records()
}

fn convert_row(raw: RawSale) -> Result<SaleRecord, String> {
    let date = parse_sale_date(&raw.data)?;
    if raw.produto.trim().is_empty() {
        return Err("Missing product name.".to_string());
    }
    let quantity = u32::try_from(raw.quantidade)
        .map_err(|_| format!("Invalid quantity {} (must be a non-negative integer).", raw.quantidade))?;

    Ok(SaleRecord {
        id: raw.id,
        date,
        product: raw.produto,
        quantity,
        value: raw.valor,
    })
}

/// Accept a plain ISO date or an ISO timestamp (the time part is dropped).
pub fn parse_sale_date(raw: &str) -> Result<NaiveDate, String> {
    let trimmed = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }

    const DATETIME_FMTS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];
    for fmt in DATETIME_FMTS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Ok(ts.date());
        }
    }

    Err(format!(
        "Invalid date '{raw}'. Expected YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS."
    ))
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn decodes_success_envelope() {
        let body = r#"{
            "status": "sucesso",
            "dados": [
                {"id": 1, "data": "2024-01-05", "produto": "Notebook Pro", "quantidade": 1, "valor": 4523.17},
                {"id": 2, "data": "2024-01-01", "produto": "SSD 1TB", "quantidade": 2, "valor": 1040}
            ]
        }"#;

        let decoded = decode_envelope(body).unwrap();
        assert!(decoded.row_errors.is_empty());
        assert_eq!(decoded.records.len(), 2);
        assert_eq!(decoded.records[0].id, Some(1));
        assert_eq!(decoded.records[0].value, Money::from_str("4523.17").unwrap());
        assert_eq!(decoded.records[1].value, Money::from_str("1040").unwrap());
        assert_eq!(decoded.records[1].quantity, 2);
    }

    #[test]
    fn failure_status_surfaces_message() {
        let body = r#"{"status": "erro", "mensagem": "Banco indisponível"}"#;
        assert_eq!(
            decode_envelope(body).unwrap_err(),
            LoadError::Backend("Banco indisponível".to_string())
        );
    }

    #[test]
    fn failure_status_without_message_uses_default() {
        let body = r#"{"status": "erro"}"#;
        assert_eq!(
            decode_envelope(body).unwrap_err(),
            LoadError::Backend(DEFAULT_BACKEND_MESSAGE.to_string())
        );
    }

    #[test]
    fn garbage_body_is_a_transport_error() {
        let err = decode_envelope("<html>502 Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, LoadError::Transport(_)));
    }

    #[test]
    fn bad_rows_are_collected_not_fatal() {
        let body = r#"{
            "status": "sucesso",
            "dados": [
                {"id": 10, "data": "not a date", "produto": "A", "quantidade": 1, "valor": 1.0},
                {"id": 11, "data": "2024-01-02", "produto": "A", "quantidade": -3, "valor": 1.0},
                {"id": 12, "data": "2024-01-03T10:30:00", "produto": "A", "quantidade": 1, "valor": 2.5},
                {"id": 13, "data": "2024-01-04", "produto": "  ", "quantidade": 1, "valor": 2.5}
            ]
        }"#;

        let decoded = decode_envelope(body).unwrap();
        assert_eq!(decoded.records.len(), 1);
        assert_eq!(decoded.records[0].date, NaiveDate::from_ymd_opt(2024, 1, 3).unwrap());

        let rejected: Vec<(usize, Option<i64>)> =
            decoded.row_errors.iter().map(|e| (e.index, e.id)).collect();
        assert_eq!(rejected, vec![(0, Some(10)), (1, Some(11)), (3, Some(13))]);
    }

    #[test]
    fn success_envelope_round_trips_records() {
        let records = vec![SaleRecord {
            id: Some(3),
            date: NaiveDate::from_ymd_opt(2023, 11, 24).unwrap(),
            product: "Headset Gamer".to_string(),
            quantity: 2,
            value: Money::from_str("689.90").unwrap(),
        }];
        let body = serde_json::to_string(&Envelope::success(&records)).unwrap();
        assert_eq!(decode_envelope(&body).unwrap().records, records);
    }
}
