// src/models/student.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

// --- Enums (Mapeando o Postgres) ---

/// Situação gravada no banco. É a "verdade" que só muda por edição explícita.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "payment_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Paid, // Pago
    #[default]
    Pending, // Pendente
}

// --- Structs ---

/// Um aluno matriculado e o estado da sua mensalidade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentFeeRecord {
    #[schema(example = 42)]
    pub id: i64,

    #[schema(ignore)]
    pub owner_id: Uuid,

    #[schema(example = "Enzo Gabriel")]
    pub student_name: String,

    #[schema(example = "Carlos Souza")]
    pub guardian_name: Option<String>,

    #[schema(example = "carlos@email.com")]
    pub guardian_email: String,

    #[schema(value_type = String, format = Date, example = "2024-02-01")]
    pub enrollment_date: NaiveDate,

    #[schema(example = "150.00")]
    pub fee_amount: Option<Decimal>,

    // Linhas legadas podem não ter vencimento
    #[schema(value_type = Option<String>, format = Date, example = "2024-06-10")]
    pub due_date: Option<NaiveDate>,

    pub payment_status: PaymentStatus,

    pub last_reminder_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
}

// --- Payloads ---

fn default_fee_amount() -> Decimal {
    Decimal::new(100, 0)
}

fn validate_fee_amount(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        let mut err = ValidationError::new("negative_amount");
        err.message = Some("O valor da mensalidade não pode ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

fn validate_due_date(value: &str) -> Result<(), ValidationError> {
    if parse_due_date(value).is_none() {
        let mut err = ValidationError::new("invalid_date_format");
        err.message = Some("Data de vencimento inválida (use AAAA-MM-DD).".into());
        return Err(err);
    }
    Ok(())
}

/// Converte a data de vencimento recebida do cliente.
///
/// Aceita `AAAA-MM-DD` ou um timestamp RFC 3339 (o front antigo mandava meia-noite UTC);
/// em ambos os casos vale a data do calendário escrita, sem conversão de fuso.
pub fn parse_due_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|ts| ts.date_naive())
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateStudentPayload {
    #[validate(length(min = 1, message = "O nome do aluno é obrigatório."))]
    #[schema(example = "Enzo Gabriel")]
    pub student_name: String,

    #[schema(example = "Carlos Souza")]
    pub guardian_name: Option<String>,

    #[validate(email(message = "O e-mail do responsável é inválido."))]
    #[schema(example = "carlos@email.com")]
    pub guardian_email: String,

    #[serde(default = "default_fee_amount")]
    #[validate(custom(function = "validate_fee_amount"))]
    #[schema(example = "100.00")]
    pub fee_amount: Decimal,

    // Se ausente, vence em 30 dias
    #[validate(custom(function = "validate_due_date"))]
    #[schema(example = "2024-07-10")]
    pub due_date: Option<String>,

    #[serde(default)]
    pub payment_status: PaymentStatus,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStudentPayload {
    #[validate(length(min = 1, message = "O nome do aluno é obrigatório."))]
    pub student_name: String,

    pub guardian_name: Option<String>,

    #[validate(email(message = "O e-mail do responsável é inválido."))]
    pub guardian_email: String,

    #[validate(custom(function = "validate_fee_amount"))]
    pub fee_amount: Decimal,

    #[validate(custom(function = "validate_due_date"))]
    #[schema(example = "2024-07-10")]
    pub due_date: String,

    pub payment_status: PaymentStatus,
}

/// Campos já normalizados, prontos para gravar.
#[derive(Debug, Clone)]
pub struct StudentChanges {
    pub student_name: String,
    pub guardian_name: Option<String>,
    pub guardian_email: String,
    pub fee_amount: Decimal,
    pub due_date: NaiveDate,
    pub payment_status: PaymentStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_dates() {
        assert_eq!(
            parse_due_date("2024-06-10"),
            NaiveDate::from_ymd_opt(2024, 6, 10)
        );
    }

    #[test]
    fn parses_midnight_utc_timestamps() {
        assert_eq!(
            parse_due_date("2024-06-10T00:00:00.000Z"),
            NaiveDate::from_ymd_opt(2024, 6, 10)
        );
        assert_eq!(
            parse_due_date("2024-06-10T00:00:00+00:00"),
            NaiveDate::from_ymd_opt(2024, 6, 10)
        );
    }

    #[test]
    fn keeps_written_date_for_offset_timestamps() {
        assert_eq!(
            parse_due_date("2024-06-10T00:00:00+03:00"),
            NaiveDate::from_ymd_opt(2024, 6, 10)
        );
        assert_eq!(
            parse_due_date("2024-06-10T23:30:00-03:00"),
            NaiveDate::from_ymd_opt(2024, 6, 10)
        );
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_due_date("10/06/2024"), None);
        assert_eq!(parse_due_date(""), None);
        assert_eq!(parse_due_date("2024-02-30"), None);
    }

    #[test]
    fn create_payload_defaults() {
        let payload: CreateStudentPayload = serde_json::from_str(
            r#"{"studentName": "Ana", "guardianEmail": "mae@email.com"}"#,
        )
        .unwrap();

        assert_eq!(payload.fee_amount, Decimal::new(100, 0));
        assert_eq!(payload.payment_status, PaymentStatus::Pending);
        assert!(payload.due_date.is_none());
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn create_payload_rejects_negative_fee_and_bad_email() {
        let payload: CreateStudentPayload = serde_json::from_str(
            r#"{"studentName": "Ana", "guardianEmail": "nao-e-email", "feeAmount": -5, "dueDate": "amanhã"}"#,
        )
        .unwrap();

        let errors = payload.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("guardian_email"));
        assert!(fields.contains_key("fee_amount"));
        assert!(fields.contains_key("due_date"));
    }

    #[test]
    fn payment_status_wire_names() {
        assert_eq!(serde_json::to_string(&PaymentStatus::Paid).unwrap(), "\"paid\"");
        let status: PaymentStatus = serde_json::from_str("\"pending\"").unwrap();
        assert_eq!(status, PaymentStatus::Pending);
    }
}
