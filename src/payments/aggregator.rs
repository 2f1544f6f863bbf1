//! Totais do painel (cards de atrasados, próximos e em dia).
//!
//! Existem dois modos de alimentar o resumo:
//! * linhas completas, classificadas aqui mesmo ([`SummaryBuilder::add_record`]);
//! * contagens prontas por faixa, quando a consulta só trouxe o `COUNT`
//!   ([`SummaryBuilder::add_bucket_count`]).

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::student::StudentFeeRecord;
use crate::payments::classifier::{DerivedStatus, classify};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum WarningReason {
    MissingDueDate,
}

/// Registro que ficou de fora das faixas. Não interrompe o painel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordWarning {
    pub student_id: i64,
    pub student_name: String,
    pub reason: WarningReason,
}

impl RecordWarning {
    pub fn missing_due_date(record: &StudentFeeRecord) -> Self {
        Self {
            student_id: record.id,
            student_name: record.student_name.clone(),
            reason: WarningReason::MissingDueDate,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSummary {
    pub overdue_count: u64,
    /// Soma bruta (sem formatação) das mensalidades atrasadas; nulo conta como zero.
    #[schema(example = "350.00")]
    pub overdue_amount_total: Decimal,
    pub due_soon_count: u64,
    /// Inclui os pendentes que ainda não entraram na janela de vencimento.
    pub paid_count: u64,
    pub total_count: u64,
    pub warnings: Vec<RecordWarning>,
}

#[cfg(test)]
impl PaymentSummary {
    pub fn classified_count(&self) -> u64 {
        self.overdue_count + self.due_soon_count + self.paid_count
    }
}

/// Acumulador do resumo. Cada faixa pode vir de linhas ou de uma contagem.
#[derive(Debug, Clone)]
pub struct SummaryBuilder {
    today: NaiveDate,
    overdue_count: u64,
    overdue_amount_total: Decimal,
    due_soon_count: u64,
    paid_count: u64,
    seen_records: u64,
    total_override: Option<u64>,
    warnings: Vec<RecordWarning>,
}

impl SummaryBuilder {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            overdue_count: 0,
            overdue_amount_total: Decimal::ZERO,
            due_soon_count: 0,
            paid_count: 0,
            seen_records: 0,
            total_override: None,
            warnings: Vec::new(),
        }
    }

    /// Classifica e contabiliza um registro completo.
    pub fn add_record(&mut self, record: &StudentFeeRecord) -> &mut Self {
        self.seen_records += 1;

        match classify(record, self.today) {
            Some(DerivedStatus::Overdue) => {
                self.overdue_count += 1;
                self.overdue_amount_total += record.fee_amount.unwrap_or(Decimal::ZERO);
            }
            Some(DerivedStatus::DueSoon) => self.due_soon_count += 1,
            Some(DerivedStatus::Paid) => self.paid_count += 1,
            None => self.warnings.push(RecordWarning::missing_due_date(record)),
        }

        self
    }

    pub fn add_records<'a, I>(&mut self, records: I) -> &mut Self
    where
        I: IntoIterator<Item = &'a StudentFeeRecord>,
    {
        for record in records {
            self.add_record(record);
        }
        self
    }

    /// Modo só-contagem: soma `count` à faixa sem conhecer as linhas.
    /// Para `Overdue` o valor total não muda, pois não há valores para somar.
    pub fn add_bucket_count(&mut self, status: DerivedStatus, count: u64) -> &mut Self {
        match status {
            DerivedStatus::Overdue => self.overdue_count += count,
            DerivedStatus::DueSoon => self.due_soon_count += count,
            DerivedStatus::Paid => self.paid_count += count,
        }
        self
    }

    /// Total informado pela contagem exata do banco. Sem isso, vale o número de linhas vistas.
    pub fn with_total_count(&mut self, total: u64) -> &mut Self {
        self.total_override = Some(total);
        self
    }

    pub fn build(&self) -> PaymentSummary {
        PaymentSummary {
            overdue_count: self.overdue_count,
            overdue_amount_total: self.overdue_amount_total,
            due_soon_count: self.due_soon_count,
            paid_count: self.paid_count,
            total_count: self.total_override.unwrap_or(self.seen_records),
            warnings: self.warnings.clone(),
        }
    }
}

/// Resumo a partir das linhas completas. O painel usa o modo por contagem
/// (ver `DashboardService`); esta versão serve de referência nos testes.
#[cfg(test)]
pub fn aggregate(records: &[StudentFeeRecord], today: NaiveDate) -> PaymentSummary {
    SummaryBuilder::new(today).add_records(records).build()
}

/// Apenas os atrasados, na ordem recebida. É o que o envio de cobranças consome.
pub fn overdue_records(records: &[StudentFeeRecord], today: NaiveDate) -> Vec<&StudentFeeRecord> {
    records
        .iter()
        .filter(|record| classify(record, today) == Some(DerivedStatus::Overdue))
        .collect()
}
