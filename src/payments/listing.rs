//! Filtro e ordenação da lista de alunos (tela "Elenco").

use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::models::student::StudentFeeRecord;
use crate::payments::classifier::{DerivedStatus, classify};

/// Filtro aceito pela API: as três situações derivadas mais o curinga `all`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    #[default]
    All,
    Paid,
    Overdue,
    DueSoon,
}

impl StatusFilter {
    pub fn matches(self, status: Option<DerivedStatus>) -> bool {
        match (self, status) {
            (StatusFilter::All, _) => true,
            (StatusFilter::Paid, Some(DerivedStatus::Paid)) => true,
            (StatusFilter::Overdue, Some(DerivedStatus::Overdue)) => true,
            (StatusFilter::DueSoon, Some(DerivedStatus::DueSoon)) => true,
            _ => false,
        }
    }
}

/// Critério de desempate dentro de cada faixa.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    DueDate,
    StudentName,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(default)]
#[into_params(parameter_in = Query)]
pub struct ListingParams {
    /// all | paid | overdue | due_soon
    pub status: StatusFilter,
    /// due_date | student_name
    pub sort: SortKey,
}

/// Aluno com a situação calculada para o dia da consulta.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedStudent {
    #[serde(flatten)]
    pub record: StudentFeeRecord,
    /// `None` quando o registro não tem vencimento.
    pub derived_status: Option<DerivedStatus>,
}

fn compare(a: &ClassifiedStudent, b: &ClassifiedStudent, sort: SortKey) -> Ordering {
    // Sem situação vai para o fim
    let rank = |s: &ClassifiedStudent| s.derived_status.map_or(u8::MAX, DerivedStatus::display_rank);

    rank(a).cmp(&rank(b)).then_with(|| match sort {
        SortKey::DueDate => cmp_due_date(a.record.due_date, b.record.due_date),
        SortKey::StudentName => a
            .record
            .student_name
            .to_lowercase()
            .cmp(&b.record.student_name.to_lowercase()),
    })
}

fn cmp_due_date(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Classifica, filtra e ordena. A ordenação é estável.
pub fn build_listing(
    records: Vec<StudentFeeRecord>,
    today: NaiveDate,
    filter: StatusFilter,
    sort: SortKey,
) -> Vec<ClassifiedStudent> {
    let mut listing: Vec<ClassifiedStudent> = records
        .into_iter()
        .map(|record| {
            let derived_status = classify(&record, today);
            ClassifiedStudent {
                record,
                derived_status,
            }
        })
        .filter(|student| filter.matches(student.derived_status))
        .collect();

    listing.sort_by(|a, b| compare(a, b, sort));
    listing
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::student::PaymentStatus;
    use crate::test_utils::{date, record};

    fn today() -> NaiveDate {
        date(2024, 6, 10)
    }

    fn roster() -> Vec<StudentFeeRecord> {
        vec![
            record(1, "Pedro", PaymentStatus::Paid, Some(date(2024, 7, 1)), Some(100)),
            record(2, "bruna", PaymentStatus::Pending, Some(date(2024, 6, 13)), Some(100)),
            record(3, "Caio", PaymentStatus::Pending, Some(date(2024, 6, 1)), Some(100)),
            record(4, "Ana", PaymentStatus::Pending, Some(date(2024, 6, 11)), Some(100)),
            record(5, "Davi", PaymentStatus::Pending, None, Some(100)),
            record(6, "Lia", PaymentStatus::Pending, Some(date(2024, 5, 20)), Some(100)),
        ]
    }

    fn ids(listing: &[ClassifiedStudent]) -> Vec<i64> {
        listing.iter().map(|s| s.record.id).collect()
    }

    #[test]
    fn all_orders_by_status_then_due_date() {
        let listing = build_listing(roster(), today(), StatusFilter::All, SortKey::DueDate);
        // atrasados (Lia, Caio), próximos (Ana, bruna), pagos (Pedro), sem data (Davi)
        assert_eq!(ids(&listing), vec![6, 3, 4, 2, 1, 5]);
        assert_eq!(listing.last().unwrap().derived_status, None);
    }

    #[test]
    fn name_is_an_alternative_tie_break() {
        let listing = build_listing(roster(), today(), StatusFilter::All, SortKey::StudentName);
        assert_eq!(ids(&listing), vec![3, 6, 4, 2, 1, 5]);
    }

    #[test]
    fn filter_keeps_only_the_requested_bucket() {
        let overdue = build_listing(roster(), today(), StatusFilter::Overdue, SortKey::DueDate);
        assert_eq!(ids(&overdue), vec![6, 3]);

        let due_soon = build_listing(roster(), today(), StatusFilter::DueSoon, SortKey::DueDate);
        assert_eq!(ids(&due_soon), vec![4, 2]);

        let paid = build_listing(roster(), today(), StatusFilter::Paid, SortKey::DueDate);
        assert_eq!(ids(&paid), vec![1]);
    }

    #[test]
    fn sort_is_stable_for_equal_keys() {
        let records = vec![
            record(10, "X", PaymentStatus::Pending, Some(date(2024, 6, 1)), None),
            record(11, "Y", PaymentStatus::Pending, Some(date(2024, 6, 1)), None),
            record(12, "Z", PaymentStatus::Pending, Some(date(2024, 6, 1)), None),
        ];
        let listing = build_listing(records, today(), StatusFilter::All, SortKey::DueDate);
        assert_eq!(ids(&listing), vec![10, 11, 12]);
    }

    #[test]
    fn query_params_default_to_all_by_due_date() {
        let params: ListingParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params.status, StatusFilter::All);
        assert_eq!(params.sort, SortKey::DueDate);
    }

    #[test]
    fn query_params_use_api_vocabulary() {
        let params: ListingParams =
            serde_json::from_str(r#"{"status": "due_soon", "sort": "student_name"}"#).unwrap();
        assert_eq!(params.status, StatusFilter::DueSoon);
        assert_eq!(params.sort, SortKey::StudentName);

        assert!(serde_json::from_str::<ListingParams>(r#"{"status": "vencida"}"#).is_err());
    }
}
