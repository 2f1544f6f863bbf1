//! Classificação da mensalidade de um aluno para o painel.
//!
//! A situação exibida ("derivada") nunca é gravada: ela depende de `today`,
//! que é sempre recebido como parâmetro para que o resultado seja determinístico.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::student::{PaymentStatus, StudentFeeRecord};

/// Quantos dias à frente um vencimento ainda conta como "vence em breve".
pub const DUE_SOON_WINDOW_DAYS: u64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DerivedStatus {
    Paid,
    Overdue,
    DueSoon,
}

impl DerivedStatus {
    /// Posição na listagem: atrasados primeiro, depois próximos, depois pagos.
    pub fn display_rank(self) -> u8 {
        match self {
            DerivedStatus::Overdue => 0,
            DerivedStatus::DueSoon => 1,
            DerivedStatus::Paid => 2,
        }
    }
}

/// Intervalo fechado `[today, today + 5 dias]` usado tanto aqui quanto nas consultas de contagem.
pub fn due_soon_window(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let end = today
        .checked_add_days(Days::new(DUE_SOON_WINDOW_DAYS))
        .unwrap_or(NaiveDate::MAX);
    (today, end)
}

/// Versão total da classificação, para quando o vencimento já é conhecido.
pub fn classify_due_date(
    payment_status: PaymentStatus,
    due_date: NaiveDate,
    today: NaiveDate,
) -> DerivedStatus {
    if payment_status == PaymentStatus::Paid {
        return DerivedStatus::Paid;
    }

    let (window_start, window_end) = due_soon_window(today);

    if due_date < window_start {
        DerivedStatus::Overdue
    } else if due_date <= window_end {
        DerivedStatus::DueSoon
    } else {
        // Pendente mas ainda longe do vencimento: agrupado com os pagos
        DerivedStatus::Paid
    }
}

/// Classifica um registro. `None` quando o registro não tem vencimento utilizável.
pub fn classify(record: &StudentFeeRecord, today: NaiveDate) -> Option<DerivedStatus> {
    record
        .due_date
        .map(|due_date| classify_due_date(record.payment_status, due_date, today))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn today() -> NaiveDate {
        date(2024, 6, 10)
    }

    #[test]
    fn paid_is_paid_even_far_in_the_past() {
        for due in [date(2020, 1, 1), date(2024, 6, 9), today(), date(2024, 6, 12), date(2030, 1, 1)] {
            assert_eq!(
                classify_due_date(PaymentStatus::Paid, due, today()),
                DerivedStatus::Paid,
                "due {due}"
            );
        }
    }

    #[test]
    fn pending_in_the_past_is_overdue() {
        assert_eq!(
            classify_due_date(PaymentStatus::Pending, date(2024, 6, 9), today()),
            DerivedStatus::Overdue
        );
        assert_eq!(
            classify_due_date(PaymentStatus::Pending, date(2023, 12, 31), today()),
            DerivedStatus::Overdue
        );
    }

    #[test]
    fn window_is_inclusive_on_both_ends() {
        assert_eq!(
            classify_due_date(PaymentStatus::Pending, today(), today()),
            DerivedStatus::DueSoon
        );
        assert_eq!(
            classify_due_date(PaymentStatus::Pending, date(2024, 6, 15), today()),
            DerivedStatus::DueSoon
        );
    }

    #[test]
    fn pending_beyond_window_falls_into_paid_bucket() {
        assert_eq!(
            classify_due_date(PaymentStatus::Pending, date(2024, 6, 16), today()),
            DerivedStatus::Paid
        );
        assert_eq!(
            classify_due_date(PaymentStatus::Pending, date(2024, 9, 1), today()),
            DerivedStatus::Paid
        );
    }

    #[test]
    fn window_crosses_month_boundary() {
        let today = date(2024, 2, 27);
        assert_eq!(due_soon_window(today), (today, date(2024, 3, 3)));
        assert_eq!(
            classify_due_date(PaymentStatus::Pending, date(2024, 3, 3), today),
            DerivedStatus::DueSoon
        );
        assert_eq!(
            classify_due_date(PaymentStatus::Pending, date(2024, 3, 4), today),
            DerivedStatus::Paid
        );
    }

    #[test]
    fn deterministic_for_same_inputs() {
        let first = classify_due_date(PaymentStatus::Pending, date(2024, 6, 12), today());
        let second = classify_due_date(PaymentStatus::Pending, date(2024, 6, 12), today());
        assert_eq!(first, second);
    }

    #[test]
    fn rank_orders_overdue_first() {
        let mut statuses = vec![DerivedStatus::Paid, DerivedStatus::DueSoon, DerivedStatus::Overdue];
        statuses.sort_by_key(|s| s.display_rank());
        assert_eq!(
            statuses,
            vec![DerivedStatus::Overdue, DerivedStatus::DueSoon, DerivedStatus::Paid]
        );
    }

    #[test]
    fn wire_names_match_filter_vocabulary() {
        assert_eq!(serde_json::to_string(&DerivedStatus::DueSoon).unwrap(), "\"due_soon\"");
        assert_eq!(serde_json::to_string(&DerivedStatus::Overdue).unwrap(), "\"overdue\"");
    }
}
