// src/services/billing_service.rs

use std::{collections::HashMap, sync::Arc, time::Duration};

use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    common::{currency::format_brl, error::AppError},
    db::{CoachRepository, StudentRepository},
    models::{
        billing::{OutgoingEmail, ReminderReport},
        coach::PlanTier,
        student::StudentFeeRecord,
    },
    payments::aggregator::overdue_records,
};

/// Intervalo mínimo entre dois lembretes para o mesmo aluno.
pub const REMINDER_COOLDOWN_DAYS: i64 = 7;

const RESEND_ENDPOINT: &str = "https://api.resend.com/emails";

// =============================================================================
//  PROVEDOR DE E-MAIL
// =============================================================================

/// Envio de e-mail. Retorna o id atribuído pelo provedor.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<String, AppError>;
}

/// Cliente da API HTTP do Resend.
pub struct ResendMailer {
    client: reqwest::Client,
    api_key: String,
    from: String,
}

#[derive(Serialize)]
struct ResendRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

#[derive(Deserialize)]
struct ResendResponse {
    id: String,
}

impl ResendMailer {
    pub fn new(api_key: String, from: String) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .context("Falha ao criar o cliente HTTP do Resend")?;

        Ok(Self { client, api_key, from })
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<String, AppError> {
        let body = ResendRequest {
            from: &self.from,
            to: [&email.to],
            subject: &email.subject,
            html: &email.html,
        };

        let response = self
            .client
            .post(RESEND_ENDPOINT)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::MailerError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::MailerError(format!("Resend {status}: {error_text}")));
        }

        let parsed: ResendResponse = response
            .json()
            .await
            .map_err(|e| AppError::MailerError(format!("Resposta inesperada do Resend: {e}")))?;

        Ok(parsed.id)
    }
}

// =============================================================================
//  MENSAGEM
// =============================================================================

fn escape_html(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Monta o lembrete de mensalidade vencida. Treinadores Premium têm a versão personalizada.
pub fn compose_reminder(student: &StudentFeeRecord, plan_tier: Option<PlanTier>) -> OutgoingEmail {
    let guardian = escape_html(student.guardian_name.as_deref().unwrap_or("responsável"));
    let student_name = escape_html(&student.student_name);

    let message = if plan_tier == Some(PlanTier::Premium) {
        format!("[Mensagem Premium] Olá {guardian}, (Assunto: {student_name}) - Mensalidade vencida.")
    } else {
        format!(
            "Olá {guardian}, notamos que a mensalidade de {student_name} está vencida. Por favor, regularize a situação."
        )
    };

    let amount = format_brl(student.fee_amount.unwrap_or(Decimal::ZERO));

    OutgoingEmail {
        to: student.guardian_email.clone(),
        subject: format!("Dribla - Cobrança Pendente: {}", student.student_name),
        html: format!("<p>{message}</p><p>Valor: {amount}</p>"),
    }
}

/// Envia um lembrete por aluno. Falhas individuais são contadas e a rodada continua.
pub async fn send_reminders(
    mailer: &dyn Mailer,
    students: &[&StudentFeeRecord],
    plans: &HashMap<Uuid, PlanTier>,
) -> ReminderReport {
    let mut report = ReminderReport::default();

    for student in students {
        let email = compose_reminder(student, plans.get(&student.owner_id).copied());

        match mailer.send(&email).await {
            Ok(message_id) => {
                tracing::info!(student_id = student.id, %message_id, "Lembrete de cobrança enviado");
                report.sent += 1;
                report.processed_ids.push(student.id);
            }
            Err(e) => {
                tracing::warn!(student_id = student.id, error = %e, "Falha ao enviar lembrete de cobrança");
                report.failed += 1;
            }
        }
    }

    report
}

// =============================================================================
//  SERVIÇO
// =============================================================================

#[derive(Clone)]
pub struct BillingService {
    student_repo: StudentRepository,
    coach_repo: CoachRepository,
    mailer: Option<Arc<dyn Mailer>>,
}

impl BillingService {
    pub fn new(
        student_repo: StudentRepository,
        coach_repo: CoachRepository,
        mailer: Option<Arc<dyn Mailer>>,
    ) -> Self {
        Self { student_repo, coach_repo, mailer }
    }

    /// Uma rodada do agendador: cobra todos os atrasados ainda não lembrados na última semana.
    pub async fn run_reminders(&self, today: NaiveDate, now: DateTime<Utc>) -> Result<ReminderReport, AppError> {
        let mailer = self.mailer.as_deref().ok_or(AppError::MailerNotConfigured)?;

        let cutoff = now - chrono::Duration::days(REMINDER_COOLDOWN_DAYS);
        let candidates = self.student_repo.list_reminder_candidates(today, cutoff).await?;
        let overdue = overdue_records(&candidates, today);

        if overdue.is_empty() {
            tracing::info!("Nenhum aluno para cobrar hoje");
            return Ok(ReminderReport::default());
        }

        let mut owner_ids: Vec<Uuid> = overdue.iter().map(|s| s.owner_id).collect();
        owner_ids.sort_unstable();
        owner_ids.dedup();
        let plans: HashMap<Uuid, PlanTier> = self.coach_repo.find_plans(&owner_ids).await?.into_iter().collect();

        let report = send_reminders(mailer, &overdue, &plans).await;

        for student_id in &report.processed_ids {
            // O e-mail já saiu; um erro aqui só significa que ele pode ser reenviado
            if let Err(e) = self.student_repo.mark_reminded(*student_id, now).await {
                tracing::error!(student_id, error = ?e, "Falha ao registrar envio do lembrete");
            }
        }

        tracing::info!(sent = report.sent, failed = report.failed, "Rodada de cobranças finalizada");

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::student::PaymentStatus;
    use crate::test_utils::{date, record};
    use std::sync::Mutex;

    /// Guarda as mensagens e recusa os destinatários listados.
    #[derive(Default)]
    struct RecordingMailer {
        sent: Mutex<Vec<OutgoingEmail>>,
        reject: Vec<String>,
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send(&self, email: &OutgoingEmail) -> Result<String, AppError> {
            if self.reject.contains(&email.to) {
                return Err(AppError::MailerError("domínio não verificado".into()));
            }
            let mut sent = self.sent.lock().unwrap();
            sent.push(email.clone());
            Ok(format!("msg-{}", sent.len()))
        }
    }

    #[test]
    fn standard_reminder_body() {
        let mut student = record(7, "Enzo", PaymentStatus::Pending, Some(date(2024, 6, 1)), Some(1250));
        student.guardian_name = Some("Carlos".into());

        let email = compose_reminder(&student, Some(PlanTier::Vip));
        assert_eq!(email.to, "responsavel7@email.com");
        assert_eq!(email.subject, "Dribla - Cobrança Pendente: Enzo");
        assert!(email.html.contains("Olá Carlos, notamos que a mensalidade de Enzo está vencida."));
        assert!(email.html.contains("Valor: R$ 1.250,00"));
    }

    #[test]
    fn premium_reminder_body() {
        let student = record(7, "Enzo", PaymentStatus::Pending, Some(date(2024, 6, 1)), None);

        let email = compose_reminder(&student, Some(PlanTier::Premium));
        assert!(email.html.starts_with("<p>[Mensagem Premium]"));
        assert!(email.html.contains("Valor: R$ 0,00"));
    }

    #[test]
    fn names_are_escaped() {
        let mut student = record(1, "<b>Ana</b>", PaymentStatus::Pending, Some(date(2024, 6, 1)), Some(10));
        student.guardian_name = None;

        let email = compose_reminder(&student, None);
        assert!(email.html.contains("&lt;b&gt;Ana&lt;/b&gt;"));
        assert!(email.html.contains("Olá responsável"));
    }

    #[tokio::test]
    async fn failures_do_not_stop_the_batch() {
        let students = [
            record(1, "A", PaymentStatus::Pending, Some(date(2024, 6, 1)), Some(100)),
            record(2, "B", PaymentStatus::Pending, Some(date(2024, 6, 2)), Some(100)),
            record(3, "C", PaymentStatus::Pending, Some(date(2024, 6, 3)), Some(100)),
        ];
        let refs: Vec<&StudentFeeRecord> = students.iter().collect();

        let mailer = RecordingMailer {
            reject: vec!["responsavel2@email.com".to_string()],
            ..Default::default()
        };

        let report = send_reminders(&mailer, &refs, &HashMap::new()).await;

        assert_eq!(report.sent, 2);
        assert_eq!(report.failed, 1);
        assert_eq!(report.processed_ids, vec![1, 3]);
        assert_eq!(mailer.sent.lock().unwrap().len(), 2);
    }
}
