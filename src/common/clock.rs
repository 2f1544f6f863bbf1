use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;

/// Fonte do "hoje". Os serviços recebem a data pronta; ninguém lê o relógio por conta própria.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Relógio do sistema, convertido para o fuso da academia.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    timezone: Tz,
}

impl SystemClock {
    pub fn new(timezone: Tz) -> Self {
        Self { timezone }
    }
}

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.timezone).date_naive()
    }
}

/// Data fixa, para testes.
#[cfg(test)]
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

#[cfg(test)]
impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
