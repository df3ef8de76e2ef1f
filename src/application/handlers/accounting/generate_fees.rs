//! GenerateFeesHandler - creates one fee per active member for a period.
//!
//! Members that already have a fee for the period are skipped, so running
//! the batch twice is harmless.

use std::sync::Arc;

use serde::Serialize;

use crate::application::ApplicationError;
use crate::domain::accounting::{FeePeriod, MembershipFee};
use crate::domain::foundation::{DomainError, ErrorCode, Money};
use crate::ports::{MembershipFeeRepository, UserRepository};

#[derive(Debug, Clone)]
pub struct GenerateFeesCommand {
    pub year: i32,
    pub month: u32,
    pub amount: Money,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenerateFeesResult {
    pub created: u32,
    pub skipped: u32,
}

pub struct GenerateFeesHandler {
    users: Arc<dyn UserRepository>,
    fees: Arc<dyn MembershipFeeRepository>,
}

impl GenerateFeesHandler {
    pub fn new(users: Arc<dyn UserRepository>, fees: Arc<dyn MembershipFeeRepository>) -> Self {
        Self { users, fees }
    }

    pub async fn handle(&self, cmd: GenerateFeesCommand) -> Result<GenerateFeesResult, ApplicationError> {
        let period = FeePeriod::new(cmd.year, cmd.month).map_err(DomainError::from)?;
        let members = self.users.list_active().await?;
        let mut result = GenerateFeesResult::default();

        for member in members {
            if self.fees.find_for_period(&member.id, period).await?.is_some() {
                result.skipped += 1;
                continue;
            }
            let fee = MembershipFee::new(member.id, period, cmd.amount).map_err(DomainError::from)?;
            match self.fees.create(&fee).await {
                Ok(()) => result.created += 1,
                // Another run created it between the lookup and the insert.
                Err(e) if e.code == ErrorCode::DuplicateFee => result.skipped += 1,
                Err(e) => return Err(e.into()),
            }
        }

        tracing::info!(
            period = %period,
            created = result.created,
            skipped = result.skipped,
            "Membership fees generated"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::Fixture;
    use crate::domain::user::AccountStatus;
    use crate::ports::FeeFilter;

    fn command() -> GenerateFeesCommand {
        GenerateFeesCommand {
            year: 2024,
            month: 3,
            amount: Money::from_cents(1500),
        }
    }

    #[tokio::test]
    async fn second_run_skips_existing_fees() {
        let fx = Fixture::new();
        fx.member("ana@example.com").await;
        fx.member("luis@example.com").await;
        let handler = GenerateFeesHandler::new(fx.users.clone(), fx.fees.clone());

        let first = handler.handle(command()).await.unwrap();
        let second = handler.handle(command()).await.unwrap();

        assert_eq!(first, GenerateFeesResult { created: 2, skipped: 0 });
        assert_eq!(second, GenerateFeesResult { created: 0, skipped: 2 });
        assert_eq!(fx.fees.list(&FeeFilter::default()).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn inactive_accounts_are_not_billed() {
        let fx = Fixture::new();
        let mut user = fx.member("ana@example.com").await;
        user.change_status(AccountStatus::Inactive).unwrap();
        fx.users.update(&user).await.unwrap();

        let result = GenerateFeesHandler::new(fx.users.clone(), fx.fees.clone())
            .handle(command())
            .await
            .unwrap();
        assert_eq!(result.created, 0);
    }

    #[tokio::test]
    async fn invalid_month_is_rejected() {
        let fx = Fixture::new();
        let err = GenerateFeesHandler::new(fx.users.clone(), fx.fees.clone())
            .handle(GenerateFeesCommand {
                month: 13,
                ..command()
            })
            .await
            .unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::ValidationFailed));
    }
}
