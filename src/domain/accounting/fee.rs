//! Monthly membership dues.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{
    DomainError, ErrorCode, FeeId, Money, StateMachine, Timestamp, UserId, ValidationError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeeStatus {
    Pending,
    Paid,
    Overdue,
    Waived,
}

impl StateMachine for FeeStatus {
    fn valid_transitions(&self) -> Vec<Self> {
        use FeeStatus::*;
        match self {
            Pending => vec![Paid, Overdue, Waived],
            Overdue => vec![Paid, Waived],
            Paid | Waived => vec![],
        }
    }
}

impl std::str::FromStr for FeeStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(FeeStatus::Pending),
            "paid" => Ok(FeeStatus::Paid),
            "overdue" => Ok(FeeStatus::Overdue),
            "waived" => Ok(FeeStatus::Waived),
            other => Err(DomainError::validation(
                "status",
                format!("Unknown fee status: {}", other),
            )),
        }
    }
}

/// A billing month. Together with the user it identifies a fee uniquely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FeePeriod {
    pub year: i32,
    pub month: u32,
}

impl FeePeriod {
    pub fn new(year: i32, month: u32) -> Result<Self, ValidationError> {
        if !(2000..=2100).contains(&year) {
            return Err(ValidationError::out_of_range("year", 2000, 2100, year as i64));
        }
        if !(1..=12).contains(&month) {
            return Err(ValidationError::out_of_range("month", 1, 12, month as i64));
        }
        Ok(Self { year, month })
    }
}

impl fmt::Display for FeePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipFee {
    pub id: FeeId,
    pub user_id: UserId,
    #[serde(flatten)]
    pub period: FeePeriod,
    pub amount: Money,
    pub amount_paid: Money,
    pub status: FeeStatus,
    pub paid_at: Option<Timestamp>,
    pub waived_reason: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl MembershipFee {
    pub fn new(user_id: UserId, period: FeePeriod, amount: Money) -> Result<Self, ValidationError> {
        if !amount.is_positive() {
            return Err(ValidationError::invalid_format("amount", "must be positive"));
        }
        let now = Timestamp::now();
        Ok(Self {
            id: FeeId::new(),
            user_id,
            period,
            amount,
            amount_paid: Money::ZERO,
            status: FeeStatus::Pending,
            paid_at: None,
            waived_reason: None,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn balance_due(&self) -> Money {
        self.amount.saturating_sub_floor_zero(self.amount_paid)
    }

    /// Accumulates a payment; the fee is paid once the full amount is covered.
    pub fn add_payment(&mut self, amount: Money, now: Timestamp) -> Result<(), DomainError> {
        if !amount.is_positive() {
            return Err(DomainError::validation("amount", "Payment must be positive"));
        }
        if !matches!(self.status, FeeStatus::Pending | FeeStatus::Overdue) {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!("Cannot record payments on a {:?} fee", self.status),
            ));
        }
        self.amount_paid = self.amount_paid.checked_add(amount)?;
        if self.balance_due() == Money::ZERO {
            self.transition(FeeStatus::Paid)?;
            self.paid_at = Some(now);
        }
        self.updated_at = now;
        Ok(())
    }

    pub fn waive(&mut self, reason: impl Into<String>) -> Result<(), DomainError> {
        self.transition(FeeStatus::Waived)?;
        self.waived_reason = Some(reason.into());
        Ok(())
    }

    pub fn mark_overdue(&mut self) -> Result<(), DomainError> {
        self.transition(FeeStatus::Overdue)
    }

    fn transition(&mut self, target: FeeStatus) -> Result<(), DomainError> {
        self.status = self
            .status
            .transition_to(target)
            .map_err(|e| DomainError::new(ErrorCode::InvalidStateTransition, e.to_string()))?;
        self.updated_at = Timestamp::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn fee() -> MembershipFee {
        MembershipFee::new(
            UserId::new(),
            FeePeriod::new(2024, 5).unwrap(),
            Money::from_cents(1500),
        )
        .unwrap()
    }

    #[test]
    fn partial_payments_accumulate_until_paid() {
        let mut fee = fee();
        fee.add_payment(Money::from_cents(1000), Timestamp::now()).unwrap();
        assert_eq!(fee.status, FeeStatus::Pending);
        assert_eq!(fee.balance_due(), Money::from_cents(500));

        fee.add_payment(Money::from_cents(500), Timestamp::now()).unwrap();
        assert_eq!(fee.status, FeeStatus::Paid);
        assert!(fee.paid_at.is_some());
    }

    #[test]
    fn waived_fee_rejects_payment() {
        let mut fee = fee();
        fee.waive("hardship").unwrap();
        assert_eq!(fee.waived_reason.as_deref(), Some("hardship"));
        assert!(fee.add_payment(Money::from_cents(100), Timestamp::now()).is_err());
    }

    #[test]
    fn overdue_fee_can_be_paid_or_waived() {
        let mut fee = fee();
        fee.mark_overdue().unwrap();
        assert!(FeeStatus::Overdue.can_transition_to(&FeeStatus::Waived));
        fee.add_payment(Money::from_cents(1500), Timestamp::now()).unwrap();
        assert_eq!(fee.status, FeeStatus::Paid);
        assert!(fee.waive("late").is_err());
    }

    #[test]
    fn period_displays_zero_padded() {
        assert_eq!(FeePeriod::new(2024, 3).unwrap().to_string(), "2024-03");
    }

    proptest! {
        #[test]
        fn period_accepts_only_calendar_months(month in 0u32..40) {
            let result = FeePeriod::new(2024, month);
            prop_assert_eq!(result.is_ok(), (1..=12).contains(&month));
        }
    }
}
