//! Ledger transactions recorded by admins.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    DomainError, ErrorCode, Money, StateMachine, Timestamp, TransactionId, UserId,
    ValidationError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Approved,
    Cancelled,
}

impl StateMachine for TransactionStatus {
    fn valid_transitions(&self) -> Vec<Self> {
        match self {
            TransactionStatus::Pending => {
                vec![TransactionStatus::Approved, TransactionStatus::Cancelled]
            }
            TransactionStatus::Approved | TransactionStatus::Cancelled => vec![],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: TransactionId,
    pub kind: TransactionKind,
    pub category: String,
    pub description: String,
    pub amount: Money,
    pub date: Timestamp,
    pub status: TransactionStatus,
    /// Member the movement relates to, if any.
    pub user_id: Option<UserId>,
    pub created_by: UserId,
    pub approved_by: Option<UserId>,
    pub cancel_reason: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Transaction {
    pub fn record(
        kind: TransactionKind,
        category: impl Into<String>,
        description: impl Into<String>,
        amount: Money,
        date: Timestamp,
        user_id: Option<UserId>,
        created_by: UserId,
    ) -> Result<Self, ValidationError> {
        if !amount.is_positive() {
            return Err(ValidationError::invalid_format("amount", "must be positive"));
        }
        let category = category.into();
        if category.trim().is_empty() {
            return Err(ValidationError::empty_field("category"));
        }
        let now = Timestamp::now();
        Ok(Self {
            id: TransactionId::new(),
            kind,
            category,
            description: description.into(),
            amount,
            date,
            status: TransactionStatus::Pending,
            user_id,
            created_by,
            approved_by: None,
            cancel_reason: None,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn approve(&mut self, approver: UserId) -> Result<(), DomainError> {
        self.transition(TransactionStatus::Approved)?;
        self.approved_by = Some(approver);
        Ok(())
    }

    pub fn cancel(&mut self, reason: Option<String>) -> Result<(), DomainError> {
        self.transition(TransactionStatus::Cancelled)?;
        self.cancel_reason = reason;
        Ok(())
    }

    /// Amount counted toward the balance: positive for income, negative for expense.
    pub fn signed_amount(&self) -> Money {
        match self.kind {
            TransactionKind::Income => self.amount,
            TransactionKind::Expense => Money::ZERO - self.amount,
        }
    }

    fn transition(&mut self, target: TransactionStatus) -> Result<(), DomainError> {
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

    fn expense() -> Transaction {
        Transaction::record(
            TransactionKind::Expense,
            "material",
            "Carteles",
            Money::from_cents(3000),
            Timestamp::now(),
            None,
            UserId::new(),
        )
        .unwrap()
    }

    #[test]
    fn approve_once() {
        let mut tx = expense();
        let admin = UserId::new();
        tx.approve(admin).unwrap();
        assert_eq!(tx.approved_by, Some(admin));
        assert!(tx.approve(admin).is_err());
        assert!(tx.cancel(None).is_err());
    }

    #[test]
    fn expense_counts_negative() {
        assert_eq!(expense().signed_amount(), Money::from_cents(-3000));
    }

    #[test]
    fn rejects_zero_amount() {
        let result = Transaction::record(
            TransactionKind::Income,
            "cuotas",
            "",
            Money::ZERO,
            Timestamp::now(),
            None,
            UserId::new(),
        );
        assert!(result.is_err());
    }
}
