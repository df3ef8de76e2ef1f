//! Membership metadata carried on each user record.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{StateMachine, Timestamp};

/// Length of one paid membership period.
pub const MEMBERSHIP_PERIOD_DAYS: i64 = 365;

/// Lifecycle of a user's union membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MembershipStatus {
    /// Registered but never paid.
    #[default]
    None,
    /// Paid and within the current period.
    Active,
    /// The last paid period has ended.
    Expired,
}

impl StateMachine for MembershipStatus {
    fn valid_transitions(&self) -> Vec<Self> {
        use MembershipStatus::*;
        match self {
            None => vec![Active],
            Active => vec![Active, Expired],
            Expired => vec![Active],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct MembershipInfo {
    pub status: MembershipStatus,
    pub start_date: Option<Timestamp>,
    pub expiry_date: Option<Timestamp>,
}

impl MembershipInfo {
    /// Starts a new period, or extends the current one if it has not ended yet.
    pub fn activate_or_extend(&mut self, now: Timestamp) {
        let base = match self.expiry_date {
            Some(expiry) if self.is_active_at(now) => expiry,
            _ => {
                self.start_date = Some(now);
                now
            }
        };
        self.expiry_date = Some(base.add_days(MEMBERSHIP_PERIOD_DAYS));
        self.status = MembershipStatus::Active;
    }

    pub fn is_active_at(&self, now: Timestamp) -> bool {
        self.status == MembershipStatus::Active
            && self.expiry_date.map(|e| e.is_after(&now)).unwrap_or(false)
    }

    /// Marks an elapsed period as expired. Returns true if the status changed.
    pub fn refresh(&mut self, now: Timestamp) -> bool {
        if self.status == MembershipStatus::Active && !self.is_active_at(now) {
            self.status = MembershipStatus::Expired;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_activation_starts_a_full_period() {
        let now = Timestamp::now();
        let mut info = MembershipInfo::default();
        info.activate_or_extend(now);

        assert_eq!(info.status, MembershipStatus::Active);
        assert_eq!(info.start_date, Some(now));
        assert_eq!(info.expiry_date, Some(now.add_days(365)));
    }

    #[test]
    fn renewal_before_expiry_extends_from_expiry() {
        let now = Timestamp::now();
        let mut info = MembershipInfo::default();
        info.activate_or_extend(now);
        info.activate_or_extend(now.add_days(100));

        assert_eq!(info.start_date, Some(now));
        assert_eq!(info.expiry_date, Some(now.add_days(730)));
    }

    #[test]
    fn renewal_after_expiry_restarts_period() {
        let now = Timestamp::now();
        let mut info = MembershipInfo::default();
        info.activate_or_extend(now);
        let later = now.add_days(400);
        info.activate_or_extend(later);

        assert_eq!(info.start_date, Some(later));
        assert_eq!(info.expiry_date, Some(later.add_days(365)));
    }

    #[test]
    fn refresh_expires_elapsed_membership() {
        let now = Timestamp::now();
        let mut info = MembershipInfo::default();
        info.activate_or_extend(now.add_days(-400));

        assert!(info.refresh(now));
        assert_eq!(info.status, MembershipStatus::Expired);
        assert!(!info.refresh(now));
    }
}
