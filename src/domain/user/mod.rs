//! User module - accounts, profiles, membership and payment history.

mod account;
mod membership;
mod payment_history;

pub use account::{AccountStatus, Profile, ProfilePhoto, ProfileUpdate, User};
pub use membership::{MembershipInfo, MembershipStatus, MEMBERSHIP_PERIOD_DAYS};
pub use payment_history::PaymentEntry;
