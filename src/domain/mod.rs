//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, enums, errors)
//! - `user` - Member accounts, profiles, membership and payment history
//! - `document` - Generated PDF documents owned by a user
//! - `event` - Announcements, meetings, courses and reminders
//! - `accounting` - Transactions, invoices and membership fees
//! - `suggestion` - Public suggestion box and moderation
//! - `submission` - Contact and affiliation form submissions
//! - `captcha` - Arithmetic challenges for the public forms
//! - `payment` - Checkout sessions and webhook reconciliation

pub mod accounting;
pub mod captcha;
pub mod document;
pub mod event;
pub mod foundation;
pub mod payment;
pub mod submission;
pub mod suggestion;
pub mod user;
