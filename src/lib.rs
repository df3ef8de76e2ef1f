//! Union Portal - backend for a trade union's member website.
//!
//! Members register, pay their annual fee through a hosted checkout, download
//! generated PDF documents, enrol in courses and follow announcements.
//! Administrators manage accounts, events, suggestions and the union's
//! accounting. Public visitors can send contact and affiliation forms guarded
//! by an arithmetic captcha, and drop anonymous suggestions.
//!
//! Layout follows ports and adapters: `domain` holds the records and their
//! rules, `ports` the traits the application depends on, `application` the
//! use-case handlers, and `adapters` the PostgreSQL, Redis, Stripe, Resend,
//! PDF and HTTP implementations.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
