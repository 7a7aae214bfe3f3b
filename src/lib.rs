//! cardfile: an interactive terminal contact book.
//!
//! The library half is the contact-list state machine: [`store`] owns the
//! ordered collection and [`form`] runs the create/edit draft session. The
//! [`ui`] half is the ratatui surface that drives it. Nothing is persisted;
//! the collection lives and dies with the process.

pub mod config;
pub mod contact;
pub mod form;
pub mod phone;
pub mod store;
pub mod ui;
