//! External delivery channels for alert notifications.
//!
//! [`email`] holds the shared configuration, error and transport trait;
//! [`resend`] and [`smtp`] are the two transports.

pub mod email;
pub mod resend;
pub mod smtp;
