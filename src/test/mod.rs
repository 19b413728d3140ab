//! Test support.

pub(crate) mod helpers;
