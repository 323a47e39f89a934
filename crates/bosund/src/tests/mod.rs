//! Crate-level behaviour tests for the host.

pub(crate) mod support;
