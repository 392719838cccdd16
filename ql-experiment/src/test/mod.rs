//! Test doubles for the [Environment](crate::prelude::Environment) and [Agent](crate::prelude::Agent) contracts.
