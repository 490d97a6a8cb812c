//! Route paths shared by navigation, guards and the sign-in flow.

pub const HOME: &str = "/";
pub const AUTHENTICATE: &str = "/authenticate";
pub const DASHBOARD: &str = "/dashboard";
pub const VOTERS: &str = "/dashboard/voters";
