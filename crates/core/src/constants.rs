//! Engine-wide constants.

use std::time::Duration;

/// Currency all portfolio totals are reported in.
pub const BASE_CURRENCY: &str = "INR";

/// Period of the portfolio refresh loop.
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(30);

/// Maximum age of a cached FX rate before a refetch is attempted.
pub const FX_RATE_TTL: Duration = Duration::from_secs(10 * 60);

/// Decimal places kept on a merged average cost.
pub const AVERAGE_COST_DECIMALS: u32 = 4;

/// Username length bounds for the claim-a-name identity scheme.
pub const USERNAME_MIN_LEN: usize = 2;
pub const USERNAME_MAX_LEN: usize = 30;
