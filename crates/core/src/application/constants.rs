// Evidence constants (no magic values)

/// Observation lifetime in calendar months
pub const OBSERVATION_TTL_MONTHS: u32 = 1;

pub const SUCCESS_OBSERVATION_TITLE: &str = "SSH Command Succeeded";

pub const FAILURE_OBSERVATION_TITLE: &str = "SSH Command Did Not Succeed";

pub const FAILURE_FINDING_TITLE: &str = "SSH Command Failure";

pub const SUCCESS_REMARKS: &str = "All OK.";

pub const CHECK_LOG_TITLE: &str = "SSH Command Check";
