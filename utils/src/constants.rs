use log::LevelFilter;

pub const DEFAULT_REGION: &str = "us-west-2";
pub const DEFAULT_LEVEL_FILTER: LevelFilter = LevelFilter::Info;
pub const DEFAULT_ASSUME_ROLE_SESSION_DURATION: i32 = 3600;
/// The shortest and longest sessions STS will grant when assuming a role.
pub const MIN_ASSUME_ROLE_SESSION_DURATION: i32 = 900;
pub const MAX_ASSUME_ROLE_SESSION_DURATION: i32 = 43200;
pub const DEFAULT_MAX_ATTEMPTS: u32 = 15;
pub const SESSION_NAME: &str = "eksinspect";
