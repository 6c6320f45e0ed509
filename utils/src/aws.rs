use crate::constants::{
    DEFAULT_ASSUME_ROLE_SESSION_DURATION, DEFAULT_MAX_ATTEMPTS, DEFAULT_REGION,
    MAX_ASSUME_ROLE_SESSION_DURATION, MIN_ASSUME_ROLE_SESSION_DURATION, SESSION_NAME,
};
use crate::error::{self, Result};
use aws_config::default_provider::credentials::default_provider;
use aws_config::meta::region::RegionProviderChain;
use aws_config::sts::AssumeRoleProvider;
use aws_smithy_types::retry::{RetryConfig, RetryMode};
use aws_types::region::Region;
use aws_types::SdkConfig;
use log::info;
use snafu::ensure;
use std::time::Duration;

/// Set up the config for aws calls. The region is `region` if provided, otherwise whatever the
/// environment or profile says, otherwise `DEFAULT_REGION`. If a role arn is provided, calls
/// are made with credentials for that role from `sts::assume_role`.
pub async fn aws_config(
    region: &Option<String>,
    assume_role: &Option<String>,
    assume_role_session_duration: &Option<i32>,
) -> Result<SdkConfig> {
    ensure!(
        region.as_ref().map(|r| !r.is_empty()).unwrap_or(true),
        error::EmptyRegionSnafu
    );
    let region = RegionProviderChain::first_try(region.clone().map(Region::new))
        .or_default_provider()
        .or_else(Region::new(DEFAULT_REGION))
        .region()
        .await
        .unwrap_or_else(|| Region::new(DEFAULT_REGION));
    info!("Using region '{}' for the aws config.", region);

    let mut config_loader = aws_config::from_env()
        .retry_config(
            RetryConfig::standard()
                .with_retry_mode(RetryMode::Adaptive)
                .with_max_attempts(DEFAULT_MAX_ATTEMPTS),
        )
        .region(region.clone());

    if let Some(role_arn) = assume_role {
        let duration =
            assume_role_session_duration.unwrap_or(DEFAULT_ASSUME_ROLE_SESSION_DURATION);
        ensure!(
            (MIN_ASSUME_ROLE_SESSION_DURATION..=MAX_ASSUME_ROLE_SESSION_DURATION)
                .contains(&duration),
            error::SessionDurationSnafu {
                role_arn,
                duration,
                min: MIN_ASSUME_ROLE_SESSION_DURATION,
                max: MAX_ASSUME_ROLE_SESSION_DURATION,
            }
        );
        info!("Assuming role '{}' for aws calls.", role_arn);
        config_loader = config_loader.credentials_provider(
            AssumeRoleProvider::builder(role_arn)
                .region(region.clone())
                .session_name(SESSION_NAME)
                .session_length(Duration::from_secs(duration as u64))
                .build(default_provider().await),
        );
    }

    Ok(config_loader.load().await)
}
