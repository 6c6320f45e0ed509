use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display(
        "Session duration of {} seconds for role '{}' is outside of {}..={}",
        duration,
        role_arn,
        min,
        max
    ))]
    SessionDuration {
        role_arn: String,
        duration: i32,
        min: i32,
        max: i32,
    },

    #[snafu(display("Region must not be empty"))]
    EmptyRegion,
}

pub type Result<T> = std::result::Result<T, Error>;
