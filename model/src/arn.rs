use regex::Regex;

/// `arn:partition:service:region:account-id:resource`, region and account may be empty.
const ARN_PATTERN_REGEX: &str = r"^arn:aws[a-z-]*:[a-z0-9-]+:[a-z0-9-]*:[0-9]*:.+$";

lazy_static::lazy_static! {

    static ref REGEX: Regex = {
        #[allow(clippy::unwrap_used)]
        Regex::new(ARN_PATTERN_REGEX).unwrap()
    };
}

/// Whether `arn` is a syntactically valid AWS ARN.
pub fn is_well_formed(arn: &str) -> bool {
    REGEX.is_match(arn)
}

#[test]
fn arn_syntax() {
    assert!(is_well_formed(
        "arn:aws:eks:us-west-2:111122223333:cluster/prod"
    ));
    assert!(is_well_formed(
        "arn:aws-us-gov:eks:us-gov-west-1:111122223333:nodegroup/prod/ng/abc"
    ));
    assert!(!is_well_formed(""));
    assert!(!is_well_formed("arn:"));
    assert!(!is_well_formed("cluster/prod"));
}
