use clap::Parser;

/// Find sensors that have not checked into the console in N days, then
/// deregister and delete them after confirmation.
#[derive(Parser, Debug)]
#[command(name = "inactive-sensors", version, about)]
pub struct Cli {
    /// Days in the past to search for. Prompted for when omitted
    #[arg(short, long)]
    pub days: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn days_is_optional() {
        assert_eq!(Cli::parse_from(["inactive-sensors"]).days, None);
    }

    #[test]
    fn days_short_and_long() {
        assert_eq!(Cli::parse_from(["x", "-d", "25"]).days, Some(25));
        assert_eq!(Cli::parse_from(["x", "--days", "7"]).days, Some(7));
        assert!(Cli::try_parse_from(["x", "-d", "-3"]).is_err());
    }

    #[test]
    fn no_other_flags() {
        assert!(Cli::try_parse_from(["x", "--config", "other.json"]).is_err());
        assert!(Cli::try_parse_from(["x", "-o", "/tmp"]).is_err());
    }
}
