/// Franchise long forms mapped to the short city names the reports use.
/// The only cross-source reconciliation performed anywhere in the pipeline.
const TEAM_ALIASES: &[(&str, &str)] = &[
    ("Los Angeles Dodgers", "Los Angeles"),
    ("Houston Astros", "Houston"),
    ("New York Yankees", "New York"),
    ("Cleveland Indians", "Cleveland"),
    ("Toronto Blue Jays", "Toronto"),
    ("Minnesota Twins", "Minnesota"),
    ("Detroit Tigers", "Detroit"),
    ("Baltimore Orioles", "Baltimore"),
];

pub fn canonical_team(name: &str) -> &str {
    TEAM_ALIASES
        .iter()
        .find(|(long, _)| *long == name)
        .map(|(_, short)| *short)
        .unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_aliases_fold() {
        assert_eq!(canonical_team("Houston Astros"), "Houston");
        assert_eq!(canonical_team("Toronto Blue Jays"), "Toronto");
    }

    #[test]
    fn unknown_names_pass_through() {
        assert_eq!(canonical_team("San Diego"), "San Diego");
        assert_eq!(canonical_team(""), "");
    }
}
