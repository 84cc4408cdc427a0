use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskProfile {
    Conservative,
    Moderate,
    Aggressive,
    Unassigned,
}

impl fmt::Display for RiskProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RiskProfile::Conservative => "Conservative",
            RiskProfile::Moderate => "Moderate",
            RiskProfile::Aggressive => "Aggressive",
            RiskProfile::Unassigned => "Unassigned",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientProfile {
    pub risk_profile: RiskProfile,
    pub investment_horizon: String,
    pub email: String,
}

impl ClientProfile {
    fn new(risk_profile: RiskProfile, horizon_years: u32, email: &str) -> Self {
        Self {
            risk_profile,
            investment_horizon: format!("{} years", horizon_years),
            email: email.to_string(),
        }
    }

    pub fn unassigned() -> Self {
        Self {
            risk_profile: RiskProfile::Unassigned,
            investment_horizon: "-".to_string(),
            email: "-".to_string(),
        }
    }
}

pub fn known_profile(client: &str) -> Option<ClientProfile> {
    match client {
        "Client A" => Some(ClientProfile::new(RiskProfile::Moderate, 5, "clientA@email.com")),
        "Client B" => Some(ClientProfile::new(RiskProfile::Aggressive, 10, "clientB@email.com")),
        "Client C" => Some(ClientProfile::new(RiskProfile::Conservative, 3, "clientC@email.com")),
        _ => None,
    }
}

/// Profile card contents for any client, including imported ones we have no
/// record of.
pub fn profile_for(client: &str) -> ClientProfile {
    known_profile(client).unwrap_or_else(ClientProfile::unassigned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_profiles_match_mock_clients() {
        let a = profile_for("Client A");
        assert_eq!(a.risk_profile, RiskProfile::Moderate);
        assert_eq!(a.investment_horizon, "5 years");
        assert_eq!(a.email, "clientA@email.com");

        assert_eq!(profile_for("Client B").risk_profile, RiskProfile::Aggressive);
        assert_eq!(profile_for("Client C").investment_horizon, "3 years");
    }

    #[test]
    fn unknown_client_gets_unassigned_profile() {
        assert!(known_profile("Client Z").is_none());
        assert_eq!(profile_for("Client Z").risk_profile, RiskProfile::Unassigned);
        assert_eq!(RiskProfile::Unassigned.to_string(), "Unassigned");
    }
}
