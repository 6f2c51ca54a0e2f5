use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical pipeline stages, in board/funnel order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LeadStage {
    Prospecting,
    Qualified,
    Proposal,
    Negotiation,
    #[serde(rename = "Closed Won")]
    ClosedWon,
    #[serde(rename = "Closed Lost")]
    ClosedLost,
}

impl LeadStage {
    pub const ALL: [LeadStage; 6] = [
        LeadStage::Prospecting,
        LeadStage::Qualified,
        LeadStage::Proposal,
        LeadStage::Negotiation,
        LeadStage::ClosedWon,
        LeadStage::ClosedLost,
    ];

    /// Stages that still count towards the active pipeline
    pub const ACTIVE: [LeadStage; 4] = [
        LeadStage::Prospecting,
        LeadStage::Qualified,
        LeadStage::Proposal,
        LeadStage::Negotiation,
    ];

    /// Wire name, identical to what the entity gateway stores
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadStage::Prospecting => "Prospecting",
            LeadStage::Qualified => "Qualified",
            LeadStage::Proposal => "Proposal",
            LeadStage::Negotiation => "Negotiation",
            LeadStage::ClosedWon => "Closed Won",
            LeadStage::ClosedLost => "Closed Lost",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        LeadStage::ALL.into_iter().find(|s| s.as_str() == name)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, LeadStage::ClosedWon | LeadStage::ClosedLost)
    }

    /// Position in the conventional ordering (0 = Prospecting)
    pub fn position(&self) -> usize {
        LeadStage::ALL
            .iter()
            .position(|s| s == self)
            .unwrap_or_default()
    }
}

impl fmt::Display for LeadStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stage as stored on a record.
///
/// Records coming back from the gateway are not guaranteed to carry one of the
/// canonical names, so anything else is kept verbatim instead of failing the
/// whole list. A missing field deserializes to an empty `Unrecognized`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LeadStageValue {
    Known(LeadStage),
    Unrecognized(String),
}

impl LeadStageValue {
    pub fn known(&self) -> Option<LeadStage> {
        match self {
            LeadStageValue::Known(stage) => Some(*stage),
            LeadStageValue::Unrecognized(_) => None,
        }
    }

    pub fn is(&self, stage: LeadStage) -> bool {
        self.known() == Some(stage)
    }

    pub fn as_str(&self) -> &str {
        match self {
            LeadStageValue::Known(stage) => stage.as_str(),
            LeadStageValue::Unrecognized(raw) => raw,
        }
    }
}

impl Default for LeadStageValue {
    fn default() -> Self {
        LeadStageValue::Unrecognized(String::new())
    }
}

impl From<LeadStage> for LeadStageValue {
    fn from(stage: LeadStage) -> Self {
        LeadStageValue::Known(stage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_wire_names() {
        assert_eq!(
            serde_json::to_string(&LeadStage::ClosedWon).unwrap(),
            "\"Closed Won\""
        );
        assert_eq!(LeadStage::from_name("Closed Lost"), Some(LeadStage::ClosedLost));
        assert_eq!(LeadStage::from_name("closed lost"), None);
    }

    #[test]
    fn test_unrecognized_stage_is_preserved() {
        let value: LeadStageValue = serde_json::from_str("\"On Hold\"").unwrap();
        assert_eq!(value, LeadStageValue::Unrecognized("On Hold".into()));
        assert_eq!(value.known(), None);
        assert_eq!(serde_json::to_string(&value).unwrap(), "\"On Hold\"");

        let value: LeadStageValue = serde_json::from_str("\"Negotiation\"").unwrap();
        assert!(value.is(LeadStage::Negotiation));
    }

    #[test]
    fn test_terminal_stages() {
        let terminal: Vec<_> = LeadStage::ALL.iter().filter(|s| s.is_terminal()).collect();
        assert_eq!(terminal, vec![&LeadStage::ClosedWon, &LeadStage::ClosedLost]);
        assert_eq!(LeadStage::Proposal.position(), 2);
    }
}
