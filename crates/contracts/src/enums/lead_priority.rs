use serde::{Deserialize, Serialize};

/// Lead priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum LeadPriority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl LeadPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadPriority::Low => "Low",
            LeadPriority::Medium => "Medium",
            LeadPriority::High => "High",
            LeadPriority::Critical => "Critical",
        }
    }

    pub fn all() -> Vec<LeadPriority> {
        vec![
            LeadPriority::Low,
            LeadPriority::Medium,
            LeadPriority::High,
            LeadPriority::Critical,
        ]
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::all().into_iter().find(|p| p.as_str() == name)
    }
}

/// Priority as stored on a record; names outside the enum are kept verbatim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LeadPriorityValue {
    Known(LeadPriority),
    Unrecognized(String),
}

impl LeadPriorityValue {
    pub fn from_raw(raw: &str) -> Self {
        LeadPriority::from_name(raw)
            .map(LeadPriorityValue::Known)
            .unwrap_or_else(|| LeadPriorityValue::Unrecognized(raw.to_string()))
    }

    pub fn known(&self) -> Option<LeadPriority> {
        match self {
            LeadPriorityValue::Known(priority) => Some(*priority),
            LeadPriorityValue::Unrecognized(_) => None,
        }
    }

    pub fn is(&self, priority: LeadPriority) -> bool {
        self.known() == Some(priority)
    }
}

impl From<LeadPriority> for LeadPriorityValue {
    fn from(priority: LeadPriority) -> Self {
        LeadPriorityValue::Known(priority)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_from_raw() {
        assert_eq!(LeadPriorityValue::from_raw("High"), LeadPriority::High.into());
        let urgent = LeadPriorityValue::from_raw("Urgent");
        assert_eq!(urgent.known(), None);
        assert_eq!(serde_json::to_string(&urgent).unwrap(), "\"Urgent\"");
    }
}
