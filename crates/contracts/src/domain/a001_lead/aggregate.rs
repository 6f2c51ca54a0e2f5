use crate::domain::a002_contact::aggregate::ContactId;
use crate::domain::common::lenient::{self, empty_as_none, null_as_default};
use crate::domain::common::EntityRecord;
use crate::enums::department::{is_known_department, DEFAULT_DEPARTMENT};
use crate::enums::{LeadPriority, LeadPriorityValue, LeadStage, LeadStageValue};
use crate::record_id;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// ID Type
// ============================================================================
record_id!(LeadId);

pub const DEFAULT_PROBABILITY: u8 = 50;

// ============================================================================
// Record
// ============================================================================
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Lead {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<LeadId>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,

    #[serde(default, deserialize_with = "empty_as_none")]
    pub description: Option<String>,

    /// Deal value in currency units
    #[serde(default, deserialize_with = "null_as_default")]
    pub value: f64,

    /// Win probability, 0..=100
    #[serde(default, deserialize_with = "lenient::percentage")]
    pub probability: Option<u8>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub stage: LeadStageValue,

    #[serde(default, with = "lenient::date")]
    pub expected_close_date: Option<NaiveDate>,

    #[serde(default, deserialize_with = "lenient::priority")]
    pub priority: Option<LeadPriorityValue>,

    #[serde(default, deserialize_with = "empty_as_none")]
    pub assigned_to: Option<String>,

    #[serde(default, deserialize_with = "empty_as_none")]
    pub department: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,

    /// Weak reference; the contact may no longer exist
    #[serde(default, deserialize_with = "empty_as_none")]
    pub contact_id: Option<ContactId>,

    /// Acquisition channel (Website, Referral, ...)
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    #[serde(default, with = "lenient::timestamp", skip_serializing_if = "Option::is_none")]
    pub created_date: Option<DateTime<Utc>>,

    #[serde(default, with = "lenient::timestamp", skip_serializing_if = "Option::is_none")]
    pub updated_date: Option<DateTime<Utc>>,
}

impl Lead {
    /// Build a new record from a form submission, applying form defaults
    pub fn new_for_insert(dto: &LeadDto) -> Self {
        let mut lead = Lead {
            stage: LeadStage::Prospecting.into(),
            priority: Some(LeadPriority::Medium.into()),
            probability: Some(DEFAULT_PROBABILITY),
            department: Some(DEFAULT_DEPARTMENT.to_string()),
            ..Default::default()
        };
        lead.update(dto);
        lead
    }

    /// Merge submitted form data over the record.
    ///
    /// Only fields present in the form are touched. A blank title is ignored;
    /// an empty string clears an optional text field.
    pub fn update(&mut self, dto: &LeadDto) {
        if !dto.title.trim().is_empty() {
            self.title = dto.title.trim().to_string();
        }
        if let Some(description) = &dto.description {
            self.description = non_blank(description);
        }
        if let Some(value) = dto.value {
            self.value = value;
        }
        if let Some(probability) = dto.probability {
            self.probability = Some(probability);
        }
        if let Some(stage) = dto.stage {
            self.stage = stage.into();
        }
        if dto.expected_close_date.is_some() {
            self.expected_close_date = dto.expected_close_date;
        }
        if let Some(priority) = dto.priority {
            self.priority = Some(priority.into());
        }
        if let Some(assigned_to) = &dto.assigned_to {
            self.assigned_to = non_blank(assigned_to);
        }
        if let Some(department) = dto.department.as_deref().and_then(non_blank) {
            self.department = Some(department);
        }
        if let Some(tags) = &dto.tags {
            self.tags = tags.clone();
        }
        if let Some(contact_id) = &dto.contact_id {
            self.contact_id = non_blank(&contact_id.0).map(ContactId::from);
        }
        if let Some(source) = &dto.source {
            self.source = non_blank(source);
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Title must not be empty".into());
        }
        if !self.value.is_finite() || self.value < 0.0 {
            return Err(format!("Value must be a non-negative number, got {}", self.value));
        }
        if let Some(p) = self.probability {
            if p > 100 {
                return Err(format!("Probability must be within 0..=100, got {}", p));
            }
        }
        if let Some(department) = &self.department {
            if !is_known_department(department) {
                return Err(format!("Unknown department: {}", department));
            }
        }
        Ok(())
    }

    pub fn is_won(&self) -> bool {
        self.stage.is(LeadStage::ClosedWon)
    }

    pub fn is_lost(&self) -> bool {
        self.stage.is(LeadStage::ClosedLost)
    }

    /// Active pipeline = anything not closed (won or lost)
    pub fn is_active(&self) -> bool {
        !self.is_won() && !self.is_lost()
    }

    pub fn id_str(&self) -> Option<&str> {
        self.id.as_ref().map(|id| id.0.as_str())
    }
}

fn non_blank(raw: &str) -> Option<String> {
    Some(raw.trim().to_string()).filter(|s| !s.is_empty())
}

impl EntityRecord for Lead {
    fn entity_name() -> &'static str {
        "Lead"
    }

    fn element_name() -> &'static str {
        "Lead"
    }

    fn list_name() -> &'static str {
        "Leads"
    }

    fn record_id(&self) -> Option<&str> {
        self.id_str()
    }
}

// ============================================================================
// DTO
// ============================================================================

/// Lead form submission; `None` leaves the field as it is
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LeadDto {
    #[serde(default)]
    pub title: String,
    pub description: Option<String>,
    pub value: Option<f64>,
    pub probability: Option<u8>,
    pub stage: Option<LeadStage>,
    #[serde(default, with = "lenient::date")]
    pub expected_close_date: Option<NaiveDate>,
    pub priority: Option<LeadPriority>,
    pub assigned_to: Option<String>,
    pub department: Option<String>,
    pub tags: Option<Vec<String>>,
    pub contact_id: Option<ContactId>,
    pub source: Option<String>,
}

/// Body of a stage move (drag-release on the board)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveLeadRequest {
    pub stage: LeadStage,
}

/// Query of the lead list filter bar
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LeadFilter {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub stage: Option<LeadStage>,
    #[serde(default)]
    pub priority: Option<LeadPriority>,
}

/// Lead joined with the display name of its contact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadCard {
    pub lead: Lead,
    /// `None` when the lead has no contact or the contact no longer exists
    pub contact_name: Option<String>,
    pub company: Option<String>,
}

/// One Kanban column
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineColumn {
    pub stage: LeadStage,
    pub count: usize,
    pub value: f64,
    pub cards: Vec<LeadCard>,
}

/// Search page result across leads and contacts
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SearchResults {
    pub query: String,
    pub leads: Vec<Lead>,
    pub contacts: Vec<crate::domain::a002_contact::aggregate::Contact>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lead_from_backend_record() {
        let lead: Lead = serde_json::from_value(json!({
            "id": "66a1",
            "title": "Website Redesign",
            "value": 250000,
            "probability": 70,
            "stage": "Closed Won",
            "expected_close_date": "",
            "priority": "High",
            "assigned_to": "",
            "department": "Business West",
            "tags": null,
            "contact_id": "",
            "created_date": "2025-07-18T04:54:33.187000",
            "created_by": "someone@example.com"
        }))
        .unwrap();

        assert_eq!(lead.id, Some(LeadId::from("66a1")));
        assert!(lead.is_won());
        assert!(!lead.is_active());
        assert_eq!(lead.value, 250000.0);
        assert!(lead.expected_close_date.is_none());
        assert!(lead.assigned_to.is_none());
        assert!(lead.contact_id.is_none());
        assert!(lead.tags.is_empty());
        assert!(lead.created_date.is_some());
    }

    #[test]
    fn test_missing_stage_is_unrecognized_and_active() {
        let lead: Lead = serde_json::from_value(json!({"title": "No stage", "stage": null})).unwrap();
        assert_eq!(lead.stage.known(), None);
        assert!(lead.is_active());
    }

    #[test]
    fn test_new_for_insert_applies_form_defaults() {
        let lead = Lead::new_for_insert(&LeadDto {
            title: "  Brand refresh ".into(),
            ..Default::default()
        });
        assert_eq!(lead.title, "Brand refresh");
        assert!(lead.stage.is(LeadStage::Prospecting));
        assert_eq!(lead.priority, Some(LeadPriority::Medium.into()));
        assert_eq!(lead.probability, Some(DEFAULT_PROBABILITY));
        assert_eq!(lead.department.as_deref(), Some(DEFAULT_DEPARTMENT));
        assert_eq!(lead.value, 0.0);
        assert!(lead.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_input() {
        let mut lead = Lead::new_for_insert(&LeadDto {
            title: "Deal".into(),
            ..Default::default()
        });
        lead.value = -1.0;
        assert!(lead.validate().is_err());

        lead.value = 10.0;
        lead.probability = Some(101);
        assert!(lead.validate().is_err());

        lead.probability = Some(100);
        lead.title = "   ".into();
        assert!(lead.validate().is_err());

        lead.title = "Deal".into();
        lead.department = Some("Marketing".into());
        assert!(lead.validate().is_err());
    }

    #[test]
    fn test_loose_priority_and_probability_still_decode() {
        let fractional: Lead =
            serde_json::from_value(json!({"title": "A", "probability": 12.5, "priority": "High"}))
                .unwrap();
        assert_eq!(fractional.probability, Some(13));
        assert_eq!(fractional.priority, Some(LeadPriority::High.into()));

        let blank: Lead =
            serde_json::from_value(json!({"title": "B", "priority": "", "probability": null}))
                .unwrap();
        assert_eq!(blank.priority, None);
        assert_eq!(blank.probability, None);

        let urgent: Lead = serde_json::from_value(json!({"title": "C", "priority": "Urgent"})).unwrap();
        assert_eq!(
            serde_json::to_value(&urgent).unwrap()["priority"],
            json!("Urgent")
        );
    }

    #[test]
    fn test_update_keeps_fields_the_form_left_out() {
        let mut lead = Lead::new_for_insert(&LeadDto {
            title: "Deal".into(),
            description: Some("Two storefronts".into()),
            value: Some(250000.0),
            stage: Some(LeadStage::Qualified),
            assigned_to: Some("asha@brandstreet.in".into()),
            tags: Some(vec!["x".into()]),
            contact_id: Some(ContactId::from("c1")),
            ..Default::default()
        });

        lead.update(&LeadDto {
            title: "Deal renamed".into(),
            ..Default::default()
        });
        assert_eq!(lead.title, "Deal renamed");
        assert_eq!(lead.value, 250000.0);
        assert_eq!(lead.description.as_deref(), Some("Two storefronts"));
        assert_eq!(lead.assigned_to.as_deref(), Some("asha@brandstreet.in"));
        assert_eq!(lead.tags, vec!["x".to_string()]);
        assert_eq!(lead.contact_id, Some(ContactId::from("c1")));
        assert!(lead.stage.is(LeadStage::Qualified));

        lead.update(&LeadDto {
            description: Some("".into()),
            value: Some(0.0),
            ..Default::default()
        });
        assert_eq!(lead.title, "Deal renamed");
        assert_eq!(lead.description, None);
        assert_eq!(lead.value, 0.0);
    }
}
