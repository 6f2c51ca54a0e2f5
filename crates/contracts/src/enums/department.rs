/// Business units a lead can be owned by.
///
/// Stored as a plain string on the record; this list is what the lead form
/// offers and is used for validation only.
pub const DEPARTMENTS: [&str; 7] = [
    "Business East",
    "Business West",
    "Business North",
    "Business South",
    "Lead Generation",
    "Designing",
    "Finance",
];

pub const DEFAULT_DEPARTMENT: &str = "Business East";

pub fn is_known_department(name: &str) -> bool {
    DEPARTMENTS.contains(&name)
}
