//! Aid-delivery request ("entrega") and its line items.
//!
//! A request is created from a public intake form in one step: every field
//! and every line item is validated up front, and nothing is produced unless
//! all of them pass.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use casework_core::{AggregateRoot, AidRequestId, AidTypeId, FieldErrors};

use crate::catalog::AidType;
use crate::status::{RequestStatus, TransitionError, TransitionPolicy};

const SHORT_TEXT: usize = 100;
const CODE_TEXT: usize = 20;
const MARKER_TEXT: usize = 10;

/// Person the aid is for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Beneficiary {
    pub name: String,
    pub last_name: String,
    /// Nationality/residency marker (`V`, `E`, ...).
    pub resident: String,
    pub identification: String,
    pub phone: String,
    pub age: Option<String>,
    pub diagnostic: Option<String>,
    pub address: String,
    pub state: String,
    pub municipality: String,
    pub parish: String,
    pub observation: Option<String>,
}

/// Person filing on behalf of the beneficiary, when there is one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Applicant {
    pub active: bool,
    pub name: Option<String>,
    pub last_name: Option<String>,
    pub resident: Option<String>,
    pub identification: Option<String>,
    pub phone: Option<String>,
    pub age: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Referrer {
    pub name: Option<String>,
    pub identification: Option<u64>,
}

/// Who referred the case.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Referrers {
    pub person: Referrer,
    pub organization: Referrer,
    pub association: Referrer,
}

/// One requested aid and how many units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub aid_type_id: AidTypeId,
    #[serde(rename = "type")]
    pub aid_type: String,
    pub quantity: u32,
}

// ─────────────────────────────────────────────────────────────────────────────
// Intake input
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LineItemInput {
    #[serde(rename = "type", alias = "tipo")]
    pub aid_type: Option<String>,
    #[serde(alias = "cantidad")]
    pub quantity: Option<i64>,
}

/// Intake form as submitted. Any `status` sent by the client is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AidRequestInput {
    pub name: String,
    pub last_name: String,
    pub resident: String,
    pub identification: String,
    pub phone: String,
    pub age: Option<String>,
    pub diagnostic: Option<String>,
    pub address: String,
    pub state: String,
    pub municipality: String,
    pub parish: String,
    pub observation: Option<String>,

    pub applicant_active: bool,
    pub applicant_name: Option<String>,
    pub applicant_last_name: Option<String>,
    pub applicant_resident: Option<String>,
    pub applicant_identification: Option<String>,
    pub applicant_phone: Option<String>,
    pub applicant_age: Option<String>,

    pub referrer_person_name: Option<String>,
    pub referrer_person_id: Option<u64>,
    pub referrer_organization_name: Option<String>,
    pub referrer_organization_id: Option<u64>,
    pub referrer_association_name: Option<String>,
    pub referrer_association_id: Option<u64>,

    pub main: Option<String>,
    pub recipes: Option<String>,
    pub attachment: Option<String>,

    pub items: Vec<LineItemInput>,
}

/// A fully validated intake, ready to be stored with its line items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAidRequest {
    pub beneficiary: Beneficiary,
    pub applicant: Option<Applicant>,
    pub referrers: Referrers,
    pub main: Option<String>,
    pub recipes: Option<String>,
    pub attachment: Option<String>,
    pub items: Vec<LineItem>,
}

fn required(errors: &mut FieldErrors, field: &str, value: &str, max: usize) -> String {
    let value = value.trim();
    if value.is_empty() {
        errors.add(field, "this field is required");
    } else if value.chars().count() > max {
        errors.add(field, format!("must be at most {max} characters"));
    }
    value.to_string()
}

fn optional(value: &Option<String>) -> Option<String> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}

impl AidRequestInput {
    /// Validate every field and resolve every line item against the catalog.
    ///
    /// All problems are reported together; line-item problems are keyed
    /// `items[i].type` / `items[i].quantity`.
    pub fn validate(&self, lookup: impl Fn(&str) -> Option<AidType>) -> Result<NewAidRequest, FieldErrors> {
        let mut errors = FieldErrors::new();

        let beneficiary = Beneficiary {
            name: required(&mut errors, "name", &self.name, SHORT_TEXT),
            last_name: required(&mut errors, "last_name", &self.last_name, SHORT_TEXT),
            resident: required(&mut errors, "resident", &self.resident, MARKER_TEXT),
            identification: required(&mut errors, "identification", &self.identification, CODE_TEXT),
            phone: required(&mut errors, "phone", &self.phone, CODE_TEXT),
            age: optional(&self.age),
            diagnostic: optional(&self.diagnostic),
            address: required(&mut errors, "address", &self.address, usize::MAX),
            state: required(&mut errors, "state", &self.state, SHORT_TEXT),
            municipality: required(&mut errors, "municipality", &self.municipality, SHORT_TEXT),
            parish: required(&mut errors, "parish", &self.parish, SHORT_TEXT),
            observation: optional(&self.observation),
        };

        let applicant = Applicant {
            active: self.applicant_active,
            name: optional(&self.applicant_name),
            last_name: optional(&self.applicant_last_name),
            resident: optional(&self.applicant_resident),
            identification: optional(&self.applicant_identification),
            phone: optional(&self.applicant_phone),
            age: optional(&self.applicant_age),
        };
        let applicant = (applicant != Applicant::default()).then_some(applicant);

        let referrers = Referrers {
            person: Referrer {
                name: optional(&self.referrer_person_name),
                identification: self.referrer_person_id,
            },
            organization: Referrer {
                name: optional(&self.referrer_organization_name),
                identification: self.referrer_organization_id,
            },
            association: Referrer {
                name: optional(&self.referrer_association_name),
                identification: self.referrer_association_id,
            },
        };

        if self.items.is_empty() {
            errors.add("items", "at least one item is required");
        }

        let mut items = Vec::with_capacity(self.items.len());
        for (i, raw) in self.items.iter().enumerate() {
            let name = raw.aid_type.as_deref().map(str::trim).unwrap_or_default();
            let aid_type = if name.is_empty() {
                errors.add(format!("items[{i}].type"), "this field is required");
                None
            } else {
                let found = lookup(name);
                if found.is_none() {
                    errors.add(format!("items[{i}].type"), format!("unknown aid type '{name}'"));
                }
                found
            };

            let quantity = match raw.quantity {
                None => {
                    errors.add(format!("items[{i}].quantity"), "this field is required");
                    None
                }
                Some(q) => match u32::try_from(q) {
                    Ok(q) if q >= 1 => Some(q),
                    _ => {
                        errors.add(format!("items[{i}].quantity"), "quantity must be a positive integer");
                        None
                    }
                },
            };

            if let (Some(aid_type), Some(quantity)) = (aid_type, quantity) {
                items.push(LineItem {
                    aid_type_id: aid_type.id,
                    aid_type: aid_type.name,
                    quantity,
                });
            }
        }

        errors.into_result(NewAidRequest {
            beneficiary,
            applicant,
            referrers,
            main: optional(&self.main),
            recipes: optional(&self.recipes),
            attachment: optional(&self.attachment),
            items,
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Aggregate
// ─────────────────────────────────────────────────────────────────────────────

/// Aggregate root: an aid request with its line items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AidRequest {
    id: AidRequestId,
    beneficiary: Beneficiary,
    applicant: Option<Applicant>,
    referrers: Referrers,
    main: Option<String>,
    recipes: Option<String>,
    attachment: Option<String>,
    items: Vec<LineItem>,
    status: RequestStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    version: u64,
}

impl AidRequest {
    /// New requests always start as `PENDING`.
    pub fn new(id: AidRequestId, new: NewAidRequest, now: DateTime<Utc>) -> Self {
        Self {
            id,
            beneficiary: new.beneficiary,
            applicant: new.applicant,
            referrers: new.referrers,
            main: new.main,
            recipes: new.recipes,
            attachment: new.attachment,
            items: new.items,
            status: RequestStatus::Pending,
            created_at: now,
            updated_at: now,
            version: 1,
        }
    }

    pub fn request_id(&self) -> AidRequestId {
        self.id
    }

    pub fn beneficiary(&self) -> &Beneficiary {
        &self.beneficiary
    }

    pub fn applicant(&self) -> Option<&Applicant> {
        self.applicant.as_ref()
    }

    pub fn referrers(&self) -> &Referrers {
        &self.referrers
    }

    pub fn attachment(&self) -> Option<&str> {
        self.attachment.as_deref()
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn status(&self) -> RequestStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Next state after a status change, if `policy` allows it.
    pub fn with_status(&self, to: RequestStatus, policy: TransitionPolicy, now: DateTime<Utc>) -> Result<Self, TransitionError> {
        policy.check(self.status, to)?;
        Ok(Self {
            status: to,
            updated_at: now,
            version: self.version + 1,
            ..self.clone()
        })
    }
}

impl AggregateRoot for AidRequest {
    type Id = AidRequestId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog(name: &str) -> Option<AidType> {
        ["SILLA DE RUEDAS EST.", "ANDADERA"]
            .iter()
            .position(|n| *n == name)
            .map(|i| AidType {
                id: AidTypeId::new(i as u64 + 1),
                name: name.to_string(),
            })
    }

    fn intake() -> AidRequestInput {
        serde_json::from_value(serde_json::json!({
            "name": "José",
            "last_name": "Gómez",
            "resident": "V",
            "identification": "12345678",
            "phone": "04141234567",
            "address": "Calle 1",
            "state": "Lara",
            "municipality": "Iribarren",
            "parish": "Catedral",
            "status": "DELIVERED",
            "items": [
                { "type": "SILLA DE RUEDAS EST.", "quantity": 1 },
                { "tipo": "ANDADERA", "cantidad": 2 }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn valid_intake_starts_pending() {
        let new = intake().validate(catalog).unwrap();
        assert_eq!(new.items.len(), 2);
        assert_eq!(new.items[1].aid_type_id, AidTypeId::new(2));
        assert!(new.applicant.is_none());

        let request = AidRequest::new(AidRequestId::new(1), new, Utc::now());
        assert_eq!(request.status(), RequestStatus::Pending);
        assert_eq!(request.version(), 1);
    }

    #[test]
    fn unknown_aid_type_fails_the_whole_intake() {
        let mut raw = intake();
        raw.items.push(LineItemInput {
            aid_type: Some("JETPACK".to_string()),
            quantity: Some(1),
        });

        let errors = raw.validate(catalog).unwrap_err();
        assert!(errors.contains("items[2].type"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn field_and_item_errors_are_aggregated() {
        let mut raw = intake();
        raw.name = "  ".to_string();
        raw.parish = String::new();
        raw.items[0].quantity = Some(0);
        raw.items[1].aid_type = None;

        let errors = raw.validate(catalog).unwrap_err();
        for field in ["name", "parish", "items[0].quantity", "items[1].type"] {
            assert!(errors.contains(field), "missing {field}");
        }
    }

    #[test]
    fn at_least_one_item_is_required() {
        let mut raw = intake();
        raw.items.clear();
        assert!(raw.validate(catalog).unwrap_err().contains("items"));
    }

    #[test]
    fn status_change_respects_policy() {
        let request = AidRequest::new(AidRequestId::new(1), intake().validate(catalog).unwrap(), Utc::now());

        let delivered = request
            .with_status(RequestStatus::Delivered, TransitionPolicy::Unrestricted, Utc::now())
            .unwrap();
        assert_eq!(delivered.status(), RequestStatus::Delivered);
        assert_eq!(delivered.version(), 2);
        assert_eq!(delivered.items(), request.items());

        let err = request
            .with_status(RequestStatus::Delivered, TransitionPolicy::Lifecycle, Utc::now())
            .unwrap_err();
        assert_eq!(err.from, RequestStatus::Pending);
    }

    #[test]
    fn serialized_request_uses_wire_names() {
        let request = AidRequest::new(AidRequestId::new(9), intake().validate(catalog).unwrap(), Utc::now());
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["id"], 9);
        assert_eq!(json["status"], "PENDING");
        assert_eq!(json["items"][0]["type"], "SILLA DE RUEDAS EST.");
    }
}
