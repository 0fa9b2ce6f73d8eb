//! Form checks applied before a resource or callout is submitted.

use crate::domain::ResourceType;
use crate::payload::{NewCallout, NewResource};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static GRID_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z]{2}\s*\d{3,5}\s*\d{3,5}$").expect("grid reference pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

impl FieldError {
    fn new(field: &'static str, message: &'static str) -> Self {
        Self { field, message }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Accepts references such as `SD 1355 8546` or `SD12345 67890`.
pub fn is_grid_reference(value: &str) -> bool {
    GRID_REFERENCE.is_match(value)
}

pub fn check_new_resource(resource: &NewResource) -> Vec<FieldError> {
    let mut errors = Vec::new();
    let details = &resource.details;

    if resource.name.trim().is_empty() {
        errors.push(FieldError::new("name", "Name is required"));
    }

    match resource.kind {
        ResourceType::Personnel => {
            if details.callsign.as_deref().is_none_or(|value| value.trim().is_empty()) {
                errors.push(FieldError::new(
                    "callsign",
                    "Callsign is required for personnel",
                ));
            }
        }
        ResourceType::Vehicles => {
            if details
                .vehicle_type
                .as_deref()
                .is_none_or(|value| value.trim().is_empty())
            {
                errors.push(FieldError::new("vehicleType", "Vehicle type is required"));
            }
            if details.capacity.is_none_or(|capacity| capacity < 1) {
                errors.push(FieldError::new("capacity", "Valid capacity is required"));
            }
            if details.fuel_level.is_none_or(|level| !(0..=100).contains(&level)) {
                errors.push(FieldError::new(
                    "fuelLevel",
                    "Fuel level must be between 0-100%",
                ));
            }
        }
        ResourceType::Equipment | ResourceType::MedicalPacks => {}
    }

    errors
}

pub fn check_new_callout(callout: &NewCallout) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if callout.title.trim().is_empty() {
        errors.push(FieldError::new("title", "Title is required"));
    }
    if callout.location.trim().is_empty() {
        errors.push(FieldError::new("location", "Location is required"));
    }
    if callout.description.trim().is_empty() {
        errors.push(FieldError::new("description", "Description is required"));
    }
    if let Some(grid) = callout.grid_reference.as_deref() {
        if !grid.is_empty() && !is_grid_reference(grid) {
            errors.push(FieldError::new(
                "gridReference",
                "Invalid grid reference format (e.g., SD 1355 8546 or SD 12345 67890)",
            ));
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ResourceDetails;

    fn vehicle(capacity: Option<i32>, fuel_level: Option<i32>) -> NewResource {
        NewResource {
            name: "DM3".to_string(),
            kind: ResourceType::Vehicles,
            status: None,
            details: ResourceDetails {
                vehicle_type: Some("Land Rover".to_string()),
                capacity,
                fuel_level,
                ..ResourceDetails::default()
            },
        }
    }

    #[test]
    fn grid_reference_format() {
        assert!(is_grid_reference("SD 1355 8546"));
        assert!(is_grid_reference("SD12345 67890"));
        assert!(!is_grid_reference("sd 1355 8546"));
        assert!(!is_grid_reference("SD 12 8546"));
    }

    #[test]
    fn personnel_need_callsign() {
        let resource = NewResource {
            name: "Alice".to_string(),
            kind: ResourceType::Personnel,
            status: None,
            details: ResourceDetails::default(),
        };
        let errors = check_new_resource(&resource);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "callsign");
    }

    #[test]
    fn vehicle_ranges() {
        assert!(check_new_resource(&vehicle(Some(5), Some(95))).is_empty());
        assert!(check_new_resource(&vehicle(Some(5), Some(0))).is_empty());

        let fields: Vec<_> = check_new_resource(&vehicle(Some(0), Some(101)))
            .into_iter()
            .map(|error| error.field)
            .collect();
        assert_eq!(fields, vec!["capacity", "fuelLevel"]);
    }

    #[test]
    fn callout_requires_core_fields() {
        let callout = NewCallout {
            title: "Missing walker".to_string(),
            grid_reference: Some("bad ref".to_string()),
            ..NewCallout::default()
        };
        let fields: Vec<_> = check_new_callout(&callout)
            .into_iter()
            .map(|error| error.field)
            .collect();
        assert_eq!(fields, vec!["location", "description", "gridReference"]);
    }
}
