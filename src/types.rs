use crate::error::ValidationError;
use serde::Serialize;

/// One violation as listed on the results page.
///
/// The site's free-text formats are kept as-is; nothing is normalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViolationRecord {
    #[serde(rename = "dateTime")]
    pub occurred_at: String,
    pub location: Option<String>,
    pub violation_type: Option<String>,
    pub status: Option<String>,
}

/// Vehicle category code understood by the lookup form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleType {
    Car,
    Motorbike,
    ElectricBike,
}

impl VehicleType {
    /// Rejects anything but the literal codes "1", "2" and "3".
    pub fn parse(code: &str) -> Result<VehicleType, ValidationError> {
        match code {
            "1" => Ok(VehicleType::Car),
            "2" => Ok(VehicleType::Motorbike),
            "3" => Ok(VehicleType::ElectricBike),
            other => Err(ValidationError::InvalidVehicleType(other.to_string())),
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            VehicleType::Car => "1",
            VehicleType::Motorbike => "2",
            VehicleType::ElectricBike => "3",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRequest {
    pub plate: String,
    pub vehicle_type: VehicleType,
}

impl LookupRequest {
    pub fn new(plate: &str, vehicle_type: &str) -> Result<LookupRequest, ValidationError> {
        let vehicle_type = VehicleType::parse(vehicle_type)?;
        let plate = plate.trim();
        if plate.is_empty() {
            return Err(ValidationError::EmptyPlate);
        }
        Ok(LookupRequest {
            plate: plate.to_string(),
            vehicle_type,
        })
    }
}
