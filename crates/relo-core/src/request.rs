//! Quote request: the caller supplied input record
//!
//! The request is assembled and sanitized by the caller before it reaches the
//! pipeline. Modules read it but never change it.

use crate::error::{Result, RuleError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Service being quoted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    Moving,
    Cleaning,
    MovingAndCleaning,
}

impl ServiceType {
    /// Whether the service involves transporting goods
    pub fn includes_moving(&self) -> bool {
        matches!(self, ServiceType::Moving | ServiceType::MovingAndCleaning)
    }

    /// Whether the service involves cleaning
    pub fn includes_cleaning(&self) -> bool {
        matches!(self, ServiceType::Cleaning | ServiceType::MovingAndCleaning)
    }
}

/// Postal address
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub postal_code: String,
    pub city: String,
}

impl Address {
    pub fn new(
        street: impl Into<String>,
        postal_code: impl Into<String>,
        city: impl Into<String>,
    ) -> Self {
        Self {
            street: street.into(),
            postal_code: postal_code.into(),
            city: city.into(),
        }
    }
}

/// End of a move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Pickup,
    Delivery,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Pickup, Side::Delivery];

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Pickup => "pickup",
            Side::Delivery => "delivery",
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Assorted domain flags
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestFlags {
    pub piano: bool,
    pub safe: bool,
    pub bulky_furniture: bool,
    pub temporary_storage: bool,
    pub storage_duration_days: Option<u32>,
    pub pickup_syndic_time_slot: bool,
    pub delivery_syndic_time_slot: bool,
    pub pickup_narrow_street: bool,
    pub delivery_narrow_street: bool,
    /// The customer explicitly refused a furniture lift
    pub lift_refused: bool,
}

/// Input record of a quote computation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub service_type: ServiceType,

    #[serde(default)]
    pub pickup: Address,

    #[serde(default)]
    pub delivery: Address,

    /// Floor number at pickup (0 = ground floor)
    #[serde(default)]
    pub pickup_floor: i32,

    #[serde(default)]
    pub delivery_floor: i32,

    #[serde(default)]
    pub pickup_has_elevator: bool,

    #[serde(default)]
    pub delivery_has_elevator: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub move_date: Option<NaiveDate>,

    /// Estimated volume in cubic meters
    #[serde(default)]
    pub volume_m3: f64,

    /// Road distance between pickup and delivery in kilometers
    #[serde(default)]
    pub distance_km: f64,

    /// Value of the goods declared by the customer
    #[serde(default)]
    pub declared_value: f64,

    #[serde(default)]
    pub flags: RequestFlags,
}

impl QuoteRequest {
    /// Create a request for the given service with every other field empty
    pub fn new(service_type: ServiceType) -> Self {
        Self {
            service_type,
            pickup: Address::default(),
            delivery: Address::default(),
            pickup_floor: 0,
            delivery_floor: 0,
            pickup_has_elevator: false,
            delivery_has_elevator: false,
            move_date: None,
            volume_m3: 0.0,
            distance_km: 0.0,
            declared_value: 0.0,
            flags: RequestFlags::default(),
        }
    }

    pub fn with_pickup(mut self, address: Address, floor: i32, has_elevator: bool) -> Self {
        self.pickup = address;
        self.pickup_floor = floor;
        self.pickup_has_elevator = has_elevator;
        self
    }

    pub fn with_delivery(mut self, address: Address, floor: i32, has_elevator: bool) -> Self {
        self.delivery = address;
        self.delivery_floor = floor;
        self.delivery_has_elevator = has_elevator;
        self
    }

    pub fn with_move_date(mut self, date: NaiveDate) -> Self {
        self.move_date = Some(date);
        self
    }

    pub fn with_volume(mut self, volume_m3: f64) -> Self {
        self.volume_m3 = volume_m3;
        self
    }

    pub fn with_distance(mut self, distance_km: f64) -> Self {
        self.distance_km = distance_km;
        self
    }

    pub fn with_declared_value(mut self, value: f64) -> Self {
        self.declared_value = value;
        self
    }

    pub fn with_flags(mut self, flags: RequestFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn floor(&self, side: Side) -> i32 {
        match side {
            Side::Pickup => self.pickup_floor,
            Side::Delivery => self.delivery_floor,
        }
    }

    pub fn has_elevator(&self, side: Side) -> bool {
        match side {
            Side::Pickup => self.pickup_has_elevator,
            Side::Delivery => self.delivery_has_elevator,
        }
    }

    pub fn narrow_street(&self, side: Side) -> bool {
        match side {
            Side::Pickup => self.flags.pickup_narrow_street,
            Side::Delivery => self.flags.delivery_narrow_street,
        }
    }

    pub fn syndic_time_slot(&self, side: Side) -> bool {
        match side {
            Side::Pickup => self.flags.pickup_syndic_time_slot,
            Side::Delivery => self.flags.delivery_syndic_time_slot,
        }
    }

    pub fn address(&self, side: Side) -> &Address {
        match side {
            Side::Pickup => &self.pickup,
            Side::Delivery => &self.delivery,
        }
    }

    /// Reject numeric input that the upstream normalizer should never let through
    pub fn validate(&self) -> Result<()> {
        let amounts = [
            ("volume_m3", self.volume_m3),
            ("distance_km", self.distance_km),
            ("declared_value", self.declared_value),
        ];

        for (field, value) in amounts {
            if !value.is_finite() {
                return Err(RuleError::invalid_value(field, "must be a finite number"));
            }
            if value < 0.0 {
                return Err(RuleError::invalid_value(
                    field,
                    format!("must not be negative (got {})", value),
                ));
            }
        }

        Ok(())
    }
}
