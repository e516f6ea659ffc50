//! Common test utilities for SDK integration tests

#![allow(dead_code)]

use chrono::NaiveDate;
use relo_sdk::{Address, QuoteEngine, QuoteEngineBuilder, QuoteRequest, RequestFlags, ServiceType};

/// Engine with the standard catalog and tracing enabled
pub fn traced_engine() -> QuoteEngine {
    QuoteEngineBuilder::new()
        .enable_tracing(true)
        .build()
        .expect("standard catalog must compile")
}

/// Test helper to build quote requests field by field
pub struct RequestBuilder {
    request: QuoteRequest,
}

impl RequestBuilder {
    /// Ground floor to ground floor, 15 m3, 10 km
    pub fn moving() -> Self {
        Self {
            request: QuoteRequest::new(ServiceType::Moving)
                .with_pickup(Address::new("12 rue des Lilas", "75020", "Paris"), 0, false)
                .with_delivery(Address::new("4 place Bellecour", "69002", "Lyon"), 0, false)
                .with_volume(15.0)
                .with_distance(10.0),
        }
    }

    pub fn cleaning() -> Self {
        Self {
            request: QuoteRequest::new(ServiceType::Cleaning)
                .with_pickup(Address::new("12 rue des Lilas", "75020", "Paris"), 0, false),
        }
    }

    pub fn delivery_floor(mut self, floor: i32, elevator: bool) -> Self {
        self.request.delivery_floor = floor;
        self.request.delivery_has_elevator = elevator;
        self
    }

    pub fn pickup_floor(mut self, floor: i32, elevator: bool) -> Self {
        self.request.pickup_floor = floor;
        self.request.pickup_has_elevator = elevator;
        self
    }

    pub fn volume(mut self, volume_m3: f64) -> Self {
        self.request.volume_m3 = volume_m3;
        self
    }

    pub fn distance(mut self, distance_km: f64) -> Self {
        self.request.distance_km = distance_km;
        self
    }

    pub fn declared_value(mut self, value: f64) -> Self {
        self.request.declared_value = value;
        self
    }

    pub fn on(mut self, year: i32, month: u32, day: u32) -> Self {
        self.request.move_date = NaiveDate::from_ymd_opt(year, month, day);
        self
    }

    pub fn flags(mut self, update: impl FnOnce(&mut RequestFlags)) -> Self {
        update(&mut self.request.flags);
        self
    }

    pub fn build(self) -> QuoteRequest {
        self.request
    }
}
