use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Flight {
    pub id: Uuid,
    pub airline: String,
    pub flight_number: String,
    pub origin: String,
    pub destination: String,
    pub departure_at: DateTime<Utc>,
    pub arrival_at: DateTime<Utc>,
    /// 最小货币单位（分）
    pub price: i64,
    pub seats_available: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewFlight {
    pub airline: String,
    pub flight_number: String,
    pub origin: String,
    pub destination: String,
    pub departure_at: DateTime<Utc>,
    pub arrival_at: DateTime<Utc>,
    pub price: i64,
    pub seats_available: i32,
}

impl Flight {
    pub fn new(input: NewFlight) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            airline: input.airline.trim().to_string(),
            flight_number: input.flight_number.trim().to_uppercase(),
            origin: input.origin.trim().to_string(),
            destination: input.destination.trim().to_string(),
            departure_at: input.departure_at,
            arrival_at: input.arrival_at,
            price: input.price,
            seats_available: input.seats_available,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn has_valid_schedule(&self) -> bool {
        self.arrival_at > self.departure_at
    }
}
