use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::domain::models::flight::{Flight, NewFlight};
use crate::domain::repositories::FlightRepository;
use crate::error::{AppError, AppResult};
use crate::utils::pagination::{Page, PageRequest};
use crate::utils::search::normalize_term;

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct FlightChanges {
    #[validate(length(min = 1, max = 120))]
    pub airline: Option<String>,
    #[validate(length(min = 1, max = 16))]
    pub flight_number: Option<String>,
    #[validate(length(min = 1, max = 120))]
    pub origin: Option<String>,
    #[validate(length(min = 1, max = 120))]
    pub destination: Option<String>,
    pub departure_at: Option<DateTime<Utc>>,
    pub arrival_at: Option<DateTime<Utc>>,
    pub price: Option<i64>,
    pub seats_available: Option<i32>,
}

pub struct FlightService {
    flights: Arc<dyn FlightRepository>,
}

impl FlightService {
    pub fn new(flights: Arc<dyn FlightRepository>) -> Self {
        Self { flights }
    }

    pub async fn search(
        &self,
        origin: Option<&str>,
        destination: Option<&str>,
        page: PageRequest,
    ) -> AppResult<Page<Flight>> {
        self.flights
            .search(normalize_term(origin), normalize_term(destination), page)
            .await
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Flight> {
        self.flights
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Flight with ID {} not found", id)))
    }

    pub async fn create(&self, input: NewFlight) -> AppResult<Flight> {
        let flight = Flight::new(input);
        check(&flight)?;

        self.flights.create(&flight).await?;
        tracing::info!(flight = %flight.id, number = %flight.flight_number, "flight created");
        Ok(flight)
    }

    pub async fn update(&self, id: Uuid, changes: FlightChanges) -> AppResult<Flight> {
        let mut flight = self.get(id).await?;

        if let Some(airline) = changes.airline {
            flight.airline = airline.trim().to_string();
        }
        if let Some(number) = changes.flight_number {
            flight.flight_number = number.trim().to_uppercase();
        }
        if let Some(origin) = changes.origin {
            flight.origin = origin.trim().to_string();
        }
        if let Some(destination) = changes.destination {
            flight.destination = destination.trim().to_string();
        }
        if let Some(departure_at) = changes.departure_at {
            flight.departure_at = departure_at;
        }
        if let Some(arrival_at) = changes.arrival_at {
            flight.arrival_at = arrival_at;
        }
        if let Some(price) = changes.price {
            flight.price = price;
        }
        if let Some(seats) = changes.seats_available {
            flight.seats_available = seats;
        }
        check(&flight)?;
        flight.updated_at = Utc::now();

        if !self.flights.update(&flight).await? {
            return Err(AppError::NotFound(format!("Flight with ID {} not found", id)));
        }
        Ok(flight)
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        if !self.flights.delete(id).await? {
            return Err(AppError::NotFound(format!("Flight with ID {} not found", id)));
        }
        Ok(())
    }
}

fn check(flight: &Flight) -> AppResult<()> {
    if !flight.has_valid_schedule() {
        return Err(AppError::Validation("Arrival must be after departure".to_string()));
    }
    if flight.price < 0 || flight.seats_available < 0 {
        return Err(AppError::Validation("Price and seats must not be negative".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::mocks::MockFlightRepo;
    use chrono::Duration;

    fn input(hours: i64, price: i64) -> NewFlight {
        let departure_at = Utc::now() + Duration::days(3);
        NewFlight {
            airline: "TAP".into(),
            flight_number: "tp1352".into(),
            origin: "Lisbon".into(),
            destination: "Madeira".into(),
            departure_at,
            arrival_at: departure_at + Duration::hours(hours),
            price,
            seats_available: 120,
        }
    }

    #[tokio::test]
    async fn rejects_arrival_before_departure() {
        let mut repo = MockFlightRepo::new();
        repo.expect_create().never();
        let service = FlightService::new(Arc::new(repo));

        assert!(matches!(service.create(input(-1, 9_900)).await, Err(AppError::Validation(_))));
        assert!(matches!(service.create(input(2, -1)).await, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn creates_valid_flight() {
        let mut repo = MockFlightRepo::new();
        repo.expect_create()
            .withf(|f| f.flight_number == "TP1352")
            .times(1)
            .returning(|_| Ok(()));

        let flight = FlightService::new(Arc::new(repo)).create(input(2, 9_900)).await.unwrap();
        assert_eq!(flight.price, 9_900);
    }

    #[tokio::test]
    async fn update_revalidates_schedule() {
        let existing = Flight::new(input(2, 9_900));
        let id = existing.id;
        let departure = existing.departure_at;
        let mut repo = MockFlightRepo::new();
        repo.expect_find_by_id().returning(move |_| Ok(Some(existing.clone())));
        repo.expect_update().never();

        let result = FlightService::new(Arc::new(repo))
            .update(
                id,
                FlightChanges {
                    arrival_at: Some(departure - Duration::minutes(5)),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn update_of_deleted_flight_is_not_found() {
        let existing = Flight::new(input(2, 9_900));
        let id = existing.id;
        let mut repo = MockFlightRepo::new();
        repo.expect_find_by_id().returning(move |_| Ok(Some(existing.clone())));
        repo.expect_update().times(1).returning(|_| Ok(false));

        let result = FlightService::new(Arc::new(repo))
            .update(
                id,
                FlightChanges {
                    price: Some(8_900),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
