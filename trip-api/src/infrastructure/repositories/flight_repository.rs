use async_trait::async_trait;
use sqlx::MySqlPool;
use uuid::Uuid;

use super::{map_write_error, to_total};
use crate::domain::models::flight::Flight;
use crate::domain::repositories::{BaseRepository, FlightRepository};
use crate::error::AppResult;
use crate::utils::pagination::{Page, PageRequest};

const COLUMNS: &str = "id, airline, flight_number, origin, destination, departure_at, arrival_at, \
                       price, seats_available, created_at, updated_at";

pub struct MySqlFlightRepository {
    pool: MySqlPool,
}

impl MySqlFlightRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaseRepository<Flight> for MySqlFlightRepository {
    async fn create(&self, flight: &Flight) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO flights (id, airline, flight_number, origin, destination, departure_at, arrival_at,
                                 price, seats_available, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(flight.id)
        .bind(&flight.airline)
        .bind(&flight.flight_number)
        .bind(&flight.origin)
        .bind(&flight.destination)
        .bind(flight.departure_at)
        .bind(flight.arrival_at)
        .bind(flight.price)
        .bind(flight.seats_available)
        .bind(flight.created_at)
        .bind(flight.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "flight"))?;

        Ok(())
    }

    async fn find(&self, page: PageRequest) -> AppResult<Page<Flight>> {
        self.search(None, None, page).await
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Flight>> {
        let flight = sqlx::query_as::<_, Flight>(&format!("SELECT {} FROM flights WHERE id = ?", COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(flight)
    }

    async fn update(&self, flight: &Flight) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE flights
            SET airline = ?, flight_number = ?, origin = ?, destination = ?, departure_at = ?, arrival_at = ?,
                price = ?, seats_available = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&flight.airline)
        .bind(&flight.flight_number)
        .bind(&flight.origin)
        .bind(&flight.destination)
        .bind(flight.departure_at)
        .bind(flight.arrival_at)
        .bind(flight.price)
        .bind(flight.seats_available)
        .bind(flight.updated_at)
        .bind(flight.id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM flights WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl FlightRepository for MySqlFlightRepository {
    async fn search(
        &self,
        origin: Option<String>,
        destination: Option<String>,
        page: PageRequest,
    ) -> AppResult<Page<Flight>> {
        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM flights
            WHERE (? IS NULL OR origin LIKE ?) AND (? IS NULL OR destination LIKE ?)
            "#,
        )
        .bind(&origin)
        .bind(&origin)
        .bind(&destination)
        .bind(&destination)
        .fetch_one(&self.pool)
        .await?;

        let items = sqlx::query_as::<_, Flight>(&format!(
            r#"
            SELECT {} FROM flights
            WHERE (? IS NULL OR origin LIKE ?) AND (? IS NULL OR destination LIKE ?)
            ORDER BY departure_at ASC
            LIMIT ? OFFSET ?
            "#,
            COLUMNS
        ))
        .bind(&origin)
        .bind(&origin)
        .bind(&destination)
        .bind(&destination)
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(Page::new(items, to_total(total), page))
    }
}
