//! SeaORM entities backing the history side of the dashboard.
//!
//! Only past observations live in the database; forecast rows come from the
//! external forecast API and are never persisted.

pub mod price_history;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::price_history::Entity as PriceHistory;
}

#[cfg(test)]
mod test {
    use chrono::{NaiveDate, NaiveDateTime};
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{
        ActiveModelTrait, ColumnTrait, Database, DatabaseConnection, DbErr, EntityTrait,
        QueryFilter, QueryOrder, Set,
    };

    use super::*;
    use prelude::*;

    async fn setup_db() -> Result<DatabaseConnection, DbErr> {
        let db = Database::connect("sqlite::memory:").await?;
        Migrator::up(&db, None).await.expect("Migrations failed.");
        Ok(db)
    }

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn observation(timestamp: NaiveDateTime, price: Option<f64>) -> price_history::ActiveModel {
        price_history::ActiveModel {
            timestamp: Set(timestamp),
            temperature_c: Set(-3.5),
            wind_speed_ms: Set(6.2),
            solar_irradiance_wm2: Set(0.0),
            production_kw: Set(8_150_000.0),
            consumption_kwh: Set(9_420_000.0),
            price_c_per_kwh: Set(price),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_insert_and_query_range() -> Result<(), DbErr> {
        let db = setup_db().await?;

        observation(at(1, 0), Some(7.25)).insert(&db).await?;
        observation(at(1, 23), None).insert(&db).await?;
        observation(at(2, 0), Some(4.10)).insert(&db).await?;

        let rows = PriceHistory::find()
            .filter(price_history::Column::Timestamp.gte(at(1, 0)))
            .filter(price_history::Column::Timestamp.lte(at(1, 23)))
            .order_by_asc(price_history::Column::Timestamp)
            .all(&db)
            .await?;

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].price_c_per_kwh, Some(7.25));
        assert_eq!(rows[1].price_c_per_kwh, None);
        assert_eq!(rows[1].timestamp, at(1, 23));
        Ok(())
    }

    #[tokio::test]
    async fn test_timestamp_is_unique() -> Result<(), DbErr> {
        let db = setup_db().await?;

        observation(at(5, 12), Some(1.0)).insert(&db).await?;
        let duplicate = observation(at(5, 12), Some(2.0)).insert(&db).await;

        assert!(duplicate.is_err());
        Ok(())
    }
}
