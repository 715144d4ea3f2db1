use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PriceHistory::Table)
                    .if_not_exists()
                    .col(pk_auto(PriceHistory::Id))
                    .col(date_time(PriceHistory::Timestamp).unique_key())
                    .col(double(PriceHistory::TemperatureC))
                    .col(double(PriceHistory::WindSpeedMs))
                    .col(double(PriceHistory::SolarIrradianceWm2))
                    .col(double(PriceHistory::ProductionKw))
                    .col(double(PriceHistory::ConsumptionKwh))
                    .col(double_null(PriceHistory::PriceCPerKwh))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PriceHistory::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum PriceHistory {
    Table,
    Id,
    Timestamp,
    TemperatureC,
    WindSpeedMs,
    #[sea_orm(iden = "solar_irradiance_wm2")]
    SolarIrradianceWm2,
    ProductionKw,
    ConsumptionKwh,
    #[sea_orm(iden = "price_c_per_kwh")]
    PriceCPerKwh,
}
