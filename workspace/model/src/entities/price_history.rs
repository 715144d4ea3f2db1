use sea_orm::entity::prelude::*;

/// One hourly observation of weather, grid load and the recorded spot price.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "price_history")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Start of the hour the observation covers.
    #[sea_orm(unique)]
    pub timestamp: DateTime,
    /// Average temperature in °C.
    pub temperature_c: f64,
    /// Wind speed in m/s.
    pub wind_speed_ms: f64,
    /// Solar irradiance in W/m².
    pub solar_irradiance_wm2: f64,
    /// Electricity production in kW.
    pub production_kw: f64,
    /// Electricity consumption in kWh per hour.
    pub consumption_kwh: f64,
    /// Recorded spot price in cents per kWh, missing when not yet published.
    pub price_c_per_kwh: Option<f64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
