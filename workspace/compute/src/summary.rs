use chrono::NaiveDate;
use common::SummaryTiles;
use polars::prelude::*;

use crate::error::Result;
use crate::table::{CONSUMPTION, PRODUCTION, RECORDED_PRICE, TEMPERATURE};

fn mean(df: &DataFrame, column: &str) -> Result<Option<f64>> {
    let series = df
        .column(column)?
        .as_materialized_series()
        .cast(&DataType::Float64)?;
    Ok(series.f64()?.mean().filter(|v| v.is_finite()))
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Averages shown in the tiles, taken over the forecast horizon.
///
/// Production and consumption are reported in MW / MWh.
pub fn summarize(forecast: &DataFrame, today: NaiveDate) -> Result<SummaryTiles> {
    Ok(SummaryTiles {
        today,
        today_label: today.format("%b %d, %Y").to_string(),
        avg_temperature_c: mean(forecast, TEMPERATURE)?.map(round2),
        avg_production_mw: mean(forecast, PRODUCTION)?.map(|kw| round2(kw / 1000.0)),
        avg_consumption_mwh: mean(forecast, CONSUMPTION)?.map(|kwh| round2(kwh / 1000.0)),
        avg_price_c_per_kwh: mean(forecast, RECORDED_PRICE)?.map(round2),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{Observation, observations_to_table};
    use crate::testing::{date, ts};

    fn row(hour: u32, temperature_c: f64, price: Option<f64>) -> Observation {
        Observation {
            timestamp: ts(2024, 3, 1, hour),
            temperature_c,
            wind_speed_ms: 4.0,
            solar_irradiance_wm2: 0.0,
            production_kw: 8_000_500.0,
            consumption_kwh: 9_000_000.0,
            price_c_per_kwh: price,
        }
    }

    #[test]
    fn averages_convert_units_and_skip_missing_prices() {
        let table = observations_to_table(&[
            row(0, -1.0, Some(5.0)),
            row(1, 2.333, None),
            row(2, 0.0, Some(7.5)),
        ])
        .unwrap();

        let tiles = summarize(&table, date(2024, 3, 1)).unwrap();

        assert_eq!(tiles.today_label, "Mar 01, 2024");
        assert_eq!(tiles.avg_temperature_c, Some(0.44));
        assert_eq!(tiles.avg_production_mw, Some(8000.5));
        assert_eq!(tiles.avg_consumption_mwh, Some(9000.0));
        assert_eq!(tiles.avg_price_c_per_kwh, Some(6.25));
    }

    #[test]
    fn empty_forecast_has_no_averages() {
        let table = observations_to_table(&[]).unwrap();
        let tiles = summarize(&table, date(2024, 3, 1)).unwrap();

        assert_eq!(tiles.avg_temperature_c, None);
        assert_eq!(tiles.avg_price_c_per_kwh, None);
    }
}
