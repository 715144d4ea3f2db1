//! The two user actions and the state they drive.

use chrono::NaiveDate;
use common::{ChartKind, ChartSpec, DateRange, Notice, PlotType, Selection};
use tracing::debug;

use crate::range::RangeValidator;
use crate::table::{PREDICTED_PRICE, RECORDED_PRICE, TIMESTAMP};

/// A discrete user action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// "Show": apply the picker values and display options.
    Filter {
        start: NaiveDate,
        end: NaiveDate,
        plot_type: PlotType,
        show_recorded_price: bool,
    },
    /// "Reset": back to today with default display options.
    Reset,
}

/// Result of applying an action to a selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub selection: Selection,
    /// Values the date pickers should show afterwards.
    pub inputs: DateRange,
    /// Whether the data must be resolved again for `selection.range`.
    pub refresh: bool,
    pub notices: Vec<Notice>,
}

/// Applies `action` to `current`.
///
/// A rejected filter keeps the whole selection, display options included,
/// resets the pickers to today and asks for no refresh, so nothing is fetched.
pub fn apply(
    current: Selection,
    action: Action,
    validator: &RangeValidator,
    today: NaiveDate,
) -> Transition {
    match action {
        Action::Filter {
            start,
            end,
            plot_type,
            show_recorded_price,
        } => match validator.validate(start, end) {
            Ok(range) => {
                debug!(%start, %end, "Filter accepted");
                Transition {
                    selection: Selection {
                        range,
                        plot_type,
                        show_recorded_price,
                    },
                    inputs: range,
                    refresh: true,
                    notices: Vec::new(),
                }
            }
            Err(e) => Transition {
                selection: current,
                inputs: DateRange::single_day(today),
                refresh: false,
                notices: vec![e.notice()],
            },
        },
        Action::Reset => {
            let selection = Selection::for_today(today);
            Transition {
                selection,
                inputs: selection.range,
                refresh: true,
                notices: Vec::new(),
            }
        }
    }
}

/// Notice shown while a range is being resolved.
pub fn calculating_notice() -> Notice {
    Notice::info("Calculating", 2)
}

/// Chart description for the current display options.
pub fn chart_spec(selection: &Selection) -> ChartSpec {
    let mut y = vec![PREDICTED_PRICE.to_string()];
    if selection.show_recorded_price {
        y.push(RECORDED_PRICE.to_string());
    }

    let (kind, markers) = match selection.plot_type {
        PlotType::Line => (ChartKind::Line, true),
        PlotType::Bar => (ChartKind::GroupedBar, false),
    };

    ChartSpec {
        kind,
        x: TIMESTAMP.to_string(),
        y,
        x_title: "Time".to_string(),
        y_title: "Price (cent/KWh)".to_string(),
        markers,
    }
}
