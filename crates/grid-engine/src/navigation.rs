//! View navigation for the calendar grid.
//!
//! The grid shows one day, a Monday-to-Friday work week, or a full week, and can
//! open a month picker on top of the current view. [`NavigationState`] holds what
//! is visible; every user intent maps the current state to a new one, with no
//! side effects. The caller publishes the returned state.
//!
//! The state remembers the last concrete mode the user chose
//! ([`NavigationState::remembered_mode`]). Closing the month picker returns to
//! it, and picking a weekend day while it is [`DayMode::FiveDays`] temporarily
//! shows the full week without forgetting the preference.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::date_range::{is_weekday, monday_of, DateRange};
use crate::error::GridError;
use crate::gesture::{DragDelta, SwipeConfig, SwipeDirection};

/// Every mode the grid can be displayed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DisplayMode {
    OneDay,
    FiveDays,
    SevenDays,
    /// Month picker shown over the current range; owns no range of its own.
    MonthOverlay,
}

impl DisplayMode {
    pub const ALL: [DisplayMode; 4] = [
        DisplayMode::OneDay,
        DisplayMode::FiveDays,
        DisplayMode::SevenDays,
        DisplayMode::MonthOverlay,
    ];

    pub fn is_overlay(self) -> bool {
        self == DisplayMode::MonthOverlay
    }

    /// The concrete day mode, or `None` for the month overlay.
    pub fn day_mode(self) -> Option<DayMode> {
        match self {
            DisplayMode::OneDay => Some(DayMode::OneDay),
            DisplayMode::FiveDays => Some(DayMode::FiveDays),
            DisplayMode::SevenDays => Some(DayMode::SevenDays),
            DisplayMode::MonthOverlay => None,
        }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DisplayMode::OneDay => "one-day",
            DisplayMode::FiveDays => "five-days",
            DisplayMode::SevenDays => "seven-days",
            DisplayMode::MonthOverlay => "month-overlay",
        })
    }
}

impl FromStr for DisplayMode {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, GridError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "one-day" | "day" | "1" => Ok(DisplayMode::OneDay),
            "five-days" | "work-week" | "5" => Ok(DisplayMode::FiveDays),
            "seven-days" | "week" | "7" => Ok(DisplayMode::SevenDays),
            "month-overlay" | "month" => Ok(DisplayMode::MonthOverlay),
            other => Err(GridError::InvalidAction(format!(
                "unknown display mode '{}'",
                other
            ))),
        }
    }
}

/// A display mode that owns a date range (everything but the month overlay).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DayMode {
    OneDay,
    FiveDays,
    SevenDays,
}

impl From<DayMode> for DisplayMode {
    fn from(mode: DayMode) -> Self {
        match mode {
            DayMode::OneDay => DisplayMode::OneDay,
            DayMode::FiveDays => DisplayMode::FiveDays,
            DayMode::SevenDays => DisplayMode::SevenDays,
        }
    }
}

impl DayMode {
    /// The range this mode shows around `date`: the day itself, its work week,
    /// or its full week. `None` when that week runs off the calendar.
    pub fn range_containing(self, date: NaiveDate) -> Option<DateRange> {
        match self {
            DayMode::OneDay => Some(DateRange::single(date)),
            DayMode::FiveDays => DateRange::work_week_of(date),
            DayMode::SevenDays => DateRange::week_of(date),
        }
    }

    /// Days a swipe moves the range.
    fn swipe_step(self) -> i64 {
        match self {
            DayMode::OneDay => 1,
            DayMode::FiveDays | DayMode::SevenDays => 7,
        }
    }
}

/// Mode used when there is no prior state: the work week on weekdays, the
/// full week on weekends.
pub fn default_mode(today: NaiveDate) -> DayMode {
    if is_weekday(today) {
        DayMode::FiveDays
    } else {
        DayMode::SevenDays
    }
}

/// What the grid currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationState {
    pub active_mode: DisplayMode,
    pub visible_range: DateRange,
    /// Last concrete mode the user selected.
    pub remembered_mode: DayMode,
    pub overlay_visible: bool,
}

impl NavigationState {
    /// State for a freshly opened screen: the default mode for `today`,
    /// showing the range around `today`.
    ///
    /// In the partial weeks at either end of the calendar this falls back to
    /// one-day mode on `today`.
    pub fn initial(today: NaiveDate) -> Self {
        let default = default_mode(today);
        let (mode, visible_range) = match default.range_containing(today) {
            Some(range) => (default, range),
            None => (DayMode::OneDay, DateRange::single(today)),
        };
        NavigationState {
            active_mode: mode.into(),
            visible_range,
            remembered_mode: mode,
            overlay_visible: false,
        }
    }

    /// The user picked a mode from the mode selector.
    ///
    /// Choosing the month overlay keeps the current range and opens the picker.
    /// Choosing a concrete mode re-anchors the range on the Monday of the week
    /// that contains the current range's start. For [`DisplayMode::OneDay`],
    /// `today` is shown instead when it lies within the current range. If the
    /// new range would leave the calendar the state is returned unchanged.
    pub fn select_mode(&self, mode: DisplayMode, today: NaiveDate) -> Self {
        let Some(day_mode) = mode.day_mode() else {
            return NavigationState {
                active_mode: DisplayMode::MonthOverlay,
                overlay_visible: true,
                ..*self
            };
        };

        let visible_range = match day_mode {
            DayMode::OneDay if self.visible_range.contains(today) => {
                Some(DateRange::single(today))
            }
            _ => monday_of(self.visible_range.start())
                .and_then(|anchor| day_mode.range_containing(anchor)),
        };
        let Some(visible_range) = visible_range else {
            debug!(%mode, range = %self.visible_range, "mode change leaves the calendar");
            return *self;
        };

        NavigationState {
            active_mode: mode,
            visible_range,
            remembered_mode: day_mode,
            overlay_visible: false,
        }
    }

    /// The month picker closed, with `selected` as the chosen date or `None`
    /// when the user dismissed it.
    ///
    /// A chosen date is shown in the remembered mode, except that a Saturday or
    /// Sunday picked in five-day mode is shown in seven-day mode. The remembered
    /// mode itself never changes here. A date whose week is not representable
    /// closes the picker as a dismissal would.
    pub fn month_date_selected(&self, selected: Option<NaiveDate>) -> Self {
        let Some(date) = selected else {
            return self.dismiss_month_overlay();
        };

        let shown = match self.remembered_mode {
            DayMode::FiveDays if !is_weekday(date) => DayMode::SevenDays,
            remembered => remembered,
        };

        let Some(visible_range) = shown.range_containing(date) else {
            debug!(%date, "picked date has no representable week");
            return self.dismiss_month_overlay();
        };

        NavigationState {
            active_mode: shown.into(),
            visible_range,
            remembered_mode: self.remembered_mode,
            overlay_visible: false,
        }
    }

    /// Close the month picker without choosing a date.
    pub fn dismiss_month_overlay(&self) -> Self {
        NavigationState {
            active_mode: self.remembered_mode.into(),
            overlay_visible: false,
            ..*self
        }
    }

    /// Move the range one period in `direction`: one day in one-day mode,
    /// seven days otherwise (including while the month overlay is open).
    ///
    /// The mode never changes. At the edge of the representable calendar the
    /// state is returned unchanged.
    pub fn swipe(&self, direction: SwipeDirection) -> Self {
        let step = match self.active_mode.day_mode() {
            Some(mode) => mode.swipe_step(),
            None => 7,
        };
        match self.visible_range.shift_days(step * direction.sign()) {
            Some(visible_range) => NavigationState {
                visible_range,
                ..*self
            },
            None => *self,
        }
    }

    /// A drag gesture finished. Swipes if `config` recognizes it, otherwise
    /// returns the state unchanged.
    pub fn drag_ended(&self, delta: DragDelta, config: &SwipeConfig) -> Self {
        match config.recognize(delta) {
            Some(direction) => self.swipe(direction),
            None => *self,
        }
    }

    /// Apply any user intent.
    pub fn apply(&self, action: NavigationAction, today: NaiveDate, config: &SwipeConfig) -> Self {
        let next = match action {
            NavigationAction::SelectMode { mode } => self.select_mode(mode, today),
            NavigationAction::MonthDateSelected { date } => self.month_date_selected(date),
            NavigationAction::DismissMonthOverlay => self.dismiss_month_overlay(),
            NavigationAction::Swipe { direction } => self.swipe(direction),
            NavigationAction::Drag { dx, dy } => self.drag_ended(DragDelta::new(dx, dy), config),
        };
        debug!(
            %action,
            from = %self.active_mode,
            to = %next.active_mode,
            range = %next.visible_range,
            remembered = %DisplayMode::from(next.remembered_mode),
            "navigation transition"
        );
        next
    }
}

/// A user intent that changes what the grid shows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum NavigationAction {
    SelectMode { mode: DisplayMode },
    MonthDateSelected { date: Option<NaiveDate> },
    DismissMonthOverlay,
    Swipe { direction: SwipeDirection },
    Drag { dx: f32, dy: f32 },
}

impl fmt::Display for NavigationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavigationAction::SelectMode { mode } => write!(f, "mode:{}", mode),
            NavigationAction::MonthDateSelected { date: Some(date) } => write!(f, "pick:{}", date),
            NavigationAction::MonthDateSelected { date: None } => f.write_str("pick:none"),
            NavigationAction::DismissMonthOverlay => f.write_str("dismiss"),
            NavigationAction::Swipe { direction } => write!(f, "swipe:{}", direction),
            NavigationAction::Drag { dx, dy } => write!(f, "drag:{},{}", dx, dy),
        }
    }
}

/// Parses the compact textual form: `mode:<mode>`, `pick:<YYYY-MM-DD|none>`,
/// `dismiss`, `swipe:<next|prev>`, `drag:<dx>,<dy>`.
impl FromStr for NavigationAction {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, GridError> {
        let s = s.trim();
        let (verb, arg) = match s.split_once(':') {
            Some((verb, arg)) => (verb, Some(arg.trim())),
            None => (s, None),
        };

        let invalid = |msg: &str| GridError::InvalidAction(format!("'{}': {}", s, msg));

        match (verb.to_ascii_lowercase().as_str(), arg) {
            ("mode", Some(mode)) => Ok(NavigationAction::SelectMode {
                mode: mode.parse()?,
            }),
            ("pick", Some("none")) | ("pick", Some("")) => {
                Ok(NavigationAction::MonthDateSelected { date: None })
            }
            ("pick", Some(date)) => {
                let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
                    .map_err(|e| invalid(&format!("bad date: {}", e)))?;
                Ok(NavigationAction::MonthDateSelected { date: Some(date) })
            }
            ("dismiss", None) => Ok(NavigationAction::DismissMonthOverlay),
            ("swipe", Some(direction)) => Ok(NavigationAction::Swipe {
                direction: direction.parse()?,
            }),
            ("drag", Some(delta)) => {
                let (dx, dy) = delta
                    .split_once(',')
                    .ok_or_else(|| invalid("expected drag:<dx>,<dy>"))?;
                let dx = dx
                    .trim()
                    .parse()
                    .map_err(|_| invalid("dx is not a number"))?;
                let dy = dy
                    .trim()
                    .parse()
                    .map_err(|_| invalid("dy is not a number"))?;
                Ok(NavigationAction::Drag { dx, dy })
            }
            _ => Err(invalid("unknown action")),
        }
    }
}
