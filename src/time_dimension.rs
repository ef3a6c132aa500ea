use chrono::{Datelike, Duration, NaiveDate, Utc};
use log::{error, info};
use serde::{Deserialize, Serialize};

use crate::api::DimensionApi;
use crate::coercion::{format_with_pattern, parse_date, to_chrono_pattern};

/// Granularity levels of a time hierarchy, coarse to fine.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TimeLevel {
    Year,
    HalfYear,
    Quarter,
    Month,
    Week,
    Day,
}

impl TimeLevel {
    /// Months per period for the month-aligned levels.
    fn months(self) -> Option<i32> {
        match self {
            TimeLevel::Year => Some(12),
            TimeLevel::HalfYear => Some(6),
            TimeLevel::Quarter => Some(3),
            TimeLevel::Month => Some(1),
            TimeLevel::Week | TimeLevel::Day => None,
        }
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct TimeDimensionConfig {
    pub name: String,
    /// Month the fiscal year starts in, 1 = January
    pub fiscal_year_start_month: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub levels: Vec<TimeLevel>,
    pub date_format: String,
}

impl Default for TimeDimensionConfig {
    fn default() -> Self {
        let year = Utc::now().date_naive().year();
        TimeDimensionConfig {
            name: String::new(),
            fiscal_year_start_month: 1,
            start_date: NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or_default(),
            end_date: NaiveDate::from_ymd_opt(year, 12, 31).unwrap_or_default(),
            levels: vec![TimeLevel::Year, TimeLevel::Quarter, TimeLevel::Month],
            date_format: "DD/MM/YYYY".to_string(),
        }
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    General,
    Levels,
    Review,
}

#[derive(Clone, Serialize, Debug, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: &str) -> Self {
        FieldError {
            field,
            message: message.to_string(),
        }
    }
}

/// One member of the finest level, shown on the review step.
#[derive(Clone, Serialize, Debug, PartialEq, Eq)]
pub struct Period {
    pub label: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    Saved(Option<String>),
    Invalid(Vec<FieldError>),
    /// A submission is already in flight
    Busy,
    Failed(String),
}

/// Month arithmetic on the first day of a month.
fn add_months(date: NaiveDate, months: i32) -> Option<NaiveDate> {
    let total = date.year() * 12 + date.month0() as i32 + months;
    NaiveDate::from_ymd_opt(total.div_euclid(12), total.rem_euclid(12) as u32 + 1, 1)
}

/// Fiscal years are named after the calendar year they end in.
pub fn fiscal_year(date: NaiveDate, start_month: u32) -> i32 {
    if start_month <= 1 || date.month() < start_month {
        date.year()
    } else {
        date.year() + 1
    }
}

/// Months elapsed since the start of the fiscal year containing `date`.
fn fiscal_offset(date: NaiveDate, start_month: u32) -> i32 {
    (date.month0() as i32 - (start_month as i32 - 1)).rem_euclid(12)
}

impl TimeDimensionConfig {
    pub fn validate_general(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if self.name.trim().is_empty() {
            errors.push(FieldError::new("name", "Name is required"));
        }
        if !(1..=12).contains(&self.fiscal_year_start_month) {
            errors.push(FieldError::new(
                "fiscal_year_start_month",
                "Fiscal year must start in a month between 1 and 12",
            ));
        }
        if self.start_date >= self.end_date {
            errors.push(FieldError::new("end_date", "End date must be after start date"));
        }
        errors
    }

    pub fn validate_levels(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if !self.levels.contains(&TimeLevel::Year) {
            errors.push(FieldError::new("levels", "Year level is required"));
        }
        if !is_valid_date_format(&self.date_format) {
            errors.push(FieldError::new("date_format", "Date format is not valid"));
        }
        errors
    }

    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = self.validate_general();
        errors.extend(self.validate_levels());
        errors
    }

    pub fn finest_level(&self) -> TimeLevel {
        self.levels.iter().copied().max().unwrap_or(TimeLevel::Year)
    }

    fn period_label(&self, level: TimeLevel, start: NaiveDate) -> String {
        let fy = fiscal_year(start, self.fiscal_year_start_month);
        let offset = fiscal_offset(start, self.fiscal_year_start_month);
        match level {
            TimeLevel::Year => format!("FY{}", fy),
            TimeLevel::HalfYear => format!("H{} FY{}", offset / 6 + 1, fy),
            TimeLevel::Quarter => format!("Q{} FY{}", offset / 3 + 1, fy),
            TimeLevel::Month => start.format("%b %Y").to_string(),
            TimeLevel::Week => {
                let week = start.iso_week();
                format!("{}-W{:02}", week.year(), week.week())
            }
            TimeLevel::Day => format_with_pattern(start, &to_chrono_pattern(&self.date_format))
                .unwrap_or_else(|| start.to_string()),
        }
    }

    /// First `limit` periods of the finest level between start and end date.
    pub fn preview(&self, limit: usize) -> Vec<Period> {
        let level = self.finest_level();
        let mut periods = Vec::new();

        let (mut start, step_days, step_months) = match level.months() {
            Some(months) => {
                let first = self.start_date.with_day(1).unwrap_or(self.start_date);
                let offset = fiscal_offset(first, self.fiscal_year_start_month);
                match add_months(first, -(offset % months)) {
                    Some(aligned) => (aligned, 0, months),
                    None => return periods,
                }
            }
            None if level == TimeLevel::Week => {
                let back = self.start_date.weekday().num_days_from_monday() as i64;
                (self.start_date - Duration::days(back), 7, 0)
            }
            None => (self.start_date, 1, 0),
        };

        while start <= self.end_date && periods.len() < limit {
            let next = if step_months > 0 {
                match add_months(start, step_months) {
                    Some(next) => next,
                    None => break,
                }
            } else {
                start + Duration::days(step_days)
            };
            let end = next.pred_opt().unwrap_or(start);

            periods.push(Period {
                label: self.period_label(level, start),
                start,
                end,
            });
            start = next;
        }

        periods
    }
}

/// A format is usable when a sample date survives a format/parse round trip.
pub fn is_valid_date_format(format: &str) -> bool {
    if format.trim().is_empty() {
        return false;
    }
    let sample = match NaiveDate::from_ymd_opt(2024, 11, 28) {
        Some(date) => date,
        None => return false,
    };
    format_with_pattern(sample, &to_chrono_pattern(format))
        .and_then(|text| parse_date(&text, Some(format)))
        == Some(sample)
}

/// Multi-step form that creates or edits a time dimension.
#[derive(Clone, Debug)]
pub struct TimeDimensionWizard {
    step: WizardStep,
    config: TimeDimensionConfig,
    dimension_id: Option<String>,
    saving: bool,
}

impl Default for TimeDimensionWizard {
    fn default() -> Self {
        TimeDimensionWizard::new()
    }
}

impl TimeDimensionWizard {
    pub fn new() -> Self {
        TimeDimensionWizard {
            step: WizardStep::General,
            config: TimeDimensionConfig::default(),
            dimension_id: None,
            saving: false,
        }
    }

    /// Reopen the wizard on an existing time dimension.
    pub fn for_existing(id: &str, config: TimeDimensionConfig) -> Self {
        let mut wizard = TimeDimensionWizard {
            step: WizardStep::General,
            config,
            dimension_id: Some(id.to_string()),
            saving: false,
        };
        wizard.normalize_levels();
        wizard
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn config(&self) -> &TimeDimensionConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut TimeDimensionConfig {
        &mut self.config
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    pub fn is_update(&self) -> bool {
        self.dimension_id.is_some()
    }

    fn normalize_levels(&mut self) {
        let levels = &mut self.config.levels;
        if !levels.contains(&TimeLevel::Year) {
            levels.push(TimeLevel::Year);
        }
        levels.sort();
        levels.dedup();
    }

    /// Add or remove a level. Year always stays.
    pub fn toggle_level(&mut self, level: TimeLevel) {
        if level == TimeLevel::Year {
            return;
        }
        if let Some(pos) = self.config.levels.iter().position(|l| *l == level) {
            self.config.levels.remove(pos);
        } else {
            self.config.levels.push(level);
        }
        self.normalize_levels();
    }

    /// Validate the current step and move forward.
    pub fn next(&mut self) -> Result<WizardStep, Vec<FieldError>> {
        let errors = match self.step {
            WizardStep::General => self.config.validate_general(),
            WizardStep::Levels => self.config.validate_levels(),
            WizardStep::Review => Vec::new(),
        };
        if !errors.is_empty() {
            return Err(errors);
        }

        self.step = match self.step {
            WizardStep::General => WizardStep::Levels,
            WizardStep::Levels | WizardStep::Review => WizardStep::Review,
        };
        Ok(self.step)
    }

    pub fn back(&mut self) -> WizardStep {
        self.step = match self.step {
            WizardStep::General | WizardStep::Levels => WizardStep::General,
            WizardStep::Review => WizardStep::Levels,
        };
        self.step
    }

    pub async fn submit<A: DimensionApi>(&mut self, api: &A) -> SubmitOutcome {
        if self.saving {
            return SubmitOutcome::Busy;
        }
        let errors = self.config.validate();
        if !errors.is_empty() {
            return SubmitOutcome::Invalid(errors);
        }

        self.saving = true;
        let result = api
            .save_time_dimension(self.dimension_id.as_deref(), &self.config)
            .await;
        self.saving = false;

        match result {
            Ok(reply) => {
                info!("saved time dimension {}", self.config.name);
                SubmitOutcome::Saved(reply.message)
            }
            Err(e) => {
                error!("failed to save time dimension {}: {}", self.config.name, e);
                SubmitOutcome::Failed(e.to_string())
            }
        }
    }
}
