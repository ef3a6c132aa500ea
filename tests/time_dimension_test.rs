mod common;

use chrono::NaiveDate;
use common::MockApi;
use dimgrid::time_dimension::{
    SubmitOutcome, TimeDimensionConfig, TimeDimensionWizard, TimeLevel, WizardStep, fiscal_year,
    is_valid_date_format,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn fiscal_config(levels: Vec<TimeLevel>) -> TimeDimensionConfig {
    TimeDimensionConfig {
        name: "Fiscal".to_string(),
        fiscal_year_start_month: 4,
        start_date: date(2024, 4, 1),
        end_date: date(2025, 3, 31),
        levels,
        date_format: "DD/MM/YYYY".to_string(),
    }
}

#[test]
fn test_fiscal_year_naming() {
    assert_eq!(fiscal_year(date(2024, 3, 31), 4), 2024);
    assert_eq!(fiscal_year(date(2024, 4, 1), 4), 2025);
    assert_eq!(fiscal_year(date(2024, 12, 31), 1), 2024);
    println!("✓ Fiscal years are named after the year they end in");
}

#[test]
fn test_fiscal_quarters() {
    let config = fiscal_config(vec![TimeLevel::Year, TimeLevel::Quarter]);
    let periods = config.preview(10);

    let labels: Vec<&str> = periods.iter().map(|p| p.label.as_str()).collect();
    assert_eq!(labels, vec!["Q1 FY2025", "Q2 FY2025", "Q3 FY2025", "Q4 FY2025"]);
    assert_eq!(periods[0].start, date(2024, 4, 1));
    assert_eq!(periods[0].end, date(2024, 6, 30));
    assert_eq!(periods[3].start, date(2025, 1, 1));
    assert_eq!(periods[3].end, date(2025, 3, 31));
    println!("✓ Quarters follow the fiscal year start");
}

#[test]
fn test_half_years_and_months() {
    let halves = fiscal_config(vec![TimeLevel::Year, TimeLevel::HalfYear]).preview(10);
    let labels: Vec<&str> = halves.iter().map(|p| p.label.as_str()).collect();
    assert_eq!(labels, vec!["H1 FY2025", "H2 FY2025"]);
    assert_eq!(halves[1].start, date(2024, 10, 1));

    let months = fiscal_config(vec![TimeLevel::Year, TimeLevel::Month]).preview(3);
    let labels: Vec<&str> = months.iter().map(|p| p.label.as_str()).collect();
    assert_eq!(labels, vec!["Apr 2024", "May 2024", "Jun 2024"]);
    println!("✓ Half years and months preview with their labels");
}

#[test]
fn test_year_aligns_to_fiscal_start() {
    let config = TimeDimensionConfig {
        name: "Calendar".to_string(),
        fiscal_year_start_month: 1,
        start_date: date(2024, 3, 15),
        end_date: date(2025, 6, 30),
        levels: vec![TimeLevel::Year],
        date_format: "DD/MM/YYYY".to_string(),
    };
    let periods = config.preview(10);
    assert_eq!(periods.len(), 2);
    assert_eq!(periods[0].label, "FY2024");
    assert_eq!(periods[0].start, date(2024, 1, 1));
    assert_eq!(periods[1].end, date(2025, 12, 31));
    println!("✓ Year periods start on the fiscal year boundary");
}

#[test]
fn test_weeks_and_days() {
    let mut config = fiscal_config(vec![TimeLevel::Year, TimeLevel::Week]);
    config.start_date = date(2024, 4, 10);
    let weeks = config.preview(2);
    assert_eq!(weeks[0].label, "2024-W15");
    assert_eq!(weeks[0].start, date(2024, 4, 8));
    assert_eq!(weeks[0].end, date(2024, 4, 14));
    assert_eq!(weeks[1].label, "2024-W16");

    config.levels = vec![TimeLevel::Year, TimeLevel::Day];
    let days = config.preview(2);
    assert_eq!(days[0].label, "10/04/2024");
    assert_eq!(days[1].label, "11/04/2024");
    println!("✓ Weeks start on Monday and days use the date format");
}

#[test]
fn test_validation() {
    let mut config = fiscal_config(vec![TimeLevel::Year]);
    assert!(config.validate().is_empty());

    config.name = "  ".to_string();
    config.fiscal_year_start_month = 13;
    config.end_date = config.start_date;
    let fields: Vec<&str> = config.validate_general().iter().map(|e| e.field).collect();
    assert_eq!(fields, vec!["name", "fiscal_year_start_month", "end_date"]);

    let mut config = fiscal_config(vec![TimeLevel::Month]);
    config.date_format = "QQ".to_string();
    let fields: Vec<&str> = config.validate_levels().iter().map(|e| e.field).collect();
    assert_eq!(fields, vec!["levels", "date_format"]);
    println!("✓ Each wizard step validates its own fields");
}

#[test]
fn test_date_format_check() {
    assert!(is_valid_date_format("DD/MM/YYYY"));
    assert!(is_valid_date_format("YYYY-MM-DD"));
    assert!(is_valid_date_format("%d.%m.%Y"));
    assert!(!is_valid_date_format(""));
    assert!(!is_valid_date_format("QQ"));
    assert!(!is_valid_date_format("%Q"));
    println!("✓ Date formats are checked with a round trip");
}

#[test]
fn test_wizard_steps() {
    let mut wizard = TimeDimensionWizard::new();
    assert_eq!(wizard.step(), WizardStep::General);
    assert!(wizard.next().is_err());

    wizard.config_mut().name = "Fiscal".to_string();
    assert_eq!(wizard.next(), Ok(WizardStep::Levels));
    assert_eq!(wizard.next(), Ok(WizardStep::Review));
    assert_eq!(wizard.back(), WizardStep::Levels);
    assert_eq!(wizard.back(), WizardStep::General);
    assert_eq!(wizard.back(), WizardStep::General);
    println!("✓ Wizard only advances past valid steps");
}

#[test]
fn test_toggle_level_keeps_year() {
    let mut wizard = TimeDimensionWizard::new();
    wizard.toggle_level(TimeLevel::Year);
    assert!(wizard.config().levels.contains(&TimeLevel::Year));

    wizard.toggle_level(TimeLevel::Week);
    wizard.toggle_level(TimeLevel::Quarter);
    assert_eq!(
        wizard.config().levels,
        vec![TimeLevel::Year, TimeLevel::Month, TimeLevel::Week]
    );
    assert_eq!(wizard.config().finest_level(), TimeLevel::Week);

    let reopened = TimeDimensionWizard::for_existing("t1", fiscal_config(vec![TimeLevel::Month]));
    assert_eq!(reopened.config().levels, vec![TimeLevel::Year, TimeLevel::Month]);
    assert!(reopened.is_update());
    println!("✓ Year level cannot be removed");
}

#[tokio::test]
async fn test_submit_create_and_update() {
    let api = MockApi::new(vec![]);

    let mut wizard = TimeDimensionWizard::new();
    *wizard.config_mut() = fiscal_config(vec![TimeLevel::Year, TimeLevel::Quarter]);
    let outcome = wizard.submit(&api).await;
    assert_eq!(outcome, SubmitOutcome::Saved(Some("Time dimension saved".to_string())));
    assert!(!wizard.is_saving());

    let mut existing = TimeDimensionWizard::for_existing("t1", fiscal_config(vec![TimeLevel::Year]));
    existing.submit(&api).await;

    assert_eq!(api.calls(), vec!["create_time:Fiscal", "update_time:t1:Fiscal"]);
    println!("✓ New wizards create, reopened wizards update");
}

#[tokio::test]
async fn test_submit_invalid_and_failure() {
    let api = MockApi::new(vec![]);
    let mut wizard = TimeDimensionWizard::new();
    match wizard.submit(&api).await {
        SubmitOutcome::Invalid(errors) => assert_eq!(errors[0].field, "name"),
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert!(api.calls().is_empty());

    wizard.config_mut().name = "Fiscal".to_string();
    api.set_failing(true);
    assert!(matches!(wizard.submit(&api).await, SubmitOutcome::Failed(_)));
    assert!(!wizard.is_saving());
    println!("✓ Invalid forms never reach the server and failures release the lock");
}
