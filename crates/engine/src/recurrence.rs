//! Billing-date recurrence calculator.
//!
//! Pure date arithmetic, no store access. Month-based frequencies clamp to
//! the last day of the target month (Jan 31 + 1 month = Feb 29 in leap
//! years, Feb 28 otherwise).

use chrono::{Days, Months, NaiveDate};

use crate::{BillingFrequency, EngineError, MoneyCents, ResultEngine};

/// Computes the billing date following `current` for the given frequency.
pub fn next_billing_date(
    current: NaiveDate,
    frequency: BillingFrequency,
) -> ResultEngine<NaiveDate> {
    let next = match frequency {
        BillingFrequency::Weekly => current.checked_add_days(Days::new(7)),
        BillingFrequency::Monthly => current.checked_add_months(Months::new(1)),
        BillingFrequency::Quarterly => current.checked_add_months(Months::new(3)),
        BillingFrequency::Yearly => current.checked_add_months(Months::new(12)),
    };
    next.ok_or_else(|| EngineError::InvalidInput("billing date out of range".to_string()))
}

/// Normalizes a recurring amount to its monthly equivalent, rounded to the
/// nearest cent.
///
/// WEEKLY × 4.33, MONTHLY × 1, QUARTERLY ÷ 3, YEARLY ÷ 12.
pub fn monthly_equivalent(amount: MoneyCents, frequency: BillingFrequency) -> MoneyCents {
    let cents = amount.cents() as f64;
    let normalized = match frequency {
        BillingFrequency::Weekly => cents * 4.33,
        BillingFrequency::Monthly => cents,
        BillingFrequency::Quarterly => cents / 3.0,
        BillingFrequency::Yearly => cents / 12.0,
    };
    MoneyCents::new(normalized.round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn weekly_adds_seven_days() {
        assert_eq!(
            next_billing_date(date(2024, 2, 26), BillingFrequency::Weekly).unwrap(),
            date(2024, 3, 4)
        );
    }

    #[test]
    fn monthly_preserves_day_when_valid() {
        assert_eq!(
            next_billing_date(date(2024, 3, 15), BillingFrequency::Monthly).unwrap(),
            date(2024, 4, 15)
        );
    }

    #[test]
    fn monthly_clamps_to_end_of_month() {
        assert_eq!(
            next_billing_date(date(2024, 1, 31), BillingFrequency::Monthly).unwrap(),
            date(2024, 2, 29)
        );
        assert_eq!(
            next_billing_date(date(2023, 1, 31), BillingFrequency::Monthly).unwrap(),
            date(2023, 2, 28)
        );
    }

    #[test]
    fn quarterly_and_yearly() {
        assert_eq!(
            next_billing_date(date(2024, 11, 30), BillingFrequency::Quarterly).unwrap(),
            date(2025, 2, 28)
        );
        assert_eq!(
            next_billing_date(date(2024, 2, 29), BillingFrequency::Yearly).unwrap(),
            date(2025, 2, 28)
        );
    }

    #[test]
    fn monthly_equivalents() {
        assert_eq!(
            monthly_equivalent(MoneyCents::new(1000), BillingFrequency::Weekly).cents(),
            4330
        );
        assert_eq!(
            monthly_equivalent(MoneyCents::new(1000), BillingFrequency::Monthly).cents(),
            1000
        );
        assert_eq!(
            monthly_equivalent(MoneyCents::new(1000), BillingFrequency::Quarterly).cents(),
            333
        );
        assert_eq!(
            monthly_equivalent(MoneyCents::new(1000), BillingFrequency::Yearly).cents(),
            83
        );
    }
}
