use std::fmt;

use chrono::NaiveDate;
use thiserror::Error;

/// Format of the `date_submitted` column
pub const SUBMISSION_DATE_FORMAT: &str = "%Y-%m-%d";

/// How long ago a record was submitted, relative to a reference date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Recency {
    UnderOneWeek,
    OneToTwoWeeks,
    TwoToFourWeeks,
    OneToThreeMonths,
    ThreeToSixMonths,
    SixToNineMonths,
    NineToTwelveMonths,
    OneToThreeYears,
    ThreeToFiveYears,
    OverFiveYears,
}

/// Inclusive upper bound in days for each bucket, checked in order.
/// Anything past the last bound is [`Recency::OverFiveYears`].
pub const RECENCY_THRESHOLDS: [(i64, Recency); 9] = [
    (7, Recency::UnderOneWeek),
    (14, Recency::OneToTwoWeeks),
    (28, Recency::TwoToFourWeeks),
    (90, Recency::OneToThreeMonths),
    (180, Recency::ThreeToSixMonths),
    (270, Recency::SixToNineMonths),
    (365, Recency::NineToTwelveMonths),
    (1095, Recency::OneToThreeYears),
    (1826, Recency::ThreeToFiveYears),
];

/// Buckets that make a record part of the recent-updates table
pub const RECENT_UPDATES: [Recency; 2] = [Recency::UnderOneWeek, Recency::OneToTwoWeeks];

impl Recency {
    pub fn label(self) -> &'static str {
        match self {
            Recency::UnderOneWeek => "< 1 week",
            Recency::OneToTwoWeeks => "1-2 weeks ago",
            Recency::TwoToFourWeeks => "2-4 weeks ago",
            Recency::OneToThreeMonths => "1-3 months ago",
            Recency::ThreeToSixMonths => "3-6 months ago",
            Recency::SixToNineMonths => "6-9 months ago",
            Recency::NineToTwelveMonths => "9-12 months ago",
            Recency::OneToThreeYears => "1-3 years ago",
            Recency::ThreeToFiveYears => "3-5 years ago",
            Recency::OverFiveYears => "> 5 years",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::all().find(|r| r.label() == label)
    }

    pub fn all() -> impl Iterator<Item = Recency> {
        RECENCY_THRESHOLDS
            .into_iter()
            .map(|(_, recency)| recency)
            .chain(std::iter::once(Recency::OverFiveYears))
    }

    /// Bucket for a day count. Negative counts (submitted after the
    /// reference date) land in the first bucket.
    pub fn from_delta_days(delta: i64) -> Self {
        RECENCY_THRESHOLDS
            .iter()
            .find(|(bound, _)| delta <= *bound)
            .map(|(_, recency)| *recency)
            .unwrap_or(Recency::OverFiveYears)
    }

    pub fn is_recent(self) -> bool {
        RECENT_UPDATES.contains(&self)
    }
}

impl fmt::Display for Recency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Error, Debug)]
pub enum SubmissionDateError {
    #[error("expected a four-digit year, month and day separated by '-'")]
    Shape,

    #[error(transparent)]
    Invalid(#[from] chrono::ParseError),
}

/// Four-digit year, then one- or two-digit month and day. No signs or
/// whitespace anywhere.
fn has_submission_date_shape(value: &str) -> bool {
    let mut parts = value.split('-');
    let (Some(year), Some(month), Some(day), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return false;
    };
    let digits = |s: &str, min: usize, max: usize| {
        (min..=max).contains(&s.len()) && s.bytes().all(|b| b.is_ascii_digit())
    };
    digits(year, 4, 4) && digits(month, 1, 2) && digits(day, 1, 2)
}

pub fn parse_submission_date(value: &str) -> Result<NaiveDate, SubmissionDateError> {
    if !has_submission_date_shape(value) {
        return Err(SubmissionDateError::Shape);
    }
    Ok(NaiveDate::parse_from_str(value, SUBMISSION_DATE_FORMAT)?)
}

/// Whole days from `submitted` to `reference`
pub fn days_between(submitted: NaiveDate, reference: NaiveDate) -> i64 {
    reference.signed_duration_since(submitted).num_days()
}

/// Classify a `YYYY-MM-DD` submission date against the run's reference date.
pub fn classify(submitted: &str, reference: NaiveDate) -> Result<Recency, SubmissionDateError> {
    let submitted = parse_submission_date(submitted)?;
    Ok(Recency::from_delta_days(days_between(submitted, reference)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn reference() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 8, 15).unwrap()
    }

    fn submitted_days_before(days: i64) -> String {
        (reference() - Duration::days(days))
            .format(SUBMISSION_DATE_FORMAT)
            .to_string()
    }

    #[test]
    fn test_every_threshold_is_inclusive() {
        let mut previous = Recency::UnderOneWeek;
        for (bound, recency) in RECENCY_THRESHOLDS {
            assert_eq!(Recency::from_delta_days(bound), recency, "at {bound} days");
            assert_ne!(
                Recency::from_delta_days(bound + 1),
                recency,
                "one past {bound} days"
            );
            assert!(recency >= previous);
            previous = recency;
        }
    }

    #[test]
    fn test_boundary_labels() {
        let cases = [
            (7, "< 1 week"),
            (8, "1-2 weeks ago"),
            (14, "1-2 weeks ago"),
            (15, "2-4 weeks ago"),
            (28, "2-4 weeks ago"),
            (29, "1-3 months ago"),
            (90, "1-3 months ago"),
            (91, "3-6 months ago"),
            (180, "3-6 months ago"),
            (181, "6-9 months ago"),
            (270, "6-9 months ago"),
            (271, "9-12 months ago"),
            (365, "9-12 months ago"),
            (366, "1-3 years ago"),
            (1095, "1-3 years ago"),
            (1096, "3-5 years ago"),
            (1826, "3-5 years ago"),
            (1827, "> 5 years"),
        ];

        for (days, label) in cases {
            let recency = classify(&submitted_days_before(days), reference()).unwrap();
            assert_eq!(recency.label(), label, "{days} days before reference");
        }
    }

    #[test]
    fn test_future_submission_is_under_one_week() {
        let future = submitted_days_before(-30);
        assert_eq!(classify(&future, reference()).unwrap(), Recency::UnderOneWeek);
        assert_eq!(Recency::from_delta_days(i64::MIN), Recency::UnderOneWeek);
    }

    #[test]
    fn test_same_day_and_far_past() {
        assert_eq!(classify("2024-08-15", reference()).unwrap(), Recency::UnderOneWeek);
        assert_eq!(classify("1999-01-01", reference()).unwrap(), Recency::OverFiveYears);
    }

    #[test]
    fn test_classify_is_deterministic() {
        let first = classify("2024-07-01", reference()).unwrap();
        for _ in 0..5 {
            assert_eq!(classify("2024-07-01", reference()).unwrap(), first);
        }
        assert_eq!(first, Recency::OneToThreeMonths);
    }

    #[test]
    fn test_malformed_dates_are_errors() {
        for bad in [
            "",
            "2024",
            "2024-08",
            "15/08/2024",
            "2024-13-01",
            "2024-02-30",
            "2024-08-15T00:00:00",
            "unknown",
            "24-08-10",
            " 2024-08-10",
            "2024-08-10 ",
            "+2024-08-10",
            "2024-08- 1",
            "2024-+8-10",
            "02024-08-10",
            "2024-08-10-01",
        ] {
            assert!(classify(bad, reference()).is_err(), "{bad:?} should not parse");
        }
    }

    #[test]
    fn test_unpadded_month_and_day_are_accepted() {
        assert_eq!(
            parse_submission_date("2024-8-1").unwrap(),
            NaiveDate::from_ymd_opt(2024, 8, 1).unwrap()
        );
        assert!(matches!(
            parse_submission_date("24-08-10"),
            Err(SubmissionDateError::Shape)
        ));
        assert!(matches!(
            parse_submission_date("2024-13-01"),
            Err(SubmissionDateError::Invalid(_))
        ));
    }

    #[test]
    fn test_day_count_spans_leap_day() {
        let submitted = NaiveDate::from_ymd_opt(2024, 2, 28).unwrap();
        let reference = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(days_between(submitted, reference), 2);
    }

    #[test]
    fn test_labels_round_trip() {
        for recency in Recency::all() {
            assert_eq!(Recency::from_label(recency.label()), Some(recency));
            assert_eq!(recency.to_string(), recency.label());
        }
        assert_eq!(Recency::all().count(), 10);
        assert_eq!(Recency::from_label("yesterday"), None);
    }

    #[test]
    fn test_only_first_two_buckets_are_recent() {
        let recent: Vec<_> = Recency::all().filter(|r| r.is_recent()).collect();
        assert_eq!(recent, vec![Recency::UnderOneWeek, Recency::OneToTwoWeeks]);
    }
}
