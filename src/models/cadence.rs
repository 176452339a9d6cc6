use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Billing frequency of a pack. Each cadence maps to a fixed step in months.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionCadence {
    #[default]
    #[display("monthly")]
    Monthly,
    #[display("quarterly")]
    Quarterly,
    #[display("biannual")]
    Biannual,
    #[display("annual")]
    Annual,
    #[display("triennial")]
    Triennial,
    #[display("quinquennial")]
    Quinquennial,
}

impl SubscriptionCadence {
    /// Parses the cadence labels the backend sends, which appear in both
    /// English and French. Unknown or missing labels fall back to monthly.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "monthly" | "mensuel" => Self::Monthly,
            "quarterly" | "trimestriel" => Self::Quarterly,
            "biannual" | "semestriel" => Self::Biannual,
            "annual" | "yearly" | "annuel" => Self::Annual,
            "triennial" | "triennal" => Self::Triennial,
            "quinquennial" | "quinquennal" => Self::Quinquennial,
            _ => Self::Monthly,
        }
    }

    /// Step size of one billing period, in months.
    pub fn step(self) -> u32 {
        match self {
            Self::Monthly => 1,
            Self::Quarterly => 3,
            Self::Biannual => 6,
            Self::Annual => 12,
            Self::Triennial => 36,
            Self::Quinquennial => 60,
        }
    }

    /// Number of billing periods covered by `duration_months`, at least 1.
    pub fn periods(self, duration_months: u32) -> u32 {
        duration_months.div_ceil(self.step()).max(1)
    }

    /// Snaps a requested duration to the nearest multiple of the step,
    /// never below one step. Ties round up. Applied on every change so the
    /// stored duration is always a valid multiple.
    pub fn snap_duration(self, requested_months: u32) -> u32 {
        let step = self.step();
        let snapped = (requested_months + step / 2) / step * step;
        snapped.max(step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_per_cadence() {
        let expected = [
            (SubscriptionCadence::Monthly, 1),
            (SubscriptionCadence::Quarterly, 3),
            (SubscriptionCadence::Biannual, 6),
            (SubscriptionCadence::Annual, 12),
            (SubscriptionCadence::Triennial, 36),
            (SubscriptionCadence::Quinquennial, 60),
        ];

        for (cadence, step) in expected {
            assert_eq!(cadence.step(), step);
        }
    }

    #[test]
    fn test_from_label_both_languages() {
        assert_eq!(
            SubscriptionCadence::from_label("Mensuel"),
            SubscriptionCadence::Monthly
        );
        assert_eq!(
            SubscriptionCadence::from_label("trimestriel"),
            SubscriptionCadence::Quarterly
        );
        assert_eq!(
            SubscriptionCadence::from_label("semestriel"),
            SubscriptionCadence::Biannual
        );
        assert_eq!(
            SubscriptionCadence::from_label("yearly"),
            SubscriptionCadence::Annual
        );
        assert_eq!(
            SubscriptionCadence::from_label("triennal"),
            SubscriptionCadence::Triennial
        );
        assert_eq!(
            SubscriptionCadence::from_label("quinquennal"),
            SubscriptionCadence::Quinquennial
        );
    }

    #[test]
    fn test_from_label_unknown_defaults_to_monthly() {
        assert_eq!(
            SubscriptionCadence::from_label("fortnightly"),
            SubscriptionCadence::Monthly
        );
        assert_eq!(
            SubscriptionCadence::from_label(""),
            SubscriptionCadence::Monthly
        );
    }

    #[test]
    fn test_periods_rounds_up() {
        assert_eq!(SubscriptionCadence::Annual.periods(12), 1);
        assert_eq!(SubscriptionCadence::Annual.periods(24), 2);
        assert_eq!(SubscriptionCadence::Annual.periods(13), 2);
        assert_eq!(SubscriptionCadence::Quarterly.periods(7), 3);
    }

    #[test]
    fn test_periods_is_at_least_one() {
        assert_eq!(SubscriptionCadence::Monthly.periods(0), 1);
        assert_eq!(SubscriptionCadence::Quinquennial.periods(0), 1);
    }

    #[test]
    fn test_snap_duration_nearest_multiple() {
        assert_eq!(SubscriptionCadence::Annual.snap_duration(12), 12);
        assert_eq!(SubscriptionCadence::Annual.snap_duration(17), 12);
        // tie rounds up
        assert_eq!(SubscriptionCadence::Annual.snap_duration(18), 24);
        assert_eq!(SubscriptionCadence::Quarterly.snap_duration(2), 3);
    }

    #[test]
    fn test_snap_duration_never_below_one_step() {
        assert_eq!(SubscriptionCadence::Annual.snap_duration(0), 12);
        assert_eq!(SubscriptionCadence::Annual.snap_duration(3), 12);
        assert_eq!(SubscriptionCadence::Monthly.snap_duration(0), 1);
    }
}
