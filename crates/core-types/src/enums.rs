use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Minimum grade (out of 20) for a course to count as passed.
pub const PASSING_GRADE: Decimal = dec!(10);

/// The six fixed ranges used to bucket grades for the distribution histogram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
pub enum GradeBin {
    #[serde(rename = "0-7")]
    ZeroToSeven,
    #[serde(rename = "8-9")]
    EightToNine,
    #[serde(rename = "10-11")]
    TenToEleven,
    #[serde(rename = "12-13")]
    TwelveToThirteen,
    #[serde(rename = "14-15")]
    FourteenToFifteen,
    #[serde(rename = "16-20")]
    SixteenToTwenty,
}

impl GradeBin {
    /// All bins in ascending grade order.
    pub const ALL: [GradeBin; 6] = [
        GradeBin::ZeroToSeven,
        GradeBin::EightToNine,
        GradeBin::TenToEleven,
        GradeBin::TwelveToThirteen,
        GradeBin::FourteenToFifteen,
        GradeBin::SixteenToTwenty,
    ];

    /// Exclusive upper bound of the bin. The last bin is closed and has none.
    pub fn upper_bound(self) -> Option<Decimal> {
        match self {
            GradeBin::ZeroToSeven => Some(dec!(8)),
            GradeBin::EightToNine => Some(dec!(10)),
            GradeBin::TenToEleven => Some(dec!(12)),
            GradeBin::TwelveToThirteen => Some(dec!(14)),
            GradeBin::FourteenToFifteen => Some(dec!(16)),
            GradeBin::SixteenToTwenty => None,
        }
    }

    /// Position of the bin in `ALL`.
    pub fn index(self) -> i32 {
        self as i32
    }

    pub fn from_index(index: i32) -> Option<Self> {
        usize::try_from(index).ok().and_then(|i| Self::ALL.get(i).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_round_trips_and_is_ordered() {
        for (i, bin) in GradeBin::ALL.into_iter().enumerate() {
            assert_eq!(bin.index() as usize, i);
            assert_eq!(GradeBin::from_index(bin.index()), Some(bin));
        }
        assert_eq!(GradeBin::from_index(6), None);
        assert_eq!(GradeBin::from_index(-1), None);
    }

    #[test]
    fn serializes_as_range_label() {
        let labels: Vec<String> = GradeBin::ALL
            .iter()
            .map(|bin| serde_json::to_string(bin).unwrap())
            .collect();
        assert_eq!(
            labels,
            ["\"0-7\"", "\"8-9\"", "\"10-11\"", "\"12-13\"", "\"14-15\"", "\"16-20\""]
        );
    }
}
