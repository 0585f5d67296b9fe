use serde::{Deserialize, Serialize};
use std::fmt;

/// User rating on a 1-5 star scale
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "u8", into = "u8")]
pub struct UserRating(u8);

impl UserRating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&value).then_some(Self(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Five-star rendering, filled up to the rating
    pub fn stars(self) -> String {
        (Self::MIN..=Self::MAX)
            .map(|star| if star <= self.0 { '★' } else { '☆' })
            .collect()
    }
}

impl TryFrom<u8> for UserRating {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| {
            format!("rating must be between {} and {}, got {}", Self::MIN, Self::MAX, value)
        })
    }
}

impl From<UserRating> for u8 {
    fn from(rating: UserRating) -> u8 {
        rating.0
    }
}

impl fmt::Display for UserRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.0, Self::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_bounds() {
        assert!(UserRating::new(0).is_none());
        assert!(UserRating::new(6).is_none());
        assert_eq!(UserRating::new(1).map(UserRating::value), Some(1));
        assert_eq!(UserRating::new(5).map(UserRating::value), Some(5));
    }

    #[test]
    fn test_rating_rejects_out_of_range_on_deserialize() {
        assert!(serde_json::from_str::<UserRating>("9").is_err());
        assert_eq!(serde_json::from_str::<UserRating>("4").unwrap().value(), 4);
    }

    #[test]
    fn test_stars() {
        assert_eq!(UserRating::new(3).unwrap().stars(), "★★★☆☆");
    }
}
