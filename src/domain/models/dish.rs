use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::errors::{DomainError, DomainResult};

/// Layout of the persisted local timestamps on dishes. No timezone offset is
/// stored; the values are taken to be in the owner's local time.
pub const DISH_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Sentinel for "portions not specified".
pub const PORTIONS_NOT_SPECIFIED: i32 = -1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dish {
    pub dish_id: i64,
    /// Per-user-visible counterpart of `dish_id`.
    pub personal_dish_id: i64,
    pub user_id: i64,
    pub storage_id: i64,
    pub title: String,
    pub description: String,
    pub created_date: String,
    pub expire_date: String,
    pub priority: String,
    pub dish_type: String,
    pub portions: i32,
    pub temp_match: String,
}

impl Dish {
    pub fn expires_at(&self) -> DomainResult<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.expire_date, DISH_DATE_FORMAT).map_err(|_| {
            DomainError::Internal(format!(
                "dish {} carries unparsable expire date {:?}",
                self.dish_id, self.expire_date
            ))
        })
    }

    /// Whether the dish is expired at `now`. An unparsable stored expiry is a
    /// data-integrity fault and fails the check rather than reading as "not
    /// expired".
    pub fn is_expired_at(&self, now: NaiveDateTime) -> DomainResult<bool> {
        Ok(self.expires_at()? < now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dish_expiring(expire_date: &str) -> Dish {
        Dish {
            dish_id: 1,
            personal_dish_id: 1,
            user_id: 7,
            storage_id: 3,
            title: "Leftover stew".to_string(),
            description: String::new(),
            created_date: "2020-10-10T12:00".to_string(),
            expire_date: expire_date.to_string(),
            priority: "normal".to_string(),
            dish_type: "meal".to_string(),
            portions: PORTIONS_NOT_SPECIFIED,
            temp_match: String::new(),
        }
    }

    fn at(raw: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(raw, DISH_DATE_FORMAT).unwrap()
    }

    #[test]
    fn expired_when_now_is_past_the_expiry() {
        let dish = dish_expiring("2020-10-13T08:00");
        assert!(dish.is_expired_at(at("2021-01-01T00:00")).unwrap());
    }

    #[test]
    fn not_expired_when_now_is_before_the_expiry() {
        let dish = dish_expiring("2020-10-13T08:00");
        assert!(!dish.is_expired_at(at("2019-01-01T00:00")).unwrap());
    }

    #[test]
    fn unparsable_expiry_is_an_internal_fault() {
        let dish = dish_expiring("not-a-date");
        let err = dish.is_expired_at(at("2021-01-01T00:00")).unwrap_err();
        assert!(matches!(err, DomainError::Internal(_)));
    }
}
