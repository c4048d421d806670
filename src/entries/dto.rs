use serde::{Deserialize, Serialize};
use time::Date;

use crate::error::ApiError;

/// Writable entry fields. Any `user_id` in the request body is not part of
/// this shape and is dropped during deserialization; ownership always comes
/// from the authenticated principal.
#[derive(Debug, Default, Deserialize)]
pub struct EntryChanges {
    pub entry_date: Option<Date>,
    pub mood: Option<String>,
    pub weight: Option<f64>,
    pub sleep_hours: Option<i32>,
    pub notes: Option<String>,
}

impl EntryChanges {
    fn has_measurement(&self) -> bool {
        self.mood.is_some()
            || self.weight.is_some()
            || self.sleep_hours.is_some()
            || self.notes.is_some()
    }

    /// Creation requires a date plus at least one recorded value.
    pub fn validate_for_create(&self) -> Result<Date, ApiError> {
        let Some(date) = self.entry_date else {
            return Err(ApiError::Malformed("entry_date is required".into()));
        };
        if !self.has_measurement() {
            return Err(ApiError::Malformed(
                "at least one of mood, weight, sleep_hours or notes is required".into(),
            ));
        }
        Ok(date)
    }

    /// An update must change something.
    pub fn validate_for_update(&self) -> Result<(), ApiError> {
        if self.entry_date.is_none() && !self.has_measurement() {
            return Err(ApiError::Malformed("no fields to update".into()));
        }
        Ok(())
    }
}

/// Response for a successful entry deletion.
#[derive(Debug, Serialize)]
pub struct EntryDeleted {
    pub message: String,
    pub entry_id: i32,
}
