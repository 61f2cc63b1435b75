//! Observation: "at time T, entity E exhibited content C".
//!
//! Observations are strictly append-only. Recording the same entity and
//! fingerprint twice is how an unchanged page is marked as still current.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Fingerprint;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
  pub observation_id: Uuid,
  pub entity_id:      Uuid,
  pub observed_at:    DateTime<Utc>,
  pub fingerprint:    Fingerprint,
}
