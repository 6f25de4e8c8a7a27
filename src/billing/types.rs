//! Bill record types.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SubsecRound, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::codec::{self, ID_BYTES};
use crate::error::IdentifierError;

/// Unix timestamp of `0001-01-01T00:00:00Z`, the "unset" instant some
/// clients send for `created_at`.
const ZERO_TIME_SECONDS: i64 = -62_135_596_800;

/// Drop the sub-second part so a value survives a `TIMESTAMP` column
/// unchanged; MySQL would otherwise round it, possibly into the next day.
pub fn to_stored_precision(ts: DateTime<Utc>) -> DateTime<Utc> {
    ts.trunc_subsecs(0)
}

/// Opaque bill identifier, stored as 16 raw bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BillId(Uuid);

impl BillId {
    /// Generate a fresh random identifier.
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap the 16-byte storage form.
    pub fn from_bytes(bytes: [u8; ID_BYTES]) -> Self {
        Self(Uuid::from_bytes(bytes))
    }

    /// Decode the store's `HEX(id)` rendering.
    pub fn from_hex(hex_text: &str) -> Result<Self, IdentifierError> {
        codec::decode_uuid(hex_text).map(Self)
    }

    /// The 16-byte storage form.
    pub fn as_bytes(&self) -> &[u8; ID_BYTES] {
        self.0.as_bytes()
    }
}

impl FromStr for BillId {
    type Err = IdentifierError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        codec::encode(text).map(Self::from_bytes)
    }
}

impl fmt::Display for BillId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

/// A stored bill: two utility charges plus lifecycle timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Bill {
    /// UUID text.
    #[schema(value_type = String, format = Uuid)]
    pub id: BillId,
    /// EMBASA (water) charge.
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub embasa: Decimal,
    /// COELBA (electricity) charge.
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub coelba: Decimal,
    /// Set once at creation.
    pub created_at: DateTime<Utc>,
    /// Refreshed on every write.
    pub updated_at: DateTime<Utc>,
}

impl Bill {
    /// Build a new bill with a fresh id.
    ///
    /// `created_at` is taken from the request unless absent or the zero
    /// instant; `updated_at` is always `now`. Both are cut to whole seconds.
    pub fn create(input: NewBill, now: DateTime<Utc>) -> Self {
        let now = to_stored_precision(now);
        Self {
            id: BillId::new_v4(),
            embasa: input.embasa,
            coelba: input.coelba,
            created_at: to_stored_precision(resolve_created_at(input.created_at, now)),
            updated_at: now,
        }
    }

    /// Echo of an update that matched no stored row.
    ///
    /// Carries the id, the new amounts and `updated_at`; `created_at` is the
    /// zero instant since nothing was read back.
    pub fn detached(id: BillId, changes: BillUpdate, updated_at: DateTime<Utc>) -> Self {
        Self {
            id,
            embasa: changes.embasa,
            coelba: changes.coelba,
            created_at: DateTime::from_timestamp(ZERO_TIME_SECONDS, 0).unwrap_or_default(),
            updated_at: to_stored_precision(updated_at),
        }
    }
}

/// Body of `POST /bills`.
///
/// Extra fields the frontend sends (`id`, `updated_at`) are ignored.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewBill {
    /// EMBASA (water) charge.
    #[schema(value_type = f64)]
    pub embasa: Decimal,
    /// COELBA (electricity) charge.
    #[schema(value_type = f64)]
    pub coelba: Decimal,
    /// Optional creation instant; defaults to now.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Body of `PUT /bills/{id}`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct BillUpdate {
    /// New EMBASA (water) charge.
    #[schema(value_type = f64)]
    pub embasa: Decimal,
    /// New COELBA (electricity) charge.
    #[schema(value_type = f64)]
    pub coelba: Decimal,
}

fn resolve_created_at(supplied: Option<DateTime<Utc>>, now: DateTime<Utc>) -> DateTime<Utc> {
    supplied
        .filter(|ts| ts.timestamp() != ZERO_TIME_SECONDS)
        .unwrap_or(now)
}
