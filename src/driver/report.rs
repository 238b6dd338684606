// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scrape results.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::error::{DecodeError, RemoteError};
use crate::types::PointValue;

/// How a point's published value was obtained.
#[derive(Debug, Clone, PartialEq)]
pub enum PointStatus {
    /// Decoded from a snapshot fetched during this scrape.
    Fresh,
    /// The entity could not be fetched; the value is the last known good one
    /// or the configured starting value.
    Stale(RemoteError),
    /// The entity could not be fetched and no earlier value exists.
    Unavailable(RemoteError),
    /// The snapshot was fetched but this point could not be decoded.
    DecodeFailed(DecodeError),
}

/// Outcome of one point in a scrape.
#[derive(Debug, Clone, PartialEq)]
pub struct PointReading {
    pub(super) value: Option<PointValue>,
    pub(super) status: PointStatus,
    pub(super) observed_at: Option<DateTime<Utc>>,
}

impl PointReading {
    /// Returns the value to publish, if any.
    #[must_use]
    pub fn value(&self) -> Option<&PointValue> {
        self.value.as_ref()
    }

    /// Returns how the value was obtained.
    #[must_use]
    pub fn status(&self) -> &PointStatus {
        &self.status
    }

    /// Returns the remote `last_updated` time of the snapshot the value came
    /// from, when known.
    #[must_use]
    pub fn observed_at(&self) -> Option<DateTime<Utc>> {
        self.observed_at
    }

    /// Returns `true` if the value was decoded during this scrape.
    #[must_use]
    pub fn is_fresh(&self) -> bool {
        matches!(self.status, PointStatus::Fresh)
    }
}

/// Per-point results of one scrape, keyed by point name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScrapeReport {
    pub(super) readings: BTreeMap<String, PointReading>,
}

impl ScrapeReport {
    /// Returns the reading of one point.
    #[must_use]
    pub fn get(&self, point_name: &str) -> Option<&PointReading> {
        self.readings.get(point_name)
    }

    /// Iterates over all readings in point name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PointReading)> {
        self.readings.iter().map(|(name, r)| (name.as_str(), r))
    }

    /// Returns the point name to value mapping handed to the publisher.
    ///
    /// Points without a value are left out.
    #[must_use]
    pub fn published(&self) -> BTreeMap<String, PointValue> {
        self.readings
            .iter()
            .filter_map(|(name, r)| r.value.clone().map(|v| (name.clone(), v)))
            .collect()
    }

    /// Returns `true` if every point was decoded during this scrape.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.readings.values().all(PointReading::is_fresh)
    }

    /// Returns the number of points in the report.
    #[must_use]
    pub fn len(&self) -> usize {
        self.readings.len()
    }

    /// Returns `true` if the report holds no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }
}
