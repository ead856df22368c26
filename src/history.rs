use crate::model::AcceptedSuggestionRecord;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A crop and acreage a farmer picked from a recommendation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub crop: String,
    pub acres: u32,
}

impl FromStr for Selection {
    type Err = Error;

    /// Parses `"crop:acres"`.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidSelection(s.to_string());
        let (crop, acres) = s.rsplit_once(':').ok_or_else(invalid)?;
        let crop = crop.trim();
        if crop.is_empty() {
            return Err(invalid());
        }
        let acres = acres.trim().parse().map_err(|_| invalid())?;
        Ok(Selection {
            crop: crop.to_string(),
            acres,
        })
    }
}

/// Append-only log of accepted suggestions.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AcceptedHistory {
    records: Vec<AcceptedSuggestionRecord>,
}

impl AcceptedHistory {
    pub fn new(records: Vec<AcceptedSuggestionRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[AcceptedSuggestionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn next_farmer_id(&self) -> Result<u64> {
        match self.records.iter().map(|r| r.farmer_id).max() {
            None => Ok(1),
            Some(id) => id.checked_add(1).ok_or(Error::FarmerIdExhausted),
        }
    }

    /// Records `selections` for a new farmer in `district` and returns the
    /// farmer id. The selected acres may not add up to more than
    /// `available_acres`.
    pub fn accept(
        &mut self,
        district: &str,
        selections: &[Selection],
        available_acres: u32,
    ) -> Result<u64> {
        if selections.is_empty() {
            return Err(Error::EmptySelection);
        }
        let selected: u64 = selections.iter().map(|s| s.acres as u64).sum();
        if selected > available_acres as u64 {
            return Err(Error::AcreageExceeded {
                selected,
                available: available_acres,
            });
        }

        let farmer_id = self.next_farmer_id()?;
        self.records
            .extend(selections.iter().map(|s| AcceptedSuggestionRecord {
                farmer_id,
                crop: s.crop.clone(),
                district: district.to_string(),
                acres: s.acres,
            }));
        tracing::info!(farmer_id, district, count = selections.len(), "suggestions accepted");
        Ok(farmer_id)
    }
}
