pub use crate::config::*;

/// A builder for assembling a dataset record by record.
///
/// ```
/// use candidate_stats::builder::Builder;
/// # use candidate_stats::DatasetError;
///
/// let mut builder = Builder::new();
/// builder.add_record_simple("Delhi", 2020, "Chandni Chowk", "Party A", Some(2), 1500000.0)?;
/// builder.add_record_simple("Delhi", 2020, "Chandni Chowk", "Party B", None, 80000.0)?;
///
/// let dataset = builder.build()?;
/// assert_eq!(dataset.len(), 2);
///
/// # Ok::<(), DatasetError>(())
/// ```
#[derive(Debug, Default)]
pub struct Builder {
    pub(crate) _records: Vec<CandidateRecord>,
}

impl Builder {
    pub fn new() -> Builder {
        Builder {
            _records: Vec::new(),
        }
    }

    /// Adds a record without a declared education level.
    pub fn add_record_simple(
        &mut self,
        region: &str,
        year: i32,
        constituency: &str,
        party: &str,
        criminal_cases: Option<u64>,
        total_assets: f64,
    ) -> Result<(), DatasetError> {
        self.add_record(&CandidateRecord {
            region: region.to_string(),
            year,
            constituency: constituency.to_string(),
            party: party.to_string(),
            criminal_cases,
            total_assets,
            education: EducationBracket::NotGiven,
        })
    }

    /// Adds a record. The record is checked immediately so that the error
    /// points at the position of the offending record.
    pub fn add_record(&mut self, record: &CandidateRecord) -> Result<(), DatasetError> {
        let index = self._records.len();
        Dataset::new(vec![record.clone()]).map_err(|e| match e {
            DatasetError::EmptyField { field, .. } => DatasetError::EmptyField { index, field },
            DatasetError::InvalidAssets { value, .. } => {
                DatasetError::InvalidAssets { index, value }
            }
        })?;
        self._records.push(record.clone());
        Ok(())
    }

    pub fn build(self) -> Result<Dataset, DatasetError> {
        Dataset::new(self._records)
    }
}
