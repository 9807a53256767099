//! Region and year selection.
//!
//! The selection flows in one direction: the region determines the year
//! options, and the region with the chosen years determines the subset.

use log::{debug, warn};

use std::collections::BTreeSet;

pub use crate::config::*;

/// The distinct regions of the dataset, in lexical order.
pub fn list_regions(dataset: &Dataset) -> Vec<String> {
    let regions: BTreeSet<&str> = dataset
        .records()
        .iter()
        .map(|r| r.region.as_str())
        .collect();
    regions.into_iter().map(|s| s.to_string()).collect()
}

/// The distinct years with at least one record for the region, ascending.
/// An unknown region has no years.
pub fn list_years(dataset: &Dataset, region: &str) -> Vec<i32> {
    let years: BTreeSet<i32> = dataset
        .records()
        .iter()
        .filter(|r| r.region == region)
        .map(|r| r.year)
        .collect();
    years.into_iter().collect()
}

/// The latest year, or nothing when there is no year to pick from.
pub fn default_years(year_list: &[i32]) -> BTreeSet<i32> {
    year_list.iter().max().cloned().into_iter().collect()
}

/// The records of the region for any of the years. Matching is exact.
pub fn filter_records<'a>(
    dataset: &'a Dataset,
    region: &str,
    years: &BTreeSet<i32>,
) -> FilteredSubset<'a> {
    let subset: FilteredSubset<'a> = dataset
        .records()
        .iter()
        .filter(|r| r.region == region && years.contains(&r.year))
        .collect();
    debug!(
        "filter_records: region {:?} years {:?}: {} records",
        region,
        years,
        subset.len()
    );
    subset
}

/// Turns a requested region and years into a valid selection.
///
/// An unknown or missing region is replaced by the first region. Years that
/// do not occur for the region are dropped; when nothing is left the latest
/// year of the region is used. Every change is reported in `corrections`.
pub fn resolve_selection(
    dataset: &Dataset,
    requested_region: Option<&str>,
    requested_years: &[i32],
) -> ResolvedSelection {
    let regions = list_regions(dataset);
    let mut corrections: Vec<SelectionCorrection> = Vec::new();

    let region: String = match requested_region {
        Some(r) if regions.iter().any(|x| x == r) => r.to_string(),
        _ => {
            let replacement = regions.first().cloned().unwrap_or_default();
            if !replacement.is_empty() {
                warn!(
                    "resolve_selection: region {:?} is not available, using {:?}",
                    requested_region, replacement
                );
                corrections.push(SelectionCorrection::RegionReplaced {
                    requested: requested_region.map(|s| s.to_string()),
                    replacement: replacement.clone(),
                });
            }
            replacement
        }
    };

    let year_options = list_years(dataset, &region);
    let (years, mut year_corrections) = clamp_years(&year_options, requested_years);
    corrections.append(&mut year_corrections);

    debug!(
        "resolve_selection: region {:?} years {:?} options {:?}",
        region, years, year_options
    );
    ResolvedSelection {
        selection: Selection { region, years },
        year_options,
        corrections,
    }
}

fn clamp_years(
    year_options: &[i32],
    requested_years: &[i32],
) -> (BTreeSet<i32>, Vec<SelectionCorrection>) {
    let requested: BTreeSet<i32> = requested_years.iter().cloned().collect();
    let (valid, dropped): (Vec<i32>, Vec<i32>) = requested
        .iter()
        .cloned()
        .partition(|y| year_options.contains(y));

    if valid.is_empty() {
        let years = default_years(year_options);
        if requested.is_empty() {
            return (years, Vec::new());
        }
        warn!(
            "clamp_years: none of {:?} is available, using {:?}",
            requested, years
        );
        let corrections = vec![SelectionCorrection::YearsDefaulted {
            requested: requested.into_iter().collect(),
        }];
        return (years, corrections);
    }

    let mut corrections = Vec::new();
    if !dropped.is_empty() {
        warn!("clamp_years: dropping unavailable years {:?}", dropped);
        corrections.push(SelectionCorrection::YearsDropped { dropped });
    }
    (valid.into_iter().collect(), corrections)
}

impl Selection {
    /// Moves the selection to another region. The years still available in
    /// the new region are kept, otherwise the latest year is selected.
    pub fn change_region(&self, dataset: &Dataset, region: &str) -> ResolvedSelection {
        let previous: Vec<i32> = self.years.iter().cloned().collect();
        let mut resolved = resolve_selection(dataset, Some(region), &previous);
        // Losing years of the old region is the expected outcome of a
        // region change, not a correction of the request.
        resolved
            .corrections
            .retain(|c| matches!(c, SelectionCorrection::RegionReplaced { .. }));
        resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::Builder;

    fn sample() -> Dataset {
        let mut b = Builder::new();
        b.add_record_simple("RegionB", 2019, "Z", "PartyC", Some(1), 10.0)
            .unwrap();
        b.add_record_simple("RegionA", 2021, "X", "PartyB", Some(5), 200.0)
            .unwrap();
        b.add_record_simple("RegionA", 2020, "X", "PartyA", Some(2), 100.0)
            .unwrap();
        b.add_record_simple("RegionA", 2020, "Y", "PartyA", Some(0), 50.0)
            .unwrap();
        b.add_record_simple("RegionB", 2021, "Z", "PartyA", None, 10.0)
            .unwrap();
        b.build().unwrap()
    }

    fn years(ys: &[i32]) -> BTreeSet<i32> {
        ys.iter().cloned().collect()
    }

    #[test]
    fn regions_are_sorted_and_distinct() {
        assert_eq!(list_regions(&sample()), vec!["RegionA", "RegionB"]);
    }

    #[test]
    fn years_are_sorted_distinct_and_per_region() {
        let ds = sample();
        assert_eq!(list_years(&ds, "RegionA"), vec![2020, 2021]);
        assert_eq!(list_years(&ds, "RegionB"), vec![2019, 2021]);
        assert_eq!(list_years(&ds, "Nowhere"), Vec::<i32>::new());
    }

    #[test]
    fn default_is_latest_year() {
        assert_eq!(default_years(&[2014, 2019, 2009]), years(&[2019]));
        assert!(default_years(&[]).is_empty());
    }

    #[test]
    fn filter_matches_region_and_years_exactly() {
        let ds = sample();
        let subset = filter_records(&ds, "RegionA", &years(&[2020]));
        assert_eq!(subset.len(), 2);
        assert!(subset
            .iter()
            .all(|r| r.region == "RegionA" && r.year == 2020));

        let both = filter_records(&ds, "RegionA", &years(&[2020, 2021]));
        let y2020 = filter_records(&ds, "RegionA", &years(&[2020])).len();
        let y2021 = filter_records(&ds, "RegionA", &years(&[2021])).len();
        assert_eq!(both.len(), y2020 + y2021);

        assert!(filter_records(&ds, "regiona", &years(&[2020])).is_empty());
        assert!(filter_records(&ds, "RegionA", &BTreeSet::new()).is_empty());
        assert!(filter_records(&ds, "Nowhere", &years(&[2020])).is_empty());
    }

    #[test]
    fn resolve_defaults_to_latest_year() {
        let resolved = resolve_selection(&sample(), Some("RegionA"), &[]);
        assert_eq!(resolved.selection.years, years(&[2021]));
        assert_eq!(resolved.year_options, vec![2020, 2021]);
        assert!(resolved.corrections.is_empty());
    }

    #[test]
    fn resolve_replaces_unknown_region() {
        let resolved = resolve_selection(&sample(), Some("Atlantis"), &[2020]);
        assert_eq!(resolved.selection.region, "RegionA");
        assert_eq!(resolved.selection.years, years(&[2020]));
        assert_eq!(
            resolved.corrections,
            vec![SelectionCorrection::RegionReplaced {
                requested: Some("Atlantis".to_string()),
                replacement: "RegionA".to_string()
            }]
        );
    }

    #[test]
    fn resolve_drops_invalid_years() {
        let resolved = resolve_selection(&sample(), Some("RegionA"), &[2019, 2020]);
        assert_eq!(resolved.selection.years, years(&[2020]));
        assert_eq!(
            resolved.corrections,
            vec![SelectionCorrection::YearsDropped {
                dropped: vec![2019]
            }]
        );
    }

    #[test]
    fn resolve_defaults_when_no_year_is_valid() {
        let resolved = resolve_selection(&sample(), Some("RegionB"), &[2020]);
        assert_eq!(resolved.selection.years, years(&[2021]));
        assert_eq!(
            resolved.corrections,
            vec![SelectionCorrection::YearsDefaulted {
                requested: vec![2020]
            }]
        );
    }

    #[test]
    fn resolved_years_are_always_options() {
        let ds = sample();
        for region in [None, Some("RegionA"), Some("RegionB"), Some("Nowhere")] {
            for req in [vec![], vec![2019], vec![2020, 2021], vec![1999, 2021]] {
                let resolved = resolve_selection(&ds, region, &req);
                assert!(!resolved.selection.years.is_empty());
                for y in resolved.selection.years.iter() {
                    assert!(resolved.year_options.contains(y));
                }
            }
        }
    }

    #[test]
    fn empty_dataset_resolves_to_nothing() {
        let ds = Dataset::default();
        let resolved = resolve_selection(&ds, Some("RegionA"), &[2020]);
        assert_eq!(resolved.selection.region, "");
        assert!(resolved.selection.years.is_empty());
        assert!(resolved.year_options.is_empty());
    }

    #[test]
    fn change_region_keeps_valid_years() {
        let ds = sample();
        let start = resolve_selection(&ds, Some("RegionA"), &[2021]);
        let moved = start.selection.change_region(&ds, "RegionB");
        assert_eq!(moved.selection.region, "RegionB");
        assert_eq!(moved.selection.years, years(&[2021]));
        assert_eq!(moved.year_options, vec![2019, 2021]);
        assert!(moved.corrections.is_empty());
    }

    #[test]
    fn change_region_resets_to_latest() {
        let ds = sample();
        let start = resolve_selection(&ds, Some("RegionA"), &[2020]);
        let moved = start.selection.change_region(&ds, "RegionB");
        assert_eq!(moved.selection.years, years(&[2021]));
        assert!(moved.corrections.is_empty());
    }
}
