use log::{debug, info};
use std::str::FromStr;

use crate::base::*;

pub const DEFAULT_GROUP_RANGES: &str = "101-114:Group1,115-129:Group2";

/// Numeric identifier embedded in a sample label, i.e. the first maximal run of digits
pub fn extract_numeric_id(label: &str) -> Result<u64> {
    let digits = label
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect::<String>();
    if digits.is_empty() {
        return Err(AmovaError::classification(
            label,
            "no numeric identifier found in the sample label",
        ));
    }
    digits.parse::<u64>().map_err(|_| {
        AmovaError::classification(
            label,
            "the numeric identifier ".to_owned() + &digits + " is too large",
        )
    })
}

impl GroupRange {
    pub fn contains(&self, x: u64) -> bool {
        (self.low <= x) & (x <= self.high)
    }
}

impl FromStr for GroupRange {
    type Err = AmovaError;
    // e.g. "101-114:Group1"
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || {
            AmovaError::config(
                "Invalid group range: '".to_owned() + s + "'. Expected LOW-HIGH:TAG, e.g. 101-114:Group1",
            )
        };
        let (interval, tag) = s.trim().split_once(':').ok_or_else(invalid)?;
        let (low, high) = interval.split_once('-').ok_or_else(invalid)?;
        let low = low.trim().parse::<u64>().map_err(|_| invalid())?;
        let high = high.trim().parse::<u64>().map_err(|_| invalid())?;
        let tag = tag.trim().to_owned();
        if tag.is_empty() {
            return Err(invalid());
        }
        Ok(GroupRange { low, high, tag })
    }
}

impl GroupRanges {
    pub fn new(ranges: Vec<GroupRange>) -> Result<Self> {
        for r in &ranges {
            if r.low > r.high {
                return Err(AmovaError::config(format!(
                    "The range {}-{} of group {} has its lower bound above its upper bound.",
                    r.low, r.high, r.tag
                )));
            }
        }
        for (i, a) in ranges.iter().enumerate() {
            for b in ranges.iter().skip(i + 1) {
                if (a.low <= b.high) & (b.low <= a.high) {
                    return Err(AmovaError::config(format!(
                        "The ranges {}-{} ({}) and {}-{} ({}) overlap.",
                        a.low, a.high, a.tag, b.low, b.high, b.tag
                    )));
                }
            }
        }
        let mut tags: Vec<String> = vec![];
        for r in &ranges {
            if !tags.contains(&r.tag) {
                tags.push(r.tag.to_owned());
            }
        }
        if tags.len() < 2 {
            return Err(AmovaError::config(
                "At least two groups are required to partition the molecular variance.",
            ));
        }
        Ok(GroupRanges { ranges, tags })
    }
}

impl FromStr for GroupRanges {
    type Err = AmovaError;
    // e.g. "101-114:Group1,115-129:Group2"
    fn from_str(s: &str) -> Result<Self> {
        let ranges = s
            .split(',')
            .filter(|x| !x.trim().is_empty())
            .map(|x| x.parse::<GroupRange>())
            .collect::<Result<Vec<GroupRange>>>()?;
        GroupRanges::new(ranges)
    }
}

impl Classify for GroupRanges {
    fn classify(&self, label: &str) -> Result<usize> {
        let x = extract_numeric_id(label)?;
        let range = match self.ranges.iter().find(|r| r.contains(x)) {
            Some(r) => r,
            None => {
                return Err(AmovaError::classification(
                    label,
                    format!(
                        "its numeric identifier {} is outside all configured ranges ({})",
                        x,
                        self.ranges
                            .iter()
                            .map(|r| format!("{}-{}", r.low, r.high))
                            .collect::<Vec<String>>()
                            .join(", ")
                    ),
                ))
            }
        };
        // Tags are built from the ranges so the lookup always succeeds
        let idx = self
            .tags
            .iter()
            .position(|t| t == &range.tag)
            .unwrap_or_default();
        debug!("Sample {} (id={}) assigned to {}", label, x, range.tag);
        Ok(idx)
    }

    fn assign(&self, samples: &[String]) -> Result<GroupAssignment> {
        let groups = samples
            .iter()
            .map(|s| self.classify(s))
            .collect::<Result<Vec<usize>>>()?;
        let group_assignment = GroupAssignment {
            samples: samples.to_vec(),
            groups,
            tags: self.tags.clone(),
        };
        for (k, tag) in group_assignment.tags.iter().enumerate() {
            info!(
                "Group {}: {} individuals",
                tag,
                group_assignment.groups.iter().filter(|&&g| g == k).count()
            );
        }
        Ok(group_assignment)
    }
}

impl GroupAssignment {
    pub fn tag_of(&self, label: &str) -> Option<&str> {
        self.samples
            .iter()
            .position(|s| s == label)
            .and_then(|i| self.groups.get(i))
            .and_then(|&g| self.tags.get(g))
            .map(|t| t.as_str())
    }

    pub fn n_groups(&self) -> usize {
        self.tags.len()
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn test_extract_numeric_id() {
        assert_eq!(extract_numeric_id("Ind101").unwrap(), 101);
        assert_eq!(extract_numeric_id("P7_rep12").unwrap(), 7);
        assert_eq!(extract_numeric_id("0042").unwrap(), 42);
        assert!(matches!(
            extract_numeric_id("IndA"),
            Err(AmovaError::Classification { .. })
        ));
        assert!(extract_numeric_id("Ind99999999999999999999999")
            .unwrap_err()
            .is_input_error());
    }
    #[test]
    fn test_group_ranges_parsing() {
        let group_ranges = DEFAULT_GROUP_RANGES.parse::<GroupRanges>().unwrap();
        assert_eq!(
            group_ranges.ranges,
            vec![
                GroupRange {
                    low: 101,
                    high: 114,
                    tag: "Group1".to_owned()
                },
                GroupRange {
                    low: 115,
                    high: 129,
                    tag: "Group2".to_owned()
                },
            ]
        );
        assert_eq!(group_ranges.tags, vec!["Group1".to_owned(), "Group2".to_owned()]);
        // Several ranges may share a tag
        let group_ranges = "1-5:A, 6-10:B, 11-15:A".parse::<GroupRanges>().unwrap();
        assert_eq!(group_ranges.tags, vec!["A".to_owned(), "B".to_owned()]);
        assert_eq!(group_ranges.classify("x13").unwrap(), 0);
        // Invalid configurations
        assert!("101-114:Group1,110-129:Group2"
            .parse::<GroupRanges>()
            .unwrap_err()
            .is_config_error());
        assert!("114-101:Group1,115-129:Group2"
            .parse::<GroupRanges>()
            .unwrap_err()
            .is_config_error());
        assert!("101-129:Group1".parse::<GroupRanges>().unwrap_err().is_config_error());
        assert!("101to114:Group1,115-129:Group2"
            .parse::<GroupRanges>()
            .unwrap_err()
            .is_config_error());
    }
    #[test]
    fn test_assign() {
        let group_ranges = DEFAULT_GROUP_RANGES.parse::<GroupRanges>().unwrap();
        let samples = vec!["Ind101", "Ind114", "Ind115", "Ind129"]
            .into_iter()
            .map(|x| x.to_owned())
            .collect::<Vec<String>>();
        let group_assignment = group_ranges.assign(&samples).unwrap();
        assert_eq!(group_assignment.groups, vec![0, 0, 1, 1]);
        assert_eq!(group_assignment.samples, samples);
        assert_eq!(group_assignment.n_groups(), 2);
        assert_eq!(group_assignment.tag_of("Ind115"), Some("Group2"));
        assert_eq!(group_assignment.tag_of("Ind130"), None);
        // Hand-built assignment pointing past the tags
        let inconsistent = GroupAssignment {
            samples: vec!["Ind101".to_owned(), "Ind115".to_owned()],
            groups: vec![0, 5],
            tags: vec!["Group1".to_owned(), "Group2".to_owned()],
        };
        assert_eq!(inconsistent.tag_of("Ind101"), Some("Group1"));
        assert_eq!(inconsistent.tag_of("Ind115"), None);
    }
    #[test]
    fn test_assign_out_of_range() {
        let group_ranges = "101-114:Group1,115-129:Group2".parse::<GroupRanges>().unwrap();
        let samples = vec!["Ind101".to_owned(), "Ind999".to_owned()];
        match group_ranges.assign(&samples) {
            Err(AmovaError::Classification { label, .. }) => assert_eq!(label, "Ind999"),
            x => panic!("expected a classification error, got {:?}", x),
        }
        let samples = vec!["Ind101".to_owned(), "control".to_owned()];
        assert!(matches!(
            group_ranges.assign(&samples),
            Err(AmovaError::Classification { .. })
        ));
    }
}
