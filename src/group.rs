/*!
 * Record filtering and claimant grouping
 *
 * Records without a ClaimNo are header or blank artifacts, not claims;
 * they are dropped here. Survivors are grouped by claimant identity in
 * first-seen order, with row order preserved inside each group because it
 * drives output row order.
 */

use crate::data_types::{ClaimRecord, ClaimantIdentity};

/// One claimant's finalized records, destined for one output file
#[derive(Debug, Clone, PartialEq)]
pub struct ClaimantGroup {
    pub identity: ClaimantIdentity,
    pub records: Vec<ClaimRecord>,
}

impl ClaimantGroup {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Drop records whose ClaimNo is absent. Strict subset: a record survives
/// iff its ClaimNo is non-null, and surviving order matches input order.
pub fn filter_claims(records: Vec<ClaimRecord>) -> Vec<ClaimRecord> {
    records.into_iter().filter(|r| r.has_claim_no()).collect()
}

/// Group surviving records by claimant identity under `provider_name`.
///
/// Groups appear in first-seen order. All records from one file share one
/// claimant by construction, so a single-file input normally yields at
/// most one group; an input that filters to nothing yields zero groups,
/// which the caller must report rather than silently drop.
pub fn group_by_claimant(records: Vec<ClaimRecord>, provider_name: &str) -> Vec<ClaimantGroup> {
    let mut groups: Vec<ClaimantGroup> = Vec::new();

    for record in records {
        let identity = ClaimantIdentity::from_record(&record, provider_name);
        match groups.iter_mut().find(|g| g.identity == identity) {
            Some(group) => group.records.push(record),
            None => groups.push(ClaimantGroup {
                identity,
                records: vec![record],
            }),
        }
    }

    groups
}

/// Filter then group: the standard per-file path
pub fn process(records: Vec<ClaimRecord>, provider_name: &str) -> Vec<ClaimantGroup> {
    group_by_claimant(filter_claims(records), provider_name)
}
