use std::collections::{BTreeSet, HashMap};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::models::focus_record::FocusRecord;
use crate::core::models::policy::TimeComparisonPolicy;

/// One summary row: how many distinct days an author focused in a period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TallyRow {
    pub author: String,
    pub days: usize,
}

/// Count distinct calendar days per author.
///
/// Days are taken on the policy's comparison basis. Authors keep the order
/// in which they first appear.
pub fn tally_days(records: &[FocusRecord], policy: TimeComparisonPolicy) -> Vec<TallyRow> {
    let mut order: Vec<&str> = Vec::new();
    let mut days: HashMap<&str, BTreeSet<NaiveDate>> = HashMap::new();

    for record in records {
        let date = policy.basis(&record.timestamp).date();
        days.entry(record.author.as_str())
            .or_insert_with(|| {
                order.push(record.author.as_str());
                BTreeSet::new()
            })
            .insert(date);
    }

    order
        .into_iter()
        .map(|author| TallyRow {
            author: author.to_string(),
            days: days.get(author).map_or(0, BTreeSet::len),
        })
        .collect()
}
