use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Static affiliation lists: affiliation name to the card codes it contains
#[derive(Debug, Clone, Default)]
pub struct OriginMembership {
    affiliations: BTreeMap<String, BTreeSet<String>>,
}

impl OriginMembership {
    pub fn new(lists: HashMap<String, Vec<String>>) -> Self {
        let affiliations = lists
            .into_iter()
            .map(|(name, codes)| (name, codes.into_iter().collect()))
            .collect();
        Self { affiliations }
    }

    /// Membership of `card_code` in every known affiliation. Unknown codes
    /// come back all-false rather than as an error.
    pub fn classify(&self, card_code: &str) -> BTreeMap<String, bool> {
        self.affiliations
            .iter()
            .map(|(name, codes)| (name.clone(), codes.contains(card_code)))
            .collect()
    }
}
