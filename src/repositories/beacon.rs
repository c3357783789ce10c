use std::collections::HashMap;

/// Product slug to the points (as configured text) each owned token is worth.
pub type BeaconRules = HashMap<String, String>;

pub trait BeaconRuleProvider: Send + Sync {
    /// Snapshot of the rules, taken once per resolution.
    fn beacon_rules(&self) -> BeaconRules;
}

#[derive(Clone, Debug, Default)]
pub struct StaticBeaconRules {
    rules: BeaconRules,
}

impl StaticBeaconRules {
    pub fn new(rules: BeaconRules) -> Self {
        Self { rules }
    }
}

impl BeaconRuleProvider for StaticBeaconRules {
    fn beacon_rules(&self) -> BeaconRules {
        self.rules.clone()
    }
}
