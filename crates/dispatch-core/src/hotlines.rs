use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hotline {
    pub name: &'static str,
    pub phone: &'static str,
    pub specialty: &'static str,
}

const HOTLINES: [Hotline; 3] = [
    Hotline {
        name: "Cardiac Center",
        phone: "800-555-0123",
        specialty: "cardiac",
    },
    Hotline {
        name: "Mental Health",
        phone: "800-555-0199",
        specialty: "mental_health",
    },
    Hotline {
        name: "Poison Control",
        phone: "800-555-0142",
        specialty: "poison",
    },
];

/// Fixed hotline directory shown beside the map.
#[must_use]
pub fn hotlines() -> &'static [Hotline] {
    &HOTLINES
}
