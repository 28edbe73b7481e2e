/// Icon family for a monument marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MonumentIcon {
    OilRig,
    LaunchSite,
    Military,
    Airfield,
    Harbor,
    PowerPlant,
    TrainYard,
    Water,
    Lighthouse,
    Shop,
    SafeZone,
    Radar,
    Dome,
    Excavation,
    Junkyard,
    Research,
    Sewer,
    Cargo,
    Pin,
}

impl MonumentIcon {
    pub const fn glyph(self) -> &'static str {
        match self {
            Self::OilRig => "\u{1F6E2}",
            Self::LaunchSite => "\u{1F680}",
            Self::Military => "\u{2694}",
            Self::Airfield => "\u{2708}",
            Self::Harbor => "\u{2693}",
            Self::PowerPlant => "\u{26A1}",
            Self::TrainYard => "\u{1F682}",
            Self::Water => "\u{1F4A7}",
            Self::Lighthouse => "\u{1F5FC}",
            Self::Shop => "\u{1F6D2}",
            Self::SafeZone => "\u{1F6E1}",
            Self::Radar => "\u{1F4E1}",
            Self::Dome => "\u{1F52D}",
            Self::Excavation => "\u{26CF}",
            Self::Junkyard => "\u{267B}",
            Self::Research => "\u{1F9EA}",
            Self::Sewer => "\u{1F573}",
            Self::Cargo => "\u{1F6A2}",
            Self::Pin => "\u{1F4CD}",
        }
    }
}

/// How a monument name resolved to its icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchTier {
    Exact,
    Substring,
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IconMatch {
    pub icon: MonumentIcon,
    pub tier: MatchTier,
}

/// Known monument names. Substring matching walks this in order, so longer
/// and more specific names come before generic ones.
const ICON_TABLE: &[(&str, MonumentIcon)] = &[
    ("Large Oil Rig", MonumentIcon::OilRig),
    ("Small Oil Rig", MonumentIcon::OilRig),
    ("Oil Rig", MonumentIcon::OilRig),
    ("Launch Site", MonumentIcon::LaunchSite),
    ("Military Tunnels", MonumentIcon::Military),
    ("Military Base", MonumentIcon::Military),
    ("Airfield", MonumentIcon::Airfield),
    ("Ferry Terminal", MonumentIcon::Harbor),
    ("Fishing Village", MonumentIcon::Harbor),
    ("Harbor", MonumentIcon::Harbor),
    ("Harbour", MonumentIcon::Harbor),
    ("Power Plant", MonumentIcon::PowerPlant),
    ("Train Yard", MonumentIcon::TrainYard),
    ("Train Tunnel", MonumentIcon::TrainYard),
    ("Water Treatment Plant", MonumentIcon::Water),
    ("Water Well", MonumentIcon::Water),
    ("Lighthouse", MonumentIcon::Lighthouse),
    ("Supermarket", MonumentIcon::Shop),
    ("Gas Station", MonumentIcon::Shop),
    ("Outpost", MonumentIcon::SafeZone),
    ("Bandit Camp", MonumentIcon::SafeZone),
    ("Satellite Dish", MonumentIcon::Radar),
    ("The Dome", MonumentIcon::Dome),
    ("Giant Excavator Pit", MonumentIcon::Excavation),
    ("Quarry", MonumentIcon::Excavation),
    ("Junkyard", MonumentIcon::Junkyard),
    ("Arctic Research Base", MonumentIcon::Research),
    ("Sewer Branch", MonumentIcon::Sewer),
    ("Cargo Ship", MonumentIcon::Cargo),
];

/// Exact name first, then case-insensitive containment of a table name,
/// then the generic pin.
pub fn lookup_icon(name: &str) -> IconMatch {
    if let Some(&(_, icon)) = ICON_TABLE.iter().find(|(key, _)| *key == name) {
        return IconMatch {
            icon,
            tier: MatchTier::Exact,
        };
    }

    let lowered = name.to_lowercase();
    if let Some(&(_, icon)) = ICON_TABLE
        .iter()
        .find(|(key, _)| lowered.contains(&key.to_lowercase()))
    {
        return IconMatch {
            icon,
            tier: MatchTier::Substring,
        };
    }

    IconMatch {
        icon: MonumentIcon::Pin,
        tier: MatchTier::Fallback,
    }
}

pub fn icon_for(name: &str) -> MonumentIcon {
    lookup_icon(name).icon
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match_wins() {
        let m = lookup_icon("Large Oil Rig");
        assert_eq!(m.icon, MonumentIcon::OilRig);
        assert_eq!(m.tier, MatchTier::Exact);
        assert_eq!(lookup_icon("Launch Site").tier, MatchTier::Exact);
    }

    #[test]
    fn substring_fallback_finds_family() {
        let m = lookup_icon("Small Oil Rig Exterior");
        assert_eq!(m.icon, MonumentIcon::OilRig);
        assert_eq!(m.tier, MatchTier::Substring);
    }

    #[test]
    fn exact_tier_is_case_sensitive() {
        let m = lookup_icon("military tunnels");
        assert_eq!(m.icon, MonumentIcon::Military);
        assert_eq!(m.tier, MatchTier::Substring);
    }

    #[test]
    fn unknown_names_get_pin() {
        let m = lookup_icon("Abandoned Cabins");
        assert_eq!(m.icon, MonumentIcon::Pin);
        assert_eq!(m.tier, MatchTier::Fallback);
        assert_eq!(icon_for(""), MonumentIcon::Pin);
    }

    #[test]
    fn every_table_entry_resolves_exactly() {
        for (name, icon) in ICON_TABLE {
            let m = lookup_icon(name);
            assert_eq!(m.icon, *icon, "{name}");
            assert_eq!(m.tier, MatchTier::Exact, "{name}");
        }
    }
}
