//! Platform and regional routing values for addressing the API shards

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AppError;

/// Platform (server) an account lives on. Serialized as the API host label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformRoute {
    Br1,
    Eun1,
    Euw1,
    Jp1,
    Kr,
    La1,
    La2,
    Me1,
    #[default]
    Na1,
    Oc1,
    Ph2,
    Ru,
    Sg2,
    Th2,
    Tr1,
    Tw2,
    Vn2,
}

/// Regional routing key used by the account and match endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegionalRoute {
    Americas,
    Asia,
    Europe,
    Sea,
}

impl PlatformRoute {
    pub const ALL: [PlatformRoute; 17] = [
        PlatformRoute::Br1,
        PlatformRoute::Eun1,
        PlatformRoute::Euw1,
        PlatformRoute::Jp1,
        PlatformRoute::Kr,
        PlatformRoute::La1,
        PlatformRoute::La2,
        PlatformRoute::Me1,
        PlatformRoute::Na1,
        PlatformRoute::Oc1,
        PlatformRoute::Ph2,
        PlatformRoute::Ru,
        PlatformRoute::Sg2,
        PlatformRoute::Th2,
        PlatformRoute::Tr1,
        PlatformRoute::Tw2,
        PlatformRoute::Vn2,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PlatformRoute::Br1 => "br1",
            PlatformRoute::Eun1 => "eun1",
            PlatformRoute::Euw1 => "euw1",
            PlatformRoute::Jp1 => "jp1",
            PlatformRoute::Kr => "kr",
            PlatformRoute::La1 => "la1",
            PlatformRoute::La2 => "la2",
            PlatformRoute::Me1 => "me1",
            PlatformRoute::Na1 => "na1",
            PlatformRoute::Oc1 => "oc1",
            PlatformRoute::Ph2 => "ph2",
            PlatformRoute::Ru => "ru",
            PlatformRoute::Sg2 => "sg2",
            PlatformRoute::Th2 => "th2",
            PlatformRoute::Tr1 => "tr1",
            PlatformRoute::Tw2 => "tw2",
            PlatformRoute::Vn2 => "vn2",
        }
    }

    /// Regional shard that serves match and account data for this platform
    pub fn to_regional(self) -> RegionalRoute {
        match self {
            PlatformRoute::Br1 | PlatformRoute::La1 | PlatformRoute::La2 | PlatformRoute::Na1 => {
                RegionalRoute::Americas
            }
            PlatformRoute::Jp1 | PlatformRoute::Kr => RegionalRoute::Asia,
            PlatformRoute::Eun1
            | PlatformRoute::Euw1
            | PlatformRoute::Me1
            | PlatformRoute::Ru
            | PlatformRoute::Tr1 => RegionalRoute::Europe,
            PlatformRoute::Oc1
            | PlatformRoute::Ph2
            | PlatformRoute::Sg2
            | PlatformRoute::Th2
            | PlatformRoute::Tw2
            | PlatformRoute::Vn2 => RegionalRoute::Sea,
        }
    }
}

impl RegionalRoute {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegionalRoute::Americas => "americas",
            RegionalRoute::Asia => "asia",
            RegionalRoute::Europe => "europe",
            RegionalRoute::Sea => "sea",
        }
    }
}

impl fmt::Display for PlatformRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for RegionalRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlatformRoute {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        PlatformRoute::ALL
            .into_iter()
            .find(|p| p.as_str() == wanted)
            .ok_or_else(|| AppError::config_error(format!("Unknown platform region '{s}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_to_regional() {
        assert_eq!(PlatformRoute::Na1.to_regional(), RegionalRoute::Americas);
        assert_eq!(PlatformRoute::Br1.to_regional(), RegionalRoute::Americas);
        assert_eq!(PlatformRoute::Kr.to_regional(), RegionalRoute::Asia);
        assert_eq!(PlatformRoute::Euw1.to_regional(), RegionalRoute::Europe);
        assert_eq!(PlatformRoute::Tr1.to_regional(), RegionalRoute::Europe);
        assert_eq!(PlatformRoute::Oc1.to_regional(), RegionalRoute::Sea);
        assert_eq!(PlatformRoute::Vn2.to_regional(), RegionalRoute::Sea);
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("EUW1".parse::<PlatformRoute>().unwrap(), PlatformRoute::Euw1);
        assert_eq!(" kr ".parse::<PlatformRoute>().unwrap(), PlatformRoute::Kr);
        assert!("mars1".parse::<PlatformRoute>().is_err());
    }

    #[test]
    fn test_serde_uses_host_labels() {
        assert_eq!(
            serde_json::to_string(&PlatformRoute::Eun1).unwrap(),
            "\"eun1\""
        );
        assert_eq!(
            serde_json::to_string(&RegionalRoute::Americas).unwrap(),
            "\"americas\""
        );
        for platform in PlatformRoute::ALL {
            let json = serde_json::to_string(&platform).unwrap();
            assert_eq!(json, format!("\"{}\"", platform.as_str()));
        }
    }
}
