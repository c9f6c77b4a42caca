//! Vintage selection

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use census_core::{Error, RowStore, TableMetadata};
use census_formula::DatasourceRef;

use crate::datasources::{AcsSource, DecennialSource};

/// A supported data release
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Vintage {
    Census2000Sf1,
    Census2000Sf3,
    Census2010Pl,
    Census2010Sf1,
    Acs2009e5,
    Acs2010e5,
}

impl Vintage {
    /// Every supported vintage
    pub const ALL: [Vintage; 6] = [
        Vintage::Census2000Sf1,
        Vintage::Census2000Sf3,
        Vintage::Census2010Pl,
        Vintage::Census2010Sf1,
        Vintage::Acs2009e5,
        Vintage::Acs2010e5,
    ];

    /// Selector string, as accepted by [`FromStr`]
    pub fn name(self) -> &'static str {
        match self {
            Vintage::Census2000Sf1 => "census2000-sf1",
            Vintage::Census2000Sf3 => "census2000-sf3",
            Vintage::Census2010Pl => "census2010-pl",
            Vintage::Census2010Sf1 => "census2010-sf1",
            Vintage::Acs2009e5 => "acs2009e5",
            Vintage::Acs2010e5 => "acs2010e5",
        }
    }

    /// Check if estimates carry a margin of error
    pub fn has_margins(self) -> bool {
        matches!(self, Vintage::Acs2009e5 | Vintage::Acs2010e5)
    }

    /// Build the datasource for this vintage
    pub fn open(
        self,
        store: Arc<dyn RowStore>,
        metadata: Arc<dyn TableMetadata>,
    ) -> census_core::Result<DatasourceRef> {
        Ok(match self {
            Vintage::Census2000Sf1 => Arc::new(DecennialSource::census2000("SF1", store, metadata)?),
            Vintage::Census2000Sf3 => Arc::new(DecennialSource::census2000("SF3", store, metadata)?),
            Vintage::Census2010Pl => Arc::new(DecennialSource::census2010("pl", store, metadata)?),
            Vintage::Census2010Sf1 => Arc::new(DecennialSource::census2010("sf1", store, metadata)?),
            Vintage::Acs2009e5 => Arc::new(AcsSource::new(2009, store, metadata)?),
            Vintage::Acs2010e5 => Arc::new(AcsSource::new(2010, store, metadata)?),
        })
    }
}

impl FromStr for Vintage {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Vintage::ALL
            .into_iter()
            .find(|v| v.name() == wanted)
            .ok_or_else(|| Error::UnsupportedVintage(s.to_string()))
    }
}

impl fmt::Display for Vintage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
