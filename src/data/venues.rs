

use std::collections::BTreeSet;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use tracing::{debug, info, warn};

use crate::core::error::{PlannerError, Result};
use crate::planner::category::normalize;
use crate::planner::similarity::GeoPoint;
use crate::planner::vector::dimension_key;
use crate::PREFERENCE_DIMS;

const NAME_COLUMN: &str = "store_name";
const CATEGORY_COLUMN: &str = "standard_category";
const LATITUDE_COLUMN: &str = "latitude";
const LONGITUDE_COLUMN: &str = "longitude";
const QUALITY_COLUMN: &str = "score";


#[derive(Debug, Clone, PartialEq)]
pub struct Venue {
    pub name: String,
    pub raw_category: String,
    pub category: String,
    pub vector: Vec<f32>,
    pub location: Option<GeoPoint>,
    pub quality: f64,
}


struct ColumnIndex {
    name: usize,
    category: usize,
    latitude: usize,
    longitude: usize,
    quality: Option<usize>,
    vector: Vec<usize>,
}

impl ColumnIndex {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let find = |column: &str| headers.iter().position(|h| h.trim() == column);
        let require = |column: &str| {
            find(column).ok_or_else(|| PlannerError::Dataset(format!("missing column '{column}'")))
        };

        let vector = (0..PREFERENCE_DIMS)
            .map(|i| require(&dimension_key(i)))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            name: require(NAME_COLUMN)?,
            category: require(CATEGORY_COLUMN)?,
            latitude: require(LATITUDE_COLUMN)?,
            longitude: require(LONGITUDE_COLUMN)?,
            quality: find(QUALITY_COLUMN),
            vector,
        })
    }
}

fn parse_float(record: &StringRecord, index: usize) -> Option<f64> {
    let raw = record.get(index)?.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("nan") {
        return None;
    }
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}


#[derive(Debug, Default)]
struct LoadStats {
    loaded: usize,
    missing_location: usize,
    unmapped_category: usize,
    bad_vector: usize,
}


/// Read-only venue table, loaded once per process.
#[derive(Debug, Clone, Default)]
pub struct VenueTable {
    venues: Vec<Venue>,
}

impl VenueTable {

    pub fn from_venues(venues: Vec<Venue>) -> Self {
        Self { venues }
    }


    pub fn load(path: &Path) -> Result<Self> {
        info!("Loading venue table from {}", path.display());
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }


    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
        let columns = ColumnIndex::from_headers(csv_reader.headers()?)?;

        let mut stats = LoadStats::default();
        let mut venues = Vec::new();

        for (row, record) in csv_reader.records().enumerate() {
            let record = record?;

            let location = match (
                parse_float(&record, columns.latitude),
                parse_float(&record, columns.longitude),
            ) {
                (Some(lat), Some(lon)) => GeoPoint::new(lat, lon),
                _ => {
                    stats.missing_location += 1;
                    continue;
                }
            };

            let raw_category = record.get(columns.category).unwrap_or_default().trim().to_string();
            let Some(category) = normalize(&raw_category) else {
                stats.unmapped_category += 1;
                continue;
            };

            let vector: Option<Vec<f32>> = columns
                .vector
                .iter()
                .map(|&i| parse_float(&record, i).map(|v| v as f32))
                .collect();
            let Some(vector) = vector else {
                debug!("Row {} has an incomplete preference vector", row + 1);
                stats.bad_vector += 1;
                continue;
            };

            venues.push(Venue {
                name: record.get(columns.name).unwrap_or_default().trim().to_string(),
                raw_category,
                category,
                vector,
                location: Some(location),
                quality: columns
                    .quality
                    .and_then(|i| parse_float(&record, i))
                    .unwrap_or(0.0),
            });
            stats.loaded += 1;
        }

        if stats.bad_vector > 0 {
            warn!("Skipped {} venues with malformed vectors", stats.bad_vector);
        }
        info!(
            "Venue table loaded: venues={}, missing_location={}, unmapped_category={}",
            stats.loaded, stats.missing_location, stats.unmapped_category
        );

        Ok(Self { venues })
    }

    pub fn venues(&self) -> &[Venue] {
        &self.venues
    }

    pub fn len(&self) -> usize {
        self.venues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.venues.is_empty()
    }


    pub fn categories(&self) -> BTreeSet<String> {
        self.venues.iter().map(|v| v.category.clone()).collect()
    }


    pub fn in_categories(&self, categories: &[String]) -> Vec<&Venue> {
        self.venues
            .iter()
            .filter(|v| categories.iter().any(|c| c == &v.category))
            .collect()
    }
}
