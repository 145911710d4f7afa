use crate::error::BoundingBoxError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Geographic extent in degrees, as reported by a viewport or a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl BoundingBox {
    pub fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self {
            west,
            south,
            east,
            north,
        }
    }

    /// A box collapsed onto a single coordinate.
    pub fn point(lon: f64, lat: f64) -> Self {
        Self::new(lon, lat, lon, lat)
    }

    pub fn validate(&self) -> Result<(), BoundingBoxError> {
        for lat in [self.south, self.north] {
            if !(-90.0..=90.0).contains(&lat) {
                return Err(BoundingBoxError::LatitudeOutOfRange(lat));
            }
        }
        for lon in [self.west, self.east] {
            if !(-180.0..=180.0).contains(&lon) {
                return Err(BoundingBoxError::LongitudeOutOfRange(lon));
            }
        }
        if self.west >= self.east {
            return Err(BoundingBoxError::InvertedLongitude {
                west: self.west,
                east: self.east,
            });
        }
        if self.south >= self.north {
            return Err(BoundingBoxError::InvertedLatitude {
                south: self.south,
                north: self.north,
            });
        }
        Ok(())
    }
}

/// `[west, south, east, north]`, the order used by tile headers and map viewports.
impl From<[f64; 4]> for BoundingBox {
    fn from(b: [f64; 4]) -> Self {
        Self::new(b[0], b[1], b[2], b[3])
    }
}

/// Server-side state of a long-running job.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    #[default]
    InProgress,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

/// Latest progress snapshot returned by the job-status endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct JobProgress {
    #[serde(default)]
    pub status: JobStatus,
    /// Percentage in `[0, 100]`.
    #[serde(default, deserialize_with = "de_f64_from_string_or_number")]
    pub progress: f64,
}

impl JobProgress {
    pub fn new(status: JobStatus, progress: f64) -> Self {
        Self { status, progress }
    }
}

/// Serde helper: decimal fields are sometimes serialized as strings (`"40.00"`).
/// Accept both strings and numbers; `null` becomes 0.
fn de_f64_from_string_or_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    struct F64Visitor;

    impl<'de> Visitor<'de> for F64Visitor {
        type Value = f64;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            write!(f, "a number or a string holding a number")
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
            Ok(v)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            Ok(v as f64)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            Ok(v as f64)
        }

        fn visit_str<E: de::Error>(self, s: &str) -> Result<Self::Value, E> {
            s.trim().parse::<f64>().map_err(E::custom)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(0.0)
        }
    }

    deserializer.deserialize_any(F64Visitor)
}

/// A job whose progress can be watched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobRef {
    /// Upload processing of a freshly created dataset.
    DatasetIngestion { dataset_id: u64 },
    /// Tileset generation for an existing dataset.
    TilesetGeneration { dataset_id: u64, tileset_id: u64 },
}

impl JobRef {
    pub fn dataset_id(&self) -> u64 {
        match *self {
            JobRef::DatasetIngestion { dataset_id } => dataset_id,
            JobRef::TilesetGeneration { dataset_id, .. } => dataset_id,
        }
    }
}

impl fmt::Display for JobRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobRef::DatasetIngestion { dataset_id } => write!(f, "dataset {dataset_id}"),
            JobRef::TilesetGeneration {
                dataset_id,
                tileset_id,
            } => write!(f, "dataset {dataset_id} / tileset {tileset_id}"),
        }
    }
}

/// Classification methods offered by the server's tier endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationMethod {
    Quantile,
    NaturalBreaks,
    Percentile,
}

impl ClassificationMethod {
    pub fn as_query_param(&self) -> &'static str {
        match self {
            ClassificationMethod::Quantile => "quantile",
            ClassificationMethod::NaturalBreaks => "natural_breaks",
            ClassificationMethod::Percentile => "percentile",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ClassificationMethod::Quantile => "Quantile",
            ClassificationMethod::NaturalBreaks => "Natural Breaks",
            ClassificationMethod::Percentile => "Percentile",
        }
    }
}

/// Parameters of a break computation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationRequest {
    pub field: String,
    pub method: ClassificationMethod,
    pub classes: u32,
}

/// Body returned by the tier endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TierBreaks {
    #[serde(default)]
    pub breaks: Vec<f64>,
}

/// One layer of a vector tileset as listed in its metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VectorLayer {
    pub id: String,
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub minzoom: u8,
    #[serde(default)]
    pub maxzoom: u8,
}

impl VectorLayer {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileHeader {
    pub min_zoom: u8,
    pub max_zoom: u8,
    pub bounds: [f64; 4],
    pub center: [f64; 3],
}

impl TileHeader {
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from(self.bounds)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TileMetadata {
    #[serde(default)]
    pub vector_layers: Vec<VectorLayer>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub format: String,
    #[serde(default)]
    pub generator: String,
}

/// Result of inspecting a generated tileset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileMetadataResponse {
    pub header: TileHeader,
    pub metadata: TileMetadata,
}
