//! Cushion sizes, price buckets and sizing policies.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ────────────────────────────────────────────────────────────────────────────
// Sizes and buckets
// ────────────────────────────────────────────────────────────────────────────

/// Seat cushion size offered by the form.
///
/// `Valise`, `Small` and `Large` are non-numeric "suitcase" cushions: they are packed
/// with a configurable representative width and priced in the suitcase bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CushionSize {
    S65,
    S80,
    S90,
    Valise,
    Small,
    Large,
}

impl CushionSize {
    pub const STANDARD: [CushionSize; 3] = [CushionSize::S65, CushionSize::S80, CushionSize::S90];

    /// Nominal width in cm for the numeric sizes.
    pub fn standard_width(&self) -> Option<f64> {
        match self {
            CushionSize::S65 => Some(65.0),
            CushionSize::S80 => Some(80.0),
            CushionSize::S90 => Some(90.0),
            _ => None,
        }
    }

    pub fn bucket(&self) -> CushionBucket {
        match self {
            CushionSize::S65 => CushionBucket::S65,
            CushionSize::S80 => CushionBucket::S80,
            CushionSize::S90 => CushionBucket::S90,
            CushionSize::Valise | CushionSize::Small | CushionSize::Large => CushionBucket::Suitcase,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CushionSize::S65 => "65",
            CushionSize::S80 => "80",
            CushionSize::S90 => "90",
            CushionSize::Valise => "valise",
            CushionSize::Small => "p",
            CushionSize::Large => "g",
        }
    }

    fn from_standard_cm(cm: u32) -> Option<CushionSize> {
        match cm {
            65 => Some(CushionSize::S65),
            80 => Some(CushionSize::S80),
            90 => Some(CushionSize::S90),
            _ => None,
        }
    }
}

/// Price bucket a cushion is counted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CushionBucket {
    S65,
    S80,
    S90,
    Suitcase,
}

impl CushionBucket {
    pub const ALL: [CushionBucket; 4] = [
        CushionBucket::S65,
        CushionBucket::S80,
        CushionBucket::S90,
        CushionBucket::Suitcase,
    ];

    pub fn label_fr(&self) -> &'static str {
        match self {
            CushionBucket::S65 => "Coussin 65 cm",
            CushionBucket::S80 => "Coussin 80 cm",
            CushionBucket::S90 => "Coussin 90 cm",
            CushionBucket::Suitcase => "Coussin valise",
        }
    }
}

/// Representative widths for the non-numeric sizes. Placeholders, configurable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CushionWidths {
    pub valise_cm: f64,
    pub small_cm: f64,
    pub large_cm: f64,
}

impl Default for CushionWidths {
    fn default() -> Self {
        Self {
            valise_cm: 70.0,
            small_cm: 60.0,
            large_cm: 100.0,
        }
    }
}

impl CushionWidths {
    pub fn nominal(&self, size: CushionSize) -> f64 {
        match size {
            CushionSize::Valise => self.valise_cm,
            CushionSize::Small => self.small_cm,
            CushionSize::Large => self.large_cm,
            standard => standard.standard_width().unwrap_or(self.valise_cm),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Sizing policy
// ────────────────────────────────────────────────────────────────────────────

/// How seat cushions are sized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SizingPolicy {
    /// One standard size for the whole sofa, chosen to minimise the cushion count.
    #[default]
    Auto,
    Fixed(CushionSize),
    /// Each bench picks its own standard size between `min_cm` and `max_cm`.
    Range { min_cm: u32, max_cm: u32 },
}

impl SizingPolicy {
    /// Parses a form selection key. Unknown keys fall back to `Auto`: they can only
    /// come from the constrained choice list.
    pub fn from_key(key: &str) -> SizingPolicy {
        key.parse().unwrap_or_else(|_| {
            tracing::debug!("Unknown cushion policy '{key}', falling back to auto");
            SizingPolicy::Auto
        })
    }

    /// Standard sizes a range policy may pick from.
    pub fn range_candidates(min_cm: u32, max_cm: u32) -> Vec<CushionSize> {
        CushionSize::STANDARD
            .into_iter()
            .filter(|s| {
                s.standard_width()
                    .map(|w| w >= min_cm as f64 && w <= max_cm as f64)
                    .unwrap_or(false)
            })
            .collect()
    }

    /// Selection keys offered by the form.
    pub fn catalog_keys() -> Vec<&'static str> {
        vec!["auto", "65", "80", "90", "valise", "p", "g", "65-80", "80-90", "65-90"]
    }
}

/// Error for a policy key that is not on the choice list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPolicy(pub String);

impl fmt::Display for UnknownPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown cushion policy '{}'", self.0)
    }
}

impl FromStr for SizingPolicy {
    type Err = UnknownPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        let policy = match key.as_str() {
            "" | "auto" => SizingPolicy::Auto,
            "valise" | "suitcase" => SizingPolicy::Fixed(CushionSize::Valise),
            "p" | "small" => SizingPolicy::Fixed(CushionSize::Small),
            "g" | "large" => SizingPolicy::Fixed(CushionSize::Large),
            other => {
                if let Some((lo, hi)) = other.split_once('-') {
                    let lo: u32 = lo.trim().parse().map_err(|_| UnknownPolicy(s.to_string()))?;
                    let hi: u32 = hi.trim().parse().map_err(|_| UnknownPolicy(s.to_string()))?;
                    let (lo, hi) = (lo.min(hi), lo.max(hi));
                    if SizingPolicy::range_candidates(lo, hi).is_empty() {
                        return Err(UnknownPolicy(s.to_string()));
                    }
                    SizingPolicy::Range { min_cm: lo, max_cm: hi }
                } else {
                    let cm: u32 = other.parse().map_err(|_| UnknownPolicy(s.to_string()))?;
                    SizingPolicy::Fixed(
                        CushionSize::from_standard_cm(cm).ok_or_else(|| UnknownPolicy(s.to_string()))?,
                    )
                }
            }
        };
        Ok(policy)
    }
}

impl fmt::Display for SizingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SizingPolicy::Auto => f.write_str("auto"),
            SizingPolicy::Fixed(size) => f.write_str(size.label()),
            SizingPolicy::Range { min_cm, max_cm } => write!(f, "{min_cm}-{max_cm}"),
        }
    }
}

impl Serialize for SizingPolicy {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for SizingPolicy {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(u32),
        }
        let key = match Raw::deserialize(deserializer)? {
            Raw::Text(s) => s,
            Raw::Number(n) => n.to_string(),
        };
        Ok(SizingPolicy::from_key(&key))
    }
}
