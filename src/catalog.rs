use serde::{Deserialize, Deserializer};
use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// The one message shown in the grid when the catalog cannot be loaded.
pub const LOAD_FAILURE_NOTICE: &str = "Failed to load catalog.";

/// A single game entry from the catalog file.
///
/// Field names follow the English schema; Portuguese names from legacy
/// data files are accepted as aliases. Missing fields fall back to
/// empty values instead of failing the whole load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GameRecord {
    #[serde(alias = "titulo")]
    pub title: String,
    #[serde(alias = "descricao")]
    pub description: String,
    #[serde(alias = "desenvolvedora")]
    pub developer: String,
    #[serde(alias = "genero")]
    pub genre: String,
    #[serde(alias = "plataforma")]
    pub platform: String,
    #[serde(alias = "ano", deserialize_with = "year_by_value")]
    pub year: i32,
    #[serde(alias = "capa")]
    pub cover: String,
    pub tags: Vec<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum YearRepr {
    Number(i64),
    Float(f64),
    Text(String),
}

/// Years compare by value, so `2017`, `2017.0` and `"2017"` are the same year.
fn year_by_value<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match YearRepr::deserialize(deserializer)? {
        YearRepr::Number(n) => i32::try_from(n).map_err(D::Error::custom),
        YearRepr::Float(f) if f.fract() == 0.0 && f.abs() <= i32::MAX as f64 => Ok(f as i32),
        YearRepr::Float(f) => Err(D::Error::custom(format!("invalid year: {f}"))),
        YearRepr::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| D::Error::custom(format!("invalid year: {s:?}"))),
    }
}

/// Distinct values offered by the genre, platform and year selectors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOptions {
    /// First-seen order.
    pub genres: Vec<String>,
    /// First-seen order.
    pub platforms: Vec<String>,
    /// Numerically descending.
    pub years: Vec<i32>,
}

/// The full, immutable list of games loaded at startup.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: Vec<GameRecord>,
}

impl Catalog {
    pub fn new(records: Vec<GameRecord>) -> Self {
        Self { records }
    }

    /// Parse a JSON array of records.
    pub fn from_json(bytes: &[u8]) -> Result<Self, LoadError> {
        let records: Vec<GameRecord> = serde_json::from_slice(bytes)?;
        Ok(Self::new(records))
    }

    pub fn records(&self) -> &[GameRecord] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&GameRecord> {
        self.records.get(index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Derive the selector option lists. Called once, right after load.
    pub fn filter_options(&self) -> FilterOptions {
        let mut options = FilterOptions::default();
        let mut seen_genres = HashSet::new();
        let mut seen_platforms = HashSet::new();
        let mut seen_years = HashSet::new();

        for record in &self.records {
            if seen_genres.insert(record.genre.as_str()) {
                options.genres.push(record.genre.clone());
            }
            if seen_platforms.insert(record.platform.as_str()) {
                options.platforms.push(record.platform.clone());
            }
            if seen_years.insert(record.year) {
                options.years.push(record.year);
            }
        }

        options.years.sort_unstable_by(|a, b| b.cmp(a));
        options
    }
}

/// Where the catalog is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    File(PathBuf),
    Url(String),
}

impl CatalogSource {
    /// `http://` and `https://` locations are fetched, everything else is a path.
    pub fn parse(location: &str) -> Self {
        let lower = location.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Self::Url(location.to_string())
        } else {
            Self::File(PathBuf::from(location))
        }
    }
}

impl fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Url(url) => f.write_str(url),
        }
    }
}

/// Why the catalog could not be loaded. The UI does not distinguish
/// between these; the cause only goes to the log.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} while fetching {url}")]
    Status { status: u16, url: String },

    #[error("Catalog is not a valid JSON record list: {0}")]
    Parse(#[from] serde_json::Error),
}

impl LoadError {
    /// Get the user-facing message
    pub fn user_message(&self) -> &'static str {
        LOAD_FAILURE_NOTICE
    }
}

/// Read the whole source once and parse it. No retries.
pub async fn load(source: &CatalogSource) -> Result<Catalog, LoadError> {
    let body = match source {
        CatalogSource::File(path) => {
            tokio::fs::read(path).await.map_err(|source| LoadError::Io {
                path: path.clone(),
                source,
            })?
        }
        CatalogSource::Url(url) => {
            let response = reqwest::get(url).await?;
            let status = response.status();
            if !status.is_success() {
                return Err(LoadError::Status {
                    status: status.as_u16(),
                    url: url.clone(),
                });
            }
            response.bytes().await?.to_vec()
        }
    };

    Catalog::from_json(&body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"[
        {"title": "Hollow Knight", "description": "Bugs.", "developer": "Team Cherry",
         "genre": "Metroidvania", "platform": "PC", "year": 2017,
         "cover": "img/hk.png", "tags": ["indie", "hard"]},
        {"title": "Persona 5", "description": "Heists.", "developer": "Atlus",
         "genre": "RPG", "platform": "PS4", "year": 2016,
         "cover": "img/p5.png", "tags": ["jrpg"]},
        {"title": "Celeste", "description": "Climb.", "developer": "Maddy Makes Games",
         "genre": "Platformer", "platform": "PC", "year": 2018,
         "cover": "img/celeste.png", "tags": []},
        {"title": "Nier: Automata", "description": "Androids.", "developer": "PlatinumGames",
         "genre": "RPG", "platform": "PS4", "year": 2017,
         "cover": "img/nier.png", "tags": ["action"]}
    ]"#;

    #[test]
    fn test_parse_english_fields() {
        let catalog = Catalog::from_json(SAMPLE.as_bytes()).unwrap();
        assert_eq!(catalog.len(), 4);
        let first = catalog.get(0).unwrap();
        assert_eq!(first.title, "Hollow Knight");
        assert_eq!(first.year, 2017);
        assert_eq!(first.tags, vec!["indie", "hard"]);
    }

    #[test]
    fn test_parse_portuguese_field_names() {
        let json = r#"[{"titulo": "Hades", "descricao": "Escape.", "desenvolvedora": "Supergiant",
            "genero": "Roguelike", "plataforma": "Switch", "ano": 2020,
            "capa": "img/hades.png", "tags": ["indie"]}]"#;
        let catalog = Catalog::from_json(json.as_bytes()).unwrap();
        let record = catalog.get(0).unwrap();
        assert_eq!(record.title, "Hades");
        assert_eq!(record.developer, "Supergiant");
        assert_eq!(record.genre, "Roguelike");
        assert_eq!(record.platform, "Switch");
        assert_eq!(record.year, 2020);
        assert_eq!(record.cover, "img/hades.png");
    }

    #[test]
    fn test_year_compared_by_value() {
        let json = r#"[{"title": "A", "year": "2017"}, {"title": "B", "year": 2017.0}]"#;
        let catalog = Catalog::from_json(json.as_bytes()).unwrap();
        assert_eq!(catalog.get(0).unwrap().year, 2017);
        assert_eq!(catalog.get(1).unwrap().year, 2017);
    }

    #[test]
    fn test_missing_fields_default() {
        let catalog = Catalog::from_json(br#"[{"title": "Lonely"}]"#).unwrap();
        let record = catalog.get(0).unwrap();
        assert_eq!(record.title, "Lonely");
        assert_eq!(record.description, "");
        assert_eq!(record.year, 0);
        assert!(record.tags.is_empty());
    }

    #[test]
    fn test_unparseable_document_is_parse_error() {
        assert!(matches!(
            Catalog::from_json(b"{not json"),
            Err(LoadError::Parse(_))
        ));
        assert!(matches!(
            Catalog::from_json(br#"[{"title": "X", "year": "soon"}]"#),
            Err(LoadError::Parse(_))
        ));
    }

    #[test]
    fn test_filter_options_order() {
        let catalog = Catalog::from_json(SAMPLE.as_bytes()).unwrap();
        let options = catalog.filter_options();
        assert_eq!(options.genres, vec!["Metroidvania", "RPG", "Platformer"]);
        assert_eq!(options.platforms, vec!["PC", "PS4"]);
        assert_eq!(options.years, vec![2018, 2017, 2016]);
    }

    #[test]
    fn test_filter_options_empty_catalog() {
        assert_eq!(Catalog::default().filter_options(), FilterOptions::default());
    }

    #[test]
    fn test_source_parse() {
        assert_eq!(
            CatalogSource::parse("https://example.com/catalog.json"),
            CatalogSource::Url("https://example.com/catalog.json".to_string())
        );
        assert_eq!(
            CatalogSource::parse("HTTP://example.com/c.json"),
            CatalogSource::Url("HTTP://example.com/c.json".to_string())
        );
        assert_eq!(
            CatalogSource::parse("data/catalog.json"),
            CatalogSource::File(PathBuf::from("data/catalog.json"))
        );
    }

    #[test]
    fn test_user_message_is_uniform() {
        let io = LoadError::Io {
            path: PathBuf::from("missing.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        let status = LoadError::Status {
            status: 404,
            url: "http://example.com".to_string(),
        };
        assert_eq!(io.user_message(), LOAD_FAILURE_NOTICE);
        assert_eq!(status.user_message(), LOAD_FAILURE_NOTICE);
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let source = CatalogSource::File(file.path().to_path_buf());
        let catalog = load(&source).await.unwrap();
        assert_eq!(catalog.len(), 4);
    }

    #[tokio::test]
    async fn test_load_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let source = CatalogSource::File(dir.path().join("nope.json"));
        assert!(matches!(load(&source).await, Err(LoadError::Io { .. })));
    }
}
