use std::{collections::HashSet, fs, path::Path};

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single movie entry served by the search endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: String,
    pub title: String,
    pub year: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
}

/// Immutable record set backing local mode. Loaded once at startup and shared
/// read-only for the process lifetime; there are no create/update/delete paths.
#[derive(Debug, Clone)]
pub struct Catalog {
    movies: Vec<Movie>,
    loaded_at: DateTime<Utc>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate ids.
    pub fn new(movies: Vec<Movie>) -> Result<Self> {
        let mut seen = HashSet::new();
        for movie in &movies {
            if !seen.insert(movie.id.as_str()) {
                bail!("duplicate movie id '{}' in catalog", movie.id);
            }
        }
        Ok(Self {
            movies,
            loaded_at: Utc::now(),
        })
    }

    /// The dataset compiled into the binary, used when no catalog file is given.
    pub fn builtin() -> Self {
        Self {
            movies: builtin_movies(),
            loaded_at: Utc::now(),
        }
    }

    /// Load a catalog from a JSON array of movies.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read catalog file '{}'", path.display()))?;
        let movies: Vec<Movie> = serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse catalog file '{}'", path.display()))?;
        Self::new(movies)
    }

    /// Resolve the configured dataset: a file when one is named, the built-in
    /// catalog otherwise.
    pub fn load(catalog_file: Option<&Path>) -> Result<Self> {
        match catalog_file {
            Some(path) => Self::from_file(path),
            None => Ok(Self::builtin()),
        }
    }

    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }
}

fn builtin_movies() -> Vec<Movie> {
    fn movie(id: &str, title: &str, year: i32, poster_url: Option<&str>) -> Movie {
        Movie {
            id: id.to_string(),
            title: title.to_string(),
            year,
            poster_url: poster_url.map(String::from),
        }
    }

    vec![
        movie(
            "the-matrix",
            "The Matrix",
            1999,
            Some("https://placehold.co/600x900?text=The+Matrix"),
        ),
        movie("the-matrix-reloaded", "The Matrix Reloaded", 2003, None),
        movie(
            "inception",
            "Inception",
            2010,
            Some("https://placehold.co/600x900?text=Inception"),
        ),
        movie("interstellar", "Interstellar", 2014, None),
        movie("blade-runner", "Blade Runner", 1982, None),
        movie("blade-runner-2049", "Blade Runner 2049", 2017, None),
        movie("alien", "Alien", 1979, None),
        movie("aliens", "Aliens", 1986, None),
        movie("the-godfather", "The Godfather", 1972, None),
        movie(
            "pulp-fiction",
            "Pulp Fiction",
            1994,
            Some("https://placehold.co/600x900?text=Pulp+Fiction"),
        ),
        movie("spirited-away", "Spirited Away", 2001, None),
        movie("seven-samurai", "Seven Samurai", 1954, None),
        movie("parasite", "Parasite", 2019, None),
        movie("whiplash", "Whiplash", 2014, None),
        movie("arrival", "Arrival", 2016, None),
        movie("heat", "Heat", 1995, None),
    ]
}
