//! Reading the input files and writing JSON artifacts.
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::objective::{DemandWeighting, LabParameters};
use crate::recipe::RecipeBook;

/// Errors reading or writing a data file
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("cannot access {file}: {source}")]
    Io {
        file: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid JSON in {file}: {source}")]
    Json {
        file: PathBuf,
        source: serde_json::Error,
    },
}

/// Demand for science packs, and how long the research takes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScienceDemand {
    pub science: BTreeMap<String, f64>,
    /// Total research time in seconds
    pub research_time: f64,
}

impl ScienceDemand {
    /// Weight science packs by the time the labs spend on them
    pub fn into_weighting(self, lab: LabParameters) -> DemandWeighting {
        DemandWeighting::TimeAmortized {
            demand: self.science,
            research_time: self.research_time,
            lab,
        }
    }
}

/// Demand for technologies, either wrapped in a `technologies` key or as a bare map
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TechnologyDemand {
    Wrapped {
        technologies: BTreeMap<String, f64>,
    },
    Flat(BTreeMap<String, f64>),
}

impl TechnologyDemand {
    /// Weight technologies by their plain count
    pub fn into_weighting(self) -> DemandWeighting {
        let demand = match self {
            TechnologyDemand::Wrapped { technologies } => technologies,
            TechnologyDemand::Flat(demand) => demand,
        };
        DemandWeighting::Flat { demand }
    }
}

/// Load `recipes.json`
pub fn load_recipes(file: &Path) -> Result<RecipeBook, DataError> {
    read_json(file)
}

/// Load a science demand file such as `science.json`
pub fn load_science(file: &Path) -> Result<ScienceDemand, DataError> {
    read_json(file)
}

/// Load a technology demand file
pub fn load_technologies(file: &Path) -> Result<TechnologyDemand, DataError> {
    read_json(file)
}

/// Deserialize a JSON file
pub fn read_json<T: DeserializeOwned>(file: &Path) -> Result<T, DataError> {
    let reader = File::open(file).map_err(|source| DataError::Io {
        file: file.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(reader)).map_err(|source| DataError::Json {
        file: file.to_path_buf(),
        source,
    })
}

/// Serialize a value to a pretty-printed JSON file, replacing it if it exists
pub fn write_json<T: Serialize>(file: &Path, value: &T) -> Result<(), DataError> {
    let io_error = |source| DataError::Io {
        file: file.to_path_buf(),
        source,
    };
    let mut writer = BufWriter::new(File::create(file).map_err(io_error)?);
    serde_json::to_writer_pretty(&mut writer, value).map_err(|source| DataError::Json {
        file: file.to_path_buf(),
        source,
    })?;
    writer.flush().map_err(io_error)
}
