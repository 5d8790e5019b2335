use std::collections::{BTreeMap, BTreeSet};
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use super::domain::{FolderError, VisaType};

/// Read-only mapping from visa type to its required document set.
///
/// Built once at startup (from the bundled defaults or a CSV export) and
/// injected into the folder service; it is never mutated during normal
/// operation.
#[derive(Debug, Clone)]
pub struct RequirementCatalog {
    entries: BTreeMap<VisaType, BTreeSet<String>>,
}

/// One `visa_type,requirement` row of a catalog CSV export.
#[derive(Debug, Deserialize)]
struct CatalogRow {
    visa_type: String,
    requirement: String,
}

/// Error raised while loading a catalog from CSV.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("catalog row {row} is missing a {field}")]
    BlankField { row: usize, field: &'static str },
    #[error("catalog contains no requirement rows")]
    Empty,
}

impl RequirementCatalog {
    /// The requirement lists the agency operates with out of the box, one per
    /// supported visa type.
    pub fn with_defaults() -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(
            VisaType::new("estudiantil"),
            requirement_set(&["ci", "matricula_institucion", "solvencia_economica"]),
        );
        entries.insert(
            VisaType::new("trabajo"),
            requirement_set(&["ci", "oferta_laboral", "antecedentes_penales"]),
        );
        entries.insert(
            VisaType::new("residencial"),
            requirement_set(&[
                "ci",
                "comprobante_domicilio",
                "solvencia_economica",
                "antecedentes_penales",
            ]),
        );
        entries.insert(
            VisaType::new("turista"),
            requirement_set(&["pasaporte_vigente", "reserva_hotel", "solvencia_economica"]),
        );
        Self { entries }
    }

    /// Loads a catalog from `visa_type,requirement` CSV rows.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut entries: BTreeMap<VisaType, BTreeSet<String>> = BTreeMap::new();
        for (index, row) in csv_reader.deserialize::<CatalogRow>().enumerate() {
            let row: CatalogRow = row?;
            if row.visa_type.is_empty() {
                return Err(CatalogError::BlankField {
                    row: index + 1,
                    field: "visa type",
                });
            }
            if row.requirement.is_empty() {
                return Err(CatalogError::BlankField {
                    row: index + 1,
                    field: "requirement",
                });
            }
            entries
                .entry(VisaType::new(&row.visa_type))
                .or_default()
                .insert(row.requirement.to_ascii_lowercase());
        }

        if entries.is_empty() {
            return Err(CatalogError::Empty);
        }
        Ok(Self { entries })
    }

    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// The required document set for `visa_type`.
    pub fn requirements_for(&self, visa_type: &VisaType) -> Result<&BTreeSet<String>, FolderError> {
        self.entries
            .get(visa_type)
            .ok_or_else(|| FolderError::UnknownVisaType(visa_type.0.clone()))
    }

    pub fn visa_types(&self) -> impl Iterator<Item = &VisaType> {
        self.entries.keys()
    }
}

fn requirement_set(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|name| name.to_string()).collect()
}
