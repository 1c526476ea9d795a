//! Attacking-type x defending-type effectiveness lookup.
//!
//! The table is read once from a tabular resource: the header row names the
//! defending types, and every following row starts with an attacking type
//! followed by one multiplier per defending column. Anything the table does
//! not say is treated as neutral (1.0).

use crate::errors::{ConfigError, ConfigResult};
use schema::PokemonType;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::sync::OnceLock;
use strum::IntoEnumIterator;
use tracing::{debug, warn};

static TYPE_CHART: OnceLock<TypeChart> = OnceLock::new();

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypeChart {
    rows: HashMap<PokemonType, HashMap<PokemonType, f64>>,
}

impl TypeChart {
    /// Build the chart from the engine's built-in matchup table.
    pub fn builtin() -> Self {
        let rows = PokemonType::iter()
            .map(|attacking| {
                let row = PokemonType::iter()
                    .map(|defending| {
                        (
                            defending,
                            PokemonType::type_effectiveness(attacking, defending),
                        )
                    })
                    .collect();
                (attacking, row)
            })
            .collect();
        Self { rows }
    }

    /// Parse a comma-separated table. Unknown type names and unparseable
    /// cells are skipped, which leaves those matchups neutral.
    pub fn from_csv_str(content: &str) -> ConfigResult<Self> {
        let mut lines = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'));

        let header = lines
            .next()
            .ok_or_else(|| ConfigError::TypeChartMalformed("missing header row".to_string()))?;

        // The first header cell labels the attacking-type column.
        let columns: Vec<Option<PokemonType>> = header
            .split(',')
            .skip(1)
            .map(|name| {
                let name = name.trim();
                let parsed = PokemonType::from_str(name).ok();
                if parsed.is_none() {
                    warn!(column = name, "Ignoring unknown defending type in type chart");
                }
                parsed
            })
            .collect();

        if columns.is_empty() {
            return Err(ConfigError::TypeChartMalformed(
                "header row names no defending types".to_string(),
            ));
        }

        let mut rows = HashMap::new();
        for line in lines {
            let mut cells = line.split(',').map(str::trim);
            let Some(attacking_name) = cells.next() else {
                continue;
            };
            let Ok(attacking) = PokemonType::from_str(attacking_name) else {
                warn!(row = attacking_name, "Ignoring unknown attacking type in type chart");
                continue;
            };

            let mut row = HashMap::new();
            for (defending, cell) in columns.iter().zip(cells) {
                let Some(defending) = defending else {
                    continue;
                };
                match cell.parse::<f64>() {
                    Ok(multiplier) if multiplier.is_finite() && multiplier >= 0.0 => {
                        row.insert(*defending, multiplier);
                    }
                    _ => {
                        warn!(
                            attacking = %attacking,
                            defending = %defending,
                            cell,
                            "Unparseable type chart cell, treating as neutral"
                        );
                    }
                }
            }
            rows.insert(attacking, row);
        }

        Ok(Self { rows })
    }

    /// Load the table from disk. A missing file is fatal for the caller.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::TypeChartMissing {
                path: path.to_path_buf(),
            });
        }
        let content = fs::read_to_string(path).map_err(|_| ConfigError::TypeChartMissing {
            path: path.to_path_buf(),
        })?;
        let chart = Self::from_csv_str(&content)?;
        debug!(path = %path.display(), rows = chart.rows.len(), "Loaded type chart");
        Ok(chart)
    }

    /// Multiplier for a single attacking/defending pairing.
    pub fn effectiveness(&self, attacking: PokemonType, defending: PokemonType) -> f64 {
        self.rows
            .get(&attacking)
            .and_then(|row| row.get(&defending))
            .copied()
            .unwrap_or(1.0)
    }

    /// Product of the multipliers against each of the defender's types.
    pub fn effectiveness_against(
        &self,
        attacking: PokemonType,
        primary: PokemonType,
        secondary: Option<PokemonType>,
    ) -> f64 {
        let mut multiplier = self.effectiveness(attacking, primary);
        if let Some(secondary) = secondary {
            multiplier *= self.effectiveness(attacking, secondary);
        }
        multiplier
    }
}

/// Install the process-wide chart from a file. The first successful call wins;
/// later calls are ignored so every battle in the process sees the same table.
/// A missing or unreadable file leaves the engine without a chart.
pub fn initialize_type_chart(path: &Path) -> ConfigResult<&'static TypeChart> {
    let chart = TypeChart::load(path)?;
    Ok(install_type_chart(chart))
}

/// Install an already-built chart, e.g. `TypeChart::builtin()` when embedding
/// the engine without data files. Returns the chart every battle will use.
pub fn install_type_chart(chart: TypeChart) -> &'static TypeChart {
    if let Err(rejected) = TYPE_CHART.set(chart) {
        if TYPE_CHART.get() != Some(&rejected) {
            warn!("Type chart already initialized, keeping existing table");
        }
    }
    TYPE_CHART.get_or_init(TypeChart::default)
}

/// The process-wide chart. Battles cannot start until one has been installed.
pub fn type_chart() -> ConfigResult<&'static TypeChart> {
    TYPE_CHART.get().ok_or(ConfigError::TypeChartUninitialized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    const BUNDLED_CSV: &str = include_str!("../data/type_chart.csv");

    #[test]
    fn test_bundled_csv_matches_builtin_table() {
        let from_csv = TypeChart::from_csv_str(BUNDLED_CSV).unwrap();
        assert_eq!(from_csv, TypeChart::builtin());
    }

    #[rstest]
    #[case(PokemonType::Water, PokemonType::Fire, 2.0)]
    #[case(PokemonType::Fire, PokemonType::Water, 0.5)]
    #[case(PokemonType::Electric, PokemonType::Ground, 0.0)]
    #[case(PokemonType::Normal, PokemonType::Normal, 1.0)]
    fn test_effectiveness_lookup(
        #[case] attacking: PokemonType,
        #[case] defending: PokemonType,
        #[case] expected: f64,
    ) {
        assert_eq!(TypeChart::builtin().effectiveness(attacking, defending), expected);
    }

    #[test]
    fn test_bad_cells_and_missing_rows_default_to_neutral() {
        let csv = "Attacking,Fire,Water,Sound\nWater,2,oops,4\nFire,0.5\n";
        let chart = TypeChart::from_csv_str(csv).unwrap();

        assert_eq!(chart.effectiveness(PokemonType::Water, PokemonType::Fire), 2.0);
        // Unparseable cell
        assert_eq!(chart.effectiveness(PokemonType::Water, PokemonType::Water), 1.0);
        // Short row
        assert_eq!(chart.effectiveness(PokemonType::Fire, PokemonType::Water), 1.0);
        // No row for the attacking type at all
        assert_eq!(chart.effectiveness(PokemonType::Grass, PokemonType::Fire), 1.0);
        // No column for the defending type
        assert_eq!(chart.effectiveness(PokemonType::Water, PokemonType::Rock), 1.0);
    }

    #[test]
    fn test_dual_type_multipliers_are_multiplied() {
        let chart = TypeChart::builtin();
        let multiplier = chart.effectiveness_against(
            PokemonType::Ice,
            PokemonType::Dragon,
            Some(PokemonType::Flying),
        );
        assert_eq!(multiplier, 4.0);
    }

    #[test]
    fn test_empty_table_is_malformed() {
        assert!(matches!(
            TypeChart::from_csv_str("\n\n"),
            Err(ConfigError::TypeChartMalformed(_))
        ));
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let result = TypeChart::load(Path::new("does/not/exist.csv"));
        assert!(matches!(result, Err(ConfigError::TypeChartMissing { .. })));
        assert!(matches!(
            initialize_type_chart(Path::new("does/not/exist.csv")),
            Err(ConfigError::TypeChartMissing { .. })
        ));
    }

    #[test]
    fn test_install_keeps_first_chart() {
        let installed = install_type_chart(TypeChart::builtin());
        assert_eq!(installed, &TypeChart::builtin());
        assert_eq!(install_type_chart(TypeChart::default()), installed);
        assert_eq!(type_chart(), Ok(installed));
    }
}
