//! Piecewise-linear landscape gradient: maps a biome noise value to a height
//! multiplier and a landscape classification.

use icoterra_mesh::{LandscapeClass, LandscapeType};

use crate::TerrainError;

/// One step of a [`GradientTable`].
#[derive(Clone, Debug, PartialEq)]
pub struct GradientEntry {
    pub landscape: LandscapeType,
    /// Cumulative threshold at which this entry starts to govern.
    pub from: f64,
    /// Distance over which the multiplier blends in from the previous entry.
    pub blend_width: f64,
    /// `from + blend_width`.
    pub blend_end: f64,
    pub height_multiplier: f64,
    /// Index of the entry below this one, if any.
    pub previous: Option<usize>,
}

/// Result of a gradient lookup.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradientSample {
    pub multiplier: f64,
    /// `None` only for an empty table.
    pub class: Option<LandscapeClass>,
}

/// Ordered gradient entries, non-decreasing in `from`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GradientTable {
    entries: Vec<GradientEntry>,
}

impl GradientTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from `(landscape, from, blend_width, height_multiplier)` rows.
    ///
    /// # Errors
    ///
    /// Fails on the first row that [`push`](Self::push) rejects.
    pub fn from_rows(
        rows: impl IntoIterator<Item = (LandscapeType, f64, f64, f64)>,
    ) -> Result<Self, TerrainError> {
        let mut table = Self::new();
        for (landscape, from, blend_width, height_multiplier) in rows {
            table.push(landscape, from, blend_width, height_multiplier)?;
        }
        Ok(table)
    }

    /// The stock seven-step table: plains, two hill bands, four mountain bands.
    pub fn standard() -> Self {
        use LandscapeType::{Hills, Mountains, Plains};
        let rows = [
            (Plains, 0.0, 0.0, 0.2),
            (Hills, 0.3, 0.05, 0.6),
            (Hills, 0.4, 0.1, 0.8),
            (Mountains, 0.6, 0.069, 1.25),
            (Mountains, 0.7, 0.69, 2.5),
            (Mountains, 0.9, 0.69, 3.3),
            (Mountains, 1.7, 0.69, 5.0),
        ];
        let mut entries = Vec::with_capacity(rows.len());
        for (i, (landscape, from, blend_width, height_multiplier)) in rows.into_iter().enumerate() {
            entries.push(GradientEntry {
                landscape,
                from,
                blend_width,
                blend_end: from + blend_width,
                height_multiplier,
                previous: i.checked_sub(1),
            });
        }
        Self { entries }
    }

    /// Append an entry above all existing ones.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError::UnorderedGradient`] if `from` is below the last
    /// entry's threshold (or NaN), and [`TerrainError::NegativeBlendWidth`] if
    /// `blend_width` is negative or not finite.
    pub fn push(
        &mut self,
        landscape: LandscapeType,
        from: f64,
        blend_width: f64,
        height_multiplier: f64,
    ) -> Result<(), TerrainError> {
        let index = self.entries.len();
        let previous = self.entries.last().map_or(f64::NEG_INFINITY, |e| e.from);
        if !(from >= previous) {
            return Err(TerrainError::UnorderedGradient {
                index,
                from,
                previous,
            });
        }
        if !(blend_width >= 0.0 && blend_width.is_finite()) {
            return Err(TerrainError::NegativeBlendWidth {
                index,
                width: blend_width,
            });
        }

        self.entries.push(GradientEntry {
            landscape,
            from,
            blend_width,
            blend_end: from + blend_width,
            height_multiplier,
            previous: index.checked_sub(1),
        });
        Ok(())
    }

    pub fn entries(&self) -> &[GradientEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Evaluate the table at `value`.
    ///
    /// The governing entry is the highest one whose `from` is at or below
    /// `value`; values under the first threshold fall back to the first entry.
    /// Between `from` and `blend_end` the multiplier is interpolated from the
    /// previous entry's, and the classification score is the interpolation
    /// weight. An empty table yields a multiplier of 1 and no class.
    pub fn sample(&self, value: f64) -> GradientSample {
        if self.entries.is_empty() {
            return GradientSample {
                multiplier: 1.0,
                class: None,
            };
        }

        let index = self.entries.iter().rposition(|e| e.from <= value).unwrap_or(0);
        let entry = &self.entries[index];

        let (multiplier, score) = match entry.previous {
            Some(prev) if value < entry.blend_end => {
                let t = (value - entry.from) / entry.blend_width;
                let below = self.entries[prev].height_multiplier;
                (below + (entry.height_multiplier - below) * t, t.clamp(0.0, 1.0))
            }
            _ => (entry.height_multiplier, 1.0),
        };

        GradientSample {
            multiplier,
            class: Some(LandscapeClass {
                landscape: entry.landscape,
                score,
            }),
        }
    }

    /// Shorthand for `self.sample(value).multiplier`.
    pub fn height_multiplier(&self, value: f64) -> f64 {
        self.sample(value).multiplier
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-12;

    #[test]
    fn test_empty_table_is_neutral() {
        let table = GradientTable::new();
        let s = table.sample(0.5);
        assert_eq!(s.multiplier, 1.0);
        assert!(s.class.is_none());
    }

    #[test]
    fn test_standard_table_matches_rows() {
        let standard = GradientTable::standard();
        let built = GradientTable::from_rows(
            standard
                .entries()
                .iter()
                .map(|e| (e.landscape, e.from, e.blend_width, e.height_multiplier)),
        )
        .unwrap();
        assert_eq!(standard, built);
        assert_eq!(standard.len(), 7);
    }

    #[test]
    fn test_value_at_from_returns_blended_value() {
        let table = GradientTable::standard();
        // Hills at 0.3 blends in from Plains over 0.05; at `from` the weight is zero.
        let s = table.sample(0.3);
        assert!((s.multiplier - 0.2).abs() < EPSILON);
        let class = s.class.unwrap();
        assert_eq!(class.landscape, LandscapeType::Hills);
        assert!(class.score.abs() < EPSILON);
    }

    #[test]
    fn test_value_at_blend_end_returns_exact_multiplier() {
        let table = GradientTable::standard();
        let hills = &table.entries()[1];
        assert_eq!(table.height_multiplier(hills.blend_end), 0.6);
        assert_eq!(table.height_multiplier(0.36), 0.6);
        assert_eq!(table.height_multiplier(0.55), 0.8);
        assert_eq!(table.height_multiplier(2.5), 5.0);
        let top = table.sample(2.5).class.unwrap();
        assert_eq!(top.landscape, LandscapeType::Mountains);
        assert_eq!(top.score, 1.0);
    }

    #[test]
    fn test_midpoint_of_blend_is_linear() {
        let table = GradientTable::standard();
        // Halfway through the Hills 0.4 band: between 0.6 and 0.8.
        let s = table.sample(0.45);
        assert!((s.multiplier - 0.7).abs() < EPSILON);
        assert!((s.class.unwrap().score - 0.5).abs() < EPSILON);
    }

    #[test]
    fn test_value_below_first_entry_uses_first() {
        let table = GradientTable::from_rows([(LandscapeType::Swamps, 0.2, 0.1, 0.3)]).unwrap();
        let s = table.sample(-5.0);
        assert_eq!(s.multiplier, 0.3);
        assert_eq!(s.class.unwrap().landscape, LandscapeType::Swamps);
    }

    #[test]
    fn test_zero_width_switches_immediately() {
        let table = GradientTable::from_rows([
            (LandscapeType::Plains, 0.0, 0.0, 1.0),
            (LandscapeType::Desert, 0.5, 0.0, 3.0),
        ])
        .unwrap();
        assert_eq!(table.height_multiplier(0.499), 1.0);
        assert_eq!(table.height_multiplier(0.5), 3.0);
    }

    #[test]
    fn test_push_rejects_unordered_and_negative_width() {
        let mut table = GradientTable::new();
        table.push(LandscapeType::Plains, 0.5, 0.0, 1.0).unwrap();
        assert!(matches!(
            table.push(LandscapeType::Hills, 0.4, 0.0, 1.0),
            Err(TerrainError::UnorderedGradient { index: 1, .. })
        ));
        assert!(matches!(
            table.push(LandscapeType::Hills, 0.6, -0.1, 1.0),
            Err(TerrainError::NegativeBlendWidth { index: 1, .. })
        ));
        assert!(matches!(
            table.push(LandscapeType::Hills, f64::NAN, 0.1, 1.0),
            Err(TerrainError::UnorderedGradient { .. })
        ));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_equal_thresholds_pick_the_later_entry() {
        let table = GradientTable::from_rows([
            (LandscapeType::Plains, 0.0, 0.0, 1.0),
            (LandscapeType::Hills, 0.5, 0.0, 2.0),
            (LandscapeType::Desert, 0.5, 0.0, 4.0),
        ])
        .unwrap();
        let s = table.sample(0.7);
        assert_eq!(s.multiplier, 4.0);
        assert_eq!(s.class.unwrap().landscape, LandscapeType::Desert);
    }
}
